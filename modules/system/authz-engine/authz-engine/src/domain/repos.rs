//! Repository ports of the `AuthZ` engine.
//!
//! Every method takes the connection explicitly so callers can run a batch
//! of calls inside one transaction.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use authz_engine_sdk::{Capability, NewRole, Role, RoleUpdate};
use sea_orm::ConnectionTrait;
use time::OffsetDateTime;
use uuid::Uuid;

use super::error::DomainError;

/// Stored principal row without its capability set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrincipalRecord {
    pub id: Uuid,
    pub role_id: Option<Uuid>,
}

#[async_trait]
pub trait CapabilitiesRepository: Send + Sync {
    /// Every stored capability, name to description.
    async fn load_all<C: ConnectionTrait>(
        &self,
        conn: &C,
    ) -> Result<BTreeMap<String, String>, DomainError>;

    async fn list<C: ConnectionTrait>(&self, conn: &C) -> Result<Vec<Capability>, DomainError>;

    async fn all_names<C: ConnectionTrait>(
        &self,
        conn: &C,
    ) -> Result<BTreeSet<String>, DomainError>;

    /// The subset of `names` that is stored.
    async fn existing<C: ConnectionTrait>(
        &self,
        conn: &C,
        names: &BTreeSet<String>,
    ) -> Result<BTreeSet<String>, DomainError>;

    async fn exists<C: ConnectionTrait>(&self, conn: &C, name: &str) -> Result<bool, DomainError>;

    async fn insert_many<C: ConnectionTrait>(
        &self,
        conn: &C,
        capabilities: &BTreeMap<String, String>,
    ) -> Result<(), DomainError>;

    async fn update_descriptions<C: ConnectionTrait>(
        &self,
        conn: &C,
        capabilities: &BTreeMap<String, String>,
    ) -> Result<(), DomainError>;

    async fn delete_many<C: ConnectionTrait>(
        &self,
        conn: &C,
        names: &[String],
    ) -> Result<u64, DomainError>;

    /// Names among `names` still held by a role or a principal.
    async fn referenced<C: ConnectionTrait>(
        &self,
        conn: &C,
        names: &[String],
    ) -> Result<BTreeSet<String>, DomainError>;

    /// Removes every role and principal link to `names`. Returns the number
    /// of links removed.
    async fn unlink<C: ConnectionTrait>(
        &self,
        conn: &C,
        names: &[String],
    ) -> Result<u64, DomainError>;
}

#[async_trait]
pub trait RolesRepository: Send + Sync {
    async fn insert<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
        new_role: &NewRole,
        now: OffsetDateTime,
    ) -> Result<Role, DomainError>;

    async fn find<C: ConnectionTrait>(&self, conn: &C, id: Uuid)
    -> Result<Option<Role>, DomainError>;

    async fn name_taken<C: ConnectionTrait>(
        &self,
        conn: &C,
        name: &str,
    ) -> Result<bool, DomainError>;

    async fn list<C: ConnectionTrait>(&self, conn: &C) -> Result<Vec<Role>, DomainError>;

    /// Writes the set fields of `update` and bumps `updated_at`.
    async fn update<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
        update: &RoleUpdate,
        now: OffsetDateTime,
    ) -> Result<(), DomainError>;

    /// Replaces the role's capability set and bumps `updated_at`.
    async fn replace_capabilities<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
        names: &BTreeSet<String>,
        now: OffsetDateTime,
    ) -> Result<(), DomainError>;

    async fn delete<C: ConnectionTrait>(&self, conn: &C, id: Uuid) -> Result<bool, DomainError>;

    /// Point lookup on the membership key.
    async fn has_capability<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
        name: &str,
    ) -> Result<bool, DomainError>;

    async fn capabilities<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<BTreeSet<String>, DomainError>;
}

#[async_trait]
pub trait PrincipalsRepository: Send + Sync {
    async fn insert<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
        role_id: Option<Uuid>,
        now: OffsetDateTime,
    ) -> Result<PrincipalRecord, DomainError>;

    async fn find<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<PrincipalRecord>, DomainError>;

    async fn set_role<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
        role_id: Option<Uuid>,
        now: OffsetDateTime,
    ) -> Result<(), DomainError>;

    /// Orphans every principal holding `role_id`. Returns how many were touched.
    async fn detach_role<C: ConnectionTrait>(
        &self,
        conn: &C,
        role_id: Uuid,
        now: OffsetDateTime,
    ) -> Result<u64, DomainError>;

    /// Principals that currently have a role, with that role's type.
    async fn list_with_role_type<C: ConnectionTrait>(
        &self,
        conn: &C,
    ) -> Result<Vec<(Uuid, String)>, DomainError>;

    async fn capabilities<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<BTreeSet<String>, DomainError>;

    /// Point lookup on the grant key.
    async fn has_capability<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
        name: &str,
    ) -> Result<bool, DomainError>;

    /// Adds grants, ignoring the ones already present. Returns how many rows
    /// were written.
    async fn add_capabilities<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
        names: &BTreeSet<String>,
    ) -> Result<u64, DomainError>;

    async fn remove_capability<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
        name: &str,
    ) -> Result<bool, DomainError>;

    async fn clear_capabilities<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<u64, DomainError>;
}
