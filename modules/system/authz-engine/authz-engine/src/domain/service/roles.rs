use std::collections::BTreeSet;
use std::sync::Arc;

use authz_engine_sdk::{NewRole, Role, RoleUpdate};
use sea_orm::TransactionTrait;
use time::OffsetDateTime;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::repos::{CapabilitiesRepository, PrincipalsRepository, RolesRepository};
use crate::domain::role_defaults::RoleDefaults;

use super::DbConn;

pub struct RolesService<CR, RR, PR>
where
    CR: CapabilitiesRepository,
    RR: RolesRepository,
    PR: PrincipalsRepository,
{
    db: DbConn,
    capabilities: Arc<CR>,
    roles: Arc<RR>,
    principals: Arc<PR>,
    defaults: Arc<RoleDefaults>,
}

impl<CR, RR, PR> RolesService<CR, RR, PR>
where
    CR: CapabilitiesRepository,
    RR: RolesRepository,
    PR: PrincipalsRepository,
{
    #[must_use]
    pub fn new(
        db: DbConn,
        capabilities: Arc<CR>,
        roles: Arc<RR>,
        principals: Arc<PR>,
        defaults: Arc<RoleDefaults>,
    ) -> Self {
        Self {
            db,
            capabilities,
            roles,
            principals,
            defaults,
        }
    }

    /// Creates an empty role.
    ///
    /// # Errors
    ///
    /// [`DomainError::UnknownRoleType`] when the type has no configured
    /// defaults, [`DomainError::DuplicateName`] when the name is taken.
    #[instrument(
        skip(self, new_role),
        fields(name = %new_role.name, role_type = %new_role.role_type)
    )]
    pub async fn create_role(&self, new_role: NewRole) -> Result<Role, DomainError> {
        if !self.defaults.knows(&new_role.role_type) {
            return Err(DomainError::UnknownRoleType {
                role_type: new_role.role_type.to_string(),
            });
        }

        let txn = self.db.begin().await?;
        if self.roles.name_taken(&txn, &new_role.name).await? {
            return Err(DomainError::DuplicateName {
                name: new_role.name,
            });
        }
        let role = self
            .roles
            .insert(&txn, Uuid::new_v4(), &new_role, OffsetDateTime::now_utc())
            .await?;
        txn.commit().await?;

        info!(role_id = %role.id, "role created");
        Ok(role)
    }

    /// # Errors
    ///
    /// [`DomainError::NotFound`] when the role does not exist.
    #[instrument(skip(self), fields(role_id = %id))]
    pub async fn get_role(&self, id: Uuid) -> Result<Role, DomainError> {
        self.roles
            .find(self.db.as_ref(), id)
            .await?
            .ok_or_else(|| DomainError::role_not_found(id))
    }

    /// # Errors
    ///
    /// [`DomainError::Database`] when the store cannot be read.
    #[instrument(skip(self))]
    pub async fn list_roles(&self) -> Result<Vec<Role>, DomainError> {
        self.roles.list(self.db.as_ref()).await
    }

    /// Renames, redescribes or retypes the role. Its capability set and its
    /// holders are left as they are.
    ///
    /// # Errors
    ///
    /// [`DomainError::UnknownRoleType`] for an unconfigured type,
    /// [`DomainError::NotFound`] when the role does not exist and
    /// [`DomainError::DuplicateName`] when another role has the new name.
    #[instrument(skip(self, update), fields(role_id = %id))]
    pub async fn update_role(&self, id: Uuid, update: RoleUpdate) -> Result<Role, DomainError> {
        if let Some(role_type) = &update.role_type
            && !self.defaults.knows(role_type)
        {
            return Err(DomainError::UnknownRoleType {
                role_type: role_type.to_string(),
            });
        }

        let txn = self.db.begin().await?;
        let current = self
            .roles
            .find(&txn, id)
            .await?
            .ok_or_else(|| DomainError::role_not_found(id))?;
        if update.is_empty() {
            return Ok(current);
        }
        if let Some(name) = &update.name
            && *name != current.name
            && self.roles.name_taken(&txn, name).await?
        {
            return Err(DomainError::DuplicateName {
                name: name.to_owned(),
            });
        }

        self.roles
            .update(&txn, id, &update, OffsetDateTime::now_utc())
            .await?;
        let role = self
            .roles
            .find(&txn, id)
            .await?
            .ok_or_else(|| DomainError::role_not_found(id))?;
        txn.commit().await?;

        info!(name = %role.name, role_type = %role.role_type, "role updated");
        Ok(role)
    }

    /// Replaces the role's capability set.
    ///
    /// # Errors
    ///
    /// [`DomainError::NotFound`] when the role does not exist. Every name
    /// must be persisted; otherwise nothing changes and all offending names
    /// are reported as [`DomainError::UnknownCapability`].
    #[instrument(skip(self, names), fields(role_id = %id, requested = names.len()))]
    pub async fn set_role_capabilities(
        &self,
        id: Uuid,
        names: Vec<String>,
    ) -> Result<Role, DomainError> {
        let wanted: BTreeSet<String> = names.into_iter().collect();

        let txn = self.db.begin().await?;
        if self.roles.find(&txn, id).await?.is_none() {
            return Err(DomainError::role_not_found(id));
        }

        let known = self.capabilities.existing(&txn, &wanted).await?;
        if known.len() != wanted.len() {
            return Err(DomainError::unknown_capabilities(
                wanted.difference(&known).cloned(),
            ));
        }

        self.roles
            .replace_capabilities(&txn, id, &wanted, OffsetDateTime::now_utc())
            .await?;
        let role = self
            .roles
            .find(&txn, id)
            .await?
            .ok_or_else(|| DomainError::role_not_found(id))?;
        txn.commit().await?;

        info!(
            capabilities = role.capabilities.len(),
            "role capabilities replaced"
        );
        Ok(role)
    }

    /// Deletes the role. Principals holding it keep their direct
    /// capabilities and end up without a role.
    ///
    /// # Errors
    ///
    /// [`DomainError::NotFound`] when the role does not exist.
    #[instrument(skip(self), fields(role_id = %id))]
    pub async fn delete_role(&self, id: Uuid) -> Result<(), DomainError> {
        let txn = self.db.begin().await?;
        if self.roles.find(&txn, id).await?.is_none() {
            return Err(DomainError::role_not_found(id));
        }

        let orphaned = self
            .principals
            .detach_role(&txn, id, OffsetDateTime::now_utc())
            .await?;
        self.roles.delete(&txn, id).await?;
        txn.commit().await?;

        info!(orphaned, "role deleted");
        Ok(())
    }
}
