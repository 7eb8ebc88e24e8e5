//! Public API traits for the `AuthZ` engine.

use agenda_security::SecurityContext;
use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AuthzEngineError;
use crate::models::{
    AssignmentReport, Capability, EffectiveCapabilities, NewRole, Principal, ReconcileReport, Role,
    RoleUpdate,
};

/// Decision point consulted on every inbound operation.
///
/// ```ignore
/// let allowed = authz.is_authorized(&ctx, "appointments.list_appointment").await?;
/// ```
#[async_trait]
pub trait AuthzEngineClient: Send + Sync {
    /// Whether the caller holds `capability`, either directly or through
    /// their role.
    ///
    /// Anonymous callers, unregistered principals and unknown capability
    /// names all yield `Ok(false)`.
    ///
    /// # Errors
    ///
    /// - `Internal` if the store cannot be read
    async fn is_authorized(
        &self,
        ctx: &SecurityContext,
        capability: &str,
    ) -> Result<bool, AuthzEngineError>;

    /// The caller's resolved capabilities, split into direct and role-derived.
    ///
    /// # Errors
    ///
    /// - `Internal` if the store cannot be read
    async fn effective_capabilities(
        &self,
        ctx: &SecurityContext,
    ) -> Result<EffectiveCapabilities, AuthzEngineError>;
}

/// Administrative operations: capability reconciliation, roles, principals
/// and bulk assignment.
#[async_trait]
pub trait AuthzEngineAdminClient: Send + Sync {
    /// Synchronize persisted capabilities with the registry.
    ///
    /// # Errors
    ///
    /// - `ReconciliationFailure` if the run could not be applied atomically
    async fn reconcile_capabilities(&self) -> Result<ReconcileReport, AuthzEngineError>;

    /// All persisted capabilities, sorted by name.
    ///
    /// # Errors
    ///
    /// - `Internal` if the store cannot be read
    async fn list_capabilities(&self) -> Result<Vec<Capability>, AuthzEngineError>;

    /// # Errors
    ///
    /// - `DuplicateName` if the role name is taken
    /// - `UnknownRoleType` if the role type is not configured
    async fn create_role(&self, new_role: NewRole) -> Result<Role, AuthzEngineError>;

    /// # Errors
    ///
    /// - `NotFound` if the role does not exist
    async fn get_role(&self, role_id: Uuid) -> Result<Role, AuthzEngineError>;

    /// # Errors
    ///
    /// - `Internal` if the store cannot be read
    async fn list_roles(&self) -> Result<Vec<Role>, AuthzEngineError>;

    /// Change the role's name, description or type. Unset fields are kept.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the role does not exist
    /// - `DuplicateName` if the new name is taken by another role
    /// - `UnknownRoleType` if the new role type is not configured
    async fn update_role(&self, role_id: Uuid, update: RoleUpdate)
    -> Result<Role, AuthzEngineError>;

    /// Replace the role's capability set.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the role does not exist
    /// - `UnknownCapability` listing every name that is not persisted
    async fn set_role_capabilities(
        &self,
        role_id: Uuid,
        capabilities: Vec<String>,
    ) -> Result<Role, AuthzEngineError>;

    /// Delete a role. Principals holding it are left without a role.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the role does not exist
    async fn delete_role(&self, role_id: Uuid) -> Result<(), AuthzEngineError>;

    /// Replace every configured role's capabilities with its declared defaults.
    ///
    /// # Errors
    ///
    /// - `Internal` if the store cannot be written
    async fn sync_role_defaults(&self) -> Result<AssignmentReport, AuthzEngineError>;

    /// Register a principal, optionally with a role. A new principal with a
    /// role starts with the role's capabilities as its direct set.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the role does not exist
    async fn register_principal(
        &self,
        principal_id: Uuid,
        role_id: Option<Uuid>,
    ) -> Result<Principal, AuthzEngineError>;

    /// # Errors
    ///
    /// - `NotFound` if the principal does not exist
    async fn get_principal(&self, principal_id: Uuid) -> Result<Principal, AuthzEngineError>;

    /// # Errors
    ///
    /// - `NotFound` if the principal or the role does not exist
    async fn set_principal_role(
        &self,
        principal_id: Uuid,
        role_id: Option<Uuid>,
    ) -> Result<Principal, AuthzEngineError>;

    /// Add one capability to the principal's direct set.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the principal does not exist
    /// - `UnknownCapability` if the capability is not persisted
    async fn grant(&self, principal_id: Uuid, capability: &str) -> Result<(), AuthzEngineError>;

    /// Remove one capability from the principal's direct set.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the principal does not exist
    /// - `UnknownCapability` if the capability is not persisted
    async fn revoke(&self, principal_id: Uuid, capability: &str) -> Result<(), AuthzEngineError>;

    /// Apply role-type default capabilities to every principal with a role.
    ///
    /// # Errors
    ///
    /// - `Internal` if the store cannot be written
    async fn assign_role_permissions(&self) -> Result<AssignmentReport, AuthzEngineError>;
}
