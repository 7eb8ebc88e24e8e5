//! Local (in-process) client for the `AuthZ` engine.

use std::sync::Arc;

use agenda_security::SecurityContext;
use async_trait::async_trait;
use authz_engine_sdk::{
    AssignmentReport, AuthzEngineAdminClient, AuthzEngineClient, AuthzEngineError, Capability,
    EffectiveCapabilities, NewRole, Principal, ReconcileReport, Role, RoleUpdate,
};
use uuid::Uuid;

use super::DomainError;
use super::repos::{CapabilitiesRepository, PrincipalsRepository, RolesRepository};
use super::service::AppServices;

/// Serves both SDK traits from the in-process services.
pub struct AuthzEngineLocalClient<CR, RR, PR>
where
    CR: CapabilitiesRepository,
    RR: RolesRepository,
    PR: PrincipalsRepository,
{
    svc: Arc<AppServices<CR, RR, PR>>,
}

impl<CR, RR, PR> AuthzEngineLocalClient<CR, RR, PR>
where
    CR: CapabilitiesRepository,
    RR: RolesRepository,
    PR: PrincipalsRepository,
{
    #[must_use]
    pub fn new(svc: Arc<AppServices<CR, RR, PR>>) -> Self {
        Self { svc }
    }
}

fn log_and_convert(op: &str, e: DomainError) -> AuthzEngineError {
    match &e {
        DomainError::Database(_)
        | DomainError::InvalidConfig(_)
        | DomainError::Reconciliation(_) => {
            tracing::error!(operation = op, error = ?e, "authz_engine call failed");
        }
        _ => tracing::debug!(operation = op, error = %e, "authz_engine call rejected"),
    }
    e.into()
}

#[async_trait]
impl<CR, RR, PR> AuthzEngineClient for AuthzEngineLocalClient<CR, RR, PR>
where
    CR: CapabilitiesRepository + 'static,
    RR: RolesRepository + 'static,
    PR: PrincipalsRepository + 'static,
{
    async fn is_authorized(
        &self,
        ctx: &SecurityContext,
        capability: &str,
    ) -> Result<bool, AuthzEngineError> {
        self.svc
            .decisions
            .is_authorized(ctx, capability)
            .await
            .map_err(|e| log_and_convert("is_authorized", e))
    }

    async fn effective_capabilities(
        &self,
        ctx: &SecurityContext,
    ) -> Result<EffectiveCapabilities, AuthzEngineError> {
        self.svc
            .decisions
            .effective_capabilities(ctx)
            .await
            .map_err(|e| log_and_convert("effective_capabilities", e))
    }
}

#[async_trait]
impl<CR, RR, PR> AuthzEngineAdminClient for AuthzEngineLocalClient<CR, RR, PR>
where
    CR: CapabilitiesRepository + 'static,
    RR: RolesRepository + 'static,
    PR: PrincipalsRepository + 'static,
{
    async fn reconcile_capabilities(&self) -> Result<ReconcileReport, AuthzEngineError> {
        self.svc
            .capabilities
            .reconcile()
            .await
            .map_err(|e| log_and_convert("reconcile_capabilities", e))
    }

    async fn list_capabilities(&self) -> Result<Vec<Capability>, AuthzEngineError> {
        self.svc
            .capabilities
            .list()
            .await
            .map_err(|e| log_and_convert("list_capabilities", e))
    }

    async fn create_role(&self, new_role: NewRole) -> Result<Role, AuthzEngineError> {
        self.svc
            .roles
            .create_role(new_role)
            .await
            .map_err(|e| log_and_convert("create_role", e))
    }

    async fn get_role(&self, role_id: Uuid) -> Result<Role, AuthzEngineError> {
        self.svc
            .roles
            .get_role(role_id)
            .await
            .map_err(|e| log_and_convert("get_role", e))
    }

    async fn list_roles(&self) -> Result<Vec<Role>, AuthzEngineError> {
        self.svc
            .roles
            .list_roles()
            .await
            .map_err(|e| log_and_convert("list_roles", e))
    }

    async fn update_role(
        &self,
        role_id: Uuid,
        update: RoleUpdate,
    ) -> Result<Role, AuthzEngineError> {
        self.svc
            .roles
            .update_role(role_id, update)
            .await
            .map_err(|e| log_and_convert("update_role", e))
    }

    async fn set_role_capabilities(
        &self,
        role_id: Uuid,
        capabilities: Vec<String>,
    ) -> Result<Role, AuthzEngineError> {
        self.svc
            .roles
            .set_role_capabilities(role_id, capabilities)
            .await
            .map_err(|e| log_and_convert("set_role_capabilities", e))
    }

    async fn delete_role(&self, role_id: Uuid) -> Result<(), AuthzEngineError> {
        self.svc
            .roles
            .delete_role(role_id)
            .await
            .map_err(|e| log_and_convert("delete_role", e))
    }

    async fn sync_role_defaults(&self) -> Result<AssignmentReport, AuthzEngineError> {
        self.svc
            .assignment
            .sync_role_defaults()
            .await
            .map_err(|e| log_and_convert("sync_role_defaults", e))
    }

    async fn register_principal(
        &self,
        principal_id: Uuid,
        role_id: Option<Uuid>,
    ) -> Result<Principal, AuthzEngineError> {
        self.svc
            .principals
            .register_principal(principal_id, role_id)
            .await
            .map_err(|e| log_and_convert("register_principal", e))
    }

    async fn get_principal(&self, principal_id: Uuid) -> Result<Principal, AuthzEngineError> {
        self.svc
            .principals
            .get_principal(principal_id)
            .await
            .map_err(|e| log_and_convert("get_principal", e))
    }

    async fn set_principal_role(
        &self,
        principal_id: Uuid,
        role_id: Option<Uuid>,
    ) -> Result<Principal, AuthzEngineError> {
        self.svc
            .principals
            .set_principal_role(principal_id, role_id)
            .await
            .map_err(|e| log_and_convert("set_principal_role", e))
    }

    async fn grant(&self, principal_id: Uuid, capability: &str) -> Result<(), AuthzEngineError> {
        self.svc
            .principals
            .grant(principal_id, capability)
            .await
            .map_err(|e| log_and_convert("grant", e))
    }

    async fn revoke(&self, principal_id: Uuid, capability: &str) -> Result<(), AuthzEngineError> {
        self.svc
            .principals
            .revoke(principal_id, capability)
            .await
            .map_err(|e| log_and_convert("revoke", e))
    }

    async fn assign_role_permissions(&self) -> Result<AssignmentReport, AuthzEngineError> {
        self.svc
            .assignment
            .assign_role_permissions()
            .await
            .map_err(|e| log_and_convert("assign_role_permissions", e))
    }
}
