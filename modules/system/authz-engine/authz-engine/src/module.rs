use std::sync::Arc;

use authz_engine_sdk::{AuthzEngineAdminClient, AuthzEngineClient, PermissionEnforcer};
use sea_orm::DatabaseConnection;
use tracing::info;

use crate::config::AuthzEngineConfig;
use crate::domain::local_client::AuthzEngineLocalClient;
use crate::domain::registry::CapabilityRegistry;
use crate::domain::role_defaults::RoleDefaults;
use crate::domain::service::{AppServices, ServiceConfig};
use crate::infra::storage::{
    OrmCapabilitiesRepository, OrmPrincipalsRepository, OrmRolesRepository, db,
};

/// Type alias for the concrete services with ORM repositories.
pub type ConcreteAppServices =
    AppServices<OrmCapabilitiesRepository, OrmRolesRepository, OrmPrincipalsRepository>;

type ConcreteLocalClient =
    AuthzEngineLocalClient<OrmCapabilitiesRepository, OrmRolesRepository, OrmPrincipalsRepository>;

/// The initialized `AuthZ` engine.
///
/// Owns the services and hands out the two client facades. Built once at
/// startup; cloning shares the same services.
#[derive(Clone)]
pub struct AuthzEngine {
    services: Arc<ConcreteAppServices>,
    client: Arc<ConcreteLocalClient>,
}

impl AuthzEngine {
    /// Validates the configuration, applies migrations, wires the services
    /// and, when `reconcile_on_startup` is set, reconciles the capability
    /// store.
    ///
    /// # Errors
    ///
    /// Fails on an invalid registry declaration, a migration error or a
    /// failed startup reconciliation.
    pub async fn init(cfg: &AuthzEngineConfig, db: DatabaseConnection) -> anyhow::Result<Self> {
        info!("Initializing authz engine");

        let registry = Arc::new(CapabilityRegistry::from_config(cfg)?);
        let defaults = Arc::new(RoleDefaults::from_config(&cfg.role_defaults));
        info!(
            capabilities = registry.enumerate().len(),
            role_types = cfg.role_defaults.len(),
            "capability registry built"
        );

        db::migrate(&db)
            .await
            .map_err(|e| anyhow::anyhow!("authz engine migrations failed: {e}"))?;

        let repos = (
            OrmCapabilitiesRepository::new(),
            OrmRolesRepository::new(),
            OrmPrincipalsRepository::new(),
        );
        let services = Arc::new(AppServices::new(
            Arc::new(db),
            repos,
            registry,
            defaults,
            ServiceConfig::from(cfg),
        ));

        if cfg.reconcile_on_startup {
            let report = services.capabilities.reconcile().await?;
            info!(
                created = report.created.len(),
                updated = report.updated.len(),
                deleted = report.deleted.len(),
                "startup reconciliation finished"
            );
        }

        let client = Arc::new(AuthzEngineLocalClient::new(services.clone()));
        Ok(Self { services, client })
    }

    #[must_use]
    pub fn services(&self) -> &Arc<ConcreteAppServices> {
        &self.services
    }

    /// Decision point facade for request handlers.
    #[must_use]
    pub fn client(&self) -> Arc<dyn AuthzEngineClient> {
        self.client.clone()
    }

    #[must_use]
    pub fn admin(&self) -> Arc<dyn AuthzEngineAdminClient> {
        self.client.clone()
    }

    #[must_use]
    pub fn enforcer(&self) -> PermissionEnforcer {
        PermissionEnforcer::new(self.client())
    }
}
