//! Shared fixtures for the service tests.

use std::sync::Arc;

use agenda_security::SecurityContext;
use authz_engine_sdk::{NewRole, RoleType};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::config::AuthzEngineConfig;
use crate::domain::registry::CapabilityRegistry;
use crate::domain::role_defaults::RoleDefaults;
use crate::domain::service::{AppServices, ServiceConfig};
use crate::infra::storage::db::{self, DbConfig};
use crate::infra::storage::{OrmCapabilitiesRepository, OrmPrincipalsRepository, OrmRolesRepository};
use crate::module::ConcreteAppServices;

/// In-memory database with migrations applied.
pub async fn inmem_db() -> DatabaseConnection {
    let db = db::connect(&DbConfig::in_memory())
        .await
        .expect("Failed to connect to in-memory database");
    db::migrate(&db).await.expect("Failed to run migrations");
    db
}

pub fn build_services(db: DatabaseConnection, cfg: &AuthzEngineConfig) -> ConcreteAppServices {
    let registry = CapabilityRegistry::from_config(cfg).expect("valid registry");
    AppServices::new(
        Arc::new(db),
        (
            OrmCapabilitiesRepository::new(),
            OrmRolesRepository::new(),
            OrmPrincipalsRepository::new(),
        ),
        Arc::new(registry),
        Arc::new(RoleDefaults::from_config(&cfg.role_defaults)),
        ServiceConfig::from(cfg),
    )
}

/// Fresh database, default configuration, capabilities already reconciled.
pub async fn reconciled_services() -> ConcreteAppServices {
    let svc = build_services(inmem_db().await, &AuthzEngineConfig::default());
    svc.capabilities.reconcile().await.expect("reconcile");
    svc
}

pub fn new_role(name: &str, role_type: RoleType) -> NewRole {
    NewRole {
        name: name.to_owned(),
        description: format!("{name} role"),
        role_type,
    }
}

pub fn ctx_for(principal_id: Uuid) -> SecurityContext {
    SecurityContext::builder()
        .subject_id(principal_id)
        .subject_tenant_id(Uuid::new_v4())
        .build()
}
