//! Domain service layer.
//!
//! One service per concern, all sharing the connection pool:
//! - `capabilities` - registry reconciliation and capability listing
//! - `roles` - role lifecycle and membership
//! - `principals` - principal registration, role changes, direct grants
//! - `assignment` - bulk application of role-type defaults
//! - `decisions` - the per-request allow/deny check
//!
//! Multi-step writes run inside one database transaction. The two bulk
//! operations (reconciliation, default assignment) additionally hold an
//! async lock for the whole run so they never overlap with themselves.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::{AssignmentMode, AuthzEngineConfig, ObsoleteCapabilityPolicy};
use crate::domain::registry::CapabilityRegistry;
use crate::domain::repos::{CapabilitiesRepository, PrincipalsRepository, RolesRepository};
use crate::domain::role_defaults::RoleDefaults;

mod assignment;
mod capabilities;
mod decisions;
mod principals;
mod roles;

pub use assignment::AssignmentService;
pub use capabilities::CapabilitiesService;
pub use decisions::DecisionService;
pub use principals::PrincipalsService;
pub use roles::RolesService;

pub(crate) type DbConn = Arc<DatabaseConnection>;

/// Behavior switches of the domain services.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServiceConfig {
    pub assignment_mode: AssignmentMode,
    pub obsolete_capabilities: ObsoleteCapabilityPolicy,
}

impl From<&AuthzEngineConfig> for ServiceConfig {
    fn from(cfg: &AuthzEngineConfig) -> Self {
        Self {
            assignment_mode: cfg.assignment_mode,
            obsolete_capabilities: cfg.obsolete_capabilities,
        }
    }
}

/// Aggregates all domain services.
pub struct AppServices<CR, RR, PR>
where
    CR: CapabilitiesRepository,
    RR: RolesRepository,
    PR: PrincipalsRepository,
{
    pub capabilities: CapabilitiesService<CR>,
    pub roles: RolesService<CR, RR, PR>,
    pub principals: PrincipalsService<CR, RR, PR>,
    pub assignment: AssignmentService<CR, RR, PR>,
    pub decisions: DecisionService<RR, PR>,
}

#[cfg(test)]
mod tests_reconcile;

#[cfg(test)]
mod tests_roles;

#[cfg(test)]
mod tests_assignment;

#[cfg(test)]
mod tests_decisions;

impl<CR, RR, PR> AppServices<CR, RR, PR>
where
    CR: CapabilitiesRepository,
    RR: RolesRepository,
    PR: PrincipalsRepository,
{
    #[must_use]
    pub fn new(
        db: DbConn,
        repos: (CR, RR, PR),
        registry: Arc<CapabilityRegistry>,
        defaults: Arc<RoleDefaults>,
        config: ServiceConfig,
    ) -> Self {
        let (capabilities_repo, roles_repo, principals_repo) = repos;
        let capabilities_repo = Arc::new(capabilities_repo);
        let roles_repo = Arc::new(roles_repo);
        let principals_repo = Arc::new(principals_repo);

        Self {
            capabilities: CapabilitiesService::new(
                db.clone(),
                capabilities_repo.clone(),
                registry,
                config.obsolete_capabilities,
            ),
            roles: RolesService::new(
                db.clone(),
                capabilities_repo.clone(),
                roles_repo.clone(),
                principals_repo.clone(),
                defaults.clone(),
            ),
            principals: PrincipalsService::new(
                db.clone(),
                capabilities_repo.clone(),
                roles_repo.clone(),
                principals_repo.clone(),
            ),
            assignment: AssignmentService::new(
                db.clone(),
                capabilities_repo,
                roles_repo.clone(),
                principals_repo.clone(),
                defaults,
                config.assignment_mode,
            ),
            decisions: DecisionService::new(db, roles_repo, principals_repo),
        }
    }
}
