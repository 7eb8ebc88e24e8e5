use std::sync::Arc;

use authz_engine_sdk::AssignmentReport;
use sea_orm::TransactionTrait;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use crate::config::AssignmentMode;
use crate::domain::error::DomainError;
use crate::domain::repos::{CapabilitiesRepository, PrincipalsRepository, RolesRepository};
use crate::domain::role_defaults::RoleDefaults;

use super::DbConn;

/// Bulk application of the declared role-type defaults.
pub struct AssignmentService<CR, RR, PR>
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
    mode: AssignmentMode,
    run_lock: Mutex<()>,
}

impl<CR, RR, PR> AssignmentService<CR, RR, PR>
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
        mode: AssignmentMode,
    ) -> Self {
        Self {
            db,
            capabilities,
            roles,
            principals,
            defaults,
            mode,
            run_lock: Mutex::new(()),
        }
    }

    /// Gives every principal with a role the defaults of its role type.
    ///
    /// In `replace` mode the principal's direct set is cleared first, in
    /// `merge` mode existing grants are kept. Declared names that are not
    /// persisted are skipped and reported. Principals without a role, or
    /// whose role type declares no defaults, are left alone. One transaction
    /// covers the whole batch.
    ///
    /// # Errors
    ///
    /// [`DomainError::Database`] when the batch cannot be read or written; the
    /// transaction is rolled back.
    #[instrument(skip(self), fields(mode = ?self.mode))]
    pub async fn assign_role_permissions(&self) -> Result<AssignmentReport, DomainError> {
        let _guard = self.run_lock.lock().await;

        let txn = self.db.begin().await?;
        let persisted = self.capabilities.all_names(&txn).await?;
        let targets = self.principals.list_with_role_type(&txn).await?;

        let mut report = AssignmentReport::default();
        for (principal_id, role_type) in targets {
            let Some(defaults) = self.defaults.get(&role_type) else {
                debug!(%principal_id, %role_type, "role type declares no defaults");
                continue;
            };
            let resolved = defaults.resolve(&persisted);

            if self.mode == AssignmentMode::Replace {
                self.principals
                    .clear_capabilities(&txn, principal_id)
                    .await?;
            }
            report.assigned += self
                .principals
                .add_capabilities(&txn, principal_id, &resolved.present)
                .await?;
            report.updated += 1;
            report.skipped.extend(resolved.missing);
        }

        txn.commit().await?;

        if !report.skipped.is_empty() {
            info!(skipped = ?report.skipped, "default capabilities not yet persisted were skipped");
        }
        info!(
            principals = report.updated,
            assigned = report.assigned,
            "role permissions assigned"
        );
        Ok(report)
    }

    /// Replaces the capability set of every persisted role whose type
    /// declares defaults with the resolvable part of those defaults.
    ///
    /// # Errors
    ///
    /// [`DomainError::Database`] when the roles cannot be rewritten; the
    /// transaction is rolled back.
    #[instrument(skip(self))]
    pub async fn sync_role_defaults(&self) -> Result<AssignmentReport, DomainError> {
        let _guard = self.run_lock.lock().await;

        let now = OffsetDateTime::now_utc();
        let txn = self.db.begin().await?;
        let persisted = self.capabilities.all_names(&txn).await?;
        let roles = self.roles.list(&txn).await?;

        let mut report = AssignmentReport::default();
        for role in roles {
            let Some(defaults) = self.defaults.get(role.role_type.as_str()) else {
                continue;
            };
            let resolved = defaults.resolve(&persisted);

            self.roles
                .replace_capabilities(&txn, role.id, &resolved.present, now)
                .await?;
            report.assigned += u64::try_from(resolved.present.len()).unwrap_or(u64::MAX);
            report.updated += 1;
            report.skipped.extend(resolved.missing);
        }

        txn.commit().await?;

        info!(
            roles = report.updated,
            assigned = report.assigned,
            skipped = report.skipped.len(),
            "role defaults synchronized"
        );
        Ok(report)
    }
}
