use std::sync::Arc;

use authz_engine_sdk::{Capability, ReconcileReport};
use sea_orm::{ConnectionTrait, TransactionTrait};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::config::ObsoleteCapabilityPolicy;
use crate::domain::error::DomainError;
use crate::domain::reconcile::ReconcilePlan;
use crate::domain::registry::CapabilityRegistry;
use crate::domain::repos::CapabilitiesRepository;

use super::DbConn;

/// Keeps the capability table in line with the registry.
pub struct CapabilitiesService<CR: CapabilitiesRepository> {
    db: DbConn,
    repo: Arc<CR>,
    registry: Arc<CapabilityRegistry>,
    obsolete: ObsoleteCapabilityPolicy,
    run_lock: Mutex<()>,
}

impl<CR: CapabilitiesRepository> CapabilitiesService<CR> {
    #[must_use]
    pub fn new(
        db: DbConn,
        repo: Arc<CR>,
        registry: Arc<CapabilityRegistry>,
        obsolete: ObsoleteCapabilityPolicy,
    ) -> Self {
        Self {
            db,
            repo,
            registry,
            obsolete,
            run_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    /// Persisted capabilities in name order.
    ///
    /// # Errors
    ///
    /// [`DomainError::Database`] when the store cannot be read.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Capability>, DomainError> {
        self.repo.list(self.db.as_ref()).await
    }

    /// Creates missing capabilities, refreshes changed descriptions and
    /// removes the ones the registry no longer declares, all in one
    /// transaction.
    ///
    /// # Errors
    ///
    /// Any failure surfaces as [`DomainError::Reconciliation`] and leaves the
    /// store untouched.
    #[instrument(skip(self), fields(declared = self.registry.enumerate().len()))]
    pub async fn reconcile(&self) -> Result<ReconcileReport, DomainError> {
        let _guard = self.run_lock.lock().await;

        self.apply().await.map_err(|e| match e {
            DomainError::Reconciliation(_) => e,
            other => DomainError::Reconciliation(other.to_string()),
        })
    }

    async fn apply(&self) -> Result<ReconcileReport, DomainError> {
        let txn = self.db.begin().await?;

        let existing = self.repo.load_all(&txn).await?;
        let plan = ReconcilePlan::compute(self.registry.enumerate(), &existing);
        if plan.is_empty() {
            debug!("capability store already up to date");
            return Ok(plan.report());
        }

        if !plan.to_delete.is_empty() {
            self.remove_obsolete(&txn, &plan.to_delete).await?;
        }
        self.repo.insert_many(&txn, &plan.to_create).await?;
        self.repo.update_descriptions(&txn, &plan.to_update).await?;

        txn.commit().await?;

        info!(
            created = plan.to_create.len(),
            updated = plan.to_update.len(),
            deleted = plan.to_delete.len(),
            "capability reconciliation complete"
        );
        Ok(plan.report())
    }

    /// Deletes `names`, handling their remaining role and principal links
    /// according to the configured policy.
    async fn remove_obsolete<C: ConnectionTrait>(
        &self,
        conn: &C,
        names: &[String],
    ) -> Result<(), DomainError> {
        match self.obsolete {
            ObsoleteCapabilityPolicy::Restrict => {
                let referenced = self.repo.referenced(conn, names).await?;
                if !referenced.is_empty() {
                    let names: Vec<&str> = referenced.iter().map(String::as_str).collect();
                    warn!(capabilities = ?names, "obsolete capabilities are still referenced");
                    return Err(DomainError::Reconciliation(format!(
                        "obsolete capabilities still referenced: {}",
                        names.join(", ")
                    )));
                }
            }
            ObsoleteCapabilityPolicy::Cascade => {
                let unlinked = self.repo.unlink(conn, names).await?;
                if unlinked > 0 {
                    info!(
                        links = unlinked,
                        "dropped role and principal links to obsolete capabilities"
                    );
                }
            }
        }
        self.repo.delete_many(conn, names).await?;
        Ok(())
    }
}
