use std::collections::BTreeSet;
use std::sync::Arc;

use authz_engine_sdk::Principal;
use sea_orm::{ConnectionTrait, TransactionTrait};
use time::OffsetDateTime;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::repos::{CapabilitiesRepository, PrincipalsRepository, RolesRepository};

use super::DbConn;

/// Principal registration, role changes and per-principal overrides.
pub struct PrincipalsService<CR, RR, PR>
where
    CR: CapabilitiesRepository,
    RR: RolesRepository,
    PR: PrincipalsRepository,
{
    db: DbConn,
    capabilities: Arc<CR>,
    roles: Arc<RR>,
    principals: Arc<PR>,
}

impl<CR, RR, PR> PrincipalsService<CR, RR, PR>
where
    CR: CapabilitiesRepository,
    RR: RolesRepository,
    PR: PrincipalsRepository,
{
    #[must_use]
    pub fn new(db: DbConn, capabilities: Arc<CR>, roles: Arc<RR>, principals: Arc<PR>) -> Self {
        Self {
            db,
            capabilities,
            roles,
            principals,
        }
    }

    /// Registers a principal. A new principal with a role is seeded with the
    /// role's current capabilities as its direct set. Registering a known
    /// principal only updates its role.
    ///
    /// # Errors
    ///
    /// [`DomainError::NotFound`] when `role_id` names a missing role.
    #[instrument(skip(self), fields(principal_id = %id, role_id = ?role_id))]
    pub async fn register_principal(
        &self,
        id: Uuid,
        role_id: Option<Uuid>,
    ) -> Result<Principal, DomainError> {
        let now = OffsetDateTime::now_utc();
        let txn = self.db.begin().await?;
        self.ensure_role(&txn, role_id).await?;

        if self.principals.find(&txn, id).await?.is_some() {
            self.principals.set_role(&txn, id, role_id, now).await?;
            debug!("principal already registered, role updated");
        } else {
            self.principals.insert(&txn, id, role_id, now).await?;
            if let Some(role_id) = role_id {
                let seed = self.roles.capabilities(&txn, role_id).await?;
                let seeded = self.principals.add_capabilities(&txn, id, &seed).await?;
                debug!(seeded, "direct capabilities seeded from role");
            }
            info!("principal registered");
        }

        let principal = self.load(&txn, id).await?;
        txn.commit().await?;
        Ok(principal)
    }

    /// # Errors
    ///
    /// [`DomainError::NotFound`] when the principal is not registered.
    #[instrument(skip(self), fields(principal_id = %id))]
    pub async fn get_principal(&self, id: Uuid) -> Result<Principal, DomainError> {
        self.load(self.db.as_ref(), id).await
    }

    /// Changes the role reference only; the direct set is left alone.
    ///
    /// # Errors
    ///
    /// [`DomainError::NotFound`] when the principal or the role is missing.
    #[instrument(skip(self), fields(principal_id = %id, role_id = ?role_id))]
    pub async fn set_principal_role(
        &self,
        id: Uuid,
        role_id: Option<Uuid>,
    ) -> Result<Principal, DomainError> {
        let txn = self.db.begin().await?;
        self.ensure_principal(&txn, id).await?;
        self.ensure_role(&txn, role_id).await?;
        self.principals
            .set_role(&txn, id, role_id, OffsetDateTime::now_utc())
            .await?;
        let principal = self.load(&txn, id).await?;
        txn.commit().await?;

        info!("principal role changed");
        Ok(principal)
    }

    /// Adds `capability` to the principal's direct set. Granting twice is a no-op.
    ///
    /// # Errors
    ///
    /// [`DomainError::NotFound`] for an unregistered principal and
    /// [`DomainError::UnknownCapability`] when the name is not persisted.
    #[instrument(skip(self), fields(principal_id = %id))]
    pub async fn grant(&self, id: Uuid, capability: &str) -> Result<(), DomainError> {
        let txn = self.db.begin().await?;
        self.ensure_principal(&txn, id).await?;
        self.ensure_capability(&txn, capability).await?;

        let added = self
            .principals
            .add_capabilities(&txn, id, &BTreeSet::from([capability.to_owned()]))
            .await?;
        txn.commit().await?;

        debug!(capability, added, "capability granted");
        Ok(())
    }

    /// Removes `capability` from the principal's direct set. Revoking an
    /// absent grant is a no-op; the role's set is not affected.
    ///
    /// # Errors
    ///
    /// Same as [`PrincipalsService::grant`].
    #[instrument(skip(self), fields(principal_id = %id))]
    pub async fn revoke(&self, id: Uuid, capability: &str) -> Result<(), DomainError> {
        let txn = self.db.begin().await?;
        self.ensure_principal(&txn, id).await?;
        self.ensure_capability(&txn, capability).await?;

        let removed = self
            .principals
            .remove_capability(&txn, id, capability)
            .await?;
        txn.commit().await?;

        debug!(capability, removed, "capability revoked");
        Ok(())
    }

    async fn load<C: ConnectionTrait>(&self, conn: &C, id: Uuid) -> Result<Principal, DomainError> {
        let record = self
            .principals
            .find(conn, id)
            .await?
            .ok_or_else(|| DomainError::principal_not_found(id))?;
        let capabilities = self.principals.capabilities(conn, id).await?;
        Ok(Principal {
            id: record.id,
            role_id: record.role_id,
            capabilities: capabilities.into_iter().collect(),
        })
    }

    async fn ensure_principal<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<(), DomainError> {
        match self.principals.find(conn, id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::principal_not_found(id)),
        }
    }

    async fn ensure_role<C: ConnectionTrait>(
        &self,
        conn: &C,
        role_id: Option<Uuid>,
    ) -> Result<(), DomainError> {
        let Some(role_id) = role_id else {
            return Ok(());
        };
        match self.roles.find(conn, role_id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::role_not_found(role_id)),
        }
    }

    async fn ensure_capability<C: ConnectionTrait>(
        &self,
        conn: &C,
        name: &str,
    ) -> Result<(), DomainError> {
        if self.capabilities.exists(conn, name).await? {
            Ok(())
        } else {
            Err(DomainError::unknown_capabilities([name]))
        }
    }
}
