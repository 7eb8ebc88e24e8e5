use std::collections::BTreeSet;
use std::sync::Arc;

use agenda_security::SecurityContext;
use authz_engine_sdk::EffectiveCapabilities;
use tracing::{debug, instrument};

use crate::domain::error::DomainError;
use crate::domain::repos::{PrincipalsRepository, RolesRepository};

use super::DbConn;

/// Answers "may this caller do X?".
///
/// A caller is allowed when the capability is in its direct set or in the
/// set of the role it currently holds. Anonymous callers, unregistered
/// principals and names that are not persisted are all denied without an
/// error. Reads are point lookups and run outside a transaction.
pub struct DecisionService<RR, PR>
where
    RR: RolesRepository,
    PR: PrincipalsRepository,
{
    db: DbConn,
    roles: Arc<RR>,
    principals: Arc<PR>,
}

impl<RR, PR> DecisionService<RR, PR>
where
    RR: RolesRepository,
    PR: PrincipalsRepository,
{
    #[must_use]
    pub fn new(db: DbConn, roles: Arc<RR>, principals: Arc<PR>) -> Self {
        Self {
            db,
            roles,
            principals,
        }
    }

    /// Membership test over the caller's direct and role capabilities.
    ///
    /// # Errors
    ///
    /// [`DomainError::Database`] when a lookup fails. A denial is `Ok(false)`.
    #[instrument(skip(self, ctx), fields(subject = %ctx.subject_id()))]
    pub async fn is_authorized(
        &self,
        ctx: &SecurityContext,
        capability: &str,
    ) -> Result<bool, DomainError> {
        if !ctx.is_authenticated() {
            return Ok(false);
        }

        let conn = self.db.as_ref();
        let id = ctx.subject_id();
        let Some(principal) = self.principals.find(conn, id).await? else {
            debug!("unregistered principal denied");
            return Ok(false);
        };

        if self.principals.has_capability(conn, id, capability).await? {
            return Ok(true);
        }
        match principal.role_id {
            Some(role_id) => self.roles.has_capability(conn, role_id, capability).await,
            None => Ok(false),
        }
    }

    /// Both halves of the caller's effective set. Empty for anonymous or
    /// unregistered callers.
    ///
    /// # Errors
    ///
    /// [`DomainError::Database`] when a lookup fails.
    #[instrument(skip(self, ctx), fields(subject = %ctx.subject_id()))]
    pub async fn effective_capabilities(
        &self,
        ctx: &SecurityContext,
    ) -> Result<EffectiveCapabilities, DomainError> {
        if !ctx.is_authenticated() {
            return Ok(EffectiveCapabilities::default());
        }

        let conn = self.db.as_ref();
        let id = ctx.subject_id();
        let Some(principal) = self.principals.find(conn, id).await? else {
            return Ok(EffectiveCapabilities::default());
        };

        let direct = self.principals.capabilities(conn, id).await?;
        let from_role = match principal.role_id {
            Some(role_id) => self.roles.capabilities(conn, role_id).await?,
            None => BTreeSet::new(),
        };
        Ok(EffectiveCapabilities { direct, from_role })
    }
}
