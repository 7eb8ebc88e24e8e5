//! Policy Enforcement Point (`PEP`) object.
//!
//! [`PermissionEnforcer`] wraps the decision point for request handlers:
//! resolve the required capability name, ask the engine, and turn a negative
//! verdict into an error the transport layer can map to a status code.

use std::sync::Arc;

use agenda_security::SecurityContext;

use crate::api::AuthzEngineClient;
use crate::error::AuthzEngineError;
use crate::names::{CrudAction, EntityRef, RequiredCapability};

/// Error from the PEP enforcement flow.
#[derive(Debug, thiserror::Error)]
pub enum EnforcerError {
    /// The request carries no authenticated principal.
    #[error("authentication required")]
    Unauthenticated,

    /// The principal lacks the required capability.
    #[error("missing capability '{capability}'")]
    Denied { capability: String },

    /// The decision point could not be consulted.
    #[error("authorization evaluation failed: {0}")]
    EvaluationFailed(#[from] AuthzEngineError),
}

impl EnforcerError {
    /// HTTP status a transport layer should answer with.
    #[must_use]
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Unauthenticated => 401,
            Self::Denied { .. } => 403,
            Self::EvaluationFailed(_) => 500,
        }
    }
}

/// Policy Enforcement Point.
///
/// Constructed once during service init; cloneable (`Arc` inside).
#[derive(Clone)]
pub struct PermissionEnforcer {
    authz: Arc<dyn AuthzEngineClient>,
}

impl PermissionEnforcer {
    #[must_use]
    pub fn new(authz: Arc<dyn AuthzEngineClient>) -> Self {
        Self { authz }
    }

    /// Raw verdict for `required`. Anonymous callers get `Ok(false)`.
    ///
    /// # Errors
    ///
    /// - [`EnforcerError::EvaluationFailed`] if the decision point fails
    pub async fn check(
        &self,
        ctx: &SecurityContext,
        required: &RequiredCapability<'_>,
    ) -> Result<bool, EnforcerError> {
        let name = required.name();
        Ok(self.authz.is_authorized(ctx, &name).await?)
    }

    /// Fail unless the caller holds `required`.
    ///
    /// # Errors
    ///
    /// - [`EnforcerError::Unauthenticated`] for anonymous callers
    /// - [`EnforcerError::Denied`] if the capability is missing
    /// - [`EnforcerError::EvaluationFailed`] if the decision point fails
    pub async fn require(
        &self,
        ctx: &SecurityContext,
        required: &RequiredCapability<'_>,
    ) -> Result<(), EnforcerError> {
        if !ctx.is_authenticated() {
            return Err(EnforcerError::Unauthenticated);
        }

        let name = required.name();
        if self.authz.is_authorized(ctx, &name).await? {
            Ok(())
        } else {
            tracing::debug!(
                subject_id = %ctx.subject_id(),
                capability = %name,
                "capability check denied"
            );
            Err(EnforcerError::Denied {
                capability: name.into_owned(),
            })
        }
    }

    /// Shorthand for [`require`](Self::require) with a CRUD action.
    ///
    /// # Errors
    ///
    /// Same as [`require`](Self::require).
    pub async fn require_crud(
        &self,
        ctx: &SecurityContext,
        entity: &EntityRef,
        action: CrudAction,
    ) -> Result<(), EnforcerError> {
        self.require(ctx, &RequiredCapability::crud(entity, action))
            .await
    }
}

impl std::fmt::Debug for PermissionEnforcer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionEnforcer").finish_non_exhaustive()
    }
}
