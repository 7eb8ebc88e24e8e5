//! Error types for the `AuthZ` engine module.

use thiserror::Error;
use uuid::Uuid;

/// Errors returned by the `AuthZ` engine API.
///
/// A negative authorization verdict is not an error: the decision point
/// answers `Ok(false)`. These variants cover invalid administrative input and
/// infrastructure failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzEngineError {
    /// A role with this name already exists.
    #[error("role name '{name}' is already taken")]
    DuplicateName { name: String },

    /// One or more capability names are not in the store.
    #[error("unknown capabilities: {}", .names.join(", "))]
    UnknownCapability { names: Vec<String> },

    /// The role type is not declared in configuration.
    #[error("unknown role type '{role_type}'")]
    UnknownRoleType { role_type: String },

    /// The referenced role or principal does not exist.
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: Uuid },

    /// The capability store could not be synchronized. Nothing was applied.
    #[error("capability reconciliation failed: {0}")]
    ReconciliationFailure(String),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthzEngineError {
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
