//! Domain errors for the `AuthZ` engine.

use authz_engine_sdk::AuthzEngineError;
use sea_orm::{DbErr, SqlErr};
use uuid::Uuid;

/// Internal domain errors.
#[derive(thiserror::Error, Debug)]
pub enum DomainError {
    #[error("role name '{name}' is already taken")]
    DuplicateName { name: String },

    #[error("unknown capabilities: {}", .names.join(", "))]
    UnknownCapability { names: Vec<String> },

    #[error("unknown role type '{role_type}'")]
    UnknownRoleType { role_type: String },

    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: Uuid },

    #[error("reconciliation failed: {0}")]
    Reconciliation(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("database error: {0}")]
    Database(String),
}

impl DomainError {
    #[must_use]
    pub fn role_not_found(id: Uuid) -> Self {
        Self::NotFound { kind: "role", id }
    }

    #[must_use]
    pub fn principal_not_found(id: Uuid) -> Self {
        Self::NotFound {
            kind: "principal",
            id,
        }
    }

    /// Sorted, deduplicated list of offending names.
    #[must_use]
    pub fn unknown_capabilities<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        names.sort_unstable();
        names.dedup();
        Self::UnknownCapability { names }
    }

    /// Maps a failed role insert or rename, turning a unique violation into
    /// `DuplicateName`.
    #[must_use]
    pub fn from_role_write(e: DbErr, name: &str) -> Self {
        match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Self::DuplicateName {
                name: name.to_owned(),
            },
            _ => e.into(),
        }
    }
}

impl From<DbErr> for DomainError {
    fn from(e: DbErr) -> Self {
        Self::Database(e.to_string())
    }
}

impl From<DomainError> for AuthzEngineError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::DuplicateName { name } => Self::DuplicateName { name },
            DomainError::UnknownCapability { names } => Self::UnknownCapability { names },
            DomainError::UnknownRoleType { role_type } => Self::UnknownRoleType { role_type },
            DomainError::NotFound { kind, id } => Self::NotFound { kind, id },
            DomainError::Reconciliation(msg) => Self::ReconciliationFailure(msg),
            DomainError::InvalidConfig(msg) | DomainError::Database(msg) => Self::Internal(msg),
        }
    }
}
