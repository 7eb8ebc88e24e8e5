#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! `AuthZ` engine SDK
//!
//! This crate provides the public API for the `authz_engine` module:
//!
//! - [`AuthzEngineClient`] - Decision point consumed by request handlers
//! - [`AuthzEngineAdminClient`] - Reconciliation, role and assignment management
//! - [`names`] - Canonical capability naming (`{namespace}.{action}_{entity}`)
//! - [`AuthzEngineError`] - Error types
//! - [`pep`] - PEP helper ([`PermissionEnforcer`])
//!
//! ## Usage
//!
//! ```ignore
//! use authz_engine_sdk::{CrudAction, EntityRef, PermissionEnforcer, RequiredCapability};
//!
//! static MESSAGE: EntityRef = EntityRef::from_static("messages", "message");
//!
//! let enforcer = PermissionEnforcer::new(authz_client);
//!
//! // 401 for anonymous callers, 403 when the capability is missing
//! enforcer
//!     .require(&ctx, &RequiredCapability::crud(&MESSAGE, CrudAction::Create))
//!     .await?;
//!
//! // Fixed capabilities are checked by name
//! enforcer
//!     .require(&ctx, &RequiredCapability::named("documents.download_document"))
//!     .await?;
//! ```

pub mod api;
pub mod error;
pub mod models;
pub mod names;
pub mod pep;

pub use api::{AuthzEngineAdminClient, AuthzEngineClient};
pub use error::AuthzEngineError;
pub use models::{
    AssignmentReport, Capability, EffectiveCapabilities, NewRole, Principal, ReconcileReport, Role,
    RoleType, RoleUpdate,
};
pub use names::{
    CrudAction, EntityRef, RequiredCapability, UnknownAction, capability_description,
    capability_name,
};
pub use pep::{EnforcerError, PermissionEnforcer};
