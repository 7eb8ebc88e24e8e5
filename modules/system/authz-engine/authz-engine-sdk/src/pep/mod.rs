//! PEP (Policy Enforcement Point) helpers.
//!
//! - [`PermissionEnforcer`] - resolves a [`RequiredCapability`](crate::RequiredCapability)
//!   against the decision point and maps the verdict to an [`EnforcerError`]

pub mod enforcer;

pub use enforcer::{EnforcerError, PermissionEnforcer};
