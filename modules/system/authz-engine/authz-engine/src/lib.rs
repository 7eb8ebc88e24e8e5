//! `AuthZ` Engine Module
//!
//! Capability-based authorization for the Agenda platform. Keeps the
//! capability store in line with the platform's declared entities, manages
//! roles and per-principal grants, and answers allow/deny questions.
//!
//! Exposes [`authz_engine_sdk::AuthzEngineClient`] and
//! [`authz_engine_sdk::AuthzEngineAdminClient`] through [`AuthzEngine`].
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod catalog;
pub mod config;
pub mod domain;
pub mod infra;
pub mod module;

pub use config::AuthzEngineConfig;
pub use infra::storage::db::{DbConfig, connect, migrate};
pub use module::{AuthzEngine, ConcreteAppServices};

#[cfg(test)]
pub(crate) mod test_support;
