pub mod error;
pub mod local_client;
pub mod reconcile;
pub mod registry;
pub mod repos;
pub mod role_defaults;
pub mod service;

pub use error::DomainError;
pub use local_client::AuthzEngineLocalClient;
pub use registry::CapabilityRegistry;
pub use role_defaults::RoleDefaults;
pub use service::{AppServices, ServiceConfig};
