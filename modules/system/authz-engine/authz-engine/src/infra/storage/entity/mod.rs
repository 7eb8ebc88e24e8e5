pub mod capability;
pub mod principal;
pub mod principal_capability;
pub mod role;
pub mod role_capability;
