pub mod capabilities_sea_repo;
pub mod db;
pub mod entity;
pub mod migrations;
pub mod principals_sea_repo;
pub mod roles_sea_repo;

pub use capabilities_sea_repo::OrmCapabilitiesRepository;
pub use principals_sea_repo::OrmPrincipalsRepository;
pub use roles_sea_repo::OrmRolesRepository;

/// Rows per multi-row insert; keeps statements under `SQLite`'s bound-parameter limit.
const INSERT_CHUNK: usize = 200;
