//! Database connection and schema setup.

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use serde::Deserialize;

use super::migrations::Migrator;

/// Connection settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DbConfig {
    /// `sqlite://path?mode=rwc`, `sqlite::memory:` or `postgres://...`.
    pub url: String,
    pub max_conns: Option<u32>,
    pub min_conns: Option<u32>,
    pub connect_timeout_secs: Option<u64>,
    /// Log every statement through `tracing`.
    pub log_statements: bool,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://agenda.db?mode=rwc".to_owned(),
            max_conns: None,
            min_conns: None,
            connect_timeout_secs: None,
            log_statements: false,
        }
    }
}

impl DbConfig {
    /// Single-connection in-memory database.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_owned(),
            max_conns: Some(1),
            min_conns: Some(1),
            ..Self::default()
        }
    }
}

/// Opens a connection pool.
///
/// # Errors
///
/// Returns the driver error if the database cannot be reached.
pub async fn connect(cfg: &DbConfig) -> Result<DatabaseConnection, DbErr> {
    let mut opts = ConnectOptions::new(cfg.url.clone());
    if let Some(max) = cfg.max_conns {
        opts.max_connections(max);
    }
    if let Some(min) = cfg.min_conns {
        opts.min_connections(min);
    }
    if let Some(secs) = cfg.connect_timeout_secs {
        opts.connect_timeout(Duration::from_secs(secs));
    }
    opts.sqlx_logging(cfg.log_statements);

    tracing::debug!(url = %redact(&cfg.url), "connecting to database");
    Database::connect(opts).await
}

/// Applies pending schema migrations.
///
/// # Errors
///
/// Returns the driver error if a migration fails.
pub async fn migrate(db: &DatabaseConnection) -> Result<(), DbErr> {
    Migrator::up(db, None).await
}

/// Strips credentials from a connection URL before logging it.
fn redact(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***{}", &url[..scheme_end], &url[at..])
        }
        _ => url.to_owned(),
    }
}
