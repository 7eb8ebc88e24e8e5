//! Server configuration: YAML file plus `AGENDA__` environment overrides.

use std::path::Path;

use authz_engine::{AuthzEngineConfig, DbConfig};
use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use serde::Deserialize;

/// Environment prefix; `__` separates nested keys
/// (`AGENDA__DATABASE__URL`, `AGENDA__AUTHZ__ASSIGNMENT_MODE`).
pub const ENV_PREFIX: &str = "AGENDA__";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub database: DbConfig,
    pub logging: LoggingConfig,
    pub authz: AuthzEngineConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; `RUST_LOG` wins when set.
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Layered sources, lowest priority first.
    #[must_use]
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::new();
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Loads the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is not valid YAML, a key is unknown or
    /// a value has the wrong type.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = path.filter(|p| !p.exists()) {
            anyhow::bail!("config file {} not found", path.display());
        }
        Ok(Self::figment(path).extract()?)
    }
}
