use std::collections::{BTreeMap, BTreeSet};

use authz_engine_sdk::RoleType;

use crate::config::RoleDefaultsConfig;

/// Declared default capabilities per role type, loaded once from
/// configuration and never mutated.
#[derive(Debug, Clone, Default)]
pub struct RoleDefaults {
    by_type: BTreeMap<String, RoleTypeDefaults>,
}

#[derive(Debug, Clone)]
pub struct RoleTypeDefaults {
    pub label: String,
    pub description: String,
    pub capabilities: BTreeSet<String>,
}

/// Declared defaults split by whether they are persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolved {
    pub present: BTreeSet<String>,
    pub missing: BTreeSet<String>,
}

impl RoleTypeDefaults {
    /// Partitions the declared names against the persisted ones.
    #[must_use]
    pub fn resolve(&self, persisted: &BTreeSet<String>) -> Resolved {
        let (present, missing): (BTreeSet<String>, BTreeSet<String>) = self
            .capabilities
            .iter()
            .cloned()
            .partition(|name| persisted.contains(name));
        Resolved { present, missing }
    }
}

impl RoleDefaults {
    #[must_use]
    pub fn from_config(cfg: &BTreeMap<String, RoleDefaultsConfig>) -> Self {
        let by_type = cfg
            .iter()
            .map(|(role_type, d)| {
                (
                    role_type.clone(),
                    RoleTypeDefaults {
                        label: d.label.clone(),
                        description: d.description.clone(),
                        capabilities: d.capabilities.iter().cloned().collect(),
                    },
                )
            })
            .collect();
        Self { by_type }
    }

    /// Whether `role_type` is one of the configured role types.
    #[must_use]
    pub fn knows(&self, role_type: &RoleType) -> bool {
        self.by_type.contains_key(role_type.as_str())
    }

    #[must_use]
    pub fn get(&self, role_type: &str) -> Option<&RoleTypeDefaults> {
        self.by_type.get(role_type)
    }

    /// Declared names for `role_type`; empty for unconfigured types.
    pub fn capabilities(&self, role_type: &str) -> impl Iterator<Item = &str> {
        self.by_type
            .get(role_type)
            .into_iter()
            .flat_map(|d| d.capabilities.iter().map(String::as_str))
    }

    pub fn role_types(&self) -> impl Iterator<Item = &str> {
        self.by_type.keys().map(String::as_str)
    }
}
