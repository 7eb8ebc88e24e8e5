//! Configuration for the `AuthZ` engine.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::catalog;

/// Module configuration. Every field falls back to the built-in catalog.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthzEngineConfig {
    /// Namespaces whose entities never produce capabilities.
    pub excluded_namespaces: Vec<String>,

    /// Entities registered on top of the built-in catalog.
    pub extra_entities: Vec<EntityConfig>,

    /// Fixed capabilities registered on top of the built-in catalog.
    pub extra_fixed_capabilities: Vec<FixedCapabilityConfig>,

    /// Default capability set per role type. The keys are the accepted role types.
    pub role_defaults: BTreeMap<String, RoleDefaultsConfig>,

    /// How bulk assignment treats a principal's existing direct capabilities.
    pub assignment_mode: AssignmentMode,

    /// What reconciliation does with capabilities the registry no longer declares.
    pub obsolete_capabilities: ObsoleteCapabilityPolicy,

    /// Reconcile the capability store while the module initializes.
    pub reconcile_on_startup: bool,
}

impl Default for AuthzEngineConfig {
    fn default() -> Self {
        Self {
            excluded_namespaces: catalog::EXCLUDED_NAMESPACES
                .iter()
                .map(|ns| (*ns).to_owned())
                .collect(),
            extra_entities: Vec::new(),
            extra_fixed_capabilities: Vec::new(),
            role_defaults: catalog::ROLE_DEFAULTS
                .iter()
                .map(|d| {
                    (
                        d.role_type.to_owned(),
                        RoleDefaultsConfig {
                            label: d.label.to_owned(),
                            description: d.description.to_owned(),
                            capabilities: d.capabilities.iter().map(|c| (*c).to_owned()).collect(),
                        },
                    )
                })
                .collect(),
            assignment_mode: AssignmentMode::default(),
            obsolete_capabilities: ObsoleteCapabilityPolicy::default(),
            reconcile_on_startup: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct EntityConfig {
    pub namespace: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FixedCapabilityConfig {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct RoleDefaultsConfig {
    pub label: String,
    pub description: String,
    pub capabilities: Vec<String>,
}

/// Bulk assignment mode.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentMode {
    /// Clear the principal's direct set, then add the defaults.
    #[default]
    Replace,
    /// Add the defaults, keep everything already granted.
    Merge,
}

/// Handling of persisted capabilities missing from the registry.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ObsoleteCapabilityPolicy {
    /// Delete them together with every role and principal link.
    #[default]
    Cascade,
    /// Refuse the run while any role or principal still references them.
    Restrict,
}
