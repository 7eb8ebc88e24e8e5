//! Models exchanged through the `AuthZ` engine API.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted capability: an atomic, named permission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capability {
    pub name: String,
    pub description: String,
}

/// Role category. The set of accepted values comes from the engine's
/// role-defaults configuration (`client` and `provider` out of the box).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleType(String);

impl RoleType {
    pub const CLIENT: &'static str = "client";
    pub const PROVIDER: &'static str = "provider";

    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn client() -> Self {
        Self::new(Self::CLIENT)
    }

    #[must_use]
    pub fn provider() -> Self {
        Self::new(Self::PROVIDER)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named, typed bundle of capabilities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub role_type: RoleType,
    /// Member capability names, sorted.
    pub capabilities: Vec<String>,
}

/// Data for creating a new role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRole {
    pub name: String,
    pub description: String,
    pub role_type: RoleType,
}

/// Partial update of a role. Fields left as `None` keep their value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_type: Option<RoleType>,
}

impl RoleUpdate {
    /// `true` when no field would change.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.role_type.is_none()
    }
}

/// An actor known to the authorization store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: Uuid,
    pub role_id: Option<Uuid>,
    /// Directly assigned capability names, sorted.
    pub capabilities: Vec<String>,
}

/// Capabilities a principal holds, split by origin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveCapabilities {
    pub direct: BTreeSet<String>,
    pub from_role: BTreeSet<String>,
}

impl EffectiveCapabilities {
    /// Membership test over the union of both sets.
    #[must_use]
    pub fn allows(&self, name: &str) -> bool {
        self.direct.contains(name) || self.from_role.contains(name)
    }

    /// The union of direct and role capabilities.
    #[must_use]
    pub fn union(&self) -> BTreeSet<String> {
        self.direct.union(&self.from_role).cloned().collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.direct.is_empty() && self.from_role.is_empty()
    }
}

/// Outcome of one capability reconciliation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileReport {
    pub created: Vec<String>,
    pub updated: Vec<String>,
    pub deleted: Vec<String>,
}

impl ReconcileReport {
    /// `true` when the store already matched the registry.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.created.is_empty() && self.updated.is_empty() && self.deleted.is_empty()
    }
}

/// Outcome of a bulk default-capability application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentReport {
    /// Principals (or roles) whose capability set was rewritten.
    pub updated: usize,
    /// Capability links written in total.
    pub assigned: u64,
    /// Declared default names that are not persisted yet.
    pub skipped: BTreeSet<String>,
}
