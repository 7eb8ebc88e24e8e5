//! Canonical capability naming.
//!
//! Entity-derived capabilities are named `{namespace}.{action}_{entity}`.
//! The registry that creates capabilities and the enforcement point that
//! checks them both go through [`capability_name`], so the two sides cannot
//! drift apart.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Action vocabulary applied to every registered entity, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrudAction {
    List,
    Retrieve,
    Create,
    Update,
    PartialUpdate,
    Destroy,
}

impl CrudAction {
    pub const ALL: [Self; 6] = [
        Self::List,
        Self::Retrieve,
        Self::Create,
        Self::Update,
        Self::PartialUpdate,
        Self::Destroy,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Retrieve => "retrieve",
            Self::Create => "create",
            Self::Update => "update",
            Self::PartialUpdate => "partial_update",
            Self::Destroy => "destroy",
        }
    }
}

impl fmt::Display for CrudAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The action keyword is not part of the CRUD vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action '{0}'")]
pub struct UnknownAction(pub String);

impl FromStr for CrudAction {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| UnknownAction(s.to_owned()))
    }
}

/// A domain entity that can be acted upon, identified by its owning
/// namespace (application) and its lowercase model name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityRef {
    pub namespace: Cow<'static, str>,
    pub name: Cow<'static, str>,
}

impl EntityRef {
    #[must_use]
    pub const fn from_static(namespace: &'static str, name: &'static str) -> Self {
        Self {
            namespace: Cow::Borrowed(namespace),
            name: Cow::Borrowed(name),
        }
    }

    #[must_use]
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: Cow::Owned(namespace.into()),
            name: Cow::Owned(name.into()),
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace, self.name)
    }
}

/// Builds the capability name for `action` on `entity`.
#[must_use]
pub fn capability_name(entity: &EntityRef, action: CrudAction) -> String {
    format!("{}.{}_{}", entity.namespace, action.as_str(), entity.name)
}

/// Human-readable description stored next to a derived capability.
#[must_use]
pub fn capability_description(entity: &EntityRef, action: CrudAction) -> String {
    format!(
        "Can {} {} in {}",
        action.as_str(),
        entity.name,
        entity.namespace
    )
}

/// What an inbound operation needs in order to proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredCapability<'a> {
    /// A CRUD action on a registered entity.
    Crud {
        entity: &'a EntityRef,
        action: CrudAction,
    },
    /// A fixed capability checked verbatim (menu flags, custom endpoints).
    Named(&'a str),
}

impl<'a> RequiredCapability<'a> {
    #[must_use]
    pub const fn crud(entity: &'a EntityRef, action: CrudAction) -> Self {
        Self::Crud { entity, action }
    }

    #[must_use]
    pub const fn named(name: &'a str) -> Self {
        Self::Named(name)
    }

    /// Capability name to look up in the principal's effective set.
    #[must_use]
    pub fn name(&self) -> Cow<'a, str> {
        match *self {
            Self::Crud { entity, action } => Cow::Owned(capability_name(entity, action)),
            Self::Named(name) => Cow::Borrowed(name),
        }
    }
}
