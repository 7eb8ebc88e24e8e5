//! Capability registry: the complete, deterministic list of capabilities the
//! platform declares.
//!
//! Built once from the static entity table and the fixed capability list.
//! All validation happens in [`CapabilityRegistry::new`]; enumeration itself
//! cannot fail afterwards.

use std::collections::{BTreeMap, BTreeSet};

use authz_engine_sdk::{CrudAction, EntityRef, capability_description, capability_name};

use crate::catalog;
use crate::config::AuthzEngineConfig;
use crate::domain::error::DomainError;

#[derive(Debug, Clone)]
pub struct CapabilityRegistry {
    entities: Vec<EntityRef>,
    fixed: Vec<String>,
    declared: BTreeMap<String, String>,
}

impl CapabilityRegistry {
    /// Builds the registry.
    ///
    /// Entities whose namespace is in `excluded_namespaces` are dropped and
    /// repeated entities are collapsed. A fixed capability that is empty or
    /// collides with any other declared name is rejected.
    ///
    /// # Errors
    ///
    /// [`DomainError::InvalidConfig`] for an entity missing its namespace or
    /// name, a name derived twice, or a fixed capability that is empty,
    /// repeated or equal to a derived name.
    pub fn new<E, F>(
        entities: E,
        fixed: F,
        excluded_namespaces: &[String],
    ) -> Result<Self, DomainError>
    where
        E: IntoIterator<Item = EntityRef>,
        F: IntoIterator<Item = (String, String)>,
    {
        let excluded: BTreeSet<&str> = excluded_namespaces.iter().map(String::as_str).collect();

        let mut seen = BTreeSet::new();
        let mut kept = Vec::new();
        for entity in entities {
            if entity.namespace.is_empty() || entity.name.is_empty() {
                return Err(DomainError::InvalidConfig(format!(
                    "entity '{entity}' needs both a namespace and a name"
                )));
            }
            if excluded.contains(entity.namespace.as_ref()) || !seen.insert(entity.clone()) {
                continue;
            }
            kept.push(entity);
        }

        let mut declared = BTreeMap::new();
        for entity in &kept {
            for action in CrudAction::ALL {
                let name = capability_name(entity, action);
                if declared.contains_key(&name) {
                    return Err(DomainError::InvalidConfig(format!(
                        "capability '{name}' is derived from more than one entity"
                    )));
                }
                declared.insert(name, capability_description(entity, action));
            }
        }

        let mut fixed_names = Vec::new();
        for (name, description) in fixed {
            if name.trim().is_empty() {
                return Err(DomainError::InvalidConfig(
                    "fixed capability with an empty name".to_owned(),
                ));
            }
            if declared.contains_key(&name) {
                let reason = if fixed_names.contains(&name) {
                    "is declared twice"
                } else {
                    "collides with a derived capability"
                };
                return Err(DomainError::InvalidConfig(format!(
                    "fixed capability '{name}' {reason}"
                )));
            }
            declared.insert(name.clone(), description);
            fixed_names.push(name);
        }

        Ok(Self {
            entities: kept,
            fixed: fixed_names,
            declared,
        })
    }

    /// Built-in catalog extended with the configured extras.
    ///
    /// # Errors
    ///
    /// Same as [`CapabilityRegistry::new`].
    pub fn from_config(cfg: &AuthzEngineConfig) -> Result<Self, DomainError> {
        let entities = catalog::ENTITIES.iter().map(|&e| e.clone()).chain(
            cfg.extra_entities
                .iter()
                .map(|e| EntityRef::new(e.namespace.clone(), e.name.clone())),
        );
        let fixed = catalog::FIXED_CAPABILITIES
            .iter()
            .map(|(name, description)| ((*name).to_owned(), (*description).to_owned()))
            .chain(
                cfg.extra_fixed_capabilities
                    .iter()
                    .map(|f| (f.name.clone(), f.description.clone())),
            );

        Self::new(entities, fixed, &cfg.excluded_namespaces)
    }

    /// Every declared capability, name to description, in name order.
    #[must_use]
    pub fn enumerate(&self) -> &BTreeMap<String, String> {
        &self.declared
    }

    /// Entities that produce capabilities, in declaration order.
    #[must_use]
    pub fn entities(&self) -> &[EntityRef] {
        &self.entities
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.declared.contains_key(name)
    }

    /// Names derived for `entity`, in action-vocabulary order.
    ///
    /// Unlike [`capability_name`], which derives a name for any entity, this
    /// only answers for entities the registry declares: an unregistered
    /// entity, or one whose namespace is excluded, yields an empty list.
    #[must_use]
    pub fn capabilities_for(&self, entity: &EntityRef) -> Vec<String> {
        if !self.entities.contains(entity) {
            return Vec::new();
        }
        CrudAction::ALL
            .into_iter()
            .map(|action| capability_name(entity, action))
            .collect()
    }

    /// Fixed capability names, optionally restricted to those starting with `prefix`.
    #[must_use]
    pub fn fixed_capabilities(&self, prefix: Option<&str>) -> Vec<&str> {
        self.fixed
            .iter()
            .map(String::as_str)
            .filter(|name| prefix.is_none_or(|p| name.starts_with(p)))
            .collect()
    }
}
