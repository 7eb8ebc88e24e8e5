//! Staging step of capability reconciliation.

use std::collections::BTreeMap;

use authz_engine_sdk::ReconcileReport;

/// Changes needed to make the stored capabilities match the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    pub to_create: BTreeMap<String, String>,
    pub to_update: BTreeMap<String, String>,
    pub to_delete: Vec<String>,
}

impl ReconcilePlan {
    /// Diffs `desired` (registry) against `existing` (store), both name to description.
    #[must_use]
    pub fn compute(
        desired: &BTreeMap<String, String>,
        existing: &BTreeMap<String, String>,
    ) -> Self {
        let mut plan = Self::default();

        for (name, description) in desired {
            match existing.get(name) {
                None => {
                    plan.to_create.insert(name.clone(), description.clone());
                }
                Some(current) if current != description => {
                    plan.to_update.insert(name.clone(), description.clone());
                }
                Some(_) => {}
            }
        }

        plan.to_delete = existing
            .keys()
            .filter(|name| !desired.contains_key(*name))
            .cloned()
            .collect();

        plan
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_update.is_empty() && self.to_delete.is_empty()
    }

    #[must_use]
    pub fn report(&self) -> ReconcileReport {
        ReconcileReport {
            created: self.to_create.keys().cloned().collect(),
            updated: self.to_update.keys().cloned().collect(),
            deleted: self.to_delete.clone(),
        }
    }
}
