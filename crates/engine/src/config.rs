//! Initial budget.
//!
//! [`BudgetConfig`] only carries overrides: leaf values, role details and
//! locks not listed keep the built-in defaults below. Aggregates are never
//! configured, they are derived from the leaves when the state is built.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{ItemId, Policies, RoleDetail, calculators::DEFAULT_BALANCE_THRESHOLD};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetConfig {
    /// Leaf value overrides.
    pub values: BTreeMap<ItemId, f64>,
    /// Role detail overrides.
    pub roles: BTreeMap<ItemId, RoleDetail>,
    /// Lock overrides.
    pub locks: BTreeMap<ItemId, bool>,
    pub policies: Policies,
    /// Largest `|income − expenses|` still reported as balanced.
    pub balance_threshold: f64,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            values: BTreeMap::new(),
            roles: BTreeMap::new(),
            locks: BTreeMap::new(),
            policies: Policies::default(),
            balance_threshold: DEFAULT_BALANCE_THRESHOLD,
        }
    }
}

/// Built-in values of the non-role leaves.
#[must_use]
pub fn default_leaf_values() -> BTreeMap<ItemId, f64> {
    BTreeMap::from([
        (ItemId::Reserves, 50_000.0),
        (ItemId::GrossTuition, 190_000.0),
        (ItemId::Scholarships, 40_000.0),
        (ItemId::Fundraising, 100_000.0),
        (ItemId::FixedCosts, 100_000.0),
        (ItemId::BeforeSemester, 60_000.0),
        (ItemId::CsCohort2Program, 3_333.0),
        (ItemId::AlumniProgram, 3_333.0),
        (ItemId::DonorRetreat, 3_334.0),
        (ItemId::Food, 10_000.0),
        (ItemId::LegalAccountingInsurance, 10_000.0),
        (ItemId::SuppliesSubscriptions, 10_000.0),
        (ItemId::It, 10_000.0),
        (ItemId::Travel, 10_000.0),
        (ItemId::OtherOverhead, 20_000.0),
    ])
}

/// Built-in staffing: every role at 5 000 per head.
#[must_use]
pub fn default_roles() -> BTreeMap<ItemId, RoleDetail> {
    let quantities = [2.0, 2.0, 2.0, 1.0, 1.0, 2.0, 1.0, 1.0];
    ItemId::ROLES
        .into_iter()
        .zip(quantities)
        .map(|(role, quantity)| (role, RoleDetail::new(quantity, 5_000.0)))
        .collect()
}

/// Built-in locks: reserves start locked.
#[must_use]
pub fn default_locks() -> BTreeMap<ItemId, bool> {
    BTreeMap::from([(ItemId::Reserves, true)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::is_aggregate;

    #[test]
    fn defaults_cover_every_leaf_once() {
        let values = default_leaf_values();
        let roles = default_roles();
        for item in ItemId::ALL {
            let configured = values.contains_key(&item) as u8 + roles.contains_key(&item) as u8;
            if is_aggregate(item) {
                assert_eq!(configured, 0, "{item:?} is derived");
            } else {
                assert_eq!(configured, 1, "{item:?} needs exactly one default");
            }
        }
    }

    #[test]
    fn default_staffing_totals_sixty_thousand() {
        let total: f64 = default_roles().values().map(|r| r.total()).sum();
        assert_eq!(total, 60_000.0);
    }

    #[test]
    fn partial_config_deserializes() {
        let json = r#"{"values": {"food": 12000}, "locks": {"total": true}}"#;
        let config: BudgetConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.values[&ItemId::Food], 12_000.0);
        assert!(config.locks[&ItemId::Total]);
        assert!(config.roles.is_empty());
        assert_eq!(config.balance_threshold, DEFAULT_BALANCE_THRESHOLD);
    }
}
