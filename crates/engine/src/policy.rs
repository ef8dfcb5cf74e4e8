//! Split policies.
//!
//! Each group declares how a change is divided among its eligible children,
//! separately for the two situations that need a split:
//!
//! - `rebalance`: a child moved while the parent is locked, so the other
//!   unlocked children absorb the opposite change;
//! - `cascade`: the parent moved, so its unlocked children follow.
//!
//! Defaults: simple sibling groups rebalance evenly, expense sub-items and
//! staffing roles rebalance in proportion to their current value, and every
//! cascade is proportional.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{EngineError, GroupId, ResultEngine, hierarchy::Relation};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitPolicy {
    /// Equal parts.
    Even,
    /// In proportion to each child's current value.
    Proportional,
    /// Fixed weights, indexed like the group's children and renormalised
    /// over the eligible ones.
    Weighted(Vec<f64>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct GroupPolicy {
    pub rebalance: SplitPolicy,
    pub cascade: SplitPolicy,
}

impl GroupPolicy {
    /// Built-in policy of a group.
    #[must_use]
    pub fn default_for(group: GroupId) -> Self {
        let rebalance = match group {
            GroupId::Income
            | GroupId::Expenses
            | GroupId::NetTuition
            | GroupId::VariableCosts
            | GroupId::StaffSalaries => SplitPolicy::Even,
            GroupId::DuringSemester | GroupId::OtherExpenses | GroupId::Rent => {
                SplitPolicy::Proportional
            }
        };
        Self {
            rebalance,
            cascade: SplitPolicy::Proportional,
        }
    }
}

/// Partial policy of one group; unset fields keep the built-in default.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rebalance: Option<SplitPolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cascade: Option<SplitPolicy>,
}

/// Per-group policy overrides.
///
/// Deserializes from a map keyed by group, e.g. in TOML:
///
/// ```toml
/// [budget.policies.expenses]
/// cascade = { weighted = [0.67, 0.33] }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Policies {
    overrides: BTreeMap<GroupId, PolicyOverride>,
}

impl Policies {
    /// Effective policy of `group`.
    #[must_use]
    pub fn get(&self, group: GroupId) -> GroupPolicy {
        let mut policy = GroupPolicy::default_for(group);
        if let Some(custom) = self.overrides.get(&group) {
            if let Some(rebalance) = &custom.rebalance {
                policy.rebalance = rebalance.clone();
            }
            if let Some(cascade) = &custom.cascade {
                policy.cascade = cascade.clone();
            }
        }
        policy
    }

    #[must_use]
    pub fn with_rebalance(mut self, group: GroupId, policy: SplitPolicy) -> Self {
        self.overrides.entry(group).or_default().rebalance = Some(policy);
        self
    }

    #[must_use]
    pub fn with_cascade(mut self, group: GroupId, policy: SplitPolicy) -> Self {
        self.overrides.entry(group).or_default().cascade = Some(policy);
        self
    }

    /// Rejects weights that do not fit their group.
    pub fn validate(&self) -> ResultEngine<()> {
        for (group, custom) in &self.overrides {
            let rows = group.group();
            if rows.relation == Relation::Difference {
                // Difference groups have a single absorbing child; the split
                // policy is not consulted.
                continue;
            }
            for policy in [&custom.rebalance, &custom.cascade].into_iter().flatten() {
                if let SplitPolicy::Weighted(weights) = policy {
                    if weights.len() != rows.children.len() {
                        return Err(EngineError::InvalidPolicy(format!(
                            "{group:?} has {} children, got {} weights",
                            rows.children.len(),
                            weights.len()
                        )));
                    }
                    if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
                        return Err(EngineError::InvalidPolicy(format!(
                            "{group:?} weights must be finite and >= 0"
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}
