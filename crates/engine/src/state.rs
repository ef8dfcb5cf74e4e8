//! Budget state and its transition function.
//!
//! [`BudgetState::apply`] is pure: it returns the next state or the reason
//! the edit was rejected, and never modifies `self`. A rejected edit
//! therefore cannot leave a partially propagated state behind.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    Amount, BudgetConfig, EngineError, GroupId, ItemId, LockRegistry, Policies, ResultEngine,
    RoleDetail, Snapshot, Totals, ValueStore,
    calculators::{self, approximately_equal},
    config::{default_leaf_values, default_locks, default_roles},
    hierarchy::{GROUPS, is_aggregate},
    propagation::Propagator,
    values::NEGATIVE_NOISE,
};

/// A single user edit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Edit {
    /// Set the value of any item, leaf or aggregate.
    Value { item: ItemId, value: f64 },
    /// Set the head count of a role; its value follows.
    Quantity { role: ItemId, quantity: f64 },
    /// Set the unit cost of a role; its value follows.
    Rate { role: ItemId, rate: f64 },
}

impl Edit {
    #[must_use]
    pub fn item(&self) -> ItemId {
        match *self {
            Edit::Value { item, .. } => item,
            Edit::Quantity { role, .. } | Edit::Rate { role, .. } => role,
        }
    }

    fn number(&self) -> f64 {
        match *self {
            Edit::Value { value, .. } => value,
            Edit::Quantity { quantity, .. } => quantity,
            Edit::Rate { rate, .. } => rate,
        }
    }

    fn validate(&self) -> ResultEngine<()> {
        let item = self.item();
        let value = self.number();
        if !value.is_finite() || value < 0.0 {
            return Err(EngineError::InvalidValue { item, value });
        }
        if !matches!(self, Edit::Value { .. }) && !item.is_role() {
            return Err(EngineError::NotARole(item));
        }
        Ok(())
    }
}

fn check_amount(item: ItemId, value: f64) -> ResultEngine<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(EngineError::InvalidValue { item, value });
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq)]
pub struct BudgetState {
    values: ValueStore,
    locks: LockRegistry,
    policies: Policies,
    balance_threshold: f64,
}

impl BudgetState {
    /// Builds the initial state: built-in defaults, then `config` overrides,
    /// then every aggregate derived from its components.
    pub fn from_config(config: &BudgetConfig) -> ResultEngine<Self> {
        config.policies.validate()?;
        if !config.balance_threshold.is_finite() || config.balance_threshold < 0.0 {
            return Err(EngineError::InvalidAmount(format!(
                "balance threshold must be >= 0, got {}",
                config.balance_threshold
            )));
        }

        let mut leaves = default_leaf_values();
        for (item, value) in &config.values {
            if is_aggregate(*item) {
                return Err(EngineError::DerivedItem(*item));
            }
            if item.is_role() {
                return Err(EngineError::InvalidAmount(format!(
                    "{item} is configured through its quantity and rate"
                )));
            }
            check_amount(*item, *value)?;
            leaves.insert(*item, *value);
        }

        let mut roles = default_roles();
        for (role, detail) in &config.roles {
            if !role.is_role() {
                return Err(EngineError::NotARole(*role));
            }
            check_amount(*role, detail.quantity)?;
            check_amount(*role, detail.rate)?;
            roles.insert(*role, *detail);
        }

        let mut values = ValueStore::default();
        for (item, value) in leaves {
            values.write(item, value);
        }
        for (role, detail) in roles {
            values.write_role(role, detail);
        }

        // Deepest groups sit last in the table.
        for group in GROUPS.iter().rev() {
            let derived = group.evaluate(&values);
            if derived < -NEGATIVE_NOISE {
                return Err(EngineError::NegativeValue {
                    item: group.parent,
                    value: derived,
                });
            }
            values.write(group.parent, derived);
        }
        let income = GroupId::Income.group().evaluate(&values);
        let expenses = GroupId::Expenses.group().evaluate(&values);
        if !approximately_equal(income, expenses) {
            return Err(EngineError::InvariantViolated(format!(
                "configured income {} does not match expenses {}",
                Amount::new(income),
                Amount::new(expenses)
            )));
        }

        let mut locks = LockRegistry::default();
        for (item, locked) in default_locks().into_iter().chain(config.locks.clone()) {
            locks.set(item, locked);
        }

        let state = Self {
            values,
            locks,
            policies: config.policies.clone(),
            balance_threshold: config.balance_threshold,
        };
        state.verify()?;
        Ok(state)
    }

    /// Applies `edit` and returns the resulting state.
    pub fn apply(&self, edit: Edit) -> ResultEngine<Self> {
        edit.validate()?;
        let mut next = self.clone();
        let mut propagator = Propagator::new(&mut next.values, &next.locks, &next.policies);
        match edit {
            Edit::Value { item, value } => propagator.set_value(item, value)?,
            Edit::Quantity { role, quantity } => {
                let current = self.role_detail(role)?;
                propagator.set_role(role, RoleDetail::new(quantity, current.rate))?;
            }
            Edit::Rate { role, rate } => {
                let current = self.role_detail(role)?;
                propagator.set_role(role, RoleDetail::new(current.quantity, rate))?;
            }
        }
        if let Err(err) = next.verify() {
            warn!("edit broke the budget invariants: {err}");
            return Err(err);
        }
        Ok(next)
    }

    /// Returns a copy of the state with the lock of `item` flipped. Values
    /// are untouched.
    #[must_use]
    pub fn with_lock_toggled(&self, item: ItemId) -> Self {
        let mut next = self.clone();
        next.locks.toggle(item);
        next
    }

    #[must_use]
    pub fn with_lock(&self, item: ItemId, locked: bool) -> Self {
        let mut next = self.clone();
        next.locks.set(item, locked);
        next
    }

    fn role_detail(&self, role: ItemId) -> ResultEngine<RoleDetail> {
        self.values.role(role).ok_or(EngineError::NotARole(role))
    }

    /// Checks non-negativity, role consistency and every group equation.
    pub fn verify(&self) -> ResultEngine<()> {
        for item in ItemId::ALL {
            let value = self.values.get(item);
            if !value.is_finite() || value < -NEGATIVE_NOISE {
                return Err(EngineError::InvariantViolated(format!(
                    "{item} holds {value}"
                )));
            }
        }
        for (role, detail) in self.values.roles() {
            if !approximately_equal(detail.total(), self.values.get(*role)) {
                return Err(EngineError::InvariantViolated(format!(
                    "{role} is {} but {} × {} = {}",
                    self.values.get(*role),
                    detail.quantity,
                    detail.rate,
                    detail.total()
                )));
            }
        }
        for group in &GROUPS {
            let parent = self.values.get(group.parent);
            let derived = group.evaluate(&self.values);
            if !approximately_equal(parent, derived) {
                return Err(EngineError::InvariantViolated(format!(
                    "{} is {parent} but its {:?} components give {derived}",
                    group.parent, group.id
                )));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn value(&self, item: ItemId) -> f64 {
        self.values.get(item)
    }

    #[must_use]
    pub fn role(&self, item: ItemId) -> Option<RoleDetail> {
        self.values.role(item)
    }

    #[must_use]
    pub fn is_locked(&self, item: ItemId) -> bool {
        self.locks.is_locked(item)
    }

    #[must_use]
    pub fn values(&self) -> &ValueStore {
        &self.values
    }

    #[must_use]
    pub fn locks(&self) -> &LockRegistry {
        &self.locks
    }

    #[must_use]
    pub fn policies(&self) -> &Policies {
        &self.policies
    }

    #[must_use]
    pub fn total_income(&self) -> f64 {
        GroupId::Income.group().evaluate(&self.values)
    }

    #[must_use]
    pub fn total_expenses(&self) -> f64 {
        GroupId::Expenses.group().evaluate(&self.values)
    }

    #[must_use]
    pub fn net_tuition(&self) -> f64 {
        GroupId::NetTuition.group().evaluate(&self.values)
    }

    #[must_use]
    pub fn balance(&self) -> f64 {
        calculators::balance(self.total_income(), self.total_expenses())
    }

    #[must_use]
    pub fn is_balanced(&self) -> bool {
        calculators::is_balanced(self.balance(), self.balance_threshold)
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            values: ItemId::ALL
                .into_iter()
                .map(|item| (item, self.values.get(item)))
                .collect(),
            locks: self.locks.to_map(),
            roles: self.values.roles().clone(),
            totals: Totals {
                income: self.total_income(),
                expenses: self.total_expenses(),
                balance: self.balance(),
                balanced: self.is_balanced(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> BudgetState {
        BudgetState::from_config(&BudgetConfig::default()).unwrap()
    }

    #[test]
    fn default_state_matches_reference_budget() {
        let state = state();
        assert_eq!(state.value(ItemId::Total), 300_000.0);
        assert_eq!(state.value(ItemId::NetTuition), 150_000.0);
        assert_eq!(state.value(ItemId::VariableCosts), 200_000.0);
        assert_eq!(state.value(ItemId::StaffSalaries), 120_000.0);
        assert_eq!(state.value(ItemId::OtherExpenses), 80_000.0);
        assert_eq!(state.value(ItemId::DuringSemester), 60_000.0);
        assert_eq!(state.value(ItemId::Rent), 10_000.0);
        assert!(state.is_locked(ItemId::Reserves));
        assert!(state.is_balanced());
    }

    #[test]
    fn config_cannot_set_aggregates() {
        let mut config = BudgetConfig::default();
        config.values.insert(ItemId::Rent, 1.0);
        assert_eq!(
            BudgetState::from_config(&config),
            Err(EngineError::DerivedItem(ItemId::Rent))
        );
    }

    #[test]
    fn config_must_balance() {
        let mut config = BudgetConfig::default();
        config.values.insert(ItemId::FixedCosts, 90_000.0);
        assert!(matches!(
            BudgetState::from_config(&config),
            Err(EngineError::InvariantViolated(_))
        ));
    }

    #[test]
    fn config_overrides_locks() {
        let mut config = BudgetConfig::default();
        config.locks.insert(ItemId::Reserves, false);
        config.locks.insert(ItemId::Total, true);
        let state = BudgetState::from_config(&config).unwrap();
        assert!(!state.is_locked(ItemId::Reserves));
        assert!(state.is_locked(ItemId::Total));
    }

    #[test]
    fn non_finite_edits_are_rejected() {
        let state = state();
        for value in [f64::NAN, f64::INFINITY, -1.0] {
            let result = state.apply(Edit::Value {
                item: ItemId::Food,
                value,
            });
            assert!(matches!(result, Err(EngineError::InvalidValue { .. })));
        }
    }

    #[test]
    fn quantity_requires_a_role() {
        let result = state().apply(Edit::Quantity {
            role: ItemId::Food,
            quantity: 2.0,
        });
        assert_eq!(result, Err(EngineError::NotARole(ItemId::Food)));
    }

    #[test]
    fn apply_leaves_receiver_untouched() {
        let state = state();
        let before = state.clone();
        let next = state
            .apply(Edit::Value {
                item: ItemId::Food,
                value: 15_000.0,
            })
            .unwrap();
        assert_eq!(state, before);
        assert_eq!(next.value(ItemId::Food), 15_000.0);
    }

    #[test]
    fn toggling_a_lock_keeps_values() {
        let state = state();
        let next = state.with_lock_toggled(ItemId::Total);
        assert!(next.is_locked(ItemId::Total));
        assert_eq!(next.values(), state.values());
    }

    #[test]
    fn edit_serializes_with_kind_tag() {
        let edit = Edit::Rate {
            role: ItemId::HeadCook,
            rate: 6000.0,
        };
        let json = serde_json::to_string(&edit).unwrap();
        assert_eq!(json, r#"{"kind":"rate","role":"head_cook","rate":6000.0}"#);
    }
}
