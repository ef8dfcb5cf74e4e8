//! Value store: the current amount of every line item.
//!
//! Staffing roles additionally keep a [`RoleDetail`]; their stored value is
//! always `quantity × rate`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ItemId;

/// Values this close below zero are float noise and are stored as zero.
pub(crate) const NEGATIVE_NOISE: f64 = 1e-6;

/// Head count and unit cost of a during-semester role.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoleDetail {
    pub quantity: f64,
    pub rate: f64,
}

impl RoleDetail {
    #[must_use]
    pub const fn new(quantity: f64, rate: f64) -> Self {
        Self { quantity, rate }
    }

    #[must_use]
    pub fn total(self) -> f64 {
        self.quantity * self.rate
    }

    /// Solves the detail for a new total.
    ///
    /// The rate is held and the quantity recomputed. With a zero rate the
    /// quantity is held instead; with both at zero the role becomes one unit
    /// at `total`.
    #[must_use]
    pub fn back_solve(self, total: f64) -> Self {
        if self.rate > 0.0 {
            Self::new(total / self.rate, self.rate)
        } else if self.quantity > 0.0 {
            Self::new(self.quantity, total / self.quantity)
        } else {
            Self::new(1.0, total)
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValueStore {
    values: BTreeMap<ItemId, f64>,
    roles: BTreeMap<ItemId, RoleDetail>,
}

impl ValueStore {
    /// Current value of `item`, zero when never written.
    #[must_use]
    pub fn get(&self, item: ItemId) -> f64 {
        self.values.get(&item).copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn role(&self, item: ItemId) -> Option<RoleDetail> {
        self.roles.get(&item).copied()
    }

    #[must_use]
    pub fn sum_of(&self, items: &[ItemId]) -> f64 {
        items.iter().map(|item| self.get(*item)).sum()
    }

    /// Values of `items`, for the redistribution primitives.
    #[must_use]
    pub fn subset(&self, items: &[ItemId]) -> BTreeMap<ItemId, f64> {
        items.iter().map(|item| (*item, self.get(*item))).collect()
    }

    #[must_use]
    pub fn as_map(&self) -> &BTreeMap<ItemId, f64> {
        &self.values
    }

    #[must_use]
    pub fn roles(&self) -> &BTreeMap<ItemId, RoleDetail> {
        &self.roles
    }

    /// Writes a value. Roles are back-solved so their detail stays
    /// consistent.
    pub(crate) fn write(&mut self, item: ItemId, value: f64) {
        let value = if value < 0.0 && value > -NEGATIVE_NOISE {
            0.0
        } else {
            value
        };
        if let Some(detail) = self.roles.get_mut(&item) {
            *detail = detail.back_solve(value);
        }
        self.values.insert(item, value);
    }

    /// Replaces a role detail and derives its value forward.
    pub(crate) fn write_role(&mut self, item: ItemId, detail: RoleDetail) {
        self.roles.insert(item, detail);
        self.values.insert(item, detail.total());
    }
}
