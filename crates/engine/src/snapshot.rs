//! Read-only view of a budget state.
//!
//! A [`Snapshot`] owns its data, so report generators and observers can keep
//! it around without holding on to the live state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{ItemId, RoleDetail};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub income: f64,
    pub expenses: f64,
    pub balance: f64,
    pub balanced: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub values: BTreeMap<ItemId, f64>,
    pub locks: BTreeMap<ItemId, bool>,
    pub roles: BTreeMap<ItemId, RoleDetail>,
    pub totals: Totals,
}

impl Snapshot {
    #[must_use]
    pub fn value(&self, item: ItemId) -> f64 {
        self.values.get(&item).copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn is_locked(&self, item: ItemId) -> bool {
        self.locks.get(&item).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn role(&self, item: ItemId) -> Option<RoleDetail> {
        self.roles.get(&item).copied()
    }
}
