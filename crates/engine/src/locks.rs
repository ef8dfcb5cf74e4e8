//! Lock registry.
//!
//! A locked item is frozen against side effects of propagation. Toggling a
//! lock never changes a value.

use std::collections::BTreeMap;

use crate::ItemId;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LockRegistry {
    locks: BTreeMap<ItemId, bool>,
}

impl LockRegistry {
    #[must_use]
    pub fn is_locked(&self, item: ItemId) -> bool {
        self.locks.get(&item).copied().unwrap_or(false)
    }

    /// Flips the lock of `item` and returns the new state.
    pub fn toggle(&mut self, item: ItemId) -> bool {
        let locked = !self.is_locked(item);
        self.locks.insert(item, locked);
        locked
    }

    pub fn set(&mut self, item: ItemId, locked: bool) {
        self.locks.insert(item, locked);
    }

    /// `items` without the locked ones, order preserved.
    #[must_use]
    pub fn unlocked(&self, items: impl IntoIterator<Item = ItemId>) -> Vec<ItemId> {
        items
            .into_iter()
            .filter(|item| !self.is_locked(*item))
            .collect()
    }

    /// Currently locked items, in [`ItemId`] order.
    #[must_use]
    pub fn locked_items(&self) -> Vec<ItemId> {
        self.locks
            .iter()
            .filter_map(|(item, locked)| locked.then_some(*item))
            .collect()
    }

    /// Lock flag of every item.
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<ItemId, bool> {
        ItemId::ALL
            .into_iter()
            .map(|item| (item, self.is_locked(item)))
            .collect()
    }
}
