//! Imperative shell around [`BudgetState`].
//!
//! The [`Planner`] keeps the latest accepted state and tells its observers
//! about every outcome. It is the only place in the engine that mutates
//! anything.

use std::fmt;

use tracing::{info, warn};

use crate::{BudgetConfig, BudgetState, Edit, EngineError, ItemId, ResultEngine, Snapshot};

/// Gets notified by a [`Planner`].
pub trait Observer {
    /// Called after an edit or lock toggle has been accepted.
    fn on_change(&mut self, snapshot: &Snapshot);

    /// Called when an edit was rejected. The state is unchanged.
    fn on_rejected(&mut self, _edit: &Edit, _error: &EngineError) {}
}

pub struct Planner {
    config: BudgetConfig,
    state: BudgetState,
    observers: Vec<Box<dyn Observer>>,
}

impl fmt::Debug for Planner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Planner")
            .field("state", &self.state)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl Planner {
    /// Return a builder for `Planner`.
    pub fn builder() -> PlannerBuilder {
        PlannerBuilder::default()
    }

    #[must_use]
    pub fn state(&self) -> &BudgetState {
        &self.state
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    pub fn subscribe(&mut self, observer: Box<dyn Observer>) {
        self.observers.push(observer);
    }

    /// Applies `edit`, keeping the new state on success.
    pub fn apply_edit(&mut self, edit: Edit) -> ResultEngine<()> {
        match self.state.apply(edit) {
            Ok(next) => {
                info!(item = edit.item().as_str(), ?edit, "edit accepted");
                self.replace(next);
                Ok(())
            }
            Err(err) => {
                warn!(item = edit.item().as_str(), %err, "edit rejected");
                for observer in &mut self.observers {
                    observer.on_rejected(&edit, &err);
                }
                Err(err)
            }
        }
    }

    /// Sets the value of `item`.
    pub fn apply(&mut self, item: ItemId, value: f64) -> ResultEngine<()> {
        self.apply_edit(Edit::Value { item, value })
    }

    pub fn set_quantity(&mut self, role: ItemId, quantity: f64) -> ResultEngine<()> {
        self.apply_edit(Edit::Quantity { role, quantity })
    }

    pub fn set_rate(&mut self, role: ItemId, rate: f64) -> ResultEngine<()> {
        self.apply_edit(Edit::Rate { role, rate })
    }

    /// Flips the lock of `item` and returns whether it is now locked.
    pub fn toggle_lock(&mut self, item: ItemId) -> bool {
        let next = self.state.with_lock_toggled(item);
        let locked = next.is_locked(item);
        info!(item = item.as_str(), locked, "lock toggled");
        self.replace(next);
        locked
    }

    /// Locks or unlocks `item`. Does nothing when it already is.
    pub fn set_lock(&mut self, item: ItemId, locked: bool) {
        if self.state.is_locked(item) != locked {
            self.toggle_lock(item);
        }
    }

    /// Rebuilds the state from the configuration the planner was built
    /// with, dropping every edit and lock change since.
    pub fn reset(&mut self) -> ResultEngine<()> {
        let state = BudgetState::from_config(&self.config)?;
        info!("budget reset");
        self.replace(state);
        Ok(())
    }

    fn replace(&mut self, state: BudgetState) {
        self.state = state;
        if self.observers.is_empty() {
            return;
        }
        let snapshot = self.state.snapshot();
        for observer in &mut self.observers {
            observer.on_change(&snapshot);
        }
    }
}

/// The builder for `Planner`
#[derive(Default)]
pub struct PlannerBuilder {
    config: BudgetConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl PlannerBuilder {
    /// Pass the initial budget
    pub fn config(mut self, config: BudgetConfig) -> PlannerBuilder {
        self.config = config;
        self
    }

    pub fn observer(mut self, observer: Box<dyn Observer>) -> PlannerBuilder {
        self.observers.push(observer);
        self
    }

    /// Construct `Planner`
    pub fn build(self) -> ResultEngine<Planner> {
        let state = BudgetState::from_config(&self.config)?;
        Ok(Planner {
            config: self.config,
            state,
            observers: self.observers,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;

    #[derive(Default)]
    struct Recorded {
        changes: Vec<Snapshot>,
        rejections: Vec<(Edit, EngineError)>,
    }

    struct Recorder(Rc<RefCell<Recorded>>);

    impl Observer for Recorder {
        fn on_change(&mut self, snapshot: &Snapshot) {
            self.0.borrow_mut().changes.push(snapshot.clone());
        }

        fn on_rejected(&mut self, edit: &Edit, error: &EngineError) {
            self.0.borrow_mut().rejections.push((*edit, error.clone()));
        }
    }

    fn planner() -> (Planner, Rc<RefCell<Recorded>>) {
        let recorded = Rc::new(RefCell::new(Recorded::default()));
        let planner = Planner::builder()
            .observer(Box::new(Recorder(recorded.clone())))
            .build()
            .unwrap();
        (planner, recorded)
    }

    #[test]
    fn accepted_edit_notifies_observers() {
        let (mut planner, recorded) = planner();
        planner.apply(ItemId::Food, 15_000.0).unwrap();

        let recorded = recorded.borrow();
        assert_eq!(recorded.changes.len(), 1);
        assert_eq!(recorded.changes[0].value(ItemId::Food), 15_000.0);
        assert!(recorded.rejections.is_empty());
    }

    #[test]
    fn rejected_edit_keeps_state() {
        let (mut planner, recorded) = planner();
        let before = planner.state().clone();

        let err = planner.apply(ItemId::Food, -5.0).unwrap_err();
        assert!(matches!(err, EngineError::InvalidValue { .. }));
        assert_eq!(planner.state(), &before);

        let recorded = recorded.borrow();
        assert!(recorded.changes.is_empty());
        assert_eq!(recorded.rejections.len(), 1);
    }

    #[test]
    fn toggle_lock_returns_new_state() {
        let (mut planner, _) = planner();
        assert!(planner.toggle_lock(ItemId::Total));
        assert!(planner.snapshot().is_locked(ItemId::Total));
        assert!(!planner.toggle_lock(ItemId::Total));
    }

    #[test]
    fn reset_restores_configured_budget() {
        let (mut planner, _) = planner();
        planner.set_quantity(ItemId::Ras, 4.0).unwrap();
        planner.toggle_lock(ItemId::Reserves);
        planner.reset().unwrap();

        assert_eq!(planner.state().value(ItemId::Ras), 10_000.0);
        assert!(planner.state().is_locked(ItemId::Reserves));
    }
}
