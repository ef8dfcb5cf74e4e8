//! Propagation engine.
//!
//! Applies one edit to a working copy of the value store and propagates it
//! through the [`GROUPS`](crate::hierarchy::GROUPS) table until every group
//! agrees with its parent again.
//!
//! Every write goes through [`Propagator::after_write`], which reacts in two
//! directions:
//!
//! - down: the written item's child groups follow it (top-down cascade);
//! - up: the item's parent is recomputed (bottom-up sync) or, when the parent
//!   is locked, the item's unlocked siblings absorb the change (rebalance).
//!
//! When the parent is `Total`, the branch that did not move follows the one
//! that did (cross-branch). The [`UpdateGuard`] stops each reaction from
//! re-entering the flow that caused it.
//!
//! Errors abort propagation midway; callers discard the working copy.

use tracing::{debug, trace};

use crate::{
    EngineError, ItemId, LockRegistry, Policies, ResultEngine, RoleDetail, ValueStore,
    guard::{Direction, UpdateGuard},
    hierarchy::{self, Group, Relation},
    redistribute::{self, Infeasible, Values},
    values::NEGATIVE_NOISE,
};

/// Changes smaller than this are considered settled and not propagated.
const SETTLED: f64 = 1e-9;

pub(crate) struct Propagator<'a> {
    values: &'a mut ValueStore,
    locks: &'a LockRegistry,
    policies: &'a Policies,
    guard: UpdateGuard,
}

impl<'a> Propagator<'a> {
    pub(crate) fn new(
        values: &'a mut ValueStore,
        locks: &'a LockRegistry,
        policies: &'a Policies,
    ) -> Self {
        Self {
            values,
            locks,
            policies,
            guard: UpdateGuard::default(),
        }
    }

    /// Direct edit of an item value.
    pub(crate) fn set_value(&mut self, item: ItemId, value: f64) -> ResultEngine<()> {
        let old = self.values.get(item);
        debug!(item = item.as_str(), old, value, "edit");
        self.values.write(item, value);
        self.after_write(item, old)?;
        debug_assert_eq!(self.guard.current(), None);
        Ok(())
    }

    /// Direct edit of a role's quantity or rate; the value follows.
    pub(crate) fn set_role(&mut self, role: ItemId, detail: RoleDetail) -> ResultEngine<()> {
        let old = self.values.get(role);
        debug!(
            item = role.as_str(),
            quantity = detail.quantity,
            rate = detail.rate,
            "role edit"
        );
        self.values.write_role(role, detail);
        self.after_write(role, old)?;
        debug_assert_eq!(self.guard.current(), None);
        Ok(())
    }

    fn after_write(&mut self, item: ItemId, old: f64) -> ResultEngine<()> {
        if (self.values.get(item) - old).abs() < SETTLED {
            return Ok(());
        }
        self.cascade_down(item)?;
        self.sync_up(item, old)
    }

    fn write_all(&mut self, planned: Values) -> ResultEngine<()> {
        for (item, value) in planned {
            let old = self.values.get(item);
            self.values.write(item, value);
            self.after_write(item, old)?;
        }
        Ok(())
    }

    fn cascade_down(&mut self, item: ItemId) -> ResultEngine<()> {
        if self.guard.blocks_downward() {
            trace!(item = item.as_str(), "cascade skipped: bottom-up sync in flight");
            return Ok(());
        }
        let previous = self.guard.enter(Direction::TopDown);
        let result = self.cascade_groups(item);
        self.guard.restore(previous);
        result
    }

    fn cascade_groups(&mut self, parent: ItemId) -> ResultEngine<()> {
        for group in hierarchy::child_groups(parent) {
            self.cascade_group(group)?;
        }
        Ok(())
    }

    /// Pushes the gap between a parent and its children into the unlocked
    /// children.
    fn cascade_group(&mut self, group: &'static Group) -> ResultEngine<()> {
        let target = self.values.get(group.parent);
        let diff = target - group.evaluate(self.values);
        if diff.abs() < SETTLED {
            return Ok(());
        }
        debug!(group = ?group.id, diff, "cascade");

        if group.relation == Relation::Difference {
            return self.cascade_difference(group, target, diff);
        }

        let eligible = self.locks.unlocked(group.children.iter().copied());
        let policy = self.policies.get(group.id).cascade;
        let current = self.values.subset(group.children);
        let planned = redistribute::plan(&policy, group.children, &current, &eligible, diff)
            .map_err(|reason| match reason {
                Infeasible::NoEligible => EngineError::NoEligibleChildren {
                    parent: group.parent,
                    attempted: target,
                },
                Infeasible::Negative { .. } => EngineError::CascadeUnderflow {
                    parent: group.parent,
                    attempted: target,
                    eligible: eligible.clone(),
                },
            })?;
        self.write_all(planned)
    }

    /// The minuend moves with the parent; the subtrahend moves against it
    /// only when the minuend is locked.
    fn cascade_difference(
        &mut self,
        group: &'static Group,
        target: f64,
        diff: f64,
    ) -> ResultEngine<()> {
        let (minuend, subtrahend) = (group.children[0], group.children[1]);
        let (item, value) = if !self.locks.is_locked(minuend) {
            (minuend, self.values.get(minuend) + diff)
        } else if !self.locks.is_locked(subtrahend) {
            (subtrahend, self.values.get(subtrahend) - diff)
        } else {
            return Err(EngineError::NoEligibleChildren {
                parent: group.parent,
                attempted: target,
            });
        };
        if value < -NEGATIVE_NOISE {
            return Err(EngineError::CascadeUnderflow {
                parent: group.parent,
                attempted: target,
                eligible: vec![item],
            });
        }
        self.write_all(Values::from([(item, value)]))
    }

    fn sync_up(&mut self, item: ItemId, old: f64) -> ResultEngine<()> {
        if self.guard.blocks_upward() {
            trace!(item = item.as_str(), "sync skipped: {:?} in flight", self.guard.current());
            return Ok(());
        }
        let Some(group) = hierarchy::parent_group(item) else {
            return Ok(());
        };
        let previous = self.guard.enter(Direction::BottomUp);
        let result = if self.locks.is_locked(group.parent) {
            self.rebalance(group, item, old)
        } else {
            self.sync_parent(group)
        };
        self.guard.restore(previous);
        result
    }

    /// Recomputes an unlocked parent, lets the other branch of the parent
    /// follow, then keeps going up.
    fn sync_parent(&mut self, group: &'static Group) -> ResultEngine<()> {
        let parent = group.parent;
        let old = self.values.get(parent);
        let derived = group.evaluate(self.values);
        if derived < -NEGATIVE_NOISE {
            return Err(EngineError::NegativeValue {
                item: parent,
                value: derived,
            });
        }
        debug!(item = parent.as_str(), old, derived, "sync");
        self.values.write(parent, derived);

        for other in hierarchy::child_groups(parent).filter(|g| g.id != group.id) {
            let previous = self.guard.enter(Direction::CrossBranch);
            let result = self.cascade_group(other);
            self.guard.restore(previous);
            result?;
        }

        self.after_write(parent, old)
    }

    /// Holds a locked parent by moving the unlocked siblings of `item`.
    fn rebalance(&mut self, group: &'static Group, item: ItemId, old: f64) -> ResultEngine<()> {
        let aggregate = group.parent;
        let locked_value = self.values.get(aggregate);
        let attempted = self.values.get(item);
        let unlocked = self.locks.unlocked(group.siblings(item));
        let infeasible = || EngineError::InfeasibleRedistribution {
            item,
            attempted,
            aggregate,
            locked_value,
            unlocked_siblings: unlocked.clone(),
        };

        let planned = match group.relation {
            Relation::Sum => {
                let policy = self.policies.get(group.id).rebalance;
                let current = self.values.subset(group.children);
                redistribute::plan(
                    &policy,
                    group.children,
                    &current,
                    &unlocked,
                    old - attempted,
                )
                .map_err(|_| infeasible())?
            }
            Relation::Difference => {
                let Some(&other) = unlocked.first() else {
                    return Err(infeasible());
                };
                let value = if other == group.children[0] {
                    self.values.get(group.children[1]) + locked_value
                } else {
                    self.values.get(group.children[0]) - locked_value
                };
                if value < -NEGATIVE_NOISE {
                    return Err(infeasible());
                }
                Values::from([(other, value)])
            }
        };

        debug!(
            group = ?group.id,
            item = item.as_str(),
            locked_value,
            "rebalance"
        );
        let previous = self.guard.enter(Direction::Rebalance);
        let result = self.write_all(planned);
        self.guard.restore(previous);
        result
    }
}
