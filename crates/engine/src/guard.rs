//! Update-source guard.
//!
//! Every write in the engine triggers the same reaction: cascade into the
//! written item's children, then sync its parent. The guard records which
//! propagation is in flight so that a reaction never re-enters the flow that
//! caused it: children written by a cascade do not sync their parent back,
//! and a parent written by a bottom-up sync does not cascade into the
//! children it was just computed from.

/// Kind of propagation currently running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// A parent is being recomputed from its children.
    BottomUp,
    /// A parent change is being pushed into its children.
    TopDown,
    /// Siblings absorb a change under a locked parent.
    Rebalance,
    /// One branch of `Total` follows the other.
    CrossBranch,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpdateGuard {
    current: Option<Direction>,
}

impl UpdateGuard {
    #[must_use]
    pub fn current(&self) -> Option<Direction> {
        self.current
    }

    /// Marks `direction` as in flight and returns the previous tag, to be
    /// handed back to [`UpdateGuard::restore`].
    pub fn enter(&mut self, direction: Direction) -> Option<Direction> {
        self.current.replace(direction)
    }

    pub fn restore(&mut self, previous: Option<Direction>) {
        self.current = previous;
    }

    /// Upward sync reacts only to direct edits and to bottom-up flows.
    #[must_use]
    pub fn blocks_upward(&self) -> bool {
        matches!(
            self.current,
            Some(Direction::TopDown | Direction::Rebalance | Direction::CrossBranch)
        )
    }

    /// A parent written by a bottom-up sync already agrees with its children.
    #[must_use]
    pub fn blocks_downward(&self) -> bool {
        self.current == Some(Direction::BottomUp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_guard_blocks_nothing() {
        let guard = UpdateGuard::default();
        assert_eq!(guard.current(), None);
        assert!(!guard.blocks_upward());
        assert!(!guard.blocks_downward());
    }

    #[test]
    fn nested_enter_restores_outer_tag() {
        let mut guard = UpdateGuard::default();
        let outer = guard.enter(Direction::BottomUp);
        assert!(guard.blocks_downward());

        let inner = guard.enter(Direction::Rebalance);
        assert!(guard.blocks_upward());
        assert!(!guard.blocks_downward());

        guard.restore(inner);
        assert_eq!(guard.current(), Some(Direction::BottomUp));
        guard.restore(outer);
        assert_eq!(guard.current(), None);
    }

    #[test]
    fn cascades_block_upward_sync() {
        let mut guard = UpdateGuard::default();
        for direction in [Direction::TopDown, Direction::CrossBranch] {
            guard.enter(direction);
            assert!(guard.blocks_upward());
            assert!(!guard.blocks_downward());
        }
    }
}
