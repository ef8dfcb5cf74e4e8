//! The module contains the errors the engine can return.
//!
//! Every error is an expected, recoverable outcome of an edit. When an edit
//! is rejected the state it was applied to is left untouched.
//!
//! The errors are:
//!
//! - [`InfeasibleRedistribution`] returned when a locked aggregate forces its
//!   siblings to absorb a change they cannot absorb.
//! - [`NoEligibleChildren`] returned when a cascade has no unlocked component
//!   to move.
//! - [`CascadeUnderflow`] returned when a cascade would drive a component
//!   below zero.
//!
//!  [`InfeasibleRedistribution`]: EngineError::InfeasibleRedistribution
//!  [`NoEligibleChildren`]: EngineError::NoEligibleChildren
//!  [`CascadeUnderflow`]: EngineError::CascadeUnderflow
use thiserror::Error;

use crate::{Amount, ItemId};

fn money(value: &f64) -> Amount {
    Amount::new(*value)
}

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error(
        "cannot change {item} to {}: {aggregate} is locked at {}",
        money(.attempted),
        money(.locked_value)
    )]
    InfeasibleRedistribution {
        item: ItemId,
        attempted: f64,
        aggregate: ItemId,
        locked_value: f64,
        unlocked_siblings: Vec<ItemId>,
    },
    #[error("cannot move {parent} to {}: all of its components are locked", money(.attempted))]
    NoEligibleChildren { parent: ItemId, attempted: f64 },
    #[error(
        "cannot move {parent} to {}: unlocked components would go below zero",
        money(.attempted)
    )]
    CascadeUnderflow {
        parent: ItemId,
        attempted: f64,
        eligible: Vec<ItemId>,
    },
    #[error("{item} would become negative ({value})")]
    NegativeValue { item: ItemId, value: f64 },
    #[error("invalid value for {item}: {value}")]
    InvalidValue { item: ItemId, value: f64 },
    #[error("{0} is not a staffing role")]
    NotARole(ItemId),
    #[error("{0} is derived from its components and cannot be configured")]
    DerivedItem(ItemId),
    #[error("\"{0}\" is not a budget item")]
    UnknownItem(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),
    #[error("invariant violated: {0}")]
    InvariantViolated(String),
}

impl EngineError {
    /// Returns `true` for rejections caused by locks or by the non-negativity
    /// of the tree, as opposed to malformed input.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::InfeasibleRedistribution { .. }
                | Self::NoEligibleChildren { .. }
                | Self::CascadeUnderflow { .. }
                | Self::NegativeValue { .. }
        )
    }

    /// Human readable explanation with remediation steps, for the
    /// presentation layer.
    #[must_use]
    pub fn remediation(&self) -> String {
        match self {
            Self::InfeasibleRedistribution {
                item,
                attempted,
                aggregate,
                locked_value,
                unlocked_siblings,
            } => {
                let siblings = if unlocked_siblings.is_empty() {
                    "All other items are locked, so redistribution is not possible.".to_string()
                } else {
                    let names: Vec<&str> = unlocked_siblings.iter().map(|s| s.label()).collect();
                    format!(
                        "Unlocked items ({}) cannot absorb the change without going below zero.",
                        names.join(", ")
                    )
                };
                format!(
                    "Cannot change {item} while {aggregate} is locked.\n\n\
                     {aggregate} is currently locked at: {}\n\
                     This change would set {item} to: {}\n\n\
                     {siblings}\n\n\
                     To make this change:\n\
                     1. Unlock {aggregate}, OR\n\
                     2. Unlock another item to allow redistribution",
                    money(locked_value),
                    money(attempted),
                )
            }
            Self::NoEligibleChildren { parent, .. } => format!(
                "Cannot adjust {parent}.\n\n\
                 All of its components are locked. To change {parent}:\n\
                 1. Unlock at least one component, OR\n\
                 2. Edit the components directly"
            ),
            Self::CascadeUnderflow {
                parent, attempted, ..
            } => format!(
                "Cannot move {parent} to {}.\n\n\
                 The unlocked components do not hold enough to absorb the decrease.\n\
                 Unlock more components of {parent} or choose a smaller change.",
                money(attempted)
            ),
            other => other.to_string(),
        }
    }
}
