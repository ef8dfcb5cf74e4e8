//! Pure budget arithmetic shared by the state and its consumers.

/// Aggregates must match their children within this many currency units.
pub const TOLERANCE: f64 = 0.01;

/// Default largest `|balance|` still considered balanced.
pub const DEFAULT_BALANCE_THRESHOLD: f64 = 100.0;

/// Income minus expenses; negative means a deficit.
#[must_use]
pub fn balance(income: f64, expenses: f64) -> f64 {
    income - expenses
}

#[must_use]
pub fn is_balanced(balance: f64, threshold: f64) -> bool {
    balance.abs() < threshold
}

#[must_use]
pub fn approximately_equal(a: f64, b: f64) -> bool {
    (a - b).abs() < TOLERANCE
}
