//! Redistribution primitives.
//!
//! Pure functions over a map of sibling values. They never touch the value
//! store: callers merge the returned subset back themselves.
//!
//! [`redistribute_evenly`] and [`redistribute_proportionally`] clamp at zero
//! and are meant for previews. The engine itself goes through [`plan`],
//! which refuses any split that would need clamping, so a committed
//! redistribution always moves exactly `delta`.

use std::collections::BTreeMap;

use crate::{ItemId, SplitPolicy, values::NEGATIVE_NOISE};

pub type Values = BTreeMap<ItemId, f64>;

/// Sign convention of [`redistribute_evenly`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Adjustment {
    /// Parts are subtracted: siblings absorb the opposite of a change.
    Absorb,
    /// Parts are added: children follow a change of their parent.
    Distribute,
}

/// Why a split cannot be committed.
#[derive(Clone, Debug, PartialEq)]
pub enum Infeasible {
    /// Nobody is eligible to absorb the change.
    NoEligible,
    /// `item` would end at `value < 0`.
    Negative { item: ItemId, value: f64 },
}

fn current(values: &Values, item: ItemId) -> f64 {
    values.get(&item).copied().unwrap_or(0.0)
}

/// Splits `delta` in `count` parts that sum exactly to `delta`.
///
/// Every part is the truncated quotient; the remainder goes to the first
/// part.
#[must_use]
pub fn even_parts(delta: f64, count: usize) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    let base = (delta / count as f64).trunc();
    let mut parts = vec![base; count];
    parts[0] = delta - base * (count - 1) as f64;
    parts
}

/// Splits `delta` by `weights`; the last part takes the rounding remainder.
fn weighted_parts(delta: f64, weights: &[f64]) -> Vec<f64> {
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return even_parts(delta, weights.len());
    }
    let mut parts: Vec<f64> = weights.iter().map(|w| delta * w / total).collect();
    if let Some(last) = parts.len().checked_sub(1) {
        let assigned: f64 = parts[..last].iter().sum();
        parts[last] = delta - assigned;
    }
    parts
}

/// Per-item change of `eligible` under `policy`. `children` gives the index
/// space of [`SplitPolicy::Weighted`].
#[must_use]
pub fn shares(
    policy: &SplitPolicy,
    children: &[ItemId],
    values: &Values,
    eligible: &[ItemId],
    delta: f64,
) -> Vec<f64> {
    match policy {
        SplitPolicy::Even => even_parts(delta, eligible.len()),
        SplitPolicy::Proportional => {
            let weights: Vec<f64> = eligible.iter().map(|k| current(values, *k)).collect();
            weighted_parts(delta, &weights)
        }
        SplitPolicy::Weighted(configured) => {
            let weights: Vec<f64> = eligible
                .iter()
                .map(|k| {
                    children
                        .iter()
                        .position(|c| c == k)
                        .and_then(|index| configured.get(index).copied())
                        .unwrap_or(0.0)
                })
                .collect();
            weighted_parts(delta, &weights)
        }
    }
}

/// Splits `delta` evenly over `eligible`.
///
/// With [`Adjustment::Absorb`] each new value is `max(0, old − part)`, with
/// [`Adjustment::Distribute`] it is `max(0, old + part)`.
#[must_use]
pub fn redistribute_evenly(
    values: &Values,
    eligible: &[ItemId],
    delta: f64,
    mode: Adjustment,
) -> Values {
    eligible
        .iter()
        .zip(even_parts(delta, eligible.len()))
        .map(|(k, part)| {
            let old = current(values, *k);
            let new = match mode {
                Adjustment::Absorb => old - part,
                Adjustment::Distribute => old + part,
            };
            (*k, new.max(0.0))
        })
        .collect()
}

/// Splits `delta` over `eligible` in proportion to their share of the
/// eligible subtotal, evenly when that subtotal is zero. Results are clamped
/// at zero.
#[must_use]
pub fn redistribute_proportionally(values: &Values, eligible: &[ItemId], delta: f64) -> Values {
    let parts = shares(&SplitPolicy::Proportional, eligible, values, eligible, delta);
    eligible
        .iter()
        .zip(parts)
        .map(|(k, part)| (*k, (current(values, *k) + part).max(0.0)))
        .collect()
}

/// Returns `false` when `eligible` is empty or when subtracting
/// `adjustment` from any eligible value goes below zero.
#[must_use]
pub fn can_redistribute(values: &Values, eligible: &[ItemId], adjustment: f64) -> bool {
    !eligible.is_empty()
        && eligible
            .iter()
            .all(|k| current(values, *k) - adjustment >= -NEGATIVE_NOISE)
}

/// Computes the new values of `eligible` after adding `delta` under
/// `policy`, without clamping.
///
/// Fails when nobody is eligible or when a value would go below zero.
pub fn plan(
    policy: &SplitPolicy,
    children: &[ItemId],
    values: &Values,
    eligible: &[ItemId],
    delta: f64,
) -> Result<Values, Infeasible> {
    if eligible.is_empty() {
        return Err(Infeasible::NoEligible);
    }
    let parts = shares(policy, children, values, eligible, delta);
    let mut planned = Values::new();
    for (k, part) in eligible.iter().zip(parts) {
        let value = current(values, *k) + part;
        if value < -NEGATIVE_NOISE {
            return Err(Infeasible::Negative { item: *k, value });
        }
        planned.insert(*k, value.max(0.0));
    }
    Ok(planned)
}
