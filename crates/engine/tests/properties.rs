// Property-based tests for the propagation engine.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use proptest::prelude::*;

use engine::{
    BudgetConfig, BudgetState, Edit, ItemId, SplitPolicy,
    redistribute::{self, Values},
};

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
enum Step {
    Edit(Edit),
    ToggleLock(ItemId),
}

fn arb_item() -> impl Strategy<Value = ItemId> {
    (0..ItemId::ALL.len()).prop_map(|i| ItemId::ALL[i])
}

fn arb_role() -> impl Strategy<Value = ItemId> {
    (0..ItemId::ROLES.len()).prop_map(|i| ItemId::ROLES[i])
}

fn arb_edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        4 => (arb_item(), 0.0..400_000.0f64).prop_map(|(item, value)| Edit::Value { item, value }),
        1 => (arb_role(), 0.0..10.0f64).prop_map(|(role, quantity)| Edit::Quantity { role, quantity }),
        1 => (arb_role(), 0.0..20_000.0f64).prop_map(|(role, rate)| Edit::Rate { role, rate }),
    ]
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => arb_edit().prop_map(Step::Edit),
        1 => arb_item().prop_map(Step::ToggleLock),
    ]
}

fn arb_steps() -> impl Strategy<Value = Vec<Step>> {
    prop::collection::vec(arb_step(), 1..12)
}

fn initial() -> BudgetState {
    BudgetState::from_config(&BudgetConfig::default()).unwrap()
}

/// Runs `steps`, checking every transition on the way.
fn run(steps: &[Step]) -> Result<BudgetState, TestCaseError> {
    let mut state = initial();
    for step in steps {
        state = match step {
            Step::ToggleLock(item) => state.with_lock_toggled(*item),
            Step::Edit(edit) => match state.apply(*edit) {
                Ok(next) => {
                    check_transition(&state, &next, edit.item())?;
                    next
                }
                Err(_) => state,
            },
        };
    }
    Ok(state)
}

fn check_transition(
    before: &BudgetState,
    after: &BudgetState,
    edited: ItemId,
) -> Result<(), TestCaseError> {
    prop_assert!(after.verify().is_ok());
    for item in ItemId::ALL {
        prop_assert!(after.value(item) >= -1e-6, "{item:?} is {}", after.value(item));
        if item != edited && before.is_locked(item) {
            prop_assert_eq!(after.value(item), before.value(item), "{:?} is locked", item);
        }
    }
    prop_assert!((after.total_income() - after.value(ItemId::Total)).abs() < 0.01);
    prop_assert!((after.total_expenses() - after.value(ItemId::Total)).abs() < 0.01);
    prop_assert_eq!(after.locks(), before.locks());
    Ok(())
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn accepted_edits_preserve_invariants(steps in arb_steps()) {
        let state = run(&steps)?;
        prop_assert!(state.verify().is_ok());
    }

    #[test]
    fn rejected_edits_leave_state_untouched(steps in arb_steps(), edit in arb_edit()) {
        let state = run(&steps)?;
        let before = state.clone();
        if state.apply(edit).is_err() {
            prop_assert_eq!(&state, &before);
        }
    }

    #[test]
    fn lock_toggles_commute(items in prop::collection::vec(arb_item(), 0..8)) {
        let forward = items
            .iter()
            .fold(initial(), |state, item| state.with_lock_toggled(*item));
        let backward = items
            .iter()
            .rev()
            .fold(initial(), |state, item| state.with_lock_toggled(*item));
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn planned_redistribution_moves_exactly_delta(
        values in prop::collection::vec(0.0..100_000.0f64, 1..8),
        delta in -50_000.0..50_000.0f64,
        even in any::<bool>(),
    ) {
        let eligible: Vec<ItemId> = ItemId::ALL[..values.len()].to_vec();
        let current: Values = eligible.iter().copied().zip(values).collect();
        let policy = if even { SplitPolicy::Even } else { SplitPolicy::Proportional };

        if let Ok(planned) = redistribute::plan(&policy, &eligible, &current, &eligible, delta) {
            let moved: f64 = planned.iter().map(|(k, v)| v - current[k]).sum();
            prop_assert!((moved - delta).abs() < 1e-4, "moved {moved}, expected {delta}");
            prop_assert!(planned.values().all(|v| *v >= 0.0));
        }
    }
}
