use engine::{
    BudgetConfig, BudgetState, Edit, EngineError, ItemId, calculators,
};

fn initial() -> BudgetState {
    BudgetState::from_config(&BudgetConfig::default()).unwrap()
}

fn set(state: &BudgetState, item: ItemId, value: f64) -> Result<BudgetState, EngineError> {
    state.apply(Edit::Value { item, value })
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn total_edit_cascades_proportionally_around_locked_reserves() {
    let state = initial();
    assert_eq!(state.value(ItemId::Total), 300_000.0);
    assert!(state.is_locked(ItemId::Reserves));

    let next = set(&state, ItemId::Total, 360_000.0).unwrap();

    assert_eq!(next.value(ItemId::Reserves), 50_000.0);
    assert_close(next.value(ItemId::NetTuition), 186_000.0);
    assert_close(next.value(ItemId::Fundraising), 124_000.0);
    assert_close(next.value(ItemId::GrossTuition), 226_000.0);
    assert_eq!(next.value(ItemId::Scholarships), 40_000.0);

    assert_close(next.value(ItemId::VariableCosts), 240_000.0);
    assert_close(next.value(ItemId::FixedCosts), 120_000.0);
    assert_close(next.total_income(), 360_000.0);
    assert_close(next.total_expenses(), 360_000.0);
    next.verify().unwrap();
}

#[test]
fn locked_aggregate_rejects_sibling_underflow() {
    let state = initial().with_lock(ItemId::VariableCosts, true);

    let state = set(&state, ItemId::StaffSalaries, 195_000.0).unwrap();
    assert_close(state.value(ItemId::OtherExpenses), 5_000.0);
    assert_eq!(state.value(ItemId::VariableCosts), 200_000.0);

    let before = state.clone();
    let err = set(&state, ItemId::StaffSalaries, 215_000.0).unwrap_err();
    match err {
        EngineError::InfeasibleRedistribution {
            item,
            aggregate,
            locked_value,
            unlocked_siblings,
            ..
        } => {
            assert_eq!(item, ItemId::StaffSalaries);
            assert_eq!(aggregate, ItemId::VariableCosts);
            assert_eq!(locked_value, 200_000.0);
            assert_eq!(unlocked_siblings, vec![ItemId::OtherExpenses]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(state, before);
}

#[test]
fn locked_net_tuition_moves_gross_tuition() {
    let state = set(&initial(), ItemId::GrossTuition, 150_000.0).unwrap();
    assert_eq!(state.value(ItemId::NetTuition), 110_000.0);
    let state = state.with_lock(ItemId::NetTuition, true);

    let next = set(&state, ItemId::Scholarships, 60_000.0).unwrap();
    assert_eq!(next.value(ItemId::GrossTuition), 170_000.0);
    assert_eq!(next.value(ItemId::NetTuition), 110_000.0);
    assert_eq!(next.value(ItemId::Total), state.value(ItemId::Total));

    let both_locked = state.with_lock(ItemId::GrossTuition, true);
    let err = set(&both_locked, ItemId::Scholarships, 60_000.0).unwrap_err();
    assert!(matches!(
        err,
        EngineError::InfeasibleRedistribution {
            aggregate: ItemId::NetTuition,
            ..
        }
    ));
}

#[test]
fn leaf_edit_syncs_parent_without_touching_siblings() {
    let state = initial().with_lock(ItemId::Reserves, false);

    let next = set(&state, ItemId::Food, 15_000.0).unwrap();

    assert_eq!(next.value(ItemId::OtherExpenses), 85_000.0);
    for sibling in [
        ItemId::Rent,
        ItemId::LegalAccountingInsurance,
        ItemId::SuppliesSubscriptions,
        ItemId::It,
        ItemId::Travel,
        ItemId::OtherOverhead,
    ] {
        assert_eq!(next.value(sibling), state.value(sibling), "{sibling:?}");
    }
    assert_eq!(next.value(ItemId::VariableCosts), 205_000.0);
    assert_eq!(next.value(ItemId::Total), 305_000.0);
    assert_close(next.total_income(), 305_000.0);
}

#[test]
fn balance_threshold() {
    let balance = calculators::balance(330_000.0, 330_050.0);
    assert!(calculators::is_balanced(
        balance,
        calculators::DEFAULT_BALANCE_THRESHOLD
    ));

    let balance = calculators::balance(330_000.0, 330_200.0);
    assert_eq!(balance, -200.0);
    assert!(!calculators::is_balanced(
        balance,
        calculators::DEFAULT_BALANCE_THRESHOLD
    ));
}

#[test]
fn propagated_state_is_always_balanced() {
    let state = set(&initial(), ItemId::Total, 330_000.0).unwrap();
    assert_close(state.balance(), 0.0);
    assert!(state.is_balanced());
    assert!(state.snapshot().totals.balanced);
}
