use super::fixtures::*;
use crate::{
    collateral::is_account_solvent,
    libraries::constants::{MAX_TICK, MIN_TICK},
    liquidation::get_liquidation_prices,
    token_id::TokenId,
};

// Short straddle at the current price, collateralised with half the notional.
fn over_leveraged_straddle() -> (Fixture, TokenId) {
    let mut fixture = Fixture::new(0);
    let legs = with_self_partners(&[short_leg(0, 0, 0, 10), short_leg(0, 1, 0, 10)]);
    let token_id = fixture.token_id(&legs);
    fixture.mint(account(), token_id, ONE_ETHER);
    fixture.deposit(account(), 0, ONE_ETHER / 2);
    fixture.deposit(account(), 1, ONE_ETHER / 2);
    (fixture, token_id)
}

#[test]
fn solvency_flips_exactly_at_the_reported_ticks() {
    let (fixture, token_id) = over_leveraged_straddle();
    let positions = [token_id];
    let solvent = |tick: i32| {
        is_account_solvent(
            &fixture.state,
            &fixture.params,
            fixture.pool_id(),
            account(),
            &positions,
            tick,
        )
        .unwrap()
    };

    let (tick_down, tick_up) = get_liquidation_prices(
        &fixture.state,
        &fixture.params,
        fixture.pool_id(),
        account(),
        &positions,
    )
    .unwrap();

    assert!(MIN_TICK < tick_down && tick_down < 0);
    assert!(0 < tick_up && tick_up < MAX_TICK);

    assert!(solvent(tick_down + 1));
    assert!(!solvent(tick_down));
    assert!(!solvent(tick_down - 1));
    assert!(solvent(tick_up - 1));
    assert!(!solvent(tick_up));
    assert!(!solvent(tick_up + 1));
}

#[test]
fn insolvent_account_reports_current_tick_on_both_sides() {
    let mut fixture = Fixture::new(120);
    let legs = with_self_partners(&[short_leg(0, 0, 0, 10), short_leg(0, 1, 0, 10)]);
    let token_id = fixture.token_id(&legs);
    fixture.mint(account(), token_id, ONE_ETHER);
    fixture.deposit(account(), 0, ONE_ETHER / 100);

    let prices = get_liquidation_prices(
        &fixture.state,
        &fixture.params,
        fixture.pool_id(),
        account(),
        &[token_id],
    )
    .unwrap();
    assert_eq!(prices, (120, 120));
}

#[test]
fn account_without_positions_never_liquidates() {
    let mut fixture = Fixture::new(0);
    fixture.deposit(account(), 0, ONE_ETHER);

    let prices = get_liquidation_prices(
        &fixture.state,
        &fixture.params,
        fixture.pool_id(),
        account(),
        &[],
    )
    .unwrap();
    assert_eq!(prices, (MIN_TICK, MAX_TICK));
}
