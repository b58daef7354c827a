use super::{get_liquidation_prices, get_max_position_size_bounds};
use crate::{
    collateral::is_account_solvent,
    errors::QueryError,
    libraries::constants::MAX_POSITION_SIZE,
    pool::types::PoolId,
    tests::fixtures::*,
    token_id::TokenId,
};

fn straddle_at(fixture: &Fixture, strike: i32) -> TokenId {
    fixture.token_id(&with_self_partners(&[
        short_leg(0, 0, strike, 10),
        short_leg(0, 1, strike, 10),
    ]))
}

fn liquidation_prices(fixture: &Fixture, positions: &[TokenId]) -> (i32, i32) {
    get_liquidation_prices(
        &fixture.state,
        &fixture.params,
        fixture.pool_id(),
        account(),
        positions,
    )
    .unwrap()
}

#[test]
fn thresholds_surround_the_current_tick() {
    let mut fixture = Fixture::new(500);
    let straddle = straddle_at(&fixture, 500);
    fixture.mint(account(), straddle, ONE_ETHER);
    fixture.deposit(account(), 0, ONE_ETHER / 2);
    fixture.deposit(account(), 1, ONE_ETHER / 2);

    let (tick_down, tick_up) = liquidation_prices(&fixture, &[straddle]);
    assert!(tick_down < 500 && 500 < tick_up);

    // solvent everywhere strictly between the thresholds
    let step = ((tick_up - tick_down) / 16).max(1);
    let mut tick = tick_down + 1;
    while tick < tick_up {
        assert!(
            is_account_solvent(
                &fixture.state,
                &fixture.params,
                fixture.pool_id(),
                account(),
                &[straddle],
                tick,
            )
            .unwrap(),
            "insolvent at {}",
            tick
        );
        tick += step;
    }
}

#[test]
fn more_collateral_moves_both_thresholds_out() {
    let mut fixture = Fixture::new(0);
    let straddle = straddle_at(&fixture, 0);
    fixture.mint(account(), straddle, ONE_ETHER);
    fixture.deposit(account(), 0, ONE_ETHER / 2);
    fixture.deposit(account(), 1, ONE_ETHER / 2);
    let (down, up) = liquidation_prices(&fixture, &[straddle]);

    fixture.deposit(account(), 0, ONE_ETHER / 4);
    fixture.deposit(account(), 1, ONE_ETHER / 4);
    let (wider_down, wider_up) = liquidation_prices(&fixture, &[straddle]);

    assert!(wider_down < down);
    assert!(wider_up > up);
}

#[test]
fn liquidation_errors_propagate() {
    let mut fixture = Fixture::new(0);
    let straddle = straddle_at(&fixture, 0);
    fixture.mint(account(), straddle, ONE_ETHER);

    let result = get_liquidation_prices(
        &fixture.state,
        &fixture.params,
        fixture.pool_id(),
        other_account(),
        &[straddle],
    );
    assert_eq!(result, Err(QueryError::PositionListMismatch));

    let unknown = PoolId::new(0xBEEF, 0, TICK_SPACING);
    let result =
        get_liquidation_prices(&fixture.state, &fixture.params, unknown, account(), &[]);
    assert_eq!(result, Err(QueryError::PoolNotFound(unknown)));
}

#[test]
fn liquidation_needs_the_full_position_list() {
    let mut fixture = Fixture::new(0);
    let straddle = straddle_at(&fixture, 0);
    let hedge = fixture.token_id(&[long_leg(0, 0, 2_000, 10)]);
    fixture.mint(account(), straddle, ONE_ETHER);
    fixture.mint(account(), hedge, ONE_ETHER);
    fixture.deposit(account(), 0, ONE_ETHER);
    fixture.deposit(account(), 1, ONE_ETHER);

    for positions in [vec![straddle], vec![straddle, straddle, hedge]] {
        let result = get_liquidation_prices(
            &fixture.state,
            &fixture.params,
            fixture.pool_id(),
            account(),
            &positions,
        );
        assert_eq!(result, Err(QueryError::PositionListMismatch));
    }
    assert_eq!(
        liquidation_prices(&fixture, &[hedge, straddle]),
        liquidation_prices(&fixture, &[straddle, hedge])
    );
}

#[test]
fn long_only_candidate_scales_with_free_collateral() {
    let mut fixture = Fixture::new(0);
    let candidate = fixture.token_id(&[long_leg(0, 0, 1_000, 10)]);
    let bounds = |fixture: &Fixture| {
        get_max_position_size_bounds(
            &fixture.state,
            &fixture.params,
            fixture.pool_id(),
            &[candidate],
            account(),
            candidate,
        )
        .unwrap()
    };

    fixture.deposit(account(), 1, ONE_ETHER);
    let (single_min, single_max) = bounds(&fixture);
    fixture.deposit(account(), 1, ONE_ETHER);
    let (double_min, double_max) = bounds(&fixture);

    assert!(single_min > single_max);
    assert!(double_min > single_min);
    assert!(double_max > single_max);
    // linear in the free collateral, up to rounding
    assert!(double_min.abs_diff(2 * single_min) <= 4);
    assert!(double_max.abs_diff(2 * single_max) <= 4);
}

#[test]
fn sizing_is_clamped_to_the_position_maximum() {
    let mut fixture = Fixture::new(0);
    let candidate = fixture.token_id(&[long_leg(0, 0, 1_000, 10)]);
    fixture.deposit(account(), 1, 100 * VAULT_ASSETS);

    let (at_min_utilization, _) = get_max_position_size_bounds(
        &fixture.state,
        &fixture.params,
        fixture.pool_id(),
        &[candidate],
        account(),
        candidate,
    )
    .unwrap();
    assert_eq!(at_min_utilization, MAX_POSITION_SIZE);
}

#[test]
fn candidate_from_another_pool_is_rejected() {
    let mut fixture = Fixture::new(0);
    fixture.deposit(account(), 1, ONE_ETHER);
    let foreign = TokenId::encode(
        PoolId::new(0xBEEF, 0, TICK_SPACING),
        &[short_leg(0, 0, 0, 2)],
    )
    .unwrap();

    let result = get_max_position_size_bounds(
        &fixture.state,
        &fixture.params,
        fixture.pool_id(),
        &[foreign],
        account(),
        foreign,
    );
    assert!(matches!(result, Err(QueryError::PoolMismatch { .. })));
}
