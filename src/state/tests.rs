use candid::Principal;
use ethnum::U256;
use ic_stable_structures::Storable;

use super::*;

#[test]
fn utilization_is_floored_and_capped() {
    let vault = |total_assets: u128, assets_in_amm: u128| VaultState {
        total_assets,
        total_shares: total_assets,
        assets_in_amm,
    };
    assert_eq!(vault(0, 0).utilization(), 0);
    assert_eq!(vault(3, 1).utilization(), 3_333);
    assert_eq!(vault(1_000, 1_000).utilization(), 10_000);
    // more deployed than deposited never reads above 100%
    assert_eq!(vault(1_000, 5_000).utilization(), 10_000);
}

#[test]
fn shares_convert_at_the_vault_rate() {
    let vault = VaultState {
        total_assets: 3_000,
        total_shares: 2_000,
        assets_in_amm: 0,
    };
    assert_eq!(vault.convert_to_assets(7), U256::from(10u8));
    // an empty vault redeems one to one
    assert_eq!(VaultState::default().convert_to_assets(7), U256::from(7u8));
}

#[test]
fn positions_are_listed_per_owner_and_pool() {
    let owner = Principal::from_slice(&[1]);
    let pool_id = PoolId::new(1, 0, 10);
    let other_pool = PoolId::new(2, 0, 10);
    let token_id = |strike: i32| {
        TokenId::encode(
            pool_id,
            &[crate::token_id::LegParams {
                option_ratio: 1,
                strike,
                width: 2,
                ..Default::default()
            }],
        )
        .unwrap()
    };

    let mut state = State::default();
    state.set_position(pool_id, owner, token_id(0), PositionRecord::default());
    state.set_position(pool_id, owner, token_id(10), PositionRecord::default());
    state.set_position(other_pool, owner, token_id(20), PositionRecord::default());
    state.set_position(pool_id, Principal::anonymous(), token_id(30), PositionRecord::default());
    assert_eq!(
        state.get_positions_by_owner(pool_id, owner),
        vec![token_id(0), token_id(10)]
    );

    state.remove_position(pool_id, owner, token_id(0));
    assert_eq!(state.get_positions_by_owner(pool_id, owner), vec![token_id(10)]);
}

#[test]
fn risk_parameters_survive_in_stable_memory() {
    let risk_parameters = RiskParameters {
        solvency_buffer: 12_500,
        required_base_size: 7,
        ..Default::default()
    };
    assert_eq!(
        RiskParameters::from_bytes(risk_parameters.to_bytes()),
        risk_parameters
    );

    persist_risk_parameters(risk_parameters);
    assert_eq!(stored_risk_parameters(), Some(risk_parameters));
}
