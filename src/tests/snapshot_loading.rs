use candid::{Int, Nat};

use super::fixtures::*;
use crate::{
    candid_types::{
        CandidPoolKey, CandidQueryError,
        snapshot::{
            CandidAccountChunk, CandidLiquidityNet, CandidPool, CandidPoolState,
            CandidPositionRecord, CandidShareBalance, CandidVault, LoadAmmSnapshotArgs,
            LoadCollateralSnapshotArgs,
        },
    },
    chunks::get_chunk_data,
    collateral::check_collateral,
    errors::QueryError,
    ledger::{AmmLedger, CollateralLedger},
    state::{AmmSnapshot, CollateralSnapshot, State},
    token_id::TokenId,
};

struct Snapshots {
    amm: LoadAmmSnapshotArgs,
    collateral: LoadCollateralSnapshotArgs,
    token_id: TokenId,
}

fn snapshot_args(version: u64) -> Snapshots {
    let fixture = Fixture::new(-230);
    let pool_key = CandidPoolKey::from(fixture.pool.pool_key.clone());
    let legs = with_self_partners(&[short_leg(0, 0, 0, 4), long_leg(0, 1, -500, 4)]);
    let token_id = fixture.token_id(&legs);
    let pool_id = fixture.pool_id().0;

    let amm = LoadAmmSnapshotArgs {
        version,
        pools: vec![CandidPoolState {
            pool_key: pool_key.clone(),
            tick: -230,
            liquidity: Nat::from(5_000_000u64),
        }],
        chunks: vec![CandidAccountChunk {
            pool_key: pool_key.clone(),
            owner: options_pool(),
            token_type: 0,
            tick_lower: -20,
            tick_upper: 20,
            net_liquidity: Nat::from(777u64),
            removed_liquidity: Nat::from(0u64),
        }],
        liquidity_nets: vec![CandidLiquidityNet {
            pool_key: pool_key.clone(),
            tick: -20,
            liquidity_net: Int::from(-42i64),
        }],
    };

    let collateral = LoadCollateralSnapshotArgs {
        version,
        pools: vec![CandidPool {
            pool_id,
            pool_key,
            address: options_pool(),
        }],
        vaults: (0..2)
            .map(|token| CandidVault {
                pool_id,
                token,
                total_assets: Nat::from(2_000u64),
                total_shares: Nat::from(1_000u64),
                assets_in_amm: Nat::from(500u64),
            })
            .collect(),
        share_balances: vec![CandidShareBalance {
            pool_id,
            account: account(),
            token: 1,
            shares: Nat::from(ONE_ETHER),
        }],
        positions: vec![CandidPositionRecord {
            pool_id,
            account: account(),
            token_id: token_id.into(),
            position_size: Nat::from(ONE_ETHER),
            utilizations: (2_500, 2_500),
            premia: vec![(Nat::from(3u64), Nat::from(4u64))],
        }],
    };

    Snapshots {
        amm,
        collateral,
        token_id,
    }
}

fn load(args: Snapshots) -> (State, TokenId) {
    let mut state = State::default();
    state.replace_amm_snapshot(AmmSnapshot::try_from(args.amm).unwrap());
    state.replace_collateral_snapshot(CollateralSnapshot::try_from(args.collateral).unwrap());
    (state, args.token_id)
}

#[test]
fn loaded_snapshots_answer_ledger_reads() {
    let (state, token_id) = load(snapshot_args(7));
    let fixture = Fixture::new(-230);
    let pool_id = fixture.pool_id();
    let pool_key = &fixture.pool.pool_key;

    assert_eq!(state.amm_version(), 7);
    assert_eq!(state.collateral_version(), 7);
    assert_eq!(state.pool_state(pool_key).unwrap().tick, -230);
    assert_eq!(state.pool_state(pool_key).unwrap().liquidity, 5_000_000);
    assert_eq!(state.liquidity_net_at_tick(pool_key, -20), -42);
    assert_eq!(state.liquidity_net_at_tick(pool_key, 20), 0);
    assert_eq!(
        state
            .account_liquidity(pool_key, options_pool(), 0, -20, 20)
            .net,
        777
    );

    assert_eq!(state.pool_utilization(pool_id), [2_500, 2_500]);
    assert_eq!(state.share_balance(pool_id, account(), 1), ONE_ETHER);
    assert_eq!(
        state.convert_to_assets(pool_id, 1, ONE_ETHER),
        ethnum::U256::from(2 * ONE_ETHER)
    );
    let balance = state
        .position_balance(pool_id, account(), token_id)
        .unwrap();
    assert_eq!(balance.position_size, ONE_ETHER);
    assert_eq!(
        state.accumulated_premia(pool_id, account(), token_id),
        [[3, 4], [0, 0], [0, 0], [0, 0]]
    );
    assert_eq!(state.get_positions_by_owner(pool_id, account()), vec![token_id]);

    let data = get_chunk_data(&state, pool_id, &[token_id]).unwrap();
    assert_eq!(data[0][0], [777, 0]);
}

#[test]
fn queries_reject_snapshots_from_different_versions() {
    let mut args = snapshot_args(7);
    args.collateral.version = 8;
    let (state, token_id) = load(args);
    let fixture = Fixture::new(-230);

    let result = check_collateral(
        &state,
        &fixture.params,
        fixture.pool_id(),
        account(),
        -230,
        &[token_id],
    );
    assert_eq!(
        result,
        Err(QueryError::StaleOrInconsistentSnapshot {
            amm_version: 7,
            collateral_version: 8
        })
    );
}

#[test]
fn malformed_snapshot_arguments_are_rejected() {
    let mut args = snapshot_args(1);
    args.collateral.vaults[0].token = 2;
    assert!(matches!(
        CollateralSnapshot::try_from(args.collateral),
        Err(CandidQueryError::InvalidArgument(_))
    ));

    let mut args = snapshot_args(1);
    args.amm.chunks[0].tick_upper = -20;
    assert!(matches!(
        AmmSnapshot::try_from(args.amm),
        Err(CandidQueryError::InvalidArgument(_))
    ));

    let mut args = snapshot_args(1);
    args.collateral.positions[0].premia = vec![(Nat::from(0u64), Nat::from(0u64)); 5];
    assert!(matches!(
        CollateralSnapshot::try_from(args.collateral),
        Err(CandidQueryError::InvalidArgument(_))
    ));

    let mut args = snapshot_args(1);
    args.collateral.pools[0].pool_key.tick_spacing = 60;
    assert!(matches!(
        CollateralSnapshot::try_from(args.collateral),
        Err(CandidQueryError::InvalidArgument(_))
    ));
}
