use candid::{Nat, Principal};
use ic_canister_log::log;
use ic_cdk::{init, post_upgrade, query, update};

use panoptic_query::{
    candid_types::{
        CandidQueryError, InitArgs, i256_to_int, nat_to_u128,
        query::{
            AccountPositionsArgs, CandidChunkData, CandidChunkScan, CandidCollateralCheck,
            CandidLeg, EncodeTokenIdArgs, EquivalentPosition, LiquidationPrices,
            MaxPositionSizeArgs, MaxPositionSizeBounds, PortfolioValue, PortfolioValues,
            ScanChunksArgs, TickNets, chunk_data_to_candid,
        },
        snapshot::{LoadAmmSnapshotArgs, LoadCollateralSnapshotArgs},
        token_ids_from_nats, u256_to_nat,
    },
    chunks::{get_chunk_data as chunk_data, scan_chunks as scan},
    collateral::{
        check_collateral as collateral_check, get_required_base as required_base,
        is_account_solvent as account_solvent, params::RiskParameters,
    },
    errors::QueryError,
    ledger::PoolRegistry,
    liquidation::{
        get_liquidation_prices as liquidation_prices,
        get_max_position_size_bounds as max_position_size_bounds,
    },
    logs::{INFO, collect_logs},
    optimizer::optimize_risk_partners as optimize,
    pool::types::PoolId,
    portfolio::{
        get_portfolio_value as portfolio_value,
        get_portfolio_value_at_ticks as portfolio_value_at_ticks, get_tick_nets as tick_nets,
    },
    state::{
        AmmSnapshot, CollateralSnapshot, mutate_state, persist_risk_parameters, read_state,
        stored_risk_parameters,
    },
    token_id::{LegParams, TokenId},
};

fn validate_caller_is_controller() -> Principal {
    let caller = ic_cdk::caller();
    if !ic_cdk::api::is_controller(&caller) {
        ic_cdk::trap("only a controller can load snapshots");
    }
    caller
}

/// Resolves the options pool address a token id's legs are decoded against.
fn pool_address(token_id: &TokenId) -> Result<Principal, CandidQueryError> {
    read_state(|s| {
        s.resolve_pool(token_id.pool_id())
            .map(|pool| pool.address)
            .ok_or(QueryError::PoolNotFound(token_id.pool_id()).into())
    })
}

fn install_risk_parameters(risk_parameters: RiskParameters) {
    if let Err(error) = risk_parameters.validate() {
        ic_cdk::trap(&format!("invalid risk parameters: {:?}", error));
    }
    persist_risk_parameters(risk_parameters);
    mutate_state(|s| s.set_risk_parameters(risk_parameters));
}

#[init]
fn init(args: Option<InitArgs>) {
    let risk_parameters = args
        .and_then(|args| args.risk_parameters)
        .unwrap_or_default();
    install_risk_parameters(risk_parameters);
    log!(INFO, "[init]: risk parameters {:?}", risk_parameters);
}

// Snapshots start empty after an upgrade; the stored parameters apply unless overridden.
#[post_upgrade]
fn post_upgrade(args: Option<InitArgs>) {
    let risk_parameters = args
        .and_then(|args| args.risk_parameters)
        .or_else(stored_risk_parameters)
        .unwrap_or_default();
    install_risk_parameters(risk_parameters);
    log!(INFO, "[post_upgrade]: risk parameters {:?}", risk_parameters);
}

#[update]
fn load_amm_snapshot(args: LoadAmmSnapshotArgs) -> Result<(), CandidQueryError> {
    let caller = validate_caller_is_controller();
    let snapshot = AmmSnapshot::try_from(args)?;
    log!(
        INFO,
        "[load_amm_snapshot]: {} loaded version {} with {} pools and {} chunks",
        caller,
        snapshot.version,
        snapshot.pools.len(),
        snapshot.chunks.len()
    );
    mutate_state(|s| s.replace_amm_snapshot(snapshot));
    Ok(())
}

#[update]
fn load_collateral_snapshot(args: LoadCollateralSnapshotArgs) -> Result<(), CandidQueryError> {
    let caller = validate_caller_is_controller();
    let snapshot = CollateralSnapshot::try_from(args)?;
    log!(
        INFO,
        "[load_collateral_snapshot]: {} loaded version {} with {} positions",
        caller,
        snapshot.version,
        snapshot.positions.len()
    );
    mutate_state(|s| s.replace_collateral_snapshot(snapshot));
    Ok(())
}

#[query]
fn encode_token_id(args: EncodeTokenIdArgs) -> Result<Nat, CandidQueryError> {
    let legs: Vec<LegParams> = args.legs.into_iter().map(LegParams::from).collect();
    let token_id = TokenId::encode(PoolId(args.pool_id), &legs).map_err(QueryError::from)?;
    Ok(token_id.into())
}

#[query]
fn decode_token_id(token_id: Nat) -> Result<Vec<CandidLeg>, CandidQueryError> {
    let token_id = TokenId::try_from(token_id)?;
    let address = pool_address(&token_id)?;
    Ok(token_id
        .decode(address)
        .into_iter()
        .map(CandidLeg::from)
        .collect())
}

#[query]
fn validate_token_id(token_id: Nat) -> Result<(), CandidQueryError> {
    let token_id = TokenId::try_from(token_id)?;
    token_id.validate().map_err(QueryError::from)?;
    Ok(())
}

#[query]
fn count_legs(token_id: Nat) -> Result<u8, CandidQueryError> {
    let token_id = TokenId::try_from(token_id)?;
    Ok(token_id.count_legs() as u8)
}

#[query]
fn equivalent_position(
    token_id: Nat,
    position_size: Nat,
) -> Result<EquivalentPosition, CandidQueryError> {
    let token_id = TokenId::try_from(token_id)?;
    let (token_id, position_size) = token_id
        .equivalent_position(nat_to_u128(position_size)?)
        .map_err(QueryError::from)?;
    Ok(EquivalentPosition {
        token_id: token_id.into(),
        position_size: position_size.into(),
    })
}

#[query]
fn scaled_position(token_id: Nat, factor: u32, up: bool) -> Result<Nat, CandidQueryError> {
    let token_id = TokenId::try_from(token_id)?;
    let scaled = token_id
        .scaled_position(factor, up)
        .map_err(QueryError::from)?;
    Ok(scaled.into())
}

#[query]
fn scan_chunks(args: ScanChunksArgs) -> Result<CandidChunkScan, CandidQueryError> {
    let chunk_scan = read_state(|s| {
        scan(
            s,
            PoolId(args.pool_id),
            args.tick_lower,
            args.tick_upper,
            args.width,
        )
    })?;
    Ok(chunk_scan.into())
}

#[query]
fn get_chunk_data(
    pool_id: u64,
    positions: Vec<Nat>,
) -> Result<Vec<Vec<CandidChunkData>>, CandidQueryError> {
    let positions = token_ids_from_nats(positions)?;
    let data = read_state(|s| chunk_data(s, PoolId(pool_id), &positions))?;
    Ok(data
        .into_iter()
        .zip(positions.iter())
        .map(|(data, token_id)| chunk_data_to_candid(data, token_id.count_legs()))
        .collect())
}

#[query]
fn get_required_base(pool_id: u64, token_id: Nat, at_tick: i32) -> Result<Nat, CandidQueryError> {
    let token_id = TokenId::try_from(token_id)?;
    let required = read_state(|s| {
        required_base(s, s.risk_parameters(), PoolId(pool_id), &token_id, at_tick)
    })?;
    Ok(u256_to_nat(required))
}

#[query]
fn check_collateral(
    args: AccountPositionsArgs,
    at_tick: i32,
) -> Result<CandidCollateralCheck, CandidQueryError> {
    let positions = token_ids_from_nats(args.positions)?;
    let check = read_state(|s| {
        collateral_check(
            s,
            s.risk_parameters(),
            PoolId(args.pool_id),
            args.account,
            at_tick,
            &positions,
        )
    })?;
    Ok(check.into())
}

#[query]
fn is_account_solvent(args: AccountPositionsArgs, at_tick: i32) -> Result<bool, CandidQueryError> {
    let positions = token_ids_from_nats(args.positions)?;
    let solvent = read_state(|s| {
        account_solvent(
            s,
            s.risk_parameters(),
            PoolId(args.pool_id),
            args.account,
            &positions,
            at_tick,
        )
    })?;
    Ok(solvent)
}

#[query]
fn get_liquidation_prices(
    args: AccountPositionsArgs,
) -> Result<LiquidationPrices, CandidQueryError> {
    let positions = token_ids_from_nats(args.positions)?;
    let (tick_down, tick_up) = read_state(|s| {
        liquidation_prices(
            s,
            s.risk_parameters(),
            PoolId(args.pool_id),
            args.account,
            &positions,
        )
    })?;
    Ok(LiquidationPrices { tick_down, tick_up })
}

#[query]
fn get_max_position_size_bounds(
    args: MaxPositionSizeArgs,
) -> Result<MaxPositionSizeBounds, CandidQueryError> {
    let positions = token_ids_from_nats(args.positions)?;
    let candidate = TokenId::try_from(args.candidate)?;
    let (at_min_utilization, at_max_utilization) = read_state(|s| {
        max_position_size_bounds(
            s,
            s.risk_parameters(),
            PoolId(args.pool_id),
            &positions,
            args.account,
            candidate,
        )
    })?;
    Ok(MaxPositionSizeBounds {
        max_size_at_min_utilization: at_min_utilization.into(),
        max_size_at_max_utilization: at_max_utilization.into(),
    })
}

#[query]
fn optimize_risk_partners(
    pool_id: u64,
    at_tick: i32,
    token_id: Nat,
) -> Result<Nat, CandidQueryError> {
    let token_id = TokenId::try_from(token_id)?;
    let optimized =
        read_state(|s| optimize(s, s.risk_parameters(), PoolId(pool_id), at_tick, token_id))?;
    Ok(optimized.into())
}

#[query]
fn get_portfolio_value(
    args: AccountPositionsArgs,
    at_tick: i32,
) -> Result<PortfolioValue, CandidQueryError> {
    let positions = token_ids_from_nats(args.positions)?;
    let [value0, value1] = read_state(|s| {
        portfolio_value(s, PoolId(args.pool_id), args.account, at_tick, &positions)
    })?;
    Ok(PortfolioValue {
        value0: i256_to_int(value0),
        value1: i256_to_int(value1),
    })
}

#[query]
fn get_portfolio_value_at_ticks(
    args: AccountPositionsArgs,
    at_ticks: Vec<i32>,
) -> Result<PortfolioValues, CandidQueryError> {
    let positions = token_ids_from_nats(args.positions)?;
    let (values0, values1) = read_state(|s| {
        portfolio_value_at_ticks(s, PoolId(args.pool_id), args.account, &at_ticks, &positions)
    })?;
    Ok(PortfolioValues {
        value0: values0.into_iter().map(i256_to_int).collect(),
        value1: values1.into_iter().map(i256_to_int).collect(),
    })
}

#[query]
fn get_tick_nets(
    pool_id: u64,
    start_tick: i32,
    n_ticks: u32,
) -> Result<TickNets, CandidQueryError> {
    let (tick_data, liquidity_nets) =
        read_state(|s| tick_nets(s, PoolId(pool_id), start_tick, n_ticks))?;
    Ok(TickNets {
        tick_data,
        liquidity_nets: liquidity_nets.into_iter().map(Nat::from).collect(),
    })
}

#[query]
fn get_logs() -> Vec<String> {
    collect_logs()
}

fn main() {}
