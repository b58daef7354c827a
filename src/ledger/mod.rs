//! Read-only views of the external ledgers the risk engine evaluates against.
//!
//! Every query receives one `StateView`; all reads inside a query must come
//! from the same logical snapshot, which `ensure_consistent_snapshot` checks
//! through the version each ledger reports.

use std::collections::BTreeSet;

use candid::Principal;
use ethnum::U256;

use crate::{
    errors::QueryError,
    pool::types::{PoolContext, PoolId, PoolKey, PoolState},
    token_id::TokenId,
};

/// Liquidity an owner holds in one AMM chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LiquidityChunkData {
    // liquidity currently deployed in the AMM
    pub net: u128,
    // liquidity taken out of the AMM by long legs
    pub removed: u128,
}

/// Collateral ledger record of a minted position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PositionBalance {
    pub position_size: u128,
    // pool utilization per token (bps) recorded at mint
    pub utilizations: [u16; 2],
}

pub trait AmmLedger {
    fn amm_version(&self) -> u64;

    fn pool_state(&self, pool_key: &PoolKey) -> Option<PoolState>;

    fn account_liquidity(
        &self,
        pool_key: &PoolKey,
        owner: Principal,
        token_type: u8,
        tick_lower: i32,
        tick_upper: i32,
    ) -> LiquidityChunkData;

    fn liquidity_net_at_tick(&self, pool_key: &PoolKey, tick: i32) -> i128;
}

pub trait CollateralLedger {
    fn collateral_version(&self) -> u64;

    fn share_balance(&self, pool_id: PoolId, account: Principal, token: u8) -> u128;

    /// Underlying assets redeemable for `shares` of the `token` vault, rounded down.
    fn convert_to_assets(&self, pool_id: PoolId, token: u8, shares: u128) -> U256;

    /// Current utilization (bps) of both vaults.
    fn pool_utilization(&self, pool_id: PoolId) -> [u16; 2];

    fn position_balance(
        &self,
        pool_id: PoolId,
        account: Principal,
        token_id: TokenId,
    ) -> Option<PositionBalance>;

    /// Every position `account` has recorded in the pool.
    fn positions_by_owner(&self, pool_id: PoolId, account: Principal) -> Vec<TokenId>;

    /// Premia accrued per leg, as [token0, token1].
    fn accumulated_premia(
        &self,
        pool_id: PoolId,
        account: Principal,
        token_id: TokenId,
    ) -> [[u128; 2]; 4];
}

pub trait PoolRegistry {
    fn resolve_pool(&self, pool_id: PoolId) -> Option<PoolContext>;
}

/// Everything a query reads.
pub trait StateView: AmmLedger + CollateralLedger + PoolRegistry {}

impl<T: AmmLedger + CollateralLedger + PoolRegistry> StateView for T {}

pub fn ensure_consistent_snapshot<S: StateView + ?Sized>(state: &S) -> Result<(), QueryError> {
    let amm_version = state.amm_version();
    let collateral_version = state.collateral_version();
    if amm_version != collateral_version {
        return Err(QueryError::StaleOrInconsistentSnapshot {
            amm_version,
            collateral_version,
        });
    }
    Ok(())
}

/// Consistency check, pool lookup and current AMM state in one step;
/// every query entry point starts here.
pub fn load_pool<S: StateView + ?Sized>(
    state: &S,
    pool_id: PoolId,
) -> Result<(PoolContext, PoolState), QueryError> {
    ensure_consistent_snapshot(state)?;
    let pool = state
        .resolve_pool(pool_id)
        .ok_or(QueryError::PoolNotFound(pool_id))?;
    if pool.tick_spacing().0 <= 0 {
        return Err(QueryError::PoolNotFound(pool_id));
    }
    let pool_state = state
        .pool_state(&pool.pool_key)
        .ok_or(QueryError::PoolNotFound(pool_id))?;
    Ok((pool, pool_state))
}

/// Validates `token_id` and checks that it was encoded for `pool`.
pub fn ensure_position_in_pool(pool: &PoolContext, token_id: &TokenId) -> Result<(), QueryError> {
    if token_id.pool_id() != pool.pool_id {
        return Err(QueryError::PoolMismatch {
            token_id: *token_id,
            pool_id: pool.pool_id,
        });
    }
    token_id.validate()?;
    Ok(())
}

/// Checks that `positions` names every position `account` holds in the pool,
/// each exactly once.
///
/// `pending` is a position being sized on top of the list: it may already be
/// recorded, in which case it counts as listed, but it must not appear in
/// `positions` itself.
pub fn ensure_complete_position_list<S: StateView + ?Sized>(
    state: &S,
    pool_id: PoolId,
    account: Principal,
    positions: &[TokenId],
    pending: Option<TokenId>,
) -> Result<(), QueryError> {
    let mut listed = BTreeSet::new();
    for token_id in positions.iter().chain(pending.iter()) {
        if !listed.insert(*token_id) {
            return Err(QueryError::PositionListMismatch);
        }
    }

    let recorded: BTreeSet<TokenId> = state
        .positions_by_owner(pool_id, account)
        .into_iter()
        .collect();
    // a new candidate is not recorded yet
    if let Some(pending) = pending.filter(|pending| !recorded.contains(pending)) {
        listed.remove(&pending);
    }
    if listed != recorded {
        return Err(QueryError::PositionListMismatch);
    }
    Ok(())
}
