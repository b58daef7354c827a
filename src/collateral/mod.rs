//! Collateral and solvency evaluation of an account's position list at a
//! hypothetical tick.

use candid::Principal;
use ethnum::U256;
use ic_canister_log::log;

use crate::{
    errors::QueryError,
    ledger::{
        PositionBalance, StateView, ensure_complete_position_list, ensure_position_in_pool,
        load_pool,
    },
    libraries::{constants::DECIMALS, safe_cast::u256_to_big_uint, tick_math::TickMath},
    logs::DEBUG,
    pool::types::{PoolContext, PoolId, PoolState},
    token_id::TokenId,
};

pub mod params;
pub(crate) mod requirement;


use params::RiskParameters;
use requirement::{binding_token, checked_add, cross_framings, position_requirement};

pub use requirement::CollateralFraming;

impl CollateralFraming {
    /// balance * DECIMALS >= required * buffer
    pub fn is_solvent(&self, solvency_buffer: u16) -> bool {
        u256_to_big_uint(self.balance) * DECIMALS
            >= u256_to_big_uint(self.required) * solvency_buffer as u128
    }
}

/// Account risk snapshot at one tick, in both cross-collateral framings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollateralCheck {
    pub at_tick: i32,
    // everything expressed in token0; binds for negative ticks
    pub token0: CollateralFraming,
    // everything expressed in token1; binds for non-negative ticks
    pub token1: CollateralFraming,
}

impl CollateralCheck {
    pub fn binding(&self) -> &CollateralFraming {
        if binding_token(self.at_tick) == 0 {
            &self.token0
        } else {
            &self.token1
        }
    }

    pub fn is_solvent(&self, solvency_buffer: u16) -> bool {
        self.token0.is_solvent(solvency_buffer) && self.token1.is_solvent(solvency_buffer)
    }
}

/// Ledger reads of one account, loaded once and re-evaluated at any tick.
pub(crate) struct AccountCollateral {
    pub pool: PoolContext,
    pub pool_state: PoolState,
    // deposited assets plus premia owed to short legs
    pub balances: [U256; 2],
    // premia owed by long legs
    pub long_premia: [U256; 2],
    pub positions: Vec<(TokenId, PositionBalance)>,
}

impl AccountCollateral {
    /// Loads `positions`, which must be the account's full position list
    /// apart from a `pending` position being sized.
    pub fn load<S: StateView + ?Sized>(
        state: &S,
        pool_id: PoolId,
        account: Principal,
        positions: &[TokenId],
        pending: Option<TokenId>,
    ) -> Result<Self, QueryError> {
        let (pool, pool_state) = load_pool(state, pool_id)?;

        let mut balances = [U256::ZERO; 2];
        for (token, balance) in balances.iter_mut().enumerate() {
            let shares = state.share_balance(pool_id, account, token as u8);
            *balance = state.convert_to_assets(pool_id, token as u8, shares);
        }

        let mut long_premia = [U256::ZERO; 2];
        let mut loaded = Vec::with_capacity(positions.len());
        for token_id in positions {
            ensure_position_in_pool(&pool, token_id)?;
            let balance = state
                .position_balance(pool_id, account, *token_id)
                .ok_or(QueryError::PositionListMismatch)?;

            let premia = state.accumulated_premia(pool_id, account, *token_id);
            for (index, leg) in token_id.legs().iter().enumerate() {
                let target = if leg.is_long {
                    &mut long_premia
                } else {
                    &mut balances
                };
                for token in 0..2 {
                    target[token] = checked_add(target[token], U256::from(premia[index][token]))?;
                }
            }
            loaded.push((*token_id, balance));
        }
        ensure_complete_position_list(state, pool_id, account, positions, pending)?;

        Ok(Self {
            pool,
            pool_state,
            balances,
            long_premia,
            positions: loaded,
        })
    }

    /// Per-token requirement of every loaded position at `at_tick`, long premia included.
    pub fn required_at(
        &self,
        params: &RiskParameters,
        at_tick: i32,
    ) -> Result<[U256; 2], QueryError> {
        let sqrt_price_x96 = TickMath::get_sqrt_ratio_at_tick(at_tick)?;
        let mut required = self.long_premia;
        for (token_id, balance) in &self.positions {
            let position = position_requirement(
                &self.pool,
                token_id,
                balance.position_size,
                balance.utilizations,
                params,
                sqrt_price_x96,
            )?;
            for token in 0..2 {
                required[token] = checked_add(required[token], position[token])?;
            }
        }
        Ok(required)
    }

    pub fn evaluate(
        &self,
        params: &RiskParameters,
        at_tick: i32,
    ) -> Result<CollateralCheck, QueryError> {
        let required = self.required_at(params, at_tick)?;
        let sqrt_price_x96 = TickMath::get_sqrt_ratio_at_tick(at_tick)?;
        let [token0, token1] = cross_framings(self.balances, required, sqrt_price_x96)?;
        Ok(CollateralCheck {
            at_tick,
            token0,
            token1,
        })
    }
}

pub fn check_collateral<S: StateView + ?Sized>(
    state: &S,
    params: &RiskParameters,
    pool_id: PoolId,
    account: Principal,
    at_tick: i32,
    positions: &[TokenId],
) -> Result<CollateralCheck, QueryError> {
    let account_collateral = AccountCollateral::load(state, pool_id, account, positions, None)?;
    let check = account_collateral.evaluate(params, at_tick)?;
    log!(
        DEBUG,
        "[check_collateral]: account {} at tick {} token0 {}/{} token1 {}/{}",
        account,
        at_tick,
        check.token0.balance,
        check.token0.required,
        check.token1.balance,
        check.token1.required
    );
    Ok(check)
}

pub fn is_account_solvent<S: StateView + ?Sized>(
    state: &S,
    params: &RiskParameters,
    pool_id: PoolId,
    account: Principal,
    positions: &[TokenId],
    at_tick: i32,
) -> Result<bool, QueryError> {
    let check = check_collateral(state, params, pool_id, account, at_tick, positions)?;
    Ok(check.is_solvent(params.solvency_buffer))
}

/// Binding-framing requirement of `token_id` at the reference size, for comparing
/// encodings of one position against each other.
pub(crate) fn required_base(
    pool: &PoolContext,
    token_id: &TokenId,
    utilizations: [u16; 2],
    params: &RiskParameters,
    at_tick: i32,
) -> Result<U256, QueryError> {
    let sqrt_price_x96 = TickMath::get_sqrt_ratio_at_tick(at_tick)?;
    let required = position_requirement(
        pool,
        token_id,
        params.required_base_size,
        utilizations,
        params,
        sqrt_price_x96,
    )?;
    let framings = cross_framings([U256::ZERO; 2], required, sqrt_price_x96)?;
    Ok(framings[binding_token(at_tick)].required)
}

pub fn get_required_base<S: StateView + ?Sized>(
    state: &S,
    params: &RiskParameters,
    pool_id: PoolId,
    token_id: &TokenId,
    at_tick: i32,
) -> Result<U256, QueryError> {
    let (pool, _) = load_pool(state, pool_id)?;
    ensure_position_in_pool(&pool, token_id)?;
    required_base(
        &pool,
        token_id,
        state.pool_utilization(pool_id),
        params,
        at_tick,
    )
}
