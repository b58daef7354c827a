use candid::Principal;
use ethnum::U256;
use ic_canister_log::log;

use crate::{
    collateral::{
        AccountCollateral,
        params::RiskParameters,
        requirement::{binding_token, cross_framings, position_requirement},
    },
    errors::QueryError,
    ledger::{StateView, ensure_position_in_pool},
    libraries::{
        constants::{DECIMALS, MAX_POSITION_SIZE, MAX_TICK, MIN_TICK},
        full_math::mul_div,
        tick_math::TickMath,
    },
    logs::{DEBUG, INFO},
    pool::types::PoolId,
    token_id::TokenId,
};

#[cfg(test)]
mod tests;

/// Ticks nearest the current price at which the account stops being solvent,
/// as (tick_down, tick_up).
///
/// Returns (current, current) when already insolvent, and the domain extreme
/// for a side that never becomes insolvent.
pub fn get_liquidation_prices<S: StateView + ?Sized>(
    state: &S,
    params: &RiskParameters,
    pool_id: PoolId,
    account: Principal,
    positions: &[TokenId],
) -> Result<(i32, i32), QueryError> {
    let account_collateral = AccountCollateral::load(state, pool_id, account, positions, None)?;
    let is_solvent = |tick: i32| -> Result<bool, QueryError> {
        Ok(account_collateral
            .evaluate(params, tick)?
            .is_solvent(params.solvency_buffer))
    };

    let current_tick = account_collateral.pool_state.tick;
    if !is_solvent(current_tick)? {
        log!(
            INFO,
            "[get_liquidation_prices]: account {} insolvent at current tick {}",
            account,
            current_tick
        );
        return Ok((current_tick, current_tick));
    }

    let tick_down = if is_solvent(MIN_TICK)? {
        MIN_TICK
    } else {
        // (insolvent, solvent)
        let (mut low, mut high) = (MIN_TICK, current_tick);
        while high - low > 1 {
            let mid = low + (high - low) / 2;
            if is_solvent(mid)? {
                high = mid;
            } else {
                low = mid;
            }
        }
        low
    };

    let tick_up = if is_solvent(MAX_TICK)? {
        MAX_TICK
    } else {
        // (solvent, insolvent)
        let (mut low, mut high) = (current_tick, MAX_TICK);
        while high - low > 1 {
            let mid = low + (high - low) / 2;
            if is_solvent(mid)? {
                low = mid;
            } else {
                high = mid;
            }
        }
        high
    };

    log!(
        DEBUG,
        "[get_liquidation_prices]: account {} current {} down {} up {}",
        account,
        current_tick,
        tick_down,
        tick_up
    );
    Ok((tick_down, tick_up))
}

/// Conservative bounds on the largest size `candidate` can be minted with, as
/// (max size at the band's minimum utilization, max size at its maximum).
///
/// `positions` is the account's full list with the candidate appended last.
/// The candidate may be new or already recorded.
pub fn get_max_position_size_bounds<S: StateView + ?Sized>(
    state: &S,
    params: &RiskParameters,
    pool_id: PoolId,
    positions: &[TokenId],
    account: Principal,
    candidate: TokenId,
) -> Result<(u128, u128), QueryError> {
    let Some((last, existing)) = positions.split_last() else {
        return Err(QueryError::PositionListMismatch);
    };
    if *last != candidate {
        return Err(QueryError::PositionListMismatch);
    }

    let account_collateral =
        AccountCollateral::load(state, pool_id, account, existing, Some(candidate))?;
    ensure_position_in_pool(&account_collateral.pool, &candidate)?;

    let current_tick = account_collateral.pool_state.tick;
    let check = account_collateral.evaluate(params, current_tick)?;
    let binding = check.binding();
    let usable_balance = mul_div(
        binding.balance,
        U256::from(DECIMALS),
        U256::from(params.solvency_buffer),
    )?;
    let free_collateral = usable_balance.saturating_sub(binding.required);
    if free_collateral == U256::ZERO {
        return Ok((0, 0));
    }

    let sqrt_price_x96 = TickMath::get_sqrt_ratio_at_tick(current_tick)?;
    let max_size_at = |utilization: u16| -> Result<U256, QueryError> {
        let required = position_requirement(
            &account_collateral.pool,
            &candidate,
            params.required_base_size,
            [utilization; 2],
            params,
            sqrt_price_x96,
        )?;
        // same framing as the free collateral
        let framings = cross_framings([U256::ZERO; 2], required, sqrt_price_x96)?;
        let required = framings[binding_token(current_tick)].required;
        if required == U256::ZERO {
            return Ok(U256::from(MAX_POSITION_SIZE));
        }
        Ok(mul_div(
            free_collateral,
            U256::from(params.required_base_size),
            required,
        )?)
    };

    let tolerance = params.sizing_tolerance as u128;
    let at_min_utilization = mul_div(
        max_size_at(params.sizing_min_utilization)?,
        U256::from(DECIMALS + tolerance),
        U256::from(DECIMALS),
    )?;
    let at_max_utilization = mul_div(
        max_size_at(params.sizing_max_utilization)?,
        U256::from(DECIMALS.saturating_sub(tolerance)),
        U256::from(DECIMALS),
    )?;

    let clamp = |size: U256| {
        u128::try_from(size.min(U256::from(MAX_POSITION_SIZE))).unwrap_or(MAX_POSITION_SIZE)
    };
    let bounds = (clamp(at_min_utilization), clamp(at_max_utilization));
    log!(
        DEBUG,
        "[get_max_position_size_bounds]: account {} candidate {} bounds {:?}",
        account,
        candidate,
        bounds
    );
    Ok(bounds)
}
