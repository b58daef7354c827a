use candid::Principal;
use ethnum::I256;

use crate::{
    errors::QueryError,
    ledger::{StateView, ensure_complete_position_list, ensure_position_in_pool, load_pool},
    libraries::{
        constants::{MAX_TICK, MIN_TICK},
        tick_math::TickMath,
    },
    pool::types::PoolId,
    token_id::{LiquidityChunk, TokenId},
};


/// Chunks of every leg in a position list, resolved once and valued at any tick.
struct PortfolioChunks {
    // (chunk, is_long)
    chunks: Vec<(LiquidityChunk, bool)>,
}

impl PortfolioChunks {
    fn load<S: StateView + ?Sized>(
        state: &S,
        pool_id: PoolId,
        account: Principal,
        positions: &[TokenId],
    ) -> Result<Self, QueryError> {
        let (pool, _) = load_pool(state, pool_id)?;
        let mut chunks = Vec::new();
        for token_id in positions {
            ensure_position_in_pool(&pool, token_id)?;
            let balance = state
                .position_balance(pool_id, account, *token_id)
                .ok_or(QueryError::PositionListMismatch)?;
            for leg in token_id.decode(pool.address) {
                chunks.push((leg.liquidity_chunk(balance.position_size)?, leg.is_long));
            }
        }
        ensure_complete_position_list(state, pool_id, account, positions, None)?;
        Ok(Self { chunks })
    }

    fn value_at(&self, at_tick: i32) -> Result<[I256; 2], QueryError> {
        let sqrt_price_x96 = TickMath::get_sqrt_ratio_at_tick(at_tick)?;
        let mut value = [I256::ZERO; 2];
        for (chunk, is_long) in &self.chunks {
            let amounts = chunk.amounts_at_price(sqrt_price_x96)?;
            for token in 0..2 {
                let amount =
                    I256::try_from(amounts[token]).map_err(|_e| QueryError::MathOverflow)?;
                let signed = if *is_long { -amount } else { amount };
                value[token] = value[token]
                    .checked_add(signed)
                    .ok_or(QueryError::MathOverflow)?;
            }
        }
        Ok(value)
    }
}

/// Token amounts the position list's chunks hold at `at_tick`; shorts count
/// positive, longs negative.
pub fn get_portfolio_value<S: StateView + ?Sized>(
    state: &S,
    pool_id: PoolId,
    account: Principal,
    at_tick: i32,
    positions: &[TokenId],
) -> Result<[I256; 2], QueryError> {
    PortfolioChunks::load(state, pool_id, account, positions)?.value_at(at_tick)
}

/// [`get_portfolio_value`] at every tick of `at_ticks`, as (value0[], value1[]).
pub fn get_portfolio_value_at_ticks<S: StateView + ?Sized>(
    state: &S,
    pool_id: PoolId,
    account: Principal,
    at_ticks: &[i32],
    positions: &[TokenId],
) -> Result<(Vec<I256>, Vec<I256>), QueryError> {
    let portfolio = PortfolioChunks::load(state, pool_id, account, positions)?;
    let mut values0 = Vec::with_capacity(at_ticks.len());
    let mut values1 = Vec::with_capacity(at_ticks.len());
    for tick in at_ticks {
        let [value0, value1] = portfolio.value_at(*tick)?;
        values0.push(value0);
        values1.push(value1);
    }
    Ok((values0, values1))
}

/// In-range liquidity of the `2 * n_ticks + 1` spacing buckets centred on the
/// bucket containing `start_tick`, as (bucket start ticks, active liquidity).
pub fn get_tick_nets<S: StateView + ?Sized>(
    state: &S,
    pool_id: PoolId,
    start_tick: i32,
    n_ticks: u32,
) -> Result<(Vec<i32>, Vec<u128>), QueryError> {
    let (pool, pool_state) = load_pool(state, pool_id)?;
    let tick_spacing = pool.tick_spacing();
    let spacing = tick_spacing.0 as i64;

    let center = tick_spacing.floor(start_tick) as i64;
    let first = center - n_ticks as i64 * spacing;
    let last = center + n_ticks as i64 * spacing;
    if first < MIN_TICK as i64 {
        return Err(QueryError::TickOutOfBounds(first.max(i32::MIN as i64) as i32));
    }
    if last > MAX_TICK as i64 {
        return Err(QueryError::TickOutOfBounds(last.min(i32::MAX as i64) as i32));
    }
    let (first, last) = (first as i32, last as i32);

    let current_bucket = tick_spacing.floor(pool_state.tick);
    let current_liquidity =
        i128::try_from(pool_state.liquidity).map_err(|_e| QueryError::MathOverflow)?;
    let net_at = |tick: i32| state.liquidity_net_at_tick(&pool.pool_key, tick);

    let tick_data: Vec<i32> = (0..=2 * n_ticks as i64)
        .map(|step| first + (step * spacing) as i32)
        .collect();
    let mut active = vec![0i128; tick_data.len()];

    // buckets at or above the current one: add each crossing moving up
    let mut liquidity = current_liquidity;
    let mut tick = current_bucket;
    while tick <= last {
        if tick > current_bucket {
            liquidity = liquidity
                .checked_add(net_at(tick))
                .ok_or(QueryError::MathOverflow)?;
        }
        if tick >= first {
            active[((tick - first) / tick_spacing.0) as usize] = liquidity;
        }
        tick += tick_spacing.0;
    }

    // buckets below: undo the crossing at each bucket's upper edge moving down
    let mut liquidity = current_liquidity;
    let mut tick = current_bucket;
    while tick > first {
        liquidity = liquidity
            .checked_sub(net_at(tick))
            .ok_or(QueryError::MathOverflow)?;
        tick -= tick_spacing.0;
        if tick <= last {
            active[((tick - first) / tick_spacing.0) as usize] = liquidity;
        }
    }

    let liquidity_nets = active
        .into_iter()
        .map(|value| u128::try_from(value).map_err(|_e| QueryError::MathOverflow))
        .collect::<Result<Vec<_>, _>>()?;
    Ok((tick_data, liquidity_nets))
}
