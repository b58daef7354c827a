use ic_canister_log::log;

use crate::{
    errors::QueryError,
    ledger::{StateView, ensure_position_in_pool, load_pool},
    libraries::constants::{MAX_TICK, MAX_WIDTH, MIN_TICK},
    logs::DEBUG,
    pool::types::PoolId,
    token_id::{LegParams, TokenId},
};


/// Chunks found by [`scan_chunks`], one entry per strike, indexed by token type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChunkScan {
    pub strikes: Vec<i32>,
    pub net_liquidity: [Vec<u128>; 2],
    pub removed_liquidity: [Vec<u128>; 2],
}

/// Per position, per leg slot: [net, removed] of the chunk that leg maps to.
pub type PositionChunkData = [[u128; 2]; 4];

/// Reads every strike on the spacing grid whose `width` range fits inside
/// [tick_lower, tick_upper] and keeps the ones holding any liquidity of the
/// options pool.
pub fn scan_chunks<S: StateView + ?Sized>(
    state: &S,
    pool_id: PoolId,
    tick_lower: i32,
    tick_upper: i32,
    width: u16,
) -> Result<ChunkScan, QueryError> {
    if width == 0 || width % 2 != 0 || width > MAX_WIDTH {
        return Err(QueryError::InvalidWidth(width));
    }
    if tick_lower < MIN_TICK {
        return Err(QueryError::TickOutOfBounds(tick_lower));
    }
    if tick_upper > MAX_TICK {
        return Err(QueryError::TickOutOfBounds(tick_upper));
    }

    let (pool, _) = load_pool(state, pool_id)?;
    let tick_spacing = pool.tick_spacing();
    let half_span = width as i32 * tick_spacing.0 / 2;
    let first_strike = tick_spacing.ceil(tick_lower + half_span);
    let last_strike = tick_spacing.floor(tick_upper - half_span);

    let mut scan = ChunkScan::default();
    let mut strike = first_strike;
    while strike <= last_strike {
        let (leg_lower, leg_upper) = LegParams {
            strike,
            width,
            ..Default::default()
        }
        .ticks(tick_spacing);

        let chunks = [0u8, 1].map(|token_type| {
            state.account_liquidity(&pool.pool_key, pool.address, token_type, leg_lower, leg_upper)
        });
        if chunks.iter().any(|chunk| chunk.net != 0 || chunk.removed != 0) {
            scan.strikes.push(strike);
            for (token_type, chunk) in chunks.iter().enumerate() {
                scan.net_liquidity[token_type].push(chunk.net);
                scan.removed_liquidity[token_type].push(chunk.removed);
            }
        }
        strike += tick_spacing.0;
    }

    log!(
        DEBUG,
        "[scan_chunks]: pool {:?} [{}, {}] width {} found {} chunks",
        pool_id,
        tick_lower,
        tick_upper,
        width,
        scan.strikes.len()
    );
    Ok(scan)
}

/// Direct ledger reads of the chunk behind every leg of every position.
pub fn get_chunk_data<S: StateView + ?Sized>(
    state: &S,
    pool_id: PoolId,
    positions: &[TokenId],
) -> Result<Vec<PositionChunkData>, QueryError> {
    let (pool, _) = load_pool(state, pool_id)?;

    positions
        .iter()
        .map(|token_id| {
            ensure_position_in_pool(&pool, token_id)?;
            let mut data = PositionChunkData::default();
            for leg in token_id.decode(pool.address) {
                let chunk = state.account_liquidity(
                    &pool.pool_key,
                    pool.address,
                    leg.token_type,
                    leg.tick_lower,
                    leg.tick_upper,
                );
                data[leg.index as usize] = [chunk.net, chunk.removed];
            }
            Ok(data)
        })
        .collect()
}
