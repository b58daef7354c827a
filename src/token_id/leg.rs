use candid::Principal;
use ethnum::U256;

use crate::{
    errors::QueryError,
    libraries::{
        liquidity_amounts::{
            get_amount0_for_liquidity, get_amount1_for_liquidity, get_amounts_for_liquidity,
            get_liquidity_for_amount0, get_liquidity_for_amount1,
        },
        tick_math::TickMath,
    },
};

use super::TokenId;

/// Decoded view of one active leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Leg {
    pub index: u8,
    // options pool the position belongs to; not part of the encoding
    pub pool: Principal,
    pub asset: u8,
    pub option_ratio: u8,
    pub is_long: bool,
    pub token_type: u8,
    pub risk_partner: u8,
    pub strike: i32,
    pub width: u16,
    pub tick_lower: i32,
    pub tick_upper: i32,
}

impl TokenId {
    /// Unpacks every active leg and attaches the pool address supplied by the caller.
    pub fn decode(&self, pool: Principal) -> Vec<Leg> {
        let tick_spacing = self.pool_id().tick_spacing();
        self.legs()
            .into_iter()
            .enumerate()
            .map(|(index, params)| {
                let (tick_lower, tick_upper) = params.ticks(tick_spacing);
                Leg {
                    index: index as u8,
                    pool,
                    asset: params.asset,
                    option_ratio: params.option_ratio,
                    is_long: params.is_long,
                    token_type: params.token_type,
                    risk_partner: params.risk_partner,
                    strike: params.strike,
                    width: params.width,
                    tick_lower,
                    tick_upper,
                }
            })
            .collect()
    }
}

impl Leg {
    /// Liquidity this leg deploys (or removes) for `position_size` contracts of its asset.
    pub fn liquidity_chunk(&self, position_size: u128) -> Result<LiquidityChunk, QueryError> {
        let contracts = position_size
            .checked_mul(self.option_ratio as u128)
            .ok_or(QueryError::MathOverflow)?;

        let sqrt_lower = TickMath::get_sqrt_ratio_at_tick(self.tick_lower)?;
        let sqrt_upper = TickMath::get_sqrt_ratio_at_tick(self.tick_upper)?;

        let liquidity = if contracts == 0 {
            0
        } else if self.asset == 0 {
            get_liquidity_for_amount0(sqrt_lower, sqrt_upper, U256::from(contracts))?
        } else {
            get_liquidity_for_amount1(sqrt_lower, sqrt_upper, U256::from(contracts))?
        };

        Ok(LiquidityChunk {
            tick_lower: self.tick_lower,
            tick_upper: self.tick_upper,
            liquidity,
        })
    }
}

/// Liquidity spread over one tick range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiquidityChunk {
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub liquidity: u128,
}

impl LiquidityChunk {
    fn sqrt_bounds(&self) -> Result<(U256, U256), QueryError> {
        Ok((
            TickMath::get_sqrt_ratio_at_tick(self.tick_lower)?,
            TickMath::get_sqrt_ratio_at_tick(self.tick_upper)?,
        ))
    }

    /// [amount0, amount1] the chunk holds when entirely on one side of the price,
    /// i.e. the notional moved in each token.
    pub fn amounts_moved(&self) -> Result<[U256; 2], QueryError> {
        let (sqrt_lower, sqrt_upper) = self.sqrt_bounds()?;
        Ok([
            get_amount0_for_liquidity(sqrt_lower, sqrt_upper, self.liquidity)?,
            get_amount1_for_liquidity(sqrt_lower, sqrt_upper, self.liquidity)?,
        ])
    }

    /// [amount0, amount1] the chunk holds with the pool at `sqrt_price_x96`.
    pub fn amounts_at_price(&self, sqrt_price_x96: U256) -> Result<[U256; 2], QueryError> {
        let (sqrt_lower, sqrt_upper) = self.sqrt_bounds()?;
        let (amount0, amount1) =
            get_amounts_for_liquidity(sqrt_price_x96, sqrt_lower, sqrt_upper, self.liquidity)?;
        Ok([amount0, amount1])
    }
}
