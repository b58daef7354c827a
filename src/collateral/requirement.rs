use ethnum::U256;

use crate::{
    errors::QueryError,
    libraries::{
        full_math::mul_bps_rounding_up,
        price_conversion::{
            convert0to1, convert0to1_rounding_up, convert1to0, convert1to0_rounding_up,
        },
        tick_math::TickMath,
    },
    pool::types::PoolContext,
    token_id::{Leg, LiquidityChunk, TokenId},
};

use super::params::RiskParameters;

pub(crate) fn checked_add(a: U256, b: U256) -> Result<U256, QueryError> {
    a.checked_add(b).ok_or(QueryError::MathOverflow)
}

/// Value of `amounts` ([token0, token1]) expressed in `token`, rounded down.
pub(crate) fn value_in_token(
    amounts: [U256; 2],
    token: u8,
    sqrt_price_x96: U256,
) -> Result<U256, QueryError> {
    if token == 0 {
        checked_add(amounts[0], convert1to0(amounts[1], sqrt_price_x96)?)
    } else {
        checked_add(convert0to1(amounts[0], sqrt_price_x96)?, amounts[1])
    }
}

struct LegExposure {
    leg: Leg,
    chunk: LiquidityChunk,
    moved: [U256; 2],
}

impl LegExposure {
    fn new(leg: Leg, position_size: u128) -> Result<Self, QueryError> {
        let chunk = leg.liquidity_chunk(position_size)?;
        let moved = chunk.amounts_moved()?;
        Ok(Self { leg, chunk, moved })
    }

    fn token(&self) -> u8 {
        self.leg.token_type
    }

    fn moved_in_token(&self) -> U256 {
        self.moved[self.token() as usize]
    }

    // shortfall of the chunk's holdings at the query price against what was moved
    fn in_the_money_loss(&self, sqrt_price_x96: U256) -> Result<U256, QueryError> {
        let holdings = self.chunk.amounts_at_price(sqrt_price_x96)?;
        let value = value_in_token(holdings, self.token(), sqrt_price_x96)?;
        Ok(self.moved_in_token().saturating_sub(value))
    }

    fn requirement(
        &self,
        params: &RiskParameters,
        utilization: u16,
        halve_seller_ratio: bool,
        sqrt_price_x96: U256,
    ) -> Result<U256, QueryError> {
        if self.leg.is_long {
            return Ok(mul_bps_rounding_up(
                self.moved_in_token(),
                params.buyer_ratio(utilization),
            )?);
        }
        let mut ratio = params.seller_ratio(utilization);
        if halve_seller_ratio {
            ratio /= 2;
        }
        let base = mul_bps_rounding_up(self.moved_in_token(), ratio)?;
        checked_add(base, self.in_the_money_loss(sqrt_price_x96)?)
    }
}

// Maximum loss of a same-token-type spread, in that token.
fn spread_max_loss(short: &LegExposure, long: &LegExposure) -> Result<U256, QueryError> {
    let token = short.token();
    if short.leg.asset != token {
        return Ok(short.moved[token as usize].saturating_sub(long.moved[token as usize]));
    }

    let other = 1 - token as usize;
    let difference = long.moved[other].saturating_sub(short.moved[other]);
    let sqrt_at_long_strike = TickMath::get_sqrt_ratio_at_tick(long.leg.strike)?;
    let converted = if token == 0 {
        convert1to0_rounding_up(difference, sqrt_at_long_strike)?
    } else {
        convert0to1_rounding_up(difference, sqrt_at_long_strike)?
    };
    Ok(converted)
}

/// Per-token collateral a position of `position_size` needs at `sqrt_price_x96`,
/// with each token's ratios taken at `utilizations[token]`. Premia are not included.
pub(crate) fn position_requirement(
    pool: &PoolContext,
    token_id: &TokenId,
    position_size: u128,
    utilizations: [u16; 2],
    params: &RiskParameters,
    sqrt_price_x96: U256,
) -> Result<[U256; 2], QueryError> {
    let exposures = token_id
        .decode(pool.address)
        .into_iter()
        .map(|leg| LegExposure::new(leg, position_size))
        .collect::<Result<Vec<_>, _>>()?;

    let mut required = [U256::ZERO; 2];
    for (index, exposure) in exposures.iter().enumerate() {
        let token = exposure.token() as usize;
        let utilization = utilizations[token];
        let partner_index = exposure.leg.risk_partner as usize;

        let amount = if partner_index == index {
            exposure.requirement(params, utilization, false, sqrt_price_x96)?
        } else {
            let partner = &exposures[partner_index];
            if partner.token() != exposure.token() {
                // short strangle: each side carries half the seller ratio
                exposure.requirement(params, utilization, true, sqrt_price_x96)?
            } else if index > partner_index {
                // spread already settled on its lower-index leg
                U256::ZERO
            } else {
                let (short, long) = if exposure.leg.is_long {
                    (partner, exposure)
                } else {
                    (exposure, partner)
                };
                let split = checked_add(
                    short.requirement(params, utilization, false, sqrt_price_x96)?,
                    long.requirement(params, utilization, false, sqrt_price_x96)?,
                )?;
                split.min(spread_max_loss(short, long)?)
            }
        };
        required[token] = checked_add(required[token], amount)?;
    }

    Ok(required)
}

/// Balance and requirement expressed in a single token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CollateralFraming {
    pub balance: U256,
    pub required: U256,
}

/// Cross-collateral framings in token0 and token1 at `sqrt_price_x96`.
/// Balances round down and requirements round up.
pub(crate) fn cross_framings(
    balances: [U256; 2],
    required: [U256; 2],
    sqrt_price_x96: U256,
) -> Result<[CollateralFraming; 2], QueryError> {
    let token0 = CollateralFraming {
        balance: checked_add(balances[0], convert1to0(balances[1], sqrt_price_x96)?)?,
        required: checked_add(
            required[0],
            convert1to0_rounding_up(required[1], sqrt_price_x96)?,
        )?,
    };
    let token1 = CollateralFraming {
        balance: checked_add(convert0to1(balances[0], sqrt_price_x96)?, balances[1])?,
        required: checked_add(
            convert0to1_rounding_up(required[0], sqrt_price_x96)?,
            required[1],
        )?,
    };
    Ok([token0, token1])
}

/// Index of the framing that binds at `at_tick`.
pub(crate) fn binding_token(at_tick: i32) -> usize {
    if at_tick < 0 { 0 } else { 1 }
}
