use ethnum::U256;

use super::{constants::Q96, full_math::mul_div};

#[derive(Debug, Clone, PartialEq)]
pub enum LiquidityAmountsError {
    Overflow,
    InvalidPrice,
}

fn sorted(sqrt_price_a_x96: U256, sqrt_price_b_x96: U256) -> (U256, U256) {
    if sqrt_price_a_x96 > sqrt_price_b_x96 {
        (sqrt_price_b_x96, sqrt_price_a_x96)
    } else {
        (sqrt_price_a_x96, sqrt_price_b_x96)
    }
}

/// Computes the amount of liquidity received for a given amount of token0 and price range.
/// Calculates amount0 * (sqrt(upper) * sqrt(lower)) / (sqrt(upper) - sqrt(lower)).
/// # Arguments
/// * `sqrt_price_a_x96` - A sqrt price representing the first tick boundary (Q96 format)
/// * `sqrt_price_b_x96` - A sqrt price representing the second tick boundary (Q96 format)
/// * `amount0` - The amount of token0 being sent in
pub fn get_liquidity_for_amount0(
    sqrt_price_a_x96: U256,
    sqrt_price_b_x96: U256,
    amount0: U256,
) -> Result<u128, LiquidityAmountsError> {
    let (sqrt_price_a_x96, sqrt_price_b_x96) = sorted(sqrt_price_a_x96, sqrt_price_b_x96);

    if sqrt_price_a_x96 == sqrt_price_b_x96 {
        return Err(LiquidityAmountsError::InvalidPrice);
    }

    // sqrtPriceAX96 * sqrtPriceBX96 / Q96
    let intermediate = mul_div(sqrt_price_a_x96, sqrt_price_b_x96, *Q96)
        .map_err(|_e| LiquidityAmountsError::Overflow)?;

    // amount0 * intermediate / (sqrtPriceBX96 - sqrtPriceAX96)
    let liquidity = mul_div(amount0, intermediate, sqrt_price_b_x96 - sqrt_price_a_x96)
        .map_err(|_e| LiquidityAmountsError::Overflow)?;

    u128::try_from(liquidity).map_err(|_e| LiquidityAmountsError::Overflow)
}

/// Computes the amount of liquidity received for a given amount of token1 and price range.
/// Calculates amount1 / (sqrt(upper) - sqrt(lower)).
pub fn get_liquidity_for_amount1(
    sqrt_price_a_x96: U256,
    sqrt_price_b_x96: U256,
    amount1: U256,
) -> Result<u128, LiquidityAmountsError> {
    let (sqrt_price_a_x96, sqrt_price_b_x96) = sorted(sqrt_price_a_x96, sqrt_price_b_x96);

    if sqrt_price_a_x96 == sqrt_price_b_x96 {
        return Err(LiquidityAmountsError::InvalidPrice);
    }

    // amount1 * Q96 / (sqrtPriceBX96 - sqrtPriceAX96)
    let liquidity = mul_div(amount1, *Q96, sqrt_price_b_x96 - sqrt_price_a_x96)
        .map_err(|_e| LiquidityAmountsError::Overflow)?;

    u128::try_from(liquidity).map_err(|_e| LiquidityAmountsError::Overflow)
}

/// Amount of token0 held by `liquidity` spread over the whole range, rounded down.
/// Calculates liquidity * (sqrt(upper) - sqrt(lower)) / (sqrt(upper) * sqrt(lower)).
pub fn get_amount0_for_liquidity(
    sqrt_price_a_x96: U256,
    sqrt_price_b_x96: U256,
    liquidity: u128,
) -> Result<U256, LiquidityAmountsError> {
    let (sqrt_lower, sqrt_upper) = sorted(sqrt_price_a_x96, sqrt_price_b_x96);

    if sqrt_lower == U256::ZERO {
        return Err(LiquidityAmountsError::InvalidPrice);
    }

    let numerator = U256::from(liquidity) << 96;
    Ok(mul_div(numerator, sqrt_upper - sqrt_lower, sqrt_upper)
        .map_err(|_e| LiquidityAmountsError::Overflow)?
        / sqrt_lower)
}

/// Amount of token1 held by `liquidity` spread over the whole range, rounded down.
/// Calculates liquidity * (sqrt(upper) - sqrt(lower)).
pub fn get_amount1_for_liquidity(
    sqrt_price_a_x96: U256,
    sqrt_price_b_x96: U256,
    liquidity: u128,
) -> Result<U256, LiquidityAmountsError> {
    let (sqrt_lower, sqrt_upper) = sorted(sqrt_price_a_x96, sqrt_price_b_x96);

    mul_div(U256::from(liquidity), sqrt_upper - sqrt_lower, *Q96)
        .map_err(|_e| LiquidityAmountsError::Overflow)
}

/// Token amounts held by `liquidity` in the range when the pool sits at `sqrt_price_x96`.
/// Returns (amount0, amount1).
pub fn get_amounts_for_liquidity(
    sqrt_price_x96: U256,
    sqrt_price_a_x96: U256,
    sqrt_price_b_x96: U256,
    liquidity: u128,
) -> Result<(U256, U256), LiquidityAmountsError> {
    let (sqrt_lower, sqrt_upper) = sorted(sqrt_price_a_x96, sqrt_price_b_x96);

    if sqrt_price_x96 <= sqrt_lower {
        Ok((
            get_amount0_for_liquidity(sqrt_lower, sqrt_upper, liquidity)?,
            U256::ZERO,
        ))
    } else if sqrt_price_x96 < sqrt_upper {
        Ok((
            get_amount0_for_liquidity(sqrt_price_x96, sqrt_upper, liquidity)?,
            get_amount1_for_liquidity(sqrt_lower, sqrt_price_x96, liquidity)?,
        ))
    } else {
        Ok((
            U256::ZERO,
            get_amount1_for_liquidity(sqrt_lower, sqrt_upper, liquidity)?,
        ))
    }
}
