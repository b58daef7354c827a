use ethnum::U256;

use super::{
    constants::{Q128, Q192, Q64},
    full_math::{FullMathError, mul_div, mul_div_rounding_up},
};

// sqrt prices at or above 2^128 would overflow when squared, so the price is
// pre-scaled down by 2^64 on that path.
fn price_x128(sqrt_price_x96: U256) -> Result<U256, FullMathError> {
    mul_div(sqrt_price_x96, sqrt_price_x96, *Q64)
}

/// Converts an amount of token0 into token1 at `sqrt_price_x96`, rounding down.
pub fn convert0to1(amount: U256, sqrt_price_x96: U256) -> Result<U256, FullMathError> {
    if sqrt_price_x96 < *Q128 {
        mul_div(amount, sqrt_price_x96 * sqrt_price_x96, *Q192)
    } else {
        mul_div(amount, price_x128(sqrt_price_x96)?, *Q128)
    }
}

pub fn convert0to1_rounding_up(amount: U256, sqrt_price_x96: U256) -> Result<U256, FullMathError> {
    if sqrt_price_x96 < *Q128 {
        mul_div_rounding_up(amount, sqrt_price_x96 * sqrt_price_x96, *Q192)
    } else {
        mul_div_rounding_up(amount, price_x128(sqrt_price_x96)?, *Q128)
    }
}

/// Converts an amount of token1 into token0 at `sqrt_price_x96`, rounding down.
pub fn convert1to0(amount: U256, sqrt_price_x96: U256) -> Result<U256, FullMathError> {
    if sqrt_price_x96 < *Q128 {
        mul_div(amount, *Q192, sqrt_price_x96 * sqrt_price_x96)
    } else {
        mul_div(amount, *Q128, price_x128(sqrt_price_x96)?)
    }
}

pub fn convert1to0_rounding_up(amount: U256, sqrt_price_x96: U256) -> Result<U256, FullMathError> {
    if sqrt_price_x96 < *Q128 {
        mul_div_rounding_up(amount, *Q192, sqrt_price_x96 * sqrt_price_x96)
    } else {
        mul_div_rounding_up(amount, *Q128, price_x128(sqrt_price_x96)?)
    }
}
