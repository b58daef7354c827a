use ethnum::U256;
use num_bigint::BigUint;
use num_traits::Zero;

use super::safe_cast::{big_uint_to_u256, u256_to_big_uint};

#[derive(Debug, Clone, PartialEq)]
pub enum FullMathError {
    DivisionByZero,
    Overflow,
}

/// Computes floor(a * b / denominator) with a full 512-bit intermediate product.
pub fn mul_div(a: U256, b: U256, denominator: U256) -> Result<U256, FullMathError> {
    if denominator == U256::ZERO {
        return Err(FullMathError::DivisionByZero);
    }

    let product = u256_to_big_uint(a) * u256_to_big_uint(b);
    let quotient = product / u256_to_big_uint(denominator);

    big_uint_to_u256(quotient).map_err(|_e| FullMathError::Overflow)
}

/// Computes ceil(a * b / denominator) with a full 512-bit intermediate product.
pub fn mul_div_rounding_up(a: U256, b: U256, denominator: U256) -> Result<U256, FullMathError> {
    if denominator == U256::ZERO {
        return Err(FullMathError::DivisionByZero);
    }

    let product = u256_to_big_uint(a) * u256_to_big_uint(b);
    let denominator_big = u256_to_big_uint(denominator);
    let quotient = &product / &denominator_big;
    let result = if (&product % &denominator_big).is_zero() {
        quotient
    } else {
        quotient + BigUint::from(1u32)
    };

    big_uint_to_u256(result).map_err(|_e| FullMathError::Overflow)
}

/// Scales `amount` by a basis-point ratio, rounding up.
pub fn mul_bps_rounding_up(amount: U256, ratio_bps: u128) -> Result<U256, FullMathError> {
    mul_div_rounding_up(
        amount,
        U256::from(ratio_bps),
        U256::from(super::constants::DECIMALS),
    )
}
