pub mod constants;
pub mod full_math;
pub mod liquidity_amounts;
pub mod price_conversion;
pub mod safe_cast;
pub mod tick_math;
