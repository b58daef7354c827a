use ethnum::U256;
use lazy_static::lazy_static;

lazy_static! {
    pub static ref Q64: U256 = U256::from(1u8) << 64; // 2^64
    pub static ref Q96: U256 = U256::from(1u8) << 96; // 2^96
    pub static ref Q128: U256 = U256::from_words(1, 0); // 2^128
    pub static ref Q192: U256 = U256::from(1u8) << 192; // 2^192

    pub static ref MIN_SQRT_RATIO: U256 = U256::from_str_radix("4295128739", 10).unwrap();
    pub static ref MAX_SQRT_RATIO: U256 =
        U256::from_str_radix("1461446703485210103287273052203988822378723970342", 10).unwrap();
}

pub const MIN_TICK: i32 = -887272;
pub const MAX_TICK: i32 = 887272;

/// Basis points denominator used by every ratio in the risk engine.
pub const DECIMALS: u128 = 10_000;

/// Largest position size the platform lets a single position carry.
pub const MAX_POSITION_SIZE: u128 = (1u128 << 104) - 1;

pub const MAX_LEGS: usize = 4;
pub const MAX_OPTION_RATIO: u8 = 127;
pub const MAX_WIDTH: u16 = 4095;

// Default risk parameters, all in basis points
pub const DEFAULT_SELLER_COLLATERAL_RATIO: u16 = 2_000;
pub const DEFAULT_BUYER_COLLATERAL_RATIO: u16 = 1_000;
pub const DEFAULT_TARGET_POOL_UTILIZATION: u16 = 5_000;
pub const DEFAULT_SATURATED_POOL_UTILIZATION: u16 = 9_000;
pub const DEFAULT_SOLVENCY_BUFFER: u16 = 10_000;
pub const DEFAULT_SIZING_MIN_UTILIZATION: u16 = 0;
pub const DEFAULT_SIZING_MAX_UTILIZATION: u16 = 10_000;
pub const DEFAULT_SIZING_TOLERANCE: u16 = 1_000;

/// Position size used when a requirement is only needed for comparison.
pub const DEFAULT_REQUIRED_BASE_SIZE: u128 = 1_000_000_000_000;
