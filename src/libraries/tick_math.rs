use ethnum::U256;

use super::constants::{MAX_TICK, MIN_TICK};

/// Math library for computing sqrt prices from ticks
/// notice Computes sqrt price for ticks of size 1.0001, i.e. sqrt(1.0001^tick) as fixed point Q64.96 numbers. Supports
/// prices between 2.pow-128 and 2.pow128
pub struct TickMath;

const ODD_TICK_RATIO: U256 = U256::new(0xfffcb933bd6fad37aa2d162d1a594001);

// sqrt(1.0001^-(2^i)) in Q128.128, for i = 1..=19
const RATIO_CONSTANTS: [U256; 19] = [
    U256::new(0xfff97272373d413259a46990580e213a),
    U256::new(0xfff2e50f5f656932ef12357cf3c7fdcc),
    U256::new(0xffe5caca7e10e4e61c3624eaa0941cd0),
    U256::new(0xffcb9843d60f6159c9db58835c926644),
    U256::new(0xff973b41fa98c081472e6896dfb254c0),
    U256::new(0xff2ea16466c96a3843ec78b326b52861),
    U256::new(0xfe5dee046a99a2a811c461f1969c3053),
    U256::new(0xfcbe86c7900a88aedcffc83b479aa3a4),
    U256::new(0xf987a7253ac413176f2b074cf7815e54),
    U256::new(0xf3392b0822b70005940c7a398e4b70f3),
    U256::new(0xe7159475a2c29b7443b29c7fa6e889d9),
    U256::new(0xd097f3bdfd2022b8845ad8f792aa5825),
    U256::new(0xa9f746462d870fdf8a65dc1f90e061e5),
    U256::new(0x70d869a156d2a1b890bb3df62baf32f7),
    U256::new(0x31be135f97d08fd981231505542fcfa6),
    U256::new(0x9aa508b5b7a84e1c677de54f3e99bc9),
    U256::new(0x5d6af8dedb81196699c329225ee604),
    U256::new(0x2216e584f5fa1ea926041bedfe98),
    U256::new(0x48a170391f7dc42444e8fa2),
];

#[derive(Debug, Clone, PartialEq)]
pub enum TickMathError {
    TickOutOfBounds(i32),
}

impl TickMath {
    /// Calculates sqrt(1.0001^tick) * 2^96.
    /// Returns a Q64.96 fixed-point number representing the sqrt of the price ratio.
    pub fn get_sqrt_ratio_at_tick(tick: i32) -> Result<U256, TickMathError> {
        if !(MIN_TICK..=MAX_TICK).contains(&tick) {
            return Err(TickMathError::TickOutOfBounds(tick));
        }

        let abs_tick = tick.unsigned_abs();
        let mut ratio = if abs_tick & 0x1 != 0 {
            ODD_TICK_RATIO
        } else {
            U256::from_words(1, 0)
        };

        // both factors stay below 2^128 so the product never leaves 256 bits
        for (i, constant) in RATIO_CONSTANTS.iter().enumerate() {
            if abs_tick & (1 << (i + 1)) != 0 {
                ratio = (ratio * *constant) >> 128;
            }
        }

        if tick > 0 {
            ratio = U256::MAX / ratio;
        }

        // Q128.128 -> Q64.96, rounding up
        let remainder_mask = (U256::ONE << 32) - U256::ONE;
        let round = if ratio & remainder_mask == U256::ZERO {
            U256::ZERO
        } else {
            U256::ONE
        };
        Ok((ratio >> 32) + round)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libraries::{
        constants::{MAX_SQRT_RATIO, MIN_SQRT_RATIO, Q96},
        safe_cast::u256_to_big_uint,
    };
    use num_traits::ToPrimitive;

    #[test]
    fn test_tick_zero_is_q96() {
        assert_eq!(TickMath::get_sqrt_ratio_at_tick(0).unwrap(), *Q96);
    }

    #[test]
    fn test_known_values() {
        assert_eq!(
            TickMath::get_sqrt_ratio_at_tick(1).unwrap(),
            U256::from_str_radix("79232123823359799118286999568", 10).unwrap()
        );
        assert_eq!(
            TickMath::get_sqrt_ratio_at_tick(MAX_TICK - 1).unwrap(),
            U256::from_str_radix("1461373636630004318706518188784493106690254656249", 10)
                .unwrap()
        );
        assert_eq!(
            TickMath::get_sqrt_ratio_at_tick(MIN_TICK + 1).unwrap(),
            U256::from(4295343490u64)
        );
    }

    #[test]
    fn test_bounds() {
        assert_eq!(
            TickMath::get_sqrt_ratio_at_tick(MIN_TICK).unwrap(),
            *MIN_SQRT_RATIO
        );
        assert_eq!(
            TickMath::get_sqrt_ratio_at_tick(MAX_TICK).unwrap(),
            *MAX_SQRT_RATIO
        );
        assert_eq!(
            TickMath::get_sqrt_ratio_at_tick(MAX_TICK + 1),
            Err(TickMathError::TickOutOfBounds(MAX_TICK + 1))
        );
        assert_eq!(
            TickMath::get_sqrt_ratio_at_tick(MIN_TICK - 1),
            Err(TickMathError::TickOutOfBounds(MIN_TICK - 1))
        );
    }

    #[test]
    fn test_get_sqrt_ratio_at_tick_accuracy() {
        const ABS_TICKS: [u32; 10] = [50, 100, 250, 500, 1000, 2500, 5000, 50000, 150000, 500000];

        for &abs_tick in &ABS_TICKS {
            for &tick in &[abs_tick as i32, -(abs_tick as i32)] {
                let precise = 1.0001_f64.powi(tick).sqrt() * 2_f64.powi(96);
                let calculated =
                    u256_to_big_uint(TickMath::get_sqrt_ratio_at_tick(tick).unwrap())
                        .to_f64()
                        .expect("Failed to convert");
                let rel_diff = (precise - calculated).abs() / precise;
                assert!(
                    rel_diff < 0.000001,
                    "Tick {}: relative difference too large: {}",
                    tick,
                    rel_diff
                );
            }
        }
    }

    #[test]
    fn test_monotonic_around_zero() {
        let mut previous = TickMath::get_sqrt_ratio_at_tick(-20).unwrap();
        for tick in -19..=20 {
            let current = TickMath::get_sqrt_ratio_at_tick(tick).unwrap();
            assert!(current > previous, "not increasing at tick {}", tick);
            previous = current;
        }
    }
}
