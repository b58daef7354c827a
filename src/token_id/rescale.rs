use crate::libraries::constants::{MAX_OPTION_RATIO, MAX_POSITION_SIZE};

use super::{InvalidLegReason, LegParams, TokenId, TokenIdError};

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

impl TokenId {
    /// Multiplies (`up`) or exactly divides every leg's option ratio by `factor`.
    /// All other leg fields are left untouched.
    pub fn scaled_position(&self, factor: u32, up: bool) -> Result<TokenId, TokenIdError> {
        let legs = self.legs();
        if legs.is_empty() {
            return Err(TokenIdError::invalid(0, InvalidLegReason::NoLegs));
        }
        if factor == 0 {
            return Err(TokenIdError::invalid(0, InvalidLegReason::RatioOutOfRange));
        }

        legs.iter()
            .enumerate()
            .try_fold(*self, |token_id, (index, leg)| {
                let ratio = leg.option_ratio as u32;
                let scaled = if up {
                    ratio.saturating_mul(factor)
                } else {
                    if ratio % factor != 0 {
                        return Err(TokenIdError::invalid(index, InvalidLegReason::InexactScale));
                    }
                    ratio / factor
                };
                if scaled == 0 || scaled > MAX_OPTION_RATIO as u32 {
                    return Err(TokenIdError::invalid(
                        index,
                        InvalidLegReason::RatioOutOfRange,
                    ));
                }
                Ok(token_id.with_leg(
                    index,
                    LegParams {
                        option_ratio: scaled as u8,
                        ..*leg
                    },
                ))
            })
    }

    /// Returns an encoding with the same per-leg payoff, i.e.
    /// `size * ratio == size' * ratio'` for every leg.
    ///
    /// A common factor of the ratios is first moved into the size; failing
    /// that, the largest factor of the size the ratios can absorb is moved
    /// into the ratios. Without either the inputs come back unchanged.
    pub fn equivalent_position(&self, size: u128) -> Result<(TokenId, u128), TokenIdError> {
        let legs = self.legs();
        if legs.is_empty() {
            return Err(TokenIdError::invalid(0, InvalidLegReason::NoLegs));
        }
        if size > MAX_POSITION_SIZE {
            return Err(TokenIdError::invalid(0, InvalidLegReason::SizeOutOfRange));
        }

        let ratio_gcd = legs
            .iter()
            .fold(0u128, |acc, leg| gcd(acc, leg.option_ratio as u128));
        if ratio_gcd > 1 {
            if let Some(rescaled_size) = size.checked_mul(ratio_gcd) {
                if rescaled_size <= MAX_POSITION_SIZE {
                    let token_id = self.scaled_position(ratio_gcd as u32, false)?;
                    return Ok((token_id, rescaled_size));
                }
            }
        }

        let max_ratio = legs.iter().map(|leg| leg.option_ratio).max().unwrap_or(1);
        let headroom = (MAX_OPTION_RATIO / max_ratio) as u128;
        for factor in (2..=headroom).rev() {
            if size % factor == 0 {
                let token_id = self.scaled_position(factor as u32, true)?;
                return Ok((token_id, size / factor));
            }
        }

        Ok((*self, size))
    }
}
