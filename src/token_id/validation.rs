use ethnum::U256;

use crate::libraries::constants::{MAX_TICK, MIN_TICK};

use super::{InvalidLegReason, LegParams, TokenId, TokenIdError};

/// Two legs may be risk partners only as a spread (same token type, opposite
/// sides) or a short strangle (different token types, both short), and only
/// when they share the asset and the option ratio.
pub fn partners_compatible(leg: &LegParams, partner: &LegParams) -> bool {
    if leg.asset != partner.asset || leg.option_ratio != partner.option_ratio {
        return false;
    }
    if leg.token_type != partner.token_type {
        !leg.is_long && !partner.is_long
    } else {
        leg.is_long != partner.is_long
    }
}

impl TokenId {
    /// Checks every active leg for a well-formed, unambiguous encoding.
    pub fn validate(&self) -> Result<(), TokenIdError> {
        if self.leg(0).option_ratio == 0 {
            return Err(TokenIdError::invalid(0, InvalidLegReason::NoLegs));
        }

        let tick_spacing = self.pool_id().tick_spacing();
        if tick_spacing.0 == 0 {
            return Err(TokenIdError::invalid(0, InvalidLegReason::ZeroTickSpacing));
        }

        let leg_count = self.count_legs();
        // every slot after the first empty one must be fully zero
        if self.bits_after_legs(leg_count) != U256::ZERO {
            return Err(TokenIdError::invalid(
                leg_count,
                InvalidLegReason::TrailingLegData,
            ));
        }

        let legs = self.legs();
        for (index, leg) in legs.iter().enumerate() {
            if leg.width == 0 {
                return Err(TokenIdError::invalid(index, InvalidLegReason::ZeroWidth));
            }
            if leg.width % 2 != 0 {
                return Err(TokenIdError::invalid(index, InvalidLegReason::OddWidth));
            }
            if !tick_spacing.is_aligned(leg.strike) {
                return Err(TokenIdError::invalid(
                    index,
                    InvalidLegReason::StrikeNotAligned,
                ));
            }
            let (tick_lower, tick_upper) = leg.ticks(tick_spacing);
            if tick_lower < MIN_TICK || tick_upper > MAX_TICK {
                return Err(TokenIdError::invalid(index, InvalidLegReason::TickOutOfRange));
            }

            let partner_index = leg.risk_partner as usize;
            if partner_index >= leg_count {
                return Err(TokenIdError::invalid(
                    index,
                    InvalidLegReason::PartnerOutOfRange,
                ));
            }
            if partner_index != index {
                let partner = &legs[partner_index];
                if partner.risk_partner as usize != index {
                    return Err(TokenIdError::invalid(
                        index,
                        InvalidLegReason::AsymmetricPartner,
                    ));
                }
                if !partners_compatible(leg, partner) {
                    return Err(TokenIdError::IncompatiblePartner {
                        leg: index as u8,
                        partner: partner_index as u8,
                    });
                }
            }
        }

        // one AMM chunk may back two legs only if they are partnered together
        for (index, leg) in legs.iter().enumerate() {
            for (other, other_leg) in legs.iter().enumerate().skip(index + 1) {
                let mutually_partnered = leg.risk_partner as usize == other
                    && other_leg.risk_partner as usize == index;
                if leg.chunk_key() == other_leg.chunk_key() && !mutually_partnered {
                    return Err(TokenIdError::DuplicateChunk {
                        leg: index as u8,
                        other: other as u8,
                    });
                }
            }
        }

        Ok(())
    }
}
