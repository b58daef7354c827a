//! Multi-leg option positions packed into a single 256-bit integer.
//!
//! ```text
//! | pool id (64) | leg 0 (48) | leg 1 (48) | leg 2 (48) | leg 3 (48) |
//!
//! leg layout (offsets relative to the leg base):
//!   asset        1 bit    0
//!   optionRatio  7 bits   1
//!   isLong       1 bit    8
//!   tokenType    1 bit    9
//!   riskPartner  2 bits  10
//!   strike      24 bits  12  (two's complement)
//!   width       12 bits  36
//! ```

use candid::CandidType;
use ethnum::U256;
use serde::{Deserialize, Serialize};

use crate::{
    libraries::constants::MAX_LEGS,
    pool::types::{PoolId, PoolTickSpacing},
};

pub mod leg;
pub mod rescale;
pub mod validation;


pub use leg::{Leg, LiquidityChunk};

const POOL_ID_BITS: u32 = 64;
const LEG_BITS: u32 = 48;
const LEG_MASK: u64 = (1 << LEG_BITS) - 1;
const STRIKE_MASK: u64 = 0xFF_FFFF;
const WIDTH_MASK: u64 = 0xFFF;

#[derive(CandidType, Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidLegReason {
    LegCount,
    NoLegs,
    TrailingLegData,
    ZeroTickSpacing,
    ZeroWidth,
    OddWidth,
    StrikeNotAligned,
    TickOutOfRange,
    PartnerOutOfRange,
    AsymmetricPartner,
    RatioOutOfRange,
    InexactScale,
    SizeOutOfRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenIdError {
    InvalidTokenIdParameter { leg: u8, reason: InvalidLegReason },
    DuplicateChunk { leg: u8, other: u8 },
    IncompatiblePartner { leg: u8, partner: u8 },
}

impl TokenIdError {
    pub(crate) fn invalid(leg: usize, reason: InvalidLegReason) -> Self {
        TokenIdError::InvalidTokenIdParameter {
            leg: leg as u8,
            reason,
        }
    }
}

/// Raw fields of one leg slot, exactly as stored in the bit pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LegParams {
    pub asset: u8,
    pub option_ratio: u8,
    pub is_long: bool,
    pub token_type: u8,
    pub risk_partner: u8,
    pub strike: i32,
    pub width: u16,
}

impl LegParams {
    fn pack(&self) -> u64 {
        (self.asset as u64 & 0x1)
            | ((self.option_ratio as u64 & 0x7F) << 1)
            | ((self.is_long as u64) << 8)
            | ((self.token_type as u64 & 0x1) << 9)
            | ((self.risk_partner as u64 & 0x3) << 10)
            // stored modulo 2^24
            | (((self.strike as u32) as u64 & STRIKE_MASK) << 12)
            | ((self.width as u64 & WIDTH_MASK) << 36)
    }

    fn unpack(raw: u64) -> Self {
        let strike_raw = ((raw >> 12) & STRIKE_MASK) as u32;
        LegParams {
            asset: (raw & 0x1) as u8,
            option_ratio: ((raw >> 1) & 0x7F) as u8,
            is_long: (raw >> 8) & 0x1 == 1,
            token_type: ((raw >> 9) & 0x1) as u8,
            risk_partner: ((raw >> 10) & 0x3) as u8,
            // sign-extend the 24-bit strike
            strike: ((strike_raw << 8) as i32) >> 8,
            width: ((raw >> 36) & WIDTH_MASK) as u16,
        }
    }

    /// (strike, width, tokenType) identify the AMM chunk a leg deploys into.
    pub fn chunk_key(&self) -> (i32, u16, u8) {
        (self.strike, self.width, self.token_type)
    }

    /// (tickLower, tickUpper) for this leg on a grid of `tick_spacing`.
    pub fn ticks(&self, tick_spacing: PoolTickSpacing) -> (i32, i32) {
        let span = self.width as i32 * tick_spacing.0;
        let range_down = span / 2;
        let range_up = span - range_down;
        (self.strike - range_down, self.strike + range_up)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TokenId(pub U256);

impl TokenId {
    /// Packs a pool id and up to four legs. Fields are masked to their widths;
    /// nothing is checked semantically (see [`TokenId::validate`]).
    pub fn encode(pool_id: PoolId, legs: &[LegParams]) -> Result<TokenId, TokenIdError> {
        if legs.len() > MAX_LEGS {
            return Err(TokenIdError::invalid(MAX_LEGS, InvalidLegReason::LegCount));
        }
        let token_id = legs
            .iter()
            .enumerate()
            .fold(TokenId::from_pool_id(pool_id), |token_id, (index, leg)| {
                token_id.with_leg(index, *leg)
            });
        Ok(token_id)
    }

    pub fn from_pool_id(pool_id: PoolId) -> TokenId {
        TokenId(U256::from(pool_id.0))
    }

    pub fn pool_id(&self) -> PoolId {
        let (_, low) = self.0.into_words();
        PoolId(low as u64)
    }

    fn leg_offset(index: usize) -> u32 {
        POOL_ID_BITS + LEG_BITS * index as u32
    }

    fn raw_leg(&self, index: usize) -> u64 {
        let (_, low) = (self.0 >> Self::leg_offset(index)).into_words();
        low as u64 & LEG_MASK
    }

    /// Raw fields of slot `index` (0..4), active or not.
    pub fn leg(&self, index: usize) -> LegParams {
        LegParams::unpack(self.raw_leg(index))
    }

    /// Returns a copy with slot `index` replaced by `leg`.
    pub fn with_leg(&self, index: usize, leg: LegParams) -> TokenId {
        let offset = Self::leg_offset(index);
        let cleared = self.0 & !(U256::from(LEG_MASK) << offset);
        TokenId(cleared | (U256::from(leg.pack()) << offset))
    }

    pub fn with_risk_partner(&self, index: usize, partner: u8) -> TokenId {
        self.with_leg(
            index,
            LegParams {
                risk_partner: partner,
                ..self.leg(index)
            },
        )
    }

    /// Number of legs before the first slot with a zero option ratio.
    pub fn count_legs(&self) -> usize {
        (0..MAX_LEGS)
            .find(|&index| self.leg(index).option_ratio == 0)
            .unwrap_or(MAX_LEGS)
    }

    /// Raw fields of every active leg, in slot order.
    pub fn legs(&self) -> Vec<LegParams> {
        (0..self.count_legs()).map(|index| self.leg(index)).collect()
    }

    /// Bits above the last active leg; non-zero means a malformed encoding.
    pub(crate) fn bits_after_legs(&self, leg_count: usize) -> U256 {
        if leg_count >= MAX_LEGS {
            return U256::ZERO;
        }
        self.0 >> Self::leg_offset(leg_count)
    }
}

impl std::fmt::Display for TokenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.0.to_be_bytes()))
    }
}
