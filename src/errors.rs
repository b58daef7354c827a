use crate::{
    libraries::{
        full_math::FullMathError, liquidity_amounts::LiquidityAmountsError,
        tick_math::TickMathError,
    },
    pool::types::PoolId,
    token_id::{InvalidLegReason, TokenId, TokenIdError},
};

/// Failure of a risk query. Every variant is a deterministic function of the
/// inputs and the snapshot, so retrying without a state change fails the same way.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryError {
    InvalidTokenIdParameter {
        leg: u8,
        reason: InvalidLegReason,
    },
    DuplicateChunk {
        leg: u8,
        other: u8,
    },
    IncompatiblePartner {
        leg: u8,
        partner: u8,
    },
    // candidate position is not the last element of the supplied list
    PositionListMismatch,
    StaleOrInconsistentSnapshot {
        amm_version: u64,
        collateral_version: u64,
    },
    PoolNotFound(PoolId),
    PoolMismatch {
        token_id: TokenId,
        pool_id: PoolId,
    },
    TickOutOfBounds(i32),
    InvalidWidth(u16),
    MathOverflow,
}

impl From<TokenIdError> for QueryError {
    fn from(error: TokenIdError) -> Self {
        match error {
            TokenIdError::InvalidTokenIdParameter { leg, reason } => {
                Self::InvalidTokenIdParameter { leg, reason }
            }
            TokenIdError::DuplicateChunk { leg, other } => Self::DuplicateChunk { leg, other },
            TokenIdError::IncompatiblePartner { leg, partner } => {
                Self::IncompatiblePartner { leg, partner }
            }
        }
    }
}

impl From<FullMathError> for QueryError {
    fn from(_error: FullMathError) -> Self {
        Self::MathOverflow
    }
}

impl From<LiquidityAmountsError> for QueryError {
    fn from(_error: LiquidityAmountsError) -> Self {
        Self::MathOverflow
    }
}

impl From<TickMathError> for QueryError {
    fn from(error: TickMathError) -> Self {
        match error {
            TickMathError::TickOutOfBounds(tick) => Self::TickOutOfBounds(tick),
        }
    }
}
