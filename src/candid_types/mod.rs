use candid::{CandidType, Deserialize, Int, Nat, Principal};
use ethnum::{I256, U256};
use serde::Serialize;

use crate::{
    collateral::params::RiskParameters,
    errors::QueryError,
    libraries::safe_cast::{big_uint_to_u256, i256_to_big_int, u256_to_big_uint},
    pool::types::{PoolFee, PoolKey, PoolTickSpacing},
    token_id::{InvalidLegReason, TokenId},
};

pub mod query;
pub mod snapshot;


#[derive(Debug, Clone, CandidType, Deserialize, Serialize, PartialEq, Eq)]
pub enum CandidQueryError {
    InvalidTokenIdParameter { leg: u8, reason: InvalidLegReason },
    DuplicateChunk { leg: u8, other: u8 },
    IncompatiblePartner { leg: u8, partner: u8 },
    PositionListMismatch,
    StaleOrInconsistentSnapshot { amm_version: u64, collateral_version: u64 },
    PoolNotFound { pool_id: u64 },
    PoolMismatch { token_id: Nat, pool_id: u64 },
    TickOutOfBounds { tick: i32 },
    InvalidWidth { width: u16 },
    MathOverflow,
    InvalidArgument(String),
}

impl From<QueryError> for CandidQueryError {
    fn from(error: QueryError) -> Self {
        match error {
            QueryError::InvalidTokenIdParameter { leg, reason } => {
                Self::InvalidTokenIdParameter { leg, reason }
            }
            QueryError::DuplicateChunk { leg, other } => Self::DuplicateChunk { leg, other },
            QueryError::IncompatiblePartner { leg, partner } => {
                Self::IncompatiblePartner { leg, partner }
            }
            QueryError::PositionListMismatch => Self::PositionListMismatch,
            QueryError::StaleOrInconsistentSnapshot {
                amm_version,
                collateral_version,
            } => Self::StaleOrInconsistentSnapshot {
                amm_version,
                collateral_version,
            },
            QueryError::PoolNotFound(pool_id) => Self::PoolNotFound { pool_id: pool_id.0 },
            QueryError::PoolMismatch { token_id, pool_id } => Self::PoolMismatch {
                token_id: token_id.into(),
                pool_id: pool_id.0,
            },
            QueryError::TickOutOfBounds(tick) => Self::TickOutOfBounds { tick },
            QueryError::InvalidWidth(width) => Self::InvalidWidth { width },
            QueryError::MathOverflow => Self::MathOverflow,
        }
    }
}

#[derive(Debug, Clone, CandidType, Deserialize, Serialize)]
pub struct InitArgs {
    pub risk_parameters: Option<RiskParameters>,
}

impl TryFrom<Nat> for TokenId {
    type Error = CandidQueryError;

    fn try_from(value: Nat) -> Result<Self, Self::Error> {
        big_uint_to_u256(value.0)
            .map(TokenId)
            .map_err(CandidQueryError::InvalidArgument)
    }
}

impl From<TokenId> for Nat {
    fn from(value: TokenId) -> Self {
        Nat(u256_to_big_uint(value.0))
    }
}

pub fn token_ids_from_nats(values: Vec<Nat>) -> Result<Vec<TokenId>, CandidQueryError> {
    values.into_iter().map(TokenId::try_from).collect()
}

pub fn u256_to_nat(value: U256) -> Nat {
    Nat(u256_to_big_uint(value))
}

pub fn i256_to_int(value: I256) -> Int {
    Int(i256_to_big_int(value))
}

pub fn nat_to_u128(value: Nat) -> Result<u128, CandidQueryError> {
    u128::try_from(value.0)
        .map_err(|_e| CandidQueryError::InvalidArgument(String::from("amount exceeds 128 bits")))
}

#[derive(Debug, Clone, CandidType, Deserialize, Serialize, PartialEq, Eq)]
pub struct CandidPoolKey {
    pub token0: Principal,
    pub token1: Principal,
    pub fee: Nat,
    pub tick_spacing: i32,
}

impl TryFrom<CandidPoolKey> for PoolKey {
    type Error = CandidQueryError;

    fn try_from(value: CandidPoolKey) -> Result<Self, Self::Error> {
        let fee = PoolFee::try_from(value.fee).map_err(CandidQueryError::InvalidArgument)?;
        if value.tick_spacing <= 0 {
            return Err(CandidQueryError::InvalidArgument(String::from(
                "tick spacing must be positive",
            )));
        }
        Ok(PoolKey::new(
            value.token0,
            value.token1,
            fee,
            PoolTickSpacing(value.tick_spacing),
        ))
    }
}

impl From<PoolKey> for CandidPoolKey {
    fn from(value: PoolKey) -> Self {
        CandidPoolKey {
            token0: value.token0,
            token1: value.token1,
            fee: value.fee.0.into(),
            tick_spacing: value.tick_spacing.0,
        }
    }
}
