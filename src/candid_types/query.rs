use super::*;

use crate::{
    chunks::{ChunkScan, PositionChunkData},
    collateral::CollateralCheck,
    token_id::{Leg, LegParams},
};

#[derive(Debug, Clone, CandidType, Deserialize, Serialize, PartialEq, Eq)]
pub struct CandidLegParams {
    pub asset: u8,
    pub option_ratio: u8,
    pub is_long: bool,
    pub token_type: u8,
    pub risk_partner: u8,
    pub strike: i32,
    pub width: u16,
}

impl From<CandidLegParams> for LegParams {
    fn from(value: CandidLegParams) -> Self {
        LegParams {
            asset: value.asset,
            option_ratio: value.option_ratio,
            is_long: value.is_long,
            token_type: value.token_type,
            risk_partner: value.risk_partner,
            strike: value.strike,
            width: value.width,
        }
    }
}

#[derive(Debug, Clone, CandidType, Deserialize, Serialize)]
pub struct EncodeTokenIdArgs {
    pub pool_id: u64,
    pub legs: Vec<CandidLegParams>,
}

#[derive(Debug, Clone, CandidType, Deserialize, Serialize, PartialEq, Eq)]
pub struct CandidLeg {
    pub index: u8,
    pub pool: Principal,
    pub asset: u8,
    pub option_ratio: u8,
    pub is_long: bool,
    pub token_type: u8,
    pub risk_partner: u8,
    pub strike: i32,
    pub width: u16,
    pub tick_lower: i32,
    pub tick_upper: i32,
}

impl From<Leg> for CandidLeg {
    fn from(leg: Leg) -> Self {
        CandidLeg {
            index: leg.index,
            pool: leg.pool,
            asset: leg.asset,
            option_ratio: leg.option_ratio,
            is_long: leg.is_long,
            token_type: leg.token_type,
            risk_partner: leg.risk_partner,
            strike: leg.strike,
            width: leg.width,
            tick_lower: leg.tick_lower,
            tick_upper: leg.tick_upper,
        }
    }
}

#[derive(Debug, Clone, CandidType, Deserialize, Serialize)]
pub struct EquivalentPosition {
    pub token_id: Nat,
    pub position_size: Nat,
}

#[derive(Debug, Clone, CandidType, Deserialize, Serialize)]
pub struct ScanChunksArgs {
    pub pool_id: u64,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub width: u16,
}

#[derive(Debug, Clone, CandidType, Deserialize, Serialize)]
pub struct CandidChunkScan {
    pub strikes: Vec<i32>,
    // indexed by token type
    pub net_liquidity: Vec<Vec<Nat>>,
    pub removed_liquidity: Vec<Vec<Nat>>,
}

impl From<ChunkScan> for CandidChunkScan {
    fn from(scan: ChunkScan) -> Self {
        let to_nats =
            |values: &Vec<u128>| -> Vec<Nat> { values.iter().map(|v| Nat::from(*v)).collect() };
        CandidChunkScan {
            strikes: scan.strikes,
            net_liquidity: scan.net_liquidity.iter().map(to_nats).collect(),
            removed_liquidity: scan.removed_liquidity.iter().map(to_nats).collect(),
        }
    }
}

#[derive(Debug, Clone, CandidType, Deserialize, Serialize)]
pub struct CandidChunkData {
    pub net_liquidity: Nat,
    pub removed_liquidity: Nat,
}

pub fn chunk_data_to_candid(data: PositionChunkData, leg_count: usize) -> Vec<CandidChunkData> {
    data.iter()
        .take(leg_count)
        .map(|[net, removed]| CandidChunkData {
            net_liquidity: Nat::from(*net),
            removed_liquidity: Nat::from(*removed),
        })
        .collect()
}

/// Positions of one account in one pool.
#[derive(Debug, Clone, CandidType, Deserialize, Serialize)]
pub struct AccountPositionsArgs {
    pub pool_id: u64,
    pub account: Principal,
    pub positions: Vec<Nat>,
}

#[derive(Debug, Clone, CandidType, Deserialize, Serialize)]
pub struct CandidCollateralCheck {
    pub at_tick: i32,
    pub collateral_balance0: Nat,
    pub required_collateral0: Nat,
    pub collateral_balance1: Nat,
    pub required_collateral1: Nat,
}

impl From<CollateralCheck> for CandidCollateralCheck {
    fn from(check: CollateralCheck) -> Self {
        CandidCollateralCheck {
            at_tick: check.at_tick,
            collateral_balance0: u256_to_nat(check.token0.balance),
            required_collateral0: u256_to_nat(check.token0.required),
            collateral_balance1: u256_to_nat(check.token1.balance),
            required_collateral1: u256_to_nat(check.token1.required),
        }
    }
}

#[derive(Debug, Clone, CandidType, Deserialize, Serialize, PartialEq, Eq)]
pub struct LiquidationPrices {
    pub tick_down: i32,
    pub tick_up: i32,
}

#[derive(Debug, Clone, CandidType, Deserialize, Serialize)]
pub struct MaxPositionSizeArgs {
    pub pool_id: u64,
    pub account: Principal,
    // existing positions followed by the candidate
    pub positions: Vec<Nat>,
    pub candidate: Nat,
}

#[derive(Debug, Clone, CandidType, Deserialize, Serialize)]
pub struct MaxPositionSizeBounds {
    pub max_size_at_min_utilization: Nat,
    pub max_size_at_max_utilization: Nat,
}

#[derive(Debug, Clone, CandidType, Deserialize, Serialize)]
pub struct PortfolioValue {
    pub value0: Int,
    pub value1: Int,
}

#[derive(Debug, Clone, CandidType, Deserialize, Serialize)]
pub struct PortfolioValues {
    pub value0: Vec<Int>,
    pub value1: Vec<Int>,
}

#[derive(Debug, Clone, CandidType, Deserialize, Serialize)]
pub struct TickNets {
    pub tick_data: Vec<i32>,
    pub liquidity_nets: Vec<Nat>,
}
