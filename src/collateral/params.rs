use candid::CandidType;
use serde::{Deserialize, Serialize};

use crate::libraries::constants::{
    DECIMALS, DEFAULT_BUYER_COLLATERAL_RATIO, DEFAULT_REQUIRED_BASE_SIZE,
    DEFAULT_SATURATED_POOL_UTILIZATION, DEFAULT_SELLER_COLLATERAL_RATIO,
    DEFAULT_SIZING_MAX_UTILIZATION, DEFAULT_SIZING_MIN_UTILIZATION, DEFAULT_SIZING_TOLERANCE,
    DEFAULT_SOLVENCY_BUFFER, DEFAULT_TARGET_POOL_UTILIZATION, MAX_POSITION_SIZE,
};

/// Knobs of the collateral model. Every ratio is in basis points.
#[derive(CandidType, Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct RiskParameters {
    pub seller_collateral_ratio: u16,
    pub buyer_collateral_ratio: u16,
    pub target_pool_utilization: u16,
    pub saturated_pool_utilization: u16,
    // required * buffer must stay below balance * DECIMALS
    pub solvency_buffer: u16,
    pub sizing_min_utilization: u16,
    pub sizing_max_utilization: u16,
    pub sizing_tolerance: u16,
    pub required_base_size: u128,
}

impl Default for RiskParameters {
    fn default() -> Self {
        Self {
            seller_collateral_ratio: DEFAULT_SELLER_COLLATERAL_RATIO,
            buyer_collateral_ratio: DEFAULT_BUYER_COLLATERAL_RATIO,
            target_pool_utilization: DEFAULT_TARGET_POOL_UTILIZATION,
            saturated_pool_utilization: DEFAULT_SATURATED_POOL_UTILIZATION,
            solvency_buffer: DEFAULT_SOLVENCY_BUFFER,
            sizing_min_utilization: DEFAULT_SIZING_MIN_UTILIZATION,
            sizing_max_utilization: DEFAULT_SIZING_MAX_UTILIZATION,
            sizing_tolerance: DEFAULT_SIZING_TOLERANCE,
            required_base_size: DEFAULT_REQUIRED_BASE_SIZE,
        }
    }
}

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub enum InvalidRiskParameters {
    RatioAboveOne(String),
    UtilizationThresholdsUnordered,
    SizingBandUnordered,
    SolvencyBufferBelowOne,
    RequiredBaseSizeOutOfRange,
}

impl RiskParameters {
    pub fn validate(&self) -> Result<(), InvalidRiskParameters> {
        let bps_fields = [
            ("seller_collateral_ratio", self.seller_collateral_ratio),
            ("buyer_collateral_ratio", self.buyer_collateral_ratio),
            ("target_pool_utilization", self.target_pool_utilization),
            ("saturated_pool_utilization", self.saturated_pool_utilization),
            ("sizing_min_utilization", self.sizing_min_utilization),
            ("sizing_max_utilization", self.sizing_max_utilization),
            ("sizing_tolerance", self.sizing_tolerance),
        ];
        if let Some((name, _)) = bps_fields
            .iter()
            .find(|(_, value)| *value as u128 > DECIMALS)
        {
            return Err(InvalidRiskParameters::RatioAboveOne(name.to_string()));
        }

        if self.target_pool_utilization >= self.saturated_pool_utilization {
            return Err(InvalidRiskParameters::UtilizationThresholdsUnordered);
        }
        if self.sizing_min_utilization > self.sizing_max_utilization {
            return Err(InvalidRiskParameters::SizingBandUnordered);
        }
        if (self.solvency_buffer as u128) < DECIMALS {
            return Err(InvalidRiskParameters::SolvencyBufferBelowOne);
        }
        if self.required_base_size == 0 || self.required_base_size > MAX_POSITION_SIZE {
            return Err(InvalidRiskParameters::RequiredBaseSizeOutOfRange);
        }
        Ok(())
    }

    /// Seller collateral ratio at `utilization`: the base ratio up to the target,
    /// 100% from the saturation point, linear in between.
    pub fn seller_ratio(&self, utilization: u16) -> u128 {
        self.interpolate(
            utilization,
            self.seller_collateral_ratio as u128,
            DECIMALS,
        )
    }

    /// Buyer collateral ratio at `utilization`: the base ratio up to the target,
    /// twice the base from the saturation point, linear in between.
    pub fn buyer_ratio(&self, utilization: u16) -> u128 {
        let base = self.buyer_collateral_ratio as u128;
        self.interpolate(utilization, base, 2 * base)
    }

    fn interpolate(&self, utilization: u16, low: u128, high: u128) -> u128 {
        let utilization = utilization as u128;
        let target = self.target_pool_utilization as u128;
        let saturated = self.saturated_pool_utilization as u128;

        if utilization <= target {
            low
        } else if utilization >= saturated {
            high
        } else {
            low + high.saturating_sub(low) * (utilization - target) / (saturated - target)
        }
    }
}
