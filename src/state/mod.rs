// [Query Canister State]
//  ├── AmmSnapshot (version)
//  │   ├── pools: PoolKey -> PoolState
//  │   ├── chunks: ChunkKey -> LiquidityChunkData
//  │   └── liquidity_nets: (PoolKey, tick) -> i128
//  ├── CollateralSnapshot (version)
//  │   ├── registry: PoolId -> PoolContext
//  │   ├── vaults: (PoolId, token) -> VaultState
//  │   ├── share_balances: (PoolId, account, token) -> shares
//  │   └── positions: (PoolId, account, TokenId) -> PositionRecord
//  └── RiskParameters
//
// [Stable Memory]
//  └── CONFIG: StableBTreeMap<u8, RiskParameters>

use std::{cell::RefCell, collections::BTreeMap};

use candid::Principal;
use ethnum::U256;
use ic_stable_structures::BTreeMap as StableBTreeMap;

use crate::{
    collateral::params::RiskParameters,
    ledger::{AmmLedger, CollateralLedger, LiquidityChunkData, PoolRegistry, PositionBalance},
    libraries::constants::DECIMALS,
    pool::types::{PoolContext, PoolId, PoolKey, PoolState},
    token_id::TokenId,
};

use memory_manager::{StableMemory, config_memory};

pub mod memory_manager;
pub mod storable_impl;

#[cfg(test)]
mod tests;

const RISK_PARAMETERS_KEY: u8 = 0;

thread_local! {
    pub static STATE: RefCell<State> = RefCell::new(State::default());

    static CONFIG: RefCell<StableBTreeMap<u8, RiskParameters, StableMemory>> =
        RefCell::new(StableBTreeMap::init(config_memory()));
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct ChunkKey {
    pub pool_key: PoolKey,
    pub owner: Principal,
    pub token_type: u8,
    pub tick_lower: i32,
    pub tick_upper: i32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AmmSnapshot {
    pub version: u64,
    pub pools: BTreeMap<PoolKey, PoolState>,
    pub chunks: BTreeMap<ChunkKey, LiquidityChunkData>,
    pub liquidity_nets: BTreeMap<(PoolKey, i32), i128>,
}

/// Share accounting of one collateral vault.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VaultState {
    pub total_assets: u128,
    pub total_shares: u128,
    // assets currently deployed in the AMM by short legs
    pub assets_in_amm: u128,
}

impl VaultState {
    pub fn utilization(&self) -> u16 {
        if self.total_assets == 0 {
            return 0;
        }
        let utilization = U256::from(self.assets_in_amm) * U256::from(DECIMALS)
            / U256::from(self.total_assets);
        u128::try_from(utilization)
            .unwrap_or(DECIMALS)
            .min(DECIMALS) as u16
    }

    pub fn convert_to_assets(&self, shares: u128) -> U256 {
        if self.total_shares == 0 {
            return U256::from(shares);
        }
        // both factors fit in 128 bits so the product cannot overflow
        U256::from(shares) * U256::from(self.total_assets) / U256::from(self.total_shares)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PositionRecord {
    pub balance: PositionBalance,
    pub premia: [[u128; 2]; 4],
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CollateralSnapshot {
    pub version: u64,
    pub registry: BTreeMap<PoolId, PoolContext>,
    pub vaults: BTreeMap<(PoolId, u8), VaultState>,
    pub share_balances: BTreeMap<(PoolId, Principal, u8), u128>,
    pub positions: BTreeMap<(PoolId, Principal, TokenId), PositionRecord>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct State {
    amm: AmmSnapshot,
    collateral: CollateralSnapshot,
    risk_parameters: RiskParameters,
}

impl State {
    pub fn new(risk_parameters: RiskParameters) -> Self {
        Self {
            risk_parameters,
            ..Default::default()
        }
    }

    pub fn risk_parameters(&self) -> &RiskParameters {
        &self.risk_parameters
    }

    pub fn set_risk_parameters(&mut self, risk_parameters: RiskParameters) {
        self.risk_parameters = risk_parameters;
    }

    pub fn replace_amm_snapshot(&mut self, snapshot: AmmSnapshot) {
        self.amm = snapshot;
    }

    pub fn replace_collateral_snapshot(&mut self, snapshot: CollateralSnapshot) {
        self.collateral = snapshot;
    }

    pub fn set_versions(&mut self, version: u64) {
        self.amm.version = version;
        self.collateral.version = version;
    }

    pub fn set_amm_version(&mut self, version: u64) {
        self.amm.version = version;
    }

    /// Registers the pool and sets the AMM price state of its key.
    pub fn set_pool(&mut self, pool: PoolContext, pool_state: PoolState) {
        self.amm.pools.insert(pool.pool_key.clone(), pool_state);
        self.collateral.registry.insert(pool.pool_id, pool);
    }

    pub fn set_pool_state(&mut self, pool_key: &PoolKey, pool_state: PoolState) {
        self.amm.pools.insert(pool_key.clone(), pool_state);
    }

    pub fn get_chunk(&self, key: &ChunkKey) -> LiquidityChunkData {
        self.amm.chunks.get(key).copied().unwrap_or_default()
    }

    pub fn set_chunk(&mut self, key: ChunkKey, data: LiquidityChunkData) {
        self.amm.chunks.insert(key, data);
    }

    pub fn set_liquidity_net(&mut self, pool_key: &PoolKey, tick: i32, liquidity_net: i128) {
        self.amm
            .liquidity_nets
            .insert((pool_key.clone(), tick), liquidity_net);
    }

    pub fn get_vault(&self, pool_id: PoolId, token: u8) -> VaultState {
        self.collateral
            .vaults
            .get(&(pool_id, token))
            .copied()
            .unwrap_or_default()
    }

    pub fn set_vault(&mut self, pool_id: PoolId, token: u8, vault: VaultState) {
        self.collateral.vaults.insert((pool_id, token), vault);
    }

    pub fn set_share_balance(&mut self, pool_id: PoolId, account: Principal, token: u8, shares: u128) {
        self.collateral
            .share_balances
            .insert((pool_id, account, token), shares);
    }

    pub fn set_position(
        &mut self,
        pool_id: PoolId,
        account: Principal,
        token_id: TokenId,
        record: PositionRecord,
    ) {
        self.collateral
            .positions
            .insert((pool_id, account, token_id), record);
    }

    #[cfg(test)]
    pub fn remove_position(&mut self, pool_id: PoolId, account: Principal, token_id: TokenId) {
        self.collateral.positions.remove(&(pool_id, account, token_id));
    }

    pub fn get_positions_by_owner(&self, pool_id: PoolId, owner: Principal) -> Vec<TokenId> {
        self.collateral
            .positions
            .keys()
            .filter(|(pool, account, _)| *pool == pool_id && *account == owner)
            .map(|(_, _, token_id)| *token_id)
            .collect()
    }
}

impl AmmLedger for State {
    fn amm_version(&self) -> u64 {
        self.amm.version
    }

    fn pool_state(&self, pool_key: &PoolKey) -> Option<PoolState> {
        self.amm.pools.get(pool_key).copied()
    }

    fn account_liquidity(
        &self,
        pool_key: &PoolKey,
        owner: Principal,
        token_type: u8,
        tick_lower: i32,
        tick_upper: i32,
    ) -> LiquidityChunkData {
        self.get_chunk(&ChunkKey {
            pool_key: pool_key.clone(),
            owner,
            token_type,
            tick_lower,
            tick_upper,
        })
    }

    fn liquidity_net_at_tick(&self, pool_key: &PoolKey, tick: i32) -> i128 {
        self.amm
            .liquidity_nets
            .get(&(pool_key.clone(), tick))
            .copied()
            .unwrap_or_default()
    }
}

impl CollateralLedger for State {
    fn collateral_version(&self) -> u64 {
        self.collateral.version
    }

    fn share_balance(&self, pool_id: PoolId, account: Principal, token: u8) -> u128 {
        self.collateral
            .share_balances
            .get(&(pool_id, account, token))
            .copied()
            .unwrap_or_default()
    }

    fn convert_to_assets(&self, pool_id: PoolId, token: u8, shares: u128) -> U256 {
        self.get_vault(pool_id, token).convert_to_assets(shares)
    }

    fn pool_utilization(&self, pool_id: PoolId) -> [u16; 2] {
        [
            self.get_vault(pool_id, 0).utilization(),
            self.get_vault(pool_id, 1).utilization(),
        ]
    }

    fn position_balance(
        &self,
        pool_id: PoolId,
        account: Principal,
        token_id: TokenId,
    ) -> Option<PositionBalance> {
        self.collateral
            .positions
            .get(&(pool_id, account, token_id))
            .map(|record| record.balance)
    }

    fn positions_by_owner(&self, pool_id: PoolId, account: Principal) -> Vec<TokenId> {
        self.get_positions_by_owner(pool_id, account)
    }

    fn accumulated_premia(
        &self,
        pool_id: PoolId,
        account: Principal,
        token_id: TokenId,
    ) -> [[u128; 2]; 4] {
        self.collateral
            .positions
            .get(&(pool_id, account, token_id))
            .map(|record| record.premia)
            .unwrap_or_default()
    }
}

impl PoolRegistry for State {
    fn resolve_pool(&self, pool_id: PoolId) -> Option<PoolContext> {
        self.collateral.registry.get(&pool_id).cloned()
    }
}

pub fn read_state<R>(f: impl FnOnce(&State) -> R) -> R {
    STATE.with(|cell| f(&cell.borrow()))
}

/// Mutates (part of) the current state using `f`.
pub fn mutate_state<F, R>(f: F) -> R
where
    F: FnOnce(&mut State) -> R,
{
    STATE.with(|cell| f(&mut cell.borrow_mut()))
}

/// Writes the risk parameters to stable memory so they survive upgrades.
pub fn persist_risk_parameters(risk_parameters: RiskParameters) {
    CONFIG.with(|cell| {
        cell.borrow_mut()
            .insert(RISK_PARAMETERS_KEY, risk_parameters);
    });
}

pub fn stored_risk_parameters() -> Option<RiskParameters> {
    CONFIG.with(|cell| cell.borrow().get(&RISK_PARAMETERS_KEY))
}
