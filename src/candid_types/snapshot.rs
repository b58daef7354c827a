use super::*;

use crate::{
    ledger::{LiquidityChunkData, PositionBalance},
    pool::types::{PoolContext, PoolId, PoolState},
    state::{AmmSnapshot, ChunkKey, CollateralSnapshot, PositionRecord, VaultState},
};

#[derive(Debug, Clone, CandidType, Deserialize, Serialize)]
pub struct CandidPoolState {
    pub pool_key: CandidPoolKey,
    pub tick: i32,
    pub liquidity: Nat,
}

#[derive(Debug, Clone, CandidType, Deserialize, Serialize)]
pub struct CandidAccountChunk {
    pub pool_key: CandidPoolKey,
    pub owner: Principal,
    pub token_type: u8,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub net_liquidity: Nat,
    pub removed_liquidity: Nat,
}

#[derive(Debug, Clone, CandidType, Deserialize, Serialize)]
pub struct CandidLiquidityNet {
    pub pool_key: CandidPoolKey,
    pub tick: i32,
    pub liquidity_net: Int,
}

#[derive(Debug, Clone, CandidType, Deserialize, Serialize)]
pub struct LoadAmmSnapshotArgs {
    pub version: u64,
    pub pools: Vec<CandidPoolState>,
    pub chunks: Vec<CandidAccountChunk>,
    pub liquidity_nets: Vec<CandidLiquidityNet>,
}

impl TryFrom<LoadAmmSnapshotArgs> for AmmSnapshot {
    type Error = CandidQueryError;

    fn try_from(args: LoadAmmSnapshotArgs) -> Result<Self, Self::Error> {
        let mut snapshot = AmmSnapshot {
            version: args.version,
            ..Default::default()
        };

        for pool in args.pools {
            snapshot.pools.insert(
                PoolKey::try_from(pool.pool_key)?,
                PoolState {
                    tick: pool.tick,
                    liquidity: nat_to_u128(pool.liquidity)?,
                },
            );
        }

        for chunk in args.chunks {
            if chunk.token_type > 1 || chunk.tick_lower >= chunk.tick_upper {
                return Err(CandidQueryError::InvalidArgument(format!(
                    "invalid chunk {} [{}, {}]",
                    chunk.token_type, chunk.tick_lower, chunk.tick_upper
                )));
            }
            snapshot.chunks.insert(
                ChunkKey {
                    pool_key: PoolKey::try_from(chunk.pool_key)?,
                    owner: chunk.owner,
                    token_type: chunk.token_type,
                    tick_lower: chunk.tick_lower,
                    tick_upper: chunk.tick_upper,
                },
                LiquidityChunkData {
                    net: nat_to_u128(chunk.net_liquidity)?,
                    removed: nat_to_u128(chunk.removed_liquidity)?,
                },
            );
        }

        for net in args.liquidity_nets {
            let liquidity_net = i128::try_from(net.liquidity_net.0).map_err(|_e| {
                CandidQueryError::InvalidArgument(String::from("liquidity net exceeds 128 bits"))
            })?;
            snapshot
                .liquidity_nets
                .insert((PoolKey::try_from(net.pool_key)?, net.tick), liquidity_net);
        }

        Ok(snapshot)
    }
}

#[derive(Debug, Clone, CandidType, Deserialize, Serialize)]
pub struct CandidPool {
    pub pool_id: u64,
    pub pool_key: CandidPoolKey,
    pub address: Principal,
}

#[derive(Debug, Clone, CandidType, Deserialize, Serialize)]
pub struct CandidVault {
    pub pool_id: u64,
    pub token: u8,
    pub total_assets: Nat,
    pub total_shares: Nat,
    pub assets_in_amm: Nat,
}

#[derive(Debug, Clone, CandidType, Deserialize, Serialize)]
pub struct CandidShareBalance {
    pub pool_id: u64,
    pub account: Principal,
    pub token: u8,
    pub shares: Nat,
}

#[derive(Debug, Clone, CandidType, Deserialize, Serialize)]
pub struct CandidPositionRecord {
    pub pool_id: u64,
    pub account: Principal,
    pub token_id: Nat,
    pub position_size: Nat,
    pub utilizations: (u16, u16),
    // per leg: (token0, token1)
    pub premia: Vec<(Nat, Nat)>,
}

#[derive(Debug, Clone, CandidType, Deserialize, Serialize)]
pub struct LoadCollateralSnapshotArgs {
    pub version: u64,
    pub pools: Vec<CandidPool>,
    pub vaults: Vec<CandidVault>,
    pub share_balances: Vec<CandidShareBalance>,
    pub positions: Vec<CandidPositionRecord>,
}

fn check_token(token: u8) -> Result<u8, CandidQueryError> {
    if token > 1 {
        return Err(CandidQueryError::InvalidArgument(format!(
            "token index {} out of range",
            token
        )));
    }
    Ok(token)
}

impl TryFrom<LoadCollateralSnapshotArgs> for CollateralSnapshot {
    type Error = CandidQueryError;

    fn try_from(args: LoadCollateralSnapshotArgs) -> Result<Self, Self::Error> {
        let mut snapshot = CollateralSnapshot {
            version: args.version,
            ..Default::default()
        };

        for pool in args.pools {
            let pool_id = PoolId(pool.pool_id);
            let pool_key = PoolKey::try_from(pool.pool_key)?;
            if pool_key.tick_spacing != pool_id.tick_spacing() {
                return Err(CandidQueryError::InvalidArgument(format!(
                    "pool {} tick spacing does not match its key",
                    pool.pool_id
                )));
            }
            snapshot.registry.insert(
                pool_id,
                PoolContext {
                    pool_id,
                    pool_key,
                    address: pool.address,
                },
            );
        }

        for vault in args.vaults {
            snapshot.vaults.insert(
                (PoolId(vault.pool_id), check_token(vault.token)?),
                VaultState {
                    total_assets: nat_to_u128(vault.total_assets)?,
                    total_shares: nat_to_u128(vault.total_shares)?,
                    assets_in_amm: nat_to_u128(vault.assets_in_amm)?,
                },
            );
        }

        for balance in args.share_balances {
            snapshot.share_balances.insert(
                (
                    PoolId(balance.pool_id),
                    balance.account,
                    check_token(balance.token)?,
                ),
                nat_to_u128(balance.shares)?,
            );
        }

        for position in args.positions {
            if position.premia.len() > 4 {
                return Err(CandidQueryError::InvalidArgument(String::from(
                    "premia for more than four legs",
                )));
            }
            let mut premia = [[0u128; 2]; 4];
            for (index, (token0, token1)) in position.premia.into_iter().enumerate() {
                premia[index] = [nat_to_u128(token0)?, nat_to_u128(token1)?];
            }
            snapshot.positions.insert(
                (
                    PoolId(position.pool_id),
                    position.account,
                    TokenId::try_from(position.token_id)?,
                ),
                PositionRecord {
                    balance: PositionBalance {
                        position_size: nat_to_u128(position.position_size)?,
                        utilizations: [position.utilizations.0, position.utilizations.1],
                    },
                    premia,
                },
            );
        }

        Ok(snapshot)
    }
}
