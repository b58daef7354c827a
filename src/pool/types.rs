use candid::{Nat, Principal};

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct PoolFee(pub u32);

impl TryFrom<Nat> for PoolFee {
    type Error = String;

    fn try_from(value: Nat) -> Result<Self, Self::Error> {
        u32::try_from(value.0)
            .map(PoolFee)
            .map_err(|err| format!("{}", err))
    }
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Debug, Ord)]
pub struct PoolTickSpacing(pub i32);

impl PoolTickSpacing {
    /// Rounds toward negative infinity onto the spacing grid.
    /// `/` truncates toward zero, which would move negative ticks up a bucket.
    pub fn floor(&self, tick: i32) -> i32 {
        tick.div_euclid(self.0) * self.0
    }

    pub fn ceil(&self, tick: i32) -> i32 {
        let floored = self.floor(tick);
        if floored == tick {
            floored
        } else {
            floored + self.0
        }
    }

    pub fn is_aligned(&self, tick: i32) -> bool {
        tick.rem_euclid(self.0) == 0
    }
}

/// 64-bit pool identifier carried in the low bits of every TokenId.
///
/// | pool hash (40 bits) | vegoid (8 bits) | tick spacing (16 bits) |
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub struct PoolId(pub u64);

impl PoolId {
    pub const POOL_HASH_MASK: u64 = (1 << 40) - 1;

    pub fn new(pool_hash: u64, vegoid: u8, tick_spacing: u16) -> Self {
        PoolId(
            (pool_hash & Self::POOL_HASH_MASK)
                | ((vegoid as u64) << 40)
                | ((tick_spacing as u64) << 48),
        )
    }

    pub fn pool_hash(&self) -> u64 {
        self.0 & Self::POOL_HASH_MASK
    }

    pub fn vegoid(&self) -> u8 {
        ((self.0 >> 40) & 0xFF) as u8
    }

    pub fn tick_spacing(&self) -> PoolTickSpacing {
        PoolTickSpacing(((self.0 >> 48) & 0xFFFF) as i32)
    }
}

/// Key of the backing AMM pool.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct PoolKey {
    pub token0: Principal, // Token0 identifier
    pub token1: Principal, // Token1 identifier
    pub fee: PoolFee,      // Fee tier (e.g., 500 for 0.05%)
    pub tick_spacing: PoolTickSpacing,
}

impl PoolKey {
    pub fn new(
        token_a: Principal,
        token_b: Principal,
        fee: PoolFee,
        tick_spacing: PoolTickSpacing,
    ) -> Self {
        // token 0 is always the smaller token
        let (token0, token1) = if token_a < token_b {
            (token_a, token_b)
        } else {
            (token_b, token_a)
        };
        PoolKey {
            token0,
            token1,
            fee,
            tick_spacing,
        }
    }
}

/// A pool id resolved through the registry.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PoolContext {
    pub pool_id: PoolId,
    pub pool_key: PoolKey,
    // options pool; owns every chunk the positions deploy in the AMM
    pub address: Principal,
}

impl PoolContext {
    pub fn tick_spacing(&self) -> PoolTickSpacing {
        self.pool_key.tick_spacing
    }
}

/// Current state of the AMM pool as read from the ledger.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct PoolState {
    pub tick: i32,       // Current tick index
    pub liquidity: u128, // Total active liquidity
}
