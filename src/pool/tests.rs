use candid::Principal;

use super::types::{PoolFee, PoolId, PoolKey, PoolTickSpacing};

#[test]
fn floor_rounds_negative_ticks_down() {
    let spacing = PoolTickSpacing(10);
    assert_eq!(spacing.floor(15), 10);
    assert_eq!(spacing.floor(-15), -20);
    assert_eq!(spacing.floor(-10), -10);
    assert_eq!(spacing.floor(-1), -10);
    assert_eq!(spacing.floor(0), 0);
}

#[test]
fn ceil_rounds_up_on_both_signs() {
    let spacing = PoolTickSpacing(60);
    assert_eq!(spacing.ceil(1), 60);
    assert_eq!(spacing.ceil(-1), 0);
    assert_eq!(spacing.ceil(-61), -60);
    assert_eq!(spacing.ceil(120), 120);
}

#[test]
fn alignment_of_negative_ticks() {
    let spacing = PoolTickSpacing(10);
    assert!(spacing.is_aligned(-30));
    assert!(!spacing.is_aligned(-35));
}

#[test]
fn pool_id_fields_round_trip() {
    let pool_id = PoolId::new(0xAB_CDEF_0123, 7, 60);
    assert_eq!(pool_id.pool_hash(), 0xAB_CDEF_0123);
    assert_eq!(pool_id.vegoid(), 7);
    assert_eq!(pool_id.tick_spacing(), PoolTickSpacing(60));
}

#[test]
fn pool_id_masks_oversized_hash() {
    let pool_id = PoolId::new(u64::MAX, 0, 1);
    assert_eq!(pool_id.pool_hash(), PoolId::POOL_HASH_MASK);
    assert_eq!(pool_id.vegoid(), 0);
}

#[test]
fn pool_key_sorts_tokens() {
    let a = Principal::from_slice(&[1]);
    let b = Principal::from_slice(&[2]);
    let key = PoolKey::new(b, a, PoolFee(500), PoolTickSpacing(10));
    assert_eq!(key.token0, a);
    assert_eq!(key.token1, b);
}
