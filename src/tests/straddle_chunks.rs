use super::fixtures::*;
use crate::{
    chunks::{get_chunk_data, scan_chunks},
    ledger::AmmLedger,
};

#[test]
fn scan_finds_both_legs_of_a_minted_straddle() {
    let mut fixture = Fixture::new(0);
    let spacing = TICK_SPACING as i32;
    let legs = with_self_partners(&[
        short_leg(0, 0, 0, 2),
        short_leg(0, 1, 6 * spacing, 2),
    ]);
    let token_id = fixture.token_id(&legs);
    fixture.mint(account(), token_id, 10 * ONE_ETHER);

    let scan = scan_chunks(&fixture.state, fixture.pool_id(), -100, 200, 2).unwrap();
    assert_eq!(scan.strikes, vec![0, 6 * spacing]);

    for (index, leg) in token_id.decode(fixture.pool.address).iter().enumerate() {
        // each reported strike is the midpoint of the leg's range
        assert_eq!(scan.strikes[index], (leg.tick_lower + leg.tick_upper) / 2);
        for token_type in 0..2u8 {
            let direct = fixture.state.account_liquidity(
                &fixture.pool.pool_key,
                fixture.pool.address,
                token_type,
                leg.tick_lower,
                leg.tick_upper,
            );
            assert_eq!(scan.net_liquidity[token_type as usize][index], direct.net);
            assert_eq!(
                scan.removed_liquidity[token_type as usize][index],
                direct.removed
            );
        }
    }
    assert!(scan.net_liquidity[0][0] > 0);
    assert_eq!(scan.net_liquidity[1][0], 0);
    assert_eq!(scan.net_liquidity[0][1], 0);
    assert!(scan.net_liquidity[1][1] > 0);

    let data = get_chunk_data(&fixture.state, fixture.pool_id(), &[token_id]).unwrap();
    assert_eq!(data[0][0], [scan.net_liquidity[0][0], 0]);
    assert_eq!(data[0][1], [scan.net_liquidity[1][1], 0]);
    assert_eq!(data[0][2], [0, 0]);
}
