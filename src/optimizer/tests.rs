use proptest::prelude::*;

use super::{optimize_risk_partners, partner_assignments};
use crate::{
    collateral::get_required_base,
    errors::QueryError,
    pool::types::PoolId,
    tests::fixtures::*,
    token_id::{LegParams, TokenId},
};

fn optimize(fixture: &Fixture, token_id: TokenId) -> TokenId {
    optimize_risk_partners(&fixture.state, &fixture.params, fixture.pool_id(), 0, token_id)
        .unwrap()
}

fn required_base(fixture: &Fixture, token_id: &TokenId) -> ethnum::U256 {
    get_required_base(&fixture.state, &fixture.params, fixture.pool_id(), token_id, 0).unwrap()
}

fn partners(token_id: &TokenId) -> Vec<u8> {
    token_id.legs().iter().map(|leg| leg.risk_partner).collect()
}

#[test]
fn enumerates_every_partial_matching() {
    let counts: Vec<usize> = (1..=4).map(|legs| partner_assignments(legs).len()).collect();
    assert_eq!(counts, vec![1, 2, 4, 10]);

    // all legs alone comes first
    assert_eq!(partner_assignments(4)[0], [0, 1, 2, 3]);
    for assignment in partner_assignments(4) {
        for (index, partner) in assignment.iter().enumerate() {
            // partnering is always mutual
            assert_eq!(assignment[*partner as usize], index as u8);
        }
    }
}

#[test]
fn pairs_a_short_strangle() {
    let fixture = Fixture::new(0);
    let token_id = fixture.token_id(&with_self_partners(&[
        short_leg(0, 0, 1_000, 10),
        short_leg(0, 1, -1_000, 10),
    ]));

    let optimized = optimize(&fixture, token_id);
    assert_eq!(partners(&optimized), vec![1, 0]);
    assert!(required_base(&fixture, &optimized) < required_base(&fixture, &token_id));
    optimized.validate().unwrap();
}

#[test]
fn pairs_a_spread_and_leaves_the_rest() {
    let fixture = Fixture::new(0);
    let token_id = fixture.token_id(&with_self_partners(&[
        short_leg(0, 0, 1_000, 10),
        long_leg(0, 1, -3_000, 10),
        long_leg(0, 0, 1_200, 10),
    ]));

    let optimized = optimize(&fixture, token_id);
    assert_eq!(partners(&optimized), vec![2, 1, 0]);
}

#[test]
fn single_leg_is_returned_unchanged() {
    let fixture = Fixture::new(0);
    let token_id = fixture.token_id(&[short_leg(1, 1, -500, 4)]);
    assert_eq!(optimize(&fixture, token_id), token_id);
}

#[test]
fn long_legs_across_token_types_stay_apart() {
    let fixture = Fixture::new(0);
    let token_id = fixture.token_id(&with_self_partners(&[
        long_leg(0, 0, 1_000, 10),
        long_leg(0, 1, -1_000, 10),
    ]));
    assert_eq!(optimize(&fixture, token_id), token_id);
}

#[test]
fn already_optimal_input_is_kept() {
    let fixture = Fixture::new(0);
    let strangle = fixture.token_id(&[
        LegParams {
            risk_partner: 1,
            ..short_leg(0, 0, 1_000, 10)
        },
        LegParams {
            risk_partner: 0,
            ..short_leg(0, 1, -1_000, 10)
        },
    ]);
    assert_eq!(optimize(&fixture, strangle), strangle);
}

#[test]
fn rejects_positions_of_other_pools() {
    let fixture = Fixture::new(0);
    let foreign = TokenId::encode(
        PoolId::new(0xBEEF, 0, TICK_SPACING),
        &[short_leg(0, 0, 0, 2)],
    )
    .unwrap();
    assert!(matches!(
        optimize_risk_partners(&fixture.state, &fixture.params, fixture.pool_id(), 0, foreign),
        Err(QueryError::PoolMismatch { .. })
    ));
}

fn arb_position() -> impl Strategy<Value = Vec<LegParams>> {
    prop::collection::vec(
        (0u8..2, any::<bool>(), 0u8..2, -20i32..20, 1u16..6),
        1..=4,
    )
    .prop_map(|legs| {
        legs.into_iter()
            .enumerate()
            .map(|(index, (asset, is_long, token_type, offset, half_width))| LegParams {
                asset,
                option_ratio: 1,
                is_long,
                token_type,
                risk_partner: index as u8,
                // strikes of different legs never collide
                strike: (offset * 100 + index as i32 * 10) * TICK_SPACING as i32,
                width: 2 * half_width,
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn optimized_encoding_never_costs_more(legs in arb_position()) {
        let fixture = Fixture::new(0);
        let token_id = fixture.token_id(&legs);
        prop_assume!(token_id.validate().is_ok());

        let optimized = optimize(&fixture, token_id);
        prop_assert!(optimized.validate().is_ok());
        prop_assert!(required_base(&fixture, &optimized) <= required_base(&fixture, &token_id));

        // only the partner bits may change
        for (index, leg) in optimized.legs().iter().enumerate() {
            prop_assert_eq!(
                LegParams { risk_partner: index as u8, ..*leg },
                legs[index]
            );
        }
    }
}
