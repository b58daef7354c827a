use candid::Principal;
use ethnum::U256;
use panoptic_query::{candid_types::query::CandidLeg, token_id::TokenId};

/// we have 1 or 2 args, token_id (0x-prefixed hex or decimal) and an optional pool principal
/// prints the decoded legs as json
fn main() {
    let args: Vec<_> = std::env::args().collect();
    if args.len() != 2 && args.len() != 3 {
        eprintln!("usage: decode_token_id <token_id> [pool_principal]");
        std::process::exit(1);
    }

    let token_id_text = &args[1];
    let value = match token_id_text.strip_prefix("0x") {
        Some(hex_text) => {
            let bytes = hex::decode(format!("{:0>64}", hex_text)).expect("expected hex digits");
            let bytes: [u8; 32] = bytes.try_into().expect("expected at most 32 bytes");
            U256::from_be_bytes(bytes)
        }
        None => U256::from_str_radix(token_id_text, 10).expect("expected a number"),
    };
    let token_id = TokenId(value);

    let pool = args
        .get(2)
        .map(|text| Principal::from_text(text).expect("expected a valid principal"))
        .unwrap_or(Principal::anonymous());

    let pool_id = token_id.pool_id();
    println!(
        "pool hash: {} vegoid: {} tick spacing: {} legs: {}",
        pool_id.pool_hash(),
        pool_id.vegoid(),
        pool_id.tick_spacing().0,
        token_id.count_legs()
    );
    if let Err(error) = token_id.validate() {
        println!("invalid token id: {:?}", error);
    }

    let legs: Vec<CandidLeg> = token_id
        .decode(pool)
        .into_iter()
        .map(CandidLeg::from)
        .collect();
    println!(
        "{}",
        serde_json::to_string_pretty(&legs).expect("legs serialize to json")
    );
}
