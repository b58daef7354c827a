use ethnum::U256;
use ic_canister_log::log;

use crate::{
    collateral::{params::RiskParameters, required_base},
    errors::QueryError,
    ledger::{StateView, ensure_position_in_pool, load_pool},
    libraries::constants::MAX_LEGS,
    logs::INFO,
    pool::types::PoolId,
    token_id::TokenId,
};

#[cfg(test)]
mod tests;

/// Risk-partner index of each leg slot.
pub type PartnerAssignment = [u8; MAX_LEGS];

/// Every partial matching of `leg_count` legs, each leg either alone or paired
/// with exactly one other. The first unassigned leg is tried alone first, then
/// paired with each later unassigned leg in index order.
pub fn partner_assignments(leg_count: usize) -> Vec<PartnerAssignment> {
    fn extend(
        assignment: PartnerAssignment,
        assigned: [bool; MAX_LEGS],
        leg_count: usize,
        out: &mut Vec<PartnerAssignment>,
    ) {
        let Some(first) = (0..leg_count).find(|index| !assigned[*index]) else {
            out.push(assignment);
            return;
        };

        let mut alone = assignment;
        let mut taken = assigned;
        alone[first] = first as u8;
        taken[first] = true;
        extend(alone, taken, leg_count, out);

        for other in (first + 1)..leg_count {
            if assigned[other] {
                continue;
            }
            let mut paired = assignment;
            let mut taken = assigned;
            paired[first] = other as u8;
            paired[other] = first as u8;
            taken[first] = true;
            taken[other] = true;
            extend(paired, taken, leg_count, out);
        }
    }

    let mut out = Vec::new();
    extend([0; MAX_LEGS], [false; MAX_LEGS], leg_count.min(MAX_LEGS), &mut out);
    out
}

/// Re-links the legs of `token_id` into the valid partner assignment with the
/// lowest required base at `at_tick`. Ties keep the input encoding, then the
/// earliest enumerated assignment.
pub fn optimize_risk_partners<S: StateView + ?Sized>(
    state: &S,
    params: &RiskParameters,
    pool_id: PoolId,
    at_tick: i32,
    token_id: TokenId,
) -> Result<TokenId, QueryError> {
    let (pool, _) = load_pool(state, pool_id)?;
    ensure_position_in_pool(&pool, &token_id)?;
    let utilizations = state.pool_utilization(pool_id);

    let mut best = token_id;
    let mut best_required = required_base(&pool, &token_id, utilizations, params, at_tick)?;
    let initial_required = best_required;

    let leg_count = token_id.count_legs();
    for assignment in partner_assignments(leg_count) {
        if best_required == U256::ZERO {
            break;
        }
        let candidate = (0..leg_count).fold(token_id, |candidate, index| {
            candidate.with_risk_partner(index, assignment[index])
        });
        if candidate == token_id || candidate.validate().is_err() {
            continue;
        }
        let required = required_base(&pool, &candidate, utilizations, params, at_tick)?;
        if required < best_required {
            best = candidate;
            best_required = required;
        }
    }

    if best != token_id {
        log!(
            INFO,
            "[optimize_risk_partners]: {} -> {} required base {} -> {}",
            token_id,
            best,
            initial_required,
            best_required
        );
    }
    Ok(best)
}
