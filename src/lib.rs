pub mod candid_types;
pub mod chunks;
pub mod collateral;
pub mod errors;
pub mod ledger;
pub mod libraries;
pub mod liquidation;
pub mod logs;
pub mod optimizer;
pub mod pool;
pub mod portfolio;
pub mod state;
pub mod token_id;

#[cfg(test)]
pub mod tests;
