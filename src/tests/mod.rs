
mod liquidation_boundary;
mod straddle_chunks;
mod snapshot_loading;
