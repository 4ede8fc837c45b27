//! Liquidity domain - pool listing, LP positions, pool prices and router deposits

mod liquidity_request;
mod pair_listing;
mod pool_price;
mod position;

pub use liquidity_request::{
    liquidity_min, submit_add_liquidity, submit_remove_liquidity, AddLiquidityRequest, LiquidityReceipt,
    RemoveLiquidityRequest,
};
pub use pair_listing::{list_pairs, PairInfo, DEFAULT_PAIR_LIST_LIMIT};
pub use pool_price::{price_b_per_a, inspect_pair, PairStatus};
pub use position::{burn_calldata, read_position, share_pct, submit_burn, PositionStats, DEAD_ADDRESS};
