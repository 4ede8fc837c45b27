//! Routing domain - candidate paths, hop quoting and route selection

pub mod hop_quoter;
pub mod path_builder;
pub mod route_optimizer;

pub use hop_quoter::{quote_hop_backward, quote_hop_forward};
pub use path_builder::{build_candidate_paths, find_bases_by_symbol, DEFAULT_MAX_HOPS};
pub use route_optimizer::{ExactInQuote, ExactOutQuote, RouteOptimizer};
