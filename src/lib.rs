//! dexpath - multi-hop swap routing and quoting for constant-product AMMs
//! Built with Domain-Driven Design principles

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod shared;

#[cfg(test)]
mod test_support;

// Re-export main types for convenience
pub use application::{LiquidityService, QuoteRequest, QuoteSequencer, QuoteService, RouteQuote, TradeDirection};
pub use domain::chain::{ChainReader, ChainResolver, WalletSigner};
pub use domain::pool::ReserveCache;
pub use domain::routing::RouteOptimizer;
pub use infrastructure::blockchain::EvmRpcReader;
