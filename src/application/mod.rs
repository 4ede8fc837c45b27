//! Application layer - use cases and services

pub mod liquidity_service;
pub mod quote_sequencer;
pub mod quote_service;

pub use liquidity_service::{LiquidityService, PairOverview, PoolPreview};
pub use quote_sequencer::{QuoteOutcome, QuoteSequencer, QuoteState, QuoteTicket};
pub use quote_service::{QuoteRequest, QuoteService, RouteQuote, TradeDirection};
