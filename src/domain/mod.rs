//! Domain layer - core business logic and entities

pub mod chain;
pub mod execution;
pub mod liquidity;
pub mod pool;
pub mod routing;
