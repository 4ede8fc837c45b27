//! Pair existence and spot price from reserves

use alloy_primitives::Address;
use tracing::debug;

use crate::domain::chain::{ChainReader, ReserveSnapshot};
use crate::shared::errors::ChainReadError;
use crate::shared::types::Token;
use crate::shared::utils::format_units;

/// What the factory holds for a token pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairStatus {
    /// No pool yet; the first deposit sets the price
    Missing,
    Live { pair: Address, snapshot: ReserveSnapshot },
}

impl PairStatus {
    pub fn exists(&self) -> bool {
        matches!(self, PairStatus::Live { .. })
    }
}

/// Look up the pool for `token_a`/`token_b` and read its reserves if it exists
pub async fn inspect_pair(
    reader: &dyn ChainReader,
    factory: Address,
    token_a: Address,
    token_b: Address,
) -> Result<PairStatus, ChainReadError> {
    let pair = reader.get_pair_address(factory, token_a, token_b).await?;
    if pair == Address::ZERO {
        debug!("No pool for {} / {}", token_a, token_b);
        return Ok(PairStatus::Missing);
    }
    let snapshot = reader.get_reserves(pair).await?;
    Ok(PairStatus::Live { pair, snapshot })
}

/// Units of `token_b` one whole `token_a` is worth at current reserves.
///
/// Reserves are oriented by the pool's `token0`; `None` when either reserve is
/// empty.
pub fn price_b_per_a(snapshot: &ReserveSnapshot, token_a: &Token, token_b: &Token) -> Option<f64> {
    let (reserve_a, reserve_b) = if token_a.address == snapshot.token0 {
        (snapshot.reserve0, snapshot.reserve1)
    } else {
        (snapshot.reserve1, snapshot.reserve0)
    };
    if reserve_a.is_zero() || reserve_b.is_zero() {
        return None;
    }
    let units_a: f64 = format_units(reserve_a, token_a.decimals).parse().ok()?;
    let units_b: f64 = format_units(reserve_b, token_b.decimals).parse().ok()?;
    let price = units_b / units_a;
    price.is_finite().then_some(price)
}
