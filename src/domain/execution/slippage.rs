//! Slippage tolerance and execution bounds

use alloy_primitives::{Address, U256};

/// 100%
pub const MAX_TOLERANCE_BIPS: u32 = 10_000;

/// Above this the caller should warn before submitting
pub const HIGH_TOLERANCE_BIPS: u32 = 5_000;

/// Hops paid for a route; without a path the direct pair is assumed
pub fn hop_count(path: Option<&[Address]>) -> usize {
    path.map_or(2, |p| p.len()).saturating_sub(1)
}

/// Percentage as whole basis points, floored.
///
/// `pct` is clamped to `[0, 100]`; a non-finite value counts as zero.
pub fn percent_to_bips(pct: f64) -> u32 {
    let pct = if pct.is_finite() { pct.clamp(0.0, 100.0) } else { 0.0 };
    // Absorb binary representation error so 0.29 reads as 29 bips, not 28
    ((pct * 100.0 + 1e-9).floor() as u32).min(MAX_TOLERANCE_BIPS)
}

/// User slippage plus one factory fee per hop, capped at 100%.
pub fn effective_tolerance_bips(user_pct: f64, hops: usize, fee_bips: u32) -> u32 {
    let user_bips = u64::from(percent_to_bips(user_pct));
    let fees = u64::from(fee_bips).saturating_mul(hops.max(1) as u64);
    user_bips
        .saturating_add(fees)
        .min(u64::from(MAX_TOLERANCE_BIPS)) as u32
}

pub fn is_high_tolerance(bips: u32) -> bool {
    bips > HIGH_TOLERANCE_BIPS
}

/// Least output accepted for an exact-in swap quoted at `quote`
pub fn amount_out_min(quote: U256, bips: u32) -> U256 {
    if quote.is_zero() {
        return U256::ZERO;
    }
    let keep = U256::from(MAX_TOLERANCE_BIPS - bips.min(MAX_TOLERANCE_BIPS));
    let denom = U256::from(MAX_TOLERANCE_BIPS);
    match quote.checked_mul(keep) {
        Some(product) => product / denom,
        None => quote / denom * keep,
    }
}

/// Most input paid for an exact-out swap quoted at `quote`, rounded up
pub fn amount_in_max(quote: U256, bips: u32) -> U256 {
    let grow = U256::from(MAX_TOLERANCE_BIPS + bips.min(MAX_TOLERANCE_BIPS));
    let denom = U256::from(MAX_TOLERANCE_BIPS);
    quote
        .checked_mul(grow)
        .and_then(|product| product.checked_add(denom - U256::from(1u64)))
        .map(|padded| padded / denom)
        .unwrap_or(U256::MAX)
}
