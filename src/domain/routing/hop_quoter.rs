//! Constant-product hop quoting with a 0.3% fee on input
//!
//! All arithmetic is checked 256-bit integer math. A product that overflows
//! would revert the router on chain as well, so it quotes to zero here.

use alloy_primitives::{Address, U256};

use crate::domain::pool::Reserves;

/// Input multiplier applied before the constant-product formula (997/1000)
pub const FEE_NUMERATOR: u64 = 997;
pub const FEE_DENOMINATOR: u64 = 1000;

/// `(reserve_in, reserve_out)` for a `from -> to` hop, or `None` if the pool
/// does not hold exactly this pair.
fn oriented_reserves(from: Address, to: Address, reserves: &Reserves) -> Option<(U256, U256)> {
    if from == reserves.token0 && to == reserves.token1 {
        Some((reserves.reserve0, reserves.reserve1))
    } else if from == reserves.token1 && to == reserves.token0 {
        Some((reserves.reserve1, reserves.reserve0))
    } else {
        None
    }
}

/// Output obtained for `amount_in` through one pool; zero means the hop is unusable.
pub fn quote_hop_forward(amount_in: U256, from: Address, to: Address, reserves: &Reserves) -> U256 {
    let Some((reserve_in, reserve_out)) = oriented_reserves(from, to, reserves) else {
        return U256::ZERO;
    };
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return U256::ZERO;
    }

    let amount_out = (|| {
        let amount_in_with_fee = amount_in.checked_mul(U256::from(FEE_NUMERATOR))?;
        let numerator = amount_in_with_fee.checked_mul(reserve_out)?;
        let denominator = reserve_in
            .checked_mul(U256::from(FEE_DENOMINATOR))?
            .checked_add(amount_in_with_fee)?;
        numerator.checked_div(denominator)
    })();

    amount_out.unwrap_or(U256::ZERO)
}

/// Input required to receive exactly `amount_out` through one pool.
///
/// Rounds one unit up so the trader never under-pays; zero means the hop is
/// unusable (including any request for the pool's entire output reserve).
pub fn quote_hop_backward(amount_out: U256, from: Address, to: Address, reserves: &Reserves) -> U256 {
    let Some((reserve_in, reserve_out)) = oriented_reserves(from, to, reserves) else {
        return U256::ZERO;
    };
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return U256::ZERO;
    }
    if amount_out >= reserve_out {
        return U256::ZERO;
    }

    let amount_in = (|| {
        let numerator = reserve_in
            .checked_mul(amount_out)?
            .checked_mul(U256::from(FEE_DENOMINATOR))?;
        let denominator = (reserve_out - amount_out).checked_mul(U256::from(FEE_NUMERATOR))?;
        numerator.checked_div(denominator)?.checked_add(U256::from(1u64))
    })();

    amount_in.unwrap_or(U256::ZERO)
}
