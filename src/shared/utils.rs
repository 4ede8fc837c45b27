//! Utility functions and helpers

use alloy_primitives::{Address, U256};
use std::collections::HashMap;

use crate::shared::errors::AmountError;
use crate::shared::types::Token;

/// Convert a human-readable decimal amount into smallest token units.
///
/// Fraction digits beyond `decimals` are truncated, not rounded.
pub fn parse_units(amount: &str, decimals: u8) -> Result<U256, AmountError> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err(AmountError::Empty);
    }

    let (int_part, frac_part) = match amount.split_once('.') {
        Some((i, f)) => (i, f),
        None => (amount, ""),
    };
    if !int_part.chars().all(|c| c.is_ascii_digit()) || !frac_part.chars().all(|c| c.is_ascii_digit()) {
        return Err(AmountError::Invalid(amount.to_string()));
    }
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(AmountError::Invalid(amount.to_string()));
    }

    let decimals = decimals as usize;
    let mut digits = String::with_capacity(int_part.len() + decimals);
    digits.push_str(int_part);
    let kept: String = frac_part.chars().take(decimals).collect();
    digits.push_str(&kept);
    digits.extend(std::iter::repeat('0').take(decimals - kept.len()));

    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() {
        return Ok(U256::ZERO);
    }
    U256::from_str_radix(trimmed, 10).map_err(|_| AmountError::Overflow)
}

/// Render smallest-unit amount as a decimal string, trailing fraction zeros trimmed
pub fn format_units(amount: U256, decimals: u8) -> String {
    let digits = amount.to_string();
    let decimals = decimals as usize;
    if decimals == 0 {
        return digits;
    }

    let padded = if digits.len() <= decimals {
        format!("{}{}", "0".repeat(decimals - digits.len() + 1), digits)
    } else {
        digits
    };
    let (int_part, frac_part) = padded.split_at(padded.len() - decimals);
    let frac_part = frac_part.trim_end_matches('0');
    if frac_part.is_empty() {
        int_part.to_string()
    } else {
        format!("{}.{}", int_part, frac_part)
    }
}

/// Abbreviate an address as `0x12…abcd`
pub fn short_address(address: &Address) -> String {
    let full = format!("{:#x}", address);
    format!("{}…{}", &full[..4], &full[full.len() - 4..])
}

/// Human-readable route, e.g. `WKAS → USDC → USDT`
pub fn format_route(path: &[Address], tokens: &[Token]) -> String {
    let symbols: HashMap<Address, &str> = tokens
        .iter()
        .map(|t| (t.address, t.symbol.as_str()))
        .collect();
    path.iter()
        .map(|addr| match symbols.get(addr) {
            Some(symbol) => symbol.to_string(),
            None => short_address(addr),
        })
        .collect::<Vec<_>>()
        .join(" → ")
}
