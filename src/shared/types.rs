//! Common types used across the application

use alloy_primitives::{address, Address};
use serde::{Deserialize, Serialize};

/// Placeholder address many wallets and token lists use for the chain's native coin
pub const NATIVE_TOKEN_ADDRESS: Address = address!("0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE");

/// Symbol of the wrapped native asset on the default network
pub const DEFAULT_WRAPPED_NATIVE_SYMBOL: &str = "WKAS";

/// Ordered sequence of token addresses, one hop per adjacent pair
pub type Path = Vec<Address>;

/// Token representation
///
/// Identity is `(chain_id, address)`. Addresses are parsed into [`Address`], so
/// comparisons are insensitive to the hex casing the token list used.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub address: Address,
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    pub decimals: u8,
    pub chain_id: u64,
}

impl Token {
    pub fn new(address: Address, symbol: &str, name: &str, decimals: u8, chain_id: u64) -> Self {
        Self {
            address,
            symbol: symbol.to_string(),
            name: name.to_string(),
            decimals,
            chain_id,
        }
    }

    pub fn key(&self) -> (u64, Address) {
        (self.chain_id, self.address)
    }

    pub fn is_native(&self) -> bool {
        self.address == NATIVE_TOKEN_ADDRESS
    }
}

/// Native currency description from the chain config
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyInfo {
    pub symbol: String,
    pub decimals: u8,
}

/// Token list document (`{ "tokens": [...] }`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenList {
    #[serde(default)]
    pub tokens: Vec<Token>,
}

impl TokenList {
    pub fn for_chain(&self, chain_id: u64) -> Vec<Token> {
        self.tokens
            .iter()
            .filter(|t| t.chain_id == chain_id)
            .cloned()
            .collect()
    }

    /// Look a token up by address (any casing) or by symbol (case-insensitive)
    pub fn find(&self, chain_id: u64, needle: &str) -> Option<&Token> {
        let needle = needle.trim();
        if let Ok(addr) = needle.parse::<Address>() {
            return self
                .tokens
                .iter()
                .find(|t| t.chain_id == chain_id && t.address == addr);
        }
        self.tokens
            .iter()
            .find(|t| t.chain_id == chain_id && t.symbol.eq_ignore_ascii_case(needle))
    }
}

/// Build the token standing in for the chain's native coin
pub fn build_native_token(chain_id: u64, currency: &CurrencyInfo) -> Token {
    Token::new(
        NATIVE_TOKEN_ADDRESS,
        &currency.symbol,
        &currency.symbol,
        currency.decimals,
        chain_id,
    )
}

/// Find the wrapped native token by symbol (case-insensitive)
pub fn find_wrapped_native<'a>(tokens: &'a [Token], symbol: &str) -> Option<&'a Token> {
    tokens.iter().find(|t| t.symbol.eq_ignore_ascii_case(symbol))
}

/// Swap the native placeholder for its wrapped counterpart; pools only hold ERC-20s.
pub fn normalize_to_wrapped(token: &Token, wrapped: Option<&Token>) -> Token {
    if !token.is_native() {
        return token.clone();
    }
    wrapped.cloned().unwrap_or_else(|| token.clone())
}
