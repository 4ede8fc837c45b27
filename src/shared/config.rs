use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::shared::errors::ConfigError;
use crate::shared::types::{CurrencyInfo, TokenList};

/// Network used when the chain config document cannot be read
pub const FALLBACK_NETWORK_ID: u64 = 167012;

/// Routing intermediaries used when a network does not list its own
pub const DEFAULT_ROUTING_BASES: [&str; 3] = ["WKAS", "USDT", "USDC"];

/// Contract addresses deployed on one network
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainContracts {
    #[serde(default)]
    pub factory: Option<Address>,
    #[serde(default)]
    pub router: Option<Address>,
}

/// One entry of the `networks` map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkEntry {
    pub name: String,
    pub rpc_url: String,
    #[serde(default)]
    pub explorer_url: String,
    pub currency: CurrencyInfo,
    #[serde(default)]
    pub contracts: ChainContracts,
    #[serde(default)]
    pub routing_bases: Option<Vec<String>>,
}

/// Public chain configuration document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainConfigDocument {
    pub default_network_id: u64,
    #[serde(default)]
    pub networks: HashMap<String, NetworkEntry>,
}

/// User-tunable settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Slippage tolerance in percent (3.0 = 3%)
    pub slippage_pct: f64,
    /// Approve `U256::MAX` instead of the exact amount
    pub infinite_approvals: bool,
    pub reserve_ttl_ms: u64,
    pub max_hops: usize,
    pub rpc_timeout_ms: u64,
    /// Swap deadline offset from submission time
    pub deadline_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            slippage_pct: 3.0,
            infinite_approvals: true,
            reserve_ttl_ms: 15_000,
            max_hops: 3,
            rpc_timeout_ms: 15_000,
            deadline_secs: 20 * 60,
        }
    }
}

impl Settings {
    /// Slippage clamped to `[0, 100]`; non-finite values count as 0
    pub fn slippage_pct_clamped(&self) -> f64 {
        if self.slippage_pct.is_finite() {
            self.slippage_pct.clamp(0.0, 100.0)
        } else {
            0.0
        }
    }
}

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load the chain configuration document (JSON)
    pub fn load_chain_config<P: AsRef<Path>>(path: P) -> Result<ChainConfigDocument, ConfigError> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.as_ref().display(), e)))?;
        Self::parse_chain_config(&content)
    }

    pub fn parse_chain_config(content: &str) -> Result<ChainConfigDocument, ConfigError> {
        serde_json::from_str(content).map_err(|e| ConfigError::Parse(format!("chain config: {}", e)))
    }

    /// Load a token list document (JSON)
    pub fn load_token_list<P: AsRef<Path>>(path: P) -> Result<TokenList, ConfigError> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.as_ref().display(), e)))?;
        serde_json::from_str(&content).map_err(|e| ConfigError::Parse(format!("token list: {}", e)))
    }

    /// Load settings (TOML); absent keys fall back to defaults
    pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings, ConfigError> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.as_ref().display(), e)))?;
        Self::parse_settings(&content)
    }

    pub fn parse_settings(content: &str) -> Result<Settings, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(format!("settings: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::SAMPLE_CHAIN_CONFIG;

    #[test]
    fn test_parse_chain_config() {
        let doc = ConfigLoader::parse_chain_config(SAMPLE_CHAIN_CONFIG).unwrap();
        assert_eq!(doc.default_network_id, 167012);

        let kasplex = &doc.networks["167012"];
        assert_eq!(kasplex.contracts.factory, Some(Address::repeat_byte(0x11)));
        assert_eq!(kasplex.contracts.router, Some(Address::repeat_byte(0x22)));
        assert_eq!(kasplex.routing_bases.as_deref(), Some(&["WKAS".to_string(), "USDC".to_string()][..]));

        // Contracts the engine never calls, such as the zap, are ignored
        let bare = &doc.networks["1"];
        assert_eq!(bare.contracts, ChainContracts::default());
        assert!(bare.routing_bases.is_none());
    }

    #[test]
    fn test_parse_chain_config_rejects_garbage() {
        assert!(matches!(
            ConfigLoader::parse_chain_config("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_settings_defaults_and_overrides() {
        let settings = ConfigLoader::parse_settings("slippage_pct = 0.5\n").unwrap();
        assert_eq!(settings.slippage_pct, 0.5);
        assert!(settings.infinite_approvals);
        assert_eq!(settings.reserve_ttl_ms, 15_000);
        assert_eq!(settings.max_hops, 3);

        let empty = ConfigLoader::parse_settings("").unwrap();
        assert_eq!(empty, Settings::default());
    }

    #[test]
    fn test_slippage_clamp() {
        let mut settings = Settings::default();
        settings.slippage_pct = 250.0;
        assert_eq!(settings.slippage_pct_clamped(), 100.0);
        settings.slippage_pct = -1.0;
        assert_eq!(settings.slippage_pct_clamped(), 0.0);
        settings.slippage_pct = f64::NAN;
        assert_eq!(settings.slippage_pct_clamped(), 0.0);
    }
}
