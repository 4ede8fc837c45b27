//! Chain id -> network configuration lookup

use alloy_primitives::Address;
use std::path::Path;
use tracing::warn;

use crate::shared::config::{
    ChainConfigDocument, ChainContracts, ConfigLoader, DEFAULT_ROUTING_BASES, FALLBACK_NETWORK_ID,
};
use crate::shared::errors::ConfigError;
use crate::shared::types::CurrencyInfo;

/// Network configuration resolved for one chain id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainConfig {
    pub chain_id: u64,
    pub name: String,
    pub rpc_url: String,
    pub explorer_url: String,
    pub currency: CurrencyInfo,
    pub contracts: ChainContracts,
    pub routing_bases: Option<Vec<String>>,
}

impl ChainConfig {
    pub fn factory(&self) -> Option<Address> {
        self.contracts.factory.filter(|a| !a.is_zero())
    }

    pub fn router(&self) -> Option<Address> {
        self.contracts.router.filter(|a| !a.is_zero())
    }

    /// Routing base symbols, falling back to the default set
    pub fn routing_bases(&self) -> Vec<String> {
        match &self.routing_bases {
            Some(bases) => bases.clone(),
            None => DEFAULT_ROUTING_BASES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Resolves chain ids against the chain configuration document
#[derive(Debug, Clone, Default)]
pub struct ChainResolver {
    document: Option<ChainConfigDocument>,
}

impl ChainResolver {
    pub fn new(document: ChainConfigDocument) -> Self {
        Self { document: Some(document) }
    }

    /// Resolver with no document; every lookup misses
    pub fn unavailable() -> Self {
        Self { document: None }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Ok(Self::new(ConfigLoader::load_chain_config(path)?))
    }

    pub fn resolve(&self, chain_id: u64) -> Option<ChainConfig> {
        let document = self.document.as_ref()?;
        let entry = match document.networks.get(&chain_id.to_string()) {
            Some(entry) => entry,
            None => {
                warn!("No network entry for chain {}", chain_id);
                return None;
            }
        };

        Some(ChainConfig {
            chain_id,
            name: entry.name.clone(),
            rpc_url: entry.rpc_url.clone(),
            explorer_url: entry.explorer_url.clone(),
            currency: entry.currency.clone(),
            contracts: entry.contracts.clone(),
            routing_bases: entry.routing_bases.clone(),
        })
    }

    pub fn default_network_id(&self) -> u64 {
        self.document
            .as_ref()
            .map(|d| d.default_network_id)
            .unwrap_or(FALLBACK_NETWORK_ID)
    }

    /// A previously selected network wins over the document default
    pub fn effective_network_id(&self, selected: Option<u64>) -> u64 {
        selected.unwrap_or_else(|| self.default_network_id())
    }

    /// Routing base symbols for a chain; defaults when the chain is unknown
    pub fn routing_bases(&self, chain_id: u64) -> Vec<String> {
        match self.resolve(chain_id) {
            Some(chain) => chain.routing_bases(),
            None => DEFAULT_ROUTING_BASES.iter().map(|s| s.to_string()).collect(),
        }
    }
}
