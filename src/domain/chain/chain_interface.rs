//! Chain read / wallet write interface traits

use alloy_primitives::{Address, Bytes, B256, U256};
use async_trait::async_trait;

use crate::shared::errors::{ChainReadError, ExecutionError};

/// Raw pool state as reported by the pair contract, in on-chain token order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReserveSnapshot {
    pub token0: Address,
    pub token1: Address,
    pub reserve0: U256,
    pub reserve1: U256,
}

/// Read-only contract calls the routing core depends on
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Factory pair lookup; returns `Address::ZERO` when no pool exists
    async fn get_pair_address(
        &self,
        factory: Address,
        token_a: Address,
        token_b: Address,
    ) -> Result<Address, ChainReadError>;

    /// `token0()`, `token1()` and `getReserves()` of one pool
    async fn get_reserves(&self, pair: Address) -> Result<ReserveSnapshot, ChainReadError>;

    async fn get_fee_rate_bips(&self, factory: Address) -> Result<u32, ChainReadError>;

    async fn get_allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256, ChainReadError>;

    /// Number of pools the factory has created (`allPairsLength()`)
    async fn get_pair_count(&self, factory: Address) -> Result<U256, ChainReadError>;

    /// Pool created at `index` (`allPairs(index)`)
    async fn get_pair_at(&self, factory: Address, index: u64) -> Result<Address, ChainReadError>;

    /// `token0()` and `token1()` of one pool
    async fn get_pair_tokens(&self, pair: Address) -> Result<(Address, Address), ChainReadError>;

    async fn get_total_supply(&self, token: Address) -> Result<U256, ChainReadError>;

    async fn get_balance(&self, token: Address, owner: Address) -> Result<U256, ChainReadError>;
}

/// Signing wallet; submits a transaction and resolves once it is mined
#[async_trait]
pub trait WalletSigner: Send + Sync {
    fn account(&self) -> Address;

    async fn send_transaction(&self, to: Address, calldata: Bytes) -> Result<B256, ExecutionError>;
}
