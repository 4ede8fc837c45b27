//! Chain domain - network configuration and on-chain interfaces

mod chain_interface;
mod chain_resolver;

pub use chain_interface::{ChainReader, ReserveSnapshot, WalletSigner};
pub use chain_resolver::{ChainConfig, ChainResolver};
