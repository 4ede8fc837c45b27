//! EVM contract reads over JSON-RPC

pub mod contracts;
pub mod rpc_client;

pub use rpc_client::{EvmRpcReader, DEFAULT_RPC_TIMEOUT};
