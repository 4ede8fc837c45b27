//! Error handling for the application

use thiserror::Error;

/// On-chain read errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChainReadError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("ABI decode failed: {0}")]
    Decode(String),

    #[error("Malformed RPC response: {0}")]
    InvalidResponse(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("No network configured for chain {0}")]
    UnknownChain(u64),

    #[error("Chain {chain_id} has no {contract} contract configured")]
    MissingContract { chain_id: u64, contract: &'static str },
}

/// Amount conversion errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("Amount is empty")]
    Empty,

    #[error("Invalid amount: {0}")]
    Invalid(String),

    #[error("Amount does not fit in 256 bits")]
    Overflow,
}

/// Execution-related errors (approvals, swap and liquidity submission)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExecutionError {
    #[error("Wallet rejected request: {0}")]
    Wallet(String),

    #[error("No router contract for chain {0}")]
    MissingRouter(u64),

    #[error("No viable route")]
    NoRoute,

    #[error("Nothing to withdraw from this position")]
    EmptyPosition,

    #[error("Chain read failed: {0}")]
    Read(#[from] ChainReadError),
}

/// General application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Blockchain error: {0}")]
    BlockchainError(String),

    #[error("Execution error: {0}")]
    ExecutionError(String),

    #[error("Amount error: {0}")]
    AmountError(String),
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

impl From<ChainReadError> for AppError {
    fn from(err: ChainReadError) -> Self {
        AppError::BlockchainError(err.to_string())
    }
}

impl From<ExecutionError> for AppError {
    fn from(err: ExecutionError) -> Self {
        AppError::ExecutionError(err.to_string())
    }
}

impl From<AmountError> for AppError {
    fn from(err: AmountError) -> Self {
        AppError::AmountError(err.to_string())
    }
}
