//! JSON-RPC client for read-only contract calls

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

use super::contracts::{IAmmFactory, IAmmPair, IERC20};
use crate::domain::chain::{ChainReader, ReserveSnapshot};
use crate::shared::errors::ChainReadError;

pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_millis(15_000);

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// `eth_call`-backed [`ChainReader`] for EVM chains
pub struct EvmRpcReader {
    http_client: Client,
    rpc_url: String,
    next_id: AtomicU64,
}

impl EvmRpcReader {
    pub fn new(rpc_url: String) -> Result<Self, ChainReadError> {
        Self::with_timeout(rpc_url, DEFAULT_RPC_TIMEOUT)
    }

    pub fn with_timeout(rpc_url: String, timeout: Duration) -> Result<Self, ChainReadError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChainReadError::Transport(e.to_string()))?;
        Ok(Self {
            http_client,
            rpc_url,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    /// `eth_call` against `to` at the latest block, returning raw return data
    pub async fn eth_call(&self, to: Address, data: Vec<u8>) -> Result<Bytes, ChainReadError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": "eth_call",
            "params": [
                { "to": format!("{:#x}", to), "data": format!("0x{}", hex::encode(&data)) },
                "latest"
            ],
        });

        let response = self
            .http_client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ChainReadError::Transport(e.to_string()))?;

        let body: RpcResponse = response
            .json()
            .await
            .map_err(|e| ChainReadError::InvalidResponse(e.to_string()))?;

        decode_rpc_result(body)
    }

    async fn call<C: SolCall>(&self, to: Address, call: C) -> Result<C::Return, ChainReadError> {
        let raw = self.eth_call(to, call.abi_encode()).await?;
        C::abi_decode_returns(&raw, true).map_err(|e| ChainReadError::Decode(e.to_string()))
    }
}

fn decode_rpc_result(body: RpcResponse) -> Result<Bytes, ChainReadError> {
    if let Some(err) = body.error {
        return Err(ChainReadError::Rpc {
            code: err.code,
            message: err.message,
        });
    }
    let result = body
        .result
        .ok_or_else(|| ChainReadError::InvalidResponse("missing result".to_string()))?;
    let text = result
        .as_str()
        .ok_or_else(|| ChainReadError::InvalidResponse(format!("non-string result: {}", result)))?;
    let digits = text.strip_prefix("0x").unwrap_or(text);
    let bytes = hex::decode(digits).map_err(|e| ChainReadError::InvalidResponse(e.to_string()))?;
    Ok(Bytes::from(bytes))
}

#[async_trait]
impl ChainReader for EvmRpcReader {
    async fn get_pair_address(
        &self,
        factory: Address,
        token_a: Address,
        token_b: Address,
    ) -> Result<Address, ChainReadError> {
        let ret = self
            .call(factory, IAmmFactory::getPairCall { tokenA: token_a, tokenB: token_b })
            .await?;
        debug!("getPair({}, {}) = {}", token_a, token_b, ret.pair);
        Ok(ret.pair)
    }

    async fn get_reserves(&self, pair: Address) -> Result<ReserveSnapshot, ChainReadError> {
        let ((token0, token1), reserves) = tokio::try_join!(
            self.get_pair_tokens(pair),
            self.call(pair, IAmmPair::getReservesCall {}),
        )?;

        Ok(ReserveSnapshot {
            token0,
            token1,
            reserve0: U256::from(reserves.reserve0),
            reserve1: U256::from(reserves.reserve1),
        })
    }

    async fn get_fee_rate_bips(&self, factory: Address) -> Result<u32, ChainReadError> {
        let ret = self.call(factory, IAmmFactory::feeRateBipsCall {}).await?;
        u32::try_from(ret._0).map_err(|_| ChainReadError::InvalidResponse(format!("fee bips out of range: {}", ret._0)))
    }

    async fn get_allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256, ChainReadError> {
        let ret = self.call(token, IERC20::allowanceCall { owner, spender }).await?;
        Ok(ret._0)
    }

    async fn get_pair_count(&self, factory: Address) -> Result<U256, ChainReadError> {
        let ret = self.call(factory, IAmmFactory::allPairsLengthCall {}).await?;
        Ok(ret._0)
    }

    async fn get_pair_at(&self, factory: Address, index: u64) -> Result<Address, ChainReadError> {
        let ret = self
            .call(factory, IAmmFactory::allPairsCall { index: U256::from(index) })
            .await?;
        Ok(ret.pair)
    }

    async fn get_pair_tokens(&self, pair: Address) -> Result<(Address, Address), ChainReadError> {
        let (token0, token1) = tokio::try_join!(
            self.call(pair, IAmmPair::token0Call {}),
            self.call(pair, IAmmPair::token1Call {}),
        )?;
        Ok((token0._0, token1._0))
    }

    async fn get_total_supply(&self, token: Address) -> Result<U256, ChainReadError> {
        let ret = self.call(token, IERC20::totalSupplyCall {}).await?;
        Ok(ret._0)
    }

    async fn get_balance(&self, token: Address, owner: Address) -> Result<U256, ChainReadError> {
        let ret = self.call(token, IERC20::balanceOfCall { account: owner }).await?;
        Ok(ret._0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(value: Value) -> RpcResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_decode_result_hex() {
        let body = response(json!({ "jsonrpc": "2.0", "id": 1, "result": "0x00ff" }));
        assert_eq!(decode_rpc_result(body).unwrap(), Bytes::from(vec![0x00, 0xff]));
    }

    #[test]
    fn test_decode_rpc_error() {
        let body = response(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": -32000, "message": "execution reverted" }
        }));
        assert_eq!(
            decode_rpc_result(body),
            Err(ChainReadError::Rpc {
                code: -32000,
                message: "execution reverted".to_string()
            })
        );
    }

    #[test]
    fn test_decode_malformed() {
        let missing = response(json!({ "jsonrpc": "2.0", "id": 1 }));
        assert!(matches!(decode_rpc_result(missing), Err(ChainReadError::InvalidResponse(_))));

        let not_hex = response(json!({ "jsonrpc": "2.0", "id": 1, "result": "0xzz" }));
        assert!(matches!(decode_rpc_result(not_hex), Err(ChainReadError::InvalidResponse(_))));

        let number = response(json!({ "jsonrpc": "2.0", "id": 1, "result": 5 }));
        assert!(matches!(decode_rpc_result(number), Err(ChainReadError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_request_failure_is_transport_error() {
        // Rejected while building the request, before any socket is opened
        let reader = EvmRpcReader::new("not a url".to_string()).unwrap();
        let err = reader.get_reserves(Address::repeat_byte(0x01)).await.unwrap_err();
        assert!(matches!(err, ChainReadError::Transport(_)));
    }
}
