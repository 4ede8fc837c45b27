//! Liquidity use cases: pool overview, pool preview and router deposits

use alloy_primitives::{Address, U256};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::chain::{ChainReader, ChainResolver};
use crate::domain::execution::{deadline_after, AllowanceHelper};
use crate::domain::liquidity::{
    list_pairs, price_b_per_a, inspect_pair, read_position, AddLiquidityRequest, PairInfo, PairStatus, PositionStats,
    RemoveLiquidityRequest, DEFAULT_PAIR_LIST_LIMIT,
};
use crate::shared::config::Settings;
use crate::shared::errors::ExecutionError;
use crate::shared::types::Token;

/// One listed pool and, when readable, its LP statistics
#[derive(Debug, Clone, PartialEq)]
pub struct PairOverview {
    pub info: PairInfo,
    pub stats: Option<PositionStats>,
}

/// Pool state shown before a deposit
#[derive(Debug, Clone, PartialEq)]
pub struct PoolPreview {
    pub status: PairStatus,
    /// Units of the second token per unit of the first; `None` for a new pool
    pub price: Option<f64>,
}

pub struct LiquidityService {
    reader: Arc<dyn ChainReader>,
    chains: Arc<ChainResolver>,
    slippage_pct: f64,
    deadline_secs: u64,
    infinite_approvals: bool,
    pair_limit: usize,
}

impl LiquidityService {
    pub fn new(reader: Arc<dyn ChainReader>, chains: Arc<ChainResolver>, settings: &Settings) -> Self {
        Self {
            reader,
            chains,
            slippage_pct: settings.slippage_pct_clamped(),
            deadline_secs: settings.deadline_secs,
            infinite_approvals: settings.infinite_approvals,
            pair_limit: DEFAULT_PAIR_LIST_LIMIT,
        }
    }

    pub fn with_pair_limit(mut self, pair_limit: usize) -> Self {
        self.pair_limit = pair_limit;
        self
    }

    pub fn allowance_helper(&self) -> AllowanceHelper {
        AllowanceHelper::new(self.reader.clone(), self.infinite_approvals)
    }

    fn factory(&self, chain_id: u64) -> Option<Address> {
        self.chains.resolve(chain_id).and_then(|c| c.factory())
    }

    fn router(&self, chain_id: u64) -> Result<Address, ExecutionError> {
        self.chains
            .resolve(chain_id)
            .and_then(|c| c.router())
            .ok_or(ExecutionError::MissingRouter(chain_id))
    }

    /// Pools of the chain's factory; empty when there is no factory or the listing fails
    pub async fn list_pairs(&self, chain_id: u64) -> Vec<PairInfo> {
        let Some(factory) = self.factory(chain_id) else {
            return Vec::new();
        };
        match list_pairs(self.reader.as_ref(), factory, self.pair_limit).await {
            Ok(pairs) => {
                info!("Listed {} pools on chain {}", pairs.len(), chain_id);
                pairs
            }
            Err(e) => {
                warn!("Pool listing on chain {} failed: {}", chain_id, e);
                Vec::new()
            }
        }
    }

    /// Every listed pool with its reserves and LP distribution, `account`'s share included
    pub async fn overview(&self, chain_id: u64, account: Option<Address>) -> Vec<PairOverview> {
        let pairs = self.list_pairs(chain_id).await;
        let reader = self.reader.as_ref();
        join_all(pairs.into_iter().map(|info| async move {
            let stats = match read_position(reader, info, account).await {
                Ok(stats) => Some(stats),
                Err(e) => {
                    warn!("Position read for pool {} failed: {}", info.pair, e);
                    None
                }
            };
            PairOverview { info, stats }
        }))
        .await
    }

    /// Whether a pool exists for the pair and its current price; `None` when unavailable
    pub async fn preview(&self, chain_id: u64, token_a: &Token, token_b: &Token) -> Option<PoolPreview> {
        let factory = self.factory(chain_id)?;
        let status = match inspect_pair(self.reader.as_ref(), factory, token_a.address, token_b.address).await {
            Ok(status) => status,
            Err(e) => {
                warn!("Pool lookup {} / {} failed: {}", token_a.symbol, token_b.symbol, e);
                return None;
            }
        };
        let price = match &status {
            PairStatus::Live { snapshot, .. } => price_b_per_a(snapshot, token_a, token_b),
            PairStatus::Missing => None,
        };
        Some(PoolPreview { status, price })
    }

    pub fn add_liquidity_request(
        &self,
        chain_id: u64,
        deposit_a: (Address, U256),
        deposit_b: (Address, U256),
        recipient: Address,
    ) -> Result<AddLiquidityRequest, ExecutionError> {
        Ok(AddLiquidityRequest::new(
            self.router(chain_id)?,
            deposit_a,
            deposit_b,
            self.slippage_pct,
            recipient,
            deadline_after(self.deadline_secs),
        ))
    }

    pub fn remove_liquidity_request(
        &self,
        chain_id: u64,
        position: &PositionStats,
        share_pct: f64,
        recipient: Address,
    ) -> Result<RemoveLiquidityRequest, ExecutionError> {
        RemoveLiquidityRequest::for_position(
            self.router(chain_id)?,
            position,
            share_pct,
            self.slippage_pct,
            recipient,
            deadline_after(self.deadline_secs),
        )
    }
}
