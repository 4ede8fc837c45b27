//! Quote use case: one end-to-end quote cycle for a token pair

use alloy_primitives::{Address, U256};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::domain::chain::{ChainReader, ChainResolver};
use crate::domain::execution::{
    amount_in_max, amount_out_min, deadline_after, effective_tolerance_bips, hop_count, is_high_tolerance,
    swap_path, AllowanceHelper, SwapRequest,
};
use crate::domain::pool::{Reserves, ReserveCache};
use crate::domain::routing::RouteOptimizer;
use crate::shared::config::Settings;
use crate::shared::errors::ExecutionError;
use crate::shared::types::{find_wrapped_native, normalize_to_wrapped, Path, Token, TokenList, DEFAULT_WRAPPED_NATIVE_SYMBOL};
use crate::shared::utils::format_route;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeDirection {
    /// Sell exactly `amount` of the source token
    ExactIn,
    /// Buy exactly `amount` of the destination token
    ExactOut,
}

#[derive(Debug, Clone)]
pub struct QuoteRequest {
    pub chain_id: u64,
    pub from: Token,
    pub to: Token,
    pub amount: U256,
    pub direction: TradeDirection,
    pub slippage_pct: f64,
}

/// A viable route with everything needed to submit it
#[derive(Debug, Clone, PartialEq)]
pub struct RouteQuote {
    pub chain_id: u64,
    pub direction: TradeDirection,
    /// Endpoints after native-to-wrapped normalization
    pub from: Token,
    pub to: Token,
    pub path: Path,
    pub amount_in: U256,
    pub amount_out: U256,
    pub fee_bips: u32,
    pub tolerance_bips: u32,
    pub high_tolerance: bool,
    /// `amount_out_min` for exact-in, `amount_in_max` for exact-out
    pub bound: U256,
    pub route_label: String,
    pub reserves_used: HashMap<Address, Reserves>,
}

impl RouteQuote {
    pub fn hops(&self) -> usize {
        hop_count(Some(&self.path))
    }

    /// Router call for this quote
    pub fn swap_request(&self, router: Address, recipient: Address, deadline_secs: u64) -> SwapRequest {
        let path = swap_path(Some(&self.path), self.from.address, self.to.address);
        let deadline = deadline_after(deadline_secs);
        match self.direction {
            TradeDirection::ExactIn => {
                SwapRequest::exact_in(router, path, self.amount_in, self.bound, recipient, deadline)
            }
            TradeDirection::ExactOut => {
                SwapRequest::exact_out(router, path, self.amount_out, self.bound, recipient, deadline)
            }
        }
    }
}

/// Quotes swaps on configured chains
pub struct QuoteService {
    reader: Arc<dyn ChainReader>,
    chains: Arc<ChainResolver>,
    optimizer: RouteOptimizer,
    tokens: TokenList,
    fee_bips: RwLock<HashMap<u64, u32>>,
    infinite_approvals: bool,
}

impl QuoteService {
    pub fn new(reader: Arc<dyn ChainReader>, chains: Arc<ChainResolver>, tokens: TokenList, settings: &Settings) -> Self {
        let cache = Arc::new(ReserveCache::new(Duration::from_millis(settings.reserve_ttl_ms)));
        let optimizer =
            RouteOptimizer::new(reader.clone(), chains.clone(), cache).with_max_hops(settings.max_hops);
        Self::with_optimizer(reader, chains, tokens, optimizer).with_infinite_approvals(settings.infinite_approvals)
    }

    pub fn with_optimizer(
        reader: Arc<dyn ChainReader>,
        chains: Arc<ChainResolver>,
        tokens: TokenList,
        optimizer: RouteOptimizer,
    ) -> Self {
        Self {
            reader,
            chains,
            optimizer,
            tokens,
            fee_bips: RwLock::new(HashMap::new()),
            infinite_approvals: true,
        }
    }

    pub fn with_infinite_approvals(mut self, infinite_approvals: bool) -> Self {
        self.infinite_approvals = infinite_approvals;
        self
    }

    /// Approval helper on this service's reader, honoring the infinite-approvals setting
    pub fn allowance_helper(&self) -> AllowanceHelper {
        AllowanceHelper::new(self.reader.clone(), self.infinite_approvals)
    }

    pub fn tokens(&self) -> &TokenList {
        &self.tokens
    }

    pub fn optimizer(&self) -> &RouteOptimizer {
        &self.optimizer
    }

    /// Factory trading fee for a chain, remembered once read; 0 when unavailable.
    ///
    /// A failed read is not remembered, so the next quote asks again.
    pub async fn fee_rate_bips(&self, chain_id: u64) -> u32 {
        if let Some(bips) = self.fee_bips.read().await.get(&chain_id) {
            return *bips;
        }

        let bips = match self.chains.resolve(chain_id).and_then(|c| c.factory()) {
            Some(factory) => match self.reader.get_fee_rate_bips(factory).await {
                Ok(bips) => bips,
                Err(e) => {
                    warn!("Fee rate read for chain {} failed: {}", chain_id, e);
                    return 0;
                }
            },
            None => 0,
        };
        debug!("Chain {} fee rate: {} bips", chain_id, bips);
        self.fee_bips.write().await.insert(chain_id, bips);
        bips
    }

    /// Best route for `request`, or `None` when no route is viable
    pub async fn quote(&self, request: &QuoteRequest) -> Option<RouteQuote> {
        let chain_tokens = self.tokens.for_chain(request.chain_id);
        let wrapped = find_wrapped_native(&chain_tokens, DEFAULT_WRAPPED_NATIVE_SYMBOL);
        let from = normalize_to_wrapped(&request.from, wrapped);
        let to = normalize_to_wrapped(&request.to, wrapped);
        let bases = self.chains.routing_bases(request.chain_id);

        info!(
            "Quoting {:?} {} {} -> {} on chain {}",
            request.direction, request.amount, from.symbol, to.symbol, request.chain_id
        );

        let (path, amount_in, amount_out, reserves_used) = match request.direction {
            TradeDirection::ExactIn => {
                let quote = self
                    .optimizer
                    .find_best_route(request.chain_id, &chain_tokens, &from, &to, request.amount, &bases)
                    .await;
                (quote.path?, request.amount, quote.amount_out, quote.reserves_used)
            }
            TradeDirection::ExactOut => {
                let quote = self
                    .optimizer
                    .find_best_route_for_exact_out(request.chain_id, &chain_tokens, &from, &to, request.amount, &bases)
                    .await;
                (quote.path?, quote.amount_in, request.amount, quote.reserves_used)
            }
        };

        let fee_bips = self.fee_rate_bips(request.chain_id).await;
        let tolerance_bips = effective_tolerance_bips(request.slippage_pct, hop_count(Some(&path)), fee_bips);
        let bound = match request.direction {
            TradeDirection::ExactIn => amount_out_min(amount_out, tolerance_bips),
            TradeDirection::ExactOut => amount_in_max(amount_in, tolerance_bips),
        };
        let high_tolerance = is_high_tolerance(tolerance_bips);
        if high_tolerance {
            warn!("Effective tolerance {} bips exceeds 50% for this route", tolerance_bips);
        }

        let route_label = format_route(&path, &chain_tokens);
        Some(RouteQuote {
            chain_id: request.chain_id,
            direction: request.direction,
            from,
            to,
            path,
            amount_in,
            amount_out,
            fee_bips,
            tolerance_bips,
            high_tolerance,
            bound,
            route_label,
            reserves_used,
        })
    }

    /// Router call for a quote on its chain
    pub fn swap_request(
        &self,
        quote: &RouteQuote,
        recipient: Address,
        deadline_secs: u64,
    ) -> Result<SwapRequest, ExecutionError> {
        let router = self
            .chains
            .resolve(quote.chain_id)
            .and_then(|c| c.router())
            .ok_or(ExecutionError::MissingRouter(quote.chain_id))?;
        Ok(quote.swap_request(router, recipient, deadline_secs))
    }
}
