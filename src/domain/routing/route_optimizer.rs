//! Route optimizer - best path selection for exact-in and exact-out swaps

use alloy_primitives::{Address, U256};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::hop_quoter::{quote_hop_backward, quote_hop_forward};
use super::path_builder::{build_candidate_paths, find_bases_by_symbol, DEFAULT_MAX_HOPS};
use crate::domain::chain::{ChainReader, ChainResolver};
use crate::domain::pool::{PairLookupTable, ReserveCache, Reserves};
use crate::shared::types::{Path, Token};

/// Best exact-in route; `path == None` means no viable route
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExactInQuote {
    pub path: Option<Path>,
    pub amount_out: U256,
    pub reserves_used: HashMap<Address, Reserves>,
}

impl ExactInQuote {
    pub fn is_viable(&self) -> bool {
        self.path.is_some()
    }
}

/// Best exact-out route; `path == None` means no viable route
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExactOutQuote {
    pub path: Option<Path>,
    pub amount_in: U256,
    pub reserves_used: HashMap<Address, Reserves>,
}

impl ExactOutQuote {
    pub fn is_viable(&self) -> bool {
        self.path.is_some()
    }
}

/// Candidates for one quote call with every pool and reserve lookup already done
struct PreparedCandidates {
    paths: Vec<Path>,
    pairs: PairLookupTable,
    reserves: HashMap<Address, Reserves>,
}

impl PreparedCandidates {
    fn hop_reserves(&self, from: Address, to: Address) -> Option<&Reserves> {
        let pool = self.pairs.get(from, to)?;
        self.reserves.get(&pool)
    }

    /// Final output of `path`, or `None` as soon as a hop is unusable
    fn quote_forward(&self, path: &[Address], amount_in: U256) -> Option<U256> {
        let mut running = amount_in;
        for hop in path.windows(2) {
            let reserves = self.hop_reserves(hop[0], hop[1])?;
            running = quote_hop_forward(running, hop[0], hop[1], reserves);
            if running.is_zero() {
                return None;
            }
        }
        Some(running)
    }

    /// Required input of `path`, walking hops right to left
    fn quote_backward(&self, path: &[Address], amount_out: U256) -> Option<U256> {
        let mut running = amount_out;
        for hop in path.windows(2).rev() {
            let reserves = self.hop_reserves(hop[0], hop[1])?;
            running = quote_hop_backward(running, hop[0], hop[1], reserves);
            if running.is_zero() {
                return None;
            }
        }
        Some(running)
    }
}

/// Finds the best multi-hop route between two tokens on one chain
///
/// Never fails: missing configuration, absent pools and failed reads all
/// end up as "no route".
pub struct RouteOptimizer {
    reader: Arc<dyn ChainReader>,
    chains: Arc<ChainResolver>,
    cache: Arc<ReserveCache>,
    max_hops: usize,
}

impl RouteOptimizer {
    pub fn new(reader: Arc<dyn ChainReader>, chains: Arc<ChainResolver>, cache: Arc<ReserveCache>) -> Self {
        Self {
            reader,
            chains,
            cache,
            max_hops: DEFAULT_MAX_HOPS,
        }
    }

    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = max_hops;
        self
    }

    pub fn max_hops(&self) -> usize {
        self.max_hops
    }

    pub fn cache(&self) -> &Arc<ReserveCache> {
        &self.cache
    }

    pub fn chains(&self) -> &Arc<ChainResolver> {
        &self.chains
    }

    /// Best route for selling exactly `amount_in` of `from`
    pub async fn find_best_route(
        &self,
        chain_id: u64,
        tokens: &[Token],
        from: &Token,
        to: &Token,
        amount_in: U256,
        base_symbols: &[String],
    ) -> ExactInQuote {
        let Some(prepared) = self.prepare(chain_id, tokens, from, to, base_symbols).await else {
            return ExactInQuote::default();
        };

        let mut best: Option<(&Path, U256)> = None;
        for path in &prepared.paths {
            let Some(amount_out) = prepared.quote_forward(path, amount_in) else {
                continue;
            };
            debug!("Candidate {:?} -> {}", path, amount_out);
            if best.map_or(true, |(_, current)| amount_out > current) {
                best = Some((path, amount_out));
            }
        }

        match best {
            Some((path, amount_out)) => {
                info!(
                    "Best exact-in route {} -> {}: {} hops, out {}",
                    from.symbol,
                    to.symbol,
                    path.len() - 1,
                    amount_out
                );
                ExactInQuote {
                    path: Some(path.clone()),
                    amount_out,
                    reserves_used: prepared.reserves.clone(),
                }
            }
            None => {
                info!("No viable exact-in route {} -> {}", from.symbol, to.symbol);
                ExactInQuote {
                    reserves_used: prepared.reserves,
                    ..Default::default()
                }
            }
        }
    }

    /// Best route for buying exactly `amount_out` of `to`
    pub async fn find_best_route_for_exact_out(
        &self,
        chain_id: u64,
        tokens: &[Token],
        from: &Token,
        to: &Token,
        amount_out: U256,
        base_symbols: &[String],
    ) -> ExactOutQuote {
        if amount_out.is_zero() {
            return ExactOutQuote::default();
        }
        let Some(prepared) = self.prepare(chain_id, tokens, from, to, base_symbols).await else {
            return ExactOutQuote::default();
        };

        let mut best: Option<(&Path, U256)> = None;
        for path in &prepared.paths {
            let Some(amount_in) = prepared.quote_backward(path, amount_out) else {
                continue;
            };
            debug!("Candidate {:?} <- {}", path, amount_in);
            if best.map_or(true, |(_, current)| amount_in < current) {
                best = Some((path, amount_in));
            }
        }

        match best {
            Some((path, amount_in)) => {
                info!(
                    "Best exact-out route {} -> {}: {} hops, in {}",
                    from.symbol,
                    to.symbol,
                    path.len() - 1,
                    amount_in
                );
                ExactOutQuote {
                    path: Some(path.clone()),
                    amount_in,
                    reserves_used: prepared.reserves.clone(),
                }
            }
            None => {
                info!("No viable exact-out route {} -> {}", from.symbol, to.symbol);
                ExactOutQuote {
                    reserves_used: prepared.reserves,
                    ..Default::default()
                }
            }
        }
    }

    /// Candidate generation plus concurrent pool and reserve resolution,
    /// shared by both directions. `None` when there is nothing to evaluate.
    async fn prepare(
        &self,
        chain_id: u64,
        tokens: &[Token],
        from: &Token,
        to: &Token,
        base_symbols: &[String],
    ) -> Option<PreparedCandidates> {
        if from.address == to.address {
            debug!("Source and destination are the same token, skipping");
            return None;
        }

        let chain = self.chains.resolve(chain_id)?;
        let Some(factory) = chain.factory() else {
            warn!("No factory configured for chain {}", chain_id);
            return None;
        };

        let bases = find_bases_by_symbol(tokens, base_symbols);
        let paths = build_candidate_paths(from, to, &bases, self.max_hops);
        if paths.is_empty() {
            return None;
        }

        let pairs = PairLookupTable::resolve(self.reader.as_ref(), factory, &paths).await;
        let pools = pairs.pools();
        let reserves = self.cache.get_many(self.reader.as_ref(), &pools).await;

        info!(
            "Evaluating {} candidates over {} pair lookups, {}/{} pools with reserves",
            paths.len(),
            pairs.len(),
            reserves.len(),
            pools.len()
        );

        Some(PreparedCandidates { paths, pairs, reserves })
    }
}
