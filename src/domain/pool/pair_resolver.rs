//! Factory pair-address resolution

use alloy_primitives::Address;
use futures::future::join_all;
use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::domain::chain::ChainReader;
use crate::shared::types::Path;

/// Pool address for `(token_a, token_b)`, or `None` when the factory reports
/// the zero address or the read fails.
pub async fn resolve_pair_address(
    reader: &dyn ChainReader,
    factory: Address,
    token_a: Address,
    token_b: Address,
) -> Option<Address> {
    match reader.get_pair_address(factory, token_a, token_b).await {
        Ok(pair) if !pair.is_zero() => Some(pair),
        Ok(_) => None,
        Err(e) => {
            debug!("Pair lookup {} / {} failed: {}", token_a, token_b, e);
            None
        }
    }
}

/// Pool addresses for every hop of a candidate set.
///
/// Each unordered token pair is looked up once, in the orientation it was
/// first seen; `get` accepts either orientation.
#[derive(Debug, Clone, Default)]
pub struct PairLookupTable {
    order: Vec<(Address, Address)>,
    resolved: HashMap<(Address, Address), Option<Address>>,
}

impl PairLookupTable {
    /// Unique hop pairs across all paths, first occurrence wins the orientation
    pub fn unique_hops(paths: &[Path]) -> Vec<(Address, Address)> {
        let mut seen = HashSet::new();
        let mut hops = Vec::new();
        for path in paths {
            for hop in path.windows(2) {
                let (a, b) = (hop[0], hop[1]);
                if seen.contains(&(a, b)) || seen.contains(&(b, a)) {
                    continue;
                }
                seen.insert((a, b));
                hops.push((a, b));
            }
        }
        hops
    }

    /// Resolve every unique hop of `paths` concurrently
    pub async fn resolve(reader: &dyn ChainReader, factory: Address, paths: &[Path]) -> Self {
        let hops = Self::unique_hops(paths);
        let addresses = join_all(
            hops.iter()
                .map(|(a, b)| resolve_pair_address(reader, factory, *a, *b)),
        )
        .await;

        let resolved = hops.iter().copied().zip(addresses).collect();
        Self { order: hops, resolved }
    }

    pub fn get(&self, a: Address, b: Address) -> Option<Address> {
        self.resolved
            .get(&(a, b))
            .or_else(|| self.resolved.get(&(b, a)))
            .copied()
            .flatten()
    }

    /// Distinct existing pools, in lookup order
    pub fn pools(&self) -> Vec<Address> {
        let mut seen = HashSet::new();
        self.order
            .iter()
            .filter_map(|key| self.resolved.get(key).copied().flatten())
            .filter(|pool| seen.insert(*pool))
            .collect()
    }

    /// Number of lookups performed
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
