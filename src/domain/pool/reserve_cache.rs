//! Time-bounded reserve cache keyed by pool address

use alloy_primitives::Address;
use futures::future::join_all;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::{Clock, Reserves, SystemClock};
use crate::domain::chain::ChainReader;

/// Reserves older than this are refetched
pub const DEFAULT_RESERVE_TTL: Duration = Duration::from_millis(15_000);

/// Process-wide reserve cache
///
/// Failed reads are never cached, so the next call retries. Two overlapping
/// callers may both miss and fetch the same pool; the newer snapshot wins.
#[derive(Debug)]
pub struct ReserveCache {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: RwLock<HashMap<Address, Reserves>>,
}

impl Default for ReserveCache {
    fn default() -> Self {
        Self::new(DEFAULT_RESERVE_TTL)
    }
}

impl ReserveCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh cached entry, without any I/O
    pub async fn cached(&self, pool: Address) -> Option<Reserves> {
        let now = self.clock.now();
        let hit = self.entries.read().await.get(&pool).copied()?;
        (now.duration_since(hit.fetched_at) < self.ttl).then_some(hit)
    }

    /// Cached reserves if fresh, otherwise one on-chain read
    pub async fn get_reserves(&self, reader: &dyn ChainReader, pool: Address) -> Option<Reserves> {
        if let Some(hit) = self.cached(pool).await {
            debug!("Reserve cache hit for {}", pool);
            return Some(hit);
        }

        let now = self.clock.now();
        match reader.get_reserves(pool).await {
            Ok(snapshot) => {
                let reserves = Reserves::from_snapshot(snapshot, now);
                self.entries
                    .write()
                    .await
                    .entry(pool)
                    .and_modify(|existing| {
                        if reserves.fetched_at >= existing.fetched_at {
                            *existing = reserves;
                        }
                    })
                    .or_insert(reserves);
                debug!("Fetched reserves for {}: {} / {}", pool, reserves.reserve0, reserves.reserve1);
                Some(reserves)
            }
            Err(e) => {
                warn!("Failed to read reserves for {}: {}", pool, e);
                None
            }
        }
    }

    /// Reserves for many pools, each unique pool fetched at most once, concurrently.
    /// Pools whose read failed are absent from the result.
    pub async fn get_many(&self, reader: &dyn ChainReader, pools: &[Address]) -> HashMap<Address, Reserves> {
        let mut seen = HashSet::new();
        let unique: Vec<Address> = pools.iter().copied().filter(|p| seen.insert(*p)).collect();

        let fetched = join_all(unique.iter().map(|pool| self.get_reserves(reader, *pool))).await;

        unique
            .into_iter()
            .zip(fetched)
            .filter_map(|(pool, reserves)| reserves.map(|r| (pool, r)))
            .collect()
    }

    pub async fn invalidate(&self, pool: Address) {
        self.entries.write().await.remove(&pool);
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ManualClock, MockChainReader};
    use alloy_primitives::U256;

    fn setup() -> (MockChainReader, Arc<ManualClock>, ReserveCache, Address) {
        let reader = MockChainReader::new();
        let t0 = Address::repeat_byte(0x01);
        let t1 = Address::repeat_byte(0x02);
        let pool = reader.add_pool(t0, t1, U256::from(1_000u64), U256::from(3_000u64));
        let clock = Arc::new(ManualClock::new());
        let cache = ReserveCache::with_clock(DEFAULT_RESERVE_TTL, clock.clone());
        (reader, clock, cache, pool)
    }

    #[tokio::test]
    async fn test_hit_within_ttl_skips_read() {
        let (reader, clock, cache, pool) = setup();

        let first = cache.get_reserves(&reader, pool).await.unwrap();
        clock.advance(Duration::from_millis(14_999));
        let second = cache.get_reserves(&reader, pool).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(reader.reserve_reads(), 1);
    }

    #[tokio::test]
    async fn test_stale_entry_is_refetched() {
        let (reader, clock, cache, pool) = setup();

        let first = cache.get_reserves(&reader, pool).await.unwrap();
        clock.advance(Duration::from_millis(15_000));
        reader.set_reserves(pool, U256::from(2_000u64), U256::from(1_500u64));
        let second = cache.get_reserves(&reader, pool).await.unwrap();

        assert_eq!(reader.reserve_reads(), 2);
        assert_eq!(second.reserve0, U256::from(2_000u64));
        assert!(second.fetched_at > first.fetched_at);
    }

    #[tokio::test]
    async fn test_failure_is_not_cached() {
        let (reader, _clock, cache, pool) = setup();
        reader.fail_reserves(pool, true);

        assert!(cache.get_reserves(&reader, pool).await.is_none());
        assert!(cache.is_empty().await);

        reader.fail_reserves(pool, false);
        assert!(cache.get_reserves(&reader, pool).await.is_some());
        assert_eq!(reader.reserve_reads(), 2);
    }

    #[tokio::test]
    async fn test_get_many_coalesces_duplicates() {
        let (reader, _clock, cache, pool) = setup();
        let other = reader.add_pool(
            Address::repeat_byte(0x03),
            Address::repeat_byte(0x04),
            U256::from(5u64),
            U256::from(7u64),
        );
        let missing = Address::repeat_byte(0xee);

        let result = cache.get_many(&reader, &[pool, other, pool, missing, other]).await;

        assert_eq!(result.len(), 2);
        assert!(result.contains_key(&pool));
        assert!(result.contains_key(&other));
        // pool, other and the failing `missing` read once each
        assert_eq!(reader.reserve_reads(), 3);
    }

    #[tokio::test]
    async fn test_invalidate_forces_read() {
        let (reader, _clock, cache, pool) = setup();
        cache.get_reserves(&reader, pool).await.unwrap();
        cache.invalidate(pool).await;
        assert!(cache.cached(pool).await.is_none());
        cache.get_reserves(&reader, pool).await.unwrap();
        assert_eq!(reader.reserve_reads(), 2);
        assert_eq!(cache.len().await, 1);
    }
}
