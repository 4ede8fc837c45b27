//! Pool domain - pair resolution and reserve snapshots

mod pair_resolver;
mod reserve_cache;

pub use pair_resolver::{resolve_pair_address, PairLookupTable};
pub use reserve_cache::{ReserveCache, DEFAULT_RESERVE_TTL};

use alloy_primitives::{Address, U256};
use std::fmt::Debug;
use std::time::Instant;

use crate::domain::chain::ReserveSnapshot;

/// Reserve snapshot of one pool, stamped with the time it was read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reserves {
    pub token0: Address,
    pub token1: Address,
    pub reserve0: U256,
    pub reserve1: U256,
    pub fetched_at: Instant,
}

impl Reserves {
    pub fn from_snapshot(snapshot: ReserveSnapshot, fetched_at: Instant) -> Self {
        Self {
            token0: snapshot.token0,
            token1: snapshot.token1,
            reserve0: snapshot.reserve0,
            reserve1: snapshot.reserve1,
            fetched_at,
        }
    }
}

/// Time source for cache expiry
pub trait Clock: Send + Sync + Debug {
    fn now(&self) -> Instant;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
