//! Factory pool enumeration

use alloy_primitives::{Address, U256};
use futures::future::{join_all, try_join_all};
use tracing::{debug, warn};

use crate::domain::chain::ChainReader;
use crate::shared::errors::ChainReadError;

/// Most pools read from one factory by default
pub const DEFAULT_PAIR_LIST_LIMIT: usize = 200;

/// One pool created by the factory, with its on-chain token order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PairInfo {
    pub pair: Address,
    pub token0: Address,
    pub token1: Address,
}

impl PairInfo {
    /// Token addresses could not be read; both are zero
    pub fn is_degraded(&self) -> bool {
        self.token0 == Address::ZERO && self.token1 == Address::ZERO
    }

    pub fn contains(&self, token: Address) -> bool {
        self.token0 == token || self.token1 == token
    }
}

/// The first `max` pools of `factory`, in creation order.
///
/// Failing to read the pool count or any pool address fails the listing. A
/// pool whose tokens cannot be read is still listed, with zero token addresses.
pub async fn list_pairs(
    reader: &dyn ChainReader,
    factory: Address,
    max: usize,
) -> Result<Vec<PairInfo>, ChainReadError> {
    let total = reader.get_pair_count(factory).await?;
    let count = u64::try_from(total.min(U256::from(max))).unwrap_or(max as u64);
    debug!("Factory {} has {} pools, listing {}", factory, total, count);

    let pairs = try_join_all((0..count).map(|index| reader.get_pair_at(factory, index))).await?;

    let listed = join_all(pairs.into_iter().map(|pair| async move {
        match reader.get_pair_tokens(pair).await {
            Ok((token0, token1)) => PairInfo { pair, token0, token1 },
            Err(e) => {
                warn!("Token read for pool {} failed: {}", pair, e);
                PairInfo {
                    pair,
                    token0: Address::ZERO,
                    token1: Address::ZERO,
                }
            }
        }
    }))
    .await;

    Ok(listed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{token, MockChainReader, TEST_FACTORY};

    fn seeded() -> (MockChainReader, Vec<Address>) {
        let reader = MockChainReader::new();
        let (a, b, c) = (token(0x01, "WKAS").address, token(0x02, "USDT").address, token(0x03, "USDC").address);
        let one = U256::from(1_000u64);
        let pools = vec![
            reader.add_pool(a, b, one, one),
            reader.add_pool(a, c, one, one),
            reader.add_pool(c, b, one, one),
        ];
        (reader, pools)
    }

    #[tokio::test]
    async fn test_lists_in_creation_order() {
        let (reader, pools) = seeded();
        let listed = list_pairs(&reader, TEST_FACTORY, DEFAULT_PAIR_LIST_LIMIT).await.unwrap();

        assert_eq!(listed.iter().map(|p| p.pair).collect::<Vec<_>>(), pools);
        assert_eq!(listed[1].token0, Address::repeat_byte(0x01));
        assert_eq!(listed[1].token1, Address::repeat_byte(0x03));
        assert!(listed[2].contains(Address::repeat_byte(0x02)));
        assert!(!listed.iter().any(PairInfo::is_degraded));
    }

    #[tokio::test]
    async fn test_limit_caps_listing() {
        let (reader, pools) = seeded();
        let listed = list_pairs(&reader, TEST_FACTORY, 2).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[1].pair, pools[1]);

        assert!(list_pairs(&reader, TEST_FACTORY, 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_pool_is_degraded() {
        let (reader, pools) = seeded();
        reader.fail_reserves(pools[0], true);

        let listed = list_pairs(&reader, TEST_FACTORY, DEFAULT_PAIR_LIST_LIMIT).await.unwrap();
        assert_eq!(listed.len(), 3);
        assert_eq!(listed[0].pair, pools[0]);
        assert!(listed[0].is_degraded());
        assert!(!listed[1].is_degraded());
    }

    #[tokio::test]
    async fn test_count_failure_fails_listing() {
        let (reader, _) = seeded();
        reader.fail_pair_listing(true);
        let err = list_pairs(&reader, TEST_FACTORY, DEFAULT_PAIR_LIST_LIMIT).await.unwrap_err();
        assert!(matches!(err, ChainReadError::Transport(_)));
    }
}
