//! LP position statistics
//!
//! Percentages carry two decimals: the share is scaled by 1e6 in integer
//! math, then divided by 1e4, and clamped to `[0, 100]`.

use alloy_primitives::{address, Address, Bytes, B256, U256};
use alloy_sol_types::SolCall;
use tracing::info;

use super::pair_listing::PairInfo;
use crate::domain::chain::{ChainReader, WalletSigner};
use crate::domain::execution::percent_to_bips;
use crate::infrastructure::blockchain::contracts::IERC20;
use crate::shared::errors::{ChainReadError, ExecutionError};

/// Conventional sink for LP tokens burned by transfer
pub const DEAD_ADDRESS: Address = address!("000000000000000000000000000000000000dEaD");

const SHARE_SCALE: u64 = 1_000_000;

/// `part / total` as a percentage with two decimals; 0 when `total` is 0
pub fn share_pct(part: U256, total: U256) -> f64 {
    if total.is_zero() {
        return 0.0;
    }
    let scale = U256::from(SHARE_SCALE);
    let scaled = match part.checked_mul(scale) {
        Some(product) => product / total,
        None => scale,
    };
    let scaled = u64::try_from(scaled.min(scale)).unwrap_or(SHARE_SCALE);
    (scaled as f64 / 10_000.0).clamp(0.0, 100.0)
}

/// Reserves, LP supply and ownership of one pool
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionStats {
    pub pair: PairInfo,
    pub reserve0: U256,
    pub reserve1: U256,
    pub total_supply: U256,
    /// Share held by the zero and dead addresses
    pub burned_pct: f64,
    /// Known only for an account and a non-empty pool
    pub user_balance: Option<U256>,
    pub user_pct: Option<f64>,
}

impl PositionStats {
    /// LP tokens making up `pct` percent of the account's balance (two decimals)
    pub fn liquidity_for(&self, pct: f64) -> U256 {
        let Some(balance) = self.user_balance else {
            return U256::ZERO;
        };
        let bips = U256::from(percent_to_bips(pct));
        balance
            .checked_mul(bips)
            .map(|product| product / U256::from(10_000u64))
            .unwrap_or(balance / U256::from(10_000u64) * bips)
    }

    /// Token amounts `liquidity` LP tokens redeem for at current reserves
    pub fn redeemable(&self, liquidity: U256) -> (U256, U256) {
        if self.total_supply.is_zero() {
            return (U256::ZERO, U256::ZERO);
        }
        let share = |reserve: U256| {
            liquidity
                .checked_mul(reserve)
                .map(|product| product / self.total_supply)
                .unwrap_or(U256::ZERO)
        };
        (share(self.reserve0), share(self.reserve1))
    }
}

/// Read the pool's reserves and LP distribution, including `account`'s holding
pub async fn read_position(
    reader: &dyn ChainReader,
    pair: PairInfo,
    account: Option<Address>,
) -> Result<PositionStats, ChainReadError> {
    let account_balance = async {
        match account {
            Some(owner) => reader.get_balance(pair.pair, owner).await.map(Some),
            None => Ok(None),
        }
    };
    let (snapshot, total_supply, zero_balance, dead_balance, user_balance) = tokio::try_join!(
        reader.get_reserves(pair.pair),
        reader.get_total_supply(pair.pair),
        reader.get_balance(pair.pair, Address::ZERO),
        reader.get_balance(pair.pair, DEAD_ADDRESS),
        account_balance,
    )?;

    let burned = zero_balance.saturating_add(dead_balance);
    let user_balance = user_balance.filter(|_| !total_supply.is_zero());

    Ok(PositionStats {
        pair,
        reserve0: snapshot.reserve0,
        reserve1: snapshot.reserve1,
        total_supply,
        burned_pct: share_pct(burned, total_supply),
        user_balance,
        user_pct: user_balance.map(|balance| share_pct(balance, total_supply)),
    })
}

/// `transfer(DEAD_ADDRESS, amount)` calldata for an LP token
pub fn burn_calldata(amount: U256) -> Bytes {
    Bytes::from(IERC20::transferCall { to: DEAD_ADDRESS, amount }.abi_encode())
}

/// Burn `pct` percent of the account's LP tokens by sending them to the dead address
pub async fn submit_burn(
    wallet: &dyn WalletSigner,
    position: &PositionStats,
    pct: f64,
) -> Result<B256, ExecutionError> {
    let amount = position.liquidity_for(pct);
    if amount.is_zero() {
        return Err(ExecutionError::EmptyPosition);
    }
    info!("Burning {} LP of {}", amount, position.pair.pair);
    wallet.send_transaction(position.pair.pair, burn_calldata(amount)).await
}
