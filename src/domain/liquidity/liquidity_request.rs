//! Router add/remove liquidity calls

use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_sol_types::SolCall;
use chrono::{DateTime, Utc};
use tracing::info;

use super::position::PositionStats;
use crate::domain::chain::WalletSigner;
use crate::domain::execution::{amount_out_min, deadline_word, percent_to_bips, AllowanceHelper, ApprovalOutcome};
use crate::infrastructure::blockchain::contracts::IAmmRouter;
use crate::shared::errors::ExecutionError;

/// Least amount the router may settle for `amount` under `slippage_pct`
pub fn liquidity_min(amount: U256, slippage_pct: f64) -> U256 {
    amount_out_min(amount, percent_to_bips(slippage_pct))
}

/// Deposit into the `token_a`/`token_b` pool, creating it when missing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddLiquidityRequest {
    pub router: Address,
    pub token_a: Address,
    pub token_b: Address,
    pub amount_a: U256,
    pub amount_b: U256,
    pub amount_a_min: U256,
    pub amount_b_min: U256,
    pub recipient: Address,
    pub deadline: DateTime<Utc>,
}

impl AddLiquidityRequest {
    pub fn new(
        router: Address,
        (token_a, amount_a): (Address, U256),
        (token_b, amount_b): (Address, U256),
        slippage_pct: f64,
        recipient: Address,
        deadline: DateTime<Utc>,
    ) -> Self {
        Self {
            router,
            token_a,
            token_b,
            amount_a,
            amount_b,
            amount_a_min: liquidity_min(amount_a, slippage_pct),
            amount_b_min: liquidity_min(amount_b, slippage_pct),
            recipient,
            deadline,
        }
    }

    pub fn calldata(&self) -> Bytes {
        Bytes::from(
            IAmmRouter::addLiquidityCall {
                tokenA: self.token_a,
                tokenB: self.token_b,
                amountADesired: self.amount_a,
                amountBDesired: self.amount_b,
                amountAMin: self.amount_a_min,
                amountBMin: self.amount_b_min,
                to: self.recipient,
                deadline: deadline_word(&self.deadline),
            }
            .abi_encode(),
        )
    }
}

/// Withdraw `liquidity` LP tokens from a pool back into its two tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveLiquidityRequest {
    pub router: Address,
    /// The LP token the router pulls
    pub pair: Address,
    pub token0: Address,
    pub token1: Address,
    pub liquidity: U256,
    pub amount0_min: U256,
    pub amount1_min: U256,
    pub recipient: Address,
    pub deadline: DateTime<Utc>,
}

impl RemoveLiquidityRequest {
    /// Withdraw `share_pct` percent of the account's position.
    ///
    /// Fails with `EmptyPosition` when that rounds to no LP tokens.
    pub fn for_position(
        router: Address,
        position: &PositionStats,
        share_pct: f64,
        slippage_pct: f64,
        recipient: Address,
        deadline: DateTime<Utc>,
    ) -> Result<Self, ExecutionError> {
        let liquidity = position.liquidity_for(share_pct);
        if liquidity.is_zero() || position.total_supply.is_zero() {
            return Err(ExecutionError::EmptyPosition);
        }
        let (amount0, amount1) = position.redeemable(liquidity);
        Ok(Self {
            router,
            pair: position.pair.pair,
            token0: position.pair.token0,
            token1: position.pair.token1,
            liquidity,
            amount0_min: liquidity_min(amount0, slippage_pct),
            amount1_min: liquidity_min(amount1, slippage_pct),
            recipient,
            deadline,
        })
    }

    pub fn calldata(&self) -> Bytes {
        Bytes::from(
            IAmmRouter::removeLiquidityCall {
                tokenA: self.token0,
                tokenB: self.token1,
                liquidity: self.liquidity,
                amountAMin: self.amount0_min,
                amountBMin: self.amount1_min,
                to: self.recipient,
                deadline: deadline_word(&self.deadline),
            }
            .abi_encode(),
        )
    }
}

/// Hashes of the approvals and the router call a liquidity submission sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiquidityReceipt {
    pub approvals: Vec<B256>,
    pub tx_hash: B256,
}

async fn approve_each(
    allowance: &AllowanceHelper,
    wallet: &dyn WalletSigner,
    spender: Address,
    spends: &[(Address, U256)],
) -> Result<Vec<B256>, ExecutionError> {
    let mut approvals = Vec::new();
    for &(token, amount) in spends {
        if let ApprovalOutcome::Approved { tx_hash, .. } =
            allowance.ensure_allowance(wallet, token, spender, amount).await?
        {
            approvals.push(tx_hash);
        }
    }
    Ok(approvals)
}

/// Approve both deposit tokens as needed, then add liquidity
pub async fn submit_add_liquidity(
    allowance: &AllowanceHelper,
    wallet: &dyn WalletSigner,
    request: &AddLiquidityRequest,
) -> Result<LiquidityReceipt, ExecutionError> {
    let spends = [(request.token_a, request.amount_a), (request.token_b, request.amount_b)];
    let approvals = approve_each(allowance, wallet, request.router, &spends).await?;
    let tx_hash = wallet.send_transaction(request.router, request.calldata()).await?;
    info!(
        "Added liquidity {} / {} to {} / {}: {}",
        request.amount_a, request.amount_b, request.token_a, request.token_b, tx_hash
    );
    Ok(LiquidityReceipt { approvals, tx_hash })
}

/// Approve the LP token as needed, then remove liquidity
pub async fn submit_remove_liquidity(
    allowance: &AllowanceHelper,
    wallet: &dyn WalletSigner,
    request: &RemoveLiquidityRequest,
) -> Result<LiquidityReceipt, ExecutionError> {
    let approvals = approve_each(allowance, wallet, request.router, &[(request.pair, request.liquidity)]).await?;
    let tx_hash = wallet.send_transaction(request.router, request.calldata()).await?;
    info!("Removed {} LP from {}: {}", request.liquidity, request.pair, tx_hash);
    Ok(LiquidityReceipt { approvals, tx_hash })
}
