//! Router swap call construction and submission

use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_sol_types::SolCall;
use chrono::{DateTime, Duration, Utc};
use tracing::info;

use super::allowance::{AllowanceHelper, ApprovalOutcome};
use crate::domain::chain::WalletSigner;
use crate::infrastructure::blockchain::contracts::IAmmRouter;
use crate::shared::errors::ExecutionError;
use crate::shared::types::Path;

/// Twenty minutes
pub const DEFAULT_DEADLINE_SECS: u64 = 20 * 60;

/// Amounts of a swap, by direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapAmounts {
    ExactIn { amount_in: U256, amount_out_min: U256 },
    ExactOut { amount_out: U256, amount_in_max: U256 },
}

/// One router swap call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapRequest {
    pub router: Address,
    pub path: Path,
    pub recipient: Address,
    pub deadline: DateTime<Utc>,
    pub amounts: SwapAmounts,
}

/// Deadline `secs` seconds from now
pub fn deadline_after(secs: u64) -> DateTime<Utc> {
    let now = Utc::now();
    i64::try_from(secs)
        .ok()
        .and_then(Duration::try_seconds)
        .and_then(|offset| now.checked_add_signed(offset))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Deadline as the unix-seconds word router calls take
pub fn deadline_word(deadline: &DateTime<Utc>) -> U256 {
    U256::from(deadline.timestamp().max(0) as u64)
}

/// Route to submit: the optimizer's path, or the direct pair when there is none
pub fn swap_path(best: Option<&Path>, from: Address, to: Address) -> Path {
    best.cloned().unwrap_or_else(|| vec![from, to])
}

impl SwapRequest {
    pub fn exact_in(
        router: Address,
        path: Path,
        amount_in: U256,
        amount_out_min: U256,
        recipient: Address,
        deadline: DateTime<Utc>,
    ) -> Self {
        Self {
            router,
            path,
            recipient,
            deadline,
            amounts: SwapAmounts::ExactIn { amount_in, amount_out_min },
        }
    }

    pub fn exact_out(
        router: Address,
        path: Path,
        amount_out: U256,
        amount_in_max: U256,
        recipient: Address,
        deadline: DateTime<Utc>,
    ) -> Self {
        Self {
            router,
            path,
            recipient,
            deadline,
            amounts: SwapAmounts::ExactOut { amount_out, amount_in_max },
        }
    }

    pub fn token_in(&self) -> Option<Address> {
        self.path.first().copied()
    }

    /// Most of the input token the router may pull; the allowance must cover it
    pub fn spend_limit(&self) -> U256 {
        match self.amounts {
            SwapAmounts::ExactIn { amount_in, .. } => amount_in,
            SwapAmounts::ExactOut { amount_in_max, .. } => amount_in_max,
        }
    }

    pub fn calldata(&self) -> Bytes {
        let path = self.path.clone();
        let to = self.recipient;
        let deadline = deadline_word(&self.deadline);
        let encoded = match self.amounts {
            SwapAmounts::ExactIn { amount_in, amount_out_min } => IAmmRouter::swapExactTokensForTokensCall {
                amountIn: amount_in,
                amountOutMin: amount_out_min,
                path,
                to,
                deadline,
            }
            .abi_encode(),
            SwapAmounts::ExactOut { amount_out, amount_in_max } => IAmmRouter::swapTokensForExactTokensCall {
                amountOut: amount_out,
                amountInMax: amount_in_max,
                path,
                to,
                deadline,
            }
            .abi_encode(),
        };
        Bytes::from(encoded)
    }
}

/// Hashes of the transactions a swap submission sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapReceipt {
    pub approval: Option<B256>,
    pub swap: B256,
}

/// Approve the router if needed, then send the swap
pub async fn submit_swap(
    allowance: &AllowanceHelper,
    wallet: &dyn WalletSigner,
    request: &SwapRequest,
) -> Result<SwapReceipt, ExecutionError> {
    let token_in = request.token_in().ok_or(ExecutionError::NoRoute)?;
    if request.path.len() < 2 {
        return Err(ExecutionError::NoRoute);
    }

    let approval = match allowance
        .ensure_allowance(wallet, token_in, request.router, request.spend_limit())
        .await?
    {
        ApprovalOutcome::Approved { tx_hash, .. } => Some(tx_hash),
        ApprovalOutcome::Sufficient { .. } => None,
    };

    let swap = wallet.send_transaction(request.router, request.calldata()).await?;
    info!("Swap submitted through {} hops: {}", request.path.len() - 1, swap);
    Ok(SwapReceipt { approval, swap })
}
