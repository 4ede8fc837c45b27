//! ERC-20 allowance checks and approvals

use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_sol_types::SolCall;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::chain::{ChainReader, WalletSigner};
use crate::infrastructure::blockchain::contracts::IERC20;
use crate::shared::errors::ExecutionError;

/// Whether an approval must precede spending `desired`.
///
/// Unknown allowance or unknown amount never asks for approval.
pub fn needs_approval(allowance: Option<U256>, desired: Option<U256>) -> bool {
    match (allowance, desired) {
        (Some(allowance), Some(desired)) => allowance < desired,
        _ => false,
    }
}

/// `approve(spender, amount)` calldata
pub fn approve_calldata(spender: Address, amount: U256) -> Bytes {
    Bytes::from(IERC20::approveCall { spender, amount }.abi_encode())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalOutcome {
    /// Existing allowance already covers the amount; nothing was sent
    Sufficient { allowance: U256 },
    Approved { amount: U256, tx_hash: B256 },
}

/// Reads allowances and submits approvals for a spender (the router)
pub struct AllowanceHelper {
    reader: Arc<dyn ChainReader>,
    infinite_approvals: bool,
}

impl AllowanceHelper {
    pub fn new(reader: Arc<dyn ChainReader>, infinite_approvals: bool) -> Self {
        Self {
            reader,
            infinite_approvals,
        }
    }

    /// Amount an approval for `desired` will request
    pub fn approval_amount(&self, desired: U256) -> U256 {
        if self.infinite_approvals {
            U256::MAX
        } else {
            desired
        }
    }

    /// Current allowance, `None` when the read fails
    pub async fn current_allowance(&self, token: Address, owner: Address, spender: Address) -> Option<U256> {
        match self.reader.get_allowance(token, owner, spender).await {
            Ok(allowance) => Some(allowance),
            Err(e) => {
                warn!("Allowance read for {} failed: {}", token, e);
                None
            }
        }
    }

    /// Approve `spender` for at least `desired` of `token`, reading the allowance fresh first
    pub async fn ensure_allowance(
        &self,
        wallet: &dyn WalletSigner,
        token: Address,
        spender: Address,
        desired: U256,
    ) -> Result<ApprovalOutcome, ExecutionError> {
        let owner = wallet.account();
        let allowance = self.reader.get_allowance(token, owner, spender).await?;
        if allowance >= desired {
            debug!("Allowance {} of {} covers {}", allowance, token, desired);
            return Ok(ApprovalOutcome::Sufficient { allowance });
        }

        let amount = self.approval_amount(desired);
        info!("Approving {} of {} for {}", amount, token, spender);
        let tx_hash = wallet
            .send_transaction(token, approve_calldata(spender, amount))
            .await?;
        Ok(ApprovalOutcome::Approved { amount, tx_hash })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockChainReader, RecordingWallet};

    const TOKEN: Address = Address::repeat_byte(0x01);
    const ROUTER: Address = Address::repeat_byte(0x22);

    #[test]
    fn test_needs_approval() {
        let (one, two) = (Some(U256::from(1u64)), Some(U256::from(2u64)));
        assert!(needs_approval(one, two));
        assert!(!needs_approval(two, two));
        assert!(!needs_approval(two, one));
        assert!(!needs_approval(None, two));
        assert!(!needs_approval(one, None));
    }

    #[tokio::test]
    async fn test_sufficient_allowance_sends_nothing() {
        let reader = Arc::new(MockChainReader::new());
        let wallet = RecordingWallet::new(Address::repeat_byte(0xaa));
        reader.set_allowance(TOKEN, wallet.account(), ROUTER, U256::from(500u64));

        let helper = AllowanceHelper::new(reader.clone(), true);
        let outcome = helper
            .ensure_allowance(&wallet, TOKEN, ROUTER, U256::from(500u64))
            .await
            .unwrap();

        assert_eq!(outcome, ApprovalOutcome::Sufficient { allowance: U256::from(500u64) });
        assert!(wallet.sent().is_empty());
    }

    #[tokio::test]
    async fn test_exact_and_infinite_approval() {
        let reader = Arc::new(MockChainReader::new());
        let wallet = RecordingWallet::new(Address::repeat_byte(0xaa));
        reader.set_allowance(TOKEN, wallet.account(), ROUTER, U256::from(10u64));

        let exact = AllowanceHelper::new(reader.clone(), false);
        let outcome = exact
            .ensure_allowance(&wallet, TOKEN, ROUTER, U256::from(500u64))
            .await
            .unwrap();
        assert!(matches!(outcome, ApprovalOutcome::Approved { amount, .. } if amount == U256::from(500u64)));

        let infinite = AllowanceHelper::new(reader.clone(), true);
        infinite
            .ensure_allowance(&wallet, TOKEN, ROUTER, U256::from(500u64))
            .await
            .unwrap();

        let sent = wallet.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].0, TOKEN);
        assert_eq!(sent[0].1, approve_calldata(ROUTER, U256::from(500u64)));
        assert_eq!(sent[1].1, approve_calldata(ROUTER, U256::MAX));
    }

    #[tokio::test]
    async fn test_read_failure_propagates() {
        let reader = Arc::new(MockChainReader::new());
        reader.fail_allowance(true);
        let wallet = RecordingWallet::new(Address::repeat_byte(0xaa));
        let helper = AllowanceHelper::new(reader.clone(), true);

        let err = helper
            .ensure_allowance(&wallet, TOKEN, ROUTER, U256::from(1u64))
            .await
            .unwrap_err();
        assert!(matches!(err, ExecutionError::Read(_)));
        assert!(helper.current_allowance(TOKEN, wallet.account(), ROUTER).await.is_none());
        assert!(wallet.sent().is_empty());
    }

    #[tokio::test]
    async fn test_wallet_rejection() {
        let reader = Arc::new(MockChainReader::new());
        let wallet = RecordingWallet::new(Address::repeat_byte(0xaa));
        wallet.reject(true);
        let helper = AllowanceHelper::new(reader.clone(), false);

        let err = helper
            .ensure_allowance(&wallet, TOKEN, ROUTER, U256::from(1u64))
            .await
            .unwrap_err();
        assert!(matches!(err, ExecutionError::Wallet(_)));
    }
}
