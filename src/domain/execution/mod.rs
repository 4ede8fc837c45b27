//! Execution domain - tolerance bounds, approvals and swap submission

mod allowance;
mod slippage;
mod swap_request;

pub use allowance::{approve_calldata, needs_approval, AllowanceHelper, ApprovalOutcome};
pub use slippage::{
    amount_in_max, amount_out_min, effective_tolerance_bips, hop_count, is_high_tolerance, percent_to_bips,
    HIGH_TOLERANCE_BIPS, MAX_TOLERANCE_BIPS,
};
pub use swap_request::{
    deadline_after, deadline_word, submit_swap, swap_path, SwapAmounts, SwapReceipt, SwapRequest, DEFAULT_DEADLINE_SECS,
};
