//! Crate-wide error type.
//!
//! One enum, one variant per rejection rule. Freshness and expiration
//! failures are terminal at submission time — the signer must rebuild with
//! fresh values, there is nothing to retry here. Decode mismatches and
//! index errors are programmer-visible contract violations, not network
//! conditions, and are surfaced the same way so callers don't need two
//! error channels.

use thiserror::Error;

use crate::transaction::types::AccountName;

/// Errors produced by the transaction object model.
#[derive(Debug, Error)]
pub enum ChainError {
    /// The expiration timestamp has already passed.
    #[error("transaction expired at {expiration}, now is {now}")]
    Expired { expiration: u64, now: u64 },

    /// The expiration sits beyond the retention horizon. Nodes are not
    /// required to keep history that far out, so this is invalid even
    /// though the transaction has not technically expired.
    #[error(
        "expiration {expiration} is {delta_secs}s ahead of now (max allowed: {max_secs}s)"
    )]
    ExpirationTooFarAhead {
        expiration: u64,
        delta_secs: u64,
        max_secs: u64,
    },

    /// The reference block is outside the retained window, unknown to the
    /// oracle, or its stored prefix does not match. The submission layer
    /// deliberately does not distinguish "expired reference" from "forged" —
    /// see `verify_reference_block` for the underlying boolean predicate.
    #[error("reference block {ref_block_num} is stale, unknown, or mismatched")]
    StaleOrUnknownReference { ref_block_num: u16 },

    /// A stored signature does not resolve to any public key under the
    /// chain-bound signing digest.
    #[error("signature #{index} does not recover a valid key: {reason}")]
    InvalidSignature { index: usize, reason: String },

    /// A message payload did not decode as the requested type.
    #[error("message payload of type '{message_type}' does not decode as {target}")]
    MessageDecodeMismatch {
        message_type: String,
        target: &'static str,
    },

    /// A message mutation addressed an index past the end of the list.
    #[error("message index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// The external interpreter failed while building a message's output.
    /// The entire processed transaction is discarded when this surfaces.
    #[error("message execution failed: {reason}")]
    ExecutionFailure { reason: String },

    /// An account appears more than once in a notify list for one message.
    #[error("account '{name}' notified twice for the same message")]
    DuplicateNotify { name: AccountName },

    /// Generated-transaction ids must strictly increase within their
    /// assigning scope.
    #[error("generated transaction id {id} does not exceed predecessor {previous}")]
    NonMonotonicGeneratedId { id: u64, previous: u64 },

    /// A processed envelope must carry exactly one output per top-level
    /// message, in message order.
    #[error("expected {messages} message outputs, got {outputs}")]
    OutputCountMismatch { messages: usize, outputs: usize },

    /// The name violates the account-name alphabet or length rules.
    #[error("invalid account name '{name}': {reason}")]
    InvalidAccountName { name: String, reason: &'static str },
}
