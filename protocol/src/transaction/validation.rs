//! Submission-time validation.
//!
//! The checks here run before a transaction is allowed anywhere near
//! execution, cheapest first: two integer comparisons (expiration), one
//! oracle lookup (freshness), then signature recovery, which costs real
//! elliptic-curve work. All of them are stateless with respect to this
//! crate — chain state enters only through the [`ReferenceBlockSource`]
//! oracle and the caller-supplied clock.

use tracing::debug;

use crate::config::MAX_EXPIRATION_HORIZON_SECS;
use crate::error::ChainError;
use crate::transaction::signing::SignedTransaction;
use crate::transaction::tapos::{verify_reference_block, ReferenceBlockSource};
use crate::transaction::types::{ChainId, Transaction};

/// Checks that `t`'s expiration is in the open window `(now, now + horizon]`.
///
/// `now` is passed in rather than read from a clock: validation must give
/// the same verdict on every node replaying the same block, so the caller
/// supplies block time, not wall time.
pub fn validate_expiration(t: &Transaction, now: u64) -> Result<(), ChainError> {
    if t.expiration <= now {
        return Err(ChainError::Expired {
            expiration: t.expiration,
            now,
        });
    }
    let delta_secs = t.expiration - now;
    if delta_secs > MAX_EXPIRATION_HORIZON_SECS {
        return Err(ChainError::ExpirationTooFarAhead {
            expiration: t.expiration,
            delta_secs,
            max_secs: MAX_EXPIRATION_HORIZON_SECS,
        });
    }
    Ok(())
}

/// Checks that `t` references a block the oracle still retains, and that
/// the stored prefix matches that block's id.
///
/// A missing oracle entry and a mismatched prefix produce the same error:
/// from the submitter's point of view both mean "re-pin to a recent block
/// and resubmit", and distinguishing them would let a probe map the
/// retained window.
pub fn validate_reference_block(
    t: &Transaction,
    source: &impl ReferenceBlockSource,
) -> Result<(), ChainError> {
    let stale = ChainError::StaleOrUnknownReference {
        ref_block_num: t.ref_block_num,
    };
    let Some(block_id) = source.recent_block_id(t.ref_block_num) else {
        return Err(stale);
    };
    if !verify_reference_block(t, &block_id) {
        return Err(stale);
    }
    Ok(())
}

/// The full submission pipeline for a signed transaction.
///
/// Order matters for cost, not correctness: expiration, then freshness,
/// then signature recovery. Any stored signature that fails to recover a
/// key rejects the whole transaction. Whether the recovered keys actually
/// satisfy the messages' authorizations is permission logic and lives with
/// the account state, outside this crate.
pub fn validate_transaction(
    stx: &SignedTransaction,
    chain_id: &ChainId,
    source: &impl ReferenceBlockSource,
    now: u64,
) -> Result<(), ChainError> {
    validate_expiration(&stx.transaction, now)?;
    validate_reference_block(&stx.transaction, source)?;
    let keys = stx.get_signature_keys(chain_id)?;
    debug!(
        id = %stx.id().to_hex(),
        signers = keys.len(),
        "transaction passed submission validation"
    );
    Ok(())
}
