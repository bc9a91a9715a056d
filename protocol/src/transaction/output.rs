//! The execution-output tree.
//!
//! Executing one message produces a [`MessageOutput`]: the accounts that
//! were notified (each of which recursively produced its own output), at
//! most one inline transaction applied synchronously inside the same atomic
//! unit, and the transactions generated for later blocks. The whole thing
//! forms a tree rooted at the outer transaction's message list — no cycles,
//! no sharing, each node owned by exactly one parent.
//!
//! This crate does not *build* these trees; the external interpreter does.
//! What this module owes the rest of the system is the shape, lossless
//! serialization of it, and enforcement of three structural invariants:
//! an account is notified at most once per message, generated ids strictly
//! increase in execution order, and an inline transaction carries exactly
//! one output per message it contains.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::ChainError;
use crate::transaction::generated::{GeneratedTransaction, GeneratedTransactionId};
use crate::transaction::signing::SignedTransaction;
use crate::transaction::types::{AccountName, Transaction};

// ---------------------------------------------------------------------------
// MessageOutput
// ---------------------------------------------------------------------------

/// Everything one message's execution produced.
#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct MessageOutput {
    /// Accounts notified, in notification order. Each account may appear
    /// at most once for a given message.
    pub notify: Vec<NotifyOutput>,
    /// The follow-on transaction applied synchronously within the same
    /// atomic unit. Possibly empty — an empty inline transaction is the
    /// "nothing chained" value, not an error.
    pub inline_transaction: InlineTransaction,
    /// Transactions generated for later blocks. Recorded here, never
    /// executed as part of the current pass — that deferral is precisely
    /// what separates them from the inline transaction above.
    pub deferred_transactions: Vec<GeneratedTransaction>,
}

impl MessageOutput {
    /// An output recording no side effects at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Checks the structural invariants of this subtree: notify uniqueness
    /// per node and inline output arity, recursively.
    ///
    /// Id monotonicity spans sibling subtrees, so it is checked by the
    /// owning envelope (see [`validate_generated_ids`]), not per node.
    pub fn validate(&self) -> Result<(), ChainError> {
        let mut notified: BTreeSet<&AccountName> = BTreeSet::new();
        for notify in &self.notify {
            if !notified.insert(&notify.name) {
                return Err(ChainError::DuplicateNotify {
                    name: notify.name.clone(),
                });
            }
            notify.output.validate()?;
        }
        self.inline_transaction.validate()?;
        Ok(())
    }

    /// Appends every generated-transaction id in this subtree, in execution
    /// order: the message's own deferred list first (its handler ran
    /// first), then each notification subtree, then the inline outputs.
    fn collect_generated_ids(&self, out: &mut Vec<GeneratedTransactionId>) {
        for deferred in &self.deferred_transactions {
            out.push(deferred.id);
        }
        for notify in &self.notify {
            notify.output.collect_generated_ids(out);
        }
        for output in &self.inline_transaction.output {
            output.collect_generated_ids(out);
        }
    }
}

/// Checks that generated ids across `outputs` strictly increase in
/// execution order — the whole-tree invariant of one assigning scope.
pub fn validate_generated_ids(outputs: &[MessageOutput]) -> Result<(), ChainError> {
    let mut ids = Vec::new();
    for output in outputs {
        output.collect_generated_ids(&mut ids);
    }
    for window in ids.windows(2) {
        if window[1] <= window[0] {
            return Err(ChainError::NonMonotonicGeneratedId {
                id: window[1].value(),
                previous: window[0].value(),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// NotifyOutput
// ---------------------------------------------------------------------------

/// One notified account and the output its notification handler produced.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct NotifyOutput {
    pub name: AccountName,
    pub output: MessageOutput,
}

impl NotifyOutput {
    pub fn new(name: AccountName, output: MessageOutput) -> Self {
        Self { name, output }
    }
}

// ---------------------------------------------------------------------------
// Inline transactions
// ---------------------------------------------------------------------------

/// An inline transaction that has been requested but not yet executed.
///
/// Never independently signed: it will inherit the authorization of the
/// transaction that spawned it when it becomes an [`InlineTransaction`].
#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct PendingInlineTransaction {
    pub transaction: Transaction,
}

impl PendingInlineTransaction {
    pub fn new(transaction: Transaction) -> Self {
        Self { transaction }
    }
}

/// An executed inline transaction: the body plus one output per message.
#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct InlineTransaction {
    /// Base transaction fields, serialized first.
    pub transaction: Transaction,
    /// One entry per message, in message order.
    pub output: Vec<MessageOutput>,
}

impl InlineTransaction {
    /// The empty inline transaction — no messages, no outputs.
    pub fn none() -> Self {
        Self::default()
    }

    /// True when nothing was chained.
    pub fn is_empty(&self) -> bool {
        self.transaction.messages.is_empty() && self.output.is_empty()
    }

    fn validate(&self) -> Result<(), ChainError> {
        if self.output.len() != self.transaction.messages.len() {
            return Err(ChainError::OutputCountMismatch {
                messages: self.transaction.messages.len(),
                outputs: self.output.len(),
            });
        }
        for output in &self.output {
            output.validate()?;
        }
        Ok(())
    }
}

impl From<PendingInlineTransaction> for InlineTransaction {
    /// Promotes the unexecuted request to the executed form. Outputs start
    /// empty; the interpreter fills one in per message as it executes them.
    fn from(pending: PendingInlineTransaction) -> Self {
        Self {
            transaction: pending.transaction,
            output: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Processed envelopes
// ---------------------------------------------------------------------------

/// A signed transaction together with the full output tree its execution
/// produced. Append-only evidence: once built it is stored, merkled, and
/// eventually pruned — never edited.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ProcessedTransaction {
    /// The signed transaction, serialized first.
    pub transaction: SignedTransaction,
    /// One entry per top-level message, in message order.
    pub output: Vec<MessageOutput>,
}

impl ProcessedTransaction {
    pub fn new(transaction: SignedTransaction, output: Vec<MessageOutput>) -> Self {
        Self { transaction, output }
    }

    /// Full structural validation: output arity against the message list,
    /// per-subtree invariants, and whole-tree id monotonicity.
    pub fn validate(&self) -> Result<(), ChainError> {
        if self.output.len() != self.transaction.transaction.messages.len() {
            return Err(ChainError::OutputCountMismatch {
                messages: self.transaction.transaction.messages.len(),
                outputs: self.output.len(),
            });
        }
        for output in &self.output {
            output.validate()?;
        }
        validate_generated_ids(&self.output)
    }
}

/// The processed form of a generated transaction. The body already lives in
/// the block that generated it; the envelope references it by id.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ProcessedGeneratedTransaction {
    pub id: GeneratedTransactionId,
    /// One entry per message of the referenced transaction, in order.
    pub output: Vec<MessageOutput>,
}

impl ProcessedGeneratedTransaction {
    pub fn new(id: GeneratedTransactionId, output: Vec<MessageOutput>) -> Self {
        Self { id, output }
    }

    /// Per-subtree invariants and id monotonicity. Output arity against
    /// the referenced transaction's message list is checked at processing
    /// time, when the body is at hand.
    pub fn validate(&self) -> Result<(), ChainError> {
        for output in &self.output {
            output.validate()?;
        }
        validate_generated_ids(&self.output)
    }
}
