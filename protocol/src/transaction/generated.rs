//! Generated (deferred) transactions.
//!
//! When a contract runs and wants to interact with other contracts or
//! schedule follow-up work, it generates transactions. These were produced
//! by already-authorized execution, so they carry no signatures — their
//! authorization *is* their provenance. Each one receives a sequential id
//! from the block-scoped allocator of the execution context that produced
//! it, is recorded in that block, and can be applied in a later block by
//! referencing the id.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::crypto::hash::{sha256_multi, Digest};
use crate::transaction::digest::transaction_digest;
use crate::transaction::types::Transaction;

// ---------------------------------------------------------------------------
// GeneratedTransactionId
// ---------------------------------------------------------------------------

/// Sequential identifier of a generated transaction within its assigning
/// scope (a block).
///
/// A newtype rather than a bare `u64` so a generated-transaction id and,
/// say, a block height can never be swapped at a call site.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize,
)]
pub struct GeneratedTransactionId(pub u64);

impl GeneratedTransactionId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for GeneratedTransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// GeneratedTransaction
// ---------------------------------------------------------------------------

/// A transaction generated internally by the chain, scheduled but not yet
/// applied.
///
/// No signature list, on purpose: adding one would reopen the door to
/// externally-authorized generated transactions, which is a category error.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct GeneratedTransaction {
    /// The core transaction fields. Serialized first; the id follows.
    pub transaction: Transaction,
    /// Sequential id assigned by the producing execution context.
    pub id: GeneratedTransactionId,
}

impl GeneratedTransaction {
    pub fn new(id: GeneratedTransactionId, transaction: Transaction) -> Self {
        Self { transaction, id }
    }

    /// The digest representing this transaction in a block's merkle tree.
    ///
    /// Computed differently from a signed transaction's: there are no
    /// signatures, and the internal id participates instead, so that two
    /// generated transactions with identical content but different queue
    /// positions commit differently.
    pub fn merkle_digest(&self) -> Digest {
        let id_bytes = self.id.0.to_le_bytes();
        let tx_digest = transaction_digest(&self.transaction);
        sha256_multi(&[&id_bytes, tx_digest.as_bytes()])
    }
}

// ---------------------------------------------------------------------------
// GeneratedIdAllocator
// ---------------------------------------------------------------------------

/// The per-block assigning scope for generated-transaction ids.
///
/// One allocator lives for the duration of one block's execution and hands
/// out strictly increasing ids. Strictness is structural — the only way to
/// get an id is [`next`](Self::next), and `next` only counts up — which is
/// what lets validation treat a non-monotonic id sequence as evidence of a
/// broken interpreter rather than an unlucky interleaving.
#[derive(Debug, Default)]
pub struct GeneratedIdAllocator {
    next: u64,
}

impl GeneratedIdAllocator {
    /// A fresh allocator starting at id 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resumes allocation after `last_assigned`, for contexts that carry
    /// the counter across sub-executions.
    pub fn starting_after(last_assigned: GeneratedTransactionId) -> Self {
        Self {
            next: last_assigned.0 + 1,
        }
    }

    /// Returns the next id and advances.
    pub fn next(&mut self) -> GeneratedTransactionId {
        let id = GeneratedTransactionId(self.next);
        self.next += 1;
        id
    }
}
