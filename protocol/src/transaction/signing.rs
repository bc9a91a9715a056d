//! Signed transactions: identity, chain-bound signing, key recovery.
//!
//! A [`SignedTransaction`] is the core transaction plus an ordered list of
//! recoverable signatures. Its id is derived purely from the core fields,
//! so it is stable across signing — compute it before the first signature
//! or after the tenth, same answer. Signatures are only ever made and
//! checked against the chain-bound [`sig_digest`], never the raw
//! transaction digest; that single rule is what prevents cross-chain
//! signature replay.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::crypto::hash::{sha256_multi, Digest};
use crate::crypto::keys::{KeyPair, PublicKey, RecoverableSignature};
use crate::error::ChainError;
use crate::transaction::digest::{sig_digest, transaction_digest};
use crate::transaction::types::{ChainId, Transaction};

/// A transaction with the signatures backing its authorizations.
#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct SignedTransaction {
    /// The core transaction fields. Serialized first, so the wire layout
    /// is "base fields, then signatures".
    pub transaction: Transaction,
    /// Signatures over the chain-bound signing digest, in the order they
    /// were appended.
    pub signatures: Vec<RecoverableSignature>,
}

impl SignedTransaction {
    /// Wraps an unsigned transaction.
    pub fn new(transaction: Transaction) -> Self {
        Self {
            transaction,
            signatures: Vec::new(),
        }
    }

    /// The transaction's canonical identifier.
    ///
    /// Derived from the core-field digest only — independent of which keys
    /// signed or in what order, so replay bookkeeping can index on it
    /// before signatures are examined.
    pub fn id(&self) -> Digest {
        transaction_digest(&self.transaction)
    }

    /// The digest this transaction's signatures must be made over, for the
    /// given chain.
    pub fn sig_digest(&self, chain_id: &ChainId) -> Digest {
        sig_digest(&self.transaction, chain_id)
    }

    /// Signs and appends: computes a signature over the chain-bound digest,
    /// pushes it onto the signature list, and returns a copy of it.
    pub fn sign_and_append(
        &mut self,
        key: &KeyPair,
        chain_id: &ChainId,
    ) -> Result<RecoverableSignature, ChainError> {
        let signature = self.compute_signature(key, chain_id)?;
        self.signatures.push(signature.clone());
        Ok(signature)
    }

    /// The pure counterpart of [`sign_and_append`](Self::sign_and_append):
    /// returns the signature without touching the transaction. For flows
    /// where the signer and the assembler are different parties.
    pub fn compute_signature(
        &self,
        key: &KeyPair,
        chain_id: &ChainId,
    ) -> Result<RecoverableSignature, ChainError> {
        key.sign_digest(&self.sig_digest(chain_id))
            .map_err(|e| ChainError::InvalidSignature {
                index: self.signatures.len(),
                reason: e.to_string(),
            })
    }

    /// Recovers the public key behind every stored signature, under this
    /// chain's signing digest.
    ///
    /// Returns a set — the same key signing twice collapses to one entry.
    /// Fails on the first signature that recovers nothing, reporting its
    /// position; whether one bad signature poisons the whole transaction is
    /// the caller's policy, but in practice it always should.
    pub fn get_signature_keys(
        &self,
        chain_id: &ChainId,
    ) -> Result<BTreeSet<PublicKey>, ChainError> {
        let digest = self.sig_digest(chain_id);
        let mut keys = BTreeSet::new();
        for (index, signature) in self.signatures.iter().enumerate() {
            let key = signature
                .recover(&digest)
                .map_err(|e| ChainError::InvalidSignature {
                    index,
                    reason: e.to_string(),
                })?;
            keys.insert(key);
        }
        Ok(keys)
    }

    /// Removes all messages and all signatures, leaving a reusable shell.
    pub fn clear(&mut self) {
        self.transaction.clear();
        self.signatures.clear();
    }

    /// The digest representing this transaction in a block's merkle tree.
    ///
    /// Unlike [`id`](Self::id), signatures participate: a block commits to
    /// the exact signed bytes it carries, not just to transaction content.
    pub fn merkle_digest(&self) -> Digest {
        let mut parts: Vec<&[u8]> = Vec::with_capacity(1 + self.signatures.len());
        let id = transaction_digest(&self.transaction);
        parts.push(id.as_bytes());
        for signature in &self.signatures {
            parts.push(signature.as_bytes());
        }
        sha256_multi(&parts)
    }
}

impl From<Transaction> for SignedTransaction {
    fn from(transaction: Transaction) -> Self {
        Self::new(transaction)
    }
}
