//! Wire encoding for storage and transport.
//!
//! Every public structure in this crate derives `Serialize`/`Deserialize`,
//! and this module fixes the one concrete format the node actually speaks:
//! bincode, little-endian, varint-free. Two properties matter and both are
//! tested here:
//!
//! - composition order is "base fields first": the encoding of a
//!   `SignedTransaction` begins with the exact encoding of its inner
//!   `Transaction`, and likewise for the other variants;
//! - decoding is total over what encoding produces, so anything a peer
//!   stores or relays round-trips bit-for-bit.
//!
//! These are *transport* bytes. Identity bytes are a different, frozen
//! layout — see [`canonical_bytes`](crate::transaction::digest::canonical_bytes).

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Failures crossing the wire boundary.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("value does not encode: {0}")]
    Encode(String),
    #[error("bytes do not decode as the expected structure: {0}")]
    Decode(String),
}

/// Encodes any wire-visible structure to its transport bytes.
pub fn to_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, CodecError> {
    bincode::serialize(value).map_err(|e| CodecError::Encode(e.to_string()))
}

/// Decodes transport bytes back into a structure.
pub fn from_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
    bincode::deserialize(bytes).map_err(|e| CodecError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::hash::sha256;
    use crate::crypto::keys::KeyPair;
    use crate::transaction::{
        GeneratedTransaction, GeneratedTransactionId, MessageOutput, NotifyOutput,
        PendingInlineTransaction, ProcessedGeneratedTransaction, ProcessedTransaction,
        SignedTransaction, Transaction,
    };
    use crate::transaction::types::{AccountName, ChainId};

    fn sample_tx() -> Transaction {
        let mut tx = Transaction::new();
        tx.ref_block_num = 77;
        tx.ref_block_prefix = 0xFEED_BEEF;
        tx.set_expiration(1_750_000_000);
        tx.emplace_message("transfer".into(), &("alice", "bob", 12u64)).unwrap();
        tx.emplace_serialized_message("raw".into(), vec![1, 2, 3]);
        tx
    }

    fn sample_output() -> MessageOutput {
        let mut out = MessageOutput::empty();
        out.notify.push(NotifyOutput::new(
            AccountName::new("bob").unwrap(),
            MessageOutput::empty(),
        ));
        out.deferred_transactions.push(GeneratedTransaction::new(
            GeneratedTransactionId(0),
            sample_tx(),
        ));
        out
    }

    #[test]
    fn signed_transaction_encoding_extends_the_base_encoding() {
        let mut stx = SignedTransaction::new(sample_tx());
        let chain_id = ChainId::new(sha256(b"main"));
        stx.sign_and_append(&KeyPair::generate(), &chain_id).unwrap();

        let base = to_bytes(&stx.transaction).unwrap();
        let full = to_bytes(&stx).unwrap();
        assert!(full.len() > base.len());
        assert_eq!(&full[..base.len()], &base[..]);
    }

    #[test]
    fn generated_transaction_encoding_extends_the_base_encoding() {
        let gtx = GeneratedTransaction::new(GeneratedTransactionId(5), sample_tx());
        let base = to_bytes(&gtx.transaction).unwrap();
        let full = to_bytes(&gtx).unwrap();
        assert_eq!(&full[..base.len()], &base[..]);
    }

    #[test]
    fn pending_inline_transaction_roundtrip() {
        let pending = PendingInlineTransaction::new(sample_tx());
        let recovered: PendingInlineTransaction =
            from_bytes(&to_bytes(&pending).unwrap()).unwrap();
        assert_eq!(pending, recovered);

        // Like the other variants, the encoding opens with the inner
        // transaction's bytes.
        let base = to_bytes(&pending.transaction).unwrap();
        let full = to_bytes(&pending).unwrap();
        assert_eq!(&full[..base.len()], &base[..]);
    }

    #[test]
    fn processed_transaction_roundtrip() {
        let mut stx = SignedTransaction::new(sample_tx());
        let chain_id = ChainId::new(sha256(b"main"));
        stx.sign_and_append(&KeyPair::generate(), &chain_id).unwrap();

        let processed =
            ProcessedTransaction::new(stx, vec![sample_output(), MessageOutput::empty()]);
        let recovered: ProcessedTransaction =
            from_bytes(&to_bytes(&processed).unwrap()).unwrap();
        assert_eq!(processed, recovered);
    }

    #[test]
    fn processed_generated_transaction_roundtrip() {
        let processed =
            ProcessedGeneratedTransaction::new(GeneratedTransactionId(3), vec![sample_output()]);
        let recovered: ProcessedGeneratedTransaction =
            from_bytes(&to_bytes(&processed).unwrap()).unwrap();
        assert_eq!(processed, recovered);
    }

    #[test]
    fn truncated_bytes_fail_to_decode() {
        let bytes = to_bytes(&sample_tx()).unwrap();
        let truncated = &bytes[..bytes.len() - 1];
        assert!(matches!(
            from_bytes::<Transaction>(truncated),
            Err(CodecError::Decode(_))
        ));
    }
}
