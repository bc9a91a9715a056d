//! Transaction identity digests.
//!
//! Two digests, two jobs:
//!
//! - [`transaction_digest`] hashes the core fields and nothing else. It is
//!   the basis of transaction identity: appending or stripping signatures
//!   cannot move it.
//! - [`sig_digest`] folds the chain id in front of the transaction digest.
//!   This is what actually gets signed, which is why a signature produced
//!   for one network recovers garbage on every other network.
//!
//! The canonical byte layout is built by hand rather than through serde.
//! Serialization formats change; the bytes that define identity must not.

use crate::crypto::hash::{sha256, sha256_multi, Digest};
use crate::transaction::types::{ChainId, Transaction};

/// Canonical byte encoding of the core transaction fields.
///
/// Layout, all integers little-endian:
///
/// ```text
/// ref_block_num   u16
/// ref_block_prefix u32
/// expiration      u64
/// message count   u32
/// per message:    type bytes, 0x00, payload length u32, payload bytes
/// ```
///
/// The 0x00 terminator plus explicit payload length make the encoding
/// prefix-free: no two distinct field sets can produce the same bytes.
pub fn canonical_bytes(t: &Transaction) -> Vec<u8> {
    let mut buf = Vec::with_capacity(64 + 32 * t.messages.len());

    buf.extend_from_slice(&t.ref_block_num.to_le_bytes());
    buf.extend_from_slice(&t.ref_block_prefix.to_le_bytes());
    buf.extend_from_slice(&t.expiration.to_le_bytes());

    buf.extend_from_slice(&(t.messages.len() as u32).to_le_bytes());
    for message in &t.messages {
        buf.extend_from_slice(message.message_type.as_str().as_bytes());
        buf.push(0x00);
        buf.extend_from_slice(&(message.data.len() as u32).to_le_bytes());
        buf.extend_from_slice(&message.data);
    }

    buf
}

/// The deterministic digest of a transaction's core fields.
///
/// Signatures are excluded by construction — they are not core fields.
/// Two transactions with identical core fields share this digest no matter
/// who signed them or in what order.
pub fn transaction_digest(t: &Transaction) -> Digest {
    sha256(&canonical_bytes(t))
}

/// The digest a signer actually signs: `sha256(chain_id || transaction_digest)`.
///
/// Binding the chain id here, not in the transaction body, keeps the
/// envelope small while making cross-chain signature replay impossible:
/// the same transaction content on a different chain yields a different
/// signing digest, so its signatures recover different (useless) keys.
pub fn sig_digest(t: &Transaction, chain_id: &ChainId) -> Digest {
    sha256_multi(&[chain_id.as_bytes(), transaction_digest(t).as_bytes()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::hash::sha256;
    use crate::transaction::types::Transaction;

    fn chain(tag: &[u8]) -> ChainId {
        ChainId::new(sha256(tag))
    }

    fn sample_tx() -> Transaction {
        let mut tx = Transaction::new();
        tx.ref_block_num = 7;
        tx.ref_block_prefix = 0xCAFE_F00D;
        tx.set_expiration(1_800_000_000);
        tx.emplace_message("transfer".into(), &(1u64, 2u64)).unwrap();
        tx
    }

    #[test]
    fn digest_is_deterministic() {
        assert_eq!(transaction_digest(&sample_tx()), transaction_digest(&sample_tx()));
    }

    #[test]
    fn digest_tracks_every_core_field() {
        let base = transaction_digest(&sample_tx());

        let mut t = sample_tx();
        t.ref_block_num = 8;
        assert_ne!(transaction_digest(&t), base);

        let mut t = sample_tx();
        t.ref_block_prefix = 0;
        assert_ne!(transaction_digest(&t), base);

        let mut t = sample_tx();
        t.set_expiration(1);
        assert_ne!(transaction_digest(&t), base);

        let mut t = sample_tx();
        t.emplace_message("extra".into(), &0u8).unwrap();
        assert_ne!(transaction_digest(&t), base);
    }

    #[test]
    fn encoding_is_prefix_free_across_message_boundaries() {
        // Moving a byte from one message's payload to the next message's
        // type must change the encoding. This is what the terminator and
        // length prefix are for.
        let mut a = Transaction::new();
        a.emplace_serialized_message("ab".into(), vec![0x63]);

        let mut b = Transaction::new();
        b.emplace_serialized_message("abc".into(), vec![]);

        assert_ne!(canonical_bytes(&a), canonical_bytes(&b));
        assert_ne!(transaction_digest(&a), transaction_digest(&b));
    }

    #[test]
    fn sig_digest_differs_from_transaction_digest() {
        let tx = sample_tx();
        assert_ne!(sig_digest(&tx, &chain(b"main")), transaction_digest(&tx));
    }

    #[test]
    fn sig_digest_separates_chains() {
        let tx = sample_tx();
        assert_ne!(sig_digest(&tx, &chain(b"main")), sig_digest(&tx, &chain(b"test")));
    }

    #[test]
    fn cleared_transaction_digests_like_fresh_shell() {
        let mut tx = sample_tx();
        tx.clear();

        let mut fresh = Transaction::new();
        fresh.ref_block_num = 7;
        fresh.ref_block_prefix = 0xCAFE_F00D;
        fresh.set_expiration(1_800_000_000);

        assert_eq!(transaction_digest(&tx), transaction_digest(&fresh));
    }
}
