//! Digest primitives.
//!
//! Two hash functions, two jobs. SHA-256 computes the digests that name
//! things — transaction ids, signing digests — because those identifiers
//! leak into wallets, explorers, and other chains, and SHA-256 is the
//! lingua franca. BLAKE3 combines digests into block-level merkle roots,
//! which never leave Helios, so we take the ~5x speedup.

use serde::{Deserialize, Serialize};
use sha2::{Digest as Sha2Digest, Sha256};
use std::fmt;

use crate::config::DIGEST_LENGTH;

// ---------------------------------------------------------------------------
// Digest
// ---------------------------------------------------------------------------

/// A 32-byte cryptographic digest.
///
/// This is the unit of identity in the protocol: transaction ids, signing
/// digests, and merkle nodes are all `Digest`s. The newtype exists so that
/// a block id, a raw byte buffer, and a digest cannot be confused at a call
/// site — that confusion is exactly how chain-binding bugs happen.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Digest([u8; DIGEST_LENGTH]);

impl Digest {
    /// The all-zero digest, used as the empty-tree sentinel.
    pub const ZERO: Digest = Digest([0u8; DIGEST_LENGTH]);

    /// Wraps raw bytes as a digest. No validation — any 32 bytes are a
    /// structurally valid digest.
    pub fn from_bytes(bytes: [u8; DIGEST_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8; DIGEST_LENGTH] {
        &self.0
    }

    /// Hex-encoded representation, 64 characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parses a 64-character hex string.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        let arr: [u8; DIGEST_LENGTH] = bytes
            .try_into()
            .map_err(|_| hex::FromHexError::InvalidStringLength)?;
        Ok(Self(arr))
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Full digests make debug output unreadable; the first 8 bytes are
        // plenty to tell two digests apart by eye.
        write!(f, "Digest({}..)", &self.to_hex()[..16])
    }
}

// ---------------------------------------------------------------------------
// Hash functions
// ---------------------------------------------------------------------------

/// SHA-256 of a single byte slice.
pub fn sha256(data: &[u8]) -> Digest {
    let mut hasher = Sha256::new();
    hasher.update(data);
    Digest(hasher.finalize().into())
}

/// SHA-256 over multiple byte slices, fed sequentially.
///
/// Same result as hashing the concatenation, without the temporary buffer.
/// This is how composite digests (chain id || transaction digest) are built.
pub fn sha256_multi(parts: &[&[u8]]) -> Digest {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    Digest(hasher.finalize().into())
}

fn blake3_pair(left: &Digest, right: &Digest) -> Digest {
    let mut hasher = blake3::Hasher::new();
    hasher.update(left.as_bytes());
    hasher.update(right.as_bytes());
    Digest(*hasher.finalize().as_bytes())
}

/// Computes a binary merkle root over transaction merkle digests.
///
/// Plain binary tree, odd leaves duplicated — the Bitcoin construction.
/// The known duplicate-leaf ambiguity (CVE-2012-2459) is handled a layer
/// up by enforcing unique transaction ids per block before the tree is
/// built. An empty leaf set returns [`Digest::ZERO`].
///
/// A single leaf is paired with itself so the root is always the output of
/// a hash operation, never a raw leaf. That keeps proof verification
/// uniform.
pub fn merkle_root(leaves: &[Digest]) -> Digest {
    if leaves.is_empty() {
        return Digest::ZERO;
    }

    let mut level: Vec<Digest> = leaves.to_vec();

    if level.len() == 1 {
        return blake3_pair(&level[0], &level[0]);
    }

    while level.len() > 1 {
        let mut next = Vec::with_capacity((level.len() + 1) / 2);
        for chunk in level.chunks(2) {
            let left = &chunk[0];
            let right = if chunk.len() == 2 { &chunk[1] } else { &chunk[0] };
            next.push(blake3_pair(left, right));
        }
        level = next;
    }

    level[0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_known_vector() {
        // SHA-256 of the empty string — the canonical test vector everyone
        // should have memorized by now.
        let digest = sha256(b"");
        assert_eq!(
            digest.to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn sha256_multi_matches_concatenation() {
        let multi = sha256_multi(&[b"hello", b" ", b"world"]);
        let single = sha256(b"hello world");
        assert_eq!(multi, single);
    }

    #[test]
    fn digest_hex_roundtrip() {
        let digest = sha256(b"helios");
        let recovered = Digest::from_hex(&digest.to_hex()).unwrap();
        assert_eq!(digest, recovered);
    }

    #[test]
    fn digest_from_hex_rejects_bad_length() {
        assert!(Digest::from_hex("deadbeef").is_err());
        assert!(Digest::from_hex("not hex").is_err());
    }

    #[test]
    fn digest_serde_roundtrip() {
        let digest = sha256(b"serialize me");
        let json = serde_json::to_string(&digest).unwrap();
        let recovered: Digest = serde_json::from_str(&json).unwrap();
        assert_eq!(digest, recovered);
    }

    #[test]
    fn merkle_root_empty_is_zero() {
        assert_eq!(merkle_root(&[]), Digest::ZERO);
    }

    #[test]
    fn merkle_root_single_leaf_pairs_with_itself() {
        let leaf = sha256(b"only child");
        let root = merkle_root(&[leaf]);
        assert_ne!(root, leaf, "a root must never be a raw leaf");
        assert_eq!(root, merkle_root(&[leaf]));
    }

    #[test]
    fn merkle_root_order_matters() {
        // Order dependence is the point: consensus requires everyone to
        // agree on transaction ordering, and the root enforces it.
        let a = sha256(b"first");
        let b = sha256(b"second");
        assert_ne!(merkle_root(&[a, b]), merkle_root(&[b, a]));
    }

    #[test]
    fn merkle_root_odd_leaf_duplication() {
        let leaves: Vec<Digest> = (0u8..3).map(|i| sha256(&[i])).collect();
        let mut padded = leaves.clone();
        padded.push(leaves[2]);
        assert_eq!(merkle_root(&leaves), merkle_root(&padded));
    }

    #[test]
    fn debug_output_is_truncated() {
        let digest = sha256(b"x");
        let s = format!("{:?}", digest);
        assert!(s.starts_with("Digest("));
        assert!(s.len() < 40);
    }
}
