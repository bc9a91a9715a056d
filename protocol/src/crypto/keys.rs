//! # Key Management & Recoverable Signatures
//!
//! secp256k1 ECDSA keypairs for Helios transaction signing.
//!
//! ## Why recoverable ECDSA and not Ed25519?
//!
//! Because of what a signature has to *prove* here. A Helios transaction
//! carries signatures but no public keys: given the chain-bound signing
//! digest, each signature must yield the key that produced it. Ed25519
//! cannot recover keys from signatures; secp256k1 ECDSA with a recovery id
//! can, at the cost of one extra byte per signature. That byte buys us a
//! smaller envelope and a simpler authorization model.
//!
//! ## Security considerations
//!
//! - Signing uses RFC 6979 deterministic nonces (no k-value footguns).
//! - `k256` normalizes signatures to low-S, so the malleable twin of a
//!   valid signature never verifies.
//! - Key generation uses the OS RNG. If your OS RNG is broken, you have
//!   bigger problems than Helios.
//! - Secret key bytes are never logged. If you add logging to this module,
//!   you will be asked to leave.

use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::config::{PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH};
use crate::crypto::hash::Digest;

/// Errors from key and signature operations.
///
/// Intentionally vague about *why* something failed — leaking details about
/// key material through error messages is a classic footgun.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("invalid secret key bytes: wrong length or not a valid scalar")]
    InvalidSecretKey,

    #[error("invalid public key bytes: not a valid secp256k1 point")]
    InvalidPublicKey,

    #[error("malformed signature: wrong length or invalid scalar encoding")]
    MalformedSignature,

    #[error("signing failed")]
    SigningFailed,

    #[error("no public key recovers from this signature over the given digest")]
    RecoveryFailed,
}

// ---------------------------------------------------------------------------
// KeyPair
// ---------------------------------------------------------------------------

/// A secp256k1 signing keypair.
///
/// The signing key is the crown jewel — it is the only secret standing
/// between an attacker and the associated accounts. `KeyPair` deliberately
/// does NOT implement `Serialize`; exporting secret material must be a
/// conscious act through [`KeyPair::secret_key_bytes`], not something that
/// happens because a keypair ended up inside a JSON response.
pub struct KeyPair {
    signing_key: SigningKey,
}

impl KeyPair {
    /// Generates a fresh keypair from the OS cryptographic RNG.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::random(&mut OsRng),
        }
    }

    /// Constructs a keypair deterministically from 32 bytes of secret
    /// scalar material.
    ///
    /// Fails if the bytes are zero or not below the curve order. If you
    /// call this with a weak seed, you get a weak key — use a proper CSPRNG
    /// or KDF to produce the bytes.
    pub fn from_seed(seed: &[u8; 32]) -> Result<Self, KeyError> {
        let signing_key = SigningKey::from_slice(seed).map_err(|_| KeyError::InvalidSecretKey)?;
        Ok(Self { signing_key })
    }

    /// Reconstructs a keypair from a hex-encoded secret key.
    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_str).map_err(|_| KeyError::InvalidSecretKey)?;
        let arr: [u8; 32] = bytes.try_into().map_err(|_| KeyError::InvalidSecretKey)?;
        Self::from_seed(&arr)
    }

    /// Returns the public half of this keypair.
    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_verifying_key(self.signing_key.verifying_key())
    }

    /// Signs a 32-byte digest, producing a recoverable signature.
    ///
    /// Deterministic: the same (key, digest) pair always yields the same
    /// signature. The digest is signed as-is — chain binding happens a
    /// layer up, in `sig_digest`, before this function is ever called.
    pub fn sign_digest(&self, digest: &Digest) -> Result<RecoverableSignature, KeyError> {
        let (sig, recovery_id) = self
            .signing_key
            .sign_prehash_recoverable(digest.as_bytes())
            .map_err(|_| KeyError::SigningFailed)?;
        Ok(RecoverableSignature::from_parts(&sig, recovery_id))
    }

    /// Exports the raw 32-byte secret scalar. **Handle with extreme care.**
    pub fn secret_key_bytes(&self) -> [u8; 32] {
        self.signing_key.to_bytes().into()
    }
}

impl Clone for KeyPair {
    /// Cloning a keypair is allowed but should make you uncomfortable.
    /// Every copy of a secret key is another thing to protect.
    fn clone(&self) -> Self {
        Self {
            signing_key: self.signing_key.clone(),
        }
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print secret material in debug output. Not even "partially."
        write!(f, "KeyPair(pub={})", self.public_key())
    }
}

// ---------------------------------------------------------------------------
// PublicKey
// ---------------------------------------------------------------------------

/// A compressed SEC1 secp256k1 public key (33 bytes), safe to share.
///
/// Stored as `Vec<u8>` for serde compatibility, but always exactly 33 bytes
/// when produced by this crate. `Ord` is derived so keys can live in the
/// `BTreeSet` returned by signature-key recovery.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PublicKey {
    bytes: Vec<u8>,
}

impl PublicKey {
    fn from_verifying_key(vk: &VerifyingKey) -> Self {
        Self {
            bytes: vk.to_encoded_point(true).as_bytes().to_vec(),
        }
    }

    /// Validates and wraps compressed SEC1 bytes.
    ///
    /// We don't accept arbitrary bytes — some encodings aren't valid curve
    /// points, and letting them in would only defer the failure to a less
    /// obvious place.
    pub fn try_from_slice(slice: &[u8]) -> Result<Self, KeyError> {
        if slice.len() != PUBLIC_KEY_LENGTH {
            return Err(KeyError::InvalidPublicKey);
        }
        VerifyingKey::from_sec1_bytes(slice).map_err(|_| KeyError::InvalidPublicKey)?;
        Ok(Self {
            bytes: slice.to_vec(),
        })
    }

    /// Raw compressed SEC1 bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Hex-encoded representation, 66 characters.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// Parses a hex-encoded compressed public key.
    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(s).map_err(|_| KeyError::InvalidPublicKey)?;
        Self::try_from_slice(&bytes)
    }

    fn to_verifying_key(&self) -> Result<VerifyingKey, KeyError> {
        VerifyingKey::from_sec1_bytes(&self.bytes).map_err(|_| KeyError::InvalidPublicKey)
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({}..)", &self.to_hex()[..16.min(self.to_hex().len())])
    }
}

// ---------------------------------------------------------------------------
// RecoverableSignature
// ---------------------------------------------------------------------------

/// A 65-byte recoverable ECDSA signature: 64 bytes of (r, s) plus one
/// recovery id byte.
///
/// The recovery id disambiguates which of the candidate curve points is the
/// signer's key, so [`RecoverableSignature::recover`] yields exactly one
/// public key (or fails). Stored as `Vec<u8>` for serde compatibility.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecoverableSignature {
    bytes: Vec<u8>,
}

impl RecoverableSignature {
    fn from_parts(sig: &EcdsaSignature, recovery_id: RecoveryId) -> Self {
        let mut bytes = sig.to_bytes().to_vec();
        bytes.push(recovery_id.to_byte());
        Self { bytes }
    }

    /// Wraps raw 65-byte signature material without cryptographic
    /// validation. Malformed input is caught at recovery time.
    pub fn from_bytes(bytes: [u8; SIGNATURE_LENGTH]) -> Self {
        Self {
            bytes: bytes.to_vec(),
        }
    }

    /// Raw bytes, 65 for any signature produced by this crate.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Hex-encoded representation, 130 characters.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// Parses a hex-encoded 65-byte signature.
    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(s).map_err(|_| KeyError::MalformedSignature)?;
        if bytes.len() != SIGNATURE_LENGTH {
            return Err(KeyError::MalformedSignature);
        }
        Ok(Self { bytes })
    }

    /// Recovers the public key that signed `digest`.
    ///
    /// Fails if the signature bytes are malformed or if no curve point
    /// recovers — which is exactly what happens when the signature was made
    /// over a *different* digest, e.g. the same transaction bound to another
    /// chain. The caller decides whether an unrecoverable signature
    /// invalidates the whole transaction.
    pub fn recover(&self, digest: &Digest) -> Result<PublicKey, KeyError> {
        if self.bytes.len() != SIGNATURE_LENGTH {
            return Err(KeyError::MalformedSignature);
        }
        let sig = EcdsaSignature::from_slice(&self.bytes[..64])
            .map_err(|_| KeyError::MalformedSignature)?;
        let recovery_id = RecoveryId::from_byte(self.bytes[64])
            .ok_or(KeyError::MalformedSignature)?;
        let vk = VerifyingKey::recover_from_prehash(digest.as_bytes(), &sig, recovery_id)
            .map_err(|_| KeyError::RecoveryFailed)?;
        Ok(PublicKey::from_verifying_key(&vk))
    }

    /// Returns `true` if this signature was produced by `key` over `digest`.
    ///
    /// Implemented as recover-and-compare, which is what verification means
    /// in a recoverable scheme.
    pub fn verifies(&self, digest: &Digest, key: &PublicKey) -> bool {
        // to_verifying_key only fails on keys that bypassed validation.
        if key.to_verifying_key().is_err() {
            return false;
        }
        matches!(self.recover(digest), Ok(recovered) if recovered == *key)
    }
}

impl fmt::Debug for RecoverableSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex_str = self.to_hex();
        if hex_str.len() >= 16 {
            write!(f, "RecoverableSignature({}..)", &hex_str[..16])
        } else {
            write!(f, "RecoverableSignature({})", hex_str)
        }
    }
}
