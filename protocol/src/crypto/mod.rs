//! # Cryptographic Primitives
//!
//! Everything security-related in the transaction model flows through here:
//! the digests that define transaction identity and the recoverable
//! signatures that bind a transaction to its signers and its chain.
//!
//! We deliberately chose boring, well-audited cryptography:
//!
//! - **SHA-256** for transaction digests — identity must be portable, and
//!   the rest of the ecosystem speaks SHA-256.
//! - **BLAKE3** for merkle composition — internal to Helios, so we use the
//!   faster hash.
//! - **secp256k1 ECDSA with recovery** for signatures — recovery lets a
//!   transaction omit public keys entirely; the signature plus the signed
//!   digest *is* the signer's identity.
//!
//! ## A note on "rolling your own crypto"
//!
//! We don't. Everything here is a thin, type-safe wrapper around audited
//! implementations (`sha2`, `blake3`, `k256`). If you're tempted to
//! optimize these functions, go read about timing attacks first and come
//! back when you've lost the urge.

pub mod hash;
pub mod keys;

pub use hash::{merkle_root, sha256, sha256_multi, Digest};
pub use keys::{KeyPair, PublicKey, RecoverableSignature};
