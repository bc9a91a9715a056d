//! # Protocol Configuration & Constants
//!
//! Every magic number in Helios lives here. If you're hardcoding a constant
//! somewhere else, you're doing it wrong and you owe the team coffee.
//!
//! Most of these values are consensus-critical: changing them after launch
//! is a hard fork. Choose wisely during devnet.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Block timing
// ---------------------------------------------------------------------------

/// Target block interval. Three seconds — fast enough for interactive use,
/// slow enough for validators on commodity hardware to keep up.
pub const BLOCK_INTERVAL: Duration = Duration::from_secs(3);

/// Block interval in seconds, for APIs that want a plain integer.
/// Keep in sync with [`BLOCK_INTERVAL`] or face the wrath of the tests.
pub const BLOCK_INTERVAL_SECS: u64 = 3;

// ---------------------------------------------------------------------------
// TaPoS (Transaction as Proof of Stake) freshness window
// ---------------------------------------------------------------------------

/// Number of distinct values a `ref_block_num` can take. A transaction
/// stores only the low 16 bits of the referenced block height, so it can
/// unambiguously identify a block only within the most recent 65,536 blocks.
/// At a 3-second block interval that is roughly 2.2 days.
pub const TAPOS_REF_WINDOW: u32 = 1 << 16;

/// Byte offset within a block id where the reference prefix starts.
/// The first 4 bytes of a block id encode the full block height, so they
/// carry no extra entropy; bytes 4..8 are the first bytes of actual hash
/// material and are what `ref_block_prefix` stores.
pub const REF_PREFIX_OFFSET: usize = 4;

// ---------------------------------------------------------------------------
// Expiration
// ---------------------------------------------------------------------------

/// Maximum distance a transaction's expiration may sit in the future.
/// Nodes only retain enough history to deduplicate transactions within this
/// horizon; an expiration beyond it would force unbounded memory and is
/// rejected at submission.
pub const MAX_EXPIRATION_HORIZON: Duration = Duration::from_secs(3_600);

/// The horizon as seconds, because arithmetic on unix timestamps wants u64.
pub const MAX_EXPIRATION_HORIZON_SECS: u64 = 3_600;

// ---------------------------------------------------------------------------
// Cryptographic parameters
// ---------------------------------------------------------------------------

/// secp256k1 ECDSA with public-key recovery. Recovery is the point: a
/// signature plus the signed digest yields the signer's key, so transactions
/// do not need to carry public keys alongside signatures.
pub const SIGNING_ALGORITHM: &str = "secp256k1-ECDSA(recoverable)";

/// Compressed SEC1 public key length in bytes (0x02/0x03 tag + x coordinate).
pub const PUBLIC_KEY_LENGTH: usize = 33;

/// Recoverable signature length: 64 bytes of (r, s) plus one recovery id byte.
pub const SIGNATURE_LENGTH: usize = 65;

/// Digest length in bytes. SHA-256 and BLAKE3 both produce 32-byte output.
pub const DIGEST_LENGTH: usize = 32;

// ---------------------------------------------------------------------------
// Account names
// ---------------------------------------------------------------------------

/// Maximum account name length. Short names keep the envelope compact and
/// fit in a register-sized encoding if we ever want one.
pub const MAX_ACCOUNT_NAME_LENGTH: usize = 12;

/// The account-name alphabet: lowercase a-z, digits 1-5, and '.'.
/// 31 symbols plus the dot separator — everything base32-packable.
pub const ACCOUNT_NAME_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz12345.";

/// Returns `true` if `c` may appear in an account name.
pub fn is_account_name_char(c: char) -> bool {
    c.is_ascii_lowercase() || ('1'..='5').contains(&c) || c == '.'
}
