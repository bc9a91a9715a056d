//! Core value types for Helios transactions.
//!
//! The important design decision here is that `Transaction` is a plain
//! value type composed into the signed / generated / inline variants, not a
//! base class of them. Shared operations (digesting, freshness, message
//! mutation) are functions over these common fields; the variants add only
//! what genuinely distinguishes them.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::{self, MAX_ACCOUNT_NAME_LENGTH, REF_PREFIX_OFFSET};
use crate::crypto::hash::Digest;
use crate::error::ChainError;

// ---------------------------------------------------------------------------
// AccountName
// ---------------------------------------------------------------------------

/// A validated on-chain account name.
///
/// Names use a deliberately tiny alphabet (lowercase a-z, digits 1-5, '.')
/// and cap out at 12 characters, so they stay cheap to compare, sort, and
/// display. The dot is a namespace separator and may not lead or trail.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccountName(String);

impl AccountName {
    /// Validates and wraps a name.
    pub fn new(name: impl Into<String>) -> Result<Self, ChainError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ChainError::InvalidAccountName {
                name,
                reason: "empty",
            });
        }
        if name.len() > MAX_ACCOUNT_NAME_LENGTH {
            return Err(ChainError::InvalidAccountName {
                name,
                reason: "longer than 12 characters",
            });
        }
        if !name.chars().all(config::is_account_name_char) {
            return Err(ChainError::InvalidAccountName {
                name,
                reason: "contains characters outside [a-z1-5.]",
            });
        }
        if name.starts_with('.') || name.ends_with('.') {
            return Err(ChainError::InvalidAccountName {
                name,
                reason: "leading or trailing '.'",
            });
        }
        Ok(Self(name))
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for AccountName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountName({})", self.0)
    }
}

// ---------------------------------------------------------------------------
// MessageName
// ---------------------------------------------------------------------------

/// The logical type tag of a message — which operation its payload encodes.
///
/// Unlike [`AccountName`] this is not validated: the set of meaningful
/// message types belongs to the interpreter, not to this crate.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MessageName(String);

impl MessageName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MessageName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for MessageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for MessageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MessageName({})", self.0)
    }
}

// ---------------------------------------------------------------------------
// ChainId
// ---------------------------------------------------------------------------

/// The domain-separation value unique to one Helios network.
///
/// Mixed into every signing digest so a signature valid on one chain can
/// never be replayed on another chain that happens to share transaction
/// content. Conventionally the digest of the network's genesis state.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChainId(Digest);

impl ChainId {
    pub fn new(digest: Digest) -> Self {
        Self(digest)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_bytes()
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChainId({}..)", &self.0.to_hex()[..16])
    }
}

// ---------------------------------------------------------------------------
// BlockId
// ---------------------------------------------------------------------------

/// A 32-byte block identifier with the block height folded into the first
/// four bytes.
///
/// Layout: bytes 0..4 are the block height, big-endian; bytes 4..32 are
/// hash material. Packing the height in means anyone holding a block id can
/// read the height without a lookup — and it is why TaPoS stores bytes 4..8
/// as its prefix: the first four bytes would add no entropy.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockId([u8; 32]);

impl BlockId {
    /// Wraps raw block-id bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Assembles a block id from a height and the block's content digest,
    /// overwriting the digest's first four bytes with the height.
    pub fn from_parts(block_num: u32, content_digest: &Digest) -> Self {
        let mut bytes = *content_digest.as_bytes();
        bytes[..4].copy_from_slice(&block_num.to_be_bytes());
        Self(bytes)
    }

    /// The full block height, read from the first four bytes.
    pub fn block_num(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }

    /// The TaPoS prefix: bytes 4..8 as a little-endian u32. This is the
    /// slice of actual hash material a transaction commits to.
    pub fn ref_prefix(&self) -> u32 {
        let s = &self.0[REF_PREFIX_OFFSET..REF_PREFIX_OFFSET + 4];
        u32::from_le_bytes([s[0], s[1], s[2], s[3]])
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockId(num={}, {}..)", self.block_num(), &self.to_hex()[..16])
    }
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// One message: a logical type tag plus its canonically encoded payload.
///
/// The payload is opaque to this crate — bytes in, bytes out. The typed
/// accessors encode and decode through bincode so that a payload written by
/// [`Message::from_value`] reads back identically via
/// [`Message::decode_as`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Which operation this payload encodes. Meaning belongs to the
    /// interpreter.
    pub message_type: MessageName,
    /// Canonical bincode encoding of the payload value.
    pub data: Vec<u8>,
}

impl Message {
    /// Builds a message from a pre-serialized payload.
    pub fn from_serialized(message_type: MessageName, data: Vec<u8>) -> Self {
        Self { message_type, data }
    }

    /// Builds a message by canonically encoding `value`.
    pub fn from_value<T: Serialize>(
        message_type: MessageName,
        value: &T,
    ) -> Result<Self, ChainError> {
        let data = bincode::serialize(value).map_err(|_| ChainError::MessageDecodeMismatch {
            message_type: message_type.to_string(),
            target: std::any::type_name::<T>(),
        })?;
        Ok(Self { message_type, data })
    }

    /// Decodes the payload as `T`.
    ///
    /// Fails with a decode mismatch when the stored bytes do not form a
    /// valid encoding of `T`. Note the limits of a tagless wire format:
    /// two types with identical encodings are indistinguishable, so the
    /// `message_type` tag — not this function — is the source of truth for
    /// what a payload *means*.
    pub fn decode_as<T: DeserializeOwned>(&self) -> Result<T, ChainError> {
        bincode::deserialize(&self.data).map_err(|_| ChainError::MessageDecodeMismatch {
            message_type: self.message_type.to_string(),
            target: std::any::type_name::<T>(),
        })
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Message(type={}, {} bytes)",
            self.message_type,
            self.data.len()
        )
    }
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// The common transaction fields shared by every variant.
///
/// Each field carries an invariant:
///
/// - `ref_block_num` holds only the **low 16 bits** of the referenced block
///   height, so it identifies a block unambiguously only within the most
///   recent 65,536 blocks. That bound *is* the replay-protection window.
/// - `ref_block_prefix` holds bytes 4..8 of the referenced block's id —
///   the first four bytes already encode the height and would add nothing.
/// - `expiration` must not sit beyond the retention horizon; nodes do not
///   keep history past it, so a farther expiration is invalid, not merely
///   optimistic.
///
/// Do not write the reference fields by hand; go through
/// [`set_reference_block`](crate::transaction::tapos::set_reference_block).
#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Transaction {
    /// Low 16 bits of the referenced block's height.
    pub ref_block_num: u16,
    /// Bytes 4..8 of the referenced block's id, little-endian.
    pub ref_block_prefix: u32,
    /// Unix timestamp (seconds) after which this transaction is invalid.
    pub expiration: u64,
    /// The messages to apply, atomically and in order.
    pub messages: Vec<Message>,
}

impl Transaction {
    /// An empty transaction. All fields zero, no messages.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the expiration timestamp (unix seconds).
    ///
    /// This only records the value; whether it is acceptable relative to
    /// "now" and the retention horizon is checked at submission by
    /// [`validate_expiration`](crate::transaction::validation::validate_expiration).
    pub fn set_expiration(&mut self, unix_secs: u64) {
        self.expiration = unix_secs;
    }

    /// Client-side convenience: sets the expiration from a wall-clock time.
    ///
    /// Timestamps before the unix epoch clamp to zero, which is always
    /// expired. Validation works with plain `u64` seconds; this is the only
    /// place calendar time enters the crate.
    pub fn set_expiration_at(&mut self, when: DateTime<Utc>) {
        self.expiration = when.timestamp().max(0) as u64;
    }

    /// Replaces the message at `index` with a freshly encoded one.
    pub fn set_message<T: Serialize>(
        &mut self,
        index: usize,
        message_type: MessageName,
        value: &T,
    ) -> Result<(), ChainError> {
        if index >= self.messages.len() {
            return Err(ChainError::IndexOutOfRange {
                index,
                len: self.messages.len(),
            });
        }
        self.messages[index] = Message::from_value(message_type, value)?;
        Ok(())
    }

    /// Decodes the message at `index` as `T`.
    pub fn message_as<T: DeserializeOwned>(&self, index: usize) -> Result<T, ChainError> {
        let message = self
            .messages
            .get(index)
            .ok_or(ChainError::IndexOutOfRange {
                index,
                len: self.messages.len(),
            })?;
        message.decode_as::<T>()
    }

    /// Appends a message built from a value, preserving existing order.
    pub fn emplace_message<T: Serialize>(
        &mut self,
        message_type: MessageName,
        value: &T,
    ) -> Result<(), ChainError> {
        self.messages.push(Message::from_value(message_type, value)?);
        Ok(())
    }

    /// Appends a message with a pre-serialized payload.
    pub fn emplace_serialized_message(&mut self, message_type: MessageName, data: Vec<u8>) {
        self.messages.push(Message::from_serialized(message_type, data));
    }

    /// Empties the message sequence, for reusing a transaction shell.
    ///
    /// After clearing, the transaction digests identically to a freshly
    /// built transaction with the same non-message fields.
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}
