//! The transaction object model.
//!
//! Everything here orbits one value type, [`Transaction`]: the reference
//! block, the expiration, and the message sequence. The submodules layer
//! the rest on top —
//!
//! - [`digest`]: canonical bytes and the identity / signing digests
//! - [`tapos`]: pinning to and verifying against a recent block
//! - [`signing`]: the signature-carrying variant and key recovery
//! - [`generated`]: chain-internal transactions and id allocation
//! - [`output`]: the execution-output tree and its invariants
//! - [`processing`]: the interpreter seam and the atomic drivers
//! - [`validation`]: the submission pipeline
//!
//! The commonly used names are re-exported here; reach into a submodule
//! only for the free functions and traits.

pub mod digest;
pub mod generated;
pub mod output;
pub mod processing;
pub mod signing;
pub mod tapos;
pub mod types;
pub mod validation;

pub use digest::{sig_digest, transaction_digest};
pub use generated::{GeneratedIdAllocator, GeneratedTransaction, GeneratedTransactionId};
pub use output::{
    InlineTransaction, MessageOutput, NotifyOutput, PendingInlineTransaction,
    ProcessedGeneratedTransaction, ProcessedTransaction,
};
pub use processing::{process_generated_transaction, process_transaction, MessageInterpreter};
pub use signing::SignedTransaction;
pub use tapos::{set_reference_block, verify_reference_block, ReferenceBlockSource};
pub use types::{AccountName, BlockId, ChainId, Message, MessageName, Transaction};
pub use validation::{validate_expiration, validate_reference_block, validate_transaction};
