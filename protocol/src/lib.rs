// Copyright (c) 2026 Helios Contributors. MIT License.
// See LICENSE for details.

//! # Helios Protocol — Transaction Object Model
//!
//! This crate defines the transaction envelope for the Helios execution
//! layer and nothing else. A transaction here is a set of messages that must
//! be applied atomically, pinned to a recent block so it cannot be replayed
//! forever, and signed against a digest that includes the chain identifier
//! so a signature on one network is worthless on another.
//!
//! What this crate deliberately does NOT contain: the interpreter that runs
//! a message's business logic, block production, consensus, networking, and
//! permission resolution. Those are collaborators, consumed through the
//! traits in [`transaction::tapos`] and [`transaction::processing`].
//!
//! ## Architecture
//!
//! - **config** — Protocol constants. The TaPoS window, expiration horizon,
//!   key sizes. Magic numbers live here or nowhere.
//! - **crypto** — Digests and secp256k1 recoverable signatures. Thin,
//!   type-safe wrappers over audited implementations.
//! - **transaction** — The core value type, freshness protocol, signing,
//!   generated/deferred transactions, and the execution-output tree that an
//!   external interpreter must populate.
//! - **codec** — Canonical binary encoding for everything that crosses a
//!   process boundary.
//!
//! ## Design Philosophy
//!
//! 1. Every field encodes a consensus or security invariant. Document it.
//! 2. Pure functions over a shared value type beat inheritance hierarchies.
//! 3. If it touches money, it has tests. Plural.

pub mod codec;
pub mod config;
pub mod crypto;
pub mod error;
pub mod transaction;

pub use error::ChainError;
