//! TaPoS — the freshness protocol.
//!
//! A transaction must refer to a recent block, asserting a known
//! state-precondition its signers relied on. Rather than carry a full
//! 32-byte block id, the envelope stores 6 bytes: the low 16 bits of the
//! referenced height and a 4-byte slice of the block id's hash material.
//! That bounds the replay window to the last 65,536 blocks (about 2.2 days
//! at a 3-second interval) while keeping the envelope small. A transaction
//! referencing anything older simply cannot be verified and is rejected as
//! expired.

use crate::transaction::types::{BlockId, Transaction};

/// The block-id oracle this crate consumes but does not implement.
///
/// Block validation owns the recent-block index; this trait is the narrow
/// slice of it that freshness checking needs: given the low 16 bits of a
/// height, the id of the unique retained block matching them, if any.
pub trait ReferenceBlockSource {
    /// Resolves a `ref_block_num` to the retained block's id, or `None`
    /// when no block within the window matches.
    fn recent_block_id(&self, ref_block_num: u16) -> Option<BlockId>;
}

/// Pins `t` to `reference_block`.
///
/// Stores the low 16 bits of the block height into `ref_block_num` and
/// bytes 4..8 of the block id into `ref_block_prefix`. Mutates the
/// transaction in place; callers must not set those fields directly.
pub fn set_reference_block(t: &mut Transaction, reference_block: &BlockId) {
    t.ref_block_num = (reference_block.block_num() & 0xFFFF) as u16;
    t.ref_block_prefix = reference_block.ref_prefix();
}

/// Returns `true` iff `t` was pinned to `reference_block`.
///
/// Recomputes the low-16-bit height and the byte-4..8 prefix and compares
/// both against the stored values. This is a predicate, not an assertion:
/// a `false` tells the caller the reference doesn't match, and the caller —
/// block validation, typically — decides whether that means "outside the
/// retained window" or "forged". The two are indistinguishable down here.
pub fn verify_reference_block(t: &Transaction, reference_block: &BlockId) -> bool {
    t.ref_block_num == (reference_block.block_num() & 0xFFFF) as u16
        && t.ref_block_prefix == reference_block.ref_prefix()
}
