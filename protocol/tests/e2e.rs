//! End-to-end integration tests for the Helios transaction model.
//!
//! These tests exercise the full transaction lifecycle through the public
//! API only: build, pin to a reference block, sign, submit-validate,
//! execute through an interpreter, and commit the processed envelope to a
//! merkle root. They prove the pieces compose — the unit tests inside each
//! module already cover the pieces in isolation.
//!
//! Each test stands alone with its own keys, oracle, and interpreter.
//! No shared state, no test ordering dependencies.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use helios_protocol::codec::{from_bytes, to_bytes};
use helios_protocol::crypto::hash::{merkle_root, sha256};
use helios_protocol::crypto::keys::KeyPair;
use helios_protocol::transaction::{
    process_transaction, set_reference_block, validate_transaction, AccountName, BlockId, ChainId,
    GeneratedIdAllocator, GeneratedTransaction, Message, MessageInterpreter, MessageOutput,
    NotifyOutput, ProcessedTransaction, ReferenceBlockSource, SignedTransaction, Transaction,
};
use helios_protocol::ChainError;

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

const NOW: u64 = 1_700_000_000;

/// Opt-in tracing for test debugging: `RUST_LOG=debug cargo test`.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Transfer {
    from: String,
    to: String,
    amount: u64,
}

/// Oracle over the blocks a test chooses to retain, keyed by low-16 height
/// the way a node's reversible-block index is.
struct RetainedBlocks(BTreeMap<u16, BlockId>);

impl RetainedBlocks {
    fn with_blocks(blocks: &[BlockId]) -> Self {
        Self(
            blocks
                .iter()
                .map(|b| ((b.block_num() & 0xFFFF) as u16, *b))
                .collect(),
        )
    }
}

impl ReferenceBlockSource for RetainedBlocks {
    fn recent_block_id(&self, ref_block_num: u16) -> Option<BlockId> {
        self.0.get(&ref_block_num).copied()
    }
}

/// A toy ledger interpreter: executes `transfer` messages against in-memory
/// balances, notifies the receiving account, and schedules a deferred
/// settlement transaction for each transfer.
struct LedgerInterpreter {
    balances: BTreeMap<String, u64>,
    allocator: GeneratedIdAllocator,
}

impl LedgerInterpreter {
    fn with_balance(account: &str, balance: u64) -> Self {
        let mut balances = BTreeMap::new();
        balances.insert(account.to_string(), balance);
        Self {
            balances,
            allocator: GeneratedIdAllocator::new(),
        }
    }
}

impl MessageInterpreter for LedgerInterpreter {
    fn apply(&mut self, message: &Message) -> Result<MessageOutput, ChainError> {
        let transfer: Transfer = message.decode_as()?;
        let from_balance = self.balances.get(&transfer.from).copied().unwrap_or(0);
        if from_balance < transfer.amount {
            return Err(ChainError::ExecutionFailure {
                reason: format!("{} has {} < {}", transfer.from, from_balance, transfer.amount),
            });
        }
        self.balances.insert(transfer.from.clone(), from_balance - transfer.amount);
        *self.balances.entry(transfer.to.clone()).or_insert(0) += transfer.amount;

        let mut settlement = Transaction::new();
        settlement.set_expiration(NOW + 120);
        settlement
            .emplace_message("settle".into(), &(transfer.to.clone(), transfer.amount))?;

        let mut output = MessageOutput::empty();
        output.notify.push(NotifyOutput::new(
            AccountName::new(transfer.to.as_str())?,
            MessageOutput::empty(),
        ));
        output
            .deferred_transactions
            .push(GeneratedTransaction::new(self.allocator.next(), settlement));
        Ok(output)
    }
}

fn chain_id() -> ChainId {
    ChainId::new(sha256(b"helios-mainnet"))
}

fn tip_block() -> BlockId {
    BlockId::from_parts(1_234_567, &sha256(b"tip block content"))
}

fn build_signed_transfer(
    key: &KeyPair,
    reference: &BlockId,
    from: &str,
    to: &str,
    amount: u64,
) -> SignedTransaction {
    let mut tx = Transaction::new();
    tx.set_expiration(NOW + 60);
    set_reference_block(&mut tx, reference);
    tx.emplace_message(
        "transfer".into(),
        &Transfer {
            from: from.to_string(),
            to: to.to_string(),
            amount,
        },
    )
    .unwrap();

    let mut stx = SignedTransaction::new(tx);
    stx.sign_and_append(key, &chain_id()).unwrap();
    stx
}

// ---------------------------------------------------------------------------
// 1. Full Transfer Lifecycle
// ---------------------------------------------------------------------------

#[test]
fn full_transfer_lifecycle() {
    init_tracing();
    let tip = tip_block();
    let oracle = RetainedBlocks::with_blocks(&[tip]);
    let alice_key = KeyPair::generate();

    let stx = build_signed_transfer(&alice_key, &tip, "alice", "bob", 500);

    // Submission validation: fresh, well-referenced, recoverable signature.
    validate_transaction(&stx, &chain_id(), &oracle, NOW).unwrap();
    let signers = stx.get_signature_keys(&chain_id()).unwrap();
    assert!(signers.contains(&alice_key.public_key()));

    // Execution through the ledger.
    let mut ledger = LedgerInterpreter::with_balance("alice", 10_000);
    let processed = process_transaction(stx, &mut ledger).unwrap();
    processed.validate().unwrap();

    assert_eq!(ledger.balances["alice"], 9_500);
    assert_eq!(ledger.balances["bob"], 500);

    // The output recorded the notification and the deferred settlement.
    let output = &processed.output[0];
    assert_eq!(output.notify.len(), 1);
    assert_eq!(output.notify[0].name.as_str(), "bob");
    assert_eq!(output.deferred_transactions.len(), 1);

    // The envelope survives the wire.
    let recovered: ProcessedTransaction = from_bytes(&to_bytes(&processed).unwrap()).unwrap();
    assert_eq!(processed, recovered);
}

// ---------------------------------------------------------------------------
// 2. Multiple Messages, One Atomic Unit
// ---------------------------------------------------------------------------

#[test]
fn multi_message_transaction_is_atomic() {
    let tip = tip_block();
    let alice_key = KeyPair::generate();

    // Three transfers; the second overdraws and must sink all three.
    let mut tx = Transaction::new();
    tx.set_expiration(NOW + 60);
    set_reference_block(&mut tx, &tip);
    for (to, amount) in [("bob", 400u64), ("carol", 900), ("dave", 100)] {
        tx.emplace_message(
            "transfer".into(),
            &Transfer {
                from: "alice".to_string(),
                to: to.to_string(),
                amount,
            },
        )
        .unwrap();
    }
    let mut stx = SignedTransaction::new(tx);
    stx.sign_and_append(&alice_key, &chain_id()).unwrap();

    let mut ledger = LedgerInterpreter::with_balance("alice", 1_000);
    let result = process_transaction(stx, &mut ledger);
    assert!(matches!(result, Err(ChainError::ExecutionFailure { .. })));

    // No envelope was produced; reverting the partial debit to bob is the
    // interpreter's undo-session responsibility, exercised elsewhere.
}

// ---------------------------------------------------------------------------
// 3. Expired and Stale Transactions Never Reach Execution
// ---------------------------------------------------------------------------

#[test]
fn expired_transaction_rejected_at_submission() {
    let tip = tip_block();
    let oracle = RetainedBlocks::with_blocks(&[tip]);
    let key = KeyPair::generate();

    let mut stx = build_signed_transfer(&key, &tip, "alice", "bob", 10);
    stx.transaction.set_expiration(NOW - 1);

    assert!(matches!(
        validate_transaction(&stx, &chain_id(), &oracle, NOW),
        Err(ChainError::Expired { .. })
    ));
}

#[test]
fn transaction_pinned_to_unretained_block_rejected() {
    let old_tip = tip_block();
    // The oracle has since rolled past the pinned block.
    let oracle = RetainedBlocks::with_blocks(&[]);
    let key = KeyPair::generate();

    let stx = build_signed_transfer(&key, &old_tip, "alice", "bob", 10);

    assert!(matches!(
        validate_transaction(&stx, &chain_id(), &oracle, NOW),
        Err(ChainError::StaleOrUnknownReference { .. })
    ));
}

// ---------------------------------------------------------------------------
// 4. Cross-Chain Replay
// ---------------------------------------------------------------------------

#[test]
fn signature_from_another_chain_does_not_authorize() {
    let tip = tip_block();
    let key = KeyPair::generate();
    let stx = build_signed_transfer(&key, &tip, "alice", "bob", 10);

    // Replayed onto a network with a different chain id, the signature no
    // longer resolves to alice's key.
    let other_chain = ChainId::new(sha256(b"helios-testnet"));
    match stx.get_signature_keys(&other_chain) {
        Ok(keys) => assert!(!keys.contains(&key.public_key())),
        Err(ChainError::InvalidSignature { .. }) => {}
        Err(other) => panic!("unexpected error: {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// 5. Deferred Settlement Round
// ---------------------------------------------------------------------------

#[test]
fn deferred_transactions_carry_increasing_ids_across_messages() {
    let tip = tip_block();
    let key = KeyPair::generate();

    let mut tx = Transaction::new();
    tx.set_expiration(NOW + 60);
    set_reference_block(&mut tx, &tip);
    for to in ["bob", "carol", "dave"] {
        tx.emplace_message(
            "transfer".into(),
            &Transfer {
                from: "alice".to_string(),
                to: to.to_string(),
                amount: 100,
            },
        )
        .unwrap();
    }
    let mut stx = SignedTransaction::new(tx);
    stx.sign_and_append(&key, &chain_id()).unwrap();

    let mut ledger = LedgerInterpreter::with_balance("alice", 1_000);
    let processed = process_transaction(stx, &mut ledger).unwrap();
    processed.validate().unwrap();

    let ids: Vec<u64> = processed
        .output
        .iter()
        .flat_map(|o| o.deferred_transactions.iter().map(|g| g.id.value()))
        .collect();
    assert_eq!(ids, [0, 1, 2]);
}

// ---------------------------------------------------------------------------
// 6. Block Commitment
// ---------------------------------------------------------------------------

#[test]
fn merkle_root_commits_to_signatures_and_queue_positions() {
    let tip = tip_block();
    let alice_key = KeyPair::generate();
    let bob_key = KeyPair::generate();

    let stx_a = build_signed_transfer(&alice_key, &tip, "alice", "bob", 10);
    let stx_b = build_signed_transfer(&bob_key, &tip, "bob", "alice", 20);
    let gtx = GeneratedTransaction::new(
        GeneratedIdAllocator::new().next(),
        stx_a.transaction.clone(),
    );

    let leaves = vec![stx_a.merkle_digest(), stx_b.merkle_digest(), gtx.merkle_digest()];
    let root = merkle_root(&leaves);

    // Stripping a signature moves the root even though transaction ids
    // are unchanged.
    let mut stripped = stx_a.clone();
    stripped.signatures.clear();
    assert_eq!(stripped.id(), stx_a.id());
    let stripped_root = merkle_root(&[
        stripped.merkle_digest(),
        stx_b.merkle_digest(),
        gtx.merkle_digest(),
    ]);
    assert_ne!(root, stripped_root);
}

// ---------------------------------------------------------------------------
// 7. Wire Roundtrip of a Busy Transaction
// ---------------------------------------------------------------------------

#[test]
fn signed_transaction_survives_relay() {
    let tip = tip_block();
    let oracle = RetainedBlocks::with_blocks(&[tip]);
    let key = KeyPair::generate();

    let stx = build_signed_transfer(&key, &tip, "alice", "bob", 750);

    // A relaying peer decodes, re-validates, and re-encodes; nothing drifts.
    let bytes = to_bytes(&stx).unwrap();
    let relayed: SignedTransaction = from_bytes(&bytes).unwrap();
    assert_eq!(relayed, stx);
    assert_eq!(relayed.id(), stx.id());
    validate_transaction(&relayed, &chain_id(), &oracle, NOW).unwrap();
    assert_eq!(to_bytes(&relayed).unwrap(), bytes);
}
