//! Interactive CLI demo of the Helios transaction lifecycle.
//!
//! Walks through key generation, building and pinning a transaction,
//! chain-bound signing, submission validation, execution through a toy
//! ledger interpreter, and the block-side merkle commitment. The output
//! uses ANSI escape codes for colored, storytelling-style rendering.
//!
//! Run with:
//!   cargo run --example demo --release

use std::collections::BTreeMap;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use helios_protocol::crypto::hash::{merkle_root, sha256};
use helios_protocol::crypto::keys::KeyPair;
use helios_protocol::transaction::{
    process_transaction, set_reference_block, validate_transaction, AccountName, BlockId, ChainId,
    GeneratedIdAllocator, GeneratedTransaction, Message, MessageInterpreter, MessageOutput,
    NotifyOutput, ReferenceBlockSource, SignedTransaction, Transaction,
};
use helios_protocol::ChainError;

// ---------------------------------------------------------------------------
// ANSI color constants
// ---------------------------------------------------------------------------

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const WHITE: &str = "\x1b[37m";

const BG_BLUE: &str = "\x1b[44m";

// ---------------------------------------------------------------------------
// Display helpers
// ---------------------------------------------------------------------------

fn banner() {
    println!();
    println!("{BG_BLUE}{BOLD}{WHITE}                                                          {RESET}");
    println!("{BG_BLUE}{BOLD}{WHITE}    HELIOS PROTOCOL  --  Transaction Lifecycle Demo       {RESET}");
    println!("{BG_BLUE}{BOLD}{WHITE}    secp256k1 recoverable ECDSA + SHA-256 + BLAKE3        {RESET}");
    println!("{BG_BLUE}{BOLD}{WHITE}                                                          {RESET}");
    println!();
}

fn section(num: u32, title: &str) {
    println!();
    println!("{BOLD}{CYAN}===[{YELLOW} Step {num} {CYAN}]=========================================={RESET}");
    println!("{BOLD}{WHITE}  {title}{RESET}");
    println!("{CYAN}----------------------------------------------------{RESET}");
}

fn success(text: &str) {
    println!("{GREEN}  [OK] {text}{RESET}");
}

fn info(label: &str, value: &str) {
    println!("{WHITE}  {BOLD}{label}:{RESET} {YELLOW}{value}{RESET}");
}

fn timing(label: &str, elapsed: std::time::Duration) {
    let ms = elapsed.as_secs_f64() * 1000.0;
    println!("{DIM}  [{label}: {ms:.2} ms]{RESET}");
}

// ---------------------------------------------------------------------------
// A toy ledger interpreter
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
struct Transfer {
    from: String,
    to: String,
    amount: u64,
}

struct LedgerInterpreter {
    balances: BTreeMap<String, u64>,
    allocator: GeneratedIdAllocator,
}

impl MessageInterpreter for LedgerInterpreter {
    fn apply(&mut self, message: &Message) -> Result<MessageOutput, ChainError> {
        let transfer: Transfer = message.decode_as()?;
        let from_balance = self.balances.get(&transfer.from).copied().unwrap_or(0);
        if from_balance < transfer.amount {
            return Err(ChainError::ExecutionFailure {
                reason: format!("{} cannot cover {}", transfer.from, transfer.amount),
            });
        }
        self.balances.insert(transfer.from.clone(), from_balance - transfer.amount);
        *self.balances.entry(transfer.to.clone()).or_insert(0) += transfer.amount;

        let mut receipt = Transaction::new();
        receipt.emplace_message("receipt".into(), &(transfer.to.clone(), transfer.amount))?;

        let mut output = MessageOutput::empty();
        output.notify.push(NotifyOutput::new(
            AccountName::new(transfer.to.as_str())?,
            MessageOutput::empty(),
        ));
        output
            .deferred_transactions
            .push(GeneratedTransaction::new(self.allocator.next(), receipt));
        Ok(output)
    }
}

struct SingleBlock(BlockId);

impl ReferenceBlockSource for SingleBlock {
    fn recent_block_id(&self, ref_block_num: u16) -> Option<BlockId> {
        ((self.0.block_num() & 0xFFFF) as u16 == ref_block_num).then_some(self.0)
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() {
    let demo_start = Instant::now();
    let now: u64 = 1_700_000_000;

    banner();

    // Step 1: keys.
    section(1, "Key Generation");
    let t = Instant::now();
    let alice = KeyPair::generate();
    timing("secp256k1 keygen", t.elapsed());
    info("Alice's public key", &alice.public_key().to_hex());

    // Step 2: build and pin.
    section(2, "Build and Pin a Transfer");
    let tip = BlockId::from_parts(1_234_567, &sha256(b"tip block content"));
    let oracle = SingleBlock(tip);

    let mut tx = Transaction::new();
    tx.set_expiration(now + 60);
    set_reference_block(&mut tx, &tip);
    tx.emplace_message(
        "transfer".into(),
        &Transfer {
            from: "alice".to_string(),
            to: "bob".to_string(),
            amount: 500,
        },
    )
    .unwrap();

    info("Reference block", &tip.block_num().to_string());
    info("ref_block_num (low 16 bits)", &tx.ref_block_num.to_string());
    info("ref_block_prefix", &format!("{:#010x}", tx.ref_block_prefix));
    success("Transaction pinned to the chain tip");

    // Step 3: sign.
    section(3, "Chain-Bound Signing");
    let chain_id = ChainId::new(sha256(b"helios-mainnet"));
    let mut stx = SignedTransaction::new(tx);

    let t = Instant::now();
    stx.sign_and_append(&alice, &chain_id).unwrap();
    timing("sign", t.elapsed());
    info("Transaction id", &stx.id().to_hex());
    info("Signing digest", &stx.sig_digest(&chain_id).to_hex());

    // Step 4: validate and recover.
    section(4, "Submission Validation");
    let t = Instant::now();
    validate_transaction(&stx, &chain_id, &oracle, now).unwrap();
    let signers = stx.get_signature_keys(&chain_id).unwrap();
    timing("validate + recover", t.elapsed());
    assert!(signers.contains(&alice.public_key()));
    success("Fresh, well-referenced, and signed by Alice's key");

    // Step 5: execute.
    section(5, "Execution");
    let mut ledger = LedgerInterpreter {
        balances: BTreeMap::from([("alice".to_string(), 10_000)]),
        allocator: GeneratedIdAllocator::new(),
    };

    let t = Instant::now();
    let processed = process_transaction(stx, &mut ledger).unwrap();
    processed.validate().unwrap();
    timing("execute + validate outputs", t.elapsed());

    info("Alice's balance", &ledger.balances["alice"].to_string());
    info("Bob's balance", &ledger.balances["bob"].to_string());
    info(
        "Notified",
        processed.output[0].notify[0].name.as_str(),
    );
    info(
        "Deferred receipts",
        &processed.output[0].deferred_transactions.len().to_string(),
    );
    success("Executed atomically; output tree validated");

    // Step 6: commit.
    section(6, "Block Commitment");
    let deferred = &processed.output[0].deferred_transactions[0];
    let leaves = vec![
        processed.transaction.merkle_digest(),
        deferred.merkle_digest(),
    ];
    let root = merkle_root(&leaves);
    info("Merkle root", &root.to_hex());
    success("Signed transaction and its deferred receipt committed");

    println!();
    println!(
        "  {BOLD}{GREEN}Total demo time: {:.2}s{RESET}",
        demo_start.elapsed().as_secs_f64()
    );
    println!();
}
