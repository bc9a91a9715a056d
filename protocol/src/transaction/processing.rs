//! Driving messages through an interpreter, atomically.
//!
//! This crate owns the envelope, not the virtual machine. The
//! [`MessageInterpreter`] trait is the seam between the two: the caller
//! brings something that can execute one message and report what happened,
//! and the drivers here run a whole transaction through it under the
//! all-or-nothing rule. Either every message executes and every produced
//! output passes structural validation, or the caller gets an error and no
//! processed envelope at all — there is no type for "partially processed".

use tracing::{debug, warn};

use crate::error::ChainError;
use crate::transaction::generated::GeneratedTransaction;
use crate::transaction::output::{
    validate_generated_ids, MessageOutput, ProcessedGeneratedTransaction, ProcessedTransaction,
};
use crate::transaction::signing::SignedTransaction;
use crate::transaction::types::Message;

/// Executes one message and reports its effects.
///
/// Implemented outside this crate by whatever runs contract code. The
/// interpreter is responsible for filling the returned tree correctly —
/// recursing into notifications and inline messages itself — and for
/// drawing generated-transaction ids from a single per-block counter. The
/// drivers below verify both after the fact.
pub trait MessageInterpreter {
    fn apply(&mut self, message: &Message) -> Result<MessageOutput, ChainError>;
}

fn run_messages(
    messages: &[Message],
    interpreter: &mut impl MessageInterpreter,
) -> Result<Vec<MessageOutput>, ChainError> {
    let mut outputs = Vec::with_capacity(messages.len());
    for (index, message) in messages.iter().enumerate() {
        let output = interpreter.apply(message).map_err(|e| {
            warn!(index, message_type = %message.message_type, error = %e, "message execution failed");
            e
        })?;
        output.validate()?;
        outputs.push(output);
    }
    validate_generated_ids(&outputs)?;
    Ok(outputs)
}

/// Executes every message of a signed transaction, in order, producing the
/// processed envelope.
///
/// Fails — returning no envelope — if any message fails, if any output
/// subtree violates its structural invariants, or if generated ids across
/// the whole tree are not strictly increasing. The outputs accumulated
/// before the failure are dropped on the floor here; reverting the state
/// the interpreter already touched is the interpreter's job, typically via
/// an undo session wrapped around the call.
pub fn process_transaction(
    transaction: SignedTransaction,
    interpreter: &mut impl MessageInterpreter,
) -> Result<ProcessedTransaction, ChainError> {
    debug!(
        id = %transaction.id().to_hex(),
        messages = transaction.transaction.messages.len(),
        "processing transaction"
    );
    let outputs = run_messages(&transaction.transaction.messages, interpreter)?;
    Ok(ProcessedTransaction::new(transaction, outputs))
}

/// Executes a generated transaction retrieved from an earlier block.
///
/// Same atomicity contract as [`process_transaction`]. The envelope keeps
/// only the id; the body stays in the block that generated it.
pub fn process_generated_transaction(
    transaction: &GeneratedTransaction,
    interpreter: &mut impl MessageInterpreter,
) -> Result<ProcessedGeneratedTransaction, ChainError> {
    debug!(
        id = %transaction.id,
        messages = transaction.transaction.messages.len(),
        "processing generated transaction"
    );
    let outputs = run_messages(&transaction.transaction.messages, interpreter)?;
    Ok(ProcessedGeneratedTransaction::new(transaction.id, outputs))
}
