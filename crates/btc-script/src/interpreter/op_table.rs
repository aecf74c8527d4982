//! Opcode dispatch table.
//!
//! Every implemented opcode maps to one function. Operations differ in what
//! they need beyond the data stack, so the table groups them by calling
//! convention.

use std::collections::VecDeque;

use super::error::{InterpreterError, InterpreterErrorCode};
use super::ops_arithmetic::*;
use super::ops_crypto::*;
use super::ops_data::*;
use super::ops_flow::*;
use super::ops_stack::*;
use super::stack::Stack;
use super::SignatureChecker;
use crate::command::Command;
use crate::opcodes::*;

/// Result of running one operation. `Err` fails the whole evaluation.
pub type OpResult = Result<(), InterpreterError>;

/// An opcode implementation, tagged by the state it needs.
#[derive(Clone, Copy)]
pub enum Operation {
    /// Data stack only.
    Stack(fn(&mut Stack) -> OpResult),
    /// Data stack and the pending command queue (OP_IF, OP_NOTIF).
    Queue(fn(&mut Stack, &mut VecDeque<Command>) -> OpResult),
    /// Data stack and alt stack (OP_TOALTSTACK, OP_FROMALTSTACK).
    AltStack(fn(&mut Stack, &mut Stack) -> OpResult),
    /// Data stack, signature hash and checker (the OP_CHECKSIG family).
    SigHash(fn(&mut Stack, &[u8; 32], &dyn SignatureChecker) -> OpResult),
}

/// Look up the implementation of `op`.
///
/// # Returns
/// `None` for opcodes the evaluator does not support, including OP_ELSE
/// and OP_ENDIF outside a conditional, disabled opcodes and the lock-time
/// checks.
pub fn lookup(op: u8) -> Option<Operation> {
    use Operation::{AltStack, Queue, SigHash, Stack as S};

    let operation = match op {
        // Constants
        OP_0 => S(op_0),
        OP_1NEGATE => S(op_1negate),
        OP_1 => S(op_1),
        OP_2 => S(op_2),
        OP_3 => S(op_3),
        OP_4 => S(op_4),
        OP_5 => S(op_5),
        OP_6 => S(op_6),
        OP_7 => S(op_7),
        OP_8 => S(op_8),
        OP_9 => S(op_9),
        OP_10 => S(op_10),
        OP_11 => S(op_11),
        OP_12 => S(op_12),
        OP_13 => S(op_13),
        OP_14 => S(op_14),
        OP_15 => S(op_15),
        OP_16 => S(op_16),

        // Flow control
        OP_NOP | OP_NOP1 | OP_NOP4..=OP_NOP10 => S(op_nop),
        OP_IF => Queue(op_if),
        OP_NOTIF => Queue(op_notif),
        OP_VERIFY => S(op_verify),
        OP_RETURN => S(op_return),

        // Stack
        OP_TOALTSTACK => AltStack(op_toaltstack),
        OP_FROMALTSTACK => AltStack(op_fromaltstack),
        OP_2DROP => S(op_2drop),
        OP_2DUP => S(op_2dup),
        OP_3DUP => S(op_3dup),
        OP_2OVER => S(op_2over),
        OP_2ROT => S(op_2rot),
        OP_2SWAP => S(op_2swap),
        OP_IFDUP => S(op_ifdup),
        OP_DEPTH => S(op_depth),
        OP_DROP => S(op_drop),
        OP_DUP => S(op_dup),
        OP_NIP => S(op_nip),
        OP_OVER => S(op_over),
        OP_PICK => S(op_pick),
        OP_ROLL => S(op_roll),
        OP_ROT => S(op_rot),
        OP_SWAP => S(op_swap),
        OP_TUCK => S(op_tuck),
        OP_SIZE => S(op_size),

        // Bitwise logic
        OP_EQUAL => S(op_equal),
        OP_EQUALVERIFY => S(op_equalverify),

        // Arithmetic
        OP_1ADD => S(op_1add),
        OP_1SUB => S(op_1sub),
        OP_NEGATE => S(op_negate),
        OP_ABS => S(op_abs),
        OP_NOT => S(op_not),
        OP_0NOTEQUAL => S(op_0notequal),
        OP_ADD => S(op_add),
        OP_SUB => S(op_sub),
        OP_BOOLAND => S(op_booland),
        OP_BOOLOR => S(op_boolor),
        OP_NUMEQUAL => S(op_numequal),
        OP_NUMEQUALVERIFY => S(op_numequalverify),
        OP_NUMNOTEQUAL => S(op_numnotequal),
        OP_LESSTHAN => S(op_lessthan),
        OP_GREATERTHAN => S(op_greaterthan),
        OP_LESSTHANOREQUAL => S(op_lessthanorequal),
        OP_GREATERTHANOREQUAL => S(op_greaterthanorequal),
        OP_MIN => S(op_min),
        OP_MAX => S(op_max),
        OP_WITHIN => S(op_within),

        // Crypto
        OP_RIPEMD160 => S(op_ripemd160),
        OP_SHA1 => S(op_sha1),
        OP_SHA256 => S(op_sha256),
        OP_HASH160 => S(op_hash160),
        OP_HASH256 => S(op_hash256),
        OP_CHECKSIG => SigHash(op_checksig),
        OP_CHECKSIGVERIFY => SigHash(op_checksigverify),
        OP_CHECKMULTISIG => SigHash(op_checkmultisig),
        OP_CHECKMULTISIGVERIFY => SigHash(op_checkmultisigverify),

        _ => return None,
    };
    Some(operation)
}

/// Pop the top item and fail with `code` unless it is numerically true.
pub(crate) fn verify_top(stack: &mut Stack, code: InterpreterErrorCode) -> OpResult {
    if stack.pop_bool()? {
        Ok(())
    } else {
        Err(InterpreterError::new(code, format!("{} failed", code)))
    }
}
