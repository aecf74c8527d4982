//! Crypto operations for the script interpreter.

use btc_primitives::hash;

use super::error::{InterpreterError, InterpreterErrorCode};
use super::op_table::{verify_top, OpResult};
use super::scriptnum::to_index;
use super::stack::Stack;
use super::SignatureChecker;

// ---------------------------------------------------------------------------
// Hashing
// ---------------------------------------------------------------------------

fn hash_top<const N: usize>(stack: &mut Stack, f: fn(&[u8]) -> [u8; N]) -> OpResult {
    let buf = stack.pop_byte_array()?;
    stack.push_byte_array(f(&buf).to_vec());
    Ok(())
}

pub fn op_ripemd160(stack: &mut Stack) -> OpResult {
    hash_top(stack, hash::ripemd160)
}

pub fn op_sha1(stack: &mut Stack) -> OpResult {
    hash_top(stack, hash::sha1)
}

pub fn op_sha256(stack: &mut Stack) -> OpResult {
    hash_top(stack, hash::sha256)
}

pub fn op_hash160(stack: &mut Stack) -> OpResult {
    hash_top(stack, hash::hash160)
}

pub fn op_hash256(stack: &mut Stack) -> OpResult {
    hash_top(stack, hash::hash256)
}

// ---------------------------------------------------------------------------
// Signatures
// ---------------------------------------------------------------------------

/// Drop the trailing sighash-type byte from a script signature.
fn strip_sighash(sig: &[u8]) -> Result<&[u8], InterpreterError> {
    match sig.split_last() {
        Some((_, der)) => Ok(der),
        None => Err(InterpreterError::new(
            InterpreterErrorCode::InvalidEncoding,
            "empty signature".to_string(),
        )),
    }
}

/// `<sig> <pubkey> OP_CHECKSIG`
///
/// Pushes 1 for a valid signature over `z` and the empty string otherwise.
/// A key or signature that does not parse fails the operation.
pub fn op_checksig(stack: &mut Stack, z: &[u8; 32], checker: &dyn SignatureChecker) -> OpResult {
    let sec = stack.pop_byte_array()?;
    let sig = stack.pop_byte_array()?;
    let valid = checker.check_signature(strip_sighash(&sig)?, &sec, z)?;
    stack.push_bool(valid);
    Ok(())
}

pub fn op_checksigverify(
    stack: &mut Stack,
    z: &[u8; 32],
    checker: &dyn SignatureChecker,
) -> OpResult {
    op_checksig(stack, z, checker)?;
    verify_top(stack, InterpreterErrorCode::CheckSigVerify)
}

/// `<dummy> <sig_1>..<sig_m> <m> <pubkey_1>..<pubkey_n> <n> OP_CHECKMULTISIG`
///
/// Each signature must verify against a different pubkey, and the pubkeys
/// must be used in the order they appear. The dummy element is popped but
/// not inspected.
pub fn op_checkmultisig(
    stack: &mut Stack,
    z: &[u8; 32],
    checker: &dyn SignatureChecker,
) -> OpResult {
    let n = to_index(&stack.pop_int()?)?;
    if stack.depth() < n + 1 {
        return Err(InterpreterError::new(
            InterpreterErrorCode::InvalidPubKeyCount,
            format!("{} pubkeys requested with {} items on stack", n, stack.depth()),
        ));
    }
    let mut pubkeys = pop_n(stack, n)?;
    pubkeys.reverse();

    let m = to_index(&stack.pop_int()?)?;
    if stack.depth() < m + 1 {
        return Err(InterpreterError::new(
            InterpreterErrorCode::InvalidSignatureCount,
            format!("{} signatures requested with {} items on stack", m, stack.depth()),
        ));
    }
    let mut sigs = pop_n(stack, m)?;
    sigs.reverse();

    // Extra element below the signatures; its value is ignored.
    stack.pop_byte_array()?;

    let mut keys = pubkeys.iter();
    let mut valid = m <= n;
    if valid {
        'sigs: for sig in &sigs {
            let der = strip_sighash(sig)?;
            for sec in keys.by_ref() {
                if checker.check_signature(der, sec, z)? {
                    continue 'sigs;
                }
            }
            valid = false;
            break;
        }
    }
    stack.push_bool(valid);
    Ok(())
}

pub fn op_checkmultisigverify(
    stack: &mut Stack,
    z: &[u8; 32],
    checker: &dyn SignatureChecker,
) -> OpResult {
    op_checkmultisig(stack, z, checker)?;
    verify_top(stack, InterpreterErrorCode::CheckMultiSigVerify)
}

fn pop_n(stack: &mut Stack, n: usize) -> Result<Vec<Vec<u8>>, InterpreterError> {
    (0..n).map(|_| stack.pop_byte_array()).collect()
}
