//! Arithmetic operations for the script interpreter.
//!
//! Binary operators pop the top item first, so `a b OP_SUB` computes
//! `a - b` and `a b OP_LESSTHAN` tests `a < b`.

use num_bigint::BigInt;
use num_traits::{One, Signed, Zero};

use super::error::InterpreterErrorCode;
use super::op_table::{verify_top, OpResult};
use super::stack::Stack;

fn unary(stack: &mut Stack, f: impl FnOnce(BigInt) -> BigInt) -> OpResult {
    let m = stack.pop_int()?;
    stack.push_int(&f(m));
    Ok(())
}

/// Pop `b` then `a` and push `f(a, b)`.
fn binary(stack: &mut Stack, f: impl FnOnce(BigInt, BigInt) -> BigInt) -> OpResult {
    let b = stack.pop_int()?;
    let a = stack.pop_int()?;
    stack.push_int(&f(a, b));
    Ok(())
}

/// Pop `b` then `a` and push the boolean `f(a, b)`.
fn compare(stack: &mut Stack, f: impl FnOnce(&BigInt, &BigInt) -> bool) -> OpResult {
    let b = stack.pop_int()?;
    let a = stack.pop_int()?;
    stack.push_bool(f(&a, &b));
    Ok(())
}

fn flag(v: bool) -> BigInt {
    if v {
        BigInt::one()
    } else {
        BigInt::zero()
    }
}

pub fn op_1add(stack: &mut Stack) -> OpResult {
    unary(stack, |m| m + 1)
}

pub fn op_1sub(stack: &mut Stack) -> OpResult {
    unary(stack, |m| m - 1)
}

pub fn op_negate(stack: &mut Stack) -> OpResult {
    unary(stack, |m| -m)
}

pub fn op_abs(stack: &mut Stack) -> OpResult {
    unary(stack, |m| m.abs())
}

pub fn op_not(stack: &mut Stack) -> OpResult {
    unary(stack, |m| flag(m.is_zero()))
}

pub fn op_0notequal(stack: &mut Stack) -> OpResult {
    unary(stack, |m| flag(!m.is_zero()))
}

pub fn op_add(stack: &mut Stack) -> OpResult {
    binary(stack, |a, b| a + b)
}

pub fn op_sub(stack: &mut Stack) -> OpResult {
    binary(stack, |a, b| a - b)
}

pub fn op_booland(stack: &mut Stack) -> OpResult {
    compare(stack, |a, b| !a.is_zero() && !b.is_zero())
}

pub fn op_boolor(stack: &mut Stack) -> OpResult {
    compare(stack, |a, b| !a.is_zero() || !b.is_zero())
}

pub fn op_numequal(stack: &mut Stack) -> OpResult {
    compare(stack, |a, b| a == b)
}

pub fn op_numequalverify(stack: &mut Stack) -> OpResult {
    op_numequal(stack)?;
    verify_top(stack, InterpreterErrorCode::NumEqualVerify)
}

pub fn op_numnotequal(stack: &mut Stack) -> OpResult {
    compare(stack, |a, b| a != b)
}

pub fn op_lessthan(stack: &mut Stack) -> OpResult {
    compare(stack, |a, b| a < b)
}

pub fn op_greaterthan(stack: &mut Stack) -> OpResult {
    compare(stack, |a, b| a > b)
}

pub fn op_lessthanorequal(stack: &mut Stack) -> OpResult {
    compare(stack, |a, b| a <= b)
}

pub fn op_greaterthanorequal(stack: &mut Stack) -> OpResult {
    compare(stack, |a, b| a >= b)
}

pub fn op_min(stack: &mut Stack) -> OpResult {
    binary(stack, |a, b| a.min(b))
}

pub fn op_max(stack: &mut Stack) -> OpResult {
    binary(stack, |a, b| a.max(b))
}

/// `x min max OP_WITHIN` pushes true when `min <= x < max`.
pub fn op_within(stack: &mut Stack) -> OpResult {
    let max = stack.pop_int()?;
    let min = stack.pop_int()?;
    let x = stack.pop_int()?;
    stack.push_bool(min <= x && x < max);
    Ok(())
}
