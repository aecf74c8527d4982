//! Flow control operations for the script interpreter.
//!
//! Conditionals are resolved eagerly: OP_IF scans the remaining commands
//! for its matching OP_ELSE/OP_ENDIF, removes the whole block and puts the
//! selected branch back at the front. OP_ELSE and OP_ENDIF are never
//! executed on their own.

use std::collections::VecDeque;

use super::error::{InterpreterError, InterpreterErrorCode};
use super::op_table::{verify_top, OpResult};
use super::stack::Stack;
use crate::command::Command;
use crate::opcodes::{OP_ELSE, OP_ENDIF, OP_IF, OP_NOTIF};

pub fn op_nop(_stack: &mut Stack) -> OpResult {
    Ok(())
}

pub fn op_if(stack: &mut Stack, queue: &mut VecDeque<Command>) -> OpResult {
    conditional(stack, queue, false)
}

pub fn op_notif(stack: &mut Stack, queue: &mut VecDeque<Command>) -> OpResult {
    conditional(stack, queue, true)
}

pub fn op_verify(stack: &mut Stack) -> OpResult {
    verify_top(stack, InterpreterErrorCode::Verify)
}

pub fn op_return(_stack: &mut Stack) -> OpResult {
    Err(InterpreterError::new(
        InterpreterErrorCode::EarlyReturn,
        "script returned early".to_string(),
    ))
}

fn conditional(stack: &mut Stack, queue: &mut VecDeque<Command>, negate: bool) -> OpResult {
    let (true_branch, false_branch) = split_branches(queue)?;
    let cond = stack.pop_bool()?;
    let chosen = if cond != negate { true_branch } else { false_branch };
    for cmd in chosen.into_iter().rev() {
        queue.push_front(cmd);
    }
    Ok(())
}

/// Drain the queue up to the OP_ENDIF matching an already-consumed OP_IF.
///
/// Nested conditionals are copied into whichever branch contains them.
fn split_branches(
    queue: &mut VecDeque<Command>,
) -> Result<(Vec<Command>, Vec<Command>), InterpreterError> {
    let mut true_branch = Vec::new();
    let mut false_branch = Vec::new();
    let mut in_else = false;
    let mut depth = 1usize;

    while let Some(cmd) = queue.pop_front() {
        match cmd {
            Command::Opcode(OP_IF | OP_NOTIF) => depth += 1,
            Command::Opcode(OP_ELSE) if depth == 1 => {
                in_else = true;
                continue;
            }
            Command::Opcode(OP_ENDIF) => {
                if depth == 1 {
                    return Ok((true_branch, false_branch));
                }
                depth -= 1;
            }
            _ => {}
        }
        if in_else {
            false_branch.push(cmd);
        } else {
            true_branch.push(cmd);
        }
    }

    Err(InterpreterError::new(
        InterpreterErrorCode::UnbalancedConditional,
        "end of script reached in conditional execution".to_string(),
    ))
}
