//! Script execution thread: the evaluation loop.

use std::collections::VecDeque;

use btc_primitives::hash::sha256;

use crate::command::Command;
use crate::opcodes::*;
use crate::script::{p2pkh_script, Script};

use super::config::Config;
use super::error::{InterpreterError, InterpreterErrorCode};
use super::op_table::{lookup, verify_top, Operation};
use super::ops_crypto::op_hash160;
use super::ops_stack::op_equal;
use super::stack::Stack;
use super::SignatureChecker;

/// The execution thread for one evaluation.
pub struct Thread<'a> {
    /// The main data stack used during script execution.
    pub dstack: Stack,
    /// The alternate stack used by OP_TOALTSTACK and OP_FROMALTSTACK.
    pub astack: Stack,
    /// Commands still to run. Expansions are spliced in at the front.
    pub queue: VecDeque<Command>,
    /// Interpreter limits.
    pub cfg: Config,
    /// Signature hash checked by the OP_CHECKSIG family.
    pub z: &'a [u8; 32],
    /// Witness items consumed by a segwit v0 expansion.
    pub witness: &'a [Vec<u8>],
    pub checker: &'a dyn SignatureChecker,
    /// Running count of executed commands, pushes included.
    pub num_ops: usize,
    /// Number of P2SH and witness expansions performed so far.
    pub expansions: usize,
}

impl<'a> Thread<'a> {
    pub fn new(
        script: &Script,
        z: &'a [u8; 32],
        witness: &'a [Vec<u8>],
        checker: &'a dyn SignatureChecker,
        cfg: Config,
    ) -> Self {
        Thread {
            dstack: Stack::new(),
            astack: Stack::new(),
            queue: script.commands().iter().cloned().collect(),
            cfg,
            z,
            witness,
            checker,
            num_ops: 0,
            expansions: 0,
        }
    }

    /// Run until the queue is empty, then judge the final stack.
    pub fn execute(&mut self) -> Result<(), InterpreterError> {
        while !self.step()? {}
        self.check_final_stack()
    }

    /// Execute one command. Returns true once nothing is left to run.
    pub fn step(&mut self) -> Result<bool, InterpreterError> {
        let Some(cmd) = self.queue.pop_front() else {
            return Ok(true);
        };

        self.num_ops += 1;
        if self.num_ops > self.cfg.max_ops() {
            tracing::warn!("script aborted after {} operations", self.cfg.max_ops());
            return Err(InterpreterError::new(
                InterpreterErrorCode::TooManyOperations,
                format!("exceeded max operation limit of {}", self.cfg.max_ops()),
            ));
        }

        match cmd {
            Command::Opcode(op) => self.execute_opcode(op)?,
            Command::Push(data) => self.execute_push(data)?,
        }

        let combined = self.dstack.depth() + self.astack.depth();
        if combined > self.cfg.max_stack_size() {
            tracing::warn!("script aborted with combined stack size {}", combined);
            return Err(InterpreterError::new(
                InterpreterErrorCode::StackOverflow,
                format!(
                    "combined stack size {} > max allowed {}",
                    combined,
                    self.cfg.max_stack_size()
                ),
            ));
        }

        Ok(self.queue.is_empty())
    }

    fn execute_opcode(&mut self, op: u8) -> Result<(), InterpreterError> {
        let Some(operation) = lookup(op) else {
            tracing::debug!("bad op: {}", opcode_to_string(op));
            return Err(InterpreterError::new(
                InterpreterErrorCode::UnknownOpcode,
                format!("unsupported opcode {}", opcode_to_string(op)),
            ));
        };

        let result = match operation {
            Operation::Stack(f) => f(&mut self.dstack),
            Operation::Queue(f) => f(&mut self.dstack, &mut self.queue),
            Operation::AltStack(f) => f(&mut self.dstack, &mut self.astack),
            Operation::SigHash(f) => f(&mut self.dstack, self.z, self.checker),
        };
        if let Err(e) = &result {
            tracing::debug!("bad op: {} ({})", opcode_to_string(op), e);
        }
        result
    }

    fn execute_push(&mut self, data: Vec<u8>) -> Result<(), InterpreterError> {
        if data.len() > self.cfg.max_script_element_size() {
            return Err(InterpreterError::new(
                InterpreterErrorCode::ElementTooBig,
                format!(
                    "element size {} exceeds max allowed size {}",
                    data.len(),
                    self.cfg.max_script_element_size()
                ),
            ));
        }

        if let Some(expected) = self.pending_script_hash() {
            let redeem = data.clone();
            self.dstack.push_byte_array(data);
            self.expand_p2sh(redeem, expected)?;
        } else {
            self.dstack.push_byte_array(data);
        }

        // Checked after a P2SH splice too: the hash check can leave a
        // witness program behind.
        let program_len = match self.dstack.items() {
            [version, program] if version.is_empty() => Some(program.len()),
            _ => None,
        };
        match program_len {
            Some(20) => self.expand_p2wpkh(),
            Some(32) => self.expand_p2wsh(),
            _ => Ok(()),
        }
    }

    /// The hash of a trailing `OP_HASH160 <20 bytes> OP_EQUAL`, when that is
    /// all that remains to run.
    fn pending_script_hash(&self) -> Option<Vec<u8>> {
        if self.queue.len() != 3 {
            return None;
        }
        match (&self.queue[0], &self.queue[1], &self.queue[2]) {
            (Command::Opcode(OP_HASH160), Command::Push(h), Command::Opcode(OP_EQUAL))
                if h.len() == 20 =>
            {
                Some(h.clone())
            }
            _ => None,
        }
    }

    /// Check the just-pushed redeem script against the committed hash and
    /// run it in place of the script hash template.
    fn expand_p2sh(&mut self, redeem: Vec<u8>, expected: Vec<u8>) -> Result<(), InterpreterError> {
        self.begin_expansion("p2sh")?;
        self.queue.clear();

        op_hash160(&mut self.dstack)?;
        self.dstack.push_byte_array(expected);
        op_equal(&mut self.dstack)?;
        verify_top(&mut self.dstack, InterpreterErrorCode::ScriptHashMismatch)?;

        let redeem_script = parse_nested(&redeem)?;
        self.prepend(redeem_script.into_commands());
        Ok(())
    }

    /// Replace `OP_0 <20-byte hash>` with the witness items followed by the
    /// equivalent pay-to-pubkey-hash script.
    fn expand_p2wpkh(&mut self) -> Result<(), InterpreterError> {
        self.begin_expansion("p2wpkh")?;
        let program = self.dstack.pop_byte_array()?;
        self.dstack.pop_byte_array()?;

        let mut h160 = [0u8; 20];
        h160.copy_from_slice(&program);
        let mut cmds: Vec<Command> = self.witness.iter().cloned().map(Command::Push).collect();
        cmds.extend(p2pkh_script(&h160).into_commands());
        self.prepend(cmds);
        Ok(())
    }

    /// Replace `OP_0 <32-byte hash>` with all but the last witness item
    /// followed by the witness script, which must hash to the program.
    fn expand_p2wsh(&mut self) -> Result<(), InterpreterError> {
        self.begin_expansion("p2wsh")?;
        let program = self.dstack.pop_byte_array()?;
        self.dstack.pop_byte_array()?;

        let Some((witness_script, items)) = self.witness.split_last() else {
            return Err(InterpreterError::new(
                InterpreterErrorCode::EmptyWitness,
                "p2wsh program with empty witness".to_string(),
            ));
        };
        if sha256(witness_script)[..] != program[..] {
            tracing::debug!("bad witness script hash");
            return Err(InterpreterError::new(
                InterpreterErrorCode::WitnessScriptHashMismatch,
                format!("witness script does not hash to {}", hex::encode(&program)),
            ));
        }

        let mut cmds: Vec<Command> = items.iter().cloned().map(Command::Push).collect();
        cmds.extend(parse_nested(witness_script)?.into_commands());
        self.prepend(cmds);
        Ok(())
    }

    fn begin_expansion(&mut self, kind: &str) -> Result<(), InterpreterError> {
        self.expansions += 1;
        if self.expansions > self.cfg.max_expansion_depth() {
            tracing::warn!("script aborted at {} expansion {}", kind, self.expansions);
            return Err(InterpreterError::new(
                InterpreterErrorCode::ExpansionTooDeep,
                format!(
                    "more than {} script expansions",
                    self.cfg.max_expansion_depth()
                ),
            ));
        }
        tracing::trace!("{} expansion {}", kind, self.expansions);
        Ok(())
    }

    fn prepend(&mut self, cmds: Vec<Command>) {
        for cmd in cmds.into_iter().rev() {
            self.queue.push_front(cmd);
        }
    }

    fn check_final_stack(&self) -> Result<(), InterpreterError> {
        let top = self.dstack.peek_byte_array(0).map_err(|_| {
            InterpreterError::new(
                InterpreterErrorCode::EmptyStack,
                "stack empty at end of script execution".to_string(),
            )
        })?;
        if top.is_empty() {
            return Err(InterpreterError::new(
                InterpreterErrorCode::EvalFalse,
                "false stack entry at end of script execution".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_nested(body: &[u8]) -> Result<Script, InterpreterError> {
    Script::parse_raw(body).map_err(|e| {
        InterpreterError::new(
            InterpreterErrorCode::MalformedNestedScript,
            format!("nested script does not parse: {}", e),
        )
    })
}
