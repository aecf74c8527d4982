//! Bitcoin script interpreter.
//!
//! Evaluates a combined `script_sig + script_pubkey` against a signature
//! hash and an optional witness, including pay-to-script-hash and segwit v0
//! (p2wpkh, p2wsh) programs.
//!
//! # Architecture
//!
//! The interpreter runs a queue of commands. Data pushes go to the stack;
//! opcodes are dispatched through [`op_table::lookup`]. Script-hash and
//! witness templates are recognised as they execute and replaced in place
//! by the script they commit to, so nested programs run in the same loop.
//!
//! Signature checking goes through the [`SignatureChecker`] trait. The
//! caller supplies the signature hash `z`, so no transaction type is
//! needed here.
//!
//! # Example
//!
//! ```ignore
//! use btc_script::interpreter::{Config, Engine};
//!
//! let engine = Engine::new().with_config(Config::default().with_max_ops(500));
//! engine.execute(&(script_sig + script_pubkey), &z, &witness)?;
//! ```

pub mod config;
pub mod error;
pub mod op_table;
pub mod ops_arithmetic;
pub mod ops_crypto;
pub mod ops_data;
pub mod ops_flow;
pub mod ops_stack;
pub mod scriptnum;
pub mod stack;
pub mod thread;

pub use config::Config;
pub use error::{InterpreterError, InterpreterErrorCode};
pub use op_table::{lookup, OpResult, Operation};
pub use stack::Stack;

use btc_primitives::ec::{PublicKey, Signature};

use crate::Script;
use thread::Thread;

/// Signature verification used by OP_CHECKSIG and OP_CHECKMULTISIG.
pub trait SignatureChecker {
    /// Check a DER signature (sighash byte already removed) against a SEC
    /// public key and the signature hash `z`.
    ///
    /// Returns Ok(true) if valid, Ok(false) if invalid, Err if the key or
    /// signature cannot be parsed.
    fn check_signature(&self, sig_der: &[u8], sec: &[u8], z: &[u8; 32])
        -> Result<bool, InterpreterError>;
}

/// secp256k1 ECDSA checker.
#[derive(Debug, Default, Clone, Copy)]
pub struct EcdsaChecker;

impl SignatureChecker for EcdsaChecker {
    fn check_signature(
        &self,
        sig_der: &[u8],
        sec: &[u8],
        z: &[u8; 32],
    ) -> Result<bool, InterpreterError> {
        let key = PublicKey::from_sec(sec)
            .map_err(|e| InterpreterError::new(InterpreterErrorCode::InvalidEncoding, e.to_string()))?;
        let sig = Signature::from_der(sig_der)
            .map_err(|e| InterpreterError::new(InterpreterErrorCode::InvalidEncoding, e.to_string()))?;
        Ok(key.verify(z, &sig))
    }
}

/// The script execution engine.
#[derive(Debug, Clone)]
pub struct Engine<C = EcdsaChecker> {
    cfg: Config,
    checker: C,
}

impl Engine {
    pub fn new() -> Self {
        Engine {
            cfg: Config::default(),
            checker: EcdsaChecker,
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: SignatureChecker> Engine<C> {
    /// Replace the signature checker.
    pub fn with_checker<D: SignatureChecker>(self, checker: D) -> Engine<D> {
        Engine {
            cfg: self.cfg,
            checker,
        }
    }

    pub fn with_config(mut self, cfg: Config) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Execute a script.
    ///
    /// # Arguments
    /// * `script` - Usually `script_sig + script_pubkey`.
    /// * `z` - The signature hash checked by OP_CHECKSIG.
    /// * `witness` - Witness items; empty for legacy inputs.
    ///
    /// # Returns
    /// `Ok(())` if the script leaves a non-empty top element, otherwise the
    /// error that stopped it.
    pub fn execute(
        &self,
        script: &Script,
        z: &[u8; 32],
        witness: &[Vec<u8>],
    ) -> Result<(), InterpreterError> {
        let mut thread = Thread::new(script, z, witness, &self.checker, self.cfg);
        thread.execute()
    }

    /// Like `execute`, collapsing the outcome to a verdict.
    pub fn evaluate(&self, script: &Script, z: &[u8; 32], witness: &[Vec<u8>]) -> bool {
        match self.execute(script, z, witness) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!("script evaluation failed: {} ({})", e, e.code);
                false
            }
        }
    }
}
