//! Interpreter error types.
//!
//! An `InterpreterError` explains why an evaluation returned false. It is
//! diagnostic only: `Script::evaluate` collapses every error into `false`.

use std::fmt;

/// Error codes for the script interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpreterErrorCode {
    EmptyStack,
    EvalFalse,
    InvalidStackOperation,
    UnknownOpcode,
    EarlyReturn,
    Verify,
    EqualVerify,
    NumEqualVerify,
    CheckSigVerify,
    CheckMultiSigVerify,
    UnbalancedConditional,
    InvalidPubKeyCount,
    InvalidSignatureCount,
    InvalidEncoding,
    NumberTooBig,
    ElementTooBig,
    StackOverflow,
    TooManyOperations,
    ExpansionTooDeep,
    ScriptHashMismatch,
    WitnessScriptHashMismatch,
    EmptyWitness,
    MalformedNestedScript,
}

impl fmt::Display for InterpreterErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A script interpreter error with an error code and description.
#[derive(Debug, Clone)]
pub struct InterpreterError {
    pub code: InterpreterErrorCode,
    pub description: String,
}

impl InterpreterError {
    pub fn new(code: InterpreterErrorCode, description: String) -> Self {
        InterpreterError { code, description }
    }
}

impl fmt::Display for InterpreterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description)
    }
}

impl std::error::Error for InterpreterError {}

