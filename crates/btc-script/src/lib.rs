/// Bitcoin script codec, evaluator and address derivation.
///
/// Provides the Script type as a list of commands, opcode definitions,
/// length-prefixed parsing and serialization, standard template builders
/// and recognizers, p2pkh/p2sh/p2wpkh/p2wsh addresses, and a stack-machine
/// interpreter with script-hash and segwit v0 expansion.

pub mod script;
pub mod opcodes;
pub mod command;
pub mod address;
pub mod interpreter;

mod error;
pub use error::ScriptError;
pub use script::{p2pkh_script, p2sh_script, p2wpkh_script, p2wsh_script, Script};
pub use address::Network;
pub use command::Command;
