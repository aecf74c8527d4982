//! Script commands and their raw byte encoding.
//!
//! A command is either an opcode or a data push carrying its bytes. This
//! module decodes a raw script body into commands and encodes commands back
//! with the shortest push prefix.

use btc_primitives::util::ByteReader;

use crate::interpreter::config::MAX_SCRIPT_ELEMENT_SIZE;
use crate::opcodes::*;
use crate::ScriptError;

/// Largest push that fits the single-byte length prefix.
const MAX_DIRECT_PUSH: usize = 75;

/// A single parsed element of a script.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// An opcode byte, executed by the evaluator.
    Opcode(u8),
    /// Data placed on the stack when executed.
    Push(Vec<u8>),
}

impl Command {
    pub fn is_push(&self) -> bool {
        matches!(self, Command::Push(_))
    }

    /// The pushed bytes, if this is a push.
    pub fn as_push(&self) -> Option<&[u8]> {
        match self {
            Command::Push(data) => Some(data),
            Command::Opcode(_) => None,
        }
    }

    /// The opcode byte, if this is an opcode.
    pub fn opcode(&self) -> Option<u8> {
        match self {
            Command::Opcode(op) => Some(*op),
            Command::Push(_) => None,
        }
    }

    /// Render as an ASM token: hex for pushes, the opcode name otherwise.
    pub fn to_asm_string(&self) -> String {
        match self {
            Command::Opcode(op) => opcode_to_string(*op),
            Command::Push(data) => hex::encode(data),
        }
    }

    /// Append the raw encoding of this command to `out`.
    pub fn encode_into(&self, out: &mut Vec<u8>) -> Result<(), ScriptError> {
        match self {
            Command::Opcode(op) => out.push(*op),
            Command::Push(data) => {
                out.extend_from_slice(&push_data_prefix(data.len())?);
                out.extend_from_slice(data);
            }
        }
        Ok(())
    }
}

impl From<u8> for Command {
    fn from(op: u8) -> Self {
        Command::Opcode(op)
    }
}

impl From<Vec<u8>> for Command {
    fn from(data: Vec<u8>) -> Self {
        Command::Push(data)
    }
}

impl From<&[u8]> for Command {
    fn from(data: &[u8]) -> Self {
        Command::Push(data.to_vec())
    }
}

/// Compute the push prefix for a payload of `data_len` bytes.
///
/// Uses the shortest of the three tiers: a single length byte up to 75,
/// `OP_PUSHDATA1` up to 255, `OP_PUSHDATA2` up to 520.
///
/// # Returns
/// The prefix bytes, or `ScriptError::Format` for payloads over 520 bytes.
pub fn push_data_prefix(data_len: usize) -> Result<Vec<u8>, ScriptError> {
    if data_len <= MAX_DIRECT_PUSH {
        Ok(vec![data_len as u8])
    } else if data_len <= 0xff {
        Ok(vec![OP_PUSHDATA1, data_len as u8])
    } else if data_len <= MAX_SCRIPT_ELEMENT_SIZE {
        let mut buf = vec![OP_PUSHDATA2];
        buf.extend_from_slice(&(data_len as u16).to_le_bytes());
        Ok(buf)
    } else {
        Err(ScriptError::Format(format!(
            "push of {} bytes exceeds {} byte limit",
            data_len, MAX_SCRIPT_ELEMENT_SIZE
        )))
    }
}

/// Decode a raw script body (no length prefix) into commands.
///
/// Bytes 1..=75 push that many following bytes, `OP_PUSHDATA1` and
/// `OP_PUSHDATA2` read a 1- or 2-byte little-endian length first, and every
/// other byte is an opcode. `OP_PUSHDATA4` is treated as a plain opcode.
///
/// # Returns
/// The commands, or `ScriptError::Format` if a push runs past the end.
pub fn decode_commands(body: &[u8]) -> Result<Vec<Command>, ScriptError> {
    let mut reader = ByteReader::new(body);
    let mut commands = Vec::new();

    while reader.remaining() > 0 {
        let op = reader.read_u8().map_err(truncated)?;
        let length = match op {
            0x01..=0x4b => op as usize,
            OP_PUSHDATA1 => reader.read_le(1).map_err(truncated)? as usize,
            OP_PUSHDATA2 => reader.read_le(2).map_err(truncated)? as usize,
            _ => {
                commands.push(Command::Opcode(op));
                continue;
            }
        };
        let data = reader.read_bytes(length).map_err(truncated)?;
        commands.push(Command::Push(data.to_vec()));
    }

    Ok(commands)
}

/// Encode commands as a raw script body (no length prefix).
pub fn encode_commands(commands: &[Command]) -> Result<Vec<u8>, ScriptError> {
    let mut out = Vec::new();
    for cmd in commands {
        cmd.encode_into(&mut out)?;
    }
    Ok(out)
}

fn truncated(err: btc_primitives::PrimitivesError) -> ScriptError {
    ScriptError::Format(format!("push runs past end of script: {}", err))
}
