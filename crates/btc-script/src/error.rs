/// Error types for script operations.
///
/// Covers parsing and serialization failures and address derivation for
/// script shapes that have no address. Evaluation failures are not here:
/// they are `InterpreterError`s and never escape `Script::evaluate`.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// Malformed serialized script: truncated stream, a push overrunning
    /// the declared length, or a push too large to serialize.
    #[error("format error: {0}")]
    Format(String),

    /// Address requested for a script that is not a recognized pubkey script.
    #[error("unknown script pubkey: {0}")]
    UnknownScriptPubKey(String),

    /// Hex decoding error.
    #[error("hex decode error: {0}")]
    HexDecode(#[from] hex::FromHexError),

    /// Error from primitives crate.
    #[error("primitives error: {0}")]
    Primitives(#[from] btc_primitives::PrimitivesError),
}
