/// Bitcoin Script type: an ordered sequence of commands.
///
/// Scripts are used in transaction inputs (unlocking) and outputs (locking)
/// to define spending conditions. A `Script` holds its parsed commands and
/// provides parsing, serialization, standard-template construction,
/// classification and evaluation.

use std::fmt;
use std::ops::Add;

use btc_primitives::util::{ByteReader, VarInt};

use crate::command::{decode_commands, encode_commands, Command};
use crate::interpreter::Engine;
use crate::opcodes::*;
use crate::ScriptError;

/// A Bitcoin script as a list of commands.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Script {
    commands: Vec<Command>,
}

impl Script {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// Create a new empty script.
    pub fn new() -> Self {
        Script { commands: Vec::new() }
    }

    /// Create a script from a list of commands.
    pub fn from_commands(commands: Vec<Command>) -> Self {
        Script { commands }
    }

    /// Parse a length-prefixed script from a byte stream.
    ///
    /// Reads a varint length and then exactly that many bytes of script
    /// body. The reader is left positioned after the script.
    ///
    /// # Returns
    /// The parsed script, or `ScriptError::Format` if the stream ends early
    /// or a push runs past the declared length.
    pub fn parse(reader: &mut ByteReader<'_>) -> Result<Self, ScriptError> {
        let length = reader
            .read_varint()
            .map_err(|e| ScriptError::Format(format!("script length: {}", e)))?
            .value();
        let length = usize::try_from(length)
            .map_err(|_| ScriptError::Format(format!("script length {} too large", length)))?;
        let body = reader.read_bytes(length).map_err(|_| {
            ScriptError::Format(format!(
                "script declares {} bytes, {} available",
                length,
                reader.remaining()
            ))
        })?;
        Self::parse_raw(body)
    }

    /// Parse a script body that has no length prefix.
    ///
    /// Used for redeem scripts and witness scripts, whose bytes arrive as a
    /// single stack element.
    pub fn parse_raw(body: &[u8]) -> Result<Self, ScriptError> {
        Ok(Script {
            commands: decode_commands(body)?,
        })
    }

    /// Create a script from the hex of its length-prefixed serialization.
    ///
    /// # Arguments
    /// * `hex_str` - A hex string such as `"1976a914...88ac"`.
    ///
    /// # Returns
    /// The script, or an error if the hex is invalid, the script is
    /// malformed, or bytes are left over after it.
    pub fn from_hex(hex_str: &str) -> Result<Self, ScriptError> {
        let bytes = hex::decode(hex_str)?;
        let mut reader = ByteReader::new(&bytes);
        let script = Self::parse(&mut reader)?;
        if reader.remaining() != 0 {
            return Err(ScriptError::Format(format!(
                "{} trailing bytes after script",
                reader.remaining()
            )));
        }
        Ok(script)
    }

    // -----------------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------------

    /// Encode the commands without a length prefix.
    ///
    /// # Returns
    /// The raw script body, or `ScriptError::Format` if a push exceeds 520
    /// bytes.
    pub fn raw_serialize(&self) -> Result<Vec<u8>, ScriptError> {
        encode_commands(&self.commands)
    }

    /// Encode the script with its varint length prefix.
    pub fn serialize(&self) -> Result<Vec<u8>, ScriptError> {
        let raw = self.raw_serialize()?;
        let mut out = VarInt::from(raw.len()).to_bytes();
        out.extend_from_slice(&raw);
        Ok(out)
    }

    /// Hex of the length-prefixed serialization.
    pub fn to_hex(&self) -> Result<String, ScriptError> {
        Ok(hex::encode(self.serialize()?))
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<Command> {
        self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    // -----------------------------------------------------------------------
    // Script classification
    // -----------------------------------------------------------------------

    /// `OP_DUP OP_HASH160 <20 bytes> OP_EQUALVERIFY OP_CHECKSIG`
    pub fn is_p2pkh_script_pubkey(&self) -> bool {
        self.p2pkh_hash().is_some()
    }

    /// `OP_HASH160 <20 bytes> OP_EQUAL`
    pub fn is_p2sh_script_pubkey(&self) -> bool {
        self.p2sh_hash().is_some()
    }

    /// `OP_0 <20 bytes>`
    pub fn is_p2wpkh_script_pubkey(&self) -> bool {
        matches!(
            self.commands.as_slice(),
            [Command::Opcode(OP_0), Command::Push(h)] if h.len() == 20
        )
    }

    /// `OP_0 <32 bytes>`
    pub fn is_p2wsh_script_pubkey(&self) -> bool {
        matches!(
            self.commands.as_slice(),
            [Command::Opcode(OP_0), Command::Push(h)] if h.len() == 32
        )
    }

    /// The 20-byte hash embedded in a p2pkh or p2sh script pubkey.
    ///
    /// # Returns
    /// `None` for every other shape, segwit programs included.
    pub fn hash160(&self) -> Option<[u8; 20]> {
        self.p2pkh_hash().or_else(|| self.p2sh_hash())
    }

    fn p2pkh_hash(&self) -> Option<[u8; 20]> {
        match self.commands.as_slice() {
            [Command::Opcode(OP_DUP), Command::Opcode(OP_HASH160), Command::Push(h), Command::Opcode(OP_EQUALVERIFY), Command::Opcode(OP_CHECKSIG)] => {
                h.as_slice().try_into().ok()
            }
            _ => None,
        }
    }

    fn p2sh_hash(&self) -> Option<[u8; 20]> {
        match self.commands.as_slice() {
            [Command::Opcode(OP_HASH160), Command::Push(h), Command::Opcode(OP_EQUAL)] => {
                h.as_slice().try_into().ok()
            }
            _ => None,
        }
    }

    // -----------------------------------------------------------------------
    // Evaluation
    // -----------------------------------------------------------------------

    /// Evaluate the script against signature hash `z` and a witness.
    ///
    /// Normally called on `script_sig + script_pubkey`. Failures of any kind
    /// yield `false`; use `Engine::execute` to see the reason.
    pub fn evaluate(&self, z: &[u8; 32], witness: &[Vec<u8>]) -> bool {
        Engine::new().evaluate(self, z, witness)
    }
}

// ---------------------------------------------------------------------------
// Standard templates
// ---------------------------------------------------------------------------

/// `OP_DUP OP_HASH160 <h160> OP_EQUALVERIFY OP_CHECKSIG`
pub fn p2pkh_script(h160: &[u8; 20]) -> Script {
    Script::from_commands(vec![
        Command::Opcode(OP_DUP),
        Command::Opcode(OP_HASH160),
        Command::Push(h160.to_vec()),
        Command::Opcode(OP_EQUALVERIFY),
        Command::Opcode(OP_CHECKSIG),
    ])
}

/// `OP_HASH160 <h160> OP_EQUAL`
pub fn p2sh_script(h160: &[u8; 20]) -> Script {
    Script::from_commands(vec![
        Command::Opcode(OP_HASH160),
        Command::Push(h160.to_vec()),
        Command::Opcode(OP_EQUAL),
    ])
}

/// `OP_0 <h160>`
pub fn p2wpkh_script(h160: &[u8; 20]) -> Script {
    Script::from_commands(vec![Command::Opcode(OP_0), Command::Push(h160.to_vec())])
}

/// `OP_0 <s256>`
pub fn p2wsh_script(s256: &[u8; 32]) -> Script {
    Script::from_commands(vec![Command::Opcode(OP_0), Command::Push(s256.to_vec())])
}

// ---------------------------------------------------------------------------
// Trait implementations
// ---------------------------------------------------------------------------

impl Add for Script {
    type Output = Script;

    fn add(mut self, other: Script) -> Script {
        self.commands.extend(other.commands);
        self
    }
}

impl<'a> Add<&'a Script> for &'a Script {
    type Output = Script;

    fn add(self, other: &'a Script) -> Script {
        let mut commands = self.commands.clone();
        commands.extend_from_slice(&other.commands);
        Script { commands }
    }
}

impl From<Vec<Command>> for Script {
    fn from(commands: Vec<Command>) -> Self {
        Script::from_commands(commands)
    }
}

impl fmt::Display for Script {
    /// Space-separated ASM: opcode names and hex pushes.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.commands.iter().map(Command::to_asm_string).collect();
        write!(f, "{}", parts.join(" "))
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Script({})", self)
    }
}

impl serde::Serialize for Script {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let hex = self
            .to_hex()
            .map_err(<S::Error as serde::ser::Error>::custom)?;
        serializer.serialize_str(&hex)
    }
}

impl<'de> serde::Deserialize<'de> for Script {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Script::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT_SIG_HEX: &str = "6a47304402207899531a52d59a6de200179928ca900254a36b8dff8bb75f5f5d71b1cdc26125022008b422690b8461cb52c3cc30330b23d574351872b7c361e9aae3649071c1a7160121035d5c93d9ac96881f19ba1f686f15f009ded7c62efe85a872e6a19b43c15a2937";

    fn h160(hex_str: &str) -> [u8; 20] {
        hex::decode(hex_str).unwrap().try_into().unwrap()
    }

    // -----------------------------------------------------------------------
    // Parse / serialize
    // -----------------------------------------------------------------------

    #[test]
    fn test_parse_script_sig() {
        let script = Script::from_hex(SCRIPT_SIG_HEX).unwrap();
        assert_eq!(script.len(), 2);

        let sig = script.commands()[0].as_push().unwrap();
        assert_eq!(sig.len(), 0x47);
        assert_eq!(hex::encode(&sig[..4]), "30440220");
        assert_eq!(sig[sig.len() - 1], 0x01);

        let sec = script.commands()[1].as_push().unwrap();
        assert_eq!(
            hex::encode(sec),
            "035d5c93d9ac96881f19ba1f686f15f009ded7c62efe85a872e6a19b43c15a2937"
        );
        assert_eq!(script.to_hex().unwrap(), SCRIPT_SIG_HEX);
    }

    #[test]
    fn test_parse_leaves_reader_after_script() {
        let mut bytes = hex::decode("0251ac").unwrap();
        bytes.push(0xee);
        let mut reader = ByteReader::new(&bytes);
        let script = Script::parse(&mut reader).unwrap();
        assert_eq!(script.commands(), &[Command::Opcode(OP_1), Command::Opcode(OP_CHECKSIG)]);
        assert_eq!(reader.read_u8().unwrap(), 0xee);
    }

    #[test]
    fn test_parse_rejects_truncation() {
        // Declares 5 bytes, has 2.
        assert!(matches!(Script::from_hex("055151"), Err(ScriptError::Format(_))));
        // Push of 3 bytes overruns a declared length of 2.
        assert!(matches!(Script::from_hex("020301020304"), Err(ScriptError::Format(_))));
        // Leftover bytes.
        assert!(Script::from_hex("015151").is_err());
        assert!(matches!(Script::from_hex("zz"), Err(ScriptError::HexDecode(_))));
    }

    #[test]
    fn test_empty_script() {
        let script = Script::from_hex("00").unwrap();
        assert!(script.is_empty());
        assert_eq!(script.serialize().unwrap(), vec![0x00]);
    }

    #[test]
    fn test_serialize_push_tiers() {
        let script = Script::from_commands(vec![
            Command::Push(vec![0xaa; 75]),
            Command::Push(vec![0xbb; 76]),
            Command::Push(vec![0xcc; 300]),
        ]);
        let raw = script.raw_serialize().unwrap();
        assert_eq!(raw[0], 75);
        assert_eq!(&raw[76..78], &[OP_PUSHDATA1, 76]);
        assert_eq!(&raw[154..157], &[OP_PUSHDATA2, 0x2c, 0x01]);
        assert_eq!(raw.len(), 1 + 75 + 2 + 76 + 3 + 300);
        assert_eq!(Script::parse_raw(&raw).unwrap(), script);

        // Varint prefix switches to three bytes past 252.
        let ser = script.serialize().unwrap();
        assert_eq!(&ser[..3], &[0xfd, 0xc9, 0x01]);
    }

    #[test]
    fn test_serialize_rejects_oversized_push() {
        let script = Script::from_commands(vec![Command::Push(vec![0u8; 521])]);
        assert!(matches!(script.raw_serialize(), Err(ScriptError::Format(_))));
        assert!(script.to_hex().is_err());
    }

    // -----------------------------------------------------------------------
    // Templates and classification
    // -----------------------------------------------------------------------

    #[test]
    fn test_p2pkh_template() {
        let h = h160("e2a623699e81b291c0327f408fea765d534baa2a");
        let script = p2pkh_script(&h);
        assert_eq!(
            script.to_hex().unwrap(),
            "1976a914e2a623699e81b291c0327f408fea765d534baa2a88ac"
        );
        assert!(script.is_p2pkh_script_pubkey());
        assert!(!script.is_p2sh_script_pubkey());
        assert_eq!(script.hash160(), Some(h));
    }

    #[test]
    fn test_p2sh_template() {
        let h = h160("74d691da1574e6b3c192ecfb52cc8984ee7b6c56");
        let script = p2sh_script(&h);
        assert_eq!(
            script.to_hex().unwrap(),
            "17a91474d691da1574e6b3c192ecfb52cc8984ee7b6c5687"
        );
        assert!(script.is_p2sh_script_pubkey());
        assert!(!script.is_p2pkh_script_pubkey());
        assert_eq!(script.hash160(), Some(h));
    }

    #[test]
    fn test_segwit_templates() {
        let h = [0x11u8; 20];
        let s = [0x22u8; 32];
        let wpkh = p2wpkh_script(&h);
        let wsh = p2wsh_script(&s);
        assert!(wpkh.is_p2wpkh_script_pubkey());
        assert!(!wpkh.is_p2wsh_script_pubkey());
        assert!(wsh.is_p2wsh_script_pubkey());
        assert!(!wsh.is_p2wpkh_script_pubkey());
        assert_eq!(wpkh.hash160(), None);
        assert_eq!(wsh.hash160(), None);
    }

    #[test]
    fn test_near_miss_shapes() {
        // Wrong hash length.
        let short = Script::from_commands(vec![
            Command::Opcode(OP_HASH160),
            Command::Push(vec![0u8; 19]),
            Command::Opcode(OP_EQUAL),
        ]);
        assert!(!short.is_p2sh_script_pubkey());
        assert_eq!(short.hash160(), None);

        // Extra trailing command.
        let mut cmds = p2pkh_script(&[0u8; 20]).into_commands();
        cmds.push(Command::Opcode(OP_NOP));
        assert!(!Script::from(cmds).is_p2pkh_script_pubkey());

        // Witness version other than 0.
        let v1 = Script::from_commands(vec![Command::Opcode(OP_1), Command::Push(vec![0u8; 32])]);
        assert!(!v1.is_p2wsh_script_pubkey());
    }

    // -----------------------------------------------------------------------
    // Concatenation, display, serde
    // -----------------------------------------------------------------------

    #[test]
    fn test_add_joins_commands() {
        let a = Script::from_commands(vec![Command::Opcode(OP_1)]);
        let b = Script::from_commands(vec![Command::Opcode(OP_2), Command::Opcode(OP_ADD)]);
        let joined = &a + &b;
        assert_eq!(joined.len(), 3);
        assert_eq!(joined.commands()[0], Command::Opcode(OP_1));
        assert_eq!(a + b, joined);
    }

    #[test]
    fn test_display_asm() {
        let script = p2pkh_script(&h160("e2a623699e81b291c0327f408fea765d534baa2a"));
        assert_eq!(
            script.to_string(),
            "OP_DUP OP_HASH160 e2a623699e81b291c0327f408fea765d534baa2a OP_EQUALVERIFY OP_CHECKSIG"
        );
        let odd = Script::from_commands(vec![Command::Opcode(0xfa), Command::Opcode(OP_0)]);
        assert_eq!(odd.to_string(), "OP_[250] OP_0");
        assert_eq!(format!("{:?}", odd), "Script(OP_[250] OP_0)");
    }

    #[test]
    fn test_serde_hex() {
        let script = Script::from_commands(vec![
            Command::Opcode(OP_2),
            Command::Opcode(OP_2),
            Command::Opcode(OP_ADD),
            Command::Opcode(OP_4),
            Command::Opcode(OP_EQUAL),
        ]);
        let json = serde_json::to_string(&script).unwrap();
        assert_eq!(json, r#""055252935487""#);
        let back: Script = serde_json::from_str(&json).unwrap();
        assert_eq!(back, script);
        assert!(serde_json::from_str::<Script>(r#""05""#).is_err());
    }

    #[test]
    fn test_evaluate_arithmetic() {
        let z = [0u8; 32];
        let script = Script::from_commands(vec![
            Command::Opcode(OP_2),
            Command::Opcode(OP_2),
            Command::Opcode(OP_ADD),
            Command::Opcode(OP_4),
            Command::Opcode(OP_EQUAL),
        ]);
        assert!(script.evaluate(&z, &[]));
        assert!(!Script::new().evaluate(&z, &[]));
    }
}
