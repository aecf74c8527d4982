//! Bech32 segwit address encoding.
//!
//! A segwit address encodes a witness version and a witness program under
//! the human-readable part `bc` (mainnet) or `tb` (testnet). Version 0 uses
//! the bech32 checksum, later versions use bech32m; the `bech32` crate picks
//! the variant from the version.

use ::bech32::{hrp, segwit, Fe32, Hrp};

use crate::PrimitivesError;

/// `OP_0`, the witness version 0 marker in a locking script.
const OP_0: u8 = 0x00;
/// `OP_1`; versions 1..=16 are encoded as `OP_1 + (version - 1)`.
const OP_1: u8 = 0x51;
/// `OP_16`.
const OP_16: u8 = 0x60;

/// Encode the raw serialization of a witness locking script as an address.
///
/// The script must be `<version opcode> <push of 2..=40 bytes>`, for
/// example `OP_0 <20-byte hash>` (p2wpkh) or `OP_0 <32-byte hash>` (p2wsh).
///
/// # Arguments
/// * `script_pubkey` - Raw script bytes, without a length prefix.
/// * `testnet` - Use the `tb` prefix instead of `bc`.
///
/// # Returns
/// The lowercase address string, or an error if the script is not a
/// witness program.
pub fn encode_segwit_address(script_pubkey: &[u8], testnet: bool) -> Result<String, PrimitivesError> {
    if script_pubkey.len() < 4 {
        return Err(PrimitivesError::InvalidBech32(format!(
            "witness program script of {} bytes is too short",
            script_pubkey.len()
        )));
    }
    let version = match script_pubkey[0] {
        OP_0 => 0,
        op @ OP_1..=OP_16 => op - OP_1 + 1,
        op => {
            return Err(PrimitivesError::InvalidBech32(format!(
                "0x{:02x} is not a witness version opcode",
                op
            )))
        }
    };
    let push_len = script_pubkey[1] as usize;
    let program = &script_pubkey[2..];
    if push_len != program.len() {
        return Err(PrimitivesError::InvalidBech32(format!(
            "witness program push of {} bytes but {} bytes follow",
            push_len,
            program.len()
        )));
    }
    let version = Fe32::try_from(version).map_err(|e| PrimitivesError::InvalidBech32(e.to_string()))?;
    let hrp = if testnet { hrp::TB } else { hrp::BC };
    segwit::encode(hrp, version, program).map_err(|e| PrimitivesError::InvalidBech32(e.to_string()))
}

/// Decode a segwit address.
///
/// # Returns
/// `(testnet, witness_version, witness_program)`, or an error for a bad
/// checksum or an unknown human-readable part.
pub fn decode_segwit_address(address: &str) -> Result<(bool, u8, Vec<u8>), PrimitivesError> {
    let (hrp, version, program) =
        segwit::decode(address).map_err(|e| PrimitivesError::InvalidBech32(e.to_string()))?;
    let testnet = network_of(&hrp)?;
    Ok((testnet, version.to_u8(), program))
}

fn network_of(prefix: &Hrp) -> Result<bool, PrimitivesError> {
    if *prefix == hrp::BC {
        Ok(false)
    } else if *prefix == hrp::TB {
        Ok(true)
    } else {
        Err(PrimitivesError::InvalidBech32(format!(
            "unknown human-readable part {}",
            prefix
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn witness_script(version_op: u8, program: &[u8]) -> Vec<u8> {
        let mut script = vec![version_op, program.len() as u8];
        script.extend_from_slice(program);
        script
    }

    #[test]
    fn test_p2wpkh_address() {
        let program = hex::decode("751e76e8199196d454941c45d1b3a323f1433bd6").unwrap();
        let script = witness_script(OP_0, &program);
        assert_eq!(
            encode_segwit_address(&script, false).unwrap(),
            "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4"
        );
        assert_eq!(
            encode_segwit_address(&script, true).unwrap(),
            "tb1qw508d6qejxtdg4y5r3zarvary0c5xw7kxpjzsx"
        );
    }

    #[test]
    fn test_p2wsh_address() {
        let program =
            hex::decode("701a8d401c84fb13e6baf169d59684e17abd9fa216c8cc5b9fc63d622ff8c58d").unwrap();
        let script = witness_script(OP_0, &program);
        assert_eq!(
            encode_segwit_address(&script, false).unwrap(),
            "bc1qwqdg6squsna38e46795at95yu9atm8azzmyvckulcc7kytlcckxswvvzej"
        );
    }

    #[test]
    fn test_decode_round_trips_program() {
        let (testnet, version, program) =
            decode_segwit_address("tb1qw508d6qejxtdg4y5r3zarvary0c5xw7kxpjzsx").unwrap();
        assert!(testnet);
        assert_eq!(version, 0);
        assert_eq!(hex::encode(program), "751e76e8199196d454941c45d1b3a323f1433bd6");
    }

    #[test]
    fn test_rejects_non_witness_scripts() {
        // OP_DUP is not a version opcode.
        let script = witness_script(0x76, &[0u8; 20]);
        assert!(encode_segwit_address(&script, false).is_err());
        // Declared push length disagrees with the bytes present.
        let mut script = witness_script(OP_0, &[0u8; 20]);
        script.pop();
        assert!(encode_segwit_address(&script, false).is_err());
    }

    #[test]
    fn test_bad_checksum_rejected() {
        assert!(decode_segwit_address("bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t5").is_err());
    }
}
