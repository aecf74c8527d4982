//! Base58 and Base58Check encoding for legacy addresses.
//!
//! Legacy pay-to-pubkey-hash and pay-to-script-hash addresses are the
//! Base58Check encoding of a version byte followed by a 20-byte hash. The
//! version byte selects both the script family and the network.

use crate::hash::hash256;
use crate::PrimitivesError;

/// Version byte of mainnet pay-to-pubkey-hash addresses (`1...`).
pub const MAINNET_P2PKH: u8 = 0x00;
/// Version byte of testnet pay-to-pubkey-hash addresses (`m...` / `n...`).
pub const TESTNET_P2PKH: u8 = 0x6f;
/// Version byte of mainnet pay-to-script-hash addresses (`3...`).
pub const MAINNET_P2SH: u8 = 0x05;
/// Version byte of testnet pay-to-script-hash addresses (`2...`).
pub const TESTNET_P2SH: u8 = 0xc4;

/// Encode a byte slice to a Base58 string using the Bitcoin alphabet.
///
/// Leading zero bytes are encoded as leading '1' characters.
pub fn encode(data: &[u8]) -> String {
    bs58::encode(data).with_alphabet(bs58::Alphabet::BITCOIN).into_string()
}

/// Decode a Base58 string to a byte vector.
///
/// # Arguments
/// * `s` - The Base58 string to decode.
///
/// # Returns
/// `Ok(Vec<u8>)` on success, or an error for invalid characters.
pub fn decode(s: &str) -> Result<Vec<u8>, PrimitivesError> {
    bs58::decode(s)
        .with_alphabet(bs58::Alphabet::BITCOIN)
        .into_vec()
        .map_err(|e| PrimitivesError::InvalidBase58(e.to_string()))
}

/// Encode a byte slice with a 4-byte HASH256 checksum appended (Base58Check).
pub fn check_encode(data: &[u8]) -> String {
    let checksum = hash256(data);
    let mut payload = data.to_vec();
    payload.extend_from_slice(&checksum[..4]);
    encode(&payload)
}

/// Decode a Base58Check string, verifying the 4-byte checksum.
///
/// # Arguments
/// * `s` - The Base58Check string to decode.
///
/// # Returns
/// `Ok(Vec<u8>)` of the payload (without checksum) on success, or an
/// error for invalid encoding or checksum mismatch.
pub fn check_decode(s: &str) -> Result<Vec<u8>, PrimitivesError> {
    let decoded = decode(s)?;
    if decoded.len() < 4 {
        return Err(PrimitivesError::InvalidBase58(
            "data too short for checksum".to_string(),
        ));
    }
    let (payload, checksum) = decoded.split_at(decoded.len() - 4);
    let expected = hash256(payload);
    if checksum != &expected[..4] {
        return Err(PrimitivesError::ChecksumMismatch);
    }
    Ok(payload.to_vec())
}

/// Build the pay-to-pubkey-hash address for a 20-byte hash.
///
/// # Arguments
/// * `h160` - The HASH160 of a public key.
/// * `testnet` - Select the testnet version byte instead of mainnet.
pub fn h160_to_p2pkh_address(h160: &[u8; 20], testnet: bool) -> String {
    let prefix = if testnet { TESTNET_P2PKH } else { MAINNET_P2PKH };
    versioned(prefix, h160)
}

/// Build the pay-to-script-hash address for a 20-byte hash.
///
/// # Arguments
/// * `h160` - The HASH160 of a serialized redeem script.
/// * `testnet` - Select the testnet version byte instead of mainnet.
pub fn h160_to_p2sh_address(h160: &[u8; 20], testnet: bool) -> String {
    let prefix = if testnet { TESTNET_P2SH } else { MAINNET_P2SH };
    versioned(prefix, h160)
}

/// Decode a legacy address and return its 20-byte hash.
///
/// The version byte is not interpreted; any Base58Check payload of
/// exactly 21 bytes is accepted.
pub fn decode_address(address: &str) -> Result<[u8; 20], PrimitivesError> {
    let payload = check_decode(address)?;
    if payload.len() != 21 {
        return Err(PrimitivesError::InvalidAddress(format!(
            "{} decodes to {} bytes, expected 21",
            address,
            payload.len()
        )));
    }
    let mut h160 = [0u8; 20];
    h160.copy_from_slice(&payload[1..]);
    Ok(h160)
}

fn versioned(prefix: u8, h160: &[u8; 20]) -> String {
    let mut payload = Vec::with_capacity(21);
    payload.push(prefix);
    payload.extend_from_slice(h160);
    check_encode(&payload)
}
