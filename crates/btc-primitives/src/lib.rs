/// Bitcoin primitives for the script engine.
///
/// This crate provides the building blocks the script crate consumes:
/// - Hash functions (SHA-1, SHA-256, HASH256, RIPEMD-160, HASH160)
/// - Variable-length integer and little-endian framing
/// - Base58Check encoding and legacy address helpers
/// - Bech32/bech32m segwit address encoding
/// - secp256k1 public keys and DER signatures for ECDSA verification

pub mod hash;
pub mod util;
pub mod base58;
pub mod bech32;
pub mod ec;

mod error;
pub use error::PrimitivesError;
