/// Elliptic curve cryptography on secp256k1.
///
/// Provides the public keys and ECDSA signatures that signature-checking
/// opcodes verify against a signature hash.

pub mod public_key;
pub mod signature;

pub use public_key::PublicKey;
pub use signature::Signature;
