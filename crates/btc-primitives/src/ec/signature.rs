//! ECDSA signatures in DER encoding.
//!
//! Script signatures are DER-encoded `(r, s)` pairs followed by a one-byte
//! sighash type; the sighash byte is removed by the caller before parsing.
//! Verification accepts both low-S and high-S forms.

use k256::ecdsa::signature::hazmat::PrehashVerifier;
use k256::ecdsa;

use crate::ec::public_key::PublicKey;
use crate::util::ByteReader;
use crate::PrimitivesError;

/// The secp256k1 curve order N.
/// N = FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141
const CURVE_ORDER: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFE, 0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36,
    0x41, 0x41,
];

/// Half of the secp256k1 curve order (N/2).
const HALF_ORDER: [u8; 32] = [
    0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0x5D, 0x57, 0x6E, 0x73, 0x57, 0xA4, 0x50, 0x1D, 0xDF, 0xE9, 0x2F, 0x46, 0x68, 0x1B,
    0x20, 0xA0,
];

/// An ECDSA signature with R and S components.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    /// The R component of the signature (32 bytes, big-endian).
    r: [u8; 32],
    /// The S component of the signature (32 bytes, big-endian).
    s: [u8; 32],
}

impl Signature {
    /// Create a signature from raw R and S 32-byte arrays.
    pub fn new(r: [u8; 32], s: [u8; 32]) -> Self {
        Signature { r, s }
    }

    /// Access the R component of the signature.
    pub fn r(&self) -> &[u8; 32] {
        &self.r
    }

    /// Access the S component of the signature.
    pub fn s(&self) -> &[u8; 32] {
        &self.s
    }

    /// Whether S lies in the lower half of the curve order.
    pub fn is_low_s(&self) -> bool {
        self.s <= HALF_ORDER
    }

    /// Parse a DER-encoded ECDSA signature:
    /// `0x30 <len> 0x02 <r_len> <r> 0x02 <s_len> <s>`.
    ///
    /// Integers may carry redundant leading zero bytes. Bytes after the
    /// declared sequence length, or after S inside it, are ignored.
    pub fn from_der(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        let mut reader = ByteReader::new(bytes);
        expect_tag(&mut reader, SEQUENCE_TAG, "sequence")?;
        let body_len = reader.read_u8().map_err(|_| malformed("too short"))? as usize;
        let body = reader
            .read_bytes(body_len)
            .map_err(|_| malformed("sequence length exceeds data"))?;

        let mut body = ByteReader::new(body);
        let r = read_integer(&mut body, "R")?;
        let s = read_integer(&mut body, "S")?;

        if r == [0u8; 32] || s == [0u8; 32] {
            return Err(malformed("R or S is zero"));
        }
        if r >= CURVE_ORDER || s >= CURVE_ORDER {
            return Err(malformed("R or S is >= curve order"));
        }
        Ok(Signature { r, s })
    }

    /// Verify this signature over the 32-byte signature hash `z`.
    ///
    /// A high-S signature is normalized to its low-S twin first; both
    /// forms are valid for the same key and hash.
    pub fn verify(&self, z: &[u8; 32], pub_key: &PublicKey) -> bool {
        let k256_sig = match ecdsa::Signature::from_scalars(
            k256::FieldBytes::from(self.r),
            k256::FieldBytes::from(self.s),
        ) {
            Ok(sig) => sig,
            Err(_) => return false,
        };
        let k256_sig = k256_sig.normalize_s().unwrap_or(k256_sig);

        pub_key
            .verifying_key()
            .verify_prehash(z, &k256_sig)
            .is_ok()
    }
}

const SEQUENCE_TAG: u8 = 0x30;
const INTEGER_TAG: u8 = 0x02;

fn malformed(reason: &str) -> PrimitivesError {
    PrimitivesError::InvalidSignature(format!("malformed signature: {}", reason))
}

fn expect_tag(reader: &mut ByteReader<'_>, tag: u8, what: &str) -> Result<(), PrimitivesError> {
    match reader.read_u8() {
        Ok(t) if t == tag => Ok(()),
        _ => Err(malformed(&format!("expected {} tag 0x{:02x}", what, tag))),
    }
}

/// Read one DER INTEGER as a 32-byte big-endian value.
fn read_integer(reader: &mut ByteReader<'_>, name: &str) -> Result<[u8; 32], PrimitivesError> {
    expect_tag(reader, INTEGER_TAG, name)?;
    let len = reader
        .read_u8()
        .map_err(|_| malformed(&format!("missing {} length", name)))? as usize;
    if len == 0 {
        return Err(malformed(&format!("empty {}", name)));
    }
    let raw = reader
        .read_bytes(len)
        .map_err(|_| malformed(&format!("bogus {} length", name)))?;

    let start = raw.iter().position(|&b| b != 0).unwrap_or(raw.len());
    let digits = &raw[start..];
    if digits.len() > 32 {
        return Err(malformed(&format!("{} does not fit in 32 bytes", name)));
    }
    let mut out = [0u8; 32];
    out[32 - digits.len()..].copy_from_slice(digits);
    Ok(out)
}
