//! Byte framing helpers.
//!
//! Provides VarInt encoding, a cursor-style `ByteReader` for decoding
//! length-prefixed structures, and the little-endian integer and
//! variable-length string helpers that script serialization is built on.

use crate::PrimitivesError;

// ---------------------------------------------------------------------------
// VarInt
// ---------------------------------------------------------------------------

/// A Bitcoin protocol variable-length integer.
///
/// Prefixes the length of an upcoming field. The encoding uses 1, 3, 5, or 9
/// bytes depending on the magnitude of the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarInt(pub u64);

impl VarInt {
    /// Return the wire-format byte length of this VarInt.
    ///
    /// # Returns
    /// 1, 3, 5, or 9 depending on the value.
    pub fn length(&self) -> usize {
        if self.0 < 0xfd {
            1
        } else if self.0 <= 0xffff {
            3
        } else if self.0 <= 0xffff_ffff {
            5
        } else {
            9
        }
    }

    /// Encode the VarInt into a new byte vector.
    ///
    /// # Returns
    /// A `Vec<u8>` of 1, 3, 5, or 9 bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let v = self.0;
        let mut buf = Vec::with_capacity(self.length());
        if v < 0xfd {
            buf.push(v as u8);
        } else if v <= 0xffff {
            buf.push(0xfd);
            buf.extend_from_slice(&(v as u16).to_le_bytes());
        } else if v <= 0xffff_ffff {
            buf.push(0xfe);
            buf.extend_from_slice(&(v as u32).to_le_bytes());
        } else {
            buf.push(0xff);
            buf.extend_from_slice(&v.to_le_bytes());
        }
        buf
    }

    /// Return the underlying u64 value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for VarInt {
    fn from(v: u64) -> Self {
        VarInt(v)
    }
}

impl From<usize> for VarInt {
    fn from(v: usize) -> Self {
        VarInt(v as u64)
    }
}

// ---------------------------------------------------------------------------
// ByteReader
// ---------------------------------------------------------------------------

/// A cursor over a byte slice.
///
/// Every read advances the position; reading past the end returns
/// `PrimitivesError::UnexpectedEof` and leaves the position unchanged.
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Create a new reader positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        ByteReader { data, pos: 0 }
    }

    /// Read `n` bytes and advance the position.
    ///
    /// # Arguments
    /// * `n` - Number of bytes to read.
    ///
    /// # Returns
    /// A byte slice of length `n`, or an error if insufficient data remains.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], PrimitivesError> {
        if n > self.remaining() {
            return Err(PrimitivesError::UnexpectedEof);
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Read a single byte and advance the position.
    pub fn read_u8(&mut self) -> Result<u8, PrimitivesError> {
        let bytes = self.read_bytes(1)?;
        Ok(bytes[0])
    }

    /// Read an unsigned little-endian integer of `n` bytes (at most 8).
    pub fn read_le(&mut self, n: usize) -> Result<u64, PrimitivesError> {
        if n > 8 {
            return Err(PrimitivesError::IntegerTooLarge(n));
        }
        let bytes = self.read_bytes(n)?;
        little_endian_to_int(bytes)
    }

    /// Read a VarInt and advance the position accordingly.
    ///
    /// # Returns
    /// The decoded `VarInt`, or an error if insufficient data.
    pub fn read_varint(&mut self) -> Result<VarInt, PrimitivesError> {
        let first = self.read_u8()?;
        let val = match first {
            0xff => self.read_le(8)?,
            0xfe => self.read_le(4)?,
            0xfd => self.read_le(2)?,
            b => b as u64,
        };
        Ok(VarInt(val))
    }

    /// Return the number of bytes remaining.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Return the number of bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }
}

// ---------------------------------------------------------------------------
// Little-endian and varstr helpers
// ---------------------------------------------------------------------------

/// Encode `n` as exactly `len` little-endian bytes.
///
/// Bits of `n` beyond `len` bytes are dropped; callers size `len` for the
/// value they hold.
pub fn int_to_little_endian(n: u64, len: usize) -> Vec<u8> {
    let mut out = n.to_le_bytes().to_vec();
    out.resize(len, 0);
    out
}

/// Decode up to 8 little-endian bytes into an unsigned integer.
///
/// An empty slice decodes to zero.
pub fn little_endian_to_int(bytes: &[u8]) -> Result<u64, PrimitivesError> {
    if bytes.len() > 8 {
        return Err(PrimitivesError::IntegerTooLarge(bytes.len()));
    }
    let mut buf = [0u8; 8];
    buf[..bytes.len()].copy_from_slice(bytes);
    Ok(u64::from_le_bytes(buf))
}

/// Prefix `bytes` with its VarInt length.
pub fn encode_varstr(bytes: &[u8]) -> Vec<u8> {
    let mut out = VarInt::from(bytes.len()).to_bytes();
    out.extend_from_slice(bytes);
    out
}

/// Read a VarInt length followed by that many bytes.
pub fn read_varstr<'a>(reader: &mut ByteReader<'a>) -> Result<&'a [u8], PrimitivesError> {
    let len = reader.read_varint()?.value();
    let len = usize::try_from(len).map_err(|_| PrimitivesError::UnexpectedEof)?;
    reader.read_bytes(len)
}
