//! Script number encoding.
//!
//! Numbers on the script stack are little-endian magnitudes with the sign
//! carried in the most significant bit of the last byte. Zero is the empty
//! byte string; `0x80` (negative zero) also decodes to zero. There is no
//! length limit, so values are held as `BigInt`.

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};

use super::error::{InterpreterError, InterpreterErrorCode};

/// Encode a number in script format.
pub fn encode_num(num: &BigInt) -> Vec<u8> {
    if num.is_zero() {
        return vec![];
    }
    let negative = num.is_negative();
    let (_, mut result) = num.abs().to_bytes_le();

    // The magnitude's top bit is needed for the sign, so add a byte.
    let last = result.len() - 1;
    if result[last] & 0x80 != 0 {
        result.push(if negative { 0x80 } else { 0x00 });
    } else if negative {
        result[last] |= 0x80;
    }
    result
}

/// Decode a script-format number.
pub fn decode_num(bytes: &[u8]) -> BigInt {
    let Some((&last, rest)) = bytes.split_last() else {
        return BigInt::zero();
    };
    let negative = last & 0x80 != 0;
    let mut magnitude = rest.to_vec();
    magnitude.push(last & 0x7f);
    let value = BigInt::from_bytes_le(num_bigint::Sign::Plus, &magnitude);
    if negative {
        -value
    } else {
        value
    }
}

/// Interpret a stack number as a non-negative index or count.
pub fn to_index(num: &BigInt) -> Result<usize, InterpreterError> {
    if num.is_negative() {
        return Err(InterpreterError::new(
            InterpreterErrorCode::InvalidStackOperation,
            format!("negative index {}", num),
        ));
    }
    num.to_usize().ok_or_else(|| {
        InterpreterError::new(
            InterpreterErrorCode::NumberTooBig,
            format!("index {} does not fit in usize", num),
        )
    })
}
