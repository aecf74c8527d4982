//! Script execution stack.

use num_bigint::BigInt;

use super::error::{InterpreterError, InterpreterErrorCode};
use super::scriptnum::{decode_num, encode_num};

/// Numeric truthiness used by `OP_VERIFY`, `OP_IF` and friends.
///
/// False for any encoding of zero: the empty string, all-zero bytes and
/// negative zero. The final verdict of an evaluation uses a different rule
/// (only the empty string is false).
pub fn as_bool(t: &[u8]) -> bool {
    for i in 0..t.len() {
        if t[i] != 0 {
            // Negative zero
            if i == t.len() - 1 && t[i] == 0x80 {
                return false;
            }
            return true;
        }
    }
    false
}

/// Convert boolean to byte array.
pub fn from_bool(v: bool) -> Vec<u8> {
    if v {
        vec![1]
    } else {
        vec![]
    }
}

/// The data stack, also used as the alt stack.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stack {
    stk: Vec<Vec<u8>>,
}

impl Stack {
    pub fn new() -> Self {
        Stack { stk: Vec::new() }
    }

    pub fn depth(&self) -> usize {
        self.stk.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stk.is_empty()
    }

    pub fn push_byte_array(&mut self, data: Vec<u8>) {
        self.stk.push(data);
    }

    pub fn push_int(&mut self, n: &BigInt) {
        self.push_byte_array(encode_num(n));
    }

    pub fn push_bool(&mut self, val: bool) {
        self.push_byte_array(from_bool(val));
    }

    pub fn pop_byte_array(&mut self) -> Result<Vec<u8>, InterpreterError> {
        self.nip_n(0)
    }

    pub fn pop_int(&mut self) -> Result<BigInt, InterpreterError> {
        let data = self.pop_byte_array()?;
        Ok(decode_num(&data))
    }

    pub fn pop_bool(&mut self) -> Result<bool, InterpreterError> {
        let data = self.pop_byte_array()?;
        Ok(as_bool(&data))
    }

    /// Copy the item `idx` positions below the top (0 is the top).
    pub fn peek_byte_array(&self, idx: usize) -> Result<Vec<u8>, InterpreterError> {
        let pos = self.position(idx)?;
        Ok(self.stk[pos].clone())
    }

    /// Remove and return the item `idx` positions below the top.
    pub fn nip_n(&mut self, idx: usize) -> Result<Vec<u8>, InterpreterError> {
        let pos = self.position(idx)?;
        Ok(self.stk.remove(pos))
    }

    pub fn tuck(&mut self) -> Result<(), InterpreterError> {
        let so2 = self.pop_byte_array()?;
        let so1 = self.pop_byte_array()?;
        self.push_byte_array(so2.clone());
        self.push_byte_array(so1);
        self.push_byte_array(so2);
        Ok(())
    }

    pub fn drop_n(&mut self, n: usize) -> Result<(), InterpreterError> {
        self.require(n, "drop")?;
        for _ in 0..n {
            self.pop_byte_array()?;
        }
        Ok(())
    }

    pub fn dup_n(&mut self, n: usize) -> Result<(), InterpreterError> {
        self.require(n, "dup")?;
        for _ in 0..n {
            let so = self.peek_byte_array(n - 1)?;
            self.push_byte_array(so);
        }
        Ok(())
    }

    pub fn rot_n(&mut self, n: usize) -> Result<(), InterpreterError> {
        self.require(3 * n, "rotate")?;
        let entry = 3 * n - 1;
        for _ in 0..n {
            let so = self.nip_n(entry)?;
            self.push_byte_array(so);
        }
        Ok(())
    }

    pub fn swap_n(&mut self, n: usize) -> Result<(), InterpreterError> {
        self.require(2 * n, "swap")?;
        let entry = 2 * n - 1;
        for _ in 0..n {
            let so = self.nip_n(entry)?;
            self.push_byte_array(so);
        }
        Ok(())
    }

    pub fn over_n(&mut self, n: usize) -> Result<(), InterpreterError> {
        self.require(2 * n, "perform over on")?;
        let entry = 2 * n - 1;
        for _ in 0..n {
            let so = self.peek_byte_array(entry)?;
            self.push_byte_array(so);
        }
        Ok(())
    }

    pub fn pick_n(&mut self, n: usize) -> Result<(), InterpreterError> {
        let so = self.peek_byte_array(n)?;
        self.push_byte_array(so);
        Ok(())
    }

    pub fn roll_n(&mut self, n: usize) -> Result<(), InterpreterError> {
        let so = self.nip_n(n)?;
        self.push_byte_array(so);
        Ok(())
    }

    /// Stack contents, bottom to top.
    pub fn items(&self) -> &[Vec<u8>] {
        &self.stk
    }

    fn position(&self, idx: usize) -> Result<usize, InterpreterError> {
        let sz = self.stk.len();
        if idx >= sz {
            return Err(InterpreterError::new(
                InterpreterErrorCode::InvalidStackOperation,
                format!("index {} is invalid for stack size {}", idx, sz),
            ));
        }
        Ok(sz - idx - 1)
    }

    fn require(&self, n: usize, action: &str) -> Result<(), InterpreterError> {
        if n < 1 || n > self.stk.len() {
            return Err(InterpreterError::new(
                InterpreterErrorCode::InvalidStackOperation,
                format!("attempt to {} {} items on stack of size {}", action, n, self.stk.len()),
            ));
        }
        Ok(())
    }
}
