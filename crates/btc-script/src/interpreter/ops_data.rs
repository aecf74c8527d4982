//! Constant-push operations: OP_0, OP_1NEGATE and OP_1..OP_16.

use num_bigint::BigInt;

use super::op_table::OpResult;
use super::stack::Stack;

/// OP_0 pushes the empty byte string.
pub fn op_0(stack: &mut Stack) -> OpResult {
    stack.push_byte_array(Vec::new());
    Ok(())
}

pub fn op_1negate(stack: &mut Stack) -> OpResult {
    stack.push_int(&BigInt::from(-1));
    Ok(())
}

macro_rules! small_int_ops {
    ($($name:ident => $n:expr),* $(,)?) => {
        $(
            pub fn $name(stack: &mut Stack) -> OpResult {
                stack.push_int(&BigInt::from($n));
                Ok(())
            }
        )*
    };
}

small_int_ops! {
    op_1 => 1, op_2 => 2, op_3 => 3, op_4 => 4,
    op_5 => 5, op_6 => 6, op_7 => 7, op_8 => 8,
    op_9 => 9, op_10 => 10, op_11 => 11, op_12 => 12,
    op_13 => 13, op_14 => 14, op_15 => 15, op_16 => 16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_encodings() {
        let mut s = Stack::new();
        op_0(&mut s).unwrap();
        op_1negate(&mut s).unwrap();
        op_1(&mut s).unwrap();
        op_16(&mut s).unwrap();
        assert_eq!(s.items().to_vec(), vec![vec![], vec![0x81u8], vec![0x01], vec![0x10]]);
    }
}
