//! Stack manipulation and equality operations for the script interpreter.

use num_bigint::BigInt;

use super::error::InterpreterErrorCode;
use super::op_table::{verify_top, OpResult};
use super::scriptnum::to_index;
use super::stack::{as_bool, Stack};

// ---------------------------------------------------------------------------
// Alt stack
// ---------------------------------------------------------------------------

pub fn op_toaltstack(stack: &mut Stack, altstack: &mut Stack) -> OpResult {
    let data = stack.pop_byte_array()?;
    altstack.push_byte_array(data);
    Ok(())
}

pub fn op_fromaltstack(stack: &mut Stack, altstack: &mut Stack) -> OpResult {
    let data = altstack.pop_byte_array()?;
    stack.push_byte_array(data);
    Ok(())
}

// ---------------------------------------------------------------------------
// Stack
// ---------------------------------------------------------------------------

pub fn op_2drop(stack: &mut Stack) -> OpResult {
    stack.drop_n(2)
}

pub fn op_2dup(stack: &mut Stack) -> OpResult {
    stack.dup_n(2)
}

pub fn op_3dup(stack: &mut Stack) -> OpResult {
    stack.dup_n(3)
}

pub fn op_2over(stack: &mut Stack) -> OpResult {
    stack.over_n(2)
}

pub fn op_2rot(stack: &mut Stack) -> OpResult {
    stack.rot_n(2)
}

pub fn op_2swap(stack: &mut Stack) -> OpResult {
    stack.swap_n(2)
}

/// Duplicate the top item if it is numerically non-zero.
pub fn op_ifdup(stack: &mut Stack) -> OpResult {
    let so = stack.peek_byte_array(0)?;
    if as_bool(&so) {
        stack.push_byte_array(so);
    }
    Ok(())
}

pub fn op_depth(stack: &mut Stack) -> OpResult {
    let depth = BigInt::from(stack.depth());
    stack.push_int(&depth);
    Ok(())
}

pub fn op_drop(stack: &mut Stack) -> OpResult {
    stack.drop_n(1)
}

pub fn op_dup(stack: &mut Stack) -> OpResult {
    stack.dup_n(1)
}

pub fn op_nip(stack: &mut Stack) -> OpResult {
    stack.nip_n(1)?;
    Ok(())
}

pub fn op_over(stack: &mut Stack) -> OpResult {
    stack.over_n(1)
}

pub fn op_pick(stack: &mut Stack) -> OpResult {
    let n = to_index(&stack.pop_int()?)?;
    stack.pick_n(n)
}

pub fn op_roll(stack: &mut Stack) -> OpResult {
    let n = to_index(&stack.pop_int()?)?;
    stack.roll_n(n)
}

pub fn op_rot(stack: &mut Stack) -> OpResult {
    stack.rot_n(1)
}

pub fn op_swap(stack: &mut Stack) -> OpResult {
    stack.swap_n(1)
}

pub fn op_tuck(stack: &mut Stack) -> OpResult {
    stack.tuck()
}

/// Push the byte length of the top item, leaving it in place.
pub fn op_size(stack: &mut Stack) -> OpResult {
    let len = stack.peek_byte_array(0)?.len();
    stack.push_int(&BigInt::from(len));
    Ok(())
}

// ---------------------------------------------------------------------------
// Bitwise logic
// ---------------------------------------------------------------------------

pub fn op_equal(stack: &mut Stack) -> OpResult {
    let a = stack.pop_byte_array()?;
    let b = stack.pop_byte_array()?;
    stack.push_bool(a == b);
    Ok(())
}

pub fn op_equalverify(stack: &mut Stack) -> OpResult {
    op_equal(stack)?;
    verify_top(stack, InterpreterErrorCode::EqualVerify)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack_of(items: &[&[u8]]) -> Stack {
        let mut s = Stack::new();
        for item in items {
            s.push_byte_array(item.to_vec());
        }
        s
    }

    #[test]
    fn test_altstack_round_trip() {
        let mut s = stack_of(&[&[7]]);
        let mut alt = Stack::new();
        op_toaltstack(&mut s, &mut alt).unwrap();
        assert!(s.is_empty());
        assert_eq!(alt.depth(), 1);
        op_fromaltstack(&mut s, &mut alt).unwrap();
        assert_eq!(s.items().to_vec(), vec![vec![7u8]]);
        assert!(op_fromaltstack(&mut s, &mut alt).is_err());
    }

    #[test]
    fn test_ifdup() {
        let mut s = stack_of(&[&[]]);
        op_ifdup(&mut s).unwrap();
        assert_eq!(s.depth(), 1);

        let mut s = stack_of(&[&[0x80]]);
        op_ifdup(&mut s).unwrap();
        assert_eq!(s.depth(), 1);

        let mut s = stack_of(&[&[2]]);
        op_ifdup(&mut s).unwrap();
        assert_eq!(s.depth(), 2);
    }

    #[test]
    fn test_depth_and_size() {
        let mut s = stack_of(&[&[1, 2, 3], &[]]);
        op_depth(&mut s).unwrap();
        assert_eq!(s.pop_byte_array().unwrap(), vec![2]);
        op_size(&mut s).unwrap();
        assert_eq!(s.items().to_vec(), vec![vec![1u8, 2, 3], vec![], vec![]]);

        let mut s = stack_of(&[&[1, 2, 3]]);
        op_size(&mut s).unwrap();
        assert_eq!(s.items().to_vec(), vec![vec![1u8, 2, 3], vec![3]]);

        assert!(op_size(&mut Stack::new()).is_err());
    }

    #[test]
    fn test_pick_roll_use_script_numbers() {
        let mut s = stack_of(&[&[0xaa], &[0xbb], &[0xcc], &[0x02]]);
        op_pick(&mut s).unwrap();
        assert_eq!(s.items().to_vec(), vec![vec![0xaau8], vec![0xbb], vec![0xcc], vec![0xaa]]);

        let mut s = stack_of(&[&[0xaa], &[0xbb], &[0xcc], &[0x02]]);
        op_roll(&mut s).unwrap();
        assert_eq!(s.items().to_vec(), vec![vec![0xbbu8], vec![0xcc], vec![0xaa]]);

        // Index past the bottom.
        let mut s = stack_of(&[&[0xaa], &[0x05]]);
        assert!(op_pick(&mut s).is_err());
        // Negative index.
        let mut s = stack_of(&[&[0xaa], &[0x81]]);
        assert!(op_roll(&mut s).is_err());
    }

    #[test]
    fn test_nip_and_rot() {
        let mut s = stack_of(&[&[1], &[2], &[3]]);
        op_nip(&mut s).unwrap();
        assert_eq!(s.items().to_vec(), vec![vec![1u8], vec![3]]);

        let mut s = stack_of(&[&[1], &[2], &[3]]);
        op_rot(&mut s).unwrap();
        assert_eq!(s.items().to_vec(), vec![vec![2u8], vec![3], vec![1]]);
    }

    #[test]
    fn test_equal_and_equalverify() {
        let mut s = stack_of(&[&[1, 2], &[1, 2]]);
        op_equal(&mut s).unwrap();
        assert_eq!(s.items().to_vec(), vec![vec![1u8]]);

        // Byte equality, not numeric: 0x01 and 0x0100 differ.
        let mut s = stack_of(&[&[1], &[1, 0]]);
        op_equal(&mut s).unwrap();
        assert_eq!(s.items().to_vec(), vec![Vec::<u8>::new()]);

        let mut s = stack_of(&[&[1], &[2]]);
        let err = op_equalverify(&mut s).unwrap_err();
        assert_eq!(err.code, InterpreterErrorCode::EqualVerify);

        let mut s = stack_of(&[&[9], &[9]]);
        op_equalverify(&mut s).unwrap();
        assert!(s.is_empty());
    }

    #[test]
    fn test_underflow_is_an_error() {
        assert!(op_2dup(&mut stack_of(&[&[1]])).is_err());
        assert!(op_2swap(&mut stack_of(&[&[1], &[2], &[3]])).is_err());
        assert!(op_2rot(&mut stack_of(&[&[1], &[2], &[3], &[4], &[5]])).is_err());
        assert!(op_equal(&mut stack_of(&[&[1]])).is_err());
        assert!(op_tuck(&mut stack_of(&[&[1]])).is_err());
    }
}
