use num_bigint::BigInt;
use proptest::prelude::*;

use btc_primitives::util::ByteReader;
use btc_script::interpreter::scriptnum::{decode_num, encode_num};
use btc_script::{Command, Script};

/// Opcode bytes that never start a push (0x01..=0x4d are push lengths).
fn opcode() -> impl Strategy<Value = u8> {
    prop_oneof![Just(0u8), 0x4eu8..=0xff]
}

fn command() -> impl Strategy<Value = Command> {
    prop_oneof![
        opcode().prop_map(Command::Opcode),
        prop::collection::vec(any::<u8>(), 1..=520).prop_map(Command::Push),
    ]
}

fn script() -> impl Strategy<Value = Script> {
    prop::collection::vec(command(), 0..12).prop_map(Script::from_commands)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn parse_inverts_serialize(s in script()) {
        let bytes = s.serialize().unwrap();
        let mut reader = ByteReader::new(&bytes);
        let parsed = Script::parse(&mut reader).unwrap();
        prop_assert_eq!(reader.remaining(), 0);
        prop_assert_eq!(parsed, s);
    }

    #[test]
    fn push_uses_shortest_tier(len in 1usize..=520) {
        let raw = Script::from_commands(vec![Command::Push(vec![0xab; len])])
            .raw_serialize()
            .unwrap();
        if len <= 75 {
            prop_assert_eq!(raw[0] as usize, len);
            prop_assert_eq!(raw.len(), 1 + len);
        } else if len <= 255 {
            prop_assert_eq!(&raw[..2], &[0x4c, len as u8][..]);
            prop_assert_eq!(raw.len(), 2 + len);
        } else {
            let [lo, hi] = (len as u16).to_le_bytes();
            prop_assert_eq!(&raw[..3], &[0x4d, lo, hi][..]);
            prop_assert_eq!(raw.len(), 3 + len);
        }
    }

    #[test]
    fn lock_patterns_are_exclusive(s in script()) {
        let matches = [
            s.is_p2pkh_script_pubkey(),
            s.is_p2sh_script_pubkey(),
            s.is_p2wpkh_script_pubkey(),
            s.is_p2wsh_script_pubkey(),
        ];
        prop_assert!(matches.iter().filter(|m| **m).count() <= 1);
    }

    #[test]
    fn hash160_only_for_legacy_patterns(h in any::<[u8; 20]>()) {
        prop_assert_eq!(btc_script::p2pkh_script(&h).hash160(), Some(h));
        prop_assert_eq!(btc_script::p2sh_script(&h).hash160(), Some(h));
        prop_assert_eq!(btc_script::p2wpkh_script(&h).hash160(), None);
    }

    #[test]
    fn script_numbers_round_trip(n in any::<i64>()) {
        let n = BigInt::from(n);
        prop_assert_eq!(decode_num(&encode_num(&n)), n);
    }

    #[test]
    fn evaluating_arbitrary_bytes_never_panics(body in prop::collection::vec(any::<u8>(), 0..64)) {
        if let Ok(s) = Script::parse_raw(&body) {
            let _ = s.evaluate(&[0u8; 32], &[]);
        }
    }
}

#[test]
fn push_tier_examples() {
    let raw = |len: usize| {
        Script::from_commands(vec![Command::Push(vec![0u8; len])])
            .raw_serialize()
            .unwrap()
    };
    assert_eq!(raw(10)[0], 0x0a);
    assert_eq!(&raw(200)[..2], &[76, 200]);
    assert_eq!(&raw(300)[..3], &[77, 0x2c, 0x01]);
}
