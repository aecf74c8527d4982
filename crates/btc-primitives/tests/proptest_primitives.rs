use proptest::prelude::*;

use btc_primitives::base58::{check_decode, check_encode, decode_address, h160_to_p2pkh_address, h160_to_p2sh_address};
use btc_primitives::util::{encode_varstr, read_varstr, ByteReader, VarInt};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn base58check_roundtrip(payload in prop::collection::vec(any::<u8>(), 0..64)) {
        let encoded = check_encode(&payload);
        prop_assert_eq!(check_decode(&encoded).unwrap(), payload);
    }

    #[test]
    fn legacy_addresses_never_collide(h160 in prop::array::uniform20(any::<u8>())) {
        let mut seen = vec![
            h160_to_p2pkh_address(&h160, false),
            h160_to_p2pkh_address(&h160, true),
            h160_to_p2sh_address(&h160, false),
            h160_to_p2sh_address(&h160, true),
        ];
        for address in &seen {
            prop_assert_eq!(decode_address(address).unwrap(), h160);
        }
        seen.sort();
        seen.dedup();
        prop_assert_eq!(seen.len(), 4);
    }

    #[test]
    fn varint_reads_back(value in any::<u64>()) {
        let bytes = VarInt(value).to_bytes();
        let mut reader = ByteReader::new(&bytes);
        prop_assert_eq!(reader.read_varint().unwrap(), VarInt(value));
        prop_assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn varstr_reads_back(data in prop::collection::vec(any::<u8>(), 0..600)) {
        let encoded = encode_varstr(&data);
        let mut reader = ByteReader::new(&encoded);
        prop_assert_eq!(read_varstr(&mut reader).unwrap(), data.as_slice());
    }
}
