//! Property tests
//!
//! Round-trip laws for every address codec, mutation rejection, and
//! derivation determinism.

use omnisign::address::{base58check, eip55, segwit, ss58};
use omnisign::{crypto, hd, CurveType};
use proptest::prelude::*;

fn any_secp_key() -> impl Strategy<Value = [u8; 32]> {
    prop::array::uniform32(any::<u8>()).prop_filter("valid secp256k1 scalar", |bytes| {
        crypto::public_key_from_private(CurveType::Secp256k1, bytes).is_ok()
    })
}

proptest! {
    #[test]
    fn base58check_roundtrip(version in any::<u8>(), payload in prop::array::uniform20(any::<u8>())) {
        let encoded = base58check::encode(version, &payload);
        let decoded = base58check::decode(version, &encoded).unwrap();
        prop_assert_eq!(decoded, payload.to_vec());
    }

    #[test]
    fn base58check_rejects_mutation(payload in prop::array::uniform20(any::<u8>()), pos in 0usize..30) {
        let encoded = base58check::encode(0x00, &payload);
        let mut bytes = encoded.clone().into_bytes();
        let pos = pos % bytes.len();

        // Replace with a different base58 character
        let replacement = if bytes[pos] == b'2' { b'3' } else { b'2' };
        prop_assume!(bytes[pos] != replacement);
        bytes[pos] = replacement;

        let mutated = String::from_utf8(bytes).unwrap();
        prop_assert!(base58check::decode(0x00, &mutated).is_err());
    }

    #[test]
    fn segwit_roundtrip(payload in prop::array::uniform20(any::<u8>())) {
        let encoded = segwit::encode("bc", 0, &payload).unwrap();
        let (version, decoded) = segwit::decode("bc", &encoded).unwrap();
        prop_assert_eq!(version, 0);
        prop_assert_eq!(decoded, payload.to_vec());
    }

    #[test]
    fn eip55_roundtrip(payload in prop::array::uniform20(any::<u8>())) {
        let encoded = eip55::encode(&payload).unwrap();
        prop_assert!(encoded.starts_with("0x"));

        let decoded = eip55::decode(&encoded).unwrap();
        prop_assert_eq!(decoded, payload.to_vec());

        // Lowercase form also decodes to the same bytes
        let decoded_lower = eip55::decode(&encoded.to_lowercase()).unwrap();
        prop_assert_eq!(decoded_lower, payload.to_vec());
    }

    #[test]
    fn ss58_roundtrip(network in 0u16..0x4000, payload in prop::array::uniform32(any::<u8>())) {
        let encoded = ss58::encode(network, &payload).unwrap();
        let decoded = ss58::decode(network, &encoded).unwrap();
        prop_assert_eq!(decoded, payload.to_vec());
    }

    #[test]
    fn secp_public_keys_are_deterministic(key in any_secp_key()) {
        let a = crypto::public_key_from_private(CurveType::Secp256k1, &key).unwrap();
        let b = crypto::public_key_from_private(CurveType::Secp256k1, &key).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn sign_verify_holds_for_random_keys(key in any_secp_key(), digest in prop::array::uniform32(any::<u8>())) {
        let public = crypto::public_key_from_private(CurveType::Secp256k1, &key).unwrap();
        let signature = crypto::sign(CurveType::Secp256k1, &key, &digest).unwrap();
        prop_assert!(crypto::verify(CurveType::Secp256k1, &public, &digest, &signature));
    }

    #[test]
    fn derivation_depends_on_every_index(seed in prop::collection::vec(any::<u8>(), 32..64), index in 0u32..1000) {
        let base = hd::derive_seed_key(&seed, "m/44'/60'/0'/0/0", CurveType::Secp256k1).unwrap();
        let path = format!("m/44'/60'/0'/0/{}", index + 1);
        let other = hd::derive_seed_key(&seed, &path, CurveType::Secp256k1).unwrap();
        prop_assert_ne!(base.bytes().to_vec(), other.bytes().to_vec());
    }
}
