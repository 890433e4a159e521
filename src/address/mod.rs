//! Address Codec Module
//!
//! Per-format address encoding, decoding and validation. Each codec turns a
//! raw payload (a public-key hash, an account id, or an address body) into
//! its textual form and back. All decode failure modes — wrong prefix, wrong
//! length, bad checksum — collapse into a single `MalformedAddress` error;
//! callers that only need a boolean use `is_valid`.

pub mod base58check;
pub mod eip55;
pub mod segwit;
pub mod ss58;

use crate::error::OmniResult;
use crate::registry::AddressFormat;

/// Encode a raw payload under the given format.
///
/// The payload is format-specific: a 20-byte hash160 for `Base58Check` and
/// `Segwit`, a 20-byte account for `Eip55`, a 32-byte key for `Base58Raw`
/// and `Ss58`.
pub fn encode(payload: &[u8], format: &AddressFormat) -> OmniResult<String> {
    match format {
        AddressFormat::Base58Check { version } => Ok(base58check::encode(*version, payload)),
        AddressFormat::Segwit { hrp } => segwit::encode(hrp, 0, payload),
        AddressFormat::Eip55 => eip55::encode(payload),
        AddressFormat::Base58Raw => Ok(bs58::encode(payload).into_string()),
        AddressFormat::Ss58 { network } => ss58::encode(*network, payload),
    }
}

/// Decode an address back into its raw payload.
pub fn decode(address: &str, format: &AddressFormat) -> OmniResult<Vec<u8>> {
    match format {
        AddressFormat::Base58Check { version } => base58check::decode(*version, address),
        AddressFormat::Segwit { hrp } => segwit::decode(hrp, address).map(|(_, program)| program),
        AddressFormat::Eip55 => eip55::decode(address),
        AddressFormat::Base58Raw => base58check::decode_raw(address, 32),
        AddressFormat::Ss58 { network } => ss58::decode(*network, address),
    }
}

/// Boolean validity query; never fails loudly.
pub fn is_valid(address: &str, format: &AddressFormat) -> bool {
    decode(address, format).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_every_format() {
        let hash20 = [0x11u8; 20];
        let key32 = [0x22u8; 32];

        let cases: Vec<(AddressFormat, &[u8])> = vec![
            (AddressFormat::Base58Check { version: 0x00 }, &hash20),
            (AddressFormat::Segwit { hrp: "bc" }, &hash20),
            (AddressFormat::Eip55, &hash20),
            (AddressFormat::Base58Raw, &key32),
            (AddressFormat::Ss58 { network: 0 }, &key32),
        ];

        for (format, payload) in cases {
            let encoded = encode(payload, &format).unwrap();
            let decoded = decode(&encoded, &format).unwrap();
            assert_eq!(decoded, payload, "round-trip failed for {:?}", format);
            assert!(is_valid(&encoded, &format));
        }
    }

    #[test]
    fn test_garbage_is_invalid_everywhere() {
        for format in [
            AddressFormat::Base58Check { version: 0x00 },
            AddressFormat::Segwit { hrp: "bc" },
            AddressFormat::Eip55,
            AddressFormat::Ss58 { network: 0 },
        ] {
            assert!(!is_valid("", &format));
            assert!(!is_valid("not-an-address", &format));
        }
    }
}
