//! Polkadot / Substrate Entry Point
//!
//! Serves Polkadot and Kusama. The caller supplies the SCALE-encoded
//! extrinsic signing payload (call + era + nonce + tip + runtime versions +
//! genesis/block hashes); the entry signs it with sr25519 under the
//! `substrate` context and returns the MultiSignature-tagged signature.
//! Payloads longer than 256 bytes are hashed with Blake2b-256 before
//! signing, per the substrate convention.

use super::{decode_input, encode_output, CoinEntry, EntryError, EntryResult};
use crate::address::ss58;
use crate::crypto::{EllipticCurve, Sr25519Curve};
use crate::keys::PublicKey;
use crate::registry::{self, AddressFormat, CoinType};
use crate::utils::hash::blake2b256;
use serde::{Deserialize, Serialize};

/// MultiSignature variant tag for sr25519
const MULTISIG_SR25519: u8 = 0x01;

/// Payloads longer than this are hashed before signing
const MAX_DIRECT_PAYLOAD: usize = 256;

/// Signing request for Substrate chains
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigningInput {
    /// 32-byte mini secret or 64-byte expanded sr25519 key
    pub private_key: Vec<u8>,
    /// SCALE-encoded extrinsic signing payload
    pub payload: Vec<u8>,
}

/// Signed extrinsic material
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigningOutput {
    /// MultiSignature encoding: 0x01 tag + 64 signature bytes
    pub encoded: Vec<u8>,
    /// The signer's SS58 address on the coin's network
    pub signer: String,
}

pub struct PolkadotEntry;

fn network_prefix(coin: CoinType) -> u16 {
    match registry::lookup(coin).map(|e| e.format) {
        Ok(AddressFormat::Ss58 { network }) => network,
        _ => 42, // generic substrate
    }
}

impl CoinEntry for PolkadotEntry {
    fn derive_address(&self, coin: CoinType, public_key: &PublicKey) -> EntryResult<String> {
        ss58::encode(network_prefix(coin), public_key.bytes())
            .map_err(|e| EntryError::InvalidAddress(e.to_string()))
    }

    fn validate_address(&self, coin: CoinType, address: &str) -> bool {
        ss58::decode(network_prefix(coin), address).is_ok()
    }

    fn sign(&self, coin: CoinType, input: &[u8]) -> EntryResult<Vec<u8>> {
        let request: SigningInput = decode_input(input)?;
        let output = sign_request(coin, &request)?;
        encode_output(&output)
    }
}

fn sign_request(coin: CoinType, request: &SigningInput) -> EntryResult<SigningOutput> {
    if request.payload.is_empty() {
        return Err(EntryError::MalformedInput("Empty signing payload".into()));
    }

    let public = Sr25519Curve::public_key_from_private(&request.private_key)
        .map_err(|e| EntryError::InvalidKey(e.to_string()))?;

    // Oversized payloads are signed via their Blake2b-256 digest
    let signature = if request.payload.len() > MAX_DIRECT_PAYLOAD {
        let digest = blake2b256(&request.payload);
        Sr25519Curve::sign(&request.private_key, &digest)
    } else {
        Sr25519Curve::sign(&request.private_key, &request.payload)
    }
    .map_err(|e| EntryError::Signing(e.to_string()))?;

    let mut encoded = Vec::with_capacity(65);
    encoded.push(MULTISIG_SR25519);
    encoded.extend_from_slice(&signature);

    let signer = ss58::encode(network_prefix(coin), &public)
        .map_err(|e| EntryError::InvalidAddress(e.to_string()))?;

    Ok(SigningOutput { encoded, signer })
}

// MARK: - Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::CurveType;
    use crate::keys::PrivateKey;

    #[test]
    fn test_addresses_differ_by_network() {
        let key = PrivateKey::new(&[7u8; 32], CurveType::Sr25519).unwrap();
        let public = key.public_key().unwrap();

        let entry = PolkadotEntry;
        let dot = entry.derive_address(CoinType::Polkadot, &public).unwrap();
        let ksm = entry.derive_address(CoinType::Kusama, &public).unwrap();

        assert_ne!(dot, ksm);
        assert!(entry.validate_address(CoinType::Polkadot, &dot));
        assert!(!entry.validate_address(CoinType::Polkadot, &ksm));
        assert!(entry.validate_address(CoinType::Kusama, &ksm));
    }

    #[test]
    fn test_sign_short_payload_verifies() {
        let request = SigningInput {
            private_key: vec![7u8; 32],
            payload: vec![0x05, 0x00, 0x12, 0x34],
        };

        let output = sign_request(CoinType::Polkadot, &request).unwrap();
        assert_eq!(output.encoded.len(), 65);
        assert_eq!(output.encoded[0], MULTISIG_SR25519);

        let public = Sr25519Curve::public_key_from_private(&request.private_key).unwrap();
        assert!(
            Sr25519Curve::verify(&public, &request.payload, &output.encoded[1..]).unwrap()
        );
    }

    #[test]
    fn test_sign_long_payload_hashes_first() {
        let request = SigningInput {
            private_key: vec![7u8; 32],
            payload: vec![0x55u8; 300],
        };

        let output = sign_request(CoinType::Polkadot, &request).unwrap();
        let public = Sr25519Curve::public_key_from_private(&request.private_key).unwrap();

        let digest = blake2b256(&request.payload);
        assert!(Sr25519Curve::verify(&public, &digest, &output.encoded[1..]).unwrap());
        // The raw payload itself is not what was signed
        assert!(
            !Sr25519Curve::verify(&public, &request.payload, &output.encoded[1..]).unwrap()
        );
    }

    #[test]
    fn test_empty_payload_rejected() {
        let request = SigningInput {
            private_key: vec![7u8; 32],
            payload: vec![],
        };
        assert!(matches!(
            sign_request(CoinType::Polkadot, &request),
            Err(EntryError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_signer_matches_derived_address() {
        let request = SigningInput {
            private_key: vec![7u8; 32],
            payload: vec![1, 2, 3],
        };
        let output = sign_request(CoinType::Polkadot, &request).unwrap();

        let key = PrivateKey::new(&[7u8; 32], CurveType::Sr25519).unwrap();
        let entry = PolkadotEntry;
        let address = entry
            .derive_address(CoinType::Polkadot, &key.public_key().unwrap())
            .unwrap();
        assert_eq!(output.signer, address);
    }
}
