//! Base58Check Encoding
//!
//! Version byte + payload + 4-byte double-SHA256 checksum, used by legacy
//! Bitcoin-family addresses and WIF keys.

use crate::error::{OmniError, OmniResult};
use crate::utils::hash::sha256d;
use subtle::ConstantTimeEq;

/// Encode a payload with a version byte and checksum
pub fn encode(version: u8, payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(payload.len() + 5);
    data.push(version);
    data.extend_from_slice(payload);

    let checksum = sha256d(&data);
    data.extend_from_slice(&checksum[..4]);

    bs58::encode(data).into_string()
}

/// Decode and verify; returns the payload without version byte or checksum
pub fn decode(version: u8, address: &str) -> OmniResult<Vec<u8>> {
    let data = decode_check(address)?;

    if data.is_empty() || data[0] != version {
        return Err(OmniError::malformed_address("Version byte mismatch"));
    }

    Ok(data[1..].to_vec())
}

/// Decode a base58 string with checksum verification, returning version byte
/// plus payload
pub fn decode_check(address: &str) -> OmniResult<Vec<u8>> {
    let decoded = bs58::decode(address)
        .into_vec()
        .map_err(|e| OmniError::malformed_address(format!("Invalid base58: {}", e)))?;

    if decoded.len() < 5 {
        return Err(OmniError::malformed_address("Address too short"));
    }

    let (data, checksum) = decoded.split_at(decoded.len() - 4);
    let expected = sha256d(data);

    if !bool::from(expected[..4].ct_eq(checksum)) {
        return Err(OmniError::malformed_address("Checksum mismatch"));
    }

    Ok(data.to_vec())
}

/// Decode plain base58 (no version, no checksum) expecting an exact length —
/// the Solana account-key form
pub fn decode_raw(address: &str, expected_len: usize) -> OmniResult<Vec<u8>> {
    let decoded = bs58::decode(address)
        .into_vec()
        .map_err(|e| OmniError::malformed_address(format!("Invalid base58: {}", e)))?;

    if decoded.len() != expected_len {
        return Err(OmniError::malformed_address(format!(
            "Expected {} bytes, got {}",
            expected_len,
            decoded.len()
        )));
    }

    Ok(decoded)
}
