//! SS58 Addresses
//!
//! Substrate address format: network prefix (1 or 2 bytes) + 32-byte account
//! id + 2-byte Blake2b checksum over `SS58PRE || prefix || account`.

use crate::error::{OmniError, OmniResult};
use crate::utils::hash::blake2b512;

const SS58_PREFIX: &[u8] = b"SS58PRE";

/// Encode a 32-byte account id for the given network
pub fn encode(network: u16, account: &[u8]) -> OmniResult<String> {
    if account.len() != 32 {
        return Err(OmniError::malformed_address(format!(
            "Account must be 32 bytes, got {}",
            account.len()
        )));
    }
    if network >= 0x4000 {
        return Err(OmniError::malformed_address("Network prefix out of range"));
    }

    let mut data = Vec::with_capacity(35);
    if network < 64 {
        data.push(network as u8);
    } else {
        // Two-byte prefix
        data.push(((network & 0x00fc) >> 2) as u8 | 0x40);
        data.push(((network >> 8) as u8) | ((network & 0x0003) << 6) as u8);
    }
    data.extend_from_slice(account);

    let checksum = compute_checksum(&data);
    data.extend_from_slice(&checksum);

    Ok(bs58::encode(data).into_string())
}

/// Decode an SS58 address, checking the checksum and network prefix
pub fn decode(expected_network: u16, address: &str) -> OmniResult<Vec<u8>> {
    let bytes = bs58::decode(address)
        .into_vec()
        .map_err(|e| OmniError::malformed_address(format!("Invalid base58: {}", e)))?;

    if bytes.len() < 35 {
        return Err(OmniError::malformed_address("Address too short"));
    }

    let (network, prefix_len) = if bytes[0] < 64 {
        (bytes[0] as u16, 1)
    } else if bytes[0] < 128 {
        let lower = ((bytes[0] & 0x3f) as u16) << 2 | (bytes[1] as u16) >> 6;
        let upper = ((bytes[1] & 0x3f) as u16) << 8;
        (lower | upper, 2)
    } else {
        return Err(OmniError::malformed_address("Invalid prefix"));
    };

    let pk_end = prefix_len + 32;
    if bytes.len() != pk_end + 2 {
        return Err(OmniError::malformed_address("Invalid address length"));
    }

    let checksum = &bytes[pk_end..];
    let computed = compute_checksum(&bytes[..pk_end]);
    if checksum != computed {
        return Err(OmniError::malformed_address("Invalid checksum"));
    }

    if network != expected_network {
        return Err(OmniError::malformed_address("Wrong network prefix"));
    }

    Ok(bytes[prefix_len..pk_end].to_vec())
}

/// First 2 bytes of Blake2b-512 over the SS58 preamble and payload
fn compute_checksum(data: &[u8]) -> [u8; 2] {
    let mut preimage = Vec::with_capacity(SS58_PREFIX.len() + data.len());
    preimage.extend_from_slice(SS58_PREFIX);
    preimage.extend_from_slice(data);

    let hash = blake2b512(&preimage);
    [hash[0], hash[1]]
}
