//! EIP-55 Checksummed Hex Addresses
//!
//! The 20-byte account is hex-encoded and letter casing is driven by the
//! keccak256 hash of the lowercase form. All-lowercase and all-uppercase
//! inputs are accepted (no checksum information); mixed-case inputs must
//! match the checksum exactly.

use crate::error::{OmniError, OmniResult};
use crate::utils::hash::to_checksum_address;

/// Encode a 20-byte account as a checksummed address
pub fn encode(account: &[u8]) -> OmniResult<String> {
    if account.len() != 20 {
        return Err(OmniError::malformed_address(format!(
            "Account must be 20 bytes, got {}",
            account.len()
        )));
    }
    Ok(to_checksum_address(account))
}

/// Decode an address back into 20 account bytes, enforcing the checksum on
/// mixed-case input
pub fn decode(address: &str) -> OmniResult<Vec<u8>> {
    let trimmed = address.trim();
    let hex_part = trimmed
        .strip_prefix("0x")
        .ok_or_else(|| OmniError::malformed_address("Missing 0x prefix"))?;

    if hex_part.len() != 40 {
        return Err(OmniError::malformed_address("Address must be 40 hex characters"));
    }

    let bytes = hex::decode(hex_part)
        .map_err(|e| OmniError::malformed_address(format!("Invalid hex: {}", e)))?;

    let has_lower = hex_part.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = hex_part.chars().any(|c| c.is_ascii_uppercase());

    if has_lower && has_upper && to_checksum_address(&bytes) != trimmed {
        return Err(OmniError::malformed_address("EIP-55 checksum mismatch"));
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_checksum_vectors() {
        // EIP-55 reference vectors
        for addr in [
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
            "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
        ] {
            let bytes = decode(addr).unwrap();
            assert_eq!(encode(&bytes).unwrap(), addr);
        }
    }

    #[test]
    fn test_lowercase_accepted() {
        let bytes = decode("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap();
        assert_eq!(bytes.len(), 20);
    }

    #[test]
    fn test_bad_checksum_rejected() {
        // Flip the case of one letter in a valid checksummed address
        assert!(decode("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAeD").is_err());
    }

    #[test]
    fn test_wrong_length_rejected() {
        assert!(decode("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeA").is_err());
        assert!(decode("5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed").is_err());
    }
}
