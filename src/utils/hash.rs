//! Hashing Utilities
//!
//! Helper functions shared by the address codecs and chain entries.

use bitcoin::hashes::{sha256d as sha256d_hash, Hash};
use blake2::digest::consts::U32;
use blake2::{Blake2b, Blake2b512, Digest};
use ripemd::Ripemd160;
use sha2::Sha256;
use tiny_keccak::{Hasher, Keccak};

/// Keccak256 hash (used for Ethereum addresses and transaction digests)
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut out = [0u8; 32];
    hasher.finalize(&mut out);
    out
}

/// Single SHA-256
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Double SHA-256 (Bitcoin checksums and txids)
pub fn sha256d(data: &[u8]) -> [u8; 32] {
    sha256d_hash::Hash::hash(data).to_byte_array()
}

/// RIPEMD160(SHA256(data)) — Bitcoin-style public key hash
pub fn hash160(data: &[u8]) -> [u8; 20] {
    let mut hasher = Ripemd160::new();
    hasher.update(sha256(data));
    hasher.finalize().into()
}

/// Blake2b with a 256-bit output (Substrate oversized-payload digests)
pub fn blake2b256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b::<U32>::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Blake2b with a 512-bit output (SS58 checksums)
pub fn blake2b512(data: &[u8]) -> [u8; 64] {
    let mut hasher = Blake2b512::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Convert raw address bytes to a checksummed Ethereum address
pub fn to_checksum_address(address: &[u8]) -> String {
    let lower = hex::encode(address);
    let hash = keccak256(lower.as_bytes());

    let mut result = String::from("0x");
    for (i, ch) in lower.chars().enumerate() {
        let byte = hash[i / 2];
        let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };

        if ch.is_ascii_digit() {
            result.push(ch);
        } else if nibble >= 8 {
            result.push(ch.to_ascii_uppercase());
        } else {
            result.push(ch);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak256() {
        // Empty-input keccak256 reference value
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_hash160_length() {
        assert_eq!(hash160(b"pubkey").len(), 20);
    }

    #[test]
    fn test_sha256d_is_double_hash() {
        assert_eq!(sha256d(b"x"), sha256(&sha256(b"x")));
    }

    #[test]
    fn test_checksum_address() {
        let addr_bytes = hex::decode("5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap();
        assert_eq!(
            to_checksum_address(&addr_bytes),
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"
        );
    }
}
