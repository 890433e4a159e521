//! SegWit (bech32/bech32m) Addresses
//!
//! Witness version + program encoding per BIP-173 and BIP-350. Witness v0
//! uses bech32, v1+ uses bech32m.

use crate::error::{OmniError, OmniResult};
use bech32::{self, u5, FromBase32, ToBase32, Variant};

/// Encode a witness program as a segwit address
pub fn encode(hrp: &str, witness_version: u8, program: &[u8]) -> OmniResult<String> {
    if witness_version > 16 {
        return Err(OmniError::malformed_address("Witness version out of range"));
    }
    if program.len() < 2 || program.len() > 40 {
        return Err(OmniError::malformed_address("Witness program length out of range"));
    }

    let variant = if witness_version == 0 {
        Variant::Bech32
    } else {
        Variant::Bech32m
    };

    let version = u5::try_from_u8(witness_version)
        .map_err(|e| OmniError::malformed_address(format!("Bech32 error: {}", e)))?;

    let mut data = vec![version];
    data.extend(program.to_base32());

    bech32::encode(hrp, data, variant)
        .map_err(|e| OmniError::malformed_address(format!("Bech32 error: {}", e)))
}

/// Decode a segwit address, returning (witness version, program)
pub fn decode(expected_hrp: &str, address: &str) -> OmniResult<(u8, Vec<u8>)> {
    let (hrp, data, variant) = bech32::decode(address)
        .map_err(|e| OmniError::malformed_address(format!("Invalid bech32: {}", e)))?;

    if hrp != expected_hrp {
        return Err(OmniError::malformed_address("Wrong network prefix"));
    }
    if data.is_empty() {
        return Err(OmniError::malformed_address("Empty witness program"));
    }

    let witness_version = data[0].to_u8();
    let program = Vec::<u8>::from_base32(&data[1..])
        .map_err(|e| OmniError::malformed_address(format!("Invalid program: {}", e)))?;

    // BIP-350: v0 must use bech32, later versions bech32m
    let expected_variant = if witness_version == 0 {
        Variant::Bech32
    } else {
        Variant::Bech32m
    };
    if variant != expected_variant {
        return Err(OmniError::malformed_address("Wrong bech32 variant for witness version"));
    }

    // Witness v0 programs are exactly 20 (P2WPKH) or 32 (P2WSH) bytes
    if witness_version == 0 && program.len() != 20 && program.len() != 32 {
        return Err(OmniError::malformed_address("Invalid witness v0 program length"));
    }

    Ok((witness_version, program))
}
