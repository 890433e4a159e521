//! AnyAddress
//!
//! Uniform address construction and validation. Building from a public key
//! always yields the coin's canonical representation; building from a string
//! goes through the entry point's validation, which may also accept legacy
//! forms.

use crate::error::{OmniError, OmniResult};
use crate::keys::PublicKey;
use crate::registry::{self, CoinType};

/// An address bound to its coin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnyAddress {
    coin: CoinType,
    address: String,
}

impl AnyAddress {
    /// Derive the canonical address for a public key.
    ///
    /// Succeeds whenever the key matches the coin's curve; for coins with
    /// several valid representations this always picks the documented
    /// canonical one (e.g. bech32 P2WPKH for Bitcoin).
    pub fn with_public_key(public_key: &PublicKey, coin: CoinType) -> OmniResult<Self> {
        let entry = registry::lookup(coin)?;

        if public_key.curve() != entry.curve {
            return Err(OmniError::malformed_input(format!(
                "{} expects a {} key, got {}",
                coin.name(),
                entry.curve,
                public_key.curve()
            ))
            .with_coin(coin));
        }

        let address = entry
            .entry
            .derive_address(coin, public_key)
            .map_err(|e| super::entry_error(coin, e))?;

        Ok(Self { coin, address })
    }

    /// Parse and validate a textual address for the coin
    pub fn from_string(address: &str, coin: CoinType) -> OmniResult<Self> {
        let entry = registry::lookup(coin)?;

        if !entry.entry.validate_address(coin, address) {
            return Err(OmniError::malformed_address(format!(
                "Not a valid {} address",
                coin.name()
            ))
            .with_coin(coin));
        }

        Ok(Self {
            coin,
            address: address.to_string(),
        })
    }

    pub fn coin(&self) -> CoinType {
        self.coin
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

impl std::fmt::Display for AnyAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.address)
    }
}

/// Boolean address validity query. Never fails loudly: unknown coins and
/// every parse failure report as `false`.
pub fn validate_address(address: &str, coin: CoinType) -> bool {
    registry::lookup(coin)
        .map(|entry| entry.entry.validate_address(coin, address))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::CurveType;
    use crate::error::ErrorCode;
    use crate::keys::PrivateKey;

    #[test]
    fn test_canonical_bitcoin_address_is_segwit() {
        let key = PrivateKey::new(&[7u8; 32], CurveType::Secp256k1).unwrap();
        let address =
            AnyAddress::with_public_key(&key.public_key().unwrap(), CoinType::Bitcoin).unwrap();

        assert!(address.address().starts_with("bc1q"));
    }

    #[test]
    fn test_curve_mismatch_rejected() {
        let key = PrivateKey::new(&[7u8; 32], CurveType::Ed25519).unwrap();
        let err = AnyAddress::with_public_key(&key.public_key().unwrap(), CoinType::Bitcoin)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::MalformedInput);
    }

    #[test]
    fn test_from_string_validates() {
        let ok = AnyAddress::from_string("1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa", CoinType::Bitcoin);
        assert!(ok.is_ok());

        let err = AnyAddress::from_string("1A1zP1eP5QGefi2DMPTfTL5SLmv7Divfff", CoinType::Bitcoin)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::MalformedAddress);
    }

    #[test]
    fn test_validate_is_a_query() {
        assert!(validate_address(
            "0xe32DC46bfBF78D1eada7b0a68C96903e01418D64",
            CoinType::Ethereum
        ));
        assert!(!validate_address("not an address", CoinType::Ethereum));
        assert!(!validate_address("", CoinType::Solana));
    }

    #[test]
    fn test_roundtrip_public_key_to_string() {
        for coin in registry::registered_coins() {
            let entry = registry::lookup(coin).unwrap();
            let key = PrivateKey::new(&[7u8; 32], entry.curve).unwrap();
            let derived =
                AnyAddress::with_public_key(&key.public_key().unwrap(), coin).unwrap();

            let parsed = AnyAddress::from_string(derived.address(), coin).unwrap();
            assert_eq!(parsed.address(), derived.address(), "{} roundtrip", coin);
        }
    }
}
