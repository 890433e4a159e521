//! HD Derivation Module
//!
//! BIP-39 mnemonic handling and hierarchical key derivation:
//! `Seed -> MasterKey -> (per-component child derivation) -> ChildKey`.
//!
//! Curve mapping:
//! - secp256k1 / secp256r1: BIP-32 (hardened and normal components)
//! - ed25519: SLIP-0010, hardened-only
//! - sr25519: substrate junctions (hardened -> hard derive, normal -> soft)
//!
//! SECURITY: entropy, seeds and derived scalars are zeroized on drop.

pub mod path;

pub use path::{DerivationComponent, DerivationPath, HARDENED};

use crate::crypto::{
    CurveType, Ed25519Curve, KeyDerivation, Secp256k1Curve, Secp256r1Curve, Sr25519Curve,
};
use crate::error::{OmniError, OmniResult};
use crate::keys::PrivateKey;
use crate::registry::{self, CoinType};
use bip39::Mnemonic;
use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::{Zeroize, Zeroizing};

type HmacSha512 = Hmac<sha2::Sha512>;

/// An HD wallet: a BIP-39 seed plus derivation over the coin registry
pub struct HdWallet {
    seed: Zeroizing<[u8; 64]>,
    mnemonic: Zeroizing<String>,
}

impl std::fmt::Debug for HdWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HdWallet")
            .field("seed", &"<redacted>")
            .field("mnemonic", &"<redacted>")
            .finish()
    }
}

impl HdWallet {
    /// Create a new wallet from fresh OS entropy (12 words)
    pub fn generate() -> OmniResult<Self> {
        let mut entropy = Zeroizing::new([0u8; 16]); // 128 bits = 12 words
        OsRng.fill_bytes(entropy.as_mut());

        let mnemonic = Mnemonic::from_entropy(entropy.as_ref())
            .map_err(|e| OmniError::internal(format!("Failed to create mnemonic: {}", e)))?;

        Ok(Self::from_parsed(mnemonic, ""))
    }

    /// Restore from a mnemonic phrase, with an optional BIP-39 passphrase
    pub fn from_mnemonic(phrase: &str, passphrase: &str) -> OmniResult<Self> {
        let mnemonic = Mnemonic::parse(phrase.trim())
            .map_err(|e| OmniError::invalid_mnemonic(format!("Invalid mnemonic: {}", e)))?;
        Ok(Self::from_parsed(mnemonic, passphrase))
    }

    fn from_parsed(mnemonic: Mnemonic, passphrase: &str) -> Self {
        let seed = Zeroizing::new(mnemonic.to_seed(passphrase));
        Self {
            seed,
            mnemonic: Zeroizing::new(mnemonic.to_string()),
        }
    }

    /// The mnemonic backing this wallet
    pub fn mnemonic(&self) -> &str {
        &self.mnemonic
    }

    /// The BIP-39 seed. Callers must not copy this out of the call scope.
    pub fn seed(&self) -> &[u8] {
        self.seed.as_ref()
    }

    /// Derive the private key for a coin's default derivation path
    pub fn derive_key(&self, coin: CoinType) -> OmniResult<PrivateKey> {
        let entry = registry::lookup(coin)?;
        derive_seed_key(self.seed.as_ref(), entry.derivation_path, entry.curve)
    }

    /// Derive the private key for an explicit path
    pub fn derive_key_with_path(&self, coin: CoinType, path: &str) -> OmniResult<PrivateKey> {
        let entry = registry::lookup(coin)?;
        derive_seed_key(self.seed.as_ref(), path, entry.curve)
    }

    /// Derive the canonical address for a coin
    pub fn derive_address(&self, coin: CoinType) -> OmniResult<String> {
        let key = self.derive_key(coin)?;
        crate::engine::AnyAddress::with_public_key(&key.public_key()?, coin)
            .map(|a| a.to_string())
    }
}

/// Validate a mnemonic phrase (wordlist membership and checksum)
pub fn is_valid_mnemonic(phrase: &str) -> bool {
    Mnemonic::parse(phrase.trim()).is_ok()
}

/// Derive a child key from a seed along `path` using the curve's HD scheme.
///
/// Deterministic: the same (seed, path, curve) triple always yields the same
/// key, and sibling paths yield different keys.
pub fn derive_seed_key(seed: &[u8], path: &str, curve: CurveType) -> OmniResult<PrivateKey> {
    let parsed = DerivationPath::parse(path)?;

    match curve {
        CurveType::Secp256k1 => derive_bip32::<Secp256k1Curve>(seed, &parsed, curve),
        CurveType::Secp256r1 => derive_bip32::<Secp256r1Curve>(seed, &parsed, curve),
        CurveType::Ed25519 => derive_bip32::<Ed25519Curve>(seed, &parsed, curve),
        CurveType::Sr25519 => derive_substrate(seed, &parsed),
        other => Err(OmniError::unsupported_derivation(format!(
            "{} has no hierarchical derivation scheme",
            other
        ))),
    }
}

/// Generic BIP-32/SLIP-0010 pipeline: HMAC master key, then one
/// `derive_child` step per path component.
fn derive_bip32<C: KeyDerivation>(
    seed: &[u8],
    path: &DerivationPath,
    curve: CurveType,
) -> OmniResult<PrivateKey> {
    let mut mac = HmacSha512::new_from_slice(C::MASTER_KEY)
        .map_err(|e| OmniError::internal(e.to_string()))?;
    mac.update(seed);
    let result = Zeroizing::new(mac.finalize().into_bytes());

    let mut current_key = Zeroizing::new([0u8; 32]);
    current_key.copy_from_slice(&result[..32]);
    let mut current_chain_code = [0u8; 32];
    current_chain_code.copy_from_slice(&result[32..]);

    for component in &path.components {
        let (new_key, new_chain) = C::derive_child(
            current_key.as_ref(),
            &current_chain_code,
            component.index,
            component.hardened,
        )?;

        current_key.copy_from_slice(&new_key);
        current_chain_code = new_chain;
    }

    PrivateKey::new(current_key.as_ref(), curve)
}

/// Substrate-style derivation: the seed's first 32 bytes form the mini
/// secret; path components become hard (hardened) or soft (normal)
/// junctions with a 4-byte little-endian index.
fn derive_substrate(seed: &[u8], path: &DerivationPath) -> OmniResult<PrivateKey> {
    if seed.len() < 32 {
        return Err(OmniError::invalid_private_key(format!(
            "Seed must be at least 32 bytes, got {}",
            seed.len()
        )));
    }

    let mut mac = HmacSha512::new_from_slice(b"sr25519 seed")
        .map_err(|e| OmniError::internal(e.to_string()))?;
    mac.update(seed);
    let result = Zeroizing::new(mac.finalize().into_bytes());

    let mut current_key = Zeroizing::new(vec![0u8; 32]);
    current_key.copy_from_slice(&result[..32]);
    let mut chain_code = [0u8; 32];
    chain_code.copy_from_slice(&result[32..]);

    for component in &path.components {
        let junction = component.index.to_le_bytes();
        let (new_key, new_chain) = if component.hardened {
            Sr25519Curve::derive_hard(current_key.as_ref(), &chain_code, &junction)?
        } else {
            Sr25519Curve::derive_soft(current_key.as_ref(), &chain_code, &junction)?
        };

        current_key.zeroize();
        *current_key = new_key.to_vec();
        chain_code = new_chain;
    }

    PrivateKey::new(current_key.as_ref(), CurveType::Sr25519)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_MNEMONIC: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn test_generate_wallet() {
        let wallet = HdWallet::generate().unwrap();
        assert_eq!(wallet.mnemonic().split_whitespace().count(), 12);
        assert!(is_valid_mnemonic(wallet.mnemonic()));
    }

    #[test]
    fn test_restore_known_mnemonic() {
        let wallet = HdWallet::from_mnemonic(TEST_MNEMONIC, "").unwrap();
        // BIP-39 reference seed for the "abandon ... about" vector
        assert_eq!(
            hex::encode(&wallet.seed()[..16]),
            "5eb00bbddcf069084889a8ab915556816f2ce76efdf40a043ac30ebd6a4bc24d"[..32]
        );
    }

    #[test]
    fn test_invalid_mnemonic_rejected() {
        let err = HdWallet::from_mnemonic("not a real mnemonic phrase", "").unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::InvalidMnemonic);

        // Valid words, broken checksum
        let broken =
            "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon";
        assert!(!is_valid_mnemonic(broken));
    }

    #[test]
    fn test_passphrase_changes_keys() {
        let plain = HdWallet::from_mnemonic(TEST_MNEMONIC, "").unwrap();
        let salted = HdWallet::from_mnemonic(TEST_MNEMONIC, "trezor").unwrap();
        assert_ne!(plain.seed(), salted.seed());
    }

    #[test]
    fn test_derivation_deterministic_and_path_sensitive() {
        let wallet = HdWallet::from_mnemonic(TEST_MNEMONIC, "").unwrap();

        let a1 = derive_seed_key(wallet.seed(), "m/44'/60'/0'/0/0", CurveType::Secp256k1).unwrap();
        let a2 = derive_seed_key(wallet.seed(), "m/44'/60'/0'/0/0", CurveType::Secp256k1).unwrap();
        let b = derive_seed_key(wallet.seed(), "m/44'/60'/0'/0/1", CurveType::Secp256k1).unwrap();

        assert_eq!(a1.bytes(), a2.bytes());
        assert_ne!(a1.bytes(), b.bytes());
    }

    #[test]
    fn test_ed25519_rejects_normal_components() {
        let wallet = HdWallet::from_mnemonic(TEST_MNEMONIC, "").unwrap();

        let err =
            derive_seed_key(wallet.seed(), "m/44'/501'/0'/0", CurveType::Ed25519).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::UnsupportedDerivation);

        assert!(derive_seed_key(wallet.seed(), "m/44'/501'/0'/0'", CurveType::Ed25519).is_ok());
    }

    #[test]
    fn test_substrate_derivation() {
        let wallet = HdWallet::from_mnemonic(TEST_MNEMONIC, "").unwrap();

        let dot = derive_seed_key(wallet.seed(), "m/44'/354'/0'/0'/0'", CurveType::Sr25519).unwrap();
        let dot2 = derive_seed_key(wallet.seed(), "m/44'/354'/0'/0'/0'", CurveType::Sr25519).unwrap();
        let other = derive_seed_key(wallet.seed(), "m/44'/354'/0'/0'/1'", CurveType::Sr25519).unwrap();

        assert_eq!(dot.bytes(), dot2.bytes());
        assert_ne!(dot.bytes(), other.bytes());
    }

    #[test]
    fn test_derive_key_per_coin() {
        let wallet = HdWallet::from_mnemonic(TEST_MNEMONIC, "").unwrap();

        for coin in registry::registered_coins() {
            let key = wallet.derive_key(coin).unwrap();
            assert!(key.public_key().is_ok(), "{} key derivation failed", coin);
        }
    }

    #[test]
    fn test_bip32_reference_vector() {
        // BIP-32 test vector 1: chain m/0' from seed 000102...0f
        let seed = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();
        let key = derive_seed_key(&seed, "m/0'", CurveType::Secp256k1).unwrap();
        assert_eq!(
            hex::encode(key.bytes()),
            "edb2e14f9ee77d26dd93b4ecede8d16ed408ce149b6cd80b0715a2d911a0afea"
        );
    }
}
