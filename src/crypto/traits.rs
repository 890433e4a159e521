//! Elliptic Curve Traits
//!
//! Defines the common interface for all elliptic curve implementations.

use super::CurveError;

/// Core trait for elliptic curve operations
pub trait EllipticCurve {
    /// The private key type
    type PrivateKey: AsRef<[u8]>;
    /// The public key type
    type PublicKey: AsRef<[u8]>;
    /// The signature type
    type Signature: AsRef<[u8]>;

    /// Derive the public key from a private key
    fn public_key_from_private(private_key: &[u8]) -> Result<Self::PublicKey, CurveError>;

    /// Sign a digest with a private key
    fn sign(private_key: &[u8], digest: &[u8]) -> Result<Self::Signature, CurveError>;

    /// Verify a signature
    fn verify(public_key: &[u8], digest: &[u8], signature: &[u8]) -> Result<bool, CurveError>;
}

/// Extended trait for curves that support recoverable signatures
pub trait RecoverableSignature: EllipticCurve {
    /// Sign with recovery ID (v, r, s format)
    fn sign_recoverable(private_key: &[u8], digest: &[u8]) -> Result<(Self::Signature, u8), CurveError>;

    /// Recover public key from signature and digest
    fn recover_public_key(digest: &[u8], signature: &[u8], recovery_id: u8) -> Result<Self::PublicKey, CurveError>;
}

/// Extended trait for curves that support hierarchical key derivation
pub trait KeyDerivation: EllipticCurve {
    /// The HMAC key used to derive the master key from a seed
    const MASTER_KEY: &'static [u8];

    /// Derive a child key from parent using BIP-32 or the curve's equivalent
    fn derive_child(
        parent_private: &[u8],
        parent_chain_code: &[u8],
        index: u32,
        hardened: bool,
    ) -> Result<([u8; 32], [u8; 32]), CurveError>;
}

/// Public key encoding formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicKeyFormat {
    /// Compressed (33 bytes for secp256k1/r1)
    Compressed,
    /// Uncompressed (65 bytes for secp256k1/r1)
    Uncompressed,
    /// Raw (32 bytes for ed25519/sr25519/starkex)
    Raw,
}
