//! Multi-Curve Cryptography Support
//!
//! This module provides a unified abstraction for the elliptic curves
//! used across the supported blockchain networks:
//!
//! - `secp256k1`: Bitcoin family, Ethereum and other EVM chains
//! - `ed25519`: Solana, and the SLIP-0010 derivation family
//! - `ed25519-blake2b`: EdDSA with a Blake2b-512 digest (Nano-style chains)
//! - `sr25519`: Polkadot, Kusama (Substrate-based chains)
//! - `secp256r1` (P-256/NIST): NEO, hardware-backed keys
//! - `starkex`: the Stark curve used by StarkEx/StarkWare L2s
//!
//! All curves implement the `EllipticCurve` trait; the free functions in this
//! module dispatch on `CurveType` so callers never match on curves themselves.

pub mod secp256k1;
pub mod ed25519;
pub mod ed25519_blake2b;
pub mod sr25519;
pub mod secp256r1;
pub mod starkex;
pub mod traits;

pub use traits::*;
pub use secp256k1::Secp256k1Curve;
pub use ed25519::Ed25519Curve;
pub use ed25519_blake2b::Ed25519Blake2bCurve;
pub use sr25519::Sr25519Curve;
pub use secp256r1::Secp256r1Curve;
pub use starkex::StarkexCurve;

use serde::{Deserialize, Serialize};

// MARK: - Curve Type Enum

/// Supported elliptic curve types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveType {
    /// secp256k1 - Bitcoin, Ethereum, BNB, etc.
    Secp256k1,
    /// Ed25519 - Solana and other EdDSA chains
    Ed25519,
    /// Ed25519 with Blake2b-512 digest
    #[serde(rename = "ed25519-blake2b")]
    Ed25519Blake2b,
    /// Sr25519 (Schnorr on Ristretto) - Polkadot, Kusama
    Sr25519,
    /// secp256r1 (P-256/NIST)
    Secp256r1,
    /// Stark curve - StarkEx L2s
    Starkex,
}

impl CurveType {
    /// Get the curve name as a string
    pub fn name(&self) -> &'static str {
        match self {
            Self::Secp256k1 => "secp256k1",
            Self::Ed25519 => "ed25519",
            Self::Ed25519Blake2b => "ed25519-blake2b",
            Self::Sr25519 => "sr25519",
            Self::Secp256r1 => "secp256r1",
            Self::Starkex => "starkex",
        }
    }

    /// Get the private key size in bytes
    pub fn private_key_size(&self) -> usize {
        match self {
            Self::Sr25519 => 64, // expanded SecretKey; 32-byte mini secrets also accepted
            _ => 32,
        }
    }

    /// Get the public key size in bytes (compressed for applicable curves)
    pub fn public_key_size(&self) -> usize {
        match self {
            Self::Secp256k1 | Self::Secp256r1 => 33, // Compressed
            _ => 32,
        }
    }

    /// Get the signature size in bytes
    pub fn signature_size(&self) -> usize {
        64
    }

    /// Parse curve type from string
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "secp256k1" => Some(Self::Secp256k1),
            "ed25519" => Some(Self::Ed25519),
            "ed25519-blake2b" | "ed25519_blake2b" => Some(Self::Ed25519Blake2b),
            "sr25519" => Some(Self::Sr25519),
            "secp256r1" | "p256" | "nist256p1" => Some(Self::Secp256r1),
            "starkex" | "stark" => Some(Self::Starkex),
            _ => None,
        }
    }
}

impl std::fmt::Display for CurveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// MARK: - Curve Errors

/// Errors that can occur during curve operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CurveError {
    InvalidPrivateKey(String),
    InvalidPublicKey(String),
    InvalidSignature(String),
    InvalidSeed(String),
    SigningFailed(String),
    VerificationFailed(String),
    UnsupportedDerivation(String),
    DerivationFailed(String),
}

impl std::fmt::Display for CurveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPrivateKey(s) => write!(f, "Invalid private key: {}", s),
            Self::InvalidPublicKey(s) => write!(f, "Invalid public key: {}", s),
            Self::InvalidSignature(s) => write!(f, "Invalid signature: {}", s),
            Self::InvalidSeed(s) => write!(f, "Invalid seed: {}", s),
            Self::SigningFailed(s) => write!(f, "Signing failed: {}", s),
            Self::VerificationFailed(s) => write!(f, "Verification failed: {}", s),
            Self::UnsupportedDerivation(s) => write!(f, "Unsupported derivation: {}", s),
            Self::DerivationFailed(s) => write!(f, "Key derivation failed: {}", s),
        }
    }
}

impl std::error::Error for CurveError {}

// MARK: - Unified Interface

/// Derive public key from private key
pub fn public_key_from_private(curve: CurveType, private_key: &[u8]) -> Result<Vec<u8>, CurveError> {
    match curve {
        CurveType::Secp256k1 => {
            Ok(Secp256k1Curve::public_key_from_private(private_key)?.to_vec())
        }
        CurveType::Ed25519 => Ok(Ed25519Curve::public_key_from_private(private_key)?.to_vec()),
        CurveType::Ed25519Blake2b => {
            Ok(Ed25519Blake2bCurve::public_key_from_private(private_key)?.to_vec())
        }
        CurveType::Sr25519 => Ok(Sr25519Curve::public_key_from_private(private_key)?.to_vec()),
        CurveType::Secp256r1 => {
            Ok(Secp256r1Curve::public_key_from_private(private_key)?.to_vec())
        }
        CurveType::Starkex => Ok(StarkexCurve::public_key_from_private(private_key)?.to_vec()),
    }
}

/// Sign a digest with the specified curve
pub fn sign(curve: CurveType, private_key: &[u8], digest: &[u8]) -> Result<Vec<u8>, CurveError> {
    match curve {
        CurveType::Secp256k1 => Ok(Secp256k1Curve::sign(private_key, digest)?.to_vec()),
        CurveType::Ed25519 => Ok(Ed25519Curve::sign(private_key, digest)?.to_vec()),
        CurveType::Ed25519Blake2b => Ok(Ed25519Blake2bCurve::sign(private_key, digest)?.to_vec()),
        CurveType::Sr25519 => Ok(Sr25519Curve::sign(private_key, digest)?.to_vec()),
        CurveType::Secp256r1 => Ok(Secp256r1Curve::sign(private_key, digest)?.to_vec()),
        CurveType::Starkex => Ok(StarkexCurve::sign(private_key, digest)?.to_vec()),
    }
}

/// Verify a signature with the specified curve.
///
/// Malformed keys or signatures report as `false`, never as an error.
pub fn verify(curve: CurveType, public_key: &[u8], digest: &[u8], signature: &[u8]) -> bool {
    let result = match curve {
        CurveType::Secp256k1 => Secp256k1Curve::verify(public_key, digest, signature),
        CurveType::Ed25519 => Ed25519Curve::verify(public_key, digest, signature),
        CurveType::Ed25519Blake2b => Ed25519Blake2bCurve::verify(public_key, digest, signature),
        CurveType::Sr25519 => Sr25519Curve::verify(public_key, digest, signature),
        CurveType::Secp256r1 => Secp256r1Curve::verify(public_key, digest, signature),
        CurveType::Starkex => StarkexCurve::verify(public_key, digest, signature),
    };
    result.unwrap_or(false)
}

// MARK: - Tests
