//! Stark Curve Implementation
//!
//! Used by: StarkEx-based L2s (dYdX v3, Immutable X, Sorare).
//!
//! ECDSA over the Stark-friendly prime field with RFC 6979 deterministic
//! nonces. Keys, message hashes and signature halves are all field elements
//! serialized as 32 big-endian bytes.

use super::{CurveError, EllipticCurve};
use starknet_crypto::{get_public_key, rfc6979_generate_k, sign as stark_sign, verify as stark_verify};
use starknet_ff::FieldElement;

/// Stark curve implementation
pub struct StarkexCurve;

impl StarkexCurve {
    fn field_element(bytes: &[u8], what: &str) -> Result<FieldElement, CurveError> {
        if bytes.len() != 32 {
            return Err(CurveError::InvalidPrivateKey(format!(
                "{} must be 32 bytes, got {}",
                what,
                bytes.len()
            )));
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(bytes);
        FieldElement::from_bytes_be(&arr)
            .map_err(|_| CurveError::InvalidPrivateKey(format!("{} exceeds the field modulus", what)))
    }

    /// Hashes on the Stark curve are at most 251 bits; accept shorter inputs
    /// by left-padding to 32 bytes.
    fn message_element(digest: &[u8]) -> Result<FieldElement, CurveError> {
        if digest.is_empty() || digest.len() > 32 {
            return Err(CurveError::SigningFailed(format!(
                "Digest must be 1..=32 bytes, got {}",
                digest.len()
            )));
        }
        let mut arr = [0u8; 32];
        arr[32 - digest.len()..].copy_from_slice(digest);
        FieldElement::from_bytes_be(&arr)
            .map_err(|_| CurveError::SigningFailed("Digest exceeds the field modulus".into()))
    }
}

impl EllipticCurve for StarkexCurve {
    type PrivateKey = [u8; 32];
    type PublicKey = [u8; 32]; // x-coordinate
    type Signature = [u8; 64]; // r,s

    fn public_key_from_private(private_key: &[u8]) -> Result<Self::PublicKey, CurveError> {
        let sk = Self::field_element(private_key, "Private key")?;
        if sk == FieldElement::ZERO {
            return Err(CurveError::InvalidPrivateKey("Zero scalar".into()));
        }
        Ok(get_public_key(&sk).to_bytes_be())
    }

    fn sign(private_key: &[u8], digest: &[u8]) -> Result<Self::Signature, CurveError> {
        let sk = Self::field_element(private_key, "Private key")?;
        if sk == FieldElement::ZERO {
            return Err(CurveError::InvalidPrivateKey("Zero scalar".into()));
        }
        let msg = Self::message_element(digest)?;

        let k = rfc6979_generate_k(&msg, &sk, None);
        let signature = stark_sign(&sk, &msg, &k)
            .map_err(|e| CurveError::SigningFailed(format!("{:?}", e)))?;

        let mut out = [0u8; 64];
        out[..32].copy_from_slice(&signature.r.to_bytes_be());
        out[32..].copy_from_slice(&signature.s.to_bytes_be());
        Ok(out)
    }

    fn verify(public_key: &[u8], digest: &[u8], signature: &[u8]) -> Result<bool, CurveError> {
        if signature.len() != 64 {
            return Err(CurveError::InvalidSignature(format!(
                "Signature must be 64 bytes, got {}",
                signature.len()
            )));
        }

        let pk = Self::field_element(public_key, "Public key")
            .map_err(|_| CurveError::InvalidPublicKey("Not a field element".into()))?;
        let msg = Self::message_element(digest)?;
        let r = Self::field_element(&signature[..32], "Signature r")
            .map_err(|_| CurveError::InvalidSignature("r exceeds the field modulus".into()))?;
        let s = Self::field_element(&signature[32..], "Signature s")
            .map_err(|_| CurveError::InvalidSignature("s exceeds the field modulus".into()))?;

        Ok(stark_verify(&pk, &msg, &r, &s).unwrap_or(false))
    }
}

// MARK: - Tests
