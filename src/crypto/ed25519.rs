//! Ed25519 Curve Implementation
//!
//! Used by: Solana and the wider SLIP-0010 derivation family.
//!
//! Features:
//! - EdDSA signing and verification (RFC 8032)
//! - SLIP-0010 key derivation (hardened-only)

use super::{CurveError, EllipticCurve, KeyDerivation};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use hmac::{Hmac, Mac};

type HmacSha512 = Hmac<sha2::Sha512>;

/// Ed25519 curve implementation
pub struct Ed25519Curve;

impl EllipticCurve for Ed25519Curve {
    type PrivateKey = [u8; 32];
    type PublicKey = [u8; 32];
    type Signature = [u8; 64];

    fn public_key_from_private(private_key: &[u8]) -> Result<Self::PublicKey, CurveError> {
        let mut sk_bytes = [0u8; 32];
        sk_bytes.copy_from_slice(check_key_len(private_key)?);

        let signing_key = SigningKey::from_bytes(&sk_bytes);
        Ok(signing_key.verifying_key().to_bytes())
    }

    fn sign(private_key: &[u8], digest: &[u8]) -> Result<Self::Signature, CurveError> {
        let mut sk_bytes = [0u8; 32];
        sk_bytes.copy_from_slice(check_key_len(private_key)?);

        let signing_key = SigningKey::from_bytes(&sk_bytes);
        let signature = signing_key.sign(digest);

        Ok(signature.to_bytes())
    }

    fn verify(public_key: &[u8], digest: &[u8], signature: &[u8]) -> Result<bool, CurveError> {
        if public_key.len() != 32 {
            return Err(CurveError::InvalidPublicKey(format!(
                "Public key must be 32 bytes, got {}",
                public_key.len()
            )));
        }
        if signature.len() != 64 {
            return Err(CurveError::InvalidSignature(format!(
                "Signature must be 64 bytes, got {}",
                signature.len()
            )));
        }

        let mut pk_bytes = [0u8; 32];
        pk_bytes.copy_from_slice(public_key);

        let verifying_key = VerifyingKey::from_bytes(&pk_bytes)
            .map_err(|e| CurveError::InvalidPublicKey(e.to_string()))?;

        let mut sig_bytes = [0u8; 64];
        sig_bytes.copy_from_slice(signature);
        let sig = Signature::from_bytes(&sig_bytes);

        Ok(verifying_key.verify(digest, &sig).is_ok())
    }
}

impl KeyDerivation for Ed25519Curve {
    const MASTER_KEY: &'static [u8] = b"ed25519 seed";

    fn derive_child(
        parent_private: &[u8],
        parent_chain_code: &[u8],
        index: u32,
        hardened: bool,
    ) -> Result<([u8; 32], [u8; 32]), CurveError> {
        // Ed25519 only supports hardened derivation (SLIP-0010)
        if !hardened {
            return Err(CurveError::UnsupportedDerivation(
                "ed25519 supports hardened derivation only".into(),
            ));
        }

        if parent_private.len() != 32 {
            return Err(CurveError::InvalidPrivateKey("Parent key must be 32 bytes".into()));
        }
        if parent_chain_code.len() != 32 {
            return Err(CurveError::DerivationFailed("Chain code must be 32 bytes".into()));
        }

        let actual_index = index | 0x80000000;

        let mut mac = HmacSha512::new_from_slice(parent_chain_code)
            .map_err(|e| CurveError::DerivationFailed(e.to_string()))?;

        // SLIP-0010: 0x00 || private_key || index
        mac.update(&[0x00]);
        mac.update(parent_private);
        mac.update(&actual_index.to_be_bytes());

        let result = mac.finalize().into_bytes();
        let (child_key, child_chain) = result.split_at(32);

        let mut child_key_arr = [0u8; 32];
        child_key_arr.copy_from_slice(child_key);
        let mut child_chain_arr = [0u8; 32];
        child_chain_arr.copy_from_slice(child_chain);

        Ok((child_key_arr, child_chain_arr))
    }
}

fn check_key_len(private_key: &[u8]) -> Result<&[u8], CurveError> {
    if private_key.len() != 32 {
        return Err(CurveError::InvalidPrivateKey(format!(
            "Private key must be 32 bytes, got {}",
            private_key.len()
        )));
    }
    Ok(private_key)
}

// MARK: - Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ed25519_sign_verify() {
        let sk = [42u8; 32];
        let pk = Ed25519Curve::public_key_from_private(&sk).unwrap();

        let message = b"Hello, Ed25519!";
        let signature = Ed25519Curve::sign(&sk, message).unwrap();

        assert_eq!(signature.len(), 64);
        assert!(Ed25519Curve::verify(&pk, message, &signature).unwrap());
        assert!(!Ed25519Curve::verify(&pk, b"Wrong message", &signature).unwrap());
    }

    #[test]
    fn test_ed25519_deterministic() {
        let sk = [1u8; 32];
        let pk1 = Ed25519Curve::public_key_from_private(&sk).unwrap();
        let pk2 = Ed25519Curve::public_key_from_private(&sk).unwrap();
        assert_eq!(pk1, pk2);

        let sig1 = Ed25519Curve::sign(&sk, b"msg").unwrap();
        let sig2 = Ed25519Curve::sign(&sk, b"msg").unwrap();
        assert_eq!(sig1, sig2);
    }

    #[test]
    fn test_ed25519_normal_derivation_rejected() {
        let parent = [3u8; 32];
        let chain_code = [9u8; 32];

        let err = Ed25519Curve::derive_child(&parent, &chain_code, 0, false).unwrap_err();
        assert!(matches!(err, CurveError::UnsupportedDerivation(_)));

        assert!(Ed25519Curve::derive_child(&parent, &chain_code, 0, true).is_ok());
    }

    #[test]
    fn test_ed25519_child_index_sensitivity() {
        let parent = [3u8; 32];
        let chain_code = [9u8; 32];

        let (k0, _) = Ed25519Curve::derive_child(&parent, &chain_code, 0, true).unwrap();
        let (k1, _) = Ed25519Curve::derive_child(&parent, &chain_code, 1, true).unwrap();
        assert_ne!(k0, k1);
    }
}
