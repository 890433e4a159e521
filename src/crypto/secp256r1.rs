//! Secp256r1 (P-256/NIST) Curve Implementation
//!
//! Used by: NEO, hardware-backed enterprise keys.
//!
//! Features:
//! - ECDSA signing with SHA-256 (RFC 6979 deterministic nonces)
//! - BIP-32 style key derivation with the `Nist256p1 seed` master key

use super::{CurveError, EllipticCurve, KeyDerivation};
use hmac::{Hmac, Mac};
use p256::{
    ecdsa::{
        signature::{Signer, Verifier},
        Signature, SigningKey, VerifyingKey,
    },
    elliptic_curve::sec1::ToEncodedPoint,
    EncodedPoint, NonZeroScalar, Scalar, SecretKey,
};
use p256::elliptic_curve::PrimeField;

type HmacSha512 = Hmac<sha2::Sha512>;

/// Secp256r1 (P-256) curve implementation
pub struct Secp256r1Curve;

impl EllipticCurve for Secp256r1Curve {
    type PrivateKey = [u8; 32];
    type PublicKey = [u8; 33]; // Compressed public key
    type Signature = [u8; 64]; // Fixed-size signature

    fn public_key_from_private(private_key: &[u8]) -> Result<Self::PublicKey, CurveError> {
        if private_key.len() != 32 {
            return Err(CurveError::InvalidPrivateKey(format!(
                "Private key must be 32 bytes, got {}",
                private_key.len()
            )));
        }

        let secret_key = SecretKey::from_bytes(private_key.into())
            .map_err(|e| CurveError::InvalidPrivateKey(format!("Invalid private key: {:?}", e)))?;

        let public_key = secret_key.public_key();
        let pk_compressed = public_key.to_encoded_point(true);

        let mut pk_bytes = [0u8; 33];
        pk_bytes.copy_from_slice(pk_compressed.as_bytes());

        Ok(pk_bytes)
    }

    fn sign(private_key: &[u8], digest: &[u8]) -> Result<Self::Signature, CurveError> {
        if private_key.len() != 32 {
            return Err(CurveError::InvalidPrivateKey(format!(
                "Private key must be 32 bytes, got {}",
                private_key.len()
            )));
        }

        let signing_key = SigningKey::from_bytes(private_key.into())
            .map_err(|e| CurveError::InvalidPrivateKey(format!("Invalid signing key: {:?}", e)))?;

        // SigningKey hashes the message with SHA-256 internally
        let signature: Signature = signing_key.sign(digest);

        Ok(signature.to_bytes().into())
    }

    fn verify(public_key: &[u8], digest: &[u8], signature: &[u8]) -> Result<bool, CurveError> {
        if signature.len() != 64 {
            return Err(CurveError::InvalidSignature(format!(
                "Signature must be 64 bytes, got {}",
                signature.len()
            )));
        }

        let verifying_key = Self::parse_public_key(public_key)?;

        let sig = Signature::from_bytes(signature.into())
            .map_err(|e| CurveError::InvalidSignature(format!("Invalid signature: {:?}", e)))?;

        Ok(verifying_key.verify(digest, &sig).is_ok())
    }
}

impl KeyDerivation for Secp256r1Curve {
    const MASTER_KEY: &'static [u8] = b"Nist256p1 seed";

    fn derive_child(
        parent_private: &[u8],
        parent_chain_code: &[u8],
        index: u32,
        hardened: bool,
    ) -> Result<([u8; 32], [u8; 32]), CurveError> {
        if parent_private.len() != 32 {
            return Err(CurveError::InvalidPrivateKey("Parent key must be 32 bytes".into()));
        }
        if parent_chain_code.len() != 32 {
            return Err(CurveError::DerivationFailed("Chain code must be 32 bytes".into()));
        }

        let parent_sk = SecretKey::from_bytes(parent_private.into())
            .map_err(|e| CurveError::InvalidPrivateKey(format!("{:?}", e)))?;

        let mut mac = HmacSha512::new_from_slice(parent_chain_code)
            .map_err(|e| CurveError::DerivationFailed(e.to_string()))?;

        let actual_index = if hardened { index | 0x80000000 } else { index };

        if hardened {
            mac.update(&[0x00]);
            mac.update(parent_private);
        } else {
            let parent_pk = parent_sk.public_key().to_encoded_point(true);
            mac.update(parent_pk.as_bytes());
        }
        mac.update(&actual_index.to_be_bytes());

        let result = mac.finalize().into_bytes();
        let (il, ir) = result.split_at(32);

        // child_key = parse256(IL) + parent_key (mod n)
        let mut il_arr = [0u8; 32];
        il_arr.copy_from_slice(il);
        let tweak = Option::<Scalar>::from(Scalar::from_repr(il_arr.into()))
            .ok_or_else(|| CurveError::DerivationFailed("Tweak exceeds curve order".into()))?;

        let child_scalar = tweak + *parent_sk.to_nonzero_scalar();
        let child_nz = Option::<NonZeroScalar>::from(NonZeroScalar::new(child_scalar))
            .ok_or_else(|| CurveError::DerivationFailed("Derived zero scalar".into()))?;

        let mut child_key = [0u8; 32];
        child_key.copy_from_slice(&child_nz.to_repr());
        let mut child_chain_code = [0u8; 32];
        child_chain_code.copy_from_slice(ir);

        Ok((child_key, child_chain_code))
    }
}

impl Secp256r1Curve {
    /// Parse public key from compressed or uncompressed encoding
    fn parse_public_key(public_key: &[u8]) -> Result<VerifyingKey, CurveError> {
        match public_key.len() {
            33 | 65 => {
                let point = EncodedPoint::from_bytes(public_key)
                    .map_err(|e| CurveError::InvalidPublicKey(format!("Invalid point: {:?}", e)))?;

                VerifyingKey::from_encoded_point(&point)
                    .map_err(|e| CurveError::InvalidPublicKey(format!("Invalid key: {:?}", e)))
            }
            _ => Err(CurveError::InvalidPublicKey(format!(
                "Public key must be 33 or 65 bytes, got {}",
                public_key.len()
            ))),
        }
    }

    /// Get uncompressed public key (65 bytes)
    pub fn public_key_uncompressed(private_key: &[u8]) -> Result<[u8; 65], CurveError> {
        if private_key.len() != 32 {
            return Err(CurveError::InvalidPrivateKey(format!(
                "Private key must be 32 bytes, got {}",
                private_key.len()
            )));
        }

        let secret_key = SecretKey::from_bytes(private_key.into())
            .map_err(|e| CurveError::InvalidPrivateKey(format!("Invalid private key: {:?}", e)))?;

        let public_key = secret_key.public_key();
        let pk_uncompressed = public_key.to_encoded_point(false);

        let mut pk_bytes = [0u8; 65];
        pk_bytes.copy_from_slice(pk_uncompressed.as_bytes());

        Ok(pk_bytes)
    }
}

// MARK: - Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secp256r1_public_key() {
        let sk = [42u8; 32];
        let pk = Secp256r1Curve::public_key_from_private(&sk).unwrap();

        assert_eq!(pk.len(), 33);
        assert!(pk[0] == 0x02 || pk[0] == 0x03);
    }

    #[test]
    fn test_secp256r1_sign_verify() {
        let sk = [42u8; 32];
        let pk = Secp256r1Curve::public_key_from_private(&sk).unwrap();

        let message = b"Hello, P-256!";
        let signature = Secp256r1Curve::sign(&sk, message).unwrap();

        assert_eq!(signature.len(), 64);
        assert!(Secp256r1Curve::verify(&pk, message, &signature).unwrap());
        assert!(!Secp256r1Curve::verify(&pk, b"Wrong message", &signature).unwrap());
    }

    #[test]
    fn test_secp256r1_uncompressed_verify() {
        let sk = [42u8; 32];
        let pk_uncompressed = Secp256r1Curve::public_key_uncompressed(&sk).unwrap();
        assert_eq!(pk_uncompressed[0], 0x04);

        let signature = Secp256r1Curve::sign(&sk, b"Test message").unwrap();
        assert!(Secp256r1Curve::verify(&pk_uncompressed, b"Test message", &signature).unwrap());
    }

    #[test]
    fn test_secp256r1_rejects_zero_key() {
        assert!(Secp256r1Curve::public_key_from_private(&[0u8; 32]).is_err());
    }

    #[test]
    fn test_secp256r1_derive_child() {
        let parent = [3u8; 32];
        let chain_code = [9u8; 32];

        let (hard, _) = Secp256r1Curve::derive_child(&parent, &chain_code, 0, true).unwrap();
        let (normal, _) = Secp256r1Curve::derive_child(&parent, &chain_code, 0, false).unwrap();
        assert_ne!(hard, normal);
        assert!(Secp256r1Curve::public_key_from_private(&hard).is_ok());
    }
}
