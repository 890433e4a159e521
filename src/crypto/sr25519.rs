//! Sr25519 Curve Implementation (Schnorr on Ristretto255)
//!
//! Used by: Polkadot, Kusama, and other Substrate-based chains.
//!
//! Features:
//! - Schnorr signatures under the `substrate` signing context
//! - Hard and soft hierarchical derivation (Substrate style)

use super::{CurveError, EllipticCurve};
use schnorrkel::{
    derive::{ChainCode, Derivation},
    signing_context, Keypair, MiniSecretKey, PublicKey, SecretKey, Signature,
};

/// Substrate signing context
const SUBSTRATE_SIGNING_CONTEXT: &[u8] = b"substrate";

/// Sr25519 curve implementation
pub struct Sr25519Curve;

impl EllipticCurve for Sr25519Curve {
    type PrivateKey = [u8; 64]; // expanded SecretKey
    type PublicKey = [u8; 32];
    type Signature = [u8; 64];

    fn public_key_from_private(private_key: &[u8]) -> Result<Self::PublicKey, CurveError> {
        Ok(Self::keypair_from_bytes(private_key)?.public.to_bytes())
    }

    fn sign(private_key: &[u8], digest: &[u8]) -> Result<Self::Signature, CurveError> {
        let keypair = Self::keypair_from_bytes(private_key)?;

        let context = signing_context(SUBSTRATE_SIGNING_CONTEXT);
        let signature = keypair.sign(context.bytes(digest));

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
        let pk = PublicKey::from_bytes(&pk_bytes)
            .map_err(|e| CurveError::InvalidPublicKey(format!("{:?}", e)))?;

        let mut sig_bytes = [0u8; 64];
        sig_bytes.copy_from_slice(signature);
        let sig = Signature::from_bytes(&sig_bytes)
            .map_err(|e| CurveError::InvalidSignature(format!("{:?}", e)))?;

        let context = signing_context(SUBSTRATE_SIGNING_CONTEXT);

        Ok(pk.verify(context.bytes(digest), &sig).is_ok())
    }
}

impl Sr25519Curve {
    /// Create keypair from bytes (handles both 32-byte mini secrets and
    /// 64-byte expanded secrets)
    fn keypair_from_bytes(private_key: &[u8]) -> Result<Keypair, CurveError> {
        if private_key.len() == 32 {
            let mut mini_bytes = [0u8; 32];
            mini_bytes.copy_from_slice(private_key);

            let mini_secret = MiniSecretKey::from_bytes(&mini_bytes)
                .map_err(|e| CurveError::InvalidPrivateKey(format!("Invalid mini secret: {:?}", e)))?;

            Ok(mini_secret.expand_to_keypair(schnorrkel::ExpansionMode::Ed25519))
        } else if private_key.len() == 64 {
            let secret = SecretKey::from_bytes(private_key)
                .map_err(|e| CurveError::InvalidPrivateKey(format!("Invalid secret key: {:?}", e)))?;

            Ok(secret.to_keypair())
        } else {
            Err(CurveError::InvalidPrivateKey(format!(
                "Private key must be 32 or 64 bytes, got {}",
                private_key.len()
            )))
        }
    }

    /// Hard derivation (changes both public and secret key unpredictably)
    pub fn derive_hard(
        secret_key: &[u8],
        chain_code: &[u8; 32],
        junction: &[u8],
    ) -> Result<([u8; 64], [u8; 32]), CurveError> {
        let keypair = Self::keypair_from_bytes(secret_key)?;

        let cc = ChainCode(*chain_code);
        let (derived_mini, new_cc) = keypair.hard_derive_mini_secret_key(Some(cc), junction);
        let derived = derived_mini.expand_to_keypair(schnorrkel::ExpansionMode::Ed25519);

        Ok((derived.secret.to_bytes(), new_cc.0))
    }

    /// Soft derivation (public key derivable from parent public key)
    pub fn derive_soft(
        secret_key: &[u8],
        chain_code: &[u8; 32],
        junction: &[u8],
    ) -> Result<([u8; 64], [u8; 32]), CurveError> {
        let keypair = Self::keypair_from_bytes(secret_key)?;

        let cc = ChainCode(*chain_code);
        let (derived, new_cc) = keypair.derived_key_simple(cc, junction);

        Ok((derived.secret.to_bytes(), new_cc.0))
    }
}

// MARK: - Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sr25519_sign_verify() {
        let sk = [42u8; 32];
        let pk = Sr25519Curve::public_key_from_private(&sk).unwrap();

        let message = b"Hello, Sr25519!";
        let signature = Sr25519Curve::sign(&sk, message).unwrap();

        assert_eq!(signature.len(), 64);
        assert!(Sr25519Curve::verify(&pk, message, &signature).unwrap());
        assert!(!Sr25519Curve::verify(&pk, b"Wrong message", &signature).unwrap());
    }

    #[test]
    fn test_sr25519_expanded_key_roundtrip() {
        let mini = [42u8; 32];
        let pk_mini = Sr25519Curve::public_key_from_private(&mini).unwrap();

        let keypair = Sr25519Curve::keypair_from_bytes(&mini).unwrap();
        let expanded = keypair.secret.to_bytes();
        let pk_expanded = Sr25519Curve::public_key_from_private(&expanded).unwrap();

        assert_eq!(pk_mini, pk_expanded);
    }

    #[test]
    fn test_sr25519_hard_derivation_diverges() {
        let sk = [1u8; 32];
        let cc = [0u8; 32];

        let (child_a, cc_a) = Sr25519Curve::derive_hard(&sk, &cc, &0u32.to_le_bytes()).unwrap();
        let (child_b, _) = Sr25519Curve::derive_hard(&sk, &cc, &1u32.to_le_bytes()).unwrap();
        assert_ne!(child_a[..32], child_b[..32]);

        // Deterministic
        let (child_a2, cc_a2) = Sr25519Curve::derive_hard(&sk, &cc, &0u32.to_le_bytes()).unwrap();
        assert_eq!(child_a, child_a2);
        assert_eq!(cc_a, cc_a2);
    }

    #[test]
    fn test_sr25519_soft_vs_hard() {
        let sk = [1u8; 32];
        let cc = [0u8; 32];

        let (hard, _) = Sr25519Curve::derive_hard(&sk, &cc, &0u32.to_le_bytes()).unwrap();
        let (soft, _) = Sr25519Curve::derive_soft(&sk, &cc, &0u32.to_le_bytes()).unwrap();
        let pk_hard = Sr25519Curve::public_key_from_private(&hard).unwrap();
        let pk_soft = Sr25519Curve::public_key_from_private(&soft).unwrap();
        assert_ne!(pk_hard, pk_soft);
    }
}
