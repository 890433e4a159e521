//! Ed25519 with Blake2b-512 Digest
//!
//! The EdDSA scheme from RFC 8032 with SHA-512 replaced by Blake2b-512
//! throughout, as used by Nano-style chains. Key clamping, nonce generation
//! and the verification equation are otherwise standard.

use super::{CurveError, EllipticCurve};
use blake2::{Blake2b512, Digest};
use curve25519_dalek::edwards::{CompressedEdwardsY, EdwardsPoint};
use curve25519_dalek::scalar::Scalar;

/// Ed25519-Blake2b curve implementation
pub struct Ed25519Blake2bCurve;

impl Ed25519Blake2bCurve {
    /// Expand the secret: h = Blake2b-512(sk), clamp h[0..32], keep h[32..64] as prefix
    fn expand(private_key: &[u8; 32]) -> (Scalar, [u8; 32]) {
        let mut hasher = Blake2b512::new();
        hasher.update(private_key);
        let h: [u8; 64] = hasher.finalize().into();

        let mut scalar_bytes = [0u8; 32];
        scalar_bytes.copy_from_slice(&h[..32]);
        scalar_bytes[0] &= 248;
        scalar_bytes[31] &= 127;
        scalar_bytes[31] |= 64;

        let mut prefix = [0u8; 32];
        prefix.copy_from_slice(&h[32..]);

        (Scalar::from_bytes_mod_order(scalar_bytes), prefix)
    }

    fn wide_scalar(parts: &[&[u8]]) -> Scalar {
        let mut hasher = Blake2b512::new();
        for part in parts {
            hasher.update(part);
        }
        let wide: [u8; 64] = hasher.finalize().into();
        Scalar::from_bytes_mod_order_wide(&wide)
    }

    fn key_array(private_key: &[u8]) -> Result<[u8; 32], CurveError> {
        if private_key.len() != 32 {
            return Err(CurveError::InvalidPrivateKey(format!(
                "Private key must be 32 bytes, got {}",
                private_key.len()
            )));
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(private_key);
        Ok(arr)
    }
}

impl EllipticCurve for Ed25519Blake2bCurve {
    type PrivateKey = [u8; 32];
    type PublicKey = [u8; 32];
    type Signature = [u8; 64];

    fn public_key_from_private(private_key: &[u8]) -> Result<Self::PublicKey, CurveError> {
        let sk = Self::key_array(private_key)?;
        let (a, _) = Self::expand(&sk);
        Ok(EdwardsPoint::mul_base(&a).compress().to_bytes())
    }

    fn sign(private_key: &[u8], digest: &[u8]) -> Result<Self::Signature, CurveError> {
        let sk = Self::key_array(private_key)?;
        let (a, prefix) = Self::expand(&sk);
        let public = EdwardsPoint::mul_base(&a).compress();

        // r = H(prefix || M), R = rB, k = H(R || A || M), s = r + k*a
        let r = Self::wide_scalar(&[&prefix, digest]);
        let big_r = EdwardsPoint::mul_base(&r).compress();
        let k = Self::wide_scalar(&[big_r.as_bytes(), public.as_bytes(), digest]);
        let s = r + k * a;

        let mut signature = [0u8; 64];
        signature[..32].copy_from_slice(big_r.as_bytes());
        signature[32..].copy_from_slice(&s.to_bytes());
        Ok(signature)
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
        let a = match CompressedEdwardsY(pk_bytes).decompress() {
            Some(point) => point,
            None => return Ok(false),
        };

        let mut r_bytes = [0u8; 32];
        r_bytes.copy_from_slice(&signature[..32]);
        let expected_r = CompressedEdwardsY(r_bytes);

        let mut s_bytes = [0u8; 32];
        s_bytes.copy_from_slice(&signature[32..]);
        let s: Option<Scalar> = Scalar::from_canonical_bytes(s_bytes).into();
        let s = match s {
            Some(scalar) => scalar,
            None => return Ok(false),
        };

        let k = Self::wide_scalar(&[&r_bytes, &pk_bytes, digest]);

        // sB - kA == R
        let recovered = EdwardsPoint::vartime_double_scalar_mul_basepoint(&k, &-a, &s);
        Ok(recovered.compress() == expected_r)
    }
}

// MARK: - Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blake2b_sign_verify() {
        let sk = [42u8; 32];
        let pk = Ed25519Blake2bCurve::public_key_from_private(&sk).unwrap();

        let message = b"Hello, Blake2b EdDSA!";
        let signature = Ed25519Blake2bCurve::sign(&sk, message).unwrap();

        assert!(Ed25519Blake2bCurve::verify(&pk, message, &signature).unwrap());
        assert!(!Ed25519Blake2bCurve::verify(&pk, b"other message", &signature).unwrap());
    }

    #[test]
    fn test_blake2b_differs_from_sha512_variant() {
        use super::super::Ed25519Curve;

        let sk = [42u8; 32];
        let pk_blake = Ed25519Blake2bCurve::public_key_from_private(&sk).unwrap();
        let pk_sha = Ed25519Curve::public_key_from_private(&sk).unwrap();

        // Different digest in key expansion produces a different key pair
        assert_ne!(pk_blake, pk_sha);
    }

    #[test]
    fn test_blake2b_deterministic() {
        let sk = [7u8; 32];
        let sig1 = Ed25519Blake2bCurve::sign(&sk, b"msg").unwrap();
        let sig2 = Ed25519Blake2bCurve::sign(&sk, b"msg").unwrap();
        assert_eq!(sig1, sig2);
    }

    #[test]
    fn test_blake2b_rejects_mutated_signature() {
        let sk = [7u8; 32];
        let pk = Ed25519Blake2bCurve::public_key_from_private(&sk).unwrap();
        let mut sig = Ed25519Blake2bCurve::sign(&sk, b"msg").unwrap();
        sig[0] ^= 0x01;
        assert!(!Ed25519Blake2bCurve::verify(&pk, b"msg", &sig).unwrap());
    }
}
