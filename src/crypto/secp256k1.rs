//! secp256k1 Curve Implementation
//!
//! Used by: the Bitcoin family, Ethereum and every EVM-compatible chain.
//!
//! Features:
//! - ECDSA signing and verification (RFC 6979 deterministic nonces)
//! - Recoverable signatures (for Ethereum)
//! - Compressed and uncompressed public keys
//! - BIP-32 key derivation

use super::{CurveError, EllipticCurve, KeyDerivation, RecoverableSignature};
use bitcoin::secp256k1::ecdsa::{RecoverableSignature as RecovSig, RecoveryId, Signature};
use bitcoin::secp256k1::{Message, PublicKey, Secp256k1, SecretKey};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha512 = Hmac<sha2::Sha512>;

/// secp256k1 curve implementation
pub struct Secp256k1Curve;

impl Secp256k1Curve {
    fn digest32(message: &[u8]) -> [u8; 32] {
        if message.len() == 32 {
            let mut arr = [0u8; 32];
            arr.copy_from_slice(message);
            arr
        } else {
            let mut hasher = Sha256::new();
            hasher.update(message);
            hasher.finalize().into()
        }
    }

    fn secret_key(private_key: &[u8]) -> Result<SecretKey, CurveError> {
        if private_key.len() != 32 {
            return Err(CurveError::InvalidPrivateKey(format!(
                "Private key must be 32 bytes, got {}",
                private_key.len()
            )));
        }
        SecretKey::from_slice(private_key)
            .map_err(|e| CurveError::InvalidPrivateKey(e.to_string()))
    }
}

impl EllipticCurve for Secp256k1Curve {
    type PrivateKey = [u8; 32];
    type PublicKey = [u8; 33]; // Compressed
    type Signature = [u8; 64]; // r,s

    fn public_key_from_private(private_key: &[u8]) -> Result<Self::PublicKey, CurveError> {
        let secp = Secp256k1::new();
        let sk = Self::secret_key(private_key)?;
        let pk = PublicKey::from_secret_key(&secp, &sk);
        Ok(pk.serialize())
    }

    fn sign(private_key: &[u8], digest: &[u8]) -> Result<Self::Signature, CurveError> {
        let secp = Secp256k1::new();
        let sk = Self::secret_key(private_key)?;

        let msg = Message::from_digest(Self::digest32(digest));
        let sig = secp.sign_ecdsa(&msg, &sk);

        Ok(sig.serialize_compact())
    }

    fn verify(public_key: &[u8], digest: &[u8], signature: &[u8]) -> Result<bool, CurveError> {
        if signature.len() != 64 {
            return Err(CurveError::InvalidSignature(format!(
                "Signature must be 64 bytes, got {}",
                signature.len()
            )));
        }

        let secp = Secp256k1::new();

        let pk = PublicKey::from_slice(public_key)
            .map_err(|e| CurveError::InvalidPublicKey(e.to_string()))?;
        let sig = Signature::from_compact(signature)
            .map_err(|e| CurveError::InvalidSignature(e.to_string()))?;

        let msg = Message::from_digest(Self::digest32(digest));

        Ok(secp.verify_ecdsa(&msg, &sig, &pk).is_ok())
    }
}

impl RecoverableSignature for Secp256k1Curve {
    fn sign_recoverable(private_key: &[u8], digest: &[u8]) -> Result<(Self::Signature, u8), CurveError> {
        let secp = Secp256k1::new();
        let sk = Self::secret_key(private_key)?;

        let msg = Message::from_digest(Self::digest32(digest));
        let sig = secp.sign_ecdsa_recoverable(&msg, &sk);

        let (recovery_id, serialized) = sig.serialize_compact();

        Ok((serialized, recovery_id.to_i32() as u8))
    }

    fn recover_public_key(digest: &[u8], signature: &[u8], recovery_id: u8) -> Result<Self::PublicKey, CurveError> {
        if signature.len() != 64 {
            return Err(CurveError::InvalidSignature(format!(
                "Signature must be 64 bytes, got {}",
                signature.len()
            )));
        }

        let secp = Secp256k1::new();

        let rec_id = RecoveryId::from_i32(recovery_id as i32)
            .map_err(|e| CurveError::InvalidSignature(format!("Invalid recovery ID: {}", e)))?;
        let sig = RecovSig::from_compact(signature, rec_id)
            .map_err(|e| CurveError::InvalidSignature(e.to_string()))?;

        let msg = Message::from_digest(Self::digest32(digest));

        let pk = secp
            .recover_ecdsa(&msg, &sig)
            .map_err(|e| CurveError::VerificationFailed(format!("Recovery failed: {}", e)))?;

        Ok(pk.serialize())
    }
}

impl KeyDerivation for Secp256k1Curve {
    const MASTER_KEY: &'static [u8] = b"Bitcoin seed";

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

        let secp = Secp256k1::new();
        let parent_sk = Self::secret_key(parent_private)?;

        let mut mac = HmacSha512::new_from_slice(parent_chain_code)
            .map_err(|e| CurveError::DerivationFailed(e.to_string()))?;

        let actual_index = if hardened { index | 0x80000000 } else { index };

        if hardened {
            // Hardened: 0x00 || private_key || index
            mac.update(&[0x00]);
            mac.update(parent_private);
        } else {
            // Normal: public_key || index
            let parent_pk = PublicKey::from_secret_key(&secp, &parent_sk);
            mac.update(&parent_pk.serialize());
        }
        mac.update(&actual_index.to_be_bytes());

        let result = mac.finalize().into_bytes();
        let (il, ir) = result.split_at(32);

        // child_key = parse256(IL) + parent_key (mod n)
        let tweak = SecretKey::from_slice(il)
            .map_err(|e| CurveError::DerivationFailed(format!("Invalid tweak: {}", e)))?;
        let child_sk = parent_sk
            .add_tweak(&tweak.into())
            .map_err(|e| CurveError::DerivationFailed(format!("Tweak failed: {}", e)))?;

        let mut child_chain_code = [0u8; 32];
        child_chain_code.copy_from_slice(ir);

        Ok((child_sk.secret_bytes(), child_chain_code))
    }
}

// MARK: - Helper Functions

impl Secp256k1Curve {
    /// Get uncompressed public key (65 bytes)
    pub fn public_key_uncompressed(private_key: &[u8]) -> Result<[u8; 65], CurveError> {
        let secp = Secp256k1::new();
        let sk = Self::secret_key(private_key)?;
        let pk = PublicKey::from_secret_key(&secp, &sk);
        Ok(pk.serialize_uncompressed())
    }

    /// Decompress a 33-byte public key to 65 bytes
    pub fn decompress_public_key(public_key: &[u8]) -> Result<[u8; 65], CurveError> {
        let pk = PublicKey::from_slice(public_key)
            .map_err(|e| CurveError::InvalidPublicKey(e.to_string()))?;
        Ok(pk.serialize_uncompressed())
    }

    /// Sign for Ethereum (returns 65-byte signature with v)
    pub fn sign_ethereum(private_key: &[u8], digest: &[u8; 32]) -> Result<[u8; 65], CurveError> {
        let (sig, rec_id) = Self::sign_recoverable(private_key, digest)?;

        let mut result = [0u8; 65];
        result[..64].copy_from_slice(&sig);
        result[64] = rec_id + 27; // Ethereum v = recovery_id + 27

        Ok(result)
    }

    /// Encode signature in DER format
    pub fn signature_to_der(signature: &[u8; 64]) -> Result<Vec<u8>, CurveError> {
        let sig = Signature::from_compact(signature)
            .map_err(|e| CurveError::InvalidSignature(e.to_string()))?;
        Ok(sig.serialize_der().to_vec())
    }

    /// Decode signature from DER format
    pub fn signature_from_der(der: &[u8]) -> Result<[u8; 64], CurveError> {
        let sig = Signature::from_der(der)
            .map_err(|e| CurveError::InvalidSignature(e.to_string()))?;
        Ok(sig.serialize_compact())
    }
}

// MARK: - Tests
