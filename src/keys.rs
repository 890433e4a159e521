//! Key Material
//!
//! Caller-scoped private and public key wrappers. Private scalars live in a
//! `Zeroizing` buffer and are wiped on drop; the engine never stores them.

use crate::crypto::{self, CurveType, PublicKeyFormat, Secp256k1Curve, Secp256r1Curve};
use crate::error::{OmniError, OmniResult};
use zeroize::Zeroizing;

/// A private key scoped to a single derivation or signing call
pub struct PrivateKey {
    bytes: Zeroizing<Vec<u8>>,
    curve: CurveType,
}

impl PrivateKey {
    /// Wrap raw scalar bytes, validating them for the curve.
    pub fn new(bytes: &[u8], curve: CurveType) -> OmniResult<Self> {
        // Deriving the public key exercises the curve's own scalar checks
        // (zero scalar, out-of-range scalar, wrong length).
        crypto::public_key_from_private(curve, bytes)
            .map_err(|e| OmniError::invalid_private_key(e.to_string()))?;

        Ok(Self {
            bytes: Zeroizing::new(bytes.to_vec()),
            curve,
        })
    }

    /// Parse a hex-encoded private key
    pub fn from_hex(s: &str, curve: CurveType) -> OmniResult<Self> {
        let trimmed = s.trim().trim_start_matches("0x");
        let bytes = Zeroizing::new(
            hex::decode(trimmed)
                .map_err(|e| OmniError::invalid_private_key(format!("Invalid hex: {}", e)))?,
        );
        Self::new(&bytes, curve)
    }

    pub fn curve(&self) -> CurveType {
        self.curve
    }

    /// Raw scalar bytes. Callers must not copy these out of the call scope.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Derive the public key in the curve's canonical encoding
    pub fn public_key(&self) -> OmniResult<PublicKey> {
        let bytes = crypto::public_key_from_private(self.curve, &self.bytes)?;
        Ok(PublicKey {
            bytes,
            curve: self.curve,
            format: match self.curve {
                CurveType::Secp256k1 | CurveType::Secp256r1 => PublicKeyFormat::Compressed,
                _ => PublicKeyFormat::Raw,
            },
        })
    }

    /// Derive the uncompressed public key (secp256k1/secp256r1 only)
    pub fn public_key_uncompressed(&self) -> OmniResult<PublicKey> {
        let bytes = match self.curve {
            CurveType::Secp256k1 => Secp256k1Curve::public_key_uncompressed(&self.bytes)?.to_vec(),
            CurveType::Secp256r1 => Secp256r1Curve::public_key_uncompressed(&self.bytes)?.to_vec(),
            other => {
                return Err(OmniError::unsupported_operation(format!(
                    "{} has no uncompressed public key form",
                    other
                )))
            }
        };
        Ok(PublicKey {
            bytes,
            curve: self.curve,
            format: PublicKeyFormat::Uncompressed,
        })
    }

    /// Sign a digest with this key's curve
    pub fn sign(&self, digest: &[u8]) -> OmniResult<Vec<u8>> {
        Ok(crypto::sign(self.curve, &self.bytes, digest)?)
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKey")
            .field("curve", &self.curve)
            .field("bytes", &"<redacted>")
            .finish()
    }
}

/// A derived public key; immutable once created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    bytes: Vec<u8>,
    curve: CurveType,
    format: PublicKeyFormat,
}

impl PublicKey {
    pub fn from_bytes(bytes: &[u8], curve: CurveType) -> OmniResult<Self> {
        let expected = curve.public_key_size();
        let format = if bytes.len() == expected {
            match curve {
                CurveType::Secp256k1 | CurveType::Secp256r1 => PublicKeyFormat::Compressed,
                _ => PublicKeyFormat::Raw,
            }
        } else if bytes.len() == 65
            && matches!(curve, CurveType::Secp256k1 | CurveType::Secp256r1)
        {
            PublicKeyFormat::Uncompressed
        } else {
            return Err(OmniError::malformed_input(format!(
                "Public key for {} must be {} bytes, got {}",
                curve,
                expected,
                bytes.len()
            )));
        };

        Ok(Self {
            bytes: bytes.to_vec(),
            curve,
            format,
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn curve(&self) -> CurveType {
        self.curve
    }

    pub fn format(&self) -> PublicKeyFormat {
        self.format
    }

    /// Uncompressed SEC1 bytes (65) for secp-family keys, used for EVM
    /// address hashing.
    pub fn uncompressed_bytes(&self) -> OmniResult<Vec<u8>> {
        match (self.curve, self.format) {
            (_, PublicKeyFormat::Uncompressed) => Ok(self.bytes.clone()),
            (CurveType::Secp256k1, _) => {
                Ok(Secp256k1Curve::decompress_public_key(&self.bytes)?.to_vec())
            }
            (curve, _) => Err(OmniError::unsupported_operation(format!(
                "{} keys have no uncompressed form",
                curve
            ))),
        }
    }

    /// Verify a signature; false on any malformed input
    pub fn verify(&self, digest: &[u8], signature: &[u8]) -> bool {
        crypto::verify(self.curve, &self.bytes, digest, signature)
    }
}
