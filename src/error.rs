//! Unified error types for Omnisign Core
//!
//! All errors flow through this module for consistent handling
//! and FFI-safe error reporting.

use crate::registry::CoinType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Main error type for all engine operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OmniError {
    pub code: ErrorCode,
    pub message: String,
    /// The coin whose entry point produced the failure, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coin: Option<CoinType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl OmniError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            coin: None,
            details: None,
        }
    }

    pub fn with_coin(mut self, coin: CoinType) -> Self {
        self.coin = Some(coin);
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    // Convenience constructors

    pub fn unknown_coin(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::UnknownCoin, msg)
    }

    pub fn malformed_input(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::MalformedInput, msg)
    }

    pub fn invalid_private_key(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidPrivateKey, msg)
    }

    pub fn invalid_path(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidPath, msg)
    }

    pub fn invalid_mnemonic(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidMnemonic, msg)
    }

    pub fn malformed_address(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::MalformedAddress, msg)
    }

    pub fn planning_unsupported(coin: CoinType) -> Self {
        Self::new(
            ErrorCode::PlanningUnsupported,
            format!("{} has no planning phase", coin.name()),
        )
        .with_coin(coin)
    }

    pub fn unsupported_operation(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::UnsupportedOperation, msg)
    }

    pub fn unsupported_derivation(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::UnsupportedDerivation, msg)
    }

    pub fn signing_failed(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::SigningFailed, msg)
    }

    pub fn insufficient_funds(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InsufficientFunds, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, msg)
    }
}

impl fmt::Display for OmniError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)?;
        if let Some(coin) = self.coin {
            write!(f, " (coin: {})", coin.name())?;
        }
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for OmniError {}

/// Error codes for categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    // Routing errors
    UnknownCoin,
    MalformedInput,

    // Key and derivation errors
    InvalidPrivateKey,
    InvalidPath,
    InvalidMnemonic,
    UnsupportedDerivation,

    // Address errors
    MalformedAddress,

    // Dispatch outcomes
    PlanningUnsupported,
    UnsupportedOperation,

    // Crypto errors
    SigningFailed,

    // Chain entry errors
    InsufficientFunds,

    // Internal
    Internal,
}

/// Result type alias for engine operations
pub type OmniResult<T> = Result<T, OmniError>;

// Conversions from common error types

impl From<serde_json::Error> for OmniError {
    fn from(e: serde_json::Error) -> Self {
        OmniError::new(ErrorCode::MalformedInput, e.to_string())
    }
}

impl From<hex::FromHexError> for OmniError {
    fn from(e: hex::FromHexError) -> Self {
        OmniError::new(ErrorCode::MalformedInput, e.to_string())
    }
}

impl From<bip39::Error> for OmniError {
    fn from(e: bip39::Error) -> Self {
        OmniError::new(ErrorCode::InvalidMnemonic, format!("BIP39 error: {}", e))
    }
}

impl From<crate::crypto::CurveError> for OmniError {
    fn from(e: crate::crypto::CurveError) -> Self {
        use crate::crypto::CurveError;
        match e {
            CurveError::InvalidPrivateKey(s) | CurveError::InvalidSeed(s) => {
                OmniError::new(ErrorCode::InvalidPrivateKey, s)
            }
            CurveError::UnsupportedDerivation(s) => {
                OmniError::new(ErrorCode::UnsupportedDerivation, s)
            }
            CurveError::DerivationFailed(s) => OmniError::new(ErrorCode::InvalidPath, s),
            other => OmniError::new(ErrorCode::SigningFailed, other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let err = OmniError::insufficient_funds("Need 100000 sats, have 52000 sats")
            .with_coin(CoinType::Bitcoin);

        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("insufficient_funds"));
        assert!(json.contains("52000"));
    }

    #[test]
    fn test_coin_tagging() {
        let err = OmniError::signing_failed("entry rejected input").with_coin(CoinType::Solana);
        assert_eq!(err.coin, Some(CoinType::Solana));
        assert!(err.to_string().contains("Solana"));
    }
}
