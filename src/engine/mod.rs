//! AnySigner / AnyAddress Dispatch Engine
//!
//! The stateless orchestrator over the coin registry: resolves a coin to its
//! registry entry, validates inputs, and delegates to the chain's entry
//! point. Each call is independent; nothing is retained between calls beyond
//! the immutable registry.

mod address;
mod signer;

pub use address::{validate_address, AnyAddress};
pub use signer::AnySigner;

use crate::entries::EntryError;
use crate::error::{ErrorCode, OmniError};
use crate::registry::CoinType;

/// Translate an entry-point failure into the engine taxonomy, tagged with
/// the originating coin so callers can tell bad input from chain failures.
pub(crate) fn entry_error(coin: CoinType, error: EntryError) -> OmniError {
    let code = match &error {
        EntryError::MalformedInput(_) => ErrorCode::MalformedInput,
        EntryError::InvalidKey(_) => ErrorCode::InvalidPrivateKey,
        EntryError::InvalidAddress(_) => ErrorCode::MalformedAddress,
        EntryError::Signing(_) => ErrorCode::SigningFailed,
        EntryError::InsufficientFunds { .. } => ErrorCode::InsufficientFunds,
        EntryError::PlanningUnsupported => ErrorCode::PlanningUnsupported,
        EntryError::JsonUnsupported => ErrorCode::UnsupportedOperation,
    };
    OmniError::new(code, error.to_string()).with_coin(coin)
}
