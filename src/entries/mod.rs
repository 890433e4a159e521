//! Transaction Entry Points
//!
//! One signing/planning implementation per chain family, each consumed by
//! the dispatch engine through the `CoinEntry` trait. Signing inputs and
//! outputs cross the boundary as bincode-serialized serde structs; the
//! engine routes the bytes without interpreting them.

pub mod bitcoin;
pub mod ethereum;
pub mod polkadot;
pub mod solana;

use crate::keys::PublicKey;
use crate::registry::CoinType;

/// Errors produced inside a chain entry point. The engine tags them with the
/// originating coin before surfacing them.
#[derive(Debug, thiserror::Error)]
pub enum EntryError {
    #[error("Malformed signing input: {0}")]
    MalformedInput(String),

    #[error("Invalid key material: {0}")]
    InvalidKey(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("Insufficient funds: need {needed} units, have {available}")]
    InsufficientFunds { needed: u64, available: u64 },

    #[error("Planning is not supported")]
    PlanningUnsupported,

    #[error("JSON signing is not supported")]
    JsonUnsupported,
}

pub type EntryResult<T> = Result<T, EntryError>;

/// The polymorphic contract every chain plugs into.
///
/// Implementations are stateless statics referenced from the registry; all
/// methods take the concrete `CoinType` so one implementation can serve a
/// whole chain family (all EVM chains, the Bitcoin forks, ...).
pub trait CoinEntry: Sync {
    /// Derive the canonical textual address for a public key
    fn derive_address(&self, coin: CoinType, public_key: &PublicKey) -> EntryResult<String>;

    /// Validate a textual address. A query: returns false, never errors.
    fn validate_address(&self, coin: CoinType, address: &str) -> bool;

    /// Sign a serialized chain-specific input, returning the serialized output
    fn sign(&self, coin: CoinType, input: &[u8]) -> EntryResult<Vec<u8>>;

    /// Pre-signing planning step (e.g. UTXO selection). Chains without a
    /// planning phase keep the default.
    fn plan(&self, _coin: CoinType, _input: &[u8]) -> EntryResult<Vec<u8>> {
        Err(EntryError::PlanningUnsupported)
    }

    /// JSON signing surface for coins that expose one
    fn sign_json(&self, _coin: CoinType, _json: &str, _private_key: &[u8]) -> EntryResult<String> {
        Err(EntryError::JsonUnsupported)
    }
}

/// Decode a bincode signing input, mapping failures to `MalformedInput`
pub(crate) fn decode_input<'a, T: serde::Deserialize<'a>>(bytes: &'a [u8]) -> EntryResult<T> {
    bincode::deserialize(bytes).map_err(|e| EntryError::MalformedInput(e.to_string()))
}

/// Encode a signing output; serialization of engine-built values cannot fail
/// for these types, so errors surface as `Signing`.
pub(crate) fn encode_output<T: serde::Serialize>(value: &T) -> EntryResult<Vec<u8>> {
    bincode::serialize(value).map_err(|e| EntryError::Signing(e.to_string()))
}
