//! AnySigner
//!
//! Uniform signing and planning over every registered coin. The engine
//! routes opaque input bytes to the coin's entry point and never interprets
//! them itself.

use super::entry_error;
use crate::error::{OmniError, OmniResult};
use crate::log_debug;
use crate::registry::{self, CoinType};

pub struct AnySigner;

impl AnySigner {
    /// Sign a serialized chain-specific input.
    ///
    /// Fails with `UnknownCoin` for unregistered coins, `MalformedInput`
    /// for undecodable requests, or the entry point's own error tagged with
    /// the coin.
    pub fn sign(coin: CoinType, input: &[u8]) -> OmniResult<Vec<u8>> {
        let entry = registry::lookup(coin)?;
        log_debug!("signer", "dispatching sign", coin = coin.name());
        entry.entry.sign(coin, input).map_err(|e| entry_error(coin, e))
    }

    /// Run a coin's pre-signing planning step (e.g. UTXO selection).
    ///
    /// `PlanningUnsupported` is a normal outcome for coins without a
    /// planning phase, not a system error.
    pub fn plan(coin: CoinType, input: &[u8]) -> OmniResult<Vec<u8>> {
        let entry = registry::lookup(coin)?;
        log_debug!("signer", "dispatching plan", coin = coin.name());
        entry.entry.plan(coin, input).map_err(|e| entry_error(coin, e))
    }

    /// Whether the coin exposes a JSON signing surface
    pub fn supports_json(coin: CoinType) -> bool {
        registry::lookup(coin).map(|e| e.supports_json).unwrap_or(false)
    }

    /// Sign a JSON-encoded request for coins that support it.
    ///
    /// Rejected with `UnsupportedOperation` up front when `supports_json`
    /// is false, preventing silent misuse.
    pub fn sign_json(coin: CoinType, json: &str, private_key: &[u8]) -> OmniResult<String> {
        let entry = registry::lookup(coin)?;
        if !entry.supports_json {
            return Err(OmniError::unsupported_operation(format!(
                "{} has no JSON signing surface",
                coin.name()
            ))
            .with_coin(coin));
        }
        entry
            .entry
            .sign_json(coin, json, private_key)
            .map_err(|e| entry_error(coin, e))
    }

    /// Sign by raw numeric coin identifier — the FFI-facing path. An
    /// unknown identifier fails before any key material is touched.
    pub fn sign_raw(coin_id: u32, input: &[u8]) -> OmniResult<Vec<u8>> {
        let entry = registry::lookup_id(coin_id)?;
        Self::sign(entry.coin, input)
    }

    /// Plan by raw numeric coin identifier
    pub fn plan_raw(coin_id: u32, input: &[u8]) -> OmniResult<Vec<u8>> {
        let entry = registry::lookup_id(coin_id)?;
        Self::plan(entry.coin, input)
    }
}
