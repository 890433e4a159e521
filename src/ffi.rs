//! C-ABI Exports
//!
//! Foreign-callable surface over the dispatch engine. All functions follow
//! one pattern:
//! - inputs are null-terminated C strings (hex for byte payloads)
//! - outputs are JSON strings allocated by the engine and owned by the
//!   caller, who must release them with `omni_free_string`
//! - errors come back as `{"error": {...}}` JSON, never as null (null is
//!   reserved for invalid pointers)

use crate::engine::{validate_address, AnyAddress, AnySigner};
use crate::error::{OmniError, OmniResult};
use crate::hd::HdWallet;
use crate::keys::PrivateKey;
use crate::registry::{self, CoinType};
use libc::c_char;
use serde::Serialize;
use std::ffi::{CStr, CString};

/// Convert a string to a C pointer, falling back to a static error payload
/// if it contains interior nulls
fn safe_cstring(s: &str) -> *mut c_char {
    CString::new(s).map(|cs| cs.into_raw()).unwrap_or_else(|_| {
        CString::new(r#"{"error":{"code":"internal","message":"string conversion failed"}}"#)
            .expect("static string is valid")
            .into_raw()
    })
}

fn error_json(error: &OmniError) -> *mut c_char {
    #[derive(Serialize)]
    struct Envelope<'a> {
        error: &'a OmniError,
    }
    let json = serde_json::to_string(&Envelope { error })
        .unwrap_or_else(|_| r#"{"error":{"code":"internal","message":"serialization failed"}}"#.into());
    safe_cstring(&json)
}

fn result_json<T: Serialize>(result: OmniResult<T>) -> *mut c_char {
    match result {
        Ok(value) => match serde_json::to_string(&value) {
            Ok(json) => safe_cstring(&json),
            Err(e) => error_json(&OmniError::internal(e.to_string())),
        },
        Err(e) => error_json(&e),
    }
}

/// Read a C string argument; None for null or non-UTF-8 pointers
unsafe fn read_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok()
}

fn coin_from_id(coin_id: u32) -> OmniResult<CoinType> {
    registry::lookup_id(coin_id).map(|entry| entry.coin)
}

/// Free a string returned by any other export
#[unsafe(no_mangle)]
pub extern "C" fn omni_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        unsafe {
            drop(CString::from_raw(ptr));
        }
    }
}

/// Sign a hex-encoded serialized input for the coin. Returns
/// `{"output": "<hex>"}`.
#[unsafe(no_mangle)]
pub extern "C" fn omni_sign(coin_id: u32, input_hex: *const c_char) -> *mut c_char {
    let input = match unsafe { read_str(input_hex) } {
        Some(s) => s,
        None => return std::ptr::null_mut(),
    };

    #[derive(Serialize)]
    struct Output {
        output: String,
    }

    let result = hex::decode(input.trim())
        .map_err(|e| OmniError::malformed_input(format!("Invalid input hex: {}", e)))
        .and_then(|bytes| AnySigner::sign_raw(coin_id, &bytes))
        .map(|out| Output { output: hex::encode(out) });

    result_json(result)
}

/// Run the coin's planning phase. Returns `{"output": "<hex>"}`.
#[unsafe(no_mangle)]
pub extern "C" fn omni_plan(coin_id: u32, input_hex: *const c_char) -> *mut c_char {
    let input = match unsafe { read_str(input_hex) } {
        Some(s) => s,
        None => return std::ptr::null_mut(),
    };

    #[derive(Serialize)]
    struct Output {
        output: String,
    }

    let result = hex::decode(input.trim())
        .map_err(|e| OmniError::malformed_input(format!("Invalid input hex: {}", e)))
        .and_then(|bytes| AnySigner::plan_raw(coin_id, &bytes))
        .map(|out| Output { output: hex::encode(out) });

    result_json(result)
}

/// Whether the coin exposes a JSON signing surface
#[unsafe(no_mangle)]
pub extern "C" fn omni_supports_json(coin_id: u32) -> bool {
    CoinType::from_id(coin_id)
        .map(AnySigner::supports_json)
        .unwrap_or(false)
}

/// Sign a JSON request with a hex private key. Returns the entry's JSON
/// output.
#[unsafe(no_mangle)]
pub extern "C" fn omni_sign_json(
    coin_id: u32,
    json: *const c_char,
    private_key_hex: *const c_char,
) -> *mut c_char {
    let (json, key_hex) = match (unsafe { read_str(json) }, unsafe { read_str(private_key_hex) }) {
        (Some(j), Some(k)) => (j, k),
        _ => return std::ptr::null_mut(),
    };

    let result = coin_from_id(coin_id)
        .and_then(|coin| {
            let key = hex::decode(key_hex.trim())
                .map_err(|e| OmniError::invalid_private_key(format!("Invalid hex: {}", e)))?;
            AnySigner::sign_json(coin, json, &key)
        });

    match result {
        Ok(json) => safe_cstring(&json),
        Err(e) => error_json(&e),
    }
}

/// Derive the canonical address for a hex private key. Returns
/// `{"address": "..."}`.
#[unsafe(no_mangle)]
pub extern "C" fn omni_derive_address(coin_id: u32, private_key_hex: *const c_char) -> *mut c_char {
    let key_hex = match unsafe { read_str(private_key_hex) } {
        Some(s) => s,
        None => return std::ptr::null_mut(),
    };

    #[derive(Serialize)]
    struct Output {
        address: String,
    }

    let result = coin_from_id(coin_id).and_then(|coin| {
        let entry = registry::lookup(coin)?;
        let key = PrivateKey::from_hex(key_hex, entry.curve)?;
        let address = AnyAddress::with_public_key(&key.public_key()?, coin)?;
        Ok(Output {
            address: address.to_string(),
        })
    });

    result_json(result)
}

/// Validate a textual address for the coin
#[unsafe(no_mangle)]
pub extern "C" fn omni_validate_address(coin_id: u32, address: *const c_char) -> bool {
    let address = match unsafe { read_str(address) } {
        Some(s) => s,
        None => return false,
    };

    CoinType::from_id(coin_id)
        .map(|coin| validate_address(address, coin))
        .unwrap_or(false)
}

/// Generate a fresh 12-word wallet and derive addresses for every
/// registered coin. Returns `{"mnemonic": "...", "addresses": {...}}`.
#[unsafe(no_mangle)]
pub extern "C" fn omni_generate_wallet() -> *mut c_char {
    #[derive(Serialize)]
    struct Output {
        mnemonic: String,
        addresses: std::collections::BTreeMap<String, String>,
    }

    let result = HdWallet::generate().and_then(|wallet| {
        let mut addresses = std::collections::BTreeMap::new();
        for coin in registry::registered_coins() {
            addresses.insert(coin.name().to_string(), wallet.derive_address(coin)?);
        }
        Ok(Output {
            mnemonic: wallet.mnemonic().to_string(),
            addresses,
        })
    });

    result_json(result)
}
