//! Omnisign Core
//!
//! A unified multi-blockchain signing and address engine. Given a coin
//! identifier, key material and a chain-specific serialized transaction
//! description, it produces a serialized signing output, or derives and
//! validates addresses — with no chain-specific logic on the caller's side.
//!
//! # Architecture
//!
//! - **crypto**: elliptic-curve primitives (secp256k1, ed25519,
//!   ed25519-blake2b, sr25519, secp256r1, starkex)
//! - **address**: per-format address codecs (base58check, segwit, EIP-55,
//!   SS58)
//! - **hd**: BIP-39 mnemonics and hierarchical key derivation
//! - **registry**: the immutable coin table mapping each coin to its curve,
//!   address format, derivation path and transaction entry point
//! - **entries**: per-chain-family signing/planning implementations behind
//!   the `CoinEntry` trait
//! - **engine**: the `AnySigner`/`AnyAddress` dispatch layer
//! - **ffi**: C-ABI exports for platform bindings
//!
//! # Security
//!
//! Private keys, seeds and entropy are wrapped in `zeroize` buffers and
//! cleared on drop; the engine never retains key material past a call, and
//! the logging layer redacts sensitive fields by name.
//!
//! # Example
//!
//! ```rust,ignore
//! use omnisign::{engine::AnySigner, registry::CoinType};
//!
//! let output = AnySigner::sign(CoinType::Ethereum, &input_bytes)?;
//! ```

pub mod address;
pub mod crypto;
pub mod engine;
pub mod entries;
pub mod error;
pub mod ffi;
pub mod hd;
pub mod keys;
pub mod registry;
pub mod utils;

// Re-export key types for convenience
pub use engine::{validate_address, AnyAddress, AnySigner};
pub use error::{ErrorCode, OmniError, OmniResult};
pub use hd::{is_valid_mnemonic, HdWallet};
pub use keys::{PrivateKey, PublicKey};
pub use registry::{lookup, registered_coins, AddressFormat, CoinType, RegistryEntry};

// Re-export crypto utilities used by downstream tooling
pub use crypto::CurveType;
pub use utils::hash::{keccak256, to_checksum_address};
