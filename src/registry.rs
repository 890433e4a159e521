//! Coin Registry
//!
//! The immutable table mapping every supported coin to its curve, address
//! format, derivation path template and transaction entry point. Built once
//! on first access and only ever read afterwards, so concurrent dispatch
//! calls need no locking.

use crate::crypto::CurveType;
use crate::entries::{self, CoinEntry};
use crate::error::{OmniError, OmniResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Supported blockchain networks.
///
/// Numeric identifiers are stable across releases and never reused; new
/// coins get new values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CoinType {
    Bitcoin,
    BitcoinTestnet,
    Litecoin,
    Dogecoin,
    Ethereum,
    SmartChain,
    Polygon,
    Arbitrum,
    Optimism,
    Base,
    Avalanche,
    Solana,
    Polkadot,
    Kusama,
}

impl CoinType {
    /// The stable numeric identifier (SLIP-44 derived where one exists)
    pub fn id(&self) -> u32 {
        match self {
            CoinType::Bitcoin => 0,
            CoinType::BitcoinTestnet => 1,
            CoinType::Litecoin => 2,
            CoinType::Dogecoin => 3,
            CoinType::Ethereum => 60,
            CoinType::Polkadot => 354,
            CoinType::Kusama => 434,
            CoinType::Solana => 501,
            CoinType::SmartChain => 714,
            CoinType::Polygon => 966,
            CoinType::Base => 8453,
            CoinType::Avalanche => 9000,
            CoinType::Arbitrum => 9001,
            CoinType::Optimism => 9007,
        }
    }

    /// Resolve a numeric identifier; `None` for unregistered coins
    pub fn from_id(id: u32) -> Option<Self> {
        ALL_COINS.iter().copied().find(|c| c.id() == id)
    }

    pub fn name(&self) -> &'static str {
        match self {
            CoinType::Bitcoin => "Bitcoin",
            CoinType::BitcoinTestnet => "Bitcoin Testnet",
            CoinType::Litecoin => "Litecoin",
            CoinType::Dogecoin => "Dogecoin",
            CoinType::Ethereum => "Ethereum",
            CoinType::SmartChain => "BNB Smart Chain",
            CoinType::Polygon => "Polygon",
            CoinType::Arbitrum => "Arbitrum",
            CoinType::Optimism => "Optimism",
            CoinType::Base => "Base",
            CoinType::Avalanche => "Avalanche C-Chain",
            CoinType::Solana => "Solana",
            CoinType::Polkadot => "Polkadot",
            CoinType::Kusama => "Kusama",
        }
    }

    pub fn is_evm(&self) -> bool {
        matches!(
            self,
            CoinType::Ethereum
                | CoinType::SmartChain
                | CoinType::Polygon
                | CoinType::Arbitrum
                | CoinType::Optimism
                | CoinType::Base
                | CoinType::Avalanche
        )
    }

    pub fn is_utxo(&self) -> bool {
        matches!(
            self,
            CoinType::Bitcoin | CoinType::BitcoinTestnet | CoinType::Litecoin | CoinType::Dogecoin
        )
    }

    /// EVM chain id, for coins that have one
    pub fn chain_id(&self) -> Option<u64> {
        match self {
            CoinType::Ethereum => Some(1),
            CoinType::SmartChain => Some(56),
            CoinType::Polygon => Some(137),
            CoinType::Arbitrum => Some(42161),
            CoinType::Optimism => Some(10),
            CoinType::Base => Some(8453),
            CoinType::Avalanche => Some(43114),
            _ => None,
        }
    }
}

impl std::str::FromStr for CoinType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "bitcoin" | "btc" => Ok(CoinType::Bitcoin),
            "bitcoin_testnet" | "btc_testnet" => Ok(CoinType::BitcoinTestnet),
            "litecoin" | "ltc" => Ok(CoinType::Litecoin),
            "dogecoin" | "doge" => Ok(CoinType::Dogecoin),
            "ethereum" | "eth" => Ok(CoinType::Ethereum),
            "smartchain" | "bnb" | "bsc" => Ok(CoinType::SmartChain),
            "polygon" | "matic" => Ok(CoinType::Polygon),
            "arbitrum" | "arb" => Ok(CoinType::Arbitrum),
            "optimism" | "op" => Ok(CoinType::Optimism),
            "base" => Ok(CoinType::Base),
            "avalanche" | "avax" => Ok(CoinType::Avalanche),
            "solana" | "sol" => Ok(CoinType::Solana),
            "polkadot" | "dot" => Ok(CoinType::Polkadot),
            "kusama" | "ksm" => Ok(CoinType::Kusama),
            _ => Err(format!("Unknown coin: {}", s)),
        }
    }
}

impl std::fmt::Display for CoinType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Address encoding scheme plus its network parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressFormat {
    /// Base58 + version byte + sha256d checksum (legacy Bitcoin family)
    Base58Check { version: u8 },
    /// bech32/bech32m witness program
    Segwit { hrp: &'static str },
    /// EIP-55 checksummed hex
    Eip55,
    /// Plain base58 over the raw key (Solana)
    Base58Raw,
    /// SS58 with a substrate network prefix
    Ss58 { network: u16 },
}

/// One registry row; immutable after construction
pub struct RegistryEntry {
    pub coin: CoinType,
    pub symbol: &'static str,
    pub decimals: u8,
    pub curve: CurveType,
    /// The canonical address format. Entry points may additionally accept
    /// legacy representations during validation.
    pub format: AddressFormat,
    /// Default derivation path template
    pub derivation_path: &'static str,
    /// Whether the coin exposes a JSON signing surface
    pub supports_json: bool,
    pub entry: &'static dyn CoinEntry,
}

impl std::fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("coin", &self.coin)
            .field("symbol", &self.symbol)
            .field("decimals", &self.decimals)
            .field("curve", &self.curve)
            .field("format", &self.format)
            .field("derivation_path", &self.derivation_path)
            .field("supports_json", &self.supports_json)
            .finish_non_exhaustive()
    }
}

const ALL_COINS: [CoinType; 14] = [
    CoinType::Bitcoin,
    CoinType::BitcoinTestnet,
    CoinType::Litecoin,
    CoinType::Dogecoin,
    CoinType::Ethereum,
    CoinType::SmartChain,
    CoinType::Polygon,
    CoinType::Arbitrum,
    CoinType::Optimism,
    CoinType::Base,
    CoinType::Avalanche,
    CoinType::Solana,
    CoinType::Polkadot,
    CoinType::Kusama,
];

fn entry_for(coin: CoinType) -> RegistryEntry {
    use CoinType::*;

    let (symbol, decimals, curve, format, derivation_path) = match coin {
        Bitcoin => (
            "BTC",
            8,
            CurveType::Secp256k1,
            AddressFormat::Segwit { hrp: "bc" },
            "m/84'/0'/0'/0/0",
        ),
        BitcoinTestnet => (
            "tBTC",
            8,
            CurveType::Secp256k1,
            AddressFormat::Segwit { hrp: "tb" },
            "m/84'/1'/0'/0/0",
        ),
        Litecoin => (
            "LTC",
            8,
            CurveType::Secp256k1,
            AddressFormat::Segwit { hrp: "ltc" },
            "m/84'/2'/0'/0/0",
        ),
        Dogecoin => (
            "DOGE",
            8,
            CurveType::Secp256k1,
            AddressFormat::Base58Check { version: 0x1e },
            "m/44'/3'/0'/0/0",
        ),
        Ethereum | SmartChain | Polygon | Arbitrum | Optimism | Base | Avalanche => (
            match coin {
                SmartChain => "BNB",
                Polygon => "POL",
                Avalanche => "AVAX",
                _ => "ETH",
            },
            18,
            CurveType::Secp256k1,
            AddressFormat::Eip55,
            "m/44'/60'/0'/0/0",
        ),
        Solana => (
            "SOL",
            9,
            CurveType::Ed25519,
            AddressFormat::Base58Raw,
            "m/44'/501'/0'/0'",
        ),
        Polkadot => (
            "DOT",
            10,
            CurveType::Sr25519,
            AddressFormat::Ss58 { network: 0 },
            "m/44'/354'/0'/0'/0'",
        ),
        Kusama => (
            "KSM",
            12,
            CurveType::Sr25519,
            AddressFormat::Ss58 { network: 2 },
            "m/44'/434'/0'/0'/0'",
        ),
    };

    let entry: &'static dyn CoinEntry = if coin.is_utxo() {
        &entries::bitcoin::BitcoinEntry
    } else if coin.is_evm() {
        &entries::ethereum::EthereumEntry
    } else {
        match coin {
            Solana => &entries::solana::SolanaEntry,
            Polkadot | Kusama => &entries::polkadot::PolkadotEntry,
            _ => unreachable!("coin families are exhaustive"),
        }
    };

    RegistryEntry {
        coin,
        symbol,
        decimals,
        curve,
        format,
        derivation_path,
        supports_json: coin.is_evm(),
        entry,
    }
}

lazy_static::lazy_static! {
    static ref REGISTRY: HashMap<CoinType, RegistryEntry> = {
        ALL_COINS.iter().map(|&coin| (coin, entry_for(coin))).collect()
    };
}

/// Look up a coin's registry entry. `UnknownCoin` is non-retryable.
pub fn lookup(coin: CoinType) -> OmniResult<&'static RegistryEntry> {
    REGISTRY
        .get(&coin)
        .ok_or_else(|| OmniError::unknown_coin(format!("{} is not registered", coin.name())))
}

/// Look up by raw numeric identifier, the FFI-facing path
pub fn lookup_id(id: u32) -> OmniResult<&'static RegistryEntry> {
    let coin = CoinType::from_id(id)
        .ok_or_else(|| OmniError::unknown_coin(format!("No coin registered for id {}", id)))?;
    lookup(coin)
}

/// All registered coins, for enumeration
pub fn registered_coins() -> Vec<CoinType> {
    ALL_COINS.to_vec()
}
