//! Omnisign CLI
//!
//! Thin operator surface over the library: wallet generation, address
//! derivation and validation, and registry inspection.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use omnisign::{
    engine::AnyAddress, registry, utils::logging, CoinType, HdWallet, PrivateKey,
};

#[derive(Parser)]
#[command(name = "omnisign", about = "Multi-chain signing and address engine", version)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a new wallet and print an address per registered coin
    Generate {
        /// Optional BIP-39 passphrase
        #[arg(long, default_value = "")]
        passphrase: String,
    },
    /// Derive the canonical address for a coin
    Address {
        /// Coin name or symbol (e.g. btc, ethereum, dot)
        coin: String,
        /// Hex private key; a mnemonic is used when omitted
        #[arg(long)]
        private_key: Option<String>,
        /// Mnemonic to derive from
        #[arg(long)]
        mnemonic: Option<String>,
    },
    /// Validate an address for a coin
    Validate {
        coin: String,
        address: String,
    },
    /// List every registered coin
    Coins,
}

fn parse_coin(s: &str) -> Result<CoinType> {
    s.parse::<CoinType>().map_err(|e| anyhow::anyhow!(e))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        logging::enable_debug();
    }

    match cli.command {
        Command::Generate { passphrase } => {
            let wallet = if passphrase.is_empty() {
                HdWallet::generate()?
            } else {
                let fresh = HdWallet::generate()?;
                HdWallet::from_mnemonic(fresh.mnemonic(), &passphrase)?
            };

            println!("Mnemonic: {}", wallet.mnemonic());
            println!();
            for coin in registry::registered_coins() {
                let address = wallet.derive_address(coin)?;
                let entry = registry::lookup(coin)?;
                println!("{:<20} {:<6} {}", coin.name(), entry.symbol, address);
            }
        }

        Command::Address {
            coin,
            private_key,
            mnemonic,
        } => {
            let coin = parse_coin(&coin)?;
            let entry = registry::lookup(coin)?;

            let address = match (private_key, mnemonic) {
                (Some(hex_key), _) => {
                    let key = PrivateKey::from_hex(&hex_key, entry.curve)?;
                    AnyAddress::with_public_key(&key.public_key()?, coin)?.to_string()
                }
                (None, Some(phrase)) => {
                    let wallet = HdWallet::from_mnemonic(&phrase, "")
                        .context("invalid mnemonic")?;
                    wallet.derive_address(coin)?
                }
                (None, None) => bail!("either --private-key or --mnemonic is required"),
            };

            println!("{}", address);
        }

        Command::Validate { coin, address } => {
            let coin = parse_coin(&coin)?;
            let valid = omnisign::validate_address(&address, coin);
            println!("{}", if valid { "valid" } else { "invalid" });
            if !valid {
                std::process::exit(1);
            }
        }

        Command::Coins => {
            println!("{:<8} {:<20} {:<6} {:<16} {}", "ID", "NAME", "SYMBOL", "CURVE", "PATH");
            for coin in registry::registered_coins() {
                let entry = registry::lookup(coin)?;
                println!(
                    "{:<8} {:<20} {:<6} {:<16} {}",
                    coin.id(),
                    coin.name(),
                    entry.symbol,
                    entry.curve.name(),
                    entry.derivation_path
                );
            }
        }
    }

    Ok(())
}
