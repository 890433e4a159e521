//! Solana Entry Point
//!
//! Builds and signs legacy system-program transfer transactions: accounts
//! are compiled and deduplicated in privilege order, the message is
//! serialized with compact-u16 lengths, signed with ed25519, and the wire
//! transaction is `signatures || message`.

use super::{decode_input, encode_output, CoinEntry, EntryError, EntryResult};
use crate::address::base58check;
use crate::crypto::{EllipticCurve, Ed25519Curve};
use crate::keys::PublicKey;
use crate::registry::CoinType;
use serde::{Deserialize, Serialize};

/// System program account (all zeros)
const SYSTEM_PROGRAM: [u8; 32] = [0u8; 32];

/// System program transfer instruction index
const TRANSFER_INSTRUCTION: u32 = 2;

/// Signing request for Solana transfers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigningInput {
    /// 32-byte ed25519 seed
    pub private_key: Vec<u8>,
    /// Recipient account, base58
    pub to_address: String,
    /// Amount in lamports
    pub lamports: u64,
    /// Recent blockhash, base58
    pub recent_blockhash: String,
}

/// Signed transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigningOutput {
    /// Wire transaction: compact signature count + signatures + message
    pub encoded: Vec<u8>,
    /// The fee payer's signature, base58 (doubles as the transaction id)
    pub signature: String,
}

pub struct SolanaEntry;

impl CoinEntry for SolanaEntry {
    fn derive_address(&self, _coin: CoinType, public_key: &PublicKey) -> EntryResult<String> {
        Ok(bs58::encode(public_key.bytes()).into_string())
    }

    fn validate_address(&self, _coin: CoinType, address: &str) -> bool {
        base58check::decode_raw(address, 32).is_ok()
    }

    fn sign(&self, _coin: CoinType, input: &[u8]) -> EntryResult<Vec<u8>> {
        let request: SigningInput = decode_input(input)?;
        let output = sign_request(&request)?;
        encode_output(&output)
    }
}

fn decode_key(s: &str, what: &str) -> EntryResult<[u8; 32]> {
    let bytes = base58check::decode_raw(s, 32)
        .map_err(|_| EntryError::MalformedInput(format!("Invalid {}", what)))?;
    let mut arr = [0u8; 32];
    arr.copy_from_slice(&bytes);
    Ok(arr)
}

fn sign_request(request: &SigningInput) -> EntryResult<SigningOutput> {
    let from = Ed25519Curve::public_key_from_private(&request.private_key)
        .map_err(|e| EntryError::InvalidKey(e.to_string()))?;
    let to = decode_key(&request.to_address, "recipient address")?;
    let blockhash = decode_key(&request.recent_blockhash, "recent blockhash")?;

    if request.lamports == 0 {
        return Err(EntryError::MalformedInput("Amount must be positive".into()));
    }

    let message = build_transfer_message(&from, &to, &blockhash, request.lamports);

    let signature = Ed25519Curve::sign(&request.private_key, &message)
        .map_err(|e| EntryError::Signing(e.to_string()))?;

    // Wire format: signature count + signatures + message
    let mut encoded = Vec::with_capacity(1 + 64 + message.len());
    write_compact_u16(1, &mut encoded);
    encoded.extend_from_slice(&signature);
    encoded.extend_from_slice(&message);

    Ok(SigningOutput {
        encoded,
        signature: bs58::encode(signature).into_string(),
    })
}

/// Serialize a legacy transfer message.
///
/// Account order follows privilege: writable signers (fee payer first),
/// then writable non-signers, then readonly non-signers.
fn build_transfer_message(
    from: &[u8; 32],
    to: &[u8; 32],
    blockhash: &[u8; 32],
    lamports: u64,
) -> Vec<u8> {
    let self_transfer = from == to;
    let mut accounts: Vec<[u8; 32]> = vec![*from];
    if !self_transfer {
        accounts.push(*to);
    }
    accounts.push(SYSTEM_PROGRAM);

    let mut message = Vec::new();

    // Header: 1 required signature, 0 readonly signed, 1 readonly unsigned
    message.push(1);
    message.push(0);
    message.push(1);

    write_compact_u16(accounts.len() as u16, &mut message);
    for account in &accounts {
        message.extend_from_slice(account);
    }

    message.extend_from_slice(blockhash);

    // One instruction: system transfer
    write_compact_u16(1, &mut message);

    let program_index = (accounts.len() - 1) as u8;
    message.push(program_index);

    // Account indexes: from, to
    if self_transfer {
        write_compact_u16(2, &mut message);
        message.push(0);
        message.push(0);
    } else {
        write_compact_u16(2, &mut message);
        message.push(0);
        message.push(1);
    }

    // Instruction data: u32 instruction index + u64 lamports, little endian
    let mut data = Vec::with_capacity(12);
    data.extend_from_slice(&TRANSFER_INSTRUCTION.to_le_bytes());
    data.extend_from_slice(&lamports.to_le_bytes());

    write_compact_u16(data.len() as u16, &mut message);
    message.extend_from_slice(&data);

    message
}

/// Write compact-u16 encoding (Solana's variable-length integer)
fn write_compact_u16(value: u16, buf: &mut Vec<u8>) {
    if value < 0x80 {
        buf.push(value as u8);
    } else if value < 0x4000 {
        buf.push((value & 0x7f) as u8 | 0x80);
        buf.push((value >> 7) as u8);
    } else {
        buf.push((value & 0x7f) as u8 | 0x80);
        buf.push(((value >> 7) & 0x7f) as u8 | 0x80);
        buf.push((value >> 14) as u8);
    }
}

// MARK: - Tests
