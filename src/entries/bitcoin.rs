//! Bitcoin-Family Entry Point
//!
//! Serves Bitcoin (mainnet/testnet), Litecoin and Dogecoin. Planning selects
//! UTXOs against a byte-fee target; signing builds the transaction, computes
//! per-input sighashes (BIP-143 for SegWit spends, the legacy algorithm for
//! P2PKH chains) and serializes the final wire format.

use super::{decode_input, encode_output, CoinEntry, EntryError, EntryResult};
use crate::address::{base58check, segwit};
use crate::crypto::{EllipticCurve, Secp256k1Curve};
use crate::keys::PublicKey;
use crate::registry::CoinType;
use crate::utils::hash::{hash160, sha256d};
use serde::{Deserialize, Serialize};

/// Spendable output reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Utxo {
    /// Transaction id in display order (big-endian hex)
    pub txid: String,
    pub vout: u32,
    pub value: u64,
}

/// Signing request for the Bitcoin family
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigningInput {
    /// 32-byte secp256k1 scalar
    pub private_key: Vec<u8>,
    pub to_address: String,
    /// Defaults to the sender's own canonical address
    pub change_address: Option<String>,
    /// Amount to send, in base units (satoshis)
    pub amount: u64,
    /// Fee rate in base units per virtual byte
    pub byte_fee: u64,
    pub utxos: Vec<Utxo>,
}

/// Result of the planning phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionPlan {
    pub amount: u64,
    pub available_amount: u64,
    pub fee: u64,
    pub change: u64,
    /// Selected inputs, largest first
    pub utxos: Vec<Utxo>,
}

/// Signed transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigningOutput {
    /// Raw transaction, ready to broadcast
    pub encoded: Vec<u8>,
    /// Transaction id in display order
    pub txid: String,
    pub fee: u64,
}

/// Dust threshold below which change is folded into the fee
const DUST_LIMIT: u64 = 546;

/// RBF-enabled sequence, no locktime constraint
const SEQUENCE_RBF: u32 = 0xffff_fffd;

pub struct BitcoinEntry;

struct NetworkParams {
    /// SegWit HRP; None for pre-SegWit chains
    hrp: Option<&'static str>,
    /// Base58Check version byte for P2PKH
    p2pkh_version: u8,
}

fn params(coin: CoinType) -> NetworkParams {
    match coin {
        CoinType::Bitcoin => NetworkParams { hrp: Some("bc"), p2pkh_version: 0x00 },
        CoinType::BitcoinTestnet => NetworkParams { hrp: Some("tb"), p2pkh_version: 0x6f },
        CoinType::Litecoin => NetworkParams { hrp: Some("ltc"), p2pkh_version: 0x30 },
        // Dogecoin has no SegWit deployment
        _ => NetworkParams { hrp: None, p2pkh_version: 0x1e },
    }
}

impl CoinEntry for BitcoinEntry {
    fn derive_address(&self, coin: CoinType, public_key: &PublicKey) -> EntryResult<String> {
        let key_hash = hash160(public_key.bytes());
        let net = params(coin);

        match net.hrp {
            Some(hrp) => segwit::encode(hrp, 0, &key_hash)
                .map_err(|e| EntryError::InvalidAddress(e.to_string())),
            None => Ok(base58check::encode(net.p2pkh_version, &key_hash)),
        }
    }

    fn validate_address(&self, coin: CoinType, address: &str) -> bool {
        script_pubkey_for_address(coin, address).is_ok()
    }

    fn sign(&self, coin: CoinType, input: &[u8]) -> EntryResult<Vec<u8>> {
        let request: SigningInput = decode_input(input)?;
        let output = sign_request(coin, &request)?;
        encode_output(&output)
    }

    fn plan(&self, coin: CoinType, input: &[u8]) -> EntryResult<Vec<u8>> {
        let request: SigningInput = decode_input(input)?;
        let plan = plan_request(coin, &request)?;
        encode_output(&plan)
    }
}

// MARK: - Planning

/// Select UTXOs for the requested amount, largest first, re-estimating the
/// fee as inputs accumulate.
pub fn plan_request(coin: CoinType, request: &SigningInput) -> EntryResult<TransactionPlan> {
    if request.amount == 0 {
        return Err(EntryError::MalformedInput("Amount must be positive".into()));
    }

    let segwit_inputs = params(coin).hrp.is_some();
    let estimate_fee = |input_count: usize| -> u64 {
        // P2WPKH input ~68 vbytes, P2PKH ~148; outputs ~31/34; overhead ~10
        let per_input: u64 = if segwit_inputs { 68 } else { 148 };
        let per_output: u64 = if segwit_inputs { 31 } else { 34 };
        let vsize = 10 + per_input * input_count as u64 + per_output * 2;
        vsize * request.byte_fee
    };

    let available_amount: u64 = request.utxos.iter().map(|u| u.value).sum();

    let mut sorted: Vec<Utxo> = request.utxos.clone();
    sorted.sort_by(|a, b| b.value.cmp(&a.value));

    let mut selected = Vec::new();
    let mut total: u64 = 0;
    for utxo in sorted {
        if total >= request.amount + estimate_fee(selected.len()) {
            break;
        }
        total += utxo.value;
        selected.push(utxo);
    }

    let fee = estimate_fee(selected.len());
    let needed = request.amount + fee;
    if total < needed {
        return Err(EntryError::InsufficientFunds {
            needed,
            available: available_amount,
        });
    }

    let mut change = total - needed;
    let mut final_fee = fee;
    if change <= DUST_LIMIT {
        // Dust change is cheaper to burn as fee than to create
        final_fee += change;
        change = 0;
    }

    Ok(TransactionPlan {
        amount: request.amount,
        available_amount,
        fee: final_fee,
        change,
        utxos: selected,
    })
}

// MARK: - Signing

fn sign_request(coin: CoinType, request: &SigningInput) -> EntryResult<SigningOutput> {
    let plan = plan_request(coin, request)?;
    let net = params(coin);

    let public_key = Secp256k1Curve::public_key_from_private(&request.private_key)
        .map_err(|e| EntryError::InvalidKey(e.to_string()))?;
    let key_hash = hash160(&public_key);

    // scriptCode for both BIP-143 and legacy sighashes is the P2PKH script
    let script_code = p2pkh_script(&key_hash);

    let to_script = script_pubkey_for_address(coin, &request.to_address)?;
    let change_script = match &request.change_address {
        Some(addr) => script_pubkey_for_address(coin, addr)?,
        None => match net.hrp {
            Some(_) => p2wpkh_script(&key_hash),
            None => p2pkh_script(&key_hash),
        },
    };

    let mut inputs = Vec::with_capacity(plan.utxos.len());
    for utxo in &plan.utxos {
        let txid_bytes = hex::decode(&utxo.txid)
            .map_err(|e| EntryError::MalformedInput(format!("Invalid txid hex: {}", e)))?;
        if txid_bytes.len() != 32 {
            return Err(EntryError::MalformedInput("Txid must be 32 bytes".into()));
        }
        let mut txid = [0u8; 32];
        txid.copy_from_slice(&txid_bytes);
        inputs.push(TxInput {
            txid,
            vout: utxo.vout,
            value: utxo.value,
            sequence: SEQUENCE_RBF,
        });
    }

    let mut outputs = vec![TxOutput {
        value: plan.amount,
        script_pubkey: to_script,
    }];
    if plan.change > 0 {
        outputs.push(TxOutput {
            value: plan.change,
            script_pubkey: change_script,
        });
    }

    let tx = UnsignedTransaction {
        version: 2,
        inputs,
        outputs,
        locktime: 0,
    };

    // Sign every input with SIGHASH_ALL
    let segwit_spend = net.hrp.is_some();
    let mut signatures = Vec::with_capacity(tx.inputs.len());
    for index in 0..tx.inputs.len() {
        let sighash = if segwit_spend {
            segwit_sighash(&tx, index, &script_code)
        } else {
            legacy_sighash(&tx, index, &script_code)
        };

        let compact = Secp256k1Curve::sign(&request.private_key, &sighash)
            .map_err(|e| EntryError::Signing(e.to_string()))?;
        let mut der = Secp256k1Curve::signature_to_der(&compact)
            .map_err(|e| EntryError::Signing(e.to_string()))?;
        der.push(0x01); // SIGHASH_ALL
        signatures.push(der);
    }

    let encoded = serialize_signed(&tx, &signatures, &public_key, segwit_spend);
    let txid = {
        // Txid excludes witness data
        let base = if segwit_spend {
            serialize_base(&tx, &signatures, &public_key, false)
        } else {
            encoded.clone()
        };
        let mut hash = sha256d(&base);
        hash.reverse();
        hex::encode(hash)
    };

    Ok(SigningOutput {
        encoded,
        txid,
        fee: plan.fee,
    })
}

// MARK: - Scripts

fn p2pkh_script(key_hash: &[u8; 20]) -> Vec<u8> {
    // OP_DUP OP_HASH160 <20> OP_EQUALVERIFY OP_CHECKSIG
    let mut script = Vec::with_capacity(25);
    script.extend_from_slice(&[0x76, 0xa9, 0x14]);
    script.extend_from_slice(key_hash);
    script.extend_from_slice(&[0x88, 0xac]);
    script
}

fn p2wpkh_script(key_hash: &[u8; 20]) -> Vec<u8> {
    // OP_0 <20>
    let mut script = Vec::with_capacity(22);
    script.extend_from_slice(&[0x00, 0x14]);
    script.extend_from_slice(key_hash);
    script
}

/// Resolve a textual address to its scriptPubKey, accepting the coin's
/// canonical format plus the legacy P2PKH representation where SegWit is
/// canonical.
fn script_pubkey_for_address(coin: CoinType, address: &str) -> EntryResult<Vec<u8>> {
    let net = params(coin);

    if let Some(hrp) = net.hrp {
        if let Ok((version, program)) = segwit::decode(hrp, address) {
            if version == 0 && program.len() == 20 {
                let mut hash = [0u8; 20];
                hash.copy_from_slice(&program);
                return Ok(p2wpkh_script(&hash));
            }
            return Err(EntryError::InvalidAddress(
                "Unsupported witness program".into(),
            ));
        }
    }

    match base58check::decode(net.p2pkh_version, address) {
        Ok(payload) if payload.len() == 20 => {
            let mut hash = [0u8; 20];
            hash.copy_from_slice(&payload);
            Ok(p2pkh_script(&hash))
        }
        _ => Err(EntryError::InvalidAddress(format!(
            "Not a valid {} address",
            coin.name()
        ))),
    }
}

// MARK: - Transaction assembly

struct TxInput {
    txid: [u8; 32],
    vout: u32,
    value: u64,
    sequence: u32,
}

struct TxOutput {
    value: u64,
    script_pubkey: Vec<u8>,
}

struct UnsignedTransaction {
    version: i32,
    inputs: Vec<TxInput>,
    outputs: Vec<TxOutput>,
    locktime: u32,
}

fn write_var_int(value: u64, buf: &mut Vec<u8>) {
    if value < 0xfd {
        buf.push(value as u8);
    } else if value <= 0xffff {
        buf.push(0xfd);
        buf.extend_from_slice(&(value as u16).to_le_bytes());
    } else if value <= 0xffff_ffff {
        buf.push(0xfe);
        buf.extend_from_slice(&(value as u32).to_le_bytes());
    } else {
        buf.push(0xff);
        buf.extend_from_slice(&value.to_le_bytes());
    }
}

fn write_outpoint(input: &TxInput, buf: &mut Vec<u8>) {
    let mut txid = input.txid;
    txid.reverse(); // wire order is little-endian
    buf.extend_from_slice(&txid);
    buf.extend_from_slice(&input.vout.to_le_bytes());
}

fn write_outputs(outputs: &[TxOutput], buf: &mut Vec<u8>) {
    write_var_int(outputs.len() as u64, buf);
    for output in outputs {
        buf.extend_from_slice(&output.value.to_le_bytes());
        write_var_int(output.script_pubkey.len() as u64, buf);
        buf.extend_from_slice(&output.script_pubkey);
    }
}

/// BIP-143 sighash for a P2WPKH input, SIGHASH_ALL
fn segwit_sighash(tx: &UnsignedTransaction, input_index: usize, script_code: &[u8]) -> [u8; 32] {
    let input = &tx.inputs[input_index];
    let mut serialized = Vec::new();

    serialized.extend_from_slice(&tx.version.to_le_bytes());

    // hashPrevouts
    let mut prevouts = Vec::new();
    for inp in &tx.inputs {
        write_outpoint(inp, &mut prevouts);
    }
    serialized.extend_from_slice(&sha256d(&prevouts));

    // hashSequence
    let mut sequences = Vec::new();
    for inp in &tx.inputs {
        sequences.extend_from_slice(&inp.sequence.to_le_bytes());
    }
    serialized.extend_from_slice(&sha256d(&sequences));

    // outpoint + scriptCode + value + sequence of the signed input
    write_outpoint(input, &mut serialized);
    write_var_int(script_code.len() as u64, &mut serialized);
    serialized.extend_from_slice(script_code);
    serialized.extend_from_slice(&input.value.to_le_bytes());
    serialized.extend_from_slice(&input.sequence.to_le_bytes());

    // hashOutputs
    let mut outputs = Vec::new();
    for out in &tx.outputs {
        outputs.extend_from_slice(&out.value.to_le_bytes());
        write_var_int(out.script_pubkey.len() as u64, &mut outputs);
        outputs.extend_from_slice(&out.script_pubkey);
    }
    serialized.extend_from_slice(&sha256d(&outputs));

    serialized.extend_from_slice(&tx.locktime.to_le_bytes());
    serialized.extend_from_slice(&1u32.to_le_bytes()); // SIGHASH_ALL

    sha256d(&serialized)
}

/// Pre-SegWit sighash, SIGHASH_ALL
fn legacy_sighash(tx: &UnsignedTransaction, input_index: usize, script_code: &[u8]) -> [u8; 32] {
    let mut serialized = Vec::new();

    serialized.extend_from_slice(&tx.version.to_le_bytes());

    write_var_int(tx.inputs.len() as u64, &mut serialized);
    for (i, input) in tx.inputs.iter().enumerate() {
        write_outpoint(input, &mut serialized);
        if i == input_index {
            write_var_int(script_code.len() as u64, &mut serialized);
            serialized.extend_from_slice(script_code);
        } else {
            serialized.push(0x00);
        }
        serialized.extend_from_slice(&input.sequence.to_le_bytes());
    }

    write_outputs(&tx.outputs, &mut serialized);

    serialized.extend_from_slice(&tx.locktime.to_le_bytes());
    serialized.extend_from_slice(&1u32.to_le_bytes()); // SIGHASH_ALL

    sha256d(&serialized)
}

/// Serialize without the SegWit marker or witness section
fn serialize_base(
    tx: &UnsignedTransaction,
    signatures: &[Vec<u8>],
    public_key: &[u8; 33],
    legacy_script_sig: bool,
) -> Vec<u8> {
    let mut buf = Vec::new();

    buf.extend_from_slice(&tx.version.to_le_bytes());

    write_var_int(tx.inputs.len() as u64, &mut buf);
    for (i, input) in tx.inputs.iter().enumerate() {
        write_outpoint(input, &mut buf);

        if legacy_script_sig {
            // <sig> <pubkey>
            let mut script_sig = Vec::new();
            script_sig.push(signatures[i].len() as u8);
            script_sig.extend_from_slice(&signatures[i]);
            script_sig.push(public_key.len() as u8);
            script_sig.extend_from_slice(public_key);

            write_var_int(script_sig.len() as u64, &mut buf);
            buf.extend_from_slice(&script_sig);
        } else {
            buf.push(0x00); // SegWit inputs have an empty scriptSig
        }

        buf.extend_from_slice(&input.sequence.to_le_bytes());
    }

    write_outputs(&tx.outputs, &mut buf);

    buf.extend_from_slice(&tx.locktime.to_le_bytes());
    buf
}

/// Serialize the final transaction; SegWit spends get the marker, flag and
/// witness section.
fn serialize_signed(
    tx: &UnsignedTransaction,
    signatures: &[Vec<u8>],
    public_key: &[u8; 33],
    segwit_spend: bool,
) -> Vec<u8> {
    if !segwit_spend {
        return serialize_base(tx, signatures, public_key, true);
    }

    let mut buf = Vec::new();

    buf.extend_from_slice(&tx.version.to_le_bytes());
    buf.push(0x00); // marker
    buf.push(0x01); // flag

    write_var_int(tx.inputs.len() as u64, &mut buf);
    for input in &tx.inputs {
        write_outpoint(input, &mut buf);
        buf.push(0x00); // empty scriptSig
        buf.extend_from_slice(&input.sequence.to_le_bytes());
    }

    write_outputs(&tx.outputs, &mut buf);

    // Witness: 2 items per input, <sig> <pubkey>
    for signature in signatures {
        buf.push(0x02);
        write_var_int(signature.len() as u64, &mut buf);
        buf.extend_from_slice(signature);
        write_var_int(public_key.len() as u64, &mut buf);
        buf.extend_from_slice(public_key);
    }

    buf.extend_from_slice(&tx.locktime.to_le_bytes());
    buf
}

// MARK: - Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::CurveType;
    use crate::keys::PrivateKey;

    fn sample_input(coin: CoinType) -> SigningInput {
        let key = PrivateKey::new(&[7u8; 32], CurveType::Secp256k1).unwrap();
        let entry = BitcoinEntry;
        let address = entry
            .derive_address(coin, &key.public_key().unwrap())
            .unwrap();

        SigningInput {
            private_key: vec![7u8; 32],
            to_address: address,
            change_address: None,
            amount: 50_000,
            byte_fee: 2,
            utxos: vec![
                Utxo { txid: "aa".repeat(32), vout: 0, value: 40_000 },
                Utxo { txid: "bb".repeat(32), vout: 1, value: 30_000 },
                Utxo { txid: "cc".repeat(32), vout: 0, value: 5_000 },
            ],
        }
    }

    #[test]
    fn test_derive_addresses_per_network() {
        let key = PrivateKey::new(&[7u8; 32], CurveType::Secp256k1).unwrap();
        let public = key.public_key().unwrap();
        let entry = BitcoinEntry;

        assert!(entry.derive_address(CoinType::Bitcoin, &public).unwrap().starts_with("bc1q"));
        assert!(entry.derive_address(CoinType::BitcoinTestnet, &public).unwrap().starts_with("tb1q"));
        assert!(entry.derive_address(CoinType::Litecoin, &public).unwrap().starts_with("ltc1q"));
        assert!(entry.derive_address(CoinType::Dogecoin, &public).unwrap().starts_with('D'));
    }

    #[test]
    fn test_validate_accepts_legacy_and_segwit() {
        let entry = BitcoinEntry;
        // Genesis coinbase (legacy) and a canonical segwit address
        assert!(entry.validate_address(CoinType::Bitcoin, "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa"));
        assert!(entry.validate_address(
            CoinType::Bitcoin,
            "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4"
        ));
        // Wrong network
        assert!(!entry.validate_address(CoinType::Bitcoin, "ltc1qw508d6qejxtdg4y5r3zarvary0c5xw7kjmp4kxj"));
        assert!(!entry.validate_address(CoinType::Bitcoin, "garbage"));
    }

    #[test]
    fn test_plan_selects_largest_first() {
        let request = sample_input(CoinType::Bitcoin);
        let plan = plan_request(CoinType::Bitcoin, &request).unwrap();

        assert_eq!(plan.amount, 50_000);
        assert_eq!(plan.available_amount, 75_000);
        assert_eq!(plan.utxos.len(), 2);
        assert_eq!(plan.utxos[0].value, 40_000);
        assert_eq!(plan.utxos[1].value, 30_000);
        assert!(plan.fee > 0);
        assert_eq!(plan.change, 70_000 - 50_000 - plan.fee);
    }

    #[test]
    fn test_plan_insufficient_funds() {
        let mut request = sample_input(CoinType::Bitcoin);
        request.amount = 80_000;

        let err = plan_request(CoinType::Bitcoin, &request).unwrap_err();
        assert!(matches!(err, EntryError::InsufficientFunds { .. }));
    }

    #[test]
    fn test_sign_produces_segwit_transaction() {
        let request = sample_input(CoinType::Bitcoin);
        let output = sign_request(CoinType::Bitcoin, &request).unwrap();

        // Version 2, marker 0x00, flag 0x01
        assert_eq!(&output.encoded[..6], &[0x02, 0x00, 0x00, 0x00, 0x00, 0x01]);
        assert_eq!(output.txid.len(), 64);
        assert!(output.fee > 0);
    }

    #[test]
    fn test_sign_dogecoin_is_legacy() {
        let request = sample_input(CoinType::Dogecoin);
        let output = sign_request(CoinType::Dogecoin, &request).unwrap();

        // No SegWit marker: byte 4 is the input count
        assert_eq!(output.encoded[4], 0x02);
        // Wire txid round-trips through its own hash
        let mut expected = sha256d(&output.encoded);
        expected.reverse();
        assert_eq!(output.txid, hex::encode(expected));
    }

    #[test]
    fn test_sign_deterministic() {
        let request = sample_input(CoinType::Bitcoin);
        let a = sign_request(CoinType::Bitcoin, &request).unwrap();
        let b = sign_request(CoinType::Bitcoin, &request).unwrap();
        assert_eq!(a.encoded, b.encoded);
        assert_eq!(a.txid, b.txid);
    }

    #[test]
    fn test_entry_roundtrip_through_bincode() {
        let request = sample_input(CoinType::Bitcoin);
        let bytes = bincode::serialize(&request).unwrap();

        let entry = BitcoinEntry;
        let plan_bytes = entry.plan(CoinType::Bitcoin, &bytes).unwrap();
        let plan: TransactionPlan = bincode::deserialize(&plan_bytes).unwrap();
        assert_eq!(plan.amount, request.amount);

        let out_bytes = entry.sign(CoinType::Bitcoin, &bytes).unwrap();
        let output: SigningOutput = bincode::deserialize(&out_bytes).unwrap();
        assert!(!output.encoded.is_empty());
    }

    #[test]
    fn test_malformed_input_rejected() {
        let entry = BitcoinEntry;
        assert!(matches!(
            entry.sign(CoinType::Bitcoin, b"not bincode"),
            Err(EntryError::MalformedInput(_))
        ));
    }
}
