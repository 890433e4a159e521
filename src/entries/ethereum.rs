//! Ethereum / EVM Entry Point
//!
//! Serves every EVM-compatible coin in the registry. Supports legacy
//! (EIP-155) and fee-market (EIP-1559, type 0x02) transactions: RLP-encodes
//! the payload, signs the keccak256 digest with a recoverable secp256k1
//! signature, and re-encodes with the signature spliced in. This family also
//! exposes the engine's JSON signing surface.

use super::{decode_input, encode_output, CoinEntry, EntryError, EntryResult};
use crate::address::eip55;
use crate::crypto::{RecoverableSignature, Secp256k1Curve};
use crate::keys::PublicKey;
use crate::registry::CoinType;
use crate::utils::hash::keccak256;
use serde::{Deserialize, Serialize};

/// Transaction flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxMode {
    /// Pre-EIP-2718 with EIP-155 replay protection
    Legacy,
    /// EIP-1559 fee market (type 0x02)
    FeeMarket,
}

/// Signing request for the EVM family
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigningInput {
    /// 32-byte secp256k1 scalar
    pub private_key: Vec<u8>,
    pub mode: TxMode,
    /// Overrides the coin's default chain id when set (custom networks)
    pub chain_id: Option<u64>,
    pub nonce: u64,
    pub gas_limit: u64,
    /// Legacy only
    pub gas_price: Option<u128>,
    /// Fee market only
    pub max_fee_per_gas: Option<u128>,
    pub max_priority_fee_per_gas: Option<u128>,
    /// Checksummed or lowercase recipient; None deploys a contract
    pub to: Option<String>,
    /// Value in wei
    pub value: u128,
    #[serde(default)]
    pub data: Vec<u8>,
}

/// Signed transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigningOutput {
    /// RLP-encoded signed transaction (with the type byte for typed txs)
    pub encoded: Vec<u8>,
    /// keccak256 of the encoded transaction
    pub tx_hash: String,
    pub v: u64,
    pub r: String,
    pub s: String,
}

pub struct EthereumEntry;

impl CoinEntry for EthereumEntry {
    fn derive_address(&self, _coin: CoinType, public_key: &PublicKey) -> EntryResult<String> {
        let uncompressed = public_key
            .uncompressed_bytes()
            .map_err(|e| EntryError::InvalidKey(e.to_string()))?;

        // keccak256 over the 64 coordinate bytes; the account is the last 20
        let hash = keccak256(&uncompressed[1..]);
        eip55::encode(&hash[12..]).map_err(|e| EntryError::InvalidAddress(e.to_string()))
    }

    fn validate_address(&self, _coin: CoinType, address: &str) -> bool {
        eip55::decode(address).is_ok()
    }

    fn sign(&self, coin: CoinType, input: &[u8]) -> EntryResult<Vec<u8>> {
        let request: SigningInput = decode_input(input)?;
        let output = sign_request(coin, &request)?;
        encode_output(&output)
    }

    fn sign_json(&self, coin: CoinType, json: &str, private_key: &[u8]) -> EntryResult<String> {
        let mut request: SigningInput =
            serde_json::from_str(json).map_err(|e| EntryError::MalformedInput(e.to_string()))?;
        request.private_key = private_key.to_vec();

        let output = sign_request(coin, &request)?;
        serde_json::to_string(&output).map_err(|e| EntryError::Signing(e.to_string()))
    }
}

// MARK: - Signing

fn sign_request(coin: CoinType, request: &SigningInput) -> EntryResult<SigningOutput> {
    let chain_id = request
        .chain_id
        .or_else(|| coin.chain_id())
        .ok_or_else(|| EntryError::MalformedInput("No chain id available".into()))?;

    let to = match &request.to {
        Some(address) => Some(parse_account(address)?),
        None => None,
    };

    match request.mode {
        TxMode::Legacy => sign_legacy(chain_id, to, request),
        TxMode::FeeMarket => sign_fee_market(chain_id, to, request),
    }
}

fn parse_account(address: &str) -> EntryResult<[u8; 20]> {
    let bytes = eip55::decode(address)
        .map_err(|e| EntryError::InvalidAddress(e.to_string()))?;
    let mut account = [0u8; 20];
    account.copy_from_slice(&bytes);
    Ok(account)
}

fn sign_legacy(
    chain_id: u64,
    to: Option<[u8; 20]>,
    request: &SigningInput,
) -> EntryResult<SigningOutput> {
    let gas_price = request
        .gas_price
        .ok_or_else(|| EntryError::MalformedInput("gas_price is required for legacy mode".into()))?;

    // Digest: RLP([nonce, gasPrice, gasLimit, to, value, data, chainId, 0, 0])
    let mut items = base_legacy_items(gas_price, to, request);
    items.push(rlp_encode_u64(chain_id));
    items.push(rlp_encode_u64(0));
    items.push(rlp_encode_u64(0));
    let digest = keccak256(&rlp_encode_list(&items));

    let (signature, recovery_id) = Secp256k1Curve::sign_recoverable(&request.private_key, &digest)
        .map_err(|e| EntryError::Signing(e.to_string()))?;

    // EIP-155: v = chain_id * 2 + 35 + recovery_id
    let v = chain_id * 2 + 35 + recovery_id as u64;

    let mut signed = base_legacy_items(gas_price, to, request);
    signed.push(rlp_encode_u64(v));
    signed.push(rlp_encode_bytes(&trim_leading_zeros(&signature[..32])));
    signed.push(rlp_encode_bytes(&trim_leading_zeros(&signature[32..])));

    let encoded = rlp_encode_list(&signed);
    Ok(build_output(encoded, v, &signature))
}

fn sign_fee_market(
    chain_id: u64,
    to: Option<[u8; 20]>,
    request: &SigningInput,
) -> EntryResult<SigningOutput> {
    let max_fee = request
        .max_fee_per_gas
        .ok_or_else(|| EntryError::MalformedInput("max_fee_per_gas is required".into()))?;
    let max_priority = request
        .max_priority_fee_per_gas
        .ok_or_else(|| EntryError::MalformedInput("max_priority_fee_per_gas is required".into()))?;

    // Digest: 0x02 || RLP([chainId, nonce, maxPriority, maxFee, gasLimit,
    //                      to, value, data, accessList])
    let items = fee_market_items(chain_id, max_priority, max_fee, to, request);
    let mut typed = vec![0x02];
    typed.extend_from_slice(&rlp_encode_list(&items));
    let digest = keccak256(&typed);

    let (signature, recovery_id) = Secp256k1Curve::sign_recoverable(&request.private_key, &digest)
        .map_err(|e| EntryError::Signing(e.to_string()))?;

    // Typed transactions carry the y-parity directly
    let v = recovery_id as u64;

    let mut signed = fee_market_items(chain_id, max_priority, max_fee, to, request);
    signed.push(rlp_encode_u64(v));
    signed.push(rlp_encode_bytes(&trim_leading_zeros(&signature[..32])));
    signed.push(rlp_encode_bytes(&trim_leading_zeros(&signature[32..])));

    let mut encoded = vec![0x02];
    encoded.extend_from_slice(&rlp_encode_list(&signed));
    Ok(build_output(encoded, v, &signature))
}

fn base_legacy_items(
    gas_price: u128,
    to: Option<[u8; 20]>,
    request: &SigningInput,
) -> Vec<Vec<u8>> {
    vec![
        rlp_encode_u64(request.nonce),
        rlp_encode_u128(gas_price),
        rlp_encode_u64(request.gas_limit),
        rlp_encode_address(to),
        rlp_encode_u128(request.value),
        rlp_encode_bytes(&request.data),
    ]
}

fn fee_market_items(
    chain_id: u64,
    max_priority: u128,
    max_fee: u128,
    to: Option<[u8; 20]>,
    request: &SigningInput,
) -> Vec<Vec<u8>> {
    vec![
        rlp_encode_u64(chain_id),
        rlp_encode_u64(request.nonce),
        rlp_encode_u128(max_priority),
        rlp_encode_u128(max_fee),
        rlp_encode_u64(request.gas_limit),
        rlp_encode_address(to),
        rlp_encode_u128(request.value),
        rlp_encode_bytes(&request.data),
        rlp_encode_list(&[]), // empty access list
    ]
}

fn build_output(encoded: Vec<u8>, v: u64, signature: &[u8; 64]) -> SigningOutput {
    let tx_hash = format!("0x{}", hex::encode(keccak256(&encoded)));
    SigningOutput {
        encoded,
        tx_hash,
        v,
        r: format!("0x{}", hex::encode(trim_leading_zeros(&signature[..32]))),
        s: format!("0x{}", hex::encode(trim_leading_zeros(&signature[32..]))),
    }
}

// MARK: - RLP encoding helpers

fn trim_leading_zeros(bytes: &[u8]) -> Vec<u8> {
    let first = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    bytes[first..].to_vec()
}

fn rlp_encode_u64(val: u64) -> Vec<u8> {
    rlp_encode_bytes(&trim_leading_zeros(&val.to_be_bytes()))
}

fn rlp_encode_u128(val: u128) -> Vec<u8> {
    rlp_encode_bytes(&trim_leading_zeros(&val.to_be_bytes()))
}

fn rlp_encode_bytes(data: &[u8]) -> Vec<u8> {
    if data.is_empty() {
        return vec![0x80];
    }
    if data.len() == 1 && data[0] < 0x80 {
        return data.to_vec();
    }

    if data.len() < 56 {
        let mut result = vec![0x80 + data.len() as u8];
        result.extend_from_slice(data);
        result
    } else {
        let len_bytes = encode_length(data.len());
        let mut result = vec![0xb7 + len_bytes.len() as u8];
        result.extend_from_slice(&len_bytes);
        result.extend_from_slice(data);
        result
    }
}

fn rlp_encode_address(addr: Option<[u8; 20]>) -> Vec<u8> {
    match addr {
        Some(a) => rlp_encode_bytes(&a),
        None => vec![0x80], // Empty for contract creation
    }
}

fn rlp_encode_list(items: &[Vec<u8>]) -> Vec<u8> {
    let mut payload = Vec::new();
    for item in items {
        payload.extend_from_slice(item);
    }

    if payload.len() < 56 {
        let mut result = vec![0xc0 + payload.len() as u8];
        result.extend_from_slice(&payload);
        result
    } else {
        let len_bytes = encode_length(payload.len());
        let mut result = vec![0xf7 + len_bytes.len() as u8];
        result.extend_from_slice(&len_bytes);
        result.extend_from_slice(&payload);
        result
    }
}

fn encode_length(len: usize) -> Vec<u8> {
    let bytes = len.to_be_bytes();
    let leading_zeros = bytes.iter().take_while(|&&b| b == 0).count();
    bytes[leading_zeros..].to_vec()
}

// MARK: - Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::CurveType;
    use crate::keys::PrivateKey;

    fn sample_request(mode: TxMode) -> SigningInput {
        SigningInput {
            private_key: vec![7u8; 32],
            mode,
            chain_id: None,
            nonce: 9,
            gas_limit: 21_000,
            gas_price: Some(20_000_000_000),
            max_fee_per_gas: Some(100_000_000_000),
            max_priority_fee_per_gas: Some(2_000_000_000),
            to: Some("0x3535353535353535353535353535353535353535".to_string()),
            value: 1_000_000_000_000_000_000,
            data: vec![],
        }
    }

    #[test]
    fn test_known_answer_address() {
        // Reference vector shared by every EVM-style coin
        let key = PrivateKey::from_hex(
            "828c4c48c2cef521f0251920891ed79e871faa24f64f43cde83d07bc99f8dbf0",
            CurveType::Secp256k1,
        )
        .unwrap();

        let entry = EthereumEntry;
        let address = entry
            .derive_address(CoinType::Ethereum, &key.public_key().unwrap())
            .unwrap();
        assert_eq!(address, "0xe32DC46bfBF78D1eada7b0a68C96903e01418D64");

        // Same canonical form on every EVM chain
        let bsc = entry
            .derive_address(CoinType::SmartChain, &key.public_key().unwrap())
            .unwrap();
        assert_eq!(address, bsc);
    }

    #[test]
    fn test_eip155_reference_transaction() {
        // The EIP-155 example transaction: nonce 9, 20 gwei, 21000 gas,
        // to 0x3535..., 1 ether, chain id 1, private key 0x4646...46
        let request = SigningInput {
            private_key: vec![0x46u8; 32],
            mode: TxMode::Legacy,
            chain_id: Some(1),
            nonce: 9,
            gas_limit: 21_000,
            gas_price: Some(20_000_000_000),
            max_fee_per_gas: None,
            max_priority_fee_per_gas: None,
            to: Some("0x3535353535353535353535353535353535353535".to_string()),
            value: 1_000_000_000_000_000_000,
            data: vec![],
        };

        let output = sign_request(CoinType::Ethereum, &request).unwrap();
        assert_eq!(output.v, 37);
        assert_eq!(
            output.r,
            "0x28ef61340bd939bc2195fe537567866003e1a15d3c71ff63e1590620aa636276"
        );
        assert_eq!(
            output.s,
            "0x67cbe9d8997f761aecb703304b3800ccf555c9f3dc64214b297fb1966a3b6d83"
        );
    }

    #[test]
    fn test_legacy_requires_gas_price() {
        let mut request = sample_request(TxMode::Legacy);
        request.gas_price = None;
        assert!(matches!(
            sign_request(CoinType::Ethereum, &request),
            Err(EntryError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_fee_market_transaction() {
        let request = sample_request(TxMode::FeeMarket);
        let output = sign_request(CoinType::Ethereum, &request).unwrap();

        assert_eq!(output.encoded[0], 0x02);
        assert!(output.v <= 1); // y-parity
        assert!(output.tx_hash.starts_with("0x"));
    }

    #[test]
    fn test_chain_id_changes_signature() {
        let request = sample_request(TxMode::Legacy);
        let eth = sign_request(CoinType::Ethereum, &request).unwrap();
        let bsc = sign_request(CoinType::SmartChain, &request).unwrap();

        assert_ne!(eth.encoded, bsc.encoded);
        assert_ne!(eth.v, bsc.v); // EIP-155 folds the chain id into v
    }

    #[test]
    fn test_sign_json_surface() {
        let entry = EthereumEntry;
        let request = sample_request(TxMode::Legacy);
        let json = serde_json::to_string(&request).unwrap();
        let result = entry
            .sign_json(CoinType::Ethereum, &json, &[7u8; 32])
            .unwrap();

        let output: SigningOutput = serde_json::from_str(&result).unwrap();
        assert!(!output.encoded.is_empty());
    }

    #[test]
    fn test_bad_recipient_rejected() {
        let mut request = sample_request(TxMode::Legacy);
        request.to = Some("0x35353535".to_string());
        assert!(matches!(
            sign_request(CoinType::Ethereum, &request),
            Err(EntryError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_rlp_encode_scalars() {
        assert_eq!(rlp_encode_u64(0), vec![0x80]);
        assert_eq!(rlp_encode_u64(127), vec![127]);
        assert_eq!(rlp_encode_u64(128), vec![0x81, 128]);
        assert_eq!(rlp_encode_u64(256), vec![0x82, 1, 0]);
    }

    #[test]
    fn test_rlp_encode_bytes() {
        assert_eq!(rlp_encode_bytes(&[]), vec![0x80]);
        assert_eq!(rlp_encode_bytes(&[0x7f]), vec![0x7f]);
        assert_eq!(rlp_encode_bytes(&[0x80]), vec![0x81, 0x80]);
        assert_eq!(rlp_encode_bytes(&[1, 2, 3]), vec![0x83, 1, 2, 3]);
    }
}
