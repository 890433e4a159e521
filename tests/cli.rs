//! CLI integration tests

use assert_cmd::Command;

#[test]
fn coins_lists_registry() {
    let mut cmd = Command::cargo_bin("omnisign").unwrap();
    cmd.arg("coins")
        .assert()
        .success()
        .stdout(predicates::str::contains("Bitcoin"))
        .stdout(predicates::str::contains("secp256k1"))
        .stdout(predicates::str::contains("Polkadot"));
}

#[test]
fn address_from_private_key() {
    let mut cmd = Command::cargo_bin("omnisign").unwrap();
    cmd.args([
        "address",
        "ethereum",
        "--private-key",
        "828c4c48c2cef521f0251920891ed79e871faa24f64f43cde83d07bc99f8dbf0",
    ])
    .assert()
    .success()
    .stdout(predicates::str::contains(
        "0xe32DC46bfBF78D1eada7b0a68C96903e01418D64",
    ));
}

#[test]
fn validate_accepts_and_rejects() {
    Command::cargo_bin("omnisign")
        .unwrap()
        .args(["validate", "btc", "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4"])
        .assert()
        .success()
        .stdout(predicates::str::contains("valid"));

    Command::cargo_bin("omnisign")
        .unwrap()
        .args(["validate", "btc", "bc1qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqq"])
        .assert()
        .failure()
        .stdout(predicates::str::contains("invalid"));
}

#[test]
fn generate_produces_addresses() {
    Command::cargo_bin("omnisign")
        .unwrap()
        .arg("generate")
        .assert()
        .success()
        .stdout(predicates::str::contains("Mnemonic:"))
        .stdout(predicates::str::contains("Bitcoin"))
        .stdout(predicates::str::contains("Solana"));
}
