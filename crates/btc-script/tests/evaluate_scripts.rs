//! End-to-end evaluation through the public API.

use btc_primitives::hash::{hash160, sha256};
use btc_script::interpreter::{Config, Engine, InterpreterErrorCode};
use btc_script::opcodes::*;
use btc_script::{p2pkh_script, p2sh_script, p2wpkh_script, Command, Network, Script};
use k256::ecdsa::{signature::hazmat::PrehashSigner, Signature as K256Signature, SigningKey};
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

const Z: [u8; 32] = [0x33; 32];

struct Signer {
    key: SigningKey,
}

impl Signer {
    fn new(seed: u8) -> Self {
        Signer {
            key: SigningKey::from_slice(&[seed; 32]).unwrap(),
        }
    }

    fn sec(&self) -> Vec<u8> {
        self.key.verifying_key().to_encoded_point(true).as_bytes().to_vec()
    }

    /// DER signature over `z` with SIGHASH_ALL appended.
    fn sign(&self, z: &[u8; 32]) -> Vec<u8> {
        let sig: K256Signature = self.key.sign_prehash(z).unwrap();
        let mut out = sig.to_der().as_bytes().to_vec();
        out.push(0x01);
        out
    }
}

fn push(data: impl Into<Vec<u8>>) -> Command {
    Command::Push(data.into())
}

#[test]
fn p2pkh_spend_from_hex() {
    init_logging();
    let signer = Signer::new(0x21);
    let script_pubkey = p2pkh_script(&hash160(&signer.sec()));
    let script_sig = Script::from_commands(vec![push(signer.sign(&Z)), push(signer.sec())]);

    // Round trip both halves through their wire form first.
    let script_pubkey = Script::from_hex(&script_pubkey.to_hex().unwrap()).unwrap();
    let script_sig = Script::from_hex(&script_sig.to_hex().unwrap()).unwrap();

    assert!((&script_sig + &script_pubkey).evaluate(&Z, &[]));
    assert!(!(&script_sig + &script_pubkey).evaluate(&[0x34; 32], &[]));
}

#[test]
fn corrupted_signature_is_rejected() {
    init_logging();
    let signer = Signer::new(0x22);
    let script_pubkey = p2pkh_script(&hash160(&signer.sec()));
    let mut sig = signer.sign(&Z);
    // Last byte of the s value, just before the sighash type.
    let idx = sig.len() - 2;
    sig[idx] ^= 0x01;

    let combined = Script::from_commands(vec![push(sig), push(signer.sec())]) + script_pubkey;
    assert!(!combined.evaluate(&Z, &[]));
}

#[test]
fn two_of_three_multisig_through_p2sh() {
    init_logging();
    let signers: Vec<Signer> = (1..=3).map(Signer::new).collect();
    let mut cmds = vec![Command::Opcode(OP_2)];
    cmds.extend(signers.iter().map(|s| push(s.sec())));
    cmds.extend([Command::Opcode(OP_3), Command::Opcode(OP_CHECKMULTISIG)]);
    let redeem = Script::from_commands(cmds);
    let redeem_raw = redeem.raw_serialize().unwrap();
    let script_pubkey = p2sh_script(&hash160(&redeem_raw));

    let script_sig = Script::from_commands(vec![
        Command::Opcode(OP_0),
        push(signers[0].sign(&Z)),
        push(signers[2].sign(&Z)),
        push(redeem_raw.clone()),
    ]);
    assert!((&script_sig + &script_pubkey).evaluate(&Z, &[]));

    // Signatures out of key order.
    let swapped = Script::from_commands(vec![
        Command::Opcode(OP_0),
        push(signers[2].sign(&Z)),
        push(signers[0].sign(&Z)),
        push(redeem_raw),
    ]);
    assert!(!(&swapped + &script_pubkey).evaluate(&Z, &[]));

    assert_eq!(
        script_pubkey.address(Network::Mainnet).unwrap(),
        redeem.p2sh_address(Network::Mainnet).unwrap()
    );
}

#[test]
fn p2wpkh_spend_uses_witness() {
    init_logging();
    let signer = Signer::new(0x23);
    let script_pubkey = p2wpkh_script(&hash160(&signer.sec()));
    let witness = vec![signer.sign(&Z), signer.sec()];

    let engine = Engine::new();
    assert!(engine.evaluate(&script_pubkey, &Z, &witness));

    let wrong_key = vec![signer.sign(&Z), Signer::new(0x24).sec()];
    assert!(!engine.evaluate(&script_pubkey, &Z, &wrong_key));
}

#[test]
fn p2wsh_spend_reports_hash_mismatch() {
    init_logging();
    let witness_script = Script::from_commands(vec![Command::Opcode(OP_1)]);
    let raw = witness_script.raw_serialize().unwrap();
    let script_pubkey = witness_script.p2wsh_script_pubkey().unwrap();
    assert!(script_pubkey.is_p2wsh_script_pubkey());

    let engine = Engine::new();
    engine.execute(&script_pubkey, &Z, &[raw]).unwrap();

    let other = Script::from_commands(vec![Command::Opcode(OP_2)])
        .raw_serialize()
        .unwrap();
    let err = engine.execute(&script_pubkey, &Z, &[other]).unwrap_err();
    assert_eq!(err.code, InterpreterErrorCode::WitnessScriptHashMismatch);

    let program: [u8; 32] = sha256(&witness_script.raw_serialize().unwrap());
    assert_eq!(
        script_pubkey,
        btc_script::p2wsh_script(&program)
    );
}

#[test]
fn op_limit_applies_through_engine() {
    init_logging();
    let script = Script::from_commands(vec![Command::Opcode(OP_1); 20]);
    let engine = Engine::new().with_config(Config::default().with_max_ops(10));
    let err = engine.execute(&script, &Z, &[]).unwrap_err();
    assert_eq!(err.code, InterpreterErrorCode::TooManyOperations);
    assert!(Engine::new().evaluate(&script, &Z, &[]));
}

#[test]
fn addresses_differ_by_network() {
    let signer = Signer::new(0x25);
    let script_pubkey = p2pkh_script(&hash160(&signer.sec()));
    let main = script_pubkey.address(Network::Mainnet).unwrap();
    let test = script_pubkey.address(Network::Testnet).unwrap();
    assert!(main.starts_with('1'));
    assert!(test.starts_with('m') || test.starts_with('n'));

    let segwit = p2wpkh_script(&hash160(&signer.sec()));
    assert!(segwit.segwit_address(Network::Mainnet).unwrap().starts_with("bc1q"));
    assert!(segwit.segwit_address(Network::Testnet).unwrap().starts_with("tb1q"));
    assert!(segwit.address(Network::Mainnet).is_err());
}
