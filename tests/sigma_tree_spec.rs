//! End-to-end scenarios, seeded with the concrete witness and byte-length
//! expectations a sigma-tree implementation must reproduce exactly.

use hex_literal::hex;
use rand::rngs::OsRng;
use sigma_tree::challenge::CHALLENGE_BYTES;
use sigma_tree::group::{self, SCALAR_BYTES};
use sigma_tree::prover::{prove, sign_message, SecretSet};
use sigma_tree::sigma_boolean::SigmaBoolean;
use sigma_tree::sigma_leaf::SigmaLeaf;
use sigma_tree::verifier::{verify, verify_message};
use sigma_tree::proof_serializer::serialize_proof;

fn dlog_leaf(witness: group::Scalar) -> (SigmaLeaf, group::Scalar) {
    let h = group::exp(group::generator(), witness);
    (SigmaLeaf::ProveDlog { h }, witness)
}

fn seeded_witness() -> group::Scalar {
    let bytes: [u8; 32] = hex!("adf47e32000fc75e2923dba482c843c7f6b684cbf2ceec5bfdf5fe6d13cabe5d");
    group::decode_scalar(&bytes).expect("seeded scalar is canonical")
}

#[test]
fn scenario_1_signs_and_verifies_with_matching_key() {
    let w = seeded_witness();
    let (leaf, _) = dlog_leaf(w);
    let signature = sign_message(&leaf, w, &[1, 2, 3], &mut OsRng).unwrap();
    assert!(!signature.is_empty());
    assert!(verify_message(&leaf, &[1, 2, 3], &signature).is_ok());
}

#[test]
fn scenario_2_rejects_an_unrelated_public_key() {
    let w = seeded_witness();
    let (leaf, _) = dlog_leaf(w);
    let signature = sign_message(&leaf, w, &[1, 2, 3], &mut OsRng).unwrap();

    let other_h = group::exp(group::generator(), group::random_scalar(&mut OsRng));
    let other_leaf = SigmaLeaf::ProveDlog { h: other_h };
    assert!(verify_message(&other_leaf, &[1, 2, 3], &signature).is_err());
}

#[test]
fn scenario_3_cand_of_two_known_secrets_is_88_bytes() {
    let mut rng = OsRng;
    let w1 = group::random_scalar(&mut rng);
    let w2 = group::random_scalar(&mut rng);
    let (leaf1, _) = dlog_leaf(w1);
    let (leaf2, _) = dlog_leaf(w2);
    let prop = SigmaBoolean::And(vec![SigmaBoolean::Leaf(leaf1), SigmaBoolean::Leaf(leaf2)]);

    let mut secrets = SecretSet::new();
    secrets.push(w1);
    secrets.push(w2);

    let tree = prove(&prop, &secrets, &[], b"msg", &mut rng).unwrap();
    let bytes = serialize_proof(&tree).unwrap();
    assert_eq!(bytes.len(), CHALLENGE_BYTES + 2 * SCALAR_BYTES);
    assert_eq!(bytes.len(), 88);
    assert!(verify(&prop, b"msg", &bytes).is_ok());
}

#[test]
fn scenario_4_cor_with_one_known_secret_is_112_bytes_and_xors() {
    let mut rng = OsRng;
    let w1 = group::random_scalar(&mut rng);
    let w2_unknown = group::random_scalar(&mut rng);
    let (leaf1, _) = dlog_leaf(w1);
    let (leaf2, _) = dlog_leaf(w2_unknown);
    let prop = SigmaBoolean::Or(vec![SigmaBoolean::Leaf(leaf1), SigmaBoolean::Leaf(leaf2)]);

    let mut secrets = SecretSet::new();
    secrets.push(w1);

    let tree = prove(&prop, &secrets, &[], b"msg", &mut rng).unwrap();
    let bytes = serialize_proof(&tree).unwrap();
    assert_eq!(bytes.len(), CHALLENGE_BYTES + (CHALLENGE_BYTES + SCALAR_BYTES) + SCALAR_BYTES);
    assert_eq!(bytes.len(), 112);
    assert!(verify(&prop, b"msg", &bytes).is_ok());

    let parsed = sigma_tree::proof_parser::parse_proof(&prop, &bytes).unwrap();
    let children = parsed.children();
    let xor = children[0].challenge().unwrap() ^ children[1].challenge().unwrap();
    assert_eq!(xor, parsed.challenge().unwrap());
}

#[test]
fn scenario_5_cthreshold_2_of_3_polynomial_is_24_bytes() {
    let mut rng = OsRng;
    let w1 = group::random_scalar(&mut rng);
    let w2 = group::random_scalar(&mut rng);
    let w3_unknown = group::random_scalar(&mut rng);
    let (leaf1, _) = dlog_leaf(w1);
    let (leaf2, _) = dlog_leaf(w2);
    let (leaf3, _) = dlog_leaf(w3_unknown);
    let prop = SigmaBoolean::Threshold(
        2,
        vec![
            SigmaBoolean::Leaf(leaf1),
            SigmaBoolean::Leaf(leaf2),
            SigmaBoolean::Leaf(leaf3),
        ],
    );

    let mut secrets = SecretSet::new();
    secrets.push(w1);
    secrets.push(w2);

    let tree = prove(&prop, &secrets, &[], b"msg", &mut rng).unwrap();
    let bytes = serialize_proof(&tree).unwrap();
    assert_eq!(bytes.len(), CHALLENGE_BYTES + CHALLENGE_BYTES + 3 * SCALAR_BYTES);
    assert!(verify(&prop, b"msg", &bytes).is_ok());

    // Flipping a polynomial byte must break verification. The polynomial
    // occupies bytes [CHALLENGE_BYTES, 2*CHALLENGE_BYTES).
    let mut tampered = bytes.clone();
    tampered[CHALLENGE_BYTES] ^= 0x01;
    assert!(verify(&prop, b"msg", &tampered).is_err());
}

#[test]
fn tamper_resistance_flips_reject_any_proof_byte() {
    let mut rng = OsRng;
    let w = group::random_scalar(&mut rng);
    let (leaf, _) = dlog_leaf(w);
    let prop = SigmaBoolean::Leaf(leaf);
    let mut secrets = SecretSet::new();
    secrets.push(w);
    let tree = prove(&prop, &secrets, &[], b"msg", &mut rng).unwrap();
    let bytes = serialize_proof(&tree).unwrap();

    for i in 0..bytes.len() {
        let mut tampered = bytes.clone();
        tampered[i] ^= 0x01;
        assert!(verify(&prop, b"msg", &tampered).is_err(), "byte {i} flip went undetected");
    }
}

#[test]
fn wrong_secret_is_rejected() {
    let mut rng = OsRng;
    let w = group::random_scalar(&mut rng);
    let unrelated = group::random_scalar(&mut rng);
    let (leaf, _) = dlog_leaf(w);
    let prop = SigmaBoolean::Leaf(leaf);

    let mut secrets = SecretSet::new();
    secrets.push(unrelated);
    assert!(prove(&prop, &secrets, &[], b"msg", &mut rng).is_err());
}

#[test]
fn truncated_proof_is_malformed() {
    let mut rng = OsRng;
    let w = group::random_scalar(&mut rng);
    let (leaf, _) = dlog_leaf(w);
    let prop = SigmaBoolean::Leaf(leaf);
    let mut secrets = SecretSet::new();
    secrets.push(w);
    let tree = prove(&prop, &secrets, &[], b"msg", &mut rng).unwrap();
    let bytes = serialize_proof(&tree).unwrap();

    for cut in 1..bytes.len() {
        let truncated = &bytes[..bytes.len() - cut];
        assert!(sigma_tree::proof_parser::parse_proof(&prop, truncated).is_err());
    }
}
