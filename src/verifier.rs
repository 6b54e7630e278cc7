//! Sigma-tree verifier (spec.md §4.H): parses proof bytes against a known
//! proposition, recomputes the Fiat-Shamir root challenge from the
//! reconstructed leaf commitments, and compares it against the one carried
//! in the proof.

use crate::challenge::{Challenge, CHALLENGE_BYTES};
use crate::errors::Error;
use crate::group;
use crate::hash;
use crate::proof_parser::parse_proof;
use crate::sigma_boolean::{SigmaBoolean, UncheckedTree};

/// Verifies `proof` against `prop` and `message`. An empty proof only
/// verifies `SigmaBoolean::Leaf`/`And`/`Or`/`Threshold` trees if the parser
/// itself rejects it (there is no trivially-true proposition).
pub fn verify(prop: &SigmaBoolean, message: &[u8], proof: &[u8]) -> Result<(), Error> {
    prop.validate()?;
    let tree = parse_proof(prop, proof)?;
    let claimed = tree.challenge().ok_or(Error::InvalidSignature)?;

    let mut data = Vec::new();
    for commitment in tree.leaf_commitments() {
        for p in commitment.elements() {
            data.extend(group::encode_point(&p));
        }
    }
    data.extend(prop.to_bytes());
    data.extend(message);
    let digest = hash::hash_truncated(&data, CHALLENGE_BYTES);
    let mut bytes = [0u8; CHALLENGE_BYTES];
    bytes.copy_from_slice(&digest);
    let recomputed = Challenge::from_bytes(bytes);

    if recomputed == claimed {
        Ok(())
    } else {
        Err(Error::InvalidSignature)
    }
}

/// Verifies a single-leaf proof built with [`crate::prover::sign_message`]
/// (spec.md §13's `verify_message` convenience wrapper).
pub fn verify_message(leaf: &crate::sigma_leaf::SigmaLeaf, message: &[u8], proof: &[u8]) -> Result<(), Error> {
    let prop = SigmaBoolean::Leaf(leaf.clone());
    verify(&prop, message, proof)
}

/// Re-derives the root challenge a fully parsed [`UncheckedTree`] should
/// carry, without re-running the parser; exposed for callers (tests,
/// multi-party aggregation) that already hold a parsed tree.
pub fn recompute_root_challenge(prop: &SigmaBoolean, tree: &UncheckedTree, message: &[u8]) -> Challenge {
    let mut data = Vec::new();
    for commitment in tree.leaf_commitments() {
        for p in commitment.elements() {
            data.extend(group::encode_point(&p));
        }
    }
    data.extend(prop.to_bytes());
    data.extend(message);
    let digest = hash::hash_truncated(&data, CHALLENGE_BYTES);
    let mut bytes = [0u8; CHALLENGE_BYTES];
    bytes.copy_from_slice(&digest);
    Challenge::from_bytes(bytes)
}
