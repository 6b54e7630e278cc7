//! Sigma-tree prover (spec.md §4.G): marks each leaf REAL or SIMULATED,
//! commits/simulates bottom-up, derives the Fiat-Shamir root challenge,
//! propagates challenges top-down, and responds at every REAL leaf.
//!
//! At most one child per OR node (and exactly `k` children per THRESHOLD
//! node) is carried through as REAL even when more witnesses happen to be
//! available; the rest are simulated. This mirrors the construction's only
//! degree of freedom: exactly one child's challenge must be left to absorb
//! whatever the XOR (or polynomial) law forces on it, and any child with a
//! witness can absorb that role just as well as play a simulated one.

use crate::challenge::{Challenge, CHALLENGE_BYTES};
use crate::errors::Error;
use crate::group::{self, EcPoint, Scalar};
use crate::hash;
use crate::polynomial::{Gf2_192, Polynomial};
use crate::sigma_boolean::{Hint, NodePosition, SigmaBoolean, UncheckedTree};
use crate::sigma_leaf::{LeafCommitment, SigmaLeaf};
use crate::traits::{SigmaProtocol, SigmaProtocolSimulator};
use rand::{CryptoRng, RngCore};

/// The witness scalars a prover has on hand, matched against leaves
/// algebraically (by image, not by position) — spec.md §4.G step 1: "for
/// each leaf whose image has a matching secret... mark REAL".
#[derive(Clone, Debug, Default)]
pub struct SecretSet(Vec<Scalar>);

impl SecretSet {
    /// An empty secret set.
    pub fn new() -> Self {
        SecretSet(Vec::new())
    }

    /// Adds a witness scalar to the set.
    pub fn push(&mut self, witness: Scalar) {
        self.0.push(witness);
    }
}

impl FromIterator<Scalar> for SecretSet {
    fn from_iter<I: IntoIterator<Item = Scalar>>(iter: I) -> Self {
        SecretSet(iter.into_iter().collect())
    }
}

/// Proves `prop` true for `message`, using `secrets` and `hints` to find
/// witnesses. Fails atomically with [`Error::ProverMissingSecret`] if the
/// tree cannot be made REAL (no partial tree is ever returned).
pub fn prove(
    prop: &SigmaBoolean,
    secrets: &SecretSet,
    hints: &[Hint],
    message: &[u8],
    rng: &mut (impl RngCore + CryptoRng),
) -> Result<UncheckedTree, Error> {
    prop.validate()?;
    let root = NodePosition::root();
    if !is_capable(prop, &root, secrets, hints) {
        return Err(Error::ProverMissingSecret);
    }
    let built = build_real(prop, &root, secrets, hints, rng)?;

    let mut data = Vec::new();
    collect_commitment_bytes(&built, &mut data);
    data.extend(prop.to_bytes());
    data.extend(message);
    let digest = hash::hash_truncated(&data, CHALLENGE_BYTES);
    let mut bytes = [0u8; CHALLENGE_BYTES];
    bytes.copy_from_slice(&digest);
    let root_challenge = Challenge::from_bytes(bytes);

    finalize(built, root_challenge)
}

/// Proves a single `ProveDlog`/`ProveDHTuple` leaf, the common
/// single-signer case (spec.md §13's `sign_message` convenience wrapper).
pub fn sign_message(
    leaf: &SigmaLeaf,
    witness: Scalar,
    message: &[u8],
    rng: &mut (impl RngCore + CryptoRng),
) -> Result<Vec<u8>, Error> {
    let prop = SigmaBoolean::Leaf(leaf.clone());
    let mut secrets = SecretSet::new();
    secrets.push(witness);
    let tree = prove(&prop, &secrets, &[], message, rng)?;
    crate::proof_serializer::serialize_proof(&tree)
}

// --- capability ("can this node be made REAL") ---

fn is_capable(prop: &SigmaBoolean, position: &NodePosition, secrets: &SecretSet, hints: &[Hint]) -> bool {
    match prop {
        SigmaBoolean::Leaf(leaf) => find_witness(leaf, position, secrets, hints).is_some(),
        SigmaBoolean::And(children) => children
            .iter()
            .enumerate()
            .all(|(i, c)| is_capable(c, &position.child(i), secrets, hints)),
        SigmaBoolean::Or(children) => children
            .iter()
            .enumerate()
            .any(|(i, c)| is_capable(c, &position.child(i), secrets, hints)),
        SigmaBoolean::Threshold(k, children) => {
            let count = children
                .iter()
                .enumerate()
                .filter(|(i, c)| is_capable(c, &position.child(*i), secrets, hints))
                .count();
            count >= *k as usize
        }
    }
}

fn find_witness(
    leaf: &SigmaLeaf,
    position: &NodePosition,
    secrets: &SecretSet,
    hints: &[Hint],
) -> Option<Scalar> {
    for hint in hints {
        if let Hint::RealSecret { position: p, witness } = hint {
            if p == position && leaf.matches_witness(witness) {
                return Some(*witness);
            }
        }
    }
    secrets.0.iter().find(|w| leaf.matches_witness(w)).copied()
}

fn find_real_index(
    children: &[SigmaBoolean],
    position: &NodePosition,
    secrets: &SecretSet,
    hints: &[Hint],
) -> Option<usize> {
    children
        .iter()
        .enumerate()
        .find(|(i, c)| is_capable(c, &position.child(*i), secrets, hints))
        .map(|(i, _)| i)
}

fn find_real_indices(
    children: &[SigmaBoolean],
    position: &NodePosition,
    secrets: &SecretSet,
    hints: &[Hint],
    k: usize,
) -> Option<Vec<usize>> {
    let capable: Vec<usize> = children
        .iter()
        .enumerate()
        .filter(|(i, c)| is_capable(c, &position.child(*i), secrets, hints))
        .map(|(i, _)| i)
        .collect();
    if capable.len() >= k {
        Some(capable.into_iter().take(k).collect())
    } else {
        None
    }
}

fn wrap_commitment(leaf: &SigmaLeaf, pts: &[EcPoint]) -> LeafCommitment {
    match leaf {
        SigmaLeaf::ProveDlog { .. } => LeafCommitment::Dlog(pts[0]),
        SigmaLeaf::ProveDHTuple { .. } => LeafCommitment::DHTuple(pts[0], pts[1]),
    }
}

// --- the half-built tree: commitments are fixed, some challenges/responses
// --- are too (simulated branches), the rest await the root challenge.

enum BuildNode {
    Leaf {
        leaf: SigmaLeaf,
        commitment: LeafCommitment,
        /// `Some` for a REAL leaf: the prover state to finish responding with.
        real_state: Option<(Vec<Scalar>, Vec<Scalar>)>,
        /// `Some` for a SIMULATED leaf: its already-fixed `(challenge, response)`.
        fixed: Option<(Challenge, Scalar)>,
    },
    And {
        children: Vec<BuildNode>,
        /// `Some` if this whole subtree is simulated.
        fixed: Option<Challenge>,
    },
    Or {
        /// The child carrying the derived challenge, `None` if simulated.
        real_index: Option<usize>,
        children: Vec<BuildNode>,
        fixed: Option<Challenge>,
    },
    Threshold {
        k: u8,
        real_indices: Vec<usize>,
        /// `(child index, already-fixed challenge)` for non-real children,
        /// collected while building so the real indices' challenges can be
        /// interpolated once this node's own challenge is known.
        sim_points: Vec<(usize, Challenge)>,
        /// `Some` only when this whole subtree is simulated (built top-down
        /// in one pass, so the polynomial is already complete).
        poly: Option<Polynomial>,
        children: Vec<BuildNode>,
        fixed: Option<Challenge>,
    },
}

impl BuildNode {
    fn fixed_challenge(&self) -> Option<Challenge> {
        match self {
            BuildNode::Leaf { fixed, .. } => fixed.map(|(c, _)| c),
            BuildNode::And { fixed, .. } | BuildNode::Or { fixed, .. } | BuildNode::Threshold { fixed, .. } => *fixed,
        }
    }
}

fn collect_commitment_bytes(node: &BuildNode, out: &mut Vec<u8>) {
    match node {
        BuildNode::Leaf { commitment, .. } => {
            for p in commitment.elements() {
                out.extend(group::encode_point(&p));
            }
        }
        BuildNode::And { children, .. } | BuildNode::Or { children, .. } | BuildNode::Threshold { children, .. } => {
            for c in children {
                collect_commitment_bytes(c, out);
            }
        }
    }
}

/// Builds the REAL portion of the tree bottom-up: real leaves commit (no
/// challenge yet), and exactly one OR child / `k` THRESHOLD children are
/// carried as real, with every sibling simulated immediately with a freshly
/// sampled challenge (spec.md §4.G step 2, "pick uniform ... challenge `e`").
fn build_real(
    prop: &SigmaBoolean,
    position: &NodePosition,
    secrets: &SecretSet,
    hints: &[Hint],
    rng: &mut (impl RngCore + CryptoRng),
) -> Result<BuildNode, Error> {
    match prop {
        SigmaBoolean::Leaf(leaf) => {
            let witness = find_witness(leaf, position, secrets, hints).ok_or(Error::ProverMissingSecret)?;
            let schnorr = leaf.to_schnorr();
            let (points, state) = schnorr.prover_commit(&vec![witness], rng)?;
            let commitment = wrap_commitment(leaf, &points);
            Ok(BuildNode::Leaf {
                leaf: leaf.clone(),
                commitment,
                real_state: Some(state),
                fixed: None,
            })
        }

        SigmaBoolean::And(children) => {
            let mut built = Vec::with_capacity(children.len());
            for (i, child) in children.iter().enumerate() {
                built.push(build_real(child, &position.child(i), secrets, hints, rng)?);
            }
            Ok(BuildNode::And { children: built, fixed: None })
        }

        SigmaBoolean::Or(children) => {
            let real_idx =
                find_real_index(children, position, secrets, hints).ok_or(Error::ProverMissingSecret)?;
            let mut built = Vec::with_capacity(children.len());
            for (i, child) in children.iter().enumerate() {
                if i == real_idx {
                    built.push(build_real(child, &position.child(i), secrets, hints, rng)?);
                } else {
                    let e = Challenge::random(rng);
                    built.push(build_simulated(child, e, rng)?);
                }
            }
            Ok(BuildNode::Or { real_index: Some(real_idx), children: built, fixed: None })
        }

        SigmaBoolean::Threshold(k, children) => {
            let real_indices = find_real_indices(children, position, secrets, hints, *k as usize)
                .ok_or(Error::ProverMissingSecret)?;
            let mut built = Vec::with_capacity(children.len());
            let mut sim_points = Vec::new();
            for (i, child) in children.iter().enumerate() {
                if real_indices.contains(&i) {
                    built.push(build_real(child, &position.child(i), secrets, hints, rng)?);
                } else {
                    let e = Challenge::random(rng);
                    sim_points.push((i, e));
                    built.push(build_simulated(child, e, rng)?);
                }
            }
            Ok(BuildNode::Threshold {
                k: *k,
                real_indices,
                sim_points,
                poly: None,
                children: built,
                fixed: None,
            })
        }
    }
}

/// Fully simulates a subtree under an already-chosen `challenge`, top-down
/// (spec.md §4.G step 2: "distribute a freshly sampled challenge downward
/// using the same rules the verifier uses").
fn build_simulated(
    prop: &SigmaBoolean,
    challenge: Challenge,
    rng: &mut (impl RngCore + CryptoRng),
) -> Result<BuildNode, Error> {
    match prop {
        SigmaBoolean::Leaf(leaf) => {
            let schnorr = leaf.to_schnorr();
            let e = challenge.to_scalar_mod_q();
            let response = schnorr.simulate_response(rng);
            let points = schnorr.simulate_commitment(&e, &response)?;
            let commitment = wrap_commitment(leaf, &points);
            Ok(BuildNode::Leaf {
                leaf: leaf.clone(),
                commitment,
                real_state: None,
                fixed: Some((challenge, response[0])),
            })
        }

        SigmaBoolean::And(children) => {
            let built = children
                .iter()
                .map(|c| build_simulated(c, challenge, rng))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(BuildNode::And { children: built, fixed: Some(challenge) })
        }

        SigmaBoolean::Or(children) => {
            let n = children.len();
            let mut sub_challenges = Vec::with_capacity(n);
            for _ in 0..n.saturating_sub(1) {
                sub_challenges.push(Challenge::random(rng));
            }
            let mut xor_acc = challenge;
            for c in &sub_challenges {
                xor_acc = xor_acc ^ *c;
            }
            sub_challenges.push(xor_acc);
            let mut built = Vec::with_capacity(n);
            for (child, sub_e) in children.iter().zip(sub_challenges.iter()) {
                built.push(build_simulated(child, *sub_e, rng)?);
            }
            Ok(BuildNode::Or { real_index: None, children: built, fixed: Some(challenge) })
        }

        SigmaBoolean::Threshold(k, children) => {
            let n = children.len();
            let degree = n - *k as usize;
            let mut coeffs = vec![Gf2_192::from(challenge)];
            for _ in 0..degree {
                coeffs.push(Gf2_192([rng.next_u64(), rng.next_u64(), rng.next_u64()]));
            }
            let poly = Polynomial::from_coeffs(coeffs);
            let mut built = Vec::with_capacity(n);
            for (i, child) in children.iter().enumerate() {
                let child_challenge: Challenge = poly.evaluate((i + 1) as u8).into();
                built.push(build_simulated(child, child_challenge, rng)?);
            }
            Ok(BuildNode::Threshold {
                k: *k,
                real_indices: vec![],
                sim_points: vec![],
                poly: Some(poly),
                children: built,
                fixed: Some(challenge),
            })
        }
    }
}

/// Completes the tree given `challenge` (the challenge this node receives
/// from its parent, or the root challenge at the top), computing every
/// deferred response and deriving every deferred challenge.
fn finalize(node: BuildNode, challenge: Challenge) -> Result<UncheckedTree, Error> {
    match node {
        BuildNode::Leaf { leaf, commitment, real_state, fixed } => match fixed {
            Some((e, z)) => Ok(UncheckedTree::Leaf { leaf, challenge: e, response: z, commitment }),
            None => {
                let state = real_state.ok_or(Error::ProverMissingSecret)?;
                let schnorr = leaf.to_schnorr();
                let e_scalar = challenge.to_scalar_mod_q();
                let response = schnorr.prover_response(state, &e_scalar)?;
                Ok(UncheckedTree::Leaf { leaf, challenge, response: response[0], commitment })
            }
        },

        BuildNode::And { children, fixed } => {
            let node_challenge = fixed.unwrap_or(challenge);
            let mut finalized = Vec::with_capacity(children.len());
            for child in children {
                finalized.push(finalize(child, node_challenge)?);
            }
            Ok(UncheckedTree::And { challenge: node_challenge, children: finalized })
        }

        BuildNode::Or { real_index, children, fixed } => {
            let node_challenge = fixed.unwrap_or(challenge);
            match real_index {
                Some(r) => {
                    let mut xor_acc = node_challenge;
                    for (i, child) in children.iter().enumerate() {
                        if i != r {
                            let c = child.fixed_challenge().ok_or(Error::ProverMissingSecret)?;
                            xor_acc = xor_acc ^ c;
                        }
                    }
                    let mut finalized = Vec::with_capacity(children.len());
                    for (i, child) in children.into_iter().enumerate() {
                        let sub_challenge = if i == r { xor_acc } else { node_challenge };
                        finalized.push(finalize(child, sub_challenge)?);
                    }
                    Ok(UncheckedTree::Or { challenge: node_challenge, children: finalized })
                }
                None => {
                    let finalized = children
                        .into_iter()
                        .map(|c| finalize(c, node_challenge))
                        .collect::<Result<Vec<_>, _>>()?;
                    Ok(UncheckedTree::Or { challenge: node_challenge, children: finalized })
                }
            }
        }

        BuildNode::Threshold { real_indices: _, sim_points, poly, children, fixed, .. } => {
            let node_challenge = fixed.unwrap_or(challenge);
            let final_poly = match poly {
                Some(p) => p,
                None => {
                    let mut points: Vec<(u8, Gf2_192)> = vec![(0u8, Gf2_192::from(node_challenge))];
                    for (i, e) in &sim_points {
                        points.push(((*i + 1) as u8, Gf2_192::from(*e)));
                    }
                    Polynomial::interpolate(&points)?
                }
            };
            let mut finalized = Vec::with_capacity(children.len());
            for (i, child) in children.into_iter().enumerate() {
                let child_challenge: Challenge = final_poly.evaluate((i + 1) as u8).into();
                finalized.push(finalize(child, child_challenge)?);
            }
            Ok(UncheckedTree::Threshold { challenge: node_challenge, poly: final_poly, children: finalized })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proof_parser::parse_proof;
    use crate::proof_serializer::serialize_proof;
    use rand::rngs::OsRng;

    fn dlog(witness: Scalar) -> (SigmaBoolean, Scalar) {
        let h = group::exp(group::generator(), witness);
        (SigmaBoolean::Leaf(SigmaLeaf::ProveDlog { h }), witness)
    }

    #[test]
    fn single_leaf_proof_round_trips() {
        let mut rng = OsRng;
        let w = group::random_scalar(&mut rng);
        let (prop, witness) = dlog(w);
        let mut secrets = SecretSet::new();
        secrets.push(witness);

        let tree = prove(&prop, &secrets, &[], b"msg", &mut rng).unwrap();
        let bytes = serialize_proof(&tree).unwrap();
        assert_eq!(bytes.len(), CHALLENGE_BYTES + group::SCALAR_BYTES);

        let parsed = parse_proof(&prop, &bytes).unwrap();
        assert_eq!(parsed.challenge(), tree.challenge());
    }

    #[test]
    fn missing_secret_fails_atomically() {
        let mut rng = OsRng;
        let (prop, _witness) = dlog(group::random_scalar(&mut rng));
        let secrets = SecretSet::new();
        assert!(matches!(
            prove(&prop, &secrets, &[], b"msg", &mut rng),
            Err(Error::ProverMissingSecret)
        ));
    }

    #[test]
    fn and_of_two_known_secrets_has_88_byte_proof() {
        let mut rng = OsRng;
        let (leaf1, w1) = dlog(group::random_scalar(&mut rng));
        let (leaf2, w2) = dlog(group::random_scalar(&mut rng));
        let prop = SigmaBoolean::And(vec![leaf1, leaf2]);
        let secrets: SecretSet = vec![w1, w2].into_iter().collect();

        let tree = prove(&prop, &secrets, &[], b"msg", &mut rng).unwrap();
        let bytes = serialize_proof(&tree).unwrap();
        assert_eq!(bytes.len(), CHALLENGE_BYTES + 2 * group::SCALAR_BYTES);
    }

    #[test]
    fn or_with_one_known_secret_has_112_byte_proof() {
        let mut rng = OsRng;
        let (leaf1, w1) = dlog(group::random_scalar(&mut rng));
        let (leaf2, _unknown) = dlog(group::random_scalar(&mut rng));
        let prop = SigmaBoolean::Or(vec![leaf1, leaf2]);
        let mut secrets = SecretSet::new();
        secrets.push(w1);

        let tree = prove(&prop, &secrets, &[], b"msg", &mut rng).unwrap();
        let bytes = serialize_proof(&tree).unwrap();
        assert_eq!(bytes.len(), CHALLENGE_BYTES + (CHALLENGE_BYTES + group::SCALAR_BYTES) + group::SCALAR_BYTES);

        let parsed = parse_proof(&prop, &bytes).unwrap();
        assert_eq!(parsed.challenge(), tree.challenge());
    }

    #[test]
    fn threshold_two_of_three_proof_parses() {
        let mut rng = OsRng;
        let (leaf1, w1) = dlog(group::random_scalar(&mut rng));
        let (leaf2, w2) = dlog(group::random_scalar(&mut rng));
        let (leaf3, _unknown) = dlog(group::random_scalar(&mut rng));
        let prop = SigmaBoolean::Threshold(2, vec![leaf1, leaf2, leaf3]);
        let secrets: SecretSet = vec![w1, w2].into_iter().collect();

        let tree = prove(&prop, &secrets, &[], b"msg", &mut rng).unwrap();
        let bytes = serialize_proof(&tree).unwrap();
        // root challenge + (n-k)*CHALLENGE_BYTES poly + 3 responses, no per-child challenges
        assert_eq!(
            bytes.len(),
            CHALLENGE_BYTES + CHALLENGE_BYTES + 3 * group::SCALAR_BYTES
        );

        let parsed = parse_proof(&prop, &bytes).unwrap();
        assert_eq!(parsed.challenge(), tree.challenge());
    }
}
