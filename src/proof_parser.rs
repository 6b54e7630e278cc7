//! Proof parser and challenge derivation (spec.md §4.F): a single top-down
//! pass over proof bytes against an already-known proposition tree, reading
//! or deriving each node's challenge, reconstructing leaf commitments, and
//! interpolating threshold polynomials.

use crate::challenge::{Challenge, CHALLENGE_BYTES};
use crate::errors::Error;
use crate::group::{self, SCALAR_BYTES};
use crate::observer::{NodeKind, NoopObserver, Observer};
use crate::polynomial::{Gf2_192, Polynomial};
use crate::sigma_boolean::{SigmaBoolean, UncheckedTree};
use crate::sigma_leaf::{LeafCommitment, SigmaLeaf};
use crate::traits::SigmaProtocolSimulator;

/// Parses `data` against `prop`, reconstructing every leaf commitment and
/// deriving every node's challenge. Empty `data` parses to
/// [`UncheckedTree::NoProof`]. Any read past the end of `data` fails with
/// [`Error::MalformedProof`]; trailing unconsumed bytes are also rejected
/// (spec.md §8 "proof-parse determinism").
pub fn parse_proof(prop: &SigmaBoolean, data: &[u8]) -> Result<UncheckedTree, Error> {
    parse_proof_with(prop, data, &mut NoopObserver)
}

/// As [`parse_proof`], but reporting node visits to `observer` (spec.md §9's
/// operation-observer design note).
pub fn parse_proof_with(
    prop: &SigmaBoolean,
    data: &[u8],
    observer: &mut dyn Observer,
) -> Result<UncheckedTree, Error> {
    prop.validate()?;
    if data.is_empty() {
        return Ok(UncheckedTree::NoProof);
    }
    let (tree, remaining) = parse_node(prop, data, None, observer)?;
    if !remaining.is_empty() {
        return Err(Error::MalformedProof);
    }
    Ok(tree)
}

fn parse_node<'a>(
    prop: &SigmaBoolean,
    data: &'a [u8],
    incoming: Option<Challenge>,
    observer: &mut dyn Observer,
) -> Result<(UncheckedTree, &'a [u8]), Error> {
    let (challenge, rest) = match incoming {
        Some(c) => (c, data),
        None => Challenge::read(data)?,
    };

    match prop {
        SigmaBoolean::Leaf(leaf) => {
            observer.enter_node(NodeKind::Leaf);
            let (z_bytes, rest2) = split_scalar(rest)?;
            let z = group::decode_scalar(&z_bytes)?;
            let schnorr = leaf.to_schnorr();
            let e = challenge.to_scalar_mod_q();
            let points = schnorr
                .simulate_commitment(&e, &vec![z])
                .map_err(|_| Error::MalformedProof)?;
            let commitment = match leaf {
                SigmaLeaf::ProveDlog { .. } => LeafCommitment::Dlog(points[0]),
                SigmaLeaf::ProveDHTuple { .. } => LeafCommitment::DHTuple(points[0], points[1]),
            };
            observer.leave_node(NodeKind::Leaf);
            Ok((
                UncheckedTree::Leaf {
                    leaf: leaf.clone(),
                    challenge,
                    response: z,
                    commitment,
                },
                rest2,
            ))
        }

        SigmaBoolean::And(children) => {
            observer.enter_node(NodeKind::And);
            let mut parsed = Vec::with_capacity(children.len());
            let mut cursor = rest;
            for child in children {
                let (node, remaining) = parse_node(child, cursor, Some(challenge), observer)?;
                parsed.push(node);
                cursor = remaining;
            }
            observer.leave_node(NodeKind::And);
            Ok((UncheckedTree::And { challenge, children: parsed }, cursor))
        }

        SigmaBoolean::Or(children) => {
            observer.enter_node(NodeKind::Or);
            if children.len() < 2 {
                return Err(Error::InvalidProposition("OR node requires at least two children"));
            }
            let mut parsed = Vec::with_capacity(children.len());
            let mut cursor = rest;
            let mut xor_acc = challenge;
            let (last, rest_children) = children.split_last().expect("checked len >= 2");
            for child in rest_children {
                let (node, remaining) = parse_node(child, cursor, None, observer)?;
                let child_challenge = node.challenge().ok_or(Error::MalformedProof)?;
                xor_acc = xor_acc ^ child_challenge;
                parsed.push(node);
                cursor = remaining;
            }
            let (node, remaining) = parse_node(last, cursor, Some(xor_acc), observer)?;
            parsed.push(node);
            observer.leave_node(NodeKind::Or);
            Ok((UncheckedTree::Or { challenge, children: parsed }, remaining))
        }

        SigmaBoolean::Threshold(k, children) => {
            observer.enter_node(NodeKind::Threshold);
            let n = children.len();
            if n > 255 || *k == 0 || (*k as usize) > n {
                return Err(Error::InvalidProposition(
                    "threshold k must satisfy 1 <= k <= children.len() <= 255",
                ));
            }
            let poly_len = (n - *k as usize) * CHALLENGE_BYTES;
            if rest.len() < poly_len {
                return Err(Error::MalformedProof);
            }
            let (poly_bytes, body) = rest.split_at(poly_len);
            let poly = Polynomial::from_bytes(Gf2_192::from(challenge), poly_bytes)?;

            let mut parsed = Vec::with_capacity(n);
            let mut cursor = body;
            for (i, child) in children.iter().enumerate() {
                let child_challenge: Challenge = poly.evaluate((i + 1) as u8).into();
                let (node, remaining) = parse_node(child, cursor, Some(child_challenge), observer)?;
                parsed.push(node);
                cursor = remaining;
            }
            observer.leave_node(NodeKind::Threshold);
            Ok((UncheckedTree::Threshold { challenge, poly, children: parsed }, cursor))
        }
    }
}

fn split_scalar(data: &[u8]) -> Result<([u8; SCALAR_BYTES], &[u8]), Error> {
    if data.len() < SCALAR_BYTES {
        return Err(Error::MalformedProof);
    }
    let (head, tail) = data.split_at(SCALAR_BYTES);
    let mut arr = [0u8; SCALAR_BYTES];
    arr.copy_from_slice(head);
    Ok((arr, tail))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_proof_is_no_proof() {
        let leaf = SigmaBoolean::Leaf(SigmaLeaf::ProveDlog { h: group::generator() });
        assert!(matches!(parse_proof(&leaf, &[]).unwrap(), UncheckedTree::NoProof));
    }

    #[test]
    fn truncated_leaf_is_malformed() {
        let leaf = SigmaBoolean::Leaf(SigmaLeaf::ProveDlog { h: group::generator() });
        let short = vec![0u8; CHALLENGE_BYTES + SCALAR_BYTES - 1];
        assert!(matches!(parse_proof(&leaf, &short), Err(Error::MalformedProof)));
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let leaf = SigmaBoolean::Leaf(SigmaLeaf::ProveDlog { h: group::generator() });
        let mut bytes = vec![0u8; CHALLENGE_BYTES + SCALAR_BYTES];
        bytes.push(0xff);
        assert!(matches!(parse_proof(&leaf, &bytes), Err(Error::MalformedProof)));
    }
}
