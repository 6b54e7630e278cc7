//! Proof serializer (spec.md §4.E): emits proof bytes for a completed
//! unchecked tree, writing only the challenges a verifier cannot recompute.

use crate::errors::Error;
use crate::group;
use crate::sigma_boolean::UncheckedTree;

/// Serializes a completed unchecked tree to its compact proof bytes.
/// [`UncheckedTree::NoProof`] serializes to zero bytes.
pub fn serialize_proof(tree: &UncheckedTree) -> Result<Vec<u8>, Error> {
    if matches!(tree, UncheckedTree::NoProof) {
        return Ok(Vec::new());
    }
    let mut out = Vec::new();
    let root_challenge = tree.challenge().ok_or(Error::MalformedProof)?;
    out.extend(root_challenge.as_bytes());
    write_body(tree, &mut out)?;
    Ok(out)
}

fn write_body(node: &UncheckedTree, out: &mut Vec<u8>) -> Result<(), Error> {
    match node {
        UncheckedTree::NoProof => Ok(()),

        UncheckedTree::Leaf { response, .. } => {
            out.extend(group::encode_scalar(response));
            Ok(())
        }

        UncheckedTree::And { children, .. } => {
            for child in children {
                write_body(child, out)?;
            }
            Ok(())
        }

        UncheckedTree::Or { children, .. } => {
            let (last, rest) = children
                .split_last()
                .ok_or(Error::InvalidProposition("OR node has no children"))?;
            for child in rest {
                let challenge = child.challenge().ok_or(Error::MalformedProof)?;
                out.extend(challenge.as_bytes());
                write_body(child, out)?;
            }
            write_body(last, out)
        }

        UncheckedTree::Threshold { poly, children, .. } => {
            out.extend(poly.to_bytes(false));
            for child in children {
                write_body(child, out)?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::challenge::{Challenge, CHALLENGE_BYTES};
    use crate::group::{self, SCALAR_BYTES};
    use crate::sigma_leaf::{LeafCommitment, SigmaLeaf};

    fn dummy_leaf() -> UncheckedTree {
        UncheckedTree::Leaf {
            leaf: SigmaLeaf::ProveDlog { h: group::generator() },
            challenge: Challenge::ZERO,
            response: group::Scalar::from(7u64),
            commitment: LeafCommitment::Dlog(group::generator()),
        }
    }

    #[test]
    fn no_proof_serializes_empty() {
        assert!(serialize_proof(&UncheckedTree::NoProof).unwrap().is_empty());
    }

    #[test]
    fn and_of_two_leaves_has_expected_length() {
        let tree = UncheckedTree::And {
            challenge: Challenge::ZERO,
            children: vec![dummy_leaf(), dummy_leaf()],
        };
        let bytes = serialize_proof(&tree).unwrap();
        assert_eq!(bytes.len(), CHALLENGE_BYTES + 2 * SCALAR_BYTES);
    }

    #[test]
    fn or_writes_one_fewer_challenge_than_children() {
        let tree = UncheckedTree::Or {
            challenge: Challenge::ZERO,
            children: vec![dummy_leaf(), dummy_leaf()],
        };
        let bytes = serialize_proof(&tree).unwrap();
        // root challenge + (child challenge + response) + response
        assert_eq!(bytes.len(), CHALLENGE_BYTES + (CHALLENGE_BYTES + SCALAR_BYTES) + SCALAR_BYTES);
    }
}
