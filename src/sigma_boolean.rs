//! The sigma-protocol proposition tree and its "unchecked" (annotated)
//! counterpart (spec.md §3/§4.C), plus the supplementary `NodePosition` /
//! `Hint` types used by [`crate::prover`] for multi-party signing.

use crate::challenge::Challenge;
use crate::errors::Error;
use crate::group::Scalar;
use crate::polynomial::Polynomial;
use crate::sigma_leaf::{LeafCommitment, SigmaLeaf};

/// A proposition tree: leaves combined under AND / OR / k-of-n THRESHOLD.
///
/// The sum type is closed (spec.md §9 "Polymorphism"): every consumer
/// dispatches exhaustively rather than extending the variant set.
#[derive(Clone, Debug, PartialEq)]
pub enum SigmaBoolean {
    /// A single `ProveDlog` or `ProveDHTuple` statement.
    Leaf(SigmaLeaf),
    /// Conjunction: every child must hold.
    And(Vec<SigmaBoolean>),
    /// Disjunction: at least one child must hold.
    Or(Vec<SigmaBoolean>),
    /// `k`-of-`n`: at least `k` of `children` must hold.
    Threshold(u8, Vec<SigmaBoolean>),
}

impl SigmaBoolean {
    /// Checks the structural invariants from spec.md §3: `And`/`Or` have at
    /// least two children, `Threshold`'s `k` is in `1..=children.len()<=255`.
    pub fn validate(&self) -> Result<(), Error> {
        match self {
            SigmaBoolean::Leaf(_) => Ok(()),
            SigmaBoolean::And(children) | SigmaBoolean::Or(children) => {
                if children.len() < 2 {
                    return Err(Error::InvalidProposition(
                        "AND/OR nodes require at least two children",
                    ));
                }
                children.iter().try_for_each(SigmaBoolean::validate)
            }
            SigmaBoolean::Threshold(k, children) => {
                let n = children.len();
                if n > 255 || *k == 0 || (*k as usize) > n {
                    return Err(Error::InvalidProposition(
                        "threshold k must satisfy 1 <= k <= children.len() <= 255",
                    ));
                }
                children.iter().try_for_each(SigmaBoolean::validate)
            }
        }
    }

    /// This node's children, empty for a leaf.
    pub fn children(&self) -> &[SigmaBoolean] {
        match self {
            SigmaBoolean::Leaf(_) => &[],
            SigmaBoolean::And(c) | SigmaBoolean::Or(c) | SigmaBoolean::Threshold(_, c) => c,
        }
    }

    /// The proposition bytes fed into the Fiat-Shamir transcript (spec.md
    /// §6), a tagged-variant recursive encoding (self-delimiting: each
    /// variant's tag determines how many further bytes it consumes).
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write_bytes(&mut out);
        out
    }

    fn write_bytes(&self, out: &mut Vec<u8>) {
        match self {
            SigmaBoolean::Leaf(SigmaLeaf::ProveDlog { h }) => {
                out.push(0);
                out.extend(crate::group::encode_point(h));
            }
            SigmaBoolean::Leaf(SigmaLeaf::ProveDHTuple { g, h, u, v }) => {
                out.push(1);
                for p in [g, h, u, v] {
                    out.extend(crate::group::encode_point(p));
                }
            }
            SigmaBoolean::And(children) => {
                out.push(2);
                out.push(children.len() as u8);
                for c in children {
                    c.write_bytes(out);
                }
            }
            SigmaBoolean::Or(children) => {
                out.push(3);
                out.push(children.len() as u8);
                for c in children {
                    c.write_bytes(out);
                }
            }
            SigmaBoolean::Threshold(k, children) => {
                out.push(4);
                out.push(*k);
                out.push(children.len() as u8);
                for c in children {
                    c.write_bytes(out);
                }
            }
        }
    }

    /// This subtree's leaves, depth-first left-to-right — the order spec.md
    /// §5/§6 requires for both parsing and the Fiat-Shamir commitment input.
    pub fn leaves(&self) -> Vec<&SigmaLeaf> {
        match self {
            SigmaBoolean::Leaf(l) => vec![l],
            SigmaBoolean::And(c) | SigmaBoolean::Or(c) | SigmaBoolean::Threshold(_, c) => {
                c.iter().flat_map(SigmaBoolean::leaves).collect()
            }
        }
    }
}

/// A child-index path identifying a node within a proposition tree (the
/// root is the empty path), used to attach [`Hint`]s to specific nodes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct NodePosition(pub Vec<usize>);

impl NodePosition {
    /// The root position.
    pub fn root() -> Self {
        NodePosition(Vec::new())
    }

    /// The position of this node's `i`-th child.
    pub fn child(&self, i: usize) -> Self {
        let mut path = self.0.clone();
        path.push(i);
        NodePosition(path)
    }
}

/// Externally supplied information the prover uses in place of (or
/// alongside) an owned secret, for distributed/multi-party signing — a
/// supplementary feature beyond a single-prover walkthrough.
#[derive(Clone, Debug)]
pub enum Hint {
    /// A witness scalar for the leaf at `position`, marking it REAL.
    RealSecret {
        /// The leaf this hint applies to.
        position: NodePosition,
        /// The witness scalar.
        witness: Scalar,
    },
    /// A commitment (and its randomness) produced out of band for the leaf
    /// at `position`, e.g. by another party in a threshold signature.
    RealCommitment {
        /// The leaf this hint applies to.
        position: NodePosition,
        /// The externally produced commitment.
        commitment: LeafCommitment,
        /// The randomness the commitment was built from.
        randomness: Scalar,
    },
}

/// The sigma tree annotated with challenges, responses, and (after parsing
/// or proving) reconstructed leaf commitments — spec.md §3's "UncheckedTree".
#[derive(Clone, Debug)]
pub enum UncheckedTree {
    /// The sentinel for an empty proof.
    NoProof,
    /// A leaf with its challenge, response, and reconstructed commitment.
    Leaf {
        /// The leaf statement.
        leaf: SigmaLeaf,
        /// This leaf's challenge.
        challenge: Challenge,
        /// This leaf's response scalar.
        response: Scalar,
        /// The commitment reconstructed from `(challenge, response)`.
        commitment: LeafCommitment,
    },
    /// A conjunction node; every child's challenge equals `challenge`.
    And {
        /// This node's challenge.
        challenge: Challenge,
        /// The annotated children.
        children: Vec<UncheckedTree>,
    },
    /// A disjunction node; the XOR of all children's challenges equals `challenge`.
    Or {
        /// This node's challenge.
        challenge: Challenge,
        /// The annotated children.
        children: Vec<UncheckedTree>,
    },
    /// A threshold node; `poly.evaluate(i+1)` is child `i`'s challenge and
    /// `poly.constant_term()` equals `challenge`.
    Threshold {
        /// This node's challenge.
        challenge: Challenge,
        /// The interpolating GF(2^192) polynomial.
        poly: Polynomial,
        /// The annotated children.
        children: Vec<UncheckedTree>,
    },
}

impl UncheckedTree {
    /// This node's challenge, or `None` for [`UncheckedTree::NoProof`].
    pub fn challenge(&self) -> Option<Challenge> {
        match self {
            UncheckedTree::NoProof => None,
            UncheckedTree::Leaf { challenge, .. }
            | UncheckedTree::And { challenge, .. }
            | UncheckedTree::Or { challenge, .. }
            | UncheckedTree::Threshold { challenge, .. } => Some(*challenge),
        }
    }

    /// This node's children, empty for a leaf or [`UncheckedTree::NoProof`].
    pub fn children(&self) -> &[UncheckedTree] {
        match self {
            UncheckedTree::NoProof | UncheckedTree::Leaf { .. } => &[],
            UncheckedTree::And { children, .. }
            | UncheckedTree::Or { children, .. }
            | UncheckedTree::Threshold { children, .. } => children,
        }
    }

    /// This subtree's leaf commitments, depth-first left-to-right — the
    /// order the Fiat-Shamir root challenge is computed over.
    pub fn leaf_commitments(&self) -> Vec<LeafCommitment> {
        match self {
            UncheckedTree::NoProof => vec![],
            UncheckedTree::Leaf { commitment, .. } => vec![*commitment],
            UncheckedTree::And { children, .. }
            | UncheckedTree::Or { children, .. }
            | UncheckedTree::Threshold { children, .. } => {
                children.iter().flat_map(UncheckedTree::leaf_commitments).collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::{self, EcPoint};

    fn dlog_leaf(seed: u64) -> SigmaBoolean {
        let w = group::Scalar::from(seed);
        let h: EcPoint = group::exp(group::generator(), w);
        SigmaBoolean::Leaf(SigmaLeaf::ProveDlog { h })
    }

    #[test]
    fn and_or_reject_single_child() {
        let single = vec![dlog_leaf(1)];
        assert!(SigmaBoolean::And(single.clone()).validate().is_err());
        assert!(SigmaBoolean::Or(single).validate().is_err());
    }

    #[test]
    fn threshold_rejects_out_of_range_k() {
        let children = vec![dlog_leaf(1), dlog_leaf(2), dlog_leaf(3)];
        assert!(SigmaBoolean::Threshold(0, children.clone()).validate().is_err());
        assert!(SigmaBoolean::Threshold(4, children).validate().is_err());
    }

    #[test]
    fn threshold_accepts_in_range_k() {
        let children = vec![dlog_leaf(1), dlog_leaf(2), dlog_leaf(3)];
        assert!(SigmaBoolean::Threshold(2, children).validate().is_ok());
    }

    #[test]
    fn distinct_trees_encode_differently() {
        let a = SigmaBoolean::And(vec![dlog_leaf(1), dlog_leaf(2)]);
        let b = SigmaBoolean::Or(vec![dlog_leaf(1), dlog_leaf(2)]);
        assert_ne!(a.to_bytes(), b.to_bytes());
    }

    #[test]
    fn leaves_are_depth_first() {
        let tree = SigmaBoolean::And(vec![
            dlog_leaf(1),
            SigmaBoolean::Or(vec![dlog_leaf(2), dlog_leaf(3)]),
        ]);
        assert_eq!(tree.leaves().len(), 3);
    }
}
