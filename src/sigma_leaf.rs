//! Leaf statements (spec.md §3/§4.C): `ProveDlog` and `ProveDHTuple`, each
//! expressed as a [`LinearRelation`] over one or two equations respectively,
//! so [`crate::schnorr_protocol::SchnorrProof`] (generic `Group` Schnorr,
//! grounded on the teacher's own `dlog_commit_respond_verify_round_trip`
//! shape) serves both without a separate code path.

use crate::group::EcPoint;
use crate::linear_relation::LinearRelation;
use crate::schnorr_protocol::SchnorrProof;
use group::Group;

/// A leaf statement of a sigma-protocol proposition tree.
#[derive(Clone, Debug, PartialEq)]
pub enum SigmaLeaf {
    /// "I know `w` with `g^w = h`."
    ProveDlog {
        /// The public image.
        h: EcPoint,
    },
    /// "I know `w` with `u = g^w` and `v = h^w`."
    ProveDHTuple {
        /// First base.
        g: EcPoint,
        /// Second base.
        h: EcPoint,
        /// First image.
        u: EcPoint,
        /// Second image.
        v: EcPoint,
    },
}

/// The leaf's reconstructed commitment (the value a verifier recomputes
/// from `(challenge, response)` alone, per spec.md §4.C).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LeafCommitment {
    /// `a = g^z \cdot h^{-e}`.
    Dlog(EcPoint),
    /// `(a, b) = (g^z \cdot u^{-e}, h^z \cdot v^{-e})`.
    DHTuple(EcPoint, EcPoint),
}

impl LeafCommitment {
    /// The commitment's group elements, in the depth-first Fiat-Shamir
    /// commitment ordering spec.md §6 requires.
    pub fn elements(&self) -> Vec<EcPoint> {
        match self {
            LeafCommitment::Dlog(a) => vec![*a],
            LeafCommitment::DHTuple(a, b) => vec![*a, *b],
        }
    }
}

impl SigmaLeaf {
    /// Builds the generic Schnorr protocol instance for this leaf: one
    /// equation `h = w*g` for `ProveDlog`, two equations `u = w*g, v = w*h`
    /// (sharing the single witness scalar `w`) for `ProveDHTuple`.
    pub fn to_schnorr(&self) -> SchnorrProof<EcPoint> {
        let mut relation = LinearRelation::<EcPoint>::new();
        match self {
            SigmaLeaf::ProveDlog { h } => {
                let [w] = relation.allocate_scalars::<1>();
                let [g_var, h_var] = relation.allocate_elements::<2>();
                relation.append_equation(h_var, [w * g_var]);
                relation.set_elements([(g_var, crate::group::generator()), (h_var, *h)]);
            }
            SigmaLeaf::ProveDHTuple { g, h, u, v } => {
                let [w] = relation.allocate_scalars::<1>();
                let [g_var, h_var, u_var, v_var] = relation.allocate_elements::<4>();
                relation.append_equation(u_var, [w * g_var]);
                relation.append_equation(v_var, [w * h_var]);
                relation.set_elements([
                    (g_var, *g),
                    (h_var, *h),
                    (u_var, *u),
                    (v_var, *v),
                ]);
            }
        }
        SchnorrProof::from(relation)
    }

    /// The leaf's own group elements, used by [`crate::sigma_boolean`] to
    /// produce the proposition bytes fed to Fiat-Shamir (spec.md §6).
    pub fn elements(&self) -> Vec<EcPoint> {
        match self {
            SigmaLeaf::ProveDlog { h } => vec![*h],
            SigmaLeaf::ProveDHTuple { g, h, u, v } => vec![*g, *h, *u, *v],
        }
    }

    /// Whether `witness` (as a group element `g^witness`) matches this
    /// leaf's image, i.e. whether this leaf can be proved REAL with it.
    pub fn matches_witness(&self, witness: &crate::group::Scalar) -> bool {
        match self {
            SigmaLeaf::ProveDlog { h } => crate::group::exp(crate::group::generator(), *witness) == *h,
            SigmaLeaf::ProveDHTuple { g, h, u, v } => {
                crate::group::exp(*g, *witness) == *u && crate::group::exp(*h, *witness) == *v
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::SigmaProtocol;
    use ff::Field;
    use rand::rngs::OsRng;

    #[test]
    fn dlog_leaf_round_trips() {
        let mut rng = OsRng;
        let w = crate::group::random_scalar(&mut rng);
        let h = crate::group::exp(crate::group::generator(), w);
        let leaf = SigmaLeaf::ProveDlog { h };
        assert!(leaf.matches_witness(&w));

        let protocol = leaf.to_schnorr();
        let (commitment, state) = protocol.prover_commit(&vec![w], &mut rng).unwrap();
        let e = crate::group::random_scalar(&mut rng);
        let response = protocol.prover_response(state, &e).unwrap();
        assert!(protocol.verifier(&commitment, &e, &response).is_ok());
    }

    #[test]
    fn dhtuple_leaf_shares_one_witness() {
        let mut rng = OsRng;
        let w = crate::group::random_scalar(&mut rng);
        let g = crate::group::generator();
        let h = crate::group::exp(g, crate::group::random_scalar(&mut rng));
        let u = crate::group::exp(g, w);
        let v = crate::group::exp(h, w);
        let leaf = SigmaLeaf::ProveDHTuple { g, h, u, v };
        assert!(leaf.matches_witness(&w));
        assert_eq!(leaf.to_schnorr().witness_length(), 1);
        assert_eq!(leaf.to_schnorr().commitment_length(), 2);
    }
}
