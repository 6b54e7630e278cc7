//! Implementation of the generic Schnorr Sigma Protocol over a [`Group`].
//!
//! This module defines the [`SchnorrProof`] structure, which implements
//! a Sigma protocol proving different types of discrete logarithm relations (eg. Schnorr, Pedersen's commitments)
//! through a group morphism abstraction (see [Maurer09](https://crypto-test.ethz.ch/publications/files/Maurer09.pdf)).
//!
//! Both sigma-tree leaves (`ProveDlog` and `ProveDHTuple`, see
//! [`crate::sigma_leaf`]) are expressed as a [`LinearRelation`] with one or
//! two equations respectively, so this single generic protocol serves both.

use crate::errors::Error;
use crate::linear_relation::LinearRelation;
use crate::traits::{SigmaProtocol, SigmaProtocolSimulator};

use ff::Field;
use group::{Group, GroupEncoding};
use rand::{CryptoRng, Rng, RngCore};

/// A Schnorr protocol proving knowledge of a witness for a linear group relation.
///
/// This implementation generalizes Schnorr's discrete logarithm proof by using
/// a [`LinearRelation`], representing an abstract linear relation over the group.
///
/// # Type Parameters
/// - `G`: A cryptographic group implementing [`Group`] and [`GroupEncoding`].
#[derive(Clone, Default, Debug)]
pub struct SchnorrProof<G: Group + GroupEncoding>(pub LinearRelation<G>);

impl<G: Group + GroupEncoding> SchnorrProof<G> {
    pub fn witness_length(&self) -> usize {
        self.0.linear_map.num_scalars
    }

    pub fn commitment_length(&self) -> usize {
        self.0.linear_map.num_constraints()
    }
}

impl<G> From<LinearRelation<G>> for SchnorrProof<G>
where
    G: Group + GroupEncoding,
{
    fn from(value: LinearRelation<G>) -> Self {
        Self(value)
    }
}

impl<G> SigmaProtocol for SchnorrProof<G>
where
    G: Group + GroupEncoding,
{
    type Commitment = Vec<G>;
    type ProverState = (Vec<<G as Group>::Scalar>, Vec<<G as Group>::Scalar>);
    type Response = Vec<<G as Group>::Scalar>;
    type Witness = Vec<<G as Group>::Scalar>;
    type Challenge = <G as Group>::Scalar;

    /// Prover's first message: generates a commitment using random nonces.
    ///
    /// # Errors
    /// -[`Error::InvalidInstanceWitnessPair`] if the witness vector length is incorrect.
    fn prover_commit(
        &self,
        witness: &Self::Witness,
        mut rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<(Self::Commitment, Self::ProverState), Error> {
        if witness.len() != self.witness_length() {
            return Err(Error::InvalidInstanceWitnessPair);
        }

        let nonces: Vec<G::Scalar> = (0..self.witness_length())
            .map(|_| G::Scalar::random(&mut rng))
            .collect();
        let commitment = self.0.linear_map.evaluate(&nonces)?;
        let prover_state = (nonces, witness.clone());
        Ok((commitment, prover_state))
    }

    /// Computes the prover's response (second message) using the challenge.
    ///
    /// # Errors
    /// - Returns [`Error::InvalidInstanceWitnessPair`] if the prover state vectors have incorrect lengths.
    fn prover_response(
        &self,
        prover_state: Self::ProverState,
        challenge: &Self::Challenge,
    ) -> Result<Self::Response, Error> {
        let (nonces, witness) = prover_state;

        if nonces.len() != self.witness_length() || witness.len() != self.witness_length() {
            return Err(Error::InvalidInstanceWitnessPair);
        }

        let responses = nonces
            .into_iter()
            .zip(witness)
            .map(|(r, w)| r + w * challenge)
            .collect();
        Ok(responses)
    }

    /// Verifies the correctness of the proof.
    ///
    /// # Errors
    /// -[`Error::VerificationFailure`] if the computed relation
    /// does not hold for the provided challenge and response, indicating proof invalidity.
    /// -[`Error::InvalidInstanceWitnessPair`] if the commitment or response length is incorrect.
    fn verifier(
        &self,
        commitment: &Self::Commitment,
        challenge: &Self::Challenge,
        response: &Self::Response,
    ) -> Result<(), Error> {
        if commitment.len() != self.commitment_length() || response.len() != self.witness_length() {
            return Err(Error::InvalidInstanceWitnessPair);
        }

        let lhs = self.0.linear_map.evaluate(response)?;
        let mut rhs = Vec::new();
        for (i, g) in commitment.iter().enumerate() {
            rhs.push({
                let image_var = self.0.image[i];
                self.0.linear_map.group_elements.get(image_var)? * challenge + g
            });
        }
        if lhs == rhs {
            Ok(())
        } else {
            Err(Error::VerificationFailure)
        }
    }
}

impl<G> SigmaProtocolSimulator for SchnorrProof<G>
where
    G: Group + GroupEncoding,
{
    /// Simulates a valid transcript for a given challenge without a witness.
    fn simulate_response<R: Rng + CryptoRng>(&self, mut rng: &mut R) -> Self::Response {
        (0..self.witness_length())
            .map(|_| G::Scalar::random(&mut rng))
            .collect()
    }

    /// Simulates a full proof transcript using a randomly generated challenge.
    fn simulate_transcript<R: Rng + CryptoRng>(
        &self,
        rng: &mut R,
    ) -> Result<(Self::Commitment, Self::Challenge, Self::Response), Error> {
        let challenge = G::Scalar::random(&mut *rng);
        let response = self.simulate_response(&mut *rng);
        let commitment = self.simulate_commitment(&challenge, &response)?;
        Ok((commitment, challenge, response))
    }

    /// Recomputes the commitment from the challenge and response (used in compact proofs).
    ///
    /// # Errors
    /// - [`Error::InvalidInstanceWitnessPair`] if the response length does not match the expected number of scalars.
    fn simulate_commitment(
        &self,
        challenge: &Self::Challenge,
        response: &Self::Response,
    ) -> Result<Self::Commitment, Error> {
        if response.len() != self.witness_length() {
            return Err(Error::InvalidInstanceWitnessPair);
        }

        let response_image = self.0.linear_map.evaluate(response)?;
        let image = self.0.image()?;

        let commitment = response_image
            .iter()
            .zip(&image)
            .map(|(res, img)| *res - *img * challenge)
            .collect::<Vec<_>>();
        Ok(commitment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k256::ProjectivePoint as G;
    use rand::rngs::OsRng;

    #[test]
    fn dlog_commit_respond_verify_round_trip() {
        let mut rng = OsRng;
        let mut relation = LinearRelation::<G>::new();
        let [x] = relation.allocate_scalars::<1>();
        let [g, h] = relation.allocate_elements::<2>();
        relation.append_equation(h, [x * g]);

        let base = G::generator();
        let w = <G as Group>::Scalar::random(&mut rng);
        let image = base * w;
        relation.set_elements([(g, base), (h, image)]);

        let proof = SchnorrProof(relation);
        let witness = vec![w];
        let (commitment, state) = proof.prover_commit(&witness, &mut rng).unwrap();
        let challenge = <G as Group>::Scalar::random(&mut rng);
        let response = proof.prover_response(state, &challenge).unwrap();
        assert!(proof.verifier(&commitment, &challenge, &response).is_ok());
    }
}
