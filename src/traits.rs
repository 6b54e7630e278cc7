//! Core sigma-protocol traits: the three-message commit/challenge/respond
//! interface (`SigmaProtocol`) and its honest-verifier simulator
//! (`SigmaProtocolSimulator`), implemented by
//! [`crate::schnorr_protocol::SchnorrProof`] and driven by
//! [`crate::prover`]/[`crate::verifier`].

use crate::errors::Error;
use rand::{CryptoRng, Rng, RngCore};

/// The three-message interface of a Sigma protocol: commit, respond, verify.
pub trait SigmaProtocol {
    /// The prover's first message.
    type Commitment: Clone;
    /// State carried from `prover_commit` to `prover_response`.
    type ProverState;
    /// The prover's second message.
    type Response: Clone;
    /// The secret input to the protocol.
    type Witness;
    /// The verifier's (or Fiat-Shamir-derived) challenge.
    type Challenge: Copy + PartialEq;

    /// Prover's first message: commits to randomness consistent with `witness`.
    fn prover_commit(
        &self,
        witness: &Self::Witness,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<(Self::Commitment, Self::ProverState), Error>;

    /// Prover's second message: responds to `challenge` using the state from `prover_commit`.
    fn prover_response(
        &self,
        state: Self::ProverState,
        challenge: &Self::Challenge,
    ) -> Result<Self::Response, Error>;

    /// Checks that `(commitment, challenge, response)` is a valid transcript.
    fn verifier(
        &self,
        commitment: &Self::Commitment,
        challenge: &Self::Challenge,
        response: &Self::Response,
    ) -> Result<(), Error>;
}

/// Honest-verifier zero-knowledge simulation, the capability that lets a
/// prover "fake" a transcript for a branch it does not know the witness for
/// (used by OR/THRESHOLD composition, §4.G step 2).
pub trait SigmaProtocolSimulator: SigmaProtocol {
    /// Samples a uniformly random response, as used when simulating a branch.
    fn simulate_response<R: Rng + CryptoRng>(&self, rng: &mut R) -> Self::Response;

    /// Samples a full `(commitment, challenge, response)` transcript that
    /// verifies, without using a witness.
    fn simulate_transcript<R: Rng + CryptoRng>(
        &self,
        rng: &mut R,
    ) -> Result<(Self::Commitment, Self::Challenge, Self::Response), Error>;

    /// Recomputes the commitment implied by a `(challenge, response)` pair.
    /// This is what lets the compact wire format omit commitments entirely.
    fn simulate_commitment(
        &self,
        challenge: &Self::Challenge,
        response: &Self::Response,
    ) -> Result<Self::Commitment, Error>;
}
