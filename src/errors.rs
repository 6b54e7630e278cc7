//! Error types for sigma-protocol composition, serialization and verification.
//!
//! Errors fall into the three classes described by the design: input-shape
//! errors (never leave a half-built tree behind), cryptographic-failure
//! errors (`InvalidSignature` / `InvalidEncoding`, which must not leak which
//! subtree failed beyond what proof structure already reveals), and
//! programmer errors (fail fast, distinct from the other two).

use crate::linear_relation::GroupVar;
use thiserror::Error;

/// Errors produced by linear-relation evaluation, sigma-tree composition,
/// proof (de)serialization, and box/register encoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // --- carried over from the generic linear-relation / Schnorr machinery ---
    /// A [`GroupVar`] was referenced before a group element was assigned to it.
    #[error("group variable {var:?} was never assigned a value")]
    UnassignedGroupVar {
        /// The offending variable.
        var: GroupVar,
    },

    /// A witness, commitment or response vector did not match the expected
    /// number of scalars/points for the instance.
    #[error("witness/commitment/response length does not match the statement")]
    InvalidInstanceWitnessPair,

    /// A sigma-protocol transcript failed its algebraic check.
    #[error("sigma-protocol verification equation did not hold")]
    VerificationFailure,

    // --- §6 "Error codes exposed to callers" ---
    /// Proof bytes were truncated, too short, or otherwise could not be
    /// parsed into the shape the proposition tree demands.
    #[error("proof bytes are malformed or truncated")]
    MalformedProof,

    /// The Fiat-Shamir challenge recomputed from a parsed proof did not
    /// match the root challenge carried in the proof.
    #[error("signature/proof does not verify against the statement and message")]
    InvalidSignature,

    /// A 33-byte point or `order`-byte scalar encoding was not well-formed
    /// (bad leading byte, point not on curve, or out-of-range scalar).
    #[error("invalid point or scalar encoding")]
    InvalidEncoding,

    /// A `SigmaBoolean` tree violated a structural invariant (e.g. a
    /// `Threshold` node with `k` out of `1..=children.len()`, or an `And`/`Or`
    /// with fewer than two children).
    #[error("proposition tree is structurally invalid: {0}")]
    InvalidProposition(&'static str),

    /// Serialized box exceeded the 4 KiB size cap.
    #[error("serialized box exceeds the 4 KiB size limit ({0} bytes)")]
    OversizeBox(usize),

    /// Non-mandatory registers were not densely packed from R4 upward.
    #[error("registers are not densely packed starting at R4")]
    PackingViolation,

    /// A box declared more than 255 tokens.
    #[error("box declares more than 255 tokens")]
    TooManyTokens,

    /// A non-mandatory register index fell outside R4..R9.
    #[error("register index out of the R4..=R9 range")]
    RegisterOverflow,

    /// The prover was asked to produce a real proof for a leaf (or enough
    /// leaves of an OR/THRESHOLD) without a matching secret or hint.
    #[error("no secret or hint available for a leaf that must be proved real")]
    ProverMissingSecret,
}
