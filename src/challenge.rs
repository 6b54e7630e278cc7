//! The Fiat-Shamir challenge type (spec.md §3): a fixed-width byte string
//! equipped with XOR, used both as the OR-node composition law and as the
//! constant term of a THRESHOLD node's GF(2^192) polynomial.

use crate::errors::Error;
use crate::group::{self, Scalar};
use num_bigint::BigUint;
use std::ops::BitXor;

/// `soundnessBits / 8`: 192-bit (24-byte) challenges, matching the
/// GF(2^192) polynomial field width used by THRESHOLD nodes (spec.md §4.B).
pub const CHALLENGE_BYTES: usize = 24;

/// A fixed-width Fiat-Shamir challenge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Challenge(pub [u8; CHALLENGE_BYTES]);

impl Challenge {
    /// The all-zero challenge (XOR identity, and `CAND`'s natural "no challenge yet" value).
    pub const ZERO: Challenge = Challenge([0u8; CHALLENGE_BYTES]);

    /// Wraps a byte array directly.
    pub fn from_bytes(bytes: [u8; CHALLENGE_BYTES]) -> Self {
        Challenge(bytes)
    }

    /// Reads a challenge from the front of `data`, failing with
    /// [`Error::MalformedProof`] if fewer than [`CHALLENGE_BYTES`] remain.
    pub fn read(data: &[u8]) -> Result<(Self, &[u8]), Error> {
        if data.len() < CHALLENGE_BYTES {
            return Err(Error::MalformedProof);
        }
        let (head, tail) = data.split_at(CHALLENGE_BYTES);
        let mut bytes = [0u8; CHALLENGE_BYTES];
        bytes.copy_from_slice(head);
        Ok((Challenge(bytes), tail))
    }

    /// The raw bytes.
    pub fn as_bytes(&self) -> &[u8; CHALLENGE_BYTES] {
        &self.0
    }

    /// A uniformly random challenge, sampled for simulated transcripts
    /// (spec.md §4.G step 2: "uniform challenge `e` in `{0,1}^soundnessBits`").
    pub fn random(rng: &mut impl rand::RngCore) -> Self {
        let mut bytes = [0u8; CHALLENGE_BYTES];
        rng.fill_bytes(&mut bytes);
        Challenge(bytes)
    }

    /// Interprets the challenge as a non-negative big-endian integer modulo
    /// the group order `q`, as spec.md §4.F step 3 requires for computing
    /// `g^z \cdot h^{-e}` ("the exponent `-e` taken modulo `q` from the
    /// challenge as a positive big-endian integer").
    pub fn to_scalar_mod_q(&self) -> Scalar {
        let e = BigUint::from_bytes_be(&self.0);
        let q = group::order();
        let reduced = e % q;
        let mut bytes = reduced.to_bytes_be();
        // left-pad to the 32-byte scalar width the group facade expects
        if bytes.len() < 32 {
            let mut padded = vec![0u8; 32 - bytes.len()];
            padded.extend(bytes);
            bytes = padded;
        }
        let mut repr = [0u8; 32];
        repr.copy_from_slice(&bytes[bytes.len() - 32..]);
        group::decode_scalar(&repr).expect("reduction mod q is always canonical")
    }
}

impl BitXor for Challenge {
    type Output = Challenge;

    fn bitxor(self, rhs: Challenge) -> Challenge {
        let mut out = [0u8; CHALLENGE_BYTES];
        for i in 0..CHALLENGE_BYTES {
            out[i] = self.0[i] ^ rhs.0[i];
        }
        Challenge(out)
    }
}

impl<'a> BitXor<&'a Challenge> for Challenge {
    type Output = Challenge;

    fn bitxor(self, rhs: &'a Challenge) -> Challenge {
        self ^ *rhs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xor_is_involutive() {
        let a = Challenge([1u8; CHALLENGE_BYTES]);
        let b = Challenge([2u8; CHALLENGE_BYTES]);
        assert_eq!(a ^ b ^ b, a);
    }

    #[test]
    fn zero_is_xor_identity() {
        let a = Challenge([7u8; CHALLENGE_BYTES]);
        assert_eq!(a ^ Challenge::ZERO, a);
    }

    #[test]
    fn read_rejects_truncated_input() {
        let short = [0u8; CHALLENGE_BYTES - 1];
        assert!(Challenge::read(&short).is_err());
    }
}
