//! Group / hash facade (spec.md §4.A).
//!
//! The sigma-tree and linear-relation machinery is generic over any `G:
//! Group + GroupEncoding` (see [`crate::linear_relation`]), matching the
//! spec's requirement that the design stay "parametric over both" curve and
//! hash. This module is the thin, named facade the rest of the crate (and
//! particularly [`crate::ergo_box`] and [`crate::proof_parser`]) calls
//! through, plus the one concrete backend this crate ships a complete wire
//! format for: `k256` (secp256k1), whose compressed `GroupEncoding` repr is
//! exactly the "1 sign byte + 32-byte X" layout §3 specifies, and whose
//! choice is grounded on the `bachthegenius-sigma-rust` reference file in
//! `examples/other_examples/manifests/` (the real Ergo platform's curve).

use crate::errors::Error;
use ff::{Field, PrimeField};
use group::{Group as _, GroupEncoding};
use rand::{CryptoRng, RngCore};

/// The concrete elliptic-curve group this crate's box/tree wire format targets.
pub type EcPoint = k256::ProjectivePoint;
/// The scalar field of [`EcPoint`].
pub type Scalar = k256::Scalar;

/// The generator (base point) of the group.
pub fn generator() -> EcPoint {
    EcPoint::generator()
}

/// The prime order `q` of the group's scalar field, as a big-endian integer.
pub fn order() -> num_bigint::BigUint {
    // k256's scalar field modulus (secp256k1 order n), written out since
    // neither `group` nor `ff` expose the modulus as a runtime value.
    num_bigint::BigUint::parse_bytes(
        b"FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141",
        16,
    )
    .expect("hardcoded secp256k1 order parses")
}

/// The byte width of a scalar encoding (`order` in spec.md §3).
pub const SCALAR_BYTES: usize = 32;
/// The byte width of a compressed point encoding (spec.md §3/§6).
pub const POINT_BYTES: usize = 33;

/// `g^k`.
pub fn exp(g: EcPoint, k: Scalar) -> EcPoint {
    g * k
}

/// `p * q` (the group operation, written multiplicatively per spec.md §4.A).
pub fn mul(p: EcPoint, q: EcPoint) -> EcPoint {
    p + q
}

/// The group inverse of `p`.
pub fn inv(p: EcPoint) -> EcPoint {
    -p
}

/// A no-op for this backend: `k256::ProjectivePoint` carries no non-normalized
/// representation observable through its public API. Kept so callers can
/// write `normalize(p)` generically without caring whether the backend needs it.
pub fn normalize(p: EcPoint) -> EcPoint {
    p
}

/// Whether `p` is the group identity.
pub fn is_identity(p: &EcPoint) -> bool {
    bool::from(group::Group::is_identity(p))
}

/// Encodes a point as 33 bytes: `0x02`/`0x03` + 32-byte X, or 33 zero bytes
/// for the identity.
pub fn encode_point(p: &EcPoint) -> [u8; POINT_BYTES] {
    let mut out = [0u8; POINT_BYTES];
    out.copy_from_slice(p.to_bytes().as_slice());
    out
}

/// Decodes a 33-byte point encoding, failing with [`Error::InvalidEncoding`]
/// if the leading byte isn't in `{0, 2, 3}` or the coordinate isn't on curve.
pub fn decode_point(bytes: &[u8; POINT_BYTES]) -> Result<EcPoint, Error> {
    match bytes[0] {
        0x00 | 0x02 | 0x03 => {}
        _ => return Err(Error::InvalidEncoding),
    }
    let mut repr = <EcPoint as GroupEncoding>::Repr::default();
    repr.as_mut().copy_from_slice(bytes.as_slice());
    Option::from(EcPoint::from_bytes(&repr)).ok_or(Error::InvalidEncoding)
}

/// Encodes a scalar as `order` big-endian bytes, zero-padded on the left.
///
/// `k256::Scalar`'s `PrimeField::Repr` is already a big-endian fixed-width
/// array, matching spec.md §3/§6 directly.
pub fn encode_scalar(s: &Scalar) -> [u8; SCALAR_BYTES] {
    let mut out = [0u8; SCALAR_BYTES];
    out.copy_from_slice(s.to_repr().as_slice());
    out
}

/// Decodes an `order`-byte big-endian scalar, failing on a non-canonical
/// (out-of-range) encoding.
pub fn decode_scalar(bytes: &[u8; SCALAR_BYTES]) -> Result<Scalar, Error> {
    let mut repr = <Scalar as PrimeField>::Repr::default();
    repr.copy_from_slice(bytes.as_slice());
    Option::from(Scalar::from_repr(repr)).ok_or(Error::InvalidEncoding)
}

/// A cryptographically secure uniformly random scalar in `[0, q)`.
pub fn random_scalar(rng: &mut (impl RngCore + CryptoRng)) -> Scalar {
    Scalar::random(rng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_encodes_to_all_zero() {
        let id = EcPoint::identity();
        assert_eq!(encode_point(&id), [0u8; POINT_BYTES]);
    }

    #[test]
    fn point_round_trips() {
        let g = generator();
        let bytes = encode_point(&g);
        let back = decode_point(&bytes).unwrap();
        assert_eq!(g, back);
    }

    #[test]
    fn bad_leading_byte_is_rejected() {
        let mut bytes = encode_point(&generator());
        bytes[0] = 0x04;
        assert!(matches!(decode_point(&bytes), Err(Error::InvalidEncoding)));
    }

    #[test]
    fn scalar_round_trips() {
        let mut rng = rand::rngs::OsRng;
        let s = random_scalar(&mut rng);
        let bytes = encode_scalar(&s);
        assert_eq!(bytes.len(), SCALAR_BYTES);
        assert_eq!(decode_scalar(&bytes).unwrap(), s);
    }
}
