//! GF(2^192) field arithmetic and polynomial interpolation (spec.md §4.B),
//! used by `CTHRESHOLD` nodes to split a parent challenge into `n` children
//! challenges such that any `k` of them determine the rest.
//!
//! Field elements are represented as three `u64` limbs (192 bits,
//! little-endian limb order), per spec.md §9's design note ("implement with
//! two 96-bit limbs or three 64-bit limbs"). Multiplication is carry-less
//! (bit-reflected) followed by reduction modulo the pentanomial
//! `x^192 + x^7 + x^2 + x + 1`.

use crate::challenge::{Challenge, CHALLENGE_BYTES};
use crate::errors::Error;
use num_bigint::BigUint;
use num_traits::{One, Zero};

/// An element of GF(2^192).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Gf2_192(pub [u64; 3]);

/// Low-degree terms of the reduction polynomial `x^192 + x^7 + x^2 + x + 1`
/// (everything below `x^192`, i.e. `x^7 + x^2 + x + 1 = 0b1000_0111`).
const REDUCER_LOW: u64 = 0b1000_0111;

impl Gf2_192 {
    /// The additive identity.
    pub const ZERO: Gf2_192 = Gf2_192([0, 0, 0]);
    /// The multiplicative identity.
    pub const ONE: Gf2_192 = Gf2_192([1, 0, 0]);

    /// Embeds a small integer (a child index `i+1`, or `0` for the constant
    /// term) directly as a field element sharing its bit pattern, the usual
    /// convention for binary-field secret sharing.
    pub fn embed(i: u8) -> Gf2_192 {
        Gf2_192([i as u64, 0, 0])
    }

    /// Field addition, which coincides with XOR (characteristic 2) — and
    /// with [`Challenge`]'s own XOR, since a challenge's bytes are exactly a
    /// GF(2^192) element's big-endian encoding.
    pub fn add(self, rhs: Gf2_192) -> Gf2_192 {
        Gf2_192([self.0[0] ^ rhs.0[0], self.0[1] ^ rhs.0[1], self.0[2] ^ rhs.0[2]])
    }

    /// Carry-less multiplication followed by reduction mod the field polynomial.
    pub fn mul(self, rhs: Gf2_192) -> Gf2_192 {
        let wide = carryless_mul(&self.0, &rhs.0);
        reduce(wide)
    }

    /// `self * self`.
    pub fn square(self) -> Gf2_192 {
        self.mul(self)
    }

    /// `self^exp` via square-and-multiply.
    pub fn pow(self, exp: &BigUint) -> Gf2_192 {
        let mut result = Gf2_192::ONE;
        let mut base = self;
        for i in 0..exp.bits() {
            if exp.bit(i) {
                result = result.mul(base);
            }
            base = base.square();
        }
        result
    }

    /// The multiplicative inverse, or `None` for zero. `GF(2^192)^*` has
    /// order `2^192 - 1`, so `a^{-1} = a^{2^192 - 2}` by Fermat.
    pub fn inverse(self) -> Option<Gf2_192> {
        if self == Gf2_192::ZERO {
            return None;
        }
        let exp = (BigUint::one() << 192u32) - BigUint::from(2u8);
        Some(self.pow(&exp))
    }

    /// Big-endian 24-byte encoding, matching [`Challenge`]'s own encoding.
    pub fn to_bytes(self) -> [u8; CHALLENGE_BYTES] {
        let mut out = [0u8; CHALLENGE_BYTES];
        out[0..8].copy_from_slice(&self.0[2].to_be_bytes());
        out[8..16].copy_from_slice(&self.0[1].to_be_bytes());
        out[16..24].copy_from_slice(&self.0[0].to_be_bytes());
        out
    }

    /// Inverse of [`Self::to_bytes`].
    pub fn from_bytes(bytes: &[u8; CHALLENGE_BYTES]) -> Gf2_192 {
        let limb2 = u64::from_be_bytes(bytes[0..8].try_into().unwrap());
        let limb1 = u64::from_be_bytes(bytes[8..16].try_into().unwrap());
        let limb0 = u64::from_be_bytes(bytes[16..24].try_into().unwrap());
        Gf2_192([limb0, limb1, limb2])
    }
}

impl From<Challenge> for Gf2_192 {
    fn from(c: Challenge) -> Self {
        Gf2_192::from_bytes(c.as_bytes())
    }
}

impl From<Gf2_192> for Challenge {
    fn from(f: Gf2_192) -> Self {
        Challenge::from_bytes(f.to_bytes())
    }
}

/// 192x192 -> 384-bit carry-less (XOR) multiplication, schoolbook bit-by-bit.
fn carryless_mul(a: &[u64; 3], b: &[u64; 3]) -> [u64; 6] {
    let mut acc = [0u64; 6];
    for (word_idx, &bword) in b.iter().enumerate() {
        for bit in 0..64 {
            if (bword >> bit) & 1 == 1 {
                let shift = word_idx * 64 + bit;
                xor_shifted_in(&mut acc, a, shift);
            }
        }
    }
    acc
}

/// `acc ^= (src << shift)`, where `src` is a 192-bit value and `acc` is a
/// 384-bit accumulator (6 limbs), `shift` in `0..=191`.
fn xor_shifted_in(acc: &mut [u64; 6], src: &[u64; 3], shift: usize) {
    let limb_shift = shift / 64;
    let bit_shift = shift % 64;
    for (i, &word) in src.iter().enumerate() {
        let lo = word << bit_shift;
        acc[i + limb_shift] ^= lo;
        if bit_shift > 0 {
            let hi = word >> (64 - bit_shift);
            if i + limb_shift + 1 < acc.len() {
                acc[i + limb_shift + 1] ^= hi;
            }
        }
    }
}

/// Reduces a 384-bit carry-less product modulo `x^192 + x^7 + x^2 + x + 1`.
fn reduce(mut wide: [u64; 6]) -> Gf2_192 {
    // Fold bits [383..192] down using the reduction polynomial: each set bit
    // at position d >= 192 is cancelled by XOR-ing in the reducer shifted by
    // (d - 192), which has its own top bit at exactly d.
    for d in (192..384).rev() {
        let limb = d / 64;
        let bit = d % 64;
        if (wide[limb] >> bit) & 1 == 1 {
            let shift = d - 192;
            xor_reducer_low(&mut wide, shift);
            wide[limb] ^= 1 << bit;
        }
    }
    Gf2_192([wide[0], wide[1], wide[2]])
}

/// XORs `REDUCER_LOW << shift` into `acc` (the `x^192` term itself is
/// handled separately by the caller, since it always cancels the bit being
/// eliminated).
fn xor_reducer_low(acc: &mut [u64; 6], shift: usize) {
    let limb_shift = shift / 64;
    let bit_shift = shift % 64;
    let lo = REDUCER_LOW << bit_shift;
    if limb_shift < acc.len() {
        acc[limb_shift] ^= lo;
    }
    if bit_shift > 0 {
        let hi = (REDUCER_LOW as u128) >> (64 - bit_shift);
        if limb_shift + 1 < acc.len() {
            acc[limb_shift + 1] ^= hi as u64;
        }
    }
}

/// A GF(2^192) polynomial, represented by its coefficients in ascending
/// degree order (`coeffs[0]` is the constant term).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Polynomial {
    coeffs: Vec<Gf2_192>,
}

impl Polynomial {
    /// Builds a polynomial directly from ascending-degree coefficients
    /// (`coeffs[0]` is the constant term), used when simulating a
    /// `CTHRESHOLD` branch: any polynomial with the right constant term and
    /// degree is a valid simulated split, no interpolation needed.
    pub fn from_coeffs(coeffs: Vec<Gf2_192>) -> Polynomial {
        Polynomial { coeffs }
    }

    /// The polynomial's degree (`coeffs.len() - 1`).
    pub fn degree(&self) -> usize {
        self.coeffs.len().saturating_sub(1)
    }

    /// The constant term (`poly(0)`), e.g. a THRESHOLD node's own challenge.
    pub fn constant_term(&self) -> Gf2_192 {
        self.coeffs.first().copied().unwrap_or(Gf2_192::ZERO)
    }

    /// Evaluates the polynomial at the integer `x` (embedded as a field element).
    pub fn evaluate(&self, x: u8) -> Gf2_192 {
        let xf = Gf2_192::embed(x);
        let mut acc = Gf2_192::ZERO;
        for &c in self.coeffs.iter().rev() {
            acc = acc.mul(xf).add(c);
        }
        acc
    }

    /// Lagrange interpolation through `points`, a set of `(x, y)` pairs with
    /// distinct `x` values. Returns a polynomial of degree `points.len() - 1`.
    pub fn interpolate(points: &[(u8, Gf2_192)]) -> Result<Polynomial, Error> {
        let n = points.len();
        if n == 0 {
            return Ok(Polynomial { coeffs: vec![] });
        }
        let mut result = vec![Gf2_192::ZERO; n];
        for i in 0..n {
            let (xi, yi) = points[i];
            let xi_f = Gf2_192::embed(xi);
            let mut basis = vec![Gf2_192::ONE];
            let mut denom = Gf2_192::ONE;
            for (j, &(xj, _)) in points.iter().enumerate() {
                if j == i {
                    continue;
                }
                let xj_f = Gf2_192::embed(xj);
                basis = mul_linear(&basis, xj_f);
                denom = denom.mul(xi_f.add(xj_f));
            }
            let inv_denom = denom
                .inverse()
                .ok_or(Error::InvalidProposition("duplicate interpolation points"))?;
            let scale = yi.mul(inv_denom);
            for (k, c) in basis.into_iter().enumerate() {
                result[k] = result[k].add(c.mul(scale));
            }
        }
        Ok(Polynomial { coeffs: result })
    }

    /// Packs the non-constant coefficients (ascending degree) at
    /// [`crate::challenge::CHALLENGE_BYTES`] bytes each, omitting the
    /// constant term (spec.md §4.B: "the constant term... is not
    /// serialized"). When `with_zero` is set the constant term is included
    /// too, for callers that need a self-contained encoding.
    pub fn to_bytes(&self, with_zero: bool) -> Vec<u8> {
        let coeffs: &[Gf2_192] = if with_zero {
            &self.coeffs
        } else if self.coeffs.is_empty() {
            &[]
        } else {
            &self.coeffs[1..]
        };
        coeffs.iter().flat_map(|c| c.to_bytes()).collect()
    }

    /// Reconstructs a polynomial from its non-constant coefficient bytes and
    /// an externally known constant term (the node's own challenge).
    pub fn from_bytes(constant_term: Gf2_192, bytes: &[u8]) -> Result<Polynomial, Error> {
        if bytes.len() % CHALLENGE_BYTES != 0 {
            return Err(Error::MalformedProof);
        }
        let mut coeffs = vec![constant_term];
        for chunk in bytes.chunks(CHALLENGE_BYTES) {
            let mut buf = [0u8; CHALLENGE_BYTES];
            buf.copy_from_slice(chunk);
            coeffs.push(Gf2_192::from_bytes(&buf));
        }
        Ok(Polynomial { coeffs })
    }
}

/// Multiplies an ascending-coefficient polynomial by the linear factor
/// `(x + root)` (subtraction is addition in characteristic 2), returning a
/// polynomial one degree higher.
fn mul_linear(poly: &[Gf2_192], root: Gf2_192) -> Vec<Gf2_192> {
    let mut out = vec![Gf2_192::ZERO; poly.len() + 1];
    for (i, &c) in poly.iter().enumerate() {
        out[i] = out[i].add(c.mul(root));
        out[i + 1] = out[i + 1].add(c);
    }
    out
}
