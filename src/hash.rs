//! The fixed-size cryptographic hash used outside of the Fiat-Shamir
//! transcript: box identity (§3 "Identity (`id`) is the cryptographic digest
//! of the serialized bytes") and the root Fiat-Shamir challenge assembly in
//! [`crate::prover`]/[`crate::verifier`] (§4.G/§4.H, §6 "Fiat-Shamir input").
//!
//! Blake2b-256 is used, grounded on the `bachthegenius-sigma-rust` manifest
//! in `examples/other_examples/manifests/` (`blake2 = "0.10"`), the real
//! upstream Ergo platform's hash choice for exactly this purpose.

use blake2::{
    digest::{consts::U32, Digest},
    Blake2b,
};

type Blake2b256 = Blake2b<U32>;

/// A 32-byte Blake2b digest of `data`.
pub fn hash(data: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    let digest = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

/// Truncates `hash(data)` to the high `n` bytes, as spec.md §6 requires for
/// the Fiat-Shamir root challenge ("truncated to soundnessBits/8 bytes, high
/// bytes kept").
pub fn hash_truncated(data: &[u8], n: usize) -> Vec<u8> {
    let digest = hash(data);
    debug_assert!(n <= digest.len(), "cannot truncate to more bytes than the digest has");
    digest[..n].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic() {
        assert_eq!(hash(b"abc"), hash(b"abc"));
        assert_ne!(hash(b"abc"), hash(b"abd"));
    }

    #[test]
    fn truncation_keeps_high_bytes() {
        let digest = hash(b"abc");
        let truncated = hash_truncated(b"abc", 24);
        assert_eq!(truncated.as_slice(), &digest[..24]);
    }
}
