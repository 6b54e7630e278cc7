//! Box/register round-trip scenario (spec.md §8 scenario 6).

use sigma_tree::errors::Error;
use sigma_tree::ergo_box::{ErgoBox, RegisterId, RegisterValue};

#[test]
fn box_round_trips_and_id_matches_serialized_hash() {
    let b = ErgoBox::new(
        100,
        Vec::new(),
        0,
        vec![([7u8; 32], 1_000)],
        vec![(RegisterId::R4, RegisterValue::Int(7))],
        [1u8; 32],
        0,
    )
    .unwrap();

    let bytes = b.serialize().unwrap();
    let parsed = ErgoBox::parse(&bytes).unwrap();
    assert_eq!(b, parsed);

    let id = b.id().unwrap();
    assert_eq!(id, sigma_tree::hash::hash(&bytes));
}

#[test]
fn removing_r4_but_keeping_r5_is_a_packing_violation() {
    let result = ErgoBox::new(
        100,
        Vec::new(),
        0,
        vec![([7u8; 32], 1_000)],
        vec![(RegisterId::R5, RegisterValue::Int(7))],
        [1u8; 32],
        0,
    );
    assert!(matches!(result, Err(Error::PackingViolation)));
}

#[test]
fn box_id_depends_on_every_byte() {
    let base = ErgoBox::new(100, Vec::new(), 0, Vec::new(), Vec::new(), [1u8; 32], 0).unwrap();
    let different_height =
        ErgoBox::new(100, Vec::new(), 1, Vec::new(), Vec::new(), [1u8; 32], 0).unwrap();
    assert_ne!(base.id().unwrap(), different_height.id().unwrap());
}

#[test]
fn oversize_box_is_rejected() {
    let huge_script = vec![0u8; 5 * 1024];
    let result = ErgoBox::new(1, huge_script, 0, Vec::new(), Vec::new(), [0u8; 32], 0);
    assert!(matches!(result, Err(Error::OversizeBox(_))));
}

#[test]
fn too_many_tokens_is_rejected() {
    let tokens = vec![([3u8; 32], 1); 256];
    let result = ErgoBox::new(1, Vec::new(), 0, tokens, Vec::new(), [0u8; 32], 0);
    assert!(matches!(result, Err(Error::TooManyTokens)));
}
