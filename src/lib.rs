//
// Authors:
// - Nugzari Uzoevi <nougzarm@icloud.com>
// - Michele Orrù <m@orru.net>
// - Lénaïck Gouriou <lg@leanear.io>

#![allow(non_snake_case)]
#![doc(html_logo_url = "https://mmaker.github.io/sigma-rs/")]
//! Serialization, non-interactive composition, and verification of
//! sigma-protocol proof trees (ProveDlog / ProveDHTuple leaves under
//! AND / OR / k-of-n THRESHOLD connectives), plus the binary box/register
//! container whose digest is the Fiat-Shamir message.

#![deny(unused_variables)]
#![deny(unused_mut)]

pub mod errors;
pub mod traits;

pub mod linear_relation;
pub mod schnorr_protocol;

pub mod challenge;
pub mod polynomial;
pub mod sigma_leaf;
pub mod sigma_boolean;

pub mod observer;
pub mod proof_serializer;
pub mod proof_parser;
pub mod prover;
pub mod verifier;

pub mod varint;
pub mod ergo_box;

pub mod group;
pub mod hash;

pub use challenge::Challenge;
pub use errors::Error;
pub use ergo_box::ErgoBox;
pub use linear_relation::LinearRelation;
pub use prover::{prove, sign_message, SecretSet};
pub use sigma_boolean::{SigmaBoolean, UncheckedTree};
pub use sigma_leaf::SigmaLeaf;
pub use verifier::{verify, verify_message};
