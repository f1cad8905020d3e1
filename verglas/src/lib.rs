//! Threshold Ed25519 signing based on [FROST (RFC 9591)][rfc]
//!
//! FROST produces plain Schnorr signatures through a two-round ceremony among
//! a quorum of `t` out of `n` key-share holders. With the
//! [`Ed25519`](ciphersuite::Ed25519) ciphersuite the aggregated signature is a
//! standard 64-byte Ed25519 signature: any stock verifier accepts it given
//! only the group public key, and no participant ever learns the group secret
//! key.
//!
//! This crate provides:
//! * The signing ceremony itself: a per-participant [`State`] driving nonce
//!   commitment (round 1), signature-share issuance (round 2), share
//!   verification and aggregation. See [mod@signing] for the full protocol
//!   walkthrough.
//! * [Trusted dealer](trusted_dealer) key generation: Shamir sharing of a
//!   fresh (or imported) secret key plus Feldman-style VSS commitments, per
//!   Appendix C of the RFC.
//! * [Wire codecs](wire) for commitments and signature shares, as raw bytes
//!   and as a compact JSON envelope.
//!
//! Transport between participants, share storage, and coordinator election
//! are intentionally out of scope: the ceremony is synchronous and
//! caller-driven, so it composes with any I/O layer.
//!
//! ## Example: 2-out-of-3 ceremony
//!
//! ```rust,no_run
//! use rand_core::OsRng;
//! use verglas::{ciphersuite::Ed25519, signing::State};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Dealer: split a fresh key into 3 shares, any 2 of which can sign
//! let keygen = verglas::trusted_dealer::builder(3)
//!     .set_threshold(2)
//!     .generate_shares(&mut OsRng)?;
//!
//! let msg = b"hello threshold world";
//!
//! // Two signers run their own ceremony states
//! let mut signers = [0usize, 1].map(|i| {
//!     State::<Ed25519>::new(
//!         keygen.participants.clone(),
//!         keygen.group_public_key,
//!         msg,
//!         Some(keygen.secret_shares[i].clone()),
//!     )
//! });
//!
//! // Round 1: each signer commits nonces and broadcasts the commitment
//! let commitments = [
//!     signers[0].commit(&mut OsRng)?,
//!     signers[1].commit(&mut OsRng)?,
//! ];
//!
//! // Round 2: each signer signs over the full commitment list
//! let mut shares = Vec::new();
//! for signer in &mut signers {
//!     if let Some(share) = signer.sign(&commitments)? {
//!         shares.push(share);
//!     }
//! }
//!
//! // Coordinator: recompute the group commitment, check shares, aggregate
//! let mut coordinator = State::<Ed25519>::new(
//!     keygen.participants.clone(),
//!     keygen.group_public_key,
//!     msg,
//!     None,
//! );
//! coordinator.sign(&commitments)?;
//! let signature = coordinator.aggregate_verified(&shares)?;
//! signature.verify(&keygen.group_public_key, msg)?;
//! # Ok(()) }
//! ```
//!
//! [rfc]: https://www.rfc-editor.org/rfc/rfc9591.html

#![forbid(unsafe_code, unused_crate_dependencies)]
#![deny(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
#![deny(missing_docs)]

pub use generic_ec;

pub mod ciphersuite;
pub mod key_share;
pub mod signing;
pub mod trusted_dealer;
pub mod wire;

pub use self::{
    ciphersuite::Ciphersuite,
    key_share::{Participant, SecretShare},
    signing::{Commitment, Signature, SignatureShare, State},
};
