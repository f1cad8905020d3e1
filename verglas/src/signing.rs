//! The two-round signing ceremony
//!
//! Each signer drives its own [`State`] through the ceremony; the coordinator
//! runs a state of its own (without a secret share) to verify and aggregate.
//! We assume some party plays Coordinator — a designated node, or a consensus
//! layer between the signers; the crate does not care how messages move.
//!
//! 1. Each signer calls [`State::commit`]. The message does not need to be
//!    known yet. The returned [`Commitment`] is sent to the Coordinator; the
//!    secret nonces stay inside the state.
//! 2. The Coordinator picks the quorum for a message and forwards the full
//!    commitment list to every chosen signer.
//! 3. Each signer calls [`State::sign`] with that list and sends the
//!    resulting [`SignatureShare`] back. The nonces are consumed: a state
//!    can never sign twice.
//! 4. The Coordinator runs [`State::sign`] on its own (share-less) state to
//!    derive the group commitment, checks every share with
//!    [`State::verify_signature_share`], and combines them with
//!    [`State::aggregate`] into a plain [`Signature`].
//!
//! All parties must agree byte-for-byte on the commitment list. The list is
//! canonically ordered (ascending by identifier encoding) before any hashing,
//! so the transport may deliver commitments in any order.

pub mod signature;
pub mod state;
pub mod utils;

pub use self::{
    signature::Signature,
    state::{Commitment, SignatureShare, State},
};
