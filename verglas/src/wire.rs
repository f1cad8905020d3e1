//! Byte and JSON codecs for protocol payloads
//!
//! Two encodings are provided for everything crossing the wire:
//!
//! * Raw bytes: fixed-width concatenation of the canonical field encodings —
//!   `identifier || hiding || binding` for a commitment,
//!   `identifier || share` for a signature share.
//! * A JSON envelope with URL-safe base64 fields: `{"i","h","b"}` for a
//!   commitment, `{"i","s"}` for a signature share.
//!
//! Decoders are strict: malformed JSON or base64, wrong-length fields,
//! non-canonical scalars, points outside the prime-order subgroup, and zero
//! identifiers are all rejected with a [`DecodeError`].

use core::fmt;

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine as _;
use generic_ec::errors::{InvalidPoint, InvalidScalar};
use generic_ec::{NonZero, Point, Scalar};
use serde::{Deserialize, Serialize};

use crate::{
    ciphersuite::Ciphersuite,
    key_share::{Participant, SecretShare},
    signing::state::{Commitment, SignatureShare},
};

#[derive(Serialize, Deserialize)]
struct CommitmentEnvelope {
    i: String,
    h: String,
    b: String,
}

#[derive(Serialize, Deserialize)]
struct SigShareEnvelope {
    i: String,
    s: String,
}

/// Serializes a commitment as `identifier || hiding || binding`
pub fn commitment_to_bytes<C: Ciphersuite>(commitment: &Commitment<C::Curve>) -> Vec<u8> {
    let mut out = Vec::with_capacity(C::SCALAR_SIZE + 2 * C::POINT_SIZE);
    out.extend_from_slice(C::serialize_scalar(&commitment.identifier).as_ref());
    out.extend_from_slice(C::serialize_point(&commitment.hiding).as_ref());
    out.extend_from_slice(C::serialize_point(&commitment.binding).as_ref());
    out
}

/// Deserializes a commitment from `identifier || hiding || binding`
pub fn commitment_from_bytes<C: Ciphersuite>(
    bytes: &[u8],
) -> Result<Commitment<C::Curve>, DecodeError> {
    if bytes.len() != C::SCALAR_SIZE + 2 * C::POINT_SIZE {
        return Err(Reason::WrongLength.into());
    }
    let (identifier, rest) = bytes.split_at(C::SCALAR_SIZE);
    let (hiding, binding) = rest.split_at(C::POINT_SIZE);
    Ok(Commitment {
        identifier: decode_identifier::<C>(identifier)?,
        hiding: C::deserialize_point(hiding)?,
        binding: C::deserialize_point(binding)?,
    })
}

/// Encodes a commitment as a `{"i","h","b"}` JSON envelope
pub fn commitment_to_json<C: Ciphersuite>(
    commitment: &Commitment<C::Curve>,
) -> Result<String, serde_json::Error> {
    let envelope = CommitmentEnvelope {
        i: URL_SAFE.encode(C::serialize_scalar(&commitment.identifier)),
        h: URL_SAFE.encode(C::serialize_point(&commitment.hiding)),
        b: URL_SAFE.encode(C::serialize_point(&commitment.binding)),
    };
    serde_json::to_string(&envelope)
}

/// Decodes a commitment from a `{"i","h","b"}` JSON envelope
pub fn commitment_from_json<C: Ciphersuite>(
    json: &[u8],
) -> Result<Commitment<C::Curve>, DecodeError> {
    let envelope: CommitmentEnvelope = serde_json::from_slice(json)?;
    let identifier = URL_SAFE.decode(&envelope.i)?;
    let hiding = URL_SAFE.decode(&envelope.h)?;
    let binding = URL_SAFE.decode(&envelope.b)?;
    Ok(Commitment {
        identifier: decode_identifier::<C>(&identifier)?,
        hiding: C::deserialize_point(&hiding)?,
        binding: C::deserialize_point(&binding)?,
    })
}

/// Serializes a signature share as `identifier || share`
pub fn sig_share_to_bytes<C: Ciphersuite>(share: &SignatureShare<C::Curve>) -> Vec<u8> {
    let mut out = Vec::with_capacity(2 * C::SCALAR_SIZE);
    out.extend_from_slice(C::serialize_scalar(&share.identifier).as_ref());
    out.extend_from_slice(C::serialize_scalar(&share.share).as_ref());
    out
}

/// Deserializes a signature share from `identifier || share`
pub fn sig_share_from_bytes<C: Ciphersuite>(
    bytes: &[u8],
) -> Result<SignatureShare<C::Curve>, DecodeError> {
    if bytes.len() != 2 * C::SCALAR_SIZE {
        return Err(Reason::WrongLength.into());
    }
    let (identifier, share) = bytes.split_at(C::SCALAR_SIZE);
    Ok(SignatureShare {
        identifier: decode_identifier::<C>(identifier)?,
        share: C::deserialize_scalar(share)?,
    })
}

/// Encodes a signature share as a `{"i","s"}` JSON envelope
pub fn sig_share_to_json<C: Ciphersuite>(
    share: &SignatureShare<C::Curve>,
) -> Result<String, serde_json::Error> {
    let envelope = SigShareEnvelope {
        i: URL_SAFE.encode(C::serialize_scalar(&share.identifier)),
        s: URL_SAFE.encode(C::serialize_scalar(&share.share)),
    };
    serde_json::to_string(&envelope)
}

/// Decodes a signature share from a `{"i","s"}` JSON envelope
pub fn sig_share_from_json<C: Ciphersuite>(
    json: &[u8],
) -> Result<SignatureShare<C::Curve>, DecodeError> {
    let envelope: SigShareEnvelope = serde_json::from_slice(json)?;
    let identifier = URL_SAFE.decode(&envelope.i)?;
    let share = URL_SAFE.decode(&envelope.s)?;
    Ok(SignatureShare {
        identifier: decode_identifier::<C>(&identifier)?,
        share: C::deserialize_scalar(&share)?,
    })
}

/// Loads a participant from its serialized identifier and public key share
pub fn participant_from_bytes<C: Ciphersuite>(
    identifier: &[u8],
    public_share: &[u8],
) -> Result<Participant<C::Curve>, DecodeError> {
    Ok(Participant {
        identifier: decode_identifier::<C>(identifier)?,
        public_share: C::deserialize_point(public_share)?,
    })
}

/// Loads a secret share from its serialized identifier and secret scalar
pub fn secret_share_from_bytes<C: Ciphersuite>(
    identifier: &[u8],
    secret: &[u8],
) -> Result<SecretShare<C::Curve>, DecodeError> {
    Ok(SecretShare {
        identifier: decode_identifier::<C>(identifier)?,
        secret: C::deserialize_secret_scalar(secret)?,
    })
}

/// Loads a group public key from its canonical point encoding
pub fn group_key_from_bytes<C: Ciphersuite>(
    bytes: &[u8],
) -> Result<NonZero<Point<C::Curve>>, DecodeError> {
    let point = C::deserialize_point(bytes)?;
    NonZero::from_point(point).ok_or_else(|| Reason::IdentityGroupKey.into())
}

fn decode_identifier<C: Ciphersuite>(
    bytes: &[u8],
) -> Result<NonZero<Scalar<C::Curve>>, DecodeError> {
    let scalar = C::deserialize_scalar(bytes)?;
    NonZero::from_scalar(scalar).ok_or_else(|| Reason::ZeroIdentifier.into())
}

/// Input could not be decoded into a protocol payload
#[derive(Debug)]
pub struct DecodeError(Reason);

#[derive(Debug)]
enum Reason {
    Json(serde_json::Error),
    Base64(base64::DecodeError),
    WrongLength,
    InvalidScalar(InvalidScalar),
    InvalidPoint(InvalidPoint),
    ZeroIdentifier,
    IdentityGroupKey,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Reason::Json(_) => f.write_str("parse json envelope"),
            Reason::Base64(_) => f.write_str("decode base64 field"),
            Reason::WrongLength => f.write_str("input has wrong length"),
            Reason::InvalidScalar(_) => f.write_str("decode scalar"),
            Reason::InvalidPoint(_) => f.write_str("decode point"),
            Reason::ZeroIdentifier => f.write_str("identifier is zero"),
            Reason::IdentityGroupKey => f.write_str("group key is the identity point"),
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.0 {
            Reason::Json(err) => Some(err),
            Reason::Base64(err) => Some(err),
            Reason::InvalidScalar(err) => Some(err),
            Reason::InvalidPoint(err) => Some(err),
            Reason::WrongLength | Reason::ZeroIdentifier | Reason::IdentityGroupKey => None,
        }
    }
}

impl From<Reason> for DecodeError {
    fn from(err: Reason) -> Self {
        Self(err)
    }
}
impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        Self(Reason::Json(err))
    }
}
impl From<base64::DecodeError> for DecodeError {
    fn from(err: base64::DecodeError) -> Self {
        Self(Reason::Base64(err))
    }
}
impl From<InvalidScalar> for DecodeError {
    fn from(err: InvalidScalar) -> Self {
        Self(Reason::InvalidScalar(err))
    }
}
impl From<InvalidPoint> for DecodeError {
    fn from(err: InvalidPoint) -> Self {
        Self(Reason::InvalidPoint(err))
    }
}
