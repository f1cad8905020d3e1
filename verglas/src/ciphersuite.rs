//! Ciphersuite: the hash-function capability set and canonical encodings
//!
//! A ciphersuite fixes the curve, the five hash functions `H1..H5`, and the
//! canonical byte encodings of scalars and points. Everything above this
//! module (the ceremony, the dealer, the wire codecs) is written against the
//! [`Ciphersuite`] trait, so further suites can slot in without touching the
//! protocol logic. The one suite shipped here is [`Ed25519`].

use core::fmt;

use digest::{FixedOutput, Update};
use generic_ec::errors::{InvalidPoint, InvalidScalar};
use generic_ec::{Curve, Point, Scalar, SecretScalar};
use rand_core::{CryptoRng, RngCore};

mod ed25519;

pub use ed25519::Ed25519;

/// Curve and hash primitives used throughout the protocol
///
/// `H1`, `H2`, `H3` map byte strings into the scalar field; `H4` and `H5`
/// are plain digests with distinct domain separators. See [Section 6] of
/// RFC 9591 for the requirements each function must meet.
///
/// [Section 6]: https://www.rfc-editor.org/rfc/rfc9591.html#name-ciphersuites
pub trait Ciphersuite {
    /// Context string of the ciphersuite, prefixed to every domain-separated
    /// hash input
    const NAME: &'static str;

    /// Curve on which signatures are produced
    type Curve: Curve;

    /// Digest behind [H4](Self::h4) and [H5](Self::h5)
    type Digest: Update + FixedOutput + Clone;

    /// Byte length of a canonical scalar encoding
    const SCALAR_SIZE: usize;
    /// Byte length of a canonical point encoding
    const POINT_SIZE: usize;

    /// `H1`, the binding-factor hash
    ///
    /// Input chunks are concatenated before hashing: the result is
    /// `H1(data[0] || data[1] || ...)`.
    fn h1(data: &[&[u8]]) -> Scalar<Self::Curve>;

    /// `H2`, the challenge hash
    ///
    /// Same concatenation convention as [`h1`](Self::h1).
    fn h2(data: &[&[u8]]) -> Scalar<Self::Curve>;

    /// `H3`, the nonce hash
    ///
    /// Same concatenation convention as [`h1`](Self::h1).
    fn h3(data: &[&[u8]]) -> Scalar<Self::Curve>;

    /// `H4`, returned pre-seeded with its domain separator; callers feed the
    /// message and finalize
    fn h4() -> Self::Digest;

    /// `H5`, returned pre-seeded with its domain separator; callers feed the
    /// encoded commitment list and finalize
    fn h5() -> Self::Digest;

    /// Byte array holding a canonical point encoding
    type PointBytes: AsRef<[u8]>;
    /// Serializes a point
    fn serialize_point(point: &Point<Self::Curve>) -> Self::PointBytes;
    /// Deserializes a point, rejecting encodings outside the prime-order
    /// subgroup
    fn deserialize_point(bytes: &[u8]) -> Result<Point<Self::Curve>, InvalidPoint>;

    /// Byte array holding a canonical scalar encoding
    type ScalarBytes: AsRef<[u8]>;
    /// Serializes a scalar
    fn serialize_scalar(scalar: &Scalar<Self::Curve>) -> Self::ScalarBytes;
    /// Deserializes a scalar, rejecting non-canonical encodings
    fn deserialize_scalar(bytes: &[u8]) -> Result<Scalar<Self::Curve>, InvalidScalar>;
    /// Deserializes a scalar that must be kept secret
    fn deserialize_secret_scalar(bytes: &[u8]) -> Result<SecretScalar<Self::Curve>, InvalidScalar> {
        let mut scalar = Self::deserialize_scalar(bytes)?;
        Ok(SecretScalar::new(&mut scalar))
    }
}

/// Generates a single-use nonce as defined in [Section 4.1] of RFC 9591
///
/// Draws 32 bytes from `rng` and mixes in the long-term `secret`, so a weak
/// or failing RNG alone does not make the nonce predictable:
/// `nonce = H3(random_bytes || encode(secret))`.
///
/// [Section 4.1]: https://www.rfc-editor.org/rfc/rfc9591.html#name-nonce-generation
pub fn generate_nonce<C: Ciphersuite>(
    rng: &mut (impl RngCore + CryptoRng),
    secret: &SecretScalar<C::Curve>,
) -> Result<SecretScalar<C::Curve>, RngError> {
    let mut random_bytes = [0u8; 32];
    rng.try_fill_bytes(&mut random_bytes).map_err(RngError)?;

    let secret_bytes = C::serialize_scalar(secret.as_ref());
    let mut nonce = C::h3(&[random_bytes.as_slice(), secret_bytes.as_ref()]);

    Ok(SecretScalar::new(&mut nonce))
}

/// CSPRNG failed to produce randomness
#[derive(Debug)]
pub struct RngError(pub(crate) rand_core::Error);

impl fmt::Display for RngError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("could not read randomness from the system rng")
    }
}

impl std::error::Error for RngError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}
