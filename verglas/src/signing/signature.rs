//! The aggregated signature

use core::fmt;

use generic_ec::{NonZero, Point, Scalar};

use crate::ciphersuite::Ciphersuite;

use super::utils;

/// Schnorr signature over the ciphersuite's curve
///
/// Serialized as `encode(R) || encode(z)` — 64 bytes under
/// [`Ed25519`](crate::ciphersuite::Ed25519), where it is accepted by any
/// stock Ed25519 verifier given the group public key.
#[derive(Debug, Clone, Copy)]
pub struct Signature<C: Ciphersuite> {
    /// Group commitment `R`
    pub r: Point<C::Curve>,
    /// Response `z`
    pub z: Scalar<C::Curve>,
}

impl<C: Ciphersuite> Signature<C> {
    /// Verifies the signature against the group public key and the message
    ///
    /// Checks `z * G == R + c * PK` with `c` the ciphersuite challenge. This
    /// is the same equation an external verifier evaluates; it is provided
    /// for callers that want to stay inside the crate.
    pub fn verify(
        &self,
        group_public_key: &NonZero<Point<C::Curve>>,
        msg: &[u8],
    ) -> Result<(), InvalidSignature> {
        let challenge = utils::compute_challenge::<C>(&self.r, group_public_key, msg);

        let lhs = Point::generator() * self.z;
        let rhs = self.r + **group_public_key * challenge;

        if lhs == rhs {
            Ok(())
        } else {
            Err(InvalidSignature)
        }
    }

    /// Size in bytes of the serialized signature
    pub fn serialized_len() -> usize {
        C::POINT_SIZE + C::SCALAR_SIZE
    }

    /// Writes `encode(R) || encode(z)` into `out`
    ///
    /// `out` must be at least [`serialized_len`](Self::serialized_len) bytes,
    /// otherwise the output buffer content is unspecified.
    pub fn write_to_slice(&self, out: &mut [u8]) {
        let Some(point_out) = out.get_mut(..C::POINT_SIZE) else {
            return;
        };
        point_out.copy_from_slice(C::serialize_point(&self.r).as_ref());

        let Some(scalar_out) = out.get_mut(C::POINT_SIZE..C::POINT_SIZE + C::SCALAR_SIZE) else {
            return;
        };
        scalar_out.copy_from_slice(C::serialize_scalar(&self.z).as_ref());
    }

    /// Serialized signature as a freshly allocated buffer
    pub fn to_vec(&self) -> Vec<u8> {
        let mut out = vec![0u8; Self::serialized_len()];
        self.write_to_slice(&mut out);
        out
    }

    /// Parses a signature serialized via [`write_to_slice`](Self::write_to_slice)
    ///
    /// Returns `None` if the buffer is too short or either component does not
    /// decode.
    pub fn read_from_slice(bytes: &[u8]) -> Option<Self> {
        let r = bytes.get(..C::POINT_SIZE)?;
        let z = bytes.get(C::POINT_SIZE..C::POINT_SIZE + C::SCALAR_SIZE)?;

        let r = C::deserialize_point(r).ok()?;
        let z = C::deserialize_scalar(z).ok()?;

        Some(Self { r, z })
    }
}

/// Signature verification failed
#[derive(Debug)]
pub struct InvalidSignature;

impl fmt::Display for InvalidSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid signature")
    }
}

impl std::error::Error for InvalidSignature {}
