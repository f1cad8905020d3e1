use digest::Digest;

use crate::ciphersuite::Ciphersuite;

/// FROST(Ed25519, SHA-512), the ciphersuite from Section 6.1 of RFC 9591
///
/// Signatures produced under this suite verify with any stock Ed25519
/// verifier.
#[derive(Debug, Clone, Copy)]
pub struct Ed25519;

impl Ciphersuite for Ed25519 {
    const NAME: &'static str = "FROST-ED25519-SHA512-v1";

    type Curve = generic_ec::curves::Ed25519;
    type Digest = sha2::Sha512;

    const SCALAR_SIZE: usize = 32;
    const POINT_SIZE: usize = 32;

    fn h1(data: &[&[u8]]) -> generic_ec::Scalar<Self::Curve> {
        let mut hash = sha2::Sha512::new()
            .chain_update(Self::NAME)
            .chain_update(b"rho");
        for chunk in data {
            hash.update(chunk);
        }
        generic_ec::Scalar::from_le_bytes_mod_order(hash.finalize())
    }

    // H2 carries no domain separator: it has to be byte-identical to the
    // challenge hash of plain Ed25519, or stock verifiers would reject the
    // aggregated signature.
    fn h2(data: &[&[u8]]) -> generic_ec::Scalar<Self::Curve> {
        let mut hash = sha2::Sha512::new();
        for chunk in data {
            hash.update(chunk);
        }
        generic_ec::Scalar::from_le_bytes_mod_order(hash.finalize())
    }

    fn h3(data: &[&[u8]]) -> generic_ec::Scalar<Self::Curve> {
        let mut hash = sha2::Sha512::new()
            .chain_update(Self::NAME)
            .chain_update(b"nonce");
        for chunk in data {
            hash.update(chunk);
        }
        generic_ec::Scalar::from_le_bytes_mod_order(hash.finalize())
    }

    fn h4() -> Self::Digest {
        sha2::Sha512::new()
            .chain_update(Self::NAME)
            .chain_update(b"msg")
    }

    fn h5() -> Self::Digest {
        sha2::Sha512::new()
            .chain_update(Self::NAME)
            .chain_update(b"com")
    }

    type PointBytes = generic_ec::EncodedPoint<Self::Curve>;
    fn serialize_point(point: &generic_ec::Point<Self::Curve>) -> Self::PointBytes {
        point.to_bytes(true)
    }
    fn deserialize_point(
        bytes: &[u8],
    ) -> Result<generic_ec::Point<Self::Curve>, generic_ec::errors::InvalidPoint> {
        generic_ec::Point::from_bytes(bytes)
    }

    type ScalarBytes = generic_ec::EncodedScalar<Self::Curve>;
    fn serialize_scalar(scalar: &generic_ec::Scalar<Self::Curve>) -> Self::ScalarBytes {
        scalar.to_le_bytes()
    }
    fn deserialize_scalar(
        bytes: &[u8],
    ) -> Result<generic_ec::Scalar<Self::Curve>, generic_ec::errors::InvalidScalar> {
        generic_ec::Scalar::from_le_bytes(bytes)
    }
}
