//! Key material produced at key generation and held across ceremonies

use core::fmt;

use generic_ec::{Curve, NonZero, Point, Scalar, SecretScalar};

/// Public description of one participant: its identifier and public key share
///
/// The full list of participants is broadcast after key generation and stays
/// fixed for the lifetime of the group key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Participant<E: Curve> {
    /// Nonzero scalar identifying the participant within the group; the
    /// trusted dealer assigns `1..=n`
    pub identifier: NonZero<Scalar<E>>,
    /// Public key share `PK_i = s_i * G`
    pub public_share: Point<E>,
}

/// One participant's share of the group secret key
///
/// `secret` is the dealer polynomial evaluated at `identifier`. It never
/// leaves its holder and is zeroized when the share is dropped.
#[derive(Clone)]
pub struct SecretShare<E: Curve> {
    /// Nonzero scalar identifying the participant within the group
    pub identifier: NonZero<Scalar<E>>,
    /// Secret evaluation `s_i = f(identifier)`
    pub secret: SecretScalar<E>,
}

impl<E: Curve> SecretShare<E> {
    /// Public key share corresponding to this secret share
    pub fn public_share(&self) -> Point<E> {
        Point::generator() * &self.secret
    }
}

impl<E: Curve> fmt::Debug for SecretShare<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretShare")
            .field("identifier", &self.identifier)
            .finish_non_exhaustive()
    }
}
