//! Trusted-dealer key generation
//!
//! One party samples the group secret key, splits it into Shamir shares and
//! publishes Feldman-style commitments to the sharing polynomial, following
//! [Appendix C] of RFC 9591. The dealer is a single point of trust: it sees
//! the group secret key, so this strategy fits tests, key import, and
//! deployments where one party is trusted at setup time.
//!
//! Each recipient should check its share against the published commitment
//! with [`vss_verify`] before accepting it.
//!
//! ## Example
//!
//! Import an existing key into a 3-out-of-5 group:
//!
//! ```rust,no_run
//! # use rand_core::OsRng;
//! use verglas::generic_ec::{curves::Ed25519, Scalar, SecretScalar};
//!
//! let mut secret_key = Scalar::random(&mut OsRng);
//! let secret_key = SecretScalar::new(&mut secret_key);
//!
//! let keygen = verglas::trusted_dealer::builder::<Ed25519>(5)
//!     .set_threshold(3)
//!     .set_shared_secret_key(secret_key)
//!     .generate_shares(&mut OsRng)?;
//! # Ok::<_, verglas::trusted_dealer::KeygenError>(())
//! ```
//!
//! [Appendix C]: https://www.rfc-editor.org/rfc/rfc9591.html#name-trusted-dealer-key-generati

use core::fmt;

use generic_ec::{Curve, NonZero, Point, Scalar, SecretScalar};
use rand_core::{CryptoRng, RngCore};

use crate::{
    ciphersuite::{Ciphersuite, RngError},
    key_share::{Participant, SecretShare},
};

/// Everything the dealer hands out after key generation
pub struct KeygenOutput<E: Curve> {
    /// One secret share per participant; each goes to its holder over a
    /// confidential channel and to nobody else
    pub secret_shares: Vec<SecretShare<E>>,
    /// Public description of every participant, broadcast to all
    pub participants: Vec<Participant<E>>,
    /// The group public key, equal to the first VSS commitment point
    pub group_public_key: NonZero<Point<E>>,
    /// Commitments `C_k = a_k * G` to the sharing polynomial, `t` points
    pub vss_commitment: Vec<Point<E>>,
}

impl<E: Curve> KeygenOutput<E> {
    /// VSS commitment serialized point-by-point, ready for broadcast
    pub fn vss_commitment_bytes<C: Ciphersuite<Curve = E>>(&self) -> Vec<Vec<u8>> {
        self.vss_commitment
            .iter()
            .map(|commitment| C::serialize_point(commitment).as_ref().to_vec())
            .collect()
    }
}

/// Starts building a dealer run for `max_signers` participants
///
/// Without further configuration the threshold equals `max_signers` and a
/// fresh group secret key is sampled.
pub fn builder<E: Curve>(max_signers: u16) -> Builder<E> {
    Builder {
        n: max_signers,
        t: None,
        secret_key: None,
    }
}

/// Builder of a trusted-dealer run
pub struct Builder<E: Curve> {
    n: u16,
    t: Option<u16>,
    secret_key: Option<SecretScalar<E>>,
}

impl<E: Curve> Builder<E> {
    /// Sets the signing threshold: any `t` of the participants can sign
    ///
    /// Defaults to `max_signers` (all participants required).
    pub fn set_threshold(mut self, t: u16) -> Self {
        self.t = Some(t);
        self
    }

    /// Uses `secret_key` as the group secret key instead of sampling one
    ///
    /// This imports an existing Ed25519 key into the group: signatures
    /// produced by the ceremony verify under its public key.
    pub fn set_shared_secret_key(mut self, secret_key: SecretScalar<E>) -> Self {
        self.secret_key = Some(secret_key);
        self
    }

    /// Runs the dealer
    ///
    /// Samples the polynomial `f(X) = a_0 + a_1 X + ... + a_{t-1} X^{t-1}`
    /// with `a_0` the group secret key, evaluates it at `1..=n` to obtain
    /// the shares, and derives the public output from the commitments
    /// `C_k = a_k * G`.
    pub fn generate_shares(
        self,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<KeygenOutput<E>, KeygenError> {
        let n = self.n;
        let t = self.t.unwrap_or(n);
        if n == 0 || t == 0 || t > n {
            return Err(Reason::InvalidParameters { n, t }.into());
        }

        let group_secret = match self.secret_key {
            Some(secret_key) => secret_key,
            None => random_secret_scalar::<E>(rng)?,
        };

        let mut coefficients = Vec::with_capacity(usize::from(t));
        coefficients.push(group_secret);
        for _ in 1..t {
            coefficients.push(random_secret_scalar::<E>(rng)?);
        }

        let vss_commitment = coefficients
            .iter()
            .map(|coefficient| Point::generator() * coefficient)
            .collect::<Vec<_>>();

        let mut secret_shares = Vec::with_capacity(usize::from(n));
        for i in 1..=n {
            let identifier = identifier_scalar::<E>(i)?;
            let mut secret = evaluate_polynomial(&identifier, &coefficients);
            secret_shares.push(SecretShare {
                identifier,
                secret: SecretScalar::new(&mut secret),
            });
        }

        let (group_public_key, participants) = derive_group_info(n, &vss_commitment)?;

        Ok(KeygenOutput {
            secret_shares,
            participants,
            group_public_key,
            vss_commitment,
        })
    }
}

/// Checks a secret share against the dealer's public VSS commitment
///
/// Verifies `s_i * G == sum(i^k * C_k)` in constant time with respect to the
/// share. A share that fails this check is inconsistent with the group
/// public key and must be rejected by its holder.
pub fn vss_verify<E: Curve>(
    share: &SecretShare<E>,
    vss_commitment: &[Point<E>],
) -> Result<(), VssCheckFailed> {
    let public_share = Point::generator() * &share.secret;
    let expected = evaluate_vss(&share.identifier, vss_commitment);
    if public_share == expected {
        Ok(())
    } else {
        Err(VssCheckFailed)
    }
}

// Horner's rule over the secret coefficients; scalar arithmetic is
// constant-time throughout
fn evaluate_polynomial<E: Curve>(
    x: &NonZero<Scalar<E>>,
    coefficients: &[SecretScalar<E>],
) -> Scalar<E> {
    let mut value = Scalar::zero();
    for coefficient in coefficients.iter().rev() {
        value = value * x.as_ref() + coefficient.as_ref();
    }
    value
}

// Horner's rule over the commitment points: sum(x^k * C_k) without
// materializing the powers of x. Inputs are public.
fn evaluate_vss<E: Curve>(x: &NonZero<Scalar<E>>, vss_commitment: &[Point<E>]) -> Point<E> {
    vss_commitment
        .iter()
        .rev()
        .fold(Point::zero(), |acc, commitment| {
            acc * x.as_ref() + *commitment
        })
}

fn derive_group_info<E: Curve>(
    n: u16,
    vss_commitment: &[Point<E>],
) -> Result<(NonZero<Point<E>>, Vec<Participant<E>>), KeygenError> {
    let group_public_key = vss_commitment
        .first()
        .copied()
        .and_then(NonZero::from_point)
        .ok_or(Reason::ZeroGroupKey)?;

    let mut participants = Vec::with_capacity(usize::from(n));
    for i in 1..=n {
        let identifier = identifier_scalar::<E>(i)?;
        let public_share = evaluate_vss(&identifier, vss_commitment);
        participants.push(Participant {
            identifier,
            public_share,
        });
    }
    Ok((group_public_key, participants))
}

fn random_secret_scalar<E: Curve>(
    rng: &mut (impl RngCore + CryptoRng),
) -> Result<SecretScalar<E>, RngError> {
    let mut bytes = [0u8; 64];
    rng.try_fill_bytes(&mut bytes).map_err(RngError)?;
    let mut scalar = Scalar::from_le_bytes_mod_order(bytes);
    Ok(SecretScalar::new(&mut scalar))
}

fn identifier_scalar<E: Curve>(i: u16) -> Result<NonZero<Scalar<E>>, Bug> {
    NonZero::from_scalar(Scalar::from(i)).ok_or(Bug::ZeroIdentifier)
}

/// Key generation failed
#[derive(Debug)]
pub struct KeygenError(Reason);

#[derive(Debug)]
enum Reason {
    InvalidParameters { n: u16, t: u16 },
    ZeroGroupKey,
    Rng(RngError),
    Bug(Bug),
}

#[derive(Debug)]
enum Bug {
    ZeroIdentifier,
}

impl fmt::Display for KeygenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Reason::InvalidParameters { n, t } => write!(
                f,
                "invalid parameters: threshold must satisfy 1 <= t <= n, \
                got t={t}, n={n}"
            ),
            Reason::ZeroGroupKey => f.write_str("group secret key is zero"),
            Reason::Rng(_) => f.write_str("sample polynomial coefficients"),
            Reason::Bug(_) => f.write_str("bug occurred"),
        }
    }
}

impl fmt::Display for Bug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bug::ZeroIdentifier => f.write_str("identifier in 1..=n reduced to zero"),
        }
    }
}

impl std::error::Error for KeygenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.0 {
            Reason::InvalidParameters { .. } | Reason::ZeroGroupKey => None,
            Reason::Rng(err) => Some(err),
            Reason::Bug(bug) => Some(bug),
        }
    }
}

impl std::error::Error for Bug {}

impl From<Reason> for KeygenError {
    fn from(err: Reason) -> Self {
        Self(err)
    }
}
impl From<RngError> for KeygenError {
    fn from(err: RngError) -> Self {
        Self(Reason::Rng(err))
    }
}
impl From<Bug> for KeygenError {
    fn from(err: Bug) -> Self {
        Self(Reason::Bug(err))
    }
}

/// Secret share is inconsistent with the dealer's VSS commitment
#[derive(Debug)]
pub struct VssCheckFailed;

impl fmt::Display for VssCheckFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("secret share does not match the vss commitment")
    }
}

impl std::error::Error for VssCheckFailed {}
