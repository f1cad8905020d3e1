//! Per-ceremony signing state

use core::fmt;

use generic_ec::{Curve, NonZero, Point, Scalar, SecretScalar};
use rand_core::{CryptoRng, RngCore};

use crate::{
    ciphersuite::{self, Ciphersuite, RngError},
    key_share::{Participant, SecretShare},
};

use super::{signature::Signature, utils};

/// Nonce commitment broadcast in the first round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Commitment<E: Curve> {
    /// Identifier of the committing participant
    pub identifier: NonZero<Scalar<E>>,
    /// Hiding nonce commitment `D = d * G`
    pub hiding: Point<E>,
    /// Binding nonce commitment `E = e * G`
    pub binding: Point<E>,
}

/// Partial signature issued in the second round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureShare<E: Curve> {
    /// Identifier of the issuing participant
    pub identifier: NonZero<Scalar<E>>,
    /// Share `z_i = d_i + rho_i * e_i + lambda_i * s_i * c`
    pub share: Scalar<E>,
}

// Secret nonce pair. Lives inside the state between commit and sign, and is
// consumed the moment a share is produced; dropping it zeroizes both scalars.
struct SecretNonces<E: Curve> {
    hiding: SecretScalar<E>,
    binding: SecretScalar<E>,
}

/// State of a single signing ceremony
///
/// A signer state (constructed with a [`SecretShare`]) goes through
/// [`commit`](State::commit), then [`sign`](State::sign). A coordinator
/// state (no share) runs [`sign`](State::sign) to derive the group
/// commitment, then [`verify_signature_share`](State::verify_signature_share)
/// and [`aggregate`](State::aggregate).
///
/// A state covers exactly one ceremony for one message: committing or
/// signing twice is rejected. Run concurrent ceremonies on separate states.
/// Dropping the state zeroizes the secret share and any unconsumed nonces.
pub struct State<C: Ciphersuite> {
    participants: Vec<Participant<C::Curve>>,
    group_public_key: NonZero<Point<C::Curve>>,
    msg: Vec<u8>,
    my_secret_share: Option<SecretShare<C::Curve>>,
    my_nonce: Option<SecretNonces<C::Curve>>,
    my_commitment: Option<Commitment<C::Curve>>,
    commitments: Vec<Commitment<C::Curve>>,
    binding_factors: utils::BindingFactors<C::Curve>,
    group_commitment: Option<Point<C::Curve>>,
    challenge: Option<Scalar<C::Curve>>,
}

impl<C: Ciphersuite> State<C> {
    /// Creates a state for one ceremony over `msg`
    ///
    /// Pass the signer's own [`SecretShare`] to take part in the signing, or
    /// `None` for a coordinator that only verifies and aggregates.
    pub fn new(
        participants: Vec<Participant<C::Curve>>,
        group_public_key: NonZero<Point<C::Curve>>,
        msg: &[u8],
        secret_share: Option<SecretShare<C::Curve>>,
    ) -> Self {
        Self {
            participants,
            group_public_key,
            msg: msg.to_vec(),
            my_secret_share: secret_share,
            my_nonce: None,
            my_commitment: None,
            commitments: Vec::new(),
            binding_factors: Vec::new(),
            group_commitment: None,
            challenge: None,
        }
    }

    /// Round 1: commits to a fresh nonce pair
    ///
    /// Samples the hiding and binding nonces, keeps them inside the state and
    /// returns the public [`Commitment`] to broadcast.
    ///
    /// **Never reuse nonces.** A second `commit` on the same state would
    /// silently discard the pair already committed to, so it is rejected;
    /// start a new state instead.
    pub fn commit(
        &mut self,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<Commitment<C::Curve>, CommitError> {
        if self.my_commitment.is_some() {
            return Err(CommitReason::AlreadyCommitted.into());
        }
        let share = self
            .my_secret_share
            .as_ref()
            .ok_or(CommitReason::MissingShare)?;

        let hiding = ciphersuite::generate_nonce::<C>(rng, &share.secret)?;
        let binding = ciphersuite::generate_nonce::<C>(rng, &share.secret)?;

        let commitment = Commitment {
            identifier: share.identifier,
            hiding: Point::generator() * &hiding,
            binding: Point::generator() * &binding,
        };
        self.my_nonce = Some(SecretNonces { hiding, binding });
        self.my_commitment = Some(commitment);
        Ok(commitment)
    }

    /// Round 2: signs the message over the given commitment list
    ///
    /// The input list is taken as-is from the transport: it is copied, sorted
    /// canonically and never mutated. The group commitment and challenge are
    /// derived and retained for [`verify_signature_share`](Self::verify_signature_share)
    /// and [`aggregate`](Self::aggregate).
    ///
    /// A signer state returns its [`SignatureShare`] and consumes its nonces;
    /// a coordinator state returns `None`. A signer's own commitment must
    /// appear in the list with exactly the bytes it broadcast, otherwise the
    /// share would not verify.
    pub fn sign(
        &mut self,
        commitments: &[Commitment<C::Curve>],
    ) -> Result<Option<SignatureShare<C::Curve>>, SignError> {
        if self.group_commitment.is_some() {
            return Err(SignReason::AlreadySigned.into());
        }

        let mut commitments = commitments.to_vec();
        utils::sort_commitments_by_identifier::<C>(&mut commitments);
        if commitments
            .windows(2)
            .any(|w| w[0].identifier == w[1].identifier)
        {
            return Err(SignReason::DuplicateIdentifier.into());
        }

        // Signer-path preconditions come before any state is touched, so a
        // misordered call leaves the state usable
        let my_commitment = match &self.my_secret_share {
            Some(_) => {
                let mine = self.my_commitment.ok_or(SignReason::NotCommitted)?;
                let published = commitments.iter().find(|c| c.identifier == mine.identifier);
                if published != Some(&mine) {
                    return Err(SignReason::OwnCommitmentMissing.into());
                }
                Some(mine)
            }
            None => None,
        };

        let binding_factors =
            utils::compute_binding_factors::<C>(self.group_public_key, &commitments, &self.msg);
        let group_commitment = utils::compute_group_commitment(&commitments, &binding_factors);
        let challenge =
            utils::compute_challenge::<C>(&group_commitment, &self.group_public_key, &self.msg);

        self.commitments = commitments;
        self.binding_factors = binding_factors;
        self.group_commitment = Some(group_commitment);
        self.challenge = Some(challenge);

        let (Some(share), Some(my_commitment)) = (&self.my_secret_share, my_commitment) else {
            // Coordinator: group commitment and challenge are all it needs
            return Ok(None);
        };

        let identifiers = self
            .commitments
            .iter()
            .map(|c| c.identifier)
            .collect::<Vec<_>>();
        let lambda = utils::derive_interpolating_value::<C>(&identifiers, &my_commitment.identifier)?;
        let rho = utils::binding_factor_for_participant(
            &self.binding_factors,
            &my_commitment.identifier,
        )
        .ok_or(Bug::OwnBindingFactor)?;

        let nonce = self.my_nonce.take().ok_or(Bug::NonceConsumed)?;
        let z = nonce.hiding + nonce.binding * rho + lambda * share.secret.as_ref() * challenge;

        Ok(Some(SignatureShare {
            identifier: share.identifier,
            share: z,
        }))
    }

    /// Checks a single signature share against its owner's commitment and
    /// public key share
    ///
    /// Verifies `z_i * G == (D_i + rho_i * E_i) + (c * lambda_i) * PK_i` in
    /// constant time. Returns `Ok(false)` for a share that simply does not
    /// verify; errors are reserved for structural problems (unknown
    /// identifier, [`sign`](Self::sign) not run yet).
    pub fn verify_signature_share(
        &self,
        share: &SignatureShare<C::Curve>,
    ) -> Result<bool, VerifyShareError> {
        let challenge = self
            .challenge
            .ok_or(VerifyReason::MissingGroupCommitment)?;

        let participant = self
            .participants
            .iter()
            .find(|p| p.identifier == share.identifier)
            .ok_or(VerifyReason::UnknownParticipant)?;
        let commitment = self
            .commitments
            .iter()
            .find(|c| c.identifier == share.identifier)
            .ok_or(VerifyReason::UnknownParticipant)?;
        let rho = utils::binding_factor_for_participant(&self.binding_factors, &share.identifier)
            .ok_or(VerifyReason::UnknownParticipant)?;

        let identifiers = self
            .commitments
            .iter()
            .map(|c| c.identifier)
            .collect::<Vec<_>>();
        let lambda = utils::derive_interpolating_value::<C>(&identifiers, &share.identifier)?;

        let commitment_share = commitment.hiding + commitment.binding * rho;
        let lhs = Point::generator() * share.share;
        let rhs = commitment_share + participant.public_share * (challenge * lambda);
        Ok(lhs == rhs)
    }

    /// Combines signature shares into the final [`Signature`]
    ///
    /// Requires [`sign`](Self::sign) to have run on this state. Shares are
    /// summed as given: a share that would fail
    /// [`verify_signature_share`](Self::verify_signature_share) yields an
    /// invalid signature, so either filter shares first or use
    /// [`aggregate_verified`](Self::aggregate_verified).
    pub fn aggregate(
        &self,
        shares: &[SignatureShare<C::Curve>],
    ) -> Result<Signature<C>, AggregateError> {
        let r = self
            .group_commitment
            .ok_or(AggregateReason::MissingGroupCommitment)?;
        let z = shares.iter().map(|share| share.share).sum();
        Ok(Signature { r, z })
    }

    /// Verifies every share, then aggregates
    ///
    /// Reports the position of the first share that fails verification.
    pub fn aggregate_verified(
        &self,
        shares: &[SignatureShare<C::Curve>],
    ) -> Result<Signature<C>, AggregateError> {
        for (index, share) in shares.iter().enumerate() {
            match self.verify_signature_share(share) {
                Ok(true) => {}
                Ok(false) => return Err(AggregateReason::InvalidShare(index).into()),
                Err(err) => return Err(AggregateReason::Verify(err).into()),
            }
        }
        self.aggregate(shares)
    }
}

/// Committing to nonces failed
#[derive(Debug)]
pub struct CommitError(CommitReason);

#[derive(Debug)]
enum CommitReason {
    MissingShare,
    AlreadyCommitted,
    Rng(RngError),
}

impl fmt::Display for CommitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            CommitReason::MissingShare => {
                f.write_str("state has no secret share: a coordinator-only state cannot commit")
            }
            CommitReason::AlreadyCommitted => f.write_str(
                "state already holds a commitment: committing again would \
                discard the nonces it promised to use",
            ),
            CommitReason::Rng(_) => f.write_str("generate nonces"),
        }
    }
}

impl std::error::Error for CommitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.0 {
            CommitReason::MissingShare | CommitReason::AlreadyCommitted => None,
            CommitReason::Rng(err) => Some(err),
        }
    }
}

impl From<CommitReason> for CommitError {
    fn from(err: CommitReason) -> Self {
        Self(err)
    }
}
impl From<RngError> for CommitError {
    fn from(err: RngError) -> Self {
        Self(CommitReason::Rng(err))
    }
}

/// Producing a signature share failed
#[derive(Debug)]
pub struct SignError(SignReason);

#[derive(Debug)]
enum SignReason {
    AlreadySigned,
    NotCommitted,
    OwnCommitmentMissing,
    DuplicateIdentifier,
    Interpolate(utils::InterpolateError),
    Bug(Bug),
}

#[derive(Debug)]
enum Bug {
    OwnBindingFactor,
    NonceConsumed,
}

impl fmt::Display for SignError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            SignReason::AlreadySigned => f.write_str(
                "state has already signed: reusing nonces for a second \
                signature would leak the secret share",
            ),
            SignReason::NotCommitted => {
                f.write_str("signer must commit to nonces before signing")
            }
            SignReason::OwnCommitmentMissing => f.write_str(
                "own commitment is missing from the commitment list, or \
                does not match the commitment broadcast earlier",
            ),
            SignReason::DuplicateIdentifier => {
                f.write_str("commitment list contains the same identifier twice")
            }
            SignReason::Interpolate(_) => f.write_str("derive interpolating value"),
            SignReason::Bug(_) => f.write_str("bug occurred"),
        }
    }
}

impl fmt::Display for Bug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bug::OwnBindingFactor => f.write_str("own binding factor not found"),
            Bug::NonceConsumed => f.write_str("nonces consumed before signing"),
        }
    }
}

impl std::error::Error for SignError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.0 {
            SignReason::AlreadySigned
            | SignReason::NotCommitted
            | SignReason::OwnCommitmentMissing
            | SignReason::DuplicateIdentifier => None,
            SignReason::Interpolate(err) => Some(err),
            SignReason::Bug(bug) => Some(bug),
        }
    }
}

impl std::error::Error for Bug {}

impl From<SignReason> for SignError {
    fn from(err: SignReason) -> Self {
        Self(err)
    }
}
impl From<Bug> for SignError {
    fn from(err: Bug) -> Self {
        Self(SignReason::Bug(err))
    }
}
impl From<utils::InterpolateError> for SignError {
    fn from(err: utils::InterpolateError) -> Self {
        Self(SignReason::Interpolate(err))
    }
}

/// Signature share verification could not run
#[derive(Debug)]
pub struct VerifyShareError(VerifyReason);

#[derive(Debug)]
enum VerifyReason {
    MissingGroupCommitment,
    UnknownParticipant,
    Interpolate(utils::InterpolateError),
}

impl fmt::Display for VerifyShareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            VerifyReason::MissingGroupCommitment => {
                f.write_str("group commitment not derived yet: run sign first")
            }
            VerifyReason::UnknownParticipant => f.write_str(
                "share issuer is not in the participant list or did not commit",
            ),
            VerifyReason::Interpolate(_) => f.write_str("derive interpolating value"),
        }
    }
}

impl std::error::Error for VerifyShareError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.0 {
            VerifyReason::MissingGroupCommitment | VerifyReason::UnknownParticipant => None,
            VerifyReason::Interpolate(err) => Some(err),
        }
    }
}

impl From<VerifyReason> for VerifyShareError {
    fn from(err: VerifyReason) -> Self {
        Self(err)
    }
}
impl From<utils::InterpolateError> for VerifyShareError {
    fn from(err: utils::InterpolateError) -> Self {
        Self(VerifyReason::Interpolate(err))
    }
}

/// Aggregation failed
#[derive(Debug)]
pub struct AggregateError(AggregateReason);

#[derive(Debug)]
enum AggregateReason {
    MissingGroupCommitment,
    InvalidShare(usize),
    Verify(VerifyShareError),
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            AggregateReason::MissingGroupCommitment => {
                f.write_str("group commitment not derived yet: run sign first")
            }
            AggregateReason::InvalidShare(index) => {
                write!(f, "signature share #{index} failed verification")
            }
            AggregateReason::Verify(_) => f.write_str("verify signature share"),
        }
    }
}

impl std::error::Error for AggregateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.0 {
            AggregateReason::MissingGroupCommitment | AggregateReason::InvalidShare(_) => None,
            AggregateReason::Verify(err) => Some(err),
        }
    }
}

impl From<AggregateReason> for AggregateError {
    fn from(err: AggregateReason) -> Self {
        Self(err)
    }
}
