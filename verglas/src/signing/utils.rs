//! Ceremony building blocks shared by signers and the coordinator
//!
//! Everything here is deterministic: given the same group key, message and
//! commitment list, every party derives the same binding factors, group
//! commitment and challenge. The functions expect commitment lists already in
//! canonical order (see [`sort_commitments_by_identifier`]); debug builds
//! assert it.

use core::{fmt, iter};

use digest::{FixedOutput, Update};
use generic_ec::{Curve, NonZero, Point, Scalar};

use crate::ciphersuite::Ciphersuite;

use super::state::Commitment;

/// Binding factors for a commitment list, aligned with the list order
pub type BindingFactors<E> = Vec<(NonZero<Scalar<E>>, Scalar<E>)>;

/// Sorts commitments ascending by the canonical byte encoding of their
/// identifiers
///
/// This is the one ordering every party must apply before hashing the list;
/// two parties that disagree on it derive different binding factors and their
/// shares silently fail to verify.
pub fn sort_commitments_by_identifier<C: Ciphersuite>(commitments: &mut [Commitment<C::Curve>]) {
    commitments.sort_unstable_by(|a, b| {
        C::serialize_scalar(&a.identifier)
            .as_ref()
            .cmp(C::serialize_scalar(&b.identifier).as_ref())
    });
}

pub(crate) fn commitments_sorted<C: Ciphersuite>(commitments: &[Commitment<C::Curve>]) -> bool {
    commitments.windows(2).all(|w| {
        C::serialize_scalar(&w[0].identifier).as_ref()
            <= C::serialize_scalar(&w[1].identifier).as_ref()
    })
}

fn identifiers_sorted<C: Ciphersuite>(identifiers: &[NonZero<Scalar<C::Curve>>]) -> bool {
    identifiers.windows(2).all(|w| {
        C::serialize_scalar(&w[0]).as_ref() <= C::serialize_scalar(&w[1]).as_ref()
    })
}

/// Feeds the canonical encoding of a commitment list into `output`
///
/// Per commitment, in list order: `identifier || hiding || binding`. The
/// encoding goes straight into the digest instead of through an intermediate
/// buffer; with the list in canonical order this is the list encoding from
/// [Section 4.3] of RFC 9591.
///
/// [Section 4.3]: https://www.rfc-editor.org/rfc/rfc9591.html#name-list-operations
pub fn encode_group_commitment_list<C: Ciphersuite>(
    mut output: C::Digest,
    commitments: &[Commitment<C::Curve>],
) -> C::Digest {
    debug_assert!(
        commitments_sorted::<C>(commitments),
        "commitment list must be sorted"
    );

    for commitment in commitments {
        output.update(C::serialize_scalar(&commitment.identifier).as_ref());
        output.update(C::serialize_point(&commitment.hiding).as_ref());
        output.update(C::serialize_point(&commitment.binding).as_ref());
    }
    output
}

/// Computes the binding factor of every commitment in the list
///
/// Each factor ties its owner's nonces to the group key, the message and the
/// whole commitment list:
/// `rho_i = H1(encode(PK) || H4(msg) || H5(encode(list)) || encode(i))`.
/// The output is aligned with `commitments`.
pub fn compute_binding_factors<C: Ciphersuite>(
    group_public_key: NonZero<Point<C::Curve>>,
    commitments: &[Commitment<C::Curve>],
    msg: &[u8],
) -> BindingFactors<C::Curve> {
    debug_assert!(
        commitments_sorted::<C>(commitments),
        "commitment list must be sorted"
    );

    let pk_bytes = C::serialize_point(&group_public_key);
    let msg_hash = C::h4().chain(msg).finalize_fixed();
    let commitment_list_hash =
        encode_group_commitment_list::<C>(C::h5(), commitments).finalize_fixed();

    let mut binding_factors = Vec::with_capacity(commitments.len());
    for commitment in commitments {
        let factor = C::h1(&[
            pk_bytes.as_ref(),
            &msg_hash,
            &commitment_list_hash,
            C::serialize_scalar(&commitment.identifier).as_ref(),
        ]);
        binding_factors.push((commitment.identifier, factor));
    }
    binding_factors
}

/// Looks up the binding factor belonging to `identifier`
pub fn binding_factor_for_participant<E: Curve>(
    binding_factors: &[(NonZero<Scalar<E>>, Scalar<E>)],
    identifier: &NonZero<Scalar<E>>,
) -> Option<Scalar<E>> {
    binding_factors
        .iter()
        .find(|(i, _)| i == identifier)
        .map(|(_, factor)| *factor)
}

/// Computes the group commitment `R = sum(D_i + rho_i * E_i)`
///
/// `commitments` and `binding_factors` must be aligned, i.e.
/// `commitments[i].identifier == binding_factors[i].0`.
pub fn compute_group_commitment<E: Curve>(
    commitments: &[Commitment<E>],
    binding_factors: &[(NonZero<Scalar<E>>, Scalar<E>)],
) -> Point<E> {
    commitments
        .iter()
        .zip(binding_factors)
        .map(|(commitment, (i, factor))| {
            debug_assert_eq!(commitment.identifier, *i);
            (commitment, *factor)
        })
        .fold(Point::zero(), |acc, (commitment, factor)| {
            acc + commitment.hiding + commitment.binding * factor
        })
}

/// Computes the challenge `c = H2(encode(R) || encode(PK) || msg)`
///
/// Under the [`Ed25519`](crate::ciphersuite::Ed25519) suite `H2` is
/// undomained, so `c` equals the challenge a stock Ed25519 verifier
/// recomputes for the final signature.
pub fn compute_challenge<C: Ciphersuite>(
    group_commitment: &Point<C::Curve>,
    group_public_key: &Point<C::Curve>,
    msg: &[u8],
) -> Scalar<C::Curve> {
    let r_bytes = C::serialize_point(group_commitment);
    let pk_bytes = C::serialize_point(group_public_key);
    C::h2(&[r_bytes.as_ref(), pk_bytes.as_ref(), msg])
}

/// Derives the Lagrange coefficient of `x_i` for interpolating the dealer
/// polynomial at zero: `lambda_i = prod(x_j / (x_j - x_i))` over all other
/// `x_j` in `signers`
///
/// `signers` must be sorted ascending by identifier encoding; the single
/// pass below relies on it to detect duplicates.
pub fn derive_interpolating_value<C: Ciphersuite>(
    signers: &[NonZero<Scalar<C::Curve>>],
    x_i: &NonZero<Scalar<C::Curve>>,
) -> Result<Scalar<C::Curve>, InterpolateError> {
    debug_assert!(
        identifiers_sorted::<C>(signers),
        "signers list must be sorted"
    );

    let mut x_i_seen = false;
    let mut num = Scalar::one();
    let mut denom = NonZero::<Scalar<C::Curve>>::one();

    for (x_j, prev) in signers
        .iter()
        .zip(iter::once(None).chain(signers.iter().map(Some)))
    {
        if Some(x_j) == prev {
            return Err(Reason::DuplicateIdentifier.into());
        }
        let Some(difference) = NonZero::from_scalar(x_j - x_i) else {
            // x_j == x_i
            x_i_seen = true;
            continue;
        };
        num *= x_j.as_ref();
        denom = denom * difference;
    }

    if !x_i_seen {
        return Err(Reason::NotAParticipant.into());
    }

    Ok(num * denom.invert())
}

/// Interpolation failed
#[derive(Debug)]
pub struct InterpolateError(Reason);

#[derive(Debug)]
enum Reason {
    NotAParticipant,
    DuplicateIdentifier,
}

impl fmt::Display for InterpolateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Reason::NotAParticipant => {
                f.write_str("interpolation point is not in the list of participants")
            }
            Reason::DuplicateIdentifier => {
                f.write_str("list of participants contains the same identifier twice")
            }
        }
    }
}

impl std::error::Error for InterpolateError {}

impl From<Reason> for InterpolateError {
    fn from(err: Reason) -> Self {
        Self(err)
    }
}
