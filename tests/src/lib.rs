use verglas::{
    generic_ec::{NonZero, Point},
    signing::Signature,
    Ciphersuite,
};

/// Checks an aggregated signature with a verifier entirely independent of
/// the crate under test
pub trait ExternalVerifier: Ciphersuite + Sized {
    type InvalidSig: core::fmt::Debug;

    fn verify_sig(
        pk: &NonZero<Point<Self::Curve>>,
        sig: &Signature<Self>,
        msg: &[u8],
    ) -> Result<(), Self::InvalidSig>;
}

impl ExternalVerifier for verglas::ciphersuite::Ed25519 {
    type InvalidSig = ed25519::SignatureError;

    fn verify_sig(
        pk: &NonZero<Point<Self::Curve>>,
        sig: &Signature<Self>,
        msg: &[u8],
    ) -> Result<(), ed25519::SignatureError> {
        let pk = ed25519::VerifyingKey::from_bytes(
            &Self::serialize_point(pk)
                .as_bytes()
                .try_into()
                .expect("wrong size of pk"),
        )
        .expect("invalid pk");

        let mut sig_bytes = [0u8; 64];
        sig.write_to_slice(&mut sig_bytes);
        let sig = ed25519::Signature::from_bytes(&sig_bytes);

        pk.verify_strict(msg, &sig)
    }
}
