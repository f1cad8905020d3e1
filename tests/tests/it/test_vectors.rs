//! Test vectors from [Appendix E] of RFC 9591
//!
//! [Appendix E]: https://www.rfc-editor.org/rfc/rfc9591.html#appendix-E

use hex_literal::hex;
use rand::{CryptoRng, RngCore};
use verglas::{
    generic_ec::{NonZero, Point, Scalar},
    key_share::{Participant, SecretShare},
    signing::{utils, State},
    wire, Ciphersuite,
};
use verglas_tests::ExternalVerifier;

struct TestVector<const T: usize, const N: usize> {
    public_key: &'static [u8],
    secret_key: &'static [u8],

    shares: [&'static [u8]; N],

    // keygen indices (0-based) of the participants taking part
    signers: [u16; T],
    commit_randomness: [&'static [u8]; T],
    expected_commitments: [[&'static [u8]; 2]; T],

    msg: &'static [u8],

    expected_sig_shares: [&'static [u8]; T],

    expected_sig: &'static [u8],
}

impl<const T: usize, const N: usize> TestVector<T, N> {
    fn carry_out<C: Ciphersuite + ExternalVerifier>(&self) {
        let group_public_key = wire::group_key_from_bytes::<C>(self.public_key).unwrap();
        {
            let secret_key = C::deserialize_secret_scalar(self.secret_key).unwrap();
            assert_eq!(Point::generator() * &secret_key, *group_public_key);
        }

        // Long-term key material of every participant
        let shares = self
            .shares
            .iter()
            .enumerate()
            .map(|(j, share)| {
                let j: u16 = j.try_into().unwrap();
                SecretShare {
                    identifier: NonZero::from_scalar(Scalar::from(j + 1)).unwrap(),
                    secret: C::deserialize_secret_scalar(share).unwrap(),
                }
            })
            .collect::<Vec<_>>();
        let participants = shares
            .iter()
            .map(|share| Participant {
                identifier: share.identifier,
                public_share: share.public_share(),
            })
            .collect::<Vec<_>>();

        // --- Round 1
        let mut states = self
            .signers
            .iter()
            .map(|&j| {
                State::<C>::new(
                    participants.clone(),
                    group_public_key,
                    self.msg,
                    Some(shares[usize::from(j)].clone()),
                )
            })
            .collect::<Vec<_>>();
        let commitments = states
            .iter_mut()
            .zip(self.commit_randomness)
            .map(|(state, randomness)| {
                state.commit(&mut mocked_randomness(randomness)).unwrap()
            })
            .collect::<Vec<_>>();

        for (commitment, [hiding, binding]) in commitments.iter().zip(self.expected_commitments) {
            assert_eq!(commitment.hiding, C::deserialize_point(hiding).unwrap());
            assert_eq!(commitment.binding, C::deserialize_point(binding).unwrap());
        }

        // --- Round 2
        let sig_shares = states
            .iter_mut()
            .map(|state| state.sign(&commitments).unwrap().unwrap())
            .collect::<Vec<_>>();

        for (sig_share, expected) in sig_shares.iter().zip(self.expected_sig_shares) {
            assert_eq!(sig_share.share, C::deserialize_scalar(expected).unwrap());
        }

        // --- Aggregation on a coordinator state holding no share
        let mut coordinator =
            State::<C>::new(participants.clone(), group_public_key, self.msg, None);
        assert!(coordinator.sign(&commitments).unwrap().is_none());
        for sig_share in &sig_shares {
            assert!(coordinator.verify_signature_share(sig_share).unwrap());
        }
        let sig = coordinator.aggregate(&sig_shares).unwrap();

        assert_eq!(sig.to_vec(), self.expected_sig);
        sig.verify(&group_public_key, self.msg).unwrap();
        C::verify_sig(&group_public_key, &sig, self.msg).unwrap();

        // --- Interpolating the participating shares at zero recovers the
        // group secret key
        let identifiers = self
            .signers
            .iter()
            .map(|&j| shares[usize::from(j)].identifier)
            .collect::<Vec<_>>();
        let recovered = self
            .signers
            .iter()
            .map(|&j| {
                let share = &shares[usize::from(j)];
                let lambda =
                    utils::derive_interpolating_value::<C>(&identifiers, &share.identifier)
                        .unwrap();
                lambda * share.secret.as_ref()
            })
            .sum::<Scalar<C::Curve>>();
        assert_eq!(recovered, C::deserialize_scalar(self.secret_key).unwrap());
    }
}

#[test]
fn ed25519() {
    TestVector {
        public_key: &hex!("15d21ccd7ee42959562fc8aa63224c8851fb3ec85a3faf66040d380fb9738673"),
        secret_key: &hex!("7b1c33d3f5291d85de664833beb1ad469f7fb6025a0ec78b3a790c6e13a98304"),

        shares: [
            &hex!("929dcc590407aae7d388761cddb0c0db6f5627aea8e217f4a033f2ec83d93509"),
            &hex!("a91e66e012e4364ac9aaa405fcafd370402d9859f7b6685c07eed76bf409e80d"),
            &hex!("d3cb090a075eb154e82fdb4b3cb507f110040905468bb9c46da8bdea643a9a02"),
        ],

        signers: [0, 2],
        commit_randomness: [
            &hex!(
                "0fd2e39e111cdc266f6c0f4d0fd45c947761f1f5d3cb583dfcb9bbaf8d4c9fec
                69cd85f631d5f7f2721ed5e40519b1366f340a87c2f6856363dbdcda348a7501"
            ),
            &hex!(
                "86d64a260059e495d0fb4fcc17ea3da7452391baa494d4b00321098ed2a0062f
                13e6b25afb2eba51716a9a7d44130c0dbae0004a9ef8d7b5550c8a0e07c61775"
            ),
        ],
        expected_commitments: [
            [
                &hex!("b5aa8ab305882a6fc69cbee9327e5a45e54c08af61ae77cb8207be3d2ce13de3"),
                &hex!("67e98ab55aa310c3120418e5050c9cf76cf387cb20ac9e4b6fdb6f82a469f932"),
            ],
            [
                &hex!("cfbdb165bd8aad6eb79deb8d287bcc0ab6658ae57fdcc98ed12c0669e90aec91"),
                &hex!("7487bc41a6e712eea2f2af24681b58b1cf1da278ea11fe4e8b78398965f13552"),
            ],
        ],

        msg: &hex!("74657374"),

        expected_sig_shares: [
            &hex!("001719ab5a53ee1a12095cd088fd149702c0720ce5fd2f29dbecf24b7281b603"),
            &hex!("bd86125de990acc5e1f13781d8e32c03a9bbd4c53539bbc106058bfd14326007"),
        ],

        expected_sig: &hex!(
            "36282629c383bb820a88b71cae937d41f2f2adfcc3d02e55507e2fb9e2dd3cbe
            bd9d2b0844e49ae0f3fa935161e1419aab7b47d21a37ebeae1f17d4987b3160b"
        ),
    }
    .carry_out::<verglas::ciphersuite::Ed25519>()
}

fn mocked_randomness(bytes: &[u8]) -> impl RngCore + CryptoRng + '_ {
    struct MockedRng<'b>(&'b [u8]);
    impl<'b> RngCore for MockedRng<'b> {
        fn fill_bytes(&mut self, dest: &mut [u8]) {
            let len = dest.len();
            let (randomness, leftover) = self.0.split_at(len);
            dest.copy_from_slice(randomness);
            self.0 = leftover;
        }

        fn next_u32(&mut self) -> u32 {
            rand_core::impls::next_u32_via_fill(self)
        }
        fn next_u64(&mut self) -> u64 {
            rand_core::impls::next_u64_via_fill(self)
        }
        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            Ok(self.fill_bytes(dest))
        }
    }
    impl<'b> CryptoRng for MockedRng<'b> {}

    MockedRng(bytes)
}
