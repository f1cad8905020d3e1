//! Wire-format round trips and rejection of malformed inputs

use hex_literal::hex;
use verglas::{
    signing::{Commitment, Signature, SignatureShare},
    wire, Ciphersuite,
};

type C = verglas::ciphersuite::Ed25519;
type E = <C as Ciphersuite>::Curve;

// Identifier 1 plus the first signer's nonce commitments from the RFC 9591
// Appendix E.1 vector
fn sample_commitment_bytes() -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&identifier_bytes(1));
    bytes.extend_from_slice(&hex!(
        "b5aa8ab305882a6fc69cbee9327e5a45e54c08af61ae77cb8207be3d2ce13de3"
    ));
    bytes.extend_from_slice(&hex!(
        "67e98ab55aa310c3120418e5050c9cf76cf387cb20ac9e4b6fdb6f82a469f932"
    ));
    bytes
}

fn sample_commitment() -> Commitment<E> {
    wire::commitment_from_bytes::<C>(&sample_commitment_bytes()).unwrap()
}

fn sample_sig_share_bytes() -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&identifier_bytes(1));
    bytes.extend_from_slice(&hex!(
        "001719ab5a53ee1a12095cd088fd149702c0720ce5fd2f29dbecf24b7281b603"
    ));
    bytes
}

fn sample_sig_share() -> SignatureShare<E> {
    wire::sig_share_from_bytes::<C>(&sample_sig_share_bytes()).unwrap()
}

fn identifier_bytes(id: u8) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    bytes[0] = id;
    bytes
}

#[test]
fn commitment_bytes_round_trip() {
    let commitment = sample_commitment();
    let bytes = wire::commitment_to_bytes::<C>(&commitment);
    assert_eq!(bytes, sample_commitment_bytes());
    assert_eq!(
        wire::commitment_from_bytes::<C>(&bytes).unwrap(),
        commitment
    );
}

#[test]
fn commitment_json_round_trip() {
    let commitment = sample_commitment();
    let json = wire::commitment_to_json::<C>(&commitment).unwrap();

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    for key in ["i", "h", "b"] {
        assert!(value.get(key).is_some(), "missing key {key}");
    }

    let decoded = wire::commitment_from_json::<C>(json.as_bytes()).unwrap();
    assert_eq!(decoded, commitment);
}

#[test]
fn sig_share_bytes_round_trip() {
    let share = sample_sig_share();
    let bytes = wire::sig_share_to_bytes::<C>(&share);
    assert_eq!(bytes, sample_sig_share_bytes());
    assert_eq!(wire::sig_share_from_bytes::<C>(&bytes).unwrap(), share);
}

#[test]
fn sig_share_json_round_trip() {
    let share = sample_sig_share();
    let json = wire::sig_share_to_json::<C>(&share).unwrap();

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    for key in ["i", "s"] {
        assert!(value.get(key).is_some(), "missing key {key}");
    }

    let decoded = wire::sig_share_from_json::<C>(json.as_bytes()).unwrap();
    assert_eq!(decoded, share);
}

#[test]
fn rejects_non_canonical_scalar() {
    // The group order itself: the smallest non-canonical encoding
    let order = hex!("edd3f55c1a631258d69cf7a2def9de1400000000000000000000000000000010");

    let mut bytes = sample_sig_share_bytes();
    bytes[32..].copy_from_slice(&order);
    assert!(wire::sig_share_from_bytes::<C>(&bytes).is_err());
}

#[test]
fn rejects_zero_identifier() {
    let mut bytes = sample_commitment_bytes();
    bytes[..32].copy_from_slice(&[0u8; 32]);
    assert!(wire::commitment_from_bytes::<C>(&bytes).is_err());
}

#[test]
fn rejects_invalid_point() {
    // y coordinate out of range
    let mut bytes = sample_commitment_bytes();
    bytes[32..64].copy_from_slice(&[0xff; 32]);
    assert!(wire::commitment_from_bytes::<C>(&bytes).is_err());
}

#[test]
fn rejects_small_order_point() {
    // (0, -1), a valid curve point of order 2, is outside the prime-order
    // subgroup
    let order_two = hex!("ecffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff7f");

    let mut bytes = sample_commitment_bytes();
    bytes[64..].copy_from_slice(&order_two);
    assert!(wire::commitment_from_bytes::<C>(&bytes).is_err());
}

#[test]
fn rejects_wrong_length() {
    let bytes = sample_commitment_bytes();
    assert!(wire::commitment_from_bytes::<C>(&bytes[..95]).is_err());

    let bytes = sample_sig_share_bytes();
    assert!(wire::sig_share_from_bytes::<C>(&bytes[..63]).is_err());
}

#[test]
fn rejects_malformed_json_and_base64() {
    assert!(wire::commitment_from_json::<C>(b"not json at all").is_err());
    assert!(wire::sig_share_from_json::<C>(b"[1, 2, 3]").is_err());

    let json = r#"{"i":"!!!not-base64!!!","h":"","b":""}"#;
    assert!(wire::commitment_from_json::<C>(json.as_bytes()).is_err());

    // Well-formed base64, wrong decoded length
    let json = r#"{"i":"AQ==","s":"AQ=="}"#;
    assert!(wire::sig_share_from_json::<C>(json.as_bytes()).is_err());
}

#[test]
fn signature_slice_round_trip() {
    let sig_bytes = hex!(
        "36282629c383bb820a88b71cae937d41f2f2adfcc3d02e55507e2fb9e2dd3cbe
        bd9d2b0844e49ae0f3fa935161e1419aab7b47d21a37ebeae1f17d4987b3160b"
    );

    let sig = Signature::<C>::read_from_slice(&sig_bytes).unwrap();
    assert_eq!(sig.to_vec(), sig_bytes);

    assert!(Signature::<C>::read_from_slice(&sig_bytes[..63]).is_none());
}
