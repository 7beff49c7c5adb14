use proptest::prelude::*;

use eth_primitives::ec::private_key::PrivateKey;
use eth_primitives::ec::public_key::PublicKey;
use eth_primitives::ec::signature::Signature;
use eth_primitives::field::generic::FieldElementBig;
use eth_primitives::field::FieldElement;
use eth_primitives::hash::keccak256;
use eth_primitives::scalar::ScalarElement;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn ecdsa_sign_verify_roundtrip(
        seed in prop::array::uniform32(any::<u8>()),
        msg in prop::collection::vec(any::<u8>(), 0..256)
    ) {
        // Not all 32-byte arrays are valid private keys (must be < curve order, nonzero).
        if let Ok(pk) = PrivateKey::from_bytes(&seed) {
            let hash = keccak256(&msg);
            let sig = pk.sign(&hash).unwrap();
            let pub_key = pk.pub_key();
            prop_assert!(pub_key.verify(&hash, &sig));
        }
    }

    #[test]
    fn ecdsa_recover_restores_signer(
        seed in prop::array::uniform32(any::<u8>()),
        msg in prop::collection::vec(any::<u8>(), 1..128)
    ) {
        if let Ok(pk) = PrivateKey::from_bytes(&seed) {
            let hash = keccak256(&msg);
            let sig = pk.sign(&hash).unwrap();
            let recovered = sig.recover(&hash).unwrap();
            prop_assert_eq!(recovered.to_compressed(), pk.pub_key().to_compressed());
        }
    }

    #[test]
    fn signatures_are_deterministic_and_low_s(
        seed in prop::array::uniform32(any::<u8>()),
        msg in prop::collection::vec(any::<u8>(), 0..64)
    ) {
        if let Ok(pk) = PrivateKey::from_bytes(&seed) {
            let hash = keccak256(&msg);
            let first = pk.sign(&hash).unwrap();
            let second = pk.sign(&hash).unwrap();
            prop_assert_eq!(first, second);
            let s = ScalarElement::from_bytes32(&first.s()).unwrap();
            prop_assert!(!s.is_high());
            prop_assert!(first.v() == 27 || first.v() == 28);
        }
    }

    #[test]
    fn signature_bytes_roundtrip(
        seed in prop::array::uniform32(any::<u8>()),
        msg in prop::collection::vec(any::<u8>(), 0..64)
    ) {
        if let Ok(pk) = PrivateKey::from_bytes(&seed) {
            let hash = keccak256(&msg);
            let sig = pk.sign(&hash).unwrap();
            let parsed = Signature::from_bytes(&sig.to_bytes()).unwrap();
            prop_assert_eq!(parsed, sig);
            let parsed = Signature::from_hex(&sig.to_hex()).unwrap();
            prop_assert_eq!(parsed, sig);
        }
    }

    #[test]
    fn limb_field_matches_bigint_field(
        a in prop::array::uniform32(any::<u8>()),
        b in prop::array::uniform32(any::<u8>())
    ) {
        let fast_a = FieldElement::from_bytes32(&a);
        let fast_b = FieldElement::from_bytes32(&b);
        let big_a = FieldElementBig::from_bytes32(&a);
        let big_b = FieldElementBig::from_bytes32(&b);

        prop_assert_eq!(fast_a.mul(&fast_b).to_bytes32(), big_a.mul(&big_b).to_bytes32());
        prop_assert_eq!(fast_a.add(&fast_b).to_bytes32(), big_a.add(&big_b).to_bytes32());
        prop_assert_eq!(fast_a.sub(&fast_b).to_bytes32(), big_a.sub(&big_b).to_bytes32());
        prop_assert_eq!(fast_a.neg().to_bytes32(), big_a.neg().to_bytes32());
    }

    #[test]
    fn field_algebra_holds(
        a in prop::array::uniform32(any::<u8>()),
        b in prop::array::uniform32(any::<u8>())
    ) {
        let x = FieldElement::from_bytes32(&a);
        let y = FieldElement::from_bytes32(&b);
        prop_assert_eq!(FieldElement::from_bytes32(&x.to_bytes32()), x);
        prop_assert_eq!(x.mul(&y), y.mul(&x));
        prop_assert!(x.add(&x.neg()).is_zero());
    }

    #[test]
    fn decoding_reduces_values_at_or_above_the_modulus(
        low in prop::array::uniform32(any::<u8>())
    ) {
        // Pin the top 28 bytes high so the raw value always lands above p
        // and the decoder's single conditional subtraction has to fire.
        let mut bytes = [0xFFu8; 32];
        bytes[28..].copy_from_slice(&low[28..]);
        let fast = FieldElement::from_bytes32(&bytes);
        let big = FieldElementBig::from_bytes32(&bytes);
        prop_assert_eq!(fast.to_bytes32(), big.to_bytes32());
    }

    #[test]
    fn field_inversion_agrees_across_backends(a in prop::array::uniform32(any::<u8>())) {
        let fast = FieldElement::from_bytes32(&a);
        let big = FieldElementBig::from_bytes32(&a);
        if fast.is_zero() {
            prop_assert!(fast.invert().is_err());
        } else {
            // Fermat on the limb side, extended Euclid on the bigint side.
            let fast_inv = fast.invert().unwrap();
            let big_inv = big.invert().unwrap();
            prop_assert_eq!(fast_inv.to_bytes32(), big_inv.to_bytes32());
            prop_assert!(fast.mul(&fast_inv).is_one());
        }
    }

    #[test]
    fn public_key_serialization_roundtrip(seed in prop::array::uniform32(any::<u8>())) {
        if let Ok(pk) = PrivateKey::from_bytes(&seed) {
            let pub_key = pk.pub_key();
            let compressed = PublicKey::from_bytes(&pub_key.to_compressed()).unwrap();
            let uncompressed = PublicKey::from_bytes(&pub_key.to_uncompressed()).unwrap();
            prop_assert_eq!(compressed, pub_key);
            prop_assert_eq!(uncompressed, pub_key);
        }
    }
}
