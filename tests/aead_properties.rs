//! Property-based tests for the AEAD construction.
//!
//! 1. **Round-trip**: decrypt(encrypt(m)) == m
//! 2. **Tamper detection**: any single bit flip in ciphertext, AAD or tag
//!    is rejected
//! 3. **Nonce separation**: the same plaintext under two nonces never
//!    produces the same ciphertext
//! 4. **Streaming equivalence**: chunked processing equals one-shot

use chachapoly::AeadError;
use chachapoly::aead::{ChaCha20Poly1305, decrypt_and_verify, encrypt_and_authenticate};
use proptest::prelude::*;

fn seal_parts(
    key: &[u8; 32],
    nonce: &[u8; 12],
    aad: &[u8],
    plaintext: &[u8],
    tag_len: usize,
) -> (Vec<u8>, Vec<u8>) {
    let mut ciphertext = vec![0u8; plaintext.len()];
    let mut tag = vec![0u8; tag_len];
    encrypt_and_authenticate(key, nonce, aad, plaintext, &mut ciphertext, &mut tag).unwrap();
    (ciphertext, tag)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_roundtrip(
        key in any::<[u8; 32]>(),
        nonce in any::<[u8; 12]>(),
        aad in prop::collection::vec(any::<u8>(), 0..100),
        plaintext in prop::collection::vec(any::<u8>(), 0..600),
        tag_len in 1usize..=16,
    ) {
        let (ciphertext, tag) = seal_parts(&key, &nonce, &aad, &plaintext, tag_len);

        let mut recovered = vec![0u8; ciphertext.len()];
        decrypt_and_verify(&key, &nonce, &aad, &ciphertext, &tag, &mut recovered).unwrap();

        prop_assert_eq!(recovered, plaintext);
    }

    #[test]
    fn prop_ciphertext_bit_flip_is_rejected(
        key in any::<[u8; 32]>(),
        nonce in any::<[u8; 12]>(),
        aad in prop::collection::vec(any::<u8>(), 0..64),
        plaintext in prop::collection::vec(any::<u8>(), 1..300),
        index in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let (mut ciphertext, tag) = seal_parts(&key, &nonce, &aad, &plaintext, 16);
        let at = index.index(ciphertext.len());
        ciphertext[at] ^= 1 << bit;

        let mut out = vec![0u8; ciphertext.len()];
        prop_assert_eq!(
            decrypt_and_verify(&key, &nonce, &aad, &ciphertext, &tag, &mut out),
            Err(AeadError::AuthenticationFailure)
        );
        prop_assert!(out.iter().all(|&b| b == 0));
    }

    #[test]
    fn prop_aad_bit_flip_is_rejected(
        key in any::<[u8; 32]>(),
        nonce in any::<[u8; 12]>(),
        aad in prop::collection::vec(any::<u8>(), 1..64),
        plaintext in prop::collection::vec(any::<u8>(), 0..300),
        index in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let (ciphertext, tag) = seal_parts(&key, &nonce, &aad, &plaintext, 16);
        let mut aad = aad;
        let at = index.index(aad.len());
        aad[at] ^= 1 << bit;

        let mut out = vec![0u8; ciphertext.len()];
        prop_assert_eq!(
            decrypt_and_verify(&key, &nonce, &aad, &ciphertext, &tag, &mut out),
            Err(AeadError::AuthenticationFailure)
        );
    }

    #[test]
    fn prop_tag_bit_flip_is_rejected(
        key in any::<[u8; 32]>(),
        nonce in any::<[u8; 12]>(),
        plaintext in prop::collection::vec(any::<u8>(), 0..300),
        tag_len in 1usize..=16,
        index in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let (ciphertext, mut tag) = seal_parts(&key, &nonce, b"aad", &plaintext, tag_len);
        let at = index.index(tag.len());
        tag[at] ^= 1 << bit;

        let mut out = vec![0u8; ciphertext.len()];
        prop_assert_eq!(
            decrypt_and_verify(&key, &nonce, b"aad", &ciphertext, &tag, &mut out),
            Err(AeadError::AuthenticationFailure)
        );
    }

    #[test]
    fn prop_nonce_separation(
        key in any::<[u8; 32]>(),
        nonce_a in any::<[u8; 12]>(),
        nonce_b in any::<[u8; 12]>(),
        plaintext in prop::collection::vec(any::<u8>(), 16..200),
    ) {
        prop_assume!(nonce_a != nonce_b);

        let (a, _) = seal_parts(&key, &nonce_a, &[], &plaintext, 16);
        let (b, _) = seal_parts(&key, &nonce_b, &[], &plaintext, 16);

        prop_assert_ne!(a, b);
    }

    #[test]
    fn prop_streaming_matches_one_shot(
        key in any::<[u8; 32]>(),
        nonce in any::<[u8; 12]>(),
        aad in prop::collection::vec(any::<u8>(), 0..100),
        plaintext in prop::collection::vec(any::<u8>(), 0..400),
        chunk in 1usize..80,
    ) {
        let (expected_ct, expected_tag) = seal_parts(&key, &nonce, &aad, &plaintext, 16);

        let mut engine = ChaCha20Poly1305::with_key(&key).unwrap();
        engine.resync(&nonce).unwrap();
        for piece in aad.chunks(chunk) {
            engine.update_aad(piece).unwrap();
        }

        let mut ciphertext = vec![0u8; plaintext.len()];
        for (input, output) in plaintext.chunks(chunk).zip(ciphertext.chunks_mut(chunk)) {
            engine.encrypt(input, output).unwrap();
        }
        let mut tag = vec![0u8; 16];
        engine.finalize(&mut tag).unwrap();

        prop_assert_eq!(&ciphertext, &expected_ct);
        prop_assert_eq!(&tag, &expected_tag);

        engine.resync(&nonce).unwrap();
        engine.update_aad(&aad).unwrap();
        let mut recovered = vec![0u8; ciphertext.len()];
        for (input, output) in ciphertext.chunks(chunk).zip(recovered.chunks_mut(chunk)) {
            engine.decrypt(input, output).unwrap();
        }
        engine.verify(&tag).unwrap();

        prop_assert_eq!(recovered, plaintext);
    }
}
