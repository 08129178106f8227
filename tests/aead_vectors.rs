//! RFC 8439 known answer tests for the AEAD construction.

use chachapoly::aead::subkey::{FIRST_MESSAGE_BLOCK, derive_subkey};
use chachapoly::aead::{ChaCha20Poly1305, decrypt_and_verify, encrypt_and_authenticate};
use chachapoly::cipher::chacha20::block;
use chachapoly::cipher::{BLOCK_LEN, ChaCha20, KeystreamSource};

const PLAINTEXT: &[u8] = b"Ladies and Gentlemen of the class of '99: If I could offer you only \
one tip for the future, sunscreen would be it.";

const AAD: [u8; 12] = [
    0x50, 0x51, 0x52, 0x53, 0xc0, 0xc1, 0xc2, 0xc3, 0xc4, 0xc5, 0xc6, 0xc7,
];

const NONCE: [u8; 12] = [
    0x07, 0x00, 0x00, 0x00, 0x40, 0x41, 0x42, 0x43, 0x44, 0x45, 0x46, 0x47,
];

const CIPHERTEXT: &str = "d31a8d34648e60db7b86afbc53ef7ec2a4aded51296e08fea9e2b5a736ee62d6\
3dbea45e8ca9671282fafb69da92728b1a71de0a9e060b2905d6a5b67ecd3b36\
92ddbd7f2d778b8c9803aee328091b58fab324e4fad675945585808b4831d7bc\
3ff4def08e4b7a9de576d26586cec64b6116";

const TAG: &str = "1ae10b594f09e26a7e902ecbd0600691";

fn key() -> [u8; 32] {
    let mut key = [0u8; 32];
    key.iter_mut().enumerate().for_each(|(i, b)| *b = 0x80 + i as u8);
    key
}

// -------------------------------------------------------
// SUBKEY DERIVATION
// -------------------------------------------------------

#[test]
fn subkey_rfc8439_2_6_2() {
    let nonce = [0, 0, 0, 0, 0, 1, 2, 3, 4, 5, 6, 7];
    let mut cipher = ChaCha20::new(&key(), &nonce);

    let subkey = derive_subkey(&mut cipher);

    assert_eq!(
        hex::encode(subkey.as_bytes()),
        "8ad5a08b905f81cc815040274ab29471a833b637e3fd0da508dbb8e2fdd1a646"
    );
}

#[test]
fn subkey_rfc8439_2_8_2() {
    let mut cipher = ChaCha20::new(&key(), &NONCE);
    let subkey = derive_subkey(&mut cipher);

    assert_eq!(
        hex::encode(subkey.as_bytes()),
        "7bac2b252db447af09b67a55a4e955840ae1d6731075d9eb2a9375783ed553ff"
    );
}

#[test]
fn subkey_derivation_leaves_cipher_at_block_one() {
    let mut cipher = ChaCha20::new(&key(), &NONCE);
    let _subkey = derive_subkey(&mut cipher);

    let mut next = [0u8; BLOCK_LEN];
    cipher.fill_keystream(&mut next);

    assert_eq!(next, block(&key(), FIRST_MESSAGE_BLOCK, &NONCE));
}

// -------------------------------------------------------
// AEAD_CHACHA20_POLY1305 (SECTION 2.8.2)
// -------------------------------------------------------

#[test]
fn aead_encrypt_rfc8439_2_8_2() {
    assert_eq!(PLAINTEXT.len(), 114);

    let mut ciphertext = vec![0u8; PLAINTEXT.len()];
    let mut tag = [0u8; 16];

    encrypt_and_authenticate(&key(), &NONCE, &AAD, PLAINTEXT, &mut ciphertext, &mut tag).unwrap();

    assert_eq!(hex::encode(&ciphertext), CIPHERTEXT);
    assert_eq!(hex::encode(tag), TAG);
}

#[test]
fn aead_decrypt_rfc8439_2_8_2() {
    let ciphertext = hex::decode(CIPHERTEXT).unwrap();
    let tag = hex::decode(TAG).unwrap();
    let mut plaintext = vec![0u8; ciphertext.len()];

    decrypt_and_verify(&key(), &NONCE, &AAD, &ciphertext, &tag, &mut plaintext).unwrap();

    assert_eq!(plaintext, PLAINTEXT);
}

#[test]
fn aead_streaming_matches_rfc8439_2_8_2() {
    let mut engine = ChaCha20Poly1305::with_key(&key()).unwrap();
    engine.resync(&NONCE).unwrap();

    engine.update_aad(&AAD[..5]).unwrap();
    engine.update_aad(&AAD[5..]).unwrap();

    let mut ciphertext = vec![0u8; PLAINTEXT.len()];
    let (head, tail) = PLAINTEXT.split_at(37);
    engine.encrypt(head, &mut ciphertext[..37]).unwrap();
    engine.encrypt(tail, &mut ciphertext[37..]).unwrap();

    let mut tag = [0u8; 16];
    engine.finalize(&mut tag).unwrap();

    assert_eq!(hex::encode(&ciphertext), CIPHERTEXT);
    assert_eq!(hex::encode(tag), TAG);
}
