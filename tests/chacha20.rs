use chachapoly::cipher::chacha20::block;
use chachapoly::cipher::{BLOCK_LEN, ChaCha20, KeystreamSource};

fn rfc_key() -> [u8; 32] {
    let mut key = [0u8; 32];
    key.iter_mut().enumerate().for_each(|(i, b)| *b = i as u8);
    key
}

// -------------------------------------------------------
// RFC 8439 KNOWN ANSWER TESTS
// -------------------------------------------------------

#[test]
fn chacha20_block_rfc8439_2_3_2() {
    let nonce = [0, 0, 0, 0x09, 0, 0, 0, 0x4a, 0, 0, 0, 0];

    let expected = hex::decode(
        "10f1e7e4d13b5915500fdd1fa32071c4c7d1f4c733c068030422aa9ac3d46c4e\
         d2826446079faa0914c2d705d98b02a2b5129cd1de164eb9cbd083e8a2503c4e",
    )
    .unwrap();

    assert_eq!(block(&rfc_key(), 1, &nonce).as_slice(), expected.as_slice());
}

// -------------------------------------------------------
// STREAM BEHAVIOUR
// -------------------------------------------------------

#[test]
fn chacha20_stream_matches_consecutive_blocks() {
    let key = rfc_key();
    let nonce = [0x24u8; 12];

    let mut stream = ChaCha20::new(&key, &nonce);
    let mut out = [0u8; 3 * BLOCK_LEN];
    stream.fill_keystream(&mut out);

    for (counter, chunk) in out.chunks(BLOCK_LEN).enumerate() {
        assert_eq!(chunk, block(&key, counter as u32, &nonce).as_slice());
    }
}

#[test]
fn chacha20_uneven_requests_cross_block_boundaries() {
    let key = rfc_key();
    let nonce = [0x11u8; 12];

    let mut whole = [0u8; 200];
    ChaCha20::new(&key, &nonce).fill_keystream(&mut whole);

    let mut pieces = [0u8; 200];
    let mut stream = ChaCha20::new(&key, &nonce);
    let mut offset = 0;
    for len in [1usize, 7, 56, 63, 65, 8] {
        stream.fill_keystream(&mut pieces[offset..offset + len]);
        offset += len;
    }
    assert_eq!(offset, 200);

    assert_eq!(whole, pieces);
}

#[test]
fn chacha20_seek_discards_partial_block() {
    let key = rfc_key();
    let nonce = [0u8; 12];

    let mut stream = ChaCha20::new(&key, &nonce);
    let mut scratch = [0u8; 10];
    stream.fill_keystream(&mut scratch);

    stream.seek(2);
    let mut out = [0u8; BLOCK_LEN];
    stream.fill_keystream(&mut out);

    assert_eq!(out, block(&key, 2, &nonce));
}

#[test]
fn chacha20_apply_keystream_is_an_involution() {
    let key = rfc_key();
    let nonce = [0x5au8; 12];
    let message: Vec<u8> = (0..150u8).collect();

    let mut buf = message.clone();
    ChaCha20::new(&key, &nonce).apply_keystream(&mut buf);
    assert_ne!(buf, message);

    ChaCha20::new(&key, &nonce).apply_keystream(&mut buf);
    assert_eq!(buf, message);
}
