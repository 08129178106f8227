//! ChaCha20 keystream cipher (RFC 8439, sections 2.3 and 2.4).
//!
//! This module provides a dependency-free implementation of the IETF
//! ChaCha20 variant: 256-bit key, 96-bit nonce, 32-bit block counter.
//!
//! The block function is exposed for known-answer testing. The [`ChaCha20`]
//! type wraps it in a seekable byte stream that implements
//! [`KeystreamSource`].

use zeroize::{Zeroize, ZeroizeOnDrop};

use super::{BLOCK_LEN, KEY_LEN, KeystreamSource, NONCE_LEN};

/// ChaCha20 constant words.
///
/// These values correspond to the ASCII string:
/// `"expand 32-byte k"` encoded as little-endian `u32` words, as defined
/// in RFC 8439.
const CHACHA20_CONSTANTS: [u32; 4] = [
    0x6170_7865, // "expa"
    0x3320_646e, // "nd 3"
    0x7962_2d32, // "2-by"
    0x6b20_6574, // "te k"
];

/// Performs one ChaCha20 quarter round.
///
/// Mixes four 32-bit words of the state with addition modulo 2³², XOR and
/// fixed left rotations. Branchless and constant time.
#[inline(always)]
fn quarter_round(state: &mut [u32; 16], a: usize, b: usize, c: usize, d: usize) {
    state[a] = state[a].wrapping_add(state[b]);
    state[d] ^= state[a];
    state[d] = state[d].rotate_left(16);

    state[c] = state[c].wrapping_add(state[d]);
    state[b] ^= state[c];
    state[b] = state[b].rotate_left(12);

    state[a] = state[a].wrapping_add(state[b]);
    state[d] ^= state[a];
    state[d] = state[d].rotate_left(8);

    state[c] = state[c].wrapping_add(state[d]);
    state[b] ^= state[c];
    state[b] = state[b].rotate_left(7);
}

/// Applies the full ChaCha20 permutation (20 rounds).
fn rounds(state: &mut [u32; 16]) {
    for _ in 0..10 {
        // Column rounds
        quarter_round(state, 0, 4, 8, 12);
        quarter_round(state, 1, 5, 9, 13);
        quarter_round(state, 2, 6, 10, 14);
        quarter_round(state, 3, 7, 11, 15);

        // Diagonal rounds
        quarter_round(state, 0, 5, 10, 15);
        quarter_round(state, 1, 6, 11, 12);
        quarter_round(state, 2, 7, 8, 13);
        quarter_round(state, 3, 4, 9, 14);
    }
}

#[inline(always)]
fn load_words<const W: usize>(bytes: &[u8]) -> [u32; W] {
    let mut words = [0u32; W];
    words
        .iter_mut()
        .zip(bytes.chunks_exact(4))
        .for_each(|(w, b)| *w = u32::from_le_bytes([b[0], b[1], b[2], b[3]]));
    words
}

/// Computes one keystream block from pre-loaded key and nonce words.
fn block_words(key: &[u32; 8], counter: u32, nonce: &[u32; 3], out: &mut [u8; BLOCK_LEN]) {
    let mut state = [0u32; 16];

    state[0..4].copy_from_slice(&CHACHA20_CONSTANTS);
    state[4..12].copy_from_slice(key);
    state[12] = counter;
    state[13..16].copy_from_slice(nonce);

    // Preserve original state for feed-forward
    let mut original = state;

    rounds(&mut state);

    state
        .iter_mut()
        .zip(&original)
        .for_each(|(s, o)| *s = s.wrapping_add(*o));

    out.chunks_exact_mut(4)
        .zip(&state)
        .for_each(|(chunk, word)| chunk.copy_from_slice(&word.to_le_bytes()));

    state.zeroize();
    original.zeroize();
}

/// Generates a single 64-byte ChaCha20 keystream block.
///
/// # Parameters
/// - `key`: 256-bit secret key
/// - `counter`: 32-bit block counter
/// - `nonce`: 96-bit nonce (IETF variant)
///
/// # Security Notes
/// Reusing the same `(key, nonce, counter)` tuple for two different
/// messages is catastrophic and must be prevented by the caller.
pub fn block(key: &[u8; KEY_LEN], counter: u32, nonce: &[u8; NONCE_LEN]) -> [u8; BLOCK_LEN] {
    let mut key_words: [u32; 8] = load_words(key);
    let nonce_words: [u32; 3] = load_words(nonce);

    let mut out = [0u8; BLOCK_LEN];
    block_words(&key_words, counter, &nonce_words, &mut out);
    key_words.zeroize();

    out
}

/// Seekable ChaCha20 keystream.
///
/// Keystream is produced one 64-byte block at a time and buffered, so
/// callers may request arbitrary byte counts. The block counter wraps
/// modulo 2³²; bounding message length is the caller's job.
///
/// All state is wiped on drop.
pub struct ChaCha20 {
    key: [u32; 8],
    nonce: [u32; 3],
    /// Counter of the next block to generate.
    counter: u32,
    buffer: [u8; BLOCK_LEN],
    /// Read position inside `buffer`; `BLOCK_LEN` means empty.
    position: usize,
}

impl ChaCha20 {
    fn refill(&mut self) {
        block_words(&self.key, self.counter, &self.nonce, &mut self.buffer);
        self.counter = self.counter.wrapping_add(1);
        self.position = 0;
    }
}

impl KeystreamSource for ChaCha20 {
    fn new(key: &[u8; KEY_LEN], nonce: &[u8; NONCE_LEN]) -> Self {
        Self {
            key: load_words(key),
            nonce: load_words(nonce),
            counter: 0,
            buffer: [0u8; BLOCK_LEN],
            position: BLOCK_LEN,
        }
    }

    fn seek(&mut self, counter: u32) {
        self.counter = counter;
        self.buffer.zeroize();
        self.position = BLOCK_LEN;
    }

    fn fill_keystream(&mut self, out: &mut [u8]) {
        let mut offset = 0;

        while offset < out.len() {
            if self.position == BLOCK_LEN {
                self.refill();
            }

            let take = (BLOCK_LEN - self.position).min(out.len() - offset);
            out[offset..offset + take]
                .copy_from_slice(&self.buffer[self.position..self.position + take]);

            self.position += take;
            offset += take;
        }
    }
}

impl Drop for ChaCha20 {
    fn drop(&mut self) {
        self.key.zeroize();
        self.nonce.zeroize();
        self.buffer.zeroize();
        self.counter = 0;
    }
}

impl ZeroizeOnDrop for ChaCha20 {}
