//! Keystream ciphers.
//!
//! This module defines the [`KeystreamSource`] capability consumed by the
//! AEAD engine, together with the portable ChaCha20 implementation.
//!
//! A keystream source is created for one `(key, nonce)` pair and produces a
//! pseudorandom byte stream positioned by a 32-bit block counter. It performs
//! no authentication of its own.

use zeroize::ZeroizeOnDrop;

pub mod chacha20;

pub use chacha20::ChaCha20;

/// Length of a keystream cipher key in bytes.
pub const KEY_LEN: usize = 32;

/// Length of a keystream cipher nonce in bytes (IETF variant).
pub const NONCE_LEN: usize = 12;

/// Length of one keystream block in bytes.
pub const BLOCK_LEN: usize = 64;

/// A seekable keystream generator.
///
/// Implementations must wipe all key-dependent state when dropped, which is
/// expressed through the [`ZeroizeOnDrop`] supertrait.
///
/// There is no way to re-key or re-nonce an existing instance. Callers that
/// need a new nonce construct a new source.
pub trait KeystreamSource: ZeroizeOnDrop + Sized {
    /// Creates a source for `(key, nonce)` positioned at block counter 0.
    fn new(key: &[u8; KEY_LEN], nonce: &[u8; NONCE_LEN]) -> Self;

    /// Moves the stream to the start of block `counter`.
    ///
    /// Any partially consumed block is discarded.
    fn seek(&mut self, counter: u32);

    /// Writes the next `out.len()` keystream bytes into `out`.
    fn fill_keystream(&mut self, out: &mut [u8]);

    /// XORs the next `buf.len()` keystream bytes into `buf`.
    ///
    /// Encryption and decryption are the same operation.
    fn apply_keystream(&mut self, buf: &mut [u8]) {
        let mut keystream = [0u8; BLOCK_LEN];

        for chunk in buf.chunks_mut(BLOCK_LEN) {
            let ks = &mut keystream[..chunk.len()];
            self.fill_keystream(ks);
            chunk.iter_mut().zip(ks.iter()).for_each(|(b, k)| *b ^= k);
        }

        zeroize::Zeroize::zeroize(&mut keystream);
    }
}
