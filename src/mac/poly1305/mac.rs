use zeroize::{Zeroize, ZeroizeOnDrop};

use super::core::State;
use crate::mac::{MAC_KEY_LEN, OneTimeMac, TAG_LEN};

/// Poly1305 block size in bytes.
const BLOCK_LEN: usize = 16;

/// Streaming Poly1305 one-time authenticator.
///
/// Accepts input of any length across any number of [`update`] calls and
/// stages it into 16-byte blocks. A trailing partial block is absorbed at
/// [`finalize`] with the RFC 8439 high-bit padding.
///
/// [`update`]: OneTimeMac::update
/// [`finalize`]: OneTimeMac::finalize
pub struct Poly1305 {
    state: State,
    buffer: [u8; BLOCK_LEN],
    buffered: usize,
}

impl Poly1305 {
    /// Computes the tag of `message` under `key` in one call.
    pub fn compute(key: &[u8; MAC_KEY_LEN], message: &[u8]) -> [u8; TAG_LEN] {
        let mut mac = <Self as OneTimeMac>::new(key);
        mac.update(message);
        mac.finalize()
    }

    #[cfg(feature = "speed")]
    fn absorb_direct<'a>(&mut self, data: &'a [u8]) -> &'a [u8] {
        let mut blocks = data.chunks_exact(BLOCK_LEN);
        for block in blocks.by_ref() {
            self.state.absorb(block);
        }
        blocks.remainder()
    }

    #[cfg(not(feature = "speed"))]
    fn absorb_direct<'a>(&mut self, data: &'a [u8]) -> &'a [u8] {
        data
    }
}

impl OneTimeMac for Poly1305 {
    fn new(key: &[u8; MAC_KEY_LEN]) -> Self {
        Self {
            state: State::new(key),
            buffer: [0u8; BLOCK_LEN],
            buffered: 0,
        }
    }

    fn update(&mut self, mut data: &[u8]) {
        if self.buffered > 0 {
            let take = (BLOCK_LEN - self.buffered).min(data.len());
            self.buffer[self.buffered..self.buffered + take].copy_from_slice(&data[..take]);
            self.buffered += take;
            data = &data[take..];

            if self.buffered < BLOCK_LEN {
                return;
            }

            self.state.absorb(&self.buffer);
            self.buffered = 0;
        }

        for &byte in self.absorb_direct(data) {
            self.buffer[self.buffered] = byte;
            self.buffered += 1;

            if self.buffered == BLOCK_LEN {
                self.state.absorb(&self.buffer);
                self.buffered = 0;
            }
        }
    }

    fn finalize(mut self) -> [u8; TAG_LEN] {
        if self.buffered > 0 {
            self.state.absorb(&self.buffer[..self.buffered]);
        }

        self.state.finalize()
    }
}

impl Drop for Poly1305 {
    fn drop(&mut self) {
        self.buffer.zeroize();
        self.buffered = 0;
    }
}

impl ZeroizeOnDrop for Poly1305 {}
