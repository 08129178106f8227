//! One-time message authentication codes.
//!
//! This module defines the [`OneTimeMac`] capability consumed by the AEAD
//! engine and provides the portable Poly1305 implementation.

use zeroize::ZeroizeOnDrop;

pub mod poly1305;

pub use poly1305::Poly1305;

/// Length of a one-time MAC key in bytes.
pub const MAC_KEY_LEN: usize = 32;

/// Length of a full authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// A MAC keyed once, fed once, finalized once.
///
/// `finalize` consumes the instance, so a MAC cannot be carried over from
/// one message to the next. Implementations wipe their key and accumulator
/// on drop.
pub trait OneTimeMac: ZeroizeOnDrop + Sized {
    /// Creates an authenticator for a single message.
    fn new(key: &[u8; MAC_KEY_LEN]) -> Self;

    /// Absorbs `data`. May be called any number of times with any lengths.
    fn update(&mut self, data: &[u8]);

    /// Produces the full 16-byte tag.
    fn finalize(self) -> [u8; TAG_LEN];
}
