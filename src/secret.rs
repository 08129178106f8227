//! Fixed-size secret buffers.
//!
//! [`Secret`] owns a byte array that is wiped when the value goes out of
//! scope, whether that happens on a normal return, an early `?` return or
//! while unwinding. Key material held by the AEAD engine lives exclusively in
//! these buffers.

use core::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// A byte array that is zeroized on drop.
///
/// The `Debug` implementation never prints the contents.
pub struct Secret<const N: usize>([u8; N]);

/// The 256-bit AEAD key.
pub type SecretKey = Secret<32>;

/// The 256-bit one-time MAC key derived for a single message.
pub type MacKey = Secret<32>;

impl<const N: usize> Secret<N> {
    /// Creates an all-zero buffer to be filled in place.
    pub(crate) const fn zeroed() -> Self {
        Self([0u8; N])
    }

    /// Copies `bytes` into a new secret buffer.
    pub fn from_array(bytes: &[u8; N]) -> Self {
        Self(*bytes)
    }

    /// Copies `bytes` into a new secret buffer if the length matches.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let array: &[u8; N] = bytes.try_into().ok()?;
        Some(Self::from_array(array))
    }

    /// Borrows the secret bytes.
    pub fn as_bytes(&self) -> &[u8; N] {
        &self.0
    }

    pub(crate) fn as_mut_bytes(&mut self) -> &mut [u8; N] {
        &mut self.0
    }
}

impl<const N: usize> Drop for Secret<N> {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl<const N: usize> ZeroizeOnDrop for Secret<N> {}

impl<const N: usize> fmt::Debug for Secret<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret<{N}>(..)")
    }
}
