//! MAC input layout for the AEAD construction.
//!
//! The exact byte sequence fed to the one-time MAC is
//!
//! ```text
//! AAD || pad16(AAD) || ciphertext || pad16(ciphertext) || le64(len AAD) || le64(len ciphertext)
//! ```
//!
//! Padding is zero bytes up to the next multiple of 16. It is never
//! transmitted and never counted in the length fields. The 16-byte footer is
//! always present, even when both lengths are zero.

use crate::mac::OneTimeMac;

/// MAC block size the variable-length fields are aligned to.
const ALIGN: u64 = 16;

const ZEROES: [u8; ALIGN as usize] = [0u8; ALIGN as usize];

/// Number of zero bytes needed after a field of `len` bytes.
pub(crate) fn pad_len(len: u64) -> usize {
    ((ALIGN - len % ALIGN) % ALIGN) as usize
}

/// Feeds the zero padding for a field of `len` bytes into `mac`.
pub(crate) fn absorb_padding<M: OneTimeMac>(mac: &mut M, len: u64) {
    let pad = pad_len(len);
    if pad > 0 {
        mac.update(&ZEROES[..pad]);
    }
}

/// Encodes the length footer: AAD length then ciphertext length, both
/// little-endian `u64`.
pub(crate) fn length_footer(aad_len: u64, ciphertext_len: u64) -> [u8; 16] {
    let mut footer = [0u8; 16];
    footer[..8].copy_from_slice(&aad_len.to_le_bytes());
    footer[8..].copy_from_slice(&ciphertext_len.to_le_bytes());
    footer
}
