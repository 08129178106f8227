//! ChaCha20-Poly1305 authenticated encryption (RFC 8439, section 2.8).
//!
//! This module combines a keystream cipher and a one-time MAC into an AEAD:
//!
//! - ChaCha20 for confidentiality
//! - Poly1305, keyed per message from the ChaCha20 keystream, for
//!   authenticity of both the ciphertext and the associated data
//!
//! The construction is provided by [`AeadEngine`], generic over any
//! [`KeystreamSource`](crate::cipher::KeystreamSource) and
//! [`OneTimeMac`](crate::mac::OneTimeMac) pair. [`ChaCha20Poly1305`] fixes the
//! portable implementations.
//!
//! ## Submodules
//!
//! - `engine`: the state machine and both processing surfaces
//! - `subkey`: per-nonce MAC key derivation
//! - `padding`: zero padding and the length footer fed to the MAC
//! - `tag`: truncation and constant-time verification
//! - `config`: tag-length policy
//!
//! ## Notes
//!
//! - The caller must ensure `(key, nonce)` uniqueness. Reusing a pair breaks
//!   both confidentiality and authenticity.
//! - The free functions in this module build a fresh engine per call.

use crate::cipher::ChaCha20;
use crate::error::{AeadError, Result};
use crate::mac::{Poly1305, TAG_LEN};

mod config;
mod engine;
mod padding;
pub mod subkey;
mod tag;

pub use config::{AeadConfig, DEFAULT_MIN_TAG_LEN};
pub use engine::{ALGORITHM_NAME, AeadEngine, EngineState, MAX_AAD_LEN, MAX_MESSAGE_LEN};

/// ChaCha20-Poly1305 with the portable primitives of this crate.
pub type ChaCha20Poly1305 = AeadEngine<ChaCha20, Poly1305>;

/// Encrypts and authenticates one message.
///
/// `ciphertext` must be as long as `plaintext`. The first `tag.len()` bytes
/// of the 16-byte tag are written to `tag`.
///
/// # Errors
///
/// `InvalidKeyLength`, `InvalidNonceLength`, `InvalidTagLength`,
/// `BufferLengthMismatch` or `MessageTooLong` for malformed input sizes.
/// Encryption never fails otherwise.
pub fn encrypt_and_authenticate(
    key: &[u8],
    nonce: &[u8],
    aad: &[u8],
    plaintext: &[u8],
    ciphertext: &mut [u8],
    tag: &mut [u8],
) -> Result<()> {
    let mut engine = ChaCha20Poly1305::with_key(key)?;
    engine.encrypt_and_authenticate(nonce, aad, plaintext, ciphertext, tag)
}

/// Verifies and decrypts one message.
///
/// `plaintext` is only written when the tag verifies.
///
/// # Errors
///
/// `AuthenticationFailure` if the tag does not match, or a size error as for
/// [`encrypt_and_authenticate`].
pub fn decrypt_and_verify(
    key: &[u8],
    nonce: &[u8],
    aad: &[u8],
    ciphertext: &[u8],
    tag: &[u8],
    plaintext: &mut [u8],
) -> Result<()> {
    let mut engine = ChaCha20Poly1305::with_key(key)?;
    engine.decrypt_and_verify(nonce, aad, ciphertext, tag, plaintext)
}

/// Encrypts `plaintext` and returns `ciphertext || tag` with a full tag.
pub fn seal(key: &[u8], nonce: &[u8], aad: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    let mut sealed = vec![0u8; plaintext.len() + TAG_LEN];
    let (ciphertext, tag) = sealed.split_at_mut(plaintext.len());

    encrypt_and_authenticate(key, nonce, aad, plaintext, ciphertext, tag)?;
    Ok(sealed)
}

/// Verifies and decrypts `ciphertext || tag` produced by [`seal`].
///
/// # Errors
///
/// `AuthenticationFailure` if `sealed` is shorter than a tag or does not
/// verify.
pub fn open(key: &[u8], nonce: &[u8], aad: &[u8], sealed: &[u8]) -> Result<Vec<u8>> {
    let Some(split) = sealed.len().checked_sub(TAG_LEN) else {
        return Err(AeadError::AuthenticationFailure);
    };
    let (ciphertext, tag) = sealed.split_at(split);

    let mut plaintext = vec![0u8; ciphertext.len()];
    decrypt_and_verify(key, nonce, aad, ciphertext, tag, &mut plaintext)?;
    Ok(plaintext)
}
