//! Per-message Poly1305 key derivation (RFC 8439, section 2.6).
//!
//! The one-time MAC key for a `(key, nonce)` pair is the first 32 bytes of
//! keystream block 0. Message encryption starts at block 1, so the rest of
//! block 0 is discarded.
//!
//! Derivation is never cached. It runs on every resync even when the key and
//! nonce are bit-identical to the previous ones, so a reused MAC key can only
//! come from a reused nonce, never from engine state.

use crate::cipher::KeystreamSource;
use crate::secret::MacKey;

/// Block counter holding the one-time MAC key.
pub const SUBKEY_BLOCK: u32 = 0;

/// Block counter at which message keystream begins.
pub const FIRST_MESSAGE_BLOCK: u32 = 1;

/// Derives the one-time MAC key from `cipher` and positions it for the message.
///
/// On return the source is at the start of [`FIRST_MESSAGE_BLOCK`].
pub fn derive_subkey<K: KeystreamSource>(cipher: &mut K) -> MacKey {
    let mut subkey = MacKey::zeroed();

    cipher.seek(SUBKEY_BLOCK);
    cipher.fill_keystream(subkey.as_mut_bytes());
    cipher.seek(FIRST_MESSAGE_BLOCK);

    subkey
}
