//! Tag truncation and verification.
//!
//! Both operations work on the first `n` bytes of the full tag, where `n` is
//! the length of the caller's buffer. A short supplied tag is compared as-is;
//! it is never extended with assumed zero bytes.

use subtle::ConstantTimeEq;

use crate::error::{AeadError, Result};
use crate::mac::TAG_LEN;

/// Copies the leading `out.len()` bytes of `full` into `out`.
///
/// The length must already have been validated against the engine policy.
pub(crate) fn truncate_into(full: &[u8; TAG_LEN], out: &mut [u8]) {
    out.copy_from_slice(&full[..out.len()]);
}

/// Compares `supplied` against the same-length prefix of `computed` in
/// constant time.
pub(crate) fn verify_prefix(computed: &[u8; TAG_LEN], supplied: &[u8]) -> Result<()> {
    let Some(prefix) = computed.get(..supplied.len()) else {
        return Err(AeadError::AuthenticationFailure);
    };

    if bool::from(prefix.ct_eq(supplied)) {
        Ok(())
    } else {
        Err(AeadError::AuthenticationFailure)
    }
}
