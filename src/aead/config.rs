//! Engine configuration.
//!
//! The only tunable is the tag-length policy. The engine always computes the
//! full 16-byte Poly1305 tag; callers may request or verify a prefix of it.
//! Every byte dropped from the tag weakens forgery resistance by 8 bits, so
//! truncation is something the caller opts into explicitly by passing a
//! shorter tag buffer, bounded below by [`AeadConfig::min_tag_len`].

use crate::error::{AeadError, Result};
use crate::mac::TAG_LEN;

/// Default lower bound on tag length.
///
/// A zero-length tag would authenticate nothing, so it is never accepted.
pub const DEFAULT_MIN_TAG_LEN: usize = 1;

/// Configuration for an [`AeadEngine`](super::AeadEngine).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AeadConfig {
    min_tag_len: usize,
}

impl AeadConfig {
    /// Default policy: tags from 1 to 16 bytes.
    pub const fn new() -> Self {
        Self {
            min_tag_len: DEFAULT_MIN_TAG_LEN,
        }
    }

    /// Policy that only accepts full 16-byte tags.
    pub const fn strict() -> Self {
        Self {
            min_tag_len: TAG_LEN,
        }
    }

    /// Sets the smallest tag length accepted for output and verification.
    ///
    /// # Errors
    ///
    /// `InvalidTagLength` if `min_tag_len` is 0 or larger than 16.
    pub fn with_min_tag_len(self, min_tag_len: usize) -> Result<Self> {
        if !(DEFAULT_MIN_TAG_LEN..=TAG_LEN).contains(&min_tag_len) {
            return Err(AeadError::InvalidTagLength {
                actual: min_tag_len,
                min: DEFAULT_MIN_TAG_LEN,
                max: TAG_LEN,
            });
        }

        Ok(Self { min_tag_len })
    }

    /// Smallest accepted tag length in bytes.
    pub const fn min_tag_len(&self) -> usize {
        self.min_tag_len
    }

    /// Checks a requested or supplied tag length against the policy.
    pub fn check_tag_len(&self, len: usize) -> Result<()> {
        if len < self.min_tag_len || len > TAG_LEN {
            return Err(AeadError::InvalidTagLength {
                actual: len,
                min: self.min_tag_len,
                max: TAG_LEN,
            });
        }

        Ok(())
    }
}

impl Default for AeadConfig {
    fn default() -> Self {
        Self::new()
    }
}
