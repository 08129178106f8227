//! Error types for the AEAD construction.
//!
//! Every fallible operation in the crate returns [`Result<T>`], which wraps
//! [`AeadError`]. Errors are reported at the call that triggered them and are
//! never retried internally.
//!
//! None of the variants carry key, subkey, tag or plaintext bytes, so an
//! error can be logged or displayed without leaking secret material.

use thiserror::Error;

use crate::aead::EngineState;

/// Errors produced by the AEAD engine and its one-shot helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AeadError {
    /// The supplied key is not exactly 32 bytes.
    #[error("invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength {
        /// Required key length
        expected: usize,
        /// Length that was supplied
        actual: usize,
    },

    /// The supplied nonce is not exactly 12 bytes.
    #[error("invalid nonce length: expected {expected} bytes, got {actual}")]
    InvalidNonceLength {
        /// Required nonce length
        expected: usize,
        /// Length that was supplied
        actual: usize,
    },

    /// The requested or supplied tag length is outside the configured range.
    #[error("invalid tag length {actual}: must be between {min} and {max} bytes")]
    InvalidTagLength {
        /// Length that was requested or supplied
        actual: usize,
        /// Smallest length the engine accepts
        min: usize,
        /// Largest length the engine accepts
        max: usize,
    },

    /// Input and output buffers differ in length.
    #[error("buffer length mismatch: input is {input} bytes, output is {output} bytes")]
    BufferLengthMismatch {
        /// Length of the input buffer
        input: usize,
        /// Length of the output buffer
        output: usize,
    },

    /// The message would exhaust the keystream block counter.
    #[error("message exceeds the maximum length of {max} bytes")]
    MessageTooLong {
        /// Largest message length that can be processed under one nonce
        max: u64,
    },

    /// The computed tag does not match the supplied tag.
    ///
    /// Callers must reject the message. No plaintext is released by the
    /// one-shot decryption path when this is returned.
    #[error("authentication failed")]
    AuthenticationFailure,

    /// An operation was invoked in a state that does not permit it.
    ///
    /// This is a programming error in the caller, not a statement about the
    /// data being processed.
    #[error("`{operation}` is not permitted while the engine is {state}")]
    SequencingViolation {
        /// Name of the rejected operation
        operation: &'static str,
        /// State the engine was in
        state: EngineState,
    },
}

/// Result type alias for AEAD operations.
pub type Result<T> = core::result::Result<T, AeadError>;
