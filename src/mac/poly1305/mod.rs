//! Poly1305 message authentication code (RFC 8439).
//!
//! The implementation is split into two layers:
//!
//! - `core`: limb arithmetic, clamping, block absorption and final reduction
//! - `mac`: the streaming [`Poly1305`] type implementing
//!   [`OneTimeMac`](crate::mac::OneTimeMac)
//!
//! Poly1305 is a one-time authenticator. Authenticating two messages with the
//! same key lets an attacker forge tags, which is why the AEAD engine derives
//! a fresh key for every nonce.

/// Low-level Poly1305 state.
///
/// Fixed-size limbs, no allocation. Cryptographically sensitive and kept
/// private to the crate.
mod core;

/// Streaming Poly1305 interface.
mod mac;

pub use mac::Poly1305;
