//! ChaCha20-Poly1305 authenticated encryption
//!
//! This crate provides the RFC 8439 AEAD construction together with the
//! two primitives it is built from.
//!
//! The focus is on **clarity, predictability, and auditability**. The
//! primitives are implemented in pure Rust without `unsafe`, and the AEAD
//! layer is written against two small capability traits so that the
//! construction logic is independent of any particular backend.
//!
//! # Module overview
//!
//! - `cipher`
//!   Keystream ciphers. Defines the [`KeystreamSource`] capability
//!   (construct for a key and nonce, seek to a block counter, produce
//!   keystream) and the portable [`ChaCha20`] implementation.
//!
//! - `mac`
//!   One-time message authentication codes. Defines the [`OneTimeMac`]
//!   capability (key once, absorb bytes, finalize to a 16-byte tag) and the
//!   portable [`Poly1305`] implementation.
//!
//! - `aead`
//!   The AEAD engine. Owns the key, rebuilds cipher and MAC on every nonce,
//!   derives the per-message MAC key from keystream block 0, lays out the
//!   padded MAC input and length footer, and emits or verifies (possibly
//!   truncated) tags in constant time.
//!
//! - `secret`
//!   Fixed-size buffers for key material that are wiped on drop.
//!
//! # Example
//!
//! ```
//! use chachapoly::aead::{open, seal};
//!
//! let key = [0x42u8; 32];
//! let nonce = [0x07u8; 12];
//!
//! let sealed = seal(&key, &nonce, b"header", b"attack at dawn")?;
//! let opened = open(&key, &nonce, b"header", &sealed)?;
//! assert_eq!(opened, b"attack at dawn");
//! # Ok::<(), chachapoly::AeadError>(())
//! ```
//!
//! # Design goals
//!
//! - No heap allocations in the primitives or the engine
//! - Secret material wiped on every exit path
//! - Explicit, validated sizes for key, nonce and tag
//! - Diagnostics through `tracing`, never including secret bytes
//!
//! Nonce management is the caller's responsibility: a `(key, nonce)` pair
//! must never encrypt two different messages.

#![forbid(unsafe_code)]

pub mod aead;
pub mod cipher;
mod error;
pub mod mac;
pub mod secret;

pub use aead::{AeadConfig, AeadEngine, ChaCha20Poly1305, EngineState};
pub use cipher::{ChaCha20, KeystreamSource};
pub use error::{AeadError, Result};
pub use mac::{OneTimeMac, Poly1305};
