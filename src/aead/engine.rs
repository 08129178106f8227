use std::fmt;

use tracing::{debug, trace};
use zeroize::Zeroize;

use super::config::AeadConfig;
use super::padding::{absorb_padding, length_footer};
use super::subkey::derive_subkey;
use super::tag::{truncate_into, verify_prefix};
use crate::cipher::{BLOCK_LEN, KEY_LEN, KeystreamSource, NONCE_LEN};
use crate::error::{AeadError, Result};
use crate::mac::{OneTimeMac, TAG_LEN};
use crate::secret::SecretKey;

/// Name of the construction, as used by RFC 8439 section 2.8.
pub const ALGORITHM_NAME: &str = "ChaCha20/Poly1305";

/// Largest AAD accepted under one nonce.
pub const MAX_AAD_LEN: u64 = u64::MAX;

/// Largest message accepted under one nonce.
///
/// Block 0 holds the MAC key, which leaves `2^32 - 1` keystream blocks.
pub const MAX_MESSAGE_LEN: u64 = (u32::MAX as u64) * (BLOCK_LEN as u64);

/// Observable state of an [`AeadEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// No key has been installed.
    Unkeyed,
    /// A key is installed, no nonce is active.
    Keyed,
    /// A nonce is active and the MAC key has been derived; nothing absorbed yet.
    Resynced,
    /// Associated data is being absorbed.
    AuthenticatingAad,
    /// Message bytes are being processed.
    AuthenticatingMessage,
    /// The last message was finalized or verified. A new nonce is required.
    Finalized,
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unkeyed => "unkeyed",
            Self::Keyed => "keyed",
            Self::Resynced => "resynced",
            Self::AuthenticatingAad => "authenticating AAD",
            Self::AuthenticatingMessage => "authenticating message",
            Self::Finalized => "finalized",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Encrypt,
    Decrypt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Resynced,
    Aad,
    Message(Direction),
}

/// Cipher and MAC state for one message under one nonce.
///
/// Dropping a session wipes both halves through their `ZeroizeOnDrop`
/// implementations.
struct Session<K, M> {
    cipher: K,
    mac: M,
    phase: Phase,
    aad_len: u64,
    message_len: u64,
}

impl<K: KeystreamSource, M: OneTimeMac> Session<K, M> {
    /// Builds a fresh cipher and MAC for `(key, nonce)`.
    ///
    /// The keystream cipher cannot be restarted, so nothing from a previous
    /// session is reused.
    fn start(key: &SecretKey, nonce: &[u8; NONCE_LEN]) -> Self {
        let mut cipher = K::new(key.as_bytes(), nonce);
        let subkey = derive_subkey(&mut cipher);
        let mac = M::new(subkey.as_bytes());

        Self {
            cipher,
            mac,
            phase: Phase::Resynced,
            aad_len: 0,
            message_len: 0,
        }
    }

    fn state(&self) -> EngineState {
        match self.phase {
            Phase::Resynced => EngineState::Resynced,
            Phase::Aad => EngineState::AuthenticatingAad,
            Phase::Message(_) => EngineState::AuthenticatingMessage,
        }
    }

    /// Whether the session can continue (or finish) in `direction`.
    fn accepts(&self, direction: Direction) -> bool {
        match self.phase {
            Phase::Message(current) => current == direction,
            Phase::Resynced | Phase::Aad => true,
        }
    }

    fn absorb_aad(&mut self, aad: &[u8]) {
        self.mac.update(aad);
        self.aad_len += aad.len() as u64;
        self.phase = Phase::Aad;
    }

    fn check_capacity(&self, len: usize) -> Result<()> {
        u64::try_from(len)
            .ok()
            .and_then(|len| len.checked_add(self.message_len))
            .filter(|&total| total <= MAX_MESSAGE_LEN)
            .map(|_| ())
            .ok_or(AeadError::MessageTooLong {
                max: MAX_MESSAGE_LEN,
            })
    }

    /// Closes the AAD field on the first message call.
    fn begin_message(&mut self, direction: Direction) {
        if !matches!(self.phase, Phase::Message(_)) {
            absorb_padding(&mut self.mac, self.aad_len);
            self.phase = Phase::Message(direction);
        }
    }

    /// Pads both fields, appends the length footer and computes the full tag.
    ///
    /// The cipher is handed back positioned after any processed message
    /// bytes so a verify-then-decrypt caller can still use it.
    fn finish(self) -> (K, [u8; TAG_LEN]) {
        let Self {
            cipher,
            mut mac,
            phase,
            aad_len,
            message_len,
        } = self;

        if !matches!(phase, Phase::Message(_)) {
            absorb_padding(&mut mac, aad_len);
        }
        absorb_padding(&mut mac, message_len);
        mac.update(&length_footer(aad_len, message_len));

        (cipher, mac.finalize())
    }
}

/// AEAD engine combining a [`KeystreamSource`] with a [`OneTimeMac`].
///
/// The engine follows the RFC 8439 section 2.8 construction:
///
/// 1. `resync(nonce)` rebuilds the cipher for `(key, nonce)`, takes the first
///    32 bytes of block 0 as the MAC key and positions the cipher at block 1.
/// 2. AAD is authenticated, then zero-padded to 16 bytes.
/// 3. Message bytes are XORed with the keystream and the *ciphertext* is
///    authenticated, then zero-padded to 16 bytes.
/// 4. The MAC absorbs `le64(len AAD) || le64(len ciphertext)` and the tag is
///    emitted or verified.
///
/// Two surfaces are offered. The one-shot
/// [`encrypt_and_authenticate`](Self::encrypt_and_authenticate) and
/// [`decrypt_and_verify`](Self::decrypt_and_verify) process a whole message
/// per call. The incremental surface (`resync`, `update_aad`, `encrypt` /
/// `decrypt`, `finalize` / `verify`) accepts data in pieces; streaming
/// `decrypt` releases plaintext before the tag is checked, and callers must
/// not act on it until `verify` succeeds.
///
/// # Concurrency
///
/// An engine holds mutable secret state and is driven by one caller at a
/// time (`&mut self`). Independent messages in parallel need independent
/// engines, which are cheap to construct.
///
/// # Security
///
/// - Nonce uniqueness per key is the caller's contract and is not tracked.
/// - The key, the derived MAC key and all cipher and MAC state are wiped when
///   replaced and when the engine is dropped, including mid-message.
/// - Tags shorter than 16 bytes are accepted down to
///   [`AeadConfig::min_tag_len`] and weaken forgery resistance accordingly.
pub struct AeadEngine<K: KeystreamSource, M: OneTimeMac> {
    config: AeadConfig,
    key: Option<SecretKey>,
    session: Option<Session<K, M>>,
    finalized: bool,
}

impl<K: KeystreamSource, M: OneTimeMac> AeadEngine<K, M> {
    /// Creates an unkeyed engine with the default configuration.
    pub fn new() -> Self {
        Self::with_config(AeadConfig::default())
    }

    /// Creates an unkeyed engine with `config`.
    pub fn with_config(config: AeadConfig) -> Self {
        Self {
            config,
            key: None,
            session: None,
            finalized: false,
        }
    }

    /// Creates an engine with `key` already installed.
    pub fn with_key(key: &[u8]) -> Result<Self> {
        let mut engine = Self::new();
        engine.set_key(key)?;
        Ok(engine)
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &AeadConfig {
        &self.config
    }

    /// Returns the algorithm name.
    pub fn algorithm_name(&self) -> &'static str {
        ALGORITHM_NAME
    }

    /// Reports the current state.
    pub fn state(&self) -> EngineState {
        match (&self.key, &self.session) {
            (None, _) => EngineState::Unkeyed,
            (Some(_), Some(session)) => session.state(),
            (Some(_), None) if self.finalized => EngineState::Finalized,
            (Some(_), None) => EngineState::Keyed,
        }
    }

    /// Installs a 32-byte key, discarding any previous key and session.
    ///
    /// A new nonce must be set before processing data.
    ///
    /// # Errors
    ///
    /// `InvalidKeyLength` if `key` is not 32 bytes. The engine is unchanged.
    pub fn set_key(&mut self, key: &[u8]) -> Result<()> {
        let key = SecretKey::from_slice(key).ok_or(AeadError::InvalidKeyLength {
            expected: KEY_LEN,
            actual: key.len(),
        })?;

        self.session = None;
        self.finalized = false;
        self.key = Some(key);

        trace!("aead key installed");
        Ok(())
    }

    /// Removes the key and any session. The engine returns to `Unkeyed`.
    pub fn clear(&mut self) {
        self.session = None;
        self.key = None;
        self.finalized = false;
    }

    /// Starts a new message under `nonce`.
    ///
    /// Always rebuilds the keystream cipher and derives a fresh MAC key, even
    /// if `nonce` equals the previous one. Any unfinished message is dropped.
    ///
    /// # Errors
    ///
    /// - `InvalidNonceLength` if `nonce` is not 12 bytes
    /// - `SequencingViolation` if no key is installed
    pub fn resync(&mut self, nonce: &[u8]) -> Result<()> {
        let nonce = parse_nonce(nonce)?;

        let Some(key) = self.key.as_ref() else {
            return Err(self.violation("resync"));
        };

        // Wipe the old session before building the new one.
        self.session = None;
        self.session = Some(Session::start(key, &nonce));
        self.finalized = false;

        trace!("aead resync: one-time mac key derived");
        Ok(())
    }

    /// Authenticates associated data. May be called repeatedly before the
    /// first message bytes.
    pub fn update_aad(&mut self, aad: &[u8]) -> Result<()> {
        let state = self.state();
        let session = self.session_mut("update_aad")?;

        if matches!(session.phase, Phase::Message(_)) {
            return Err(AeadError::SequencingViolation {
                operation: "update_aad",
                state,
            });
        }

        session.absorb_aad(aad);
        Ok(())
    }

    /// Encrypts `plaintext` into `ciphertext` and authenticates the output.
    ///
    /// # Errors
    ///
    /// - `BufferLengthMismatch` if the buffers differ in length
    /// - `MessageTooLong` if the keystream would be exhausted
    /// - `SequencingViolation` without an active nonce or after `decrypt`
    pub fn encrypt(&mut self, plaintext: &[u8], ciphertext: &mut [u8]) -> Result<()> {
        check_buffers(plaintext.len(), ciphertext.len())?;
        let session = self.message_session("encrypt", Direction::Encrypt, plaintext.len())?;

        ciphertext.copy_from_slice(plaintext);
        session.cipher.apply_keystream(ciphertext);
        session.mac.update(ciphertext);
        session.message_len += ciphertext.len() as u64;

        trace!(len = ciphertext.len(), "aead encrypted chunk");
        Ok(())
    }

    /// Authenticates `ciphertext` and decrypts it into `plaintext`.
    ///
    /// The plaintext is unauthenticated until [`verify`](Self::verify)
    /// succeeds.
    ///
    /// # Errors
    ///
    /// As for [`encrypt`](Self::encrypt), with `SequencingViolation` after
    /// `encrypt`.
    pub fn decrypt(&mut self, ciphertext: &[u8], plaintext: &mut [u8]) -> Result<()> {
        check_buffers(ciphertext.len(), plaintext.len())?;
        let session = self.message_session("decrypt", Direction::Decrypt, ciphertext.len())?;

        session.mac.update(ciphertext);
        session.message_len += ciphertext.len() as u64;
        plaintext.copy_from_slice(ciphertext);
        session.cipher.apply_keystream(plaintext);

        trace!(len = ciphertext.len(), "aead decrypted chunk");
        Ok(())
    }

    /// Ends the message and writes the leading `tag.len()` tag bytes.
    ///
    /// # Errors
    ///
    /// - `InvalidTagLength` if `tag.len()` violates the configured policy
    /// - `SequencingViolation` without an active nonce or after `decrypt`
    pub fn finalize(&mut self, tag: &mut [u8]) -> Result<()> {
        self.config.check_tag_len(tag.len())?;
        let session = self.take_session("finalize", Direction::Encrypt)?;

        let (aad_len, message_len) = (session.aad_len, session.message_len);
        let (_cipher, mut full) = session.finish();
        self.finalized = true;

        truncate_into(&full, tag);
        full.zeroize();

        debug!(aad_len, message_len, tag_len = tag.len(), "aead tag emitted");
        Ok(())
    }

    /// Ends the message and checks `tag` against the computed tag prefix of
    /// the same length, in constant time.
    ///
    /// # Errors
    ///
    /// - `InvalidTagLength` if `tag.len()` violates the configured policy
    /// - `AuthenticationFailure` if the tags differ
    /// - `SequencingViolation` without an active nonce or after `encrypt`
    pub fn verify(&mut self, tag: &[u8]) -> Result<()> {
        self.config.check_tag_len(tag.len())?;
        let session = self.take_session("verify", Direction::Decrypt)?;

        let (aad_len, message_len) = (session.aad_len, session.message_len);
        let (_cipher, mut computed) = session.finish();
        self.finalized = true;

        let outcome = verify_prefix(&computed, tag);
        computed.zeroize();

        debug!(
            aad_len,
            message_len,
            tag_len = tag.len(),
            verified = outcome.is_ok(),
            "aead tag checked"
        );
        outcome
    }

    /// Encrypts `plaintext` and authenticates it together with `aad`.
    ///
    /// Writes `plaintext.len()` bytes to `ciphertext` and `tag.len()` tag
    /// bytes to `tag`. All sizes are validated before any state changes.
    ///
    /// # Errors
    ///
    /// `InvalidNonceLength`, `InvalidTagLength`, `BufferLengthMismatch`,
    /// `MessageTooLong`, or `SequencingViolation` if no key is installed.
    pub fn encrypt_and_authenticate(
        &mut self,
        nonce: &[u8],
        aad: &[u8],
        plaintext: &[u8],
        ciphertext: &mut [u8],
        tag: &mut [u8],
    ) -> Result<()> {
        parse_nonce(nonce)?;
        self.config.check_tag_len(tag.len())?;
        check_buffers(plaintext.len(), ciphertext.len())?;
        check_message_len(plaintext.len())?;

        self.resync(nonce)?;
        let outcome = self.seal_message(aad, plaintext, ciphertext, tag);
        if outcome.is_err() {
            self.session = None;
        }
        outcome
    }

    /// Verifies `tag` over `aad` and `ciphertext`, then decrypts.
    ///
    /// The tag is checked before any keystream is applied, so on failure
    /// `plaintext` is left untouched.
    ///
    /// # Errors
    ///
    /// `AuthenticationFailure` if the tag does not match; otherwise as for
    /// [`encrypt_and_authenticate`](Self::encrypt_and_authenticate).
    pub fn decrypt_and_verify(
        &mut self,
        nonce: &[u8],
        aad: &[u8],
        ciphertext: &[u8],
        tag: &[u8],
        plaintext: &mut [u8],
    ) -> Result<()> {
        parse_nonce(nonce)?;
        self.config.check_tag_len(tag.len())?;
        check_buffers(ciphertext.len(), plaintext.len())?;
        check_message_len(ciphertext.len())?;

        self.resync(nonce)?;
        let outcome = self.open_message(aad, ciphertext, tag, plaintext);
        if outcome.is_err() {
            self.session = None;
        }
        outcome
    }

    fn seal_message(
        &mut self,
        aad: &[u8],
        plaintext: &[u8],
        ciphertext: &mut [u8],
        tag: &mut [u8],
    ) -> Result<()> {
        self.update_aad(aad)?;
        self.encrypt(plaintext, ciphertext)?;
        self.finalize(tag)
    }

    fn open_message(
        &mut self,
        aad: &[u8],
        ciphertext: &[u8],
        tag: &[u8],
        plaintext: &mut [u8],
    ) -> Result<()> {
        self.update_aad(aad)?;

        let mut session = self.take_session("decrypt_and_verify", Direction::Decrypt)?;
        session.begin_message(Direction::Decrypt);
        session.mac.update(ciphertext);
        session.message_len = ciphertext.len() as u64;

        let (mut cipher, mut computed) = session.finish();
        self.finalized = true;

        let outcome = verify_prefix(&computed, tag);
        computed.zeroize();

        debug!(
            aad_len = aad.len(),
            message_len = ciphertext.len(),
            tag_len = tag.len(),
            verified = outcome.is_ok(),
            "aead tag checked"
        );
        outcome?;

        plaintext.copy_from_slice(ciphertext);
        cipher.apply_keystream(plaintext);
        Ok(())
    }

    fn violation(&self, operation: &'static str) -> AeadError {
        AeadError::SequencingViolation {
            operation,
            state: self.state(),
        }
    }

    fn session_mut(&mut self, operation: &'static str) -> Result<&mut Session<K, M>> {
        let err = self.violation(operation);
        self.session.as_mut().ok_or(err)
    }

    /// Returns the session ready to process message bytes in `direction`.
    fn message_session(
        &mut self,
        operation: &'static str,
        direction: Direction,
        len: usize,
    ) -> Result<&mut Session<K, M>> {
        let err = self.violation(operation);
        let session = self.session.as_mut().ok_or(err)?;

        if !session.accepts(direction) {
            return Err(err);
        }
        session.check_capacity(len)?;
        session.begin_message(direction);

        Ok(session)
    }

    /// Detaches the session for finalization in `direction`.
    fn take_session(
        &mut self,
        operation: &'static str,
        direction: Direction,
    ) -> Result<Session<K, M>> {
        let err = self.violation(operation);

        match self.session.take() {
            Some(session) if session.accepts(direction) => Ok(session),
            other => {
                self.session = other;
                Err(err)
            }
        }
    }
}

impl<K: KeystreamSource, M: OneTimeMac> Default for AeadEngine<K, M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: KeystreamSource, M: OneTimeMac> fmt::Debug for AeadEngine<K, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AeadEngine")
            .field("algorithm", &ALGORITHM_NAME)
            .field("state", &self.state())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn parse_nonce(nonce: &[u8]) -> Result<[u8; NONCE_LEN]> {
    nonce.try_into().map_err(|_| AeadError::InvalidNonceLength {
        expected: NONCE_LEN,
        actual: nonce.len(),
    })
}

fn check_buffers(input: usize, output: usize) -> Result<()> {
    if input != output {
        return Err(AeadError::BufferLengthMismatch { input, output });
    }
    Ok(())
}

fn check_message_len(len: usize) -> Result<()> {
    match u64::try_from(len) {
        Ok(len) if len <= MAX_MESSAGE_LEN => Ok(()),
        _ => Err(AeadError::MessageTooLong {
            max: MAX_MESSAGE_LEN,
        }),
    }
}
