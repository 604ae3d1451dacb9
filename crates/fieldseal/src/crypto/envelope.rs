//! [`Envelope`]: the parsed `IV || ciphertext || tag` byte layout.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

/// Byte length of the initialisation vector (128 bits).
pub const IV_LEN: usize = 16;

/// Byte length of the GCM authentication tag (128 bits).
pub const TAG_LEN: usize = 16;

/// Smallest valid decoded envelope: IV and tag around an empty ciphertext.
pub const MIN_ENVELOPE_LEN: usize = IV_LEN + TAG_LEN;

/// A parsed, encrypted field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Random per-encryption initialisation vector.
    pub iv: [u8; IV_LEN],
    /// Ciphertext, same length as the plaintext bytes. May be empty.
    pub ciphertext: Vec<u8>,
    /// Authentication tag over the ciphertext under this IV.
    pub tag: [u8; TAG_LEN],
}

/// Reasons an envelope could not be parsed or opened.
///
/// These are diagnostics for operators. They are logged and then collapsed
/// into [`DecryptionFailed`](crate::DecryptionFailed) before reaching a caller.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeError {
    /// The text is not valid standard base64.
    #[error("envelope is not valid base64")]
    InvalidBase64,

    /// The decoded bytes cannot hold an IV and a tag.
    #[error("envelope too short: {0} bytes, need at least {MIN_ENVELOPE_LEN}")]
    TooShort(usize),

    /// Tag verification failed: tampered data, corruption, or the wrong key.
    #[error("envelope authentication failed")]
    Authentication,

    /// The AEAD refused to seal the plaintext.
    #[error("aead seal failed")]
    Seal,

    /// Authentication succeeded but the plaintext is not UTF-8.
    #[error("decrypted plaintext is not valid UTF-8")]
    InvalidUtf8,
}

impl Envelope {
    /// Total length in bytes before base64 encoding.
    pub fn len(&self) -> usize {
        IV_LEN + self.ciphertext.len() + TAG_LEN
    }

    /// `true` when the ciphertext is empty (tag-only envelope).
    pub fn is_empty(&self) -> bool {
        self.ciphertext.is_empty()
    }

    /// Concatenate `iv || ciphertext || tag`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len());
        out.extend_from_slice(&self.iv);
        out.extend_from_slice(&self.ciphertext);
        out.extend_from_slice(&self.tag);
        out
    }

    /// Split raw envelope bytes into their parts.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::TooShort`] if fewer than [`MIN_ENVELOPE_LEN`]
    /// bytes are supplied.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EnvelopeError> {
        if bytes.len() < MIN_ENVELOPE_LEN {
            return Err(EnvelopeError::TooShort(bytes.len()));
        }
        let (iv, rest) = bytes.split_at(IV_LEN);
        let (ciphertext, tag) = rest.split_at(rest.len() - TAG_LEN);

        let mut iv_buf = [0u8; IV_LEN];
        iv_buf.copy_from_slice(iv);
        let mut tag_buf = [0u8; TAG_LEN];
        tag_buf.copy_from_slice(tag);

        Ok(Self {
            iv: iv_buf,
            ciphertext: ciphertext.to_vec(),
            tag: tag_buf,
        })
    }

    /// Encode to the canonical base64 text form.
    pub fn encode(&self) -> String {
        STANDARD.encode(self.to_bytes())
    }

    /// Parse the canonical base64 text form.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::InvalidBase64`] if `s` is not standard base64,
    /// or [`EnvelopeError::TooShort`] if it decodes to fewer than
    /// [`MIN_ENVELOPE_LEN`] bytes.
    pub fn decode(s: &str) -> Result<Self, EnvelopeError> {
        let bytes = STANDARD
            .decode(s)
            .map_err(|_| EnvelopeError::InvalidBase64)?;
        Self::from_bytes(&bytes)
    }
}
