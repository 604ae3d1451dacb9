//! Caller-visible error types.
//!
//! Detailed failure reasons for envelope handling live in
//! [`EnvelopeError`](crate::crypto::EnvelopeError) and are only ever logged.
//! Callers of [`FieldCipher::decrypt`](crate::FieldCipher::decrypt) see the
//! single [`DecryptionFailed`] value.

use thiserror::Error;

use crate::config::SettingsError;
use crate::key::KeyError;

/// Uniform decryption failure.
///
/// Returned for malformed base64, truncated input, authentication failure,
/// wrong key, and non-UTF-8 plaintext alike. A failed decryption is not
/// transient; retrying will not help.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("decryption failed")]
pub struct DecryptionFailed;

/// Errors raised while constructing a [`FieldCipher`](crate::FieldCipher).
#[derive(Debug, Error)]
pub enum InitError {
    /// The configuration sources could not be read.
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// The configured secret could not be turned into a key.
    #[error(transparent)]
    Key(#[from] KeyError),
}
