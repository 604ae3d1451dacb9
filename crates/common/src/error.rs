//! Common error types shared across crates.

use thiserror::Error;

/// Top-level error type surfaced to operators and calling processes.
///
/// Variants map to process exit codes:
/// - [`ServiceError::Usage`] → 2
/// - [`ServiceError::DecryptionFailed`] → 3
/// - [`ServiceError::Configuration`] → 4
/// - [`ServiceError::Internal`] → 1
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The invocation was malformed: missing input or unreadable stdin.
    #[error("usage error: {0}")]
    Usage(String),

    /// An envelope could not be opened. Every failure cause looks the same.
    #[error("decryption failed")]
    DecryptionFailed,

    /// The secret configuration could not be loaded or resolved into a key.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// An unexpected internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Returns the process exit code that should be used for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            ServiceError::Usage(_) => 2,
            ServiceError::DecryptionFailed => 3,
            ServiceError::Configuration(_) => 4,
            ServiceError::Internal(_) => 1,
        }
    }

    /// Short machine-readable code used in JSON error output.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::Usage(_) => "usage",
            ServiceError::DecryptionFailed => "decryption_failed",
            ServiceError::Configuration(_) => "configuration",
            ServiceError::Internal(_) => "internal_error",
        }
    }
}
