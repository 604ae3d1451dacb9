//! Report types emitted by the operator tooling.
//!
//! These types are serialised as JSON on stdout so that deployment audits and
//! provisioning scripts can consume them without scraping text.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Key audit
// ---------------------------------------------------------------------------

/// Output of `fieldseal status`.
///
/// Never carries key bytes. `fingerprint` is a one-way check value that lets
/// two deployments be compared for key equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyStatusReport {
    /// `false` when the built-in development fallback key is in use.
    pub configured: bool,
    /// Which resolution path produced the key: `hex`, `raw`, `stretched` or `fallback`.
    pub source: String,
    /// Name of the environment variable the secret was read from, if any.
    pub variable: Option<String>,
    /// Short non-reversible key check value.
    pub fingerprint: String,
}

// ---------------------------------------------------------------------------
// Envelope inspection
// ---------------------------------------------------------------------------

/// Output of `fieldseal inspect`: the shape of an envelope, not its contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvelopeReport {
    /// Total decoded length in bytes.
    pub total_len: usize,
    /// Length of the initialisation vector.
    pub iv_len: usize,
    /// Length of the ciphertext, equal to the plaintext's UTF-8 length.
    pub ciphertext_len: usize,
    /// Length of the authentication tag.
    pub tag_len: usize,
}

// ---------------------------------------------------------------------------
// Error output
// ---------------------------------------------------------------------------

/// Error body written to stdout when `--json` output is requested.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Short machine-readable error code (e.g. `"decryption_failed"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorReport {
    /// Construct an [`ErrorReport`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_status_serialises_without_variable() {
        let report = KeyStatusReport {
            configured: false,
            source: "fallback".into(),
            variable: None,
            fingerprint: "0011223344556677".into(),
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["configured"], false);
        assert_eq!(json["source"], "fallback");
        assert!(json["variable"].is_null());
    }

    #[test]
    fn envelope_report_field_names() {
        let report = EnvelopeReport {
            total_len: 37,
            iv_len: 16,
            ciphertext_len: 5,
            tag_len: 16,
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"ciphertext_len\":5"));
    }

    #[test]
    fn error_report_new() {
        let e = ErrorReport::new("usage", "no input provided");
        assert_eq!(e.code, "usage");
        assert!(e.message.contains("no input"));
    }
}
