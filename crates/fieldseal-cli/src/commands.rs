//! Subcommand execution.
//!
//! Each command produces exactly one line of stdout output. Failures are
//! returned as [`ServiceError`] so `main` can pick the exit code.

use std::io::Read;

use common::protocol::{EnvelopeReport, KeyStatusReport};
use common::ServiceError;
use fieldseal::crypto::{IV_LEN, TAG_LEN};
use fieldseal::{Envelope, FieldCipher, SecretSettings};
use serde::Serialize;
use tracing::debug;

use crate::cli::{Command, ValueArgs};

/// Run `command`, reading any missing value from `stdin`.
///
/// # Errors
///
/// - [`ServiceError::Configuration`] if the secret cannot be resolved.
/// - [`ServiceError::DecryptionFailed`] if `decrypt` cannot open the envelope.
/// - [`ServiceError::Usage`] if input is missing or unreadable.
pub fn execute<R: Read>(
    command: Command,
    settings: &SecretSettings,
    stdin: R,
) -> Result<String, ServiceError> {
    // Provisioning must work before any key is configured.
    if let Command::GenerateKey = command {
        return Ok(FieldCipher::generate_key());
    }

    let cipher = FieldCipher::from_settings(settings)
        .map_err(|e| ServiceError::Configuration(e.to_string()))?;

    match command {
        Command::GenerateKey => Ok(FieldCipher::generate_key()),
        Command::Encrypt(args) => Ok(cipher.encrypt(&read_value(args, stdin)?)),
        Command::Decrypt(args) => cipher
            .decrypt(&read_value(args, stdin)?)
            .map_err(|_| ServiceError::DecryptionFailed),
        Command::Hash(args) => Ok(cipher.hash(&read_value(args, stdin)?)),
        Command::KeyedHash(args) => Ok(cipher.keyed_hash(&read_value(args, stdin)?)),
        Command::Inspect(args) => inspect(&read_value(args, stdin)?),
        Command::Status => to_json(&KeyStatusReport {
            configured: cipher.is_configured(),
            source: cipher.key_source().to_string(),
            variable: cipher.secret_variable().map(str::to_owned),
            fingerprint: cipher.fingerprint().to_owned(),
        }),
    }
}

fn inspect(text: &str) -> Result<String, ServiceError> {
    let envelope = Envelope::decode(text)
        .map_err(|e| ServiceError::Usage(format!("not a well-formed envelope: {e}")))?;
    to_json(&EnvelopeReport {
        total_len: envelope.len(),
        iv_len: IV_LEN,
        ciphertext_len: envelope.ciphertext.len(),
        tag_len: TAG_LEN,
    })
}

/// Take the value from the argument, or from stdin with one trailing line
/// ending removed.
fn read_value<R: Read>(args: ValueArgs, mut stdin: R) -> Result<String, ServiceError> {
    if let Some(value) = args.value {
        return Ok(value);
    }
    let mut buf = String::new();
    stdin
        .read_to_string(&mut buf)
        .map_err(|e| ServiceError::Usage(format!("failed to read value from stdin: {e}")))?;
    let trimmed = buf
        .strip_suffix('\n')
        .map(|s| s.strip_suffix('\r').unwrap_or(s))
        .unwrap_or(buf.as_str());
    debug!(bytes = trimmed.len(), "value read from stdin");
    Ok(trimmed.to_owned())
}

fn to_json<T: Serialize>(value: &T) -> Result<String, ServiceError> {
    serde_json::to_string(value).map_err(|e| ServiceError::Internal(e.to_string()))
}
