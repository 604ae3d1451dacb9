//! [`FieldCipher`]: the long-lived handle callers share for sealing fields.

use tracing::{debug, info, warn};

use crate::config::SecretSettings;
use crate::crypto::{self, Aes256Gcm16, Envelope, EnvelopeError};
use crate::digest::{self, BlindIndex};
use crate::error::{DecryptionFailed, InitError};
use crate::key::{KeyError, KeyMaterial, KeySource};
use crate::keygen;

const FINGERPRINT_LABEL: &[u8] = b"fieldseal/key-check/v1";
const FINGERPRINT_BYTES: usize = 8;

/// Encrypts, decrypts, and digests individual field values under one key.
///
/// Built once at process start and shared by reference (or behind an `Arc`)
/// with every caller. All state is immutable after construction, so the
/// handle is `Send + Sync` and needs no locking.
#[derive(Clone)]
pub struct FieldCipher {
    cipher: Aes256Gcm16,
    blind_index: BlindIndex,
    source: KeySource,
    variable: Option<&'static str>,
    fingerprint: String,
}

impl FieldCipher {
    /// Build from `ENCRYPTION_KEY` / `SECRET_KEY` in the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`InitError::Settings`] if the environment cannot be read, or
    /// [`InitError::Key`] if a 64-character secret is not valid hex.
    pub fn from_env() -> Result<Self, InitError> {
        let settings = SecretSettings::from_env()?;
        Ok(Self::from_settings(&settings)?)
    }

    /// Build from already-loaded settings.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::InvalidHex`] if the selected secret is 64
    /// characters long but not valid hex.
    pub fn from_settings(settings: &SecretSettings) -> Result<Self, KeyError> {
        let selected = settings.selected();
        let key = KeyMaterial::resolve(selected.map(|(_, secret)| secret))?;
        let mut cipher = Self::from_key(&key)?;
        cipher.variable = selected.map(|(name, _)| name);
        cipher.log_key_status();
        Ok(cipher)
    }

    /// Build from an optional secret string, bypassing the environment.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::InvalidHex`] if `secret` is 64 characters long but
    /// not valid hex.
    pub fn from_secret(secret: Option<&str>) -> Result<Self, KeyError> {
        let key = KeyMaterial::resolve(secret)?;
        let cipher = Self::from_key(&key)?;
        cipher.log_key_status();
        Ok(cipher)
    }

    /// Build from resolved key material.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::InvalidLength`] if the cipher or MAC cannot be
    /// keyed, which does not happen for a well-formed [`KeyMaterial`].
    pub fn from_key(key: &KeyMaterial) -> Result<Self, KeyError> {
        let cipher = crypto::build_cipher(key.expose())?;
        let blind_index = BlindIndex::new(key)?;
        let check = key.derive(FINGERPRINT_LABEL)?;
        Ok(Self {
            cipher,
            blind_index,
            source: key.source(),
            variable: None,
            fingerprint: hex::encode(&check[..FINGERPRINT_BYTES]),
        })
    }

    fn log_key_status(&self) {
        if self.is_configured() {
            info!(
                key_source = self.source.as_str(),
                variable = self.variable,
                "field cipher initialised"
            );
        } else {
            warn!(
                key_source = self.source.as_str(),
                "no secret configured; using the built-in development key shared by every unconfigured deployment"
            );
        }
    }

    /// Seal `plaintext` into a base64 envelope under a fresh random IV.
    ///
    /// Empty input returns an empty string without touching the cipher.
    /// Sealing the same value twice yields two different envelopes.
    ///
    /// # Panics
    ///
    /// Panics if the OS random source fails or `plaintext` exceeds the GCM
    /// length limit (~64 GiB). Both are treated as fatal to the process.
    pub fn encrypt(&self, plaintext: &str) -> String {
        if plaintext.is_empty() {
            return String::new();
        }
        match crypto::seal(&self.cipher, plaintext.as_bytes()) {
            Ok(envelope) => envelope.encode(),
            Err(e) => panic!("field encryption failed: {e}"),
        }
    }

    /// Open a base64 envelope produced by [`encrypt`](Self::encrypt).
    ///
    /// Empty input returns an empty string. Every failure cause collapses into
    /// [`DecryptionFailed`]; the specific reason is logged at `warn` level
    /// without key material, plaintext, or envelope contents.
    ///
    /// # Errors
    ///
    /// Returns [`DecryptionFailed`] for malformed base64, input shorter than
    /// an IV plus tag, tag mismatch (tampering or wrong key), or non-UTF-8
    /// plaintext.
    pub fn decrypt(&self, envelope: &str) -> Result<String, DecryptionFailed> {
        self.open_text(envelope).map_err(|reason| {
            warn!(
                reason = %reason,
                envelope_chars = envelope.len(),
                "decryption failed"
            );
            DecryptionFailed
        })
    }

    /// Diagnostic channel behind [`decrypt`](Self::decrypt).
    pub(crate) fn open_text(&self, text: &str) -> Result<String, EnvelopeError> {
        if text.is_empty() {
            return Ok(String::new());
        }
        let envelope = Envelope::decode(text)?;
        let plaintext = crypto::open(&self.cipher, &envelope)?;
        debug!(ciphertext_len = envelope.ciphertext.len(), "envelope opened");
        String::from_utf8(plaintext).map_err(|_| EnvelopeError::InvalidUtf8)
    }

    /// Keyless SHA-256 of `value` as 64 lowercase hex characters.
    ///
    /// Not a password hash. See [`digest`](crate::digest).
    pub fn hash(&self, value: &str) -> String {
        digest::sha256_hex(value)
    }

    /// Keyed blind-index digest of `value` under this cipher's key.
    pub fn keyed_hash(&self, value: &str) -> String {
        self.blind_index.compute(value)
    }

    /// Fresh random 64-character hex key for provisioning.
    pub fn generate_key() -> String {
        keygen::generate_key()
    }

    /// Which resolution path produced the key.
    pub fn key_source(&self) -> KeySource {
        self.source
    }

    /// `false` when the development fallback key is in use.
    pub fn is_configured(&self) -> bool {
        self.source.is_configured()
    }

    /// Environment variable the secret was read from, when built from settings.
    pub fn secret_variable(&self) -> Option<&'static str> {
        self.variable
    }

    /// Short one-way key check value (16 hex characters).
    ///
    /// Equal fingerprints mean equal keys; the key cannot be recovered from it.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

impl std::fmt::Debug for FieldCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldCipher")
            .field("key", &"[REDACTED]")
            .field("source", &self.source)
            .field("variable", &self.variable)
            .field("fingerprint", &self.fingerprint)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{IV_LEN, MIN_ENVELOPE_LEN};
    use base64::{engine::general_purpose::STANDARD, Engine as _};

    fn zero_key_cipher() -> FieldCipher {
        FieldCipher::from_secret(Some(&"00".repeat(32))).unwrap()
    }

    #[test]
    fn round_trip() {
        let cipher = zero_key_cipher();
        for s in ["hello", "123-45-6789", "ünïcödé ✓", "a"] {
            assert_eq!(cipher.decrypt(&cipher.encrypt(s)).unwrap(), s);
        }
    }

    #[test]
    fn empty_is_noop_both_ways() {
        let cipher = zero_key_cipher();
        assert_eq!(cipher.encrypt(""), "");
        assert_eq!(cipher.decrypt("").unwrap(), "");
    }

    #[test]
    fn envelope_length_matches_plaintext() {
        let cipher = zero_key_cipher();
        let bytes = STANDARD.decode(cipher.encrypt("hello")).unwrap();
        assert_eq!(bytes.len(), IV_LEN + 5 + 16);
    }

    #[test]
    fn diagnostics_distinguish_causes() {
        let cipher = zero_key_cipher();
        assert_eq!(
            cipher.open_text("%%%").unwrap_err(),
            EnvelopeError::InvalidBase64
        );
        assert_eq!(
            cipher.open_text(&STANDARD.encode([0u8; 31])).unwrap_err(),
            EnvelopeError::TooShort(31)
        );
        assert_eq!(
            cipher
                .open_text(&STANDARD.encode([0u8; MIN_ENVELOPE_LEN]))
                .unwrap_err(),
            EnvelopeError::Authentication
        );
    }

    #[test]
    fn callers_see_one_failure_value() {
        let cipher = zero_key_cipher();
        let inputs = [
            "%%%".to_string(),
            STANDARD.encode([0u8; 31]),
            STANDARD.encode([0u8; MIN_ENVELOPE_LEN]),
        ];
        for input in &inputs {
            assert_eq!(cipher.decrypt(input).unwrap_err(), DecryptionFailed);
        }
    }

    #[test]
    fn non_utf8_plaintext_is_rejected() {
        let cipher = zero_key_cipher();
        let envelope = crypto::seal(&cipher.cipher, &[0xFF, 0xFE, 0xFD]).unwrap();
        assert_eq!(
            cipher.open_text(&envelope.encode()).unwrap_err(),
            EnvelopeError::InvalidUtf8
        );
        assert!(cipher.decrypt(&envelope.encode()).is_err());
    }

    #[test]
    fn settings_record_variable() {
        let settings = SecretSettings::from_vars([("SECRET_KEY", "short")]).unwrap();
        let cipher = FieldCipher::from_settings(&settings).unwrap();
        assert_eq!(cipher.key_source(), KeySource::Stretched);
        assert_eq!(cipher.secret_variable(), Some("SECRET_KEY"));
        assert!(cipher.is_configured());
    }

    #[test]
    fn unconfigured_settings_use_fallback() {
        let settings = SecretSettings::from_vars([("UNRELATED", "x")]).unwrap();
        let cipher = FieldCipher::from_settings(&settings).unwrap();
        assert_eq!(cipher.key_source(), KeySource::Fallback);
        assert!(!cipher.is_configured());
        assert_eq!(cipher.secret_variable(), None);
    }

    #[test]
    fn invalid_hex_secret_fails_construction() {
        let settings =
            SecretSettings::from_vars([("ENCRYPTION_KEY", "g".repeat(64))]).unwrap();
        assert_eq!(
            FieldCipher::from_settings(&settings).unwrap_err(),
            KeyError::InvalidHex
        );
    }

    #[test]
    fn fingerprint_tracks_key() {
        let a = zero_key_cipher();
        let b = zero_key_cipher();
        let c = FieldCipher::from_secret(Some("another")).unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
        assert_eq!(a.fingerprint().len(), FINGERPRINT_BYTES * 2);
    }

    #[test]
    fn hash_and_keyed_hash() {
        let a = zero_key_cipher();
        let b = FieldCipher::from_secret(Some("another")).unwrap();
        assert_eq!(a.hash("x"), b.hash("x"));
        assert_ne!(a.keyed_hash("x"), b.keyed_hash("x"));
        assert_eq!(a.keyed_hash("x"), a.keyed_hash("x"));
    }

    #[test]
    fn debug_does_not_leak_key() {
        let out = format!("{:?}", zero_key_cipher());
        assert!(out.contains("REDACTED"));
        assert!(out.contains("Hex"));
    }

    #[test]
    fn field_cipher_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FieldCipher>();
    }
}
