//! [`KeyMaterial`]: the resolved 32-byte key and where it came from.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::warn;
use zeroize::Zeroizing;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Character length of a hex-encoded key.
pub const HEX_KEY_LEN: usize = KEY_LEN * 2;

/// Hashed to produce the key when no secret is configured.
pub(crate) const DEVELOPMENT_PLACEHOLDER: &str = "fieldseal-development-only-key-change-me";

pub(crate) type HmacSha256 = Hmac<Sha256>;

/// Errors produced while resolving key material.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    /// A 64-character secret was supplied but it is not valid hex.
    #[error("configured secret is {HEX_KEY_LEN} characters long but is not valid hex")]
    InvalidHex,

    /// Raw key bytes have an unexpected length.
    #[error("invalid key length: expected {KEY_LEN} bytes, got {0}")]
    InvalidLength(usize),
}

/// Which resolution path produced a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeySource {
    /// 64-character hex secret decoded directly.
    Hex,
    /// First 32 bytes of a long secret.
    Raw,
    /// SHA-256 of a short secret.
    Stretched,
    /// SHA-256 of the built-in development placeholder.
    Fallback,
}

impl KeySource {
    /// Lowercase name used in reports and log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            KeySource::Hex => "hex",
            KeySource::Raw => "raw",
            KeySource::Stretched => "stretched",
            KeySource::Fallback => "fallback",
        }
    }

    /// `false` only for [`KeySource::Fallback`].
    pub fn is_configured(&self) -> bool {
        !matches!(self, KeySource::Fallback)
    }
}

impl std::fmt::Display for KeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exactly [`KEY_LEN`] bytes of key material, zeroed on drop.
#[derive(Clone)]
pub struct KeyMaterial {
    bytes: Zeroizing<[u8; KEY_LEN]>,
    source: KeySource,
}

impl KeyMaterial {
    /// Resolve an optional secret into key material.
    ///
    /// `None` selects the development fallback key. Callers reading the
    /// secret from the environment should map empty values to `None` first;
    /// [`SecretSettings::secret`](crate::SecretSettings::secret) does this.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::InvalidHex`] if the secret is 64 characters long
    /// but does not decode as hex.
    pub fn resolve(secret: Option<&str>) -> Result<Self, KeyError> {
        let Some(secret) = secret else {
            return Ok(Self::stretch(DEVELOPMENT_PLACEHOLDER, KeySource::Fallback));
        };

        let char_len = secret.chars().count();
        if char_len == HEX_KEY_LEN {
            let mut bytes = Zeroizing::new([0u8; KEY_LEN]);
            hex::decode_to_slice(secret, bytes.as_mut_slice()).map_err(|_| KeyError::InvalidHex)?;
            return Ok(Self {
                bytes,
                source: KeySource::Hex,
            });
        }

        if char_len >= KEY_LEN {
            if !secret.is_char_boundary(KEY_LEN) {
                warn!(
                    key_source = KeySource::Raw.as_str(),
                    "configured secret is truncated inside a multi-byte character"
                );
            }
            let mut bytes = Zeroizing::new([0u8; KEY_LEN]);
            bytes.copy_from_slice(&secret.as_bytes()[..KEY_LEN]);
            return Ok(Self {
                bytes,
                source: KeySource::Raw,
            });
        }

        Ok(Self::stretch(secret, KeySource::Stretched))
    }

    /// Wrap raw key bytes obtained elsewhere (e.g. from a key store).
    ///
    /// The result reports [`KeySource::Raw`].
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::InvalidLength`] if `key` is not [`KEY_LEN`] bytes.
    pub fn from_bytes(key: &[u8]) -> Result<Self, KeyError> {
        if key.len() != KEY_LEN {
            return Err(KeyError::InvalidLength(key.len()));
        }
        let mut bytes = Zeroizing::new([0u8; KEY_LEN]);
        bytes.copy_from_slice(key);
        Ok(Self {
            bytes,
            source: KeySource::Raw,
        })
    }

    fn stretch(input: &str, source: KeySource) -> Self {
        let mut bytes = Zeroizing::new([0u8; KEY_LEN]);
        bytes.copy_from_slice(&Sha256::digest(input.as_bytes()));
        Self { bytes, source }
    }

    /// Which resolution path produced this key.
    pub fn source(&self) -> KeySource {
        self.source
    }

    /// `true` unless the development fallback key is in use.
    pub fn is_configured(&self) -> bool {
        self.source.is_configured()
    }

    /// Borrow the raw key bytes. Use and drop promptly.
    pub(crate) fn expose(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }

    /// Derive an independent 32-byte subkey bound to `label`.
    ///
    /// HMAC-SHA256 keyed with this key over the label. Every use other than
    /// the envelope cipher goes through a subkey.
    pub(crate) fn derive(&self, label: &[u8]) -> Result<Zeroizing<[u8; KEY_LEN]>, KeyError> {
        let mut mac = <HmacSha256 as Mac>::new_from_slice(self.expose())
            .map_err(|_| KeyError::InvalidLength(self.bytes.len()))?;
        mac.update(label);
        let mut out = Zeroizing::new([0u8; KEY_LEN]);
        out.copy_from_slice(&mac.finalize().into_bytes());
        Ok(out)
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material, not even in debug builds.
        f.debug_struct("KeyMaterial")
            .field("bytes", &"[REDACTED]")
            .field("source", &self.source)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_secret_decodes_directly() {
        let secret = "00112233445566778899aabbccddeeff00112233445566778899aabbccddeeff";
        let key = KeyMaterial::resolve(Some(secret)).unwrap();
        assert_eq!(key.source(), KeySource::Hex);
        assert_eq!(&key.expose()[..], hex::decode(secret).unwrap().as_slice());
    }

    #[test]
    fn uppercase_hex_is_accepted() {
        let secret = "AB".repeat(32);
        let key = KeyMaterial::resolve(Some(&secret)).unwrap();
        assert_eq!(key.expose(), &[0xABu8; KEY_LEN]);
    }

    #[test]
    fn invalid_hex_fails_fast() {
        let secret = "zz".repeat(32);
        assert_eq!(
            KeyMaterial::resolve(Some(&secret)).unwrap_err(),
            KeyError::InvalidHex
        );
    }

    #[test]
    fn sixty_four_multibyte_chars_is_not_hex() {
        // 64 characters, 128 bytes.
        let secret = "é".repeat(64);
        assert_eq!(
            KeyMaterial::resolve(Some(&secret)).unwrap_err(),
            KeyError::InvalidHex
        );
    }

    #[test]
    fn long_secret_takes_first_32_bytes() {
        let secret = "abcdefghijklmnopqrstuvwxyz0123456789ABCD"; // 40 chars
        let key = KeyMaterial::resolve(Some(secret)).unwrap();
        assert_eq!(key.source(), KeySource::Raw);
        assert_eq!(&key.expose()[..], &secret.as_bytes()[..KEY_LEN]);
    }

    #[test]
    fn exactly_32_chars_is_raw() {
        let secret = "k".repeat(32);
        let key = KeyMaterial::resolve(Some(&secret)).unwrap();
        assert_eq!(key.source(), KeySource::Raw);
        assert_eq!(key.expose(), &[b'k'; KEY_LEN]);
    }

    #[test]
    fn sixty_five_chars_is_raw_not_hex() {
        let secret = "0".repeat(65);
        let key = KeyMaterial::resolve(Some(&secret)).unwrap();
        assert_eq!(key.source(), KeySource::Raw);
        assert_eq!(key.expose(), &[b'0'; KEY_LEN]);
    }

    #[test]
    fn raw_truncation_splits_multibyte_character() {
        // 31 ASCII bytes then a 2-byte character: the cut lands inside it.
        let secret = format!("{}é{}", "a".repeat(31), "b".repeat(10));
        let key = KeyMaterial::resolve(Some(&secret)).unwrap();
        assert_eq!(key.source(), KeySource::Raw);
        assert_eq!(&key.expose()[..], &secret.as_bytes()[..KEY_LEN]);
        assert_eq!(key.expose()[31], 0xC3);
    }

    #[test]
    fn short_secret_is_stretched_with_sha256() {
        let secret = "short-pass"; // 10 chars
        let key = KeyMaterial::resolve(Some(secret)).unwrap();
        assert_eq!(key.source(), KeySource::Stretched);
        assert_eq!(&key.expose()[..], Sha256::digest(secret.as_bytes()).as_slice());
    }

    #[test]
    fn short_char_count_with_many_bytes_is_stretched() {
        // 20 characters but 60 bytes.
        let secret = "鍵".repeat(20);
        let key = KeyMaterial::resolve(Some(&secret)).unwrap();
        assert_eq!(key.source(), KeySource::Stretched);
    }

    #[test]
    fn missing_secret_uses_fallback() {
        let a = KeyMaterial::resolve(None).unwrap();
        let b = KeyMaterial::resolve(None).unwrap();
        assert_eq!(a.source(), KeySource::Fallback);
        assert!(!a.is_configured());
        assert_eq!(
            &a.expose()[..],
            Sha256::digest(DEVELOPMENT_PLACEHOLDER.as_bytes()).as_slice()
        );
        assert_eq!(a.expose(), b.expose());
    }

    #[test]
    fn configured_sources_report_configured() {
        assert!(KeySource::Hex.is_configured());
        assert!(KeySource::Raw.is_configured());
        assert!(KeySource::Stretched.is_configured());
        assert!(!KeySource::Fallback.is_configured());
    }

    #[test]
    fn from_bytes_rejects_wrong_length() {
        assert_eq!(
            KeyMaterial::from_bytes(&[0u8; 16]).unwrap_err(),
            KeyError::InvalidLength(16)
        );
        assert!(KeyMaterial::from_bytes(&[0u8; KEY_LEN]).is_ok());
    }

    #[test]
    fn derived_subkeys_depend_on_label() {
        let key = KeyMaterial::from_bytes(&[0x42u8; KEY_LEN]).unwrap();
        let a = key.derive(b"label-a").unwrap();
        let b = key.derive(b"label-b").unwrap();
        assert_ne!(*a, *b);
        assert_ne!(*a, *key.expose());
        assert_eq!(*a, *key.derive(b"label-a").unwrap());
    }

    #[test]
    fn key_material_redacted_in_debug() {
        let key = KeyMaterial::from_bytes(&[0xFFu8; KEY_LEN]).unwrap();
        let out = format!("{key:?}");
        assert!(out.contains("REDACTED"));
        assert!(!out.contains("255"));
    }
}
