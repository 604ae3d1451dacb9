//! One-way digests over field values.
//!
//! [`sha256_hex`] is keyless and unsalted. It is meant for irreversible
//! comparison of values that are already high-entropy or already protected.
//! It is **not** a password hash: credential storage belongs to a memory-hard
//! scheme owned by the authentication layer, never to this module.
//!
//! [`BlindIndex`] is the keyed counterpart: equal inputs map to equal outputs
//! only under the same key, so an encrypted column can be matched on equality
//! without storing a guessable digest next to it.

use hmac::Mac;
use sha2::{Digest, Sha256};

use crate::key::material::HmacSha256;
use crate::key::{KeyError, KeyMaterial};

/// Character length of a hex-encoded SHA-256 digest.
pub const DIGEST_HEX_LEN: usize = 64;

const BLIND_INDEX_LABEL: &[u8] = b"fieldseal/blind-index/v1";

/// SHA-256 of the UTF-8 bytes of `value`, as 64 lowercase hex characters.
pub fn sha256_hex(value: &str) -> String {
    hex::encode(Sha256::digest(value.as_bytes()))
}

/// Keyed HMAC-SHA256 digest for equality lookups on encrypted fields.
#[derive(Clone)]
pub struct BlindIndex {
    mac: HmacSha256,
}

impl BlindIndex {
    /// Key a blind index with a subkey derived from `key`.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::InvalidLength`] if the subkey cannot key the MAC.
    pub fn new(key: &KeyMaterial) -> Result<Self, KeyError> {
        let subkey = key.derive(BLIND_INDEX_LABEL)?;
        let mac = <HmacSha256 as Mac>::new_from_slice(subkey.as_slice())
            .map_err(|_| KeyError::InvalidLength(subkey.len()))?;
        Ok(Self { mac })
    }

    /// HMAC of the UTF-8 bytes of `value`, as 64 lowercase hex characters.
    pub fn compute(&self, value: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(value.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

impl std::fmt::Debug for BlindIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BlindIndex([REDACTED])")
    }
}
