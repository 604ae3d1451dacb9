//! Fresh key generation for provisioning.

use aes_gcm::aead::{rand_core::RngCore, OsRng};
use zeroize::Zeroizing;

use crate::key::KEY_LEN;

/// Generate 32 random bytes from the OS CSPRNG, hex-encoded.
///
/// The 64-character output is accepted verbatim as a configured secret (the
/// hex resolution path). Intended for provisioning, not the request path.
pub fn generate_key() -> String {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    OsRng.fill_bytes(key.as_mut_slice());
    hex::encode(key.as_slice())
}
