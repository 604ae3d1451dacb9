//! AES-256-GCM sealing and opening of individual field envelopes.
//!
//! **Nonce size:** the envelope carries a 128-bit IV rather than GCM's
//! customary 96 bits. The IV is drawn from the OS CSPRNG on every call and is
//! never derived from a counter.
//!
//! **Do NOT reuse an IV under the same key.** GCM nonce reuse is catastrophic;
//! it breaks both confidentiality and authentication.

use aes_gcm::{
    aead::{consts::U16, generic_array::GenericArray, rand_core::RngCore, AeadInPlace, OsRng},
    aes::Aes256,
    AesGcm, KeyInit,
};

use super::envelope::{Envelope, EnvelopeError, IV_LEN, TAG_LEN};
use crate::key::{KeyError, KEY_LEN};

/// AES-256-GCM with a 16-byte nonce and a 16-byte tag.
pub type Aes256Gcm16 = AesGcm<Aes256, U16>;

/// Build the cipher for a 32-byte key.
///
/// # Errors
///
/// Returns [`KeyError::InvalidLength`] if `key` is not [`KEY_LEN`] bytes.
pub fn build_cipher(key: &[u8]) -> Result<Aes256Gcm16, KeyError> {
    if key.len() != KEY_LEN {
        return Err(KeyError::InvalidLength(key.len()));
    }
    Aes256Gcm16::new_from_slice(key).map_err(|_| KeyError::InvalidLength(key.len()))
}

/// Encrypt `plaintext` under a fresh random IV.
///
/// # Errors
///
/// Returns [`EnvelopeError::Seal`] on an internal AEAD error, which only
/// happens for plaintexts beyond the GCM length limit (~64 GiB).
pub fn seal(cipher: &Aes256Gcm16, plaintext: &[u8]) -> Result<Envelope, EnvelopeError> {
    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut iv);

    let mut buffer = plaintext.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(GenericArray::from_slice(&iv), b"", &mut buffer)
        .map_err(|_| EnvelopeError::Seal)?;

    let mut tag_buf = [0u8; TAG_LEN];
    tag_buf.copy_from_slice(&tag);

    Ok(Envelope {
        iv,
        ciphertext: buffer,
        tag: tag_buf,
    })
}

/// Verify and decrypt an [`Envelope`] back to plaintext bytes.
///
/// # Errors
///
/// Returns [`EnvelopeError::Authentication`] if the tag does not verify
/// (wrong key or tampered data).
pub fn open(cipher: &Aes256Gcm16, envelope: &Envelope) -> Result<Vec<u8>, EnvelopeError> {
    let mut buffer = envelope.ciphertext.clone();
    cipher
        .decrypt_in_place_detached(
            GenericArray::from_slice(&envelope.iv),
            b"",
            &mut buffer,
            GenericArray::from_slice(&envelope.tag),
        )
        .map_err(|_| EnvelopeError::Authentication)?;
    Ok(buffer)
}
