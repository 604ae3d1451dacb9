//! AES-256-GCM field envelope primitives.
//!
//! This module knows nothing about configuration or where the key came from.
//! It provides the low-level seal/open operations used by
//! [`FieldCipher`](crate::FieldCipher).
//!
//! # Envelope format
//!
//! ```text
//! base64( iv[16] || ciphertext[len(plaintext)] || tag[16] )
//! ```
//!
//! Standard base64 alphabet with padding and no line wrapping. The layout is
//! fixed; previously stored envelopes must keep opening bit-for-bit.

pub mod cipher;
pub mod envelope;

pub use cipher::{build_cipher, open, seal, Aes256Gcm16};
pub use envelope::{Envelope, EnvelopeError, IV_LEN, MIN_ENVELOPE_LEN, TAG_LEN};
