//! `fieldseal`: symmetric protection for individual record fields.
//!
//! One long-lived [`FieldCipher`] is built at process start from
//! environment-sourced secret material and then shared by every caller that
//! needs to seal, open, or digest a value:
//!
//! ```no_run
//! use fieldseal::FieldCipher;
//!
//! let cipher = FieldCipher::from_env()?;
//! if !cipher.is_configured() {
//!     // Development fallback key in use; refuse to run in production here.
//! }
//! let sealed = cipher.encrypt("123-45-6789");
//! assert_eq!(cipher.decrypt(&sealed)?, "123-45-6789");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Components
//!
//! - [`key`] turns an optional secret string into exactly 32 bytes of key material.
//! - [`crypto`] seals and opens the `IV || ciphertext || tag` envelope.
//! - [`digest`] provides the keyless SHA-256 digest and the keyed blind index.
//! - [`keygen`] produces fresh provisioning keys.

pub mod config;
pub mod crypto;
pub mod digest;
pub mod error;
pub mod key;
pub mod keygen;
mod service;

pub use config::SecretSettings;
pub use crypto::Envelope;
pub use error::{DecryptionFailed, InitError};
pub use key::{KeyError, KeyMaterial, KeySource};
pub use service::FieldCipher;
