//! Key material resolution: an optional configured secret in, 32 key bytes out.
//!
//! # Resolution policy
//!
//! Evaluated in order against the configured secret:
//!
//! 1. Exactly 64 characters: hex-decoded into 32 bytes ([`KeySource::Hex`]).
//!    Anything that is not valid hex fails construction with
//!    [`KeyError::InvalidHex`].
//! 2. At least 32 characters: the first 32 raw UTF-8 bytes ([`KeySource::Raw`]).
//! 3. Shorter than 32 characters: SHA-256 of the string ([`KeySource::Stretched`]).
//! 4. No secret at all: SHA-256 of a fixed development placeholder
//!    ([`KeySource::Fallback`]).
//!
//! Path 4 yields the same key on every deployment that skips configuration.
//! It exists for local development only and is always reported through
//! [`KeyMaterial::is_configured`].
//!
//! Path 2 truncates by byte count, so a multi-byte character straddling byte
//! 32 is cut in half. Existing keys must keep resolving to the same bytes, so
//! the cut stays; a warning is logged when it happens.
//!
//! # Security invariants
//!
//! - Key bytes are **never** logged, serialised, or printed by `Debug`.
//! - Key bytes are zeroed when the owning [`KeyMaterial`] is dropped.

pub mod material;

pub use material::{KeyError, KeyMaterial, KeySource, HEX_KEY_LEN, KEY_LEN};
