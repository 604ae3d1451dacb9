//! Telemetry initialisation for the `fieldseal` binary.
//!
//! Structured JSON logs on stderr only; stdout is reserved for command output
//! so it can be piped.
//!
//! # Telemetry invariants
//!
//! - **No key material, plaintext, or envelope text** may appear in any log field.
//! - Log level is configurable via `LOG_LEVEL` (default: `warn`), overridden
//!   by `RUST_LOG` when set.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Initialise the tracing subscriber.
///
/// # Errors
///
/// Returns an error if the subscriber has already been set.
pub fn init(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise fieldseal tracing subscriber: {e}"))
}
