//! Runtime configuration for the `fieldseal` binary.
//!
//! Only ambient settings live here. The secret itself is read by
//! [`fieldseal::SecretSettings`] so that the library and the binary agree on
//! variable names and precedence.

use anyhow::{Context, Result};
use serde::Deserialize;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validated binary configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Tracing log level (e.g. `"warn"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "warn".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or fails validation.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    fn validate(&self) -> Result<()> {
        let level = self.log_level.trim().to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            anyhow::bail!(
                "LOG_LEVEL must be one of {}, got {:?}",
                LOG_LEVELS.join(", "),
                self.log_level
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        assert_eq!(default_log_level(), "warn");
    }

    #[test]
    fn validate_accepts_known_levels() {
        for level in ["trace", "DEBUG", " info ", "warn", "error"] {
            let cfg = Config {
                log_level: level.into(),
            };
            assert!(cfg.validate().is_ok(), "{level} should be accepted");
        }
    }

    #[test]
    fn validate_rejects_unknown_level() {
        let cfg = Config {
            log_level: "verbose".into(),
        };
        assert!(cfg.validate().is_err());
    }
}
