//! Secret configuration loaded from the environment.
//!
//! Two variables are consulted, in order: `ENCRYPTION_KEY`, then `SECRET_KEY`.
//! The first one that is set to a non-empty value wins. Neither being set is a
//! valid state and selects the development fallback key.

use serde::Deserialize;
use thiserror::Error;

/// Primary secret variable.
pub const ENCRYPTION_KEY_VAR: &str = "ENCRYPTION_KEY";

/// Secondary secret variable, consulted when the primary is unset or empty.
pub const SECRET_KEY_VAR: &str = "SECRET_KEY";

/// Errors reading the configuration sources.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The `config` builder could not collect or deserialise the sources.
    #[error("failed to load secret configuration: {0}")]
    Load(#[from] config::ConfigError),
}

/// Candidate secrets as read from the environment.
#[derive(Clone, Default, Deserialize)]
pub struct SecretSettings {
    /// Value of `ENCRYPTION_KEY`.
    #[serde(default)]
    pub encryption_key: Option<String>,

    /// Value of `SECRET_KEY`.
    #[serde(default)]
    pub secret_key: Option<String>,
}

impl SecretSettings {
    /// Read both candidate variables from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Load`] if the environment cannot be collected.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::load(config::Environment::default())
    }

    /// Read both candidate variables from an explicit variable map instead of
    /// the process environment. Keys are variable names, e.g. `"SECRET_KEY"`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Load`] if the map cannot be deserialised.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, SettingsError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map: config::Map<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self::load(config::Environment::default().source(Some(map)))
    }

    fn load(env: config::Environment) -> Result<Self, SettingsError> {
        let cfg = config::Config::builder().add_source(env).build()?;
        Ok(cfg.try_deserialize()?)
    }

    /// The winning secret and the variable it came from, if any.
    pub fn selected(&self) -> Option<(&'static str, &str)> {
        let candidates = [
            (ENCRYPTION_KEY_VAR, self.encryption_key.as_deref()),
            (SECRET_KEY_VAR, self.secret_key.as_deref()),
        ];
        candidates
            .into_iter()
            .find_map(|(name, value)| value.filter(|v| !v.is_empty()).map(|v| (name, v)))
    }

    /// The winning secret, if any.
    pub fn secret(&self) -> Option<&str> {
        self.selected().map(|(_, value)| value)
    }
}

impl std::fmt::Debug for SecretSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("SecretSettings")
            .field("encryption_key", &redact(&self.encryption_key))
            .field("secret_key", &redact(&self.secret_key))
            .finish()
    }
}
