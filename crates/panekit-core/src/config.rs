#![forbid(unsafe_code)]

//! Shared loading helpers for the engines' configuration structs.
//!
//! Each engine defines its own config with `#[serde(default)]` so partial
//! files are accepted, and a `validate()` returning human-readable problems.
//!
//! ```toml
//! drop_side = 48
//! sidebar_visibility = "all"
//! ```

use std::fmt;
use std::path::Path;

use serde::de::DeserializeOwned;

/// A configuration struct that can be range-checked after loading.
pub trait ValidateConfig {
    /// Returns a list of validation errors; empty means valid.
    fn validate(&self) -> Vec<String>;
}

/// Load and validate from a TOML string.
pub fn from_toml_str<T: DeserializeOwned + ValidateConfig>(s: &str) -> Result<T, ConfigError> {
    let config: T = toml::from_str(s).map_err(ConfigError::Toml)?;
    checked(config)
}

/// Load and validate from a TOML file on disk.
pub fn from_toml_file<T: DeserializeOwned + ValidateConfig>(
    path: impl AsRef<Path>,
) -> Result<T, ConfigError> {
    let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
    from_toml_str(&content)
}

/// Load and validate from a JSON string.
pub fn from_json_str<T: DeserializeOwned + ValidateConfig>(s: &str) -> Result<T, ConfigError> {
    let config: T = serde_json::from_str(s).map_err(ConfigError::Json)?;
    checked(config)
}

fn checked<T: ValidateConfig>(config: T) -> Result<T, ConfigError> {
    let errors = config.validate();
    if errors.is_empty() {
        Ok(config)
    } else {
        Err(ConfigError::Validation(errors))
    }
}

/// Configuration loading failures.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    Toml(toml::de::Error),
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "config I/O error: {err}"),
            Self::Toml(err) => write!(f, "config TOML error: {err}"),
            Self::Json(err) => write!(f, "config JSON error: {err}"),
            Self::Validation(errors) => write!(f, "invalid config: {}", errors.join("; ")),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Toml(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::Validation(_) => None,
        }
    }
}
