#![forbid(unsafe_code)]

//! Document pane configuration.
//!
//! ```toml
//! split_enabled = true
//! drag_enabled = true
//! drag_between_panes_enabled = false
//! drop_size = 40
//! drag_threshold = 5
//! closeable = true
//! ```

use std::path::Path;

use panekit_core::drag::DEFAULT_DRAG_THRESHOLD;
use panekit_core::{ConfigError, ValidateConfig, config};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentPaneConfig {
    /// Dropping near a tab group edge splits it.
    pub split_enabled: bool,
    pub drag_enabled: bool,
    /// Documents may move between separate document panes.
    pub drag_between_panes_enabled: bool,
    /// Depth of the edge bands that trigger a split on drop.
    pub drop_size: i32,
    pub drag_threshold: u16,
    /// When false no document can be closed.
    pub closeable: bool,
}

impl Default for DocumentPaneConfig {
    fn default() -> Self {
        Self {
            split_enabled: true,
            drag_enabled: true,
            drag_between_panes_enabled: false,
            drop_size: 40,
            drag_threshold: DEFAULT_DRAG_THRESHOLD,
            closeable: true,
        }
    }
}

impl DocumentPaneConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        config::from_toml_str(s)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        config::from_toml_file(path)
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        config::from_json_str(s)
    }
}

impl ValidateConfig for DocumentPaneConfig {
    fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.drop_size < 0 {
            errors.push(format!("drop_size must be >= 0, got {}", self.drop_size));
        }
        errors
    }
}
