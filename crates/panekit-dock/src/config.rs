#![forbid(unsafe_code)]

//! Dockable pane configuration.
//!
//! ```toml
//! drop_side = 40
//! min_element_size = 64
//! resize_gripper_width = 10
//! sidebar_visibility = "minimized"
//! sidebar_button_spacing = 0
//! drag_threshold = 5
//! ```

use std::path::Path;

use panekit_core::drag::DEFAULT_DRAG_THRESHOLD;
use panekit_core::{ConfigError, ValidateConfig, config};
use serde::{Deserialize, Serialize};

/// Which frames get a sidebar button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SidebarVisibility {
    /// Sidebars are never shown.
    None,
    /// Only minimized and preview frames.
    #[default]
    Minimized,
    /// Every frame that is not closed.
    All,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DockablePaneConfig {
    /// Depth of the pane-edge drop bands; content and frames use twice this.
    pub drop_side: i32,
    pub min_element_size: i32,
    pub resize_gripper_width: i32,
    pub sidebar_visibility: SidebarVisibility,
    pub sidebar_button_spacing: i32,
    pub drag_threshold: u16,
}

impl Default for DockablePaneConfig {
    fn default() -> Self {
        Self {
            drop_side: 40,
            min_element_size: 64,
            resize_gripper_width: 10,
            sidebar_visibility: SidebarVisibility::Minimized,
            sidebar_button_spacing: 0,
            drag_threshold: DEFAULT_DRAG_THRESHOLD,
        }
    }
}

impl DockablePaneConfig {
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

impl ValidateConfig for DockablePaneConfig {
    fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.drop_side <= 0 {
            errors.push(format!("drop_side must be > 0, got {}", self.drop_side));
        }
        if self.min_element_size < 0 {
            errors.push(format!(
                "min_element_size must be >= 0, got {}",
                self.min_element_size
            ));
        }
        if self.resize_gripper_width < 0 {
            errors.push(format!(
                "resize_gripper_width must be >= 0, got {}",
                self.resize_gripper_width
            ));
        }
        if self.sidebar_button_spacing < 0 {
            errors.push(format!(
                "sidebar_button_spacing must be >= 0, got {}",
                self.sidebar_button_spacing
            ));
        }
        errors
    }
}
