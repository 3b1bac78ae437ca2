//! Configuration for the geoid service.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{GeoidError, Result};
use crate::types::Interpolation;

/// Default directory searched for geoid grids.
pub const DEFAULT_DATA_DIR: &str = "/usr/local/share/GeographicLib/geoids";

/// Grid loaded when no name is given.
pub const DEFAULT_GEOID_NAME: &str = "egm96-15";

/// Configuration for the geoid service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoidConfig {
    /// Directory containing `<name>.<extension>` grid files.
    pub data_dir: PathBuf,

    /// Grid name used when `initialize` is called without one.
    pub default_name: String,

    /// Interpolation used when `initialize` is called without a mode.
    pub interpolation: Interpolation,

    /// File extension of grid resources.
    pub extension: String,
}

impl Default for GeoidConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            default_name: DEFAULT_GEOID_NAME.to_string(),
            interpolation: Interpolation::Cubic,
            extension: "pgm".to_string(),
        }
    }
}

impl GeoidConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("GEOID_DATA_DIR") {
            if !val.is_empty() {
                config.data_dir = PathBuf::from(val);
            }
        }

        if let Ok(val) = std::env::var("GEOID_NAME") {
            if !val.is_empty() {
                config.default_name = val;
            }
        }

        if let Ok(val) = std::env::var("GEOID_INTERPOLATION") {
            config.interpolation = Interpolation::from_str(&val);
        }

        config
    }

    /// Configuration rooted at `data_dir`, everything else default.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.default_name.trim().is_empty() {
            return Err(GeoidError::Config("default_name must not be empty".to_string()));
        }

        if self.extension.trim().is_empty() {
            return Err(GeoidError::Config("extension must not be empty".to_string()));
        }

        if self.extension.starts_with('.') {
            return Err(GeoidError::Config(
                "extension must not start with '.'".to_string(),
            ));
        }

        Ok(())
    }

    /// Path of the resource for grid `name`.
    pub fn resource_path(&self, name: &str) -> PathBuf {
        self.data_dir.join(format!("{}.{}", name, self.extension))
    }
}
