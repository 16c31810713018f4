use std::path::Path;

use anyhow::{Context, Result};
use fs_err as fs;
use serde::{Deserialize, Serialize};

/// File name looked up by [`ConverterConfig::find`] and written by [`ConverterConfig::save`].
pub const CONFIG_FILE_NAME: &str = "rclr.toml";

/// Feature flags controlling which conversions run.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct ConverterConfig {
    /// Master switch. When false every scalar and vector converter declines and
    /// values pass through unchanged.
    pub convert_vectors: bool,
    /// Gates the timestamp and duration converters only.
    pub convert_value_types: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            convert_vectors: true,
            convert_value_types: true,
        }
    }
}

impl ConverterConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Writes `rclr.toml` into `directory`.
    pub fn save(&self, directory: impl AsRef<Path>) -> Result<()> {
        let config_path = directory.as_ref().join(CONFIG_FILE_NAME);
        let content = toml::to_string_pretty(&self)?;
        fs::write(&config_path, content)?;
        log::info!("Converter configuration saved to {}", config_path.display());
        Ok(())
    }

    /// Looks for `rclr.toml` in `directory`. `None` if there is no such file.
    pub fn find(directory: impl AsRef<Path>) -> Option<Result<Self>> {
        let config_path = directory.as_ref().join(CONFIG_FILE_NAME);
        log::debug!("Looking for converter config at {}", config_path.display());
        if config_path.is_file() {
            Some(Self::load(&config_path))
        } else {
            log::debug!("No converter config found at {}", config_path.display());
            None
        }
    }
}
