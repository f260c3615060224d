//! Configuration management for the application.
//!
//! This module handles loading, validating, and saving application configuration
//! in TOML format with platform-specific directory resolution.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{CONFIG_DIR_ENV, CONFIG_DIR_NAME};

/// Path configuration for file system locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PathConfig {
    /// Directory holding `layouts.json` and `settings.toml` (defaults to the config dir)
    pub data_dir: Option<PathBuf>,
}

/// Typing behaviour configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Window for a double tap on Shift to engage caps lock, in milliseconds
    #[serde(default = "default_double_tap_timeout_ms")]
    pub double_tap_timeout_ms: u64,
    /// Characters read back from the host to refresh the preview
    #[serde(default = "default_preview_window")]
    pub preview_window: usize,
}

const fn default_double_tap_timeout_ms() -> u64 {
    500
}

const fn default_preview_window() -> usize {
    256
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            double_tap_timeout_ms: default_double_tap_timeout_ms(),
            preview_window: default_preview_window(),
        }
    }
}

impl InputConfig {
    /// Double-tap window as a duration.
    #[must_use]
    pub const fn double_tap_timeout(&self) -> Duration {
        Duration::from_millis(self.double_tap_timeout_ms)
    }
}

/// Application configuration.
///
/// # File Location
///
/// - Linux: `~/.config/KeyboardIme/config.toml`
/// - macOS: `~/Library/Application Support/KeyboardIme/config.toml`
/// - Windows: `%APPDATA%\KeyboardIme\config.toml`
///
/// `KEYBOARD_IME_CONFIG_DIR` overrides the directory.
///
/// # Validation
///
/// - `double_tap_timeout_ms` must be between 50 and 5000
/// - `preview_window` must be non-zero
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// File system paths
    #[serde(default)]
    pub paths: PathConfig,
    /// Typing behaviour
    #[serde(default)]
    pub input: InputConfig,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the config directory path.
    ///
    /// Uses `KEYBOARD_IME_CONFIG_DIR` when set, else the platform config dir.
    pub fn config_dir() -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join(CONFIG_DIR_NAME);

        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Directory holding persisted layouts and settings.
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.paths.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Self::config_dir(),
        }
    }

    /// Path of the saved-layouts file.
    pub fn layouts_file_path(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join("layouts.json"))
    }

    /// Path of the appearance settings file.
    pub fn settings_file_path(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join("settings.toml"))
    }

    /// Loads configuration from the config file.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Loads configuration from a specific file.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(config_path).context(format!(
            "Failed to read config file: {}",
            config_path.display()
        ))?;

        let config: Self = toml::from_str(&content).context(format!(
            "Failed to parse config file: {}",
            config_path.display()
        ))?;

        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to a specific file (temp file + rename).
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        self.validate()?;

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        write_atomic(config_path, content.as_bytes())
    }

    /// Validates configuration values.
    pub fn validate(&self) -> Result<()> {
        let timeout = self.input.double_tap_timeout_ms;
        if !(50..=5000).contains(&timeout) {
            anyhow::bail!("double_tap_timeout_ms must be between 50 and 5000 (got {timeout})");
        }

        if self.input.preview_window == 0 {
            anyhow::bail!("preview_window must be greater than zero");
        }

        Ok(())
    }
}

/// Writes a file through a sibling temp file and an atomic rename.
///
/// Creates the parent directory when missing.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).context(format!(
                "Failed to create directory: {}",
                parent.display()
            ))?;
        }
    }

    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    fs::write(&temp_path, content).context(format!(
        "Failed to write temp file: {}",
        temp_path.display()
    ))?;

    fs::rename(&temp_path, path).context(format!(
        "Failed to rename temp file to: {}",
        path.display()
    ))?;

    Ok(())
}
