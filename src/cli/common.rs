//! Shared CLI plumbing: error type, exit codes and store access.

use std::fmt;
use std::path::Path;

use crate::config::Config;
use crate::models::KeyboardLayout;
use crate::services::{LayoutCatalog, LayoutRepository, SettingsStore};

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Command succeeded
    Success = 0,
    /// Bad input or a missing entity
    ValidationError = 1,
    /// Filesystem or serialization failure
    IoError = 2,
}

/// Category of a CLI failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorKind {
    /// The request was invalid
    Validation,
    /// Reading or writing state failed
    Io,
}

/// Error reported to the user before exiting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliError {
    /// Failure category, decides the exit code
    pub kind: CliErrorKind,
    /// Human readable message
    pub message: String,
}

impl CliError {
    /// Invalid input.
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: CliErrorKind::Validation,
            message: message.into(),
        }
    }

    /// Storage failure.
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            kind: CliErrorKind::Io,
            message: message.into(),
        }
    }

    /// Exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> ExitCode {
        match self.kind {
            CliErrorKind::Validation => ExitCode::ValidationError,
            CliErrorKind::Io => ExitCode::IoError,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result of a CLI command.
pub type CliResult<T> = Result<T, CliError>;

/// Loads the application config.
pub fn load_config() -> CliResult<Config> {
    Config::load().map_err(|e| CliError::validation(format!("Failed to load configuration: {e:#}")))
}

/// Opens the saved-layout repository.
///
/// A store created by this call is seeded with the catalog defaults.
pub fn open_repository(config: &Config, catalog: &LayoutCatalog) -> CliResult<LayoutRepository> {
    let path = config
        .layouts_file_path()
        .map_err(|e| CliError::io(format!("Failed to locate layouts file: {e:#}")))?;
    let fresh = !path.exists();

    let repository = LayoutRepository::open(&path)
        .map_err(|e| CliError::io(format!("Failed to open layouts: {e:#}")))?;

    if fresh {
        repository
            .seed_defaults(catalog)
            .map_err(|e| CliError::io(format!("Failed to seed default layouts: {e:#}")))?;
    }

    Ok(repository)
}

/// Opens the settings store.
pub fn open_settings(config: &Config) -> CliResult<SettingsStore> {
    let path = config
        .settings_file_path()
        .map_err(|e| CliError::io(format!("Failed to locate settings file: {e:#}")))?;
    SettingsStore::open(path).map_err(|e| CliError::io(format!("Failed to open settings: {e:#}")))
}

/// Reads a layout grid from a JSON file in the saved-layout format.
pub fn read_layout_file(path: &Path) -> CliResult<KeyboardLayout> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| CliError::io(format!("Failed to read {}: {e}", path.display())))?;
    crate::parser::decode_layout(&content)
        .map_err(|e| CliError::validation(format!("Invalid layout file {}: {e:#}", path.display())))
}

/// Prints a layout as rows of key labels in logical order.
pub fn print_grid(layout: &KeyboardLayout) {
    for (index, row) in layout.rows.iter().enumerate() {
        let labels: Vec<&str> = row.iter().map(|key| key.display.as_str()).collect();
        println!("{index}: {}", labels.join(" "));
    }
}

/// Prints a value as pretty JSON.
pub fn print_json<T: serde::Serialize>(value: &T) -> CliResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?;
    println!("{json}");
    Ok(())
}
