//! Persisted keyboard settings with change notification.
//!
//! Settings live in a small TOML file. Readers take cheap snapshots from a
//! `tokio::sync::watch` channel; writers persist first and publish after, so
//! a subscriber never sees a value that failed to save.

use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::config::write_atomic;
use crate::models::settings::{
    clamp_font_size, clamp_height, normalize_color, INPUT_FIELD_FONT_SIZE_RANGE,
    KEYBOARD_FONT_SIZE_RANGE,
};
use crate::models::{KeyboardSettings, Language};

/// Store for [`KeyboardSettings`].
#[derive(Debug)]
pub struct SettingsStore {
    path: Option<PathBuf>,
    sender: watch::Sender<KeyboardSettings>,
    write_lock: Mutex<()>,
}

impl SettingsStore {
    /// Opens the settings file.
    ///
    /// A missing file yields defaults. A file that cannot be parsed is logged
    /// and replaced by defaults on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let settings = if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
            match toml::from_str::<KeyboardSettings>(&content) {
                Ok(settings) => settings.sanitized(),
                Err(e) => {
                    warn!("Ignoring unreadable settings file {}: {}", path.display(), e);
                    KeyboardSettings::default()
                }
            }
        } else {
            KeyboardSettings::default()
        };

        Ok(Self::with_settings(Some(path), settings))
    }

    /// Creates a store that never touches disk.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::with_settings(None, KeyboardSettings::default())
    }

    fn with_settings(path: Option<PathBuf>, settings: KeyboardSettings) -> Self {
        let (sender, _) = watch::channel(settings);
        Self {
            path,
            sender,
            write_lock: Mutex::new(()),
        }
    }

    /// Backing file, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Snapshot of the current settings.
    #[must_use]
    pub fn current(&self) -> KeyboardSettings {
        self.sender.borrow().clone()
    }

    /// Receiver that observes every saved change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<KeyboardSettings> {
        self.sender.subscribe()
    }

    /// Applies `edit` to a copy of the settings, saves and publishes it.
    ///
    /// If `edit` or the save fails nothing changes.
    pub fn update<F>(&self, edit: F) -> Result<KeyboardSettings>
    where
        F: FnOnce(&mut KeyboardSettings) -> Result<()>,
    {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| anyhow!("Settings lock poisoned"))?;

        let mut next = self.current();
        edit(&mut next)?;

        if let Some(path) = &self.path {
            let content =
                toml::to_string_pretty(&next).context("Failed to serialize settings")?;
            write_atomic(path, content.as_bytes())?;
        }

        self.sender.send_replace(next.clone());
        Ok(next)
    }

    /// Sets the key label font size, clamped to 16..=64. Returns the stored value.
    pub fn update_keyboard_font_size(&self, size: u32) -> Result<u32> {
        let size = clamp_font_size(size, &KEYBOARD_FONT_SIZE_RANGE);
        self.update(|s| {
            s.keyboard_font_size_sp = size;
            Ok(())
        })?;
        info!("Keyboard font size set to {}sp", size);
        Ok(size)
    }

    /// Sets the preview font size, clamped to 16..=56. Returns the stored value.
    pub fn update_input_field_font_size(&self, size: u32) -> Result<u32> {
        let size = clamp_font_size(size, &INPUT_FIELD_FONT_SIZE_RANGE);
        self.update(|s| {
            s.input_field_font_size_sp = size;
            Ok(())
        })?;
        info!("Input field font size set to {}sp", size);
        Ok(size)
    }

    /// Sets the font family. Unknown names are kept and render with the
    /// platform default font.
    pub fn update_font_family(&self, family: &str) -> Result<()> {
        let family = family.trim();
        if family.is_empty() {
            anyhow::bail!("Font family cannot be empty");
        }
        self.update(|s| {
            s.font_family = family.to_string();
            Ok(())
        })?;
        info!("Font family set to {}", family);
        Ok(())
    }

    /// Sets the key text color.
    pub fn update_text_color(&self, color: &str) -> Result<()> {
        let color = normalize_color(color)?;
        self.update(|s| {
            s.text_color = color;
            Ok(())
        })?;
        Ok(())
    }

    /// Sets the keyboard background color.
    pub fn update_background_color(&self, color: &str) -> Result<()> {
        let color = normalize_color(color)?;
        self.update(|s| {
            s.background_color = color;
            Ok(())
        })?;
        Ok(())
    }

    /// Sets the key border color.
    pub fn update_border_color(&self, color: &str) -> Result<()> {
        let color = normalize_color(color)?;
        self.update(|s| {
            s.border_color = color;
            Ok(())
        })?;
        Ok(())
    }

    /// Toggles bold key labels.
    pub fn update_bold(&self, is_bold: bool) -> Result<()> {
        self.update(|s| {
            s.is_bold = is_bold;
            Ok(())
        })?;
        Ok(())
    }

    /// Switches the keyboard language.
    pub fn update_language(&self, language: Language) -> Result<()> {
        self.update(|s| {
            s.language = language;
            Ok(())
        })?;
        info!("Keyboard language set to {}", language);
        Ok(())
    }

    /// Sets the keyboard height, clamped to 150..=400 dp. Returns the stored value.
    pub fn update_keyboard_height(&self, height_dp: f32) -> Result<f32> {
        let height = clamp_height(height_dp);
        self.update(|s| {
            s.keyboard_height_dp = height;
            Ok(())
        })?;
        Ok(height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let store = SettingsStore::open(temp_dir.path().join("settings.toml")).unwrap();
        assert_eq!(store.current(), KeyboardSettings::default());
    }

    #[test]
    fn test_updates_persist() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.toml");

        let store = SettingsStore::open(&path).unwrap();
        store.update_keyboard_font_size(40).unwrap();
        store.update_text_color("#f00").unwrap();
        store.update_bold(true).unwrap();
        store.update_language(Language::Ar).unwrap();

        let reopened = SettingsStore::open(&path).unwrap().current();
        assert_eq!(reopened.keyboard_font_size_sp, 40);
        assert_eq!(reopened.text_color, "#FF0000");
        assert!(reopened.is_bold);
        assert_eq!(reopened.language, Language::Ar);
    }

    #[test]
    fn test_sizes_are_clamped() {
        let store = SettingsStore::in_memory();
        assert_eq!(store.update_keyboard_font_size(100).unwrap(), 64);
        assert_eq!(store.update_keyboard_font_size(2).unwrap(), 16);
        assert_eq!(store.update_input_field_font_size(60).unwrap(), 56);
        assert!((store.update_keyboard_height(1000.0).unwrap() - 400.0).abs() < f32::EPSILON);
        assert!((store.update_keyboard_height(10.0).unwrap() - 150.0).abs() < f32::EPSILON);
        assert_eq!(store.current().keyboard_font_size_sp, 16);
    }

    #[test]
    fn test_invalid_color_is_rejected() {
        let store = SettingsStore::in_memory();
        assert!(store.update_background_color("blue").is_err());
        assert!(store.update_border_color("#12345").is_err());
        assert_eq!(store.current().background_color, "#F0F0F0");
    }

    #[test]
    fn test_empty_font_family_is_rejected() {
        let store = SettingsStore::in_memory();
        assert!(store.update_font_family("  ").is_err());
        store.update_font_family("Courier New").unwrap();
        assert_eq!(store.current().font_family, "Courier New");
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.toml");
        fs::write(&path, "keyboard_font_size_sp = \"big\"").unwrap();

        let store = SettingsStore::open(&path).unwrap();
        assert_eq!(store.current(), KeyboardSettings::default());
    }

    #[test]
    fn test_out_of_range_file_values_are_sanitized() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.toml");
        fs::write(&path, "keyboard_font_size_sp = 200\ntext_color = \"nope\"\n").unwrap();

        let settings = SettingsStore::open(&path).unwrap().current();
        assert_eq!(settings.keyboard_font_size_sp, 64);
        assert_eq!(settings.text_color, "#000000");
        assert_eq!(settings.input_field_font_size_sp, 28);
    }

    #[test]
    fn test_failed_edit_changes_nothing() {
        let store = SettingsStore::in_memory();
        let receiver = store.subscribe();
        let result = store.update(|s| {
            s.is_bold = true;
            anyhow::bail!("rejected")
        });
        assert!(result.is_err());
        assert!(!store.current().is_bold);
        assert!(!receiver.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let store = SettingsStore::in_memory();
        let mut receiver = store.subscribe();

        store.update_keyboard_height(300.0).unwrap();

        receiver.changed().await.unwrap();
        assert!((receiver.borrow().keyboard_height_dp - 300.0).abs() < f32::EPSILON);
    }
}
