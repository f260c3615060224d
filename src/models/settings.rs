//! User-facing keyboard appearance settings.

use crate::models::language::Language;
use crate::models::rgb::RgbColor;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Allowed keyboard key font sizes (sp).
pub const KEYBOARD_FONT_SIZE_RANGE: RangeInclusive<u32> = 16..=64;
/// Allowed input preview font sizes (sp).
pub const INPUT_FIELD_FONT_SIZE_RANGE: RangeInclusive<u32> = 16..=56;
/// Allowed keyboard heights (dp).
pub const KEYBOARD_HEIGHT_RANGE: RangeInclusive<f32> = 150.0..=400.0;

/// Font families offered by the font picker.
pub const FONT_FAMILIES: [&str; 4] = ["Roboto", "Arial", "Noto Sans Arabic", "Courier New"];

/// Generic family a configured font name resolves to when rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenericFontFamily {
    /// Platform default face
    Default,
    /// Sans-serif face
    SansSerif,
    /// Monospace face
    Monospace,
}

impl GenericFontFamily {
    /// Maps a configured font name to a generic family.
    #[must_use]
    pub fn for_name(name: &str) -> Self {
        match name {
            "Roboto" | "Arial" | "Noto Sans Arabic" => Self::SansSerif,
            "Courier New" => Self::Monospace,
            _ => Self::Default,
        }
    }
}

/// Persisted appearance preferences.
///
/// Missing fields in a stored file take their defaults, so older settings
/// files keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardSettings {
    /// Key label font size (sp)
    pub keyboard_font_size_sp: u32,
    /// Input preview font size (sp)
    pub input_field_font_size_sp: u32,
    /// Font family name
    pub font_family: String,
    /// Text color as "#RRGGBB"
    pub text_color: String,
    /// Background color as "#RRGGBB"
    pub background_color: String,
    /// Key border color as "#RRGGBB"
    pub border_color: String,
    /// Bold key labels
    pub is_bold: bool,
    /// Active keyboard language
    pub language: Language,
    /// Keyboard height (dp)
    pub keyboard_height_dp: f32,
}

impl Default for KeyboardSettings {
    fn default() -> Self {
        Self {
            keyboard_font_size_sp: 32,
            input_field_font_size_sp: 28,
            font_family: "Roboto".to_string(),
            text_color: "#000000".to_string(),
            background_color: "#F0F0F0".to_string(),
            border_color: "#CCCCCC".to_string(),
            is_bold: false,
            language: Language::En,
            keyboard_height_dp: 250.0,
        }
    }
}

impl KeyboardSettings {
    /// Font family resolved for rendering.
    #[must_use]
    pub fn generic_font_family(&self) -> GenericFontFamily {
        GenericFontFamily::for_name(&self.font_family)
    }

    /// Parsed text color.
    pub fn text_rgb(&self) -> Result<RgbColor> {
        RgbColor::from_hex(&self.text_color)
    }

    /// Parsed background color.
    pub fn background_rgb(&self) -> Result<RgbColor> {
        RgbColor::from_hex(&self.background_color)
    }

    /// Parsed border color.
    pub fn border_rgb(&self) -> Result<RgbColor> {
        RgbColor::from_hex(&self.border_color)
    }

    /// Brings every field back into its allowed range.
    ///
    /// Sizes and height are clamped; a color that does not parse is reset to
    /// its default; colors are normalized to uppercase "#RRGGBB".
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        self.keyboard_font_size_sp = clamp_font_size(self.keyboard_font_size_sp, &KEYBOARD_FONT_SIZE_RANGE);
        self.input_field_font_size_sp =
            clamp_font_size(self.input_field_font_size_sp, &INPUT_FIELD_FONT_SIZE_RANGE);
        self.keyboard_height_dp = clamp_height(self.keyboard_height_dp);
        self.text_color = normalize_color(&self.text_color).unwrap_or(defaults.text_color);
        self.background_color =
            normalize_color(&self.background_color).unwrap_or(defaults.background_color);
        self.border_color = normalize_color(&self.border_color).unwrap_or(defaults.border_color);
        if self.font_family.trim().is_empty() {
            self.font_family = defaults.font_family;
        }
        self
    }
}

/// Clamps a font size into the given range.
#[must_use]
pub fn clamp_font_size(size: u32, range: &RangeInclusive<u32>) -> u32 {
    size.clamp(*range.start(), *range.end())
}

/// Clamps a keyboard height; NaN falls back to the default height.
#[must_use]
pub fn clamp_height(height: f32) -> f32 {
    if height.is_nan() {
        return KeyboardSettings::default().keyboard_height_dp;
    }
    height.clamp(*KEYBOARD_HEIGHT_RANGE.start(), *KEYBOARD_HEIGHT_RANGE.end())
}

/// Parses and re-formats a color as uppercase "#RRGGBB".
pub fn normalize_color(color: &str) -> Result<String> {
    Ok(RgbColor::from_hex(color)?.to_hex())
}
