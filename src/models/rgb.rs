//! RGB color handling for keyboard appearance settings.

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// RGB color value with hex string representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RgbColor {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

/// Preset swatches offered by the color picker, with their labels.
pub const PALETTE: [(RgbColor, &str); 8] = [
    (RgbColor::new(0x00, 0x00, 0x00), "Black"),
    (RgbColor::new(0xFF, 0xFF, 0xFF), "White"),
    (RgbColor::new(0xFF, 0x00, 0x00), "Red"),
    (RgbColor::new(0x00, 0xFF, 0x00), "Green"),
    (RgbColor::new(0x00, 0x00, 0xFF), "Blue"),
    (RgbColor::new(0xFF, 0xFF, 0x00), "Yellow"),
    (RgbColor::new(0xF0, 0xF0, 0xF0), "Light Gray"),
    (RgbColor::new(0xCC, 0xCC, 0xCC), "Medium Gray"),
];

impl RgbColor {
    /// Creates a new `RgbColor` from individual channel values.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses a hex color.
    ///
    /// Accepts "#RRGGBB", "RRGGBB" and the short "#RGB" form, which is
    /// expanded digit by digit.
    ///
    /// # Examples
    ///
    /// ```
    /// use keyboard_ime::models::RgbColor;
    ///
    /// assert_eq!(RgbColor::from_hex("#F0F0F0").unwrap(), RgbColor::new(240, 240, 240));
    /// assert_eq!(RgbColor::from_hex("#fc0").unwrap(), RgbColor::new(255, 204, 0));
    /// ```
    pub fn from_hex(hex: &str) -> Result<Self> {
        let trimmed = hex.trim();
        let pattern = Regex::new(r"^#?([0-9A-Fa-f]{6}|[0-9A-Fa-f]{3})$")
            .context("Failed to create hex color regex")?;
        let caps = pattern.captures(trimmed).with_context(|| {
            format!("Invalid hex color format '{trimmed}'. Expected #RRGGBB or #RGB")
        })?;
        let digits = &caps[1];

        let expanded = if digits.len() == 3 {
            digits.chars().flat_map(|c| [c, c]).collect::<String>()
        } else {
            digits.to_string()
        };

        let channel = |range: std::ops::Range<usize>, name: &str| {
            u8::from_str_radix(&expanded[range], 16)
                .with_context(|| format!("Invalid {name} channel in hex color '{trimmed}'"))
        };

        Ok(Self::new(
            channel(0..2, "red")?,
            channel(2..4, "green")?,
            channel(4..6, "blue")?,
        ))
    }

    /// Converts the color to "#RRGGBB" (uppercase).
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Label of the matching palette swatch, if any.
    #[must_use]
    pub fn palette_name(&self) -> Option<&'static str> {
        PALETTE
            .iter()
            .find(|(color, _)| color == self)
            .map(|(_, name)| *name)
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
