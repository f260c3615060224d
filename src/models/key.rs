//! Key definitions, key codes and grid positions.

use serde::{Deserialize, Serialize};

/// Reserved key code for the Shift key.
pub const KEYCODE_SHIFT: i32 = -1;
/// Reserved key code for the Backspace key.
pub const KEYCODE_BACKSPACE: i32 = -2;
/// Reserved key code for the Space key.
pub const KEYCODE_SPACE: i32 = -3;
/// Reserved key code for the Enter key.
pub const KEYCODE_ENTER: i32 = -4;

/// Position in the key grid (zero-based row and column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// Row index, 0 = top row
    pub row: usize,
    /// Column index within the row
    pub col: usize,
}

impl Position {
    /// Creates a new Position with the given row and column.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// What a key does when tapped, decoded from its key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Cycles the shift state
    Shift,
    /// Deletes one character before the cursor
    Backspace,
    /// Inserts a space
    Space,
    /// Inserts a newline
    Enter,
    /// Commits the key's text (non-negative code)
    Character,
    /// Negative code with no assigned meaning
    Unknown(i32),
}

impl KeyAction {
    /// Decodes a key code.
    ///
    /// Non-negative codes are literal characters; the four reserved negative
    /// codes map to their special keys.
    #[must_use]
    pub const fn from_code(code: i32) -> Self {
        match code {
            KEYCODE_SHIFT => Self::Shift,
            KEYCODE_BACKSPACE => Self::Backspace,
            KEYCODE_SPACE => Self::Space,
            KEYCODE_ENTER => Self::Enter,
            c if c >= 0 => Self::Character,
            c => Self::Unknown(c),
        }
    }
}

/// A single key on the keyboard.
///
/// `text` is what gets committed; `display` is what the renderer draws
/// (e.g. "Space" for the space bar). Width is a relative weight within the row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyDefinition {
    /// Committed text
    pub text: String,
    /// Key code (see [`KeyAction::from_code`])
    pub code: i32,
    /// Relative width weight
    pub width: f32,
    /// Special (non-character) key flag
    pub is_special: bool,
    /// Label shown on the key
    pub display: String,
}

impl KeyDefinition {
    /// Creates a character key whose code is the code point of its first char.
    pub fn character(text: impl Into<String>) -> Self {
        let text = text.into();
        let code = text.chars().next().map_or(0, |c| c as i32);
        Self::with_code(text, code)
    }

    /// Creates a regular key with an explicit code and weight 1.0.
    pub fn with_code(text: impl Into<String>, code: i32) -> Self {
        let text = text.into();
        Self {
            display: text.clone(),
            text,
            code,
            width: 1.0,
            is_special: false,
        }
    }

    /// Creates a special key (Shift, Backspace, Space, Enter).
    pub fn special(text: impl Into<String>, code: i32, width: f32) -> Self {
        Self {
            width,
            is_special: true,
            ..Self::with_code(text, code)
        }
    }

    /// Sets the label shown on the key.
    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = display.into();
        self
    }

    /// Decodes this key's code.
    #[must_use]
    pub const fn action(&self) -> KeyAction {
        KeyAction::from_code(self.code)
    }
}

/// A key annotated with explicit grid coordinates, as stored on disk.
///
/// Field names follow the persisted layout format, so renaming them breaks
/// previously saved layouts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyPosition {
    /// Committed text
    #[serde(rename = "char")]
    pub text: String,
    /// Row index
    pub row: usize,
    /// Column index
    pub col: usize,
    /// Relative width weight
    #[serde(default = "default_weight")]
    pub width: f32,
    /// Relative height weight
    #[serde(default = "default_weight")]
    pub height: f32,
    /// Key code
    #[serde(default)]
    pub key_code: i32,
    /// Special key flag
    #[serde(default)]
    pub is_special_key: bool,
    /// Label; `None` when absent from the stored record
    #[serde(default, rename = "displayChar")]
    pub display: Option<String>,
}

const fn default_weight() -> f32 {
    1.0
}

impl KeyPosition {
    /// Annotates a key with its position.
    #[must_use]
    pub fn from_key(key: &KeyDefinition, position: Position) -> Self {
        Self {
            text: key.text.clone(),
            row: position.row,
            col: position.col,
            width: key.width,
            height: default_weight(),
            key_code: key.code,
            is_special_key: key.is_special,
            display: Some(key.display.clone()),
        }
    }

    /// Label to draw: the stored one, or the text when none was stored.
    #[must_use]
    pub fn label(&self) -> &str {
        self.display.as_deref().unwrap_or(&self.text)
    }

    /// Strips the coordinates.
    #[must_use]
    pub fn to_key(&self) -> KeyDefinition {
        KeyDefinition {
            text: self.text.clone(),
            code: self.key_code,
            width: self.width,
            is_special: self.is_special_key,
            display: self.label().to_string(),
        }
    }

    /// Grid position of this key.
    #[must_use]
    pub const fn position(&self) -> Position {
        Position::new(self.row, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_action_from_code() {
        assert_eq!(KeyAction::from_code(KEYCODE_SHIFT), KeyAction::Shift);
        assert_eq!(KeyAction::from_code(KEYCODE_BACKSPACE), KeyAction::Backspace);
        assert_eq!(KeyAction::from_code(KEYCODE_SPACE), KeyAction::Space);
        assert_eq!(KeyAction::from_code(KEYCODE_ENTER), KeyAction::Enter);
        assert_eq!(KeyAction::from_code(97), KeyAction::Character);
        assert_eq!(KeyAction::from_code(0), KeyAction::Character);
        assert_eq!(KeyAction::from_code(-9), KeyAction::Unknown(-9));
    }

    #[test]
    fn test_character_key_uses_code_point() {
        let key = KeyDefinition::character("a");
        assert_eq!(key.code, 97);
        assert_eq!(key.display, "a");
        assert!(!key.is_special);

        let key = KeyDefinition::character("ض");
        assert_eq!(key.code, 'ض' as i32);
    }

    #[test]
    fn test_special_key_builder() {
        let key = KeyDefinition::special(" ", KEYCODE_SPACE, 8.0).with_display("Space");
        assert!(key.is_special);
        assert_eq!(key.text, " ");
        assert_eq!(key.display, "Space");
        assert_eq!(key.action(), KeyAction::Space);
    }

    #[test]
    fn test_key_position_fills_missing_display() {
        let stored = KeyPosition {
            text: "Q".to_string(),
            row: 0,
            col: 0,
            width: 1.0,
            height: 1.0,
            key_code: 81,
            is_special_key: false,
            display: None,
        };
        assert_eq!(stored.label(), "Q");
        assert_eq!(stored.to_key().display, "Q");
    }

    #[test]
    fn test_key_position_keeps_empty_label() {
        let key = KeyDefinition::character("Q").with_display("");
        let pos = KeyPosition::from_key(&key, Position::new(0, 0));
        assert_eq!(pos.display.as_deref(), Some(""));
        assert_eq!(pos.label(), "");
        assert_eq!(pos.to_key(), key);
    }

    #[test]
    fn test_key_position_round_trip_preserves_fields() {
        let key = KeyDefinition::special("\n", KEYCODE_ENTER, 2.0).with_display("↵");
        let pos = KeyPosition::from_key(&key, Position::new(3, 1));
        assert_eq!(pos.position(), Position::new(3, 1));
        assert_eq!(pos.to_key(), key);
    }
}
