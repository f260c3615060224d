//! Textual layout format used for saved layouts.
//!
//! A layout is stored as a JSON array of rows, each row an array of key
//! records:
//!
//! ```json
//! [[{"char":"Q","row":0,"col":0,"width":1.0,"height":1.0,
//!    "keyCode":81,"isSpecialKey":false,"displayChar":"Q"}]]
//! ```
//!
//! Decoding tolerates unknown fields and fills missing optional ones, so
//! layouts saved by older versions keep loading.

use anyhow::{Context, Result};

use crate::models::{KeyPosition, KeyboardLayout};

/// Serializes rows of positioned keys.
pub fn encode_positions(rows: &[Vec<KeyPosition>]) -> Result<String> {
    serde_json::to_string(rows).context("Failed to serialize layout")
}

/// Parses rows of positioned keys.
pub fn decode_positions(json: &str) -> Result<Vec<Vec<KeyPosition>>> {
    serde_json::from_str(json).context("Failed to parse layout JSON")
}

/// Parses a layout.
pub fn decode_layout(json: &str) -> Result<KeyboardLayout> {
    Ok(KeyboardLayout::from_positions(&decode_positions(json)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{KeyDefinition, Position, KEYCODE_SPACE};

    #[test]
    fn test_encode_uses_stable_field_names() {
        let layout = KeyboardLayout::new(vec![vec![
            KeyDefinition::special(" ", KEYCODE_SPACE, 8.0).with_display("Space"),
        ]]);
        let json = encode_positions(&layout.to_positions()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let key = &value[0][0];

        assert_eq!(key["char"], " ");
        assert_eq!(key["row"], 0);
        assert_eq!(key["col"], 0);
        assert_eq!(key["width"], 8.0);
        assert_eq!(key["height"], 1.0);
        assert_eq!(key["keyCode"], -3);
        assert_eq!(key["isSpecialKey"], true);
        assert_eq!(key["displayChar"], "Space");
    }

    #[test]
    fn test_decode_minimal_legacy_record() {
        let rows = decode_positions(r#"[[{"char":"Q","row":0,"col":0}]]"#).unwrap();
        let key = &rows[0][0];
        assert_eq!(key.text, "Q");
        assert_eq!(key.position(), Position::new(0, 0));
        assert!((key.width - 1.0).abs() < f32::EPSILON);
        assert!((key.height - 1.0).abs() < f32::EPSILON);
        assert_eq!(key.key_code, 0);
        assert!(!key.is_special_key);
        assert_eq!(key.display, None);
        assert_eq!(key.label(), "Q");
    }

    #[test]
    fn test_decode_keeps_explicit_empty_label() {
        let rows = decode_positions(r#"[[{"char":"Q","row":0,"col":0,"displayChar":""}]]"#)
            .unwrap();
        assert_eq!(rows[0][0].display.as_deref(), Some(""));
        assert_eq!(rows[0][0].to_key().display, "");
    }

    #[test]
    fn test_decode_ignores_unknown_fields() {
        let rows =
            decode_positions(r#"[[{"char":"A","row":0,"col":0,"keyCode":65,"color":"red"}]]"#)
                .unwrap();
        assert_eq!(rows[0][0].key_code, 65);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_positions("not json").is_err());
        assert!(decode_positions(r#"{"rows":[]}"#).is_err());
        assert!(decode_positions(r#"[[{"row":0,"col":0}]]"#).is_err());
    }

    #[test]
    fn test_decode_empty_layout() {
        assert!(decode_positions("[]").unwrap().is_empty());
    }
}
