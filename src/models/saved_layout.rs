//! Persisted layout records.

use crate::models::language::Language;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier assigned by the layout store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayoutId(pub u64);

impl fmt::Display for LayoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for LayoutId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let id = s
            .trim()
            .parse::<u64>()
            .map_err(|_| anyhow::anyhow!("Invalid layout id '{s}'"))?;
        Ok(Self(id))
    }
}

/// A named layout as stored.
///
/// `layout_json` holds the serialized rows (see [`crate::parser::layout_json`]).
///
/// # Validation
///
/// - name must be non-empty, max 100 characters
/// - at most one record per language has `is_default` set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedLayout {
    /// Store-assigned identifier
    pub id: LayoutId,
    /// User-chosen name (not unique)
    pub name: String,
    /// Serialized rows
    pub layout_json: String,
    /// Language this layout belongs to
    pub language: Language,
    /// Default flag for its language
    #[serde(default)]
    pub is_default: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// Fields of a layout about to be inserted; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLayout {
    /// User-chosen name
    pub name: String,
    /// Serialized rows
    pub layout_json: String,
    /// Language
    pub language: Language,
    /// Default flag
    pub is_default: bool,
    /// Timestamp used for both created and updated
    pub created_at: DateTime<Utc>,
}

impl NewLayout {
    /// Builds a non-default record stamped now.
    pub fn new(name: impl Into<String>, layout_json: String, language: Language) -> Result<Self> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Self {
            name,
            layout_json,
            language,
            is_default: false,
            created_at: Utc::now(),
        })
    }

    /// Attaches the store-assigned id.
    #[must_use]
    pub fn into_saved(self, id: LayoutId) -> SavedLayout {
        SavedLayout {
            id,
            name: self.name,
            layout_json: self.layout_json,
            language: self.language,
            is_default: self.is_default,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

impl SavedLayout {
    /// Updates the modification timestamp to now.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now().max(self.updated_at);
    }
}

/// Validates a layout name.
pub fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        anyhow::bail!("Layout name cannot be empty");
    }

    let len = name.chars().count();
    if len > 100 {
        anyhow::bail!("Layout name exceeds maximum length of 100 characters (got {len})");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_layout_is_not_default() {
        let new = NewLayout::new("Mine", "[]".to_string(), Language::En).unwrap();
        assert!(!new.is_default);
        let saved = new.into_saved(LayoutId(7));
        assert_eq!(saved.id, LayoutId(7));
        assert_eq!(saved.created_at, saved.updated_at);
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Big keys").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"x".repeat(101)).is_err());
    }

    #[test]
    fn test_layout_id_parse() {
        assert_eq!("42".parse::<LayoutId>().unwrap(), LayoutId(42));
        assert!("abc".parse::<LayoutId>().is_err());
    }

    #[test]
    fn test_saved_layout_field_names() {
        let saved = NewLayout::new("A", "[]".to_string(), Language::Ar)
            .unwrap()
            .into_saved(LayoutId(1));
        let value = serde_json::to_value(&saved).unwrap();
        assert!(value.get("layoutJson").is_some());
        assert!(value.get("isDefault").is_some());
        assert!(value.get("updatedAt").is_some());
        assert_eq!(value["language"], "ar");
    }

    #[test]
    fn test_touch_never_moves_backwards() {
        let mut saved = NewLayout::new("A", "[]".to_string(), Language::En)
            .unwrap()
            .into_saved(LayoutId(1));
        let before = saved.updated_at;
        saved.touch();
        assert!(saved.updated_at >= before);
    }
}
