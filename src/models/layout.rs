//! Keyboard layout grid and layout source.

use crate::models::key::{KeyDefinition, KeyPosition, Position};
use crate::models::language::Language;
use crate::models::saved_layout::LayoutId;
use serde::{Deserialize, Serialize};

/// Where the layout currently shown came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayoutSource {
    /// Canonical default for a language
    Default(Language),
    /// A layout saved by the user
    Saved(LayoutId),
}

/// Ordered rows of keys.
///
/// Row order and order within a row are significant: the visual position of a
/// key is its logical position. Rows may have different lengths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct KeyboardLayout {
    /// Rows from top to bottom
    pub rows: Vec<Vec<KeyDefinition>>,
}

impl KeyboardLayout {
    /// Creates a layout from rows.
    #[must_use]
    pub const fn new(rows: Vec<Vec<KeyDefinition>>) -> Self {
        Self { rows }
    }

    /// Number of rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Total number of keys across all rows.
    #[must_use]
    pub fn key_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// Whether a position addresses an existing key.
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        self.rows
            .get(position.row)
            .is_some_and(|row| position.col < row.len())
    }

    /// Gets the key at the given position.
    #[must_use]
    pub fn key_at(&self, position: Position) -> Option<&KeyDefinition> {
        self.rows.get(position.row)?.get(position.col)
    }

    /// Finds the first key (in reading order) whose committed text matches.
    #[must_use]
    pub fn find_key(&self, text: &str) -> Option<Position> {
        self.positions()
            .find(|(_, key)| key.text == text)
            .map(|(pos, _)| pos)
    }

    /// Iterates keys with their positions in reading order.
    pub fn positions(&self) -> impl Iterator<Item = (Position, &KeyDefinition)> {
        self.rows.iter().enumerate().flat_map(|(row, keys)| {
            keys.iter()
                .enumerate()
                .map(move |(col, key)| (Position::new(row, col), key))
        })
    }

    /// Swaps the keys at two positions.
    ///
    /// Both positions are checked before anything is touched; returns `false`
    /// and leaves the layout unchanged if either is out of bounds.
    pub fn swap(&mut self, a: Position, b: Position) -> bool {
        if !self.contains(a) || !self.contains(b) {
            return false;
        }
        if a == b {
            return true;
        }
        if a.row == b.row {
            self.rows[a.row].swap(a.col, b.col);
        } else {
            let first = self.rows[a.row][a.col].clone();
            let second = std::mem::replace(&mut self.rows[b.row][b.col], first);
            self.rows[a.row][a.col] = second;
        }
        true
    }

    /// Converts to the persisted form with explicit coordinates.
    #[must_use]
    pub fn to_positions(&self) -> Vec<Vec<KeyPosition>> {
        self.rows
            .iter()
            .enumerate()
            .map(|(row, keys)| {
                keys.iter()
                    .enumerate()
                    .map(|(col, key)| KeyPosition::from_key(key, Position::new(row, col)))
                    .collect()
            })
            .collect()
    }

    /// Rebuilds a layout from the persisted form.
    ///
    /// Rows and keys keep their stored order; the stored coordinates are
    /// informational and do not reorder anything.
    #[must_use]
    pub fn from_positions(rows: &[Vec<KeyPosition>]) -> Self {
        Self {
            rows: rows
                .iter()
                .map(|row| row.iter().map(KeyPosition::to_key).collect())
                .collect(),
        }
    }
}
