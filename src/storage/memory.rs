//! In-memory layout store.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

use crate::models::{Language, LayoutId, NewLayout, SavedLayout};
use crate::storage::LayoutStore;

/// Table of layout records plus the id counter.
///
/// This is also the on-disk shape of [`crate::storage::JsonFileLayoutStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutTable {
    /// Next identifier to hand out (ids are never reused)
    pub next_id: u64,
    /// Records in insertion order
    pub layouts: Vec<SavedLayout>,
}

impl Default for LayoutTable {
    fn default() -> Self {
        Self {
            next_id: 1,
            layouts: Vec::new(),
        }
    }
}

impl LayoutTable {
    /// Inserts a record and returns its id.
    pub fn insert(&mut self, layout: NewLayout) -> LayoutId {
        let highest = self.layouts.iter().map(|l| l.id.0).max().unwrap_or(0);
        let id = LayoutId(self.next_id.max(highest + 1));
        self.next_id = id.0 + 1;
        self.layouts.push(layout.into_saved(id));
        id
    }

    /// Looks up a record.
    #[must_use]
    pub fn get(&self, id: LayoutId) -> Option<&SavedLayout> {
        self.layouts.iter().find(|l| l.id == id)
    }

    /// Replaces a record with the same id.
    pub fn update(&mut self, layout: SavedLayout) -> bool {
        match self.layouts.iter_mut().find(|l| l.id == layout.id) {
            Some(slot) => {
                *slot = layout;
                true
            }
            None => false,
        }
    }

    /// Removes a record.
    pub fn delete(&mut self, id: LayoutId) -> bool {
        let before = self.layouts.len();
        self.layouts.retain(|l| l.id != id);
        self.layouts.len() != before
    }

    /// Records of a language, most recently updated first (ties: newest id first).
    #[must_use]
    pub fn by_language(&self, language: Language) -> Vec<SavedLayout> {
        let mut found: Vec<SavedLayout> = self
            .layouts
            .iter()
            .filter(|l| l.language == language)
            .cloned()
            .collect();
        found.sort_by_key(|l| (Reverse(l.updated_at), Reverse(l.id)));
        found
    }

    /// Default record of a language.
    #[must_use]
    pub fn find_default(&self, language: Language) -> Option<&SavedLayout> {
        self.layouts
            .iter()
            .find(|l| l.language == language && l.is_default)
    }

    /// Moves the default flag of `language` to `id`.
    pub fn replace_default(&mut self, id: LayoutId, language: Language) -> bool {
        if !self.get(id).is_some_and(|l| l.language == language) {
            return false;
        }

        for layout in self.layouts.iter_mut().filter(|l| l.language == language) {
            if layout.id == id {
                layout.is_default = true;
                layout.touch();
            } else {
                layout.is_default = false;
            }
        }
        true
    }
}

/// Layout store that lives only as long as the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryLayoutStore {
    table: LayoutTable,
}

impl MemoryLayoutStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing table.
    #[must_use]
    pub const fn from_table(table: LayoutTable) -> Self {
        Self { table }
    }
}

impl LayoutStore for MemoryLayoutStore {
    fn insert(&mut self, layout: NewLayout) -> Result<LayoutId> {
        Ok(self.table.insert(layout))
    }

    fn get(&self, id: LayoutId) -> Result<Option<SavedLayout>> {
        Ok(self.table.get(id).cloned())
    }

    fn update(&mut self, layout: SavedLayout) -> Result<bool> {
        Ok(self.table.update(layout))
    }

    fn delete(&mut self, id: LayoutId) -> Result<bool> {
        Ok(self.table.delete(id))
    }

    fn list_by_language(&self, language: Language) -> Result<Vec<SavedLayout>> {
        Ok(self.table.by_language(language))
    }

    fn find_default(&self, language: Language) -> Result<Option<SavedLayout>> {
        Ok(self.table.find_default(language).cloned())
    }

    fn replace_default(&mut self, id: LayoutId, language: Language) -> Result<bool> {
        Ok(self.table.replace_default(id, language))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn new_layout(name: &str, language: Language) -> NewLayout {
        NewLayout::new(name, "[]".to_string(), language).unwrap()
    }

    #[test]
    fn test_ids_are_never_reused() {
        let mut table = LayoutTable::default();
        let a = table.insert(new_layout("a", Language::En));
        let b = table.insert(new_layout("b", Language::En));
        assert!(table.delete(b));
        let c = table.insert(new_layout("c", Language::En));
        assert_eq!(a, LayoutId(1));
        assert_eq!(b, LayoutId(2));
        assert_eq!(c, LayoutId(3));
    }

    #[test]
    fn test_by_language_orders_by_update_time() {
        let mut table = LayoutTable::default();
        let base = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();

        for name in ["old", "new", "mid"] {
            let mut layout = new_layout(name, Language::En);
            layout.created_at = base;
            table.insert(layout);
        }
        table.layouts[0].updated_at = base;
        table.layouts[1].updated_at = base + Duration::hours(2);
        table.layouts[2].updated_at = base + Duration::hours(1);
        table.insert(new_layout("arabic", Language::Ar));

        let names: Vec<_> = table
            .by_language(Language::En)
            .into_iter()
            .map(|l| l.name)
            .collect();
        assert_eq!(names, vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_by_language_ties_break_on_newest_id() {
        let mut table = LayoutTable::default();
        let at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        for name in ["first", "second"] {
            let mut layout = new_layout(name, Language::En);
            layout.created_at = at;
            table.insert(layout);
        }
        let names: Vec<_> = table
            .by_language(Language::En)
            .into_iter()
            .map(|l| l.name)
            .collect();
        assert_eq!(names, vec!["second", "first"]);
    }

    #[test]
    fn test_replace_default_keeps_one_per_language() {
        let mut table = LayoutTable::default();
        let a = table.insert(new_layout("a", Language::En));
        let b = table.insert(new_layout("b", Language::En));
        let ar = table.insert(new_layout("ar", Language::Ar));

        assert!(table.replace_default(a, Language::En));
        assert!(table.replace_default(ar, Language::Ar));
        assert!(table.replace_default(b, Language::En));

        let defaults: Vec<_> = table.layouts.iter().filter(|l| l.is_default).map(|l| l.id).collect();
        assert_eq!(defaults, vec![b, ar]);
    }

    #[test]
    fn test_replace_default_rejects_unknown_or_foreign_id() {
        let mut table = LayoutTable::default();
        let en = table.insert(new_layout("en", Language::En));
        assert!(table.replace_default(en, Language::En));
        let snapshot = table.clone();

        assert!(!table.replace_default(LayoutId(99), Language::En));
        assert!(!table.replace_default(en, Language::Ar));
        assert_eq!(table, snapshot);
    }
}
