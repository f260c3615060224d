//! Layout store backed by a single JSON file.
//!
//! The whole table is rewritten on every mutation. A mutation is applied to a
//! copy of the table first and only becomes visible once the file write
//! succeeds, so a failed write leaves both disk and memory unchanged.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::write_atomic;
use crate::models::{Language, LayoutId, NewLayout, SavedLayout};
use crate::storage::{LayoutStore, LayoutTable};

/// File-backed layout store.
#[derive(Debug, Clone)]
pub struct JsonFileLayoutStore {
    path: PathBuf,
    table: LayoutTable,
}

impl JsonFileLayoutStore {
    /// Opens the store at `path`, starting empty if the file does not exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let table = if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read layouts file: {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse layouts file: {}", path.display()))?
        } else {
            LayoutTable::default()
        };

        Ok(Self { path, table })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn commit<T>(&mut self, mutate: impl FnOnce(&mut LayoutTable) -> T) -> Result<T> {
        let mut next = self.table.clone();
        let result = mutate(&mut next);

        let content =
            serde_json::to_string_pretty(&next).context("Failed to serialize layouts")?;
        write_atomic(&self.path, content.as_bytes())?;

        self.table = next;
        Ok(result)
    }
}

impl LayoutStore for JsonFileLayoutStore {
    fn insert(&mut self, layout: NewLayout) -> Result<LayoutId> {
        self.commit(|table| table.insert(layout))
    }

    fn get(&self, id: LayoutId) -> Result<Option<SavedLayout>> {
        Ok(self.table.get(id).cloned())
    }

    fn update(&mut self, layout: SavedLayout) -> Result<bool> {
        if self.table.get(layout.id).is_none() {
            return Ok(false);
        }
        self.commit(|table| table.update(layout))
    }

    fn delete(&mut self, id: LayoutId) -> Result<bool> {
        if self.table.get(id).is_none() {
            return Ok(false);
        }
        self.commit(|table| table.delete(id))
    }

    fn list_by_language(&self, language: Language) -> Result<Vec<SavedLayout>> {
        Ok(self.table.by_language(language))
    }

    fn find_default(&self, language: Language) -> Result<Option<SavedLayout>> {
        Ok(self.table.find_default(language).cloned())
    }

    fn replace_default(&mut self, id: LayoutId, language: Language) -> Result<bool> {
        if !self.table.get(id).is_some_and(|l| l.language == language) {
            return Ok(false);
        }
        self.commit(|table| table.replace_default(id, language))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn new_layout(name: &str, language: Language) -> NewLayout {
        NewLayout::new(name, "[]".to_string(), language).unwrap()
    }

    #[test]
    fn test_open_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileLayoutStore::open(temp_dir.path().join("layouts.json")).unwrap();
        assert!(store.list_by_language(Language::En).unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_mutations_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data").join("layouts.json");

        let mut store = JsonFileLayoutStore::open(&path).unwrap();
        let a = store.insert(new_layout("a", Language::En)).unwrap();
        let b = store.insert(new_layout("b", Language::En)).unwrap();
        assert!(store.replace_default(a, Language::En).unwrap());
        assert!(store.delete(b).unwrap());

        let reopened = JsonFileLayoutStore::open(&path).unwrap();
        let layouts = reopened.list_by_language(Language::En).unwrap();
        assert_eq!(layouts.len(), 1);
        assert_eq!(layouts[0].id, a);
        assert!(layouts[0].is_default);

        let mut reopened = reopened;
        let c = reopened.insert(new_layout("c", Language::En)).unwrap();
        assert_eq!(c, LayoutId(3));
    }

    #[test]
    fn test_file_shape() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("layouts.json");
        let mut store = JsonFileLayoutStore::open(&path).unwrap();
        store.insert(new_layout("mine", Language::Ar)).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["nextId"], 2);
        assert_eq!(value["layouts"][0]["name"], "mine");
        assert_eq!(value["layouts"][0]["language"], "ar");
        assert_eq!(value["layouts"][0]["isDefault"], false);
    }

    #[test]
    fn test_corrupt_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("layouts.json");
        fs::write(&path, "{ nope").unwrap();
        assert!(JsonFileLayoutStore::open(&path).is_err());
    }

    #[test]
    fn test_failed_write_leaves_table_untouched() {
        let temp_dir = TempDir::new().unwrap();
        // A directory where the file should be makes the rename fail.
        let path = temp_dir.path().join("layouts.json");
        let mut store = JsonFileLayoutStore::open(&path).unwrap();
        fs::create_dir(&path).unwrap();
        fs::write(path.join("blocker"), "x").unwrap();

        assert!(store.insert(new_layout("a", Language::En)).is_err());
        assert!(store.list_by_language(Language::En).unwrap().is_empty());
    }

    #[test]
    fn test_noop_mutations_skip_the_write() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("layouts.json");
        let mut store = JsonFileLayoutStore::open(&path).unwrap();

        assert!(!store.delete(LayoutId(5)).unwrap());
        assert!(!store.replace_default(LayoutId(5), Language::En).unwrap());
        assert!(!path.exists());
    }
}
