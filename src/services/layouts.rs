//! Saved layout repository.
//!
//! This module is the single entry point for creating, reading, renaming,
//! deleting and choosing default layouts. It serializes rows through
//! [`crate::parser::layout_json`] and delegates record keeping to a
//! [`LayoutStore`].

use anyhow::{anyhow, Result};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::models::{
    saved_layout::validate_name, KeyPosition, KeyboardLayout, Language, LayoutId, NewLayout,
    SavedLayout,
};
use crate::parser::layout_json;
use crate::services::catalog::LayoutCatalog;
use crate::storage::{JsonFileLayoutStore, LayoutStore, MemoryLayoutStore};

/// Rows of positioned keys, the shape layouts are saved and loaded in.
pub type LayoutRows = Vec<Vec<KeyPosition>>;

/// Repository of saved layouts.
///
/// The repository is `Send + Sync`; share it behind an `Arc` between the
/// interaction thread and a [`crate::services::LayoutWriter`].
///
/// Every successful mutation bumps a revision counter that observers can
/// follow through [`LayoutRepository::subscribe`].
pub struct LayoutRepository {
    store: Mutex<Box<dyn LayoutStore>>,
    revision: watch::Sender<u64>,
}

impl std::fmt::Debug for LayoutRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutRepository")
            .field("revision", &*self.revision.borrow())
            .finish_non_exhaustive()
    }
}

impl LayoutRepository {
    /// Creates a repository over any store.
    pub fn new(store: impl LayoutStore + 'static) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            store: Mutex::new(Box::new(store)),
            revision,
        }
    }

    /// Creates a repository that keeps layouts in memory only.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryLayoutStore::new())
    }

    /// Opens a repository backed by a JSON file.
    ///
    /// # Arguments
    ///
    /// * `path` - Location of `layouts.json`; created on first write
    ///
    /// # Returns
    ///
    /// * `Ok(LayoutRepository)` - Store opened (empty if the file is missing)
    /// * `Err(...)` - The file exists but cannot be read or parsed
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::path::Path;
    /// use keyboard_ime::services::LayoutRepository;
    ///
    /// let repository = LayoutRepository::open(Path::new("layouts.json"))?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::new(JsonFileLayoutStore::open(path)?))
    }

    fn store(&self) -> Result<MutexGuard<'_, Box<dyn LayoutStore>>> {
        self.store
            .lock()
            .map_err(|_| anyhow!("Layout store lock poisoned"))
    }

    fn bump(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }

    /// Saves rows as a new named layout.
    ///
    /// Saving never deduplicates: the same name and rows saved twice produce
    /// two records. New layouts are never the default.
    ///
    /// # Arguments
    ///
    /// * `name` - Display name (non-empty, at most 100 characters)
    /// * `rows` - The layout in persisted form
    /// * `language` - Language the layout belongs to
    ///
    /// # Returns
    ///
    /// * `Ok(LayoutId)` - Identifier of the new record
    /// * `Err(...)` - Invalid name, serialization or store failure
    ///
    /// # Examples
    ///
    /// ```
    /// use keyboard_ime::models::Language;
    /// use keyboard_ime::services::{LayoutCatalog, LayoutRepository};
    ///
    /// let repository = LayoutRepository::in_memory();
    /// let rows = LayoutCatalog::new().default_layout(Language::En).to_positions();
    /// let id = repository.save_layout("Mine", &rows, Language::En)?;
    /// assert_eq!(repository.load_layout(id)?, Some(rows));
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    pub fn save_layout(
        &self,
        name: &str,
        rows: &[Vec<KeyPosition>],
        language: Language,
    ) -> Result<LayoutId> {
        let layout_json = layout_json::encode_positions(rows)?;
        let record = NewLayout::new(name, layout_json, language)?;

        let id = self.store()?.insert(record)?;
        info!("Saved layout {} '{}' ({})", id, name, language);
        self.bump();
        Ok(id)
    }

    /// Loads the rows of a saved layout.
    ///
    /// Returns `Ok(None)` when the id is unknown or the stored rows cannot be
    /// decoded; the latter is logged.
    pub fn load_layout(&self, id: LayoutId) -> Result<Option<LayoutRows>> {
        let record = self.store()?.get(id)?;
        Ok(record.and_then(|record| decode_record(&record)))
    }

    /// Loads a saved layout as a key grid.
    pub fn load_keyboard_layout(&self, id: LayoutId) -> Result<Option<KeyboardLayout>> {
        Ok(self
            .load_layout(id)?
            .map(|rows| KeyboardLayout::from_positions(&rows)))
    }

    /// Full record of a saved layout.
    pub fn get_layout(&self, id: LayoutId) -> Result<Option<SavedLayout>> {
        self.store()?.get(id)
    }

    /// Deletes a layout. Unknown ids are ignored.
    pub fn delete_layout(&self, id: LayoutId) -> Result<bool> {
        let deleted = self.store()?.delete(id)?;
        if deleted {
            info!("Deleted layout {}", id);
            self.bump();
        }
        Ok(deleted)
    }

    /// Renames a layout and refreshes its update time.
    ///
    /// Unknown ids are ignored (`Ok(false)`); an invalid name is an error.
    pub fn rename_layout(&self, id: LayoutId, name: &str) -> Result<bool> {
        validate_name(name)?;

        let mut store = self.store()?;
        let Some(mut record) = store.get(id)? else {
            return Ok(false);
        };

        record.name = name.to_string();
        record.touch();
        let updated = store.update(record)?;
        drop(store);

        if updated {
            info!("Renamed layout {} to '{}'", id, name);
            self.bump();
        }
        Ok(updated)
    }

    /// Makes a layout the default for a language.
    ///
    /// Any previous default of that language loses the flag in the same
    /// store operation, so two defaults are never observable. Unknown ids and
    /// ids of another language are ignored (`Ok(false)`).
    pub fn set_default_layout(&self, id: LayoutId, language: Language) -> Result<bool> {
        let replaced = self.store()?.replace_default(id, language)?;
        if replaced {
            info!("Layout {} is now the {} default", id, language);
            self.bump();
        } else {
            warn!("Layout {} is not a saved {} layout, default unchanged", id, language);
        }
        Ok(replaced)
    }

    /// Rows of the current default for a language.
    pub fn get_default_layout(&self, language: Language) -> Result<Option<LayoutRows>> {
        let record = self.store()?.find_default(language)?;
        Ok(record.and_then(|record| decode_record(&record)))
    }

    /// Record of the current default for a language.
    pub fn default_record(&self, language: Language) -> Result<Option<SavedLayout>> {
        self.store()?.find_default(language)
    }

    /// Saved layouts of a language, most recently updated first.
    pub fn layouts_by_language(&self, language: Language) -> Result<Vec<SavedLayout>> {
        self.store()?.list_by_language(language)
    }

    /// Inserts the catalog default of every language that has no saved layout
    /// yet, flagged as that language's default.
    ///
    /// Running it again is a no-op. Returns the ids it created.
    pub fn seed_defaults(&self, catalog: &LayoutCatalog) -> Result<Vec<LayoutId>> {
        let mut created = Vec::new();
        let mut store = self.store()?;

        for language in Language::ALL {
            if !store.list_by_language(language)?.is_empty() {
                continue;
            }

            let rows = catalog.default_layout(language).to_positions();
            let mut record = NewLayout::new(
                LayoutCatalog::default_name(language),
                layout_json::encode_positions(&rows)?,
                language,
            )?;
            record.is_default = true;

            let id = store.insert(record)?;
            info!("Seeded default {} layout as {}", language, id);
            created.push(id);
        }
        drop(store);

        if !created.is_empty() {
            self.bump();
        }
        Ok(created)
    }

    /// Follows the revision counter, bumped after every successful mutation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Current revision.
    #[must_use]
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }
}

fn decode_record(record: &SavedLayout) -> Option<LayoutRows> {
    match layout_json::decode_positions(&record.layout_json) {
        Ok(rows) => Some(rows),
        Err(e) => {
            warn!("Layout {} '{}' is corrupt: {:#}", record.id, record.name, e);
            None
        }
    }
}
