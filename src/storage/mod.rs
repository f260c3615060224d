//! Record stores for saved layouts.
//!
//! A store keeps [`SavedLayout`] records keyed by an identifier it assigns.
//! It knows nothing about the layout format inside `layout_json`; decoding
//! is the repository's job.

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileLayoutStore;
pub use memory::{LayoutTable, MemoryLayoutStore};

use anyhow::Result;

use crate::models::{Language, LayoutId, NewLayout, SavedLayout};

/// Storage backend for saved layouts.
pub trait LayoutStore: Send {
    /// Inserts a record and returns its new identifier.
    fn insert(&mut self, layout: NewLayout) -> Result<LayoutId>;

    /// Fetches a record.
    fn get(&self, id: LayoutId) -> Result<Option<SavedLayout>>;

    /// Replaces the record with the same id. Returns `false` if none exists.
    fn update(&mut self, layout: SavedLayout) -> Result<bool>;

    /// Removes a record. Returns `false` if none existed.
    fn delete(&mut self, id: LayoutId) -> Result<bool>;

    /// All records of a language, most recently updated first.
    fn list_by_language(&self, language: Language) -> Result<Vec<SavedLayout>>;

    /// The record flagged default for a language.
    fn find_default(&self, language: Language) -> Result<Option<SavedLayout>>;

    /// Clears the default flag on every record of `language`, then sets it on
    /// `id`, as one atomic change.
    ///
    /// Returns `false` without changing anything if `id` does not exist or
    /// belongs to another language.
    fn replace_default(&mut self, id: LayoutId, language: Language) -> Result<bool>;
}
