//! Service layer for business logic.
//!
//! Services coordinate models, the layout codec and storage: the default
//! layout catalog, the layout editor, the saved-layout repository and its
//! background writer, and the settings store.

pub mod catalog;
pub mod editor;
pub mod layout_writer;
pub mod layouts;
pub mod settings;

// Re-export commonly used types
pub use catalog::LayoutCatalog;
pub use editor::LayoutEditor;
pub use layout_writer::{LayoutWriter, Receipt};
pub use layouts::{LayoutRepository, LayoutRows};
pub use settings::SettingsStore;
