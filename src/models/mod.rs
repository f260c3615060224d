//! Data models for keys, layouts, saved layouts and settings.
//!
//! Models are independent of the input session and of storage.

pub mod key;
pub mod language;
pub mod layout;
pub mod rgb;
pub mod saved_layout;
pub mod settings;

// Re-export all model types
pub use key::{
    KeyAction, KeyDefinition, KeyPosition, Position, KEYCODE_BACKSPACE, KEYCODE_ENTER,
    KEYCODE_SHIFT, KEYCODE_SPACE,
};
pub use language::Language;
pub use layout::{KeyboardLayout, LayoutSource};
pub use rgb::RgbColor;
pub use saved_layout::{LayoutId, NewLayout, SavedLayout};
pub use settings::{GenericFontFamily, KeyboardSettings};
