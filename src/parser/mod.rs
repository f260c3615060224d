//! Parsing and serialization of persisted formats.
//!
//! Saved layouts are stored as JSON rows of positioned keys.

pub mod layout_json;

// Re-export commonly used functions
pub use layout_json::{decode_layout, decode_positions, encode_positions};
