//! Keyboard IME Library
//!
//! Core of an on-screen keyboard: the shift/caps-lock state machine, case
//! mapping, key layouts and their drag-to-rearrange editor, saved layouts per
//! language, the bridge that commits text to the host field, and persisted
//! appearance settings.

// Module declarations
pub mod cli;
pub mod config;
pub mod constants;
pub mod input;
pub mod models;
pub mod parser;
pub mod services;
pub mod storage;
