//! CLI command handlers for keyboard-ime.
//!
//! This module provides headless, scriptable access to saved layouts, keyboard
//! settings and the typing path, for automation and testing.

pub mod common;
pub mod layouts;
pub mod settings;
pub mod typing;

// Re-export types used by main.rs and tests
pub use common::{CliError, CliErrorKind, CliResult, ExitCode};
pub use layouts::LayoutsArgs;
pub use settings::SettingsArgs;
pub use typing::TypeArgs;
