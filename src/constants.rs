//! Application-wide constants.

/// Directory name under the platform config dir.
pub const CONFIG_DIR_NAME: &str = "KeyboardIme";

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "KEYBOARD_IME_CONFIG_DIR";
