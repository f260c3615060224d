//! End-to-end tests for `keyboard-ime settings` commands.

use tempfile::TempDir;

mod fixtures;
use fixtures::*;

fn show_json(dir: &TempDir) -> serde_json::Value {
    let stdout = expect_success(&run_cli(dir.path(), &["settings", "show", "--json"]));
    serde_json::from_str(&stdout).expect("Should parse JSON output")
}

#[test]
fn test_show_defaults_without_settings_file() {
    let dir = TempDir::new().unwrap();
    let settings = show_json(&dir);

    assert_eq!(settings["keyboard_font_size_sp"], 32);
    assert_eq!(settings["input_field_font_size_sp"], 28);
    assert_eq!(settings["font_family"], "Roboto");
    assert_eq!(settings["background_color"], "#F0F0F0");
    assert_eq!(settings["is_bold"], false);
    assert_eq!(settings["language"], "en");
    assert!(!dir.path().join("settings.toml").exists());
}

#[test]
fn test_font_size_is_clamped_and_persisted() {
    let dir = TempDir::new().unwrap();

    let output = run_cli(dir.path(), &["settings", "set", "keyboard-font-size", "200"]);
    assert_eq!(expect_success(&output).trim(), "keyboard_font_size_sp = 64");

    let output = run_cli(dir.path(), &["settings", "set", "input-field-font-size", "3"]);
    assert_eq!(expect_success(&output).trim(), "input_field_font_size_sp = 16");

    let settings = show_json(&dir);
    assert_eq!(settings["keyboard_font_size_sp"], 64);
    assert_eq!(settings["input_field_font_size_sp"], 16);
    assert!(dir.path().join("settings.toml").exists());
}

#[test]
fn test_colors_are_normalized() {
    let dir = TempDir::new().unwrap();

    let output = run_cli(dir.path(), &["settings", "set", "text-color", "#ff8800"]);
    assert_eq!(expect_success(&output).trim(), "text_color = #FF8800");

    assert_eq!(show_json(&dir)["text_color"], "#FF8800");
}

#[test]
fn test_invalid_values_are_rejected() {
    let dir = TempDir::new().unwrap();

    for (key, value) in [
        ("border-color", "not-a-color"),
        ("keyboard-font-size", "large"),
        ("bold", "maybe"),
        ("language", "fr"),
        ("keyboard-height", "tall"),
    ] {
        let output = run_cli(dir.path(), &["settings", "set", key, value]);
        assert_eq!(output.status.code(), Some(1), "{key} = {value}");
    }

    // Nothing was written.
    assert!(!dir.path().join("settings.toml").exists());
}

#[test]
fn test_language_and_bold() {
    let dir = TempDir::new().unwrap();

    expect_success(&run_cli(dir.path(), &["settings", "set", "language", "AR"]));
    expect_success(&run_cli(dir.path(), &["settings", "set", "bold", "yes"]));

    let settings = show_json(&dir);
    assert_eq!(settings["language"], "ar");
    assert_eq!(settings["is_bold"], true);
}

#[test]
fn test_corrupt_settings_file_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("settings.toml"), "keyboard_font_size_sp = [").unwrap();

    let settings = show_json(&dir);
    assert_eq!(settings["keyboard_font_size_sp"], 32);
}

#[test]
fn test_show_human_readable() {
    let dir = TempDir::new().unwrap();
    let stdout = expect_success(&run_cli(dir.path(), &["settings", "show"]));
    assert!(stdout.contains("Keyboard Settings"));
    assert!(stdout.contains("Roboto"));
    assert!(stdout.contains("250dp"));
    assert!(stdout.contains("Roboto, Arial, Noto Sans Arabic, Courier New"));
    assert!(stdout.contains("#F0F0F0 (Light Gray)"));
}
