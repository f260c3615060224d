//! Shared test fixtures for integration and E2E CLI tests.
#![allow(dead_code)] // Each test binary uses a different subset

use std::path::Path;
use std::process::{Command, Output};
use std::rc::Rc;
use std::time::Duration;

use keyboard_ime::input::shift::DEFAULT_DOUBLE_TAP_TIMEOUT;
use keyboard_ime::input::{KeyOutcome, KeyboardSession, ManualClock, ShiftStateMachine};
use keyboard_ime::models::{KeyAction, KeyDefinition, KeyboardLayout, Language};
use keyboard_ime::services::{LayoutCatalog, LayoutRepository};
use tempfile::TempDir;

/// The built-in QWERTY layout.
pub fn qwerty() -> KeyboardLayout {
    LayoutCatalog::new().default_layout(Language::En)
}

/// The built-in Arabic layout.
pub fn arabic() -> KeyboardLayout {
    LayoutCatalog::new().default_layout(Language::Ar)
}

/// A session whose shift timing follows `clock`.
pub fn manual_session(clock: &Rc<ManualClock>) -> KeyboardSession<Rc<ManualClock>> {
    KeyboardSession::with_shift(
        ShiftStateMachine::with_clock(Rc::clone(clock), DEFAULT_DOUBLE_TAP_TIMEOUT),
        256,
    )
}

/// Finds a character key by its text.
pub fn key<'a>(layout: &'a KeyboardLayout, text: &str) -> &'a KeyDefinition {
    let position = layout
        .find_key(text)
        .unwrap_or_else(|| panic!("no key {text:?} in layout"));
    layout.key_at(position).unwrap()
}

/// Finds the first key with the given action.
pub fn special<'a>(layout: &'a KeyboardLayout, action: KeyAction) -> &'a KeyDefinition {
    layout
        .positions()
        .map(|(_, key)| key)
        .find(|key| key.action() == action)
        .unwrap_or_else(|| panic!("no {action:?} key in layout"))
}

/// Taps a key and then lets `gap` pass on the clock.
pub fn tap(
    session: &mut KeyboardSession<Rc<ManualClock>>,
    clock: &ManualClock,
    key: &KeyDefinition,
    gap: Duration,
) -> KeyOutcome {
    let outcome = session.on_key_tapped(key);
    clock.advance(gap);
    outcome
}

/// A JSON-file repository inside a fresh temp dir.
pub fn temp_repository() -> (TempDir, LayoutRepository) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let repository = LayoutRepository::open(&temp_dir.path().join("layouts.json"))
        .expect("Failed to open repository");
    (temp_dir, repository)
}

/// Path to the keyboard-ime binary
pub fn keyboard_ime_bin() -> &'static str {
    env!("CARGO_BIN_EXE_keyboard-ime")
}

/// Runs the binary against an isolated config directory.
pub fn run_cli(config_dir: &Path, args: &[&str]) -> Output {
    Command::new(keyboard_ime_bin())
        .env("KEYBOARD_IME_CONFIG_DIR", config_dir)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("Failed to execute command")
}

/// Stdout of a command as a string.
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Stderr of a command as a string.
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Asserts a zero exit status and returns stdout.
pub fn expect_success(output: &Output) -> String {
    assert_eq!(
        output.status.code(),
        Some(0),
        "command failed. stderr: {}",
        stderr(output)
    );
    stdout(output)
}
