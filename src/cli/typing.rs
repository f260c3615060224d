//! Headless typing on a layout.
//!
//! Feeds a sequence of key taps through a keyboard session bound to an
//! in-memory text field and prints what ended up in the field.

use clap::Args;
use serde::Serialize;

use crate::cli::common::{load_config, open_repository, print_json, CliError, CliResult};
use crate::input::{KeyOutcome, KeyboardSession, ShiftState, TextBuffer};
use crate::models::{KeyAction, KeyDefinition, KeyboardLayout, Language, LayoutId};
use crate::services::LayoutCatalog;

/// Type keys on a layout and print the resulting text
#[derive(Args, Debug)]
pub struct TypeArgs {
    /// Keys to tap: a key's text (case-insensitive), or shift, backspace, space, enter
    #[arg(required = true, value_name = "KEY")]
    keys: Vec<String>,

    /// Saved layout to type on (defaults to the built-in layout of the language)
    #[arg(long, value_name = "ID")]
    layout: Option<LayoutId>,

    /// Language of the built-in layout (en, ar)
    #[arg(long, short, default_value = "en")]
    language: Language,

    /// Text already in the field before typing
    #[arg(long, default_value = "")]
    initial: String,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct TypeOutput {
    text: String,
    shift: String,
}

impl TypeArgs {
    /// Execute type command
    pub fn execute(&self) -> CliResult<()> {
        let config = load_config()?;
        let catalog = LayoutCatalog::new();

        let layout = match self.layout {
            Some(id) => open_repository(&config, &catalog)?
                .load_keyboard_layout(id)
                .map_err(|e| CliError::io(format!("Failed to load layout: {e:#}")))?
                .ok_or_else(|| CliError::validation(format!("Layout {id} not found")))?,
            None => catalog.default_layout(self.language),
        };

        let keys = self
            .keys
            .iter()
            .map(|token| resolve_key(&layout, token))
            .collect::<CliResult<Vec<_>>>()?;

        let buffer = TextBuffer::with_text(&self.initial);
        let mut session = KeyboardSession::new(&config.input);
        session.start_input(Box::new(buffer.clone()));

        for key in keys {
            if let KeyOutcome::Ignored = session.on_key_tapped(key) {
                return Err(CliError::validation(format!(
                    "Key '{}' does nothing when tapped",
                    key.display
                )));
            }
        }

        let shift = session.shift_state();
        session.finish_input();

        let output = TypeOutput {
            text: buffer.contents(),
            shift: shift_name(shift).to_string(),
        };

        if self.json {
            return print_json(&output);
        }
        println!("{}", output.text);
        Ok(())
    }
}

fn shift_name(state: ShiftState) -> &'static str {
    match state {
        ShiftState::Off => "off",
        ShiftState::On => "on",
        ShiftState::CapsLock => "caps-lock",
    }
}

/// Finds the key a command-line token names.
fn resolve_key<'a>(layout: &'a KeyboardLayout, token: &str) -> CliResult<&'a KeyDefinition> {
    let action = match token.to_lowercase().as_str() {
        "shift" => Some(KeyAction::Shift),
        "backspace" => Some(KeyAction::Backspace),
        "space" => Some(KeyAction::Space),
        "enter" => Some(KeyAction::Enter),
        _ => None,
    };

    let found = match action {
        Some(action) => layout.positions().find(|(_, key)| key.action() == action),
        None => layout.positions().find(|(_, key)| {
            key.action() == KeyAction::Character
                && (key.text == token || key.text.to_lowercase() == token.to_lowercase())
        }),
    };

    found
        .map(|(_, key)| key)
        .ok_or_else(|| CliError::validation(format!("No key '{token}' on this layout")))
}
