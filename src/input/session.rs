//! Key-tap dispatch for one input session.

use crate::config::InputConfig;
use crate::input::case::map_case;
use crate::input::composer::{InputConnection, PreviewText, TextComposer};
use crate::input::shift::{Clock, MonotonicClock, ShiftState, ShiftStateMachine};
use crate::models::{KeyAction, KeyDefinition};
use tracing::debug;

/// What a key tap did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Shift key cycled to the given state
    ShiftChanged(ShiftState),
    /// Text was committed (already case-mapped)
    Committed(String),
    /// One character before the cursor was deleted
    Deleted,
    /// Tap had no effect (edit mode, or a key code with no meaning)
    Ignored,
}

/// Routes taps to the shift machine, the case mapper and the composer, and
/// keeps the preview in step.
#[derive(Debug)]
pub struct KeyboardSession<C: Clock = MonotonicClock> {
    shift: ShiftStateMachine<C>,
    composer: TextComposer,
    preview: PreviewText,
    preview_window: usize,
    edit_mode: bool,
}

impl KeyboardSession<MonotonicClock> {
    /// Creates a session using the configured shift timeout.
    #[must_use]
    pub fn new(config: &InputConfig) -> Self {
        Self::with_shift(
            ShiftStateMachine::with_clock(MonotonicClock::new(), config.double_tap_timeout()),
            config.preview_window,
        )
    }
}

impl<C: Clock> KeyboardSession<C> {
    /// Creates a session around an existing shift machine.
    pub fn with_shift(shift: ShiftStateMachine<C>, preview_window: usize) -> Self {
        Self {
            shift,
            composer: TextComposer::new(),
            preview: PreviewText::new(),
            preview_window,
            edit_mode: false,
        }
    }

    /// Binds the host connection for a new input session.
    ///
    /// Shift starts Off. The preview adopts whatever the host already holds
    /// before the cursor.
    pub fn start_input(&mut self, connection: Box<dyn InputConnection>) {
        self.shift.reset();
        self.composer.attach(connection);
        self.preview.clear();
        self.preview.refresh_from(&self.composer, self.preview_window);
    }

    /// Flushes composition and releases the host connection.
    pub fn finish_input(&mut self) {
        self.composer.finish_composing_text();
        self.composer.detach();
    }

    /// While in edit mode taps rearrange keys instead of typing.
    pub fn set_edit_mode(&mut self, edit_mode: bool) {
        self.edit_mode = edit_mode;
    }

    /// Current shift state.
    #[must_use]
    pub const fn shift_state(&self) -> ShiftState {
        self.shift.state()
    }

    /// Whether letters are currently uppercased.
    #[must_use]
    pub fn is_shift_active(&self) -> bool {
        self.shift.is_active()
    }

    /// Text shown in the preview field.
    #[must_use]
    pub fn preview(&self) -> &str {
        self.preview.as_str()
    }

    /// Label the renderer should draw for a key under the current shift state.
    #[must_use]
    pub fn key_label(&self, key: &KeyDefinition) -> String {
        let mut chars = key.text.chars();
        let single_letter = matches!((chars.next(), chars.next()), (Some(c), None) if c.is_alphabetic());
        if key.action() == KeyAction::Character && single_letter {
            map_case(&key.text, self.shift.state())
        } else {
            key.display.clone()
        }
    }

    /// Handles a tap on a key.
    pub fn on_key_tapped(&mut self, key: &KeyDefinition) -> KeyOutcome {
        if self.edit_mode {
            return KeyOutcome::Ignored;
        }

        debug!(display = %key.display, code = key.code, "key pressed");

        match key.action() {
            KeyAction::Shift => KeyOutcome::ShiftChanged(self.shift.on_shift_tapped()),
            KeyAction::Backspace => {
                self.composer.delete_character();
                self.preview.pop();
                self.sync_preview();
                KeyOutcome::Deleted
            }
            KeyAction::Space => {
                self.composer.insert_space();
                self.preview.push_str(" ");
                self.sync_preview();
                KeyOutcome::Committed(" ".to_string())
            }
            KeyAction::Enter => {
                self.composer.insert_new_line();
                self.preview.push_str("\n");
                self.sync_preview();
                KeyOutcome::Committed("\n".to_string())
            }
            KeyAction::Character => {
                let text = map_case(&key.text, self.shift.state());
                self.composer.insert_character(&text);
                self.preview.push_str(&text);
                self.sync_preview();
                if text.chars().any(char::is_alphabetic) {
                    self.shift.on_character_typed();
                }
                KeyOutcome::Committed(text)
            }
            KeyAction::Unknown(code) => {
                debug!(code, "ignoring key with unassigned code");
                KeyOutcome::Ignored
            }
        }
    }

    fn sync_preview(&mut self) {
        self.preview.refresh_from(&self.composer, self.preview_window);
    }
}
