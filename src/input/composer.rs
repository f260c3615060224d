//! Text composition bridge to the host's input connection.
//!
//! The composer forwards single edits to whatever text field currently has
//! focus. While no connection is attached (between input sessions) every
//! operation is a no-op.

use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

/// Edits the host text field on behalf of the keyboard.
///
/// Mirrors the host platform's input connection; only the calls the keyboard
/// needs are modelled. Each method reports whether the host accepted the call.
pub trait InputConnection {
    /// Commits `text` and places the cursor relative to it (1 = after).
    fn commit_text(&mut self, text: &str, cursor_offset: i32) -> bool;

    /// Deletes characters around the cursor.
    fn delete_surrounding_text(&mut self, before: usize, after: usize) -> bool;

    /// Returns up to `length` characters before the cursor, if the host can tell.
    fn text_before_cursor(&self, length: usize) -> Option<String>;

    /// Flushes any pending composing region.
    fn finish_composing_text(&mut self) -> bool;
}

/// Forwards resolved key presses to the attached connection.
#[derive(Default)]
pub struct TextComposer {
    connection: Option<Box<dyn InputConnection>>,
}

impl std::fmt::Debug for TextComposer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextComposer")
            .field("attached", &self.is_attached())
            .finish()
    }
}

impl TextComposer {
    /// Creates a composer without a connection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a composer bound to a connection.
    pub fn with_connection(connection: Box<dyn InputConnection>) -> Self {
        Self {
            connection: Some(connection),
        }
    }

    /// Binds a new connection, replacing the previous one.
    pub fn attach(&mut self, connection: Box<dyn InputConnection>) {
        self.connection = Some(connection);
    }

    /// Drops the current connection and returns it.
    pub fn detach(&mut self) -> Option<Box<dyn InputConnection>> {
        self.connection.take()
    }

    /// Whether a connection is attached.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.connection.is_some()
    }

    /// Commits text with the cursor placed after it.
    pub fn insert_character(&mut self, text: &str) -> bool {
        debug!(text, "insert character");
        self.connection
            .as_mut()
            .is_some_and(|conn| conn.commit_text(text, 1))
    }

    /// Commits a space.
    pub fn insert_space(&mut self) -> bool {
        self.insert_character(" ")
    }

    /// Commits a newline.
    pub fn insert_new_line(&mut self) -> bool {
        self.insert_character("\n")
    }

    /// Deletes one character before the cursor.
    pub fn delete_character(&mut self) -> bool {
        debug!("delete character");
        self.connection
            .as_mut()
            .is_some_and(|conn| conn.delete_surrounding_text(1, 0))
    }

    /// Flushes the host's composing region.
    pub fn finish_composing_text(&mut self) -> bool {
        self.connection
            .as_mut()
            .is_some_and(|conn| conn.finish_composing_text())
    }

    /// Reads up to `length` characters before the host cursor.
    #[must_use]
    pub fn text_before_cursor(&self, length: usize) -> Option<String> {
        self.connection.as_ref()?.text_before_cursor(length)
    }
}

/// Local mirror of the text being typed, shown above the keyboard.
///
/// After each edit the mirror asks the host for the text before its cursor and
/// adopts it; when the host cannot answer, the edit is applied at the end of
/// the mirror instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewText {
    text: String,
}

impl PreviewText {
    /// Creates an empty preview.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current preview text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Appends committed text.
    pub fn push_str(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// Removes the last character.
    pub fn pop(&mut self) {
        self.text.pop();
    }

    /// Clears the preview.
    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Replaces the mirror with the host's text before the cursor.
    ///
    /// Returns `false` (and keeps the locally applied edit) when the host
    /// gives no answer.
    pub fn refresh_from(&mut self, composer: &TextComposer, window: usize) -> bool {
        match composer.text_before_cursor(window) {
            Some(host_text) => {
                self.text = host_text;
                true
            }
            None => false,
        }
    }
}

/// In-memory text field with the cursor fixed at the end.
///
/// Clones share the same text, so a caller can keep a handle while the
/// session owns the boxed connection.
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    text: Rc<RefCell<String>>,
}

impl TextBuffer {
    /// Creates a field holding `text`.
    #[must_use]
    pub fn with_text(text: &str) -> Self {
        Self {
            text: Rc::new(RefCell::new(text.to_string())),
        }
    }

    /// Current field contents.
    #[must_use]
    pub fn contents(&self) -> String {
        self.text.borrow().clone()
    }
}

impl InputConnection for TextBuffer {
    fn commit_text(&mut self, text: &str, _cursor_offset: i32) -> bool {
        self.text.borrow_mut().push_str(text);
        true
    }

    fn delete_surrounding_text(&mut self, before: usize, _after: usize) -> bool {
        let mut text = self.text.borrow_mut();
        for _ in 0..before {
            text.pop();
        }
        true
    }

    fn text_before_cursor(&self, length: usize) -> Option<String> {
        let text = self.text.borrow();
        let skip = text.chars().count().saturating_sub(length);
        Some(text.chars().skip(skip).collect())
    }

    fn finish_composing_text(&mut self) -> bool {
        true
    }
}
