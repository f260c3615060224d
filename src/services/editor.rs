//! Interactive layout editing.
//!
//! The editor keeps a base layout (what the keyboard shows outside edit mode)
//! and a working copy that drag-and-drop edits mutate. Keys only ever swap
//! places, so row lengths and the total key count never change.

use tracing::debug;

use crate::models::{KeyDefinition, KeyPosition, KeyboardLayout, Language, LayoutSource, Position};
use crate::services::catalog::LayoutCatalog;

/// Working state of the layout editor.
#[derive(Debug, Clone)]
pub struct LayoutEditor {
    catalog: LayoutCatalog,
    language: Language,
    source: LayoutSource,
    base: KeyboardLayout,
    working: KeyboardLayout,
    edit_mode: bool,
    drag_source: Option<Position>,
}

impl LayoutEditor {
    /// Starts on the catalog default of `language`, outside edit mode.
    #[must_use]
    pub fn new(catalog: LayoutCatalog, language: Language) -> Self {
        let base = catalog.default_layout(language);
        Self {
            catalog,
            language,
            source: LayoutSource::Default(language),
            working: base.clone(),
            base,
            edit_mode: false,
            drag_source: None,
        }
    }

    /// Shows a different layout. Pending edits and any drag are discarded.
    pub fn load(&mut self, source: LayoutSource, language: Language, layout: KeyboardLayout) {
        debug!("Editor loading {:?} ({})", source, language);
        self.language = language;
        self.source = source;
        self.working = layout.clone();
        self.base = layout;
        self.drag_source = None;
    }

    /// Shows the catalog default of another language.
    pub fn switch_language(&mut self, language: Language) {
        let layout = self.catalog.default_layout(language);
        self.load(LayoutSource::Default(language), language, layout);
    }

    /// Enters edit mode with a fresh working copy of the base layout.
    pub fn enter_edit_mode(&mut self) {
        self.working = self.base.clone();
        self.drag_source = None;
        self.edit_mode = true;
    }

    /// Leaves edit mode. Edits stay in the working copy.
    pub fn exit_edit_mode(&mut self) {
        self.edit_mode = false;
        self.drag_source = None;
    }

    /// Swaps the keys at two positions.
    ///
    /// Returns `false` and changes nothing when either position is outside
    /// the working layout.
    pub fn move_key(&mut self, from: Position, to: Position) -> bool {
        let moved = self.working.swap(from, to);
        if moved {
            debug!("Swapped key {:?} with {:?}", from, to);
        } else {
            debug!("Ignored move {:?} -> {:?}: out of bounds", from, to);
        }
        moved
    }

    /// Replaces the working copy with the catalog default of the current
    /// language.
    pub fn reset_layout(&mut self) {
        self.working = self.catalog.default_layout(self.language);
        self.drag_source = None;
    }

    /// Records (or clears) the position a drag started from.
    pub fn set_dragged_key(&mut self, source: Option<Position>) {
        self.drag_source = source;
    }

    /// Key under the recorded drag source.
    #[must_use]
    pub fn dragged_key(&self) -> Option<&KeyDefinition> {
        self.drag_source.and_then(|pos| self.working.key_at(pos))
    }

    /// Position the current drag started from.
    #[must_use]
    pub const fn drag_source(&self) -> Option<Position> {
        self.drag_source
    }

    /// Drops the dragged key onto `target`, swapping the two.
    ///
    /// The drag ends whether or not the swap happened.
    pub fn drop_dragged_key(&mut self, target: Position) -> bool {
        match self.drag_source.take() {
            Some(source) => self.move_key(source, target),
            None => false,
        }
    }

    /// Working copy in its persisted form.
    #[must_use]
    pub fn current_positions(&self) -> Vec<Vec<KeyPosition>> {
        self.working.to_positions()
    }

    /// Whether taps currently edit rather than type.
    #[must_use]
    pub const fn is_edit_mode(&self) -> bool {
        self.edit_mode
    }

    /// Layout being edited.
    #[must_use]
    pub const fn working_layout(&self) -> &KeyboardLayout {
        &self.working
    }

    /// Where the base layout came from.
    #[must_use]
    pub const fn source(&self) -> LayoutSource {
        self.source
    }

    /// Language of the base layout.
    #[must_use]
    pub const fn language(&self) -> Language {
        self.language
    }
}
