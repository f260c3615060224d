//! Canonical default layouts.

use crate::models::{
    KeyDefinition, KeyboardLayout, Language, KEYCODE_BACKSPACE, KEYCODE_ENTER, KEYCODE_SHIFT,
    KEYCODE_SPACE,
};

const SHIFT_LABEL: &str = "⇧";
const BACKSPACE_LABEL: &str = "⌫";
const ENTER_LABEL: &str = "↵";

const SPACE_WIDTH: f32 = 8.0;
const ENTER_WIDTH: f32 = 2.0;
const MODIFIER_WIDTH: f32 = 1.0;

/// Immutable default layouts, one per supported language.
///
/// Callers receive their own copy of a default; the catalog itself is never
/// mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutCatalog {
    qwerty: KeyboardLayout,
    arabic: KeyboardLayout,
}

impl Default for LayoutCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCatalog {
    /// Builds the built-in defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            qwerty: qwerty_layout(),
            arabic: arabic_layout(),
        }
    }

    /// Default layout for a language.
    #[must_use]
    pub fn default_layout(&self, language: Language) -> KeyboardLayout {
        match language {
            Language::En => self.qwerty.clone(),
            Language::Ar => self.arabic.clone(),
        }
    }

    /// Name given to the seeded record of a language's default.
    #[must_use]
    pub const fn default_name(language: Language) -> &'static str {
        match language {
            Language::En => "Default QWERTY",
            Language::Ar => "Default Arabic",
        }
    }
}

fn letters(chars: &str) -> Vec<KeyDefinition> {
    chars
        .chars()
        .map(|c| KeyDefinition::character(c.to_string()))
        .collect()
}

fn space_row(space_label: &str) -> Vec<KeyDefinition> {
    vec![
        KeyDefinition::special(" ", KEYCODE_SPACE, SPACE_WIDTH).with_display(space_label),
        KeyDefinition::special("\n", KEYCODE_ENTER, ENTER_WIDTH).with_display(ENTER_LABEL),
    ]
}

fn shift_row(middle: Vec<KeyDefinition>) -> Vec<KeyDefinition> {
    let mut row = Vec::with_capacity(middle.len() + 2);
    row.push(KeyDefinition::special(SHIFT_LABEL, KEYCODE_SHIFT, MODIFIER_WIDTH));
    row.extend(middle);
    row.push(KeyDefinition::special(
        BACKSPACE_LABEL,
        KEYCODE_BACKSPACE,
        MODIFIER_WIDTH,
    ));
    row
}

fn qwerty_layout() -> KeyboardLayout {
    KeyboardLayout::new(vec![
        letters("QWERTYUIOP"),
        letters("ASDFGHJKL"),
        shift_row(letters("ZXCVBNM")),
        space_row("Space"),
        letters("1234567890"),
    ])
}

fn arabic_layout() -> KeyboardLayout {
    let mut third = letters("ئءؤر");
    // The lam-alef ligature commits both letters but is keyed as lam.
    third.push(KeyDefinition::with_code("لا", 'ل' as i32));
    third.extend(letters("ىة"));

    KeyboardLayout::new(vec![
        letters("ضصثقفغعهخح"),
        letters("شسيبلاتنم"),
        shift_row(third),
        space_row("مسافة"),
        letters("١٢٣٤٥٦٧٨٩٠"),
    ])
}
