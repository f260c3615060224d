//! Case mapping of committed characters.

use crate::input::shift::ShiftState;

/// Resolves the text to commit for a raw key text under a shift state.
///
/// Only a single alphabetic character is case-mapped: uppercase while shift is
/// On or CapsLock, lowercase otherwise. Anything else (digits, punctuation,
/// multi-character labels such as "لا") comes back unchanged.
///
/// # Examples
///
/// ```
/// use keyboard_ime::input::{map_case, ShiftState};
///
/// assert_eq!(map_case("A", ShiftState::Off), "a");
/// assert_eq!(map_case("a", ShiftState::CapsLock), "A");
/// assert_eq!(map_case("7", ShiftState::On), "7");
/// ```
#[must_use]
pub fn map_case(raw: &str, state: ShiftState) -> String {
    let mut chars = raw.chars();
    let (Some(c), None) = (chars.next(), chars.next()) else {
        return raw.to_string();
    };

    if !c.is_alphabetic() {
        return raw.to_string();
    }

    if state == ShiftState::Off {
        c.to_lowercase().collect()
    } else {
        c.to_uppercase().collect()
    }
}
