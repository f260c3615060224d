//! Typing path: shift handling, case mapping, composition and key dispatch.

pub mod case;
pub mod composer;
pub mod session;
pub mod shift;

pub use case::map_case;
pub use composer::{InputConnection, PreviewText, TextBuffer, TextComposer};
pub use session::{KeyOutcome, KeyboardSession};
pub use shift::{Clock, ManualClock, MonotonicClock, ShiftState, ShiftStateMachine};
