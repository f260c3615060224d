//! Shift / caps-lock state machine.
//!
//! ```text
//! Off      --tap-->                     On
//! On       --tap within timeout-->      CapsLock
//! On       --tap after timeout-->       Off
//! CapsLock --tap-->                     Off
//! On       --character typed-->         Off
//! ```
//!
//! Elapsed time equal to the timeout counts as within the window.

use std::cell::Cell;
use std::time::{Duration, Instant};
use tracing::debug;

/// Default window for a double tap on Shift.
pub const DEFAULT_DOUBLE_TAP_TIMEOUT: Duration = Duration::from_millis(500);

/// Shift state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShiftState {
    /// Lowercase output
    #[default]
    Off,
    /// Uppercase for the next character only
    On,
    /// Uppercase until Shift is tapped again
    CapsLock,
}

/// Monotonic time source.
///
/// Only differences between readings matter; the origin is arbitrary.
pub trait Clock {
    /// Time elapsed since the clock's origin.
    fn now(&self) -> Duration;
}

/// Clock backed by [`Instant`], unaffected by wall-clock changes.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Starts a clock at the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-driven clock for tests and replays.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    /// Creates a clock reading zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the clock forward.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    /// Sets the absolute reading.
    pub fn set(&self, at: Duration) {
        self.now.set(at);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for std::rc::Rc<C> {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

/// Tracks Shift taps and decides whether output is uppercased.
#[derive(Debug)]
pub struct ShiftStateMachine<C: Clock = MonotonicClock> {
    clock: C,
    double_tap_timeout: Duration,
    last_tap: Option<Duration>,
    state: ShiftState,
}

impl ShiftStateMachine<MonotonicClock> {
    /// Creates a machine on the monotonic clock with the default timeout.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(MonotonicClock::new(), DEFAULT_DOUBLE_TAP_TIMEOUT)
    }
}

impl Default for ShiftStateMachine<MonotonicClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> ShiftStateMachine<C> {
    /// Creates a machine on the given clock.
    pub fn with_clock(clock: C, double_tap_timeout: Duration) -> Self {
        Self {
            clock,
            double_tap_timeout,
            last_tap: None,
            state: ShiftState::Off,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> ShiftState {
        self.state
    }

    /// Whether output should be uppercased.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state != ShiftState::Off
    }

    /// Configured double-tap window.
    #[must_use]
    pub const fn double_tap_timeout(&self) -> Duration {
        self.double_tap_timeout
    }

    /// Advances the state for a Shift tap and returns the new state.
    pub fn on_shift_tapped(&mut self) -> ShiftState {
        let now = self.clock.now();

        self.state = match self.state {
            ShiftState::Off => ShiftState::On,
            ShiftState::On => {
                let within_window = self
                    .last_tap
                    .is_some_and(|last| now.saturating_sub(last) <= self.double_tap_timeout);
                if within_window {
                    ShiftState::CapsLock
                } else {
                    ShiftState::Off
                }
            }
            ShiftState::CapsLock => ShiftState::Off,
        };

        self.last_tap = Some(now);
        debug!(state = ?self.state, "shift tapped");
        self.state
    }

    /// Collapses a single-shot shift after a character was committed.
    ///
    /// Caps lock is untouched.
    pub fn on_character_typed(&mut self) {
        if self.state == ShiftState::On {
            self.state = ShiftState::Off;
        }
    }

    /// Returns to Off and forgets the previous tap.
    pub fn reset(&mut self) {
        self.state = ShiftState::Off;
        self.last_tap = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine(clock: &ManualClock) -> ShiftStateMachine<&ManualClock> {
        ShiftStateMachine::with_clock(clock, DEFAULT_DOUBLE_TAP_TIMEOUT)
    }

    #[test]
    fn test_off_tap_turns_on() {
        let clock = ManualClock::new();
        let mut shift = machine(&clock);
        assert_eq!(shift.on_shift_tapped(), ShiftState::On);
        assert!(shift.is_active());
    }

    #[test]
    fn test_double_tap_within_window_locks() {
        let clock = ManualClock::new();
        let mut shift = machine(&clock);
        shift.on_shift_tapped();
        clock.advance(Duration::from_millis(200));
        assert_eq!(shift.on_shift_tapped(), ShiftState::CapsLock);
    }

    #[test]
    fn test_double_tap_exactly_at_timeout_locks() {
        let clock = ManualClock::new();
        let mut shift = machine(&clock);
        shift.on_shift_tapped();
        clock.advance(Duration::from_millis(500));
        assert_eq!(shift.on_shift_tapped(), ShiftState::CapsLock);
    }

    #[test]
    fn test_slow_second_tap_turns_off() {
        let clock = ManualClock::new();
        let mut shift = machine(&clock);
        shift.on_shift_tapped();
        clock.advance(Duration::from_millis(501));
        assert_eq!(shift.on_shift_tapped(), ShiftState::Off);
    }

    #[test]
    fn test_caps_lock_tap_turns_off_regardless_of_timing() {
        let clock = ManualClock::new();
        let mut shift = machine(&clock);
        shift.on_shift_tapped();
        shift.on_shift_tapped();
        assert_eq!(shift.state(), ShiftState::CapsLock);
        assert_eq!(shift.on_shift_tapped(), ShiftState::Off);
    }

    #[test]
    fn test_off_tap_ignores_previous_unrelated_tap() {
        let clock = ManualClock::new();
        let mut shift = machine(&clock);
        shift.on_shift_tapped();
        clock.advance(Duration::from_secs(10));
        shift.on_shift_tapped();
        assert_eq!(shift.state(), ShiftState::Off);
        assert_eq!(shift.on_shift_tapped(), ShiftState::On);
    }

    #[test]
    fn test_only_relative_timing_matters() {
        for origin in [Duration::ZERO, Duration::from_secs(86_400)] {
            let clock = ManualClock::new();
            clock.set(origin);
            let mut shift = machine(&clock);
            shift.on_shift_tapped();
            clock.advance(Duration::from_millis(300));
            assert_eq!(shift.on_shift_tapped(), ShiftState::CapsLock);
        }
    }

    #[test]
    fn test_character_typed_resets_single_shot_only() {
        let clock = ManualClock::new();
        let mut shift = machine(&clock);

        shift.on_character_typed();
        assert_eq!(shift.state(), ShiftState::Off);

        shift.on_shift_tapped();
        shift.on_character_typed();
        assert_eq!(shift.state(), ShiftState::Off);

        shift.on_shift_tapped();
        shift.on_shift_tapped();
        shift.on_character_typed();
        assert_eq!(shift.state(), ShiftState::CapsLock);
    }

    #[test]
    fn test_reset_returns_to_off() {
        let clock = ManualClock::new();
        let mut shift = machine(&clock);
        shift.on_shift_tapped();
        shift.on_shift_tapped();
        shift.reset();
        assert_eq!(shift.state(), ShiftState::Off);
        assert_eq!(shift.on_shift_tapped(), ShiftState::On);
    }

    #[test]
    fn test_custom_timeout() {
        let clock = ManualClock::new();
        let mut shift = ShiftStateMachine::with_clock(&clock, Duration::from_millis(100));
        shift.on_shift_tapped();
        clock.advance(Duration::from_millis(150));
        assert_eq!(shift.on_shift_tapped(), ShiftState::Off);
    }
}
