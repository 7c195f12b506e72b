//! Phase countdown.
//!
//! The countdown has no thread and no notion of wall-clock time. The caller
//! invokes `tick()` once per elapsed second, from a real interval or a
//! virtual clock in tests.
//!
//! ## Behaviour
//!
//! ```text
//! tick while running:  time_left -= 1, total_elapsed += 1
//! time_left hits 0:    report PhaseEnded once, then disarm
//! disarmed:            ticks do nothing until set_time_left(n > 0)
//! ```

use serde::{Deserialize, Serialize};

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickOutcome {
    /// Not running, or waiting for a new phase.
    Stopped,
    Ticked,
    /// `time_left` just reached zero.
    PhaseEnded,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    time_left: u32,
    total_elapsed: u64,
    running: bool,
    /// False once the current phase has ended.
    armed: bool,
}

impl Countdown {
    /// A paused countdown with `time_left` seconds on the clock.
    pub fn new(time_left: u32) -> Self {
        Self {
            time_left,
            total_elapsed: 0,
            running: false,
            armed: time_left > 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn total_elapsed(&self) -> u64 {
        self.total_elapsed
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Returns `false` if already running.
    pub fn start(&mut self) -> bool {
        !std::mem::replace(&mut self.running, true)
    }

    /// Returns `false` if already paused.
    pub fn pause(&mut self) -> bool {
        std::mem::replace(&mut self.running, false)
    }

    /// Flip between running and paused; returns the new running flag.
    pub fn toggle(&mut self) -> bool {
        self.running = !self.running;
        self.running
    }

    /// Load a new phase. Elapsed time is kept.
    pub fn set_time_left(&mut self, secs: u32) {
        self.time_left = secs;
        self.armed = secs > 0;
    }

    pub fn tick(&mut self) -> TickOutcome {
        if !self.running || !self.armed {
            return TickOutcome::Stopped;
        }
        self.time_left = self.time_left.saturating_sub(1);
        self.total_elapsed += 1;
        if self.time_left == 0 {
            self.armed = false;
            TickOutcome::PhaseEnded
        } else {
            TickOutcome::Ticked
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn starts_paused() {
        let mut c = Countdown::new(10);
        assert!(!c.is_running());
        assert_eq!(c.tick(), TickOutcome::Stopped);
        assert_eq!(c.time_left(), 10);
        assert_eq!(c.total_elapsed(), 0);
    }

    #[test]
    fn counts_down_and_ends_phase_once() {
        let mut c = Countdown::new(3);
        c.start();
        assert_eq!(c.tick(), TickOutcome::Ticked);
        assert_eq!(c.tick(), TickOutcome::Ticked);
        assert_eq!(c.tick(), TickOutcome::PhaseEnded);
        assert_eq!(c.time_left(), 0);
        assert_eq!(c.total_elapsed(), 3);

        // Disarmed until a new phase is loaded.
        assert_eq!(c.tick(), TickOutcome::Stopped);
        assert_eq!(c.total_elapsed(), 3);

        c.set_time_left(2);
        assert_eq!(c.tick(), TickOutcome::Ticked);
        assert_eq!(c.total_elapsed(), 4);
    }

    #[test]
    fn pause_preserves_time_left() {
        let mut c = Countdown::new(40);
        c.start();
        c.tick();
        assert!(c.pause());
        assert!(!c.pause());
        for _ in 0..5 {
            c.tick();
        }
        assert_eq!(c.time_left(), 39);
        assert!(c.start());
        assert!(!c.start());
        assert_eq!(c.time_left(), 39);
    }

    #[test]
    fn zero_phase_is_never_armed() {
        let mut c = Countdown::new(0);
        c.start();
        assert_eq!(c.tick(), TickOutcome::Stopped);
        assert_eq!(c.total_elapsed(), 0);
    }

    proptest! {
        #[test]
        fn elapsed_tracks_running_ticks(
            schedule in proptest::collection::vec(any::<bool>(), 0..200)
        ) {
            // `true` = tick while running, `false` = toggle pause.
            let mut c = Countdown::new(10_000);
            let mut expected = 0u64;
            for step in schedule {
                let before = c.total_elapsed();
                if step {
                    let running = c.is_running();
                    c.tick();
                    if running {
                        expected += 1;
                        prop_assert_eq!(c.total_elapsed(), before + 1);
                    } else {
                        prop_assert_eq!(c.total_elapsed(), before);
                    }
                } else {
                    c.toggle();
                    prop_assert_eq!(c.total_elapsed(), before);
                }
            }
            prop_assert_eq!(c.total_elapsed(), expected);
            prop_assert_eq!(u64::from(c.time_left()) + expected, 10_000);
        }
    }
}
