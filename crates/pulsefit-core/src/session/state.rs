use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::timer::Countdown;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Work,
    Rest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Created, never resumed.
    Idle,
    Working,
    Resting,
    Paused,
    Completed,
    Cancelled,
}

impl SessionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::Cancelled)
    }
}

/// Where the user is inside a session.
///
/// Completed and skipped names are kept disjoint: completing an exercise
/// clears any earlier skip of it, and a completed exercise is never marked
/// skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    current_exercise_index: usize,
    current_set: u32,
    is_resting: bool,
    timer: Countdown,
    completed_exercise_names: BTreeSet<String>,
    skipped_exercise_names: BTreeSet<String>,
    active_pack_item_index: usize,
}

impl SessionState {
    /// Paused at the first set of the first exercise.
    pub(crate) fn new(active_pack_item_index: usize, first_duration: u32) -> Self {
        Self {
            current_exercise_index: 0,
            current_set: 1,
            is_resting: false,
            timer: Countdown::new(first_duration),
            completed_exercise_names: BTreeSet::new(),
            skipped_exercise_names: BTreeSet::new(),
            active_pack_item_index,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn current_exercise_index(&self) -> usize {
        self.current_exercise_index
    }

    /// 1-based.
    pub fn current_set(&self) -> u32 {
        self.current_set
    }

    pub fn is_resting(&self) -> bool {
        self.is_resting
    }

    pub fn is_paused(&self) -> bool {
        !self.timer.is_running()
    }

    pub fn phase(&self) -> Phase {
        if self.is_resting {
            Phase::Rest
        } else {
            Phase::Work
        }
    }

    pub fn time_left(&self) -> u32 {
        self.timer.time_left()
    }

    pub fn total_time_elapsed(&self) -> u64 {
        self.timer.total_elapsed()
    }

    pub fn completed_exercise_names(&self) -> &BTreeSet<String> {
        &self.completed_exercise_names
    }

    pub fn skipped_exercise_names(&self) -> &BTreeSet<String> {
        &self.skipped_exercise_names
    }

    pub fn active_pack_item_index(&self) -> usize {
        self.active_pack_item_index
    }

    pub fn timer(&self) -> &Countdown {
        &self.timer
    }

    // ── Mutations (controller only) ──────────────────────────────────

    pub(crate) fn timer_mut(&mut self) -> &mut Countdown {
        &mut self.timer
    }

    /// Jump to the first set of `index`, paused.
    pub(crate) fn move_to_exercise(&mut self, index: usize, duration: u32) {
        self.current_exercise_index = index;
        self.current_set = 1;
        self.is_resting = false;
        self.timer.pause();
        self.timer.set_time_left(duration);
    }

    /// Jump to the first exercise of another pack item, paused.
    pub(crate) fn move_to_pack_item(&mut self, pack_item_index: usize, duration: u32) {
        self.active_pack_item_index = pack_item_index;
        self.move_to_exercise(0, duration);
    }

    pub(crate) fn enter_rest(&mut self, rest_secs: u32) {
        self.is_resting = true;
        self.timer.set_time_left(rest_secs);
    }

    pub(crate) fn start_next_set(&mut self, duration: u32) {
        self.current_set += 1;
        self.is_resting = false;
        self.timer.set_time_left(duration);
    }

    /// Returns `true` if the name was not completed before.
    pub(crate) fn mark_completed(&mut self, name: &str) -> bool {
        self.skipped_exercise_names.remove(name);
        self.completed_exercise_names.insert(name.to_string())
    }

    /// A completed exercise is never marked skipped. Returns `true` if marked.
    pub(crate) fn mark_skipped(&mut self, name: &str) -> bool {
        if self.completed_exercise_names.contains(name) {
            return false;
        }
        self.skipped_exercise_names.insert(name.to_string());
        true
    }
}
