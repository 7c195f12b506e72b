use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::estimator::CompletionRecord;
use crate::session::{Phase, SessionStatus};

/// Every state change in a session produces an Event.
/// The CLI prints them; a UI would render from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// First resume of a session.
    SessionStarted {
        session_id: Uuid,
        title: String,
        exercise_index: usize,
        time_left: u32,
        at: DateTime<Utc>,
    },
    SessionPaused {
        time_left: u32,
        at: DateTime<Utc>,
    },
    SessionResumed {
        time_left: u32,
        at: DateTime<Utc>,
    },
    /// The countdown reached zero. UIs flash the clock on this.
    PhaseEnded {
        phase: Phase,
        exercise_index: usize,
        set: u32,
        at: DateTime<Utc>,
    },
    RestStarted {
        set: u32,
        rest_secs: u32,
        at: DateTime<Utc>,
    },
    SetStarted {
        set: u32,
        of_sets: u32,
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    ExerciseCompleted {
        name: String,
        completed_count: usize,
        at: DateTime<Utc>,
    },
    ExerciseSkipped {
        name: String,
        at: DateTime<Utc>,
    },
    /// Moved to the next exercise of the active workout. Starts paused.
    ExerciseAdvanced {
        exercise_index: usize,
        name: String,
        at: DateTime<Utc>,
    },
    /// Ran out of exercises and moved on to the next pack item.
    PackItemAdvanced {
        pack_item_index: usize,
        title: String,
        at: DateTime<Utc>,
    },
    PackItemSelected {
        pack_item_index: usize,
        title: String,
        at: DateTime<Utc>,
    },
    SessionCompleted {
        record: CompletionRecord,
        at: DateTime<Utc>,
    },
    SessionCancelled {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        session_id: Uuid,
        status: SessionStatus,
        title: String,
        exercise_index: usize,
        exercise_name: Option<String>,
        exercise_count: usize,
        set: u32,
        of_sets: u32,
        phase: Phase,
        time_left: u32,
        total_time_elapsed: u64,
        pack_item_index: usize,
        pack_item_count: usize,
        completed_count: usize,
        total_exercise_count: usize,
        progress: u32,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Snake-case name of the variant, as it appears in the `type` field.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::SessionStarted { .. } => "session_started",
            Event::SessionPaused { .. } => "session_paused",
            Event::SessionResumed { .. } => "session_resumed",
            Event::PhaseEnded { .. } => "phase_ended",
            Event::RestStarted { .. } => "rest_started",
            Event::SetStarted { .. } => "set_started",
            Event::ExerciseCompleted { .. } => "exercise_completed",
            Event::ExerciseSkipped { .. } => "exercise_skipped",
            Event::ExerciseAdvanced { .. } => "exercise_advanced",
            Event::PackItemAdvanced { .. } => "pack_item_advanced",
            Event::PackItemSelected { .. } => "pack_item_selected",
            Event::SessionCompleted { .. } => "session_completed",
            Event::SessionCancelled { .. } => "session_cancelled",
            Event::StateSnapshot { .. } => "state_snapshot",
        }
    }
}
