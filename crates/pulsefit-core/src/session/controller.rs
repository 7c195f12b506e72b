//! Session controller.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> (Working <-> Resting) <-> Paused -> ... -> Completed | Cancelled
//! ```
//!
//! Phase ends (from `tick()`):
//!
//! ```text
//! Working, set < sets   -> Resting (rest_time)
//! Resting, set < sets   -> set + 1, Working (duration)
//! otherwise             -> advance exercise
//! ```
//!
//! Advancing moves to the next exercise, else the next pack item with
//! exercises, else completes. Every new exercise starts paused.
//!
//! Commands return the events they produced; an empty list means the command
//! did not apply and nothing changed. Once completed or cancelled the
//! controller ignores everything.

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::hooks::{NoopHooks, SessionHooks};
use super::state::{SessionState, SessionStatus};
use crate::estimator::{CompletionEstimator, CompletionRecord, SessionTotals};
use crate::events::Event;
use crate::resolver::{resolve, Resolution};
use crate::timer::TickOutcome;
use crate::workout::{Exercise, Workout, WorkoutShape};

#[derive(Debug, Clone)]
enum Outcome {
    Completed(CompletionRecord),
    Cancelled,
}

#[derive(Debug)]
pub struct SessionController<H: SessionHooks = NoopHooks> {
    session_id: Uuid,
    /// The session's workout. An AI pack with source workouts is held in
    /// its promoted pack form.
    workout: Workout,
    active_workout: Workout,
    exercises: Vec<Exercise>,
    total_exercise_count: usize,
    state: SessionState,
    started: bool,
    outcome: Option<Outcome>,
    estimator: CompletionEstimator,
    hooks: H,
}

impl<H: SessionHooks> SessionController<H> {
    pub fn new(workout: Workout, hooks: H) -> Self {
        Self::with_estimator(workout, CompletionEstimator::default(), hooks)
    }

    pub fn with_estimator(workout: Workout, estimator: CompletionEstimator, hooks: H) -> Self {
        // A pack whose first item is empty starts at the first item with work.
        let start_index = match &workout.shape {
            WorkoutShape::Pack { items } => items
                .iter()
                .position(|w| !flat_exercises(w).is_empty())
                .unwrap_or(0),
            _ => 0,
        };

        let total_exercise_count = match &workout.shape {
            WorkoutShape::Pack { items } => items.iter().map(|w| flat_exercises(w).len()).sum(),
            // The list already covers the source workouts.
            WorkoutShape::AiPack { list, .. } => list.len(),
            WorkoutShape::Single { exercises } => exercises.len(),
        };

        let Resolution {
            active_workout,
            exercises,
            promoted,
        } = resolve(&workout, start_index);
        let workout = promoted.unwrap_or(workout);

        if exercises.is_empty() {
            warn!(workout = %workout.title, "workout has no exercises");
        }

        let first_duration = exercises.first().map(phase_duration).unwrap_or(0);
        Self {
            session_id: Uuid::new_v4(),
            workout,
            active_workout,
            exercises,
            total_exercise_count,
            state: SessionState::new(start_index, first_duration),
            started: false,
            outcome: None,
            estimator,
            hooks,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn workout(&self) -> &Workout {
        &self.workout
    }

    pub fn active_workout(&self) -> &Workout {
        &self.active_workout
    }

    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    pub fn current_exercise(&self) -> Option<&Exercise> {
        self.exercises.get(self.state.current_exercise_index())
    }

    /// False when there is nothing to do; only `cancel` and `finish_now` apply.
    pub fn has_exercises(&self) -> bool {
        self.current_exercise().is_some()
    }

    pub fn is_pack(&self) -> bool {
        self.workout.is_pack()
    }

    pub fn pack_item_count(&self) -> usize {
        self.workout.pack_items().len()
    }

    pub fn total_exercise_count(&self) -> usize {
        self.total_exercise_count
    }

    pub fn completed_count(&self) -> usize {
        self.state.completed_exercise_names().len()
    }

    /// 0..=100, rounded.
    pub fn progress(&self) -> u32 {
        let total = self.total_exercise_count;
        let done = self.completed_count().min(total);
        ((done as f64 * 100.0) / total.max(1) as f64).round() as u32
    }

    pub fn status(&self) -> SessionStatus {
        match self.outcome {
            Some(Outcome::Completed(_)) => SessionStatus::Completed,
            Some(Outcome::Cancelled) => SessionStatus::Cancelled,
            None if !self.started => SessionStatus::Idle,
            None if self.state.is_paused() => SessionStatus::Paused,
            None if self.state.is_resting() => SessionStatus::Resting,
            None => SessionStatus::Working,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// The record produced on completion.
    pub fn record(&self) -> Option<&CompletionRecord> {
        match &self.outcome {
            Some(Outcome::Completed(record)) => Some(record),
            _ => None,
        }
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn into_hooks(self) -> H {
        self.hooks
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        let exercise = self.current_exercise();
        Event::StateSnapshot {
            session_id: self.session_id,
            status: self.status(),
            title: self.active_workout.title.clone(),
            exercise_index: self.state.current_exercise_index(),
            exercise_name: exercise.map(|e| e.name.clone()),
            exercise_count: self.exercises.len(),
            set: self.state.current_set(),
            of_sets: exercise.map(|e| e.sets).unwrap_or(0),
            phase: self.state.phase(),
            time_left: self.state.time_left(),
            total_time_elapsed: self.state.total_time_elapsed(),
            pack_item_index: self.state.active_pack_item_index(),
            pack_item_count: self.pack_item_count(),
            completed_count: self.completed_count(),
            total_exercise_count: self.total_exercise_count,
            progress: self.progress(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Resume if paused. Sessions never start on their own.
    pub fn start(&mut self) -> Vec<Event> {
        if self.state.is_paused() {
            self.toggle_pause()
        } else {
            Vec::new()
        }
    }

    pub fn pause(&mut self) -> Vec<Event> {
        if self.state.is_paused() {
            Vec::new()
        } else {
            self.toggle_pause()
        }
    }

    /// Pause or resume, keeping the phase and time left.
    pub fn toggle_pause(&mut self) -> Vec<Event> {
        if self.rejects("toggle_pause") || !self.has_work("toggle_pause") {
            return Vec::new();
        }
        let time_left = self.state.time_left();
        if self.state.timer_mut().toggle() {
            if std::mem::replace(&mut self.started, true) {
                vec![Event::SessionResumed {
                    time_left,
                    at: Utc::now(),
                }]
            } else {
                info!(session = %self.session_id, workout = %self.workout.title, "session started");
                vec![Event::SessionStarted {
                    session_id: self.session_id,
                    title: self.workout.title.clone(),
                    exercise_index: self.state.current_exercise_index(),
                    time_left,
                    at: Utc::now(),
                }]
            }
        } else {
            vec![Event::SessionPaused {
                time_left,
                at: Utc::now(),
            }]
        }
    }

    /// Call once per elapsed second.
    pub fn tick(&mut self) -> Vec<Event> {
        if self.is_finished() {
            return Vec::new();
        }
        match self.state.timer_mut().tick() {
            TickOutcome::Stopped | TickOutcome::Ticked => Vec::new(),
            TickOutcome::PhaseEnded => {
                let mut events = vec![Event::PhaseEnded {
                    phase: self.state.phase(),
                    exercise_index: self.state.current_exercise_index(),
                    set: self.state.current_set(),
                    at: Utc::now(),
                }];
                events.extend(self.on_phase_end());
                events
            }
        }
    }

    /// Feed `n` ticks, collecting everything they produced.
    pub fn advance_ticks(&mut self, n: u64) -> Vec<Event> {
        let mut events = Vec::new();
        for _ in 0..n {
            if self.is_finished() {
                break;
            }
            events.extend(self.tick());
        }
        events
    }

    /// "Complete Set": end the current set early. On the final set this
    /// completes the exercise; during rest it skips the rest.
    pub fn complete_set(&mut self) -> Vec<Event> {
        if self.rejects("complete_set") || !self.has_work("complete_set") {
            return Vec::new();
        }
        let sets = self.current_exercise().map(|e| e.sets).unwrap_or(1);
        if self.state.current_set() < sets {
            self.on_phase_end()
        } else {
            self.complete_exercise_now()
        }
    }

    /// Mark the current exercise done and move on.
    pub fn complete_exercise_now(&mut self) -> Vec<Event> {
        if self.rejects("complete_exercise_now") {
            return Vec::new();
        }
        let Some(name) = self.current_exercise().map(|e| e.name.clone()) else {
            debug!("complete_exercise_now ignored: no current exercise");
            return Vec::new();
        };
        self.state.mark_completed(&name);
        let mut events = vec![Event::ExerciseCompleted {
            name,
            completed_count: self.completed_count(),
            at: Utc::now(),
        }];
        events.extend(self.advance_exercise());
        events
    }

    /// Move on without completing, whatever the set or phase.
    pub fn skip_exercise(&mut self) -> Vec<Event> {
        if self.rejects("skip_exercise") {
            return Vec::new();
        }
        let Some(name) = self.current_exercise().map(|e| e.name.clone()) else {
            debug!("skip_exercise ignored: no current exercise");
            return Vec::new();
        };
        self.state.mark_skipped(&name);
        let mut events = vec![Event::ExerciseSkipped {
            name,
            at: Utc::now(),
        }];
        events.extend(self.advance_exercise());
        events
    }

    /// Jump straight to a pack item, paused at its first exercise.
    pub fn select_pack_item(&mut self, index: usize) -> Vec<Event> {
        if self.rejects("select_pack_item") {
            return Vec::new();
        }
        let count = self.pack_item_count();
        if count == 0 {
            debug!(index, "select_pack_item ignored: workout is not a pack");
            return Vec::new();
        }
        if index >= count {
            debug!(index, count, "select_pack_item ignored: index out of range");
            return Vec::new();
        }
        self.load_pack_item(index);
        vec![Event::PackItemSelected {
            pack_item_index: index,
            title: self.active_workout.title.clone(),
            at: Utc::now(),
        }]
    }

    /// Complete right away, whatever is left.
    pub fn finish_now(&mut self) -> Vec<Event> {
        if self.rejects("finish_now") {
            return Vec::new();
        }
        self.complete()
    }

    /// Stop and discard the session. No record is produced.
    pub fn cancel(&mut self) -> Vec<Event> {
        if self.rejects("cancel") {
            return Vec::new();
        }
        self.state.timer_mut().pause();
        self.outcome = Some(Outcome::Cancelled);
        info!(session = %self.session_id, workout = %self.workout.title, "session cancelled");
        self.hooks.on_cancel();
        vec![Event::SessionCancelled { at: Utc::now() }]
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn rejects(&self, command: &str) -> bool {
        if self.is_finished() {
            debug!(command, status = ?self.status(), "ignored: session is over");
            return true;
        }
        false
    }

    fn has_work(&self, command: &str) -> bool {
        if self.has_exercises() {
            return true;
        }
        debug!(command, "ignored: no exercises");
        false
    }

    /// End of the current phase, by the clock or by "Complete Set".
    fn on_phase_end(&mut self) -> Vec<Event> {
        let Some(exercise) = self.current_exercise().cloned() else {
            return Vec::new();
        };
        if self.state.current_set() >= exercise.sets {
            return self.advance_exercise();
        }
        if self.state.is_resting() {
            self.state.start_next_set(phase_duration(&exercise));
            vec![Event::SetStarted {
                set: self.state.current_set(),
                of_sets: exercise.sets,
                duration_secs: self.state.time_left(),
                at: Utc::now(),
            }]
        } else {
            self.state.enter_rest(exercise.rest_time.max(1));
            vec![Event::RestStarted {
                set: self.state.current_set(),
                rest_secs: self.state.time_left(),
                at: Utc::now(),
            }]
        }
    }

    fn advance_exercise(&mut self) -> Vec<Event> {
        let next = self.state.current_exercise_index() + 1;
        if let Some(exercise) = self.exercises.get(next) {
            let (duration, name) = (phase_duration(exercise), exercise.name.clone());
            self.state.move_to_exercise(next, duration);
            return vec![Event::ExerciseAdvanced {
                exercise_index: next,
                name,
                at: Utc::now(),
            }];
        }

        let from = self.state.active_pack_item_index() + 1;
        let next_item = self
            .workout
            .pack_items()
            .iter()
            .enumerate()
            .skip(from)
            .find(|(_, w)| !flat_exercises(w).is_empty())
            .map(|(i, _)| i);
        if let Some(index) = next_item {
            self.load_pack_item(index);
            info!(
                session = %self.session_id,
                pack_item = index,
                title = %self.active_workout.title,
                "moving to next workout"
            );
            return vec![Event::PackItemAdvanced {
                pack_item_index: index,
                title: self.active_workout.title.clone(),
                at: Utc::now(),
            }];
        }

        self.complete()
    }

    fn load_pack_item(&mut self, index: usize) {
        let Resolution {
            active_workout,
            exercises,
            ..
        } = resolve(&self.workout, index);
        let duration = exercises.first().map(phase_duration).unwrap_or(0);
        self.active_workout = active_workout;
        self.exercises = exercises;
        self.state.move_to_pack_item(index, duration);
    }

    fn complete(&mut self) -> Vec<Event> {
        self.state.timer_mut().pause();
        let record = self.estimator.estimate(
            &self.workout,
            SessionTotals {
                total_time_elapsed: self.state.total_time_elapsed(),
                completed_exercises: self.completed_count(),
                total_exercises: self.total_exercise_count,
            },
        );
        self.outcome = Some(Outcome::Completed(record.clone()));
        info!(
            session = %self.session_id,
            workout = %record.title,
            minutes = record.duration,
            calories = record.calories_burned,
            "workout complete"
        );
        self.hooks.on_complete(&record);
        vec![Event::SessionCompleted {
            record,
            at: Utc::now(),
        }]
    }
}

impl SessionController<NoopHooks> {
    /// A session nobody listens to; outcomes are read back via `record()`.
    pub fn detached(workout: Workout) -> Self {
        Self::new(workout, NoopHooks)
    }
}

/// The exercises a pack item contributes: only a plain exercise list counts.
fn flat_exercises(workout: &Workout) -> &[Exercise] {
    match &workout.shape {
        WorkoutShape::Single { exercises } => exercises,
        _ => &[],
    }
}

fn phase_duration(exercise: &Exercise) -> u32 {
    exercise.duration.max(1)
}
