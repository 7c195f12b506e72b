//! Completion estimator.
//!
//! Converts elapsed time and completion counts into the record handed to
//! the persistence layer. The calorie formula is kept exactly as users have
//! always seen it:
//!
//! ```text
//! minutes    = max(round(elapsed / 60), 1)
//! completion = completed / total            (0 when total == 0)
//! time_ratio = min(minutes / planned_minutes, 1)
//! calories   = round(planned_calories * max(completion,
//!                                           time_ratio * completion,
//!                                           0.3 * completion))
//! ```

use serde::{Deserialize, Serialize};

use crate::workout::Workout;

pub const DEFAULT_PLANNED_DURATION_MIN: u32 = 30;
pub const DEFAULT_PLANNED_CALORIES: u32 = 300;
const MIN_CALORIE_FRACTION: f64 = 0.3;

/// Fallbacks for workouts that leave out their planned numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanDefaults {
    pub duration_min: u32,
    pub calories: u32,
}

impl Default for PlanDefaults {
    fn default() -> Self {
        Self {
            duration_min: DEFAULT_PLANNED_DURATION_MIN,
            calories: DEFAULT_PLANNED_CALORIES,
        }
    }
}

/// The single artifact a finished session produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub title: String,
    #[serde(rename = "type")]
    pub workout_type: String,
    /// Minutes actually spent, at least 1.
    pub duration: u32,
    pub calories_burned: u32,
}

impl CompletionRecord {
    pub fn summary(&self) -> String {
        format!(
            "You burned approximately {} calories in {} minutes.",
            self.calories_burned, self.duration
        )
    }
}

/// Inputs gathered from the finished session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionTotals {
    pub total_time_elapsed: u64,
    pub completed_exercises: usize,
    pub total_exercises: usize,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CompletionEstimator {
    defaults: PlanDefaults,
}

impl CompletionEstimator {
    pub fn new(defaults: PlanDefaults) -> Self {
        Self { defaults }
    }

    /// Planned minutes and calories for `workout`, with zeroes treated as absent.
    pub fn plan_for(&self, workout: &Workout) -> (u32, u32) {
        let duration = workout
            .duration
            .filter(|d| *d > 0)
            .unwrap_or(self.defaults.duration_min)
            .max(1);
        let calories = workout
            .calories_burn
            .filter(|c| *c > 0)
            .unwrap_or(self.defaults.calories);
        (duration, calories)
    }

    pub fn estimate(&self, workout: &Workout, totals: SessionTotals) -> CompletionRecord {
        let (planned_minutes, planned_calories) = self.plan_for(workout);
        let minutes_spent = minutes_spent(totals.total_time_elapsed);

        let completion_ratio = if totals.total_exercises > 0 {
            (totals.completed_exercises as f64 / totals.total_exercises as f64).min(1.0)
        } else {
            0.0
        };
        let time_ratio = (f64::from(minutes_spent) / f64::from(planned_minutes)).min(1.0);
        let factor = completion_ratio
            .max(time_ratio * completion_ratio)
            .max(MIN_CALORIE_FRACTION * completion_ratio);
        let calories = (f64::from(planned_calories) * factor).round() as u32;

        CompletionRecord {
            title: workout.title.clone(),
            workout_type: workout.workout_type.clone(),
            duration: minutes_spent,
            calories_burned: calories,
        }
    }
}

fn minutes_spent(total_secs: u64) -> u32 {
    let minutes = (total_secs as f64 / 60.0).round();
    (minutes.min(u32::MAX as f64) as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workout::Exercise;
    use proptest::prelude::*;

    fn four_exercise_workout() -> Workout {
        Workout::single(
            "Full Body HIIT",
            vec![
                Exercise::new("Jumping Jacks"),
                Exercise::new("Push-ups"),
                Exercise::new("Squats"),
                Exercise::new("Plank"),
            ],
        )
        .with_type("HIIT")
        .with_duration(30)
        .with_calories(300)
    }

    fn totals(secs: u64, completed: usize, total: usize) -> SessionTotals {
        SessionTotals {
            total_time_elapsed: secs,
            completed_exercises: completed,
            total_exercises: total,
        }
    }

    #[test]
    fn full_completion_on_plan() {
        let record = CompletionEstimator::default().estimate(&four_exercise_workout(), totals(1800, 4, 4));
        assert_eq!(record.duration, 30);
        assert_eq!(record.calories_burned, 300);
        assert_eq!(record.title, "Full Body HIIT");
        assert_eq!(record.workout_type, "HIIT");
    }

    #[test]
    fn half_completion_half_time() {
        let record = CompletionEstimator::default().estimate(&four_exercise_workout(), totals(900, 2, 4));
        assert_eq!(record.duration, 15);
        assert_eq!(record.calories_burned, 150);
    }

    #[test]
    fn minutes_round_and_floor_at_one() {
        assert_eq!(minutes_spent(0), 1);
        assert_eq!(minutes_spent(29), 1);
        assert_eq!(minutes_spent(89), 1);
        assert_eq!(minutes_spent(90), 2);
        assert_eq!(minutes_spent(1800), 30);
    }

    #[test]
    fn nothing_completed_burns_nothing() {
        let record = CompletionEstimator::default().estimate(&four_exercise_workout(), totals(1200, 0, 4));
        assert_eq!(record.calories_burned, 0);
        assert_eq!(record.duration, 20);
    }

    #[test]
    fn empty_workout_gets_default_record() {
        let w = Workout::single("Rest Day", Vec::new());
        let record = CompletionEstimator::default().estimate(&w, totals(0, 0, 0));
        assert_eq!(record.duration, 1);
        assert_eq!(record.calories_burned, 0);
        assert_eq!(record.workout_type, "General");
    }

    #[test]
    fn missing_or_zero_plan_uses_defaults() {
        let est = CompletionEstimator::default();
        let w = Workout::single("Anything", Vec::new());
        assert_eq!(est.plan_for(&w), (30, 300));
        let w = w.with_duration(0).with_calories(0);
        assert_eq!(est.plan_for(&w), (30, 300));

        let est = CompletionEstimator::new(PlanDefaults {
            duration_min: 45,
            calories: 400,
        });
        assert_eq!(est.plan_for(&w), (45, 400));
    }

    #[test]
    fn summary_text() {
        let record = CompletionRecord {
            title: "Yoga".into(),
            workout_type: "Flexibility".into(),
            duration: 12,
            calories_burned: 80,
        };
        assert_eq!(
            record.summary(),
            "You burned approximately 80 calories in 12 minutes."
        );
    }

    proptest! {
        #[test]
        fn calories_stay_between_floor_and_plan(
            secs in 0u64..20_000,
            total in 0usize..20,
            completed_raw in 0usize..20,
            planned_minutes in 1u32..120,
            planned_calories in 1u32..2_000,
        ) {
            let completed = completed_raw.min(total);
            let w = Workout::single("P", Vec::new())
                .with_duration(planned_minutes)
                .with_calories(planned_calories);
            let record = CompletionEstimator::default().estimate(&w, totals(secs, completed, total));

            let ratio = if total > 0 { completed as f64 / total as f64 } else { 0.0 };
            let floor = (0.3 * f64::from(planned_calories) * ratio).round() as u32;
            prop_assert!(record.calories_burned >= floor);
            prop_assert!(record.calories_burned <= planned_calories);
            prop_assert!(record.duration >= 1);
        }
    }
}
