//! Workout resolver.
//!
//! Turns any [`Workout`] shape plus the active pack item index into one flat
//! exercise list, so the session controller never branches on shape.
//! The input is never modified; an AI pack that remembers its source
//! workouts comes back as a `promoted` pack the caller can keep using.

use serde::Serialize;

use crate::estimator::DEFAULT_PLANNED_CALORIES;
use crate::workout::{Exercise, Workout, WorkoutShape};

/// Output of [`resolve`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    /// The workout whose exercises are being performed right now.
    pub active_workout: Workout,
    /// Always a flat list, possibly empty.
    pub exercises: Vec<Exercise>,
    /// Set when an AI pack carried its original workouts: the same workout
    /// reshaped as a pack over them, for advancing across pack items later.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promoted: Option<Workout>,
}

pub fn resolve(workout: &Workout, active_pack_item_index: usize) -> Resolution {
    match &workout.shape {
        WorkoutShape::Pack { items } => {
            let mut active = items
                .get(active_pack_item_index)
                .unwrap_or(workout)
                .clone();
            active.calories_burn = Some(active.calories_burn.unwrap_or(DEFAULT_PLANNED_CALORIES));
            let exercises = match &active.shape {
                WorkoutShape::Single { exercises } => exercises.clone(),
                _ => Vec::new(),
            };
            Resolution {
                active_workout: active,
                exercises,
                promoted: None,
            }
        }
        WorkoutShape::AiPack {
            list,
            original_workouts,
        } => {
            let promoted = (!original_workouts.is_empty()).then(|| Workout {
                shape: WorkoutShape::Pack {
                    items: original_workouts.clone(),
                },
                ..workout.clone()
            });
            Resolution {
                active_workout: workout.clone(),
                exercises: list.clone(),
                promoted,
            }
        }
        WorkoutShape::Single { exercises } => Resolution {
            active_workout: workout.clone(),
            exercises: exercises.clone(),
            promoted: None,
        },
    }
}
