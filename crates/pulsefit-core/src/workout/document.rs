//! Loose JSON workout documents.
//!
//! Workouts come from a database row, a bundled catalog, or an AI chat
//! response, so the same field may be missing, `null`, a float, or an object
//! where a list was expected. [`WorkoutDocument`] accepts all of that and
//! [`WorkoutDocument::into_workout`] classifies it into a [`Workout`] once,
//! filling defaults on the way.

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use super::{
    Exercise, Workout, WorkoutShape, DEFAULT_EXERCISE_DURATION_SECS, DEFAULT_LEVEL, DEFAULT_REPS,
    DEFAULT_REST_SECS, DEFAULT_SETS, DEFAULT_WORKOUT_TYPE,
};
use crate::error::WorkoutError;

/// Values used for fields a document leaves out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkoutDefaults {
    pub sets: u32,
    pub exercise_duration: u32,
    pub rest_time: u32,
    pub workout_type: String,
    pub level: String,
}

impl Default for WorkoutDefaults {
    fn default() -> Self {
        Self {
            sets: DEFAULT_SETS,
            exercise_duration: DEFAULT_EXERCISE_DURATION_SECS,
            rest_time: DEFAULT_REST_SECS,
            workout_type: DEFAULT_WORKOUT_TYPE.into(),
            level: DEFAULT_LEVEL.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutDocument {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "type")]
    pub workout_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub calories_burn: Option<f64>,
    #[serde(default, rename = "calories_burned")]
    pub calories_burned: Option<f64>,
    #[serde(default)]
    pub is_pack: Option<bool>,
    #[serde(default)]
    pub pack_items: Option<Vec<Value>>,
    #[serde(default)]
    pub exercises: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExerciseDocument {
    name: String,
    #[serde(default)]
    sets: Option<f64>,
    #[serde(default)]
    reps: Option<f64>,
    #[serde(default)]
    duration: Option<f64>,
    #[serde(default)]
    rest_time: Option<f64>,
    #[serde(default)]
    instructions: Option<Vec<String>>,
    #[serde(default)]
    body_part: Option<String>,
    #[serde(default)]
    target: Option<String>,
    #[serde(default)]
    equipment: Option<String>,
}

impl WorkoutDocument {
    pub fn from_json_str(json: &str) -> Result<Self, WorkoutError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, WorkoutError> {
        let content = std::fs::read_to_string(path).map_err(|source| WorkoutError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// Classify the document into one of the three workout shapes.
    ///
    /// A pack needs `isPack: true` and at least one usable pack item. An AI
    /// pack is an `exercises` object with `isWorkoutPack: true` and a `list`
    /// array. Anything else is a plain workout, with an empty exercise list
    /// when `exercises` is missing or not an array.
    pub fn into_workout(self, defaults: &WorkoutDefaults) -> Workout {
        let title = self.title.unwrap_or_default();

        let pack_items: Vec<Workout> = if self.is_pack == Some(true) {
            self.pack_items
                .unwrap_or_default()
                .into_iter()
                .filter_map(|item| match serde_json::from_value::<WorkoutDocument>(item) {
                    Ok(doc) => Some(doc.into_workout(defaults)),
                    Err(e) => {
                        warn!(workout = %title, error = %e, "skipping unreadable pack item");
                        None
                    }
                })
                .collect()
        } else {
            Vec::new()
        };

        let shape = if !pack_items.is_empty() {
            WorkoutShape::Pack { items: pack_items }
        } else {
            match self.exercises {
                Some(Value::Array(entries)) => WorkoutShape::Single {
                    exercises: parse_exercises(entries, defaults, &title),
                },
                Some(Value::Object(mut descriptor))
                    if descriptor.get("isWorkoutPack") == Some(&Value::Bool(true))
                        && descriptor.get("list").is_some_and(Value::is_array) =>
                {
                    let list = match descriptor.remove("list") {
                        Some(Value::Array(entries)) => parse_exercises(entries, defaults, &title),
                        _ => Vec::new(),
                    };
                    let original_workouts = match descriptor.remove("originalWorkouts") {
                        Some(Value::Array(entries)) => entries
                            .into_iter()
                            .filter_map(|v| serde_json::from_value::<WorkoutDocument>(v).ok())
                            .map(|doc| doc.into_workout(defaults))
                            .collect(),
                        _ => Vec::new(),
                    };
                    WorkoutShape::AiPack {
                        list,
                        original_workouts,
                    }
                }
                None | Some(Value::Null) => WorkoutShape::Single {
                    exercises: Vec::new(),
                },
                Some(_) => {
                    warn!(workout = %title, "exercises field is not a list; treating as empty");
                    WorkoutShape::Single {
                        exercises: Vec::new(),
                    }
                }
            }
        };

        Workout {
            id: self.id.map(id_to_string).unwrap_or_default(),
            title,
            workout_type: self
                .workout_type
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| defaults.workout_type.clone()),
            description: self.description.unwrap_or_default(),
            level: self
                .level
                .filter(|l| !l.is_empty())
                .unwrap_or_else(|| defaults.level.clone()),
            duration: positive(self.duration),
            calories_burn: positive(self.calories_burn).or(positive(self.calories_burned)),
            shape,
        }
    }
}

fn parse_exercises(entries: Vec<Value>, defaults: &WorkoutDefaults, workout: &str) -> Vec<Exercise> {
    entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<ExerciseDocument>(entry) {
            Ok(doc) => Some(doc.into_exercise(defaults)),
            Err(e) => {
                warn!(workout, error = %e, "skipping unreadable exercise entry");
                None
            }
        })
        .collect()
}

impl ExerciseDocument {
    fn into_exercise(self, defaults: &WorkoutDefaults) -> Exercise {
        Exercise {
            name: self.name,
            sets: positive(self.sets).unwrap_or(defaults.sets).max(1),
            reps: positive(self.reps).unwrap_or(DEFAULT_REPS),
            duration: positive(self.duration)
                .unwrap_or(defaults.exercise_duration)
                .max(1),
            rest_time: positive(self.rest_time).unwrap_or(defaults.rest_time).max(1),
            instructions: self.instructions.unwrap_or_default(),
            body_part: self.body_part,
            target: self.target,
            equipment: self.equipment,
        }
    }
}

/// Zero, negative and non-finite numbers count as absent.
fn positive(value: Option<f64>) -> Option<u32> {
    value
        .filter(|n| n.is_finite() && *n >= 0.5)
        .map(|n| n.round().min(u32::MAX as f64) as u32)
}

fn id_to_string(id: Value) -> String {
    match id {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
