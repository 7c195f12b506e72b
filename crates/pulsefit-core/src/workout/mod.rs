//! Workout definitions.
//!
//! A workout arrives in one of three shapes: a plain list of exercises, a
//! pack of child workouts, or an AI-generated pack descriptor. [`WorkoutShape`]
//! makes that explicit so consumers match on the variant instead of sniffing
//! fields. The loose JSON form is handled in [`document`].

mod document;

pub use document::{WorkoutDefaults, WorkoutDocument};

use serde::{Deserialize, Serialize};

pub const DEFAULT_SETS: u32 = 3;
pub const DEFAULT_REPS: u32 = 10;
pub const DEFAULT_EXERCISE_DURATION_SECS: u32 = 60;
pub const DEFAULT_REST_SECS: u32 = 60;
pub const DEFAULT_WORKOUT_TYPE: &str = "General";
pub const DEFAULT_LEVEL: &str = "beginner";

/// A single movement to be performed.
///
/// `name` is the identity key within a workout: completion and skip tracking
/// are keyed by it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub name: String,
    pub sets: u32,
    /// Advisory only; the engine never counts reps.
    pub reps: u32,
    /// Seconds of active work per set.
    pub duration: u32,
    /// Seconds of rest between sets.
    pub rest_time: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub instructions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_part: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment: Option<String>,
}

impl Exercise {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sets: DEFAULT_SETS,
            reps: DEFAULT_REPS,
            duration: DEFAULT_EXERCISE_DURATION_SECS,
            rest_time: DEFAULT_REST_SECS,
            instructions: Vec::new(),
            body_part: None,
            target: None,
            equipment: None,
        }
    }

    /// Sets are clamped to at least one.
    pub fn with_sets(mut self, sets: u32) -> Self {
        self.sets = sets.max(1);
        self
    }

    pub fn with_reps(mut self, reps: u32) -> Self {
        self.reps = reps.max(1);
        self
    }

    /// Work time is clamped to at least one second so a phase always ends.
    pub fn with_duration(mut self, secs: u32) -> Self {
        self.duration = secs.max(1);
        self
    }

    pub fn with_rest(mut self, secs: u32) -> Self {
        self.rest_time = secs.max(1);
        self
    }

    pub fn with_instructions<I, S>(mut self, steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.instructions = steps.into_iter().map(Into::into).collect();
        self
    }
}

/// How a workout carries its exercises.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WorkoutShape {
    /// An ordered list of exercises.
    Single { exercises: Vec<Exercise> },
    /// Child workouts performed in sequence.
    Pack { items: Vec<Workout> },
    /// A flat AI-generated list, optionally remembering the workouts it was
    /// assembled from.
    AiPack {
        list: Vec<Exercise>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        original_workouts: Vec<Workout>,
    },
}

/// An ordered workout definition. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub workout_type: String,
    pub description: String,
    pub level: String,
    /// Planned minutes. `None` falls back to the configured default.
    pub duration: Option<u32>,
    /// Planned calories for full completion.
    pub calories_burn: Option<u32>,
    pub shape: WorkoutShape,
}

impl Workout {
    fn with_shape(title: impl Into<String>, shape: WorkoutShape) -> Self {
        Self {
            id: String::new(),
            title: title.into(),
            workout_type: DEFAULT_WORKOUT_TYPE.into(),
            description: String::new(),
            level: DEFAULT_LEVEL.into(),
            duration: None,
            calories_burn: None,
            shape,
        }
    }

    pub fn single(title: impl Into<String>, exercises: Vec<Exercise>) -> Self {
        Self::with_shape(title, WorkoutShape::Single { exercises })
    }

    /// A pack with no items is a plain workout with no exercises.
    pub fn pack(title: impl Into<String>, items: Vec<Workout>) -> Self {
        if items.is_empty() {
            return Self::single(title, Vec::new());
        }
        Self::with_shape(title, WorkoutShape::Pack { items })
    }

    pub fn ai_pack(
        title: impl Into<String>,
        list: Vec<Exercise>,
        original_workouts: Vec<Workout>,
    ) -> Self {
        Self::with_shape(
            title,
            WorkoutShape::AiPack {
                list,
                original_workouts,
            },
        )
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_type(mut self, workout_type: impl Into<String>) -> Self {
        self.workout_type = workout_type.into();
        self
    }

    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration = Some(minutes);
        self
    }

    pub fn with_calories(mut self, calories: u32) -> Self {
        self.calories_burn = Some(calories);
        self
    }

    /// Exercises held directly by this workout. Packs hold none of their own.
    pub fn own_exercises(&self) -> &[Exercise] {
        match &self.shape {
            WorkoutShape::Single { exercises } => exercises,
            WorkoutShape::AiPack { list, .. } => list,
            WorkoutShape::Pack { .. } => &[],
        }
    }

    /// Child workouts when this is a pack.
    pub fn pack_items(&self) -> &[Workout] {
        match &self.shape {
            WorkoutShape::Pack { items } => items,
            _ => &[],
        }
    }

    pub fn is_pack(&self) -> bool {
        !self.pack_items().is_empty()
    }

    pub fn is_ai_pack(&self) -> bool {
        matches!(self.shape, WorkoutShape::AiPack { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exercise_builders_clamp_to_positive() {
        let ex = Exercise::new("Plank")
            .with_sets(0)
            .with_duration(0)
            .with_rest(0);
        assert_eq!(ex.sets, 1);
        assert_eq!(ex.duration, 1);
        assert_eq!(ex.rest_time, 1);
    }

    #[test]
    fn exercise_defaults() {
        let ex = Exercise::new("Squats");
        assert_eq!(ex.sets, 3);
        assert_eq!(ex.duration, 60);
        assert_eq!(ex.rest_time, 60);
        assert!(ex.instructions.is_empty());
    }

    #[test]
    fn instructions_serialize_in_order() {
        let ex = Exercise::new("Squats").with_instructions(["Feet wide", "Sit back"]);
        let json = serde_json::to_value(&ex).unwrap();
        assert_eq!(json["instructions"][1], "Sit back");
        assert_eq!(json["restTime"], 60);
    }

    #[test]
    fn empty_pack_collapses_to_single() {
        let w = Workout::pack("Empty", Vec::new());
        assert!(!w.is_pack());
        assert!(w.own_exercises().is_empty());
    }

    #[test]
    fn pack_has_no_own_exercises() {
        let w = Workout::pack(
            "Combo",
            vec![Workout::single("A", vec![Exercise::new("Lunges")])],
        );
        assert!(w.is_pack());
        assert!(w.own_exercises().is_empty());
        assert_eq!(w.pack_items().len(), 1);
    }

    #[test]
    fn workout_serializes_type_field() {
        let w = Workout::single("Core", vec![]).with_type("Strength");
        let json = serde_json::to_value(&w).unwrap();
        assert_eq!(json["type"], "Strength");
        assert_eq!(json["shape"]["kind"], "single");
    }
}
