pub mod config;
pub mod history;
pub mod session;
pub mod workout;

use std::path::Path;

use pulsefit_core::{Config, Workout, WorkoutDocument};

/// Read a workout file, filling gaps from the configured defaults.
pub fn load_workout(path: &Path, config: &Config) -> Result<Workout, Box<dyn std::error::Error>> {
    let document = WorkoutDocument::load(path)?;
    Ok(document.into_workout(&config.workout_defaults()))
}
