use std::path::PathBuf;

use clap::Subcommand;
use pulsefit_core::{resolve, Config, WorkoutShape};
use serde_json::json;

#[derive(Subcommand)]
pub enum WorkoutAction {
    /// Show how a workout file resolves into exercises
    Inspect {
        /// Workout JSON file
        file: PathBuf,
        /// Pack item to resolve (packs only)
        #[arg(long, default_value_t = 0)]
        pack_item: usize,
    },
}

pub fn run(action: WorkoutAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        WorkoutAction::Inspect { file, pack_item } => {
            let config = Config::load_or_default();
            let workout = super::load_workout(&file, &config)?;
            let kind = match &workout.shape {
                WorkoutShape::Single { .. } => "single",
                WorkoutShape::Pack { .. } => "pack",
                WorkoutShape::AiPack { .. } => "ai_pack",
            };
            let resolution = resolve(&workout, pack_item);
            // An AI pack with source workouts plays as a pack.
            let pack_item_count = resolution
                .promoted
                .as_ref()
                .unwrap_or(&workout)
                .pack_items()
                .len();
            let out = json!({
                "title": workout.title,
                "kind": kind,
                "pack_item_count": pack_item_count,
                "resolution": resolution,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}
