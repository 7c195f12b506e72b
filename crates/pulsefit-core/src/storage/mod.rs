mod config;
pub mod database;

pub use config::{Config, DefaultsConfig, SessionConfig};
pub use database::{Database, DayStats, Stats, WorkoutRow};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the data directory, creating it if needed.
///
/// `PULSEFIT_DATA_DIR` wins when set. Otherwise `~/.config/pulsefit`, or
/// `~/.config/pulsefit-dev` with `PULSEFIT_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("PULSEFIT_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("PULSEFIT_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("pulsefit-dev")
            } else {
                base_dir.join("pulsefit")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}
