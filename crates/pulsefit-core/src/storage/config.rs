//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Defaults for workout documents that leave fields out
//! - Planned duration and calories used by the completion estimator
//! - Session runner behaviour (auto-save, tick period)
//!
//! Configuration is stored at `<data_dir>/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;
use crate::estimator::{PlanDefaults, DEFAULT_PLANNED_CALORIES, DEFAULT_PLANNED_DURATION_MIN};
use crate::workout::{
    WorkoutDefaults, DEFAULT_EXERCISE_DURATION_SECS, DEFAULT_LEVEL, DEFAULT_REST_SECS,
    DEFAULT_SETS, DEFAULT_WORKOUT_TYPE,
};

/// Fallback values for workouts and exercises.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_planned_duration_min")]
    pub planned_duration_min: u32,
    #[serde(default = "default_planned_calories")]
    pub planned_calories: u32,
    #[serde(default = "default_sets")]
    pub sets: u32,
    #[serde(default = "default_exercise_duration_secs")]
    pub exercise_duration_secs: u32,
    #[serde(default = "default_rest_secs")]
    pub rest_secs: u32,
    #[serde(default = "default_workout_type")]
    pub workout_type: String,
    #[serde(default = "default_level")]
    pub level: String,
}

/// Session runner configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Insert completed workouts into the history database.
    #[serde(default = "default_true")]
    pub auto_save: bool,
    /// Real-time tick period. One tick is always one second of workout time.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

fn default_planned_duration_min() -> u32 {
    DEFAULT_PLANNED_DURATION_MIN
}
fn default_planned_calories() -> u32 {
    DEFAULT_PLANNED_CALORIES
}
fn default_sets() -> u32 {
    DEFAULT_SETS
}
fn default_exercise_duration_secs() -> u32 {
    DEFAULT_EXERCISE_DURATION_SECS
}
fn default_rest_secs() -> u32 {
    DEFAULT_REST_SECS
}
fn default_workout_type() -> String {
    DEFAULT_WORKOUT_TYPE.into()
}
fn default_level() -> String {
    DEFAULT_LEVEL.into()
}
fn default_true() -> bool {
    true
}
fn default_tick_interval_ms() -> u64 {
    1000
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            planned_duration_min: default_planned_duration_min(),
            planned_calories: default_planned_calories(),
            sets: default_sets(),
            exercise_duration_secs: default_exercise_duration_secs(),
            rest_secs: default_rest_secs(),
            workout_type: default_workout_type(),
            level: default_level(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            auto_save: true,
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(format!("'{value}' is not a bool: {e}")))?,
                    ),
                    serde_json::Value::Number(_) => serde_json::Value::Number(
                        value
                            .parse::<u64>()
                            .map_err(|e| invalid(format!("'{value}' is not a whole number: {e}")))?
                            .into(),
                    ),
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(invalid("cannot replace a whole section".into()));
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing defaults on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key, in memory only.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value has the wrong type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    pub fn workout_defaults(&self) -> WorkoutDefaults {
        WorkoutDefaults {
            sets: self.defaults.sets.max(1),
            exercise_duration: self.defaults.exercise_duration_secs.max(1),
            rest_time: self.defaults.rest_secs.max(1),
            workout_type: self.defaults.workout_type.clone(),
            level: self.defaults.level.clone(),
        }
    }

    pub fn plan_defaults(&self) -> PlanDefaults {
        PlanDefaults {
            duration_min: self.defaults.planned_duration_min.max(1),
            calories: self.defaults.planned_calories,
        }
    }
}
