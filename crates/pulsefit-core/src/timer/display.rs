//! Countdown presentation helpers.

use serde::{Deserialize, Serialize};

/// Seconds as `m:ss`.
pub fn format_clock(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// How close the current phase is to ending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Normal,
    /// Ten seconds or less.
    Warning,
    /// Three seconds or less.
    Critical,
}

impl Urgency {
    pub fn for_time_left(secs: u32) -> Self {
        match secs {
            0..=3 => Urgency::Critical,
            4..=10 => Urgency::Warning,
            _ => Urgency::Normal,
        }
    }
}
