//! # PulseFit Core Library
//!
//! This library provides the workout session engine behind PulseFit. All
//! logic lives here; the `pulsefit` CLI is a thin layer over it.
//!
//! ## Architecture
//!
//! - **Workouts**: plain workouts, packs of workouts, and AI-generated packs,
//!   normalized from loose JSON into a tagged [`WorkoutShape`]
//! - **Resolver**: flattens any shape into the exercise list being performed
//! - **Session Engine**: a caller-driven state machine; the caller invokes
//!   `tick()` once per second and forwards user commands
//! - **Estimator**: turns elapsed time and completion into a calorie estimate
//! - **Storage**: SQLite workout history and TOML configuration
//!
//! ## Key Components
//!
//! - [`SessionController`]: work/rest/set/pack state machine
//! - [`Countdown`]: one-second phase countdown
//! - [`CompletionEstimator`]: end-of-session record
//! - [`Database`]: workout history persistence
//! - [`Config`]: application configuration management

pub mod error;
pub mod estimator;
pub mod events;
pub mod resolver;
pub mod session;
pub mod storage;
pub mod timer;
pub mod workout;

pub use error::{ConfigError, CoreError, DatabaseError, WorkoutError};
pub use estimator::{CompletionEstimator, CompletionRecord, PlanDefaults, SessionTotals};
pub use events::Event;
pub use resolver::{resolve, Resolution};
pub use session::{
    CollectingHooks, NoopHooks, Phase, SessionController, SessionHooks, SessionState,
    SessionStatus,
};
pub use storage::{Config, Database, DayStats, Stats, WorkoutRow};
pub use timer::{format_clock, Countdown, TickOutcome, Urgency};
pub use workout::{Exercise, Workout, WorkoutDefaults, WorkoutDocument, WorkoutShape};
