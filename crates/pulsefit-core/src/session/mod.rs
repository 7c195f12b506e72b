//! Workout session engine.
//!
//! [`SessionController`] drives a timed work/rest cycle over the exercises
//! the resolver produced, tracking sets, completion, skips and pack items.
//! Like the countdown underneath it, the controller is caller-driven:
//! `tick()` once per second, plus the user commands.

mod controller;
mod hooks;
mod state;

pub use controller::SessionController;
pub use hooks::{CollectingHooks, NoopHooks, SessionHooks};
pub use state::{Phase, SessionState, SessionStatus};
