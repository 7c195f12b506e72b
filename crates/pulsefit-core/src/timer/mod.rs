mod countdown;
mod display;

pub use countdown::{Countdown, TickOutcome};
pub use display::{format_clock, Urgency};
