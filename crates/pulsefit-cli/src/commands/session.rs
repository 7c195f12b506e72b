use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use clap::Subcommand;
use pulsefit_core::{
    format_clock, CompletionEstimator, Config, Database, Event, Phase, SessionController,
    SessionHooks, Urgency,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;
use tracing::debug;

#[derive(Subcommand)]
pub enum SessionAction {
    /// Run a session in real time, driven by commands on stdin
    Run {
        /// Workout JSON file
        file: PathBuf,
        /// Don't record the workout in history
        #[arg(long)]
        no_save: bool,
    },
    /// Replay a scripted session on a virtual clock, printing events as JSON lines
    Simulate {
        /// Workout JSON file
        file: PathBuf,
        /// Commands, e.g. "p t30 c t10 x s n1 f"
        #[arg(long)]
        script: String,
        /// Record the workout in history
        #[arg(long)]
        save: bool,
    },
}

/// One user command, or a batch of clock ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Toggle,
    CompleteSet,
    CompleteExercise,
    Skip,
    Select(usize),
    Finish,
    Cancel,
    Tick(u64),
}

impl FromStr for Step {
    type Err = String;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let mut chars = token.chars();
        let Some(head) = chars.next() else {
            return Err("empty command".to_string());
        };
        let arg = chars.as_str().trim();
        let number = |what: &str| -> Result<u64, String> {
            arg.parse()
                .map_err(|_| format!("`{token}`: expected {what} after `{head}`"))
        };
        let step = match (head, arg.is_empty()) {
            ('p', true) => Step::Toggle,
            ('c', true) => Step::CompleteSet,
            ('x', true) => Step::CompleteExercise,
            ('s', true) => Step::Skip,
            ('f', true) => Step::Finish,
            ('q', true) => Step::Cancel,
            ('n', _) => Step::Select(number("a pack item index")? as usize),
            ('t', _) => Step::Tick(number("a tick count")?),
            _ => return Err(format!("unknown command `{token}`")),
        };
        Ok(step)
    }
}

fn parse_script(script: &str) -> Result<Vec<Step>, String> {
    script
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .map(str::parse)
        .collect()
}

fn apply<H: SessionHooks>(session: &mut SessionController<H>, step: Step) -> Vec<Event> {
    match step {
        Step::Toggle => session.toggle_pause(),
        Step::CompleteSet => session.complete_set(),
        Step::CompleteExercise => session.complete_exercise_now(),
        Step::Skip => session.skip_exercise(),
        Step::Select(index) => session.select_pack_item(index),
        Step::Finish => session.finish_now(),
        Step::Cancel => session.cancel(),
        Step::Tick(n) => session.advance_ticks(n),
    }
}

pub fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let estimator = CompletionEstimator::new(config.plan_defaults());

    match action {
        SessionAction::Simulate { file, script, save } => {
            let steps = parse_script(&script)?;
            let workout = super::load_workout(&file, &config)?;
            let hooks = if save { Some(Database::open()?) } else { None };
            let mut session = SessionController::with_estimator(workout, estimator, hooks);

            for step in steps {
                if session.is_finished() {
                    break;
                }
                for event in apply(&mut session, step) {
                    println!("{}", serde_json::to_string(&event)?);
                }
            }
            println!("{}", serde_json::to_string(&session.snapshot())?);
        }
        SessionAction::Run { file, no_save } => {
            let workout = super::load_workout(&file, &config)?;
            let hooks = if config.session.auto_save && !no_save {
                Some(Database::open()?)
            } else {
                None
            };
            let mut session = SessionController::with_estimator(workout, estimator, hooks);
            let period = Duration::from_millis(config.session.tick_interval_ms.max(1));

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(run_live(&mut session, period))?;
        }
    }
    Ok(())
}

const HELP: &str = "commands: p pause/resume, c complete set, x complete exercise, \
                    s skip, n <i> pick workout, f finish, q quit";

/// One interval drives the clock. It only ticks while the session runs and
/// restarts on every resume, so a pause never leaves a second ticking.
async fn run_live<H: SessionHooks>(
    session: &mut SessionController<H>,
    period: Duration,
) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    println!("{}", session.workout().title);
    if !session.has_exercises() {
        println!("No exercises in this workout. Use f to finish or q to quit.");
    }
    println!("{HELP}");
    render(session)?;

    while !session.is_finished() {
        let running = !session.state().is_paused();
        tokio::select! {
            _ = interval.tick(), if running => {
                let events = session.tick();
                report(&events);
                render(session)?;
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("stdin closed");
                    report(&session.cancel());
                    break;
                };
                let compact: String = line.split_whitespace().collect();
                if compact.is_empty() {
                    continue;
                }
                if compact == "h" || compact == "?" {
                    println!("{HELP}");
                    continue;
                }
                match compact.parse::<Step>() {
                    Ok(Step::Tick(_)) | Err(_) => println!("{HELP}"),
                    Ok(step) => {
                        let was_paused = session.state().is_paused();
                        let events = apply(session, step);
                        if was_paused && !session.state().is_paused() {
                            interval.reset();
                        }
                        report(&events);
                        render(session)?;
                    }
                }
            }
        }
    }
    Ok(())
}

fn report(events: &[Event]) {
    for event in events {
        if let Some(line) = describe(event) {
            println!("\n{line}");
        }
    }
}

fn describe(event: &Event) -> Option<String> {
    let line = match event {
        Event::SessionStarted { title, .. } => format!("Started {title}"),
        Event::SessionPaused { time_left, .. } => format!("Paused at {}", format_clock(*time_left)),
        Event::SessionResumed { .. } => "Resumed".to_string(),
        Event::RestStarted { rest_secs, .. } => format!("Rest {}", format_clock(*rest_secs)),
        Event::SetStarted { set, of_sets, .. } => format!("Set {set} of {of_sets}"),
        Event::ExerciseCompleted { name, .. } => format!("Completed {name}"),
        Event::ExerciseSkipped { name, .. } => format!("Skipped {name}"),
        Event::ExerciseAdvanced { name, .. } => format!("Next up: {name} (p to start)"),
        Event::PackItemAdvanced { title, .. } => format!("Moving to next workout: {title}"),
        Event::PackItemSelected { title, .. } => format!("Switched to {title}"),
        Event::SessionCompleted { record, .. } => format!("Workout complete! {}", record.summary()),
        Event::SessionCancelled { .. } => "Session cancelled".to_string(),
        Event::PhaseEnded { .. } | Event::StateSnapshot { .. } => return None,
    };
    Some(line)
}

/// Redraw the status line in place.
fn render<H: SessionHooks>(session: &SessionController<H>) -> std::io::Result<()> {
    let Some(exercise) = session.current_exercise() else {
        return Ok(());
    };
    let state = session.state();
    let phase = match state.phase() {
        Phase::Work => "WORK",
        Phase::Rest => "REST",
    };
    let marker = match Urgency::for_time_left(state.time_left()) {
        Urgency::Normal => "",
        Urgency::Warning => " !",
        Urgency::Critical => " !!",
    };
    let paused = if state.is_paused() { " (paused)" } else { "" };
    print!(
        "\r{phase} {} set {}/{} {}{marker}{paused} [{}%]   ",
        exercise.name,
        state.current_set(),
        exercise.sets,
        format_clock(state.time_left()),
        session.progress(),
    );
    std::io::stdout().flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulsefit_core::{CollectingHooks, Exercise, SessionStatus, Workout};

    #[test]
    fn parses_script_tokens() {
        let steps = parse_script("p t30, c x s n1 f q").unwrap();
        assert_eq!(
            steps,
            vec![
                Step::Toggle,
                Step::Tick(30),
                Step::CompleteSet,
                Step::CompleteExercise,
                Step::Skip,
                Step::Select(1),
                Step::Finish,
                Step::Cancel,
            ]
        );
    }

    #[test]
    fn rejects_bad_tokens() {
        assert!(parse_script("p z").is_err());
        assert!(parse_script("t").is_err());
        assert!(parse_script("nx").is_err());
        assert!(parse_script("pp").is_err());
        assert!(parse_script("").unwrap().is_empty());
    }

    #[test]
    fn live_commands_accept_a_spaced_index() {
        let compact: String = "n 2".split_whitespace().collect();
        assert_eq!(compact.parse::<Step>(), Ok(Step::Select(2)));
    }

    #[test]
    fn apply_drives_the_controller() {
        let workout = Workout::single(
            "Core",
            vec![Exercise::new("Plank").with_sets(1).with_duration(5)],
        );
        let mut session = SessionController::new(workout, CollectingHooks::default());
        for step in parse_script("p t3 x").unwrap() {
            apply(&mut session, step);
        }
        assert_eq!(session.status(), SessionStatus::Completed);
        assert_eq!(session.state().total_time_elapsed(), 3);
        assert_eq!(session.hooks().completed.len(), 1);
    }

    #[test]
    fn render_succeeds_with_and_without_exercises() {
        let empty = SessionController::detached(Workout::single("Empty", Vec::new()));
        assert!(render(&empty).is_ok());

        let workout = Workout::single("Core", vec![Exercise::new("Plank")]);
        let mut session = SessionController::detached(workout);
        session.start();
        assert!(render(&session).is_ok());
    }

    #[test]
    fn describes_user_facing_events_only() {
        let at = chrono::Utc::now();
        let advanced = Event::PackItemAdvanced {
            pack_item_index: 1,
            title: "Lower".into(),
            at,
        };
        assert_eq!(
            describe(&advanced).as_deref(),
            Some("Moving to next workout: Lower")
        );
        let ended = Event::PhaseEnded {
            phase: Phase::Work,
            exercise_index: 0,
            set: 1,
            at,
        };
        assert!(describe(&ended).is_none());
    }
}
