use clap::Subcommand;
use pulsefit_core::Database;

#[derive(Subcommand)]
pub enum HistoryAction {
    /// Most recent workouts first
    List {
        /// Maximum number of workouts to show
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Totals across saved workouts
    Stats {
        /// Only count today's workouts
        #[arg(long)]
        today: bool,
    },
}

pub fn run(action: HistoryAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        HistoryAction::List { limit } => {
            let rows = db.history(limit)?;
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        HistoryAction::Stats { today } => {
            let json = if today {
                serde_json::to_string_pretty(&db.stats_today()?)?
            } else {
                serde_json::to_string_pretty(&db.stats_all()?)?
            };
            println!("{json}");
        }
    }
    Ok(())
}
