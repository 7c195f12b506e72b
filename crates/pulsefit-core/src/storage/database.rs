//! SQLite-based workout history.
//!
//! Provides persistent storage for:
//! - Completed workout records
//! - History listing and aggregate statistics

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::data_dir;
use crate::error::{CoreError, DatabaseError};
use crate::estimator::CompletionRecord;
use crate::session::SessionHooks;

/// One saved workout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutRow {
    pub id: i64,
    pub title: String,
    #[serde(rename = "type")]
    pub workout_type: String,
    pub duration: u32,
    pub calories_burned: u32,
    pub date: NaiveDate,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Stats {
    pub total_workouts: u64,
    pub total_minutes: u64,
    pub total_calories: u64,
    pub today_workouts: u64,
    pub today_minutes: u64,
    pub today_calories: u64,
}

/// Totals for a single day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayStats {
    pub date: NaiveDate,
    pub workouts: u64,
    pub minutes: u64,
    pub calories: u64,
}

/// SQLite database for workout history.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data_dir>/pulsefit.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the data directory or database cannot be opened.
    pub fn open() -> Result<Self, CoreError> {
        let path = data_dir()?.join("pulsefit.db");
        Ok(Self::open_at(&path)?)
    }

    pub fn open_at(path: &Path) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS workouts (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                title           TEXT NOT NULL,
                type            TEXT NOT NULL,
                duration        INTEGER NOT NULL,
                calories_burned INTEGER NOT NULL,
                date            TEXT NOT NULL,
                completed_at    TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_workouts_date ON workouts(date);
            CREATE INDEX IF NOT EXISTS idx_workouts_completed_at ON workouts(completed_at);",
        )?;
        Ok(())
    }

    /// Insert a completed workout. The `date` column is the UTC day of
    /// `completed_at`.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub fn record_completion(
        &self,
        record: &CompletionRecord,
        completed_at: DateTime<Utc>,
    ) -> Result<i64, DatabaseError> {
        self.conn.execute(
            "INSERT INTO workouts (title, type, duration, calories_burned, date, completed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                record.title,
                record.workout_type,
                record.duration,
                record.calories_burned,
                completed_at.date_naive().format("%Y-%m-%d").to_string(),
                completed_at.to_rfc3339(),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!(id, title = %record.title, "workout saved");
        Ok(id)
    }

    /// Most recent first.
    pub fn history(&self, limit: usize) -> Result<Vec<WorkoutRow>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, type, duration, calories_burned, date, completed_at
             FROM workouts
             ORDER BY completed_at DESC, id DESC
             LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, u32>(3)?,
                row.get::<_, u32>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, String>(6)?,
            ))
        })?;

        let mut out = Vec::new();
        for row in rows {
            let (id, title, workout_type, duration, calories_burned, date, completed_at) = row?;
            let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                .map_err(|e| DatabaseError::QueryFailed(format!("bad date '{date}': {e}")))?;
            let completed_at = DateTime::parse_from_rfc3339(&completed_at)
                .map_err(|e| DatabaseError::QueryFailed(format!("bad timestamp '{completed_at}': {e}")))?
                .with_timezone(&Utc);
            out.push(WorkoutRow {
                id,
                title,
                workout_type,
                duration,
                calories_burned,
                date,
                completed_at,
            });
        }
        Ok(out)
    }

    pub fn stats_today(&self) -> Result<DayStats, DatabaseError> {
        self.stats_for_day(Utc::now().date_naive())
    }

    /// Totals for one UTC day.
    pub fn stats_for_day(&self, date: NaiveDate) -> Result<DayStats, DatabaseError> {
        let (workouts, minutes, calories) = self.totals_on(date)?;
        Ok(DayStats {
            date,
            workouts,
            minutes,
            calories,
        })
    }

    pub fn stats_all(&self) -> Result<Stats, DatabaseError> {
        let (total_workouts, total_minutes, total_calories) = self.conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(duration), 0), COALESCE(SUM(calories_burned), 0)
             FROM workouts",
            [],
            |row| Ok((row.get::<_, u64>(0)?, row.get::<_, u64>(1)?, row.get::<_, u64>(2)?)),
        )?;
        let (today_workouts, today_minutes, today_calories) =
            self.totals_on(Utc::now().date_naive())?;

        Ok(Stats {
            total_workouts,
            total_minutes,
            total_calories,
            today_workouts,
            today_minutes,
            today_calories,
        })
    }

    fn totals_on(&self, day: NaiveDate) -> Result<(u64, u64, u64), DatabaseError> {
        Ok(self.conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(duration), 0), COALESCE(SUM(calories_burned), 0)
             FROM workouts
             WHERE date = ?1",
            params![day.format("%Y-%m-%d").to_string()],
            |row| Ok((row.get::<_, u64>(0)?, row.get::<_, u64>(1)?, row.get::<_, u64>(2)?)),
        )?)
    }
}

/// Saving is best effort: a failed insert is logged, the session still
/// completes.
impl SessionHooks for Database {
    fn on_complete(&mut self, record: &CompletionRecord) {
        if let Err(e) = self.record_completion(record, Utc::now()) {
            warn!(title = %record.title, error = %e, "failed to save workout");
        }
    }
}
