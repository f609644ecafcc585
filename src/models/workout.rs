use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::FromSqliteRow;
use crate::error::{AppError, Result};

#[derive(Debug, Clone, Serialize)]
pub struct Workout {
    pub id: i64,
    pub owner_id: String,
    pub name: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl FromSqliteRow for Workout {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            owner_id: row.get("owner_id")?,
            name: row.get("name")?,
            started_at: row.get("started_at")?,
            completed_at: row.get("completed_at")?,
            created_at: row.get("created_at")?,
        })
    }
}

impl Workout {
    /// Human-readable session duration: whole minutes once completed,
    /// "in progress" while completed_at is unset.
    pub fn duration_label(&self) -> String {
        match self.completed_at {
            Some(completed_at) => {
                format!("{} min", (completed_at - self.started_at).num_minutes())
            }
            None => "in progress".to_string(),
        }
    }
}

/// Request body shared by create and update.
#[derive(Debug, Deserialize)]
pub struct WorkoutInput {
    pub name: String,
    pub date: String,
}

impl WorkoutInput {
    /// Checks rules in declaration order and reports the first violation.
    pub fn validate(&self) -> Result<(String, DateTime<Utc>)> {
        if self.name.is_empty() {
            return Err(AppError::Validation("Name is required".to_string()));
        }
        let date = parse_strict_date(&self.date)?;
        Ok((self.name.clone(), start_of_day(date)))
    }
}

/// Parses a date in strict `YYYY-MM-DD` form: four digits, dash, two
/// digits, dash, two digits. Rejects the shorthand forms chrono's parser
/// would otherwise accept.
pub fn parse_strict_date(value: &str) -> Result<NaiveDate> {
    let bytes = value.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| if i == 4 || i == 7 { *b == b'-' } else { b.is_ascii_digit() });
    if !well_formed {
        return Err(AppError::Validation(
            "Must be a valid YYYY-MM-DD date".to_string(),
        ));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Must be a valid YYYY-MM-DD date".to_string()))
}

pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}
