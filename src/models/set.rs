use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::FromSqliteRow;
use crate::error::{AppError, Result};

/// One repetition block (reps x weight) within a workout exercise.
#[derive(Debug, Clone, Serialize)]
pub struct Set {
    pub id: i64,
    pub workout_exercise_id: i64,
    pub position: i64,
    pub reps: i64,
    pub weight: f64,
}

impl FromSqliteRow for Set {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            workout_exercise_id: row.get("workout_exercise_id")?,
            position: row.get("position")?,
            reps: row.get("reps")?,
            weight: row.get("weight")?,
        })
    }
}

/// One set as submitted by the client; `order` on the wire maps to the
/// stored `position`.
#[derive(Debug, Deserialize)]
pub struct SetInput {
    pub reps: i64,
    pub weight: f64,
    pub order: i64,
}

/// A validated set ready for insertion.
#[derive(Debug, Clone)]
pub struct NewSet {
    pub position: i64,
    pub reps: i64,
    pub weight: f64,
}

impl SetInput {
    pub fn validate(&self) -> Result<NewSet> {
        if self.reps <= 0 {
            return Err(AppError::Validation(
                "Reps must be a positive integer".to_string(),
            ));
        }
        if self.weight < 0.0 {
            return Err(AppError::Validation(
                "Weight must be 0 or more".to_string(),
            ));
        }
        if self.order < 0 {
            return Err(AppError::Validation(
                "Set order must be 0 or more".to_string(),
            ));
        }
        Ok(NewSet {
            position: self.order,
            reps: self.reps,
            // Weights carry two fractional digits.
            weight: (self.weight * 100.0).round() / 100.0,
        })
    }
}
