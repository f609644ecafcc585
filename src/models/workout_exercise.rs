use serde::{Deserialize, Serialize};

use super::{NewSet, Set, SetInput};
use crate::error::{AppError, Result};

/// An ordered occurrence of an exercise within a specific workout.
/// The same exercise may appear more than once as distinct rows.
#[derive(Debug, Clone, Serialize)]
pub struct WorkoutExercise {
    pub id: i64,
    pub workout_id: i64,
    pub exercise_id: i64,
    pub position: i64,
}

/// A workout-exercise link annotated with its exercise name and the
/// ordered sets logged against it.
#[derive(Debug, Clone, Serialize)]
pub struct WorkoutExerciseWithSets {
    pub id: i64,
    pub exercise_id: i64,
    pub exercise_name: String,
    pub position: i64,
    pub sets: Vec<Set>,
}

/// Request body for attaching an exercise (with its sets) to a workout.
#[derive(Debug, Deserialize)]
pub struct AddExerciseInput {
    pub exercise_name: String,
    pub sets: Vec<SetInput>,
}

impl AddExerciseInput {
    /// Checks rules in declaration order and reports the first violation.
    pub fn validate(&self) -> Result<(String, Vec<NewSet>)> {
        let name = self.exercise_name.trim();
        if name.is_empty() {
            return Err(AppError::Validation(
                "Exercise name is required".to_string(),
            ));
        }
        if self.sets.is_empty() {
            return Err(AppError::Validation(
                "At least one set is required".to_string(),
            ));
        }
        let sets = self
            .sets
            .iter()
            .map(SetInput::validate)
            .collect::<Result<Vec<_>>>()?;
        Ok((name.to_string(), sets))
    }
}
