use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rusqlite::OptionalExtension;

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{
    start_of_day, FromSqliteRow, NewSet, Set, Workout, WorkoutExercise, WorkoutExerciseWithSets,
};

/// Per-user workout storage. Every operation that touches a workout row
/// takes the owner's identifier explicitly; an ownership mismatch looks
/// exactly like a missing row to the caller.
#[derive(Clone)]
pub struct WorkoutRepository {
    pool: DbPool,
}

impl WorkoutRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        owner_id: &str,
        name: &str,
        started_at: DateTime<Utc>,
    ) -> Result<Workout> {
        let pool = self.pool.clone();
        let owner_id = owner_id.to_string();
        let name = name.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let now = Utc::now();
            conn.execute(
                "INSERT INTO workouts (owner_id, name, started_at, completed_at, created_at)
                 VALUES (?, ?, ?, NULL, ?)",
                rusqlite::params![owner_id, name, started_at, now],
            )?;
            Ok(Workout {
                id: conn.last_insert_rowid(),
                owner_id,
                name,
                started_at,
                completed_at: None,
                created_at: now,
            })
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_by_id(&self, owner_id: &str, id: i64) -> Result<Option<Workout>> {
        let pool = self.pool.clone();
        let owner_id = owner_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            find_owned(&conn, &owner_id, id)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Updates name and start date on an owned workout. Returns the
    /// updated row, or `None` when the scoped UPDATE affected nothing.
    pub async fn update(
        &self,
        owner_id: &str,
        id: i64,
        name: &str,
        started_at: DateTime<Utc>,
    ) -> Result<Option<Workout>> {
        let pool = self.pool.clone();
        let owner_id = owner_id.to_string();
        let name = name.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let rows = conn.execute(
                "UPDATE workouts SET name = ?, started_at = ? WHERE id = ? AND owner_id = ?",
                rusqlite::params![name, started_at, id, owner_id],
            )?;
            if rows == 0 {
                return Ok(None);
            }
            find_owned(&conn, &owner_id, id)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Workouts whose `started_at` falls in the half-open interval
    /// `[start_of_day(date), start_of_day(date) + 1 day)`, ascending.
    pub async fn list_for_date(&self, owner_id: &str, date: NaiveDate) -> Result<Vec<Workout>> {
        let pool = self.pool.clone();
        let owner_id = owner_id.to_string();
        let day_start = start_of_day(date);
        let day_end = day_start + Duration::days(1);
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT * FROM workouts
                 WHERE owner_id = ? AND started_at >= ? AND started_at < ?
                 ORDER BY started_at ASC",
            )?;
            let workouts = stmt
                .query_map(
                    rusqlite::params![owner_id, day_start, day_end],
                    Workout::from_row,
                )?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(workouts)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Deletes an owned workout; links and sets go with it via cascade.
    pub async fn delete(&self, owner_id: &str, id: i64) -> Result<bool> {
        let pool = self.pool.clone();
        let owner_id = owner_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let rows = conn.execute(
                "DELETE FROM workouts WHERE id = ? AND owner_id = ?",
                rusqlite::params![id, owner_id],
            )?;
            Ok(rows > 0)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Marks an owned workout completed. Unconditional field update, no
    /// state-transition checks.
    pub async fn complete(
        &self,
        owner_id: &str,
        id: i64,
        completed_at: DateTime<Utc>,
    ) -> Result<Option<Workout>> {
        let pool = self.pool.clone();
        let owner_id = owner_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let rows = conn.execute(
                "UPDATE workouts SET completed_at = ? WHERE id = ? AND owner_id = ?",
                rusqlite::params![completed_at, id, owner_id],
            )?;
            if rows == 0 {
                return Ok(None);
            }
            find_owned(&conn, &owner_id, id)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Appends an exercise link at the next position. The max+1 read and
    /// the insert happen in one statement, so concurrent appends to the
    /// same workout cannot produce duplicate positions.
    pub async fn add_exercise_to_workout(
        &self,
        workout_id: i64,
        exercise_id: i64,
    ) -> Result<WorkoutExercise> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let now = Utc::now();
            conn.execute(
                "INSERT INTO workout_exercises (workout_id, exercise_id, position, created_at)
                 SELECT ?1, ?2, COALESCE(MAX(position) + 1, 0), ?3
                 FROM workout_exercises WHERE workout_id = ?1",
                rusqlite::params![workout_id, exercise_id, now],
            )?;
            let id = conn.last_insert_rowid();
            let position = conn.query_row(
                "SELECT position FROM workout_exercises WHERE id = ?",
                [id],
                |row| row.get(0),
            )?;
            Ok(WorkoutExercise {
                id,
                workout_id,
                exercise_id,
                position,
            })
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Bulk-inserts sets for a link inside one transaction, carrying the
    /// caller-supplied positions.
    pub async fn add_sets(&self, workout_exercise_id: i64, sets: Vec<NewSet>) -> Result<Vec<Set>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            let tx = conn.transaction()?;
            let now = Utc::now();
            let mut created = Vec::with_capacity(sets.len());
            for set in &sets {
                tx.execute(
                    "INSERT INTO sets (workout_exercise_id, position, reps, weight, created_at)
                     VALUES (?, ?, ?, ?, ?)",
                    rusqlite::params![workout_exercise_id, set.position, set.reps, set.weight, now],
                )?;
                created.push(Set {
                    id: tx.last_insert_rowid(),
                    workout_exercise_id,
                    position: set.position,
                    reps: set.reps,
                    weight: set.weight,
                });
            }
            tx.commit()?;
            Ok(created)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// All exercise links for a workout ordered by position, each with
    /// its exercise name and ordered sets. Two queries, grouped in memory
    /// by link id. A workout with no links yields an empty vec.
    pub async fn exercises_with_sets(
        &self,
        workout_id: i64,
    ) -> Result<Vec<WorkoutExerciseWithSets>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;

            let mut stmt = conn.prepare(
                "SELECT we.id, we.exercise_id, e.name AS exercise_name, we.position
                 FROM workout_exercises we
                 JOIN exercises e ON e.id = we.exercise_id
                 WHERE we.workout_id = ?
                 ORDER BY we.position",
            )?;
            let links = stmt
                .query_map([workout_id], |row| {
                    Ok((
                        row.get::<_, i64>("id")?,
                        row.get::<_, i64>("exercise_id")?,
                        row.get::<_, String>("exercise_name")?,
                        row.get::<_, i64>("position")?,
                    ))
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            let mut stmt = conn.prepare(
                "SELECT s.id, s.workout_exercise_id, s.position, s.reps, s.weight
                 FROM sets s
                 JOIN workout_exercises we ON we.id = s.workout_exercise_id
                 WHERE we.workout_id = ?
                 ORDER BY s.position",
            )?;
            let sets = stmt
                .query_map([workout_id], Set::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            let mut sets_by_link: HashMap<i64, Vec<Set>> = HashMap::new();
            for set in sets {
                sets_by_link
                    .entry(set.workout_exercise_id)
                    .or_default()
                    .push(set);
            }

            Ok(links
                .into_iter()
                .map(|(id, exercise_id, exercise_name, position)| WorkoutExerciseWithSets {
                    id,
                    exercise_id,
                    exercise_name,
                    position,
                    sets: sets_by_link.remove(&id).unwrap_or_default(),
                })
                .collect())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}

fn find_owned(conn: &rusqlite::Connection, owner_id: &str, id: i64) -> Result<Option<Workout>> {
    let mut stmt = conn.prepare("SELECT * FROM workouts WHERE id = ? AND owner_id = ?")?;
    let result = stmt
        .query_row(rusqlite::params![id, owner_id], Workout::from_row)
        .optional()?;
    Ok(result)
}
