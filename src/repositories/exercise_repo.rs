use chrono::Utc;
use rusqlite::OptionalExtension;

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{Exercise, ExerciseRef, FromSqliteRow};

#[derive(Clone)]
pub struct ExerciseRepository {
    pool: DbPool,
}

impl ExerciseRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// All exercises in insertion order, projected to what the
    /// autocomplete list needs. The reference table stays small enough
    /// that pagination is not worth it.
    pub async fn list_all(&self) -> Result<Vec<ExerciseRef>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT id, name FROM exercises ORDER BY id")?;
            let exercises = stmt
                .query_map([], |row| {
                    Ok(ExerciseRef {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(exercises)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Returns the exercise matching `name` case-insensitively, creating
    /// it with the trimmed original casing when it does not exist yet.
    pub async fn find_or_create(&self, name: &str) -> Result<Exercise> {
        let pool = self.pool.clone();
        let name = name.trim().to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;

            if let Some(existing) = find_by_name(&conn, &name)? {
                return Ok(existing);
            }

            let now = Utc::now();
            match conn.execute(
                "INSERT INTO exercises (name, created_at, updated_at) VALUES (?, ?, ?)",
                rusqlite::params![name, now, now],
            ) {
                Ok(_) => Ok(Exercise {
                    id: conn.last_insert_rowid(),
                    name,
                    created_at: now,
                    updated_at: now,
                }),
                // Unique violation: a concurrent caller created the row
                // between our lookup and the insert. Return theirs.
                Err(rusqlite::Error::SqliteFailure(e, _))
                    if e.code == rusqlite::ErrorCode::ConstraintViolation =>
                {
                    find_by_name(&conn, &name)?.ok_or_else(|| {
                        AppError::Internal(format!(
                            "exercise {name:?} missing after unique conflict"
                        ))
                    })
                }
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}

fn find_by_name(conn: &rusqlite::Connection, name: &str) -> Result<Option<Exercise>> {
    let mut stmt = conn.prepare("SELECT * FROM exercises WHERE name = ? COLLATE NOCASE")?;
    let result = stmt.query_row([name], Exercise::from_row).optional()?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;
    use crate::migrations::run_migrations_for_tests;

    fn setup_test_db() -> DbPool {
        let pool = create_memory_pool().expect("Failed to create test database");
        run_migrations_for_tests(&pool).expect("Failed to run migrations");
        pool
    }

    #[tokio::test]
    async fn test_find_or_create_creates_new_exercise() {
        let pool = setup_test_db();
        let repo = ExerciseRepository::new(pool);

        let exercise = repo.find_or_create("Bench Press").await.unwrap();

        assert_eq!(exercise.name, "Bench Press");
        assert!(exercise.id > 0);
    }

    #[tokio::test]
    async fn test_find_or_create_is_case_and_whitespace_insensitive() {
        let pool = setup_test_db();
        let repo = ExerciseRepository::new(pool);

        let first = repo.find_or_create("Bench Press").await.unwrap();
        let second = repo.find_or_create("bench press ").await.unwrap();

        assert_eq!(first.id, second.id);
        // Original casing wins
        assert_eq!(second.name, "Bench Press");
    }

    #[tokio::test]
    async fn test_find_or_create_trims_before_storing() {
        let pool = setup_test_db();
        let repo = ExerciseRepository::new(pool);

        let exercise = repo.find_or_create("  Overhead Press  ").await.unwrap();

        assert_eq!(exercise.name, "Overhead Press");
    }

    #[tokio::test]
    async fn test_list_all_in_insertion_order() {
        let pool = setup_test_db();
        let repo = ExerciseRepository::new(pool);

        repo.find_or_create("Squat").await.unwrap();
        repo.find_or_create("Bench Press").await.unwrap();
        repo.find_or_create("Deadlift").await.unwrap();

        let names: Vec<String> = repo
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();

        assert_eq!(names, vec!["Squat", "Bench Press", "Deadlift"]);
    }

    #[tokio::test]
    async fn test_list_all_empty_table() {
        let pool = setup_test_db();
        let repo = ExerciseRepository::new(pool);

        assert!(repo.list_all().await.unwrap().is_empty());
    }
}
