use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::auth::AuthUser;
use crate::error::{AppError, Result};
use crate::models::{
    parse_strict_date, AddExerciseInput, Workout, WorkoutExerciseWithSets, WorkoutInput,
};
use crate::repositories::{ExerciseRepository, WorkoutRepository};

#[derive(Clone)]
pub struct WorkoutsState {
    pub workout_repo: WorkoutRepository,
    pub exercise_repo: ExerciseRepository,
}

#[derive(Deserialize)]
pub struct ListQuery {
    date: Option<String>,
}

#[derive(Serialize)]
pub struct WorkoutSummary {
    pub id: i64,
    pub name: String,
    pub started_at: chrono::DateTime<Utc>,
    pub completed_at: Option<chrono::DateTime<Utc>>,
    pub duration: String,
}

impl From<Workout> for WorkoutSummary {
    fn from(workout: Workout) -> Self {
        let duration = workout.duration_label();
        Self {
            id: workout.id,
            name: workout.name,
            started_at: workout.started_at,
            completed_at: workout.completed_at,
            duration,
        }
    }
}

#[derive(Serialize)]
pub struct WorkoutDetail {
    #[serde(flatten)]
    pub workout: Workout,
    pub duration: String,
    pub exercises: Vec<WorkoutExerciseWithSets>,
}

fn workout_id(id: i64) -> Result<i64> {
    if id <= 0 {
        return Err(AppError::Validation(
            "Workout id must be a positive integer".to_string(),
        ));
    }
    Ok(id)
}

// Handlers

/// The caller's workouts for one calendar day. An invalid or absent
/// `date` query parameter falls back to today.
pub async fn list(
    State(state): State<WorkoutsState>,
    auth_user: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<WorkoutSummary>>> {
    let date = query
        .date
        .as_deref()
        .and_then(|value| parse_strict_date(value).ok())
        .unwrap_or_else(|| Utc::now().date_naive());

    let workouts = state.workout_repo.list_for_date(&auth_user.id, date).await?;
    Ok(Json(workouts.into_iter().map(WorkoutSummary::from).collect()))
}

pub async fn create(
    State(state): State<WorkoutsState>,
    auth_user: AuthUser,
    Json(input): Json<WorkoutInput>,
) -> Result<Response> {
    let (name, started_at) = input.validate()?;

    let workout = state
        .workout_repo
        .create(&auth_user.id, &name, started_at)
        .await?;

    Ok((StatusCode::CREATED, Json(workout)).into_response())
}

pub async fn show(
    State(state): State<WorkoutsState>,
    auth_user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<WorkoutDetail>> {
    let id = workout_id(id)?;

    let workout = state
        .workout_repo
        .find_by_id(&auth_user.id, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Workout not found".to_string()))?;

    let exercises = state.workout_repo.exercises_with_sets(id).await?;

    Ok(Json(WorkoutDetail {
        duration: workout.duration_label(),
        workout,
        exercises,
    }))
}

pub async fn update(
    State(state): State<WorkoutsState>,
    auth_user: AuthUser,
    Path(id): Path<i64>,
    Json(input): Json<WorkoutInput>,
) -> Result<Json<Workout>> {
    let id = workout_id(id)?;
    let (name, started_at) = input.validate()?;

    let workout = state
        .workout_repo
        .update(&auth_user.id, id, &name, started_at)
        .await?
        .ok_or_else(|| AppError::NotFound("Workout not found".to_string()))?;

    Ok(Json(workout))
}

pub async fn delete(
    State(state): State<WorkoutsState>,
    auth_user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Response> {
    let id = workout_id(id)?;

    if !state.workout_repo.delete(&auth_user.id, id).await? {
        return Err(AppError::NotFound("Workout not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT.into_response())
}

pub async fn complete(
    State(state): State<WorkoutsState>,
    auth_user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Workout>> {
    let id = workout_id(id)?;

    let workout = state
        .workout_repo
        .complete(&auth_user.id, id, Utc::now())
        .await?
        .ok_or_else(|| AppError::NotFound("Workout not found".to_string()))?;

    Ok(Json(workout))
}

/// Attaches an exercise with its sets to an owned workout: verify the
/// workout first (abort before any write), then resolve-or-create the
/// exercise, create the link, and bulk-insert the sets.
pub async fn add_exercise(
    State(state): State<WorkoutsState>,
    auth_user: AuthUser,
    Path(id): Path<i64>,
    Json(input): Json<AddExerciseInput>,
) -> Result<Response> {
    let id = workout_id(id)?;
    let (exercise_name, sets) = input.validate()?;

    state
        .workout_repo
        .find_by_id(&auth_user.id, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Workout not found".to_string()))?;

    let exercise = state.exercise_repo.find_or_create(&exercise_name).await?;
    let link = state
        .workout_repo
        .add_exercise_to_workout(id, exercise.id)
        .await?;
    state.workout_repo.add_sets(link.id, sets).await?;

    Ok((StatusCode::CREATED, Json(json!({ "success": true }))).into_response())
}
