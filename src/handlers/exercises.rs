use axum::{extract::State, Json};

use crate::auth::AuthUser;
use crate::error::Result;
use crate::models::ExerciseRef;
use crate::repositories::ExerciseRepository;

#[derive(Clone)]
pub struct ExercisesState {
    pub exercise_repo: ExerciseRepository,
}

/// The autocomplete list: every known exercise as `{id, name}`.
pub async fn list(
    State(state): State<ExercisesState>,
    _auth_user: AuthUser,
) -> Result<Json<Vec<ExerciseRef>>> {
    let exercises = state.exercise_repo.list_all().await?;
    Ok(Json(exercises))
}
