use axum::{
    routing::{get, post},
    Extension, Router,
};

use crate::auth::SharedIdentityProvider;
use crate::handlers::{exercises, health, workouts};

pub fn create_router(
    workouts_state: workouts::WorkoutsState,
    exercises_state: exercises::ExercisesState,
    identity_provider: SharedIdentityProvider,
) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        // Workout routes
        .route("/workouts", get(workouts::list).post(workouts::create))
        .route(
            "/workouts/{id}",
            get(workouts::show)
                .put(workouts::update)
                .delete(workouts::delete),
        )
        .route("/workouts/{id}/complete", post(workouts::complete))
        .route("/workouts/{id}/exercises", post(workouts::add_exercise))
        .with_state(workouts_state)
        // Exercise routes
        .route("/exercises", get(exercises::list))
        .with_state(exercises_state)
        // Identity provider via Extension layer
        .layer(Extension(identity_provider))
}
