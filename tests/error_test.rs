use axum::{http::StatusCode, response::IntoResponse};
use http_body_util::BodyExt;
use setrack::error::AppError;

#[test]
fn test_not_found_returns_404() {
    let error = AppError::NotFound("Workout not found".to_string());
    let response = error.into_response();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[test]
fn test_unauthorized_returns_401() {
    let error = AppError::Unauthorized;
    let response = error.into_response();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[test]
fn test_validation_returns_400() {
    let error = AppError::Validation("Name is required".to_string());
    let response = error.into_response();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn test_internal_returns_500() {
    let error = AppError::Internal("Something broke".to_string());
    let response = error.into_response();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_validation_body_carries_first_violation() {
    let error = AppError::Validation("Name is required".to_string());
    let response = error.into_response();

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(body["error"], "Name is required");
}

#[tokio::test]
async fn test_internal_detail_is_not_surfaced() {
    let error = AppError::Internal("connection refused on 10.0.0.3".to_string());
    let response = error.into_response();

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(body["error"], "Something went wrong");
}
