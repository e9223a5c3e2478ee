// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::http::StatusCode;
use axum::response::IntoResponse;
use fitrank_tracker::error::{AppError, EngineError};
use serde_json::Value;

async fn render(err: AppError) -> (StatusCode, Value) {
    let response = err.into_response();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_engine_errors_map_to_status() {
    let (status, body) = render(EngineError::UnknownActivityType("quidditch".into()).into()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "unknown_activity_type");
    assert_eq!(body["details"], "quidditch");

    let (status, body) = render(EngineError::InvalidInput("reps is required".into()).into()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");

    let (status, body) = render(EngineError::Configuration("bad tiers".into()).into()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "configuration_error");
    assert!(body.get("details").is_none());
}

#[tokio::test]
async fn test_app_errors_map_to_status() {
    let (status, body) = render(AppError::Conflict("taken".into())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");

    let (status, body) = render(AppError::InvalidCredentials).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_credentials");

    let (status, _) = render(AppError::NotFound("workout".into())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Internal details are never leaked
    let (status, body) = render(AppError::Database("connection refused".into())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.get("details").is_none());
}
