//! Status and body for each `AppError` a handler can return.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use fantrax_api::error::AppError;
use fantrax_core::error::CoreError;
use fantrax_songlink::ResolveError;
use http_body_util::BodyExt;

async fn render(err: impl Into<AppError>) -> (StatusCode, serde_json::Value) {
    let response = err.into().into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn rejected_input_keeps_its_message() {
    let (status, json) = render(CoreError::Validation("Context is required".into())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "Context is required");
}

#[tokio::test]
async fn credential_errors_map_to_401_and_403() {
    let (status, json) = render(CoreError::Unauthorized("Invalid password".into())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], "Invalid password");

    let (status, json) = render(CoreError::Forbidden("Invalid access code".into())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "FORBIDDEN");
}

#[tokio::test]
async fn resolver_failure_is_a_client_error() {
    let (status, json) = render(ResolveError::HttpStatus { status: 404 }).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "RESOLVE_FAILED");
    assert_eq!(
        json["error"],
        "Could not fetch album data: link service returned HTTP 404"
    );
}

#[tokio::test]
async fn database_details_are_hidden() {
    let (status, json) = render(sqlx::Error::Protocol(
        "password authentication failed for user fantrax".into(),
    ))
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}
