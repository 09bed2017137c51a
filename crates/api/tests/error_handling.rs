//! Tests for `AppError` to HTTP response mapping.
//!
//! Most cases call `IntoResponse` directly; the last few go through the
//! router to cover body, query and path rejections and unrouted methods.

mod common;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::{body_json, get, post_raw, put_json_auth};
use http_body_util::BodyExt;
use serde_json::json;
use sqlx::PgPool;
use yamdb_api::error::AppError;
use yamdb_core::error::CoreError;
use yamdb_core::roles::Role;

/// Convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn not_found_error_returns_404() {
    let (status, json) = error_to_response(CoreError::not_found("Title", 42).into()).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Title '42' not found");
}

#[tokio::test]
async fn validation_error_returns_400() {
    let err = AppError::Core(CoreError::Validation("Score must be between 1 and 10".into()));
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "Score must be between 1 and 10");
}

#[tokio::test]
async fn malformed_request_returns_400() {
    let err = AppError::Core(CoreError::MalformedRequest("username is required".into()));
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "MALFORMED_REQUEST");
}

#[tokio::test]
async fn bad_request_error_returns_400() {
    let (status, json) = error_to_response(AppError::BadRequest("invalid JSON".into())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "invalid JSON");
}

#[tokio::test]
async fn method_not_allowed_returns_405() {
    let err = AppError::Core(CoreError::MethodNotAllowed("DELETE is not allowed".into()));
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(json["code"], "METHOD_NOT_ALLOWED");
}

#[tokio::test]
async fn conflict_error_returns_409() {
    let (status, json) =
        error_to_response(AppError::Core(CoreError::Conflict("duplicate slug".into()))).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");
}

#[tokio::test]
async fn unauthorized_and_forbidden_are_distinct() {
    let (status, json) =
        error_to_response(AppError::Core(CoreError::Unauthorized("no token".into()))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");

    let (status, json) =
        error_to_response(AppError::Core(CoreError::Forbidden("admins only".into()))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "FORBIDDEN");
}

#[tokio::test]
async fn internal_errors_are_sanitized() {
    for err in [
        AppError::InternalError("secret connection string".into()),
        AppError::Core(CoreError::Internal("secret stack trace".into())),
    ] {
        let (status, json) = error_to_response(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["code"], "INTERNAL_ERROR");
        assert_eq!(json["error"], "An internal error occurred");
        assert!(!json.to_string().contains("secret"));
    }
}

#[tokio::test]
async fn row_not_found_returns_404() {
    let (status, json) = error_to_response(AppError::Database(sqlx::Error::RowNotFound)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn malformed_json_body_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_raw(app, "/api/v1/auth/token", "{not json").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn malformed_query_string_returns_json_400(pool: PgPool) {
    for uri in ["/api/v1/titles?year=abc", "/api/v1/categories?limit=x"] {
        let app = common::build_test_app(pool.clone());
        let response = get(app, uri).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        let json = body_json(response).await;
        assert_eq!(json["code"], "BAD_REQUEST", "{uri}");
        assert!(json["error"].is_string(), "{uri}");
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn malformed_path_segment_returns_json_400(pool: PgPool) {
    for uri in ["/api/v1/titles/abc", "/api/v1/titles/1/reviews/x/comments"] {
        let app = common::build_test_app(pool.clone());
        let response = get(app, uri).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        let json = body_json(response).await;
        assert_eq!(json["code"], "BAD_REQUEST", "{uri}");
        assert!(json["error"].is_string(), "{uri}");
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unrouted_method_returns_json_405(pool: PgPool) {
    let (_user, token) = common::create_user(&pool, "admin", Role::Admin).await;
    let app = common::build_test_app(pool);
    let response = put_json_auth(app, "/api/v1/titles/1", json!({"name": "X"}), &token).await;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body_json(response).await["code"], "METHOD_NOT_ALLOWED");
}
