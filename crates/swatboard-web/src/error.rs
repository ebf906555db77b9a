use std::any::Any;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use swatboard_core::CoreError;

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Unprocessable(String),
    TooManyRequests { retry_after_secs: u64 },
    Internal(String),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    retry_after_sec: Option<u64>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::BadRequest(msg) => {
                error_response(StatusCode::BAD_REQUEST, "BAD_REQUEST", msg)
            }
            AppError::Unprocessable(msg) => {
                error_response(StatusCode::UNPROCESSABLE_ENTITY, "UNPROCESSABLE_ENTITY", msg)
            }
            AppError::TooManyRequests { retry_after_secs } => {
                let body = ErrorBody {
                    error: "TOO_MANY_REQUESTS",
                    message: None,
                    retry_after_sec: Some(retry_after_secs),
                };
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    [(header::RETRY_AFTER, retry_after_secs.to_string())],
                    axum::Json(body),
                )
                    .into_response()
            }
            AppError::Internal(msg) => {
                // Log the real error server-side, return generic message to client
                tracing::error!("Internal error: {}", msg);
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_SERVER_ERROR",
                    "Internal server error".to_string(),
                )
            }
        }
    }
}

fn error_response(status: StatusCode, error: &'static str, message: String) -> Response {
    let body = ErrorBody {
        error,
        message: Some(message),
        retry_after_sec: None,
    };
    (status, axum::Json(body)).into_response()
}

/// Turns a panicking handler into a 500 for that request only.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| err.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_else(|| "unknown panic".to_string());
    AppError::Internal(format!("handler panicked: {detail}")).into_response()
}

impl From<CoreError> for AppError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::Validation(msg) => AppError::Unprocessable(msg),
            CoreError::RateLimited { retry_after_secs } => {
                AppError::TooManyRequests { retry_after_secs }
            }
            CoreError::InvalidDifficulty(_) => AppError::BadRequest(
                "difficulty must be one of: easy, medium, hard".to_string(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_maps_to_422() {
        let error = AppError::from(CoreError::Validation("caught must be >= 0".to_string()));
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["error"], "UNPROCESSABLE_ENTITY");
        assert_eq!(body["message"], "caught must be >= 0");
    }

    #[tokio::test]
    async fn rate_limit_maps_to_429_with_retry_after() {
        let response =
            AppError::from(CoreError::RateLimited { retry_after_secs: 2 }).into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "2");
        let body = body_json(response).await;
        assert_eq!(body["retryAfterSec"], 2);
        assert!(body.get("message").is_none());
    }

    #[tokio::test]
    async fn invalid_difficulty_maps_to_400() {
        let response =
            AppError::from(CoreError::InvalidDifficulty("x".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["message"], "difficulty must be one of: easy, medium, hard");
    }

    #[tokio::test]
    async fn internal_hides_detail() {
        let response = AppError::Internal("lock exploded".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Internal server error");
    }

    #[tokio::test]
    async fn panic_becomes_internal_error() {
        let response = panic_response(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "INTERNAL_SERVER_ERROR");
    }
}
