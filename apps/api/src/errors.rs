use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Response bodies are flat `{"error": "..."}` objects. Client-side problems
/// (empty fields, malformed JSON) carry a descriptive message; server-side
/// problems log the detail and return a generic message so nothing internal
/// leaks to the front end.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid JSON: {0}")]
    BadJson(String),

    #[error("API key is not configured")]
    MissingApiKey,

    #[error("Upstream reply failed validation: {0}")]
    UpstreamSchema(String),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

const GENERIC_500: &str = "Internal server error. Please try again later.";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::BadJson(msg) => {
                (StatusCode::BAD_REQUEST, format!("Invalid JSON: {msg}"))
            }
            AppError::MissingApiKey => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "API key is not configured".to_string(),
            ),
            AppError::UpstreamSchema(msg) => {
                tracing::error!("Upstream reply failed validation: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_500.to_string())
            }
            AppError::Llm(e) => {
                tracing::error!("LLM error: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_500.to_string())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_500.to_string())
            }
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_400() {
        let resp = AppError::Validation("missing field".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_bad_json_maps_to_400() {
        let resp = AppError::BadJson("expected value at line 1".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_missing_api_key_maps_to_500() {
        let resp = AppError::MissingApiKey.into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_upstream_schema_maps_to_500() {
        let resp = AppError::UpstreamSchema("score out of range".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
