//! API error types mapped to HTTP status codes.
//!
//! Each [`ApiError`] variant maps to a specific HTTP status code and produces
//! a JSON response body `{"error": "message"}`. Vocabulary errors also carry
//! the offending token and every missing token of the request.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use forwardflow_core::{EmbeddingTable, FlowError};
use serde_json::json;

/// Application-level error type that implements `IntoResponse`.
///
/// Each variant maps to an HTTP status code:
/// - `BadRequest` → 400
/// - `InsufficientTokens` → 400
/// - `OutOfVocabulary` → 422
/// - `TableUnavailable` → 503
/// - `Internal` → 500
#[derive(Debug)]
pub enum ApiError {
    /// Invalid request parameters (400).
    BadRequest(String),
    /// Fewer than two tokens for a score request (400).
    InsufficientTokens { count: usize },
    /// A token is missing from the table (422).
    OutOfVocabulary { token: String, missing: Vec<String> },
    /// The embedding table could not be loaded (503).
    TableUnavailable(String),
    /// Unexpected server error (500).
    Internal(String),
}

impl ApiError {
    /// Converts an engine error, listing every missing token of `tokens`.
    pub fn from_flow<S: AsRef<str>>(err: FlowError, table: &EmbeddingTable, tokens: &[S]) -> Self {
        match err {
            FlowError::OutOfVocabulary { token } => ApiError::OutOfVocabulary {
                token,
                missing: table
                    .missing_tokens(tokens)
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            },
            other => other.into(),
        }
    }
}

impl From<FlowError> for ApiError {
    fn from(err: FlowError) -> Self {
        match err {
            FlowError::InsufficientTokens { count } => ApiError::InsufficientTokens { count },
            FlowError::OutOfVocabulary { token } => ApiError::OutOfVocabulary {
                missing: vec![token.clone()],
                token,
            },
            e @ (FlowError::Io(_) | FlowError::Format { .. }) => {
                ApiError::TableUnavailable(e.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::OutOfVocabulary { token, missing } => {
                let body = axum::Json(json!({
                    "error": format!("Word '{}' not in vocabulary", token),
                    "token": token,
                    "missing": missing,
                }));
                (StatusCode::UNPROCESSABLE_ENTITY, body).into_response()
            }
            other => {
                let (status, message) = match other {
                    ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
                    ApiError::InsufficientTokens { count } => (
                        StatusCode::BAD_REQUEST,
                        format!("Insert at least 2 words (got {})", count),
                    ),
                    ApiError::TableUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
                    ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
                    ApiError::OutOfVocabulary { .. } => unreachable!(),
                };
                let body = axum::Json(json!({ "error": message }));
                (status, body).into_response()
            }
        }
    }
}
