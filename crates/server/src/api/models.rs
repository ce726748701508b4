//! Request and response data transfer objects for the REST API.
//!
//! All types derive `Serialize` and/or `Deserialize` for JSON marshalling via Axum.

use serde::{Deserialize, Serialize};

/// A token sequence given either pre-tokenized or as free text.
///
/// Exactly one of the two fields must be set. Free text is lowercased and
/// split on whitespace; `tokens` are used verbatim.
#[derive(Debug, Default, Deserialize)]
pub struct SequenceInput {
    pub tokens: Option<Vec<String>>,
    pub text: Option<String>,
}

/// Request body for `POST /score`.
#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    #[serde(flatten)]
    pub input: SequenceInput,
    /// Include per-position instantaneous flow in the response.
    #[serde(default)]
    pub detailed: bool,
}

/// Response body for `POST /score`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ScoreResponse {
    pub score: f64,
    pub tokens: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instantaneous: Option<Vec<f64>>,
}

/// Request body for `POST /score/batch`.
#[derive(Debug, Deserialize)]
pub struct BatchScoreRequest {
    pub sequences: Vec<Vec<String>>,
}

/// Per-sequence outcome in a batch response.
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchScoreResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Response body for `POST /score/batch`.
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchScoreResponse {
    pub results: Vec<BatchScoreResult>,
}

/// Request body for `POST /vectors`.
#[derive(Debug, Deserialize)]
pub struct VectorsRequest {
    #[serde(flatten)]
    pub input: SequenceInput,
}

/// Response body for `POST /vectors`: raw vectors in input order.
#[derive(Debug, Serialize, Deserialize)]
pub struct VectorsResponse {
    pub dimension: usize,
    pub tokens: Vec<String>,
    pub vectors: Vec<Vec<f32>>,
}

/// Request body for `POST /distance`.
#[derive(Debug, Deserialize)]
pub struct DistanceRequest {
    pub a: String,
    pub b: String,
}

/// Response body for `POST /distance`.
#[derive(Debug, Serialize, Deserialize)]
pub struct DistanceResponse {
    pub distance: f64,
}

/// Response body for `GET /table`.
#[derive(Debug, Serialize, Deserialize)]
pub struct TableInfoResponse {
    pub vocab_size: usize,
    pub dimension: usize,
    pub memory_bytes: usize,
}

/// Response body for `GET /health`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub table_loaded: bool,
    pub uptime_secs: u64,
    pub version: String,
}
