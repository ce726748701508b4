//! HTTP request handlers and application state.

use crate::api::errors::ApiError;
use crate::api::metrics;
use crate::api::models::*;
use crate::text;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use forwardflow_core::{config, EmbeddingTable, FlowError, ForwardFlowScorer, SharedTable};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Instant;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Process-wide embedding table, possibly not yet loaded.
    pub table: Arc<SharedTable>,
    pub prometheus_handle: PrometheusHandle,
    pub start_time: Instant,
    /// Maximum length of `text` input in characters.
    pub max_text_chars: usize,
}

/// Returns the resident table, loading it off the async runtime on first use.
async fn load_table(state: &AppState) -> Result<Arc<EmbeddingTable>, ApiError> {
    if state.table.is_loaded() {
        return Ok(state.table.get()?);
    }
    let shared = Arc::clone(&state.table);
    let table = tokio::task::spawn_blocking(move || shared.get())
        .await
        .map_err(|e| ApiError::Internal(format!("Table load task failed: {}", e)))?
        .map_err(|e| {
            tracing::error!("Embedding table load failed: {}", e);
            ApiError::from(e)
        })?;
    metrics::update_table_metrics(&table);
    Ok(table)
}

/// Turns a request's sequence input into tokens, enforcing size limits.
fn resolve_tokens(input: SequenceInput, max_text_chars: usize) -> Result<Vec<String>, ApiError> {
    let tokens = match (input.tokens, input.text) {
        (Some(tokens), None) => tokens,
        (None, Some(text)) => {
            let chars = text.chars().count();
            if chars > max_text_chars {
                return Err(ApiError::BadRequest(format!(
                    "text must be at most {} characters, got {}",
                    max_text_chars, chars
                )));
            }
            text::normalize(&text)
        }
        _ => {
            return Err(ApiError::BadRequest(
                "Exactly one of tokens or text is required".to_string(),
            ))
        }
    };
    check_sequence_len(&tokens)?;
    Ok(tokens)
}

fn check_sequence_len(tokens: &[String]) -> Result<(), ApiError> {
    if tokens.len() > config::MAX_TOKENS_PER_REQUEST {
        return Err(ApiError::BadRequest(format!(
            "At most {} tokens per sequence, got {}",
            config::MAX_TOKENS_PER_REQUEST,
            tokens.len()
        )));
    }
    Ok(())
}

fn score_outcome(err: &FlowError) -> &'static str {
    match err {
        FlowError::OutOfVocabulary { .. } => "oov",
        FlowError::InsufficientTokens { .. } => "insufficient",
        FlowError::Io(_) | FlowError::Format { .. } => "unavailable",
    }
}

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            table_loaded: state.table.is_loaded(),
            uptime_secs: state.start_time.elapsed().as_secs(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

pub async fn metrics_endpoint(State(state): State<AppState>) -> String {
    state.prometheus_handle.render()
}

pub async fn table_info(State(state): State<AppState>) -> Result<Json<TableInfoResponse>, ApiError> {
    let table = load_table(&state).await?;
    Ok(Json(TableInfoResponse {
        vocab_size: table.len(),
        dimension: table.dimension(),
        memory_bytes: table.estimate_memory_bytes(),
    }))
}

pub async fn score(
    State(state): State<AppState>,
    Json(req): Json<ScoreRequest>,
) -> Result<Json<ScoreResponse>, ApiError> {
    let tokens = resolve_tokens(req.input, state.max_text_chars)?;
    let table = load_table(&state).await?;

    match ForwardFlowScorer::new(&table).flow(&tokens) {
        Ok(report) => {
            metrics::record_score("ok", tokens.len());
            Ok(Json(ScoreResponse {
                score: report.score,
                tokens,
                instantaneous: req.detailed.then_some(report.instantaneous),
            }))
        }
        Err(e) => {
            metrics::record_score(score_outcome(&e), tokens.len());
            Err(ApiError::from_flow(e, &table, &tokens))
        }
    }
}

pub async fn score_batch(
    State(state): State<AppState>,
    Json(req): Json<BatchScoreRequest>,
) -> Result<Json<BatchScoreResponse>, ApiError> {
    if req.sequences.is_empty() || req.sequences.len() > config::MAX_BATCH_SIZE {
        return Err(ApiError::BadRequest(format!(
            "Batch must contain 1-{} sequences",
            config::MAX_BATCH_SIZE
        )));
    }
    for seq in &req.sequences {
        check_sequence_len(seq)?;
    }
    let table = load_table(&state).await?;
    let scorer = ForwardFlowScorer::new(&table);

    let results = req
        .sequences
        .iter()
        .map(|seq| match scorer.score(seq) {
            Ok(score) => {
                metrics::record_score("ok", seq.len());
                BatchScoreResult {
                    score: Some(score),
                    error: None,
                    token: None,
                }
            }
            Err(e) => {
                metrics::record_score(score_outcome(&e), seq.len());
                let error = Some(e.to_string());
                let token = match e {
                    FlowError::OutOfVocabulary { token } => Some(token),
                    _ => None,
                };
                BatchScoreResult {
                    score: None,
                    error,
                    token,
                }
            }
        })
        .collect();

    Ok(Json(BatchScoreResponse { results }))
}

pub async fn vectors(
    State(state): State<AppState>,
    Json(req): Json<VectorsRequest>,
) -> Result<Json<VectorsResponse>, ApiError> {
    let tokens = resolve_tokens(req.input, state.max_text_chars)?;
    if tokens.is_empty() {
        return Err(ApiError::BadRequest(
            "At least one token is required".to_string(),
        ));
    }
    let table = load_table(&state).await?;

    let vectors = table
        .vectors_of(&tokens)
        .map_err(|e| ApiError::from_flow(e, &table, &tokens))?
        .into_iter()
        .map(<[f32]>::to_vec)
        .collect();

    Ok(Json(VectorsResponse {
        dimension: table.dimension(),
        tokens,
        vectors,
    }))
}

pub async fn distance(
    State(state): State<AppState>,
    Json(req): Json<DistanceRequest>,
) -> Result<Json<DistanceResponse>, ApiError> {
    let table = load_table(&state).await?;
    let distance = ForwardFlowScorer::new(&table)
        .distance(&req.a, &req.b)
        .map_err(|e| ApiError::from_flow(e, &table, &[req.a.as_str(), req.b.as_str()]))?;
    Ok(Json(DistanceResponse { distance }))
}
