//! forwardflow-server — HTTP service for forward-flow scoring.
//!
//! Holds one process-wide embedding table and exposes scoring and raw
//! vector retrieval as JSON endpoints. Engine logic lives in
//! `forwardflow-core`.

/// REST API layer: Axum router, HTTP handlers, models, metrics.
pub mod api;
/// Free-text normalization into tokens.
pub mod text;
