//! Prometheus metrics recording.

use forwardflow_core::EmbeddingTable;
use metrics::{counter, gauge, histogram};
use std::time::Duration;

/// Records HTTP request metrics.
pub fn record_request(method: &str, path: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", path.to_string()),
        ("status", status.to_string()),
    ];
    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());
}

/// Records the outcome of one scored sequence (`ok`, `oov`, `insufficient`).
pub fn record_score(outcome: &'static str, tokens: usize) {
    counter!("forwardflow_scores_total", "outcome" => outcome).increment(1);
    histogram!("forwardflow_sequence_tokens").record(tokens as f64);
}

/// Updates the table-level gauges after a load.
pub fn update_table_metrics(table: &EmbeddingTable) {
    gauge!("forwardflow_vocabulary_size").set(table.len() as f64);
    gauge!("forwardflow_dimension").set(table.dimension() as f64);
    gauge!("forwardflow_table_memory_bytes").set(table.estimate_memory_bytes() as f64);
}
