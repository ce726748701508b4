//! Forward-flow scoring.
//!
//! For tokens `t1..tn` with semantic distance `D = 1 - cos`:
//!
//! ```text
//! flow_i = mean(D(t_i, t_j) for j < i)        for i in 2..=n
//! score  = mean(flow_i for i in 2..=n)
//! ```
//!
//! The score is order-dependent and lies in \[0, 2\].

use crate::config;
use crate::embedding::EmbeddingTable;
use crate::error::{FlowError, Result};
use serde::Serialize;

/// Result of one forward-flow computation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowReport {
    /// Mean of the instantaneous flows.
    pub score: f64,
    /// Instantaneous flow for positions 2..=n; `instantaneous[k]` belongs to
    /// token `k + 1` (0-based) and averages its distance to all earlier tokens.
    pub instantaneous: Vec<f64>,
}

/// Computes forward flow against a borrowed [`EmbeddingTable`].
///
/// Holds no mutable state; one scorer can serve any number of calls, from
/// any number of threads.
#[derive(Debug, Clone, Copy)]
pub struct ForwardFlowScorer<'t> {
    table: &'t EmbeddingTable,
}

impl<'t> ForwardFlowScorer<'t> {
    pub fn new(table: &'t EmbeddingTable) -> Self {
        Self { table }
    }

    /// Forward-flow score of `tokens`.
    ///
    /// Fails with `InsufficientTokens` for fewer than two tokens, then with
    /// `OutOfVocabulary` naming the first absent token. Nothing is computed
    /// unless every token resolves.
    pub fn score<S: AsRef<str>>(&self, tokens: &[S]) -> Result<f64> {
        self.flow(tokens).map(|report| report.score)
    }

    /// Like [`score`](Self::score), also returning every instantaneous flow.
    pub fn flow<S: AsRef<str>>(&self, tokens: &[S]) -> Result<FlowReport> {
        if tokens.len() < config::MIN_FLOW_TOKENS {
            return Err(FlowError::InsufficientTokens {
                count: tokens.len(),
            });
        }
        let rows = self.table.rows_of(tokens)?;

        let mut instantaneous = Vec::with_capacity(rows.len() - 1);
        for (i, &current) in rows.iter().enumerate().skip(1) {
            let total: f64 = rows[..i]
                .iter()
                .map(|&previous| self.table.row_distance(current, previous))
                .sum();
            instantaneous.push(total / i as f64);
        }
        let score = instantaneous.iter().sum::<f64>() / instantaneous.len() as f64;

        tracing::debug!(tokens = tokens.len(), score, "Computed forward flow");
        Ok(FlowReport {
            score,
            instantaneous,
        })
    }

    /// Semantic distance `D(a, b)` between two tokens.
    pub fn distance(&self, a: &str, b: &str) -> Result<f64> {
        let a = self.table.row_of(a)?;
        let b = self.table.row_of(b)?;
        Ok(self.table.row_distance(a, b))
    }
}
