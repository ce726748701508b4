//! # forwardflow-core
//!
//! Forward flow measures how far each token in a sequence drifts, on
//! average, from every token before it, using cosine distance between word
//! embeddings.
//!
//! This is the engine crate with zero async dependencies: an immutable
//! token → vector table loaded from word-vector text format, and a stateless
//! scorer that borrows it.
//!
//! ```no_run
//! use forwardflow_core::{EmbeddingTable, ForwardFlowScorer};
//!
//! let table = EmbeddingTable::load("embeddings.txt")?;
//! let scorer = ForwardFlowScorer::new(&table);
//! let score = scorer.score(&["house", "dog", "birch", "child"])?;
//! # Ok::<(), forwardflow_core::FlowError>(())
//! ```

/// Global configuration constants: limits, defaults, and tuning parameters.
pub mod config;
/// Cosine similarity and semantic distance.
pub mod distance;
/// Embedding table: text-format loader, lookups, and shared handle.
pub mod embedding;
/// Error taxonomy for loading and scoring.
pub mod error;
/// Forward-flow scorer.
pub mod scorer;

pub use embedding::{EmbeddingTable, SharedTable};
pub use error::{FlowError, Result};
pub use scorer::{FlowReport, ForwardFlowScorer};
