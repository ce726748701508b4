//! In-memory token → vector table.
//!
//! Vectors live in one flat row-major `Vec<f32>`; a `HashMap` maps each token
//! to its row. Squared norms are computed once per row at construction so
//! pairwise distances only need a dot product.

use crate::distance;
use crate::error::{FlowError, Result};
use std::collections::{HashMap, HashSet};

/// Immutable token → vector lookup table.
///
/// Every row has exactly [`dimension`](Self::dimension) components. Tokens are
/// case-sensitive opaque strings. The table is never mutated after
/// construction, so it can be shared across threads behind an `Arc`.
#[derive(Debug, Clone)]
pub struct EmbeddingTable {
    dimension: usize,
    index: HashMap<String, usize>,
    tokens: Vec<String>,
    vectors: Vec<f32>,
    norms_sq: Vec<f64>,
}

impl EmbeddingTable {
    /// Builds a table from `(token, vector)` pairs.
    ///
    /// Fails with `FormatError` if `dimension` is zero or any vector has the
    /// wrong length or a non-finite component. Duplicate tokens keep their
    /// first vector.
    pub fn from_entries<I, S>(dimension: usize, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<f32>)>,
        S: Into<String>,
    {
        let mut builder = TableBuilder::new(dimension, 0)?;
        for (position, (token, vector)) in entries.into_iter().enumerate() {
            let token = token.into();
            if vector.len() != dimension {
                return Err(FlowError::format(format!(
                    "entry {} ('{}'): expected {} components, found {}",
                    position + 1,
                    token,
                    dimension,
                    vector.len()
                )));
            }
            if let Some(i) = vector.iter().position(|v| !v.is_finite()) {
                return Err(FlowError::format(format!(
                    "entry {} ('{}'): component {} is not finite",
                    position + 1,
                    token,
                    i
                )));
            }
            builder.push(token, &vector);
        }
        Ok(builder.finish())
    }

    /// Fixed vector width shared by every row.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of tokens in the table.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns `true` if the table holds no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// O(1) vocabulary membership test.
    pub fn contains(&self, token: &str) -> bool {
        self.index.contains_key(token)
    }

    /// Tokens in load order.
    pub fn tokens(&self) -> impl Iterator<Item = &str> + '_ {
        self.tokens.iter().map(String::as_str)
    }

    /// Returns the stored vector for `token`.
    ///
    /// Never substitutes a default: an absent token is an `OutOfVocabularyError`.
    pub fn vector_of(&self, token: &str) -> Result<&[f32]> {
        self.row_of(token).map(|row| self.row_vector(row))
    }

    /// Batched [`vector_of`](Self::vector_of). Fails on the first absent token.
    pub fn vectors_of<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Vec<&[f32]>> {
        tokens
            .iter()
            .map(|token| self.vector_of(token.as_ref()))
            .collect()
    }

    /// Every absent token in input order, without repeats.
    pub fn missing_tokens<'a, S: AsRef<str>>(&self, tokens: &'a [S]) -> Vec<&'a str> {
        let mut seen = HashSet::new();
        tokens
            .iter()
            .map(|token| token.as_ref())
            .filter(|token| !self.contains(token) && seen.insert(*token))
            .collect()
    }

    /// Resolves tokens to row indices. Fails on the first absent token.
    pub(crate) fn rows_of<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Vec<usize>> {
        tokens
            .iter()
            .map(|token| self.row_of(token.as_ref()))
            .collect()
    }

    pub(crate) fn row_of(&self, token: &str) -> Result<usize> {
        self.index
            .get(token)
            .copied()
            .ok_or_else(|| FlowError::out_of_vocabulary(token))
    }

    /// Semantic distance between two rows using the cached norms.
    pub(crate) fn row_distance(&self, a: usize, b: usize) -> f64 {
        distance::cosine_distance_prenorm(
            self.row_vector(a),
            self.row_vector(b),
            self.norms_sq[a],
            self.norms_sq[b],
        )
    }

    fn row_vector(&self, row: usize) -> &[f32] {
        let start = row * self.dimension;
        &self.vectors[start..start + self.dimension]
    }

    /// Approximate heap footprint in bytes.
    pub fn estimate_memory_bytes(&self) -> usize {
        let token_bytes: usize = self.tokens.iter().map(|t| t.len() * 2).sum();
        token_bytes
            + self.vectors.len() * std::mem::size_of::<f32>()
            + self.norms_sq.len() * std::mem::size_of::<f64>()
            + self.index.len() * std::mem::size_of::<(String, usize)>()
    }
}

/// Incremental table construction shared by the text loader and
/// [`EmbeddingTable::from_entries`]. Callers validate vector width first.
pub(crate) struct TableBuilder {
    table: EmbeddingTable,
    duplicates: usize,
}

impl TableBuilder {
    pub(crate) fn new(dimension: usize, reserve_rows: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(FlowError::format("dimension must be > 0"));
        }
        Ok(Self {
            table: EmbeddingTable {
                dimension,
                index: HashMap::with_capacity(reserve_rows),
                tokens: Vec::with_capacity(reserve_rows),
                vectors: Vec::with_capacity(reserve_rows * dimension),
                norms_sq: Vec::with_capacity(reserve_rows),
            },
            duplicates: 0,
        })
    }

    /// Appends a row. Returns `false` if the token was already present.
    pub(crate) fn push(&mut self, token: String, vector: &[f32]) -> bool {
        debug_assert_eq!(vector.len(), self.table.dimension);
        if self.table.index.contains_key(&token) {
            tracing::warn!("Duplicate token '{}' in embedding table, keeping first", token);
            self.duplicates += 1;
            return false;
        }
        let row = self.table.tokens.len();
        self.table.vectors.extend_from_slice(vector);
        self.table.norms_sq.push(distance::norm_sq(vector));
        self.table.index.insert(token.clone(), row);
        self.table.tokens.push(token);
        true
    }

    pub(crate) fn duplicates(&self) -> usize {
        self.duplicates
    }

    pub(crate) fn finish(mut self) -> EmbeddingTable {
        self.table.vectors.shrink_to_fit();
        self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> EmbeddingTable {
        EmbeddingTable::from_entries(
            2,
            vec![
                ("a", vec![1.0, 0.0]),
                ("b", vec![0.0, 1.0]),
                ("zero", vec![0.0, 0.0]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_contains_and_dimension() {
        let table = sample_table();
        assert_eq!(table.dimension(), 2);
        assert_eq!(table.len(), 3);
        assert!(table.contains("a"));
        assert!(!table.contains("A"), "lookup is case-sensitive");
        assert!(!table.contains("c"));
    }

    #[test]
    fn test_vector_of() {
        let table = sample_table();
        assert_eq!(table.vector_of("b").unwrap(), &[0.0, 1.0]);
        match table.vector_of("missing") {
            Err(FlowError::OutOfVocabulary { token }) => assert_eq!(token, "missing"),
            other => panic!("expected OutOfVocabulary, got {other:?}"),
        }
    }

    #[test]
    fn test_vectors_of_reports_first_missing() {
        let table = sample_table();
        let vectors = table.vectors_of(&["a", "b", "a"]).unwrap();
        assert_eq!(vectors.len(), 3);
        assert_eq!(vectors[2], &[1.0, 0.0]);

        match table.vectors_of(&["a", "x", "y"]) {
            Err(FlowError::OutOfVocabulary { token }) => assert_eq!(token, "x"),
            other => panic!("expected OutOfVocabulary, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_tokens_ordered_and_unique() {
        let table = sample_table();
        let missing = table.missing_tokens(&["y", "a", "x", "y", "b"]);
        assert_eq!(missing, vec!["y", "x"]);
        assert!(table.missing_tokens(&["a", "b"]).is_empty());
    }

    #[test]
    fn test_duplicate_keeps_first() {
        let table = EmbeddingTable::from_entries(
            2,
            vec![("a", vec![1.0, 0.0]), ("a", vec![0.0, 1.0])],
        )
        .unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.vector_of("a").unwrap(), &[1.0, 0.0]);
    }

    #[test]
    fn test_wrong_width_rejected() {
        let err = EmbeddingTable::from_entries(2, vec![("a", vec![1.0, 0.0, 3.0])]).unwrap_err();
        assert!(matches!(err, FlowError::Format { .. }));
    }

    #[test]
    fn test_non_finite_rejected() {
        let err = EmbeddingTable::from_entries(2, vec![("a", vec![f32::NAN, 0.0])]).unwrap_err();
        assert!(matches!(err, FlowError::Format { .. }));
    }

    #[test]
    fn test_zero_dimension_rejected() {
        let err =
            EmbeddingTable::from_entries(0, Vec::<(String, Vec<f32>)>::new()).unwrap_err();
        assert!(matches!(err, FlowError::Format { .. }));
    }

    #[test]
    fn test_row_distance_uses_cached_norms() {
        let table = sample_table();
        let a = table.row_of("a").unwrap();
        let b = table.row_of("b").unwrap();
        let z = table.row_of("zero").unwrap();
        assert_eq!(table.row_distance(a, b), 1.0);
        assert_eq!(table.row_distance(a, a), 0.0);
        assert_eq!(table.row_distance(z, a), 1.0);
        assert_eq!(table.row_distance(z, z), 1.0);
    }

    #[test]
    fn test_tokens_in_load_order() {
        let table = sample_table();
        let tokens: Vec<&str> = table.tokens().collect();
        assert_eq!(tokens, vec!["a", "b", "zero"]);
    }
}
