//! Error taxonomy for table loading and scoring.
//!
//! Each failure class is a distinct variant so callers can tell an unreadable
//! source apart from a malformed one, and an unknown token apart from a
//! too-short sequence.

use std::io;
use thiserror::Error;

/// Errors produced by the embedding table and the forward-flow scorer.
///
/// | Variant | Raised by | Recovery |
/// |---------|-----------|----------|
/// | `Io` | table load | fix the source path or permissions |
/// | `Format` | table load | fix the table file |
/// | `OutOfVocabulary` | lookup, scoring | change the input tokens |
/// | `InsufficientTokens` | scoring | supply at least two tokens |
///
/// None of these are transient; nothing retries them internally.
#[derive(Debug, Error)]
pub enum FlowError {
    /// The table source could not be read.
    #[error("failed to read embedding table: {0}")]
    Io(#[from] io::Error),

    /// The table source is not valid word-vector text format.
    #[error("malformed embedding table: {message}")]
    Format { message: String },

    /// A requested token has no vector in the table.
    #[error("token '{token}' not in vocabulary")]
    OutOfVocabulary { token: String },

    /// Fewer than two tokens were supplied for scoring.
    #[error("forward flow needs at least 2 tokens, got {count}")]
    InsufficientTokens { count: usize },
}

impl FlowError {
    pub(crate) fn format(message: impl Into<String>) -> Self {
        FlowError::Format {
            message: message.into(),
        }
    }

    pub(crate) fn out_of_vocabulary(token: &str) -> Self {
        FlowError::OutOfVocabulary {
            token: token.to_string(),
        }
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, FlowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_offending_token() {
        let err = FlowError::out_of_vocabulary("koer");
        assert_eq!(err.to_string(), "token 'koer' not in vocabulary");
    }

    #[test]
    fn test_io_error_converts() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing");
        let err: FlowError = io_err.into();
        assert!(matches!(err, FlowError::Io(_)));
    }

    #[test]
    fn test_insufficient_tokens_message() {
        let err = FlowError::InsufficientTokens { count: 1 };
        assert!(err.to_string().contains("got 1"));
    }
}
