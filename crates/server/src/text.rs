//! Caller-side normalization of free text into tokens.
//!
//! The engine treats tokens as opaque strings; lowercasing and whitespace
//! splitting happen here, before anything reaches the table.

/// Lowercases `text` and splits it on Unicode whitespace.
pub fn normalize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}
