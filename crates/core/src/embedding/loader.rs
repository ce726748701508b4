//! Word-vector text format loader.
//!
//! ```text
//! <vocab_size> <dimension>
//! <token> <d0> <d1> ... <d_{D-1}>
//! ...
//! ```
//!
//! Exactly `vocab_size` rows must follow the header. Trailing blank lines are
//! accepted; any further non-blank row is an error. Load is all-or-nothing:
//! on failure no table is returned.

use crate::config;
use crate::embedding::table::{EmbeddingTable, TableBuilder};
use crate::error::{FlowError, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

impl EmbeddingTable {
    /// Loads a table from a word-vector text file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        tracing::info!("Loading embedding table from {:?}", path);
        Self::from_reader(BufReader::new(file))
    }

    /// Loads a table from any buffered reader in word-vector text format.
    pub fn from_reader<R: BufRead>(mut reader: R) -> Result<Self> {
        let start = Instant::now();
        // One buffer reused for every line.
        let mut line = String::new();

        if reader.read_line(&mut line)? == 0 {
            return Err(FlowError::format("line 1: empty source, expected header"));
        }
        let (vocab_size, dimension) = parse_header(&line)?;

        let mut builder = TableBuilder::new(dimension, reserved_rows(vocab_size, dimension))?;
        let mut components: Vec<f32> = Vec::with_capacity(dimension);

        for row in 0..vocab_size {
            let line_no = row + 2;
            line.clear();
            if reader.read_line(&mut line)? == 0 {
                return Err(FlowError::format(format!(
                    "line {}: truncated, header declares {} rows but found {}",
                    line_no, vocab_size, row
                )));
            }
            let token = parse_row(&line, dimension, line_no, &mut components)?;
            builder.push(token.to_string(), &components);

            if (row + 1) % config::LOAD_PROGRESS_ROWS == 0 {
                tracing::debug!("Loaded {}/{} rows", row + 1, vocab_size);
            }
        }

        let mut line_no = vocab_size + 1;
        loop {
            line.clear();
            if reader.read_line(&mut line)? == 0 {
                break;
            }
            line_no += 1;
            if !line.trim().is_empty() {
                return Err(FlowError::format(format!(
                    "line {}: unexpected row, header declares only {} rows",
                    line_no, vocab_size
                )));
            }
        }

        let duplicates = builder.duplicates();
        let table = builder.finish();
        if duplicates > 0 {
            tracing::warn!("Skipped {} duplicate tokens", duplicates);
        }
        tracing::info!(
            tokens = table.len(),
            dimension = table.dimension(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Embedding table loaded"
        );
        Ok(table)
    }
}

/// Rows to pre-allocate for a header; bounded in rows and in components.
fn reserved_rows(vocab_size: usize, dimension: usize) -> usize {
    vocab_size
        .min(config::MAX_RESERVED_ROWS)
        .min(config::MAX_RESERVED_COMPONENTS / dimension)
}

/// Parses `"<vocab_size> <dimension>"`.
fn parse_header(line: &str) -> Result<(usize, usize)> {
    let mut fields = line.split_whitespace();
    let (Some(vocab), Some(dim), None) = (fields.next(), fields.next(), fields.next()) else {
        return Err(FlowError::format(format!(
            "line 1: expected header '<vocab_size> <dimension>', found '{}'",
            line.trim_end()
        )));
    };
    let vocab_size: usize = vocab.parse().map_err(|_| {
        FlowError::format(format!("line 1: invalid vocabulary size '{}'", vocab))
    })?;
    let dimension: usize = dim
        .parse()
        .map_err(|_| FlowError::format(format!("line 1: invalid dimension '{}'", dim)))?;
    if dimension == 0 || dimension > config::MAX_DIMENSION {
        return Err(FlowError::format(format!(
            "line 1: dimension must be 1-{}, got {}",
            config::MAX_DIMENSION,
            dimension
        )));
    }
    Ok((vocab_size, dimension))
}

/// Parses one data row into `components`, returning the token slice.
fn parse_row<'l>(
    line: &'l str,
    dimension: usize,
    line_no: usize,
    components: &mut Vec<f32>,
) -> Result<&'l str> {
    let mut fields = line.split_whitespace();
    let token = fields
        .next()
        .ok_or_else(|| FlowError::format(format!("line {}: empty row", line_no)))?;

    components.clear();
    for field in fields {
        let value: f32 = field.parse().map_err(|_| {
            FlowError::format(format!(
                "line {}: component '{}' of '{}' is not a number",
                line_no, field, token
            ))
        })?;
        if !value.is_finite() {
            return Err(FlowError::format(format!(
                "line {}: component '{}' of '{}' is not finite",
                line_no, field, token
            )));
        }
        components.push(value);
        if components.len() > dimension {
            break;
        }
    }
    if components.len() != dimension {
        let found = components.len() + line.split_whitespace().skip(1 + components.len()).count();
        return Err(FlowError::format(format!(
            "line {}: expected {} components for '{}', found {}",
            line_no, dimension, token, found
        )));
    }
    Ok(token)
}
