//! Global configuration constants for forwardflow.
//!
//! Engine limits and server defaults are defined here. These are compile-time
//! constants; runtime configuration is handled via CLI arguments and
//! environment variables in the server binary.

/// Minimum sequence length for which forward flow is defined.
///
/// The first token has no predecessor, so at least one pair is required.
pub const MIN_FLOW_TOKENS: usize = 2;

/// Maximum allowed embedding dimension in a table header.
pub const MAX_DIMENSION: usize = 4096;

/// Upper bound on rows pre-allocated from a table header.
///
/// The header is untrusted input; tables larger than this still load, they
/// just grow their storage incrementally past this point.
pub const MAX_RESERVED_ROWS: usize = 100_000;

/// Upper bound on vector components (`rows * dimension`) pre-allocated from
/// a table header (8M `f32` = 32 MB). Applies together with
/// [`MAX_RESERVED_ROWS`].
pub const MAX_RESERVED_COMPONENTS: usize = 8 * 1024 * 1024;

/// Interval (in rows) between load progress log lines.
pub const LOAD_PROGRESS_ROWS: usize = 100_000;

/// Default HTTP server port.
pub const DEFAULT_PORT: u16 = 3040;

/// Default path of the word-vector text table loaded by the server.
pub const DEFAULT_TABLE_PATH: &str = "./data/embeddings.txt";

/// Maximum length of free-text input in characters.
pub const MAX_TEXT_CHARS: usize = 150;

/// Maximum number of tokens accepted in a single sequence.
pub const MAX_TOKENS_PER_REQUEST: usize = 1_000;

/// Maximum number of sequences per batch score request.
pub const MAX_BATCH_SIZE: usize = 256;

/// Per-request timeout in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum HTTP request body size in bytes (1 MB).
pub const MAX_REQUEST_BODY_BYTES: usize = 1024 * 1024;

/// Maximum number of concurrent in-flight requests.
pub const MAX_CONCURRENT_REQUESTS: usize = 512;
