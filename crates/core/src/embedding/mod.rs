//! Embedding table: load, lookup, and process-wide sharing.
//!
//! `EmbeddingTable` holds the token → vector mapping and is immutable once
//! built. `SharedTable` hands out `Arc` clones of a single table, loading it
//! at most once.

/// Word-vector text format loader.
pub mod loader;
/// Lazily loaded shared table handle.
pub mod shared;
/// Token → vector storage and lookups.
pub mod table;

pub use shared::SharedTable;
pub use table::EmbeddingTable;
