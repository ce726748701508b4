//! Process-wide handle to a read-only embedding table.
//!
//! A `SharedTable` is either created around an already-loaded table or
//! pointed at a file and loaded on first use. Concurrent first callers wait
//! on the same load instead of each parsing the file.

use crate::embedding::EmbeddingTable;
use crate::error::Result;
use parking_lot::Mutex;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

/// Shared, lazily initialized [`EmbeddingTable`].
///
/// Once set, the table is read without locking; `load_lock` only serializes
/// callers racing to perform the first load.
#[derive(Debug)]
pub struct SharedTable {
    source: Option<PathBuf>,
    table: OnceLock<Arc<EmbeddingTable>>,
    load_lock: Mutex<()>,
}

impl SharedTable {
    /// Wraps a table that is already in memory.
    pub fn preloaded(table: EmbeddingTable) -> Self {
        Self {
            source: None,
            table: OnceLock::from(Arc::new(table)),
            load_lock: Mutex::new(()),
        }
    }

    /// Defers loading `path` until the first [`get`](Self::get).
    pub fn lazy(path: impl Into<PathBuf>) -> Self {
        Self {
            source: Some(path.into()),
            table: OnceLock::new(),
            load_lock: Mutex::new(()),
        }
    }

    /// Path the table is loaded from, if it was created lazily.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Returns the table, loading it if this is the first call.
    ///
    /// Blocks while another caller is loading. A failed load leaves the table
    /// unset so a later call retries.
    pub fn get(&self) -> Result<Arc<EmbeddingTable>> {
        if let Some(table) = self.table.get() {
            return Ok(Arc::clone(table));
        }
        let _guard = self.load_lock.lock();
        // A caller that held the lock before us may have finished the load.
        if let Some(table) = self.table.get() {
            return Ok(Arc::clone(table));
        }
        let path = self.source.as_deref().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "no embedding table source configured")
        })?;
        let table = Arc::new(EmbeddingTable::load(path)?);
        // Only the lock holder sets the cell, so it is still empty here.
        let _ = self.table.set(Arc::clone(&table));
        Ok(table)
    }

    /// Returns `true` once the table is resident. Never blocks.
    pub fn is_loaded(&self) -> bool {
        self.table.get().is_some()
    }
}
