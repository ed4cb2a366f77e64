//! Session cache of raw reference bytes
//!
//! Bridges checksum generation and later reconstruction: `compute_checksums`
//! populates an entry for a path, and the patcher consumes it exactly once.
//! A second sync for the same path without a new checksum run must fail, so
//! entries are evicted on successful application and on deletion sync.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

/// In-memory map from file path to cached reference bytes
#[derive(Debug, Default)]
pub struct SessionCache {
    entries: HashMap<PathBuf, Vec<u8>>,
}

impl SessionCache {
    /// Create an empty session cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the reference bytes for a path, replacing any previous entry
    pub fn insert<P: AsRef<Path>>(&mut self, path: P, bytes: Vec<u8>) {
        let path = path.as_ref().to_path_buf();
        debug!("caching {} reference bytes for: {}", bytes.len(), path.display());
        self.entries.insert(path, bytes);
    }

    /// Borrow the cached reference bytes for a path, if present
    pub fn get<P: AsRef<Path>>(&self, path: P) -> Option<&[u8]> {
        self.entries.get(path.as_ref()).map(Vec::as_slice)
    }

    /// Remove the entry for a path, returning whether one existed
    pub fn evict<P: AsRef<Path>>(&mut self, path: P) -> bool {
        let path = path.as_ref();
        if self.entries.remove(path).is_some() {
            debug!("evicted cached reference bytes for: {}", path.display());
            true
        } else {
            false
        }
    }

    /// Whether a path currently has cached reference bytes
    pub fn contains<P: AsRef<Path>>(&self, path: P) -> bool {
        self.entries.contains_key(path.as_ref())
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
