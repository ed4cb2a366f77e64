//! Main synchronization engine
//!
//! Ties the pieces together into the three operations a transport exchanges:
//! checksum a reference file, diff a modified copy against the received
//! table, and apply the diff back onto the cached reference bytes.

use std::path::Path;

use rollsync_types::{BlockChecksum, Diff, Error, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, info};

use crate::cache::SessionCache;
use crate::checksum::{strong_digest, RollingChecksum};
use crate::patcher::Patcher;
use crate::scanner::MatchScanner;
use crate::table::{serialize_blocks, ChecksumTable};

/// Synchronization configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Block size in bytes for checksum generation and matching.
    /// Both endpoints must use the same value.
    pub block_size: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self { block_size: 750 }
    }
}

/// Delta-synchronization engine owning the per-session reference cache.
///
/// For a given path the caller must serialize the pipeline: checksum, then
/// diff on the peer, then sync. Calling `apply_diff` before
/// `compute_checksums` is a precondition failure. Operations on distinct
/// paths are independent.
#[derive(Debug)]
pub struct SyncEngine {
    config: SyncConfig,
    scanner: MatchScanner,
    patcher: Patcher,
    cache: SessionCache,
}

impl SyncEngine {
    /// Create an engine with the default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(SyncConfig::default())
    }

    /// Create an engine with a custom configuration
    pub fn with_config(config: SyncConfig) -> Result<Self> {
        if config.block_size == 0 {
            return Err(Error::config("block_size must be positive"));
        }

        Ok(Self {
            scanner: MatchScanner::new(config.block_size),
            patcher: Patcher::new(config.block_size),
            cache: SessionCache::new(),
            config,
        })
    }

    /// The engine's configuration
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Read the reference file at `path`, cache its bytes for the later
    /// sync step, and return the serialized checksum table to send to the
    /// peer holding the modified copy.
    ///
    /// A read failure aborts without touching the cache.
    pub async fn compute_checksums<P: AsRef<Path>>(&mut self, path: P) -> Result<String> {
        let path = path.as_ref();
        let data = fs::read(path).await.map_err(|e| Error::Io {
            message: format!("Failed to read file '{}': {}", path.display(), e),
        })?;

        let blocks: Vec<BlockChecksum> = data
            .chunks(self.config.block_size)
            .enumerate()
            .map(|(index, chunk)| {
                BlockChecksum::new(
                    index as u32,
                    RollingChecksum::new(chunk).sum(),
                    strong_digest(chunk),
                )
            })
            .collect();
        let payload = serialize_blocks(&blocks);

        info!(
            "checksummed '{}': {} bytes into {} blocks",
            path.display(),
            data.len(),
            blocks.len()
        );
        self.cache.insert(path, data);

        Ok(payload)
    }

    /// Diff the local file at `path` against a peer's serialized checksum
    /// table.
    ///
    /// Returns the deletion sentinel if the local file does not exist;
    /// otherwise scans the local bytes and returns the ordered segments.
    pub async fn compute_diff<P: AsRef<Path>>(
        &self,
        path: P,
        table_payload: &str,
    ) -> Result<Diff> {
        let path = path.as_ref();

        let data = match fs::read(path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("local file '{}' is gone, emitting removal", path.display());
                return Ok(Diff::Removed);
            }
            Err(e) => {
                return Err(Error::Io {
                    message: format!("Failed to read file '{}': {}", path.display(), e),
                })
            }
        };

        let table = ChecksumTable::parse(table_payload);
        debug!(
            "diffing '{}' ({} bytes) against {} blocks",
            path.display(),
            data.len(),
            table.len()
        );

        Ok(Diff::Segments(self.scanner.scan(&data, &table)))
    }

    /// Apply a diff for `path` against the reference bytes cached by a
    /// prior [`compute_checksums`](Self::compute_checksums) call.
    ///
    /// Returns the reconstructed bytes, or `None` for the deletion case
    /// (the local file is deleted and the cache entry evicted). Persisting
    /// the returned bytes is the caller's responsibility.
    pub async fn apply_diff<P: AsRef<Path>>(
        &mut self,
        path: P,
        diff: &Diff,
    ) -> Result<Option<Vec<u8>>> {
        self.patcher.apply(&mut self.cache, path.as_ref(), diff).await
    }

    /// Whether `path` currently has cached reference bytes awaiting a sync
    pub fn has_cached_reference<P: AsRef<Path>>(&self, path: P) -> bool {
        self.cache.contains(path)
    }
}
