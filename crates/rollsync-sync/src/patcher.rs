//! Diff application against cached reference bytes

use std::io::ErrorKind;
use std::path::Path;

use rollsync_types::{Diff, DiffSegment, Error, Result};
use tokio::fs;
use tracing::{debug, info};

use crate::cache::SessionCache;

/// Replays a diff against the session cache to reconstruct file content
#[derive(Debug, Clone, Copy)]
pub struct Patcher {
    block_size: usize,
}

impl Patcher {
    /// Create a patcher for the given block size
    pub fn new(block_size: usize) -> Self {
        Self { block_size }
    }

    /// Apply a diff for `path` against the cached reference bytes.
    ///
    /// The deletion sentinel removes the local file (if present) and the
    /// cache entry, yielding `None`. Otherwise the path must have a
    /// not-yet-consumed cache entry from a prior checksum run; the entry is
    /// evicted after a successful reconstruction, so a second sync for the
    /// same path fails until the path is checksummed again. Writing the
    /// reconstructed bytes to disk is the caller's responsibility.
    pub async fn apply(
        &self,
        cache: &mut SessionCache,
        path: &Path,
        diff: &Diff,
    ) -> Result<Option<Vec<u8>>> {
        let segments = match diff {
            Diff::Removed => {
                self.remove_local(path).await?;
                cache.evict(path);
                info!("synced deletion of: {}", path.display());
                return Ok(None);
            }
            Diff::Segments(segments) => segments,
        };

        let raw = cache.get(path).ok_or_else(|| Error::MissingChecksum {
            path: path.to_path_buf(),
        })?;

        let mut synced = Vec::new();
        for segment in segments {
            match segment {
                DiffSegment::Literal { data } => synced.extend_from_slice(data),
                DiffSegment::Reference { index } => {
                    synced.extend_from_slice(self.reference_slice(raw, *index)?);
                }
                DiffSegment::LiteralThenReference { data, index } => {
                    synced.extend_from_slice(data);
                    synced.extend_from_slice(self.reference_slice(raw, *index)?);
                }
            }
        }

        cache.evict(path);
        debug!(
            "reconstructed {} bytes from {} segments for: {}",
            synced.len(),
            segments.len(),
            path.display()
        );
        Ok(Some(synced))
    }

    /// Slice of the cached reference covering block `index`:
    /// `[index * B, min((index + 1) * B, len))`
    fn reference_slice<'a>(&self, raw: &'a [u8], index: u32) -> Result<&'a [u8]> {
        let start = index as usize * self.block_size;
        if start >= raw.len() {
            return Err(Error::Protocol {
                message: format!(
                    "block reference {} exceeds cached reference length {}",
                    index,
                    raw.len()
                ),
            });
        }

        let end = (start + self.block_size).min(raw.len());
        Ok(&raw[start..end])
    }

    async fn remove_local(&self, path: &Path) -> Result<()> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Io {
                message: format!("Failed to delete file '{}': {}", path.display(), e),
            }),
        }
    }
}
