//! Sliding-window match scanner
//!
//! Slides a byte window over the modified file one byte at a time,
//! consulting the checksum table for candidate blocks, and emits the
//! ordered diff segments that reconstruct the file from matched reference
//! blocks plus literal bytes.

use rollsync_types::DiffSegment;
use tracing::debug;

use crate::checksum::{strong_digest, RollingChecksum};
use crate::table::ChecksumTable;

/// Scanner producing a diff between local bytes and a peer's checksum table
#[derive(Debug, Clone, Copy)]
pub struct MatchScanner {
    block_size: usize,
}

impl MatchScanner {
    /// Create a scanner for the given block size
    pub fn new(block_size: usize) -> Self {
        Self { block_size }
    }

    /// Scan `data` against `table` and emit the reconstruction recipe.
    ///
    /// The window is `min(block_size, data.len())` bytes long and advances
    /// by exactly one byte per step. There is no fast-forward by a full
    /// block after a match: skipping ahead can misalign multi-byte encoded
    /// characters that straddle a block boundary, so every position is
    /// scanned.
    ///
    /// A candidate match must pass three gates in order: shared 16-bit
    /// bucket, equal full weak sum, equal strong digest of the current
    /// window. The first full match in bucket order (= block index order)
    /// wins.
    pub fn scan(&self, data: &[u8], table: &ChecksumTable) -> Vec<DiffSegment> {
        let mut segments = Vec::new();
        let len = data.len();
        let window = self.block_size.min(len);

        let mut start = 0usize;
        let mut end = window;
        let mut last_matched_end = 0usize;
        let mut rolling: Option<RollingChecksum> = None;

        while end <= len {
            let weak = match rolling {
                None => RollingChecksum::new(&data[start..end]),
                Some(mut prev) => {
                    prev.roll(data[start - 1], data[end - 1]);
                    prev
                }
            };
            rolling = Some(weak);
            let sum = weak.sum();

            let matched = table.candidates(sum).iter().find(|candidate| {
                candidate.weak == sum && candidate.strong == strong_digest(&data[start..end])
            });

            if let Some(candidate) = matched {
                let index = candidate.index;
                if start < last_matched_end {
                    // The new match overlaps the previous one. The literal
                    // deliberately re-includes the byte at
                    // last_matched_end - 1; reconstruction depends on this
                    // rule being applied consistently.
                    segments.push(DiffSegment::LiteralThenReference {
                        data: data[last_matched_end - 1..end].to_vec(),
                        index,
                    });
                } else if start > last_matched_end {
                    segments.push(DiffSegment::LiteralThenReference {
                        data: data[last_matched_end..start].to_vec(),
                        index,
                    });
                } else {
                    segments.push(DiffSegment::Reference { index });
                }
                last_matched_end = end;
            } else if end == len {
                // Scan exhausted without a match at the final position:
                // everything past the last match is literal, even if empty.
                segments.push(DiffSegment::Literal {
                    data: data[last_matched_end..].to_vec(),
                });
            }

            start += 1;
            end += 1;
        }

        debug!(
            "scanned {} bytes into {} diff segments",
            len,
            segments.len()
        );
        segments
    }
}
