//! Checksum table: wire serialization and bucket-indexed lookup
//!
//! The wire payload is a flat sequence of per-block records, each field
//! length-tagged and terminated with `\r\n`, records separated by the
//! literal token `$\r\n`:
//!
//! ```text
//! $<len(index)>\r\n<index>\r\n$<len(weak)>\r\n<weak>\r\n$32\r\n<strong>\r\n$\r\n
//! ```
//!
//! The strong digest field always carries the fixed `$32` tag (32 hex
//! characters). There is no outer array wrapper.

use std::collections::HashMap;

use rollsync_types::BlockChecksum;
use tracing::{debug, warn};

use crate::checksum::weak16;

/// Record terminator separating per-block chunks on the wire
const RECORD_TERMINATOR: &str = "$\r\n";

/// Checksum table received from the peer, indexed by the 16-bit bucket of
/// each block's weak sum. Chains keep arrival order, which equals block
/// index order as generated. Read-only during scanning.
#[derive(Debug, Default)]
pub struct ChecksumTable {
    buckets: HashMap<u16, Vec<BlockChecksum>>,
    len: usize,
}

impl ChecksumTable {
    /// Parse a serialized checksum table.
    ///
    /// Parsing is lenient: malformed or truncated records are skipped with
    /// a warning rather than failing the whole table. A skipped record only
    /// costs match opportunities, since the affected region falls back to
    /// literal emission. An empty payload parses to an empty table.
    pub fn parse(payload: &str) -> Self {
        let mut table = Self::default();

        for chunk in payload.split(RECORD_TERMINATOR) {
            if chunk.is_empty() {
                continue;
            }

            match parse_record(chunk) {
                Some(block) => table.insert(block),
                None => warn!("skipping malformed checksum record: {:?}", chunk),
            }
        }

        debug!("parsed checksum table with {} blocks", table.len);
        table
    }

    /// Candidate blocks sharing the bucket of the given weak sum
    pub fn candidates(&self, sum: u32) -> &[BlockChecksum] {
        self.buckets
            .get(&weak16(sum))
            .map_or(&[], Vec::as_slice)
    }

    /// Number of blocks in the table
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the table holds no blocks
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn insert(&mut self, block: BlockChecksum) {
        self.buckets
            .entry(weak16(block.weak))
            .or_default()
            .push(block);
        self.len += 1;
    }
}

/// Parse one record chunk into a block checksum.
///
/// A chunk splits on `\r\n` into `["$1", "<index>", "$8", "<weak>", "$32",
/// "<strong>", ""]`; the values sit at positions 1, 3 and 5.
fn parse_record(chunk: &str) -> Option<BlockChecksum> {
    let frags: Vec<&str> = chunk.split("\r\n").collect();

    let index = frags.get(1)?.parse().ok()?;
    let weak = frags.get(3)?.parse().ok()?;
    let strong = *frags.get(5)?;
    if strong.len() != 32 {
        return None;
    }

    Some(BlockChecksum::new(index, weak, strong.to_string()))
}

/// Serialize per-block checksums to the wire format, in index order
pub fn serialize_blocks(blocks: &[BlockChecksum]) -> String {
    let mut payload = String::new();

    for block in blocks {
        let index = block.index.to_string();
        let weak = block.weak.to_string();

        payload.push_str(&format!("${}\r\n{}\r\n", index.len(), index));
        payload.push_str(&format!("${}\r\n{}\r\n", weak.len(), weak));
        payload.push_str(&format!("$32\r\n{}\r\n", block.strong));
        payload.push_str(RECORD_TERMINATOR);
    }

    payload
}
