//! Rolling-checksum delta synchronization for rollsync
//!
//! This crate implements the classic rolling-checksum synchronization
//! algorithm: weak/strong two-tier hashing over a sliding byte window.
//!
//! - **Checksum generation**: Split a reference file into fixed-size blocks
//!   and serialize their weak/strong checksums for the peer
//! - **Match scanning**: Slide a one-byte-granular window over the modified
//!   copy and emit a minimal literal/reference diff
//! - **Patching**: Replay a diff against cached reference bytes to
//!   reconstruct the synchronized content, or handle deletion
//!
//! The network transport exchanging checksum tables and diffs between the
//! two endpoints is external; it interacts with this crate only through
//! [`SyncEngine`]'s three operations.
//!
//! # Examples
//!
//! ```rust
//! use rollsync_sync::{SyncConfig, SyncEngine};
//!
//! # async fn example() -> rollsync_types::Result<()> {
//! // Endpoint A holds the reference file.
//! let mut a = SyncEngine::with_config(SyncConfig { block_size: 8 })?;
//! let table = a.compute_checksums("shared.txt").await?;
//!
//! // Endpoint B holds the (possibly modified) copy.
//! let b = SyncEngine::with_config(SyncConfig { block_size: 8 })?;
//! let diff = b.compute_diff("shared.txt", &table).await?;
//!
//! // Back on A, reconstruct B's content.
//! if let Some(bytes) = a.apply_diff("shared.txt", &diff).await? {
//!     tokio::fs::write("shared.txt", bytes).await.ok();
//! }
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod checksum;
pub mod engine;
pub mod patcher;
pub mod scanner;
pub mod table;

pub use cache::SessionCache;
pub use checksum::{strong_digest, weak16, RollingChecksum};
pub use engine::{SyncConfig, SyncEngine};
pub use patcher::Patcher;
pub use scanner::MatchScanner;
pub use table::{serialize_blocks, ChecksumTable};
