//! Core type system and error handling for rollsync
//!
//! This crate provides the foundational types shared by the rollsync
//! delta-synchronization engine:
//!
//! - **Error handling**: Structured error types with categorization helpers
//! - **Checksum types**: Per-block checksum descriptors exchanged between peers
//! - **Diff types**: The segment recipe a scanner emits and a patcher replays
//!
//! # Examples
//!
//! ```rust
//! use rollsync_types::{Diff, DiffSegment};
//!
//! let diff = Diff::Segments(vec![
//!     DiffSegment::Reference { index: 0 },
//!     DiffSegment::Literal { data: b"changed".to_vec() },
//! ]);
//! let envelope = diff.to_bytes()?;
//! assert_eq!(Diff::from_bytes(&envelope)?, diff);
//! # Ok::<(), rollsync_types::Error>(())
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod result;
pub mod types;

// Re-export commonly used types
pub use error::{Error, ErrorKind};
pub use result::Result;
pub use types::{BlockChecksum, Diff, DiffSegment};
