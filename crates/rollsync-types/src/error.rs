//! Error types and handling for rollsync
//!
//! This module provides the structured error types shared by all rollsync
//! operations, together with helpers for categorizing them.

use std::path::PathBuf;

/// Main error type for rollsync operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        /// Error message from the I/O operation
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message describing the configuration issue
        message: String,
    },

    /// A sync was requested for a path that was never checksummed,
    /// or whose cached reference bytes were already consumed
    #[error("must checksum before sync: {path}")]
    MissingChecksum {
        /// Path whose reference bytes are not cached
        path: PathBuf,
    },

    /// Malformed diff or checksum-table payload
    #[error("Protocol error: {message}")]
    Protocol {
        /// Error message describing the malformed payload
        message: String,
    },
}

/// Error kind for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// I/O related errors
    Io,
    /// Configuration errors
    Config,
    /// Ordering precondition violations
    MissingChecksum,
    /// Malformed payloads
    Protocol,
}

impl Error {
    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io { .. } => ErrorKind::Io,
            Self::Config { .. } => ErrorKind::Config,
            Self::MissingChecksum { .. } => ErrorKind::MissingChecksum,
            Self::Protocol { .. } => ErrorKind::Protocol,
        }
    }

    /// Check if this error is recoverable by retrying the same call
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Io { message } => {
                message.contains("Interrupted")
                    || message.contains("WouldBlock")
                    || message.contains("TimedOut")
            }
            // A missing cache entry is fixed by re-running the checksum
            // step, not by retrying the sync call itself.
            Self::MissingChecksum { .. } => false,
            Self::Config { .. } | Self::Protocol { .. } => false,
        }
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new protocol error
    pub fn protocol<S: Into<String>>(message: S) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }
}
