//! Result type alias for rollsync operations

use crate::Error;

/// Result type alias for rollsync operations
pub type Result<T> = std::result::Result<T, Error>;
