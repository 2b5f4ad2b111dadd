//! Error types for newscache

use std::io;

use thiserror::Error;

/// Result type alias for newscache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while configuring or constructing a cache.
///
/// Normal cache traffic never fails: a missing key is `None` and deleting an
/// absent key is a no-op.
#[derive(Debug, Error)]
pub enum Error {
    /// Capacity must be at least one entry
    #[error("Invalid capacity: {0} (must be greater than 0)")]
    InvalidCapacity(usize),

    /// Algorithm name is neither LRU nor LFU
    #[error("Unknown eviction policy: {0:?} (expected LRU or LFU)")]
    UnknownPolicy(String),

    /// Configuration file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Configuration text could not be parsed
    #[error("Config error: {0}")]
    Config(#[from] serde_yaml::Error),
}
