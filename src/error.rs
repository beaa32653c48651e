//! Error types for vector operations.

use thiserror::Error;

/// Errors returned by fallible vector operations.
///
/// Both kinds are detected before any node is touched, so a failed call
/// leaves the vector exactly as it was.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Index argument outside `[0, len)`.
    #[error("index {index} is out of range for vector of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    /// Branching parameters that cannot describe a trie.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
