//! Error types for aegisgraph-core.

use std::path::PathBuf;

use thiserror::Error;

/// Graph store error types.
///
/// Malformed tokens in an edge list are not errors: they are skipped and
/// counted in [`LoadReport`](crate::graph::LoadReport).
#[derive(Error, Debug)]
pub enum Error {
    /// Node id is negative or above [`MAX_NODE_ID`](crate::graph::MAX_NODE_ID).
    #[error("Invalid node id {0}: must be in 0..=2147483647")]
    InvalidId(i64),

    /// The path policy refused a load or save path.
    #[error("Path rejected by policy: {}", .0.display())]
    PathRejected(PathBuf),

    /// Open, read, write or map failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A token in an edge list exceeds the maximum node id.
    #[error("Integer overflow in edge list token at byte offset {offset}")]
    IntegerOverflow {
        /// Byte offset of the first digit of the offending token.
        offset: usize,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type alias for graph operations.
pub type Result<T> = std::result::Result<T, Error>;
