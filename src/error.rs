//! Error types for the ninarow crate

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the ninarow crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid move: position {position} is already occupied")]
    InvalidMove { position: usize },

    #[error("move {position} is out of bounds for a board with {squares} squares")]
    OutOfBounds { position: usize, squares: usize },

    #[error("unsupported board size {size} (supported sizes: 3, 5, 7)")]
    UnsupportedBoardSize { size: usize },

    #[error("no valid moves available")]
    NoValidMoves,

    #[error("wrong cell count: expected {expected}, got {got}")]
    InvalidBoardLength { expected: usize, got: usize },

    #[error("invalid cache key '{key}': {reason}")]
    InvalidCacheKey { key: String, reason: String },

    #[error("failed to load cache from {}: {message}", path.display())]
    CacheLoad { path: PathBuf, message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
