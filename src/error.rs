//! Error types for the wumpus crate

use thiserror::Error;

use crate::types::GridSize;

/// Main error type for the wumpus crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("snapshot truncated: expected at least {expected} bytes, got {got}")]
    TruncatedSnapshot { expected: usize, got: usize },

    #[error("snapshot has {extra} unexpected trailing bytes")]
    TrailingSnapshotBytes { extra: usize },

    #[error("snapshot magic {found:?} does not match {expected:?}")]
    InvalidSnapshotMagic { found: Vec<u8>, expected: Vec<u8> },

    #[error("unsupported snapshot format version {found} (expected {expected})")]
    UnsupportedSnapshotVersion { found: u8, expected: u8 },

    #[error("state record must be {expected} bytes, got {got}")]
    InvalidRecordLength { expected: usize, got: usize },

    #[error("snapshot contains state key {key} more than once")]
    DuplicateStateKey { key: String },

    #[error("grid mismatch: table is {expected}, got {got}")]
    GridMismatch { expected: GridSize, got: GridSize },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("invalid map: {message}")]
    InvalidMap { message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to {operation}: {message}")]
    SerializationContext { operation: String, message: String },

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
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
