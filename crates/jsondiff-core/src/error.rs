//! Error types for the diff crate.

use std::fmt;

/// Which input document an error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Source,
    Destination,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Source => f.write_str("source"),
            Side::Destination => f.write_str("destination"),
        }
    }
}

/// Errors that can occur around a diff.
///
/// The comparison itself never fails; these cover decoding inputs and loading
/// options.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// An input document was not valid JSON.
    #[error("failed to parse {side} document: {message}")]
    Parse { side: Side, message: String },

    /// Reading an options file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// An options file was malformed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
