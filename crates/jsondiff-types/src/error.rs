use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unknown patch op: {0:?} (expected add, remove or replace)")]
    UnknownOp(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}
