//! Error types for the nanopub trust core.

use thiserror::Error;

/// Core errors that can occur while building, parsing or addressing publications.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("malformed publication: {0}")]
    MalformedPublication(String),

    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("wrong artifact type: expected module {expected}, found {found}")]
    WrongArtifactType { expected: String, found: String },

    #[error("parse error: {0}")]
    Parse(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
