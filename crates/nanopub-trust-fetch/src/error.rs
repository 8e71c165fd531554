//! Error types for retrieval.

use thiserror::Error;

use nanopub_trust_core::CoreError;

/// Errors that can occur while retrieving publications.
///
/// Only the identifier variants ever escape [`crate::Retriever::retrieve`];
/// everything else describes a single failed candidate.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The identifier is neither a trusty URI nor an artifact code.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// The artifact code is for another kind of artifact.
    #[error("wrong artifact type: expected module {expected}, found {found}")]
    WrongArtifactType { expected: String, found: String },

    /// Network or file access failed.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("unexpected status: {0}")]
    Status(u16),

    /// The response is not a structurally valid publication.
    #[error("invalid content: {0}")]
    Parse(#[source] CoreError),

    /// The content does not hash to the code in its own URI.
    #[error("content is not self-certifying: {0}")]
    NotSelfCertifying(String),

    /// The content is valid but for a different artifact code.
    #[error("requested {requested}, got {found}")]
    CodeMismatch { requested: String, found: String },
}

impl FetchError {
    /// Whether the failure points at a dishonest or broken server rather
    /// than plain unavailability.
    pub fn is_suspicious(&self) -> bool {
        matches!(self, Self::NotSelfCertifying(_) | Self::CodeMismatch { .. })
    }
}

impl From<CoreError> for FetchError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InvalidIdentifier(msg) => Self::InvalidIdentifier(msg),
            CoreError::WrongArtifactType { expected, found } => {
                Self::WrongArtifactType { expected, found }
            }
            other => Self::Parse(other),
        }
    }
}

/// Result type for retrieval operations.
pub type Result<T> = std::result::Result<T, FetchError>;
