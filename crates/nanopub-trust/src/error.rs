//! Error types for the trust client.

use nanopub_trust_core::CoreError;
use nanopub_trust_fetch::FetchError;
use nanopub_trust_sign::SignError;
use thiserror::Error;

/// Errors that can occur during client operations.
#[derive(Debug, Error)]
pub enum TrustError {
    /// Publication model error.
    #[error("publication error: {0}")]
    Core(#[from] CoreError),

    /// Signature error.
    #[error("signature error: {0}")]
    Sign(#[from] SignError),

    /// Retrieval error.
    #[error("retrieval error: {0}")]
    Fetch(#[from] FetchError),

    /// A signature was required but the publication has none.
    #[error("publication is not signed: {0}")]
    Unsigned(String),

    /// A signature was required but it does not verify.
    #[error("signature does not verify: {0}")]
    InvalidSignature(String),
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, TrustError>;
