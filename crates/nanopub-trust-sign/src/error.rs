//! Error types for signature handling.

use thiserror::Error;

use nanopub_trust_core::CoreError;

/// Errors that can occur while resolving, verifying or creating signatures.
#[derive(Debug, Error)]
pub enum SignError {
    /// The signature metadata is structurally wrong.
    #[error("malformed signature: {0}")]
    MalformedSignature(String),

    /// More than one signature element targets the publication.
    #[error("multiple signature elements found")]
    MultipleSignatureElements,

    /// The algorithm tag names no supported algorithm.
    #[error("unsupported signature algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// The public key could not be decoded.
    #[error("key decoding failed: {0}")]
    KeyDecoding(String),

    /// The signing primitive failed or the key does not fit the algorithm.
    #[error("crypto error: {0}")]
    Crypto(String),

    /// The signature target carries no artifact code.
    #[error("publication is not content-addressed: {0}")]
    NotContentAddressed(String),

    /// Building or finalizing the publication failed.
    #[error("publication error: {0}")]
    Publication(#[from] CoreError),
}

impl SignError {
    /// Whether this is a cryptographic failure (algorithm, key or primitive).
    pub fn is_crypto(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedAlgorithm(_) | Self::KeyDecoding(_) | Self::Crypto(_)
        )
    }
}

/// Result type for signature operations.
pub type Result<T> = std::result::Result<T, SignError>;
