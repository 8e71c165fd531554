//! The trust client: retrieval combined with signature checking.
//!
//! Retrieval alone proves that content matches its identifier. The client
//! additionally reports who, if anyone, vouches for it.

use tracing::{info, warn};

use nanopub_trust_core::Publication;
use nanopub_trust_fetch::{
    CandidateServerSource, Fetcher, FetcherConfig, HttpFetcher, RetrieveConfig, Retriever,
};
use nanopub_trust_sign::{resolve_signature, sign, verify, KeyPair, SignatureAlgorithm};

use crate::error::{Result, TrustError};

/// Configuration for the client.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Retrieval configuration.
    pub retrieve: RetrieveConfig,
    /// Reject publications without a valid signature.
    pub require_signature: bool,
}

/// Outcome of checking a publication's signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureStatus {
    /// No signature element targets the publication.
    Unsigned,
    /// The signature verifies. `signers` may be empty.
    Valid { signers: Vec<String> },
    /// A signature element exists but does not verify.
    Invalid,
}

impl SignatureStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }
}

/// A retrieved publication together with its signature status.
#[derive(Debug, Clone)]
pub struct CheckedPublication {
    pub publication: Publication,
    pub signature: SignatureStatus,
}

/// Client for retrieving and checking publications.
pub struct TrustClient<F: Fetcher> {
    retriever: Retriever<F>,
    config: ClientConfig,
}

impl TrustClient<HttpFetcher> {
    /// Create a client that fetches over HTTP and from local files.
    pub fn http(fetcher: FetcherConfig, config: ClientConfig) -> Result<Self> {
        Ok(Self::new(HttpFetcher::new(fetcher)?, config))
    }
}

impl<F: Fetcher> TrustClient<F> {
    /// Create a new client on top of a fetcher.
    pub fn new(fetcher: F, config: ClientConfig) -> Self {
        let retriever = Retriever::new(fetcher).with_config(config.retrieve.clone());
        Self { retriever, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn retriever(&self) -> &Retriever<F> {
        &self.retriever
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Retrieval
    // ─────────────────────────────────────────────────────────────────────────

    /// Retrieve a publication by trusty URI or artifact code.
    ///
    /// `Ok(None)` means no candidate served self-certifying content.
    pub async fn retrieve<S>(&self, identifier: &str, source: &mut S) -> Result<Option<Publication>>
    where
        S: CandidateServerSource + ?Sized,
    {
        Ok(self.retriever.retrieve(identifier, source).await?)
    }

    /// Retrieve a publication and check its signature.
    pub async fn retrieve_checked<S>(
        &self,
        identifier: &str,
        source: &mut S,
    ) -> Result<Option<CheckedPublication>>
    where
        S: CandidateServerSource + ?Sized,
    {
        let Some(publication) = self.retrieve(identifier, source).await? else {
            return Ok(None);
        };
        let signature = self.check(&publication)?;
        Ok(Some(CheckedPublication {
            publication,
            signature,
        }))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Signatures
    // ─────────────────────────────────────────────────────────────────────────

    /// Resolve and verify the signature of a publication.
    ///
    /// Malformed signature metadata and key problems are errors. With
    /// `require_signature` set, anything but a valid signature is too.
    pub fn check(&self, publication: &Publication) -> Result<SignatureStatus> {
        let status = match resolve_signature(publication)? {
            None => SignatureStatus::Unsigned,
            Some(element) if verify(&element)? => SignatureStatus::Valid {
                signers: element.signers().to_vec(),
            },
            Some(_) => SignatureStatus::Invalid,
        };

        match &status {
            SignatureStatus::Valid { signers } => {
                info!(uri = %publication.uri(), signers = signers.len(), "signature verified");
            }
            SignatureStatus::Invalid => {
                warn!(uri = %publication.uri(), "signature does not verify");
            }
            SignatureStatus::Unsigned => {}
        }

        if self.config.require_signature {
            match status {
                SignatureStatus::Unsigned => {
                    return Err(TrustError::Unsigned(publication.uri().to_string()))
                }
                SignatureStatus::Invalid => {
                    return Err(TrustError::InvalidSignature(publication.uri().to_string()))
                }
                SignatureStatus::Valid { .. } => {}
            }
        }
        Ok(status)
    }

    /// Sign an unsigned publication.
    pub fn sign(
        &self,
        publication: &Publication,
        algorithm: SignatureAlgorithm,
        keys: &KeyPair,
        signer: Option<&str>,
    ) -> Result<Publication> {
        Ok(sign(publication, algorithm, keys, signer)?)
    }
}
