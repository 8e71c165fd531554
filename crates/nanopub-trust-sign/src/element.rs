//! The signature element: a signature description embedded in pubinfo.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use nanopub_trust_core::Statement;

use crate::algorithm::SignatureAlgorithm;
use crate::error::{Result, SignError};

/// A resolved signature element.
///
/// Holds everything needed to verify: the signature bytes, algorithm tag,
/// public key literal, signer URIs and the target statements that were
/// digested when signing. The `npx:hasSignature` statement itself is never
/// part of the targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureElement {
    target_uri: String,
    element_uri: String,
    signature: Vec<u8>,
    algorithm: String,
    public_key: String,
    signers: Vec<String>,
    targets: Vec<Statement>,
}

impl SignatureElement {
    pub(crate) fn new(
        target_uri: String,
        element_uri: String,
        signature: Vec<u8>,
        algorithm: String,
        public_key: String,
        signers: Vec<String>,
        targets: Vec<Statement>,
    ) -> Self {
        Self {
            target_uri,
            element_uri,
            signature,
            algorithm,
            public_key,
            signers,
            targets,
        }
    }

    /// URI of the publication this element signs.
    pub fn target_uri(&self) -> &str {
        &self.target_uri
    }

    /// URI identifying the element within pubinfo.
    pub fn element_uri(&self) -> &str {
        &self.element_uri
    }

    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// The algorithm tag exactly as stored.
    pub fn algorithm_tag(&self) -> &str {
        &self.algorithm
    }

    /// The parsed algorithm.
    pub fn algorithm(&self) -> Result<SignatureAlgorithm> {
        self.algorithm.parse()
    }

    /// The base64 public key literal.
    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// Decode the public key literal into X.509 DER.
    pub fn public_key_der(&self) -> Result<Vec<u8>> {
        let compact: String = self.public_key.split_whitespace().collect();
        STANDARD
            .decode(compact)
            .map_err(|e| SignError::KeyDecoding(format!("public key is not base64: {}", e)))
    }

    pub fn signers(&self) -> &[String] {
        &self.signers
    }

    /// Statements covered by the signature.
    pub fn targets(&self) -> &[Statement] {
        &self.targets
    }
}
