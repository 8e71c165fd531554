//! Signature verification.

use tracing::debug;

use nanopub_trust_core::{ArtifactCode, ContentAddressing, SelfRef, TrustyRdf};

use crate::element::SignatureElement;
use crate::error::{Result, SignError};

/// Verify a resolved signature element with the default content addressing.
pub fn verify(element: &SignatureElement) -> Result<bool> {
    verify_with(&TrustyRdf, element)
}

/// Verify a resolved signature element.
///
/// The targets are canonicalized against the artifact code in the target
/// URI, digested, and checked against the signature with the element's key.
/// A mismatch is `Ok(false)`; key and algorithm problems are errors.
pub fn verify_with<C: ContentAddressing + ?Sized>(
    addressing: &C,
    element: &SignatureElement,
) -> Result<bool> {
    let code = ArtifactCode::from_uri(element.target_uri())
        .ok_or_else(|| SignError::NotContentAddressed(element.target_uri().to_string()))?;
    let canonical = addressing.canonicalize(element.targets(), &SelfRef::Code(code));
    let digest = addressing.digest(&canonical);

    let algorithm = element.algorithm()?;
    let public_key = element.public_key_der()?;
    let valid = algorithm.verify(&public_key, digest.as_bytes(), element.signature())?;

    debug!(
        uri = %element.target_uri(),
        algorithm = %algorithm,
        valid,
        "verified signature"
    );
    Ok(valid)
}
