//! Signature resolution: locate and read the signature element of a publication.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::debug;

use nanopub_trust_core::vocab::sig::{
    HAS_ALGORITHM, HAS_PUBLIC_KEY, HAS_SIGNATURE, HAS_SIGNATURE_ELEMENT, HAS_SIGNATURE_TARGET,
    SIGNED_BY,
};
use nanopub_trust_core::{Publication, Term};

use crate::element::SignatureElement;
use crate::error::{Result, SignError};

/// Resolve the signature element of a publication.
///
/// Returns `Ok(None)` for an unsigned publication. Fails with
/// [`SignError::MultipleSignatureElements`] when more than one element
/// targets the publication and with [`SignError::MalformedSignature`] when
/// the element is incomplete or a field has the wrong kind of value.
pub fn resolve_signature(publication: &Publication) -> Result<Option<SignatureElement>> {
    let Some(element_uri) = signature_element_uri(publication)? else {
        return Ok(None);
    };

    let mut targets = Vec::with_capacity(publication.statement_count());
    targets.extend_from_slice(publication.head());
    targets.extend_from_slice(publication.assertion());
    targets.extend_from_slice(publication.provenance());

    let mut signature = None;
    let mut algorithm = None;
    let mut public_key = None;
    let mut signers = Vec::new();

    for st in publication.pubinfo() {
        if !st.subject.is_iri_eq(&element_uri) {
            targets.push(st.clone());
            continue;
        }
        let predicate = st.predicate.as_iri().unwrap_or_default();
        if predicate == HAS_SIGNATURE {
            let literal = literal_value(&st.object, "signature")?;
            let compact: String = literal.split_whitespace().collect();
            let bytes = STANDARD.decode(compact).map_err(|e| {
                SignError::MalformedSignature(format!("signature is not base64: {}", e))
            })?;
            signature = Some(bytes);
            continue;
        }

        targets.push(st.clone());
        if predicate == HAS_PUBLIC_KEY {
            public_key = Some(literal_value(&st.object, "public key")?.to_string());
        } else if predicate == HAS_ALGORITHM {
            algorithm = Some(literal_value(&st.object, "algorithm")?.to_string());
        } else if predicate == SIGNED_BY {
            let signer = st.object.as_iri().ok_or_else(|| {
                SignError::MalformedSignature(format!("URI expected as signer: {}", st.object))
            })?;
            signers.push(signer.to_string());
        }
    }

    let signature = signature.ok_or_else(|| missing("signature"))?;
    let algorithm = algorithm.ok_or_else(|| missing("algorithm"))?;
    // Only full public keys are accepted; key fingerprints are not supported.
    let public_key = public_key.ok_or_else(|| missing("public key"))?;

    debug!(element = %element_uri, signers = signers.len(), "resolved signature element");
    Ok(Some(SignatureElement::new(
        publication.uri().to_string(),
        element_uri,
        signature,
        algorithm,
        public_key,
        signers,
        targets,
    )))
}

/// Best-effort check for signature metadata, including legacy formats.
///
/// May report false positives. Never use it to decide whether a
/// publication is trustworthy; use [`resolve_signature`] and verification.
pub fn looks_signed(publication: &Publication) -> bool {
    publication.pubinfo().iter().any(|st| {
        [HAS_SIGNATURE_ELEMENT, HAS_SIGNATURE_TARGET, HAS_SIGNATURE, HAS_PUBLIC_KEY]
            .into_iter()
            .any(|p| st.has_predicate(p))
    })
}

fn signature_element_uri(publication: &Publication) -> Result<Option<String>> {
    let mut element: Option<String> = None;
    for st in publication.pubinfo() {
        if !st.has_predicate(HAS_SIGNATURE_TARGET) || !st.object.is_iri_eq(publication.uri()) {
            continue;
        }
        let subject = st.subject.as_iri().ok_or_else(|| {
            SignError::MalformedSignature("signature element must be identified by URI".into())
        })?;
        match &element {
            Some(existing) if existing != subject => {
                return Err(SignError::MultipleSignatureElements)
            }
            Some(_) => {}
            None => element = Some(subject.to_string()),
        }
    }
    Ok(element)
}

fn literal_value<'a>(term: &'a Term, field: &str) -> Result<&'a str> {
    term.as_literal()
        .map(|l| l.lexical())
        .ok_or_else(|| SignError::MalformedSignature(format!("literal expected as {}: {}", field, term)))
}

fn missing(field: &str) -> SignError {
    SignError::MalformedSignature(format!("signature element without {}", field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nanopub_trust_core::{PublicationBuilder, Statement};

    const NP: &str = "http://example.org/np1/";
    const SIG: &str = "http://example.org/np1/sig";

    fn base() -> PublicationBuilder {
        PublicationBuilder::new(NP)
            .add_assertion(
                Term::iri("http://example.org/s"),
                Term::iri("http://example.org/p"),
                Term::literal("o"),
            )
            .add_provenance(
                Term::iri("http://www.w3.org/ns/prov#hadPrimarySource"),
                Term::iri("http://example.org/src"),
            )
            .add_creator("http://example.org/me")
    }

    fn about_sig(builder: PublicationBuilder, subject: &str, predicate: &str, object: Term) -> PublicationBuilder {
        builder.add_pubinfo_statement(Statement::triple(Term::iri(subject), Term::iri(predicate), object))
    }

    fn complete(builder: PublicationBuilder) -> PublicationBuilder {
        let b = about_sig(builder, SIG, HAS_SIGNATURE_TARGET, Term::iri(NP));
        let b = about_sig(b, SIG, HAS_PUBLIC_KEY, Term::literal("AAAA"));
        let b = about_sig(b, SIG, HAS_ALGORITHM, Term::literal("RSA"));
        let b = about_sig(b, SIG, SIGNED_BY, Term::iri("http://example.org/me"));
        about_sig(b, SIG, HAS_SIGNATURE, Term::literal("AQID"))
    }

    #[test]
    fn test_unsigned() {
        let publication = base().finalize().unwrap();
        assert!(resolve_signature(&publication).unwrap().is_none());
        assert!(!looks_signed(&publication));
    }

    #[test]
    fn test_resolve_complete_element() {
        let publication = complete(base()).finalize().unwrap();
        let element = resolve_signature(&publication).unwrap().unwrap();
        assert_eq!(element.element_uri(), SIG);
        assert_eq!(element.target_uri(), NP);
        assert_eq!(element.signature(), &[1, 2, 3]);
        assert_eq!(element.algorithm_tag(), "RSA");
        assert_eq!(element.public_key(), "AAAA");
        assert_eq!(element.signers(), &["http://example.org/me".to_string()]);
        // Everything but the signature statement is a target.
        assert_eq!(element.targets().len(), publication.statement_count() - 1);
        assert!(!element.targets().iter().any(|st| st.has_predicate(HAS_SIGNATURE)));
        assert!(looks_signed(&publication));
    }

    #[test]
    fn test_multiple_elements() {
        let b = complete(base());
        let b = about_sig(b, "http://example.org/np1/sig2", HAS_SIGNATURE_TARGET, Term::iri(NP));
        let publication = b.finalize().unwrap();
        assert!(matches!(
            resolve_signature(&publication),
            Err(SignError::MultipleSignatureElements)
        ));
    }

    #[test]
    fn test_target_of_other_publication_is_ignored() {
        let b = about_sig(base(), SIG, HAS_SIGNATURE_TARGET, Term::iri("http://example.org/other"));
        let publication = b.finalize().unwrap();
        assert!(resolve_signature(&publication).unwrap().is_none());
        assert!(looks_signed(&publication));
    }

    #[test]
    fn test_missing_fields() {
        let b = about_sig(base(), SIG, HAS_SIGNATURE_TARGET, Term::iri(NP));
        let b = about_sig(b, SIG, HAS_PUBLIC_KEY, Term::literal("AAAA"));
        let b = about_sig(b, SIG, HAS_SIGNATURE, Term::literal("AQID"));
        let publication = b.finalize().unwrap();
        let err = resolve_signature(&publication).unwrap_err();
        assert!(matches!(err, SignError::MalformedSignature(msg) if msg.contains("algorithm")));
    }

    #[test]
    fn test_wrong_value_kinds() {
        let b = about_sig(complete(base()), SIG, SIGNED_BY, Term::literal("not a uri"));
        let publication = b.finalize().unwrap();
        let err = resolve_signature(&publication).unwrap_err();
        assert!(matches!(err, SignError::MalformedSignature(msg) if msg.contains("signer")));

        let b = about_sig(complete(base()), SIG, HAS_ALGORITHM, Term::iri("http://example.org/RSA"));
        let publication = b.finalize().unwrap();
        let err = resolve_signature(&publication).unwrap_err();
        assert!(matches!(err, SignError::MalformedSignature(msg) if msg.contains("algorithm")));
    }

    #[test]
    fn test_blank_node_element() {
        let b = base().add_pubinfo_statement(Statement::triple(
            Term::bnode("s"),
            Term::iri(HAS_SIGNATURE_TARGET),
            Term::iri(NP),
        ));
        let publication = b.finalize().unwrap();
        assert!(matches!(
            resolve_signature(&publication),
            Err(SignError::MalformedSignature(_))
        ));
    }
}
