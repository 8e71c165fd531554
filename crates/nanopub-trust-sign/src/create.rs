//! Signature creation.
//!
//! Signing has to break the circle between content and identifier: the
//! signature covers statements that mention the publication's own URI, but
//! that URI is only known once the signed content is frozen. So:
//!
//! 1. add the signature element statements (without the signature)
//! 2. canonicalize against the provisional URI and sign the digest
//! 3. add the canonicalized `npx:hasSignature` statement
//! 4. finalize: compute the content address and rewrite self-references

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::debug;

use nanopub_trust_core::vocab::sig::{
    HAS_ALGORITHM, HAS_PUBLIC_KEY, HAS_SIGNATURE, HAS_SIGNATURE_TARGET, SIGNED_BY,
};
use nanopub_trust_core::vocab::NPX;
use nanopub_trust_core::{ContentAddressing, Publication, SelfRef, Statement, Term, TrustyRdf};

use crate::algorithm::{KeyPair, SignatureAlgorithm};
use crate::error::{Result, SignError};
use crate::resolve::resolve_signature;

/// Token appended to the publication URI to name the signature element.
const ELEMENT_SUFFIX: &str = "#sig";

/// Prefix declared for the signature vocabulary.
const NPX_PREFIX: &str = "npx";

/// Sign an unsigned publication with the default content addressing.
pub fn sign(
    publication: &Publication,
    algorithm: SignatureAlgorithm,
    keys: &KeyPair,
    signer: Option<&str>,
) -> Result<Publication> {
    sign_with(&TrustyRdf, publication, algorithm, keys, signer)
}

/// Sign an unsigned publication, producing a new content-addressed one.
pub fn sign_with<C: ContentAddressing + ?Sized>(
    addressing: &C,
    publication: &Publication,
    algorithm: SignatureAlgorithm,
    keys: &KeyPair,
    signer: Option<&str>,
) -> Result<Publication> {
    if keys.algorithm() != algorithm {
        return Err(SignError::Crypto(format!(
            "key pair is for {}, not {}",
            keys.algorithm(),
            algorithm
        )));
    }
    if resolve_signature(publication)?.is_some() {
        return Err(SignError::MalformedSignature(format!(
            "publication is already signed: {}",
            publication.uri()
        )));
    }

    let (anchor, base) = SelfRef::of(publication);
    let uri = Term::iri(publication.uri());
    let element = Term::iri(format!("{}{}", publication.uri(), ELEMENT_SUFFIX));
    let pubinfo = Term::iri(publication.pubinfo_uri());
    let about_element = |predicate: &str, object: Term| {
        Statement::new(element.clone(), Term::iri(predicate), object, pubinfo.clone())
    };

    // 1. Signature element, still without the signature
    let mut statements = publication.all_statements();
    statements.push(about_element(HAS_SIGNATURE_TARGET, uri));
    statements.push(about_element(HAS_PUBLIC_KEY, Term::literal(keys.public_key_base64()?)));
    statements.push(about_element(HAS_ALGORITHM, Term::literal(algorithm.tag())));
    if let Some(signer) = signer {
        statements.push(about_element(SIGNED_BY, Term::iri(signer)));
    }

    // 2. Sign the digest of the provisional canonical form
    let mut canonical = addressing.canonicalize(&statements, &anchor);
    let digest = addressing.digest(&canonical);
    let signature = STANDARD.encode(keys.sign(digest.as_bytes())?);

    // 3. The signature statement, in the same canonical form
    let signature_statement = about_element(HAS_SIGNATURE, Term::literal(signature));
    canonical.extend(addressing.canonicalize(&[signature_statement], &anchor));

    // 4. Freeze and address
    let mut namespaces = publication.namespaces().to_vec();
    namespaces.retain(|(prefix, _)| prefix != NPX_PREFIX);
    namespaces.push((NPX_PREFIX.to_string(), NPX.to_string()));
    let signed = addressing.finalize(canonical, &base, namespaces)?;

    debug!(uri = %signed.uri(), algorithm = %algorithm, "signed publication");
    Ok(signed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verify::verify;
    use nanopub_trust_core::{make_trusty, PublicationBuilder};

    fn unsigned() -> Publication {
        PublicationBuilder::new("http://purl.org/nanopub/temp/1234/")
            .add_namespace("ex", "http://example.org/")
            .add_assertion(
                Term::iri("http://example.org/s"),
                Term::iri("http://example.org/p"),
                Term::literal("o"),
            )
            .add_assertion(
                Term::iri("http://example.org/s"),
                Term::iri("http://example.org/q"),
                Term::bnode("x"),
            )
            .add_provenance(
                Term::iri("http://www.w3.org/ns/prov#hadPrimarySource"),
                Term::iri("http://example.org/src"),
            )
            .add_creator("http://example.org/me")
            .finalize()
            .unwrap()
    }

    fn ed25519() -> KeyPair {
        KeyPair::ed25519_from_seed(&[42u8; 32])
    }

    #[test]
    fn test_sign_produces_trusty_signed_publication() {
        let signed = sign(&unsigned(), SignatureAlgorithm::Ed25519, &ed25519(), None).unwrap();
        let code = signed.artifact_code().unwrap();
        assert!(code.is_rdf_module());
        assert_eq!(signed.uri(), format!("http://purl.org/nanopub/temp/1234/{}", code));
        assert!(TrustyRdf.is_self_certifying(&signed));
        assert!(signed
            .namespaces()
            .contains(&("npx".to_string(), NPX.to_string())));
        assert!(signed.namespaces().iter().any(|(p, _)| p == "ex"));
    }

    #[test]
    fn test_round_trip_ed25519() {
        let signed = sign(
            &unsigned(),
            SignatureAlgorithm::Ed25519,
            &ed25519(),
            Some("http://example.org/me"),
        )
        .unwrap();
        let element = resolve_signature(&signed).unwrap().unwrap();
        assert_eq!(element.target_uri(), signed.uri());
        assert_eq!(element.element_uri(), format!("{}#sig", signed.uri()));
        assert_eq!(element.signers(), &["http://example.org/me".to_string()]);
        assert!(verify(&element).unwrap());
    }

    #[test]
    fn test_round_trip_rsa() {
        let keys = KeyPair::generate_rsa(1024).unwrap();
        let signed = sign(&unsigned(), SignatureAlgorithm::Rsa, &keys, None).unwrap();
        let element = resolve_signature(&signed).unwrap().unwrap();
        assert_eq!(element.algorithm_tag(), "RSA");
        assert!(verify(&element).unwrap());
    }

    #[test]
    fn test_sign_trusty_unsigned_publication() {
        let trusty = make_trusty(&TrustyRdf, &unsigned()).unwrap();
        let signed = sign(&trusty, SignatureAlgorithm::Ed25519, &ed25519(), None).unwrap();
        assert_ne!(signed.uri(), trusty.uri());
        assert!(TrustyRdf.is_self_certifying(&signed));
        let element = resolve_signature(&signed).unwrap().unwrap();
        assert!(verify(&element).unwrap());
    }

    #[test]
    fn test_round_trip_uri_ending_in_code_character() {
        let unsigned = PublicationBuilder::new("http://example.org/np1")
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
            .finalize()
            .unwrap();
        let signed = sign(&unsigned, SignatureAlgorithm::Ed25519, &ed25519(), None).unwrap();

        let code = signed.artifact_code().unwrap();
        assert!(code.is_rdf_module());
        assert_eq!(signed.uri(), format!("http://example.org/np1.{}", code));
        assert!(TrustyRdf.is_self_certifying(&signed));
        let element = resolve_signature(&signed).unwrap().unwrap();
        assert_eq!(element.element_uri(), format!("{}#sig", signed.uri()));
        assert!(verify(&element).unwrap());
    }

    #[test]
    fn test_signing_is_deterministic_for_ed25519() {
        let a = sign(&unsigned(), SignatureAlgorithm::Ed25519, &ed25519(), None).unwrap();
        let b = sign(&unsigned(), SignatureAlgorithm::Ed25519, &ed25519(), None).unwrap();
        assert_eq!(a.uri(), b.uri());
    }

    #[test]
    fn test_algorithm_mismatch() {
        let err = sign(&unsigned(), SignatureAlgorithm::Rsa, &ed25519(), None).unwrap_err();
        assert!(err.is_crypto());
    }

    #[test]
    fn test_already_signed() {
        let signed = sign(&unsigned(), SignatureAlgorithm::Ed25519, &ed25519(), None).unwrap();
        let err = sign(&signed, SignatureAlgorithm::Ed25519, &ed25519(), None).unwrap_err();
        assert!(matches!(err, SignError::MalformedSignature(_)));
    }

    #[test]
    fn test_verify_rejects_other_key() {
        let signed = sign(&unsigned(), SignatureAlgorithm::Ed25519, &ed25519(), None).unwrap();
        let other = KeyPair::ed25519_from_seed(&[43u8; 32]).public_key_base64().unwrap();
        let forged: Vec<Statement> = signed
            .all_statements()
            .into_iter()
            .map(|mut st| {
                if st.has_predicate(HAS_PUBLIC_KEY) {
                    st.object = Term::literal(other.clone());
                }
                st
            })
            .collect();
        let forged = Publication::from_statements(forged, vec![]).unwrap();
        let element = resolve_signature(&forged).unwrap().unwrap();
        assert!(!verify(&element).unwrap());
    }

    #[test]
    fn test_verify_unsupported_algorithm() {
        let signed = sign(&unsigned(), SignatureAlgorithm::Ed25519, &ed25519(), None).unwrap();
        let altered: Vec<Statement> = signed
            .all_statements()
            .into_iter()
            .map(|mut st| {
                if st.has_predicate(HAS_ALGORITHM) {
                    st.object = Term::literal("ROT13");
                }
                st
            })
            .collect();
        let altered = Publication::from_statements(altered, vec![]).unwrap();
        let element = resolve_signature(&altered).unwrap().unwrap();
        assert!(matches!(verify(&element), Err(SignError::UnsupportedAlgorithm(_))));
    }

    #[test]
    fn test_verify_requires_content_address() {
        let publication = PublicationBuilder::new("http://example.org/np/")
            .add_assertion(
                Term::iri("http://example.org/s"),
                Term::iri("http://example.org/p"),
                Term::literal("o"),
            )
            .add_provenance(Term::iri("http://example.org/p"), Term::literal("x"))
            .add_pubinfo_statement(Statement::triple(
                Term::iri("http://example.org/np/sig"),
                Term::iri(HAS_SIGNATURE_TARGET),
                Term::iri("http://example.org/np/"),
            ))
            .add_pubinfo_statement(Statement::triple(
                Term::iri("http://example.org/np/sig"),
                Term::iri(HAS_PUBLIC_KEY),
                Term::literal("AAAA"),
            ))
            .add_pubinfo_statement(Statement::triple(
                Term::iri("http://example.org/np/sig"),
                Term::iri(HAS_ALGORITHM),
                Term::literal("RSA"),
            ))
            .add_pubinfo_statement(Statement::triple(
                Term::iri("http://example.org/np/sig"),
                Term::iri(HAS_SIGNATURE),
                Term::literal("AQID"),
            ))
            .finalize()
            .unwrap();
        let element = resolve_signature(&publication).unwrap().unwrap();
        assert!(matches!(verify(&element), Err(SignError::NotContentAddressed(_))));
    }
}
