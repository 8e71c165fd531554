//! Vocabulary IRIs used by publications and their signatures.

/// Nanopublication schema namespace.
pub const NP: &str = "http://www.nanopub.org/nschema#";
/// Nanopublication extension namespace (signatures, misc).
pub const NPX: &str = "http://purl.org/nanopub/x/";
pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
pub const DCTERMS: &str = "http://purl.org/dc/terms/";
pub const PROV: &str = "http://www.w3.org/ns/prov#";
pub const PAV: &str = "http://purl.org/pav/";

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const RDF_LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
pub const XSD_DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";

pub const NANOPUBLICATION: &str = "http://www.nanopub.org/nschema#Nanopublication";
pub const HAS_ASSERTION: &str = "http://www.nanopub.org/nschema#hasAssertion";
pub const HAS_PROVENANCE: &str = "http://www.nanopub.org/nschema#hasProvenance";
pub const HAS_PUBLICATION_INFO: &str = "http://www.nanopub.org/nschema#hasPublicationInfo";

pub const DCTERMS_CREATOR: &str = "http://purl.org/dc/terms/creator";
pub const DCTERMS_CREATED: &str = "http://purl.org/dc/terms/created";
pub const PROV_WAS_DERIVED_FROM: &str = "http://www.w3.org/ns/prov#wasDerivedFrom";
pub const PROV_HAD_PRIMARY_SOURCE: &str = "http://www.w3.org/ns/prov#hadPrimarySource";

/// Signature vocabulary.
pub mod sig {
    pub const HAS_SIGNATURE_ELEMENT: &str = "http://purl.org/nanopub/x/hasSignatureElement";
    pub const HAS_SIGNATURE_TARGET: &str = "http://purl.org/nanopub/x/hasSignatureTarget";
    pub const HAS_SIGNATURE: &str = "http://purl.org/nanopub/x/hasSignature";
    pub const HAS_PUBLIC_KEY: &str = "http://purl.org/nanopub/x/hasPublicKey";
    pub const HAS_ALGORITHM: &str = "http://purl.org/nanopub/x/hasAlgorithm";
    pub const SIGNED_BY: &str = "http://purl.org/nanopub/x/signedBy";
}

/// Prefixes every built publication declares.
pub const DEFAULT_NAMESPACES: &[(&str, &str)] = &[
    ("np", NP),
    ("rdf", RDF),
    ("xsd", XSD),
    ("dcterms", DCTERMS),
    ("prov", PROV),
    ("pav", PAV),
];
