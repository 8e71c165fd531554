//! Golden test vectors for deterministic content addressing.
//!
//! Each vector pins the canonical digest string and the artifact code of a
//! small publication. Any implementation of the RA module must reproduce
//! both byte for byte.

use nanopub_trust_core::{parse_nquads, ContentAddressing, Publication, SelfRef, TrustyRdf};

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Provisional URI of the unsigned publication.
    pub base: &'static str,
    /// The unsigned publication as N-Quads.
    pub nquads: &'static str,
    /// Expected digest string over the canonical form.
    pub expected_digest: &'static str,
    /// Expected artifact code.
    pub expected_code: &'static str,
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "minimal publication with plain literal",
            base: "http://purl.org/nanopub/temp/1/",
            nquads: concat!(
                "<http://purl.org/nanopub/temp/1/> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://www.nanopub.org/nschema#Nanopublication> <http://purl.org/nanopub/temp/1/Head> .\n",
                "<http://purl.org/nanopub/temp/1/> <http://www.nanopub.org/nschema#hasAssertion> <http://purl.org/nanopub/temp/1/assertion> <http://purl.org/nanopub/temp/1/Head> .\n",
                "<http://purl.org/nanopub/temp/1/> <http://www.nanopub.org/nschema#hasProvenance> <http://purl.org/nanopub/temp/1/provenance> <http://purl.org/nanopub/temp/1/Head> .\n",
                "<http://purl.org/nanopub/temp/1/> <http://www.nanopub.org/nschema#hasPublicationInfo> <http://purl.org/nanopub/temp/1/pubinfo> <http://purl.org/nanopub/temp/1/Head> .\n",
                "<http://example.org/s> <http://example.org/p> \"o\" <http://purl.org/nanopub/temp/1/assertion> .\n",
                "<http://purl.org/nanopub/temp/1/assertion> <http://www.w3.org/ns/prov#hadPrimarySource> <http://example.org/src> <http://purl.org/nanopub/temp/1/provenance> .\n",
                "<http://purl.org/nanopub/temp/1/> <http://purl.org/dc/terms/creator> <http://example.org/me> <http://purl.org/nanopub/temp/1/pubinfo> .\n",
            ),
            expected_digest: concat!(
                "<http://purl.org/nanopub/temp/1/ #Head>\n",
                "<http://purl.org/nanopub/temp/1/ >\n",
                "<http://www.nanopub.org/nschema#hasAssertion>\n",
                "<http://purl.org/nanopub/temp/1/ #assertion>\n",
                "<http://purl.org/nanopub/temp/1/ #Head>\n",
                "<http://purl.org/nanopub/temp/1/ >\n",
                "<http://www.nanopub.org/nschema#hasProvenance>\n",
                "<http://purl.org/nanopub/temp/1/ #provenance>\n",
                "<http://purl.org/nanopub/temp/1/ #Head>\n",
                "<http://purl.org/nanopub/temp/1/ >\n",
                "<http://www.nanopub.org/nschema#hasPublicationInfo>\n",
                "<http://purl.org/nanopub/temp/1/ #pubinfo>\n",
                "<http://purl.org/nanopub/temp/1/ #Head>\n",
                "<http://purl.org/nanopub/temp/1/ >\n",
                "<http://www.w3.org/1999/02/22-rdf-syntax-ns#type>\n",
                "<http://www.nanopub.org/nschema#Nanopublication>\n",
                "<http://purl.org/nanopub/temp/1/ #assertion>\n",
                "<http://example.org/s>\n",
                "<http://example.org/p>\n",
                "\"o\"\n",
                "<http://purl.org/nanopub/temp/1/ #provenance>\n",
                "<http://purl.org/nanopub/temp/1/ #assertion>\n",
                "<http://www.w3.org/ns/prov#hadPrimarySource>\n",
                "<http://example.org/src>\n",
                "<http://purl.org/nanopub/temp/1/ #pubinfo>\n",
                "<http://purl.org/nanopub/temp/1/ >\n",
                "<http://purl.org/dc/terms/creator>\n",
                "<http://example.org/me>\n",
            ),
            expected_code: "RACscQYFsdFChE-E3o3nJIx2TOSVaSzHFIWiHSQ_NDnkg",
        },
        GoldenVector {
            name: "blank node, escaped language literal, typed literal",
            base: "http://purl.org/nanopub/temp/2/",
            nquads: concat!(
                "<http://purl.org/nanopub/temp/2/> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://www.nanopub.org/nschema#Nanopublication> <http://purl.org/nanopub/temp/2/Head> .\n",
                "<http://purl.org/nanopub/temp/2/> <http://www.nanopub.org/nschema#hasAssertion> <http://purl.org/nanopub/temp/2/assertion> <http://purl.org/nanopub/temp/2/Head> .\n",
                "<http://purl.org/nanopub/temp/2/> <http://www.nanopub.org/nschema#hasProvenance> <http://purl.org/nanopub/temp/2/provenance> <http://purl.org/nanopub/temp/2/Head> .\n",
                "<http://purl.org/nanopub/temp/2/> <http://www.nanopub.org/nschema#hasPublicationInfo> <http://purl.org/nanopub/temp/2/pubinfo> <http://purl.org/nanopub/temp/2/Head> .\n",
                "<http://example.org/s> <http://example.org/q> _:x <http://purl.org/nanopub/temp/2/assertion> .\n",
                "_:x <http://example.org/label> \"Hallo \\\"Welt\\\"\\n\"@de <http://purl.org/nanopub/temp/2/assertion> .\n",
                "_:x <http://example.org/n> \"7\"^^<http://www.w3.org/2001/XMLSchema#integer> <http://purl.org/nanopub/temp/2/assertion> .\n",
                "<http://purl.org/nanopub/temp/2/assertion> <http://www.w3.org/ns/prov#wasDerivedFrom> <http://example.org/dataset> <http://purl.org/nanopub/temp/2/provenance> .\n",
                "<http://purl.org/nanopub/temp/2/> <http://purl.org/dc/terms/creator> <http://purl.org/nanopub/temp/2/creator> <http://purl.org/nanopub/temp/2/pubinfo> .\n",
            ),
            expected_digest: concat!(
                "<http://purl.org/nanopub/temp/2/ #Head>\n",
                "<http://purl.org/nanopub/temp/2/ >\n",
                "<http://www.nanopub.org/nschema#hasAssertion>\n",
                "<http://purl.org/nanopub/temp/2/ #assertion>\n",
                "<http://purl.org/nanopub/temp/2/ #Head>\n",
                "<http://purl.org/nanopub/temp/2/ >\n",
                "<http://www.nanopub.org/nschema#hasProvenance>\n",
                "<http://purl.org/nanopub/temp/2/ #provenance>\n",
                "<http://purl.org/nanopub/temp/2/ #Head>\n",
                "<http://purl.org/nanopub/temp/2/ >\n",
                "<http://www.nanopub.org/nschema#hasPublicationInfo>\n",
                "<http://purl.org/nanopub/temp/2/ #pubinfo>\n",
                "<http://purl.org/nanopub/temp/2/ #Head>\n",
                "<http://purl.org/nanopub/temp/2/ >\n",
                "<http://www.w3.org/1999/02/22-rdf-syntax-ns#type>\n",
                "<http://www.nanopub.org/nschema#Nanopublication>\n",
                "<http://purl.org/nanopub/temp/2/ #assertion>\n",
                "<http://example.org/s>\n",
                "<http://example.org/q>\n",
                "_:c14n0\n",
                "<http://purl.org/nanopub/temp/2/ #assertion>\n",
                "_:c14n0\n",
                "<http://example.org/label>\n",
                "\"Hallo \\\"Welt\\\"\\n\"@de\n",
                "<http://purl.org/nanopub/temp/2/ #assertion>\n",
                "_:c14n0\n",
                "<http://example.org/n>\n",
                "\"7\"^^<http://www.w3.org/2001/XMLSchema#integer>\n",
                "<http://purl.org/nanopub/temp/2/ #provenance>\n",
                "<http://purl.org/nanopub/temp/2/ #assertion>\n",
                "<http://www.w3.org/ns/prov#wasDerivedFrom>\n",
                "<http://example.org/dataset>\n",
                "<http://purl.org/nanopub/temp/2/ #pubinfo>\n",
                "<http://purl.org/nanopub/temp/2/ >\n",
                "<http://purl.org/dc/terms/creator>\n",
                "<http://purl.org/nanopub/temp/2/ #creator>\n",
            ),
            expected_code: "RAxcJKh202k91H6AaHj095QtC9LlKDXo1AphfyTjA8tQE",
        },
    ]
}

/// Parse the unsigned publication of a vector.
pub fn publication_from_vector(vector: &GoldenVector) -> Publication {
    let statements = parse_nquads(vector.nquads)
        .unwrap_or_else(|e| panic!("vector {:?} does not parse: {}", vector.name, e));
    Publication::from_statements(statements, Vec::new())
        .unwrap_or_else(|e| panic!("vector {:?} is not a publication: {}", vector.name, e))
}

/// Verify all vectors and return results.
///
/// Each entry is `(name, passed, actual code)`.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .into_iter()
        .map(|vector| {
            let publication = publication_from_vector(&vector);
            let canonical = TrustyRdf.canonicalize(
                &publication.all_statements(),
                &SelfRef::Provisional(vector.base.to_string()),
            );
            let digest = TrustyRdf.digest(&canonical);
            let code = TrustyRdf.address(&canonical).to_string();
            let passed = digest == vector.expected_digest && code == vector.expected_code;
            (vector.name.to_string(), passed, code)
        })
        .collect()
}
