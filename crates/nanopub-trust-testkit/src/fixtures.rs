//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::OnceLock;

use chrono::{TimeZone, Utc};

use nanopub_trust_core::{
    make_trusty, random_temp_uri, write_nquads, Publication, PublicationBuilder, Term, TrustyRdf,
    TEMP_URI_BASE,
};
use nanopub_trust_fetch::memory::MemoryFetcher;
use nanopub_trust_sign::{sign, KeyPair, SignatureAlgorithm};

/// Modulus size for fixture RSA keys. Small to keep tests fast.
const FIXTURE_RSA_BITS: usize = 1024;

/// A test fixture with a key pair and a signer identity.
pub struct TestFixture {
    pub keys: KeyPair,
    pub signer: String,
}

impl TestFixture {
    /// Create a new test fixture with a random Ed25519 key pair.
    pub fn new() -> Self {
        Self::with_keys(
            KeyPair::generate(SignatureAlgorithm::Ed25519).expect("ed25519 key generation"),
        )
    }

    /// Create with a deterministic Ed25519 key pair from seed.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self::with_keys(KeyPair::ed25519_from_seed(&seed))
    }

    pub fn with_keys(keys: KeyPair) -> Self {
        Self {
            keys,
            signer: "https://orcid.org/0000-0000-0000-0000".to_string(),
        }
    }

    pub fn algorithm(&self) -> SignatureAlgorithm {
        self.keys.algorithm()
    }

    /// An unsigned publication whose assertion mentions `label`.
    pub fn unsigned(&self, label: &str) -> Publication {
        unsigned_publication(&random_temp_uri(TEMP_URI_BASE), label)
    }

    /// A content-addressed but unsigned publication.
    pub fn trusty(&self, label: &str) -> Publication {
        make_trusty(&TrustyRdf, &self.unsigned(label)).expect("content addressing")
    }

    /// A signed, content-addressed publication.
    pub fn signed(&self, label: &str) -> Publication {
        sign(
            &self.unsigned(label),
            self.algorithm(),
            &self.keys,
            Some(self.signer.as_str()),
        )
        .expect("signing")
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// An unsigned publication at `uri` with a fixed timestamp.
pub fn unsigned_publication(uri: &str, label: &str) -> Publication {
    PublicationBuilder::new(uri)
        .add_default_namespaces()
        .add_namespace("ex", "http://example.org/")
        .add_assertion(
            Term::iri("http://example.org/subject"),
            Term::iri("http://www.w3.org/2000/01/rdf-schema#label"),
            Term::literal(label),
        )
        .add_provenance(
            Term::iri("http://www.w3.org/ns/prov#wasDerivedFrom"),
            Term::iri("http://example.org/dataset"),
        )
        .add_creator("http://example.org/creator")
        .add_timestamp(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        .finalize()
        .expect("fixture publication is well-formed")
}

/// A shared RSA key pair, generated once per process.
pub fn rsa_keys() -> &'static KeyPair {
    static KEYS: OnceLock<KeyPair> = OnceLock::new();
    KEYS.get_or_init(|| KeyPair::generate_rsa(FIXTURE_RSA_BITS).expect("rsa key generation"))
}

/// A shared DSA key pair, generated once per process.
pub fn dsa_keys() -> &'static KeyPair {
    static KEYS: OnceLock<KeyPair> = OnceLock::new();
    KEYS.get_or_init(|| KeyPair::generate(SignatureAlgorithm::Dsa).expect("dsa key generation"))
}

/// One fixture per supported algorithm.
pub fn multi_algorithm_fixtures() -> Vec<TestFixture> {
    vec![
        TestFixture::with_seed([0x42; 32]),
        TestFixture::with_keys(rsa_keys().clone()),
        TestFixture::with_keys(dsa_keys().clone()),
    ]
}

/// A fetcher that serves `publication` under its code at every server.
pub fn serve(publication: &Publication, servers: &[&str]) -> MemoryFetcher {
    let code = publication
        .artifact_code()
        .expect("served publications must be content-addressed");
    let body = write_nquads(publication);
    servers.iter().fold(MemoryFetcher::new(), |fetcher, server| {
        fetcher.with_body(format!("{}{}", server, code), body.clone())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use nanopub_trust_core::ContentAddressing;
    use nanopub_trust_sign::{resolve_signature, verify};

    #[test]
    fn test_fixture_publications() {
        let fixture = TestFixture::with_seed([7; 32]);

        let unsigned = fixture.unsigned("a");
        assert!(unsigned.artifact_code().is_none());

        let trusty = fixture.trusty("a");
        assert!(TrustyRdf.is_self_certifying(&trusty));
        assert!(resolve_signature(&trusty).unwrap().is_none());

        let signed = fixture.signed("a");
        let element = resolve_signature(&signed).unwrap().unwrap();
        assert!(verify(&element).unwrap());
        assert_eq!(element.signers(), &[fixture.signer.clone()]);
    }

    #[test]
    fn test_same_content_same_code() {
        let uri = "http://purl.org/nanopub/temp/fixture/";
        let code = |label: &str| {
            make_trusty(&TrustyRdf, &unsigned_publication(uri, label))
                .unwrap()
                .artifact_code()
        };
        assert_eq!(code("same"), code("same"));
        assert_ne!(code("same"), code("other"));
    }

    #[tokio::test]
    async fn test_serve_answers_every_server() {
        use nanopub_trust_core::NQUADS_MEDIA_TYPE;
        use nanopub_trust_fetch::Fetcher;

        let publication = TestFixture::new().trusty("served");
        let code = publication.artifact_code().unwrap();
        let fetcher = serve(&publication, &["http://a/", "http://b/"]);
        for server in ["http://a/", "http://b/"] {
            let body = fetcher
                .fetch(&format!("{}{}", server, code), NQUADS_MEDIA_TYPE)
                .await
                .unwrap();
            assert_eq!(body, write_nquads(&publication).into_bytes());
        }
    }
}
