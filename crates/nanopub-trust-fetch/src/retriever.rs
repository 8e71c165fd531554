//! Self-certifying retrieval.
//!
//! Candidates are tried strictly in order, one at a time. The first response
//! that parses, validates and re-hashes to its own claimed code wins. Servers
//! are untrusted: a failing candidate is logged and skipped, never reported.

use tracing::{debug, info, warn};

use nanopub_trust_core::{
    normalize_identifier, ArtifactCode, ContentAddressing, NQuads, Publication, PublicationParser,
    TrustyRdf,
};

use crate::error::{FetchError, Result};
use crate::fetcher::Fetcher;
use crate::source::CandidateServerSource;

/// Configuration for retrieval.
#[derive(Debug, Clone, Default)]
pub struct RetrieveConfig {
    /// Upper bound on candidates consumed per retrieval (`None` = until exhausted).
    pub max_attempts: Option<usize>,
}

/// Retrieves publications by content address from candidate servers.
pub struct Retriever<F: Fetcher, P: PublicationParser = NQuads, C: ContentAddressing = TrustyRdf> {
    fetcher: F,
    parser: P,
    addressing: C,
    config: RetrieveConfig,
}

impl<F: Fetcher> Retriever<F> {
    /// Create a retriever for N-Quads content with the default addressing.
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            parser: NQuads,
            addressing: TrustyRdf,
            config: RetrieveConfig::default(),
        }
    }
}

impl<F: Fetcher, P: PublicationParser, C: ContentAddressing> Retriever<F, P, C> {
    pub fn with_config(mut self, config: RetrieveConfig) -> Self {
        self.config = config;
        self
    }

    /// Use another content format.
    pub fn with_parser<P2: PublicationParser>(self, parser: P2) -> Retriever<F, P2, C> {
        Retriever {
            fetcher: self.fetcher,
            parser,
            addressing: self.addressing,
            config: self.config,
        }
    }

    /// Use another content addressing scheme.
    pub fn with_addressing<C2: ContentAddressing>(self, addressing: C2) -> Retriever<F, P, C2> {
        Retriever {
            fetcher: self.fetcher,
            parser: self.parser,
            addressing,
            config: self.config,
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn config(&self) -> &RetrieveConfig {
        &self.config
    }

    /// Retrieve a publication by trusty URI or bare artifact code.
    ///
    /// Returns `Ok(None)` when every candidate failed or the source ran dry.
    /// Only a malformed identifier is an error, raised before any fetch.
    pub async fn retrieve<S>(&self, identifier: &str, source: &mut S) -> Result<Option<Publication>>
    where
        S: CandidateServerSource + ?Sized,
    {
        let code = normalize_identifier(identifier)?;

        let mut attempts = 0usize;
        loop {
            if self.config.max_attempts.map_or(false, |max| attempts >= max) {
                debug!(code = %code, attempts, "attempt limit reached");
                break;
            }
            let Some(server) = source.next_candidate() else {
                break;
            };
            attempts += 1;

            match self.fetch_from(&server, &code).await {
                Ok(publication) => {
                    info!(code = %code, server = %server, attempts, "retrieved publication");
                    return Ok(Some(publication));
                }
                Err(e) if e.is_suspicious() => {
                    warn!(code = %code, server = %server, error = %e, "discarding untrustworthy content");
                }
                Err(e) => {
                    debug!(code = %code, server = %server, error = %e, "candidate failed");
                }
            }
        }

        debug!(code = %code, attempts, "publication not found");
        Ok(None)
    }

    /// Fetch from a single server and self-certify the result.
    pub async fn fetch_from(&self, server: &str, code: &ArtifactCode) -> Result<Publication> {
        let url = format!("{}{}", server, code);
        let bytes = self.fetcher.fetch(&url, self.parser.media_type()).await?;
        let publication = self.parser.parse(&bytes).map_err(FetchError::Parse)?;

        if !self.addressing.is_self_certifying(&publication) {
            return Err(FetchError::NotSelfCertifying(publication.uri().to_string()));
        }
        match publication.artifact_code() {
            Some(found) if found == *code => Ok(publication),
            found => Err(FetchError::CodeMismatch {
                requested: code.to_string(),
                found: found.map(|c| c.to_string()).unwrap_or_default(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::memory::MemoryFetcher;
    use crate::source::ServerList;
    use nanopub_trust_core::{make_trusty, write_nquads, PublicationBuilder, Term};

    fn trusty(object: &str) -> Publication {
        let unsigned = PublicationBuilder::new("http://purl.org/nanopub/temp/5/")
            .add_assertion(
                Term::iri("http://example.org/s"),
                Term::iri("http://example.org/p"),
                Term::literal(object),
            )
            .add_provenance(
                Term::iri("http://www.w3.org/ns/prov#wasDerivedFrom"),
                Term::iri("http://example.org/src"),
            )
            .add_creator("http://example.org/me")
            .finalize()
            .unwrap();
        make_trusty(&TrustyRdf, &unsigned).unwrap()
    }

    fn code_of(publication: &Publication) -> String {
        publication.artifact_code().unwrap().to_string()
    }

    fn tampered(publication: &Publication) -> String {
        write_nquads(publication).replace("\"o\"", "\"forged\"")
    }

    #[tokio::test]
    async fn test_failover_to_third_candidate() {
        let publication = trusty("o");
        let code = code_of(&publication);
        let fetcher = MemoryFetcher::new()
            .with_transport_error(format!("http://a/{}", code), "connection refused")
            .with_transport_error(format!("http://b/{}", code), "timed out")
            .with_body(format!("http://c/{}", code), write_nquads(&publication));
        let retriever = Retriever::new(fetcher);

        let mut source = ServerList::new(["http://a/", "http://b/", "http://c/", "http://d/"]);
        let found = retriever.retrieve(&code, &mut source).await.unwrap().unwrap();
        assert_eq!(found.uri(), publication.uri());
        assert_eq!(retriever.fetcher().attempts().await.len(), 3);
        assert_eq!(source.remaining(), &["http://d/".to_string()]);
    }

    #[tokio::test]
    async fn test_non_self_certifying_content_is_skipped() {
        let publication = trusty("o");
        let code = code_of(&publication);
        let fetcher = MemoryFetcher::new()
            .with_body(format!("http://evil/{}", code), tampered(&publication))
            .with_body(format!("http://good/{}", code), write_nquads(&publication));
        let retriever = Retriever::new(fetcher);

        let mut source = ServerList::new(["http://evil/", "http://good/"]);
        let found = retriever.retrieve(&code, &mut source).await.unwrap().unwrap();
        assert_eq!(found, publication);
    }

    #[tokio::test]
    async fn test_fetch_from_reports_reason() {
        let publication = trusty("o");
        let other = trusty("something else");
        let code = publication.artifact_code().unwrap();
        let fetcher = MemoryFetcher::new()
            .with_body(format!("http://evil/{}", code), tampered(&publication))
            .with_body(format!("http://swap/{}", code), write_nquads(&other))
            .with_body(format!("http://junk/{}", code), "not rdf at all");
        let retriever = Retriever::new(fetcher);

        let err = retriever.fetch_from("http://evil/", &code).await.unwrap_err();
        assert!(matches!(err, FetchError::NotSelfCertifying(_)));
        let err = retriever.fetch_from("http://swap/", &code).await.unwrap_err();
        assert!(matches!(err, FetchError::CodeMismatch { .. }));
        let err = retriever.fetch_from("http://junk/", &code).await.unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
        assert!(!err.is_suspicious());
    }

    #[tokio::test]
    async fn test_exhaustion_is_not_an_error() {
        let code = code_of(&trusty("o"));
        let retriever = Retriever::new(MemoryFetcher::new());

        let mut empty = ServerList::new(Vec::<String>::new());
        assert!(retriever.retrieve(&code, &mut empty).await.unwrap().is_none());

        let mut failing = ServerList::new(["http://a/", "http://b/"]);
        assert!(retriever.retrieve(&code, &mut failing).await.unwrap().is_none());
        assert_eq!(retriever.fetcher().attempts().await.len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_identifier_fails_before_fetching() {
        let retriever = Retriever::new(MemoryFetcher::new());
        let mut source = ServerList::new(["http://a/"]);

        let err = retriever.retrieve("http://example.org/short", &mut source).await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidIdentifier(_)));
        let err = retriever
            .retrieve("FAkYh4UPJryajbtIDbLG-Bfd6A4JD2SbU9bmZdvaEdFRY", &mut source)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::WrongArtifactType { .. }));

        assert!(retriever.fetcher().attempts().await.is_empty());
        assert_eq!(source.remaining().len(), 1);
    }

    #[tokio::test]
    async fn test_uri_and_code_fetch_the_same_url() {
        let publication = trusty("o");
        let code = code_of(&publication);
        let fetcher = MemoryFetcher::new().with_body(format!("http://a/{}", code), write_nquads(&publication));
        let retriever = Retriever::new(fetcher);

        let by_uri = retriever
            .retrieve(publication.uri(), &mut ServerList::new(["http://a/"]))
            .await
            .unwrap();
        let by_code = retriever
            .retrieve(&code, &mut ServerList::new(["http://a/"]))
            .await
            .unwrap();
        assert_eq!(by_uri, by_code);
        let attempts = retriever.fetcher().attempts().await;
        assert_eq!(attempts[0], attempts[1]);
    }

    #[tokio::test]
    async fn test_max_attempts_bounds_endless_source() {
        let code = code_of(&trusty("o"));
        let retriever = Retriever::new(MemoryFetcher::new()).with_config(RetrieveConfig {
            max_attempts: Some(4),
        });
        let mut endless = std::iter::repeat("http://down/".to_string());
        assert!(retriever.retrieve(&code, &mut endless).await.unwrap().is_none());
        assert_eq!(retriever.fetcher().attempts().await.len(), 4);
    }

    #[tokio::test]
    async fn test_file_server_candidate() {
        use crate::fetcher::{FetcherConfig, HttpFetcher};

        let publication = trusty("o");
        let code = code_of(&publication);
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(&code), write_nquads(&publication)).unwrap();
        let base = url::Url::from_directory_path(dir.path()).unwrap().to_string();

        let retriever = Retriever::new(HttpFetcher::new(FetcherConfig::default()).unwrap());
        let found = retriever
            .retrieve(&code, &mut ServerList::new([base]))
            .await
            .unwrap();
        assert_eq!(found, Some(publication));
    }

    struct TriG;

    impl PublicationParser for TriG {
        fn parse(&self, bytes: &[u8]) -> nanopub_trust_core::Result<Publication> {
            NQuads.parse(bytes)
        }

        fn media_type(&self) -> &'static str {
            "application/trig"
        }
    }

    #[tokio::test]
    async fn test_accept_follows_parser() {
        let publication = trusty("o");
        let code = code_of(&publication);
        let fetcher = MemoryFetcher::new().with_body(format!("http://a/{}", code), write_nquads(&publication));

        let retriever = Retriever::new(fetcher).with_parser(TriG);
        retriever
            .retrieve(&code, &mut ServerList::new(["http://a/"]))
            .await
            .unwrap();
        assert_eq!(retriever.fetcher().accepted().await, vec!["application/trig"]);
    }
}
