//! Builder for freshly authored (unsigned) publications.

use chrono::{DateTime, SecondsFormat, Utc};
use rand::Rng;

use crate::error::Result;
use crate::publication::{Namespace, Publication};
use crate::term::{Statement, Term};
use crate::vocab::{
    DCTERMS_CREATED, DCTERMS_CREATOR, DEFAULT_NAMESPACES, HAS_ASSERTION, HAS_PROVENANCE,
    HAS_PUBLICATION_INFO, NANOPUBLICATION, RDF_TYPE, XSD_DATE_TIME,
};

/// Base of randomly minted provisional URIs.
pub const TEMP_URI_BASE: &str = "http://purl.org/nanopub/temp/";

/// Mint a random provisional URI under `base`.
pub fn random_temp_uri(base: &str) -> String {
    let n: u32 = rand::thread_rng().gen_range(0..i32::MAX as u32);
    format!("{}{}/", base, n)
}

/// Builder for creating publications.
///
/// Graph IRIs default to the publication URI suffixed with `Head`,
/// `assertion`, `provenance` and `pubinfo`. Set custom graph IRIs before
/// adding provenance, which is attached to the assertion IRI.
#[derive(Debug, Clone)]
pub struct PublicationBuilder {
    uri: String,
    head_uri: String,
    assertion_uri: String,
    provenance_uri: String,
    pubinfo_uri: String,
    assertion: Vec<Statement>,
    provenance: Vec<Statement>,
    pubinfo: Vec<Statement>,
    namespaces: Vec<Namespace>,
    remove_unused_prefixes: bool,
}

impl PublicationBuilder {
    /// Start building a publication with the given provisional URI.
    pub fn new(uri: impl Into<String>) -> Self {
        let uri = uri.into();
        Self {
            head_uri: format!("{}Head", uri),
            assertion_uri: format!("{}assertion", uri),
            provenance_uri: format!("{}provenance", uri),
            pubinfo_uri: format!("{}pubinfo", uri),
            uri,
            assertion: Vec::new(),
            provenance: Vec::new(),
            pubinfo: Vec::new(),
            namespaces: Vec::new(),
            remove_unused_prefixes: false,
        }
    }

    /// The provisional URI.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Override the assertion graph IRI.
    pub fn assertion_uri(mut self, iri: impl Into<String>) -> Self {
        self.assertion_uri = iri.into();
        self
    }

    /// Override the provenance graph IRI.
    pub fn provenance_uri(mut self, iri: impl Into<String>) -> Self {
        self.provenance_uri = iri.into();
        self
    }

    /// Override the pubinfo graph IRI.
    pub fn pubinfo_uri(mut self, iri: impl Into<String>) -> Self {
        self.pubinfo_uri = iri.into();
        self
    }

    /// Add an assertion triple.
    pub fn add_assertion(self, subject: Term, predicate: Term, object: Term) -> Self {
        self.add_assertion_statement(Statement::triple(subject, predicate, object))
    }

    /// Add an assertion statement; its graph is replaced.
    pub fn add_assertion_statement(mut self, st: Statement) -> Self {
        self.assertion.push(st);
        self
    }

    /// Add a provenance triple about the assertion.
    pub fn add_provenance(self, predicate: Term, object: Term) -> Self {
        let subject = Term::iri(self.assertion_uri.clone());
        self.add_provenance_statement(Statement::triple(subject, predicate, object))
    }

    /// Add a provenance statement; its graph is replaced.
    pub fn add_provenance_statement(mut self, st: Statement) -> Self {
        self.provenance.push(st);
        self
    }

    /// Add a pubinfo triple about the publication.
    pub fn add_pubinfo(self, predicate: Term, object: Term) -> Self {
        let subject = Term::iri(self.uri.clone());
        self.add_pubinfo_statement(Statement::triple(subject, predicate, object))
    }

    /// Add a pubinfo statement; its graph is replaced.
    pub fn add_pubinfo_statement(mut self, st: Statement) -> Self {
        self.pubinfo.push(st);
        self
    }

    /// Record a creator (`dcterms:creator`).
    pub fn add_creator(self, creator: impl Into<String>) -> Self {
        self.add_pubinfo(Term::iri(DCTERMS_CREATOR), Term::iri(creator))
    }

    /// Record the creation time (`dcterms:created`).
    pub fn add_timestamp(self, at: DateTime<Utc>) -> Self {
        let lexical = at.to_rfc3339_opts(SecondsFormat::Millis, true);
        self.add_pubinfo(
            Term::iri(DCTERMS_CREATED),
            Term::typed_literal(lexical, XSD_DATE_TIME),
        )
    }

    /// Record the current time as creation time.
    pub fn add_timestamp_now(self) -> Self {
        self.add_timestamp(Utc::now())
    }

    /// Declare a namespace prefix. Later declarations of a prefix win.
    pub fn add_namespace(mut self, prefix: impl Into<String>, iri: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.namespaces.retain(|(p, _)| *p != prefix);
        self.namespaces.push((prefix, iri.into()));
        self
    }

    /// Declare the standard prefixes.
    pub fn add_default_namespaces(self) -> Self {
        DEFAULT_NAMESPACES
            .iter()
            .fold(self, |b, (prefix, iri)| b.add_namespace(*prefix, *iri))
    }

    /// Drop prefixes no IRI in the publication uses.
    pub fn remove_unused_prefixes(mut self, enabled: bool) -> Self {
        self.remove_unused_prefixes = enabled;
        self
    }

    /// Assemble the head graph and build the publication.
    pub fn finalize(self) -> Result<Publication> {
        let np = Term::iri(self.uri.clone());
        let head = Term::iri(self.head_uri.clone());
        let assertion = Term::iri(self.assertion_uri.clone());
        let provenance = Term::iri(self.provenance_uri.clone());
        let pubinfo = Term::iri(self.pubinfo_uri.clone());

        let mut statements = vec![
            Statement::new(np.clone(), Term::iri(RDF_TYPE), Term::iri(NANOPUBLICATION), head.clone()),
            Statement::new(np.clone(), Term::iri(HAS_ASSERTION), assertion.clone(), head.clone()),
            Statement::new(np.clone(), Term::iri(HAS_PROVENANCE), provenance.clone(), head.clone()),
            Statement::new(np, Term::iri(HAS_PUBLICATION_INFO), pubinfo.clone(), head),
        ];
        statements.extend(self.assertion.into_iter().map(|st| st.in_graph(assertion.clone())));
        statements.extend(self.provenance.into_iter().map(|st| st.in_graph(provenance.clone())));
        statements.extend(self.pubinfo.into_iter().map(|st| st.in_graph(pubinfo.clone())));

        let namespaces = if self.remove_unused_prefixes {
            used_namespaces(self.namespaces, &statements)
        } else {
            self.namespaces
        };

        Publication::from_statements(statements, namespaces)
    }
}

fn used_namespaces(namespaces: Vec<Namespace>, statements: &[Statement]) -> Vec<Namespace> {
    namespaces
        .into_iter()
        .filter(|(_, ns)| {
            statements.iter().any(|st| {
                [&st.subject, &st.predicate, &st.object]
                    .into_iter()
                    .chain(st.graph.as_ref())
                    .any(|t| match t {
                        Term::Iri(iri) => iri.starts_with(ns.as_str()),
                        Term::Literal(lit) => lit.datatype().starts_with(ns.as_str()),
                        Term::BlankNode(_) => false,
                    })
            })
        })
        .collect()
}
