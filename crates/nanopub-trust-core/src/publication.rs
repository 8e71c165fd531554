//! Publication: an identified unit made of four disjoint named graphs.
//!
//! The head graph names the other three. A publication is immutable once
//! constructed; every constructor runs the structural checks below.

use std::collections::BTreeSet;

use crate::error::{CoreError, Result};
use crate::term::{Statement, Term};
use crate::trusty::ArtifactCode;
use crate::vocab::{HAS_ASSERTION, HAS_PROVENANCE, HAS_PUBLICATION_INFO, NANOPUBLICATION, RDF_TYPE};

/// A namespace prefix declaration carried along with the statements.
pub type Namespace = (String, String);

/// An immutable publication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publication {
    uri: String,
    head_uri: String,
    assertion_uri: String,
    provenance_uri: String,
    pubinfo_uri: String,
    head: Vec<Statement>,
    assertion: Vec<Statement>,
    provenance: Vec<Statement>,
    pubinfo: Vec<Statement>,
    namespaces: Vec<Namespace>,
}

impl Publication {
    /// Assemble a publication from a flat statement set.
    ///
    /// Performs these checks:
    /// - exactly one `rdf:type np:Nanopublication` statement (locates head and URI)
    /// - exactly one assertion, provenance and pubinfo pointer in the head graph
    /// - the four graph IRIs are distinct
    /// - every statement lives in one of the four graphs
    /// - assertion, provenance and pubinfo are non-empty
    ///
    /// Duplicate statements are collapsed; input order is otherwise kept.
    pub fn from_statements(
        statements: impl IntoIterator<Item = Statement>,
        namespaces: Vec<Namespace>,
    ) -> Result<Self> {
        let mut seen = BTreeSet::new();
        let statements: Vec<Statement> = statements
            .into_iter()
            .filter(|st| seen.insert(st.clone()))
            .collect();

        // 1. Locate the head graph
        let mut type_statements = statements
            .iter()
            .filter(|st| st.has_predicate(RDF_TYPE) && st.object.is_iri_eq(NANOPUBLICATION));
        let type_st = type_statements
            .next()
            .ok_or_else(|| malformed("no nanopublication type statement"))?;
        if type_statements.next().is_some() {
            return Err(malformed("multiple nanopublication type statements"));
        }
        let uri = iri_of(&type_st.subject, "nanopublication URI")?;
        let head_uri = match &type_st.graph {
            Some(g) => iri_of(g, "head graph")?,
            None => return Err(malformed("nanopublication type statement in default graph")),
        };

        // 2. Read graph pointers from the head
        let pointer = |predicate: &str, what: &str| -> Result<String> {
            let mut found = statements.iter().filter(|st| {
                st.graph.as_ref().map_or(false, |g| g.is_iri_eq(&head_uri))
                    && st.subject.is_iri_eq(&uri)
                    && st.has_predicate(predicate)
            });
            let st = found
                .next()
                .ok_or_else(|| malformed(&format!("no {} graph declared in head", what)))?;
            if found.next().is_some() {
                return Err(malformed(&format!("multiple {} graphs declared in head", what)));
            }
            iri_of(&st.object, what)
        };
        let assertion_uri = pointer(HAS_ASSERTION, "assertion")?;
        let provenance_uri = pointer(HAS_PROVENANCE, "provenance")?;
        let pubinfo_uri = pointer(HAS_PUBLICATION_INFO, "pubinfo")?;

        // 3. Graph IRIs must be distinct
        let graphs: BTreeSet<&str> = [
            head_uri.as_str(),
            assertion_uri.as_str(),
            provenance_uri.as_str(),
            pubinfo_uri.as_str(),
        ]
        .into_iter()
        .collect();
        if graphs.len() != 4 {
            return Err(malformed("graph URIs are not distinct"));
        }

        // 4. Partition
        let mut head = Vec::new();
        let mut assertion = Vec::new();
        let mut provenance = Vec::new();
        let mut pubinfo = Vec::new();
        for st in statements {
            let graph = st.graph.as_ref().and_then(Term::as_iri).unwrap_or_default();
            if graph == head_uri {
                head.push(st);
            } else if graph == assertion_uri {
                assertion.push(st);
            } else if graph == provenance_uri {
                provenance.push(st);
            } else if graph == pubinfo_uri {
                pubinfo.push(st);
            } else {
                return Err(malformed(&format!("statement outside publication graphs: {}", st)));
            }
        }

        // 5. Non-empty content graphs
        if assertion.is_empty() {
            return Err(malformed("empty assertion graph"));
        }
        if provenance.is_empty() {
            return Err(malformed("empty provenance graph"));
        }
        if pubinfo.is_empty() {
            return Err(malformed("empty publication info graph"));
        }

        Ok(Self {
            uri,
            head_uri,
            assertion_uri,
            provenance_uri,
            pubinfo_uri,
            head,
            assertion,
            provenance,
            pubinfo,
            namespaces,
        })
    }

    /// The publication URI.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn head_uri(&self) -> &str {
        &self.head_uri
    }

    pub fn assertion_uri(&self) -> &str {
        &self.assertion_uri
    }

    pub fn provenance_uri(&self) -> &str {
        &self.provenance_uri
    }

    pub fn pubinfo_uri(&self) -> &str {
        &self.pubinfo_uri
    }

    pub fn head(&self) -> &[Statement] {
        &self.head
    }

    pub fn assertion(&self) -> &[Statement] {
        &self.assertion
    }

    pub fn provenance(&self) -> &[Statement] {
        &self.provenance
    }

    pub fn pubinfo(&self) -> &[Statement] {
        &self.pubinfo
    }

    /// Namespace prefixes declared by the source document.
    pub fn namespaces(&self) -> &[Namespace] {
        &self.namespaces
    }

    /// All statements: head, assertion, provenance, pubinfo.
    pub fn all_statements(&self) -> Vec<Statement> {
        self.statements().cloned().collect()
    }

    /// Iterate over all statements without cloning.
    pub fn statements(&self) -> impl Iterator<Item = &Statement> {
        self.head
            .iter()
            .chain(self.assertion.iter())
            .chain(self.provenance.iter())
            .chain(self.pubinfo.iter())
    }

    /// Number of statements across the four graphs.
    pub fn statement_count(&self) -> usize {
        self.head.len() + self.assertion.len() + self.provenance.len() + self.pubinfo.len()
    }

    /// The artifact code at the tail of the URI, if the URI is trusty.
    pub fn artifact_code(&self) -> Option<ArtifactCode> {
        ArtifactCode::from_uri(&self.uri)
    }
}

fn malformed(msg: &str) -> CoreError {
    CoreError::MalformedPublication(msg.to_string())
}

fn iri_of(term: &Term, what: &str) -> Result<String> {
    term.as_iri()
        .map(str::to_string)
        .ok_or_else(|| malformed(&format!("{} must be an IRI, got {}", what, term)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NP: &str = "http://example.org/np1/";

    fn iri(s: &str) -> Term {
        Term::iri(s)
    }

    fn g(suffix: &str) -> Term {
        Term::iri(format!("{}{}", NP, suffix))
    }

    fn head_statements() -> Vec<Statement> {
        vec![
            Statement::new(iri(NP), iri(RDF_TYPE), iri(NANOPUBLICATION), g("Head")),
            Statement::new(iri(NP), iri(HAS_ASSERTION), g("assertion"), g("Head")),
            Statement::new(iri(NP), iri(HAS_PROVENANCE), g("provenance"), g("Head")),
            Statement::new(iri(NP), iri(HAS_PUBLICATION_INFO), g("pubinfo"), g("Head")),
        ]
    }

    fn content_statements() -> Vec<Statement> {
        vec![
            Statement::new(
                iri("http://example.org/s"),
                iri("http://example.org/p"),
                Term::literal("o"),
                g("assertion"),
            ),
            Statement::new(
                g("assertion"),
                iri("http://www.w3.org/ns/prov#hadPrimarySource"),
                iri("http://example.org/src"),
                g("provenance"),
            ),
            Statement::new(
                iri(NP),
                iri("http://purl.org/dc/terms/creator"),
                iri("http://example.org/me"),
                g("pubinfo"),
            ),
        ]
    }

    fn valid_statements() -> Vec<Statement> {
        let mut all = head_statements();
        all.extend(content_statements());
        all
    }

    #[test]
    fn test_valid_publication() {
        let publication = Publication::from_statements(valid_statements(), vec![]).unwrap();
        assert_eq!(publication.uri(), NP);
        assert_eq!(publication.head().len(), 4);
        assert_eq!(publication.assertion().len(), 1);
        assert_eq!(publication.provenance().len(), 1);
        assert_eq!(publication.pubinfo().len(), 1);
        assert_eq!(publication.statement_count(), 7);
        assert!(publication.artifact_code().is_none());
    }

    #[test]
    fn test_order_does_not_matter() {
        let mut reversed = valid_statements();
        reversed.reverse();
        let a = Publication::from_statements(valid_statements(), vec![]).unwrap();
        let b = Publication::from_statements(reversed, vec![]).unwrap();
        assert_eq!(a.uri(), b.uri());
        assert_eq!(a.assertion_uri(), b.assertion_uri());
    }

    #[test]
    fn test_missing_type_statement() {
        let statements: Vec<_> = valid_statements().into_iter().skip(1).collect();
        let result = Publication::from_statements(statements, vec![]);
        assert!(matches!(result, Err(CoreError::MalformedPublication(_))));
    }

    #[test]
    fn test_empty_assertion() {
        let statements: Vec<_> = valid_statements()
            .into_iter()
            .filter(|st| st.graph != Some(g("assertion")))
            .collect();
        let result = Publication::from_statements(statements, vec![]);
        assert!(matches!(result, Err(CoreError::MalformedPublication(msg)) if msg.contains("assertion")));
    }

    #[test]
    fn test_statement_outside_graphs() {
        let mut statements = valid_statements();
        statements.push(Statement::triple(
            iri("http://example.org/s"),
            iri("http://example.org/p"),
            iri("http://example.org/o"),
        ));
        let result = Publication::from_statements(statements, vec![]);
        assert!(matches!(result, Err(CoreError::MalformedPublication(_))));
    }

    #[test]
    fn test_graphs_must_be_distinct() {
        let mut statements = vec![
            Statement::new(iri(NP), iri(RDF_TYPE), iri(NANOPUBLICATION), g("Head")),
            Statement::new(iri(NP), iri(HAS_ASSERTION), g("assertion"), g("Head")),
            Statement::new(iri(NP), iri(HAS_PROVENANCE), g("assertion"), g("Head")),
            Statement::new(iri(NP), iri(HAS_PUBLICATION_INFO), g("pubinfo"), g("Head")),
        ];
        statements.extend(content_statements());
        let result = Publication::from_statements(statements, vec![]);
        assert!(matches!(result, Err(CoreError::MalformedPublication(_))));
    }

    #[test]
    fn test_duplicates_collapse() {
        let mut statements = valid_statements();
        statements.extend(content_statements());
        let publication = Publication::from_statements(statements, vec![]).unwrap();
        assert_eq!(publication.statement_count(), 7);
    }
}
