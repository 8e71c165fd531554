//! N-Quads reading and writing.
//!
//! Parsing is delegated to `sophia_turtle`; writing uses the term `Display`
//! impls, which already produce N-Quads syntax.

use sophia_api::quad::Quad;
use sophia_api::source::QuadSource;
use sophia_api::term::{Term as SophiaTerm, TermKind};
use sophia_turtle::parser::nq;

use crate::error::{CoreError, Result};
use crate::publication::Publication;
use crate::term::{Literal, Statement, Term};
use crate::vocab::RDF_LANG_STRING;

/// Media type of N-Quads documents.
pub const NQUADS_MEDIA_TYPE: &str = "application/n-quads";

/// Turns raw bytes into a publication.
pub trait PublicationParser: Send + Sync {
    /// Parse and structurally validate a publication.
    fn parse(&self, bytes: &[u8]) -> Result<Publication>;

    /// The media type to request from servers.
    fn media_type(&self) -> &'static str;
}

/// N-Quads publication parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct NQuads;

impl PublicationParser for NQuads {
    fn parse(&self, bytes: &[u8]) -> Result<Publication> {
        let text = std::str::from_utf8(bytes).map_err(|e| CoreError::Parse(e.to_string()))?;
        let statements = parse_nquads(text)?;
        Publication::from_statements(statements, Vec::new())
    }

    fn media_type(&self) -> &'static str {
        NQUADS_MEDIA_TYPE
    }
}

/// Parse an N-Quads document into statements.
pub fn parse_nquads(text: &str) -> Result<Vec<Statement>> {
    let mut statements = Vec::new();
    let mut first_error = None;

    nq::parse_str(text)
        .for_each_quad(|q| {
            let converted = convert_quad(&q);
            match converted {
                Ok(st) => statements.push(st),
                Err(e) => {
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        })
        .map_err(|e| CoreError::Parse(e.to_string()))?;

    match first_error {
        Some(e) => Err(e),
        None => Ok(statements),
    }
}

/// Serialize a publication as N-Quads, head first.
pub fn write_nquads(publication: &Publication) -> String {
    let mut out = String::new();
    for st in publication.statements() {
        out.push_str(&st.to_string());
        out.push('\n');
    }
    out
}

fn convert_quad<Q: Quad>(q: &Q) -> Result<Statement> {
    Ok(Statement {
        subject: convert_term(q.s())?,
        predicate: convert_term(q.p())?,
        object: convert_term(q.o())?,
        graph: match q.g() {
            Some(g) => Some(convert_term(g)?),
            None => None,
        },
    })
}

fn convert_term<T: SophiaTerm>(t: T) -> Result<Term> {
    match t.kind() {
        TermKind::Iri => t
            .iri()
            .map(|iri| Term::Iri(iri.as_str().to_string()))
            .ok_or_else(|| CoreError::Parse("IRI term without IRI".into())),
        TermKind::BlankNode => t
            .bnode_id()
            .map(|id| Term::BlankNode(id.as_str().to_string()))
            .ok_or_else(|| CoreError::Parse("blank node without label".into())),
        TermKind::Literal => {
            let lexical = t.lexical_form().map(|l| l.to_string()).unwrap_or_default();
            if let Some(tag) = t.language_tag() {
                return Ok(Term::Literal(Literal::lang(lexical, tag.as_str())));
            }
            let datatype = t
                .datatype()
                .map(|dt| dt.as_str().to_string())
                .unwrap_or_else(|| RDF_LANG_STRING.to_string());
            Ok(Term::Literal(Literal::typed(lexical, datatype)))
        }
        other => Err(CoreError::Parse(format!("unsupported term kind: {:?}", other))),
    }
}
