//! Canonicalization and content addressing of statement sets.
//!
//! Content addressing is two-phase because the identifier is embedded in the
//! content it is computed from:
//! 1. [`ContentAddressing::canonicalize`] rewrites every self-reference to a
//!    placeholder (a single space inside the IRI), relabels blank nodes and
//!    sorts the statements.
//! 2. [`ContentAddressing::finalize`] hashes the frozen canonical content and
//!    substitutes the resulting artifact code for the placeholder.
//!
//! The digest string is the exact text that gets hashed (and signed):
//!
//! ```text
//! <graph>\n<subject>\n<predicate>\n<object>\n   (once per statement, sorted)
//! ```
//!
//! **This format is frozen.** Changing it invalidates every existing
//! identifier and signature.

use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;

use crate::error::{CoreError, Result};
use crate::publication::{Namespace, Publication};
use crate::term::{Statement, Term};
use crate::trusty::{is_code_char, ArtifactCode};

/// Placeholder written where the artifact code will go.
pub const PLACEHOLDER: &str = " ";

/// Prefix of canonical blank node labels.
const BNODE_PREFIX: &str = "c14n";

/// How a statement set refers to its own identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelfRef {
    /// A finalized identifier: every occurrence of the code is a self-reference.
    Code(ArtifactCode),
    /// A provisional URI: every IRI starting with it is a self-reference.
    Provisional(String),
}

impl SelfRef {
    /// The anchor for a publication, plus the base its final URI is built on.
    ///
    /// Trusty publications anchor on their code and keep the URI prefix
    /// before it; anything else anchors on its full (provisional) URI.
    pub fn of(publication: &Publication) -> (Self, String) {
        let uri = publication.uri();
        if let Some(code) = publication.artifact_code() {
            if let Some(idx) = uri.rfind(code.as_str()) {
                return (Self::Code(code), uri[..idx].to_string());
            }
        }
        (Self::Provisional(uri.to_string()), code_base(uri))
    }
}

/// The prefix a code is appended to.
///
/// A `.` separates the code from a URI ending in a code character, otherwise
/// the two would read as one longer code.
pub fn code_base(uri: &str) -> String {
    if uri.ends_with(is_code_char) {
        format!("{}.", uri)
    } else {
        uri.to_string()
    }
}

/// The canonicalize/digest/finalize contract.
///
/// Implementations must be deterministic and independent of statement order
/// and blank node naming.
pub trait ContentAddressing: Send + Sync {
    /// Rewrite self-references to the placeholder, normalize blank nodes, sort.
    fn canonicalize(&self, statements: &[Statement], anchor: &SelfRef) -> Vec<Statement>;

    /// Serialize a canonical sequence into the digest string.
    fn digest(&self, sequence: &[Statement]) -> String;

    /// Compute the artifact code of a canonical sequence.
    fn address(&self, sequence: &[Statement]) -> ArtifactCode {
        ArtifactCode::for_digest_string(&self.digest(sequence))
    }

    /// Compute the final identifier over frozen canonical content and
    /// rewrite every placeholder to it.
    fn finalize(
        &self,
        canonical: Vec<Statement>,
        provisional_uri: &str,
        namespaces: Vec<Namespace>,
    ) -> Result<Publication>;

    /// Recompute the content address and compare it with the claimed one.
    fn is_self_certifying(&self, publication: &Publication) -> bool {
        let Some(code) = publication.artifact_code() else {
            return false;
        };
        if !code.is_rdf_module() {
            return false;
        }
        let canonical = self.canonicalize(&publication.all_statements(), &SelfRef::Code(code.clone()));
        self.address(&canonical) == code
    }
}

/// The RA-module content addressing scheme for RDF publications.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrustyRdf;

impl ContentAddressing for TrustyRdf {
    fn canonicalize(&self, statements: &[Statement], anchor: &SelfRef) -> Vec<Statement> {
        let mut rewritten: Vec<Statement> = statements
            .iter()
            .map(|st| {
                st.map_terms(|t| match t {
                    Term::Iri(iri) => Term::Iri(rewrite_iri(iri, anchor)),
                    other => other.clone(),
                })
            })
            .collect();
        rewritten.sort_by_cached_key(render_row);
        rewritten.dedup();

        let mut canonical = label_blank_nodes(&rewritten);
        canonical.sort_by_cached_key(render_row);
        canonical.dedup();
        canonical
    }

    fn digest(&self, sequence: &[Statement]) -> String {
        let mut rows: Vec<[String; 4]> = sequence.iter().map(render_row).collect();
        rows.sort();
        rows.dedup();

        let mut out = String::new();
        for row in rows {
            for field in row {
                out.push_str(&field);
                out.push('\n');
            }
        }
        out
    }

    fn finalize(
        &self,
        canonical: Vec<Statement>,
        provisional_uri: &str,
        namespaces: Vec<Namespace>,
    ) -> Result<Publication> {
        let code = self.address(&canonical);

        let resolved = canonical.iter().map(|st| {
            st.map_terms(|t| match t {
                Term::Iri(iri) if iri.contains(PLACEHOLDER) => {
                    Term::Iri(iri.replace(PLACEHOLDER, code.as_str()))
                }
                other => other.clone(),
            })
        });
        let publication = Publication::from_statements(resolved, namespaces)?;

        let expected = format!("{}{}", code_base(provisional_uri), code);
        if publication.uri() != expected {
            return Err(CoreError::MalformedPublication(format!(
                "finalized URI {} does not match {}",
                publication.uri(),
                expected
            )));
        }

        debug!(uri = %publication.uri(), "finalized content-addressed publication");
        Ok(publication)
    }
}

/// Content-address an unsigned publication without signing it.
pub fn make_trusty<C: ContentAddressing + ?Sized>(
    addressing: &C,
    publication: &Publication,
) -> Result<Publication> {
    let (anchor, base) = SelfRef::of(publication);
    let canonical = addressing.canonicalize(&publication.all_statements(), &anchor);
    addressing.finalize(canonical, &base, publication.namespaces().to_vec())
}

/// Rewrite one IRI relative to the anchor.
fn rewrite_iri(iri: &str, anchor: &SelfRef) -> String {
    match anchor {
        SelfRef::Code(code) => iri.replace(code.as_str(), PLACEHOLDER),
        SelfRef::Provisional(base) => match iri.strip_prefix(base.as_str()) {
            Some(suffix) => {
                format!("{}{}{}", code_base(base), PLACEHOLDER, normalize_suffix(suffix))
            }
            None => iri.to_string(),
        },
    }
}

/// A suffix must be separated from the code that will precede it.
fn normalize_suffix(suffix: &str) -> String {
    if suffix.is_empty() || suffix.starts_with(&['#', '/', '.'][..]) {
        suffix.to_string()
    } else {
        format!("#{}", suffix)
    }
}

/// Sort key and digest rows: graph, subject, predicate, object.
fn render_row(st: &Statement) -> [String; 4] {
    [
        st.graph.as_ref().map(ToString::to_string).unwrap_or_default(),
        st.subject.to_string(),
        st.predicate.to_string(),
        st.object.to_string(),
    ]
}

fn terms(st: &Statement) -> impl Iterator<Item = &Term> {
    [&st.subject, &st.predicate, &st.object]
        .into_iter()
        .chain(st.graph.as_ref())
}

type Colours<'a> = HashMap<&'a str, String>;

/// Relabel blank nodes canonically.
///
/// Each node starts coloured by the hash of its first-degree neighbourhood.
/// Colours are refined by the colours of neighbouring nodes until the
/// partition is stable. Nodes still sharing a colour are individualized one
/// at a time and the branch with the smallest sorted output wins, so the
/// labels depend only on the graph.
fn label_blank_nodes(statements: &[Statement]) -> Vec<Statement> {
    let mut nodes: Vec<&str> = Vec::new();
    for st in statements {
        for term in terms(st) {
            if let Term::BlankNode(label) = term {
                if !nodes.contains(&label.as_str()) {
                    nodes.push(label);
                }
            }
        }
    }
    if nodes.is_empty() {
        return statements.to_vec();
    }

    let colours: Colours = nodes
        .iter()
        .map(|node| (*node, first_degree_hash(statements, node)))
        .collect();
    canonical_labelling(statements, refine(statements, colours))
}

fn canonical_labelling(statements: &[Statement], colours: Colours<'_>) -> Vec<Statement> {
    let Some(tied) = first_tied_class(&colours) else {
        return relabel(statements, &colours);
    };

    tied.into_iter()
        .map(|node| {
            let mut branch = colours.clone();
            let individual = sha256_hex(&format!("{}!", colours[node]));
            branch.insert(node, individual);
            let labelled = canonical_labelling(statements, refine(statements, branch));
            let rows: Vec<[String; 4]> = labelled.iter().map(render_row).collect();
            (rows, labelled)
        })
        .min_by(|a, b| a.0.cmp(&b.0))
        .map(|(_, labelled)| labelled)
        .unwrap_or_else(|| relabel(statements, &colours))
}

/// Split colour classes by neighbouring colours until nothing changes.
fn refine<'a>(statements: &[Statement], mut colours: Colours<'a>) -> Colours<'a> {
    let mut classes = class_count(&colours);
    loop {
        let next: Colours<'a> = colours
            .iter()
            .map(|(node, colour)| (*node, neighbourhood_hash(statements, node, colour, &colours)))
            .collect();
        let count = class_count(&next);
        if count == classes {
            return colours;
        }
        colours = next;
        classes = count;
    }
}

fn class_count(colours: &Colours<'_>) -> usize {
    colours.values().collect::<BTreeSet<_>>().len()
}

/// Members of the lowest colour shared by more than one node.
fn first_tied_class<'a>(colours: &Colours<'a>) -> Option<Vec<&'a str>> {
    let mut classes: BTreeMap<&str, Vec<&'a str>> = BTreeMap::new();
    for (node, colour) in colours {
        classes.entry(colour.as_str()).or_default().push(*node);
    }
    classes.into_values().find(|members| members.len() > 1)
}

/// Label nodes `c14n0..` in colour order and sort the result.
fn relabel(statements: &[Statement], colours: &Colours<'_>) -> Vec<Statement> {
    let mut ordered: Vec<(&String, &str)> =
        colours.iter().map(|(node, colour)| (colour, *node)).collect();
    ordered.sort();
    let mapping: HashMap<&str, String> = ordered
        .iter()
        .enumerate()
        .map(|(n, (_, node))| (*node, format!("{}{}", BNODE_PREFIX, n)))
        .collect();

    let mut labelled: Vec<Statement> = statements
        .iter()
        .map(|st| {
            st.map_terms(|t| match t {
                Term::BlankNode(label) => Term::BlankNode(
                    mapping
                        .get(label.as_str())
                        .cloned()
                        .unwrap_or_else(|| label.clone()),
                ),
                other => other.clone(),
            })
        })
        .collect();
    labelled.sort_by_cached_key(render_row);
    labelled
}

fn first_degree_hash(statements: &[Statement], label: &str) -> String {
    let lines = neighbourhood(statements, label, |_| "z".to_string());
    sha256_hex(&lines.join("\n"))
}

fn neighbourhood_hash(
    statements: &[Statement],
    label: &str,
    own: &str,
    colours: &Colours<'_>,
) -> String {
    let lines = neighbourhood(statements, label, |other| {
        format!("h{}", colours.get(other).map(String::as_str).unwrap_or_default())
    });
    sha256_hex(&format!("{}\n{}", own, lines.join("\n")))
}

/// Sorted statements mentioning `label`, with `label` written as `_:a` and
/// every other blank node named by `name_other`.
fn neighbourhood(
    statements: &[Statement],
    label: &str,
    name_other: impl Fn(&str) -> String,
) -> Vec<String> {
    let mut lines: Vec<String> = statements
        .iter()
        .filter(|st| terms(st).any(|t| matches!(t, Term::BlankNode(l) if l == label)))
        .map(|st| {
            st.map_terms(|t| match t {
                Term::BlankNode(l) if l == label => Term::bnode("a"),
                Term::BlankNode(l) => Term::bnode(name_other(l.as_str())),
                other => other.clone(),
            })
            .to_string()
        })
        .collect();
    lines.sort();
    lines
}

fn sha256_hex(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}
