//! Proptest generators for property-based testing.

use proptest::prelude::*;

use nanopub_trust_core::vocab::{PROV_HAD_PRIMARY_SOURCE, PROV_WAS_DERIVED_FROM, XSD};
use nanopub_trust_core::{Literal, Publication, PublicationBuilder, Statement, Term, TEMP_URI_BASE};
use nanopub_trust_sign::KeyPair;

/// Generate an IRI under `http://example.org/`.
pub fn iri() -> impl Strategy<Value = Term> {
    "[a-z]{1,8}(/[a-z0-9]{1,4})?".prop_map(|path| Term::iri(format!("http://example.org/{}", path)))
}

/// Generate a literal: plain, language-tagged or typed.
pub fn literal() -> impl Strategy<Value = Term> {
    prop_oneof![
        r#"[a-zA-Z0-9 "\\\n]{0,12}"#.prop_map(Term::literal),
        ("[a-zA-Z ]{0,12}", "[a-z]{2}").prop_map(|(lex, lang)| Term::Literal(Literal::lang(lex, lang))),
        (0u32..100_000).prop_map(|n| Term::typed_literal(n.to_string(), format!("{}integer", XSD))),
    ]
}

/// Generate an object term.
pub fn object() -> impl Strategy<Value = Term> {
    prop_oneof![iri(), literal()]
}

/// Generate an assertion triple without blank nodes.
pub fn triple() -> impl Strategy<Value = (Term, Term, Term)> {
    (iri(), iri(), object())
}

/// Generate assertion triples around blank nodes.
///
/// Each hub `_:h` hangs off an IRI and carries a literal. Each hub has a leaf
/// `_:l` linked both ways, so every leaf has the same first-degree
/// neighbourhood. Hubs may share subject and literal, making them
/// interchangeable. Labels are shuffled.
pub fn blank_node_cluster() -> impl Strategy<Value = Vec<(Term, Term, Term)>> {
    let labels: Vec<String> = (0..8).map(|n| format!("b{}", n)).collect();
    (
        prop::collection::vec((iri(), "[a-c]"), 1..4),
        Just(labels).prop_shuffle(),
    )
        .prop_map(|(hubs, labels)| {
            let ex = |name: &str| Term::iri(format!("http://example.org/{}", name));
            hubs.into_iter()
                .enumerate()
                .flat_map(|(i, (subject, value))| {
                    let hub = Term::bnode(labels[2 * i].clone());
                    let leaf = Term::bnode(labels[2 * i + 1].clone());
                    vec![
                        (subject, ex("has"), hub.clone()),
                        (hub.clone(), ex("value"), Term::literal(value)),
                        (leaf.clone(), ex("of"), hub.clone()),
                        (hub, ex("leaf"), leaf),
                    ]
                })
                .collect()
        })
}

/// Generate a provisional URI, with or without a trailing slash.
pub fn provisional_uri() -> impl Strategy<Value = String> {
    (0u32..1_000_000, prop_oneof![Just("/"), Just("")])
        .prop_map(|(id, tail)| format!("{}{}{}", TEMP_URI_BASE, id, tail))
}

/// Generate an Ed25519 key pair.
pub fn ed25519_keys() -> impl Strategy<Value = KeyPair> {
    any::<[u8; 32]>().prop_map(|seed| KeyPair::ed25519_from_seed(&seed))
}

/// Parameters for generating an unsigned publication.
#[derive(Debug, Clone)]
pub struct PublicationParams {
    pub uri: String,
    pub assertion: Vec<(Term, Term, Term)>,
    pub blank_nodes: Vec<(Term, Term, Term)>,
    pub source: Term,
    pub derived: bool,
    pub creators: Vec<String>,
}

impl Arbitrary for PublicationParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            provisional_uri(),
            prop::collection::vec(triple(), 1..8),
            prop::option::of(blank_node_cluster()),
            iri(),
            any::<bool>(),
            prop::collection::vec("[a-z]{1,8}", 0..3),
        )
            .prop_map(|(uri, assertion, blank_nodes, source, derived, creators)| PublicationParams {
                uri,
                assertion,
                blank_nodes: blank_nodes.unwrap_or_default(),
                source,
                derived,
                creators: creators
                    .into_iter()
                    .map(|c| format!("https://example.org/people/{}", c))
                    .collect(),
            })
            .boxed()
    }
}

/// Generate an unsigned publication from parameters.
pub fn publication_from_params(params: &PublicationParams) -> Publication {
    let provenance_predicate = if params.derived {
        PROV_WAS_DERIVED_FROM
    } else {
        PROV_HAD_PRIMARY_SOURCE
    };

    let mut builder = params.assertion.iter().chain(&params.blank_nodes).cloned().fold(
        PublicationBuilder::new(&params.uri).add_default_namespaces(),
        |builder, (s, p, o)| builder.add_assertion(s, p, o),
    );
    builder = builder.add_provenance(Term::iri(provenance_predicate), params.source.clone());
    builder = params
        .creators
        .iter()
        .fold(builder, |builder, creator| builder.add_creator(creator.as_str()));
    if params.creators.is_empty() {
        builder = builder.add_pubinfo(
            Term::iri("http://www.w3.org/2000/01/rdf-schema#comment"),
            Term::literal("generated"),
        );
    }

    builder
        .finalize()
        .expect("generated publications are well-formed")
}

/// All statements of a publication, in reverse order.
pub fn reversed_statements(publication: &Publication) -> Vec<Statement> {
    let mut statements = publication.all_statements();
    statements.reverse();
    statements
}
