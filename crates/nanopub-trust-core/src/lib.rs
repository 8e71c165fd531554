//! # Nanopub Trust Core
//!
//! Pure primitives for nanopublication trust: statements, publications,
//! trusty identifiers and canonicalization.
//!
//! This crate contains no I/O and no networking. It is pure computation over
//! RDF statement sets.
//!
//! ## Key Types
//!
//! - [`Publication`] - Head, assertion, provenance and pubinfo graphs
//! - [`ArtifactCode`] - Content-address code embedded in a trusty URI
//! - [`ContentAddressing`] - Canonicalize / digest / finalize contract
//! - [`PublicationBuilder`] - Authoring of unsigned publications
//!
//! ## Canonicalization
//!
//! The digest string format is frozen. See the [`canonical`] module.

pub mod batch;
pub mod builder;
pub mod canonical;
pub mod error;
pub mod nquads;
pub mod publication;
pub mod term;
pub mod trusty;
pub mod vocab;

pub use batch::{build_all, Accumulator, BatchConfig, BatchState, BuildEvent};
pub use builder::{random_temp_uri, PublicationBuilder, TEMP_URI_BASE};
pub use canonical::{code_base, make_trusty, ContentAddressing, SelfRef, TrustyRdf, PLACEHOLDER};
pub use error::{CoreError, Result};
pub use nquads::{parse_nquads, write_nquads, NQuads, PublicationParser, NQUADS_MEDIA_TYPE};
pub use publication::{Namespace, Publication};
pub use term::{Literal, Statement, Term};
pub use trusty::{
    is_potential_artifact_code, is_potential_trusty_uri, normalize_identifier, ArtifactCode,
    RDF_MODULE_ID,
};
