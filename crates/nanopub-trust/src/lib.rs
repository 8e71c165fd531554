//! # Nanopub Trust
//!
//! The unified API for trusting nanopublications obtained from untrusted
//! places.
//!
//! ## Overview
//!
//! - **Content addressing**: identifiers embed a hash of the content they name
//! - **Signatures**: an embedded signature element vouches for the content
//! - **Retrieval**: any server may serve a publication; only content that
//!   re-hashes to its identifier is accepted
//!
//! ## Usage
//!
//! ```rust,no_run
//! use nanopub_trust::{ClientConfig, FetcherConfig, ServerList, TrustClient};
//!
//! async fn example() {
//!     let client = TrustClient::http(FetcherConfig::default(), ClientConfig::default()).unwrap();
//!
//!     let checked = client
//!         .retrieve_checked(
//!             "http://purl.org/np/RAHtkscyyyJDLvWRuINckQrn5rbHzQKvwakNVC3fmRzGU",
//!             &mut ServerList::default(),
//!         )
//!         .await
//!         .unwrap();
//!
//!     if let Some(checked) = checked {
//!         println!("{} {:?}", checked.publication.uri(), checked.signature);
//!     }
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `nanopub_trust::core` - Publications, trusty identifiers, canonicalization
//! - `nanopub_trust::sign` - Signature resolution, verification and creation
//! - `nanopub_trust::fetch` - Self-certifying retrieval

pub mod client;
pub mod error;

// Re-export component crates
pub use nanopub_trust_core as core;
pub use nanopub_trust_fetch as fetch;
pub use nanopub_trust_sign as sign;

// Re-export main types for convenience
pub use client::{CheckedPublication, ClientConfig, SignatureStatus, TrustClient};
pub use error::{Result, TrustError};

// Re-export commonly used component types
pub use nanopub_trust_core::{
    make_trusty, ArtifactCode, Publication, PublicationBuilder, Statement, Term, TrustyRdf,
};
pub use nanopub_trust_fetch::{
    CandidateServerSource, Fetcher, FetcherConfig, HttpFetcher, RetrieveConfig, Retriever,
    ServerList,
};
pub use nanopub_trust_sign::{
    resolve_signature, verify, KeyPair, SignatureAlgorithm, SignatureElement,
};
