//! # Nanopub Trust Testkit
//!
//! Testing utilities for nanopub-trust.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Pinned digest strings and artifact codes for cross-implementation checks
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Key pairs, ready-made publications and scripted servers
//!
//! ## Golden Vectors
//!
//! ```rust
//! use nanopub_trust_testkit::vectors::verify_all_vectors;
//!
//! for (name, passed, code) in verify_all_vectors() {
//!     assert!(passed, "{}: {}", name, code);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use nanopub_trust_testkit::generators::{publication_from_params, PublicationParams};
//!
//! proptest! {
//!     #[test]
//!     fn builds(params: PublicationParams) {
//!         let publication = publication_from_params(&params);
//!         prop_assert!(!publication.assertion().is_empty());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use nanopub_trust_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new();
//! let signed = fixture.signed("hello");
//! assert!(signed.artifact_code().is_some());
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{multi_algorithm_fixtures, serve, unsigned_publication, TestFixture};
pub use generators::{publication_from_params, PublicationParams};
pub use vectors::{all_vectors, publication_from_vector, verify_all_vectors, GoldenVector};
