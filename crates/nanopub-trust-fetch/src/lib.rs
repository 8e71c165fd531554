//! # Nanopub Trust Fetch
//!
//! Retrieval of publications by content address from untrusted servers.
//!
//! The [`Retriever`] pulls server base URLs from a [`CandidateServerSource`],
//! fetches `base + code` through a [`Fetcher`] and accepts only content that
//! re-hashes to the code in its own URI. Everything else is discarded, so
//! "first success wins" needs no agreement among servers.

pub mod error;
pub mod fetcher;
pub mod retriever;
pub mod source;

pub use error::{FetchError, Result};
pub use fetcher::{memory, Fetcher, FetcherConfig, HttpFetcher};
pub use retriever::{RetrieveConfig, Retriever};
pub use source::{CandidateServerSource, ServerList, BOOTSTRAP_SERVERS};
