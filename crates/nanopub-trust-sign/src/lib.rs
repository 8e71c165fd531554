//! # Nanopub Trust Sign
//!
//! Digital signatures embedded in publications.
//!
//! ## Read path
//!
//! [`resolve_signature`] extracts the [`SignatureElement`] from pubinfo, and
//! [`verify`] checks it against the canonical content of its targets.
//!
//! ## Write path
//!
//! [`sign`] turns an unsigned publication into a new, signed and
//! content-addressed one.
//!
//! [`looks_signed`] is a weaker heuristic for legacy formats and must not be
//! used for trust decisions.

pub mod algorithm;
pub mod create;
pub mod element;
pub mod error;
pub mod resolve;
pub mod verify;

pub use algorithm::{KeyPair, SignatureAlgorithm, DEFAULT_RSA_BITS};
pub use create::{sign, sign_with};
pub use element::SignatureElement;
pub use error::{Result, SignError};
pub use resolve::{looks_signed, resolve_signature};
pub use verify::{verify, verify_with};
