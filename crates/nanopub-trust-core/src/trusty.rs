//! Trusty identifiers: artifact codes embedded in content-addressed URIs.
//!
//! An artifact code is a run of at least 25 characters from `[A-Za-z0-9-_]`
//! at the tail of a URI. The first two characters name the module that
//! produced it; RDF publications use [`RDF_MODULE_ID`].

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::error::{CoreError, Result};

/// Module id of RDF-graph artifact codes.
pub const RDF_MODULE_ID: &str = "RA";

/// Minimum number of characters in a potential artifact code.
pub const MIN_CODE_LEN: usize = 25;

/// Maximum length of a file extension after the code (`RA...xyz.trig`).
const MAX_EXTENSION_LEN: usize = 20;

pub(crate) fn is_code_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// A content-address code, e.g. `RAkYh4UPJryajbtIDbLG-Bfd6A4JD2SbU9bmZdvaEdFRY`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArtifactCode(String);

impl ArtifactCode {
    /// Parse a bare artifact code.
    pub fn parse(s: &str) -> Result<Self> {
        if is_potential_artifact_code(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(CoreError::InvalidIdentifier(format!(
                "not a well-formed artifact code: {}",
                s
            )))
        }
    }

    /// Extract the artifact code from the tail of a trusty URI.
    ///
    /// Returns `None` if the URI does not end with a potential code
    /// (optionally followed by a short `.ext`).
    pub fn from_uri(uri: &str) -> Option<Self> {
        let tail = strip_extension(uri);
        let start = tail
            .char_indices()
            .rev()
            .take_while(|(_, c)| is_code_char(*c))
            .last()
            .map(|(i, _)| i)?;
        let code = &tail[start..];
        if code.len() >= MIN_CODE_LEN {
            Some(Self(code.to_string()))
        } else {
            None
        }
    }

    /// Compute the RA code of a digest string.
    pub fn for_digest_string(digest: &str) -> Self {
        let hash = Sha256::digest(digest.as_bytes());
        Self(format!("{}{}", RDF_MODULE_ID, URL_SAFE_NO_PAD.encode(hash)))
    }

    /// The two-character module id.
    pub fn module_id(&self) -> &str {
        &self.0[..2]
    }

    /// Check whether the code was produced by the RDF module.
    pub fn is_rdf_module(&self) -> bool {
        self.module_id() == RDF_MODULE_ID
    }

    /// Fail with `WrongArtifactType` unless this is an RA code.
    pub fn require_rdf_module(&self) -> Result<()> {
        if self.is_rdf_module() {
            Ok(())
        } else {
            Err(CoreError::WrongArtifactType {
                expected: RDF_MODULE_ID.to_string(),
                found: self.module_id().to_string(),
            })
        }
    }

    /// The code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ArtifactCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ArtifactCode({})", self.0)
    }
}

impl fmt::Display for ArtifactCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ArtifactCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Check the bare artifact-code syntax.
pub fn is_potential_artifact_code(s: &str) -> bool {
    s.len() >= MIN_CODE_LEN && s.chars().all(is_code_char)
}

/// Check whether `uri` is syntactically a trusty URI.
pub fn is_potential_trusty_uri(uri: &str) -> bool {
    ArtifactCode::from_uri(uri).is_some()
}

/// Drop a trailing `.ext` if what precedes it could end in a code.
fn strip_extension(uri: &str) -> &str {
    if let Some(dot) = uri.rfind('.') {
        let ext = &uri[dot + 1..];
        let head = &uri[..dot];
        if ext.len() <= MAX_EXTENSION_LEN
            && ext.chars().all(is_code_char)
            && head.ends_with(is_code_char)
        {
            return head;
        }
    }
    uri
}

/// Turn a URI or bare artifact code into the code used for fetching.
///
/// Input containing a `:` after the first position is treated as a URI.
/// The code must carry the RA module prefix.
pub fn normalize_identifier(uri_or_code: &str) -> Result<ArtifactCode> {
    let code = match uri_or_code.find(':') {
        Some(i) if i > 0 => ArtifactCode::from_uri(uri_or_code).ok_or_else(|| {
            CoreError::InvalidIdentifier(format!("not a well-formed trusty URI: {}", uri_or_code))
        })?,
        _ => ArtifactCode::parse(uri_or_code)?,
    };
    code.require_rdf_module()?;
    Ok(code)
}
