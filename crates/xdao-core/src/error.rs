//! # Error Taxonomy — Stable Kind + Rule-ID + Message
//!
//! Every failure surfaced by the canonicalizers, the crypto layer, the TPDL
//! parser, and the CROF layer flows through [`XdaoError`]: a closed
//! [`ErrorKind`] plus a stable rule identifier plus a human-readable
//! message. Callers branch on `kind()` and/or `rule_id()`, never on the
//! message text.
//!
//! ## Implements
//!
//! Spec §6 "Error kinds (exposed)" and §7 "Error Handling Design".

use thiserror::Error;

/// The closed enumeration of error kinds surfaced by the core.
///
/// This enum is intentionally small and will not grow casually: every
/// variant here is a distinct axis a caller might branch on. New rule ids
/// are added within an existing kind, not by adding kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Structural parse failure: missing preamble/postamble, malformed
    /// `Key: Value` line, duplicate or out-of-order section.
    Parse,
    /// Byte-level canonicalization failure: CRLF, BOM, trailing newline,
    /// unsorted keys, blank-line misuse, non-canonical byte identity.
    Canonical,
    /// Semantic validation failure: a claim type is missing one of its
    /// required core fields.
    Validation,
    /// Rendering failure: an attempt to emit an empty or invalid value.
    Render,
    /// Cryptographic failure: missing/unsupported algorithm, length
    /// mismatch, bad base64, invalid signature.
    Crypto,
    /// Content-identifier failure: CID requested from non-canonical bytes,
    /// or a malformed CID string was supplied where one was expected.
    Cid,
    /// Invariant violation inside the library itself.
    Internal,
}

impl ErrorKind {
    /// Short machine-stable label, used in `Display` output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Parse => "parse",
            Self::Canonical => "canonical",
            Self::Validation => "validation",
            Self::Render => "render",
            Self::Crypto => "crypto",
            Self::Cid => "cid",
            Self::Internal => "internal",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stable, structured error: kind + rule id + human message.
///
/// `rule_id` is a stable identifier such as `CATF-STR-001` or
/// `CATF-CRYPTO-401` (see `spec.md` §4.2, §4.4, §4.5, §4.6 for the rule
/// catalogs). Two errors with the same `rule_id` always mean the same
/// failure mode, even if the message text is refined over time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{rule_id}: {message}")]
pub struct XdaoError {
    kind: ErrorKind,
    rule_id: &'static str,
    message: String,
}

impl XdaoError {
    /// Construct a new structured error.
    pub fn new(kind: ErrorKind, rule_id: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind,
            rule_id,
            message: message.into(),
        }
    }

    /// The error kind, for coarse-grained branching.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The stable rule identifier, for precise branching.
    pub fn rule_id(&self) -> &'static str {
        self.rule_id
    }

    /// The human-readable message. Never branch on this text.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Shorthand for constructing a `Parse` error.
    pub fn parse(rule_id: &'static str, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Parse, rule_id, message)
    }

    /// Shorthand for constructing a `Canonical` error.
    pub fn canonical(rule_id: &'static str, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Canonical, rule_id, message)
    }

    /// Shorthand for constructing a `Validation` error.
    pub fn validation(rule_id: &'static str, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, rule_id, message)
    }

    /// Shorthand for constructing a `Render` error.
    pub fn render(rule_id: &'static str, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Render, rule_id, message)
    }

    /// Shorthand for constructing a `Crypto` error.
    pub fn crypto(rule_id: &'static str, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Crypto, rule_id, message)
    }

    /// Shorthand for constructing a `Cid` error.
    pub fn cid(rule_id: &'static str, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Cid, rule_id, message)
    }

    /// Shorthand for constructing an `Internal` error.
    pub fn internal(rule_id: &'static str, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, rule_id, message)
    }
}

/// Result alias used throughout the workspace.
pub type XdaoResult<T> = Result<T, XdaoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_format_is_rule_id_colon_message() {
        let e = XdaoError::canonical("CATF-CANON-001", "carriage return found");
        assert_eq!(format!("{e}"), "CATF-CANON-001: carriage return found");
    }

    #[test]
    fn kind_and_rule_id_are_queryable() {
        let e = XdaoError::crypto("CATF-CRYPTO-401", "signature invalid");
        assert_eq!(e.kind(), ErrorKind::Crypto);
        assert_eq!(e.rule_id(), "CATF-CRYPTO-401");
    }
}
