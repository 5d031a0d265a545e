//! The in-memory representation of a parsed CATF attestation.

use std::collections::BTreeMap;

use xdao_core::error::XdaoError;

use crate::rules;

/// Byte offset immediately after the `\n` that ends the `CRYPTO` section
/// header line — the boundary between signed content and signature fields.
const SCOPE_SENTINEL: &str = "\nCRYPTO\n";

/// A parsed, canonical CATF attestation.
///
/// The only way to obtain one is [`crate::parse`] or [`crate::canonicalize`]
/// followed by a re-parse; both routes byte-compare the rendered form of
/// the parsed fields against the input before returning, so a live
/// `CatfDocument` always satisfies the round-trip law in `spec.md` §8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatfDocument {
    pub(crate) meta: BTreeMap<String, String>,
    pub(crate) subject: BTreeMap<String, String>,
    pub(crate) claims: BTreeMap<String, String>,
    pub(crate) crypto: BTreeMap<String, String>,
    pub(crate) canonical: Vec<u8>,
}

impl CatfDocument {
    /// The `META` section's `Key: Value` fields.
    pub fn meta(&self) -> &BTreeMap<String, String> {
        &self.meta
    }

    /// The `SUBJECT` section's `Key: Value` fields.
    pub fn subject(&self) -> &BTreeMap<String, String> {
        &self.subject
    }

    /// The `CLAIMS` section's `Key: Value` fields.
    pub fn claims(&self) -> &BTreeMap<String, String> {
        &self.claims
    }

    /// The `CRYPTO` section's `Key: Value` fields.
    pub fn crypto(&self) -> &BTreeMap<String, String> {
        &self.crypto
    }

    /// The exact canonical bytes this document was parsed from (or
    /// rendered to, during canonicalization).
    pub fn canonical_bytes(&self) -> &[u8] {
        &self.canonical
    }

    /// The CIDv1(raw, sha2-256) of [`Self::canonical_bytes`].
    pub fn cid(&self) -> String {
        xdao_core::cid::compute(&self.canonical)
    }

    /// The exact byte range over which a signature in `CRYPTO` is computed.
    ///
    /// Located by finding the `\nCRYPTO\n` sentinel and taking bytes
    /// `[0, idx)`, where `idx` is the sentinel's start — the newline that
    /// opens the blank line separating `CLAIMS` from `CRYPTO`. The scope
    /// therefore ends with the newline that terminates `CLAIMS` itself and
    /// excludes the blank separator line along with all of `CRYPTO`. This
    /// is a substring search over the live canonical bytes, never a
    /// re-synthesized pseudo-document — the scope a verifier checks against
    /// is always exactly the bytes a signer would have seen, and it can
    /// never be perturbed by anything written after it in `CRYPTO`.
    pub fn signature_scope(&self) -> Result<&[u8], XdaoError> {
        let text = std::str::from_utf8(&self.canonical).expect("canonical bytes are valid UTF-8");
        let idx = text.find(SCOPE_SENTINEL).ok_or_else(|| {
            XdaoError::parse(
                rules::MISSING_SIGNATURE_SENTINEL,
                "canonical document has no CRYPTO section sentinel",
            )
        })?;
        Ok(&self.canonical[..idx])
    }
}
