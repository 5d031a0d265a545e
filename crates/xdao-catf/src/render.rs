//! Deterministic rendering of a [`CatfDocument`]'s fields back to canonical
//! bytes.
//!
//! Rendering never fails: by the time a [`CatfDocument`] exists its fields
//! have already been validated (either by [`crate::canonicalize::parse`]'s
//! own byte-identity check, or by a builder that reuses the same section
//! layout). Builders that accept arbitrary keys/values should validate them
//! with [`xdao_core::linetext::split_key_value`] before constructing a
//! document, rather than relying on render to catch malformed input.

use std::collections::BTreeMap;

use crate::canonicalize::{POSTAMBLE, PREAMBLE, SECTIONS};
use crate::document::CatfDocument;

/// Render `doc`'s fields to canonical CATF bytes.
pub fn render(doc: &CatfDocument) -> Vec<u8> {
    let sections: [&BTreeMap<String, String>; 4] =
        [&doc.meta, &doc.subject, &doc.claims, &doc.crypto];

    let mut out = String::new();
    out.push_str(PREAMBLE);
    out.push('\n');
    for (name, fields) in SECTIONS.iter().zip(sections.iter()) {
        out.push_str(name);
        out.push('\n');
        for (key, value) in fields.iter() {
            out.push_str(key);
            out.push_str(": ");
            out.push_str(value);
            out.push('\n');
        }
        out.push('\n');
    }
    // Drop the blank line that would otherwise separate CRYPTO from the
    // postamble — sections are separated *between* each other, not
    // trailed by one.
    out.pop();
    out.push_str(POSTAMBLE);
    out.into_bytes()
}
