//! Byte-level canonicalization and structural parsing of CATF attestations.

use std::collections::BTreeMap;

use xdao_core::error::XdaoError;
use xdao_core::linetext;

use crate::document::CatfDocument;
use crate::render::render;
use crate::rules;

pub(crate) const PREAMBLE: &str = "-----BEGIN XDAO ATTESTATION-----";
pub(crate) const POSTAMBLE: &str = "-----END XDAO ATTESTATION-----";
pub(crate) const SECTIONS: [&str; 4] = ["META", "SUBJECT", "CLAIMS", "CRYPTO"];

/// Parse and validate a candidate CATF document.
///
/// Applies the byte-level discipline in the fixed order the format
/// mandates — UTF-8, CR, BOM, trailing newline, preamble/postamble, line
/// trailing whitespace — then the structural section/key-value grammar,
/// then renders the parsed fields back out and rejects any input whose
/// bytes do not match the render exactly.
pub fn parse(bytes: &[u8]) -> Result<CatfDocument, XdaoError> {
    let s = linetext::check_utf8(bytes, rules::NOT_UTF8)?;
    linetext::check_no_cr(s, rules::HAS_CR)?;
    linetext::check_no_bom(bytes, rules::HAS_BOM)?;
    linetext::check_no_trailing_newline(bytes, rules::TRAILING_NEWLINE)?;

    let lines: Vec<&str> = s.split('\n').collect();
    if lines.len() < 2 || lines[0] != PREAMBLE || lines[lines.len() - 1] != POSTAMBLE {
        return Err(XdaoError::canonical(
            rules::BAD_PREAMBLE_POSTAMBLE,
            "document must begin with the BEGIN marker and end with the END marker, each alone on its own line",
        ));
    }

    linetext::check_no_trailing_line_ws(s, rules::TRAILING_LINE_WS)?;

    let body = &lines[1..lines.len() - 1];
    let groups = linetext::split_on_blank_lines(body, rules::BAD_SECTION_STRUCTURE)?;
    if groups.len() != SECTIONS.len() {
        return Err(XdaoError::parse(
            rules::BAD_SECTION_STRUCTURE,
            format!("expected {} sections, found {}", SECTIONS.len(), groups.len()),
        ));
    }

    let mut sections: Vec<BTreeMap<String, String>> = Vec::with_capacity(SECTIONS.len());
    for (expected_name, group) in SECTIONS.iter().zip(groups.iter()) {
        let (name, rest) = group.split_first().ok_or_else(|| {
            XdaoError::parse(rules::BAD_SECTION_STRUCTURE, "empty section group")
        })?;
        if name != expected_name {
            return Err(XdaoError::parse(
                rules::BAD_SECTION_STRUCTURE,
                format!("expected section header {expected_name:?}, found {name:?}"),
            ));
        }
        sections.push(parse_fields(rest)?);
    }

    let crypto = sections.pop().expect("4 sections were pushed");
    let claims = sections.pop().expect("4 sections were pushed");
    let subject = sections.pop().expect("4 sections were pushed");
    let meta = sections.pop().expect("4 sections were pushed");

    let candidate = CatfDocument {
        meta,
        subject,
        claims,
        crypto,
        canonical: Vec::new(),
    };
    let rendered = render(&candidate);
    if rendered != bytes {
        tracing::warn!(rule_id = rules::NON_CANONICAL_BYTE_IDENTITY, "CATF input rejected: not its own canonical rendering");
        return Err(XdaoError::canonical(
            rules::NON_CANONICAL_BYTE_IDENTITY,
            "input is not the canonical rendering of its own fields",
        ));
    }

    Ok(CatfDocument {
        canonical: rendered,
        ..candidate
    })
}

/// Canonicalize a candidate document, returning its canonical bytes.
///
/// Equivalent to `parse(bytes).map(|doc| doc.canonical_bytes().to_vec())`,
/// provided for callers that only need the bytes and not the structured
/// fields.
pub fn canonicalize(bytes: &[u8]) -> Result<Vec<u8>, XdaoError> {
    parse(bytes).map(|doc| doc.canonical)
}

fn parse_fields(lines: &[&str]) -> Result<BTreeMap<String, String>, XdaoError> {
    let mut fields = BTreeMap::new();
    let mut last_key: Option<String> = None;
    for &line in lines {
        let (key, value) = linetext::split_key_value(line, rules::BAD_KEY_VALUE_LINE)?;
        if let Some(ref prev) = last_key {
            if key <= prev.as_str() {
                return Err(XdaoError::canonical(
                    rules::UNSORTED_OR_DUPLICATE_KEYS,
                    format!("key {key:?} is not strictly greater than preceding key {prev:?}"),
                ));
            }
        }
        last_key = Some(key.to_string());
        fields.insert(key.to_string(), value.to_string());
    }
    Ok(fields)
}
