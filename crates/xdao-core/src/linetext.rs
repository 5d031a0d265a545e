//! # Shared Canonical-Text Line Discipline
//!
//! CATF, TPDL, and CROF all enforce the same byte-level discipline before
//! their own section grammars apply: valid UTF-8, no BOM, no CR, and no
//! line ending in a space or tab. This module is the single choke point for
//! that discipline — the text-format analogue of the teacher idiom of a
//! single canonicalizing constructor (there: JCS bytes; here: a validated
//! line sequence).
//!
//! Preamble/postamble markers, section order, and per-line `Key: Value`
//! shape remain format-specific and are checked by each format's own
//! canonicalizer after this pass succeeds.
//!
//! ## Implements
//!
//! Spec §4.2 rule pass 1 (generalized across CATF/TPDL/CROF per §4.9 of
//! `SPEC_FULL.md`).

use crate::error::XdaoError;

/// The rule identifiers a caller wants attached to each possible failure.
/// Each format has its own rule-id namespace (`CATF-*`, `TPDL-*`,
/// `CROF-*`), so the identifiers are supplied by the caller rather than
/// hard-coded here.
#[derive(Debug, Clone, Copy)]
pub struct DisciplineRuleIds {
    /// Input is not valid UTF-8.
    pub not_utf8: &'static str,
    /// Input contains a carriage return.
    pub has_cr: &'static str,
    /// Input begins with a UTF-8 byte-order mark.
    pub has_bom: &'static str,
    /// A line ends with a space or tab.
    pub trailing_line_ws: &'static str,
}

/// Validate the shared byte-level discipline and return the input as `&str`.
///
/// Checks UTF-8, BOM, CR, and per-line trailing whitespace in that order.
/// Formats whose spec mandates a different relative order between these
/// four (CATF interleaves an "absence of trailing newline" check between
/// CR/BOM and preamble checks) should call the granular functions below
/// directly instead of this convenience wrapper.
///
/// Nothing about trailing newlines, preambles, or section structure is
/// checked here — those invariants differ between CATF (no trailing
/// newline) and CROF (exactly one trailing newline).
pub fn check_discipline<'a>(
    bytes: &'a [u8],
    rules: &DisciplineRuleIds,
) -> Result<&'a str, XdaoError> {
    let s = check_utf8(bytes, rules.not_utf8)?;
    check_no_bom(bytes, rules.has_bom)?;
    check_no_cr(s, rules.has_cr)?;
    check_no_trailing_line_ws(s, rules.trailing_line_ws)?;
    Ok(s)
}

/// Validate UTF-8 and return the input as `&str`.
pub fn check_utf8<'a>(bytes: &'a [u8], rule_id: &'static str) -> Result<&'a str, XdaoError> {
    std::str::from_utf8(bytes)
        .map_err(|e| XdaoError::parse(rule_id, format!("input is not valid UTF-8: {e}")))
}

/// Reject a leading UTF-8 byte-order mark.
pub fn check_no_bom(bytes: &[u8], rule_id: &'static str) -> Result<(), XdaoError> {
    if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
        Err(XdaoError::canonical(rule_id, "input begins with a UTF-8 BOM"))
    } else {
        Ok(())
    }
}

/// Reject any carriage return in the input.
pub fn check_no_cr(s: &str, rule_id: &'static str) -> Result<(), XdaoError> {
    if s.contains('\r') {
        Err(XdaoError::canonical(rule_id, "input contains a carriage return"))
    } else {
        Ok(())
    }
}

/// Reject a trailing `\n` on the whole document.
pub fn check_no_trailing_newline(bytes: &[u8], rule_id: &'static str) -> Result<(), XdaoError> {
    if bytes.ends_with(b"\n") {
        Err(XdaoError::canonical(rule_id, "document ends with a trailing newline"))
    } else {
        Ok(())
    }
}

/// Require exactly one trailing `\n` on the whole document.
pub fn require_single_trailing_newline(bytes: &[u8], rule_id: &'static str) -> Result<(), XdaoError> {
    if !bytes.ends_with(b"\n") || bytes.ends_with(b"\n\n") {
        Err(XdaoError::canonical(rule_id, "document must end with exactly one trailing newline"))
    } else {
        Ok(())
    }
}

/// Reject any line (split on `\n`) ending in a space or tab.
pub fn check_no_trailing_line_ws(s: &str, rule_id: &'static str) -> Result<(), XdaoError> {
    for (idx, line) in s.split('\n').enumerate() {
        if line.ends_with(' ') || line.ends_with('\t') {
            return Err(XdaoError::canonical(
                rule_id,
                format!("line {} ends with trailing whitespace", idx + 1),
            ));
        }
    }
    Ok(())
}

/// Split a sequence of lines into groups separated by exactly one blank
/// line, rejecting a leading/trailing/doubled blank line.
///
/// Shared by every format (CATF, TPDL, CROF) whose sections are laid out
/// as "one blank line between groups, none at either edge".
pub fn split_on_blank_lines<'a>(
    lines: &[&'a str],
    rule_id: &'static str,
) -> Result<Vec<Vec<&'a str>>, XdaoError> {
    let mut groups = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for &line in lines {
        if line.is_empty() {
            if current.is_empty() {
                return Err(XdaoError::parse(
                    rule_id,
                    "unexpected blank line (groups must be separated by exactly one blank line)",
                ));
            }
            groups.push(std::mem::take(&mut current));
        } else {
            current.push(line);
        }
    }
    if current.is_empty() {
        return Err(XdaoError::parse(rule_id, "document ends with an empty group"));
    }
    groups.push(current);
    Ok(groups)
}

/// Parse a single `Key: Value` line, enforcing exactly one space after the
/// colon and no leading/trailing whitespace in the value.
///
/// Returns `(key, value)` on success. Neither `key` nor `value` may be
/// empty; `value` may not contain `\r` (already excluded at the discipline
/// layer) and may not start with a space.
pub fn split_key_value<'a>(
    line: &'a str,
    malformed_rule: &'static str,
) -> Result<(&'a str, &'a str), XdaoError> {
    let colon = line
        .find(':')
        .ok_or_else(|| XdaoError::parse(malformed_rule, format!("missing ':' in line: {line:?}")))?;
    let (key, rest) = line.split_at(colon);
    let rest = &rest[1..]; // drop the colon
    if !rest.starts_with(' ') {
        return Err(XdaoError::parse(
            malformed_rule,
            format!("expected exactly one space after ':' in line: {line:?}"),
        ));
    }
    let value = &rest[1..];
    if value.starts_with(' ') || value.starts_with('\t') {
        return Err(XdaoError::parse(
            malformed_rule,
            format!("value has extra leading whitespace in line: {line:?}"),
        ));
    }
    if key.is_empty() {
        return Err(XdaoError::parse(malformed_rule, "key is empty"));
    }
    if value.is_empty() {
        return Err(XdaoError::parse(malformed_rule, format!("value is empty for key {key:?}")));
    }
    if !key.is_ascii() {
        return Err(XdaoError::parse(malformed_rule, format!("key {key:?} is not ASCII")));
    }
    Ok((key, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULES: DisciplineRuleIds = DisciplineRuleIds {
        not_utf8: "TEST-STR-001",
        has_cr: "TEST-CANON-001",
        has_bom: "TEST-CANON-002",
        trailing_line_ws: "TEST-STR-030",
    };

    #[test]
    fn rejects_cr() {
        let err = check_discipline(b"a\r\nb", &RULES).unwrap_err();
        assert_eq!(err.rule_id(), "TEST-CANON-001");
    }

    #[test]
    fn rejects_bom() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"hello");
        let err = check_discipline(&bytes, &RULES).unwrap_err();
        assert_eq!(err.rule_id(), "TEST-CANON-002");
    }

    #[test]
    fn rejects_trailing_space() {
        let err = check_discipline(b"a \nb", &RULES).unwrap_err();
        assert_eq!(err.rule_id(), "TEST-STR-030");
    }

    #[test]
    fn rejects_trailing_tab() {
        let err = check_discipline(b"a\t\nb", &RULES).unwrap_err();
        assert_eq!(err.rule_id(), "TEST-STR-030");
    }

    #[test]
    fn accepts_clean_text() {
        assert!(check_discipline(b"a\nb\nc", &RULES).is_ok());
    }

    #[test]
    fn split_key_value_happy_path() {
        let (k, v) = split_key_value("Spec: xdao-tpdl-1", "TEST-PARSE-001").unwrap();
        assert_eq!(k, "Spec");
        assert_eq!(v, "xdao-tpdl-1");
    }

    #[test]
    fn split_key_value_rejects_double_space() {
        assert!(split_key_value("Spec:  xdao-tpdl-1", "TEST-PARSE-001").is_err());
    }

    #[test]
    fn split_key_value_rejects_missing_colon() {
        assert!(split_key_value("Spec xdao-tpdl-1", "TEST-PARSE-001").is_err());
    }

    #[test]
    fn split_key_value_rejects_empty_value() {
        assert!(split_key_value("Spec: ", "TEST-PARSE-001").is_err());
    }
}
