//! TPDL parsing, permissive and strict.

use std::collections::BTreeSet;

use xdao_core::error::XdaoError;
use xdao_core::linetext;

use crate::policy::{RequireRule, TpdlPolicy, TrustEntry};
use crate::rules;

const PREAMBLE: &str = "-----BEGIN XDAO POLICY-----";
const POSTAMBLE: &str = "-----END XDAO POLICY-----";
const BLOCK_INDENT: &str = "  ";

/// Compliance mode for [`parse`].
///
/// Permissive defaults a `Require` block's missing `Quorum` to 1. Strict
/// applies one additional pre-check: every `Require:` block must spell
/// out `Quorum` explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplianceMode {
    Permissive,
    Strict,
}

/// Parse and validate a TPDL policy document.
pub fn parse(bytes: &[u8], mode: ComplianceMode) -> Result<TpdlPolicy, XdaoError> {
    let s = linetext::check_utf8(bytes, rules::NOT_UTF8)?;
    linetext::check_no_cr(s, rules::HAS_CR)?;
    linetext::check_no_bom(bytes, rules::HAS_BOM)?;
    linetext::check_no_trailing_newline(bytes, rules::TRAILING_NEWLINE)?;

    let lines: Vec<&str> = s.split('\n').collect();
    if lines.len() < 2 || lines[0] != PREAMBLE || lines[lines.len() - 1] != POSTAMBLE {
        return Err(XdaoError::canonical(
            rules::BAD_PREAMBLE_POSTAMBLE,
            "policy must begin with the BEGIN marker and end with the END marker, each alone on its own line",
        ));
    }

    linetext::check_no_trailing_line_ws(s, rules::TRAILING_LINE_WS)?;

    let body = &lines[1..lines.len() - 1];
    let groups = linetext::split_on_blank_lines(body, rules::BAD_SECTION_STRUCTURE)?;
    if groups.len() != 3 {
        return Err(XdaoError::parse(
            rules::BAD_SECTION_STRUCTURE,
            format!("expected 3 sections (META, TRUST, RULES), found {}", groups.len()),
        ));
    }

    let meta_group = strip_header(&groups[0], "META")?;
    let trust_group = strip_header(&groups[1], "TRUST")?;
    let rules_group = strip_header(&groups[2], "RULES")?;

    parse_meta(meta_group)?;
    let trust = parse_trust(trust_group)?;
    let (rules_list, allow_list) = parse_rules(rules_group, mode)?;

    Ok(TpdlPolicy { trust, rules: rules_list, supersession_allow_list: allow_list })
}

fn strip_header<'a>(group: &'a [&'a str], expected: &str) -> Result<&'a [&'a str], XdaoError> {
    let (header, rest) = group.split_first().ok_or_else(|| {
        XdaoError::parse(rules::BAD_SECTION_STRUCTURE, format!("empty {expected} section"))
    })?;
    if *header != expected {
        return Err(XdaoError::parse(
            rules::BAD_SECTION_STRUCTURE,
            format!("expected section header {expected:?}, found {header:?}"),
        ));
    }
    Ok(rest)
}

fn parse_meta(lines: &[&str]) -> Result<(), XdaoError> {
    let mut spec = None;
    let mut version = None;
    let mut last_key: Option<String> = None;
    for &line in lines {
        let (key, value) = linetext::split_key_value(line, rules::BAD_KEY_VALUE_LINE)?;
        if let Some(ref prev) = last_key {
            if key <= prev.as_str() {
                return Err(XdaoError::canonical(
                    rules::BAD_META,
                    format!("META key {key:?} is not strictly greater than preceding key {prev:?}"),
                ));
            }
        }
        last_key = Some(key.to_string());
        match key {
            "Spec" => spec = Some(value),
            "Version" => version = Some(value),
            other => return Err(XdaoError::parse(rules::BAD_META, format!("unknown META key {other:?}"))),
        }
    }
    if spec != Some("xdao-tpdl-1") {
        return Err(XdaoError::validation(rules::BAD_META, "META.Spec must equal \"xdao-tpdl-1\""));
    }
    if version != Some("1") {
        return Err(XdaoError::validation(rules::BAD_META, "META.Version must equal \"1\""));
    }
    Ok(())
}

fn parse_trust(lines: &[&str]) -> Result<Vec<TrustEntry>, XdaoError> {
    if lines.len() % 2 != 0 {
        return Err(XdaoError::parse(
            rules::BAD_TRUST_ENTRY,
            "TRUST section must contain an even number of lines (Key/Role pairs)",
        ));
    }
    let mut entries = Vec::with_capacity(lines.len() / 2);
    for pair in lines.chunks_exact(2) {
        let (key_field, key_value) = linetext::split_key_value(pair[0], rules::BAD_TRUST_ENTRY)?;
        let (role_field, role_value) = linetext::split_key_value(pair[1], rules::BAD_TRUST_ENTRY)?;
        if key_field != "Key" || role_field != "Role" {
            return Err(XdaoError::parse(
                rules::BAD_TRUST_ENTRY,
                format!("expected a Key/Role pair, found {key_field:?}/{role_field:?}"),
            ));
        }
        entries.push(TrustEntry { issuer_key: key_value.to_string(), role: role_value.to_string() });
    }
    Ok(entries)
}

fn parse_rules(
    lines: &[&str],
    mode: ComplianceMode,
) -> Result<(Vec<RequireRule>, Vec<String>), XdaoError> {
    let mut rules_out = Vec::new();
    let mut allow_list: BTreeSet<String> = BTreeSet::new();
    let mut seen_supersedes = false;

    let mut i = 0;
    while i < lines.len() {
        let header = lines[i];
        i += 1;
        let mut block = Vec::new();
        while i < lines.len() && lines[i].starts_with(BLOCK_INDENT) {
            block.push(&lines[i][BLOCK_INDENT.len()..]);
            i += 1;
        }
        match header {
            "Require:" => rules_out.push(parse_require_block(&block, mode)?),
            "Supersedes:" => {
                if seen_supersedes {
                    return Err(XdaoError::parse(rules::BAD_RULE_BLOCK, "at most one Supersedes: block is allowed"));
                }
                seen_supersedes = true;
                allow_list.extend(parse_supersedes_block(&block)?);
            }
            other => {
                return Err(XdaoError::parse(
                    rules::BAD_RULE_BLOCK,
                    format!("expected a \"Require:\" or \"Supersedes:\" block header, found {other:?}"),
                ))
            }
        }
    }

    Ok((rules_out, allow_list.into_iter().collect()))
}

fn parse_require_block(lines: &[&str], mode: ComplianceMode) -> Result<RequireRule, XdaoError> {
    let mut claim_type = None;
    let mut role = None;
    let mut quorum = None;
    for &line in lines {
        let (key, value) = linetext::split_key_value(line, rules::BAD_RULE_BLOCK)?;
        match key {
            "Type" => claim_type = Some(value.to_string()),
            "Role" => role = Some(value.to_string()),
            "Quorum" => {
                let parsed: u32 = value.parse().map_err(|_| {
                    XdaoError::validation(rules::INVALID_QUORUM, format!("Quorum {value:?} is not a positive integer"))
                })?;
                if parsed < 1 {
                    return Err(XdaoError::validation(rules::INVALID_QUORUM, "Quorum must be >= 1"));
                }
                quorum = Some(parsed);
            }
            other => {
                return Err(XdaoError::parse(
                    rules::UNKNOWN_BLOCK_KEY,
                    format!("unknown key {other:?} in Require: block"),
                ))
            }
        }
    }
    let claim_type = claim_type
        .ok_or_else(|| XdaoError::validation(rules::BAD_RULE_BLOCK, "Require: block is missing Type"))?;
    let role = role.ok_or_else(|| XdaoError::validation(rules::BAD_RULE_BLOCK, "Require: block is missing Role"))?;

    let quorum = match (quorum, mode) {
        (Some(q), _) => q,
        (None, ComplianceMode::Permissive) => 1,
        (None, ComplianceMode::Strict) => {
            tracing::warn!(
                rule_id = rules::MISSING_EXPLICIT_QUORUM,
                claim_type = %claim_type,
                role = %role,
                "TPDL policy rejected in strict mode: Require: block omits Quorum"
            );
            return Err(XdaoError::validation(
                rules::MISSING_EXPLICIT_QUORUM,
                "strict mode requires every Require: block to spell out Quorum explicitly",
            ))
        }
    };

    Ok(RequireRule { claim_type, role, quorum })
}

fn parse_supersedes_block(lines: &[&str]) -> Result<Vec<String>, XdaoError> {
    let mut allowed_by = None;
    for &line in lines {
        let (key, value) = linetext::split_key_value(line, rules::BAD_RULE_BLOCK)?;
        match key {
            "Allowed-By" => allowed_by = Some(value),
            other => {
                return Err(XdaoError::parse(
                    rules::UNKNOWN_BLOCK_KEY,
                    format!("unknown key {other:?} in Supersedes: block"),
                ))
            }
        }
    }
    let allowed_by = allowed_by
        .ok_or_else(|| XdaoError::validation(rules::BAD_RULE_BLOCK, "Supersedes: block is missing Allowed-By"))?;
    Ok(allowed_by.split(',').map(|r| r.trim().to_string()).filter(|r| !r.is_empty()).collect())
}
