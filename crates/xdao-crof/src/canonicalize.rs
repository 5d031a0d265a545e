//! Byte-level canonicalization and structural parsing of CROF documents.

use std::collections::BTreeMap;

use xdao_core::error::XdaoError;
use xdao_core::linetext;

use crate::document::{
    CrofDocument, ExclusionRecord, ForkRecord, InputsSection, MetaSection, PathRecord, ResultPolicyVerdict,
    ResultSection, VerdictRecord,
};
use crate::render::render;
use crate::rules;

pub(crate) const PREAMBLE: &str = "-----BEGIN XDAO RESOLUTION-----";
pub(crate) const POSTAMBLE: &str = "-----END XDAO RESOLUTION-----";
pub(crate) const SECTIONS: [&str; 8] =
    ["META", "INPUTS", "RESULT", "PATHS", "FORKS", "EXCLUSIONS", "VERDICTS", "CRYPTO"];

/// Parse and validate a candidate CROF document.
///
/// Unlike CATF, CROF must end with exactly one trailing newline — the
/// discipline check is the same family otherwise (UTF-8, no CR, no BOM,
/// no trailing line whitespace), then the eight-section structural
/// grammar, then a byte-identity re-render check.
pub fn parse(bytes: &[u8]) -> Result<CrofDocument, XdaoError> {
    let s = linetext::check_utf8(bytes, rules::NOT_UTF8)?;
    linetext::check_no_cr(s, rules::HAS_CR)?;
    linetext::check_no_bom(bytes, rules::HAS_BOM)?;
    linetext::require_single_trailing_newline(bytes, rules::MISSING_TRAILING_NEWLINE)?;
    linetext::check_no_trailing_line_ws(s, rules::TRAILING_LINE_WS)?;

    let without_final_newline = &s[..s.len() - 1];
    let lines: Vec<&str> = without_final_newline.split('\n').collect();
    if lines.len() < 2 || lines[0] != PREAMBLE || lines[lines.len() - 1] != POSTAMBLE {
        return Err(XdaoError::canonical(
            rules::BAD_PREAMBLE_POSTAMBLE,
            "document must begin with the BEGIN marker and end with the END marker, each alone on its own line",
        ));
    }

    let body = &lines[1..lines.len() - 1];
    let sections = split_named_sections(body)?;

    let meta = parse_meta(sections[0])?;
    let inputs = parse_inputs(sections[1])?;
    let result = parse_result(sections[2])?;
    let paths = parse_paths(sections[3])?;
    let forks = parse_forks(sections[4])?;
    let exclusions = parse_exclusions(sections[5])?;
    let verdicts = parse_verdicts(sections[6])?;
    let crypto = parse_crypto(sections[7])?;

    let candidate = CrofDocument {
        meta,
        inputs,
        result,
        paths,
        forks,
        exclusions,
        verdicts,
        crypto,
        canonical: Vec::new(),
    };
    let rendered = render(&candidate);
    if rendered != bytes {
        tracing::warn!(rule_id = rules::NON_CANONICAL_BYTE_IDENTITY, "CROF input rejected: not its own canonical rendering");
        return Err(XdaoError::canonical(
            rules::NON_CANONICAL_BYTE_IDENTITY,
            "input is not the canonical rendering of its own fields",
        ));
    }

    Ok(CrofDocument { canonical: rendered, ..candidate })
}

/// Canonicalize a candidate document, returning its canonical bytes.
pub fn canonicalize(bytes: &[u8]) -> Result<Vec<u8>, XdaoError> {
    parse(bytes).map(|doc| doc.canonical)
}

/// Split `body` into the eight fixed sections by scanning for each
/// section's header line in order, rather than counting blank-line
/// groups — `PATHS`/`FORKS`/`EXCLUSIONS`/`VERDICTS` contain their own
/// blank-line-separated records, so a flat blank-group count would not
/// agree with the number of top-level sections.
fn split_named_sections<'a>(body: &'a [&'a str]) -> Result<[&'a [&'a str]; 8], XdaoError> {
    let mut out: Vec<&[&str]> = Vec::with_capacity(SECTIONS.len());
    let mut pos = 0usize;
    for (i, name) in SECTIONS.iter().enumerate() {
        if pos >= body.len() || body[pos] != *name {
            return Err(XdaoError::parse(
                rules::BAD_SECTION_STRUCTURE,
                format!("expected section header {name:?} at position {pos}"),
            ));
        }
        pos += 1;
        let start = pos;
        if i == SECTIONS.len() - 1 {
            out.push(&body[start..]);
            pos = body.len();
            continue;
        }
        let next_name = SECTIONS[i + 1];
        let mut end = start;
        let mut found = false;
        while end < body.len() {
            if body[end].is_empty() && end + 1 < body.len() && body[end + 1] == next_name {
                found = true;
                break;
            }
            end += 1;
        }
        if !found {
            return Err(XdaoError::parse(
                rules::BAD_SECTION_STRUCTURE,
                format!("could not find the blank line separating {name:?} from {next_name:?}"),
            ));
        }
        out.push(&body[start..end]);
        pos = end + 1;
    }
    out.try_into()
        .map_err(|_| XdaoError::internal(rules::BAD_SECTION_STRUCTURE, "section count mismatch after scan"))
}

fn parse_fields(lines: &[&str], rule_id: &'static str) -> Result<BTreeMap<String, String>, XdaoError> {
    let mut fields = BTreeMap::new();
    let mut last_key: Option<String> = None;
    for &line in lines {
        let (key, value) = linetext::split_key_value(line, rules::BAD_KEY_VALUE_LINE)?;
        if let Some(ref prev) = last_key {
            if key <= prev.as_str() {
                return Err(XdaoError::canonical(
                    rule_id,
                    format!("key {key:?} is not strictly greater than preceding key {prev:?}"),
                ));
            }
        }
        last_key = Some(key.to_string());
        fields.insert(key.to_string(), value.to_string());
    }
    Ok(fields)
}

fn parse_meta(lines: &[&str]) -> Result<MetaSection, XdaoError> {
    let fields = parse_fields(lines, rules::UNSORTED_OR_DUPLICATE_KEYS)?;
    let mut known: BTreeMap<&str, &str> = BTreeMap::new();
    for (k, v) in &fields {
        match k.as_str() {
            "Resolver-ID" | "Resolved-At" | "Spec" | "Supersedes-CROF-CID" | "Version" => {
                known.insert(k.as_str(), v.as_str());
            }
            other => {
                return Err(XdaoError::parse(rules::MISSING_REQUIRED_FIELD, format!("unknown META key {other:?}")))
            }
        }
    }
    let resolver_id = known
        .get("Resolver-ID")
        .ok_or_else(|| XdaoError::validation(rules::MISSING_REQUIRED_FIELD, "META.Resolver-ID is required"))?
        .to_string();
    if known.get("Spec").copied() != Some("xdao-crof-1") {
        return Err(XdaoError::validation(rules::MISSING_REQUIRED_FIELD, "META.Spec must equal \"xdao-crof-1\""));
    }
    if known.get("Version").copied() != Some("1") {
        return Err(XdaoError::validation(rules::MISSING_REQUIRED_FIELD, "META.Version must equal \"1\""));
    }
    let resolved_at = known
        .get("Resolved-At")
        .map(|s| xdao_core::Timestamp::parse(rules::INVALID_TIMESTAMP, s))
        .transpose()?
        .map(|ts| ts.to_rfc3339());

    Ok(MetaSection {
        resolver_id,
        resolved_at,
        supersedes_crof_cid: known.get("Supersedes-CROF-CID").map(|s| s.to_string()),
    })
}

fn parse_inputs(lines: &[&str]) -> Result<InputsSection, XdaoError> {
    let (first, rest) = lines
        .split_first()
        .ok_or_else(|| XdaoError::validation(rules::MISSING_REQUIRED_FIELD, "INPUTS must have a Trust-Policy-CID line"))?;
    let (key, value) = linetext::split_key_value(first, rules::BAD_KEY_VALUE_LINE)?;
    if key != "Trust-Policy-CID" {
        return Err(XdaoError::validation(
            rules::BAD_INPUTS_ORDERING,
            "INPUTS must begin with Trust-Policy-CID",
        ));
    }
    let trust_policy_cid = value.to_string();

    let mut attestation_cids = Vec::new();
    let mut input_hashes = Vec::new();
    let mut seen_hash_run = false;
    for &line in rest {
        let (key, value) = linetext::split_key_value(line, rules::BAD_KEY_VALUE_LINE)?;
        match key {
            "Attestation-CID" if !seen_hash_run => attestation_cids.push(value.to_string()),
            "Input-Hash" => {
                seen_hash_run = true;
                input_hashes.push(value.to_string());
            }
            _ => {
                return Err(XdaoError::canonical(
                    rules::BAD_INPUTS_ORDERING,
                    "INPUTS must list Attestation-CID lines (sorted) then Input-Hash lines (sorted), no interleaving",
                ))
            }
        }
    }
    require_sorted(&attestation_cids, rules::BAD_SORT_ORDER, "INPUTS.Attestation-CID")?;
    require_sorted(&input_hashes, rules::BAD_SORT_ORDER, "INPUTS.Input-Hash")?;
    Ok(InputsSection { trust_policy_cid, attestation_cids, input_hashes })
}

fn parse_result(lines: &[&str]) -> Result<ResultSection, XdaoError> {
    let mut subject_cid = None;
    let mut confidence = None;
    let mut state = None;
    let mut policy_verdicts = Vec::new();
    let mut policy_issuer_keys = Vec::new();
    let mut policy_verdict_reasons = Vec::new();
    let mut last_line: Option<&str> = None;

    for &line in lines {
        if let Some(prev) = last_line {
            if line <= prev {
                return Err(XdaoError::canonical(
                    rules::BAD_SORT_ORDER,
                    "RESULT lines must be strictly ascending",
                ));
            }
        }
        last_line = Some(line);

        let (key, value) = linetext::split_key_value(line, rules::BAD_KEY_VALUE_LINE)?;
        match key {
            "Subject-CID" => set_once(&mut subject_cid, value, "RESULT.Subject-CID")?,
            "Confidence" => set_once(&mut confidence, value, "RESULT.Confidence")?,
            "State" => set_once(&mut state, value, "RESULT.State")?,
            "Policy-Verdict" => policy_verdicts.push(parse_policy_verdict(value)?),
            "Policy-Issuer-Key" => policy_issuer_keys.push(value.to_string()),
            "Policy-Verdict-Reason" => policy_verdict_reasons.push(value.to_string()),
            other => {
                return Err(XdaoError::parse(rules::MISSING_REQUIRED_FIELD, format!("unknown RESULT key {other:?}")))
            }
        }
    }

    Ok(ResultSection {
        subject_cid: subject_cid
            .ok_or_else(|| XdaoError::validation(rules::MISSING_REQUIRED_FIELD, "RESULT.Subject-CID is required"))?,
        confidence: confidence
            .ok_or_else(|| XdaoError::validation(rules::MISSING_REQUIRED_FIELD, "RESULT.Confidence is required"))?,
        state: state.ok_or_else(|| XdaoError::validation(rules::MISSING_REQUIRED_FIELD, "RESULT.State is required"))?,
        policy_verdicts,
        policy_issuer_keys,
        policy_verdict_reasons,
    })
}

fn set_once(slot: &mut Option<String>, value: &str, field: &str) -> Result<(), XdaoError> {
    if slot.is_some() {
        return Err(XdaoError::canonical(rules::UNSORTED_OR_DUPLICATE_KEYS, format!("{field} appears more than once")));
    }
    *slot = Some(value.to_string());
    Ok(())
}

fn parse_policy_verdict(value: &str) -> Result<ResultPolicyVerdict, XdaoError> {
    let fields = parse_composite(value)?;
    let claim_type = composite_field(&fields, "type")?;
    let role = composite_field(&fields, "role")?;
    let quorum = composite_field(&fields, "quorum")?
        .parse::<u32>()
        .map_err(|_| XdaoError::parse(rules::BAD_KEY_VALUE_LINE, "Policy-Verdict quorum is not an integer"))?;
    let observed = composite_field(&fields, "observed")?
        .parse::<u32>()
        .map_err(|_| XdaoError::parse(rules::BAD_KEY_VALUE_LINE, "Policy-Verdict observed is not an integer"))?;
    let satisfied = match composite_field(&fields, "satisfied")?.as_str() {
        "true" => true,
        "false" => false,
        _ => return Err(XdaoError::parse(rules::BAD_KEY_VALUE_LINE, "Policy-Verdict satisfied must be true or false")),
    };
    Ok(ResultPolicyVerdict { claim_type, role, quorum, observed, satisfied })
}

/// Parse a `"k1=v1; k2=v2; …"` composite value into an ordered map.
fn parse_composite(value: &str) -> Result<BTreeMap<String, String>, XdaoError> {
    let mut out = BTreeMap::new();
    for part in value.split("; ") {
        let (k, v) = part
            .split_once('=')
            .ok_or_else(|| XdaoError::parse(rules::BAD_KEY_VALUE_LINE, format!("malformed composite field {part:?}")))?;
        out.insert(k.to_string(), v.to_string());
    }
    Ok(out)
}

fn composite_field(fields: &BTreeMap<String, String>, key: &str) -> Result<String, XdaoError> {
    fields
        .get(key)
        .cloned()
        .ok_or_else(|| XdaoError::validation(rules::MISSING_REQUIRED_FIELD, format!("composite field missing {key:?}")))
}

fn parse_paths(lines: &[&str]) -> Result<Vec<PathRecord>, XdaoError> {
    if lines.is_empty() {
        return Ok(Vec::new());
    }
    let groups = linetext::split_on_blank_lines(lines, rules::BAD_SECTION_STRUCTURE)?;
    let mut out = Vec::with_capacity(groups.len());
    for group in &groups {
        let (header, rest) = group.split_first().expect("non-empty group");
        let (key, path_id) = linetext::split_key_value(header, rules::BAD_KEY_VALUE_LINE)?;
        if key != "Path-ID" {
            return Err(XdaoError::parse(rules::BAD_SECTION_STRUCTURE, "PATHS record must start with Path-ID"));
        }
        let mut attestation_cids = Vec::with_capacity(rest.len());
        for &line in rest {
            let (key, value) = linetext::split_key_value(line, rules::BAD_KEY_VALUE_LINE)?;
            if key != "Attestation-CID" {
                return Err(XdaoError::parse(
                    rules::BAD_SECTION_STRUCTURE,
                    "PATHS record body must be Attestation-CID lines",
                ));
            }
            attestation_cids.push(value.to_string());
        }
        if attestation_cids.is_empty() {
            return Err(XdaoError::validation(rules::INCOMPLETE_RECORD, "a PATHS record needs at least one Attestation-CID"));
        }
        out.push(PathRecord { path_id: path_id.to_string(), attestation_cids });
    }
    require_sorted(&out.iter().map(|p| p.path_id.clone()).collect::<Vec<_>>(), rules::BAD_SORT_ORDER, "PATHS.Path-ID")?;
    Ok(out)
}

fn parse_forks(lines: &[&str]) -> Result<Vec<ForkRecord>, XdaoError> {
    if lines.is_empty() {
        return Ok(Vec::new());
    }
    let groups = linetext::split_on_blank_lines(lines, rules::BAD_SECTION_STRUCTURE)?;
    let mut out = Vec::with_capacity(groups.len());
    for group in &groups {
        let (header, rest) = group.split_first().expect("non-empty group");
        let (key, fork_id) = linetext::split_key_value(header, rules::BAD_KEY_VALUE_LINE)?;
        if key != "Fork-ID" {
            return Err(XdaoError::parse(rules::BAD_SECTION_STRUCTURE, "FORKS record must start with Fork-ID"));
        }
        let mut conflicting_paths = Vec::with_capacity(rest.len());
        for &line in rest {
            let (key, value) = linetext::split_key_value(line, rules::BAD_KEY_VALUE_LINE)?;
            if key != "Conflicting-Path" {
                return Err(XdaoError::parse(
                    rules::BAD_SECTION_STRUCTURE,
                    "FORKS record body must be Conflicting-Path lines",
                ));
            }
            conflicting_paths.push(value.to_string());
        }
        if conflicting_paths.len() < 2 {
            return Err(XdaoError::validation(rules::INCOMPLETE_RECORD, "a FORKS record needs at least two Conflicting-Path entries"));
        }
        require_sorted(&conflicting_paths, rules::BAD_SORT_ORDER, "FORKS.Conflicting-Path")?;
        out.push(ForkRecord { fork_id: fork_id.to_string(), conflicting_paths });
    }
    require_sorted(&out.iter().map(|f| f.fork_id.clone()).collect::<Vec<_>>(), rules::BAD_SORT_ORDER, "FORKS.Fork-ID")?;
    Ok(out)
}

fn parse_exclusions(lines: &[&str]) -> Result<Vec<ExclusionRecord>, XdaoError> {
    if lines.is_empty() {
        return Ok(Vec::new());
    }
    let groups = linetext::split_on_blank_lines(lines, rules::BAD_SECTION_STRUCTURE)?;
    let mut out = Vec::with_capacity(groups.len());
    for group in &groups {
        let mut attestation_cid = None;
        let mut input_hash = None;
        let mut reason = None;
        for &line in group {
            let (key, value) = linetext::split_key_value(line, rules::BAD_KEY_VALUE_LINE)?;
            match key {
                "Attestation-CID" => set_once(&mut attestation_cid, value, "EXCLUSIONS.Attestation-CID")?,
                "Input-Hash" => set_once(&mut input_hash, value, "EXCLUSIONS.Input-Hash")?,
                "Reason" => set_once(&mut reason, value, "EXCLUSIONS.Reason")?,
                other => {
                    return Err(XdaoError::parse(rules::MISSING_REQUIRED_FIELD, format!("unknown EXCLUSIONS key {other:?}")))
                }
            }
        }
        let reason =
            reason.ok_or_else(|| XdaoError::validation(rules::MISSING_REQUIRED_FIELD, "EXCLUSIONS.Reason is required"))?;
        if attestation_cid.is_none() && input_hash.is_none() {
            return Err(XdaoError::validation(
                rules::MISSING_REQUIRED_FIELD,
                "an EXCLUSIONS record needs an Attestation-CID or an Input-Hash",
            ));
        }
        out.push(ExclusionRecord { attestation_cid, input_hash, reason });
    }
    for pair in out.windows(2) {
        if pair[0].sort_key() >= pair[1].sort_key() {
            return Err(XdaoError::canonical(rules::BAD_SORT_ORDER, "EXCLUSIONS records are not strictly ascending"));
        }
    }
    Ok(out)
}

fn parse_verdicts(lines: &[&str]) -> Result<Vec<VerdictRecord>, XdaoError> {
    if lines.is_empty() {
        return Ok(Vec::new());
    }
    let groups = linetext::split_on_blank_lines(lines, rules::BAD_SECTION_STRUCTURE)?;
    let mut out = Vec::with_capacity(groups.len());
    for group in &groups {
        out.push(parse_verdict_record(group)?);
    }
    for pair in out.windows(2) {
        if pair[0].sort_key() >= pair[1].sort_key() {
            return Err(XdaoError::canonical(rules::BAD_SORT_ORDER, "VERDICTS records are not strictly ascending"));
        }
    }
    Ok(out)
}

fn parse_verdict_record(lines: &[&str]) -> Result<VerdictRecord, XdaoError> {
    let mut record = VerdictRecord::default();
    let mut trusted_seen = false;
    let mut revoked_seen = false;
    for &line in lines {
        let (key, value) = linetext::split_key_value(line, rules::BAD_KEY_VALUE_LINE)?;
        match key {
            "Attestation-CID" => set_once(&mut record.attestation_cid, value, "VERDICTS.Attestation-CID")?,
            "Input-Hash" => set_once(&mut record.input_hash, value, "VERDICTS.Input-Hash")?,
            "Attested-Subject-CID" => {
                set_once(&mut record.attested_subject_cid, value, "VERDICTS.Attested-Subject-CID")?
            }
            "Issuer-Key" => set_once(&mut record.issuer_key, value, "VERDICTS.Issuer-Key")?,
            "Claim-Type" => set_once(&mut record.claim_type, value, "VERDICTS.Claim-Type")?,
            "Status" => set_once(&mut record.status, value, "VERDICTS.Status")?,
            "Trusted" => {
                record.trusted = parse_bool(value)?;
                trusted_seen = true;
            }
            "Revoked" => {
                record.revoked = parse_bool(value)?;
                revoked_seen = true;
            }
            "Revoked-By" => record.revoked_by.push(value.to_string()),
            "Trust-Role" => record.trust_roles.push(value.to_string()),
            "Reason" => record.reasons.push(value.to_string()),
            "Excluded-Reason" => set_once(&mut record.excluded_reason, value, "VERDICTS.Excluded-Reason")?,
            other => {
                return Err(XdaoError::parse(rules::MISSING_REQUIRED_FIELD, format!("unknown VERDICTS key {other:?}")))
            }
        }
    }
    if record.attestation_cid.is_none() && record.input_hash.is_none() {
        return Err(XdaoError::validation(
            rules::MISSING_REQUIRED_FIELD,
            "a VERDICTS record needs an Attestation-CID or an Input-Hash",
        ));
    }
    if !trusted_seen || !revoked_seen {
        return Err(XdaoError::validation(rules::MISSING_REQUIRED_FIELD, "a VERDICTS record needs Trusted and Revoked"));
    }
    require_sorted(&record.revoked_by, rules::BAD_SORT_ORDER, "VERDICTS.Revoked-By")?;
    require_sorted(&record.trust_roles, rules::BAD_SORT_ORDER, "VERDICTS.Trust-Role")?;
    require_sorted(&record.reasons, rules::BAD_SORT_ORDER, "VERDICTS.Reason")?;
    Ok(record)
}

fn parse_bool(value: &str) -> Result<bool, XdaoError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(XdaoError::parse(rules::BAD_KEY_VALUE_LINE, "expected true or false")),
    }
}

fn parse_crypto(lines: &[&str]) -> Result<BTreeMap<String, String>, XdaoError> {
    let fields = parse_fields(lines, rules::UNSORTED_OR_DUPLICATE_KEYS)?;
    if fields.is_empty() {
        return Ok(fields);
    }
    for required in ["Hash-Alg", "Resolver-Key", "Signature-Alg", "Signature"] {
        if !fields.contains_key(required) {
            return Err(XdaoError::validation(
                rules::MISSING_REQUIRED_FIELD,
                format!("CRYPTO.{required} is required once any CRYPTO field is present"),
            ));
        }
    }
    Ok(fields)
}

fn require_sorted(values: &[String], rule_id: &'static str, context: &str) -> Result<(), XdaoError> {
    for pair in values.windows(2) {
        if pair[0] >= pair[1] {
            return Err(XdaoError::canonical(rule_id, format!("{context} entries must be strictly ascending")));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::build;
    use xdao_resolver::{Confidence, Resolution, State};

    fn base_resolution() -> Resolution {
        Resolution {
            subject: "urn:example:subject-1".to_string(),
            state: State::Resolved,
            confidence: Confidence::High,
            paths: Vec::new(),
            forks: Vec::new(),
            exclusions: Vec::new(),
            verdicts: Vec::new(),
            policy_verdicts: Vec::new(),
        }
    }

    #[test]
    fn resolved_at_round_trips_in_canonical_form() {
        let doc = build(&base_resolution(), "urn:policy:1", "resolver-a", Some("2026-01-15T12:00:00Z"), None);
        let bytes = doc.canonical_bytes().to_vec();
        let reparsed = parse(&bytes).unwrap();
        assert_eq!(reparsed.meta().resolved_at.as_deref(), Some("2026-01-15T12:00:00Z"));
    }

    #[test]
    fn resolved_at_with_non_canonical_offset_is_rejected() {
        let doc = build(&base_resolution(), "urn:policy:1", "resolver-a", Some("2026-01-15T12:00:00Z"), None);
        let text = std::str::from_utf8(doc.canonical_bytes()).unwrap();
        let mangled = text.replace("2026-01-15T12:00:00Z", "2026-01-15T14:00:00+02:00");
        let err = parse(mangled.as_bytes()).unwrap_err();
        assert_eq!(err.rule_id(), rules::NON_CANONICAL_BYTE_IDENTITY);
    }

    #[test]
    fn malformed_resolved_at_is_rejected() {
        let doc = build(&base_resolution(), "urn:policy:1", "resolver-a", Some("2026-01-15T12:00:00Z"), None);
        let text = std::str::from_utf8(doc.canonical_bytes()).unwrap();
        let mangled = text.replace("2026-01-15T12:00:00Z", "not-a-timestamp");
        let err = parse(mangled.as_bytes()).unwrap_err();
        assert_eq!(err.rule_id(), rules::INVALID_TIMESTAMP);
    }
}
