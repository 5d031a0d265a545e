//! Deterministic byte rendering of a [`CrofDocument`].

use crate::canonicalize::{PREAMBLE, POSTAMBLE};
use crate::document::CrofDocument;

/// Render `doc`'s fields to their canonical CROF bytes.
///
/// Unlike [`xdao_catf::render`], the result ends with exactly one
/// trailing newline.
pub fn render(doc: &CrofDocument) -> Vec<u8> {
    let mut lines: Vec<String> = Vec::new();
    lines.push(PREAMBLE.to_string());

    lines.push("META".to_string());
    if let Some(v) = &doc.meta.resolved_at {
        lines.push(format!("Resolved-At: {v}"));
    }
    lines.push(format!("Resolver-ID: {}", doc.meta.resolver_id));
    lines.push("Spec: xdao-crof-1".to_string());
    if let Some(v) = &doc.meta.supersedes_crof_cid {
        lines.push(format!("Supersedes-CROF-CID: {v}"));
    }
    lines.push("Version: 1".to_string());
    lines.push(String::new());

    lines.push("INPUTS".to_string());
    lines.push(format!("Trust-Policy-CID: {}", doc.inputs.trust_policy_cid));
    for cid in &doc.inputs.attestation_cids {
        lines.push(format!("Attestation-CID: {cid}"));
    }
    for hash in &doc.inputs.input_hashes {
        lines.push(format!("Input-Hash: {hash}"));
    }
    lines.push(String::new());

    lines.push("RESULT".to_string());
    let mut result_lines = vec![
        format!("Subject-CID: {}", doc.result.subject_cid),
        format!("Confidence: {}", doc.result.confidence),
        format!("State: {}", doc.result.state),
    ];
    for pv in &doc.result.policy_verdicts {
        result_lines.push(format!(
            "Policy-Verdict: type={}; role={}; quorum={}; observed={}; satisfied={}",
            pv.claim_type, pv.role, pv.quorum, pv.observed, pv.satisfied
        ));
    }
    for v in &doc.result.policy_issuer_keys {
        result_lines.push(format!("Policy-Issuer-Key: {v}"));
    }
    for v in &doc.result.policy_verdict_reasons {
        result_lines.push(format!("Policy-Verdict-Reason: {v}"));
    }
    result_lines.sort();
    lines.extend(result_lines);
    lines.push(String::new());

    lines.push("PATHS".to_string());
    for (i, path) in doc.paths.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.push(format!("Path-ID: {}", path.path_id));
        for cid in &path.attestation_cids {
            lines.push(format!("Attestation-CID: {cid}"));
        }
    }
    lines.push(String::new());

    lines.push("FORKS".to_string());
    for (i, fork) in doc.forks.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.push(format!("Fork-ID: {}", fork.fork_id));
        for p in &fork.conflicting_paths {
            lines.push(format!("Conflicting-Path: {p}"));
        }
    }
    lines.push(String::new());

    lines.push("EXCLUSIONS".to_string());
    for (i, exclusion) in doc.exclusions.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        if let Some(v) = &exclusion.attestation_cid {
            lines.push(format!("Attestation-CID: {v}"));
        }
        if let Some(v) = &exclusion.input_hash {
            lines.push(format!("Input-Hash: {v}"));
        }
        lines.push(format!("Reason: {}", exclusion.reason));
    }
    lines.push(String::new());

    lines.push("VERDICTS".to_string());
    for (i, verdict) in doc.verdicts.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        render_verdict(&mut lines, verdict);
    }
    lines.push(String::new());

    lines.push("CRYPTO".to_string());
    for (k, v) in &doc.crypto {
        lines.push(format!("{k}: {v}"));
    }

    lines.push(POSTAMBLE.to_string());

    let mut out = lines.join("\n").into_bytes();
    out.push(b'\n');
    out
}

fn render_verdict(lines: &mut Vec<String>, verdict: &crate::document::VerdictRecord) {
    if let Some(v) = &verdict.attestation_cid {
        lines.push(format!("Attestation-CID: {v}"));
    }
    if let Some(v) = &verdict.input_hash {
        lines.push(format!("Input-Hash: {v}"));
    }
    if let Some(v) = &verdict.attested_subject_cid {
        lines.push(format!("Attested-Subject-CID: {v}"));
    }
    if let Some(v) = &verdict.issuer_key {
        lines.push(format!("Issuer-Key: {v}"));
    }
    if let Some(v) = &verdict.claim_type {
        lines.push(format!("Claim-Type: {v}"));
    }
    if let Some(v) = &verdict.status {
        lines.push(format!("Status: {v}"));
    }
    lines.push(format!("Trusted: {}", verdict.trusted));
    lines.push(format!("Revoked: {}", verdict.revoked));
    for v in &verdict.revoked_by {
        lines.push(format!("Revoked-By: {v}"));
    }
    for v in &verdict.trust_roles {
        lines.push(format!("Trust-Role: {v}"));
    }
    for v in &verdict.reasons {
        lines.push(format!("Reason: {v}"));
    }
    if let Some(v) = &verdict.excluded_reason {
        lines.push(format!("Excluded-Reason: {v}"));
    }
}
