//! `ValidateSupersession(new, old)` — `spec.md` §4.6.

use xdao_core::error::XdaoError;

use crate::canonicalize::parse;
use crate::rules;

/// Check that `new_bytes` legitimately supersedes `old_bytes`: both must
/// canonicalize, `new`'s `META.Supersedes-CROF-CID` must equal `old`'s
/// CID, the two must agree on subject, resolver, and trust policy, and
/// the bytes must actually differ.
pub fn validate_supersession(new_bytes: &[u8], old_bytes: &[u8]) -> Result<(), XdaoError> {
    let new_doc = parse(new_bytes)?;
    let old_doc = parse(old_bytes)?;

    if new_bytes == old_bytes {
        return Err(XdaoError::validation(
            rules::SUPERSESSION_MISMATCH,
            "a CROF document cannot supersede byte-identical content",
        ));
    }

    let old_cid = old_doc.cid();
    if new_doc.meta().supersedes_crof_cid.as_deref() != Some(old_cid.as_str()) {
        return Err(XdaoError::validation(
            rules::SUPERSESSION_MISMATCH,
            "new.META.Supersedes-CROF-CID does not match cid(old)",
        ));
    }
    if new_doc.result().subject_cid != old_doc.result().subject_cid {
        return Err(XdaoError::validation(
            rules::SUPERSESSION_MISMATCH,
            "new.RESULT.Subject-CID does not match old.RESULT.Subject-CID",
        ));
    }
    if new_doc.meta().resolver_id != old_doc.meta().resolver_id {
        return Err(XdaoError::validation(
            rules::SUPERSESSION_MISMATCH,
            "new.META.Resolver-ID does not match old.META.Resolver-ID",
        ));
    }
    if new_doc.inputs().trust_policy_cid != old_doc.inputs().trust_policy_cid {
        return Err(XdaoError::validation(
            rules::SUPERSESSION_MISMATCH,
            "new.INPUTS.Trust-Policy-CID does not match old.INPUTS.Trust-Policy-CID",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::build;
    use xdao_resolver::{Confidence, Resolution, State};

    fn base_resolution(subject: &str) -> Resolution {
        Resolution {
            subject: subject.to_string(),
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
    fn valid_chain_passes() {
        let old = build(&base_resolution("urn:example:subject-1"), "urn:policy:1", "resolver-a", None, None);
        let old_cid = old.cid();
        let new = build(
            &base_resolution("urn:example:subject-1"),
            "urn:policy:1",
            "resolver-a",
            None,
            Some(old_cid.as_str()),
        );
        validate_supersession(new.canonical_bytes(), old.canonical_bytes()).unwrap();
    }

    #[test]
    fn mismatched_subject_rejected() {
        let old = build(&base_resolution("urn:example:subject-1"), "urn:policy:1", "resolver-a", None, None);
        let old_cid = old.cid();
        let new = build(
            &base_resolution("urn:example:subject-2"),
            "urn:policy:1",
            "resolver-a",
            None,
            Some(old_cid.as_str()),
        );
        let err = validate_supersession(new.canonical_bytes(), old.canonical_bytes()).unwrap_err();
        assert_eq!(err.rule_id(), rules::SUPERSESSION_MISMATCH);
    }

    #[test]
    fn missing_supersedes_field_rejected() {
        let old = build(&base_resolution("urn:example:subject-1"), "urn:policy:1", "resolver-a", None, None);
        let new = build(&base_resolution("urn:example:subject-1"), "urn:policy:1", "resolver-a", None, None);
        let err = validate_supersession(new.canonical_bytes(), old.canonical_bytes()).unwrap_err();
        assert_eq!(err.rule_id(), rules::SUPERSESSION_MISMATCH);
    }
}
