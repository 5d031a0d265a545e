//! Constructing a [`CrofDocument`] from a resolver [`Resolution`].

use std::collections::BTreeMap;

use xdao_resolver::{Resolution, Verdict};

use crate::document::{
    CrofDocument, ExclusionRecord, ForkRecord, InputsSection, MetaSection, PathRecord, ResultPolicyVerdict,
    ResultSection, VerdictRecord,
};
use crate::render::render;

/// Build the canonical, unsigned CROF document recording `resolution`.
///
/// `attestation_blobs_considered` and `trust_policy_cid` come from the
/// same inputs that were given to the resolver — they are not part of
/// `Resolution` itself, since the resolver's job is to compute a result,
/// not to remember how it was invoked.
pub fn build(
    resolution: &Resolution,
    trust_policy_cid: &str,
    resolver_id: &str,
    resolved_at: Option<&str>,
    supersedes_crof_cid: Option<&str>,
) -> CrofDocument {
    let meta = MetaSection {
        resolver_id: resolver_id.to_string(),
        resolved_at: resolved_at.map(|s| s.to_string()),
        supersedes_crof_cid: supersedes_crof_cid.map(|s| s.to_string()),
    };

    let mut attestation_cids: Vec<String> = Vec::new();
    let mut input_hashes: Vec<String> = Vec::new();
    for v in &resolution.verdicts {
        if v.parseable {
            attestation_cids.push(v.cid.clone());
        } else {
            input_hashes.push(v.cid.clone());
        }
    }
    attestation_cids.sort();
    attestation_cids.dedup();
    input_hashes.sort();
    input_hashes.dedup();
    let inputs = InputsSection { trust_policy_cid: trust_policy_cid.to_string(), attestation_cids, input_hashes };

    let policy_verdicts: Vec<ResultPolicyVerdict> = resolution
        .policy_verdicts
        .iter()
        .map(|pv| ResultPolicyVerdict {
            claim_type: pv.claim_type.clone(),
            role: pv.role.clone(),
            quorum: pv.quorum,
            observed: pv.observed,
            satisfied: pv.satisfied,
        })
        .collect();
    let mut policy_issuer_keys: Vec<String> = Vec::new();
    let mut policy_verdict_reasons: Vec<String> = Vec::new();
    for pv in &resolution.policy_verdicts {
        for issuer in &pv.issuer_keys {
            policy_issuer_keys.push(format!("type={}; role={}; issuer={}", pv.claim_type, pv.role, issuer));
        }
        for reason in &pv.reasons {
            policy_verdict_reasons.push(format!("type={}; role={}; reason={}", pv.claim_type, pv.role, reason));
        }
    }
    policy_issuer_keys.sort();
    policy_verdict_reasons.sort();

    let result = ResultSection {
        subject_cid: resolution.subject.clone(),
        confidence: resolution.confidence.as_str().to_string(),
        state: resolution.state.as_str().to_string(),
        policy_verdicts,
        policy_issuer_keys,
        policy_verdict_reasons,
    };

    let paths: Vec<PathRecord> = resolution
        .paths
        .iter()
        .map(|p| PathRecord { path_id: p.id.clone(), attestation_cids: p.attestation_cids.clone() })
        .collect();
    let forks: Vec<ForkRecord> = resolution
        .forks
        .iter()
        .map(|f| ForkRecord { fork_id: f.id.clone(), conflicting_paths: f.path_ids.clone() })
        .collect();
    let exclusions: Vec<ExclusionRecord> = {
        let mut records: Vec<ExclusionRecord> = resolution
            .exclusions
            .iter()
            .map(|e| ExclusionRecord {
                attestation_cid: e.attestation_cid.clone(),
                input_hash: e.input_hash.clone(),
                reason: e.reason.clone(),
            })
            .collect();
        records.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        records
    };
    let verdicts: Vec<VerdictRecord> = {
        let mut records: Vec<VerdictRecord> = resolution.verdicts.iter().map(verdict_record).collect();
        records.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        records
    };

    let candidate = CrofDocument {
        meta,
        inputs,
        result,
        paths,
        forks,
        exclusions,
        verdicts,
        crypto: BTreeMap::new(),
        canonical: Vec::new(),
    };
    let canonical = render(&candidate);
    CrofDocument { canonical, ..candidate }
}

fn verdict_record(v: &Verdict) -> VerdictRecord {
    let (attestation_cid, input_hash) = if v.parseable { (Some(v.cid.clone()), None) } else { (None, Some(v.cid.clone())) };
    let mut trust_roles = v.trust_roles.clone();
    trust_roles.sort();
    let mut revoked_by = v.revoked_by.clone();
    revoked_by.sort();
    let mut reasons = v.reasons.clone();
    reasons.sort();
    VerdictRecord {
        attestation_cid,
        input_hash,
        attested_subject_cid: v.attested_subject_cid.clone(),
        issuer_key: v.issuer_key.clone(),
        claim_type: v.claim_type.clone(),
        status: Some(v.status.clone()),
        trusted: v.trusted,
        revoked: v.revoked,
        revoked_by,
        trust_roles,
        reasons,
        excluded_reason: v.excluded_reason.clone(),
    }
}
