//! Name resolution — `spec.md` §4.7's name-binding variant.
//!
//! Shares [`pipeline::run`] with [`crate::resolve`] and differs only in
//! the active-set filter (bound to `Name`/`Version` rather than
//! `Subject-CID`) and in what a single resolved head means for
//! `Resolution.subject` (see `DESIGN.md`).

use std::collections::BTreeMap;

use xdao_catf::CatfDocument;
use xdao_tpdl::TpdlPolicy;

use crate::pipeline::{self, evaluate_policy, PipelineOutput};
use crate::types::{Confidence, Fork, Path, Resolution, State};

/// Resolve the `Points-To` target bound to `name` (and, if given,
/// `version`) against `attestation_blobs` under `policy`.
pub fn resolve_name(
    attestation_blobs: &[Vec<u8>],
    policy: &TpdlPolicy,
    name: &str,
    version: Option<&str>,
) -> Resolution {
    let PipelineOutput { mut verdicts, exclusions, documents } = pipeline::run(attestation_blobs, policy);
    verdicts.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

    let active: BTreeMap<String, &CatfDocument> = verdicts
        .iter()
        .filter(|v| v.trusted && !v.revoked && v.claim_type.as_deref() == Some("name-binding"))
        .filter_map(|v| documents.get(&v.cid).map(|doc| (v.cid.clone(), doc)))
        .filter(|(_, doc)| doc.claims().get("Name").map(String::as_str) == Some(name))
        .filter(|(_, doc)| match version {
            Some(want) => doc.claims().get("Version").map(String::as_str) == Some(want),
            None => true,
        })
        .collect();

    if active.is_empty() {
        return Resolution {
            subject: String::new(),
            state: State::Unresolved,
            confidence: Confidence::Undefined,
            paths: Vec::new(),
            forks: Vec::new(),
            exclusions,
            policy_verdicts: evaluate_policy(policy, &verdicts, &active),
            verdicts,
        };
    }

    let policy_verdicts = evaluate_policy(policy, &verdicts, &active);
    let any_rule_failed = policy_verdicts.iter().any(|pv| !pv.satisfied);
    if any_rule_failed {
        return Resolution {
            subject: String::new(),
            state: State::Unresolved,
            confidence: Confidence::Undefined,
            paths: Vec::new(),
            forks: Vec::new(),
            exclusions,
            verdicts,
            policy_verdicts,
        };
    }

    let mut supersedes_edges: BTreeMap<String, String> = BTreeMap::new();
    for (cid, doc) in &active {
        if let Some(target) = doc.claims().get("Supersedes") {
            if active.contains_key(target) {
                supersedes_edges.insert(cid.clone(), target.clone());
            }
        }
    }
    let targets: std::collections::BTreeSet<&String> = supersedes_edges.values().collect();
    let mut heads: Vec<&String> = active.keys().filter(|cid| !targets.contains(cid)).collect();
    heads.sort();

    let paths: Vec<Path> = heads
        .iter()
        .enumerate()
        .map(|(i, head)| {
            let mut chain = vec![(*head).clone()];
            let mut current = (*head).clone();
            while let Some(next) = supersedes_edges.get(&current) {
                chain.push(next.clone());
                current = next.clone();
            }
            Path { id: format!("path-{}", i + 1), attestation_cids: chain }
        })
        .collect();

    if heads.len() == 1 {
        let points_to = active[heads[0]].claims().get("Points-To").cloned().unwrap_or_default();
        return Resolution {
            subject: points_to,
            state: State::Resolved,
            confidence: Confidence::High,
            paths,
            forks: Vec::new(),
            exclusions,
            verdicts,
            policy_verdicts,
        };
    }

    let fork = Fork { id: "fork-1".to_string(), path_ids: paths.iter().map(|p| p.id.clone()).collect() };
    Resolution {
        subject: String::new(),
        state: State::Forked,
        confidence: Confidence::Medium,
        paths,
        forks: vec![fork],
        exclusions,
        verdicts,
        policy_verdicts,
    }
}
