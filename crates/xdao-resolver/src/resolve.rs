//! Subject resolution — `spec.md` §4.7 steps 1–9.

use std::collections::{BTreeMap, BTreeSet};

use xdao_catf::CatfDocument;
use xdao_tpdl::TpdlPolicy;

use crate::pipeline::{self, evaluate_policy, PipelineOutput};
use crate::types::{Confidence, Fork, Path, Resolution, State, Verdict};

/// Resolve `subject` against `attestation_blobs` under `policy`.
///
/// Deterministic for any permutation of `attestation_blobs` and any
/// repetition of equal inputs (`spec.md` §8, "Resolver determinism").
pub fn resolve(attestation_blobs: &[Vec<u8>], policy: &TpdlPolicy, subject: &str) -> Resolution {
    let PipelineOutput { mut verdicts, exclusions, documents } = pipeline::run(attestation_blobs, policy);
    verdicts.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

    let active: BTreeMap<String, &CatfDocument> = verdicts
        .iter()
        .filter(|v| {
            v.trusted
                && !v.revoked
                && v.attested_subject_cid.as_deref() == Some(subject)
                && v.claim_type.as_deref() != Some("revocation")
        })
        .filter_map(|v| documents.get(&v.cid).map(|doc| (v.cid.clone(), doc)))
        .collect();

    if active.is_empty() {
        let any_revocation_targeted_subject = verdicts.iter().any(|v| {
            v.claim_type.as_deref() == Some("revocation")
                && v.trusted
                && documents
                    .get(&v.cid)
                    .and_then(|doc| doc.claims().get("Target-Attestation"))
                    .and_then(|target| documents.get(target))
                    .and_then(|target_doc| target_doc.subject().get("CID"))
                    .map(|s| s == subject)
                    .unwrap_or(false)
        });
        let state = if any_revocation_targeted_subject { State::Revoked } else { State::Unresolved };
        let policy_verdicts = evaluate_policy(policy, &verdicts, &active);
        return Resolution {
            subject: subject.to_string(),
            state,
            confidence: Confidence::Undefined,
            paths: Vec::new(),
            forks: Vec::new(),
            exclusions,
            verdicts,
            policy_verdicts,
        };
    }

    let policy_verdicts = evaluate_policy(policy, &verdicts, &active);
    let any_rule_failed = policy_verdicts.iter().any(|pv| !pv.satisfied);
    if any_rule_failed {
        return Resolution {
            subject: subject.to_string(),
            state: State::Unresolved,
            confidence: Confidence::Undefined,
            paths: Vec::new(),
            forks: Vec::new(),
            exclusions,
            verdicts,
            policy_verdicts,
        };
    }

    let (paths, forks) = build_paths_and_forks(policy, &verdicts, &active);
    let (state, confidence) = if forks.is_empty() {
        (State::Resolved, Confidence::High)
    } else {
        (State::Forked, Confidence::Medium)
    };

    tracing::info!(subject = %subject, state = state.as_str(), paths = paths.len(), forks = forks.len(), "subject resolved");
    Resolution {
        subject: subject.to_string(),
        state,
        confidence,
        paths,
        forks,
        exclusions,
        verdicts,
        policy_verdicts,
    }
}

fn build_paths_and_forks(
    policy: &TpdlPolicy,
    verdicts: &[Verdict],
    active: &BTreeMap<String, &CatfDocument>,
) -> (Vec<Path>, Vec<Fork>) {
    let mut supersedes_edges: BTreeMap<String, String> = BTreeMap::new();
    for (cid, doc) in active {
        if doc.claims().get("Type").map(String::as_str) == Some("supersedes") {
            if let Some(target) = doc.claims().get("Supersedes") {
                if active.contains_key(target) {
                    supersedes_edges.insert(cid.clone(), target.clone());
                }
            }
        }
    }

    if !supersedes_edges.is_empty() {
        let targets: BTreeSet<&String> = supersedes_edges.values().collect();
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

        let forks = if paths.len() > 1 {
            vec![Fork { id: "fork-1".to_string(), path_ids: paths.iter().map(|p| p.id.clone()).collect() }]
        } else {
            Vec::new()
        };
        return (paths, forks);
    }

    for rule in policy.rules().iter().filter(|r| r.quorum == 1) {
        let mut candidates: Vec<String> = verdicts
            .iter()
            .filter(|v| {
                active.contains_key(&v.cid)
                    && v.claim_type.as_deref() == Some(rule.claim_type.as_str())
                    && v.trust_roles.iter().any(|r| r == &rule.role)
            })
            .map(|v| v.cid.clone())
            .collect();
        candidates.sort();

        if candidates.len() >= 2 {
            let paths: Vec<Path> = candidates
                .iter()
                .enumerate()
                .map(|(i, cid)| Path { id: format!("path-{}", i + 1), attestation_cids: vec![cid.clone()] })
                .collect();
            let fork = Fork { id: "fork-1".to_string(), path_ids: paths.iter().map(|p| p.id.clone()).collect() };
            return (paths, vec![fork]);
        }
    }

    let all_authorship = active.values().all(|doc| doc.claims().get("Type").map(String::as_str) == Some("authorship"));
    if all_authorship {
        let mut cids: Vec<String> = active.keys().cloned().collect();
        cids.sort();
        let paths: Vec<Path> = cids
            .iter()
            .enumerate()
            .map(|(i, cid)| Path { id: format!("path-{}", i + 1), attestation_cids: vec![cid.clone()] })
            .collect();
        let forks = if paths.len() > 1 {
            vec![Fork { id: "fork-1".to_string(), path_ids: paths.iter().map(|p| p.id.clone()).collect() }]
        } else {
            Vec::new()
        };
        return (paths, forks);
    }

    let mut cids: Vec<String> = active.keys().cloned().collect();
    cids.sort();
    (vec![Path { id: "path-1".to_string(), attestation_cids: cids }], Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use xdao_crypto::ed25519::Ed25519KeyPair;
    use xdao_tpdl::ComplianceMode;

    fn policy(trust: &[(&Ed25519KeyPair, &str)], quorum: u32) -> TpdlPolicy {
        let mut trust_block = String::new();
        for (kp, role) in trust {
            let key_b64 = base64::engine::general_purpose::STANDARD.encode(kp.public_key().as_bytes());
            trust_block.push_str(&format!("Key: ed25519:{key_b64}\nRole: {role}\n"));
        }
        let text = format!(
            concat!(
                "-----BEGIN XDAO POLICY-----\n",
                "META\n",
                "Spec: xdao-tpdl-1\n",
                "Version: 1\n",
                "\n",
                "TRUST\n",
                "{trust}",
                "\n",
                "RULES\n",
                "Require:\n",
                "  Type: authorship\n",
                "  Role: author\n",
                "  Quorum: {quorum}\n",
                "-----END XDAO POLICY-----"
            ),
            trust = trust_block,
            quorum = quorum,
        );
        xdao_tpdl::parse(text.as_bytes(), ComplianceMode::Permissive).unwrap()
    }

    fn signed_authorship(kp: &Ed25519KeyPair, subject: &str) -> Vec<u8> {
        let pubkey_b64 = base64::engine::general_purpose::STANDARD.encode(kp.public_key().as_bytes());
        let unsigned = format!(
            concat!(
                "-----BEGIN XDAO ATTESTATION-----\n",
                "META\n",
                "Issued-At: 2026-01-01T00:00:00Z\n",
                "\n",
                "SUBJECT\n",
                "CID: {subject}\n",
                "\n",
                "CLAIMS\n",
                "Role: author\n",
                "Type: authorship\n",
                "\n",
                "CRYPTO\n",
                "Hash-Alg: sha256\n",
                "Issuer-Key: ed25519:{pubkey}\n",
                "Signature: 0\n",
                "Signature-Alg: ed25519\n",
                "-----END XDAO ATTESTATION-----"
            ),
            subject = subject,
            pubkey = pubkey_b64,
        );
        sign(&unsigned, kp)
    }

    fn sign(unsigned: &str, kp: &Ed25519KeyPair) -> Vec<u8> {
        let doc = xdao_catf::parse(unsigned.as_bytes()).unwrap();
        let digest = xdao_crypto::DigestAlg::Sha256.digest(doc.signature_scope().unwrap());
        let sig = kp.sign(&digest);
        let sig_b64 = base64::engine::general_purpose::STANDARD.encode(sig.as_bytes());
        unsigned.replace("Signature: 0\n", &format!("Signature: {sig_b64}\n")).into_bytes()
    }

    #[test]
    fn single_trusted_attestation_resolves() {
        let kp = Ed25519KeyPair::generate();
        let pol = policy(&[(&kp, "author")], 1);
        let blob = signed_authorship(&kp, "urn:example:subject-1");
        let res = resolve(&[blob], &pol, "urn:example:subject-1");
        assert_eq!(res.state, State::Resolved);
        assert_eq!(res.confidence, Confidence::High);
        assert_eq!(res.paths.len(), 1);
        assert!(res.forks.is_empty());
    }

    #[test]
    fn no_matching_evidence_is_unresolved() {
        let kp = Ed25519KeyPair::generate();
        let pol = policy(&[(&kp, "author")], 1);
        let blob = signed_authorship(&kp, "urn:example:subject-1");
        let res = resolve(&[blob], &pol, "urn:example:other-subject");
        assert_eq!(res.state, State::Unresolved);
    }

    #[test]
    fn unmet_quorum_is_unresolved() {
        let kp = Ed25519KeyPair::generate();
        let pol = policy(&[(&kp, "author")], 2);
        let blob = signed_authorship(&kp, "urn:example:subject-1");
        let res = resolve(&[blob], &pol, "urn:example:subject-1");
        assert_eq!(res.state, State::Unresolved);
        assert!(!res.policy_verdicts[0].satisfied);
    }

    #[test]
    fn two_independent_authors_with_quorum_one_fork() {
        let kp1 = Ed25519KeyPair::generate();
        let kp2 = Ed25519KeyPair::generate();
        let pol = policy(&[(&kp1, "author"), (&kp2, "author")], 1);
        let blob1 = signed_authorship(&kp1, "urn:example:subject-1");
        let blob2 = signed_authorship(&kp2, "urn:example:subject-1");
        let res = resolve(&[blob1, blob2], &pol, "urn:example:subject-1");
        assert_eq!(res.state, State::Forked);
        assert_eq!(res.forks.len(), 1);
        assert_eq!(res.paths.len(), 2);
    }

    #[test]
    fn fork_heuristic_skips_earlier_rule_with_too_few_candidates() {
        let buyer_kp = Ed25519KeyPair::generate();
        let seller1_kp = Ed25519KeyPair::generate();
        let seller2_kp = Ed25519KeyPair::generate();

        let mut trust_block = String::new();
        for (kp, role) in [(&buyer_kp, "buyer"), (&seller1_kp, "seller"), (&seller2_kp, "seller")] {
            let key_b64 = base64::engine::general_purpose::STANDARD.encode(kp.public_key().as_bytes());
            trust_block.push_str(&format!("Key: ed25519:{key_b64}\nRole: {role}\n"));
        }
        let text = format!(
            concat!(
                "-----BEGIN XDAO POLICY-----\n",
                "META\n",
                "Spec: xdao-tpdl-1\n",
                "Version: 1\n",
                "\n",
                "TRUST\n",
                "{trust}",
                "\n",
                "RULES\n",
                "Require:\n",
                "  Type: authorship\n",
                "  Role: buyer\n",
                "  Quorum: 1\n",
                "Require:\n",
                "  Type: authorship\n",
                "  Role: seller\n",
                "  Quorum: 1\n",
                "-----END XDAO POLICY-----"
            ),
            trust = trust_block,
        );
        let pol = xdao_tpdl::parse(text.as_bytes(), ComplianceMode::Permissive).unwrap();

        let buyer_blob = signed_authorship_with_role(&buyer_kp, "buyer", "urn:example:subject-1");
        let seller1_blob = signed_authorship_with_role(&seller1_kp, "seller", "urn:example:subject-1");
        let seller2_blob = signed_authorship_with_role(&seller2_kp, "seller", "urn:example:subject-1");

        let res = resolve(&[buyer_blob, seller1_blob, seller2_blob], &pol, "urn:example:subject-1");
        assert_eq!(res.state, State::Forked);
        assert_eq!(res.forks.len(), 1);
        assert_eq!(res.paths.len(), 2);
    }

    fn signed_authorship_with_role(kp: &Ed25519KeyPair, role: &str, subject: &str) -> Vec<u8> {
        let pubkey_b64 = base64::engine::general_purpose::STANDARD.encode(kp.public_key().as_bytes());
        let unsigned = format!(
            concat!(
                "-----BEGIN XDAO ATTESTATION-----\n",
                "META\n",
                "Issued-At: 2026-01-01T00:00:00Z\n",
                "\n",
                "SUBJECT\n",
                "CID: {subject}\n",
                "\n",
                "CLAIMS\n",
                "Role: {role}\n",
                "Type: authorship\n",
                "\n",
                "CRYPTO\n",
                "Hash-Alg: sha256\n",
                "Issuer-Key: ed25519:{pubkey}\n",
                "Signature: 0\n",
                "Signature-Alg: ed25519\n",
                "-----END XDAO ATTESTATION-----"
            ),
            subject = subject,
            role = role,
            pubkey = pubkey_b64,
        );
        sign(&unsigned, kp)
    }

    #[test]
    fn resolution_is_stable_under_input_permutation() {
        let kp1 = Ed25519KeyPair::generate();
        let kp2 = Ed25519KeyPair::generate();
        let pol = policy(&[(&kp1, "author"), (&kp2, "author")], 1);
        let blob1 = signed_authorship(&kp1, "urn:example:subject-1");
        let blob2 = signed_authorship(&kp2, "urn:example:subject-1");
        let forward = resolve(&[blob1.clone(), blob2.clone()], &pol, "urn:example:subject-1");
        let reversed = resolve(&[blob2, blob1], &pol, "urn:example:subject-1");
        assert_eq!(forward.state, reversed.state);
        assert_eq!(forward.paths, reversed.paths);
        assert_eq!(forward.forks, reversed.forks);
    }
}
