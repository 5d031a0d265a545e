//! The trust/verify/revoke pipeline shared by subject and name resolution.
//!
//! `spec.md` §9: "do not duplicate canonicalization or signature logic" —
//! both resolution modes run attestations through exactly this pipeline
//! and differ only in how they filter and interpret the resulting
//! verdicts and documents.

use std::collections::{BTreeMap, BTreeSet};

use xdao_catf::CatfDocument;
use xdao_tpdl::TpdlPolicy;

use crate::claims;
use crate::types::{Exclusion, PolicyVerdict, Verdict};

/// The result of running every attestation blob through canonicalization,
/// claim validation, signature verification, trust lookup, and
/// supersession-role gating.
pub(crate) struct PipelineOutput {
    /// One verdict per input blob, in input order (not yet re-sorted).
    pub verdicts: Vec<Verdict>,
    pub exclusions: Vec<Exclusion>,
    /// Parsed documents for every verdict that canonicalized successfully,
    /// keyed by CID — the only way later stages inspect `CLAIMS`/`SUBJECT`.
    pub documents: BTreeMap<String, CatfDocument>,
}

pub(crate) fn run(attestation_blobs: &[Vec<u8>], policy: &TpdlPolicy) -> PipelineOutput {
    let trust_index = policy.trust_index();
    let allow_list = policy.supersession_allow_list();

    let mut verdicts = Vec::with_capacity(attestation_blobs.len());
    let mut exclusions = Vec::new();
    let mut documents = BTreeMap::new();

    for blob in attestation_blobs {
        let doc = match xdao_catf::parse(blob) {
            Ok(doc) => doc,
            Err(_) => {
                let hash = xdao_core::cid::compute(blob);
                exclusions.push(Exclusion {
                    attestation_cid: None,
                    input_hash: Some(hash.clone()),
                    reason: "CATF parse/canonicalization failed".to_string(),
                });
                verdicts.push(Verdict::excluded(hash, false, "CATF parse/canonicalization failed"));
                continue;
            }
        };

        let cid = doc.cid();
        let issuer_key = doc.crypto().get("Issuer-Key").cloned();
        let subject_cid = doc.subject().get("CID").cloned();

        let mut verdict = Verdict {
            cid: cid.clone(),
            parseable: true,
            issuer_key: issuer_key.clone(),
            claim_type: None,
            attested_subject_cid: subject_cid,
            trusted: false,
            trust_roles: Vec::new(),
            revoked: false,
            revoked_by: Vec::new(),
            status: "active".to_string(),
            reasons: Vec::new(),
            excluded_reason: None,
        };

        let claim_type = match claims::validate_required_fields(&doc) {
            Ok(claim_type) => claim_type,
            Err(e) => {
                exclude(&mut verdict, &mut exclusions, &cid, e.message());
                verdicts.push(verdict);
                continue;
            }
        };
        verdict.claim_type = Some(claim_type.clone());

        if let Err(e) = xdao_crypto::verify(&doc) {
            exclude(&mut verdict, &mut exclusions, &cid, &format!("Signature invalid: {}", e.message()));
            verdicts.push(verdict);
            continue;
        }

        let Some(issuer_key) = issuer_key else {
            exclude(&mut verdict, &mut exclusions, &cid, "Issuer not trusted");
            verdicts.push(verdict);
            continue;
        };

        let Some(roles) = trust_index.get(&issuer_key) else {
            exclude(&mut verdict, &mut exclusions, &cid, "Issuer not trusted");
            verdicts.push(verdict);
            continue;
        };

        verdict.trusted = true;
        verdict.trust_roles = roles.iter().cloned().collect();

        if claim_type == "supersedes" && !allow_list.is_empty() {
            let permitted = verdict.trust_roles.iter().any(|r| allow_list.contains(r));
            if !permitted {
                verdict.trusted = false;
                exclude(&mut verdict, &mut exclusions, &cid, "Supersedes not allowed by policy");
                verdicts.push(verdict);
                continue;
            }
        }

        documents.insert(cid, doc);
        verdicts.push(verdict);
    }

    apply_revocations(&mut verdicts, &documents);

    PipelineOutput { verdicts, exclusions, documents }
}

/// Evaluate `policy`'s `Require` rules against `verdicts`/`active`,
/// returning one [`PolicyVerdict`] per rule.
///
/// Shared by [`crate::resolve::resolve`] (against `authorship`/`approval`/…
/// rules) and [`crate::resolve_name::resolve_name`] (against `name-binding`
/// rules) so the quorum-counting logic is not duplicated between the two
/// resolution modes.
pub(crate) fn evaluate_policy(
    policy: &TpdlPolicy,
    verdicts: &[Verdict],
    active: &BTreeMap<String, &CatfDocument>,
) -> Vec<PolicyVerdict> {
    let mut out: Vec<PolicyVerdict> = policy
        .rules()
        .iter()
        .map(|rule| {
            let mut issuer_keys: BTreeSet<String> = BTreeSet::new();
            for v in verdicts {
                if !v.trusted || v.claim_type.as_deref() != Some(rule.claim_type.as_str()) {
                    continue;
                }
                if !active.contains_key(&v.cid) {
                    continue;
                }
                if v.trust_roles.iter().any(|r| r == &rule.role) {
                    if let Some(key) = &v.issuer_key {
                        issuer_keys.insert(key.clone());
                    }
                }
            }
            let observed = issuer_keys.len() as u32;
            let satisfied = observed >= rule.quorum;
            let reasons = if satisfied {
                Vec::new()
            } else {
                vec!["Missing required evidence".to_string()]
            };
            PolicyVerdict {
                claim_type: rule.claim_type.clone(),
                role: rule.role.clone(),
                quorum: rule.quorum,
                observed,
                satisfied,
                issuer_keys: issuer_keys.into_iter().collect(),
                reasons,
            }
        })
        .collect();
    out.sort_by(|a, b| (&a.claim_type, &a.role, a.quorum).cmp(&(&b.claim_type, &b.role, b.quorum)));
    out
}

fn exclude(verdict: &mut Verdict, exclusions: &mut Vec<Exclusion>, cid: &str, reason: &str) {
    tracing::debug!(cid = %cid, reason = %reason, "attestation excluded from resolution");
    verdict.status = "excluded".to_string();
    verdict.excluded_reason = Some(reason.to_string());
    verdict.reasons.push(reason.to_string());
    exclusions.push(Exclusion {
        attestation_cid: Some(cid.to_string()),
        input_hash: None,
        reason: reason.to_string(),
    });
}

fn apply_revocations(verdicts: &mut [Verdict], documents: &BTreeMap<String, CatfDocument>) {
    let mut sorted_cids: Vec<&String> = documents.keys().collect();
    sorted_cids.sort();

    let mut revoked_by: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for cid in &sorted_cids {
        let doc = &documents[*cid];
        let verdict = verdicts.iter().find(|v| &v.cid == *cid);
        let Some(verdict) = verdict else { continue };
        if !verdict.trusted || verdict.claim_type.as_deref() != Some("revocation") {
            continue;
        }
        if let Some(target) = doc.claims().get("Target-Attestation") {
            if documents.contains_key(target) {
                revoked_by.entry(target.clone()).or_default().push((*cid).clone());
            }
        }
    }

    for verdict in verdicts.iter_mut() {
        if let Some(revokers) = revoked_by.get(&verdict.cid) {
            verdict.revoked = true;
            let mut revokers = revokers.clone();
            revokers.sort();
            tracing::info!(cid = %verdict.cid, revoked_by = ?revokers, "attestation revoked");
            verdict.revoked_by = revokers;
            if verdict.status != "excluded" {
                verdict.status = "revoked".to_string();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xdao_crypto::ed25519::Ed25519KeyPair;
    use xdao_tpdl::ComplianceMode;

    fn policy(key_b64: &str, role: &str) -> TpdlPolicy {
        let text = format!(
            concat!(
                "-----BEGIN XDAO POLICY-----\n",
                "META\n",
                "Spec: xdao-tpdl-1\n",
                "Version: 1\n",
                "\n",
                "TRUST\n",
                "Key: ed25519:{key}\n",
                "Role: {role}\n",
                "\n",
                "RULES\n",
                "Require:\n",
                "  Type: authorship\n",
                "  Role: {role}\n",
                "  Quorum: 1\n",
                "-----END XDAO POLICY-----"
            ),
            key = key_b64,
            role = role,
        );
        xdao_tpdl::parse(text.as_bytes(), ComplianceMode::Permissive).unwrap()
    }

    fn signed_attestation(kp: &Ed25519KeyPair, role: &str, subject: &str) -> Vec<u8> {
        use base64::Engine;
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
        let doc = xdao_catf::parse(unsigned.as_bytes()).unwrap();
        let digest = xdao_crypto::DigestAlg::Sha256.digest(doc.signature_scope().unwrap());
        let sig = kp.sign(&digest);
        let sig_b64 = base64::engine::general_purpose::STANDARD.encode(sig.as_bytes());
        unsigned.replace("Signature: 0\n", &format!("Signature: {sig_b64}\n")).into_bytes()
    }

    #[test]
    fn trusted_attestation_is_trusted_and_active() {
        use base64::Engine;
        let kp = Ed25519KeyPair::generate();
        let key_b64 = base64::engine::general_purpose::STANDARD.encode(kp.public_key().as_bytes());
        let pol = policy(&key_b64, "author");
        let blob = signed_attestation(&kp, "author", "urn:example:subject-1");
        let output = run(&[blob], &pol);
        assert_eq!(output.verdicts.len(), 1);
        assert!(output.verdicts[0].trusted);
        assert!(!output.verdicts[0].revoked);
        assert_eq!(output.exclusions.len(), 0);
    }

    #[test]
    fn untrusted_issuer_is_excluded() {
        use base64::Engine;
        let kp = Ed25519KeyPair::generate();
        let other = Ed25519KeyPair::generate();
        let other_key_b64 = base64::engine::general_purpose::STANDARD.encode(other.public_key().as_bytes());
        let pol = policy(&other_key_b64, "author");
        let blob = signed_attestation(&kp, "author", "urn:example:subject-1");
        let output = run(&[blob], &pol);
        assert!(!output.verdicts[0].trusted);
        assert_eq!(output.verdicts[0].excluded_reason.as_deref(), Some("Issuer not trusted"));
        assert_eq!(output.exclusions.len(), 1);
    }

    #[test]
    fn malformed_blob_is_excluded_by_raw_hash() {
        let pol = policy("AAAA", "author");
        let output = run(&[b"not a catf document".to_vec()], &pol);
        assert!(!output.verdicts[0].parseable);
        assert_eq!(output.verdicts[0].excluded_reason.as_deref(), Some("CATF parse/canonicalization failed"));
    }
}
