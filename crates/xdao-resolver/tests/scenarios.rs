//! The concrete end-to-end resolver scenarios.
//!
//! Scenarios 1 (single author) and 2 (competing revisions forked) are
//! covered by the unit tests in `src/resolve.rs`; this file covers the
//! remaining four: explicit supersession, multi-party approval, a missing
//! required party, and revocation.

use base64::Engine;
use xdao_crypto::ed25519::Ed25519KeyPair;
use xdao_resolver::{resolve, Confidence, State};
use xdao_tpdl::ComplianceMode;

fn key_b64(kp: &Ed25519KeyPair) -> String {
    base64::engine::general_purpose::STANDARD.encode(kp.public_key().as_bytes())
}

fn policy(trust: &[(&Ed25519KeyPair, &str)], rules: &[(&str, &str, u32)]) -> xdao_tpdl::TpdlPolicy {
    let mut trust_block = String::new();
    for (kp, role) in trust {
        trust_block.push_str(&format!("Key: ed25519:{}\nRole: {role}\n", key_b64(kp)));
    }
    let mut rules_block = String::new();
    for (claim_type, role, quorum) in rules {
        rules_block.push_str(&format!("Require:\n  Type: {claim_type}\n  Role: {role}\n  Quorum: {quorum}\n"));
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
            "{rules}",
            "-----END XDAO POLICY-----"
        ),
        trust = trust_block,
        rules = rules_block,
    );
    xdao_tpdl::parse(text.as_bytes(), ComplianceMode::Permissive).unwrap()
}

fn sign(unsigned: &str, kp: &Ed25519KeyPair) -> Vec<u8> {
    let doc = xdao_catf::parse(unsigned.as_bytes()).unwrap();
    let digest = xdao_crypto::DigestAlg::Sha256.digest(doc.signature_scope().unwrap());
    let sig = kp.sign(&digest);
    let sig_b64 = base64::engine::general_purpose::STANDARD.encode(sig.as_bytes());
    unsigned.replace("Signature: 0\n", &format!("Signature: {sig_b64}\n")).into_bytes()
}

fn authorship(kp: &Ed25519KeyPair, role: &str, subject: &str) -> Vec<u8> {
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
        pubkey = key_b64(kp),
    );
    sign(&unsigned, kp)
}

fn approval(kp: &Ed25519KeyPair, role: &str, subject: &str) -> Vec<u8> {
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
            "Effective-Date: 2026-01-01T00:00:00Z\n",
            "Role: {role}\n",
            "Type: approval\n",
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
        pubkey = key_b64(kp),
    );
    sign(&unsigned, kp)
}

fn supersedes(kp: &Ed25519KeyPair, subject: &str, target_cid: &str) -> Vec<u8> {
    let unsigned = format!(
        concat!(
            "-----BEGIN XDAO ATTESTATION-----\n",
            "META\n",
            "Issued-At: 2026-01-02T00:00:00Z\n",
            "\n",
            "SUBJECT\n",
            "CID: {subject}\n",
            "\n",
            "CLAIMS\n",
            "Role: author\n",
            "Supersedes: {target}\n",
            "Type: supersedes\n",
            "\n",
            "CRYPTO\n",
            "Hash-Alg: sha256\n",
            "Issuer-Key: ed25519:{pubkey}\n",
            "Signature: 0\n",
            "Signature-Alg: ed25519\n",
            "-----END XDAO ATTESTATION-----"
        ),
        subject = subject,
        target = target_cid,
        pubkey = key_b64(kp),
    );
    sign(&unsigned, kp)
}

fn revocation(kp: &Ed25519KeyPair, subject: &str, target_cid: &str) -> Vec<u8> {
    let unsigned = format!(
        concat!(
            "-----BEGIN XDAO ATTESTATION-----\n",
            "META\n",
            "Issued-At: 2026-01-03T00:00:00Z\n",
            "\n",
            "SUBJECT\n",
            "CID: {subject}\n",
            "\n",
            "CLAIMS\n",
            "Role: approver\n",
            "Target-Attestation: {target}\n",
            "Type: revocation\n",
            "\n",
            "CRYPTO\n",
            "Hash-Alg: sha256\n",
            "Issuer-Key: ed25519:{pubkey}\n",
            "Signature: 0\n",
            "Signature-Alg: ed25519\n",
            "-----END XDAO ATTESTATION-----"
        ),
        subject = subject,
        target = target_cid,
        pubkey = key_b64(kp),
    );
    sign(&unsigned, kp)
}

fn cid_of(blob: &[u8]) -> String {
    xdao_catf::parse(blob).unwrap().cid()
}

#[test]
fn scenario_3_explicit_supersession() {
    let kp = Ed25519KeyPair::generate();
    let pol = policy(&[(&kp, "author")], &[("authorship", "author", 1)]);
    let a1 = authorship(&kp, "author", "urn:example:doc-1");
    let a1_cid = cid_of(&a1);
    let a2 = supersedes(&kp, "urn:example:doc-1", &a1_cid);
    let a2_cid = cid_of(&a2);

    let res = resolve(&[a1, a2], &pol, "urn:example:doc-1");
    assert_eq!(res.state, State::Resolved);
    assert_eq!(res.paths.len(), 1);
    assert_eq!(res.paths[0].attestation_cids, vec![a2_cid, a1_cid]);
}

#[test]
fn scenario_4_multi_party_approval_resolves() {
    let buyer_kp = Ed25519KeyPair::generate();
    let seller_kp = Ed25519KeyPair::generate();
    let pol = policy(
        &[(&buyer_kp, "buyer"), (&seller_kp, "seller")],
        &[("approval", "buyer", 1), ("approval", "seller", 1)],
    );
    let buyer_approval = approval(&buyer_kp, "buyer", "urn:example:deal-1");
    let seller_approval = approval(&seller_kp, "seller", "urn:example:deal-1");

    let res = resolve(&[buyer_approval, seller_approval], &pol, "urn:example:deal-1");
    assert_eq!(res.state, State::Resolved);
    assert_eq!(res.confidence, Confidence::High);
    assert_eq!(res.policy_verdicts.len(), 2);
    assert!(res.policy_verdicts.iter().all(|pv| pv.satisfied && pv.observed == 1));
}

#[test]
fn scenario_5_missing_required_party_is_unresolved() {
    let buyer_kp = Ed25519KeyPair::generate();
    let seller_kp = Ed25519KeyPair::generate();
    let pol = policy(
        &[(&buyer_kp, "buyer"), (&seller_kp, "seller")],
        &[("approval", "buyer", 1), ("approval", "seller", 1)],
    );
    let buyer_approval = approval(&buyer_kp, "buyer", "urn:example:deal-1");

    let res = resolve(&[buyer_approval], &pol, "urn:example:deal-1");
    assert_eq!(res.state, State::Unresolved);
    let seller_verdict = res.policy_verdicts.iter().find(|pv| pv.role == "seller").unwrap();
    assert!(!seller_verdict.satisfied);
    assert_eq!(seller_verdict.observed, 0);
    assert_eq!(seller_verdict.reasons, vec!["Missing required evidence".to_string()]);
}

#[test]
fn scenario_6_revocation() {
    let kp = Ed25519KeyPair::generate();
    let pol = policy(&[(&kp, "approver")], &[("approval", "approver", 1)]);
    let a1 = approval(&kp, "approver", "urn:example:deal-1");
    let a1_cid = cid_of(&a1);
    let r1 = revocation(&kp, "urn:example:deal-1", &a1_cid);

    let res = resolve(&[a1, r1], &pol, "urn:example:deal-1");
    assert_eq!(res.state, State::Revoked);
    let verdict = res.verdicts.iter().find(|v| v.cid == a1_cid).unwrap();
    assert!(verdict.revoked);
    assert!(res.paths.is_empty());
}
