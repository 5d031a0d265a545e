//! Round-trip and fixed-point properties for CROF canonicalization, plus
//! an end-to-end resolve → build → canonicalize → verify pass.

use xdao_crof::{build, canonicalize, parse, sign, validate_supersession, verify};
use xdao_crypto::ed25519::Ed25519KeyPair;
use xdao_resolver::{Confidence, Exclusion, Fork, Path, PolicyVerdict, Resolution, State, Verdict};

fn sample_resolution() -> Resolution {
    Resolution {
        subject: "urn:example:subject-1".to_string(),
        state: State::Forked,
        confidence: Confidence::Medium,
        paths: vec![
            Path { id: "path-1".to_string(), attestation_cids: vec!["bafkone".to_string()] },
            Path { id: "path-2".to_string(), attestation_cids: vec!["bafktwo".to_string()] },
        ],
        forks: vec![Fork { id: "fork-1".to_string(), path_ids: vec!["path-1".to_string(), "path-2".to_string()] }],
        exclusions: vec![Exclusion {
            attestation_cid: Some("bafkbad".to_string()),
            input_hash: None,
            reason: "malformed attestation".to_string(),
        }],
        verdicts: vec![
            Verdict {
                cid: "bafkbad".to_string(),
                parseable: false,
                issuer_key: None,
                claim_type: None,
                attested_subject_cid: None,
                trusted: false,
                trust_roles: Vec::new(),
                revoked: false,
                revoked_by: Vec::new(),
                status: "excluded".to_string(),
                reasons: vec!["malformed attestation".to_string()],
                excluded_reason: Some("malformed attestation".to_string()),
            },
            Verdict {
                cid: "bafkone".to_string(),
                parseable: true,
                issuer_key: Some("ed25519:aaaa".to_string()),
                claim_type: Some("authorship".to_string()),
                attested_subject_cid: Some("urn:example:subject-1".to_string()),
                trusted: true,
                trust_roles: vec!["author".to_string()],
                revoked: false,
                revoked_by: Vec::new(),
                status: "valid".to_string(),
                reasons: Vec::new(),
                excluded_reason: None,
            },
        ],
        policy_verdicts: vec![PolicyVerdict {
            claim_type: "authorship".to_string(),
            role: "author".to_string(),
            quorum: 1,
            observed: 1,
            satisfied: true,
            issuer_keys: vec!["ed25519:aaaa".to_string()],
            reasons: Vec::new(),
        }],
    }
}

#[test]
fn built_document_is_canonical_and_round_trips() {
    let doc = build(&sample_resolution(), "urn:policy:1", "resolver-a", Some("2026-01-01T00:00:00Z"), None);
    let bytes = doc.canonical_bytes().to_vec();
    let canon = canonicalize(&bytes).unwrap();
    assert_eq!(canon, bytes);

    let reparsed = parse(&bytes).unwrap();
    assert_eq!(reparsed.result().subject_cid, "urn:example:subject-1");
    assert_eq!(reparsed.paths().len(), 2);
    assert_eq!(reparsed.forks().len(), 1);
    assert_eq!(reparsed.exclusions().len(), 1);
    assert_eq!(reparsed.verdicts().len(), 2);
}

#[test]
fn signed_document_verifies_and_tamper_is_detected() {
    let unsigned = build(&sample_resolution(), "urn:policy:1", "resolver-a", None, None);
    let kp = Ed25519KeyPair::generate();
    let signed = sign(unsigned.canonical_bytes(), &kp).unwrap();
    verify(&signed).unwrap();

    let mut tampered = signed.clone();
    let pos = tampered.windows(b"Forked".len()).position(|w| w == b"Forked").unwrap();
    tampered[pos] = b'X';
    assert!(verify(&tampered).is_err());
}

#[test]
fn supersession_chain_validates_against_prior_cid() {
    let old = build(&sample_resolution(), "urn:policy:1", "resolver-a", None, None);
    let old_cid = old.cid();
    let mut newer = sample_resolution();
    newer.state = State::Resolved;
    newer.forks.clear();
    newer.paths = vec![Path { id: "path-1".to_string(), attestation_cids: vec!["bafkone".to_string()] }];
    let new = build(&newer, "urn:policy:1", "resolver-a", None, Some(old_cid.as_str()));
    validate_supersession(new.canonical_bytes(), old.canonical_bytes()).unwrap();
}
