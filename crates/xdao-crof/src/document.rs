//! The in-memory representation of a parsed or built CROF resolution
//! record.

use std::collections::BTreeMap;

/// The `META` section's required and optional fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaSection {
    pub resolver_id: String,
    pub resolved_at: Option<String>,
    pub supersedes_crof_cid: Option<String>,
}

/// The `INPUTS` section: the policy this run consulted, plus every
/// attestation it considered, parseable or not.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InputsSection {
    pub trust_policy_cid: String,
    pub attestation_cids: Vec<String>,
    pub input_hashes: Vec<String>,
}

/// A single `(type, role)` policy-rule outcome, composite-encoded in
/// `RESULT` as `Policy-Verdict: type=…; role=…; quorum=…; observed=…;
/// satisfied=…`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultPolicyVerdict {
    pub claim_type: String,
    pub role: String,
    pub quorum: u32,
    pub observed: u32,
    pub satisfied: bool,
}

/// The `RESULT` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSection {
    pub subject_cid: String,
    pub confidence: String,
    pub state: String,
    pub policy_verdicts: Vec<ResultPolicyVerdict>,
    /// One composite line per (rule, issuer key) pair that counted
    /// toward that rule's quorum: `type=…; role=…; issuer=…`.
    pub policy_issuer_keys: Vec<String>,
    /// One composite line per (rule, reason) pair recorded against an
    /// unsatisfied rule: `type=…; role=…; reason=…`.
    pub policy_verdict_reasons: Vec<String>,
}

/// A `PATHS` record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRecord {
    pub path_id: String,
    pub attestation_cids: Vec<String>,
}

/// A `FORKS` record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForkRecord {
    pub fork_id: String,
    pub conflicting_paths: Vec<String>,
}

/// An `EXCLUSIONS` record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionRecord {
    pub attestation_cid: Option<String>,
    pub input_hash: Option<String>,
    pub reason: String,
}

impl ExclusionRecord {
    pub(crate) fn sort_key(&self) -> (String, String, String) {
        (
            self.attestation_cid.clone().unwrap_or_default(),
            self.input_hash.clone().unwrap_or_default(),
            self.reason.clone(),
        )
    }
}

/// A `VERDICTS` record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VerdictRecord {
    pub attestation_cid: Option<String>,
    pub input_hash: Option<String>,
    pub attested_subject_cid: Option<String>,
    pub issuer_key: Option<String>,
    pub claim_type: Option<String>,
    pub status: Option<String>,
    pub trusted: bool,
    pub revoked: bool,
    pub revoked_by: Vec<String>,
    pub trust_roles: Vec<String>,
    pub reasons: Vec<String>,
    pub excluded_reason: Option<String>,
}

impl VerdictRecord {
    /// The stable verdict-record sort tuple, `spec.md` §4.7 step 4.
    pub(crate) fn sort_key(&self) -> impl Ord + '_ {
        (
            self.attestation_cid.clone().unwrap_or_default(),
            self.input_hash.clone().unwrap_or_default(),
            self.excluded_reason.clone().unwrap_or_default(),
            self.issuer_key.clone().unwrap_or_default(),
            self.claim_type.clone().unwrap_or_default(),
            self.attested_subject_cid.clone().unwrap_or_default(),
            self.status.clone().unwrap_or_default(),
            !self.trusted,
            self.revoked,
            self.trust_roles.join(","),
            self.reasons.join(","),
            self.revoked_by.join(","),
        )
    }
}

/// A fully parsed, or freshly built, CROF document.
///
/// The only way to obtain one with a populated `canonical` is
/// [`crate::parse`] or [`crate::build`] followed by [`crate::render`];
/// both routes agree on one canonical byte rendering per set of fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrofDocument {
    pub(crate) meta: MetaSection,
    pub(crate) inputs: InputsSection,
    pub(crate) result: ResultSection,
    pub(crate) paths: Vec<PathRecord>,
    pub(crate) forks: Vec<ForkRecord>,
    pub(crate) exclusions: Vec<ExclusionRecord>,
    pub(crate) verdicts: Vec<VerdictRecord>,
    pub(crate) crypto: BTreeMap<String, String>,
    pub(crate) canonical: Vec<u8>,
}

impl CrofDocument {
    pub fn meta(&self) -> &MetaSection {
        &self.meta
    }

    pub fn inputs(&self) -> &InputsSection {
        &self.inputs
    }

    pub fn result(&self) -> &ResultSection {
        &self.result
    }

    pub fn paths(&self) -> &[PathRecord] {
        &self.paths
    }

    pub fn forks(&self) -> &[ForkRecord] {
        &self.forks
    }

    pub fn exclusions(&self) -> &[ExclusionRecord] {
        &self.exclusions
    }

    pub fn verdicts(&self) -> &[VerdictRecord] {
        &self.verdicts
    }

    pub fn crypto(&self) -> &BTreeMap<String, String> {
        &self.crypto
    }

    pub fn canonical_bytes(&self) -> &[u8] {
        &self.canonical
    }

    pub fn cid(&self) -> String {
        xdao_core::cid::compute(&self.canonical)
    }
}
