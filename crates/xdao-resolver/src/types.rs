//! The resolver's output data model: `Resolution` and its constituents.

/// The overall outcome of a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Resolved,
    Forked,
    Unresolved,
    Revoked,
}

impl State {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Resolved => "Resolved",
            Self::Forked => "Forked",
            Self::Unresolved => "Unresolved",
            Self::Revoked => "Revoked",
        }
    }
}

/// The resolver's confidence in [`State`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    High,
    Medium,
    Low,
    Undefined,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
            Self::Undefined => "Undefined",
        }
    }
}

/// Per-input evidence, one per attestation blob supplied to the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    /// The attestation's CATF CID, or the raw-bytes CID when it could not
    /// be canonicalized at all.
    pub cid: String,
    /// Set instead of relying on `cid` alone when the input never made it
    /// past canonicalization — CROF's `INPUTS` section distinguishes
    /// `Attestation-CID` (parseable) from `Input-Hash` (not).
    pub parseable: bool,
    pub issuer_key: Option<String>,
    pub claim_type: Option<String>,
    pub attested_subject_cid: Option<String>,
    pub trusted: bool,
    pub trust_roles: Vec<String>,
    pub revoked: bool,
    pub revoked_by: Vec<String>,
    pub status: String,
    pub reasons: Vec<String>,
    pub excluded_reason: Option<String>,
}

impl Verdict {
    pub(crate) fn excluded(cid: String, parseable: bool, reason: &str) -> Self {
        Self {
            cid,
            parseable,
            issuer_key: None,
            claim_type: None,
            attested_subject_cid: None,
            trusted: false,
            trust_roles: Vec::new(),
            revoked: false,
            revoked_by: Vec::new(),
            status: "excluded".to_string(),
            reasons: vec![reason.to_string()],
            excluded_reason: Some(reason.to_string()),
        }
    }

    /// The stable sort key from `spec.md` §4.7 step 4.
    pub(crate) fn sort_key(&self) -> impl Ord + '_ {
        (
            self.cid.clone(),
            self.excluded_reason.clone().unwrap_or_default(),
            self.issuer_key.clone().unwrap_or_default(),
            self.claim_type.clone().unwrap_or_default(),
            self.attested_subject_cid.clone().unwrap_or_default(),
            self.status.clone(),
            !self.trusted,
            self.revoked,
            self.trust_roles.join(","),
            self.reasons.join(","),
            self.revoked_by.join(","),
        )
    }
}

/// Per-rule evidence, one per `Require` rule in the policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyVerdict {
    pub claim_type: String,
    pub role: String,
    pub quorum: u32,
    pub observed: u32,
    pub satisfied: bool,
    pub issuer_keys: Vec<String>,
    pub reasons: Vec<String>,
}

/// A linear chain of attestation CIDs, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    pub id: String,
    pub attestation_cids: Vec<String>,
}

/// A set of conflicting [`Path`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fork {
    pub id: String,
    pub path_ids: Vec<String>,
}

/// A reason a single input did not participate in the active evidence set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exclusion {
    pub attestation_cid: Option<String>,
    pub input_hash: Option<String>,
    pub reason: String,
}

/// The fully deterministic output of a resolver run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The subject CID for subject resolution; the resolved `Points-To`
    /// target for a single-head name resolution; empty when name
    /// resolution has no unique target (forked, unresolved, revoked).
    pub subject: String,
    pub state: State,
    pub confidence: Confidence,
    pub paths: Vec<Path>,
    pub forks: Vec<Fork>,
    pub exclusions: Vec<Exclusion>,
    pub verdicts: Vec<Verdict>,
    pub policy_verdicts: Vec<PolicyVerdict>,
}
