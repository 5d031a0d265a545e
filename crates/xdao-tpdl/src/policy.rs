//! The parsed TPDL policy and its constituent records.

use std::collections::{BTreeMap, BTreeSet};

/// A `(issuer_key, role)` pair from the `TRUST` section.
///
/// The same issuer key may appear in multiple [`TrustEntry`] records, one
/// per role it is granted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustEntry {
    pub issuer_key: String,
    pub role: String,
}

/// A `(claim_type, role, quorum)` requirement from the `RULES` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequireRule {
    pub claim_type: String,
    pub role: String,
    pub quorum: u32,
}

/// A fully parsed TPDL policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TpdlPolicy {
    pub(crate) trust: Vec<TrustEntry>,
    pub(crate) rules: Vec<RequireRule>,
    pub(crate) supersession_allow_list: Vec<String>,
}

impl TpdlPolicy {
    /// The `TRUST` section's entries, in document order.
    pub fn trust_entries(&self) -> &[TrustEntry] {
        &self.trust
    }

    /// The `RULES` section's `Require` rules, in document order.
    pub fn rules(&self) -> &[RequireRule] {
        &self.rules
    }

    /// The sorted, deduplicated set of roles permitted to issue
    /// `supersedes` claims. Empty means no `Supersedes:` block was
    /// present, which the resolver treats as "no restriction".
    pub fn supersession_allow_list(&self) -> &[String] {
        &self.supersession_allow_list
    }

    /// Build `issuer_key -> {roles}` from the trust entries.
    pub fn trust_index(&self) -> BTreeMap<String, BTreeSet<String>> {
        let mut index: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for entry in &self.trust {
            index.entry(entry.issuer_key.clone()).or_default().insert(entry.role.clone());
        }
        index
    }
}
