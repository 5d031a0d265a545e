//! Stable rule identifiers the resolver itself raises.
//!
//! Per-attestation and per-rule failures during resolution are not
//! propagated as errors — they become `Verdict`/`PolicyVerdict` records
//! (see `spec.md` §7). The ids here are for the few cases where the
//! resolver's own *inputs* are malformed (the policy, or the resolution
//! request itself), which are hard failures.

pub const BAD_POLICY: &str = "RESOLVER-PARSE-001";

/// The single rule id used for every "claim is missing a required field"
/// case, across all five claim types. `spec.md` §6 cites this exact id as
/// its example of a Validation-kind rule id.
pub const MISSING_REQUIRED_CLAIM_FIELD: &str = "CATF-VAL-211";
