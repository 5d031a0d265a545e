//! Strict-mode resolution.
//!
//! Strict mode never changes how evidence is weighed — it is a pass/fail
//! wrapper over the permissive algorithm's own outputs. `spec.md` §4.7:
//! a strict resolution must reject whenever the permissive resolution
//! recorded *any* exclusion, or landed on anything but `Resolved`. The
//! TPDL side of strictness (an explicit `Quorum` on every `Require`
//! block) is enforced earlier, at policy-parse time, by
//! [`xdao_tpdl::ComplianceMode::Strict`] — a strict resolution is
//! meaningless against a policy that was parsed permissively, so callers
//! must supply a `TpdlPolicy` obtained that way.

use xdao_tpdl::TpdlPolicy;

use crate::resolve::resolve;
use crate::resolve_name::resolve_name;
use crate::types::{Resolution, State};

/// The result of a strict resolution: either the unmodified permissive
/// [`Resolution`], or the reason it was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrictOutcome {
    Accepted(Resolution),
    Rejected { resolution: Resolution, reason: String },
}

/// Run subject resolution, then apply the strict-mode pass/fail gate.
pub fn resolve_strict(attestation_blobs: &[Vec<u8>], policy: &TpdlPolicy, subject: &str) -> StrictOutcome {
    gate(resolve(attestation_blobs, policy, subject))
}

/// Run name resolution, then apply the strict-mode pass/fail gate.
pub fn resolve_name_strict(
    attestation_blobs: &[Vec<u8>],
    policy: &TpdlPolicy,
    name: &str,
    version: Option<&str>,
) -> StrictOutcome {
    gate(resolve_name(attestation_blobs, policy, name, version))
}

fn gate(resolution: Resolution) -> StrictOutcome {
    if !resolution.exclusions.is_empty() {
        let reason = format!("{} input(s) were excluded during resolution", resolution.exclusions.len());
        return StrictOutcome::Rejected { resolution, reason };
    }
    if resolution.state != State::Resolved {
        let reason = format!("resolution state is {}, not Resolved", resolution.state.as_str());
        return StrictOutcome::Rejected { resolution, reason };
    }
    StrictOutcome::Accepted(resolution)
}
