//! Deterministic trust resolution over signed attestations.
//!
//! Given a set of CATF attestation documents and a TPDL trust policy,
//! this crate answers two questions: "what is currently true about this
//! subject" ([`resolve`]) and "what does this name currently point to"
//! ([`resolve_name`]). Both share one pipeline for canonicalization,
//! claim validation, signature verification, trust lookup, and
//! revocation (see `pipeline`), so the two resolution modes can never
//! drift apart on what counts as valid evidence.

mod claims;
mod pipeline;
pub mod resolve;
pub mod resolve_name;
pub mod rules;
pub mod strict;
pub mod types;

pub use resolve::resolve;
pub use resolve_name::resolve_name;
pub use strict::{resolve_name_strict, resolve_strict, StrictOutcome};
pub use types::{Confidence, Exclusion, Fork, Path, PolicyVerdict, Resolution, State, Verdict};
