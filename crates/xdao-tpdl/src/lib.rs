//! # xdao-tpdl — Trust Policy Domain Language
//!
//! Parses TPDL policy documents into trust entries, `Require` rules, and a
//! supersession allow-list, in either permissive or strict compliance
//! mode. See [`parse::parse`] and [`parse::ComplianceMode`].
//!
//! ## Crate Policy
//!
//! - No `unsafe` code, no panics outside tests.
//! - Depends only on `xdao-core`.

mod parse;
mod policy;
pub mod rules;

pub use parse::{parse, ComplianceMode};
pub use policy::{RequireRule, TpdlPolicy, TrustEntry};
