//! # xdao-crof — Canonical Resolver Output Format
//!
//! Canonicalization, structural parsing, and rendering of CROF
//! documents — the canonical record of a single [`xdao_resolver`] run —
//! plus the cross-document supersession check and the optional
//! resolver-signature protocol anchored to `xdao-crypto`'s Ed25519
//! support.
//!
//! Unlike CATF, a canonical CROF document ends with exactly one
//! trailing newline ([`canonicalize`]/[`parse`] enforce this).

mod build;
mod canonicalize;
pub mod document;
mod render;
pub mod rules;
mod supersession;
mod verify;

pub use build::build;
pub use canonicalize::{canonicalize, parse};
pub use document::CrofDocument;
pub use render::render;
pub use supersession::validate_supersession;
pub use verify::{sign, verify};
