//! # xdao-catf — Canonical Attestation Text Format
//!
//! The byte-level canonicalizer, structural parser, and renderer for CATF
//! attestations, plus [`document::CatfDocument::signature_scope`] — the
//! exact byte range `xdao-crypto` signs and verifies over.
//!
//! [`parse`] is the only entry point that accepts untrusted bytes. It
//! enforces, in order: UTF-8 validity, absence of CR, absence of a BOM,
//! absence of a trailing newline, an exact preamble/postamble, no line
//! ending in trailing whitespace, the four-section structure with single
//! blank-line separators, `Key: Value` line shape, and strictly ascending
//! section keys. A document that survives all of that is then re-rendered
//! from its own parsed fields and rejected unless the render reproduces
//! the input byte-for-byte — this is what makes a live [`CatfDocument`] a
//! proof that its bytes are the unique canonical form of their own
//! content, not merely "some document that parses".
//!
//! ## Crate Policy
//!
//! - No `unsafe` code, no panics outside tests (the one `.expect()` in
//!   [`document::CatfDocument::signature_scope`] is on a postcondition
//!   established by [`parse`], not on untrusted input).
//! - Depends only on `xdao-core` — no cryptography, no resolver logic.

mod canonicalize;
mod document;
mod render;
pub mod rules;

pub use canonicalize::{canonicalize, parse};
pub use document::CatfDocument;
pub use render::render;
