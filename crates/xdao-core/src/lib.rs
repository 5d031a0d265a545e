//! # xdao-core — Foundational Types for the Canonical Attestation Stack
//!
//! Every other crate in this workspace depends on `xdao-core`; it depends
//! on nothing internal. It defines:
//!
//! 1. The [`cid`] primitive — CIDv1(raw, sha2-256) over canonical bytes.
//! 2. [`linetext`] — the shared byte-level line discipline CATF, TPDL, and
//!    CROF all enforce before applying their own section grammars.
//! 3. [`error`] — the stable `{kind, rule_id, message}` error taxonomy.
//! 4. [`temporal`] — RFC 3339 UTC timestamps for CROF's `Resolved-At`.
//! 5. [`cas`] — the minimal content-addressed storage contract the
//!    resolver consumes when given references instead of bytes.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `xdao-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests and the documented
//!   unreachable case in [`cid::compute`].

pub mod cas;
pub mod cid;
pub mod error;
pub mod linetext;
pub mod temporal;

pub use cas::{CasError, ContentStore};
pub use error::{ErrorKind, XdaoError, XdaoResult};
pub use temporal::Timestamp;
