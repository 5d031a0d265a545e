//! # Content-Addressed Storage Adapter Contract
//!
//! The resolver may be invoked with input references (CIDs) instead of raw
//! bytes. This module defines the minimal capability the resolver needs
//! from a content-addressed store, as a trait the host application
//! implements — the local filesystem store, an IPFS shell-out, and a gRPC
//! client are all external collaborators per `spec.md` §1 and are not
//! implemented here.
//!
//! ## Security Invariant
//!
//! The resolver treats an implementation of [`ContentStore`] as a pure
//! black box: it never retries a failed call and never mutates through the
//! trait. Implementations are responsible for verifying that bytes
//! returned from [`ContentStore::get`] re-hash to the requested CID; the
//! [`verify_round_trip`] helper is provided so implementations don't have
//! to hand-roll that check.
//!
//! ## Implements
//!
//! Spec §4.8 — CAS adapter contract.

use thiserror::Error;

use crate::cid;

/// Errors surfaced by a [`ContentStore`] implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CasError {
    /// No content is stored under the requested identifier.
    #[error("no content stored under cid {0}")]
    NotFound(String),
    /// The supplied identifier is not a well-formed CID.
    #[error("invalid content identifier: {0}")]
    InvalidIdentifier(String),
    /// The bytes returned by the store do not hash to the requested CID.
    #[error("content mismatch: requested {requested}, stored content hashes to {actual}")]
    Mismatch { requested: String, actual: String },
    /// An attempt was made to overwrite or remove previously stored content.
    #[error("immutability violation for cid {0}")]
    ImmutabilityViolation(String),
}

/// The minimal content-addressed storage contract the resolver consumes.
///
/// `put` is idempotent: storing the same bytes twice returns the same CID
/// without error. `get` on an absent CID fails with
/// [`CasError::NotFound`], distinct from any other failure. Neither method
/// is ever called by the resolver in a retry loop — a single failed call is
/// surfaced to the resolver's caller as-is.
pub trait ContentStore {
    /// Store `bytes`, returning their CID. Idempotent.
    fn put(&mut self, bytes: &[u8]) -> Result<String, CasError>;

    /// Retrieve the bytes previously stored under `id`.
    ///
    /// Implementations must verify the returned bytes re-hash to `id`
    /// before returning them — see [`verify_round_trip`].
    fn get(&self, id: &str) -> Result<Vec<u8>, CasError>;

    /// Whether content is stored under `id`, without fetching it.
    fn has(&self, id: &str) -> Result<bool, CasError>;
}

/// Verify that `bytes` hash to `requested`, the CID a [`ContentStore::get`]
/// implementation was asked to resolve.
///
/// Implementations of [`ContentStore::get`] should call this immediately
/// before returning bytes read from their backing medium, so that
/// corruption or substitution is caught at the boundary rather than
/// silently propagated into the resolver.
pub fn verify_round_trip(requested: &str, bytes: &[u8]) -> Result<(), CasError> {
    let actual = cid::compute(bytes);
    if actual == requested {
        Ok(())
    } else {
        Err(CasError::Mismatch {
            requested: requested.to_string(),
            actual,
        })
    }
}
