//! # Content Identifier — CIDv1(raw, sha2-256)
//!
//! The single identity primitive shared by CATF, TPDL, and CROF: a pure
//! function from canonical bytes to a stable, opaque string.
//!
//! ## Security Invariant
//!
//! `compute()` is unconditionally pure — it does not itself know whether its
//! input is canonical. The refusal described in `spec.md` §3 ("deriving a
//! CID from non-canonical bytes is a programming error") is enforced by
//! construction at the call sites: every canonicalizer in this workspace
//! calls `compute()` only after its own byte-identity check has already
//! succeeded. Application code should do the same — never call `compute()`
//! on bytes that have not been round-tripped through a `canonicalize()` or
//! `parse()` function.
//!
//! ## Implements
//!
//! Spec §4.1 — Content Identifier.

use multihash::Multihash;
use sha2::{Digest, Sha256};

/// The `raw` multicodec (binary blob, no further codec-level structure).
const RAW_CODEC: u64 = 0x55;

/// The `sha2-256` multihash function code.
const SHA2_256_CODE: u64 = 0x12;

/// Multihash digest capacity. 64 bytes comfortably covers SHA-256's 32.
const DIGEST_CAPACITY: usize = 64;

/// Compute the CIDv1(raw, sha2-256) string identifier of `bytes`.
///
/// Equality of the returned string is equality of content. The encoding is
/// the canonical base32-lowercase multibase form that `cid::Cid`'s
/// `Display` implementation produces for CIDv1, giving a total
/// lexicographic order usable for stable sorting.
///
/// # Panics
///
/// Never panics: a 32-byte SHA-256 digest always fits within the 64-byte
/// multihash capacity used here.
pub fn compute(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let mh = Multihash::<DIGEST_CAPACITY>::wrap(SHA2_256_CODE, &digest)
        .expect("sha2-256 digest fits within multihash capacity");
    let cid = cid::Cid::new_v1(RAW_CODEC, mh);
    cid.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_bytes_same_cid() {
        let a = compute(b"hello world");
        let b = compute(b"hello world");
        assert_eq!(a, b);
    }

    #[test]
    fn different_bytes_different_cid() {
        let a = compute(b"hello world");
        let b = compute(b"hello worlds");
        assert_ne!(a, b);
    }

    #[test]
    fn cid_starts_with_base32_multibase_prefix() {
        // CIDv1 default string encoding is multibase base32-lower, prefixed 'b'.
        let c = compute(b"xdao");
        assert!(c.starts_with('b'));
    }

    #[test]
    fn empty_input_is_stable() {
        let a = compute(b"");
        let b = compute(b"");
        assert_eq!(a, b);
    }
}
