//! # xdao-crypto — CATF Cryptography
//!
//! Issuer-key parsing, digest families, signature algorithms, and the
//! full verification procedure of `spec.md` §4.4, anchored to the
//! signature scope [`xdao_catf::CatfDocument::signature_scope`] derives
//! from canonical bytes.
//!
//! Ed25519 ([`ed25519`]) is mandatory and always compiled in. Dilithium3
//! ([`dilithium3`]) is optional, behind the `dilithium3` Cargo feature —
//! without it, `Signature-Alg: dilithium3` and `dilithium3:`-prefixed
//! issuer keys are simply unrecognized algorithm names.
//!
//! ## Crate Policy
//!
//! - No `unsafe` code, no panics outside tests.
//! - Private key material never implements `Debug`/`Serialize` in a way
//!   that exposes raw bytes.

pub mod digest_alg;
#[cfg(feature = "dilithium3")]
pub mod dilithium3;
pub mod ed25519;
pub mod issuer_key;
pub mod rules;
pub mod signature_alg;
pub mod verify;

pub use digest_alg::DigestAlg;
pub use issuer_key::IssuerKey;
pub use signature_alg::SignatureAlg;
pub use verify::verify;
