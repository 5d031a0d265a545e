//! Stable rule identifiers for CATF cryptographic verification.
//!
//! Lives in the `CATF-CRYPTO-*` namespace alongside the canonicalizer's
//! `CATF-STR-*`/`CATF-CANON-*`/`CATF-PARSE-*` rules, since crypto is a
//! CATF-scoped concern (see `spec.md` §4.4).

pub const MISSING_CRYPTO_FIELD: &str = "CATF-CRYPTO-101";
pub const UNSUPPORTED_ALGORITHM: &str = "CATF-CRYPTO-102";
pub const ALGORITHM_MISMATCH: &str = "CATF-CRYPTO-103";
pub const MALFORMED_ISSUER_KEY: &str = "CATF-CRYPTO-104";
pub const BAD_BASE64: &str = "CATF-CRYPTO-105";
pub const BAD_KEY_LENGTH: &str = "CATF-CRYPTO-106";
pub const BAD_SIGNATURE_LENGTH: &str = "CATF-CRYPTO-107";
pub const RECANONICALIZATION_FAILED: &str = "CATF-CRYPTO-108";
pub const INVALID_SIGNATURE: &str = "CATF-CRYPTO-401";
