//! Stable rule identifiers for CROF canonicalization, parsing, and
//! signature verification.

pub const NOT_UTF8: &str = "CROF-PARSE-001";
pub const HAS_CR: &str = "CROF-PARSE-002";
pub const HAS_BOM: &str = "CROF-PARSE-003";
pub const MISSING_TRAILING_NEWLINE: &str = "CROF-PARSE-004";
pub const TRAILING_LINE_WS: &str = "CROF-PARSE-005";
pub const BAD_PREAMBLE_POSTAMBLE: &str = "CROF-PARSE-006";
pub const BAD_SECTION_STRUCTURE: &str = "CROF-PARSE-007";
pub const BAD_KEY_VALUE_LINE: &str = "CROF-PARSE-008";
pub const UNSORTED_OR_DUPLICATE_KEYS: &str = "CROF-PARSE-009";
pub const MISSING_REQUIRED_FIELD: &str = "CROF-VAL-101";
pub const BAD_INPUTS_ORDERING: &str = "CROF-VAL-102";
pub const BAD_SORT_ORDER: &str = "CROF-VAL-103";
pub const INCOMPLETE_RECORD: &str = "CROF-VAL-104";
pub const INVALID_TIMESTAMP: &str = "CROF-VAL-105";
pub const NON_CANONICAL_BYTE_IDENTITY: &str = "CROF-CANON-201";
pub const SUPERSESSION_MISMATCH: &str = "CROF-SUPER-301";
pub const MISSING_SIGNATURE_SENTINEL: &str = "CROF-CRYPTO-401";
pub const MULTIPLE_SIGNATURE_LINES: &str = "CROF-CRYPTO-402";
pub const INVALID_SIGNATURE: &str = "CROF-CRYPTO-403";
