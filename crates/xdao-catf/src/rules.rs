//! Stable rule identifiers for CATF canonicalization and parsing.
//!
//! See `spec.md` §4.2 for the rules these ids name.

pub const NOT_UTF8: &str = "CATF-STR-001";
pub const HAS_CR: &str = "CATF-CANON-001";
pub const HAS_BOM: &str = "CATF-CANON-002";
pub const TRAILING_NEWLINE: &str = "CATF-CANON-003";
pub const BAD_PREAMBLE_POSTAMBLE: &str = "CATF-STR-010";
pub const TRAILING_LINE_WS: &str = "CATF-STR-030";
pub const UNSORTED_OR_DUPLICATE_KEYS: &str = "CATF-CANON-020";
pub const NON_CANONICAL_BYTE_IDENTITY: &str = "CATF-CANON-030";
pub const BAD_SECTION_STRUCTURE: &str = "CATF-PARSE-010";
pub const BAD_KEY_VALUE_LINE: &str = "CATF-PARSE-020";
pub const MISSING_SIGNATURE_SENTINEL: &str = "CATF-PARSE-030";
