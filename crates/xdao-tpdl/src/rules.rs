//! Stable rule identifiers for TPDL parsing.

pub const NOT_UTF8: &str = "TPDL-STR-001";
pub const HAS_CR: &str = "TPDL-CANON-001";
pub const HAS_BOM: &str = "TPDL-CANON-002";
pub const TRAILING_NEWLINE: &str = "TPDL-CANON-003";
pub const BAD_PREAMBLE_POSTAMBLE: &str = "TPDL-STR-010";
pub const TRAILING_LINE_WS: &str = "TPDL-STR-030";
pub const BAD_SECTION_STRUCTURE: &str = "TPDL-PARSE-010";
pub const BAD_KEY_VALUE_LINE: &str = "TPDL-PARSE-020";
pub const BAD_META: &str = "TPDL-PARSE-030";
pub const BAD_TRUST_ENTRY: &str = "TPDL-PARSE-040";
pub const BAD_RULE_BLOCK: &str = "TPDL-PARSE-050";
pub const UNKNOWN_BLOCK_KEY: &str = "TPDL-PARSE-051";
pub const MISSING_EXPLICIT_QUORUM: &str = "TPDL-STRICT-001";
pub const INVALID_QUORUM: &str = "TPDL-VAL-010";
