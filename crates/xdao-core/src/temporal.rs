//! # RFC 3339 UTC Timestamps
//!
//! CROF's optional `META.Resolved-At` field is an RFC 3339 UTC timestamp.
//! This module provides strict parse/format matching that requirement —
//! no local offsets, no sub-second ambiguity in output.
//!
//! ## Implements
//!
//! Spec §4.6 — CROF `META` section, `Resolved-At` key.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::XdaoError;

/// A UTC timestamp rendered and parsed in RFC 3339 form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Wrap an existing UTC `DateTime`.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    /// Parse an RFC 3339 string. The offset need not already be `Z`; it is
    /// converted to UTC. This matches resolver ingestion, which accepts
    /// any valid RFC 3339 `Resolved-At` value and is strict only about the
    /// canonical *rendering* (§4.6's `Value` shape requirement is about the
    /// CROF text grammar, not timezone representation of this field).
    pub fn parse(rule_id: &'static str, s: &str) -> Result<Self, XdaoError> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| Self(dt.with_timezone(&Utc)))
            .map_err(|e| XdaoError::validation(rule_id, format!("invalid RFC 3339 timestamp {s:?}: {e}")))
    }

    /// Render in RFC 3339 with second precision and a literal `Z` suffix.
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_through_rfc3339() {
        let ts = Timestamp::parse("TEST-VAL-001", "2026-01-15T12:00:00Z").unwrap();
        assert_eq!(ts.to_rfc3339(), "2026-01-15T12:00:00Z");
    }

    #[test]
    fn normalizes_offset_to_utc() {
        let ts = Timestamp::parse("TEST-VAL-001", "2026-01-15T14:00:00+02:00").unwrap();
        assert_eq!(ts.to_rfc3339(), "2026-01-15T12:00:00Z");
    }

    #[test]
    fn rejects_malformed_timestamp() {
        assert!(Timestamp::parse("TEST-VAL-001", "not-a-timestamp").is_err());
    }
}
