//! # Temporal Types
//!
//! UTC-only timestamp type for the Entitle client stack. All timestamps
//! are stored in UTC with second-level precision and a `Z` suffix in
//! serialized form.
//!
//! Validation time-to-live values flow through here: the wire carries an
//! RFC 3339 text form, and expiry arithmetic stays in UTC so a cached
//! validation result means the same thing on every machine that reads it.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TimestampError;

/// A UTC timestamp with second-level precision.
///
/// Serializes to ISO 8601 format with `Z` suffix (e.g.,
/// `2026-08-05T12:00:00Z`). Subsecond precision is truncated in the
/// canonical text form so digest computation stays deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp representing the current UTC time.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Create a timestamp from a `chrono::DateTime<Utc>`.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Parse an RFC 3339 date-time, normalizing to UTC.
    ///
    /// # Errors
    ///
    /// Returns [`TimestampError::Invalid`] carrying the offending input and
    /// the parser's reason.
    pub fn parse(value: &str) -> Result<Self, TimestampError> {
        DateTime::parse_from_rfc3339(value)
            .map(|dt| Self(dt.with_timezone(&Utc)))
            .map_err(|e| TimestampError::Invalid {
                value: value.to_string(),
                reason: e.to_string(),
            })
    }

    /// Access the underlying `chrono::DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// This timestamp shifted forward by `minutes` (negative shifts back).
    pub fn plus_minutes(&self, minutes: i64) -> Self {
        Self(self.0 + Duration::minutes(minutes))
    }

    /// Return the timestamp as an ISO 8601 string with Z suffix,
    /// truncated to seconds (matching canonicalization rules).
    pub fn to_canonical_string(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_canonical_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_roundtrip() {
        let ts = Timestamp::parse("2026-08-05T12:00:00Z").unwrap();
        assert_eq!(ts.to_canonical_string(), "2026-08-05T12:00:00Z");
    }

    #[test]
    fn parse_normalizes_offset_to_utc() {
        let ts = Timestamp::parse("2026-08-05T14:00:00+02:00").unwrap();
        assert_eq!(ts.to_canonical_string(), "2026-08-05T12:00:00Z");
    }

    #[test]
    fn parse_rejects_garbage_with_context() {
        let err = Timestamp::parse("next tuesday").unwrap_err();
        assert!(format!("{err}").contains("next tuesday"));
    }

    #[test]
    fn canonical_string_truncates_subseconds() {
        let ts = Timestamp::parse("2026-08-05T12:00:00.987Z").unwrap();
        assert_eq!(ts.to_canonical_string(), "2026-08-05T12:00:00Z");
    }

    #[test]
    fn plus_minutes_orders() {
        let ts = Timestamp::parse("2026-08-05T12:00:00Z").unwrap();
        let later = ts.plus_minutes(60);
        assert!(later > ts);
        assert_eq!(later.to_canonical_string(), "2026-08-05T13:00:00Z");
    }

    #[test]
    fn now_is_close_to_chrono_now() {
        let before = Utc::now();
        let ts = Timestamp::now();
        let after = Utc::now();
        assert!(*ts.as_datetime() >= before && *ts.as_datetime() <= after);
    }
}
