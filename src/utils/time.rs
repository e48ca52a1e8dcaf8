//! Timestamp utilities: DB encoding and parsing of `--at` overrides.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, SecondsFormat, Utc};

/// Encode a timestamp for storage. Fixed-width UTC with milliseconds, so
/// lexical order in SQLite equals chronological order.
pub fn to_db_ts(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Decode a stored timestamp.
pub fn from_db_ts(s: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| AppError::InvalidTimestamp(s.to_string()))
}

/// Parse a user-supplied RFC 3339 timestamp (any offset).
pub fn parse_timestamp(s: &str) -> AppResult<DateTime<Utc>> {
    from_db_ts(s.trim())
}
