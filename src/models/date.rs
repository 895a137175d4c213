//! Strict ISO-8601 date handling
//!
//! Transaction dates persist as UTC timestamps with exactly millisecond
//! precision (`YYYY-MM-DDTHH:MM:SS.mmmZ`). The serde module here enforces
//! that format on both ends; anything looser is a validation failure.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

/// The canonical stored date format: ISO-8601 UTC, millisecond precision
pub const ISO_MILLIS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Format a timestamp in the canonical stored form
pub fn format_iso_millis(dt: &DateTime<Utc>) -> String {
    dt.format(ISO_MILLIS_FORMAT).to_string()
}

/// Parse a timestamp in the canonical stored form, rejecting anything else
pub fn parse_iso_millis(s: &str) -> Option<DateTime<Utc>> {
    let dt = NaiveDateTime::parse_from_str(s, ISO_MILLIS_FORMAT)
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))?;

    // chrono accepts non-zero-padded numeric fields; only the canonical
    // rendering is a valid stored date
    if format_iso_millis(&dt) == s {
        Some(dt)
    } else {
        None
    }
}

/// Drop any sub-millisecond component of a timestamp
///
/// The stored form carries exactly millisecond precision; anything finer
/// cannot round-trip through it.
pub fn truncate_to_millis(dt: DateTime<Utc>) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(dt.timestamp_millis())
        .single()
        .unwrap_or(dt)
}

/// Whether a timestamp is representable in the stored form without loss
pub fn is_millis_precision(dt: &DateTime<Utc>) -> bool {
    dt.timestamp_subsec_nanos() % 1_000_000 == 0
}

/// Serde adapter for `DateTime<Utc>` fields in the canonical format
pub mod iso_millis {
    use chrono::{DateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_iso_millis(dt))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        super::parse_iso_millis(&s).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "expected ISO-8601 UTC date with millisecond precision, got {:?}",
                s
            ))
        })
    }
}
