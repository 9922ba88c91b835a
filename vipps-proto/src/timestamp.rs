//! Timestamp handling for provider payloads.
//!
//! The provider sends ISO-8601 timestamps with fractional seconds and a
//! trailing `Z`, e.g. `2017-07-31T15:07:37.100Z`. Callers only ever see
//! second precision: the fractional part is discarded on parse, so two
//! payloads that differ only in milliseconds yield equal Models.
//!
//! Timestamps are never a reason to reject a payload. Absent, `null`,
//! non-string or unparseable values all become `None`.

use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// Local date-time without an offset, read as UTC.
const NAIVE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"
);

/// Parses a provider timestamp, truncated to whole seconds in UTC.
///
/// Accepts RFC 3339 (`2017-07-31T15:07:37.100Z`, `2017-07-31T17:07:37+02:00`)
/// and, as a fallback, an offset-less `2017-07-31T15:07:37.100` which is
/// taken to be UTC.
///
/// # Example
///
/// ```rust
/// use vipps_proto::timestamp::parse_timestamp;
///
/// let ts = parse_timestamp("2017-07-31T15:07:37.100Z").unwrap();
/// assert_eq!(ts.nanosecond(), 0);
/// assert_eq!(ts.second(), 37);
/// assert!(parse_timestamp("yesterday").is_none());
/// ```
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    let parsed = OffsetDateTime::parse(raw, &Rfc3339)
        .or_else(|_| PrimitiveDateTime::parse(raw, NAIVE_FORMAT).map(PrimitiveDateTime::assume_utc))
        .ok()?;
    parsed.to_offset(UtcOffset::UTC).replace_nanosecond(0).ok()
}

/// Serde adapter for `Option<OffsetDateTime>` fields that must not fail.
///
/// Use together with `#[serde(default)]` so that an absent key also maps
/// to `None`.
pub mod lenient {
    use super::{
        Deserialize, Deserializer, OffsetDateTime, Rfc3339, Serializer, Value, parse_timestamp,
    };

    /// Serializes as an RFC 3339 string, or `null` when absent.
    ///
    /// # Errors
    ///
    /// Returns the serializer's error if the timestamp cannot be formatted.
    #[allow(clippy::ref_option)]
    pub fn serialize<S>(value: &Option<OffsetDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => {
                let formatted = ts.format(&Rfc3339).map_err(serde::ser::Error::custom)?;
                serializer.serialize_str(&formatted)
            }
            None => serializer.serialize_none(),
        }
    }

    /// Deserializes any JSON value, keeping only parseable timestamp strings.
    ///
    /// # Errors
    ///
    /// Only fails if the underlying deserializer itself fails.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::String(raw)) => parse_timestamp(&raw),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use time::macros::datetime;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Stamped {
        #[serde(default, with = "lenient", rename = "timeStamp")]
        time_stamp: Option<OffsetDateTime>,
    }

    #[test]
    fn test_parse_millis_truncates_to_seconds() {
        let ts = parse_timestamp("2017-07-31T15:07:37.100Z").unwrap();
        assert_eq!(ts, datetime!(2017-07-31 15:07:37 UTC));
    }

    #[test]
    fn test_parse_single_fraction_digit() {
        let ts = parse_timestamp("2017-07-31T15:07:37.0Z").unwrap();
        assert_eq!(ts, datetime!(2017-07-31 15:07:37 UTC));
    }

    #[test]
    fn test_parse_offset_normalized_to_utc() {
        let ts = parse_timestamp("2017-07-31T17:07:37.999+02:00").unwrap();
        assert_eq!(ts, datetime!(2017-07-31 15:07:37 UTC));
        assert_eq!(ts.offset(), UtcOffset::UTC);
    }

    #[test]
    fn test_parse_without_offset_assumes_utc() {
        let ts = parse_timestamp("2017-07-31T15:07:37.100").unwrap();
        assert_eq!(ts, datetime!(2017-07-31 15:07:37 UTC));
        assert!(parse_timestamp("2017-07-31T15:07:37").is_some());
    }

    #[test]
    fn test_parse_garbage_is_none() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("31.07.2017").is_none());
        assert!(parse_timestamp("2017-13-31T15:07:37Z").is_none());
    }

    #[test]
    fn test_lenient_absent_null_and_wrong_type() {
        let absent: Stamped = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.time_stamp, None);
        let null: Stamped = serde_json::from_str(r#"{"timeStamp":null}"#).unwrap();
        assert_eq!(null.time_stamp, None);
        let number: Stamped = serde_json::from_str(r#"{"timeStamp":1501513657}"#).unwrap();
        assert_eq!(number.time_stamp, None);
        let invalid: Stamped = serde_json::from_str(r#"{"timeStamp":"not a date"}"#).unwrap();
        assert_eq!(invalid.time_stamp, None);
    }

    #[test]
    fn test_lenient_serializes_whole_seconds() {
        let stamped: Stamped =
            serde_json::from_str(r#"{"timeStamp":"2017-07-31T15:07:37.100Z"}"#).unwrap();
        let json = serde_json::to_string(&stamped).unwrap();
        assert_eq!(json, r#"{"timeStamp":"2017-07-31T15:07:37Z"}"#);
        let back: Stamped = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stamped);
    }
}
