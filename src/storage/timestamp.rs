//! Timestamp codec for the blob boundary
//!
//! Instants are written as RFC 3339 text in UTC with as many fractional
//! digits as needed, so a value read back compares equal to the one written.
//! Any RFC 3339 offset is accepted on read and normalized to UTC.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer};

use crate::errors::Result;

pub fn format(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

pub fn parse(text: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(text.trim())?.with_timezone(&Utc))
}

pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format(dt))
}

pub fn deserialize<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    parse(&text).map_err(|e| serde::de::Error::custom(e.message().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_is_utc_with_z_suffix() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        assert_eq!(format(&dt), "2024-03-01T12:30:00Z");
    }

    #[test]
    fn test_sub_second_precision_survives() {
        let dt = Utc::now();
        assert_eq!(parse(&format(&dt)).unwrap(), dt);
    }

    #[test]
    fn test_parse_millisecond_iso_strings() {
        let dt = parse("2024-03-01T12:30:00.123Z").unwrap();
        assert_eq!(dt.timestamp_subsec_millis(), 123);
    }

    #[test]
    fn test_parse_normalizes_offsets() {
        let dt = parse("2024-03-01T20:30:00+08:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = parse("yesterday").unwrap_err();
        assert_eq!(err.code(), "E010");
    }
}
