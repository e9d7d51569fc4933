//! The [`Reading`] value type: one location's latest temperature and the moment it was recorded.

use chrono::{Local, NaiveDateTime, SubsecRound};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire format of [`Reading::last_updated`], e.g. `16-10-2026 14:05:09`.
pub const TIMESTAMP_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// The latest temperature of one catalog location.
///
/// Timestamps are local wall-clock times with second precision; any sub-second
/// component is discarded on construction so that a reading survives a round trip
/// through the snapshot file unchanged.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use citytemp::Reading;
///
/// let at = NaiveDate::from_ymd_opt(2024, 1, 12)
///     .unwrap()
///     .and_hms_milli_opt(9, 30, 15, 750)
///     .unwrap();
/// let reading = Reading::new("Lviv", -4, at);
/// assert_eq!(reading.last_updated.to_string(), "2024-01-12 09:30:15");
/// assert_eq!(reading.to_string(), "Lviv, -4 °C");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reading {
    /// Display name of the location, unique within a store.
    pub name: String,
    /// Temperature in whole degrees Celsius.
    pub temperature: i32,
    /// When `temperature` was last refreshed.
    #[serde(with = "timestamp")]
    pub last_updated: NaiveDateTime,
}

impl Reading {
    pub fn new(name: impl Into<String>, temperature: i32, last_updated: NaiveDateTime) -> Self {
        Self {
            name: name.into(),
            temperature,
            last_updated: last_updated.trunc_subsecs(0),
        }
    }

    /// Placeholder reading used when no snapshot exists yet.
    pub fn zeroed(name: impl Into<String>, at: NaiveDateTime) -> Self {
        Self::new(name, 0, at)
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {} °C", self.name, self.temperature)
    }
}

/// Current local time truncated to whole seconds.
pub fn now_local() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(0)
}

mod timestamp {
    use super::TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 11, 5)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_serializes_timestamp_in_day_first_format() {
        let reading = Reading::new("Одеса", 15, at(8, 3, 59));
        let json = serde_json::to_value(&reading).unwrap();

        assert_eq!(json["name"], "Одеса");
        assert_eq!(json["temperature"], 15);
        assert_eq!(json["last_updated"], "05-11-2023 08:03:59");
    }

    #[test]
    fn test_rejects_malformed_timestamp() {
        let raw = r#"{"name": "Kyiv", "temperature": 3, "last_updated": "2023-11-05T08:03:59"}"#;
        assert!(serde_json::from_str::<Reading>(raw).is_err());
    }

    #[test]
    fn test_new_discards_subsecond_precision() {
        let precise = at(23, 59, 59).with_nanosecond(999_999_999).unwrap();
        let reading = Reading::new("Sumy", -12, precise);
        assert_eq!(reading.last_updated, at(23, 59, 59));
    }

    #[test]
    fn test_now_local_has_whole_seconds() {
        assert_eq!(now_local().nanosecond(), 0);
    }
}
