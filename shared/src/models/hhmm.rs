//! `HH:MM` serde format for [`NaiveTime`]
//!
//! Use with `#[serde(with = "crate::models::hhmm")]`. Seconds are accepted
//! on input (`HH:MM:SS`) and dropped.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serializer};

pub const FORMAT: &str = "%H:%M";

pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&time.format(FORMAT).to_string())
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid time '{raw}', expected HH:MM")))
}

/// Parse `HH:MM` (or `HH:MM:SS`), truncated to the minute
pub fn parse(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw, FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .ok()
        .and_then(|t| NaiveTime::from_hms_opt(t.hour(), t.minute(), 0))
}

/// Minutes since midnight
pub fn minute_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Inverse of [`minute_of_day`]; `None` past 23:59
pub fn from_minute_of_day(minutes: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(serde::Serialize, serde::Deserialize)]
    struct Slot {
        #[serde(with = "super")]
        time: NaiveTime,
    }

    #[test]
    fn serializes_without_seconds() {
        let slot = Slot {
            time: NaiveTime::from_hms_opt(9, 5, 0).unwrap(),
        };
        assert_eq!(serde_json::to_string(&slot).unwrap(), r#"{"time":"09:05"}"#);
    }

    #[test]
    fn accepts_seconds_and_rejects_garbage() {
        let slot: Slot = serde_json::from_str(r#"{"time":"14:30:59"}"#).unwrap();
        assert_eq!(slot.time, NaiveTime::from_hms_opt(14, 30, 0).unwrap());
        assert!(serde_json::from_str::<Slot>(r#"{"time":"25:00"}"#).is_err());
        assert!(serde_json::from_str::<Slot>(r#"{"time":"noon"}"#).is_err());
    }

    #[test]
    fn minute_of_day_round_trips_within_a_day() {
        let t = NaiveTime::from_hms_opt(17, 45, 0).unwrap();
        assert_eq!(minute_of_day(t), 1065);
        assert_eq!(from_minute_of_day(1065), Some(t));
        assert_eq!(from_minute_of_day(24 * 60), None);
    }
}
