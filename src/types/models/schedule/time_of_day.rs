use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

const MINUTES_PER_DAY: u16 = 24 * 60;

static TIME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01]\d|2[0-3]):([0-5]\d)$").expect("valid HH:mm pattern"));

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("'{0}' is not a valid HH:mm time")]
pub struct InvalidTimeOfDay(pub String);

/// Wall-clock time with minute precision, serialized as `HH:mm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub fn from_minutes(minutes: u16) -> Option<Self> {
        (minutes < MINUTES_PER_DAY).then_some(Self(minutes))
    }

    pub fn from_hm(hour: u16, minute: u16) -> Option<Self> {
        if hour >= 24 || minute >= 60 {
            return None;
        }
        Some(Self(hour * 60 + minute))
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    /// Adds a duration, returning `None` when the result would pass midnight.
    pub fn checked_add_minutes(self, minutes: u32) -> Option<Self> {
        let total = u32::from(self.0) + minutes;
        u16::try_from(total).ok().and_then(Self::from_minutes)
    }

    pub fn as_naive_time(self) -> chrono::NaiveTime {
        chrono::NaiveTime::from_num_seconds_from_midnight_opt(u32::from(self.0) * 60, 0)
            .unwrap_or(chrono::NaiveTime::MIN)
    }
}

impl FromStr for TimeOfDay {
    type Err = InvalidTimeOfDay;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let captures = TIME_PATTERN
            .captures(raw)
            .ok_or_else(|| InvalidTimeOfDay(raw.to_string()))?;

        let hour = captures[1]
            .parse::<u16>()
            .map_err(|_| InvalidTimeOfDay(raw.to_string()))?;
        let minute = captures[2]
            .parse::<u16>()
            .map_err(|_| InvalidTimeOfDay(raw.to_string()))?;

        Self::from_hm(hour, minute).ok_or_else(|| InvalidTimeOfDay(raw.to_string()))
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = InvalidTimeOfDay;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("00:00", 0)]
    #[case("09:30", 570)]
    #[case("23:59", 1439)]
    fn parses_valid_times(#[case] raw: &str, #[case] minutes: u16) {
        let time: TimeOfDay = raw.parse().unwrap();
        assert_eq!(time.minutes(), minutes);
        assert_eq!(time.to_string(), raw);
    }

    #[rstest]
    #[case("24:00")]
    #[case("9:30")]
    #[case("09:60")]
    #[case("0930")]
    #[case("")]
    fn rejects_malformed_times(#[case] raw: &str) {
        assert!(raw.parse::<TimeOfDay>().is_err());
    }

    #[test]
    fn addition_stops_at_midnight() {
        let late = TimeOfDay::from_hm(23, 0).unwrap();
        assert_eq!(
            late.checked_add_minutes(59),
            TimeOfDay::from_hm(23, 59)
        );
        assert_eq!(late.checked_add_minutes(60), None);
    }

    #[test]
    fn serializes_as_string() {
        let time = TimeOfDay::from_hm(7, 5).unwrap();
        assert_eq!(serde_json::to_string(&time).unwrap(), "\"07:05\"");
        let parsed: TimeOfDay = serde_json::from_str("\"07:05\"").unwrap();
        assert_eq!(parsed, time);
        assert!(serde_json::from_str::<TimeOfDay>("\"7:5\"").is_err());
    }
}
