use std::{fmt, str::FromStr};

use jiff::civil::Time;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Hour and minute of a local day, written as `HH:MM`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    hour: i8,
    minute: i8,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimeOfDayError {
    #[error("Invalid time '{0}', expected HH:MM")]
    Malformed(String),

    #[error("Time '{0}' is out of range (00:00 to 23:59)")]
    OutOfRange(String),
}

impl TimeOfDay {
    pub fn new(hour: i8, minute: i8) -> Option<Self> {
        if (0..24).contains(&hour) && (0..60).contains(&minute) {
            Some(Self { hour, minute })
        } else {
            None
        }
    }

    /// Truncates a civil time to the minute.
    pub fn from_time(time: Time) -> Self {
        Self {
            hour: time.hour(),
            minute: time.minute(),
        }
    }

    pub fn to_time(self) -> Time {
        Time::constant(self.hour, self.minute, 0, 0)
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeOfDayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || TimeOfDayError::Malformed(s.to_string());

        let (hour, minute) = s.trim().split_once(':').ok_or_else(malformed)?;
        if hour.len() != 2 || minute.len() != 2 {
            return Err(malformed());
        }
        if !hour.bytes().chain(minute.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }

        let hour: i8 = hour.parse().map_err(|_| malformed())?;
        let minute: i8 = minute.parse().map_err(|_| malformed())?;

        TimeOfDay::new(hour, minute).ok_or_else(|| TimeOfDayError::OutOfRange(s.to_string()))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = TimeOfDayError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

/// Reads an optional `HH:MM` field, treating `null` and blank strings as unset.
pub fn deserialize_optional<'de, D>(deserializer: D) -> Result<Option<TimeOfDay>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}
