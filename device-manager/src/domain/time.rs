//! Timestamps on the wire use `dd-MM-yyyy HH:mm:ss`

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serializer};

use super::{render, FilterSet};

/// chrono format string for wire timestamps
pub const TIME_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// Parse a wire timestamp
pub fn parse(value: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value.trim(), TIME_FORMAT)
}

/// Format a timestamp for the wire
pub fn format(value: &NaiveDateTime) -> String {
    value.format(TIME_FORMAT).to_string()
}

/// Serde adapter for required timestamps
pub mod required {
    use super::*;

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for optional timestamps
pub mod optional {
    use super::*;

    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => serializer.serialize_str(&format(value)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| parse(&raw).map_err(serde::de::Error::custom))
            .transpose()
    }
}

/// Device plus time-window filters for locations and measurements
///
/// `exact_time` is equality; `start_time` and `end_time` are inclusive bounds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeFilter {
    pub device_id: Option<i32>,
    pub exact_time: Option<NaiveDateTime>,
    pub start_time: Option<NaiveDateTime>,
    pub end_time: Option<NaiveDateTime>,
}

impl TimeFilter {
    /// Same window, narrowed to one device
    #[must_use]
    pub fn for_device(&self, device_id: i32) -> Self {
        Self {
            device_id: Some(device_id),
            ..self.clone()
        }
    }

    /// Whether a record at `time` for `device_id` falls inside the filter
    pub fn matches(&self, device_id: i32, time: &NaiveDateTime) -> bool {
        self.device_id.is_none_or(|id| id == device_id)
            && self.exact_time.is_none_or(|t| &t == time)
            && self.start_time.is_none_or(|t| &t <= time)
            && self.end_time.is_none_or(|t| &t >= time)
    }

    /// Time part only, as used in group fan-out messages
    pub fn describe_window(&self) -> String {
        format!(
            "exactTime {}, startTime {}, endTime: {}",
            display(&self.exact_time),
            display(&self.start_time),
            display(&self.end_time)
        )
    }
}

fn display(value: &Option<NaiveDateTime>) -> String {
    value.as_ref().map(format).unwrap_or_else(|| "null".to_string())
}

impl From<&TimeFilter> for TimeFilter {
    fn from(filter: &TimeFilter) -> Self {
        filter.clone()
    }
}

impl FilterSet for TimeFilter {
    fn entries(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("deviceId", render(&self.device_id)),
            ("exactTime", self.exact_time.as_ref().map(format)),
            ("startTime", self.start_time.as_ref().map(format)),
            ("endTime", self.end_time.as_ref().map(format)),
        ]
    }
}
