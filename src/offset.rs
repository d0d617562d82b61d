//! Reading UTC offsets and wall-clock time out of ISO-8601 timestamps.
//!
//! Only the numeric suffix is consulted; there is no timezone database.

use std::sync::LazyLock;

use chrono::{NaiveDateTime, Timelike};
use regex_lite::Regex;

static OFFSET_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([+-])(\d{2}):?(\d{2})$").expect("valid offset pattern"));

const LOCAL_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UtcOffset {
    pub negative: bool,
    pub hours: u8,
    pub minutes: u8,
}

impl UtcOffset {
    fn sign(&self) -> i32 {
        if self.negative {
            -1
        } else {
            1
        }
    }

    /// `-03:30` is `-3.5`.
    pub fn as_hours(&self) -> f64 {
        f64::from(self.sign()) * (f64::from(self.hours) + f64::from(self.minutes) / 60.0)
    }

    /// Signed whole-hour part; minutes are dropped.
    pub fn hour_component(&self) -> i32 {
        self.sign() * i32::from(self.hours)
    }
}

impl std::fmt::Display for UtcOffset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.negative { '-' } else { '+' };
        write!(f, "{sign}{:02}:{:02}", self.hours, self.minutes)
    }
}

/// Parses the trailing `+HH:MM`, `-HH:MM`, `+HHMM` or `-HHMM` suffix.
/// `Z` and offset-less timestamps yield `None`.
pub fn parse_offset(timestamp: &str) -> Option<UtcOffset> {
    let caps = OFFSET_SUFFIX.captures(timestamp)?;
    Some(UtcOffset {
        negative: &caps[1] == "-",
        hours: caps[2].parse().ok()?,
        minutes: caps[3].parse().ok()?,
    })
}

fn strip_zone(timestamp: &str) -> &str {
    if let Some(m) = OFFSET_SUFFIX.find(timestamp) {
        return &timestamp[..m.start()];
    }
    timestamp
        .strip_suffix('Z')
        .or_else(|| timestamp.strip_suffix('z'))
        .unwrap_or(timestamp)
}

/// The timestamp's own date and time, without converting through its offset.
pub fn local_datetime(timestamp: &str) -> Option<NaiveDateTime> {
    let local = strip_zone(timestamp);
    LOCAL_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(local, fmt).ok())
}

pub fn local_hour(timestamp: &str) -> Option<u32> {
    local_datetime(timestamp).map(|dt| dt.hour())
}
