//! Wall-clock time of day, measured in minutes since local midnight.
//!
//! Schedules are drawn against the salon's local clock, so a plain minute
//! counter is all the grid needs. Parsed values are limited to `00:00..=24:00`;
//! values derived by adding an after-hours extension may run past midnight and
//! are rendered as `"24:30"`, `"25:00"` and so on.

use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ScheduleError;

/// Minutes in a calendar day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// A time of day with minute resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ClockTime(u32);

impl ClockTime {
    pub const MIDNIGHT: ClockTime = ClockTime(0);

    /// Build from hour and minute. Returns `None` for a minute >= 60.
    pub const fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        if minute >= 60 {
            return None;
        }
        Some(ClockTime(hour * 60 + minute))
    }

    pub const fn from_minutes(minutes: u32) -> Self {
        ClockTime(minutes)
    }

    pub const fn minutes(self) -> u32 {
        self.0
    }

    pub const fn hour(self) -> u32 {
        self.0 / 60
    }

    pub const fn minute(self) -> u32 {
        self.0 % 60
    }

    /// Whole minutes from `earlier` to `self`, saturating at zero.
    pub const fn minutes_since(self, earlier: ClockTime) -> u32 {
        self.0.saturating_sub(earlier.0)
    }

    /// True when the time is a multiple of `precision` minutes past midnight.
    pub const fn is_aligned(self, precision: u32) -> bool {
        precision != 0 && self.0 % precision == 0
    }
}

impl From<NaiveTime> for ClockTime {
    fn from(t: NaiveTime) -> Self {
        ClockTime(t.hour() * 60 + t.minute())
    }
}

/// Saturates at the largest representable time instead of wrapping.
impl Add<u32> for ClockTime {
    type Output = ClockTime;

    fn add(self, minutes: u32) -> ClockTime {
        ClockTime(self.0.saturating_add(minutes))
    }
}

impl Sub<u32> for ClockTime {
    type Output = ClockTime;

    fn sub(self, minutes: u32) -> ClockTime {
        ClockTime(self.0.saturating_sub(minutes))
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for ClockTime {
    type Err = ScheduleError;

    /// Parse `"H:MM"` or `"HH:MM"`; `"24:00"` is accepted as end of day.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ScheduleError::InvalidTime(s.to_string());

        let (h, m) = s.trim().split_once(':').ok_or_else(invalid)?;
        if h.is_empty() || h.len() > 2 || m.len() != 2 {
            return Err(invalid());
        }
        let hour: u32 = h.parse().map_err(|_| invalid())?;
        let minute: u32 = m.parse().map_err(|_| invalid())?;

        let time = ClockTime::from_hm(hour, minute).ok_or_else(invalid)?;
        if time.0 > MINUTES_PER_DAY {
            return Err(invalid());
        }
        Ok(time)
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_formats_round_clock_values() {
        let t: ClockTime = "09:30".parse().unwrap();
        assert_eq!(t.minutes(), 570);
        assert_eq!(t.to_string(), "09:30");

        let short: ClockTime = "9:05".parse().unwrap();
        assert_eq!(short.to_string(), "09:05");
    }

    #[test]
    fn end_of_day_is_accepted_but_not_beyond() {
        assert_eq!("24:00".parse::<ClockTime>().unwrap().minutes(), 1440);
        assert!("24:30".parse::<ClockTime>().is_err());
        assert!("12:60".parse::<ClockTime>().is_err());
        assert!("noon".parse::<ClockTime>().is_err());
        assert!("12:5".parse::<ClockTime>().is_err());
    }

    #[test]
    fn derived_times_can_run_past_midnight() {
        let t = ClockTime::from_hm(23, 30).unwrap() + 60;
        assert_eq!(t.to_string(), "24:30");
    }

    #[test]
    fn adding_huge_durations_saturates() {
        let t = ClockTime::from_hm(10, 0).unwrap();
        assert_eq!((t + u32::MAX).minutes(), u32::MAX);
        assert_eq!(t + 90, ClockTime::from_hm(11, 30).unwrap());
    }
}
