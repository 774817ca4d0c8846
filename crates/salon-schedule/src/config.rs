//! Stylist schedule configuration: weekly working hours, after-hours extension
//! and per-date overrides.
//!
//! The JSON shape matches what the booking frontend stores per stylist, e.g.
//!
//! ```json
//! {
//!   "precisionMinutes": 30,
//!   "workingHours": { "monday": { "start": "09:00", "end": "18:00", "isWorking": true } },
//!   "extension": { "allowExtension": true, "maxExtensionMinutes": 60 },
//!   "overrides": { "2026-03-20": { "type": "off", "label": "Holiday" } }
//! }
//! ```
//!
//! Every field is optional; omitted parts take the salon defaults.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::clock::{ClockTime, MINUTES_PER_DAY};
use crate::error::{ConfigError, Result};

/// Default width of one grid slot, in minutes.
pub const DEFAULT_PRECISION_MINUTES: u32 = 30;

/// Opening hours for a single weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayHours {
    pub start: ClockTime,
    pub end: ClockTime,
    pub is_working: bool,
}

impl DayHours {
    pub const fn new(start: ClockTime, end: ClockTime) -> Self {
        Self {
            start,
            end,
            is_working: true,
        }
    }

    pub const fn closed(self) -> Self {
        Self {
            is_working: false,
            ..self
        }
    }

    fn hm(start_hour: u32, end_hour: u32, is_working: bool) -> Self {
        Self {
            start: ClockTime::from_minutes(start_hour * 60),
            end: ClockTime::from_minutes(end_hour * 60),
            is_working,
        }
    }
}

/// Weekly opening hours, one entry per weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkingHours {
    pub monday: DayHours,
    pub tuesday: DayHours,
    pub wednesday: DayHours,
    pub thursday: DayHours,
    pub friday: DayHours,
    pub saturday: DayHours,
    pub sunday: DayHours,
}

impl Default for WorkingHours {
    fn default() -> Self {
        Self {
            monday: DayHours::hm(9, 18, true),
            tuesday: DayHours::hm(9, 18, true),
            wednesday: DayHours::hm(9, 18, true),
            thursday: DayHours::hm(9, 18, true),
            friday: DayHours::hm(9, 18, true),
            saturday: DayHours::hm(9, 17, true),
            sunday: DayHours::hm(10, 16, false),
        }
    }
}

impl WorkingHours {
    /// The same hours on every day of the week.
    pub fn uniform(hours: DayHours) -> Self {
        Self {
            monday: hours,
            tuesday: hours,
            wednesday: hours,
            thursday: hours,
            friday: hours,
            saturday: hours,
            sunday: hours,
        }
    }

    pub fn for_weekday(&self, weekday: Weekday) -> &DayHours {
        match weekday {
            Weekday::Mon => &self.monday,
            Weekday::Tue => &self.tuesday,
            Weekday::Wed => &self.wednesday,
            Weekday::Thu => &self.thursday,
            Weekday::Fri => &self.friday,
            Weekday::Sat => &self.saturday,
            Weekday::Sun => &self.sunday,
        }
    }

    pub fn for_date(&self, date: NaiveDate) -> &DayHours {
        self.for_weekday(date.weekday())
    }

    pub fn for_weekday_mut(&mut self, weekday: Weekday) -> &mut DayHours {
        match weekday {
            Weekday::Mon => &mut self.monday,
            Weekday::Tue => &mut self.tuesday,
            Weekday::Wed => &mut self.wednesday,
            Weekday::Thu => &mut self.thursday,
            Weekday::Fri => &mut self.friday,
            Weekday::Sat => &mut self.saturday,
            Weekday::Sun => &mut self.sunday,
        }
    }

    /// Iterate Monday through Sunday.
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &DayHours)> {
        [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ]
        .into_iter()
        .map(move |wd| (wd, self.for_weekday(wd)))
    }
}

/// Whether slots past closing time may be booked, and how far past.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtensionSettings {
    pub allow_extension: bool,
    pub max_extension_minutes: u32,
    /// Display hint for the rendering layer; has no effect on placement.
    pub show_extension_warning: bool,
}

impl Default for ExtensionSettings {
    fn default() -> Self {
        Self {
            allow_extension: false,
            max_extension_minutes: 60,
            show_extension_warning: true,
        }
    }
}

impl ExtensionSettings {
    pub fn allowing(max_extension_minutes: u32) -> Self {
        Self {
            allow_extension: true,
            max_extension_minutes,
            ..Self::default()
        }
    }

    /// Minutes added after closing time, zero when extension is disabled.
    pub fn extra_minutes(&self) -> u32 {
        if self.allow_extension {
            self.max_extension_minutes
        } else {
            0
        }
    }
}

/// Kind of a per-date override. Only `Off` changes the hours; the other kinds
/// are display-only and keep the weekday's hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayKind {
    Work,
    Off,
    Short,
    Custom,
}

/// A per-date entry in the stylist's monthly calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayOverride {
    #[serde(rename = "type")]
    pub kind: DayKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Everything the grid builder and placement engine need about a stylist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScheduleConfig {
    pub precision_minutes: u32,
    pub working_hours: WorkingHours,
    pub extension: ExtensionSettings,
    pub overrides: BTreeMap<NaiveDate, DayOverride>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            precision_minutes: DEFAULT_PRECISION_MINUTES,
            working_hours: WorkingHours::default(),
            extension: ExtensionSettings::default(),
            overrides: BTreeMap::new(),
        }
    }
}

impl ScheduleConfig {
    /// Parse a JSON config and validate it.
    ///
    /// # Errors
    /// Returns `ScheduleError::Json` for malformed JSON or bad `"HH:MM"` values,
    /// and `ScheduleError::Config` when the parsed config fails [`validate`](Self::validate).
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ScheduleConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the invariants grid generation relies on.
    ///
    /// - precision is a positive divisor of 60
    /// - every working day has `start < end`
    /// - working-day boundaries fall on the slot grid
    /// - the maximum extension is a whole number of slots, at most one day
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let precision = self.precision_minutes;
        if precision == 0 || 60 % precision != 0 {
            return Err(ConfigError::InvalidPrecision(precision));
        }

        for (weekday, hours) in self.working_hours.iter() {
            if !hours.is_working {
                continue;
            }
            if hours.start >= hours.end {
                return Err(ConfigError::EmptyWorkingDay {
                    day: weekday_key(weekday).to_string(),
                    start: hours.start,
                    end: hours.end,
                });
            }
            for time in [hours.start, hours.end] {
                if !time.is_aligned(precision) {
                    return Err(ConfigError::Misaligned {
                        day: weekday_key(weekday).to_string(),
                        time,
                        precision,
                    });
                }
            }
        }

        if self.extension.allow_extension {
            let minutes = self.extension.max_extension_minutes;
            if minutes > MINUTES_PER_DAY {
                return Err(ConfigError::ExtensionTooLong {
                    minutes,
                    limit: MINUTES_PER_DAY,
                });
            }
            if minutes % precision != 0 {
                return Err(ConfigError::MisalignedExtension { minutes, precision });
            }
        }

        Ok(())
    }

    pub fn override_on(&self, date: NaiveDate) -> Option<&DayOverride> {
        self.overrides.get(&date)
    }

    /// Opening hours in effect on a specific date. An `off` override closes
    /// the day; other override kinds keep the weekday's hours.
    pub fn hours_on(&self, date: NaiveDate) -> DayHours {
        let hours = *self.working_hours.for_date(date);
        match self.override_on(date) {
            Some(DayOverride {
                kind: DayKind::Off, ..
            }) => hours.closed(),
            _ => hours,
        }
    }
}

/// Lower-case weekday name as used for `WorkingHours` keys.
pub fn weekday_key(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}
