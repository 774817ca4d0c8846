//! Time-grid generation.
//!
//! A week view draws every day against one shared grid of fixed-width rows so
//! that the same time lines up across columns. The grid spans the earliest
//! opening to the latest closing over all working weekdays, pushed out by the
//! after-hours extension when that is enabled.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::clock::ClockTime;
use crate::config::{DayHours, ExtensionSettings, ScheduleConfig, WorkingHours};
use crate::placement::{SlotOccupancy, TimeSlot};

/// One row of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimePoint {
    pub time: ClockTime,
    /// Row index within the grid.
    pub index: usize,
    pub is_hour: bool,
    pub is_half_hour: bool,
}

/// Build the ordered rows `start, start + precision, ...` strictly before `end`.
///
/// Returns an empty grid when `start >= end` or `precision_minutes` is zero;
/// validating the inputs is the config loader's job.
pub fn build_grid(start: ClockTime, end: ClockTime, precision_minutes: u32) -> Vec<TimePoint> {
    if precision_minutes == 0 || start >= end {
        return Vec::new();
    }

    let mut points = Vec::with_capacity((end.minutes_since(start) / precision_minutes) as usize + 1);
    let mut current = start;
    while current < end {
        points.push(TimePoint {
            time: current,
            index: points.len(),
            is_hour: current.minute() == 0,
            is_half_hour: current.minute() == 30,
        });
        current = current + precision_minutes;
    }
    points
}

/// The time span shared by every day in the week view.
///
/// Returns `None` when no weekday is working.
pub fn grid_range(
    hours: &WorkingHours,
    extension: &ExtensionSettings,
) -> Option<(ClockTime, ClockTime)> {
    let (earliest, latest) = hours
        .iter()
        .filter(|(_, day)| day.is_working)
        .fold(None, |acc: Option<(ClockTime, ClockTime)>, (_, day)| {
            Some(match acc {
                Some((start, end)) => (start.min(day.start), end.max(day.end)),
                None => (day.start, day.end),
            })
        })?;

    Some((earliest, latest + extension.extra_minutes()))
}

/// The shared week grid for a validated config. Empty when nobody works.
pub fn week_grid(config: &ScheduleConfig) -> Vec<TimePoint> {
    match grid_range(&config.working_hours, &config.extension) {
        Some((start, end)) => build_grid(start, end, config.precision_minutes),
        None => Vec::new(),
    }
}

/// Free slots for one day, cut from the shared grid.
///
/// A slot exists for every grid row from opening time up to closing time, plus
/// the extension window when extension is allowed. Rows at or after closing are
/// flagged `is_extension_time`. Closed days have no slots.
pub fn day_slots(
    grid: &[TimePoint],
    date: NaiveDate,
    hours: &DayHours,
    extension: &ExtensionSettings,
    precision_minutes: u32,
) -> Vec<TimeSlot> {
    if !hours.is_working {
        return Vec::new();
    }

    let last_end = hours.end + extension.extra_minutes();
    grid.iter()
        .filter(|p| p.time >= hours.start && p.time < last_end)
        .map(|p| TimeSlot {
            date,
            start_time: p.time,
            end_time: p.time + precision_minutes,
            duration_minutes: precision_minutes,
            is_available: true,
            is_extension_time: p.time >= hours.end,
            row: p.index,
            occupancy: SlotOccupancy::Free,
        })
        .collect()
}
