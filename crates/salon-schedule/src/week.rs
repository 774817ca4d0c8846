//! Seven-day schedule view.
//!
//! Weeks start on Sunday. Every day is cut from the same week grid so rows line
//! up across columns, and carries its own booking statistics.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::appointment::AppointmentBlock;
use crate::config::ScheduleConfig;
use crate::grid::{self, TimePoint};
use crate::placement::{self, PlacementError, TimeSlot};

/// Booking figures for a single day.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayStatistics {
    pub total_bookings: usize,
    pub total_revenue: u64,
    pub booked_slots: usize,
    pub working_slots: usize,
    /// Booked slots as a percentage of working slots.
    pub utilization: f64,
}

/// Booking figures for the whole week.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyMetrics {
    pub weekly_revenue: u64,
    pub weekly_bookings: usize,
    /// Rounded to a whole percent.
    pub average_utilization: u32,
}

/// One column of the week view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDay {
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub closed: bool,
    /// Label of the day's override, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub slots: Vec<TimeSlot>,
    pub rejected: Vec<PlacementError>,
    pub statistics: DayStatistics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekSchedule {
    pub week_start: NaiveDate,
    pub grid: Vec<TimePoint>,
    pub days: Vec<ScheduleDay>,
    pub metrics: WeeklyMetrics,
}

/// The Sunday on or before `date`.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    let back = date.weekday().num_days_from_sunday() as u64;
    date - Days::new(back)
}

/// Lay out the week containing `date`.
///
/// Appointments dated outside that week are ignored. `config` is expected to
/// have passed [`ScheduleConfig::validate`].
pub fn build_week(
    config: &ScheduleConfig,
    date: NaiveDate,
    appointments: &[AppointmentBlock],
) -> WeekSchedule {
    let week_start = start_of_week(date);
    let grid = grid::week_grid(config);

    let days: Vec<ScheduleDay> = week_start
        .iter_days()
        .take(7)
        .map(|day| {
            let todays: Vec<AppointmentBlock> = appointments
                .iter()
                .filter(|a| a.date == day)
                .cloned()
                .collect();
            build_day(config, &grid, day, &todays)
        })
        .collect();

    let metrics = weekly_metrics(&days);
    WeekSchedule {
        week_start,
        grid,
        days,
        metrics,
    }
}

/// Lay out a single day against the shared `grid`.
pub fn build_day(
    config: &ScheduleConfig,
    grid: &[TimePoint],
    date: NaiveDate,
    appointments: &[AppointmentBlock],
) -> ScheduleDay {
    let hours = config.hours_on(date);
    let free = grid::day_slots(
        grid,
        date,
        &hours,
        &config.extension,
        config.precision_minutes,
    );
    let placement = placement::place_appointments(
        free,
        appointments,
        hours.end,
        &config.extension,
        config.precision_minutes,
    );

    let statistics = day_statistics(&placement.slots);
    ScheduleDay {
        date,
        weekday: date.weekday(),
        closed: !hours.is_working,
        label: config.override_on(date).and_then(|o| o.label.clone()),
        slots: placement.slots,
        rejected: placement.rejected,
        statistics,
    }
}

fn day_statistics(slots: &[TimeSlot]) -> DayStatistics {
    let placed: Vec<&AppointmentBlock> = slots.iter().filter_map(TimeSlot::appointment).collect();
    let booked_slots = slots.iter().filter(|s| !s.is_available).count();
    let working_slots = slots.len();

    DayStatistics {
        total_bookings: placed.len(),
        total_revenue: placed.iter().map(|a| u64::from(a.price)).sum(),
        booked_slots,
        working_slots,
        utilization: percent(booked_slots, working_slots),
    }
}

fn weekly_metrics(days: &[ScheduleDay]) -> WeeklyMetrics {
    let booked: usize = days.iter().map(|d| d.statistics.booked_slots).sum();
    let working: usize = days.iter().map(|d| d.statistics.working_slots).sum();

    WeeklyMetrics {
        weekly_revenue: days.iter().map(|d| d.statistics.total_revenue).sum(),
        weekly_bookings: days.iter().map(|d| d.statistics.total_bookings).sum(),
        average_utilization: percent(booked, working).round() as u32,
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}
