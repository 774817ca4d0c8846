//! # salon-schedule
//!
//! Deterministic time-grid generation and appointment placement for salon
//! stylist schedules.
//!
//! Given a stylist's working hours and a slot precision, the crate builds the
//! rows of a week view, cuts each day's column out of that grid and lays the
//! day's appointments onto it. Everything is a pure function of its inputs:
//! the caller re-runs it whenever the hours, the extension settings or the
//! appointment list change.
//!
//! ## Modules
//!
//! - [`clock`] — `"HH:MM"` time of day
//! - [`config`] — working hours, extension settings, per-date overrides
//! - [`grid`] — shared week grid and per-day slots
//! - [`extension`] — after-hours bookability predicate
//! - [`placement`] — appointment layout with head/continuation slots
//! - [`appointment`] — appointment blocks and booking API records
//! - [`week`] — seven-day view with statistics
//! - [`error`] — Error types

pub mod appointment;
pub mod clock;
pub mod config;
pub mod error;
pub mod extension;
pub mod grid;
pub mod placement;
pub mod week;

pub use appointment::{AppointmentBlock, AppointmentStatus};
pub use clock::ClockTime;
pub use config::{DayHours, ExtensionSettings, ScheduleConfig, WorkingHours};
pub use error::{ConfigError, ScheduleError};
pub use extension::is_bookable;
pub use grid::{build_grid, day_slots, grid_range, TimePoint};
pub use placement::{place_appointments, Placement, PlacementError, TimeSlot};
pub use week::{build_week, WeekSchedule};
