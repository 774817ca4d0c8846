//! Error types for salon-schedule operations.

use thiserror::Error;

use crate::clock::ClockTime;

/// Invalid schedule configuration. Must be fixed by whoever owns the config;
/// grid generation never runs on a config that fails validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("slot precision must be a positive divisor of 60 minutes, got {0}")]
    InvalidPrecision(u32),

    #[error("{day}: working hours start {start} must be before end {end}")]
    EmptyWorkingDay {
        day: String,
        start: ClockTime,
        end: ClockTime,
    },

    #[error("{day}: {time} is not aligned to the {precision}-minute slot grid")]
    Misaligned {
        day: String,
        time: ClockTime,
        precision: u32,
    },

    #[error("maximum extension of {minutes} minutes is not a multiple of the {precision}-minute slot grid")]
    MisalignedExtension { minutes: u32, precision: u32 },

    #[error("maximum extension of {minutes} minutes exceeds the {limit}-minute limit")]
    ExtensionTooLong { minutes: u32, limit: u32 },
}

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid time of day: {0}")]
    InvalidTime(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid appointment {id}: {reason}")]
    InvalidAppointment { id: String, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
