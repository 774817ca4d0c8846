//! After-hours extension policy.
//!
//! Decides whether an appointment ending after closing time may still be booked.

use crate::clock::ClockTime;
use crate::config::ExtensionSettings;

/// Whether an appointment ending at `candidate_end` is bookable on a day that
/// closes at `working_day_end`.
///
/// Ending at or before closing is always fine. Past closing, the appointment is
/// bookable only when extension is allowed and the end falls within
/// `max_extension_minutes` of closing.
pub fn is_bookable(
    candidate_end: ClockTime,
    working_day_end: ClockTime,
    settings: &ExtensionSettings,
) -> bool {
    if candidate_end <= working_day_end {
        return true;
    }
    settings.allow_extension && candidate_end <= working_day_end + settings.max_extension_minutes
}

/// Minutes by which `candidate_end` runs past closing time (zero if it doesn't).
pub fn overrun_minutes(candidate_end: ClockTime, working_day_end: ClockTime) -> u32 {
    candidate_end.minutes_since(working_day_end)
}
