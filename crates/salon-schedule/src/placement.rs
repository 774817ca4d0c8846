//! Lay appointments out on a day's slots.
//!
//! Each appointment covers `ceil(duration / precision)` consecutive slots. The
//! first one (the head) carries the full [`AppointmentBlock`]; the rest are
//! continuations that only reference the block id, so a renderer draws each
//! appointment exactly once.
//!
//! This is a rendering layer, not a scheduler. Appointments that cannot be laid
//! out are returned in [`Placement::rejected`] instead of corrupting the grid:
//! an appointment that would land on an occupied slot is reported as an
//! [`PlacementError::OverlapConflict`] and the earlier appointment keeps the slot.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::appointment::AppointmentBlock;
use crate::clock::ClockTime;
use crate::config::ExtensionSettings;
use crate::extension;

/// What occupies a slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum SlotOccupancy {
    Free,
    /// First slot of an appointment, carrying its display payload.
    Head { appointment: AppointmentBlock },
    /// Later slot of an appointment drawn from its head.
    Continuation { appointment_id: String },
}

/// A fixed-width cell in one day's column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub date: NaiveDate,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    pub duration_minutes: u32,
    pub is_available: bool,
    /// At or after the day's closing time.
    pub is_extension_time: bool,
    /// Row in the shared week grid.
    pub row: usize,
    pub occupancy: SlotOccupancy,
}

impl TimeSlot {
    pub fn is_head(&self) -> bool {
        matches!(self.occupancy, SlotOccupancy::Head { .. })
    }

    pub fn is_continuation(&self) -> bool {
        matches!(self.occupancy, SlotOccupancy::Continuation { .. })
    }

    /// The id of the appointment covering this slot, if any.
    pub fn appointment_id(&self) -> Option<&str> {
        match &self.occupancy {
            SlotOccupancy::Free => None,
            SlotOccupancy::Head { appointment } => Some(&appointment.id),
            SlotOccupancy::Continuation { appointment_id } => Some(appointment_id),
        }
    }

    pub fn appointment(&self) -> Option<&AppointmentBlock> {
        match &self.occupancy {
            SlotOccupancy::Head { appointment } => Some(appointment),
            _ => None,
        }
    }
}

/// Why an appointment could not be laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnplaceableReason {
    /// No slot starts at the appointment's start time.
    NoMatchingSlot,
    ZeroDuration,
    /// Runs past closing and extension is disabled.
    ExceedsDay,
    /// Runs past closing by more than the allowed extension.
    ExceedsExtension,
}

/// An appointment left off the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "error", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum PlacementError {
    Unplaceable {
        appointment_id: String,
        start_time: ClockTime,
        end_time: ClockTime,
        reason: UnplaceableReason,
    },
    OverlapConflict {
        appointment_id: String,
        /// The appointment already holding the first contested slot.
        conflicting_id: String,
        slot_time: ClockTime,
    },
}

impl PlacementError {
    pub fn appointment_id(&self) -> &str {
        match self {
            PlacementError::Unplaceable { appointment_id, .. }
            | PlacementError::OverlapConflict { appointment_id, .. } => appointment_id,
        }
    }
}

/// Result of laying out one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub slots: Vec<TimeSlot>,
    pub rejected: Vec<PlacementError>,
}

impl Placement {
    /// Appointments that made it onto the grid.
    pub fn placed(&self) -> impl Iterator<Item = &AppointmentBlock> {
        self.slots.iter().filter_map(TimeSlot::appointment)
    }

    pub fn occupied_slots(&self) -> usize {
        self.slots.iter().filter(|s| !s.is_available).count()
    }
}

/// Place `appointments` onto a day's `slots`.
///
/// `slots` is the day's free column as produced by [`crate::grid::day_slots`];
/// `working_day_end` is that day's closing time. Cancelled appointments are
/// skipped. The rest are laid out in `(start_time, id)` order, so the result
/// does not depend on the order the API returned them in.
pub fn place_appointments(
    mut slots: Vec<TimeSlot>,
    appointments: &[AppointmentBlock],
    working_day_end: ClockTime,
    settings: &ExtensionSettings,
    precision_minutes: u32,
) -> Placement {
    let mut ordered: Vec<&AppointmentBlock> = appointments
        .iter()
        .filter(|a| {
            if !a.status.occupies_time() {
                debug!(appointment = %a.id, "skipping cancelled appointment");
                return false;
            }
            true
        })
        .collect();
    ordered.sort_by(|a, b| (a.start_time, &a.id).cmp(&(b.start_time, &b.id)));

    let mut rejected = Vec::new();
    for appointment in ordered {
        if let Err(err) = place_one(
            &mut slots,
            appointment,
            working_day_end,
            settings,
            precision_minutes,
        ) {
            warn!(
                appointment = %appointment.id,
                date = %appointment.date,
                start = %appointment.start_time,
                error = ?err,
                "appointment left off the schedule"
            );
            rejected.push(err);
        }
    }

    Placement { slots, rejected }
}

fn place_one(
    slots: &mut [TimeSlot],
    appointment: &AppointmentBlock,
    working_day_end: ClockTime,
    settings: &ExtensionSettings,
    precision_minutes: u32,
) -> Result<(), PlacementError> {
    // Saturates, so an absurd duration lands past any closing time.
    let end_time = appointment.start_time + appointment.duration_minutes;
    let unplaceable = |reason| PlacementError::Unplaceable {
        appointment_id: appointment.id.clone(),
        start_time: appointment.start_time,
        end_time,
        reason,
    };

    if appointment.duration_minutes == 0 || precision_minutes == 0 {
        return Err(unplaceable(UnplaceableReason::ZeroDuration));
    }

    let head = slots
        .iter()
        .position(|s| s.start_time == appointment.start_time)
        .ok_or_else(|| unplaceable(UnplaceableReason::NoMatchingSlot))?;

    let over_hours = if settings.allow_extension {
        UnplaceableReason::ExceedsExtension
    } else {
        UnplaceableReason::ExceedsDay
    };
    if !extension::is_bookable(end_time, working_day_end, settings) {
        return Err(unplaceable(over_hours));
    }

    let slots_needed = appointment.duration_minutes.div_ceil(precision_minutes) as usize;
    if slots_needed > slots.len() - head {
        return Err(unplaceable(over_hours));
    }

    let covered = &mut slots[head..head + slots_needed];
    if let Some(taken) = covered.iter().find(|s| !s.is_available) {
        return Err(PlacementError::OverlapConflict {
            appointment_id: appointment.id.clone(),
            conflicting_id: taken.appointment_id().unwrap_or_default().to_string(),
            slot_time: taken.start_time,
        });
    }

    for (offset, slot) in covered.iter_mut().enumerate() {
        slot.is_available = false;
        slot.occupancy = if offset == 0 {
            SlotOccupancy::Head {
                appointment: appointment.clone(),
            }
        } else {
            SlotOccupancy::Continuation {
                appointment_id: appointment.id.clone(),
            }
        };
    }
    Ok(())
}
