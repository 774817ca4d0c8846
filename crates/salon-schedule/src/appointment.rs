//! Appointments as the schedule view renders them, and the mapping from the
//! booking API's appointment records.
//!
//! The API reports `appointment_date` as an RFC 3339 instant; the schedule is
//! drawn on the salon's local clock, so records are localized into the salon's
//! IANA timezone before they become [`AppointmentBlock`]s.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::clock::{ClockTime, MINUTES_PER_DAY};
use crate::error::{Result, ScheduleError};

/// Booking status. Accepts both the schedule view's lower-case names and the
/// booking API's upper-case statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    #[default]
    #[serde(alias = "PAID", alias = "CONFIRMED")]
    Confirmed,
    #[serde(alias = "RESERVED", alias = "PENDING")]
    Pending,
    #[serde(alias = "COMPLETED")]
    Completed,
    #[serde(alias = "CANCELLED", alias = "canceled")]
    Cancelled,
}

impl AppointmentStatus {
    /// Whether an appointment in this status takes up time on the schedule.
    pub fn occupies_time(self) -> bool {
        self != AppointmentStatus::Cancelled
    }
}

/// An appointment laid out on the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentBlock {
    pub id: String,
    pub customer_name: String,
    pub service: String,
    pub date: NaiveDate,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    pub duration_minutes: u32,
    /// Whole currency units.
    pub price: u32,
    #[serde(default)]
    pub status: AppointmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl AppointmentBlock {
    /// A confirmed appointment; `end_time` is derived from the duration.
    pub fn new(
        id: impl Into<String>,
        customer_name: impl Into<String>,
        service: impl Into<String>,
        date: NaiveDate,
        start_time: ClockTime,
        duration_minutes: u32,
        price: u32,
    ) -> Self {
        Self {
            id: id.into(),
            customer_name: customer_name.into(),
            service: service.into(),
            date,
            start_time,
            end_time: start_time + duration_minutes,
            duration_minutes,
            price,
            status: AppointmentStatus::Confirmed,
            notes: None,
        }
    }

    pub fn with_status(mut self, status: AppointmentStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Booking API records
// ---------------------------------------------------------------------------

/// Numeric fields arrive as JSON numbers or as decimal strings ("4000.00").
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ApiNumber {
    Int(i64),
    Float(f64),
    Text(String),
}

impl ApiNumber {
    fn as_text(&self) -> String {
        match self {
            ApiNumber::Int(n) => n.to_string(),
            ApiNumber::Float(f) => f.to_string(),
            ApiNumber::Text(s) => s.clone(),
        }
    }

    fn as_amount(&self) -> Option<u32> {
        let value = match self {
            ApiNumber::Int(n) => *n as f64,
            ApiNumber::Float(f) => *f,
            ApiNumber::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        if value.is_finite() && value >= 0.0 && value <= u32::MAX as f64 {
            Some(value.round() as u32)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiCustomer {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl ApiCustomer {
    /// Family name first, as the salon displays it; falls back to the username.
    pub fn display_name(&self) -> String {
        let full = [self.last_name.as_deref(), self.first_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if !full.is_empty() {
            return full;
        }
        self.username.clone().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiService {
    pub name: String,
    pub duration_minutes: u32,
    pub price: ApiNumber,
}

/// An appointment record from the booking API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiAppointment {
    pub id: ApiNumber,
    #[serde(default)]
    pub customer: Option<ApiCustomer>,
    pub service: ApiService,
    /// RFC 3339 instant, a naive local datetime, or a bare date when
    /// `start_time` carries the time of day.
    pub appointment_date: String,
    #[serde(default)]
    pub start_time: Option<ClockTime>,
    #[serde(default)]
    pub end_time: Option<ClockTime>,
    #[serde(default)]
    pub status: AppointmentStatus,
    #[serde(default)]
    pub total_amount: Option<ApiNumber>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ApiAppointment {
    /// Convert to a schedule block on the salon's local clock.
    ///
    /// The duration comes from `end_time - start_time` when both are present,
    /// otherwise from the service. The price is `total_amount` when present,
    /// otherwise the service price.
    ///
    /// # Errors
    /// Returns `ScheduleError::InvalidAppointment` when the date cannot be
    /// parsed, no time of day is available, the explicit end is not after the
    /// start, the duration is longer than a day, or a price is not a
    /// non-negative number.
    pub fn to_block(&self, tz: Tz) -> Result<AppointmentBlock> {
        let id = self.id.as_text();
        let invalid = |reason: String| ScheduleError::InvalidAppointment {
            id: id.clone(),
            reason,
        };

        let (date, time_of_day) = localize(&self.appointment_date, tz)
            .ok_or_else(|| invalid(format!("unparseable appointment_date '{}'", self.appointment_date)))?;

        let start_time = self
            .start_time
            .or(time_of_day)
            .ok_or_else(|| invalid("no start time".to_string()))?;

        let duration_minutes = match self.end_time {
            Some(end) if end <= start_time => {
                return Err(invalid(format!("end {} is not after start {}", end, start_time)));
            }
            Some(end) => end.minutes_since(start_time),
            None => self.service.duration_minutes,
        };
        if duration_minutes > MINUTES_PER_DAY {
            return Err(invalid(format!(
                "duration of {} minutes is longer than a day",
                duration_minutes
            )));
        }

        let amount = self.total_amount.as_ref().unwrap_or(&self.service.price);
        let price = amount
            .as_amount()
            .ok_or_else(|| invalid(format!("invalid price '{}'", amount.as_text())))?;

        let customer_name = self
            .customer
            .as_ref()
            .map(ApiCustomer::display_name)
            .unwrap_or_default();

        let mut block = AppointmentBlock::new(
            id.clone(),
            customer_name,
            self.service.name.clone(),
            date,
            start_time,
            duration_minutes,
            price,
        )
        .with_status(self.status);
        block.notes = self.notes.clone().filter(|n| !n.trim().is_empty());
        Ok(block)
    }
}

/// Parse an IANA timezone name.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse()
        .map_err(|_| ScheduleError::InvalidTimezone(name.to_string()))
}

/// Parse a JSON array of API appointment records and localize them into `tz`.
pub fn blocks_from_api_json(json: &str, tz: Tz) -> Result<Vec<AppointmentBlock>> {
    let records: Vec<ApiAppointment> = serde_json::from_str(json)?;
    records.iter().map(|r| r.to_block(tz)).collect()
}

/// Split an API date field into a local date and, when present, time of day.
fn localize(raw: &str, tz: Tz) -> Option<(NaiveDate, Option<ClockTime>)> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        let local = dt.with_timezone(&tz);
        return Some((local.date_naive(), Some(local.time().into())));
    }
    // Naive datetimes are already on the salon's clock.
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(raw, fmt) {
            // Round-trip through the zone so nonexistent local times are rejected.
            let local = tz.from_local_datetime(&ndt).earliest()?;
            return Some((local.date_naive(), Some(local.time().into())));
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|date| (date, None))
}
