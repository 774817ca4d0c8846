//! WASM bindings for salon-schedule.
//!
//! Exposes grid generation, appointment placement and the week view to the
//! browser schedule page via `wasm-bindgen`. All complex types cross the
//! boundary as JSON strings in the same camelCase shape the library serializes.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p salon-schedule-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir packages/salon-schedule-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/salon_schedule_wasm.wasm
//! ```

use chrono::NaiveDate;
use salon_schedule::appointment::{blocks_from_api_json, parse_timezone};
use salon_schedule::config::ExtensionSettings;
use salon_schedule::grid::week_grid;
use salon_schedule::week::{build_day, build_week};
use salon_schedule::{AppointmentBlock, ClockTime, ScheduleConfig};
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Helpers: JSON in, JSON out, errors as plain strings
// ---------------------------------------------------------------------------

type BindingResult<T> = Result<T, String>;

fn parse_config(json: &str) -> BindingResult<ScheduleConfig> {
    // An empty string means "salon defaults" so callers without saved settings
    // don't have to build a config object.
    if json.trim().is_empty() {
        return Ok(ScheduleConfig::default());
    }
    ScheduleConfig::from_json(json).map_err(|e| e.to_string())
}

fn parse_date(s: &str) -> BindingResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("Invalid date '{}': {}", s, e))
}

fn parse_time(s: &str) -> BindingResult<ClockTime> {
    s.parse().map_err(|e: salon_schedule::ScheduleError| e.to_string())
}

fn parse_blocks(json: &str) -> BindingResult<Vec<AppointmentBlock>> {
    serde_json::from_str(json).map_err(|e| format!("Invalid appointments JSON: {}", e))
}

fn to_json<T: Serialize>(value: &T) -> BindingResult<String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

fn grid_json(config_json: &str) -> BindingResult<String> {
    let config = parse_config(config_json)?;
    to_json(&week_grid(&config))
}

fn bookable(
    candidate_end: &str,
    working_day_end: &str,
    extension_json: &str,
) -> BindingResult<bool> {
    let settings: ExtensionSettings = if extension_json.trim().is_empty() {
        ExtensionSettings::default()
    } else {
        serde_json::from_str(extension_json)
            .map_err(|e| format!("Invalid extension settings JSON: {}", e))?
    };
    Ok(salon_schedule::is_bookable(
        parse_time(candidate_end)?,
        parse_time(working_day_end)?,
        &settings,
    ))
}

fn day_json(config_json: &str, date: &str, appointments_json: &str) -> BindingResult<String> {
    let config = parse_config(config_json)?;
    let date = parse_date(date)?;
    let appointments: Vec<AppointmentBlock> = parse_blocks(appointments_json)?
        .into_iter()
        .filter(|a| a.date == date)
        .collect();
    let grid = week_grid(&config);
    to_json(&build_day(&config, &grid, date, &appointments))
}

fn week_json(config_json: &str, date: &str, appointments_json: &str) -> BindingResult<String> {
    let config = parse_config(config_json)?;
    let date = parse_date(date)?;
    let appointments = parse_blocks(appointments_json)?;
    to_json(&build_week(&config, date, &appointments))
}

fn api_blocks_json(records_json: &str, timezone: &str) -> BindingResult<String> {
    let tz = parse_timezone(timezone).map_err(|e| e.to_string())?;
    let blocks = blocks_from_api_json(records_json, tz).map_err(|e| e.to_string())?;
    to_json(&blocks)
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Build the shared week grid for a stylist config.
///
/// `config_json` is a schedule config object (empty string for defaults).
/// Returns a JSON array of `{time, index, isHour, isHalfHour}` rows.
#[wasm_bindgen(js_name = "buildGrid")]
pub fn build_grid(config_json: &str) -> Result<String, JsValue> {
    grid_json(config_json).map_err(|e| JsValue::from_str(&e))
}

/// Whether an appointment ending at `candidate_end` ("HH:MM") may be booked on a
/// day closing at `working_day_end`, under the given extension settings JSON.
#[wasm_bindgen(js_name = "isBookable")]
pub fn is_bookable(
    candidate_end: &str,
    working_day_end: &str,
    extension_json: &str,
) -> Result<bool, JsValue> {
    bookable(candidate_end, working_day_end, extension_json).map_err(|e| JsValue::from_str(&e))
}

/// Lay out one day.
///
/// `appointments_json` is an array of appointment blocks (see
/// `appointmentsFromApi`); blocks dated on other days are ignored. Returns the
/// day's slots, rejected appointments and statistics as JSON.
#[wasm_bindgen(js_name = "placeDay")]
pub fn place_day(
    config_json: &str,
    date: &str,
    appointments_json: &str,
) -> Result<String, JsValue> {
    day_json(config_json, date, appointments_json).map_err(|e| JsValue::from_str(&e))
}

/// Lay out the Sunday-to-Saturday week containing `date`.
#[wasm_bindgen(js_name = "buildWeek")]
pub fn build_week_view(
    config_json: &str,
    date: &str,
    appointments_json: &str,
) -> Result<String, JsValue> {
    week_json(config_json, date, appointments_json).map_err(|e| JsValue::from_str(&e))
}

/// Convert booking API appointment records into appointment blocks localized
/// to the salon's IANA `timezone`.
#[wasm_bindgen(js_name = "appointmentsFromApi")]
pub fn appointments_from_api(records_json: &str, timezone: &str) -> Result<String, JsValue> {
    api_blocks_json(records_json, timezone).map_err(|e| JsValue::from_str(&e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    const CONFIG: &str = r#"{ "extension": { "allowExtension": true, "maxExtensionMinutes": 60 } }"#;

    const RECORDS: &str = r#"[{
        "id": 7,
        "service": { "name": "Cut", "duration_minutes": 60, "price": "4000.00" },
        "appointment_date": "2026-03-16T17:30:00+09:00",
        "status": "PAID"
    }]"#;

    #[test]
    fn empty_config_uses_defaults() {
        let rows: Value = serde_json::from_str(&grid_json("").unwrap()).unwrap();
        assert_eq!(rows.as_array().unwrap().len(), 18);
    }

    #[test]
    fn invalid_config_is_reported() {
        let err = grid_json(r#"{ "precisionMinutes": 7 }"#).unwrap_err();
        assert!(err.contains("precision"), "{}", err);
    }

    #[test]
    fn bookable_honours_extension() {
        assert!(!bookable("18:30", "18:00", "").unwrap());
        assert!(bookable("18:30", "18:00", r#"{ "allowExtension": true }"#).unwrap());
        assert!(bookable("6pm", "18:00", "").is_err());
    }

    #[test]
    fn api_records_flow_through_to_day_layout() {
        let blocks = api_blocks_json(RECORDS, "Asia/Tokyo").unwrap();
        let day: Value = serde_json::from_str(&day_json(CONFIG, "2026-03-16", &blocks).unwrap()).unwrap();

        assert_eq!(day["statistics"]["totalBookings"], 1);
        let extension_slot = day["slots"]
            .as_array()
            .unwrap()
            .iter()
            .find(|s| s["startTime"] == "18:00")
            .unwrap();
        assert_eq!(extension_slot["isExtensionTime"], true);
        assert_eq!(extension_slot["occupancy"]["kind"], "continuation");
    }

    #[test]
    fn week_rejects_bad_dates() {
        assert!(week_json("", "2026-13-01", "[]").is_err());
        let week: Value = serde_json::from_str(&week_json("", "2026-03-18", "[]").unwrap()).unwrap();
        assert_eq!(week["weekStart"], "2026-03-15");
    }
}
