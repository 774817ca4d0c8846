//! Integration tests for the `salon-schedule` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to exercise the check-config,
//! grid, day and week subcommands through the actual binary, including stdin
//! input, file output and error handling.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("salon-schedule").unwrap();
    cmd.env_remove("RUST_LOG").env_remove("SALON_TIMEZONE");
    cmd
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout must be valid JSON")
}

// ─────────────────────────────────────────────────────────────────────────────
// check-config
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn check_config_reports_grid_range() {
    cmd()
        .args(["-c", &fixture("stylist.json"), "check-config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("OK: grid 09:00-19:00"))
        .stdout(predicate::str::contains("20 rows at 30-minute precision"));
}

#[test]
fn check_config_without_file_uses_defaults() {
    cmd()
        .arg("check-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("OK: grid 09:00-18:00, 18 rows"));
}

#[test]
fn invalid_config_fails_with_reason() {
    cmd()
        .args(["-c", &fixture("invalid.json"), "check-config"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid schedule config"))
        .stderr(predicate::str::contains("monday"));
}

#[test]
fn missing_config_file_fails() {
    cmd()
        .args(["-c", "/nonexistent/stylist.json", "grid"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

// ─────────────────────────────────────────────────────────────────────────────
// grid
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn grid_prints_rows_as_json() {
    let output = cmd().arg("grid").output().unwrap();
    assert!(output.status.success());

    let rows = stdout_json(&output);
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 18);
    assert_eq!(rows[0]["time"], "09:00");
    assert_eq!(rows[0]["isHour"], true);
    assert_eq!(rows[17]["time"], "17:30");
}

#[test]
fn grid_writes_to_output_file() {
    let output_path = std::env::temp_dir().join("salon-schedule-test-grid.json");
    let _ = std::fs::remove_file(&output_path);

    cmd()
        .args(["grid", "-o", output_path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let content = std::fs::read_to_string(&output_path).expect("output file must exist");
    let rows: Value = serde_json::from_str(&content).unwrap();
    assert_eq!(rows.as_array().unwrap().len(), 18);

    let _ = std::fs::remove_file(&output_path);
}

// ─────────────────────────────────────────────────────────────────────────────
// day
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn day_lays_out_api_appointments() {
    let output = cmd()
        .args([
            "-c",
            &fixture("stylist.json"),
            "day",
            "-d",
            "2026-03-16",
            "-a",
            &fixture("appointments.json"),
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let day = stdout_json(&output);
    assert_eq!(day["date"], "2026-03-16");
    assert_eq!(day["statistics"]["totalBookings"], 2);
    assert_eq!(day["statistics"]["totalRevenue"], 20000);

    let slots = day["slots"].as_array().unwrap();
    let head = slots.iter().find(|s| s["startTime"] == "10:00").unwrap();
    assert_eq!(head["occupancy"]["kind"], "head");
    assert_eq!(head["occupancy"]["appointment"]["customerName"], "Tanaka Misaki");

    // The 17:00 perm runs into the extension window and blocks the 17:30 cut.
    let late = slots.iter().find(|s| s["startTime"] == "18:30").unwrap();
    assert_eq!(late["isExtensionTime"], true);
    assert_eq!(late["occupancy"]["appointmentId"], "103");

    let rejected = day["rejected"].as_array().unwrap();
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0]["error"], "overlap_conflict");
    assert_eq!(rejected[0]["appointmentId"], "102");
    assert_eq!(rejected[0]["conflictingId"], "103");
}

#[test]
fn day_reads_appointments_from_stdin() {
    let input = std::fs::read_to_string(fixture("appointments.json")).unwrap();

    let output = cmd()
        .args(["-c", &fixture("stylist.json"), "day", "-d", "2026-03-16", "-a", "-"])
        .write_stdin(input)
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["statistics"]["totalBookings"], 2);
}

#[test]
fn strict_mode_fails_when_something_was_left_off() {
    cmd()
        .args([
            "-c",
            &fixture("stylist.json"),
            "day",
            "-d",
            "2026-03-16",
            "-a",
            &fixture("appointments.json"),
            "--strict",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("1 appointment(s) could not be placed"));
}

#[test]
fn timezone_changes_which_day_appointments_land_on() {
    // In UTC the 10:00 JST appointment is at 01:00, before opening.
    let output = cmd()
        .args([
            "-c",
            &fixture("stylist.json"),
            "day",
            "-d",
            "2026-03-16",
            "-a",
            &fixture("appointments.json"),
            "--timezone",
            "UTC",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let day = stdout_json(&output);
    let rejected = day["rejected"].as_array().unwrap();
    assert!(rejected
        .iter()
        .any(|r| r["appointmentId"] == "101" && r["reason"] == "no_matching_slot"));
}

#[test]
fn unknown_timezone_fails() {
    cmd()
        .args([
            "day",
            "-d",
            "2026-03-16",
            "-a",
            &fixture("appointments.json"),
            "--timezone",
            "Nowhere/City",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid timezone"));
}

#[test]
fn invalid_date_is_rejected_by_argument_parsing() {
    cmd()
        .args(["day", "-d", "16/03/2026"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--date"));
}

// ─────────────────────────────────────────────────────────────────────────────
// week
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn week_covers_sunday_to_saturday() {
    let output = cmd()
        .args([
            "-c",
            &fixture("stylist.json"),
            "week",
            "-d",
            "2026-03-18",
            "-a",
            &fixture("appointments.json"),
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let week = stdout_json(&output);
    assert_eq!(week["weekStart"], "2026-03-15");
    let days = week["days"].as_array().unwrap();
    assert_eq!(days.len(), 7);
    assert_eq!(days[0]["closed"], true);

    // Friday is closed by the override.
    assert_eq!(days[5]["closed"], true);
    assert_eq!(days[5]["label"], "Seminar");

    // Tuesday's only appointment was cancelled.
    assert_eq!(days[2]["statistics"]["totalBookings"], 0);

    assert_eq!(week["metrics"]["weeklyBookings"], 2);
    assert_eq!(week["metrics"]["weeklyRevenue"], 20000);
}

#[test]
fn week_without_appointments_is_empty_but_valid() {
    let output = cmd().args(["week", "-d", "2026-03-18"]).output().unwrap();
    assert!(output.status.success());

    let week = stdout_json(&output);
    assert_eq!(week["metrics"]["weeklyBookings"], 0);
    assert_eq!(week["grid"].as_array().unwrap().len(), 18);
}
