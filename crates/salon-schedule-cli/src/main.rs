//! `salon-schedule` CLI — build schedule grids and appointment layouts from the
//! command line.
//!
//! ## Usage
//!
//! ```sh
//! # Validate a stylist config and show the shared grid range
//! salon-schedule -c stylist.json check-config
//!
//! # Print the week grid rows as JSON
//! salon-schedule -c stylist.json grid
//!
//! # Lay out one day's appointments (booking API records) in Tokyo time
//! salon-schedule -c stylist.json day -d 2026-03-16 -a appointments.json
//!
//! # Lay out the whole week containing a date, reading appointments from stdin
//! curl -s $API/appointments/ | salon-schedule week -d 2026-03-18 -a - --timezone Asia/Tokyo
//! ```
//!
//! Without `-c` the salon's default hours are used. Set `RUST_LOG=debug` for
//! diagnostics; logs go to stderr so stdout stays valid JSON.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use salon_schedule::appointment::{blocks_from_api_json, parse_timezone};
use salon_schedule::grid::{grid_range, week_grid};
use salon_schedule::week::{build_day, build_week};
use salon_schedule::{AppointmentBlock, ScheduleConfig};
use serde::Serialize;
use std::io::{self, Read};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "salon-schedule",
    version,
    about = "Stylist schedule grid and appointment layout tool"
)]
struct Cli {
    /// Schedule config JSON (salon defaults if omitted)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Output file (writes to stdout if omitted)
    #[arg(short, long, global = true)]
    output: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the config and print the shared grid range
    CheckConfig,
    /// Print the week grid rows as JSON
    Grid,
    /// Lay out one day's appointments as JSON
    Day {
        #[command(flatten)]
        layout: LayoutArgs,
    },
    /// Lay out the week (Sunday to Saturday) containing the date as JSON
    Week {
        #[command(flatten)]
        layout: LayoutArgs,
    },
}

#[derive(clap::Args)]
struct LayoutArgs {
    /// Date to lay out (YYYY-MM-DD)
    #[arg(short, long)]
    date: NaiveDate,

    /// Booking API appointments JSON array ("-" reads stdin)
    #[arg(short, long)]
    appointments: Option<String>,

    /// Salon timezone used to localize appointment times
    #[arg(long, env = "SALON_TIMEZONE", default_value = "Asia/Tokyo")]
    timezone: String,

    /// Exit with an error if any appointment could not be laid out
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::CheckConfig => {
            let summary = match grid_range(&config.working_hours, &config.extension) {
                Some((start, end)) => format!(
                    "OK: grid {}-{}, {} rows at {}-minute precision\n",
                    start,
                    end,
                    week_grid(&config).len(),
                    config.precision_minutes
                ),
                None => "OK: no working days configured\n".to_string(),
            };
            write_output(cli.output.as_deref(), &summary)?;
        }
        Commands::Grid => {
            write_json(cli.output.as_deref(), &week_grid(&config))?;
        }
        Commands::Day { layout } => {
            let appointments = load_appointments(&layout)?;
            let grid = week_grid(&config);
            let todays = appointments_on(&appointments, layout.date);
            let day = build_day(&config, &grid, layout.date, &todays);
            info!(
                date = %day.date,
                bookings = day.statistics.total_bookings,
                rejected = day.rejected.len(),
                "day laid out"
            );
            write_json(cli.output.as_deref(), &day)?;
            check_strict(layout.strict, day.rejected.len())?;
        }
        Commands::Week { layout } => {
            let appointments = load_appointments(&layout)?;
            let week = build_week(&config, layout.date, &appointments);
            let rejected: usize = week.days.iter().map(|d| d.rejected.len()).sum();
            info!(
                week_start = %week.week_start,
                bookings = week.metrics.weekly_bookings,
                rejected,
                "week laid out"
            );
            write_json(cli.output.as_deref(), &week)?;
            check_strict(layout.strict, rejected)?;
        }
    }

    Ok(())
}

fn load_config(path: Option<&str>) -> Result<ScheduleConfig> {
    match path {
        Some(path) => {
            let json = read_input(Some(path))?;
            ScheduleConfig::from_json(&json)
                .with_context(|| format!("Invalid schedule config: {}", path))
        }
        None => {
            debug!("no config given, using salon defaults");
            Ok(ScheduleConfig::default())
        }
    }
}

fn load_appointments(layout: &LayoutArgs) -> Result<Vec<AppointmentBlock>> {
    let Some(path) = layout.appointments.as_deref() else {
        return Ok(Vec::new());
    };
    let tz = parse_timezone(&layout.timezone)?;
    let json = read_input(Some(path).filter(|p| *p != "-"))?;
    let blocks = blocks_from_api_json(&json, tz).context("Failed to read appointments")?;
    debug!(count = blocks.len(), timezone = %tz, "appointments loaded");
    Ok(blocks)
}

fn appointments_on(appointments: &[AppointmentBlock], date: NaiveDate) -> Vec<AppointmentBlock> {
    appointments
        .iter()
        .filter(|a| a.date == date)
        .cloned()
        .collect()
}

fn check_strict(strict: bool, rejected: usize) -> Result<()> {
    if strict && rejected > 0 {
        anyhow::bail!(
            "{} appointment(s) could not be placed on the schedule",
            rejected
        );
    }
    Ok(())
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_json<T: Serialize>(path: Option<&str>, value: &T) -> Result<()> {
    let mut json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    json.push('\n');
    write_output(path, &json)
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
