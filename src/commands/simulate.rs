//! `salatr simulate`: run the tracker on accelerated time.
//!
//! Installs a simulated time source and returns; the caller then runs the
//! tracker normally, which walks through the simulated window and stops at its
//! end.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::sync::Arc;

use crate::logger::Log;
use crate::time_source::{self, SimulatedTimeSource};

/// Parse the simulation window as wall-clock times in `tz`.
pub fn parse_window(start_time: &str, end_time: &str, tz: &Tz) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let start = time_source::parse_datetime_in_tz(start_time, tz).context("Invalid start time")?;
    let end = time_source::parse_datetime_in_tz(end_time, tz).context("Invalid end time")?;
    if end <= start {
        bail!("End time must be after start time");
    }
    Ok((start, end))
}

/// Prepare simulation mode.
///
/// # Arguments
/// * `start_time` / `end_time` - `YYYY-MM-DD HH:MM:SS` in the configured timezone
/// * `multiplier` - Time acceleration factor (0 = fast-forward)
pub fn handle_simulate_command(
    start_time: &str,
    end_time: &str,
    multiplier: f64,
    debug_enabled: bool,
) -> Result<()> {
    let settings = super::load_settings()?;
    let tz = settings.calculation.timezone;
    let (start, end) = parse_window(start_time, end_time, &tz)?;

    // Before any logging, so every timestamp prefix is simulated.
    time_source::init_time_source(Arc::new(SimulatedTimeSource::new(start, end, multiplier)));
    Log::set_observer_timezone(tz);

    log_version!();
    log_block_start!("Simulation Mode");
    log_decorated!(
        "Simulating from {} to {} ({})",
        start.with_timezone(&tz).format("%Y-%m-%d %H:%M:%S"),
        end.with_timezone(&tz).format("%Y-%m-%d %H:%M:%S"),
        tz.name()
    );

    let duration = end - start;
    log_indented!(
        "Total simulated time: {} hours {} minutes",
        duration.num_hours(),
        duration.num_minutes() % 60
    );
    if multiplier == 0.0 {
        log_indented!("Time acceleration: fast-forward (instant execution)");
    } else {
        log_indented!(
            "Time acceleration: {}x (will complete in ~{:.1} seconds)",
            multiplier,
            duration.num_seconds() as f64 / multiplier
        );
    }

    if debug_enabled {
        log_pipe!();
        log_debug!("Simulated time source initialized");
    }
    Ok(())
}
