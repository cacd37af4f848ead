//! `salatr times`: print one day's schedule.

use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;

use crate::config::Settings;
use crate::engine::DailyTimes;
use crate::prayer::{PrayerId, Roster, label};
use crate::state::display::{ScheduleEntry, schedule_entries, schedule_lines};
use crate::time_source;

#[derive(Debug, Serialize)]
pub struct TimesOutput {
    pub date: NaiveDate,
    pub timezone: String,
    pub method: &'static str,
    pub schedule: Vec<ScheduleEntry>,
    /// Slots the sun does not reach on this date.
    pub undefined: Vec<PrayerId>,
}

/// Build the schedule for `date`, defaulting to today in the configured zone.
pub fn build_times(settings: &Settings, date: Option<NaiveDate>) -> (TimesOutput, DailyTimes) {
    let calc = &settings.calculation;
    let date = date.unwrap_or_else(|| {
        time_source::now()
            .with_timezone(&calc.timezone)
            .date_naive()
    });

    let times = calc.compute(date);
    let roster = Roster::new(calc.include_sunnah);
    let schedule = schedule_entries(&roster, &times, None, settings.notifications.clock_format);
    let undefined = roster
        .ids()
        .iter()
        .copied()
        .filter(|id| times.get(*id).is_none())
        .collect();

    let output = TimesOutput {
        date,
        timezone: calc.timezone.name().to_string(),
        method: calc.params.method.key(),
        schedule,
        undefined,
    };
    (output, times)
}

pub fn handle_times_command(date: Option<NaiveDate>, json_output: bool, debug_enabled: bool) -> Result<()> {
    let settings = super::load_settings()?;
    let (output, times) = build_times(&settings, date);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "{} ({}, {})",
        output.date.format("%A %Y-%m-%d"),
        output.timezone,
        settings.calculation.params.method.long_name()
    );
    for line in schedule_lines(&output.schedule) {
        println!("  {line}");
    }

    if !output.undefined.is_empty() {
        let names: Vec<&str> = output
            .undefined
            .iter()
            .map(|id| label(*id, output.date))
            .collect();
        log_warning_standalone!(
            "{} cannot be determined on this date at this latitude",
            names.join(", ")
        );
    }

    if debug_enabled {
        let raw = times.raw;
        println!();
        println!("  Solar hours (UTC): fajr {:.4}, sunrise {:.4}, thuhr {:.4}", raw.fajr, raw.sunrise, raw.thuhr);
        println!("                     asr {:.4}, sunset {:.4}, isha {:.4}", raw.asr, raw.sunset, raw.isha);
        println!("  Night length: {:.4} h", raw.night);
    }

    Ok(())
}
