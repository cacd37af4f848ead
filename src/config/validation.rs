//! Configuration validation.
//!
//! Rejects values the engine cannot use before any defaults are applied, so the
//! error names the setting the user actually wrote.

use anyhow::Result;
use std::path::Path;

use super::{Config, parse_timezone};
use crate::common::constants::*;
use crate::common::utils::private_path;
use crate::engine::{AsrMethod, CalculationMethod, HighLatitudeAdjustment};
use crate::prayer::ClockFormat;

pub fn validate_config(config: &Config) -> Result<()> {
    if let Some(lat) = config.latitude
        && !(-90.0..=90.0).contains(&lat)
    {
        anyhow::bail!("latitude must be between -90 and 90 degrees (got {})", lat);
    }

    if let Some(lon) = config.longitude
        && !(-180.0..=180.0).contains(&lon)
    {
        anyhow::bail!(
            "longitude must be between -180 and 180 degrees (got {})",
            lon
        );
    }

    match (config.latitude, config.longitude) {
        (Some(_), None) | (None, Some(_)) => {
            anyhow::bail!("latitude and longitude must be set together");
        }
        (None, None) if !config.auto_location.unwrap_or(DEFAULT_AUTO_LOCATION) => {
            log_warning!(
                "No coordinates configured; using {DEFAULT_LATITUDE}, {DEFAULT_LONGITUDE} (Makkah)"
            );
            log_indented!("Set latitude/longitude or enable auto_location");
        }
        _ => {}
    }

    for (name, angle) in [
        ("fajr_angle", config.fajr_angle),
        ("isha_angle", config.isha_angle),
    ] {
        if let Some(angle) = angle
            && !(0.0..=MAXIMUM_TWILIGHT_ANGLE).contains(&angle)
        {
            anyhow::bail!(
                "{} ({}°) must be between 0 and {} degrees",
                name,
                angle,
                MAXIMUM_TWILIGHT_ANGLE
            );
        }
    }

    let method_key = config.method.as_deref().unwrap_or(DEFAULT_METHOD);
    let method = CalculationMethod::from_key(method_key, config.fajr_angle, config.isha_angle)?;
    if !matches!(method, CalculationMethod::Custom { .. })
        && (config.fajr_angle.is_some() || config.isha_angle.is_some())
    {
        log_warning!(
            "fajr_angle/isha_angle are ignored unless method = \"custom\" (method is \"{}\")",
            method_key
        );
    }

    if let Some(asr) = config.asr_method.as_deref() {
        asr.parse::<AsrMethod>()?;
    }
    if let Some(mode) = config.high_latitude_adjustment.as_deref() {
        mode.parse::<HighLatitudeAdjustment>()?;
    }
    if let Some(clock) = config.clock_format.as_deref() {
        clock.parse::<ClockFormat>()?;
    }
    if let Some(tz) = config.timezone.as_deref() {
        parse_timezone(tz)?;
    }

    if let Some(reminder) = config.reminder
        && !REMINDER_CHOICES.contains(&reminder)
    {
        anyhow::bail!(
            "reminder ({} minutes) must be one of {:?}",
            reminder,
            REMINDER_CHOICES
        );
    }

    if let Some(sound_file) = config.sound_file.as_deref()
        && !Path::new(sound_file).exists()
    {
        log_warning!(
            "sound_file {} does not exist; the default sound will be used",
            private_path(Path::new(sound_file))
        );
    }

    Ok(())
}
