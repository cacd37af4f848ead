//! Configuration system for salatr.
//!
//! Settings live in `salatr.toml` under the XDG config directory
//! (`~/.config/salatr/salatr.toml`), or in the directory given with `--config`.
//! A commented default file is written on first start.
//!
//! ```toml
//! #[Location]
//! auto_location = false    # Use Geoclue for the observer location
//! latitude = 21.422500     # Manual latitude (-90 to 90)
//! longitude = 39.826200    # Manual longitude (-180 to 180)
//! # timezone = "Asia/Riyadh"  # IANA zone (default: looked up from coordinates)
//!
//! #[Calculation]
//! method = "mwl"           # mwl, egypt, france, isna, karachi, turkey, makkah, malaysia, russia, custom
//! # fajr_angle = 18.0      # Custom method only
//! # isha_angle = 17.0      # Custom method only (omit for Maghrib + 90 minutes)
//! asr_method = "standard"  # standard or hanafi
//! high_latitude_adjustment = "night-middle"  # night-middle, night-seventh or angle
//! include_sunnah = false   # Track Duha as well
//!
//! #[Notifications]
//! notify = true            # Desktop notifications
//! sound = false            # Play a sound when a prayer time is reached
//! # sound_file = "/usr/share/sounds/freedesktop/stereo/complete.oga"
//! reminder = 0             # Minutes before each prayer (0, 5, 10 or 15)
//! clock_format = "24h"     # 24h or 12h
//! ```
//!
//! A `geo.toml` beside the main file may hold `latitude`/`longitude`; it overrides
//! the main file so coordinates can be kept out of version-controlled dotfiles.

pub mod builder;
pub mod loading;
pub mod validation;
pub mod watcher;

use anyhow::Result;
use chrono_tz::Tz;
use serde::Deserialize;
use std::path::PathBuf;

use crate::common::constants::*;
use crate::engine::{AsrMethod, CalculationMethod, CalculationParams, HighLatitudeAdjustment, Location};
use crate::prayer::ClockFormat;
use crate::tracker::{CalculationSettings, TrackerSettings};

pub use builder::{create_default_config, set_auto_location};
pub use loading::{get_config_path, get_custom_config_dir, get_geo_path, load, load_from_path, set_config_dir};
pub use watcher::start_config_watcher;

/// Optional geo.toml holding private coordinates.
#[derive(Debug, Deserialize, Clone)]
pub(crate) struct GeoConfig {
    pub(crate) latitude: Option<f64>,
    pub(crate) longitude: Option<f64>,
}

/// Raw contents of `salatr.toml`.
///
/// Every field is optional; [`loading::load_from_path`] fills in defaults and
/// [`validation::validate_config`] rejects out-of-range values.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct Config {
    /// Track the location through Geoclue instead of the manual coordinates.
    pub auto_location: Option<bool>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// IANA timezone name. Looked up from the coordinates when absent.
    pub timezone: Option<String>,

    /// Preset key or `custom`.
    pub method: Option<String>,
    /// Fajr depression angle for the custom method.
    pub fajr_angle: Option<f64>,
    /// Isha depression angle for the custom method; absent means Maghrib + 90 minutes.
    pub isha_angle: Option<f64>,
    pub asr_method: Option<String>,
    pub high_latitude_adjustment: Option<String>,
    /// Include the Sunnah Duha slot in the roster.
    pub include_sunnah: Option<bool>,

    pub notify: Option<bool>,
    pub sound: Option<bool>,
    pub sound_file: Option<String>,
    /// Reminder lead time in minutes: 0, 5, 10 or 15.
    pub reminder: Option<u32>,
    pub clock_format: Option<String>,
}

/// Settings that only affect how events are announced.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationSettings {
    pub notify: bool,
    pub sound: bool,
    pub sound_file: Option<PathBuf>,
    pub reminder: u32,
    pub clock_format: ClockFormat,
}

/// Fully resolved, typed settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub auto_location: bool,
    pub calculation: CalculationSettings,
    pub notifications: NotificationSettings,
}

/// What a config reload requires of the running tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadKind {
    Unchanged,
    /// Only announcement settings changed; keep the current schedule.
    NotificationsOnly,
    /// Location or calculation inputs changed; rebuild the tracker.
    Recompute,
}

impl Settings {
    pub fn tracker_settings(&self) -> TrackerSettings {
        TrackerSettings {
            calculation: self.calculation.clone(),
            reminder_minutes: self.notifications.reminder,
        }
    }

    /// Classify the change from `self` to `new`.
    pub fn reload_kind(&self, new: &Settings) -> ReloadKind {
        if self.calculation != new.calculation {
            ReloadKind::Recompute
        } else if self.notifications != new.notifications || self.auto_location != new.auto_location {
            ReloadKind::NotificationsOnly
        } else {
            ReloadKind::Unchanged
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        loading::load()
    }

    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        loading::load_from_path(path)
    }

    pub fn get_config_path() -> Result<PathBuf> {
        loading::get_config_path()
    }

    pub fn get_geo_path() -> Result<PathBuf> {
        loading::get_geo_path()
    }

    /// Manual location from the config, falling back to the built-in default.
    pub fn manual_location(&self) -> Location {
        Location {
            latitude: self.latitude.unwrap_or(DEFAULT_LATITUDE),
            longitude: self.longitude.unwrap_or(DEFAULT_LONGITUDE),
        }
    }

    /// Resolve into typed settings.
    ///
    /// `located` replaces the manual coordinates when Geoclue has reported a position.
    pub fn resolve(&self, located: Option<Location>) -> Result<Settings> {
        let location = match (self.auto_location.unwrap_or(DEFAULT_AUTO_LOCATION), located) {
            (true, Some(location)) => location,
            _ => self.manual_location(),
        };

        let timezone = match self.timezone.as_deref() {
            Some(name) => parse_timezone(name)?,
            None => crate::geo::determine_timezone_from_coordinates(location.latitude, location.longitude),
        };

        let method = CalculationMethod::from_key(
            self.method.as_deref().unwrap_or(DEFAULT_METHOD),
            self.fajr_angle,
            self.isha_angle,
        )?;
        let asr_method: AsrMethod = self.asr_method.as_deref().unwrap_or(DEFAULT_ASR_METHOD).parse()?;
        let high_latitude: HighLatitudeAdjustment = self
            .high_latitude_adjustment
            .as_deref()
            .unwrap_or(DEFAULT_HIGH_LATITUDE_ADJUSTMENT)
            .parse()?;
        let clock_format: ClockFormat = self
            .clock_format
            .as_deref()
            .unwrap_or(DEFAULT_CLOCK_FORMAT)
            .parse()?;

        Ok(Settings {
            auto_location: self.auto_location.unwrap_or(DEFAULT_AUTO_LOCATION),
            calculation: CalculationSettings {
                location,
                params: CalculationParams {
                    method,
                    asr_method,
                    high_latitude,
                },
                timezone,
                include_sunnah: self.include_sunnah.unwrap_or(DEFAULT_INCLUDE_SUNNAH),
            },
            notifications: NotificationSettings {
                notify: self.notify.unwrap_or(DEFAULT_NOTIFY),
                sound: self.sound.unwrap_or(DEFAULT_SOUND),
                sound_file: self.sound_file.as_ref().map(PathBuf::from),
                reminder: self.reminder.unwrap_or(DEFAULT_REMINDER),
                clock_format,
            },
        })
    }
}

pub(crate) fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| anyhow::anyhow!("Unknown timezone \"{name}\". Use an IANA name such as \"Europe/London\""))
}

impl Settings {
    /// Log the effective settings in the startup block.
    pub fn log(&self) {
        let calc = &self.calculation;
        let Location {
            latitude,
            longitude,
        } = calc.location;
        let lat_dir = if latitude >= 0.0 { "N" } else { "S" };
        let lon_dir = if longitude >= 0.0 { "E" } else { "W" };

        log_block_start!("Loaded configuration");
        if self.auto_location {
            log_indented!("Location: automatic (Geoclue)");
        }
        log_indented!(
            "Coordinates: {:.4}°{lat_dir}, {:.4}°{lon_dir}",
            latitude.abs(),
            longitude.abs()
        );
        log_indented!("Timezone: {}", calc.timezone);
        log_indented!("Method: {}", calc.params.method.long_name());
        if let CalculationMethod::Custom {
            fajr_angle,
            isha_angle,
        } = calc.params.method
        {
            match isha_angle {
                Some(isha) => log_indented!("Angles: Fajr {fajr_angle}°, Isha {isha}°"),
                None => log_indented!("Angles: Fajr {fajr_angle}°, Isha Maghrib + 90 min"),
            }
        }
        log_indented!("Asr: {}", calc.params.asr_method.label());
        log_indented!("High latitudes: {}", calc.params.high_latitude.label());
        if calc.include_sunnah {
            log_indented!("Including Sunnah (Duha)");
        }

        let n = &self.notifications;
        log_indented!(
            "Notifications: {}, sound: {}",
            if n.notify { "on" } else { "off" },
            if n.sound { "on" } else { "off" }
        );
        if n.reminder > 0 {
            log_indented!("Reminder: {} minutes before", n.reminder);
        }
    }
}

#[cfg(test)]
mod tests;
