//! Solar time engine.
//!
//! Computes the six daily prayer events for one observer and one date from the
//! sun's declination and equation of time. Everything here is a pure function of
//! its inputs: no clock reads, no I/O, no shared state.
//!
//! Events the sun never reaches for a given latitude and date (for example Fajr
//! in a London midsummer, or sunset above the Arctic circle) come back as
//! `None` instead of a bogus timestamp.

pub mod astro;
pub mod method;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use std::fmt;

pub use method::{AsrMethod, CalculationMethod, HighLatitudeAdjustment, IshaRule};

/// Horizon depression for sunrise and sunset (refraction plus solar radius).
pub const HORIZON_ANGLE: f64 = 0.833;

/// Duha begins a quarter hour after sunrise.
pub const DUHA_OFFSET_HOURS: f64 = 0.25;

/// Maghrib is taken one minute after sunset.
pub const MAGHRIB_OFFSET_HOURS: f64 = 0.017;

/// Isha offset for methods without an Isha angle.
pub const FIXED_ISHA_OFFSET_MINUTES: i64 = 90;

/// The six daily events in chronological order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrayerId {
    Fajr,
    Duha,
    Thuhr,
    Asr,
    Maghrib,
    Isha,
}

impl PrayerId {
    pub const ALL: [PrayerId; 6] = [
        PrayerId::Fajr,
        PrayerId::Duha,
        PrayerId::Thuhr,
        PrayerId::Asr,
        PrayerId::Maghrib,
        PrayerId::Isha,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            PrayerId::Fajr => "fajr",
            PrayerId::Duha => "duha",
            PrayerId::Thuhr => "thuhr",
            PrayerId::Asr => "asr",
            PrayerId::Maghrib => "maghrib",
            PrayerId::Isha => "isha",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for PrayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Observer position in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// Everything besides date, location and zone that affects the result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalculationParams {
    pub method: CalculationMethod,
    pub asr_method: AsrMethod,
    pub high_latitude: HighLatitudeAdjustment,
}

/// Unrounded event times in fractional UTC-relative solar hours.
///
/// Kept alongside the rounded timestamps for diagnostics (`salatr times --debug`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawHours {
    pub fajr: f64,
    pub sunrise: f64,
    pub thuhr: f64,
    pub asr: f64,
    pub sunset: f64,
    pub isha: f64,
    /// Length of the night from sunset to the next sunrise.
    pub night: f64,
}

/// Prayer times for one date, location and method.
///
/// Built once by [`compute`] and replaced wholesale on day change or reconfiguration.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyTimes {
    pub date: NaiveDate,
    pub timezone: Tz,
    times: [Option<DateTime<Tz>>; 6],
    pub raw: RawHours,
}

impl DailyTimes {
    pub fn get(&self, id: PrayerId) -> Option<DateTime<Tz>> {
        self.times[id.index()]
    }

    /// Events the sun does not reach on this date.
    pub fn undefined(&self) -> Vec<PrayerId> {
        PrayerId::ALL
            .into_iter()
            .filter(|id| self.get(*id).is_none())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PrayerId, Option<DateTime<Tz>>)> + '_ {
        PrayerId::ALL.into_iter().map(|id| (id, self.get(id)))
    }
}

/// Clamp a Fajr or Isha time so it lies no further than `night * fraction`
/// from its base (sunrise for Fajr, sunset for Isha).
///
/// `direction` is -1 for Fajr and +1 for Isha. Exactly one rule applies per mode.
pub fn adjust_high_latitude(
    mode: HighLatitudeAdjustment,
    time: f64,
    angle: f64,
    base: f64,
    night: f64,
    direction: f64,
) -> f64 {
    let max_span = night * mode.night_fraction(angle);
    if (time - base) * direction > max_span {
        base + max_span * direction
    } else {
        time
    }
}

/// Compute the day's prayer times.
pub fn compute(date: NaiveDate, location: Location, params: &CalculationParams, tz: Tz) -> DailyTimes {
    let Location {
        latitude,
        longitude,
    } = location;
    let sun = astro::sun_position(astro::julian_day(date), latitude);
    let method = params.method;

    let fajr_angle = method.fajr_angle();
    let fajr = astro::time_for_angle(fajr_angle, latitude, &sun, -1.0);
    let sunrise = astro::time_for_angle(HORIZON_ANGLE, latitude, &sun, -1.0);
    let thuhr = astro::mid_day(&sun);
    let asr_angle = astro::asr_angle(params.asr_method.shadow_factor(), latitude, sun.declination);
    let asr = astro::time_for_angle(asr_angle, latitude, &sun, 1.0);
    let sunset = astro::time_for_angle(HORIZON_ANGLE, latitude, &sun, 1.0);
    let maghrib = sunset + MAGHRIB_OFFSET_HOURS;
    let night = sunrise + 24.0 - sunset;

    let fajr = adjust_high_latitude(params.high_latitude, fajr, fajr_angle, sunrise, night, -1.0);

    let isha = match method.isha_rule() {
        IshaRule::Angle(angle) => {
            let isha = astro::time_for_angle(angle, latitude, &sun, 1.0);
            adjust_high_latitude(params.high_latitude, isha, angle, sunset, night, 1.0)
        }
        IshaRule::FixedOffset => maghrib + FIXED_ISHA_OFFSET_MINUTES as f64 / 60.0,
    };

    let midnight = date.and_time(chrono::NaiveTime::MIN).and_utc();
    let stamp = |hours: f64| to_timestamp(midnight, hours, longitude, tz);

    let maghrib_time = stamp(maghrib);
    let isha_time = match method.isha_rule() {
        IshaRule::Angle(_) => stamp(isha),
        IshaRule::FixedOffset => {
            maghrib_time.map(|m| m + Duration::minutes(FIXED_ISHA_OFFSET_MINUTES))
        }
    };

    DailyTimes {
        date,
        timezone: tz,
        times: [
            stamp(fajr),
            stamp(sunrise + DUHA_OFFSET_HOURS),
            stamp(thuhr),
            stamp(asr),
            maghrib_time,
            isha_time,
        ],
        raw: RawHours {
            fajr,
            sunrise,
            thuhr,
            asr,
            sunset,
            isha,
            night,
        },
    }
}

/// Convert solar hours to a timestamp rounded half-up to the minute.
fn to_timestamp(midnight: DateTime<Utc>, hours: f64, longitude: f64, tz: Tz) -> Option<DateTime<Tz>> {
    if !hours.is_finite() {
        return None;
    }
    let minutes = ((hours - longitude / 15.0) * 60.0 + 0.5).floor();
    Some((midnight + Duration::minutes(minutes as i64)).with_timezone(&tz))
}
