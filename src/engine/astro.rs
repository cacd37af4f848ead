//! Low-precision solar position in degree arithmetic.
//!
//! All angles are in degrees and all times in fractional hours of the day.
//! Values outside the domain of `acos`/`asin` propagate as NaN so callers can
//! treat the event as undefined.

use chrono::{Datelike, NaiveDate};

/// Offset from chrono's day count (0001-01-01 = 1) to the Julian day number.
const JULIAN_DAY_OFFSET: f64 = 1_721_425.0;

/// Julian day at the start of J2000.0.
const J2000: f64 = 2_451_545.0;

/// Declination and equation of time for one day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunPosition {
    pub declination: f64,
    pub equation_of_time: f64,
}

fn dsin(d: f64) -> f64 {
    d.to_radians().sin()
}

fn dcos(d: f64) -> f64 {
    d.to_radians().cos()
}

fn dtan(d: f64) -> f64 {
    d.to_radians().tan()
}

fn darccos(x: f64) -> f64 {
    x.acos().to_degrees()
}

/// Floating modulo that always lands in `[0, b)`.
pub fn fix_mod(a: f64, b: f64) -> f64 {
    ((a % b) + b) % b
}

pub fn julian_day(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64 + JULIAN_DAY_OFFSET
}

/// Sun position for the given Julian day.
///
/// The day number is shifted by `latitude / 360`, a quirk of the published
/// algorithm that the reference tables depend on.
pub fn sun_position(jd: f64, latitude: f64) -> SunPosition {
    let d = jd - J2000 - latitude / 360.0;
    let g = fix_mod(357.529 + 0.98560028 * d, 360.0);
    let q = fix_mod(280.459 + 0.98564736 * d, 360.0);
    let l = fix_mod(q + 1.915 * dsin(g) + 0.02 * dsin(2.0 * g), 360.0);
    let e = 23.439 - 0.00000036 * d;

    let ra = fix_mod((dcos(e) * dsin(l)).atan2(dcos(l)).to_degrees() / 15.0, 24.0);
    let declination = (dsin(e) * dsin(l)).asin().to_degrees();

    SunPosition {
        declination,
        equation_of_time: q / 15.0 - ra,
    }
}

/// Solar noon in hours.
pub fn mid_day(sun: &SunPosition) -> f64 {
    fix_mod(12.0 - sun.equation_of_time, 24.0)
}

/// Time at which the sun is `angle` degrees below the horizon.
///
/// `direction` is -1 for the morning side of noon and +1 for the evening side.
pub fn time_for_angle(angle: f64, latitude: f64, sun: &SunPosition, direction: f64) -> f64 {
    let numerator = -dsin(angle) - dsin(latitude) * dsin(sun.declination);
    let denominator = dcos(latitude) * dcos(sun.declination);
    mid_day(sun) + darccos(numerator / denominator) / 15.0 * direction
}

/// Depression angle at which an object's shadow equals `factor` times its
/// length plus the noon shadow.
pub fn asr_angle(factor: f64, latitude: f64, declination: f64) -> f64 {
    -(1.0 / (factor + dtan((latitude - declination).abs())))
        .atan()
        .to_degrees()
}
