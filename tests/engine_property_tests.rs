use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use salatr::engine::{
    AsrMethod, CalculationMethod, CalculationParams, HighLatitudeAdjustment, Location, PrayerId,
    compute,
};

/// Latitudes where every preset defines all six events year round
fn temperate_latitude() -> impl Strategy<Value = f64> {
    -45.0..45.0
}

fn longitude_strategy() -> impl Strategy<Value = f64> {
    -180.0..=180.0
}

fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (0i64..366).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(offset)
    })
}

fn params_strategy() -> impl Strategy<Value = CalculationParams> {
    (
        0..CalculationMethod::PRESETS.len(),
        prop_oneof![Just(AsrMethod::Standard), Just(AsrMethod::Hanafi)],
        prop_oneof![
            Just(HighLatitudeAdjustment::NightMiddle),
            Just(HighLatitudeAdjustment::NightSeventh),
            Just(HighLatitudeAdjustment::Angle),
        ],
    )
        .prop_map(|(method, asr_method, high_latitude)| CalculationParams {
            method: CalculationMethod::PRESETS[method],
            asr_method,
            high_latitude,
        })
}

proptest! {
    /// Defined events are strictly increasing in the fixed order
    #[test]
    fn test_defined_events_are_ordered(
        latitude in -60.0..60.0f64,
        longitude in longitude_strategy(),
        date in date_strategy(),
        params in params_strategy(),
    ) {
        let times = compute(date, Location { latitude, longitude }, &params, chrono_tz::UTC);
        let defined: Vec<_> = times.iter().filter_map(|(id, t)| t.map(|t| (id, t))).collect();
        for pair in defined.windows(2) {
            prop_assert!(
                pair[0].1 < pair[1].1,
                "{} ({}) not before {} ({}) at {latitude}, {longitude} on {date}",
                pair[0].0, pair[0].1, pair[1].0, pair[1].1
            );
        }
    }

    #[test]
    fn test_temperate_days_define_every_event(
        latitude in temperate_latitude(),
        longitude in longitude_strategy(),
        date in date_strategy(),
        params in params_strategy(),
    ) {
        let times = compute(date, Location { latitude, longitude }, &params, chrono_tz::UTC);
        prop_assert!(times.undefined().is_empty(), "undefined: {:?}", times.undefined());
    }

    #[test]
    fn test_compute_is_idempotent(
        latitude in -90.0..=90.0f64,
        longitude in longitude_strategy(),
        date in date_strategy(),
        params in params_strategy(),
    ) {
        let location = Location { latitude, longitude };
        let first: Vec<_> = compute(date, location, &params, chrono_tz::UTC).iter().collect();
        let second: Vec<_> = compute(date, location, &params, chrono_tz::UTC).iter().collect();
        prop_assert_eq!(first, second);
    }

    /// Fixed-offset Isha is always exactly 90 minutes after Maghrib
    #[test]
    fn test_makkah_isha_gap(
        latitude in -60.0..60.0f64,
        longitude in longitude_strategy(),
        date in date_strategy(),
    ) {
        let params = CalculationParams {
            method: CalculationMethod::Makkah,
            asr_method: AsrMethod::Standard,
            high_latitude: HighLatitudeAdjustment::NightMiddle,
        };
        let times = compute(date, Location { latitude, longitude }, &params, chrono_tz::UTC);
        if let (Some(maghrib), Some(isha)) = (times.get(PrayerId::Maghrib), times.get(PrayerId::Isha)) {
            prop_assert_eq!(isha - maghrib, Duration::minutes(90));
        }
    }

    /// Timestamps land on whole minutes
    #[test]
    fn test_times_are_whole_minutes(
        latitude in temperate_latitude(),
        longitude in longitude_strategy(),
        date in date_strategy(),
    ) {
        let params = CalculationParams {
            method: CalculationMethod::Mwl,
            asr_method: AsrMethod::Standard,
            high_latitude: HighLatitudeAdjustment::NightMiddle,
        };
        let times = compute(date, Location { latitude, longitude }, &params, chrono_tz::UTC);
        for (_, time) in times.iter() {
            if let Some(time) = time {
                prop_assert_eq!(time.timestamp() % 60, 0);
            }
        }
    }
}
