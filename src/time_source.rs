//! Time source abstraction for real and simulated time.
//!
//! The tracker never reads the clock itself; the core loop asks this module for
//! `now()` and sleeps through it. Swapping in a [`SimulatedTimeSource`] lets
//! `salatr simulate` walk through a whole day of prayers in seconds.

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Duration as ChronoDuration, NaiveDateTime, TimeZone, Utc};
use once_cell::sync::OnceCell;
use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;

static TIME_SOURCE: OnceCell<Arc<dyn TimeSource>> = OnceCell::new();

pub trait TimeSource: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Sleep for the given duration, or advance simulated time by it.
    fn sleep(&self, duration: StdDuration);

    fn is_simulated(&self) -> bool;

    /// Whether a simulation has reached its end time (always false for real time).
    fn is_ended(&self) -> bool {
        false
    }
}

/// Wall-clock time.
pub struct RealTimeSource;

impl TimeSource for RealTimeSource {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn sleep(&self, duration: StdDuration) {
        std::thread::sleep(duration);
    }

    fn is_simulated(&self) -> bool {
        false
    }
}

/// Accelerated time between two instants.
///
/// A multiplier of 60 plays one simulated minute per real second. A multiplier
/// of 0 fast-forwards: every sleep completes immediately.
pub struct SimulatedTimeSource {
    end_time: DateTime<Utc>,
    time_multiplier: f64,
    current: Mutex<DateTime<Utc>>,
}

impl SimulatedTimeSource {
    pub fn new(start_time: DateTime<Utc>, end_time: DateTime<Utc>, multiplier: f64) -> Self {
        let time_multiplier = if multiplier.is_finite() && multiplier >= 0.0 {
            multiplier
        } else {
            3600.0
        };
        Self {
            end_time,
            time_multiplier,
            current: Mutex::new(start_time.min(end_time)),
        }
    }

    fn current_time(&self) -> DateTime<Utc> {
        *self.current.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn is_ended(&self) -> bool {
        self.current_time() >= self.end_time
    }
}

impl TimeSource for SimulatedTimeSource {
    fn now(&self) -> DateTime<Utc> {
        self.current_time()
    }

    fn sleep(&self, duration: StdDuration) {
        let remaining = (self.end_time - self.current_time())
            .to_std()
            .unwrap_or(StdDuration::ZERO);
        let step = duration.min(remaining);

        if self.time_multiplier == 0.0 {
            // Yield so other threads get a chance to log
            std::thread::sleep(StdDuration::from_millis(1));
        } else if !step.is_zero() {
            std::thread::sleep(StdDuration::from_secs_f64(
                step.as_secs_f64() / self.time_multiplier,
            ));
        }

        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        let advanced = *current
            + ChronoDuration::from_std(step).unwrap_or_else(|_| ChronoDuration::zero());
        *current = advanced.min(self.end_time);
    }

    fn is_simulated(&self) -> bool {
        true
    }

    fn is_ended(&self) -> bool {
        SimulatedTimeSource::is_ended(self)
    }
}

/// Install the global time source. Only the first call has an effect.
pub fn init_time_source(source: Arc<dyn TimeSource>) {
    TIME_SOURCE.set(source).ok();
}

pub fn is_initialized() -> bool {
    TIME_SOURCE.get().is_some()
}

fn source() -> &'static Arc<dyn TimeSource> {
    TIME_SOURCE.get_or_init(|| Arc::new(RealTimeSource))
}

pub fn now() -> DateTime<Utc> {
    source().now()
}

pub fn sleep(duration: StdDuration) {
    source().sleep(duration)
}

pub fn is_simulated() -> bool {
    source().is_simulated()
}

pub fn simulation_ended() -> bool {
    source().is_ended()
}

/// Parse `YYYY-MM-DD HH:MM:SS` as a wall-clock time in `tz`.
pub fn parse_datetime_in_tz<Tz: TimeZone>(s: &str, tz: &Tz) -> Result<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .with_context(|| format!("Invalid datetime '{s}'. Use YYYY-MM-DD HH:MM:SS"))?;
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| anyhow!("'{s}' does not exist in the target timezone"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(s: &str) -> DateTime<Utc> {
        parse_datetime_in_tz(s, &Utc).unwrap()
    }

    #[test]
    fn test_fast_forward_advances_by_requested_duration() {
        let source = SimulatedTimeSource::new(
            utc("2024-04-10 12:00:00"),
            utc("2024-04-10 13:00:00"),
            0.0,
        );
        source.sleep(StdDuration::from_secs(60));
        assert_eq!(source.now(), utc("2024-04-10 12:01:00"));
        assert!(!source.is_ended());
    }

    #[test]
    fn test_simulation_caps_at_end_time() {
        let source = SimulatedTimeSource::new(
            utc("2024-04-10 12:00:00"),
            utc("2024-04-10 12:01:30"),
            0.0,
        );
        source.sleep(StdDuration::from_secs(60));
        source.sleep(StdDuration::from_secs(60));
        assert_eq!(source.now(), utc("2024-04-10 12:01:30"));
        assert!(source.is_ended());
    }

    #[test]
    fn test_parse_datetime_in_named_zone() {
        let parsed = parse_datetime_in_tz("2024-04-10 21:45:00", &chrono_tz::Europe::London)
            .unwrap();
        assert_eq!(parsed, utc("2024-04-10 20:45:00"));
    }

    #[test]
    fn test_parse_datetime_rejects_garbage() {
        assert!(parse_datetime_in_tz("tomorrow", &Utc).is_err());
    }
}
