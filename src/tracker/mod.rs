//! Prayer tracker state machine.
//!
//! The tracker owns the current day's [`DailyTimes`], the index of the next
//! prayer in the roster and a minute countdown. It never reads the clock:
//! every transition takes `now` from the caller, which keeps the state machine
//! deterministic and lets the simulator drive it at any speed.
//!
//! ## Transitions
//!
//! - [`Tracker::start`] resolves the next event: a previous-day Isha that crossed
//!   midnight, else the first future event today, else tomorrow's first event.
//! - [`Tracker::tick`] runs once a minute. It decrements the countdown and
//!   emits a reminder, a prayer-reached event (then advances) or a countdown.
//! - After the last slot the tracker rolls over to the next day's times.

pub mod events;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::engine::{self, CalculationParams, DailyTimes, Location};
use crate::prayer::{PrayerEvent, PrayerId, Roster};
pub use events::TrackerEvent;

/// Inputs that require recomputing the schedule when they change.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationSettings {
    pub location: Location,
    pub params: CalculationParams,
    pub timezone: Tz,
    pub include_sunnah: bool,
}

impl CalculationSettings {
    pub fn compute(&self, date: NaiveDate) -> DailyTimes {
        engine::compute(date, self.location, &self.params, self.timezone)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackerSettings {
    pub calculation: CalculationSettings,
    /// Minutes before an event at which a reminder fires (0 disables).
    pub reminder_minutes: u32,
}

/// The mutable part of the tracker, absent while no event can be resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerState {
    pub times: DailyTimes,
    pub active_index: usize,
    pub minutes_remaining: i64,
}

#[derive(Debug, Clone)]
pub struct Tracker {
    settings: TrackerSettings,
    roster: Roster,
    state: Option<TrackerState>,
}

/// Whole minutes from `now` until `time`, rounded half-up.
pub fn minutes_until(time: DateTime<Tz>, now: DateTime<Utc>) -> i64 {
    let seconds = (time.with_timezone(&Utc) - now).num_seconds() as f64;
    (seconds / 60.0 + 0.5).floor() as i64
}

/// Date the tracker rolls over to after the last slot of `originating`.
///
/// Normally the following day. If the clock already passed into a later day
/// (an Isha after midnight, or a long suspend) the current day is used.
pub fn rollover_date(originating: NaiveDate, today: NaiveDate) -> NaiveDate {
    if today <= originating {
        originating + Duration::days(1)
    } else {
        today
    }
}

impl Tracker {
    /// Build a tracker and resolve the next event relative to `now`.
    pub fn start(settings: TrackerSettings, now: DateTime<Utc>) -> Self {
        let roster = Roster::new(settings.calculation.include_sunnah);
        let mut tracker = Self {
            settings,
            roster,
            state: None,
        };
        tracker.state = tracker.resolve(now);
        tracker
    }

    fn resolve(&self, now: DateTime<Utc>) -> Option<TrackerState> {
        let calc = &self.settings.calculation;
        let today = now.with_timezone(&calc.timezone).date_naive();

        // Yesterday's Isha can still be ahead of us when it falls after midnight
        let yesterday = calc.compute(today - Duration::days(1));
        let isha_index = self.roster.index_of(PrayerId::Isha)?;
        if let Some(isha) = yesterday.get(PrayerId::Isha)
            && isha.with_timezone(&Utc) > now
        {
            return Some(self.state_at(yesterday, isha_index, now));
        }

        let times = calc.compute(today);
        if let Some(index) = self.next_defined(&times, 0, |t| t > now) {
            return Some(self.state_at(times, index, now));
        }

        let tomorrow = calc.compute(today + Duration::days(1));
        let index = self.next_defined(&tomorrow, 0, |_| true)?;
        Some(self.state_at(tomorrow, index, now))
    }

    /// First index at or after `from` whose event is defined and satisfies `accept`.
    fn next_defined(
        &self,
        times: &DailyTimes,
        from: usize,
        accept: impl Fn(DateTime<Utc>) -> bool,
    ) -> Option<usize> {
        (from..self.roster.len()).find(|index| {
            self.roster
                .get(*index)
                .and_then(|id| times.get(id))
                .is_some_and(|t| accept(t.with_timezone(&Utc)))
        })
    }

    fn state_at(&self, times: DailyTimes, index: usize, now: DateTime<Utc>) -> TrackerState {
        let minutes_remaining = self
            .roster
            .get(index)
            .and_then(|id| times.get(id))
            .map(|t| minutes_until(t, now))
            .unwrap_or(0);
        TrackerState {
            times,
            active_index: index,
            minutes_remaining,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.state.is_some()
    }

    pub fn state(&self) -> Option<&TrackerState> {
        self.state.as_ref()
    }

    pub fn settings(&self) -> &TrackerSettings {
        &self.settings
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Replace the reminder threshold without touching the schedule.
    pub fn set_reminder(&mut self, minutes: u32) {
        self.settings.reminder_minutes = minutes;
    }

    /// The event currently counted down to.
    pub fn current_event(&self) -> Option<PrayerEvent> {
        let state = self.state.as_ref()?;
        self.roster.event(&state.times, state.active_index)
    }

    /// Reminder owed by a slot that was resolved exactly at the threshold.
    ///
    /// `tick` only reminds when the countdown steps onto the threshold, so a
    /// slot resolved there by `start` or by advancing past a reached prayer
    /// would otherwise go unannounced. Call only right after resolution.
    pub fn pending_reminder(&self) -> Option<TrackerEvent> {
        let reminder = i64::from(self.settings.reminder_minutes);
        let state = self.state.as_ref()?;
        if reminder > 0 && state.minutes_remaining == reminder {
            Some(TrackerEvent::Reminder {
                event: self.current_event()?,
                minutes_remaining: reminder,
            })
        } else {
            None
        }
    }

    /// Advance the countdown by one minute.
    ///
    /// Returns `None` when the tracker is not ready.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<TrackerEvent> {
        let reminder = i64::from(self.settings.reminder_minutes);
        let state = self.state.as_mut()?;
        state.minutes_remaining -= 1;
        let minutes = state.minutes_remaining;
        let event = self.current_event()?;

        if reminder > 0 && minutes == reminder {
            Some(TrackerEvent::Reminder {
                event,
                minutes_remaining: minutes,
            })
        } else if minutes <= 0 {
            self.advance(now);
            Some(TrackerEvent::PrayerReached { event })
        } else {
            Some(TrackerEvent::Countdown {
                event,
                minutes_remaining: minutes,
            })
        }
    }

    fn advance(&mut self, now: DateTime<Utc>) {
        let Some(state) = self.state.take() else {
            return;
        };

        if let Some(next) = self.next_defined(&state.times, state.active_index + 1, |_| true) {
            self.state = Some(self.state_at(state.times, next, now));
            return;
        }

        let calc = &self.settings.calculation;
        let today = now.with_timezone(&calc.timezone).date_naive();
        let times = calc.compute(rollover_date(state.times.date, today));
        self.state = self
            .next_defined(&times, 0, |_| true)
            .map(|index| self.state_at(times, index, now));
    }
}

#[cfg(test)]
mod tests;
