//! Presentation state for status bars and the terminal.
//!
//! [`DisplayState`] is rebuilt from the tracker after every tick. In `--json`
//! mode it is printed as one JSON object per line, in the shape status bars
//! such as Waybar expect (`text`, `tooltip`, `class`), extended with the
//! schedule and the highlighted index.

use chrono::DateTime;
use chrono_tz::Tz;
use serde::Serialize;

use crate::engine::DailyTimes;
use crate::prayer::{ClockFormat, PrayerId, Roster};
use crate::tracker::events::{reached_text, reminder_text, status_text};
use crate::tracker::{Tracker, TrackerEvent};

/// Placeholder for an event that does not occur on a given day.
pub const UNDEFINED_TIME: &str = "--:--";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleEntry {
    pub prayer: PrayerId,
    pub label: &'static str,
    /// Formatted clock time, absent when the event is undefined.
    pub time: Option<String>,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayState {
    pub text: String,
    pub tooltip: String,
    /// `countdown`, `reminder`, `reached` or `unavailable`.
    pub class: &'static str,
    pub prayer: Option<PrayerId>,
    pub minutes_remaining: Option<i64>,
    pub active_index: Option<usize>,
    pub schedule: Vec<ScheduleEntry>,
}

/// Schedule rows for `times`, highlighting `active_index`.
pub fn schedule_entries(
    roster: &Roster,
    times: &DailyTimes,
    active_index: Option<usize>,
    clock: ClockFormat,
) -> Vec<ScheduleEntry> {
    roster
        .schedule(times)
        .into_iter()
        .enumerate()
        .map(|(index, (prayer, label, time))| ScheduleEntry {
            prayer,
            label,
            time: time.map(|t: DateTime<Tz>| clock.format(&t)),
            active: Some(index) == active_index,
        })
        .collect()
}

/// Aligned `Label  HH:MM` lines, `--:--` for undefined events.
pub fn schedule_lines(entries: &[ScheduleEntry]) -> Vec<String> {
    let width = entries.iter().map(|e| e.label.len()).max().unwrap_or(0);
    entries
        .iter()
        .map(|entry| {
            format!(
                "{:<width$}  {}",
                entry.label,
                entry.time.as_deref().unwrap_or(UNDEFINED_TIME)
            )
        })
        .collect()
}

impl DisplayState {
    /// State after a tick, or after start/reload when `event` is `None`.
    pub fn from_tracker(tracker: &Tracker, event: Option<&TrackerEvent>, clock: ClockFormat) -> Self {
        let Some(state) = tracker.state() else {
            return Self::unavailable();
        };

        let schedule = schedule_entries(tracker.roster(), &state.times, Some(state.active_index), clock);
        let tooltip = schedule_lines(&schedule).join("\n");
        let current = tracker.current_event();

        let (text, class) = match event {
            Some(TrackerEvent::PrayerReached { event }) => (reached_text(event.label), "reached"),
            Some(TrackerEvent::Reminder {
                event,
                minutes_remaining,
            }) => (reminder_text(event.label, *minutes_remaining), "reminder"),
            Some(TrackerEvent::Countdown {
                event,
                minutes_remaining,
            }) => (status_text(event.label, *minutes_remaining), "countdown"),
            None => match &current {
                Some(next) => (status_text(next.label, state.minutes_remaining), "countdown"),
                None => return Self::unavailable(),
            },
        };

        DisplayState {
            text,
            tooltip,
            class,
            prayer: current.map(|e| e.id),
            minutes_remaining: Some(state.minutes_remaining),
            active_index: Some(state.active_index),
            schedule,
        }
    }

    pub fn unavailable() -> Self {
        DisplayState {
            text: UNDEFINED_TIME.to_string(),
            tooltip: "Prayer times unavailable".to_string(),
            class: "unavailable",
            prayer: None,
            minutes_remaining: None,
            active_index: None,
            schedule: Vec::new(),
        }
    }

    /// Single-line JSON for status bars.
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Human-readable status for the terminal log, with the clock time of the
    /// prayer counted down to.
    pub fn plain_line(&self) -> String {
        let at = self
            .schedule
            .iter()
            .find(|entry| entry.active)
            .and_then(|entry| entry.time.as_deref());
        match at {
            Some(time) if self.class == "countdown" => format!("{} (at {time})", self.text),
            _ => self.text.clone(),
        }
    }
}
