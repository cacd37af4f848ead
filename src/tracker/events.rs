//! Events emitted by the tracker on each tick and their user-facing text.

use crate::prayer::PrayerEvent;

/// Outcome of one tracker tick.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerEvent {
    /// Plain countdown update for the status line.
    Countdown {
        event: PrayerEvent,
        minutes_remaining: i64,
    },
    /// The configured reminder threshold was hit.
    Reminder {
        event: PrayerEvent,
        minutes_remaining: i64,
    },
    /// The event time arrived. The tracker has already moved on to the next slot.
    PrayerReached { event: PrayerEvent },
}

impl TrackerEvent {
    pub fn event(&self) -> &PrayerEvent {
        match self {
            TrackerEvent::Countdown { event, .. }
            | TrackerEvent::Reminder { event, .. }
            | TrackerEvent::PrayerReached { event } => event,
        }
    }

    /// Text for a desktop notification, if this event warrants one.
    pub fn notification_text(&self) -> Option<String> {
        match self {
            TrackerEvent::Countdown { .. } => None,
            TrackerEvent::Reminder {
                event,
                minutes_remaining,
            } => Some(reminder_text(event.label, *minutes_remaining)),
            TrackerEvent::PrayerReached { event } => Some(reached_text(event.label)),
        }
    }
}

/// `"<Name> - HH:MM"` with the time remaining, for the status line.
pub fn status_text(label: &str, minutes_remaining: i64) -> String {
    let minutes = minutes_remaining.max(0);
    format!("{label} - {:02}:{:02}", minutes / 60, minutes % 60)
}

/// `"<Name> in N minutes"`.
pub fn reminder_text(label: &str, minutes: i64) -> String {
    format!("{label} in {minutes} minutes")
}

/// `"Time for <Name>"`.
pub fn reached_text(label: &str) -> String {
    format!("Time for {label}")
}
