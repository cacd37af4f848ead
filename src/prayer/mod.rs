//! Prayer roster, display labels and clock formatting.
//!
//! The roster is the ordered list of slots the tracker walks through each day.
//! Duha is a Sunnah slot and only appears when the user asks for it; Isha is
//! always the last slot.

use anyhow::{Result, bail};
use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Weekday};
use chrono_tz::Tz;
use serde::Serialize;
use std::str::FromStr;

use crate::engine::DailyTimes;
pub use crate::engine::PrayerId;

/// Display label for a slot on a given date.
///
/// Thuhr is called Jummah on Fridays; the time itself does not change.
pub fn label(id: PrayerId, date: NaiveDate) -> &'static str {
    match id {
        PrayerId::Fajr => "Fajr",
        PrayerId::Duha => "Duha",
        PrayerId::Thuhr if date.weekday() == Weekday::Fri => "Jummah",
        PrayerId::Thuhr => "Thuhr",
        PrayerId::Asr => "Asr",
        PrayerId::Maghrib => "Maghrib",
        PrayerId::Isha => "Isha",
    }
}

/// One labelled, defined event of a day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrayerEvent {
    pub id: PrayerId,
    pub label: &'static str,
    pub time: DateTime<Tz>,
}

/// The ordered slots tracked each day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    slots: Vec<PrayerId>,
}

impl Roster {
    pub fn new(include_sunnah: bool) -> Self {
        let slots = PrayerId::ALL
            .into_iter()
            .filter(|id| include_sunnah || *id != PrayerId::Duha)
            .collect();
        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<PrayerId> {
        self.slots.get(index).copied()
    }

    pub fn last_index(&self) -> usize {
        self.slots.len().saturating_sub(1)
    }

    pub fn index_of(&self, id: PrayerId) -> Option<usize> {
        self.slots.iter().position(|slot| *slot == id)
    }

    pub fn ids(&self) -> &[PrayerId] {
        &self.slots
    }

    /// Labelled events of `times` for this roster, `None` where undefined.
    pub fn schedule(&self, times: &DailyTimes) -> Vec<(PrayerId, &'static str, Option<DateTime<Tz>>)> {
        self.slots
            .iter()
            .map(|id| (*id, label(*id, times.date), times.get(*id)))
            .collect()
    }

    /// The event at `index` if the slot exists and is defined.
    pub fn event(&self, times: &DailyTimes, index: usize) -> Option<PrayerEvent> {
        let id = self.get(index)?;
        let time = times.get(id)?;
        Some(PrayerEvent {
            id,
            label: label(id, times.date),
            time,
        })
    }
}

/// Clock style for displayed times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClockFormat {
    #[default]
    TwentyFourHour,
    TwelveHour,
}

impl ClockFormat {
    pub fn key(&self) -> &'static str {
        match self {
            ClockFormat::TwentyFourHour => "24h",
            ClockFormat::TwelveHour => "12h",
        }
    }

    pub fn format<T: TimeZone>(&self, time: &DateTime<T>) -> String
    where
        T::Offset: std::fmt::Display,
    {
        match self {
            ClockFormat::TwentyFourHour => time.format("%H:%M").to_string(),
            ClockFormat::TwelveHour => time.format("%l:%M %p").to_string().trim_start().to_string(),
        }
    }
}

impl FromStr for ClockFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "24h" => Ok(ClockFormat::TwentyFourHour),
            "12h" => Ok(ClockFormat::TwelveHour),
            other => bail!("Unknown clock_format \"{other}\". Expected \"24h\" or \"12h\""),
        }
    }
}
