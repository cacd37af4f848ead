use super::*;
use crate::engine::{AsrMethod, CalculationMethod, HighLatitudeAdjustment};
use chrono::TimeZone;
use chrono_tz::{Asia::Dubai, Europe::London, Europe::Oslo};

fn settings(tz: Tz, include_sunnah: bool, reminder_minutes: u32) -> TrackerSettings {
    TrackerSettings {
        calculation: CalculationSettings {
            location: Location {
                latitude: 51.5,
                longitude: -0.12,
            },
            params: CalculationParams {
                method: CalculationMethod::Mwl,
                asr_method: AsrMethod::Standard,
                high_latitude: HighLatitudeAdjustment::NightMiddle,
            },
            timezone: tz,
            include_sunnah,
        },
        reminder_minutes,
    }
}

fn at<T: TimeZone>(tz: &T, y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    tz.with_ymd_and_hms(y, mo, d, h, mi, 0)
        .unwrap()
        .with_timezone(&Utc)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn active(tracker: &Tracker) -> (PrayerId, NaiveDate, i64) {
    let state = tracker.state().unwrap();
    (
        tracker.roster().get(state.active_index).unwrap(),
        state.times.date,
        state.minutes_remaining,
    )
}

#[test]
fn test_start_picks_first_future_event() {
    let tracker = Tracker::start(settings(London, false, 0), at(&London, 2024, 4, 10, 12, 0));
    assert_eq!(active(&tracker), (PrayerId::Thuhr, date(2024, 4, 10), 62));
    assert_eq!(tracker.state().unwrap().active_index, 1);
}

#[test]
fn test_start_includes_duha_when_sunnah_enabled() {
    let tracker = Tracker::start(settings(London, true, 0), at(&London, 2024, 4, 10, 5, 0));
    assert_eq!(active(&tracker), (PrayerId::Duha, date(2024, 4, 10), 90));
}

#[test]
fn test_start_after_isha_uses_tomorrows_fajr() {
    let now = at(&London, 2024, 4, 10, 22, 0);
    let tracker = Tracker::start(settings(London, false, 0), now);
    let state = tracker.state().unwrap();
    let fajr = state.times.get(PrayerId::Fajr).unwrap();

    assert_eq!(state.times.date, date(2024, 4, 11));
    assert_eq!(state.active_index, 0);
    assert_eq!(state.minutes_remaining, minutes_until(fajr, now));
}

#[test]
fn test_start_keeps_yesterdays_isha_after_midnight() {
    // Isha is 20:45 UTC, which is 00:45 the next day in Dubai.
    let now = at(&Dubai, 2024, 4, 11, 0, 10);
    let tracker = Tracker::start(settings(Dubai, false, 0), now);
    assert_eq!(active(&tracker), (PrayerId::Isha, date(2024, 4, 10), 35));
}

#[test]
fn test_reminder_fires_at_threshold() {
    let mut tracker = Tracker::start(settings(London, false, 10), at(&London, 2024, 4, 10, 12, 50));
    assert_eq!(tracker.state().unwrap().minutes_remaining, 12);

    let first = tracker.tick(at(&London, 2024, 4, 10, 12, 51)).unwrap();
    assert!(matches!(first, TrackerEvent::Countdown { minutes_remaining: 11, .. }));

    let second = tracker.tick(at(&London, 2024, 4, 10, 12, 52)).unwrap();
    match second {
        TrackerEvent::Reminder {
            event,
            minutes_remaining,
        } => {
            assert_eq!(event.id, PrayerId::Thuhr);
            assert_eq!(minutes_remaining, 10);
        }
        other => panic!("expected reminder, got {other:?}"),
    }
}

#[test]
fn test_zero_reminder_never_fires() {
    let mut tracker = Tracker::start(settings(London, false, 0), at(&London, 2024, 4, 10, 13, 0));
    let event = tracker.tick(at(&London, 2024, 4, 10, 13, 1)).unwrap();
    assert!(matches!(event, TrackerEvent::Countdown { minutes_remaining: 1, .. }));
}

#[test]
fn test_prayer_reached_advances_to_next_slot() {
    let mut tracker = Tracker::start(settings(London, false, 0), at(&London, 2024, 4, 10, 13, 0));
    tracker.tick(at(&London, 2024, 4, 10, 13, 1));
    let reached = tracker.tick(at(&London, 2024, 4, 10, 13, 2)).unwrap();

    assert_eq!(
        reached,
        TrackerEvent::PrayerReached {
            event: PrayerEvent {
                id: PrayerId::Thuhr,
                label: "Thuhr",
                time: London.with_ymd_and_hms(2024, 4, 10, 13, 2, 0).unwrap(),
            }
        }
    );
    // 13:02 -> 16:45
    assert_eq!(active(&tracker), (PrayerId::Asr, date(2024, 4, 10), 223));
}

#[test]
fn test_last_slot_rolls_over_to_next_day() {
    let mut tracker = Tracker::start(settings(London, false, 0), at(&London, 2024, 4, 10, 21, 43));
    assert_eq!(active(&tracker), (PrayerId::Isha, date(2024, 4, 10), 2));

    tracker.tick(at(&London, 2024, 4, 10, 21, 44));
    let reached = tracker.tick(at(&London, 2024, 4, 10, 21, 45)).unwrap();
    assert_eq!(reached.event().id, PrayerId::Isha);

    let state = tracker.state().unwrap();
    assert_eq!(state.times.date, date(2024, 4, 11));
    assert_eq!(state.active_index, 0);
}

#[test]
fn test_isha_after_midnight_rolls_over_to_current_day() {
    let mut tracker = Tracker::start(settings(Dubai, false, 0), at(&Dubai, 2024, 4, 11, 0, 43));
    assert_eq!(active(&tracker), (PrayerId::Isha, date(2024, 4, 10), 2));

    tracker.tick(at(&Dubai, 2024, 4, 11, 0, 44));
    tracker.tick(at(&Dubai, 2024, 4, 11, 0, 45));

    let (id, day, minutes) = active(&tracker);
    assert_eq!((id, day), (PrayerId::Fajr, date(2024, 4, 11)));
    assert!(minutes > 0);
}

fn night_seventh(reminder_minutes: u32) -> TrackerSettings {
    let mut s = settings(London, false, reminder_minutes);
    s.calculation.params.high_latitude = HighLatitudeAdjustment::NightSeventh;
    s
}

#[test]
fn test_start_after_midnight_skips_past_isha() {
    // Isha on 2024-05-20 is 22:03; at 00:10 it is gone, not pending.
    let now = at(&London, 2024, 5, 21, 0, 10);
    let tracker = Tracker::start(night_seventh(0), now);

    let isha_index = tracker.roster().index_of(PrayerId::Isha).unwrap();
    assert_ne!(tracker.state().unwrap().active_index, isha_index);
    assert_eq!(active(&tracker), (PrayerId::Fajr, date(2024, 5, 21), 220));
}

#[test]
fn test_isha_before_midnight_ticks_into_next_days_fajr() {
    let mut tracker = Tracker::start(night_seventh(0), at(&London, 2024, 5, 20, 21, 53));
    assert_eq!(active(&tracker), (PrayerId::Isha, date(2024, 5, 20), 10));

    let mut now = at(&London, 2024, 5, 20, 21, 53);
    for _ in 0..10 {
        now += Duration::minutes(1);
        tracker.tick(now);
    }
    assert_eq!(now, at(&London, 2024, 5, 20, 22, 3));
    assert_eq!(active(&tracker).0, PrayerId::Fajr);
    assert_eq!(active(&tracker).1, date(2024, 5, 21));

    // Past midnight the countdown still targets the same Fajr.
    while now < at(&London, 2024, 5, 21, 0, 10) {
        now += Duration::minutes(1);
        let event = tracker.tick(now).unwrap();
        assert_eq!(event.event().id, PrayerId::Fajr);
    }
    assert_eq!(active(&tracker), (PrayerId::Fajr, date(2024, 5, 21), 220));
}

#[test]
fn test_pending_reminder_when_started_at_threshold() {
    let mut tracker = Tracker::start(settings(London, false, 10), at(&London, 2024, 4, 10, 12, 52));
    match tracker.pending_reminder() {
        Some(TrackerEvent::Reminder {
            event,
            minutes_remaining,
        }) => {
            assert_eq!(event.id, PrayerId::Thuhr);
            assert_eq!(minutes_remaining, 10);
        }
        other => panic!("expected reminder, got {other:?}"),
    }

    let next = tracker.tick(at(&London, 2024, 4, 10, 12, 53)).unwrap();
    assert!(matches!(next, TrackerEvent::Countdown { minutes_remaining: 9, .. }));
}

#[test]
fn test_pending_reminder_after_reaching_prayer() {
    // Thuhr 13:02 -> Asr 16:45 is 223 minutes.
    let mut tracker = Tracker::start(settings(London, false, 223), at(&London, 2024, 4, 10, 13, 1));
    let reached = tracker.tick(at(&London, 2024, 4, 10, 13, 2)).unwrap();
    assert_eq!(reached.event().id, PrayerId::Thuhr);

    let pending = tracker.pending_reminder().unwrap();
    assert_eq!(pending.event().id, PrayerId::Asr);
}

#[test]
fn test_no_pending_reminder_off_threshold() {
    let tracker = Tracker::start(settings(London, false, 10), at(&London, 2024, 4, 10, 12, 50));
    assert_eq!(tracker.pending_reminder(), None);

    let tracker = Tracker::start(settings(London, false, 0), at(&London, 2024, 4, 10, 13, 2));
    assert_eq!(tracker.pending_reminder(), None);
}

#[test]
fn test_rollover_date_selection() {
    let d = date(2024, 4, 10);
    assert_eq!(rollover_date(d, d), date(2024, 4, 11));
    assert_eq!(rollover_date(d, date(2024, 4, 9)), date(2024, 4, 11));
    assert_eq!(rollover_date(d, date(2024, 4, 11)), date(2024, 4, 11));
    assert_eq!(rollover_date(d, date(2024, 4, 13)), date(2024, 4, 13));
}

#[test]
fn test_undefined_events_are_skipped() {
    let mut s = settings(Oslo, false, 0);
    s.calculation.location = Location {
        latitude: 69.65,
        longitude: 18.96,
    };
    let mut tracker = Tracker::start(s, at(&Oslo, 2024, 6, 21, 8, 0));
    assert_eq!(active(&tracker).0, PrayerId::Thuhr);

    // Jump straight to Asr and let it pass; Maghrib and Isha never happen.
    tracker = Tracker::start(tracker.settings().clone(), at(&Oslo, 2024, 6, 21, 17, 57));
    assert_eq!(active(&tracker), (PrayerId::Asr, date(2024, 6, 21), 1));
    let reached = tracker.tick(at(&Oslo, 2024, 6, 21, 17, 58)).unwrap();
    assert_eq!(reached.event().id, PrayerId::Asr);

    let (id, day, _) = active(&tracker);
    assert_eq!((id, day), (PrayerId::Thuhr, date(2024, 6, 22)));
}

#[test]
fn test_tick_without_state_emits_nothing() {
    let mut tracker = Tracker {
        settings: settings(London, false, 10),
        roster: Roster::new(false),
        state: None,
    };
    assert!(!tracker.is_ready());
    assert_eq!(tracker.tick(at(&London, 2024, 4, 10, 12, 0)), None);
    assert_eq!(tracker.current_event(), None);
}

#[test]
fn test_set_reminder_keeps_schedule() {
    let mut tracker = Tracker::start(settings(London, false, 0), at(&London, 2024, 4, 10, 12, 50));
    let before = tracker.state().cloned();
    tracker.set_reminder(11);
    assert_eq!(tracker.state().cloned(), before);

    let event = tracker.tick(at(&London, 2024, 4, 10, 12, 51)).unwrap();
    assert!(matches!(event, TrackerEvent::Reminder { minutes_remaining: 11, .. }));
}

#[test]
fn test_minutes_until_rounds_half_up() {
    let time = London.with_ymd_and_hms(2024, 4, 10, 13, 2, 0).unwrap();
    let base = at(&London, 2024, 4, 10, 13, 2);
    assert_eq!(minutes_until(time, base - Duration::seconds(30)), 1);
    assert_eq!(minutes_until(time, base - Duration::seconds(29)), 0);
    assert_eq!(minutes_until(time, base + Duration::seconds(30)), 0);
    assert_eq!(minutes_until(time, base - Duration::minutes(62)), 62);
}
