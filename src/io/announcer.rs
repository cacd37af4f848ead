//! Routes tracker events to the notification and sound collaborators.

use std::path::PathBuf;

use super::notifications::{DesktopNotifier, Notifier};
use super::sound::{CommandSoundPlayer, SoundPlayer, resolve_sound_file};
use crate::config::NotificationSettings;
use crate::tracker::TrackerEvent;

pub struct Announcer {
    notifier: Box<dyn Notifier>,
    sound_player: Box<dyn SoundPlayer>,
    settings: NotificationSettings,
    sound_file: PathBuf,
}

impl Announcer {
    pub fn new(
        settings: NotificationSettings,
        notifier: Box<dyn Notifier>,
        sound_player: Box<dyn SoundPlayer>,
    ) -> Self {
        let sound_file = resolve_sound_file(settings.sound_file.as_deref());
        Self {
            notifier,
            sound_player,
            settings,
            sound_file,
        }
    }

    /// Announcer backed by the desktop notification daemon and `pw-play`/`paplay`.
    pub fn desktop(settings: NotificationSettings) -> Self {
        Self::new(settings, Box::new(DesktopNotifier), Box::new(CommandSoundPlayer))
    }

    pub fn settings(&self) -> &NotificationSettings {
        &self.settings
    }

    pub fn update_settings(&mut self, settings: NotificationSettings) {
        self.sound_file = resolve_sound_file(settings.sound_file.as_deref());
        self.settings = settings;
    }

    /// Notify for reminders and reached prayers; play the cue for reached prayers.
    pub fn announce(&self, event: &TrackerEvent) {
        if self.settings.notify
            && let Some(text) = event.notification_text()
        {
            self.notifier.notify(&text);
        }
        if self.settings.sound && matches!(event, TrackerEvent::PrayerReached { .. }) {
            self.sound_player.play(&self.sound_file);
        }
    }

    /// Geolocation failures are reported even with notifications off.
    pub fn location_failed(&self, reason: &str) {
        self.notifier.notify_error(&format!(
            "Failed to connect to Geoclue, defaulting to manual location: {reason}"
        ));
    }
}
