//! Main loop.
//!
//! [`Core`] is the only writer of tracker state. It blocks on the message
//! channel until the next tick deadline, so messages from the signal handler,
//! config watcher, Geoclue and logind monitors are handled between ticks and
//! never race with them.
//!
//! - A tick runs every 60 seconds and feeds the tracker's event to the
//!   announcer and the status output.
//! - A reload that changes calculation inputs rebuilds the tracker and restarts
//!   the tick deadline; notification-only changes are applied in place.
//! - Resume from suspend, a clock change or a missed tick re-resolves the next
//!   prayer from the current time.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::path::PathBuf;
use std::sync::mpsc::RecvTimeoutError;
use std::time::Duration;

use crate::common::constants::TICK_INTERVAL_SECS;
use crate::common::utils::private_path;
use crate::config::{self, Config, ReloadKind, Settings};
use crate::engine::Location;
use crate::io::announcer::Announcer;
use crate::io::signals::{SignalMessage, SignalState};
use crate::state::display::{DisplayState, schedule_lines};
use crate::time_source;
use crate::tracker::{Tracker, TrackerEvent};

fn tick_interval() -> ChronoDuration {
    ChronoDuration::seconds(TICK_INTERVAL_SECS as i64)
}

pub(crate) struct CoreParams {
    pub config: Config,
    pub config_path: PathBuf,
    pub settings: Settings,
    pub announcer: Announcer,
    pub signal_state: SignalState,
    pub debug_enabled: bool,
    pub json_output: bool,
    /// Start the config watcher, sleep/clock monitors and Geoclue.
    pub monitors_enabled: bool,
}

pub(crate) struct Core {
    config: Config,
    config_path: PathBuf,
    settings: Settings,
    tracker: Tracker,
    announcer: Announcer,
    signal_state: SignalState,
    debug_enabled: bool,
    json_output: bool,
    monitors_enabled: bool,
    location_monitor_started: bool,
    /// Last position reported by Geoclue.
    located: Option<Location>,
    next_tick: DateTime<Utc>,
}

impl Core {
    pub fn new(params: CoreParams) -> Self {
        let now = time_source::now();
        let tracker = Tracker::start(params.settings.tracker_settings(), now);
        Self {
            config: params.config,
            config_path: params.config_path,
            settings: params.settings,
            tracker,
            announcer: params.announcer,
            signal_state: params.signal_state,
            debug_enabled: params.debug_enabled,
            json_output: params.json_output,
            monitors_enabled: params.monitors_enabled,
            location_monitor_started: false,
            located: None,
            next_tick: now + tick_interval(),
        }
    }

    /// Run until shutdown or the end of a simulation.
    pub fn execute(mut self) {
        if let Some(custom_dir) = config::get_custom_config_dir() {
            log_block_start!("Base directory: {}", private_path(&custom_dir));
        }
        self.settings.log();
        self.start_monitors();
        self.emit(None);
        self.announce_pending_reminder();

        while self.signal_state.is_running() && !time_source::simulation_ended() {
            match self.wait_for_message() {
                Some(message) => self.handle_message(message),
                None => self.on_deadline(time_source::now()),
            }
        }

        log_block_start!("Shutting down salatr...");
        log_end!();
    }

    fn start_monitors(&mut self) {
        if !self.monitors_enabled {
            return;
        }
        let sender = &self.signal_state.signal_sender;
        if let Err(e) = config::start_config_watcher(sender.clone(), self.debug_enabled) {
            log_pipe!();
            log_warning!("Config hot reload unavailable: {e}");
        }
        crate::io::dbus::start_sleep_resume_monitor(sender.clone(), self.debug_enabled);
        self.ensure_location_monitor();
    }

    fn ensure_location_monitor(&mut self) {
        if self.monitors_enabled && self.settings.auto_location && !self.location_monitor_started {
            crate::io::geoclue::start_location_monitor(
                self.signal_state.signal_sender.clone(),
                self.debug_enabled,
            );
            self.location_monitor_started = true;
        }
    }

    /// Block until a message arrives or the tick deadline passes.
    fn wait_for_message(&self) -> Option<SignalMessage> {
        let remaining = (self.next_tick - time_source::now())
            .to_std()
            .unwrap_or(Duration::ZERO);

        if time_source::is_simulated() {
            if let Ok(message) = self.signal_state.signal_receiver.try_recv() {
                return Some(message);
            }
            time_source::sleep(remaining);
            return None;
        }

        match self.signal_state.signal_receiver.recv_timeout(remaining) {
            Ok(message) => Some(message),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => {
                log_pipe!();
                log_critical!("Message channel disconnected unexpectedly");
                self.signal_state.stop();
                None
            }
        }
    }

    /// Run the tick if its deadline has passed.
    pub(crate) fn on_deadline(&mut self, now: DateTime<Utc>) {
        if now < self.next_tick {
            return;
        }
        if now - self.next_tick >= tick_interval() {
            if self.debug_enabled {
                log_pipe!();
                log_debug!("Missed a tick, re-resolving the next prayer");
            }
            self.restart_tracker(now);
            return;
        }
        self.next_tick += tick_interval();

        if !self.tracker.is_ready() {
            self.tracker = Tracker::start(self.settings.tracker_settings(), now);
            if self.tracker.is_ready() {
                self.emit(None);
                self.announce_pending_reminder();
            }
            return;
        }

        if let Some(event) = self.tracker.tick(now) {
            self.announcer.announce(&event);
            self.emit(Some(&event));
            if matches!(event, TrackerEvent::PrayerReached { .. }) {
                self.announce_pending_reminder();
            }
        }
    }

    pub(crate) fn handle_message(&mut self, message: SignalMessage) {
        match message {
            SignalMessage::Shutdown => self.signal_state.stop(),
            SignalMessage::Reload => self.reload_config(),
            SignalMessage::LocationUpdated {
                latitude,
                longitude,
            } => {
                self.located = Some(Location {
                    latitude,
                    longitude,
                });
                if self.settings.auto_location {
                    self.apply_config(self.config.clone());
                }
            }
            SignalMessage::LocationFailed(reason) => self.location_failed(&reason),
            SignalMessage::TimeChange | SignalMessage::Sleep { resuming: true } => {
                self.restart_tracker(time_source::now());
            }
            SignalMessage::Sleep { resuming: false } => {}
        }
    }

    fn reload_config(&mut self) {
        match config::load_from_path(&self.config_path) {
            Ok(config) => self.apply_config(config),
            Err(e) => {
                log_pipe!();
                log_error!("Failed to reload config: {e:#}");
                log_indented!("Continuing with previous configuration");
            }
        }
    }

    fn apply_config(&mut self, config: Config) {
        let settings = match config.resolve(self.located) {
            Ok(settings) => settings,
            Err(e) => {
                log_pipe!();
                log_error!("Failed to apply config: {e:#}");
                log_indented!("Continuing with previous configuration");
                return;
            }
        };
        self.config = config;

        match self.settings.reload_kind(&settings) {
            ReloadKind::Unchanged => {
                if self.debug_enabled {
                    log_pipe!();
                    log_debug!("Configuration unchanged");
                }
            }
            ReloadKind::NotificationsOnly => {
                self.tracker.set_reminder(settings.notifications.reminder);
                self.announcer.update_settings(settings.notifications.clone());
                self.settings = settings;
                log_block_start!("Notification settings updated");
                self.emit(None);
            }
            ReloadKind::Recompute => {
                self.announcer.update_settings(settings.notifications.clone());
                self.settings = settings;
                self.settings.log();
                self.restart_tracker(time_source::now());
            }
        }
        self.ensure_location_monitor();
    }

    fn location_failed(&mut self, reason: &str) {
        log_pipe!();
        log_warning!("Failed to connect to Geoclue: {reason}");
        log_indented!("Falling back to the manual location");

        self.announcer.location_failed(reason);
        self.located = None;
        self.location_monitor_started = false;

        if let Err(e) = config::builder::set_auto_location_in(&self.config_path, false) {
            log_warning!("Could not disable auto_location in the config file: {e:#}");
        }
        let mut config = self.config.clone();
        config.auto_location = Some(false);
        self.apply_config(config);
    }

    /// Rebuild the tracker from `now` and restart the tick deadline.
    fn restart_tracker(&mut self, now: DateTime<Utc>) {
        self.tracker = Tracker::start(self.settings.tracker_settings(), now);
        self.next_tick = now + tick_interval();
        self.emit(None);
        self.announce_pending_reminder();
    }

    fn announce_pending_reminder(&self) {
        if let Some(event) = self.tracker.pending_reminder() {
            self.announcer.announce(&event);
            self.emit(Some(&event));
        }
    }

    fn emit(&self, event: Option<&TrackerEvent>) {
        let display = DisplayState::from_tracker(
            &self.tracker,
            event,
            self.settings.notifications.clock_format,
        );

        if self.json_output {
            match display.to_json_line() {
                Ok(line) => println!("{line}"),
                Err(e) => eprintln!("Failed to serialize status: {e}"),
            }
            return;
        }

        match event {
            None => {
                log_block_start!("Next: {}", display.plain_line());
                for (line, entry) in schedule_lines(&display.schedule).iter().zip(&display.schedule) {
                    if entry.active {
                        log_indented!("{line}  <");
                    } else {
                        log_indented!("{line}");
                    }
                }
            }
            Some(TrackerEvent::Countdown { .. }) => {
                if self.debug_enabled {
                    log_decorated!("{}", display.plain_line());
                }
            }
            Some(_) => log_block_start!("{}", display.text),
        }
    }
}
