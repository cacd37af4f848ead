//! Application coordinator for the long-running tracker.
//!
//! Loads the configuration, installs the signal handler and hands everything to
//! [`Core`]. The builder covers the two startup contexts:
//! - Normal run: `Salatr::new(debug_enabled).run()`
//! - Simulation: `Salatr::new(debug_enabled).without_headers().without_monitors().run()`

use anyhow::{Context, Result};

use crate::config::{self, Config};
use crate::core::{Core, CoreParams};
use crate::io::announcer::Announcer;
use crate::io::signals::setup_signal_handler;
use crate::logger::Log;

/// Builder for running the tracker.
///
/// ```no_run
/// use salatr::Salatr;
///
/// # fn main() -> anyhow::Result<()> {
/// Salatr::new(false).json_output(true).run()?;
/// # Ok(())
/// # }
/// ```
pub struct Salatr {
    debug_enabled: bool,
    json_output: bool,
    show_headers: bool,
    monitors_enabled: bool,
}

impl Salatr {
    pub fn new(debug_enabled: bool) -> Self {
        Self {
            debug_enabled,
            json_output: false,
            show_headers: true,
            monitors_enabled: true,
        }
    }

    /// Print one JSON status line per update instead of the log.
    pub fn json_output(mut self, enabled: bool) -> Self {
        self.json_output = enabled;
        self
    }

    /// Skip the version header (the simulator prints its own).
    pub fn without_headers(mut self) -> Self {
        self.show_headers = false;
        self
    }

    /// Do not start the config watcher, Geoclue or the sleep/clock monitors.
    pub fn without_monitors(mut self) -> Self {
        self.monitors_enabled = false;
        self
    }

    pub fn run(self) -> Result<()> {
        if self.json_output {
            Log::set_enabled(false);
        }
        if self.show_headers {
            log_version!();
        }

        let signal_state = setup_signal_handler(self.debug_enabled)?;

        let config_path = config::get_config_path()?;
        let config = Config::load()?;
        let settings = config
            .resolve(None)
            .context("Failed to resolve configuration")?;
        Log::set_observer_timezone(settings.calculation.timezone);

        let announcer = Announcer::desktop(settings.notifications.clone());

        Core::new(CoreParams {
            config,
            config_path,
            settings,
            announcer,
            signal_state,
            debug_enabled: self.debug_enabled,
            json_output: self.json_output,
            monitors_enabled: self.monitors_enabled,
        })
        .execute();

        Ok(())
    }
}
