//! Hot reload of the configuration files.
//!
//! Watches the config directory (not the files themselves, since editors often
//! replace a file instead of writing it in place) and sends
//! [`SignalMessage::Reload`] to the main loop when `salatr.toml` or `geo.toml`
//! changes.

use anyhow::{Context, Result};
use notify::{Config as NotifyConfig, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::thread;
use std::time::{Duration, Instant};

use crate::common::constants::CONFIG_DEBOUNCE_MS;
use crate::common::utils::private_path;
use crate::io::signals::SignalMessage;

/// Whether an event path refers to one of the watched files, including
/// editor swap files written next to them (`salatr.toml~`, `.salatr.toml.swp`).
pub(crate) fn is_config_event(event_path: &Path, watched: &[PathBuf]) -> bool {
    let Some(event_name) = event_path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    watched.iter().any(|path| {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| {
                event_path.parent() == path.parent()
                    && (event_name == name
                        || event_name.starts_with(name)
                        || event_name.trim_start_matches('.').starts_with(name))
            })
    })
}

pub struct ConfigWatcher {
    signal_sender: Sender<SignalMessage>,
    debug_enabled: bool,
    config_path: PathBuf,
    geo_path: PathBuf,
}

impl ConfigWatcher {
    pub fn new(
        signal_sender: Sender<SignalMessage>,
        debug_enabled: bool,
        config_path: PathBuf,
        geo_path: PathBuf,
    ) -> Self {
        Self {
            signal_sender,
            debug_enabled,
            config_path,
            geo_path,
        }
    }

    /// Start the watcher thread.
    pub fn start(self) -> Result<()> {
        let Some(config_dir) = self.config_path.parent().map(Path::to_path_buf) else {
            return Ok(());
        };
        if !config_dir.is_dir() {
            if self.debug_enabled {
                log_pipe!();
                log_debug!("Config directory missing, hot reload disabled");
            }
            return Ok(());
        }

        let (tx, rx) = std::sync::mpsc::channel();
        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| {
                if let Ok(event) = res
                    && matches!(
                        event.kind,
                        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
                    )
                {
                    let _ = tx.send(event);
                }
            },
            NotifyConfig::default(),
        )
        .context("Failed to create file watcher")?;

        watcher
            .watch(&config_dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch directory: {}", private_path(&config_dir)))?;

        if self.debug_enabled {
            log_pipe!();
            log_debug!("Watching for configuration changes:");
            log_indented!("{}", private_path(&self.config_path));
            log_indented!("{}", private_path(&self.geo_path));
        }

        let watched = vec![self.config_path, self.geo_path];
        let signal_sender = self.signal_sender;
        let debug_enabled = self.debug_enabled;

        thread::spawn(move || {
            // The watcher stops when dropped
            let _watcher = watcher;
            let mut last_reload: Option<Instant> = None;

            for event in rx {
                if !event.paths.iter().any(|p| is_config_event(p, &watched)) {
                    continue;
                }
                if last_reload.is_some_and(|t| t.elapsed() < Duration::from_millis(CONFIG_DEBOUNCE_MS)) {
                    continue;
                }

                if debug_enabled {
                    log_pipe!();
                    log_info!("Configuration file change detected");
                }

                if signal_sender.send(SignalMessage::Reload).is_err() {
                    break;
                }
                last_reload = Some(Instant::now());
            }
        });

        Ok(())
    }
}

/// Start watching the active config and geo files.
pub fn start_config_watcher(signal_sender: Sender<SignalMessage>, debug_enabled: bool) -> Result<()> {
    let config_path = super::get_config_path()?;
    let geo_path = super::get_geo_path()?;
    ConfigWatcher::new(signal_sender, debug_enabled, config_path, geo_path).start()
}
