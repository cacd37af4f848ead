//! POSIX signal handling and the message type shared by all collaborator threads.
//!
//! Every background thread (signal handler, config watcher, Geoclue monitor,
//! sleep and clock monitors) talks to the main loop only through
//! [`SignalMessage`]s sent over one channel.

use anyhow::{Context, Result};
use signal_hook::{
    consts::signal::{SIGHUP, SIGINT, SIGTERM, SIGUSR2},
    iterator::Signals,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::thread;

/// Messages delivered to the main loop.
#[derive(Debug, Clone, PartialEq)]
pub enum SignalMessage {
    /// Reload the configuration (SIGUSR2 or a config file change).
    Reload,
    /// Stop the main loop (SIGINT, SIGTERM, SIGHUP).
    Shutdown,
    /// Geoclue reported a new position.
    LocationUpdated { latitude: f64, longitude: f64 },
    /// Geoclue could not be used; carries the reason.
    LocationFailed(String),
    /// The wall clock jumped (manual change or NTP step).
    TimeChange,
    /// Sleep or resume reported by logind.
    Sleep { resuming: bool },
}

/// Channel ends and the running flag shared with collaborator threads.
pub struct SignalState {
    pub running: Arc<AtomicBool>,
    pub signal_receiver: Receiver<SignalMessage>,
    pub signal_sender: Sender<SignalMessage>,
}

impl SignalState {
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

/// Register the signal handler thread.
///
/// SIGINT, SIGTERM and SIGHUP become [`SignalMessage::Shutdown`]; SIGUSR2
/// becomes [`SignalMessage::Reload`].
pub fn setup_signal_handler(debug_enabled: bool) -> Result<SignalState> {
    let running = Arc::new(AtomicBool::new(true));
    let (signal_sender, signal_receiver) = std::sync::mpsc::channel::<SignalMessage>();

    let mut signals = Signals::new([SIGINT, SIGTERM, SIGHUP, SIGUSR2])
        .context("failed to register signal handlers")?;

    let running_clone = running.clone();
    let sender = signal_sender.clone();

    thread::spawn(move || {
        for sig in signals.forever() {
            match sig {
                SIGUSR2 => {
                    log_pipe!();
                    log_info!("Received configuration reload signal");
                    if sender.send(SignalMessage::Reload).is_err() {
                        break;
                    }
                }
                _ => {
                    let message = match sig {
                        SIGINT if debug_enabled => {
                            "Received SIGINT (Ctrl+C), shutting down..."
                        }
                        SIGINT => "Received interrupt signal, shutting down...",
                        SIGTERM => "Received termination request, shutting down...",
                        _ => "Received hangup signal, shutting down...",
                    };
                    log_pipe!();
                    log_info!("{}", message);

                    if let Err(e) = sender.send(SignalMessage::Shutdown) {
                        log_warning!("Failed to send shutdown message: {e}");
                        log_indented!("Main loop appears to have already exited");
                    }
                    running_clone.store(false, Ordering::SeqCst);
                    break;
                }
            }
        }
    });

    Ok(SignalState {
        running,
        signal_receiver,
        signal_sender,
    })
}
