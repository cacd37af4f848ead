//! System event monitoring.
//!
//! - Sleep/resume through the systemd-logind `PrepareForSleep` signal (D-Bus).
//! - Wall clock jumps through a `timerfd` armed with `TFD_TIMER_CANCEL_ON_SET`.
//!
//! Either event means the minute countdown no longer matches the clock, so the
//! main loop re-resolves the next prayer.

use anyhow::{Context, Result};
use nix::errno::Errno;
use nix::sys::time::TimeSpec;
use nix::sys::timerfd::{ClockId, Expiration, TimerFd, TimerFlags, TimerSetTimeFlags};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::mpsc::Sender;
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use zbus::blocking::Connection;

use crate::io::signals::SignalMessage;

const MAX_THREAD_RESTARTS: u8 = 3;
const RESTART_DELAY_MS: u64 = 2000;
const RESUME_GRACE_SECS: i64 = 5;

#[zbus::proxy(
    interface = "org.freedesktop.login1.Manager",
    default_service = "org.freedesktop.login1",
    default_path = "/org/freedesktop/login1"
)]
trait LogindManager {
    /// `start` is true before suspend and false after resume.
    #[zbus(signal)]
    fn prepare_for_sleep(&self, start: bool) -> zbus::Result<()>;
}

/// Sleep state shared by both monitors so clock jumps caused by a suspend are
/// not reported twice.
#[derive(Clone, Default)]
struct SleepTracker {
    is_sleeping: Arc<AtomicBool>,
    resume_time: Arc<AtomicI64>,
}

impl SleepTracker {
    fn current_timestamp() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    fn in_resume_grace_period(&self) -> bool {
        let resume_time = self.resume_time.load(Ordering::Relaxed);
        resume_time != 0 && Self::current_timestamp() - resume_time <= RESUME_GRACE_SECS
    }

    fn suppresses_time_change(&self) -> bool {
        self.is_sleeping.load(Ordering::Relaxed) || self.in_resume_grace_period()
    }
}

/// Start the sleep and clock monitors in their own threads.
///
/// Failures only disable the affected monitor.
pub fn start_sleep_resume_monitor(signal_sender: Sender<SignalMessage>, debug_enabled: bool) {
    let sleep_tracker = SleepTracker::default();

    thread::spawn({
        let signal_sender = signal_sender.clone();
        let sleep_tracker = sleep_tracker.clone();
        move || run_sleep_monitor(signal_sender, debug_enabled, sleep_tracker)
    });

    thread::spawn(move || {
        if let Err(e) = monitor_time_changes(signal_sender, debug_enabled, sleep_tracker) {
            log_pipe!();
            log_warning!("Time change monitor error: {}", e);
            log_indented!("System clock changes will not be detected");
        }
    });
}

fn run_sleep_monitor(signal_sender: Sender<SignalMessage>, debug_enabled: bool, sleep_tracker: SleepTracker) {
    for attempt in 0..=MAX_THREAD_RESTARTS {
        match monitor_sleep_signals(&signal_sender, debug_enabled, &sleep_tracker) {
            Ok(()) => {
                if debug_enabled {
                    log_pipe!();
                    log_debug!("Sleep monitor thread exiting normally");
                }
                return;
            }
            Err(e) => {
                log_pipe!();
                log_warning!("Sleep monitor error: {}", e);
                if attempt < MAX_THREAD_RESTARTS {
                    log_indented!(
                        "Will restart D-Bus monitor (attempt {}/{})",
                        attempt + 1,
                        MAX_THREAD_RESTARTS
                    );
                    thread::sleep(Duration::from_millis(RESTART_DELAY_MS));
                }
            }
        }
    }
    log_indented!("Maximum restart attempts reached for sleep monitor");
    log_indented!("Sleep/resume detection will not be available");
}

fn monitor_sleep_signals(
    signal_sender: &Sender<SignalMessage>,
    debug_enabled: bool,
    sleep_tracker: &SleepTracker,
) -> Result<()> {
    let connection = Connection::system().context("Failed to connect to system D-Bus")?;
    let logind_proxy =
        LogindManagerProxyBlocking::new(&connection).context("Failed to create logind proxy")?;
    let sleep_signals = logind_proxy
        .receive_prepare_for_sleep()
        .context("Failed to subscribe to PrepareForSleep signals")?;

    if debug_enabled {
        log_pipe!();
        log_debug!("Subscribed to systemd-logind PrepareForSleep signals");
    }

    for signal in sleep_signals {
        let args = match signal.args() {
            Ok(args) => args,
            Err(e) => {
                log_pipe!();
                log_warning!("Failed to parse PrepareForSleep signal args: {}", e);
                continue;
            }
        };

        if args.start {
            sleep_tracker.is_sleeping.store(true, Ordering::SeqCst);
            if debug_enabled {
                log_pipe!();
                log_debug!("System entering sleep/suspend mode");
            }
            continue;
        }

        sleep_tracker
            .resume_time
            .store(SleepTracker::current_timestamp(), Ordering::SeqCst);
        sleep_tracker.is_sleeping.store(false, Ordering::SeqCst);

        log_pipe!();
        log_info!("System resuming from sleep/suspend - recalculating");
        if signal_sender.send(SignalMessage::Sleep { resuming: true }).is_err() {
            return Ok(());
        }
    }

    Err(anyhow::anyhow!(
        "D-Bus connection lost - PrepareForSleep signal stream ended"
    ))
}

/// A realtime timer set far in the future; it only fires when the clock is set.
struct TimeChangeDetector {
    timer: TimerFd,
}

impl TimeChangeDetector {
    fn new() -> nix::Result<Self> {
        let timer = TimerFd::new(ClockId::CLOCK_REALTIME, TimerFlags::empty())?;
        let mut detector = TimeChangeDetector { timer };
        detector.arm_timer()?;
        Ok(detector)
    }

    fn arm_timer(&mut self) -> nix::Result<()> {
        let flags =
            TimerSetTimeFlags::TFD_TIMER_ABSTIME | TimerSetTimeFlags::TFD_TIMER_CANCEL_ON_SET;
        let far_future = TimeSpec::new(i64::MAX / 1000, 0);
        self.timer.set(Expiration::OneShot(far_future), flags)
    }

    fn wait_for_time_change(&mut self) -> Result<()> {
        match self.timer.wait() {
            Ok(()) | Err(Errno::ECANCELED) => {
                self.arm_timer().context("Failed to re-arm clock timer")?;
                Ok(())
            }
            Err(other) => Err(anyhow::anyhow!("Timer wait error: {}", other)),
        }
    }
}

/// Detects manual clock changes and NTP steps. DST transitions do not change
/// the system clock and are handled by the timezone math instead.
fn monitor_time_changes(
    signal_sender: Sender<SignalMessage>,
    debug_enabled: bool,
    sleep_tracker: SleepTracker,
) -> Result<()> {
    let mut detector =
        TimeChangeDetector::new().context("Failed to create time change detector")?;

    if debug_enabled {
        log_pipe!();
        log_debug!("Monitoring the system clock for changes");
    }

    loop {
        detector
            .wait_for_time_change()
            .context("Time change detection failed")?;

        if sleep_tracker.suppresses_time_change() {
            continue;
        }

        log_pipe!();
        log_info!("System time changed - recalculating");
        if signal_sender.send(SignalMessage::TimeChange).is_err() {
            return Ok(());
        }
    }
}
