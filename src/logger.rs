//! Structured logging with box-drawing output.
//!
//! All of salatr's terminal output goes through the macros in this module so that
//! the daemon, the one-shot commands and the simulator share one visual style.
//! Logging can be switched off at runtime, which `--json` mode relies on to keep
//! stdout reserved for machine-readable status lines.

use std::io::Write;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

static LOGGING_ENABLED: AtomicBool = AtomicBool::new(true);

// Observer timezone, used to show prayer-local time next to host time in simulations
static OBSERVER_TIMEZONE: OnceLock<chrono_tz::Tz> = OnceLock::new();

/// Main logging interface.
///
/// ## Conventions
///
/// - **`log_block_start!`** opens a new conceptual block (`┃` spacer, then `┣ message`).
///   Follow it with `log_decorated!` or `log_indented!` for related lines.
/// - **`log_decorated!`** prints `┣ message`, a line inside the current block.
/// - **`log_indented!`** prints `┃   message` for nested details such as schedules.
/// - **`log_pipe!`** inserts a bare `┃`. Use it before a semantic macro that starts a
///   new block, never directly before `log_block_start!` or `log_end!`.
/// - **`log_version!`** prints the `┏ salatr vX.Y.Z ━━╸` header once at startup.
/// - **`log_end!`** prints the closing `╹`.
/// - **`log_info!`, `log_warning!`, `log_error!`, `log_debug!`, `log_critical!`** carry a
///   colored `[LEVEL]` tag on the pipe.
pub struct Log;

impl Log {
    /// Enable or disable all logging output.
    pub fn set_enabled(enabled: bool) {
        LOGGING_ENABLED.store(enabled, Ordering::SeqCst);
    }

    pub fn is_enabled() -> bool {
        LOGGING_ENABLED.load(Ordering::SeqCst)
    }

    /// Record the observer's timezone so simulated timestamps can show both clocks.
    pub fn set_observer_timezone(tz: chrono_tz::Tz) {
        let _ = OBSERVER_TIMEZONE.set(tz);
    }

    /// Timestamp prefix shown while running on simulated time.
    ///
    /// Shows `[HH:MM:SSP] [HH:MM:SSL]` when the observer's (prayer) clock differs
    /// from the local clock, `[HH:MM:SS]` otherwise, and nothing on real time.
    pub fn get_timestamp_prefix() -> String {
        if !(crate::time_source::is_initialized() && crate::time_source::is_simulated()) {
            return String::new();
        }

        let local_now = crate::time_source::now().with_timezone(&chrono::Local);
        let local_str = local_now.format("%H:%M:%S").to_string();

        match OBSERVER_TIMEZONE.get() {
            Some(tz) => {
                let observer_str = local_now.with_timezone(tz).format("%H:%M:%S").to_string();
                if observer_str != local_str {
                    format!("[{observer_str}P] [{local_str}L] ")
                } else {
                    format!("[{local_str}] ")
                }
            }
            None => format!("[{local_str}] "),
        }
    }
}

/// Write a fully formatted line to stdout (used by the macros).
pub fn write_output(text: &str) {
    let mut stdout = std::io::stdout().lock();
    let _ = stdout.write_all(text.as_bytes());
    let _ = stdout.flush();
}

// # Logging Macros

/// Shared expansion for the public macros: `$layout` receives the timestamp prefix
/// and the rendered message.
#[doc(hidden)]
#[macro_export]
macro_rules! __log_line {
    ($layout:expr, $($arg:tt)*) => {{
        use $crate::logger::Log;
        if Log::is_enabled() {
            let prefix = Log::get_timestamp_prefix();
            let message = format!($($arg)*);
            let layout: fn(&str, &str) -> String = $layout;
            $crate::logger::write_output(&layout(&prefix, &message));
        }
    }};
}

/// Log a decorated message inside the current block.
#[macro_export]
macro_rules! log_decorated {
    ($fmt:literal $($arg:tt)*) => {
        $crate::__log_line!(|p, m| format!("{p}┣ {m}\n"), $fmt $($arg)*)
    };
    ($expr:expr) => {
        $crate::__log_line!(|p, m| format!("{p}┣ {m}\n"), "{}", $expr)
    };
}

/// Log an indented detail line.
#[macro_export]
macro_rules! log_indented {
    ($fmt:literal $($arg:tt)*) => {
        $crate::__log_line!(|p, m| format!("{p}┃   {m}\n"), $fmt $($arg)*)
    };
    ($expr:expr) => {
        $crate::__log_line!(|p, m| format!("{p}┃   {m}\n"), "{}", $expr)
    };
}

/// Log a bare pipe for vertical spacing.
#[macro_export]
macro_rules! log_pipe {
    () => {
        $crate::__log_line!(|p, _m| format!("{p}┃\n"), "")
    };
}

/// Log the first line of a new block.
#[macro_export]
macro_rules! log_block_start {
    ($fmt:literal $($arg:tt)*) => {
        $crate::__log_line!(|p, m| format!("{p}┃\n{p}┣ {m}\n"), $fmt $($arg)*)
    };
    ($expr:expr) => {
        $crate::__log_line!(|p, m| format!("{p}┃\n{p}┣ {m}\n"), "{}", $expr)
    };
}

/// Log the application header.
#[macro_export]
macro_rules! log_version {
    () => {
        $crate::__log_line!(
            |p, m| format!("{p}┏ salatr v{m} ━━╸\n"),
            "{}",
            env!("CARGO_PKG_VERSION")
        )
    };
}

/// Log the closing marker.
#[macro_export]
macro_rules! log_end {
    () => {
        $crate::__log_line!(|p, _m| format!("{p}╹\n"), "")
    };
}

#[macro_export]
macro_rules! log_warning {
    ($fmt:literal $($arg:tt)*) => {
        $crate::__log_line!(|p, m| format!("{p}┣[\x1b[33mWARNING\x1b[0m] {m}\n"), $fmt $($arg)*)
    };
    ($expr:expr) => {
        $crate::__log_line!(|p, m| format!("{p}┣[\x1b[33mWARNING\x1b[0m] {m}\n"), "{}", $expr)
    };
}

/// Log a warning outside of any block (no pipe decoration).
#[macro_export]
macro_rules! log_warning_standalone {
    ($fmt:literal $($arg:tt)*) => {
        $crate::__log_line!(|p, m| format!("{p}[\x1b[33mWARNING\x1b[0m] {m}\n"), $fmt $($arg)*)
    };
    ($expr:expr) => {
        $crate::__log_line!(|p, m| format!("{p}[\x1b[33mWARNING\x1b[0m] {m}\n"), "{}", $expr)
    };
}

/// Log an error outside of any block (no pipe decoration).
#[macro_export]
macro_rules! log_error_standalone {
    ($fmt:literal $($arg:tt)*) => {
        $crate::__log_line!(|p, m| format!("{p}[\x1b[31mERROR\x1b[0m] {m}\n"), $fmt $($arg)*)
    };
    ($expr:expr) => {
        $crate::__log_line!(|p, m| format!("{p}[\x1b[31mERROR\x1b[0m] {m}\n"), "{}", $expr)
    };
}

#[macro_export]
macro_rules! log_error {
    ($fmt:literal $($arg:tt)*) => {
        $crate::__log_line!(|p, m| format!("{p}┣[\x1b[31mERROR\x1b[0m] {m}\n"), $fmt $($arg)*)
    };
    ($expr:expr) => {
        $crate::__log_line!(|p, m| format!("{p}┣[\x1b[31mERROR\x1b[0m] {m}\n"), "{}", $expr)
    };
}

/// Log an error that terminates the flow, closing the block with `┗`.
#[macro_export]
macro_rules! log_error_exit {
    ($fmt:literal $($arg:tt)*) => {
        $crate::__log_line!(
            |p, m| format!("{p}┃\n{p}┗[\x1b[31mERROR\x1b[0m] {m}\n"),
            $fmt $($arg)*
        )
    };
    ($expr:expr) => {
        $crate::__log_line!(
            |p, m| format!("{p}┃\n{p}┗[\x1b[31mERROR\x1b[0m] {m}\n"),
            "{}",
            $expr
        )
    };
}

#[macro_export]
macro_rules! log_info {
    ($fmt:literal $($arg:tt)*) => {
        $crate::__log_line!(|p, m| format!("{p}┣[\x1b[32mINFO\x1b[0m] {m}\n"), $fmt $($arg)*)
    };
    ($expr:expr) => {
        $crate::__log_line!(|p, m| format!("{p}┣[\x1b[32mINFO\x1b[0m] {m}\n"), "{}", $expr)
    };
}

#[macro_export]
macro_rules! log_debug {
    ($fmt:literal $($arg:tt)*) => {
        $crate::__log_line!(|p, m| format!("{p}┣[\x1b[32mDEBUG\x1b[0m] {m}\n"), $fmt $($arg)*)
    };
    ($expr:expr) => {
        $crate::__log_line!(|p, m| format!("{p}┣[\x1b[32mDEBUG\x1b[0m] {m}\n"), "{}", $expr)
    };
}

#[macro_export]
macro_rules! log_critical {
    ($fmt:literal $($arg:tt)*) => {
        $crate::__log_line!(|p, m| format!("{p}┣[\x1b[31mCRITICAL\x1b[0m] {m}\n"), $fmt $($arg)*)
    };
    ($expr:expr) => {
        $crate::__log_line!(|p, m| format!("{p}┣[\x1b[31mCRITICAL\x1b[0m] {m}\n"), "{}", $expr)
    };
}
