//! Application-wide constants and configuration defaults.

// # Application Defaults

pub const DEFAULT_AUTO_LOCATION: bool = false;
pub const DEFAULT_METHOD: &str = "mwl";
pub const DEFAULT_ASR_METHOD: &str = "standard";
pub const DEFAULT_HIGH_LATITUDE_ADJUSTMENT: &str = "night-middle";
pub const DEFAULT_INCLUDE_SUNNAH: bool = false;
pub const DEFAULT_NOTIFY: bool = true;
pub const DEFAULT_SOUND: bool = false;
pub const DEFAULT_REMINDER: u32 = 0;
pub const DEFAULT_CLOCK_FORMAT: &str = "24h";

/// Used when no coordinates are configured and Geoclue is off.
/// Makkah, so a fresh install shows sensible times.
pub const DEFAULT_LATITUDE: f64 = 21.4225;
pub const DEFAULT_LONGITUDE: f64 = 39.8262;

// # Validation Limits

/// Allowed reminder lead times in minutes (0 disables reminders).
pub const REMINDER_CHOICES: [u32; 4] = [0, 5, 10, 15];

/// Twilight angles beyond this are not meaningful for prayer times.
pub const MAXIMUM_TWILIGHT_ANGLE: f64 = 30.0;

// # Timing

/// Interval between tracker ticks.
pub const TICK_INTERVAL_SECS: u64 = 60;

/// Debounce for config file change events.
pub const CONFIG_DEBOUNCE_MS: u64 = 500;

/// Geoclue accuracy level (GCLUE_ACCURACY_LEVEL_STREET).
pub const GEOCLUE_ACCURACY_STREET: u32 = 6;
pub const GEOCLUE_TIME_THRESHOLD_SECS: u32 = 60;
pub const GEOCLUE_DISTANCE_THRESHOLD_METERS: u32 = 200;

/// Desktop entry id reported to Geoclue and the notification daemon.
pub const APP_ID: &str = "salatr";

// # Exit Codes

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
