use super::builder::{find_config_line, preserve_comment_formatting, set_auto_location_in};
use super::loading::{apply_defaults, load_geo_override_from_path};
use super::validation::validate_config;
use super::*;
use serial_test::serial;
use std::fs;
use tempfile::tempdir;

fn london_config() -> Config {
    Config {
        latitude: Some(51.5),
        longitude: Some(-0.12),
        timezone: Some("Europe/London".to_string()),
        ..Config::default()
    }
}

fn write_config(dir: &std::path::Path, content: &str) -> PathBuf {
    let path = dir.join("salatr.toml");
    fs::write(&path, content).unwrap();
    path
}

#[test]
#[serial]
fn test_config_load_default_creation() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("salatr").join("salatr.toml");

    let original = std::env::var("XDG_CONFIG_HOME").ok();
    unsafe {
        std::env::set_var("XDG_CONFIG_HOME", temp_dir.path());
    }

    let result = Config::load();

    unsafe {
        match original {
            Some(val) => std::env::set_var("XDG_CONFIG_HOME", val),
            None => std::env::remove_var("XDG_CONFIG_HOME"),
        }
    }

    let config = result.unwrap();
    assert!(config_path.exists());
    assert_eq!(config.method.as_deref(), Some(DEFAULT_METHOD));
    assert_eq!(config.latitude, Some(DEFAULT_LATITUDE));
}

#[test]
fn test_default_config_file_round_trips() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("nested").join("salatr.toml");
    create_default_config(&path).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("#[Location]"));
    assert!(content.contains("#[Notifications]"));

    let config = load_from_path(&path).unwrap();
    let settings = config.resolve(None).unwrap();
    assert_eq!(settings.calculation.params.method, CalculationMethod::Mwl);
    assert_eq!(settings.notifications.reminder, 0);
    assert!(!settings.auto_location);
}

#[test]
fn test_default_config_comments_are_aligned() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("salatr.toml");
    create_default_config(&path).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let columns: Vec<usize> = content
        .lines()
        .filter(|l| !l.starts_with('#') && !l.is_empty())
        .filter_map(|l| l.find('#'))
        .collect();
    assert!(!columns.is_empty());
    assert!(columns.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn test_config_toml_parsing() {
    let temp_dir = tempdir().unwrap();
    let path = write_config(
        temp_dir.path(),
        r#"
auto_location = false
latitude = 51.5
longitude = -0.12
timezone = "Europe/London"
method = "custom"
fajr_angle = 16.0
asr_method = "hanafi"
high_latitude_adjustment = "angle"
include_sunnah = true
notify = false
sound = true
reminder = 15
clock_format = "12h"
"#,
    );

    let settings = load_from_path(&path).unwrap().resolve(None).unwrap();
    assert_eq!(
        settings.calculation.params.method,
        CalculationMethod::Custom {
            fajr_angle: 16.0,
            isha_angle: None
        }
    );
    assert_eq!(settings.calculation.params.asr_method, AsrMethod::Hanafi);
    assert_eq!(settings.calculation.params.high_latitude, HighLatitudeAdjustment::Angle);
    assert_eq!(settings.calculation.timezone, chrono_tz::Europe::London);
    assert!(settings.calculation.include_sunnah);
    assert!(!settings.notifications.notify);
    assert!(settings.notifications.sound);
    assert_eq!(settings.notifications.reminder, 15);
    assert_eq!(settings.notifications.clock_format, ClockFormat::TwelveHour);
}

#[test]
fn test_config_malformed_toml() {
    let temp_dir = tempdir().unwrap();
    let path = write_config(temp_dir.path(), "latitude = [unclosed");
    assert!(load_from_path(&path).is_err());
}

#[test]
fn test_geo_toml_overrides_coordinates() {
    let temp_dir = tempdir().unwrap();
    let path = write_config(temp_dir.path(), "latitude = 10.0\nlongitude = 20.0\n");
    fs::write(
        temp_dir.path().join("geo.toml"),
        "latitude = 51.5\nlongitude = -0.12\n",
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.latitude, Some(51.5));
    assert_eq!(config.longitude, Some(-0.12));
}

#[test]
fn test_malformed_geo_toml_is_ignored() {
    let temp_dir = tempdir().unwrap();
    let path = write_config(temp_dir.path(), "latitude = 10.0\nlongitude = 20.0\n");
    fs::write(temp_dir.path().join("geo.toml"), "latitude = ").unwrap();

    let mut config: Config = toml::from_str("latitude = 10.0\nlongitude = 20.0").unwrap();
    load_geo_override_from_path(&mut config, &path);
    assert_eq!(config.latitude, Some(10.0));
}

#[test]
fn test_validation_coordinate_ranges() {
    let mut config = london_config();
    assert!(validate_config(&config).is_ok());

    config.latitude = Some(90.5);
    assert!(validate_config(&config).is_err());

    config.latitude = Some(-90.0);
    config.longitude = Some(180.1);
    assert!(validate_config(&config).is_err());

    config.longitude = None;
    assert!(validate_config(&config).is_err());
}

#[test]
fn test_validation_rejects_negative_angles() {
    let mut config = london_config();
    config.method = Some("custom".to_string());
    config.fajr_angle = Some(-1.0);
    assert!(validate_config(&config).is_err());

    config.fajr_angle = Some(18.0);
    config.isha_angle = Some(-0.5);
    assert!(validate_config(&config).is_err());

    config.isha_angle = Some(17.0);
    assert!(validate_config(&config).is_ok());
}

#[test]
fn test_validation_custom_requires_fajr_angle() {
    let mut config = london_config();
    config.method = Some("custom".to_string());
    config.isha_angle = Some(17.0);
    assert!(validate_config(&config).is_err());
}

#[test]
fn test_validation_unknown_names() {
    for mutate in [
        (|c: &mut Config| c.method = Some("jafari".into())) as fn(&mut Config),
        |c| c.asr_method = Some("shafi".into()),
        |c| c.high_latitude_adjustment = Some("none".into()),
        |c| c.clock_format = Some("24".into()),
        |c| c.timezone = Some("Mars/Olympus_Mons".into()),
    ] {
        let mut config = london_config();
        mutate(&mut config);
        assert!(validate_config(&config).is_err(), "accepted {config:?}");
    }
}

#[test]
fn test_validation_reminder_choices() {
    let mut config = london_config();
    for minutes in [0, 5, 10, 15] {
        config.reminder = Some(minutes);
        assert!(validate_config(&config).is_ok());
    }
    for minutes in [1, 20, 60] {
        config.reminder = Some(minutes);
        assert!(validate_config(&config).is_err());
    }
}

#[test]
fn test_apply_defaults_fills_every_field() {
    let mut config = Config::default();
    apply_defaults(&mut config);
    assert_eq!(config.auto_location, Some(false));
    assert_eq!(config.method.as_deref(), Some("mwl"));
    assert_eq!(config.asr_method.as_deref(), Some("standard"));
    assert_eq!(config.high_latitude_adjustment.as_deref(), Some("night-middle"));
    assert_eq!(config.reminder, Some(0));
    assert_eq!(config.clock_format.as_deref(), Some("24h"));
    assert!(config.latitude.is_some() && config.longitude.is_some());
}

#[test]
fn test_resolve_prefers_located_position_only_in_auto_mode() {
    let located = Location {
        latitude: 40.0,
        longitude: 29.0,
    };
    let mut config = london_config();
    let manual = config.resolve(Some(located)).unwrap();
    assert_eq!(manual.calculation.location.latitude, 51.5);

    config.auto_location = Some(true);
    let auto = config.resolve(Some(located)).unwrap();
    assert_eq!(auto.calculation.location, located);

    let pending = config.resolve(None).unwrap();
    assert_eq!(pending.calculation.location.latitude, 51.5);
}

#[test]
fn test_resolve_looks_up_timezone_from_coordinates() {
    let mut config = london_config();
    config.timezone = None;
    let settings = config.resolve(None).unwrap();
    assert_eq!(settings.calculation.timezone, chrono_tz::Europe::London);
}

#[test]
fn test_reload_kind_classification() {
    let base = london_config().resolve(None).unwrap();

    assert_eq!(base.reload_kind(&base.clone()), ReloadKind::Unchanged);

    let mut reminder = london_config();
    reminder.reminder = Some(10);
    assert_eq!(
        base.reload_kind(&reminder.resolve(None).unwrap()),
        ReloadKind::NotificationsOnly
    );

    let mut clock = london_config();
    clock.clock_format = Some("12h".into());
    assert_eq!(
        base.reload_kind(&clock.resolve(None).unwrap()),
        ReloadKind::NotificationsOnly
    );

    let mut method = london_config();
    method.method = Some("isna".into());
    assert_eq!(base.reload_kind(&method.resolve(None).unwrap()), ReloadKind::Recompute);

    let mut sunnah = london_config();
    sunnah.include_sunnah = Some(true);
    assert_eq!(base.reload_kind(&sunnah.resolve(None).unwrap()), ReloadKind::Recompute);

    let mut moved = london_config();
    moved.latitude = Some(52.0);
    assert_eq!(base.reload_kind(&moved.resolve(None).unwrap()), ReloadKind::Recompute);
}

#[test]
fn test_set_auto_location_keeps_comment() {
    let temp_dir = tempdir().unwrap();
    let path = write_config(
        temp_dir.path(),
        "auto_location = true    # Use Geoclue\nlatitude = 1.0\nlongitude = 2.0\n",
    );

    set_auto_location_in(&path, false).unwrap();
    let content = fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("auto_location = false    # Use Geoclue\n"));
}

#[test]
fn test_set_auto_location_appends_missing_key() {
    let temp_dir = tempdir().unwrap();
    let path = write_config(temp_dir.path(), "latitude = 1.0\nlongitude = 2.0");

    set_auto_location_in(&path, false).unwrap();
    let config = load_from_path(&path).unwrap();
    assert_eq!(config.auto_location, Some(false));
}

#[test]
fn test_find_config_line_skips_comments() {
    let content = "# auto_location = true\nauto_location_extra = 1\nauto_location = false # x\n";
    assert_eq!(
        find_config_line(content, "auto_location").as_deref(),
        Some("auto_location = false # x")
    );
    assert_eq!(
        preserve_comment_formatting("reminder = 0   # lead", "reminder", "10"),
        "reminder = 10   # lead"
    );
}

#[test]
fn test_watcher_matches_config_and_swap_files() {
    let dir = PathBuf::from("/home/user/.config/salatr");
    let watched = vec![dir.join("salatr.toml"), dir.join("geo.toml")];

    assert!(watcher::is_config_event(&dir.join("salatr.toml"), &watched));
    assert!(watcher::is_config_event(&dir.join("geo.toml"), &watched));
    assert!(watcher::is_config_event(&dir.join(".salatr.toml.swp"), &watched));
    assert!(!watcher::is_config_event(&dir.join("other.toml"), &watched));
    assert!(!watcher::is_config_event(
        &PathBuf::from("/tmp/salatr.toml"),
        &watched
    ));
}
