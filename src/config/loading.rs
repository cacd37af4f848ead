//! Configuration loading, path resolution and defaults.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use super::validation::validate_config;
use super::{Config, GeoConfig};
use crate::common::constants::*;
use crate::common::utils::private_path;

const CONFIG_FILE_NAME: &str = "salatr.toml";
const GEO_FILE_NAME: &str = "geo.toml";

static CONFIG_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Override the configuration directory (from `--config`). Can only be set once.
pub fn set_config_dir(dir: Option<String>) -> Result<()> {
    CONFIG_DIR
        .set(dir.map(PathBuf::from))
        .map_err(|_| anyhow::anyhow!("Configuration directory already set"))
}

pub fn get_custom_config_dir() -> Option<PathBuf> {
    CONFIG_DIR.get().and_then(|d| d.clone())
}

pub fn get_config_path() -> Result<PathBuf> {
    if let Some(custom_dir) = get_custom_config_dir() {
        return Ok(custom_dir.join(CONFIG_FILE_NAME));
    }
    let config_dir = dirs::config_dir().context("Could not determine config directory")?;
    Ok(config_dir.join(APP_ID).join(CONFIG_FILE_NAME))
}

pub fn get_geo_path() -> Result<PathBuf> {
    let config_path = get_config_path()?;
    config_path
        .parent()
        .map(|p| p.join(GEO_FILE_NAME))
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
}

/// Load the active configuration, creating a default file on first run.
pub fn load() -> Result<Config> {
    let config_path = get_config_path()?;

    if !config_path.exists() {
        super::builder::create_default_config(&config_path)
            .context("Failed to create default config during load")?;
    }

    load_from_path(&config_path)
        .with_context(|| format!("Failed to load configuration from {}", private_path(&config_path)))
}

/// Load, override, validate and default a config file.
pub fn load_from_path(path: &PathBuf) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", private_path(path)))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config from {}", private_path(path)))?;

    load_geo_override_from_path(&mut config, path);

    validate_config(&config)?;

    apply_defaults(&mut config);

    Ok(config)
}

/// Fill every unset field with its default.
pub(crate) fn apply_defaults(config: &mut Config) {
    config.auto_location.get_or_insert(DEFAULT_AUTO_LOCATION);
    config.method.get_or_insert_with(|| DEFAULT_METHOD.to_string());
    config
        .asr_method
        .get_or_insert_with(|| DEFAULT_ASR_METHOD.to_string());
    config
        .high_latitude_adjustment
        .get_or_insert_with(|| DEFAULT_HIGH_LATITUDE_ADJUSTMENT.to_string());
    config.include_sunnah.get_or_insert(DEFAULT_INCLUDE_SUNNAH);
    config.notify.get_or_insert(DEFAULT_NOTIFY);
    config.sound.get_or_insert(DEFAULT_SOUND);
    config.reminder.get_or_insert(DEFAULT_REMINDER);
    config
        .clock_format
        .get_or_insert_with(|| DEFAULT_CLOCK_FORMAT.to_string());

    if config.latitude.is_none() || config.longitude.is_none() {
        config.latitude = Some(DEFAULT_LATITUDE);
        config.longitude = Some(DEFAULT_LONGITUDE);
    }
}

/// Apply `geo.toml` next to `config_path`, if present.
///
/// A missing file is normal; an unreadable or malformed one only produces a warning.
pub(crate) fn load_geo_override_from_path(config: &mut Config, config_path: &Path) {
    let Some(geo_path) = config_path.parent().map(|p| p.join(GEO_FILE_NAME)) else {
        return;
    };
    if !geo_path.exists() {
        return;
    }

    match fs::read_to_string(&geo_path) {
        Ok(content) => match toml::from_str::<GeoConfig>(&content) {
            Ok(geo_config) => {
                if let Some(lat) = geo_config.latitude {
                    config.latitude = Some(lat);
                }
                if let Some(lon) = geo_config.longitude {
                    config.longitude = Some(lon);
                }
            }
            Err(e) => {
                log_warning!("Failed to parse geo.toml: {e}. Using coordinates from main config.");
            }
        },
        Err(e) => {
            log_warning!("Failed to read geo.toml: {e}. Using coordinates from main config.");
        }
    }
}
