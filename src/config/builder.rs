//! Default config generation and in-place edits of the config file.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::get_config_path;
use crate::common::constants::*;
use crate::common::utils::private_path;
use crate::engine::CalculationMethod;

/// Write a commented default `salatr.toml` at `path`.
pub fn create_default_config(path: &PathBuf) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    let methods = CalculationMethod::PRESETS
        .iter()
        .map(|m| m.key())
        .collect::<Vec<_>>()
        .join(", ");

    let content = ConfigBuilder::new()
        .add_section("Location")
        .add_setting(
            "auto_location",
            &DEFAULT_AUTO_LOCATION.to_string(),
            "Use Geoclue to follow the current location",
        )
        .add_setting(
            "latitude",
            &format!("{DEFAULT_LATITUDE:.6}"),
            "Manual latitude (-90 to 90)",
        )
        .add_setting(
            "longitude",
            &format!("{DEFAULT_LONGITUDE:.6}"),
            "Manual longitude (-180 to 180)",
        )
        .add_section("Calculation")
        .add_setting(
            "method",
            &format!("\"{DEFAULT_METHOD}\""),
            &format!("{methods} or custom"),
        )
        .add_setting(
            "asr_method",
            &format!("\"{DEFAULT_ASR_METHOD}\""),
            "\"standard\" (Hanbali, Maliki, Shafi) or \"hanafi\"",
        )
        .add_setting(
            "high_latitude_adjustment",
            &format!("\"{DEFAULT_HIGH_LATITUDE_ADJUSTMENT}\""),
            "\"night-middle\", \"night-seventh\" or \"angle\"",
        )
        .add_setting(
            "include_sunnah",
            &DEFAULT_INCLUDE_SUNNAH.to_string(),
            "Also track Duha",
        )
        .add_section("Notifications")
        .add_setting(
            "notify",
            &DEFAULT_NOTIFY.to_string(),
            "Desktop notification when a prayer time is reached",
        )
        .add_setting(
            "sound",
            &DEFAULT_SOUND.to_string(),
            "Play a sound when a prayer time is reached",
        )
        .add_setting(
            "reminder",
            &DEFAULT_REMINDER.to_string(),
            "Minutes before each prayer to remind (0, 5, 10, 15)",
        )
        .add_setting(
            "clock_format",
            &format!("\"{DEFAULT_CLOCK_FORMAT}\""),
            "\"24h\" or \"12h\"",
        )
        .build();

    fs::write(path, content).context("Failed to write default config file")?;

    log_block_start!("Created default configuration");
    log_indented!("{}", private_path(path));
    Ok(())
}

/// Persist `auto_location` in the active config file, keeping its comment.
pub fn set_auto_location(enabled: bool) -> Result<()> {
    set_auto_location_in(&get_config_path()?, enabled)
}

pub(crate) fn set_auto_location_in(config_path: &Path, enabled: bool) -> Result<()> {
    let content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config from {}", private_path(config_path)))?;

    let updated = match find_config_line(&content, "auto_location") {
        Some(line) => content.replace(
            &line,
            &preserve_comment_formatting(&line, "auto_location", &enabled.to_string()),
        ),
        None => {
            let mut updated = content.clone();
            if !updated.ends_with('\n') {
                updated.push('\n');
            }
            updated.push_str(&format!("auto_location = {enabled}\n"));
            updated
        }
    };

    if updated != content {
        fs::write(config_path, updated).with_context(|| {
            format!("Failed to write updated config to {}", private_path(config_path))
        })?;
    }
    Ok(())
}

struct ConfigBuilder {
    entries: Vec<ConfigEntry>,
}

enum ConfigEntry {
    Section(String),
    Setting { line: String, comment: String },
}

impl ConfigBuilder {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn add_section(mut self, title: &str) -> Self {
        self.entries.push(ConfigEntry::Section(format!("#[{title}]")));
        self
    }

    fn add_setting(mut self, key: &str, value: &str, comment: &str) -> Self {
        self.entries.push(ConfigEntry::Setting {
            line: format!("{key} = {value}"),
            comment: format!("# {comment}"),
        });
        self
    }

    /// Render with all comments aligned one space past the longest setting.
    fn build(self) -> String {
        let max_width = self
            .entries
            .iter()
            .filter_map(|entry| match entry {
                ConfigEntry::Setting { line, .. } => Some(line.len()),
                ConfigEntry::Section(_) => None,
            })
            .max()
            .unwrap_or(0)
            + 1;

        let mut result = Vec::new();
        for entry in self.entries {
            match entry {
                ConfigEntry::Section(title) => {
                    if !result.is_empty() {
                        result.push(String::new());
                    }
                    result.push(title);
                }
                ConfigEntry::Setting { line, comment } => {
                    let padding = " ".repeat(max_width - line.len());
                    result.push(format!("{line}{padding}{comment}"));
                }
            }
        }

        let mut text = result.join("\n");
        text.push('\n');
        text
    }
}

/// First uncommented `key = ...` line in `content`.
pub(crate) fn find_config_line(content: &str, key: &str) -> Option<String> {
    content
        .lines()
        .find(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with('#')
                && trimmed
                    .split_once('=')
                    .is_some_and(|(k, _)| k.trim() == key)
        })
        .map(str::to_string)
}

/// Replace the value of a `key = value  # comment` line, keeping the spacing and comment.
pub(crate) fn preserve_comment_formatting(original_line: &str, key: &str, new_value: &str) -> String {
    let key_value_part = format!("{key} = {new_value}");

    match original_line.find('#') {
        Some(comment_pos) => {
            let comment_part = &original_line[comment_pos..];
            let before_comment = &original_line[..comment_pos];
            let original_spacing = before_comment
                .rfind(|c: char| !c.is_whitespace())
                .map(|last| &before_comment[last + 1..])
                .unwrap_or(" ");
            format!("{key_value_part}{original_spacing}{comment_part}")
        }
        None => key_value_part,
    }
}
