//! One-shot command handlers.
//!
//! Each command lives in its own submodule. `times` and `next` compute from the
//! configuration on disk and exit; `simulate` only installs the simulated clock
//! and then hands over to the normal run path.

pub mod help;
pub mod methods;
pub mod next;
pub mod simulate;
pub mod times;

use anyhow::{Context, Result};

use crate::config::{Config, Settings};

/// Load and resolve the configuration for a one-shot command.
///
/// Geoclue is not consulted here: with `auto_location` enabled the manual (or
/// `geo.toml`) coordinates are used.
pub(crate) fn load_settings() -> Result<Settings> {
    let config = Config::load()?;
    config
        .resolve(None)
        .context("Failed to resolve configuration")
}
