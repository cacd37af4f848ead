//! # salatr
//!
//! Prayer time tracker library backing the `salatr` binary.
//!
//! ## Architecture
//!
//! - **Entry Point**: `Salatr` builder runs the tracker with signal handling and monitors
//! - **Core Logic**: internal `core` module owns the main loop and tracker state
//! - **Engine**: `engine` computes a day's prayer times from date, location and method
//! - **Tracking**: `prayer` (roster, labels) and `tracker` (countdown state machine)
//! - **Configuration**: `config` module for TOML settings with hot reload
//! - **Commands**: `commands` module for `times`, `next`, `methods`, `simulate`
//! - **Infrastructure**: `io` (signals, D-Bus, Geoclue, notifications, sound),
//!   `geo` timezone lookup, `state` presentation output, `time_source`, logging

// Import macros from logger module for use in all submodules
#[macro_use]
pub mod logger;

pub mod args;
pub mod commands;
pub mod common;
pub mod config;
pub mod engine;
pub mod geo;
pub mod io;
pub mod prayer;
pub mod state;
pub mod time_source;
pub mod tracker;

// Internal modules
mod core;
mod salatr;

pub use salatr::Salatr;
