//! Binary entry point: parse arguments and dispatch to a command.
//!
//! - Run: `Salatr::new(debug_enabled).run()`
//! - Simulate: install the simulated clock, then
//!   `Salatr::new(debug_enabled).without_headers().without_monitors().run()`
//! - `times`, `next`, `methods`, `help`: print and exit

use anyhow::Result;

use salatr::args::{CliAction, ParsedArgs};
use salatr::commands;
use salatr::common::constants::{EXIT_FAILURE, EXIT_SUCCESS};
use salatr::logger::Log;
use salatr::{Salatr, config, log_end, log_error_exit, log_version};

fn dispatch(action: CliAction) -> Result<i32> {
    match action {
        CliAction::ShowVersion => {
            log_version!();
            log_end!();
        }
        CliAction::ShowHelp => commands::help::display_usage(),
        CliAction::ShowHelpDueToError => {
            commands::help::display_usage();
            return Ok(EXIT_FAILURE);
        }
        CliAction::Help { command } => commands::help::run_help_command(command.as_deref()),
        CliAction::Methods => commands::methods::handle_methods_command(),
        CliAction::Run {
            debug_enabled,
            json_output,
            config_dir,
        } => {
            config::set_config_dir(config_dir)?;
            Salatr::new(debug_enabled).json_output(json_output).run()?;
        }
        CliAction::Times {
            debug_enabled,
            date,
            json_output,
            config_dir,
        } => {
            config::set_config_dir(config_dir)?;
            commands::times::handle_times_command(date, json_output, debug_enabled)?;
        }
        CliAction::Next {
            json_output,
            config_dir,
        } => {
            config::set_config_dir(config_dir)?;
            commands::next::handle_next_command(json_output)?;
        }
        CliAction::Simulate {
            debug_enabled,
            json_output,
            start_time,
            end_time,
            multiplier,
            config_dir,
        } => {
            config::set_config_dir(config_dir)?;
            if json_output {
                Log::set_enabled(false);
            }
            commands::simulate::handle_simulate_command(&start_time, &end_time, multiplier, debug_enabled)?;
            Salatr::new(debug_enabled)
                .json_output(json_output)
                .without_headers()
                .without_monitors()
                .run()?;
        }
    }
    Ok(EXIT_SUCCESS)
}

fn main() {
    let parsed_args = ParsedArgs::parse(std::env::args());

    let code = match dispatch(parsed_args.action) {
        Ok(code) => code,
        Err(e) => {
            Log::set_enabled(true);
            log_error_exit!("{e:#}");
            EXIT_FAILURE
        }
    };
    std::process::exit(code);
}
