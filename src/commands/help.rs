//! Help output.
//!
//! `salatr --help` shows usage and options; `salatr help [COMMAND]` shows
//! the command list or one command's details.

/// Show brief usage for a command (used for error messages)
pub fn show_command_usage(command: &str) {
    match command {
        "times" | "t" => log_block_start!("Usage: salatr times [--date YYYY-MM-DD] [--json]"),
        "next" | "n" => log_block_start!("Usage: salatr next [--json]"),
        "methods" | "m" => log_block_start!("Usage: salatr methods"),
        "simulate" | "S" => log_block_start!(
            "Usage: salatr simulate \"YYYY-MM-DD HH:MM:SS\" \"YYYY-MM-DD HH:MM:SS\" [multiplier]"
        ),
        _ => log_block_start!("Usage: salatr [OPTIONS] [COMMAND]"),
    }
}

/// Run the help command
///
/// # Arguments
/// * `command` - Optional command name to get help for (None = command list)
pub fn run_help_command(command: Option<&str>) {
    match command {
        None => display_general_help(),
        Some("run") => display_run_help(),
        Some("times") | Some("t") => display_times_help(),
        Some("next") | Some("n") => display_next_help(),
        Some("methods") | Some("m") => display_methods_help(),
        Some("simulate") | Some("S") => display_simulate_help(),
        Some("help") | Some("h") => display_help_help(),
        Some(unknown) => {
            log_warning_standalone!("Unknown command: {}", unknown);
            display_general_help();
        }
    }
}

/// Full usage for `--help`.
pub fn display_usage() {
    log_version!();
    log_block_start!("Usage: salatr [OPTIONS] [COMMAND]");
    log_block_start!("Options:");
    log_indented!("-c, --config <DIR>   Use a custom configuration directory");
    log_indented!("-d, --debug          Enable detailed debug output");
    log_indented!("-j, --json           Print status updates as JSON lines");
    log_indented!("-h, --help           Print help information");
    log_indented!("-V, --version        Print version information");
    display_command_list();
    log_pipe!();
    log_info!("Use 'salatr help <command>' to see detailed help for a specific command.");
    log_end!();
}

fn display_command_list() {
    log_block_start!("Commands:");
    log_indented!("run                       Track prayers until interrupted (default)");
    log_indented!("times, t [--date DATE]    Print the day's prayer times");
    log_indented!("next, n                   Print the next prayer and time remaining");
    log_indented!("methods, m                List calculation methods");
    log_indented!("simulate, S <start> <end> Run on accelerated time");
    log_indented!("help, h [COMMAND]         Show detailed help for a command");
}

fn display_general_help() {
    log_version!();
    display_command_list();
    log_pipe!();
    log_info!("Use 'salatr help <command>' to see detailed help for a specific command.");
    log_indented!("Use 'salatr --help' to see all options and general usage.");
    log_end!();
}

fn display_run_help() {
    log_version!();
    log_block_start!("run - Track prayer times");
    log_block_start!("Usage: salatr [run] [--debug] [--json] [--config DIR]");
    log_block_start!("Description:");
    log_indented!("Counts down to the next prayer once a minute, sends reminders and");
    log_indented!("announces each prayer. Editing salatr.toml or sending SIGUSR2");
    log_indented!("reloads the configuration without restarting.");
    log_block_start!("Examples:");
    log_indented!("# Status bar module (one JSON object per line)");
    log_indented!("salatr --json");
    log_end!();
}

fn display_times_help() {
    log_version!();
    log_block_start!("times - Print one day's prayer times");
    show_command_usage("times");
    log_block_start!("Options:");
    log_indented!("--date YYYY-MM-DD  Date to compute (default: today)");
    log_indented!("--json             Print the schedule as JSON");
    log_block_start!("Notes:");
    log_indented!("Events the sun does not reach at high latitudes print as --:--");
    log_end!();
}

fn display_next_help() {
    log_version!();
    log_block_start!("next - Print the upcoming prayer");
    show_command_usage("next");
    log_block_start!("Examples:");
    log_indented!("salatr next");
    log_indented!("salatr next --json");
    log_end!();
}

fn display_methods_help() {
    log_version!();
    log_block_start!("methods - List calculation methods");
    show_command_usage("methods");
    log_block_start!("Description:");
    log_indented!("Lists the method presets with their Fajr and Isha angles, the Asr");
    log_indented!("methods and the high latitude adjustments accepted in salatr.toml.");
    log_end!();
}

fn display_simulate_help() {
    log_version!();
    log_block_start!("simulate - Run the tracker on simulated time");
    show_command_usage("simulate");
    log_block_start!("Arguments:");
    log_indented!("start       Start time in the configured timezone");
    log_indented!("end         End time, after start");
    log_indented!("multiplier  Simulated seconds per real second (default 3600, 0 = fast-forward)");
    log_block_start!("Examples:");
    log_indented!("salatr simulate \"2024-04-10 00:00:00\" \"2024-04-11 00:00:00\" 0");
    log_end!();
}

fn display_help_help() {
    log_version!();
    log_block_start!("help - Display help information");
    log_block_start!("Usage: salatr help [COMMAND]");
    log_block_start!("Arguments:");
    log_indented!("COMMAND  Optional command to get help for");
    log_indented!("         If omitted, shows the command list");
    log_end!();
}
