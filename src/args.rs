//! Command-line argument parsing.
//!
//! Global flags (`--debug`, `--json`, `--config DIR`, `--help`, `--version`)
//! may appear anywhere; the first positional argument selects the command and
//! defaults to `run`.

use chrono::NaiveDate;

/// Default simulation speed: one simulated hour per real second.
pub const DEFAULT_SIMULATION_MULTIPLIER: f64 = 3600.0;

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Run the tracker until interrupted.
    Run {
        debug_enabled: bool,
        json_output: bool,
        config_dir: Option<String>,
    },
    /// Print one day's schedule.
    Times {
        debug_enabled: bool,
        date: Option<NaiveDate>,
        json_output: bool,
        config_dir: Option<String>,
    },
    /// Print the next prayer and the time remaining.
    Next {
        json_output: bool,
        config_dir: Option<String>,
    },
    /// List the calculation methods.
    Methods,
    /// Run the tracker on simulated time.
    Simulate {
        debug_enabled: bool,
        json_output: bool,
        start_time: String,
        end_time: String,
        /// 0 fast-forwards.
        multiplier: f64,
        config_dir: Option<String>,
    },
    /// Detailed help for the `help` command's argument, or general help.
    Help { command: Option<String> },
    ShowHelp,
    ShowVersion,
    /// Show help due to unknown or malformed arguments and exit
    ShowHelpDueToError,
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

fn error() -> ParsedArgs {
    ParsedArgs {
        action: CliAction::ShowHelpDueToError,
    }
}

impl ParsedArgs {
    /// Parse command-line arguments, including the program name.
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args_vec: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|s| s.as_ref().to_string())
            .collect();

        let mut debug_enabled = false;
        let mut json_output = false;
        let mut display_help = false;
        let mut display_version = false;
        let mut config_dir: Option<String> = None;
        let mut date: Option<String> = None;
        let mut positionals: Vec<String> = Vec::new();

        let mut i = 0;
        while i < args_vec.len() {
            let arg = &args_vec[i];
            match arg.as_str() {
                "--help" | "-h" => display_help = true,
                "--version" | "-V" | "-v" => display_version = true,
                "--debug" | "-d" => debug_enabled = true,
                "--json" | "-j" => json_output = true,
                "--config" | "-c" | "--date" => {
                    let Some(value) = args_vec.get(i + 1).filter(|v| !v.starts_with('-')) else {
                        log_warning_standalone!("Missing value for {}", arg);
                        return error();
                    };
                    if arg == "--date" {
                        date = Some(value.clone());
                    } else {
                        config_dir = Some(value.clone());
                    }
                    i += 1;
                }
                flag if flag.starts_with('-') && flag.parse::<f64>().is_err() => {
                    log_warning_standalone!("Unknown option: {}", flag);
                    return error();
                }
                _ => positionals.push(arg.clone()),
            }
            i += 1;
        }

        if display_version {
            return ParsedArgs {
                action: CliAction::ShowVersion,
            };
        }
        if display_help {
            return ParsedArgs {
                action: CliAction::ShowHelp,
            };
        }

        let (command, rest) = match positionals.split_first() {
            Some((command, rest)) => (command.as_str(), rest),
            None => ("run", &[][..]),
        };

        if date.is_some() && !matches!(command, "times" | "t") {
            log_warning_standalone!("--date is only valid with the times command");
            return error();
        }

        let expect_no_arguments = |name: &str| {
            if let Some(extra) = rest.first() {
                log_warning_standalone!("Unexpected argument for {}: {}", name, extra);
                false
            } else {
                true
            }
        };

        let action = match command {
            "run" => {
                if !expect_no_arguments("run") {
                    return error();
                }
                CliAction::Run {
                    debug_enabled,
                    json_output,
                    config_dir,
                }
            }
            "times" | "t" => {
                if !expect_no_arguments("times") {
                    return error();
                }
                let date = match date.as_deref().map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d")) {
                    None => None,
                    Some(Ok(date)) => Some(date),
                    Some(Err(_)) => {
                        log_warning_standalone!("Invalid date. Use YYYY-MM-DD");
                        return error();
                    }
                };
                CliAction::Times {
                    debug_enabled,
                    date,
                    json_output,
                    config_dir,
                }
            }
            "next" | "n" => {
                if !expect_no_arguments("next") {
                    return error();
                }
                CliAction::Next {
                    json_output,
                    config_dir,
                }
            }
            "methods" | "m" => {
                if !expect_no_arguments("methods") {
                    return error();
                }
                CliAction::Methods
            }
            "help" | "h" => CliAction::Help {
                command: rest.first().cloned(),
            },
            "simulate" | "S" => {
                let (start_time, end_time, multiplier) = match rest {
                    [start, end] => (start, end, DEFAULT_SIMULATION_MULTIPLIER),
                    [start, end, multiplier] => match multiplier.parse::<f64>() {
                        Ok(m) if m.is_finite() && m >= 0.0 => (start, end, m),
                        _ => {
                            log_warning_standalone!(
                                "Invalid multiplier: {}. Use a number >= 0 (0 = fast-forward)",
                                multiplier
                            );
                            return error();
                        }
                    },
                    _ => {
                        log_warning_standalone!(
                            "Usage: salatr simulate \"YYYY-MM-DD HH:MM:SS\" \"YYYY-MM-DD HH:MM:SS\" [multiplier]"
                        );
                        return error();
                    }
                };
                CliAction::Simulate {
                    debug_enabled,
                    json_output,
                    start_time: start_time.clone(),
                    end_time: end_time.clone(),
                    multiplier,
                    config_dir,
                }
            }
            unknown => {
                log_warning_standalone!("Unknown command: {}", unknown);
                return error();
            }
        };

        ParsedArgs { action }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliAction {
        let mut full = vec!["salatr"];
        full.extend_from_slice(args);
        ParsedArgs::parse(full).action
    }

    #[test]
    fn test_parse_no_args() {
        assert_eq!(
            parse(&[]),
            CliAction::Run {
                debug_enabled: false,
                json_output: false,
                config_dir: None,
            }
        );
    }

    #[test]
    fn test_parse_run_flags_anywhere() {
        assert_eq!(
            parse(&["-d", "run", "--json", "--config", "/tmp/salatr"]),
            CliAction::Run {
                debug_enabled: true,
                json_output: true,
                config_dir: Some("/tmp/salatr".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_help_and_version() {
        assert_eq!(parse(&["--help"]), CliAction::ShowHelp);
        assert_eq!(parse(&["-h"]), CliAction::ShowHelp);
        assert_eq!(parse(&["--version"]), CliAction::ShowVersion);
        assert_eq!(parse(&["-V"]), CliAction::ShowVersion);
        assert_eq!(parse(&["-v", "--help"]), CliAction::ShowVersion);
        assert_eq!(
            parse(&["help", "simulate"]),
            CliAction::Help {
                command: Some("simulate".to_string())
            }
        );
    }

    #[test]
    fn test_parse_times() {
        assert_eq!(
            parse(&["times"]),
            CliAction::Times {
                debug_enabled: false,
                date: None,
                json_output: false,
                config_dir: None,
            }
        );
        assert_eq!(
            parse(&["times", "--date", "2024-04-10", "--json"]),
            CliAction::Times {
                debug_enabled: false,
                date: NaiveDate::from_ymd_opt(2024, 4, 10),
                json_output: true,
                config_dir: None,
            }
        );
    }

    #[test]
    fn test_parse_times_rejects_bad_date() {
        assert_eq!(parse(&["times", "--date", "10/04/2024"]), CliAction::ShowHelpDueToError);
        assert_eq!(parse(&["times", "--date"]), CliAction::ShowHelpDueToError);
        assert_eq!(parse(&["next", "--date", "2024-04-10"]), CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_parse_next_and_methods() {
        assert_eq!(
            parse(&["next", "-j"]),
            CliAction::Next {
                json_output: true,
                config_dir: None,
            }
        );
        assert_eq!(parse(&["methods"]), CliAction::Methods);
        assert_eq!(parse(&["methods", "extra"]), CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_parse_simulate() {
        assert_eq!(
            parse(&["simulate", "2024-04-10 00:00:00", "2024-04-11 00:00:00"]),
            CliAction::Simulate {
                debug_enabled: false,
                json_output: false,
                start_time: "2024-04-10 00:00:00".to_string(),
                end_time: "2024-04-11 00:00:00".to_string(),
                multiplier: DEFAULT_SIMULATION_MULTIPLIER,
                config_dir: None,
            }
        );
        assert_eq!(
            parse(&["simulate", "2024-04-10 00:00:00", "2024-04-11 00:00:00", "0", "-d"]),
            CliAction::Simulate {
                debug_enabled: true,
                json_output: false,
                start_time: "2024-04-10 00:00:00".to_string(),
                end_time: "2024-04-11 00:00:00".to_string(),
                multiplier: 0.0,
                config_dir: None,
            }
        );
    }

    #[test]
    fn test_parse_simulate_errors() {
        assert_eq!(parse(&["simulate", "2024-04-10 00:00:00"]), CliAction::ShowHelpDueToError);
        assert_eq!(
            parse(&["simulate", "2024-04-10 00:00:00", "2024-04-11 00:00:00", "-5"]),
            CliAction::ShowHelpDueToError
        );
        assert_eq!(
            parse(&["simulate", "2024-04-10 00:00:00", "2024-04-11 00:00:00", "fast"]),
            CliAction::ShowHelpDueToError
        );
    }

    #[test]
    fn test_parse_unknown_input() {
        assert_eq!(parse(&["--frobnicate"]), CliAction::ShowHelpDueToError);
        assert_eq!(parse(&["pray"]), CliAction::ShowHelpDueToError);
        assert_eq!(parse(&["--config"]), CliAction::ShowHelpDueToError);
    }
}
