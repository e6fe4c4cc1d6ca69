//! Command-line argument parsing and processing.
//!
//! A small hand-rolled parser: flags map onto a [`CliAction`] and anything
//! unrecognised turns into [`CliAction::ShowHelpDueToError`].

use crate::constants::{
    DEFAULT_SIMULATION_MULTIPLIER, MAXIMUM_SIMULATION_MULTIPLIER, MINIMUM_SIMULATION_MULTIPLIER,
};

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Run the clock against real time
    Run {
        debug_enabled: bool,
        config_dir: Option<String>,
        once: bool,
        json: bool,
    },
    /// Run the clock against a simulated time source
    Simulate {
        debug_enabled: bool,
        start_time: String,
        end_time: String,
        /// Simulated seconds per real second, 0.0 for fast-forward
        multiplier: f64,
        log_to_file: bool,
        config_dir: Option<String>,
        json: bool,
    },
    /// Display help information and exit
    ShowHelp,
    /// Display version information and exit
    ShowVersion,
    /// Show help due to unknown arguments and exit
    ShowHelpDueToError,
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

/// Basic shape check for "YYYY-MM-DD HH:MM:SS"; full parsing happens later
/// once the observance timezone is known.
fn looks_like_datetime(s: &str) -> bool {
    let bytes = s.as_bytes();
    s.len() == 19
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && (bytes[10] == b' ' || bytes[10] == b'T')
        && bytes[13] == b':'
        && bytes[16] == b':'
}

impl ParsedArgs {
    /// Parse command-line arguments into a structured result.
    ///
    /// The first item is the program name and is skipped.
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut debug_enabled = false;
        let mut display_help = false;
        let mut display_version = false;
        let mut once = false;
        let mut json = false;
        let mut run_simulate = false;
        let mut simulate_start: Option<String> = None;
        let mut simulate_end: Option<String> = None;
        let mut simulate_multiplier: Option<f64> = None;
        let mut log_to_file = false;
        let mut unknown_arg_found = false;
        let mut config_dir: Option<String> = None;

        let args_vec: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|s| s.as_ref().to_string())
            .collect();

        let mut i = 0;
        while i < args_vec.len() {
            let arg_str = &args_vec[i];
            match arg_str.as_str() {
                "--help" | "-h" => display_help = true,
                "--version" | "-V" | "-v" => display_version = true,
                "--debug" | "-d" => debug_enabled = true,
                "--once" | "-o" => once = true,
                "--json" | "-j" => json = true,
                "--log" => log_to_file = true,
                "--config" | "-c" => {
                    // Parse: --config <directory>
                    if i + 1 < args_vec.len() && !args_vec[i + 1].starts_with('-') {
                        config_dir = Some(args_vec[i + 1].clone());
                        i += 1;
                    } else {
                        log_warning!("Missing directory for --config. Usage: --config <directory>");
                        unknown_arg_found = true;
                    }
                }
                "--simulate" | "-S" => {
                    run_simulate = true;
                    // Parse: --simulate <start> <end> [multiplier | --fast-forward]
                    if i + 2 < args_vec.len() {
                        let start_str = args_vec[i + 1].clone();
                        let end_str = args_vec[i + 2].clone();
                        i += 2;

                        if !looks_like_datetime(&start_str) {
                            log_error!(
                                "Invalid start time format: '{}'. Use YYYY-MM-DD HH:MM:SS",
                                start_str
                            );
                            unknown_arg_found = true;
                        } else if !looks_like_datetime(&end_str) {
                            log_error!(
                                "Invalid end time format: '{}'. Use YYYY-MM-DD HH:MM:SS",
                                end_str
                            );
                            unknown_arg_found = true;
                        } else {
                            simulate_start = Some(start_str);
                            simulate_end = Some(end_str);

                            if let Some(next) = args_vec.get(i + 1) {
                                if next == "--fast-forward" {
                                    simulate_multiplier = Some(0.0);
                                    i += 1;
                                } else if let Ok(mult) = next.parse::<f64>() {
                                    if (MINIMUM_SIMULATION_MULTIPLIER
                                        ..=MAXIMUM_SIMULATION_MULTIPLIER)
                                        .contains(&mult)
                                    {
                                        simulate_multiplier = Some(mult);
                                    } else {
                                        log_error!(
                                            "Invalid multiplier: {}. Must be between {} and {}.",
                                            mult,
                                            MINIMUM_SIMULATION_MULTIPLIER,
                                            MAXIMUM_SIMULATION_MULTIPLIER
                                        );
                                        unknown_arg_found = true;
                                    }
                                    i += 1;
                                }
                            }
                        }
                    } else {
                        log_warning!(
                            "Missing arguments for --simulate. Usage: --simulate \"YYYY-MM-DD HH:MM:SS\" \"YYYY-MM-DD HH:MM:SS\" [multiplier | --fast-forward]"
                        );
                        unknown_arg_found = true;
                        i = args_vec.len();
                    }
                }
                _ => {
                    log_warning!("Unknown argument: {arg_str}");
                    unknown_arg_found = true;
                }
            }
            i += 1;
        }

        let action = if display_version {
            CliAction::ShowVersion
        } else if unknown_arg_found {
            CliAction::ShowHelpDueToError
        } else if display_help {
            CliAction::ShowHelp
        } else if run_simulate && once {
            log_warning!("--once cannot be combined with --simulate");
            CliAction::ShowHelpDueToError
        } else if run_simulate {
            match (simulate_start, simulate_end) {
                (Some(start), Some(end)) => CliAction::Simulate {
                    debug_enabled,
                    start_time: start,
                    end_time: end,
                    multiplier: simulate_multiplier.unwrap_or(DEFAULT_SIMULATION_MULTIPLIER),
                    log_to_file,
                    config_dir,
                    json,
                },
                _ => CliAction::ShowHelpDueToError,
            }
        } else if log_to_file {
            log_warning!("--log only applies together with --simulate");
            CliAction::ShowHelpDueToError
        } else {
            CliAction::Run {
                debug_enabled,
                config_dir,
                once,
                json,
            }
        };

        ParsedArgs { action }
    }

    /// Convenience method to parse from std::env::args()
    pub fn from_env() -> ParsedArgs {
        Self::parse(std::env::args())
    }
}

/// Displays version information using custom logging style.
pub fn display_version_info() {
    log_version!();
    log_pipe!();
    println!("┗ {}", env!("CARGO_PKG_DESCRIPTION"));
}

/// Displays custom help message using logger methods.
pub fn display_help() {
    log_version!();
    log_block_start!(env!("CARGO_PKG_DESCRIPTION"));
    log_block_start!("Usage:");
    log_indented!("vigil [OPTIONS]");
    log_block_start!("Options:");
    log_indented!("-c, --config <dir>     Use <dir>/vigil.toml");
    log_indented!("-d, --debug            Enable detailed debug output");
    log_indented!("-o, --once             Evaluate a single tick and exit (not with --simulate)");
    log_indented!("-j, --json             Print one JSON object per tick");
    log_indented!("-S, --simulate         Run with simulated time");
    log_indented!("                       Usage: --simulate <start> <end> [multiplier | --fast-forward]");
    log_indented!("                       Times are in the configured time_zone");
    log_indented!("    --log              With --simulate, write output to a log file");
    log_indented!("-h, --help             Print help information");
    log_indented!("-V, --version          Print version information");
    log_end!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(args: &[&str]) -> CliAction {
        ParsedArgs::parse(args.iter().copied()).action
    }

    #[test]
    fn test_parse_no_args() {
        assert_eq!(
            action(&["vigil"]),
            CliAction::Run {
                debug_enabled: false,
                config_dir: None,
                once: false,
                json: false,
            }
        );
    }

    #[test]
    fn test_parse_run_flags() {
        assert_eq!(
            action(&["vigil", "-d", "--once", "-j", "--config", "/tmp/vigil"]),
            CliAction::Run {
                debug_enabled: true,
                config_dir: Some("/tmp/vigil".to_string()),
                once: true,
                json: true,
            }
        );
    }

    #[test]
    fn test_parse_help_and_version() {
        assert_eq!(action(&["vigil", "--help"]), CliAction::ShowHelp);
        assert_eq!(action(&["vigil", "-h"]), CliAction::ShowHelp);
        assert_eq!(action(&["vigil", "--version"]), CliAction::ShowVersion);
        assert_eq!(action(&["vigil", "-V"]), CliAction::ShowVersion);
    }

    #[test]
    fn test_version_takes_precedence() {
        assert_eq!(action(&["vigil", "--version", "--help", "--debug"]), CliAction::ShowVersion);
    }

    #[test]
    fn test_parse_unknown_flag() {
        assert_eq!(action(&["vigil", "--unknown"]), CliAction::ShowHelpDueToError);
        assert_eq!(action(&["vigil", "--debug", "stray"]), CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_config_requires_directory() {
        assert_eq!(action(&["vigil", "--config"]), CliAction::ShowHelpDueToError);
        assert_eq!(action(&["vigil", "-c", "--debug"]), CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_parse_simulate_with_defaults() {
        assert_eq!(
            action(&["vigil", "-S", "2026-02-18 00:00:00", "2026-03-19 00:00:00"]),
            CliAction::Simulate {
                debug_enabled: false,
                start_time: "2026-02-18 00:00:00".to_string(),
                end_time: "2026-03-19 00:00:00".to_string(),
                multiplier: DEFAULT_SIMULATION_MULTIPLIER,
                log_to_file: false,
                config_dir: None,
                json: false,
            }
        );
    }

    #[test]
    fn test_parse_simulate_with_multiplier_and_log() {
        let parsed = action(&[
            "vigil",
            "--simulate",
            "2026-02-18 00:00:00",
            "2026-02-19 00:00:00",
            "60",
            "--log",
            "--debug",
        ]);
        assert_eq!(
            parsed,
            CliAction::Simulate {
                debug_enabled: true,
                start_time: "2026-02-18 00:00:00".to_string(),
                end_time: "2026-02-19 00:00:00".to_string(),
                multiplier: 60.0,
                log_to_file: true,
                config_dir: None,
                json: false,
            }
        );
    }

    #[test]
    fn test_parse_simulate_fast_forward() {
        match action(&[
            "vigil",
            "-S",
            "2026-02-18 00:00:00",
            "2026-02-19 00:00:00",
            "--fast-forward",
            "--json",
        ]) {
            CliAction::Simulate {
                multiplier, json, ..
            } => {
                assert_eq!(multiplier, 0.0);
                assert!(json);
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[test]
    fn test_parse_simulate_invalid_inputs() {
        assert_eq!(
            action(&["vigil", "-S", "2026-02-18", "2026-02-19 00:00:00"]),
            CliAction::ShowHelpDueToError
        );
        assert_eq!(
            action(&["vigil", "-S", "2026-02-18 00:00:00"]),
            CliAction::ShowHelpDueToError
        );
        assert_eq!(
            action(&["vigil", "-S", "2026-02-18 00:00:00", "2026-02-19 00:00:00", "0.01"]),
            CliAction::ShowHelpDueToError
        );
    }

    #[test]
    fn test_once_with_simulate_is_an_error() {
        assert_eq!(
            action(&["vigil", "-S", "2026-02-18 00:00:00", "2026-02-19 00:00:00", "--once"]),
            CliAction::ShowHelpDueToError
        );
        assert_eq!(
            action(&["vigil", "--once", "-S", "2026-02-18 00:00:00", "2026-02-19 00:00:00"]),
            CliAction::ShowHelpDueToError
        );
    }

    #[test]
    fn test_log_without_simulate_is_an_error() {
        assert_eq!(action(&["vigil", "--log"]), CliAction::ShowHelpDueToError);
    }
}
