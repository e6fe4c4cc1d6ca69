//! Main application entry point.
//!
//! Parses arguments, then either prints help/version or hands off to
//! [`Vigil`]. With `--simulate` the simulated time source is installed first,
//! using the observance timezone from the loaded configuration to interpret
//! the start and end times.

use anyhow::Result;

use vigil::Vigil;
use vigil::args::{self, CliAction, ParsedArgs};
use vigil::config::{self, Config};
use vigil::constants::EXIT_FAILURE;
use vigil::display::OutputMode;
use vigil::logger::Log;
use vigil::time::simulate::handle_simulate_command;
use vigil::time::source;
use vigil::log_error_exit;

fn main() {
    if let Err(e) = run() {
        // JSON mode silences the logger; errors must still be visible
        Log::set_enabled(true);
        log_error_exit!("{:#}", e);
        std::process::exit(EXIT_FAILURE);
    }
}

fn output_mode(json: bool) -> OutputMode {
    if json {
        OutputMode::Json
    } else {
        OutputMode::Pretty
    }
}

fn run() -> Result<()> {
    let parsed_args = ParsedArgs::from_env();

    match parsed_args.action {
        CliAction::ShowVersion => {
            args::display_version_info();
            Ok(())
        }
        CliAction::ShowHelp => {
            args::display_help();
            Ok(())
        }
        CliAction::ShowHelpDueToError => {
            args::display_help();
            std::process::exit(EXIT_FAILURE);
        }
        CliAction::Run {
            debug_enabled,
            config_dir,
            once,
            json,
        } => {
            config::set_config_dir(config_dir)?;
            Vigil::new(debug_enabled)
                .once(once)
                .with_output(output_mode(json))
                .run()
        }
        CliAction::Simulate {
            debug_enabled,
            start_time,
            end_time,
            multiplier,
            log_to_file,
            config_dir,
            json,
        } => {
            config::set_config_dir(config_dir)?;
            if json {
                Log::set_enabled(false);
            }

            let config = Config::load()?;
            let tz = config.time_zone()?;

            // Keep the guards alive for the duration of the simulation
            let mut simulation_guards = handle_simulate_command(
                &start_time,
                &end_time,
                multiplier,
                tz,
                debug_enabled,
                log_to_file,
            )?;

            Vigil::new(debug_enabled)
                .with_config(config)
                .with_output(output_mode(json))
                .without_headers()
                .run()?;

            // Interrupted runs are reported by the guards' Drop
            if source::simulation_ended() {
                simulation_guards.complete_simulation();
            }
            Ok(())
        }
    }
}
