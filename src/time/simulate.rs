//! Setup for `--simulate`: run the display loop against a simulated clock.
//!
//! The simulated source is installed globally before the driver starts, so the
//! period clock, the sky sampler and the notice store all see simulated time
//! without knowing about it.

use anyhow::Result;
use chrono::Local;
use chrono_tz::Tz;
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use crate::display::progress_bar;
use crate::logger::{Log, LoggerGuard};
use crate::time::source::{SimulatedTimeSource, TimeSource, init_time_source, parse_datetime_in_tz};
use crate::time::{Instant, MS_PER_HOUR, MS_PER_MINUTE};

/// Resources that must stay alive while a simulation runs.
pub struct SimulationGuards {
    logger_guard: Option<LoggerGuard>,
    progress_handle: Option<thread::JoinHandle<()>>,
    progress_shutdown: Arc<AtomicBool>,
    log_to_file: bool,
    is_complete: bool,
}

impl SimulationGuards {
    /// Finish a simulation that ran to its end time.
    pub fn complete_simulation(&mut self) {
        self.is_complete = true;
        self.stop_progress_monitor();

        if self.log_to_file {
            drop(self.logger_guard.take());
            println!("┣ Simulation complete");
            println!("╹");
        }
    }

    fn stop_progress_monitor(&mut self) {
        self.progress_shutdown.store(true, Ordering::SeqCst);
        if let Some(handle) = self.progress_handle.take() {
            let _ = handle.join();
            print!("\r\x1B[K");
            std::io::stdout().flush().ok();
        }
    }
}

impl Drop for SimulationGuards {
    fn drop(&mut self) {
        if self.is_complete {
            return;
        }
        self.stop_progress_monitor();

        if self.log_to_file {
            drop(self.logger_guard.take());
            println!("┣ Simulation interrupted");
            println!("╹");
        }
    }
}

/// Install a simulated clock running from `start_time` to `end_time`.
///
/// Both times are civil times in the observance timezone. A multiplier of
/// `0.0` fast-forwards through every sleep.
pub fn handle_simulate_command(
    start_time: &str,
    end_time: &str,
    multiplier: f64,
    tz: Tz,
    debug_enabled: bool,
    log_to_file: bool,
) -> Result<SimulationGuards> {
    let start = parse_datetime_in_tz(start_time, tz)
        .map_err(|e| anyhow::anyhow!("Invalid start time: {}", e))?;
    let end = parse_datetime_in_tz(end_time, tz)
        .map_err(|e| anyhow::anyhow!("Invalid end time: {}", e))?;

    if end <= start {
        anyhow::bail!("Simulation end time must be after start time");
    }

    let source = Arc::new(SimulatedTimeSource::new(start, end, multiplier));
    let progress_shutdown = Arc::new(AtomicBool::new(false));

    let (logger_guard, progress_handle) = if log_to_file {
        // Terminal header first, before timestamps switch to simulated time
        log_version!();
        log_block_start!("Simulation Mode");
        log_simulation_details(start_time, end_time, &source, start, end);

        let log_filename = format!(
            "vigil-simulation-{}.log",
            Local::now().format("%Y%m%d-%H%M%S")
        );
        log_block_start!("Logging simulation output to: {}", log_filename);

        init_time_source(source.clone());
        Log::set_display_timezone(Some(tz));
        let guard = Log::start_file_logging(log_filename)?;
        let handle = spawn_progress_monitor(source.clone(), progress_shutdown.clone());

        log_version!();
        log_block_start!("Simulation Mode");
        log_simulation_details(start_time, end_time, &source, start, end);
        (Some(guard), Some(handle))
    } else {
        init_time_source(source.clone());
        Log::set_display_timezone(Some(tz));

        log_version!();
        log_block_start!("Simulation Mode");
        log_simulation_details(start_time, end_time, &source, start, end);
        (None, None)
    };

    if debug_enabled {
        log_pipe!();
        log_debug!("Simulated time source initialized");
    }

    Ok(SimulationGuards {
        logger_guard,
        progress_handle,
        progress_shutdown,
        log_to_file,
        is_complete: false,
    })
}

/// Draw a progress bar on the terminal while output goes to the log file.
fn spawn_progress_monitor(
    source: Arc<SimulatedTimeSource>,
    shutdown: Arc<AtomicBool>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let total = source.end().millis_since(source.start()).max(1);
        loop {
            if shutdown.load(Ordering::SeqCst) {
                break;
            }

            let done = source.now().millis_since(source.start());
            let progress = (done as f64 / total as f64).clamp(0.0, 1.0);
            print!("\r\x1B[K{}", progress_bar(progress, 40));
            std::io::stdout().flush().ok();

            if source.is_ended() {
                break;
            }
            thread::sleep(Duration::from_millis(100));
        }
    })
}

fn log_simulation_details(
    display_start: &str,
    display_end: &str,
    source: &SimulatedTimeSource,
    start: Instant,
    end: Instant,
) {
    let span = end.millis_since(start);
    log_decorated!("Simulating from {} to {}", display_start, display_end);
    log_indented!(
        "Total simulated time: {} hours {} minutes",
        span / MS_PER_HOUR,
        (span % MS_PER_HOUR) / MS_PER_MINUTE
    );

    if source.is_fast_forward() {
        log_indented!("Time acceleration: fast-forward (instant execution)");
    } else {
        log_indented!("Running simulation...");
    }
}
