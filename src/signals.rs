//! Signal handling for graceful shutdown.
//!
//! A background thread waits on SIGINT, SIGTERM and SIGHUP through
//! `signal-hook` and clears the shared running flag. The driver loop checks
//! the flag between sleep slices, so shutdown takes effect within a second.

use anyhow::{Context, Result};
use signal_hook::{
    consts::signal::{SIGHUP, SIGINT, SIGTERM},
    iterator::Signals,
};
use std::{
    sync::Arc,
    sync::atomic::{AtomicBool, Ordering},
    thread,
};

/// Signal handling state shared between threads
pub struct SignalState {
    /// Cleared once a shutdown signal arrives
    pub running: Arc<AtomicBool>,
}

impl SignalState {
    /// State without a listener thread, for one-shot runs and tests.
    pub fn detached() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn request_shutdown(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

/// User-facing description of a shutdown signal.
pub fn shutdown_message(signal: i32) -> &'static str {
    match signal {
        SIGINT => "Received SIGINT (Ctrl+C), shutting down...",
        SIGTERM => "Received termination request, shutting down...",
        SIGHUP => "Received hangup signal, shutting down...",
        _ => "Received shutdown signal, shutting down...",
    }
}

/// Register shutdown signals and spawn the listener thread.
pub fn setup_signal_handler(debug_enabled: bool) -> Result<SignalState> {
    let state = SignalState::detached();

    let mut signals =
        Signals::new([SIGINT, SIGTERM, SIGHUP]).context("failed to register signal handlers")?;

    let running = state.running.clone();
    thread::spawn(move || {
        for sig in signals.forever() {
            if debug_enabled {
                log_pipe!();
                log_debug!("Signal {} received, clearing running flag", sig);
            }

            log_pipe!();
            log_info!("{}", shutdown_message(sig));
            running.store(false, Ordering::SeqCst);
        }
    });

    Ok(state)
}
