//! Application coordinator that manages the lifecycle of a vigil run.
//!
//! Handles configuration loading, signal handler setup and notice store
//! creation, then hands everything to [`Core`]. The builder covers the
//! different startup contexts:
//! - Normal startup: `Vigil::new(debug_enabled).run()`
//! - Single evaluation: `Vigil::new(false).once(true).run()`
//! - Simulation mode: `Vigil::new(debug_enabled).with_config(config).without_headers().run()`

use anyhow::Result;

use crate::config::{self, Config};
use crate::core::{Core, CoreParams};
use crate::display::OutputMode;
use crate::notice::{FileSeenStore, MemorySeenStore, SeenStore};
use crate::signals::{SignalState, setup_signal_handler};
use crate::time::source;

/// Builder for configuring and running the application.
///
/// ```no_run
/// use vigil::Vigil;
/// use vigil::display::OutputMode;
///
/// # fn main() -> anyhow::Result<()> {
/// Vigil::new(false).with_output(OutputMode::Json).once(true).run()?;
/// # Ok(())
/// # }
/// ```
pub struct Vigil {
    debug_enabled: bool,
    show_headers: bool,
    once: bool,
    output: OutputMode,
    config: Option<Config>,
}

impl Vigil {
    pub fn new(debug_enabled: bool) -> Self {
        Self {
            debug_enabled,
            show_headers: true,
            once: false,
            output: OutputMode::Pretty,
            config: None,
        }
    }

    /// Skip the version header (already shown by simulation setup)
    pub fn without_headers(mut self) -> Self {
        self.show_headers = false;
        self
    }

    /// Stop after a single evaluation
    pub fn once(mut self, once: bool) -> Self {
        self.once = once;
        self
    }

    pub fn with_output(mut self, output: OutputMode) -> Self {
        self.output = output;
        self
    }

    /// Use an already loaded configuration instead of loading it again
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Run until shutdown, the end of a simulation, or a single tick.
    pub fn run(self) -> Result<()> {
        if self.show_headers && self.output == OutputMode::Pretty {
            log_version!();
        }

        let config = match self.config {
            Some(config) => config,
            None => config::load()?,
        };

        let signal_state = if self.once {
            SignalState::detached()
        } else {
            setup_signal_handler(self.debug_enabled)?
        };

        let notice_store = if config.notice_enabled() {
            open_notice_store(source::is_simulated(), self.debug_enabled)
        } else {
            None
        };

        let core = Core::new(CoreParams {
            config,
            signal_state,
            debug_enabled: self.debug_enabled,
            output: self.output,
            once: self.once,
            notice_store,
        })?;

        core.execute()
    }
}

/// The file-backed store, or `None` with a warning when no state directory
/// can be determined. Simulated days never touch the real state directory.
fn open_notice_store(simulated: bool, debug_enabled: bool) -> Option<Box<dyn SeenStore>> {
    if simulated {
        if debug_enabled {
            log_pipe!();
            log_debug!("Notice state kept in memory for this simulation");
        }
        return Some(Box::new(MemorySeenStore::new()));
    }

    match FileSeenStore::default_location() {
        Ok(store) => {
            if debug_enabled {
                log_pipe!();
                log_debug!("Notice state directory: {}", store.dir().display());
            }
            Some(Box::new(store))
        }
        Err(e) => {
            log_pipe!();
            log_warning!("Daily notice disabled: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::tempdir;

    #[test]
    #[serial]
    fn test_simulated_notice_store_leaves_state_dir_alone() {
        let temp_dir = tempdir().unwrap();
        let original = std::env::var("XDG_STATE_HOME").ok();
        unsafe {
            std::env::set_var("XDG_STATE_HOME", temp_dir.path());
        }

        let mut store = open_notice_store(true, false).unwrap();
        store.mark_seen("notice_seen_2026-03-05").unwrap();
        let seen = store.is_seen("notice_seen_2026-03-05").unwrap();

        unsafe {
            match original {
                Some(val) => std::env::set_var("XDG_STATE_HOME", val),
                None => std::env::remove_var("XDG_STATE_HOME"),
            }
        }

        assert!(seen);
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }
}
