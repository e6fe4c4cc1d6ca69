//! Clock abstraction for real and simulated time.
//!
//! The driver loop never reads the system clock directly. It asks the global
//! [`TimeSource`], which is the real clock unless `--simulate` installed a
//! [`SimulatedTimeSource`]. Simulation lets a whole observance period (or a
//! single day of sky changes) play out in seconds.

use chrono::Utc;
use once_cell::sync::OnceCell;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration as StdDuration;

use super::instant::Instant;
use crate::constants::DEFAULT_SIMULATION_MULTIPLIER;
use super::zone::{CivilDateTime, resolve_in};

/// Global time source instance, defaults to RealTimeSource
static TIME_SOURCE: OnceCell<Arc<dyn TimeSource>> = OnceCell::new();

/// Trait for abstracting time operations
pub trait TimeSource: Send + Sync {
    /// Get the current instant
    fn now(&self) -> Instant;

    /// Sleep for the specified duration (or simulate it)
    fn sleep(&self, duration: StdDuration);

    /// Check if this is a simulated time source
    fn is_simulated(&self) -> bool;

    /// Check if simulation has ended (always false for real time)
    fn is_ended(&self) -> bool {
        false
    }

    /// Sleeps complete instantly instead of taking real time
    fn is_fast_forward(&self) -> bool {
        false
    }
}

/// Real-time implementation backed by the system clock
pub struct RealTimeSource;

impl TimeSource for RealTimeSource {
    fn now(&self) -> Instant {
        Instant::from_datetime(Utc::now())
    }

    fn sleep(&self, duration: StdDuration) {
        std::thread::sleep(duration);
    }

    fn is_simulated(&self) -> bool {
        false
    }
}

/// Simulated time source for accelerated runs.
///
/// Two modes:
/// - Linear acceleration: every real second advances `multiplier` simulated seconds
/// - Fast-forward (`multiplier == 0.0`): each sleep jumps instantly
pub struct SimulatedTimeSource {
    start: Instant,
    end: Instant,
    /// Simulated seconds per real second, 0.0 for fast-forward
    multiplier: f64,
    /// Simulated milliseconds that have fully elapsed
    elapsed_ms: Mutex<i64>,
    /// Sleep currently in progress: (real start, simulated length in ms)
    sleep_in_progress: Mutex<Option<(std::time::Instant, i64)>>,
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl SimulatedTimeSource {
    /// Create a new simulated time source.
    ///
    /// Negative or non-finite multipliers fall back to the default rate.
    pub fn new(start: Instant, end: Instant, multiplier: f64) -> Self {
        let multiplier = if multiplier == 0.0 {
            0.0
        } else if multiplier < 0.0 || !multiplier.is_finite() {
            DEFAULT_SIMULATION_MULTIPLIER
        } else {
            multiplier
        };

        Self {
            start,
            end,
            multiplier,
            elapsed_ms: Mutex::new(0),
            sleep_in_progress: Mutex::new(None),
        }
    }

    pub fn is_fast_forward(&self) -> bool {
        self.multiplier == 0.0
    }

    pub fn start(&self) -> Instant {
        self.start
    }

    pub fn end(&self) -> Instant {
        self.end
    }

    /// Current simulated instant, including the elapsed share of any sleep
    /// that is still running.
    fn current(&self) -> Instant {
        let mut total = *locked(&self.elapsed_ms);

        if let Some((started, simulated_ms)) = *locked(&self.sleep_in_progress) {
            let progressed = (started.elapsed().as_secs_f64() * self.multiplier * 1000.0) as i64;
            total += progressed.min(simulated_ms);
        }

        self.start.add_millis(total).min(self.end)
    }

    /// Check if the simulation has reached its end time
    pub fn is_ended(&self) -> bool {
        self.current() >= self.end
    }
}

impl TimeSource for SimulatedTimeSource {
    fn now(&self) -> Instant {
        self.current()
    }

    fn sleep(&self, duration: StdDuration) {
        let requested = duration.as_millis() as i64;
        let remaining = self.end.millis_since(self.current()).max(0);
        let step = requested.min(remaining);

        if step == 0 {
            return;
        }

        if self.is_fast_forward() {
            *locked(&self.elapsed_ms) += step;
            // Yield so log output keeps pace with the jumps
            std::thread::sleep(StdDuration::from_millis(1));
            return;
        }

        *locked(&self.sleep_in_progress) = Some((std::time::Instant::now(), step));
        let real_secs = step as f64 / 1000.0 / self.multiplier;
        if real_secs > 0.0 {
            std::thread::sleep(StdDuration::from_secs_f64(real_secs));
        }
        *locked(&self.sleep_in_progress) = None;
        *locked(&self.elapsed_ms) += step;
    }

    fn is_simulated(&self) -> bool {
        true
    }

    fn is_ended(&self) -> bool {
        self.is_ended()
    }

    fn is_fast_forward(&self) -> bool {
        self.is_fast_forward()
    }
}

fn global() -> &'static Arc<dyn TimeSource> {
    TIME_SOURCE.get_or_init(|| Arc::new(RealTimeSource))
}

/// Initialize the global time source (call once at startup)
pub fn init_time_source(source: Arc<dyn TimeSource>) {
    TIME_SOURCE.set(source).ok();
}

/// Check if the time source has been initialized
pub fn is_initialized() -> bool {
    TIME_SOURCE.get().is_some()
}

/// Get the current instant from the global time source
pub fn now() -> Instant {
    global().now()
}

/// Sleep for the specified duration using the global time source
pub fn sleep(duration: StdDuration) {
    global().sleep(duration)
}

/// Check if we're running in simulation mode
pub fn is_simulated() -> bool {
    global().is_simulated()
}

/// Check if simulation has reached its end time (always false for real time)
pub fn simulation_ended() -> bool {
    global().is_ended()
}

/// Check if the active source jumps through sleeps without waiting
pub fn is_fast_forward() -> bool {
    global().is_fast_forward()
}

/// Parse a "YYYY-MM-DD HH:MM:SS" string as civil time in the given zone.
pub fn parse_datetime_in_tz(s: &str, tz: chrono_tz::Tz) -> Result<Instant, String> {
    s.parse::<CivilDateTime>()
        .map(|civil| resolve_in(civil, tz))
        .map_err(|e| format!("{e}. Use YYYY-MM-DD HH:MM:SS"))
}
