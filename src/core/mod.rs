//! Driver loop: evaluate, render, sleep.
//!
//! `Core` owns the period clock, the sky sampler and the notice store. Each
//! tick it reads the global time source, builds a [`Snapshot`] and hands it
//! to the renderer. Sleeping happens in one-second slices so a shutdown
//! signal is noticed promptly even with a long tick interval. A fast-forward
//! simulation instead jumps straight to the next instant where the output
//! can change.
//!
//! In pretty mode a full block is written on the first tick, whenever the
//! period status changes and when the local date rolls over; daytime/night
//! switches get a single line. JSON mode writes every tick.

use anyhow::{Context, Result};
use chrono_tz::Tz;
use std::time::Duration;

use crate::config::{self, Config};
use crate::display::{self, OutputMode, Snapshot};
use crate::geo::DayNightSampler;
use crate::logger::Log;
use crate::notice::{self, SeenStore};
use crate::period::{PeriodClock, PeriodStatus};
use crate::signals::SignalState;
use crate::time::{CivilDateTime, Instant, MS_PER_DAY, render, resolve_in, source};

/// Longest single sleep between running-flag checks.
const SLEEP_SLICE: Duration = Duration::from_secs(1);

/// Parameters for creating a Core instance.
pub struct CoreParams {
    pub config: Config,
    pub signal_state: SignalState,
    pub debug_enabled: bool,
    pub output: OutputMode,
    /// Stop after the first tick
    pub once: bool,
    /// `None` disables the daily notice
    pub notice_store: Option<Box<dyn SeenStore>>,
}

pub struct Core {
    config: Config,
    clock: PeriodClock,
    sampler: DayNightSampler,
    tz: Tz,
    tick_interval: Duration,
    final_stretch_days: u32,
    notice_store: Option<Box<dyn SeenStore>>,
    signal_state: SignalState,
    debug_enabled: bool,
    output: OutputMode,
    once: bool,
    // Change tracking for pretty output
    last_status: Option<PeriodStatus>,
    last_local_date: Option<String>,
    last_daytime: Option<bool>,
    warned_fallback_day: Option<Instant>,
}

impl Core {
    /// Build the clock and sampler from a loaded config.
    pub fn new(params: CoreParams) -> Result<Self> {
        let config = params.config;
        let clock = PeriodClock::new(config.period_config()?)
            .context("Failed to resolve the period start")?;
        let sampler = DayNightSampler::new(config.geo()?);
        let tz = config.time_zone()?;

        Ok(Self {
            tick_interval: config.tick_interval(),
            final_stretch_days: config.final_stretch_days(),
            notice_store: if config.notice_enabled() {
                params.notice_store
            } else {
                None
            },
            config,
            clock,
            sampler,
            tz,
            signal_state: params.signal_state,
            debug_enabled: params.debug_enabled,
            output: params.output,
            once: params.once,
            last_status: None,
            last_local_date: None,
            last_daytime: None,
            warned_fallback_day: None,
        })
    }

    pub fn clock(&self) -> &PeriodClock {
        &self.clock
    }

    pub fn time_zone(&self) -> Tz {
        self.tz
    }

    /// Evaluate everything shown for `now`.
    pub fn snapshot(&mut self, now: Instant) -> Snapshot {
        let report = self.clock.evaluate(now);
        let sky = self.sampler.sample(now);
        Snapshot::build(now, &report, &sky, self.tz)
    }

    /// Run until shutdown, the end of a simulation, or one tick with `--once`.
    pub fn execute(mut self) -> Result<()> {
        if self.output == OutputMode::Json {
            Log::set_enabled(false);
        }

        if let Some(custom_dir) = config::get_custom_config_dir() {
            log_block_start!("Base directory: {}", custom_dir.display());
        }
        self.config.log_config();

        let window = *self.clock.window();
        log_block_start!(
            "Period: {} → {}",
            display::local_string(window.start(), self.tz, "%Y-%m-%d %H:%M"),
            display::local_string(window.end(), self.tz, "%Y-%m-%d %H:%M")
        );
        if self.debug_enabled {
            log_pipe!();
            log_debug!("Window in UTC: {} → {}", window.start(), window.end());
        }

        self.main_loop()?;

        log_block_start!("Stopped");
        log_end!();
        Ok(())
    }

    fn main_loop(&mut self) -> Result<()> {
        while self.signal_state.is_running() {
            let now = source::now();
            let snapshot = self.snapshot(now);

            self.show_notice(now)?;
            self.report(&snapshot)?;

            if self.once || source::simulation_ended() {
                break;
            }

            self.sleep_tick(now);
        }

        Ok(())
    }

    /// Show today's notice if it has not been seen yet.
    fn show_notice(&mut self, now: Instant) -> Result<()> {
        if self.output == OutputMode::Json {
            return Ok(());
        }
        let Some(store) = self.notice_store.as_deref_mut() else {
            return Ok(());
        };

        let report = self.clock.evaluate(now);
        match notice::show_once_per_day(store, now, self.tz, &report, self.final_stretch_days) {
            Ok(Some(notice)) => {
                log_block_start!("Daily notice");
                log_indented!("{}", notice.phase.hint());
                for section in &notice.sections {
                    log_decorated!("{}", section.title);
                    for item in &section.items {
                        log_indented!("· {}", item);
                    }
                }
                if self.debug_enabled {
                    log_debug!("Marked {} as seen", notice.key);
                }
            }
            Ok(None) => {}
            Err(e) => {
                // A broken state directory should not stop the clock
                log_pipe!();
                log_warning!("Daily notice unavailable: {e}");
                self.notice_store = None;
            }
        }
        Ok(())
    }

    fn report(&mut self, snapshot: &Snapshot) -> Result<()> {
        self.warn_on_sun_fallback();

        if self.output == OutputMode::Json {
            return display::render(snapshot, OutputMode::Json);
        }

        let status_changed = self.last_status != Some(snapshot.status);
        let date_changed = self.last_local_date.as_deref() != Some(snapshot.local_date.as_str());
        let daytime_changed = self
            .last_daytime
            .is_some_and(|was_day| was_day != snapshot.is_daytime);

        if status_changed || date_changed || self.debug_enabled {
            display::render(snapshot, OutputMode::Pretty)?;
        } else if daytime_changed {
            if snapshot.is_daytime {
                log_decorated!("Sunrise ({}), day until {}", snapshot.local_time, snapshot.sunset);
            } else {
                log_decorated!("Sunset ({}), night", snapshot.local_time);
            }
        }

        self.last_status = Some(snapshot.status);
        self.last_local_date = Some(snapshot.local_date.clone());
        self.last_daytime = Some(snapshot.is_daytime);
        Ok(())
    }

    fn warn_on_sun_fallback(&mut self) {
        let Some(window) = self.sampler.cached_window().copied() else {
            return;
        };
        if window.used_fallback() && self.warned_fallback_day != Some(window.day_start) {
            log_pipe!();
            log_warning!("No sunrise or sunset found for this day, using fixed 08:00/16:00 UTC");
            self.warned_fallback_day = Some(window.day_start);
        }
    }

    fn sleep_tick(&self, now: Instant) {
        if source::is_fast_forward() {
            source::sleep(self.fast_forward_step(now));
            return;
        }

        let mut remaining = self.tick_interval;
        while !remaining.is_zero() && self.signal_state.is_running() {
            if source::simulation_ended() {
                break;
            }
            let slice = remaining.min(SLEEP_SLICE);
            source::sleep(slice);
            remaining -= slice;
        }
    }

    /// Fast-forward jumps straight to the next moment the output can change,
    /// but never by less than one tick.
    fn fast_forward_step(&self, now: Instant) -> Duration {
        let tick_ms = i64::try_from(self.tick_interval.as_millis()).unwrap_or(i64::MAX);
        let until = self
            .next_change(now)
            .map_or(tick_ms, |at| at.millis_since(now));
        Duration::from_millis(until.max(tick_ms).max(0) as u64)
    }

    /// Earliest instant after `now` at which the status, the day, the local
    /// date or the daytime flag can flip.
    fn next_change(&self, now: Instant) -> Option<Instant> {
        let window = self.clock.window();
        let mut candidates = vec![
            window.start(),
            window.end(),
            // The sampler moves on to a new sun window
            now.utc_day_start().add_millis(MS_PER_DAY),
        ];

        if window.start() <= now && now < window.end() {
            let day_index = now.millis_since(window.start()) / MS_PER_DAY;
            candidates.push(window.start().add_millis((day_index + 1) * MS_PER_DAY));
        }
        if let Some(sun) = self.sampler.cached_window() {
            candidates.push(sun.sunrise);
            // Daytime includes the sunset instant itself
            candidates.push(sun.sunset.add_millis(1));
        }
        if let Some(midnight) = next_local_midnight(now, self.tz) {
            candidates.push(midnight);
        }

        candidates.into_iter().filter(|at| *at > now).min()
    }
}

/// Start of the next local day in `tz`.
fn next_local_midnight(now: Instant, tz: Tz) -> Option<Instant> {
    let today = render(now, tz)?.naive().date();
    let midnight = today.succ_opt()?.and_hms_opt(0, 0, 0)?;
    Some(resolve_in(CivilDateTime::from_naive(midnight), tz))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notice::MemorySeenStore;
    use chrono::{TimeZone, Utc};

    fn core(once: bool) -> Core {
        let mut config = Config::default();
        crate::config::loading::apply_defaults(&mut config);
        Core::new(CoreParams {
            config,
            signal_state: SignalState::detached(),
            debug_enabled: false,
            output: OutputMode::Json,
            once,
            notice_store: Some(Box::new(MemorySeenStore::new())),
        })
        .unwrap()
    }

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> Instant {
        Instant::from_datetime(Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap())
    }

    #[test]
    fn test_snapshot_matches_clock() {
        let mut core = core(true);
        let now = utc(2026, 2, 28, 23, 0);
        let snapshot = core.snapshot(now);

        assert_eq!(snapshot.day_number, 12);
        assert_eq!(snapshot.percent_done, 37.9);
        assert_eq!(snapshot.local_date, "2026-03-01");
        assert_eq!(core.time_zone(), chrono_tz::Europe::Oslo);
    }

    #[test]
    fn test_invalid_time_zone_fails_construction() {
        let config = Config {
            time_zone: Some("Mars/Olympus_Mons".to_string()),
            ..Config::default()
        };
        let result = Core::new(CoreParams {
            config,
            signal_state: SignalState::detached(),
            debug_enabled: false,
            output: OutputMode::Pretty,
            once: true,
            notice_store: None,
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_notice_disabled_by_config() {
        let config = Config {
            notice: Some(false),
            ..Config::default()
        };
        let core = Core::new(CoreParams {
            config,
            signal_state: SignalState::detached(),
            debug_enabled: false,
            output: OutputMode::Pretty,
            once: true,
            notice_store: Some(Box::new(MemorySeenStore::new())),
        })
        .unwrap();
        assert!(core.notice_store.is_none());
    }

    #[test]
    fn test_next_change_at_night_is_sunrise() {
        let mut core = core(false);
        // 03:00 in Oslo
        let now = utc(2026, 3, 1, 2, 0);
        core.snapshot(now);
        let sunrise = core.sampler.cached_window().unwrap().sunrise;

        assert!(sunrise > now);
        assert_eq!(core.next_change(now), Some(sunrise));
    }

    #[test]
    fn test_next_change_after_sunset_is_local_midnight() {
        let mut core = core(false);
        let now = utc(2026, 3, 1, 20, 0);
        let snapshot = core.snapshot(now);

        assert!(!snapshot.is_daytime);
        // Local midnight is also the start of day 13
        assert_eq!(core.next_change(now), Some(utc(2026, 3, 1, 23, 0)));
    }

    #[test]
    fn test_next_change_before_the_period_includes_its_start() {
        let mut core = core(false);
        let now = utc(2026, 2, 17, 22, 30);
        core.snapshot(now);

        assert_eq!(core.next_change(now), Some(utc(2026, 2, 17, 23, 0)));
    }

    #[test]
    fn test_fast_forward_step_is_at_least_one_tick() {
        let mut core = core(false);
        let now = utc(2026, 3, 1, 2, 0);
        core.snapshot(now);
        let sunrise = core.sampler.cached_window().unwrap().sunrise;

        assert_eq!(
            core.fast_forward_step(now),
            Duration::from_millis(sunrise.millis_since(now) as u64)
        );
        assert_eq!(
            core.fast_forward_step(sunrise.add_millis(-10)),
            Duration::from_secs(1)
        );
    }

    #[test]
    fn test_sleep_returns_immediately_after_shutdown() {
        let core = core(false);
        core.signal_state.request_shutdown();

        let started = std::time::Instant::now();
        core.sleep_tick(Instant::UNIX_EPOCH);
        assert!(started.elapsed() < Duration::from_millis(500));
    }
}
