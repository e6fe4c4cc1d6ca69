//! The observance window and its evaluation at a given instant.
//!
//! A [`PeriodConfig`] names the civil start time, its timezone and the number
//! of days. [`PeriodClock`] resolves that once into a [`PeriodWindow`] and then
//! answers, for any instant, where we are: before the start, on day N, or
//! after the end, together with progress and elapsed/remaining time.
//!
//! Evaluation is total. The window always has a positive length because a
//! zero-day config is rejected when it is built.

use serde::Serialize;
use std::fmt;
use std::time::Duration as StdDuration;

use crate::time::{CivilDateTime, Instant, MS_PER_DAY, TimeError, resolve};

/// Static description of the observance period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodConfig {
    start: CivilDateTime,
    time_zone: String,
    duration_days: u32,
}

impl PeriodConfig {
    pub fn new(
        start: CivilDateTime,
        time_zone: impl Into<String>,
        duration_days: u32,
    ) -> Result<Self, TimeError> {
        if duration_days == 0 {
            return Err(TimeError::InvalidDuration);
        }
        Ok(Self {
            start,
            time_zone: time_zone.into(),
            duration_days,
        })
    }

    pub fn start(&self) -> CivilDateTime {
        self.start
    }

    pub fn time_zone(&self) -> &str {
        &self.time_zone
    }

    pub fn duration_days(&self) -> u32 {
        self.duration_days
    }
}

/// Where an instant falls relative to the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "day", rename_all = "lowercase")]
pub enum PeriodStatus {
    /// The window has not started yet
    Before,
    /// Inside the window, carrying the 1-based day index
    During(u32),
    /// The window has ended
    After,
}

impl PeriodStatus {
    /// Day number shown to the user: 0 before, the day index during, and the
    /// final day once the window is over.
    pub fn day_number(&self, duration_days: u32) -> u32 {
        match self {
            Self::Before => 0,
            Self::During(day) => *day,
            Self::After => duration_days,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::During(_))
    }
}

impl fmt::Display for PeriodStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Before => write!(f, "Before"),
            Self::During(day) => write!(f, "During (day {day})"),
            Self::After => write!(f, "After"),
        }
    }
}

/// Resolved absolute bounds of the observance period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodWindow {
    start: Instant,
    end: Instant,
    duration_days: u32,
}

impl PeriodWindow {
    /// Resolve the configured civil start in its timezone.
    pub fn resolve(config: &PeriodConfig) -> Result<Self, TimeError> {
        let start = resolve(config.start, &config.time_zone)?;
        Ok(Self::from_start(start, config.duration_days))
    }

    /// Window of `duration_days` whole days beginning at `start`.
    ///
    /// Days are fixed 24-hour spans from the start instant, independent of
    /// any daylight saving change inside the window.
    pub fn from_start(start: Instant, duration_days: u32) -> Self {
        Self {
            start,
            end: start.add_millis(i64::from(duration_days) * MS_PER_DAY),
            duration_days,
        }
    }

    pub fn start(&self) -> Instant {
        self.start
    }

    pub fn end(&self) -> Instant {
        self.end
    }

    pub fn duration_days(&self) -> u32 {
        self.duration_days
    }

    /// Window length in milliseconds, always positive for a validated config.
    pub fn total_millis(&self) -> i64 {
        self.end.millis_since(self.start)
    }

    pub fn status(&self, now: Instant) -> PeriodStatus {
        if now < self.start {
            PeriodStatus::Before
        } else if now >= self.end {
            PeriodStatus::After
        } else {
            let day_index = now.millis_since(self.start) / MS_PER_DAY;
            PeriodStatus::During(day_index as u32 + 1)
        }
    }

    pub fn evaluate(&self, now: Instant) -> PeriodReport {
        let total = self.total_millis();
        let elapsed = now.millis_since(self.start).clamp(0, total);
        let remaining = self.end.millis_since(now).clamp(0, total);
        let progress = (elapsed as f64 / total as f64).clamp(0.0, 1.0);

        PeriodReport {
            status: self.status(now),
            progress,
            elapsed: StdDuration::from_millis(elapsed as u64),
            remaining: StdDuration::from_millis(remaining as u64),
            start: self.start,
            end: self.end,
            duration_days: self.duration_days,
        }
    }
}

/// Result of evaluating the window at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodReport {
    pub status: PeriodStatus,
    /// Fraction of the window elapsed, in `[0, 1]`
    pub progress: f64,
    pub elapsed: StdDuration,
    pub remaining: StdDuration,
    pub start: Instant,
    pub end: Instant,
    pub duration_days: u32,
}

impl PeriodReport {
    pub fn day_number(&self) -> u32 {
        self.status.day_number(self.duration_days)
    }
}

/// Evaluates a fixed observance window.
///
/// The start instant is resolved once at construction; the config is
/// immutable, so this is identical to resolving on every tick.
#[derive(Debug, Clone)]
pub struct PeriodClock {
    config: PeriodConfig,
    window: PeriodWindow,
}

impl PeriodClock {
    pub fn new(config: PeriodConfig) -> Result<Self, TimeError> {
        let window = PeriodWindow::resolve(&config)?;
        Ok(Self { config, window })
    }

    pub fn config(&self) -> &PeriodConfig {
        &self.config
    }

    pub fn window(&self) -> &PeriodWindow {
        &self.window
    }

    pub fn evaluate(&self, now: Instant) -> PeriodReport {
        self.window.evaluate(now)
    }
}

/// One-shot evaluation straight from a config.
pub fn evaluate(config: &PeriodConfig, now: Instant) -> Result<PeriodReport, TimeError> {
    Ok(PeriodWindow::resolve(config)?.evaluate(now))
}

#[cfg(test)]
mod tests;
