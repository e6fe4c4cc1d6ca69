//! Per-tick snapshot of everything shown to the user, and its terminal output.
//!
//! [`Snapshot::build`] is the single place where the period report, the sky
//! reading and the observance timezone meet. Rendering receives the finished
//! value and never reaches back into the clock or the sampler.

pub mod theme;

use anyhow::Result;
use chrono_tz::Tz;
use serde::Serialize;
use std::fmt;

use crate::format::{format_percent, format_std_duration, percent, percent_left};
use crate::geo::SkyReading;
use crate::period::{PeriodReport, PeriodStatus};
use crate::time::{Instant, render as render_civil};

pub use theme::{RingGauge, SkyTheme};

/// How each tick is written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Box-drawn log block
    #[default]
    Pretty,
    /// One JSON object per line on stdout
    Json,
}

/// Short label for where we are in the period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayLabel {
    StartsSoon,
    Day { day: u32, of: u32 },
    Complete,
}

impl DayLabel {
    pub fn for_status(status: PeriodStatus, duration_days: u32) -> Self {
        match status {
            PeriodStatus::Before => Self::StartsSoon,
            PeriodStatus::During(day) => Self::Day {
                day,
                of: duration_days,
            },
            PeriodStatus::After => Self::Complete,
        }
    }
}

impl fmt::Display for DayLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartsSoon => write!(f, "Starts soon"),
            Self::Day { day, of } => write!(f, "Day {day} of {of}"),
            Self::Complete => write!(f, "Complete"),
        }
    }
}

/// Everything one tick displays, already formatted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub now: Instant,
    pub local_date: String,
    pub local_time: String,
    pub status: PeriodStatus,
    pub day_number: u32,
    pub duration_days: u32,
    pub day_label: String,
    pub progress: f64,
    pub percent_done: f64,
    pub percent_left: f64,
    pub time_done: String,
    pub time_left: String,
    pub ends_at: String,
    pub is_daytime: bool,
    pub sunrise: String,
    pub sunset: String,
    pub sun_fallback: bool,
    pub theme: SkyTheme,
    pub ring: RingGauge,
}

impl Snapshot {
    pub fn build(now: Instant, report: &PeriodReport, sky: &SkyReading, tz: Tz) -> Self {
        Self {
            now,
            local_date: local_string(now, tz, "%Y-%m-%d"),
            local_time: local_string(now, tz, "%H:%M:%S"),
            status: report.status,
            day_number: report.day_number(),
            duration_days: report.duration_days,
            day_label: DayLabel::for_status(report.status, report.duration_days).to_string(),
            progress: report.progress,
            percent_done: percent(report.progress),
            percent_left: percent_left(report.progress),
            time_done: format_std_duration(report.elapsed),
            time_left: format_std_duration(report.remaining),
            ends_at: local_string(report.end, tz, "%Y-%m-%d %H:%M"),
            is_daytime: sky.blend.is_daytime,
            sunrise: local_string(sky.window.sunrise, tz, "%H:%M"),
            sunset: local_string(sky.window.sunset, tz, "%H:%M"),
            sun_fallback: sky.window.used_fallback(),
            theme: SkyTheme::from_blend(&sky.blend),
            ring: RingGauge::for_progress(report.progress),
        }
    }
}

/// Civil rendering of `instant` in `tz`; falls back to the UTC form for
/// instants outside chrono's range.
pub fn local_string(instant: Instant, tz: Tz, pattern: &str) -> String {
    match render_civil(instant, tz) {
        Some(civil) => civil.naive().format(pattern).to_string(),
        None => instant.to_string(),
    }
}

/// Text progress bar such as `[██████░░░░] 60.0%`.
pub fn progress_bar(progress: f64, width: usize) -> String {
    let progress = if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    };
    let filled = ((progress * width as f64).round() as usize).min(width);
    format!(
        "[{}{}] {}%",
        "█".repeat(filled),
        "░".repeat(width - filled),
        format_percent(progress)
    )
}

/// Write one snapshot in the requested mode.
pub fn render(snapshot: &Snapshot, mode: OutputMode) -> Result<()> {
    match mode {
        OutputMode::Json => {
            println!("{}", serde_json::to_string(snapshot)?);
        }
        OutputMode::Pretty => {
            log_block_start!(
                "{} {} · {}",
                snapshot.local_date,
                snapshot.local_time,
                snapshot.day_label
            );
            log_indented!("{}", progress_bar(snapshot.progress, 30));
            log_indented!(
                "Done {}  ·  Left {} ({}%)",
                snapshot.time_done,
                snapshot.time_left,
                snapshot.percent_left
            );
            log_indented!("Ends {}", snapshot.ends_at);
            log_indented!(
                "Sun {} → {} · {}",
                snapshot.sunrise,
                snapshot.sunset,
                if snapshot.is_daytime { "day" } else { "night" }
            );
        }
    }
    Ok(())
}
