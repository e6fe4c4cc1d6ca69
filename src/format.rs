//! Numeric formatting for durations and percentages.

use std::time::Duration as StdDuration;

use crate::time::MS_PER_DAY;

/// Format milliseconds as `HH:MM:SS`, or `D d HH:MM:SS` once a full day is
/// included. Negative values format as zero; sub-second parts are dropped.
pub fn format_duration(ms: i64) -> String {
    let ms = ms.max(0);
    let days = ms / MS_PER_DAY;
    let total_seconds = (ms % MS_PER_DAY) / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if days > 0 {
        format!("{days} d {hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    }
}

pub fn format_std_duration(duration: StdDuration) -> String {
    format_duration(i64::try_from(duration.as_millis()).unwrap_or(i64::MAX))
}

/// Percentage with one decimal of precision, in `[0.0, 100.0]`.
pub fn percent(fraction: f64) -> f64 {
    let fraction = if fraction.is_nan() {
        0.0
    } else {
        fraction.clamp(0.0, 1.0)
    };
    (fraction * 1000.0).round() / 10.0
}

pub fn format_percent(fraction: f64) -> String {
    format!("{:.1}", percent(fraction))
}

/// Share still to go, rounded the same way as [`percent`].
pub fn percent_left(fraction: f64) -> f64 {
    ((100.0 - percent(fraction)) * 10.0).round() / 10.0
}
