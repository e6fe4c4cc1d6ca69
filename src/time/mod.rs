//! Time primitives: absolute instants, civil time in named zones, and the
//! clock sources the driver loop reads from.

pub mod instant;
pub mod simulate;
pub mod source;
pub mod zone;

pub use instant::{Instant, MS_PER_DAY, MS_PER_HOUR, MS_PER_MINUTE};
pub use zone::{CivilDateTime, CivilRenderer, parse_time_zone, render, resolve, resolve_in};

/// Errors raised by the pure time layer.
///
/// These only occur while building inputs at startup; per-tick evaluation
/// never fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeError {
    /// The configured zone name is not in the tz database.
    #[error("unknown time zone '{0}'")]
    UnknownTimeZone(String),

    /// The civil date/time fields do not form a real calendar moment.
    #[error("invalid civil date/time: {0}")]
    InvalidCivilTime(String),

    /// The observance window must last at least one day.
    #[error("duration_days must be greater than zero")]
    InvalidDuration,
}
