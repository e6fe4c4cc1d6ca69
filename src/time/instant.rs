//! Absolute instants as milliseconds since the Unix epoch.
//!
//! Everything downstream of timezone resolution works on [`Instant`] values
//! only; no further timezone-aware arithmetic happens once a civil start time
//! has been resolved.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration as StdDuration;

/// Milliseconds in one civil day of the observance window.
pub const MS_PER_DAY: i64 = 86_400_000;
pub const MS_PER_HOUR: i64 = 3_600_000;
pub const MS_PER_MINUTE: i64 = 60_000;

/// An absolute point in time, in milliseconds since 1970-01-01T00:00:00Z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Instant(i64);

impl Instant {
    pub const UNIX_EPOCH: Instant = Instant(0);

    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    pub const fn as_millis(self) -> i64 {
        self.0
    }

    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt.timestamp_millis())
    }

    /// Convert back to a chrono UTC timestamp.
    ///
    /// Returns `None` only for values outside chrono's representable range.
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp_millis(self.0)
    }

    /// Shift by a signed number of milliseconds.
    pub const fn add_millis(self, millis: i64) -> Self {
        Self(self.0 + millis)
    }

    /// Signed distance `self - earlier` in milliseconds.
    pub const fn millis_since(self, earlier: Instant) -> i64 {
        self.0 - earlier.0
    }

    /// Floor to the containing UTC midnight.
    pub const fn utc_day_start(self) -> Self {
        Self(self.0.div_euclid(MS_PER_DAY) * MS_PER_DAY)
    }

    /// Distance between two instants as a non-negative std duration,
    /// saturating at zero when `later` precedes `self`.
    pub fn duration_until(self, later: Instant) -> StdDuration {
        StdDuration::from_millis(later.millis_since(self).max(0) as u64)
    }
}

impl From<DateTime<Utc>> for Instant {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::from_datetime(dt)
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.3fZ")),
            None => write!(f, "{}ms", self.0),
        }
    }
}
