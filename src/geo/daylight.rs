//! Sunrise/sunset search over a UTC day and the day/night blend derived from it.
//!
//! The search walks the sun's altitude in five-minute steps and records the
//! first upward and downward horizon crossings. The blend turns the current
//! instant into a position within that daylight span plus a bell-shaped
//! weight peaking at mid-day, which the theme uses for glow and sun height.

use serde::Serialize;
use std::f64::consts::PI;

use super::solar::{GeoCoordinate, position};
use crate::time::{Instant, MS_PER_DAY, MS_PER_HOUR, MS_PER_MINUTE};

/// Sampling step used when searching for horizon crossings.
pub const SAMPLE_STEP_MS: i64 = 5 * MS_PER_MINUTE;

/// Sunrise assumed when no upward crossing exists in the day.
pub const FALLBACK_SUNRISE_OFFSET_MS: i64 = 8 * MS_PER_HOUR;

/// Sunset assumed when no downward crossing exists in the day.
pub const FALLBACK_SUNSET_OFFSET_MS: i64 = 16 * MS_PER_HOUR;

/// Approximate sunrise and sunset within one UTC day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SunWindow {
    pub day_start: Instant,
    pub sunrise: Instant,
    pub sunset: Instant,
    /// False when `sunrise` is the fallback value
    pub rise_found: bool,
    /// False when `sunset` is the fallback value
    pub set_found: bool,
}

impl SunWindow {
    pub fn used_fallback(&self) -> bool {
        !self.rise_found || !self.set_found
    }

    /// Daylight length in milliseconds, never below 1.
    pub fn day_length(&self) -> i64 {
        self.sunset.millis_since(self.sunrise).max(1)
    }
}

/// Where `now` sits within the daylight span.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SkyBlend {
    /// Linear position in the daylight span, clamped to `[0, 1]`
    pub day_fraction: f64,
    /// `sin(π·day_fraction)`, 0 at sunrise and sunset, 1 at mid-day
    pub bell_weight: f64,
    pub is_daytime: bool,
}

/// Sample the sun over the 24 hours starting at `day_start`.
pub fn sun_window(day_start: Instant, geo: GeoCoordinate) -> SunWindow {
    let mut sunrise = None;
    let mut sunset = None;
    let mut previous = position(day_start, geo).altitude;

    let mut offset = SAMPLE_STEP_MS;
    while offset <= MS_PER_DAY {
        let at = day_start.add_millis(offset);
        let altitude = position(at, geo).altitude;

        if sunrise.is_none() && previous < 0.0 && altitude >= 0.0 {
            sunrise = Some(at);
        }
        if sunset.is_none() && previous >= 0.0 && altitude < 0.0 {
            sunset = Some(at);
        }

        previous = altitude;
        offset += SAMPLE_STEP_MS;
    }

    SunWindow {
        day_start,
        sunrise: sunrise.unwrap_or(day_start.add_millis(FALLBACK_SUNRISE_OFFSET_MS)),
        sunset: sunset.unwrap_or(day_start.add_millis(FALLBACK_SUNSET_OFFSET_MS)),
        rise_found: sunrise.is_some(),
        set_found: sunset.is_some(),
    }
}

/// Sun window for the UTC day containing `now`.
pub fn sun_window_for(now: Instant, geo: GeoCoordinate) -> SunWindow {
    sun_window(now.utc_day_start(), geo)
}

pub fn blend(now: Instant, window: &SunWindow) -> SkyBlend {
    let day_length = window.day_length() as f64;
    let is_daytime = window.sunrise <= now && now <= window.sunset;
    let day_fraction = (now.millis_since(window.sunrise) as f64 / day_length).clamp(0.0, 1.0);

    SkyBlend {
        day_fraction,
        bell_weight: bell(day_fraction),
        is_daytime,
    }
}

/// Bell weight for a position in the daylight span.
pub fn bell(t: f64) -> f64 {
    (PI * t).sin().clamp(0.0, 1.0)
}

/// One sampler reading: the day's window plus the blend at the instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SkyReading {
    pub window: SunWindow,
    pub blend: SkyBlend,
}

/// Blend sampler that keeps the sun window of the current UTC day.
///
/// Searching the day costs 289 solar positions, so the window is only
/// recomputed when `now` moves into a different UTC day.
#[derive(Debug, Clone)]
pub struct DayNightSampler {
    geo: GeoCoordinate,
    cached: Option<SunWindow>,
}

impl DayNightSampler {
    pub fn new(geo: GeoCoordinate) -> Self {
        Self { geo, cached: None }
    }

    pub fn geo(&self) -> GeoCoordinate {
        self.geo
    }

    /// The window computed by the last `sample`, if any.
    pub fn cached_window(&self) -> Option<&SunWindow> {
        self.cached.as_ref()
    }

    /// Window for the UTC day of `now`, recomputed only on a day change.
    pub fn window(&mut self, now: Instant) -> SunWindow {
        let day_start = now.utc_day_start();
        match self.cached {
            Some(window) if window.day_start == day_start => window,
            _ => {
                let window = sun_window(day_start, self.geo);
                self.cached = Some(window);
                window
            }
        }
    }

    pub fn sample(&mut self, now: Instant) -> SkyReading {
        let window = self.window(now);
        SkyReading {
            window,
            blend: blend(now, &window),
        }
    }
}
