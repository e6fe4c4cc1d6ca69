//! Cosmetic parameters derived from the sky blend and period progress.

use serde::Serialize;
use std::f64::consts::PI;

use crate::geo::SkyBlend;

/// Radius of the progress ring, in the same units as its circumference.
pub const RING_RADIUS: f64 = 46.0;

/// Off-screen height used to park the sun at night, in viewport percent.
const NIGHT_SUN_Y: f64 = 120.0;

pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Glow intensities and sun placement for one instant.
///
/// Positions are viewport percentages: `sun_x` runs from the left edge at
/// sunrise to the right edge at sunset, `sun_y` from near the bottom up to
/// its highest point at mid-day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SkyTheme {
    pub glow_a: f64,
    pub glow_b: f64,
    pub sun_x: f64,
    pub sun_y: f64,
    pub sun_opacity: f64,
}

impl SkyTheme {
    pub fn from_blend(blend: &SkyBlend) -> Self {
        let bell = blend.bell_weight;
        let (glow_a, glow_b, sun_y, sun_opacity) = if blend.is_daytime {
            (
                lerp(0.10, 0.22, bell),
                lerp(0.06, 0.16, bell),
                lerp(78.0, 16.0, bell),
                lerp(0.35, 1.0, bell),
            )
        } else {
            (0.06, 0.04, NIGHT_SUN_Y, 0.0)
        };

        Self {
            glow_a,
            glow_b,
            sun_x: lerp(6.0, 94.0, blend.day_fraction),
            sun_y,
            sun_opacity,
        }
    }
}

/// Stroke geometry for a circular progress gauge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RingGauge {
    pub circumference: f64,
    /// Unfilled part of the stroke; 0 when complete
    pub dash_offset: f64,
}

impl RingGauge {
    pub fn for_progress(progress: f64) -> Self {
        let circumference = 2.0 * PI * RING_RADIUS;
        Self {
            circumference,
            dash_offset: circumference * (1.0 - progress.clamp(0.0, 1.0)),
        }
    }
}
