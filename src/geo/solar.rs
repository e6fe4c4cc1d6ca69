//! Low-order analytical solar position.
//!
//! Mean anomaly, equation of centre, ecliptic longitude and a fixed obliquity
//! give the sun's declination and right ascension; sidereal time at the
//! observer turns those into altitude and azimuth. Accuracy is in the order of
//! a degree, which is plenty for finding sunrise and sunset to within a
//! sampling step.

use serde::Serialize;
use std::f64::consts::PI;

use crate::time::{Instant, MS_PER_DAY};

/// Julian day number of the Unix epoch (1970-01-01T12:00Z is JD 2440588.0).
const UNIX_EPOCH_JULIAN_DAY: f64 = 2_440_588.0;
/// Julian day of the J2000.0 epoch.
const J2000: f64 = 2_451_545.0;
/// Obliquity of the ecliptic in degrees, without precession.
const OBLIQUITY_DEG: f64 = 23.4397;
/// Longitude of perihelion in degrees.
const PERIHELION_DEG: f64 = 102.9372;

/// Observer position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoCoordinate {
    latitude: f64,
    longitude: f64,
}

impl GeoCoordinate {
    /// Returns `None` for latitude outside ±90° or longitude outside ±180°.
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        if (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude) {
            Some(Self {
                latitude,
                longitude,
            })
        } else {
            None
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Sun position in radians. Altitude is above the horizon; azimuth is
/// measured from south, positive towards west.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SolarPosition {
    pub altitude: f64,
    pub azimuth: f64,
}

pub fn rad(deg: f64) -> f64 {
    deg * PI / 180.0
}

pub fn to_julian(instant: Instant) -> f64 {
    instant.as_millis() as f64 / MS_PER_DAY as f64 - 0.5 + UNIX_EPOCH_JULIAN_DAY
}

/// Days since J2000.0, fractional.
pub fn to_days(instant: Instant) -> f64 {
    to_julian(instant) - J2000
}

pub fn solar_mean_anomaly(d: f64) -> f64 {
    rad(357.5291 + 0.98560028 * d)
}

pub fn ecliptic_longitude(m: f64) -> f64 {
    let center = rad(1.9148 * m.sin() + 0.0200 * (2.0 * m).sin() + 0.0003 * (3.0 * m).sin());
    m + center + rad(PERIHELION_DEG) + PI
}

pub fn declination(l: f64) -> f64 {
    let e = rad(OBLIQUITY_DEG);
    (e.sin() * l.sin()).asin()
}

pub fn right_ascension(l: f64) -> f64 {
    let e = rad(OBLIQUITY_DEG);
    (l.sin() * e.cos()).atan2(l.cos())
}

/// Local sidereal time; `lw` is the west longitude in radians.
pub fn sidereal_time(d: f64, lw: f64) -> f64 {
    rad(280.16 + 360.9856235 * d) - lw
}

pub fn altitude(h: f64, phi: f64, dec: f64) -> f64 {
    (phi.sin() * dec.sin() + phi.cos() * dec.cos() * h.cos()).asin()
}

pub fn azimuth(h: f64, phi: f64, dec: f64) -> f64 {
    h.sin().atan2(h.cos() * phi.sin() - dec.tan() * phi.cos())
}

/// Sun altitude and azimuth for an observer at `geo` at `instant`.
pub fn position(instant: Instant, geo: GeoCoordinate) -> SolarPosition {
    let lw = rad(-geo.longitude);
    let phi = rad(geo.latitude);
    let d = to_days(instant);

    let m = solar_mean_anomaly(d);
    let l = ecliptic_longitude(m);
    let dec = declination(l);
    let ra = right_ascension(l);

    let h = sidereal_time(d, lw) - ra;

    SolarPosition {
        altitude: altitude(h, phi, dec),
        azimuth: azimuth(h, phi, dec),
    }
}
