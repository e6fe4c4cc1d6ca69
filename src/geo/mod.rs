//! Sun position and daylight for the configured observer.
//!
//! ## Module Structure
//!
//! - [`solar`]: Low-order solar position (altitude/azimuth) from an instant and coordinate
//! - [`daylight`]: Sunrise/sunset search over a UTC day and the day/night blend
//!
//! The approximation is cosmetic. It drives the sky theme, not any timing
//! that matters for the observance period itself.

pub mod daylight;
pub mod solar;

pub use daylight::{DayNightSampler, SkyBlend, SkyReading, SunWindow, blend, sun_window, sun_window_for};
pub use solar::{GeoCoordinate, SolarPosition, position};
