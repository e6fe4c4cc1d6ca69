//! Configuration system for vigil.
//!
//! Settings live in `vigil.toml`, found in `$XDG_CONFIG_HOME/vigil/` or in a
//! directory passed with `--config`. A commented default file is written the
//! first time the default location is used.
//!
//! ```toml
//! #[Observance period]
//! start = "2026-02-18 00:00:00"  # Civil start time in time_zone (YYYY-MM-DD HH:MM:SS)
//! time_zone = "Europe/Oslo"      # IANA timezone the start time is given in
//! duration_days = 29             # Length of the period in days (1-366)
//! final_stretch_days = 10        # Days counted as the final stretch (1-duration_days)
//!
//! #[Sky]
//! latitude = 59.9139             # Observer latitude (-90 to 90)
//! longitude = 10.7522            # Observer longitude (-180 to 180)
//!
//! #[Runtime]
//! tick_interval = 1              # Seconds between updates (1-60)
//! notice = true                  # Show the daily notice once per local day
//! ```
//!
//! Every field is optional. Missing fields take the defaults from
//! [`crate::constants`]; values are range-checked by
//! [`validation::validate_config`] before defaults are applied.

pub mod builder;
pub mod loading;
pub mod validation;

use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::*;
use crate::geo::GeoCoordinate;
use crate::period::PeriodConfig;
use crate::time::{CivilDateTime, parse_time_zone};

pub use builder::create_default_config;
pub use loading::{get_config_path, get_custom_config_dir, load, load_from_path, set_config_dir};

/// Configuration loaded from `vigil.toml`.
///
/// After [`load`] or [`load_from_path`] all fields are `Some`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Civil start of the period, `YYYY-MM-DD HH:MM:SS` in `time_zone`
    pub start: Option<String>,
    pub time_zone: Option<String>,
    pub duration_days: Option<u32>,
    /// Number of trailing days treated as the final stretch by the notice
    pub final_stretch_days: Option<u32>,

    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    /// Seconds between display updates
    pub tick_interval: Option<u64>,
    pub notice: Option<bool>,
}

impl Config {
    /// Load configuration using automatic path detection
    pub fn load() -> Result<Self> {
        load()
    }

    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        load_from_path(path)
    }

    pub fn get_config_path() -> Result<PathBuf> {
        get_config_path()
    }

    pub fn start(&self) -> Result<CivilDateTime> {
        let start = self.start.as_deref().unwrap_or(DEFAULT_START);
        start
            .parse::<CivilDateTime>()
            .with_context(|| format!("Invalid start '{start}'. Use YYYY-MM-DD HH:MM:SS"))
    }

    pub fn time_zone_name(&self) -> &str {
        self.time_zone.as_deref().unwrap_or(DEFAULT_TIME_ZONE)
    }

    pub fn time_zone(&self) -> Result<Tz> {
        Ok(parse_time_zone(self.time_zone_name())?)
    }

    pub fn duration_days(&self) -> u32 {
        self.duration_days.unwrap_or(DEFAULT_DURATION_DAYS)
    }

    pub fn final_stretch_days(&self) -> u32 {
        self.final_stretch_days.unwrap_or(DEFAULT_FINAL_STRETCH_DAYS)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_interval.unwrap_or(DEFAULT_TICK_INTERVAL))
    }

    pub fn notice_enabled(&self) -> bool {
        self.notice.unwrap_or(DEFAULT_NOTICE)
    }

    /// Period description for the clock.
    pub fn period_config(&self) -> Result<PeriodConfig> {
        Ok(PeriodConfig::new(
            self.start()?,
            self.time_zone_name(),
            self.duration_days(),
        )?)
    }

    /// Observer position for the sky sampler.
    pub fn geo(&self) -> Result<GeoCoordinate> {
        let latitude = self.latitude.unwrap_or(DEFAULT_LATITUDE);
        let longitude = self.longitude.unwrap_or(DEFAULT_LONGITUDE);
        GeoCoordinate::new(latitude, longitude).with_context(|| {
            format!("Invalid coordinates: latitude {latitude}, longitude {longitude}")
        })
    }

    pub fn log_config(&self) {
        log_block_start!("Loaded configuration");

        log_indented!(
            "Period: {} ({}), {} days",
            self.start.as_deref().unwrap_or(DEFAULT_START),
            self.time_zone_name(),
            self.duration_days()
        );
        log_indented!("Final stretch: last {} days", self.final_stretch_days());

        let lat = self.latitude.unwrap_or(DEFAULT_LATITUDE);
        let lon = self.longitude.unwrap_or(DEFAULT_LONGITUDE);
        log_indented!(
            "Location: {:.3}°{}, {:.3}°{}",
            lat.abs(),
            if lat >= 0.0 { "N" } else { "S" },
            lon.abs(),
            if lon >= 0.0 { "E" } else { "W" }
        );

        let tick = self.tick_interval.unwrap_or(DEFAULT_TICK_INTERVAL);
        log_indented!(
            "Update interval: {} {}",
            tick,
            if tick == 1 { "second" } else { "seconds" }
        );
        if !self.notice_enabled() {
            log_indented!("Daily notice: off");
        }
    }
}

#[cfg(test)]
mod tests;
