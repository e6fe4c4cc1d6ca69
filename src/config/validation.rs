//! Configuration validation.
//!
//! Runs on the raw parsed file, before defaults are filled in, so every error
//! names the value the user actually wrote.

use anyhow::{Context, Result};

use super::Config;
use crate::constants::*;
use crate::time::{CivilDateTime, parse_time_zone};

/// Reject configurations that cannot describe a period or an observer.
pub fn validate_config(config: &Config) -> Result<()> {
    if let Some(ref start) = config.start {
        start
            .parse::<CivilDateTime>()
            .with_context(|| format!("Invalid start '{start}'. Use YYYY-MM-DD HH:MM:SS"))?;
    }

    if let Some(ref zone) = config.time_zone {
        parse_time_zone(zone).with_context(|| {
            format!("time_zone '{zone}' is not a known IANA timezone (e.g. \"Europe/Oslo\")")
        })?;
    }

    if let Some(days) = config.duration_days
        && !(MINIMUM_DURATION_DAYS..=MAXIMUM_DURATION_DAYS).contains(&days)
    {
        anyhow::bail!(
            "duration_days ({}) must be between {} and {}",
            days,
            MINIMUM_DURATION_DAYS,
            MAXIMUM_DURATION_DAYS
        );
    }

    let duration_days = config.duration_days.unwrap_or(DEFAULT_DURATION_DAYS);
    if let Some(stretch) = config.final_stretch_days
        && !(MINIMUM_FINAL_STRETCH_DAYS..=duration_days).contains(&stretch)
    {
        anyhow::bail!(
            "final_stretch_days ({}) must be between {} and duration_days ({})",
            stretch,
            MINIMUM_FINAL_STRETCH_DAYS,
            duration_days
        );
    }

    if let Some(lat) = config.latitude
        && !(-90.0..=90.0).contains(&lat)
    {
        anyhow::bail!("latitude must be between -90 and 90 degrees (got {})", lat);
    }

    if let Some(lon) = config.longitude
        && !(-180.0..=180.0).contains(&lon)
    {
        anyhow::bail!(
            "longitude must be between -180 and 180 degrees (got {})",
            lon
        );
    }

    if let Some(interval) = config.tick_interval
        && !(MINIMUM_TICK_INTERVAL..=MAXIMUM_TICK_INTERVAL).contains(&interval)
    {
        anyhow::bail!(
            "tick_interval ({} seconds) must be between {} and {} seconds",
            interval,
            MINIMUM_TICK_INTERVAL,
            MAXIMUM_TICK_INTERVAL
        );
    }

    Ok(())
}
