//! Configuration loading functionality.
//!
//! Resolves the config path, creates the default file when needed, then
//! parses, validates and fills in defaults.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

use super::Config;
use super::validation::validate_config;
use crate::constants::*;

/// Global configuration directory, set once at startup
static CONFIG_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Set the configuration directory for the current process.
/// This can only be called once, typically at startup.
pub fn set_config_dir(dir: Option<String>) -> Result<()> {
    CONFIG_DIR
        .set(dir.map(PathBuf::from))
        .map_err(|_| anyhow::anyhow!("Configuration directory already set"))
}

/// Get the custom configuration directory if one was set.
pub fn get_custom_config_dir() -> Option<PathBuf> {
    CONFIG_DIR.get().and_then(|d| d.clone())
}

/// Path to `vigil.toml`, honouring `--config`.
pub fn get_config_path() -> Result<PathBuf> {
    if let Some(custom_dir) = get_custom_config_dir() {
        return Ok(custom_dir.join(CONFIG_FILE_NAME));
    }

    let config_dir = dirs::config_dir().context("Could not determine config directory")?;
    Ok(config_dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load configuration using automatic path detection.
///
/// Creates a default configuration file if none exists.
pub fn load() -> Result<Config> {
    let config_path = get_config_path()?;

    if !config_path.exists() {
        super::builder::create_default_config(&config_path)
            .context("Failed to create default config during load")?;
    }

    load_from_path(&config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path.display()))
}

/// Load configuration from a specific path.
///
/// Unlike [`load`], a missing file is an error here.
pub fn load_from_path(path: &PathBuf) -> Result<Config> {
    if !path.exists() {
        anyhow::bail!("Configuration file not found: {}", path.display());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config from {}", path.display()))?;

    validate_config(&config)?;
    apply_defaults(&mut config);

    Ok(config)
}

/// Fill every unset field with its default.
pub(crate) fn apply_defaults(config: &mut Config) {
    config.start.get_or_insert_with(|| DEFAULT_START.to_string());
    config
        .time_zone
        .get_or_insert_with(|| DEFAULT_TIME_ZONE.to_string());
    let duration_days = *config.duration_days.get_or_insert(DEFAULT_DURATION_DAYS);
    // Short periods are all final stretch
    config
        .final_stretch_days
        .get_or_insert(DEFAULT_FINAL_STRETCH_DAYS.min(duration_days));
    config.latitude.get_or_insert(DEFAULT_LATITUDE);
    config.longitude.get_or_insert(DEFAULT_LONGITUDE);
    config.tick_interval.get_or_insert(DEFAULT_TICK_INTERVAL);
    config.notice.get_or_insert(DEFAULT_NOTICE);
}
