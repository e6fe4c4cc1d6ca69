use super::builder::default_config_content;
use super::loading::apply_defaults;
use super::validation::validate_config;
use super::*;
use crate::constants::test_constants::*;
use crate::constants::{MAXIMUM_DURATION_DAYS, MAXIMUM_TICK_INTERVAL};
use serial_test::serial;
use std::fs;
use tempfile::tempdir;

fn create_test_config(
    start: &str,
    time_zone: &str,
    duration_days: Option<u32>,
    final_stretch_days: Option<u32>,
) -> Config {
    Config {
        start: Some(start.to_string()),
        time_zone: Some(time_zone.to_string()),
        duration_days,
        final_stretch_days,
        latitude: Some(TEST_STANDARD_LATITUDE),
        longitude: Some(TEST_STANDARD_LONGITUDE),
        tick_interval: Some(TEST_STANDARD_TICK_INTERVAL),
        notice: Some(true),
    }
}

fn standard_config() -> Config {
    create_test_config(
        TEST_STANDARD_START,
        TEST_STANDARD_TIME_ZONE,
        Some(TEST_STANDARD_DURATION_DAYS),
        Some(TEST_STANDARD_FINAL_STRETCH_DAYS),
    )
}

fn write_config(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("vigil.toml");
    fs::write(&path, content).unwrap();
    (temp_dir, path)
}

#[test]
#[serial]
fn test_config_load_default_creation() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("vigil").join("vigil.toml");

    // Save and restore XDG_CONFIG_HOME
    let original = std::env::var("XDG_CONFIG_HOME").ok();
    unsafe {
        std::env::set_var("XDG_CONFIG_HOME", temp_dir.path());
    }

    let result = Config::load();

    unsafe {
        match original {
            Some(val) => std::env::set_var("XDG_CONFIG_HOME", val),
            None => std::env::remove_var("XDG_CONFIG_HOME"),
        }
    }

    if let Err(e) = &result {
        eprintln!("Config::load() failed: {:?}", e);
    }
    let config = result.unwrap();
    assert!(config_path.exists());
    assert_eq!(config.start.as_deref(), Some(TEST_STANDARD_START));
    assert_eq!(config.duration_days, Some(TEST_STANDARD_DURATION_DAYS));
}

#[test]
fn test_default_config_content_round_trips() {
    let content = default_config_content();
    assert!(content.starts_with("#[Observance period]"));

    let parsed: Config = toml::from_str(&content).unwrap();
    assert!(validate_config(&parsed).is_ok());
    assert_eq!(parsed, standard_config());
}

#[test]
fn test_default_config_comments_are_aligned() {
    let content = default_config_content();
    let columns: Vec<usize> = content
        .lines()
        .filter(|line| !line.starts_with('#') && !line.is_empty())
        .map(|line| line.find('#').unwrap())
        .collect();

    assert_eq!(columns.len(), 8);
    assert!(columns.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn test_config_validation_basic() {
    assert!(validate_config(&standard_config()).is_ok());
    assert!(validate_config(&Config::default()).is_ok());
}

#[test]
fn test_invalid_start_rejected() {
    let config = create_test_config("2026-02-30 00:00:00", TEST_STANDARD_TIME_ZONE, None, None);
    let err = validate_config(&config).unwrap_err();
    assert!(err.to_string().contains("Invalid start"));

    let config = create_test_config("18.02.2026", TEST_STANDARD_TIME_ZONE, None, None);
    assert!(validate_config(&config).is_err());
}

#[test]
fn test_unknown_time_zone_rejected() {
    let config = create_test_config(TEST_STANDARD_START, "Europe/Atlantis", None, None);
    let err = validate_config(&config).unwrap_err();
    assert!(err.to_string().contains("Europe/Atlantis"));
}

#[test]
fn test_duration_days_limits() {
    let zero = create_test_config(TEST_STANDARD_START, TEST_STANDARD_TIME_ZONE, Some(0), Some(1));
    assert!(validate_config(&zero).is_err());

    let max = create_test_config(
        TEST_STANDARD_START,
        TEST_STANDARD_TIME_ZONE,
        Some(MAXIMUM_DURATION_DAYS),
        None,
    );
    assert!(validate_config(&max).is_ok());

    let too_long = create_test_config(
        TEST_STANDARD_START,
        TEST_STANDARD_TIME_ZONE,
        Some(MAXIMUM_DURATION_DAYS + 1),
        None,
    );
    assert!(validate_config(&too_long).is_err());
}

#[test]
fn test_final_stretch_must_fit_duration() {
    let fits = create_test_config(TEST_STANDARD_START, TEST_STANDARD_TIME_ZONE, Some(7), Some(7));
    assert!(validate_config(&fits).is_ok());

    let too_long = create_test_config(TEST_STANDARD_START, TEST_STANDARD_TIME_ZONE, Some(7), Some(8));
    assert!(validate_config(&too_long).is_err());

    let zero = create_test_config(TEST_STANDARD_START, TEST_STANDARD_TIME_ZONE, Some(7), Some(0));
    assert!(validate_config(&zero).is_err());
}

#[test]
fn test_coordinate_and_interval_limits() {
    let mut config = standard_config();
    config.latitude = Some(91.0);
    assert!(validate_config(&config).is_err());

    let mut config = standard_config();
    config.longitude = Some(-180.5);
    assert!(validate_config(&config).is_err());

    let mut config = standard_config();
    config.tick_interval = Some(0);
    assert!(validate_config(&config).is_err());

    config.tick_interval = Some(MAXIMUM_TICK_INTERVAL);
    assert!(validate_config(&config).is_ok());
}

#[test]
fn test_apply_defaults_fills_every_field() {
    let mut config = Config::default();
    apply_defaults(&mut config);
    assert_eq!(config, standard_config());
}

#[test]
fn test_apply_defaults_caps_stretch_for_short_periods() {
    let mut config = Config {
        duration_days: Some(3),
        ..Config::default()
    };
    apply_defaults(&mut config);
    assert_eq!(config.final_stretch_days, Some(3));
}

#[test]
fn test_load_from_path_partial_file() {
    let (_dir, path) = write_config("duration_days = 30\ntime_zone = \"America/New_York\"\n");
    let config = load_from_path(&path).unwrap();

    assert_eq!(config.duration_days, Some(30));
    assert_eq!(config.time_zone.as_deref(), Some("America/New_York"));
    assert_eq!(config.latitude, Some(TEST_STANDARD_LATITUDE));
    assert_eq!(config.time_zone().unwrap(), chrono_tz::America::New_York);
}

#[test]
fn test_load_from_path_rejects_unknown_keys() {
    let (_dir, path) = write_config("night_temp = 3300\n");
    let err = load_from_path(&path).unwrap_err();
    assert!(format!("{err:#}").contains("night_temp"));
}

#[test]
fn test_load_from_path_missing_file() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("missing.toml");
    assert!(load_from_path(&path).is_err());
}

#[test]
fn test_period_config_and_geo_from_config() {
    let config = standard_config();

    let period = config.period_config().unwrap();
    assert_eq!(period.duration_days(), TEST_STANDARD_DURATION_DAYS);
    assert_eq!(period.time_zone(), TEST_STANDARD_TIME_ZONE);
    assert_eq!(period.start().to_string(), TEST_STANDARD_START);

    let geo = config.geo().unwrap();
    assert_eq!(geo.latitude(), TEST_STANDARD_LATITUDE);
    assert_eq!(geo.longitude(), TEST_STANDARD_LONGITUDE);

    assert_eq!(config.tick_interval(), std::time::Duration::from_secs(1));
    assert!(config.notice_enabled());
}
