//! Defaults and validation limits shared by config, CLI and the driver loop.

// # Observance period defaults
pub const DEFAULT_START: &str = "2026-02-18 00:00:00";
pub const DEFAULT_TIME_ZONE: &str = "Europe/Oslo";
pub const DEFAULT_DURATION_DAYS: u32 = 29;
pub const DEFAULT_FINAL_STRETCH_DAYS: u32 = 10;

// # Observer defaults (Oslo)
pub const DEFAULT_LATITUDE: f64 = 59.9139;
pub const DEFAULT_LONGITUDE: f64 = 10.7522;

// # Runtime defaults
pub const DEFAULT_TICK_INTERVAL: u64 = 1; // seconds
pub const DEFAULT_NOTICE: bool = true;

// # Validation limits
pub const MINIMUM_DURATION_DAYS: u32 = 1;
pub const MAXIMUM_DURATION_DAYS: u32 = 366;
pub const MINIMUM_TICK_INTERVAL: u64 = 1;
pub const MAXIMUM_TICK_INTERVAL: u64 = 60;
pub const MINIMUM_FINAL_STRETCH_DAYS: u32 = 1;

// # Simulation
/// Simulated seconds per real second when `--simulate` gets no multiplier
pub const DEFAULT_SIMULATION_MULTIPLIER: f64 = 3600.0;
pub const MINIMUM_SIMULATION_MULTIPLIER: f64 = 0.1;
/// One simulated week per real second
pub const MAXIMUM_SIMULATION_MULTIPLIER: f64 = 604_800.0;

// # Files
pub const CONFIG_FILE_NAME: &str = "vigil.toml";
pub const APP_DIR_NAME: &str = "vigil";

// # Exit codes
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
