//! # Vigil Library
//!
//! Countdown and sky-ambience clock for a fixed observance period.
//!
//! The library holds everything the `vigil` binary runs, so the internals can
//! be tested directly and main.rs stays a thin CLI dispatcher.
//!
//! ## Architecture
//!
//! - **Time**: `time` module with instants, civil time in IANA zones, and real/simulated clocks
//! - **Period**: `period` resolves the observance window and evaluates it at an instant
//! - **Sky**: `geo` approximates the sun's position, sunrise/sunset and the day/night blend
//! - **Output**: `format` and `display` turn evaluations into snapshots, text or JSON
//! - **Notice**: `notice` shows a daily message once per local day
//! - **Runtime**: `config`, `args`, `signals`, `core` and the `Vigil` runner
//! - **Infrastructure**: `logger` and `constants`

// Import macros from logger module for use in all submodules
#[macro_use]
pub mod logger;

pub mod args;
pub mod config;
pub mod constants;
pub mod core;
pub mod display;
pub mod format;
pub mod geo;
pub mod notice;
pub mod period;
pub mod signals;
pub mod time;

mod vigil;

pub use period::{PeriodClock, PeriodConfig, PeriodReport, PeriodStatus, PeriodWindow};
pub use time::{CivilDateTime, Instant, TimeError};
pub use vigil::Vigil;
