//! Default config file creation.
//!
//! The default file is assembled with a small builder so that trailing
//! comments line up in one column regardless of value widths.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::constants::*;

/// Write a commented default `vigil.toml` to `path`, creating parent
/// directories as needed.
pub fn create_default_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    fs::write(path, default_config_content())
        .with_context(|| format!("Failed to write default config to {}", path.display()))?;

    log_block_start!("Created default configuration: {}", path.display());
    Ok(())
}

/// Contents of the default config file.
pub fn default_config_content() -> String {
    let content = ConfigBuilder::new()
        .add_section("Observance period")
        .add_setting(
            "start",
            &format!("\"{DEFAULT_START}\""),
            "Civil start time in time_zone (YYYY-MM-DD HH:MM:SS)",
        )
        .add_setting(
            "time_zone",
            &format!("\"{DEFAULT_TIME_ZONE}\""),
            "IANA timezone the start time is given in",
        )
        .add_setting(
            "duration_days",
            &DEFAULT_DURATION_DAYS.to_string(),
            &format!(
                "Length of the period in days ({MINIMUM_DURATION_DAYS}-{MAXIMUM_DURATION_DAYS})"
            ),
        )
        .add_setting(
            "final_stretch_days",
            &DEFAULT_FINAL_STRETCH_DAYS.to_string(),
            "Days counted as the final stretch (1-duration_days)",
        )
        .add_section("Sky")
        .add_setting(
            "latitude",
            &format!("{DEFAULT_LATITUDE:.4}"),
            "Observer latitude (-90 to 90)",
        )
        .add_setting(
            "longitude",
            &format!("{DEFAULT_LONGITUDE:.4}"),
            "Observer longitude (-180 to 180)",
        )
        .add_section("Runtime")
        .add_setting(
            "tick_interval",
            &DEFAULT_TICK_INTERVAL.to_string(),
            &format!(
                "Seconds between updates ({MINIMUM_TICK_INTERVAL}-{MAXIMUM_TICK_INTERVAL})"
            ),
        )
        .add_setting(
            "notice",
            &DEFAULT_NOTICE.to_string(),
            "Show the daily notice once per local day",
        )
        .build();

    format!("{content}\n")
}

struct ConfigBuilder {
    entries: Vec<ConfigEntry>,
}

enum ConfigEntry {
    Section(String),
    Setting { line: String, comment: String },
}

impl ConfigBuilder {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn add_section(mut self, title: &str) -> Self {
        self.entries.push(ConfigEntry::Section(format!("#[{title}]")));
        self
    }

    fn add_setting(mut self, key: &str, value: &str, comment: &str) -> Self {
        self.entries.push(ConfigEntry::Setting {
            line: format!("{key} = {value}"),
            comment: format!("# {comment}"),
        });
        self
    }

    fn build(self) -> String {
        // One space past the longest setting line
        let comment_column = self
            .entries
            .iter()
            .filter_map(|entry| match entry {
                ConfigEntry::Setting { line, .. } => Some(line.len()),
                ConfigEntry::Section(_) => None,
            })
            .max()
            .unwrap_or(0)
            + 1;

        let mut lines = Vec::new();
        for entry in self.entries {
            match entry {
                ConfigEntry::Section(title) => {
                    if !lines.is_empty() {
                        lines.push(String::new());
                    }
                    lines.push(title);
                }
                ConfigEntry::Setting { line, comment } => {
                    let padding = " ".repeat(comment_column - line.len());
                    lines.push(format!("{line}{padding}{comment}"));
                }
            }
        }

        lines.join("\n")
    }
}
