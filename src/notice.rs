//! Daily notice shown the first time the clock runs on each local day.
//!
//! "Seen" state lives behind the [`SeenStore`] trait and is keyed by the
//! local date in the observance timezone, so a notice reappears after local
//! midnight rather than UTC midnight. The file store keeps one empty marker
//! file per day under the XDG state directory.

use anyhow::{Context, Result};
use chrono_tz::Tz;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::display::local_string;
use crate::period::{PeriodReport, PeriodStatus};
use crate::time::Instant;

const KEY_PREFIX: &str = "notice_seen_";

/// Key for the local day containing `now`, e.g. `notice_seen_2026-03-01`.
pub fn day_key(now: Instant, tz: Tz) -> String {
    format!("{KEY_PREFIX}{}", local_string(now, tz, "%Y-%m-%d"))
}

/// Key-value store remembering which day keys have been shown.
pub trait SeenStore {
    fn is_seen(&self, key: &str) -> Result<bool>;
    fn mark_seen(&mut self, key: &str) -> Result<()>;
}

/// In-process store, forgotten on exit.
#[derive(Debug, Default)]
pub struct MemorySeenStore {
    seen: HashSet<String>,
}

impl MemorySeenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SeenStore for MemorySeenStore {
    fn is_seen(&self, key: &str) -> Result<bool> {
        Ok(self.seen.contains(key))
    }

    fn mark_seen(&mut self, key: &str) -> Result<()> {
        self.seen.insert(key.to_string());
        Ok(())
    }
}

/// Marker files in a directory, one per seen key.
#[derive(Debug, Clone)]
pub struct FileSeenStore {
    dir: PathBuf,
}

impl FileSeenStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store under `$XDG_STATE_HOME/vigil`, or the local data directory on
    /// platforms without a state directory.
    pub fn default_location() -> Result<Self> {
        let base = dirs::state_dir()
            .or_else(dirs::data_local_dir)
            .context("Could not determine state directory")?;
        Ok(Self::new(base.join("vigil")))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn marker_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl SeenStore for FileSeenStore {
    fn is_seen(&self, key: &str) -> Result<bool> {
        Ok(self.marker_path(key).exists())
    }

    fn mark_seen(&mut self, key: &str) -> Result<()> {
        fs::create_dir_all(&self.dir).with_context(|| {
            format!("Failed to create state directory: {}", self.dir.display())
        })?;
        let path = self.marker_path(key);
        fs::write(&path, "1")
            .with_context(|| format!("Failed to write notice marker: {}", path.display()))?;
        Ok(())
    }
}

/// Which notice text applies on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticePhase {
    NotStarted,
    Early { day: u32, of: u32 },
    FinalStretch { days: u32 },
}

impl NoticePhase {
    /// Final stretch begins on day `duration_days - final_stretch_days + 1`.
    /// A finished period counts as its last day.
    pub fn for_status(status: PeriodStatus, duration_days: u32, final_stretch_days: u32) -> Self {
        let day = status.day_number(duration_days);
        let final_stretch_days = final_stretch_days.clamp(1, duration_days.max(1));
        let stretch_start = duration_days.saturating_sub(final_stretch_days) + 1;

        if day == 0 {
            Self::NotStarted
        } else if day >= stretch_start {
            Self::FinalStretch {
                days: final_stretch_days,
            }
        } else {
            Self::Early {
                day,
                of: duration_days,
            }
        }
    }

    pub fn hint(&self) -> String {
        match self {
            Self::NotStarted => "The period has not started yet".to_string(),
            Self::Early { day, of } => format!("You are on day {day} of {of}"),
            Self::FinalStretch { days } => format!("You are in the final {days} days now"),
        }
    }
}

impl fmt::Display for NoticePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hint())
    }
}

/// A titled group of reminders shown under the notice hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeSection {
    pub title: &'static str,
    pub items: Vec<String>,
}

impl NoticeSection {
    fn new(title: &'static str, items: &[&str]) -> Self {
        Self {
            title,
            items: items.iter().map(|item| item.to_string()).collect(),
        }
    }
}

/// Odd day numbers inside the final stretch, e.g. 21, 23, 25, 27, 29.
pub fn odd_nights(duration_days: u32, final_stretch_days: u32) -> Vec<u32> {
    let final_stretch_days = final_stretch_days.clamp(1, duration_days.max(1));
    let stretch_start = duration_days.saturating_sub(final_stretch_days) + 1;
    (stretch_start..=duration_days).filter(|day| day % 2 == 1).collect()
}

/// Sections for a phase. The rhythm and final stretch sections are exclusive;
/// the last two are shown every day.
pub fn sections(
    phase: NoticePhase,
    duration_days: u32,
    final_stretch_days: u32,
) -> Vec<NoticeSection> {
    let mut sections = Vec::new();

    match phase {
        NoticePhase::Early { .. } => sections.push(NoticeSection::new(
            "Build your rhythm",
            &[
                "Focus: stability, intention and a calm flow",
                "Small daily habits beat big occasional efforts",
                "Look after your body so you can keep going",
            ],
        )),
        NoticePhase::FinalStretch { .. } => sections.push(NoticeSection::new(
            "The final stretch",
            &[
                "Focus: more calm, more devotion, more reflection",
                "Turn down noise and screens where you can",
                "Add a little each day in a way that stays realistic",
            ],
        )),
        NoticePhase::NotStarted => {}
    }

    sections.push(NoticeSection::new(
        "The night of great value",
        &[
            "Focus: a night many seek out during the final nights",
            "Put extra weight on prayer, supplication and reading",
            "Keep it genuine and simple, quality can be enough",
        ],
    ));

    let nights = odd_nights(duration_days, final_stretch_days)
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>();
    let mut odd = NoticeSection::new(
        "Odd nights near the end",
        &[
            "Plan: settle down a little earlier, more stillness, more presence",
            "Pick a small routine you can keep up evenly",
        ],
    );
    if !nights.is_empty() {
        odd.items.insert(
            0,
            format!("Many put in extra effort on nights {}", nights.join(", ")),
        );
    }
    sections.push(odd);

    sections
}

/// A notice to display for today.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub key: String,
    pub phase: NoticePhase,
    pub sections: Vec<NoticeSection>,
}

/// Return today's notice the first time this is called on a local day, and
/// record it as seen. Later calls on the same day return `None`.
pub fn show_once_per_day(
    store: &mut dyn SeenStore,
    now: Instant,
    tz: Tz,
    report: &PeriodReport,
    final_stretch_days: u32,
) -> Result<Option<Notice>> {
    let key = day_key(now, tz);
    if store.is_seen(&key)? {
        return Ok(None);
    }

    store.mark_seen(&key)?;
    let phase = NoticePhase::for_status(report.status, report.duration_days, final_stretch_days);
    Ok(Some(Notice {
        key,
        phase,
        sections: sections(phase, report.duration_days, final_stretch_days),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::PeriodWindow;
    use chrono::{TimeZone, Utc};
    use chrono_tz::Europe::Oslo;
    use tempfile::tempdir;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> Instant {
        Instant::from_datetime(Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap())
    }

    fn window() -> PeriodWindow {
        PeriodWindow::from_start(utc(2026, 2, 17, 23, 0), 29)
    }

    #[test]
    fn test_day_key_uses_local_date() {
        // 23:30 UTC is already the next day in Oslo
        assert_eq!(day_key(utc(2026, 2, 28, 23, 30), Oslo), "notice_seen_2026-03-01");
        assert_eq!(day_key(utc(2026, 2, 28, 22, 30), Oslo), "notice_seen_2026-02-28");
    }

    #[test]
    fn test_phase_boundaries() {
        assert_eq!(NoticePhase::for_status(PeriodStatus::Before, 29, 10), NoticePhase::NotStarted);
        assert_eq!(
            NoticePhase::for_status(PeriodStatus::During(19), 29, 10),
            NoticePhase::Early { day: 19, of: 29 }
        );
        assert_eq!(
            NoticePhase::for_status(PeriodStatus::During(20), 29, 10),
            NoticePhase::FinalStretch { days: 10 }
        );
        assert_eq!(
            NoticePhase::for_status(PeriodStatus::After, 29, 10),
            NoticePhase::FinalStretch { days: 10 }
        );
    }

    #[test]
    fn test_stretch_longer_than_period_covers_every_day() {
        assert_eq!(
            NoticePhase::for_status(PeriodStatus::During(1), 3, 10),
            NoticePhase::FinalStretch { days: 3 }
        );
    }

    #[test]
    fn test_hints() {
        assert_eq!(NoticePhase::NotStarted.hint(), "The period has not started yet");
        assert_eq!(NoticePhase::Early { day: 4, of: 29 }.hint(), "You are on day 4 of 29");
        assert_eq!(
            NoticePhase::FinalStretch { days: 10 }.to_string(),
            "You are in the final 10 days now"
        );
    }

    #[test]
    fn test_odd_nights_follow_the_final_stretch() {
        assert_eq!(odd_nights(29, 10), vec![21, 23, 25, 27, 29]);
        assert_eq!(odd_nights(30, 10), vec![21, 23, 25, 27, 29]);
        assert_eq!(odd_nights(3, 10), vec![1, 3]);
    }

    #[test]
    fn test_sections_per_phase() {
        let titles = |phase| {
            sections(phase, 29, 10)
                .into_iter()
                .map(|section| section.title)
                .collect::<Vec<_>>()
        };

        assert_eq!(
            titles(NoticePhase::Early { day: 3, of: 29 }),
            ["Build your rhythm", "The night of great value", "Odd nights near the end"]
        );
        assert_eq!(
            titles(NoticePhase::FinalStretch { days: 10 }),
            ["The final stretch", "The night of great value", "Odd nights near the end"]
        );
        assert_eq!(
            titles(NoticePhase::NotStarted),
            ["The night of great value", "Odd nights near the end"]
        );

        let odd = sections(NoticePhase::NotStarted, 29, 10).pop().unwrap();
        assert_eq!(odd.items[0], "Many put in extra effort on nights 21, 23, 25, 27, 29");
        assert_eq!(odd.items.len(), 3);
    }

    #[test]
    fn test_shown_once_per_local_day() {
        let mut store = MemorySeenStore::new();
        let morning = utc(2026, 3, 1, 7, 0);
        let report = window().evaluate(morning);

        let first = show_once_per_day(&mut store, morning, Oslo, &report, 10).unwrap();
        let notice = first.expect("first call shows the notice");
        assert_eq!(notice.key, "notice_seen_2026-03-01");
        assert_eq!(notice.phase, NoticePhase::Early { day: 12, of: 29 });
        assert_eq!(notice.sections[0].title, "Build your rhythm");

        let evening = utc(2026, 3, 1, 20, 0);
        let report = window().evaluate(evening);
        assert!(show_once_per_day(&mut store, evening, Oslo, &report, 10).unwrap().is_none());

        let next_day = utc(2026, 3, 1, 23, 5);
        let report = window().evaluate(next_day);
        assert!(show_once_per_day(&mut store, next_day, Oslo, &report, 10).unwrap().is_some());
    }

    #[test]
    fn test_file_store_persists_markers() {
        let temp = tempdir().unwrap();
        let dir = temp.path().join("state").join("vigil");

        let mut store = FileSeenStore::new(&dir);
        assert!(!store.is_seen("notice_seen_2026-03-01").unwrap());
        store.mark_seen("notice_seen_2026-03-01").unwrap();
        assert!(dir.join("notice_seen_2026-03-01").exists());

        let reopened = FileSeenStore::new(&dir);
        assert!(reopened.is_seen("notice_seen_2026-03-01").unwrap());
        assert!(!reopened.is_seen("notice_seen_2026-03-02").unwrap());
    }
}
