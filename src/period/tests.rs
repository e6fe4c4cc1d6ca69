use super::*;
use crate::format::format_percent;
use chrono::{TimeZone, Utc};

fn oslo_config() -> PeriodConfig {
    PeriodConfig::new(
        CivilDateTime::new(2026, 2, 18, 0, 0, 0).unwrap(),
        "Europe/Oslo",
        29,
    )
    .unwrap()
}

fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> Instant {
    Instant::from_datetime(Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap())
}

#[test]
fn test_zero_day_config_rejected() {
    let start = CivilDateTime::new(2026, 2, 18, 0, 0, 0).unwrap();
    assert_eq!(
        PeriodConfig::new(start, "Europe/Oslo", 0),
        Err(TimeError::InvalidDuration)
    );
}

#[test]
fn test_unknown_zone_fails_at_clock_construction() {
    let config = PeriodConfig::new(
        CivilDateTime::new(2026, 2, 18, 0, 0, 0).unwrap(),
        "Europe/Atlantis",
        29,
    )
    .unwrap();
    assert!(matches!(
        PeriodClock::new(config),
        Err(TimeError::UnknownTimeZone(_))
    ));
}

#[test]
fn test_window_bounds() {
    let clock = PeriodClock::new(oslo_config()).unwrap();
    let window = clock.window();
    assert_eq!(window.start(), utc(2026, 2, 17, 23, 0, 0));
    assert_eq!(window.end(), utc(2026, 3, 18, 23, 0, 0));
    assert_eq!(window.total_millis(), 29 * MS_PER_DAY);
}

#[test]
fn test_boundary_at_start() {
    let clock = PeriodClock::new(oslo_config()).unwrap();
    let report = clock.evaluate(clock.window().start());

    assert_eq!(report.status, PeriodStatus::During(1));
    assert_eq!(report.day_number(), 1);
    assert_eq!(report.progress, 0.0);
    assert_eq!(report.elapsed, StdDuration::ZERO);
    assert_eq!(report.remaining, StdDuration::from_millis(29 * MS_PER_DAY as u64));
}

#[test]
fn test_boundary_at_end() {
    let clock = PeriodClock::new(oslo_config()).unwrap();
    let report = clock.evaluate(clock.window().end());

    assert_eq!(report.status, PeriodStatus::After);
    assert_eq!(report.day_number(), 29);
    assert_eq!(report.progress, 1.0);
    assert_eq!(report.remaining, StdDuration::ZERO);
}

#[test]
fn test_just_before_start_and_end() {
    let clock = PeriodClock::new(oslo_config()).unwrap();
    let window = *clock.window();

    let before = clock.evaluate(window.start().add_millis(-1));
    assert_eq!(before.status, PeriodStatus::Before);
    assert_eq!(before.day_number(), 0);
    assert_eq!(before.progress, 0.0);
    assert_eq!(before.elapsed, StdDuration::ZERO);
    // Remaining is clamped to the window length even before the start
    assert_eq!(before.remaining, StdDuration::from_millis(window.total_millis() as u64));

    let last_ms = clock.evaluate(window.end().add_millis(-1));
    assert_eq!(last_ms.status, PeriodStatus::During(29));
    assert!(last_ms.progress < 1.0);
}

#[test]
fn test_far_outside_window_is_clamped() {
    let clock = PeriodClock::new(oslo_config()).unwrap();
    let long_before = clock.evaluate(utc(2020, 1, 1, 0, 0, 0));
    assert_eq!(long_before.status, PeriodStatus::Before);
    assert_eq!(long_before.progress, 0.0);

    let long_after = clock.evaluate(utc(2030, 1, 1, 0, 0, 0));
    assert_eq!(long_after.status, PeriodStatus::After);
    assert_eq!(long_after.progress, 1.0);
    assert_eq!(long_after.elapsed, StdDuration::from_millis(29 * MS_PER_DAY as u64));
}

#[test]
fn test_day_index_increments_at_each_24h_boundary() {
    let window = PeriodWindow::resolve(&oslo_config()).unwrap();
    for day in 0..29u32 {
        let boundary = window.start().add_millis(i64::from(day) * MS_PER_DAY);
        assert_eq!(window.status(boundary), PeriodStatus::During(day + 1));
        assert_eq!(
            window.status(boundary.add_millis(MS_PER_DAY - 1)),
            PeriodStatus::During(day + 1)
        );
        if day > 0 {
            assert_eq!(
                window.status(boundary.add_millis(-1)),
                PeriodStatus::During(day)
            );
        }
    }
}

#[test]
fn test_end_to_end_oslo_scenario() {
    let config = oslo_config();

    let at_start = evaluate(&config, utc(2026, 2, 17, 23, 0, 0)).unwrap();
    assert_eq!(at_start.day_number(), 1);
    assert_eq!(format_percent(at_start.progress), "0.0");

    // 2026-03-01T00:00:00 Europe/Oslo, eleven days in
    let eleven_days = evaluate(&config, utc(2026, 2, 28, 23, 0, 0)).unwrap();
    assert_eq!(eleven_days.status, PeriodStatus::During(12));
    assert!((eleven_days.progress - 11.0 / 29.0).abs() < 1e-12);
    assert_eq!(format_percent(eleven_days.progress), "37.9");
}

#[test]
fn test_window_spanning_dst_uses_fixed_days() {
    // Oslo switches to CEST on 2026-03-29; days stay 24h spans from the start instant
    let config = PeriodConfig::new(
        CivilDateTime::new(2026, 3, 25, 0, 0, 0).unwrap(),
        "Europe/Oslo",
        10,
    )
    .unwrap();
    let window = PeriodWindow::resolve(&config).unwrap();
    assert_eq!(window.start(), utc(2026, 3, 24, 23, 0, 0));

    // Local midnight starting 2026-03-30 is only 4 days 23 hours after the start
    let local_midnight = utc(2026, 3, 29, 22, 0, 0);
    assert_eq!(window.status(local_midnight), PeriodStatus::During(5));
    assert_eq!(window.status(utc(2026, 3, 29, 23, 0, 0)), PeriodStatus::During(6));
}

#[test]
fn test_status_display_and_serialization() {
    assert_eq!(PeriodStatus::During(4).to_string(), "During (day 4)");
    assert_eq!(
        serde_json::to_string(&PeriodStatus::During(4)).unwrap(),
        r#"{"state":"during","day":4}"#
    );
    assert_eq!(
        serde_json::to_string(&PeriodStatus::Before).unwrap(),
        r#"{"state":"before"}"#
    );
}
