//! Civil date/time resolution in named timezones.
//!
//! A [`CivilDateTime`] is wall-clock time with no zone attached. Resolving it
//! against an IANA zone name yields the absolute [`Instant`] it denotes.
//!
//! Resolution consults the tz database shipped with `chrono-tz`. Civil times
//! that the database reports as skipped (spring-forward gap) or repeated
//! (fall-back overlap) are resolved with the two-pass offset discovery in
//! [`resolve_two_pass`]: read the fields as UTC, render that instant back in
//! the zone, and subtract the observed offset. That technique does not
//! disambiguate transition times; it returns whatever the renderer observed
//! at the first guess, and we keep that behaviour rather than inventing rules.

use chrono::{FixedOffset, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use std::fmt;
use std::str::FromStr;

use super::TimeError;
use super::instant::Instant;

/// Wall-clock date and time, validated at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CivilDateTime(NaiveDateTime);

impl CivilDateTime {
    /// Build from individual fields, rejecting impossible dates and times.
    pub fn new(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Result<Self, TimeError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(hour, minute, second))
            .map(Self)
            .ok_or_else(|| {
                TimeError::InvalidCivilTime(format!(
                    "{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}"
                ))
            })
    }

    /// Wrap a chrono naive timestamp, dropping sub-second precision.
    pub fn from_naive(naive: NaiveDateTime) -> Self {
        Self(naive.with_nanosecond(0).unwrap_or(naive))
    }

    pub fn naive(&self) -> NaiveDateTime {
        self.0
    }

    pub fn year(&self) -> i32 {
        chrono::Datelike::year(&self.0)
    }

    pub fn month(&self) -> u32 {
        chrono::Datelike::month(&self.0)
    }

    pub fn day(&self) -> u32 {
        chrono::Datelike::day(&self.0)
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    pub fn second(&self) -> u32 {
        self.0.second()
    }

    /// The instant these fields would denote if they were UTC wall-clock time.
    pub fn as_if_utc(&self) -> Instant {
        Instant::from_datetime(self.0.and_utc())
    }
}

impl fmt::Display for CivilDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M:%S"))
    }
}

impl FromStr for CivilDateTime {
    type Err = TimeError;

    /// Accepts `YYYY-MM-DD HH:MM:SS` or `YYYY-MM-DDTHH:MM:SS`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S")
            .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S"))
            .map(Self)
            .map_err(|e| TimeError::InvalidCivilTime(format!("{trimmed}: {e}")))
    }
}

/// Renders an absolute instant as civil fields observed in some timezone.
///
/// This is the only timezone capability the two-pass resolver needs.
pub trait CivilRenderer {
    fn render(&self, instant: Instant) -> Option<CivilDateTime>;
}

impl CivilRenderer for Tz {
    fn render(&self, instant: Instant) -> Option<CivilDateTime> {
        let utc = instant.to_datetime()?;
        Some(CivilDateTime::from_naive(utc.with_timezone(self).naive_local()))
    }
}

impl CivilRenderer for FixedOffset {
    fn render(&self, instant: Instant) -> Option<CivilDateTime> {
        let utc = instant.to_datetime()?;
        Some(CivilDateTime::from_naive(utc.with_timezone(self).naive_local()))
    }
}

impl CivilRenderer for Utc {
    fn render(&self, instant: Instant) -> Option<CivilDateTime> {
        Some(CivilDateTime::from_naive(instant.to_datetime()?.naive_utc()))
    }
}

/// Look up an IANA timezone by name.
pub fn parse_time_zone(name: &str) -> Result<Tz, TimeError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| TimeError::UnknownTimeZone(name.to_string()))
}

/// Resolve civil time in the named zone to an absolute instant.
pub fn resolve(civil: CivilDateTime, time_zone: &str) -> Result<Instant, TimeError> {
    let tz = parse_time_zone(time_zone)?;
    Ok(resolve_in(civil, tz))
}

/// Resolve civil time in an already parsed zone.
pub fn resolve_in(civil: CivilDateTime, tz: Tz) -> Instant {
    match tz.from_local_datetime(&civil.naive()) {
        LocalResult::Single(dt) => Instant::from_datetime(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(_, _) | LocalResult::None => resolve_two_pass(civil, &tz),
    }
}

/// Two-pass offset discovery.
///
/// `g0` is the civil fields read as UTC, `g1` is `g0` rendered in the zone and
/// read back as UTC; the zone offset at `g0` is `g1 - g0` and the result is
/// `g0 - (g1 - g0)`. A renderer that cannot represent `g0` yields `g0`.
pub fn resolve_two_pass<R: CivilRenderer + ?Sized>(civil: CivilDateTime, renderer: &R) -> Instant {
    let first_guess = civil.as_if_utc();
    let Some(observed) = renderer.render(first_guess) else {
        return first_guess;
    };
    let offset = observed.as_if_utc().millis_since(first_guess);
    first_guess.add_millis(-offset)
}

/// Render an instant as civil fields in the given zone.
pub fn render(instant: Instant, tz: Tz) -> Option<CivilDateTime> {
    tz.render(instant)
}
