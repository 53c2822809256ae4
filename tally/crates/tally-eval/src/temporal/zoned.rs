//! Zone-aware readings and IANA offset lookups.
//!
//! The calendar math lives in the sibling modules; this file is the
//! only place that consults the tz database. Disambiguation rules:
//! local times skipped by a DST gap map forward to the first valid
//! instant, repeated local times take the earlier offset.

use std::str::FromStr;

use chrono::{Datelike, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Timelike};
use chrono_tz::Tz;

use super::date::PlainDate;
use super::datetime::PlainDateTime;
use super::instant::Instant;
use super::time::PlainTime;

/// A wall-clock reading in a named IANA zone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZonedDateTime {
    pub datetime: PlainDateTime,
    /// Canonical IANA id, e.g. `America/New_York`
    pub zone: String,
}

impl ZonedDateTime {
    pub fn new(datetime: PlainDateTime, zone: impl Into<String>) -> Self {
        Self {
            datetime,
            zone: zone.into(),
        }
    }

    /// The absolute instant this reading denotes.
    pub fn to_instant(&self) -> Option<Instant> {
        let tz = zone_of(&self.zone)?;
        Some(local_to_instant(&self.datetime, tz))
    }
}

/// Parse an IANA id against the installed tz database.
pub fn zone_of(name: &str) -> Option<Tz> {
    Tz::from_str(name).ok()
}

fn to_naive(dt: &PlainDateTime) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(dt.date.year, dt.date.month, dt.date.day)?.and_hms_milli_opt(
        dt.time.hour,
        dt.time.minute,
        dt.time.second,
        dt.time.millisecond,
    )
}

/// Resolve a wall-clock reading to an instant under IANA rules.
///
/// Gap times probe forward in 15-minute steps until the zone accepts
/// a local time again (every real offset change is a multiple of 15
/// minutes); fold times take the earlier of the two instants.
pub fn local_to_instant(dt: &PlainDateTime, tz: Tz) -> Instant {
    let Some(naive) = to_naive(dt) else {
        return Instant::from_epoch_ms(0);
    };
    let mut probe = naive;
    for _ in 0..=12 {
        match tz.from_local_datetime(&probe) {
            LocalResult::Single(resolved) => {
                return Instant::from_epoch_ms(resolved.timestamp_millis());
            }
            LocalResult::Ambiguous(earlier, _later) => {
                return Instant::from_epoch_ms(earlier.timestamp_millis());
            }
            LocalResult::None => {
                probe = probe + chrono::Duration::minutes(15);
            }
        }
    }
    // A zone with a gap wider than three hours does not exist in the
    // tz database; fall back to interpreting the reading as UTC.
    Instant::from_epoch_ms(naive.and_utc().timestamp_millis())
}

/// The wall-clock reading of an instant in a zone.
pub fn instant_in_zone(instant: Instant, tz: Tz) -> PlainDateTime {
    let resolved = match tz.timestamp_millis_opt(instant.epoch_ms) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(dt, _) => dt,
        LocalResult::None => tz.timestamp_millis_opt(0).unwrap(),
    };
    let naive = resolved.naive_local();
    PlainDateTime::new(
        PlainDate {
            year: naive.year(),
            month: naive.month(),
            day: naive.day(),
        },
        PlainTime {
            hour: naive.hour(),
            minute: naive.minute(),
            second: naive.second(),
            millisecond: naive.nanosecond() / 1_000_000,
        },
    )
}
