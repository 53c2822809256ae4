//! Calendar dates, proleptic Gregorian.

use super::duration::Duration;

/// A calendar date with no time-of-day and no zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlainDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl PlainDate {
    /// Construct a date, checking calendar validity.
    pub fn new(year: i32, month: u32, day: u32) -> Option<Self> {
        if !(1..=12).contains(&month) {
            return None;
        }
        if day == 0 || day > days_in_month(year, month) {
            return None;
        }
        Some(Self { year, month, day })
    }

    /// Days since 1970-01-01.
    pub fn epoch_days(&self) -> i64 {
        days_from_civil(self.year, self.month, self.day)
    }

    /// Date from days since 1970-01-01.
    pub fn from_epoch_days(days: i64) -> Self {
        let (year, month, day) = civil_from_days(days);
        Self { year, month, day }
    }

    /// Day of week, 0 = Monday .. 6 = Sunday.
    pub fn weekday(&self) -> u32 {
        let days = self.epoch_days();
        (((days % 7 + 7) % 7 + 3) % 7) as u32
    }

    /// Add whole days.
    pub fn add_days(&self, days: i64) -> Self {
        Self::from_epoch_days(self.epoch_days() + days)
    }

    /// Add whole months, clamping the day to the last valid day of
    /// the target month (Jan 31 + 1 month = Feb 28 or 29).
    pub fn add_months(&self, months: i64) -> Self {
        let total = self.year as i64 * 12 + (self.month as i64 - 1) + months;
        let year = total.div_euclid(12) as i32;
        let month = (total.rem_euclid(12) + 1) as u32;
        let day = self.day.min(days_in_month(year, month));
        Self { year, month, day }
    }

    /// Add whole years; Feb 29 clamps to Feb 28 in non-leap targets.
    pub fn add_years(&self, years: i64) -> Self {
        self.add_months(years * 12)
    }

    /// Calendar difference `self - other` as `{years, months, days}`.
    pub fn since(&self, other: &PlainDate) -> Duration {
        if self < other {
            return other.since(self).negated();
        }
        let mut years = self.year as i64 - other.year as i64;
        let mut months = self.month as i64 - other.month as i64;
        let mut days = self.day as i64 - other.day as i64;
        if days < 0 {
            months -= 1;
            // Borrow the length of the month preceding `self`.
            let (by, bm) = if self.month == 1 {
                (self.year - 1, 12)
            } else {
                (self.year, self.month - 1)
            };
            days += days_in_month(by, bm) as i64;
        }
        if months < 0 {
            years -= 1;
            months += 12;
        }
        Duration {
            years: years as f64,
            months: months as f64,
            days: days as f64,
            ..Duration::ZERO
        }
    }
}

/// True for Gregorian leap years.
pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Days in a month of a year.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

/// Days since 1970-01-01 for a civil date (proleptic Gregorian).
fn days_from_civil(y: i32, m: u32, d: u32) -> i64 {
    let y = y as i64 - i64::from(m <= 2);
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = y - era * 400;
    let mp = if m > 2 { m - 3 } else { m + 9 } as i64;
    let doy = (153 * mp + 2) / 5 + d as i64 - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146097 + doe - 719468
}

/// Civil date from days since 1970-01-01.
fn civil_from_days(z: i64) -> (i32, u32, u32) {
    let z = z + 719468;
    let era = if z >= 0 { z } else { z - 146096 } / 146097;
    let doe = z - era * 146097;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let m = if mp < 10 { mp + 3 } else { mp - 9 } as u32;
    ((y + i64::from(m <= 2)) as i32, m, d)
}
