//! Zoneless date-times and their calendar arithmetic.

use super::date::PlainDate;
use super::duration::{Duration, AVG_MONTH_MS};
use super::time::PlainTime;

/// A date plus a wall-clock time, no zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlainDateTime {
    pub date: PlainDate,
    pub time: PlainTime,
}

impl PlainDateTime {
    pub fn new(date: PlainDate, time: PlainTime) -> Self {
        Self { date, time }
    }

    /// Apply a duration with calendar rules: years and months clamp,
    /// weeks and days shift the date, clock components roll into the
    /// time with day carry. Fractional calendar parts fall back to
    /// the average month length.
    pub fn plus(&self, d: &Duration) -> Self {
        let months_total = d.calendar_months();
        let whole_months = months_total.trunc();
        let frac_month_ms = (months_total - whole_months) * AVG_MONTH_MS;

        let date = self.date.add_months(whole_months as i64);
        let clock_ms = d.fixed_ms() + frac_month_ms;
        let total = self.time.millis_of_day() as f64 + clock_ms;
        let (time, carry) = PlainTime::from_millis_of_day(total.round() as i64);
        Self {
            date: date.add_days(carry),
            time,
        }
    }

    pub fn minus(&self, d: &Duration) -> Self {
        self.plus(&d.negated())
    }

    /// Full calendar difference `self - other`: date fields by
    /// calendar subtraction, clock fields exactly.
    pub fn since(&self, other: &PlainDateTime) -> Duration {
        if self < other {
            return other.since(self).negated();
        }
        let mut date = self.date;
        let mut time_diff = self.time.millis_of_day() - other.time.millis_of_day();
        if time_diff < 0 {
            time_diff += 86_400_000;
            date = date.add_days(-1);
        }
        let date_part = date.since(&other.date);
        let (time, _) = PlainTime::from_millis_of_day(time_diff);
        Duration {
            hours: time.hour as f64,
            minutes: time.minute as f64,
            seconds: time.second as f64,
            millis: time.millisecond as f64,
            ..date_part
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> PlainDateTime {
        PlainDateTime::new(
            PlainDate::new(y, mo, d).unwrap(),
            PlainTime::new(h, mi, s, 0).unwrap(),
        )
    }

    #[test]
    fn test_add_clock_with_carry() {
        let d = Duration {
            hours: 3.0,
            ..Duration::ZERO
        };
        assert_eq!(dt(2024, 2, 28, 22, 0, 0).plus(&d), dt(2024, 2, 29, 1, 0, 0));
    }

    #[test]
    fn test_add_months_clamps() {
        let d = Duration {
            months: 1.0,
            ..Duration::ZERO
        };
        assert_eq!(dt(2023, 1, 31, 9, 0, 0).plus(&d), dt(2023, 2, 28, 9, 0, 0));
    }

    #[test]
    fn test_minus_round_trips_fixed_components() {
        let d = Duration {
            days: 2.0,
            hours: 5.0,
            ..Duration::ZERO
        };
        let start = dt(2024, 6, 15, 13, 30, 0);
        assert_eq!(start.plus(&d).minus(&d), start);
    }

    #[test]
    fn test_since_with_borrow() {
        let diff = dt(2024, 3, 1, 1, 0, 0).since(&dt(2024, 2, 28, 23, 0, 0));
        assert_eq!(diff.years, 0.0);
        assert_eq!(diff.months, 0.0);
        assert_eq!(diff.days, 1.0);
        assert_eq!(diff.hours, 2.0);
    }

    #[test]
    fn test_since_negative() {
        let diff = dt(2024, 1, 1, 0, 0, 0).since(&dt(2024, 1, 2, 0, 0, 0));
        assert_eq!(diff.days, -1.0);
    }
}
