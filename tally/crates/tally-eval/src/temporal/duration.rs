//! Signed duration spans.

/// A signed span of time.
///
/// Calendar components (years, months) have no fixed length and are
/// applied with calendar rules; the remaining components are exact.
/// Fields are independent and may carry unreduced magnitudes (`90
/// minutes` stays 90 minutes); normalization happens at format or
/// comparison boundaries.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Duration {
    pub years: f64,
    pub months: f64,
    pub weeks: f64,
    pub days: f64,
    pub hours: f64,
    pub minutes: f64,
    pub seconds: f64,
    pub millis: f64,
}

/// Average Gregorian month, used only when a fractional month has to
/// become an exact span.
pub const AVG_MONTH_MS: f64 = 2_629_746_000.0;

impl Duration {
    pub const ZERO: Duration = Duration {
        years: 0.0,
        months: 0.0,
        weeks: 0.0,
        days: 0.0,
        hours: 0.0,
        minutes: 0.0,
        seconds: 0.0,
        millis: 0.0,
    };

    /// A duration holding only exact milliseconds.
    pub fn from_ms(ms: f64) -> Self {
        Duration {
            millis: ms,
            ..Duration::ZERO
        }
    }

    /// Build from a time-dimension unit id (`"hour"`, `"week"`, ...).
    pub fn from_unit(unit_id: &str, value: f64) -> Option<Self> {
        let mut d = Duration::ZERO;
        match unit_id {
            "year" => d.years = value,
            "month" => d.months = value,
            "week" => d.weeks = value,
            "day" => d.days = value,
            "hour" => d.hours = value,
            "minute" => d.minutes = value,
            "second" => d.seconds = value,
            "millisecond" => d.millis = value,
            _ => return None,
        }
        Some(d)
    }

    /// Total calendar months (years folded in).
    pub fn calendar_months(&self) -> f64 {
        self.years * 12.0 + self.months
    }

    /// Exact milliseconds of the non-calendar components.
    pub fn fixed_ms(&self) -> f64 {
        self.weeks * 7.0 * 86_400_000.0
            + self.days * 86_400_000.0
            + self.hours * 3_600_000.0
            + self.minutes * 60_000.0
            + self.seconds * 1000.0
            + self.millis
    }

    /// Milliseconds with calendar components averaged; only for
    /// magnitude comparisons and unit conversion, never for calendar
    /// arithmetic.
    pub fn total_ms(&self) -> f64 {
        self.calendar_months() * AVG_MONTH_MS + self.fixed_ms()
    }

    /// True when every component is zero.
    pub fn is_zero(&self) -> bool {
        self.total_ms() == 0.0
    }

    /// True when only exact components are populated.
    pub fn is_fixed(&self) -> bool {
        self.calendar_months() == 0.0
    }

    pub fn negated(&self) -> Self {
        Duration {
            years: -self.years,
            months: -self.months,
            weeks: -self.weeks,
            days: -self.days,
            hours: -self.hours,
            minutes: -self.minutes,
            seconds: -self.seconds,
            millis: -self.millis,
        }
    }

    pub fn plus(&self, other: &Duration) -> Self {
        Duration {
            years: self.years + other.years,
            months: self.months + other.months,
            weeks: self.weeks + other.weeks,
            days: self.days + other.days,
            hours: self.hours + other.hours,
            minutes: self.minutes + other.minutes,
            seconds: self.seconds + other.seconds,
            millis: self.millis + other.millis,
        }
    }

    pub fn scaled(&self, k: f64) -> Self {
        Duration {
            years: self.years * k,
            months: self.months * k,
            weeks: self.weeks * k,
            days: self.days * k,
            hours: self.hours * k,
            minutes: self.minutes * k,
            seconds: self.seconds * k,
            millis: self.millis * k,
        }
    }

    /// Structural comparison value: year-month total plus exact
    /// milliseconds, the reduction used for `==` between durations.
    pub fn comparison_key(&self) -> (f64, f64) {
        (self.calendar_months(), self.fixed_ms())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_unit() {
        let d = Duration::from_unit("hour", 3.0).unwrap();
        assert_eq!(d.hours, 3.0);
        assert_eq!(d.fixed_ms(), 3.0 * 3_600_000.0);
        assert!(Duration::from_unit("meter", 1.0).is_none());
    }

    #[test]
    fn test_unreduced_magnitudes_kept() {
        let d = Duration::from_unit("minute", 90.0).unwrap();
        assert_eq!(d.minutes, 90.0);
        assert_eq!(d.hours, 0.0);
    }

    #[test]
    fn test_comparison_key_reduces() {
        let ninety = Duration::from_unit("minute", 90.0).unwrap();
        let hour_and_half = Duration {
            hours: 1.0,
            minutes: 30.0,
            ..Duration::ZERO
        };
        assert_eq!(ninety.comparison_key(), hour_and_half.comparison_key());
    }

    #[test]
    fn test_calendar_and_fixed_split() {
        let d = Duration {
            years: 1.0,
            months: 2.0,
            days: 3.0,
            ..Duration::ZERO
        };
        assert_eq!(d.calendar_months(), 14.0);
        assert_eq!(d.fixed_ms(), 3.0 * 86_400_000.0);
        assert!(!d.is_fixed());
    }

    #[test]
    fn test_negation_round_trip() {
        let d = Duration::from_unit("second", 5.0).unwrap();
        assert_eq!(d.negated().negated(), d);
        assert!(d.plus(&d.negated()).is_zero());
    }
}
