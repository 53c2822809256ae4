//! Wall-clock times.

/// A time of day with millisecond precision, no date, no zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlainTime {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub millisecond: u32,
}

impl PlainTime {
    pub const MIDNIGHT: PlainTime = PlainTime {
        hour: 0,
        minute: 0,
        second: 0,
        millisecond: 0,
    };

    /// Construct a time, checking field ranges.
    pub fn new(hour: u32, minute: u32, second: u32, millisecond: u32) -> Option<Self> {
        if hour > 23 || minute > 59 || second > 59 || millisecond > 999 {
            return None;
        }
        Some(Self {
            hour,
            minute,
            second,
            millisecond,
        })
    }

    /// Milliseconds since midnight.
    pub fn millis_of_day(&self) -> i64 {
        ((self.hour as i64 * 60 + self.minute as i64) * 60 + self.second as i64) * 1000
            + self.millisecond as i64
    }

    /// Time from milliseconds since midnight plus the day carry.
    ///
    /// Negative inputs borrow days: `-1 ms` is `23:59:59.999` the
    /// previous day.
    pub fn from_millis_of_day(ms: i64) -> (Self, i64) {
        const DAY: i64 = 86_400_000;
        let carry = ms.div_euclid(DAY);
        let ms = ms.rem_euclid(DAY);
        let time = Self {
            hour: (ms / 3_600_000) as u32,
            minute: (ms / 60_000 % 60) as u32,
            second: (ms / 1000 % 60) as u32,
            millisecond: (ms % 1000) as u32,
        };
        (time, carry)
    }
}
