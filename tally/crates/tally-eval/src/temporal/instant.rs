//! Points on the global timeline.

use std::time::{SystemTime, UNIX_EPOCH};

/// An absolute point in time: milliseconds since the Unix epoch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Instant {
    pub epoch_ms: i64,
}

impl Instant {
    pub fn from_epoch_ms(epoch_ms: i64) -> Self {
        Self { epoch_ms }
    }

    pub fn from_epoch_seconds(seconds: f64) -> Self {
        Self {
            epoch_ms: (seconds * 1000.0).round() as i64,
        }
    }

    /// The current instant from the system clock.
    pub fn now() -> Self {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Self {
            epoch_ms: since_epoch.as_millis() as i64,
        }
    }

    pub fn plus_ms(&self, ms: i64) -> Self {
        Self {
            epoch_ms: self.epoch_ms + ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_seconds() {
        let i = Instant::from_epoch_seconds(1700000000.5);
        assert_eq!(i.epoch_ms, 1700000000500);
    }

    #[test]
    fn test_plus_ms() {
        let i = Instant::from_epoch_ms(1000).plus_ms(-2500);
        assert_eq!(i.epoch_ms, -1500);
    }

    #[test]
    fn test_now_is_after_2020() {
        assert!(Instant::now().epoch_ms > 1_577_836_800_000);
    }
}
