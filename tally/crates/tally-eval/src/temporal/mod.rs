//! The temporal engine.
//!
//! Distinct types for the distinct notions of time the language
//! works with:
//!
//! - [`PlainDate`] - a calendar date with no time or zone
//! - [`PlainTime`] - a wall-clock time with no date or zone
//! - [`PlainDateTime`] - date plus time, still zoneless
//! - [`Instant`] - a point on the global timeline (epoch milliseconds)
//! - [`ZonedDateTime`] - a wall-clock reading in a named IANA zone
//! - [`Duration`] - a signed span with separate calendar and clock
//!   components
//!
//! Calendar arithmetic (proleptic Gregorian, month-clamp semantics) is
//! implemented here; the installed IANA tables, via `chrono-tz`, are
//! consulted only for zone offsets.

mod date;
mod datetime;
mod duration;
mod instant;
mod time;
mod zoned;

pub use date::PlainDate;
pub use datetime::PlainDateTime;
pub use duration::Duration;
pub use instant::Instant;
pub use time::PlainTime;
pub use zoned::{instant_in_zone, local_to_instant, zone_of, ZonedDateTime};
