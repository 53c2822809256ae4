//! tally-fmt - Value rendering.
//!
//! Turns runtime values into strings under the presentation settings:
//! the automatic precision ladder, digit grouping, unit display
//! styles, derived-unit layout, date/time templates, and the
//! `binary`/`octal`/`hex`/`scientific`/`fraction`/`ordinal`
//! presentation targets.

pub mod base;
pub mod datetime;
pub mod fraction;
pub mod number;
pub mod ordinal;

mod value;

pub use number::{format_number, Precision};
pub use value::Formatter;
