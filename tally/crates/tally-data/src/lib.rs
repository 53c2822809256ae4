//! tally-data - The read-only reference index.
//!
//! Lookup tables the rest of the pipeline treats as input: units (with
//! dimensions and conversions), currencies (codes, names, symbols),
//! timezone aliases, and mathematical constants. The tables are loaded
//! once - either the embedded builtin dataset or caller-provided JSON
//! with the same schema - and shared immutably by any number of
//! calculators.
//!
//! Exchange rates are the one runtime input: a [`RatesSnapshot`] is
//! installed between document evaluations and read by the evaluator.

mod constants;
mod currency;
mod error;
mod index;
mod rates;
mod timezone;
mod unit;

pub use constants::{Constant, ConstantTable};
pub use currency::Currency;
pub use error::{DataError, DataResult};
pub use index::{ReferenceIndex, UnitId};
pub use rates::{RatesInput, RatesSnapshot};
pub use timezone::{TimezoneName, TimezoneTable};
pub use unit::{Conversion, DisplayName, Region, Scale, Unit};
