//! tally-util - Foundation types for the tally pipeline.
//!
//! This crate provides the types every pipeline phase shares:
//!
//! - [`Span`] - source locations carried by tokens, parse nodes, and
//!   diagnostics
//! - [`Diagnostic`] / [`Diagnostics`] - error collection, aggregated
//!   per phase by the driver
//! - [`Settings`] - presentation settings consumed by the evaluator
//!   (angle unit) and the formatter (everything else)
//!
//! Nothing here performs I/O or printing; the core collects, the
//! caller renders.

pub mod diagnostic;
pub mod settings;
pub mod span;

pub use diagnostic::{Diagnostic, Diagnostics, Level, Phase};
pub use settings::{
    AngleUnit, DateOrder, DecimalSeparator, GroupSeparator, GroupSize, Settings, SettingsError,
    TimeFormat, UnitDisplay,
};
pub use span::Span;
