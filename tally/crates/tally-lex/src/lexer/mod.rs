//! Lexer module.
//!
//! The implementation is split into focused components:
//! - `core` - Main Lexer struct and dispatch
//! - `number` - Number literals in four radixes
//! - `identifier` - Identifiers, keywords, currency symbols
//! - `operator` - Operators, brackets, unit-symbol specials
//! - `datetime` - Plain date and time patterns

mod core;
mod datetime;
mod identifier;
mod number;
mod operator;

pub use self::core::Lexer;
