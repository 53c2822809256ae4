//! tally-lex - Per-line tokenization.
//!
//! Maps one expression line to an ordered token sequence over a fixed
//! alphabet: numbers in four radixes, percent/permille, identifiers,
//! unit-symbol specials (`°`, `′`, `″`, superscript runs), operators
//! and their Unicode equivalents, brackets, keywords, and plain
//! date/time patterns.
//!
//! Lexing is total: an unrecognized character records a diagnostic
//! with its span and is skipped, leaving a gap in the token coverage
//! that the parser will refuse to bridge.

pub mod cursor;
pub mod token;

mod lexer;

pub use cursor::Cursor;
pub use lexer::Lexer;
pub use token::{Keyword, SpannedToken, Token};
