//! Diagnostic collection.
//!
//! Every pipeline phase reports problems as [`Diagnostic`] values
//! pushed into a [`Diagnostics`] sink. The driver aggregates them per
//! [`Phase`]; nothing in the core prints.
//!
//! # Examples
//!
//! ```
//! use tally_util::{Diagnostics, Phase, Span};
//!
//! let mut diags = Diagnostics::new();
//! diags.error(Phase::Lexer, "unrecognized character `\\u{1F600}`", Span::DUMMY);
//!
//! assert!(diags.has_errors());
//! assert_eq!(diags.for_phase(Phase::Lexer).count(), 1);
//! ```

use std::fmt;

use crate::Span;

/// Diagnostic severity level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    /// A problem that invalidates the line's result
    Error,
    /// A problem the pipeline recovered from
    Warning,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "error"),
            Level::Warning => write!(f, "warning"),
        }
    }
}

/// The pipeline phase a diagnostic originated from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Tokenization
    Lexer,
    /// Parsing, including "all candidates pruned"
    Parser,
    /// Evaluation
    Runtime,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Lexer => write!(f, "lexer"),
            Phase::Parser => write!(f, "parser"),
            Phase::Runtime => write!(f, "runtime"),
        }
    }
}

/// A single diagnostic message with severity and location.
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    /// Severity level
    pub level: Level,
    /// Originating phase
    pub phase: Phase,
    /// Human-readable message naming the offending entity
    pub message: String,
    /// Source location
    pub span: Span,
}

impl Diagnostic {
    /// Create an error diagnostic for the given phase.
    pub fn error(phase: Phase, message: impl Into<String>, span: Span) -> Self {
        Self {
            level: Level::Error,
            phase,
            message: message.into(),
            span,
        }
    }

    /// Create a warning diagnostic for the given phase.
    pub fn warning(phase: Phase, message: impl Into<String>, span: Span) -> Self {
        Self {
            level: Level::Warning,
            phase,
            message: message.into(),
            span,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} ({}:{})",
            self.level, self.message, self.span.line, self.span.column
        )
    }
}

/// An append-only sink of diagnostics.
///
/// # Examples
///
/// ```
/// use tally_util::{Diagnostics, Phase, Span};
///
/// let mut diags = Diagnostics::new();
/// assert!(!diags.has_errors());
/// diags.error(Phase::Parser, "no derivation", Span::DUMMY);
/// assert!(diags.has_errors());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an error for the given phase.
    pub fn error(&mut self, phase: Phase, message: impl Into<String>, span: Span) {
        self.entries.push(Diagnostic::error(phase, message, span));
    }

    /// Push a warning for the given phase.
    pub fn warning(&mut self, phase: Phase, message: impl Into<String>, span: Span) {
        self.entries.push(Diagnostic::warning(phase, message, span));
    }

    /// Push an already-built diagnostic.
    pub fn push(&mut self, diag: Diagnostic) {
        self.entries.push(diag);
    }

    /// Append every diagnostic from another sink.
    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    /// True if any error-level diagnostic was recorded.
    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|d| d.level == Level::Error)
    }

    /// Number of recorded diagnostics.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All recorded diagnostics, in insertion order.
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Diagnostics recorded for one phase, in insertion order.
    pub fn for_phase(&self, phase: Phase) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(move |d| d.phase == phase)
    }
}
