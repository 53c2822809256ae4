//! tally-sem - AST normalization.
//!
//! Lowers the selected parse tree to the evaluation AST: resolves unit
//! names against the reference index (user-defined dimensions as the
//! fallback), expands currency prefixes, commits ambiguous prime marks
//! by context, rewrites named powers, resolves timezone aliases, and
//! lowers keyword date/time forms.

pub mod ast;
pub mod lower;

pub use ast::{
    BinOp, ConvTarget, Expr, ExprKind, FormatSpec, TemporalField, UnOp, UnitPow, UnitRef,
};
pub use lower::{lower, Normalizer};
