//! tally-par - Grammar-directed parsing with ambiguity.
//!
//! The parser produces **all** well-formed derivations of a line as
//! separate parse trees. Ambiguity is resolved downstream: the
//! [`prune`] pass drops candidates with out-of-scope variable reads,
//! and the [`select`] pass picks one survivor by a strict
//! lexicographic score. Nothing here evaluates anything.

pub mod prune;
pub mod select;
pub mod tree;

mod chart;
mod forest;
mod grammar;

use tally_data::ReferenceIndex;
use tally_lex::SpannedToken;

pub use prune::{prune, PruneOutcome};
pub use select::select;
pub use tree::{
    BinOp, CompositePart, ConvOp, FormatTarget, Node, NodeKind, NodeRef, PostOp, Target, UnOp,
    UnitExpr, UnitFactor, UnitSpelling,
};

/// Parse one line of tokens into every admissible parse tree.
///
/// An empty token list (blank line) and unparseable input both yield
/// an empty candidate set; the caller turns the latter into a parser
/// error for the line.
pub fn parse_line(tokens: &[SpannedToken], index: &ReferenceIndex) -> Vec<NodeRef> {
    if tokens.is_empty() {
        return Vec::new();
    }
    let grammar = grammar::Grammar::get();
    let chart = chart::recognize(grammar, tokens);
    if !chart.accepts(grammar) {
        return Vec::new();
    }
    forest::Forest::new(grammar, &chart, tokens, index).trees()
}
