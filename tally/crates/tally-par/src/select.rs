//! Candidate selection.
//!
//! A strict lexicographic score over the surviving candidates, higher
//! priority criteria decided before lower ones are consulted:
//!
//! 1. fewer unit leaves
//! 2. higher ratio of in-index units to total units
//! 3. more variable references that are actually in scope
//! 4. fewer tree nodes
//!
//! Remaining ties keep the first candidate in enumeration order, which
//! the forest walker makes deterministic.

use rustc_hash::FxHashSet;
use tally_data::ReferenceIndex;

use crate::tree::{Node, NodeKind, NodeRef, Target, UnitFactor, UnitSpelling};

/// Pick the winning candidate, if any survive pruning.
pub fn select(
    candidates: &[NodeRef],
    index: &ReferenceIndex,
    defined: &FxHashSet<String>,
) -> Option<NodeRef> {
    let mut best: Option<(Score, &NodeRef)> = None;
    for candidate in candidates {
        let score = Score::of(candidate, index, defined);
        match &best {
            None => best = Some((score, candidate)),
            Some((incumbent, _)) => {
                if score.beats(incumbent) {
                    best = Some((score, candidate));
                }
            }
        }
    }
    best.map(|(_, node)| node.clone())
}

/// The lexicographic score of one candidate.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Score {
    unit_leaves: usize,
    units_in_index: usize,
    scoped_variables: usize,
    nodes: usize,
}

impl Score {
    fn of(node: &Node, index: &ReferenceIndex, defined: &FxHashSet<String>) -> Self {
        let mut score = Score {
            unit_leaves: 0,
            units_in_index: 0,
            scoped_variables: 0,
            nodes: 0,
        };
        score.measure(node, index, defined);
        score
    }

    /// Strictly better than `other` under the lexicographic rule.
    fn beats(&self, other: &Score) -> bool {
        if self.unit_leaves != other.unit_leaves {
            return self.unit_leaves < other.unit_leaves;
        }
        let ratio_self = self.index_ratio();
        let ratio_other = other.index_ratio();
        if ratio_self != ratio_other {
            return ratio_self > ratio_other;
        }
        if self.scoped_variables != other.scoped_variables {
            return self.scoped_variables > other.scoped_variables;
        }
        self.nodes < other.nodes
    }

    /// In-index share of unit leaves; a tree without units is fully
    /// resolved.
    fn index_ratio(&self) -> f64 {
        if self.unit_leaves == 0 {
            1.0
        } else {
            self.units_in_index as f64 / self.unit_leaves as f64
        }
    }

    fn count_factor(&mut self, factor: &UnitFactor, index: &ReferenceIndex) {
        self.unit_leaves += 1;
        if factor_in_index(factor, index) {
            self.units_in_index += 1;
        }
    }

    fn measure(&mut self, node: &Node, index: &ReferenceIndex, defined: &FxHashSet<String>) {
        self.nodes += 1;
        match &node.kind {
            NodeKind::Assignment { value, .. } => self.measure(value, index, defined),
            NodeKind::Conditional {
                cond,
                then,
                otherwise,
            } => {
                self.measure(cond, index, defined);
                self.measure(then, index, defined);
                self.measure(otherwise, index, defined);
            }
            NodeKind::Conversion { expr, target, .. } => {
                self.measure(expr, index, defined);
                match target {
                    Target::Unit(unit) => {
                        for factor in &unit.factors {
                            self.count_factor(factor, index);
                        }
                    }
                    Target::Composite(factors) => {
                        for factor in factors {
                            self.count_factor(factor, index);
                        }
                    }
                    Target::Timezone(_) | Target::Format(_) => {}
                }
            }
            NodeKind::Binary { lhs, rhs, .. } => {
                self.measure(lhs, index, defined);
                self.measure(rhs, index, defined);
            }
            NodeKind::Unary { expr, .. } | NodeKind::Postfix { expr, .. } => {
                self.measure(expr, index, defined)
            }
            NodeKind::Value { unit, .. } => {
                if let Some(unit) = unit {
                    for factor in &unit.factors {
                        self.count_factor(factor, index);
                    }
                }
            }
            NodeKind::CurrencyValue { .. } => {
                // Currency prefixes are validated against the index at
                // extraction time.
                self.unit_leaves += 1;
                self.units_in_index += 1;
            }
            NodeKind::Composite { parts } => {
                for part in parts {
                    self.count_factor(&part.factor, index);
                }
            }
            NodeKind::FunctionCall { args, .. } => {
                for arg in args {
                    self.measure(arg, index, defined);
                }
            }
            NodeKind::Variable(name) => {
                if defined.contains(name) {
                    self.scoped_variables += 1;
                }
            }
            NodeKind::Ago { value } | NodeKind::FromNow { value } | NodeKind::Unix { value } => {
                self.measure(value, index, defined)
            }
            NodeKind::Boolean(_)
            | NodeKind::Constant(_)
            | NodeKind::Date { .. }
            | NodeKind::Time { .. }
            | NodeKind::DateTime { .. }
            | NodeKind::Now
            | NodeKind::Today
            | NodeKind::Yesterday
            | NodeKind::Tomorrow => {}
        }
    }
}

/// Whether a unit factor names something in the reference index.
fn factor_in_index(factor: &UnitFactor, index: &ReferenceIndex) -> bool {
    match &factor.spelling {
        UnitSpelling::Words(words) => match words.as_slice() {
            [word] => {
                index.is_unit_word(word)
                    || index.is_currency_prefix(word)
                    || index.currency_by_name(word).is_some()
            }
            // Multi-word spellings only exist when the extraction
            // already validated them.
            _ => true,
        },
        UnitSpelling::Degree(_) | UnitSpelling::Prime | UnitSpelling::DoublePrime => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{BinOp, UnitExpr};
    use tally_util::Span;

    fn scope(names: &[&str]) -> FxHashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn unit_value(number: f64, words: &[&str]) -> NodeRef {
        let factors = words
            .iter()
            .map(|w| UnitFactor {
                spelling: UnitSpelling::Words(vec![w.to_string()]),
                exponent: 1,
                span: Span::DUMMY,
            })
            .collect::<Vec<_>>();
        Node::new(
            NodeKind::Value {
                number,
                unit: Some(UnitExpr {
                    factors,
                    span: Span::DUMMY,
                }),
            },
            Span::DUMMY,
        )
    }

    fn num(x: f64) -> NodeRef {
        Node::new(
            NodeKind::Value {
                number: x,
                unit: None,
            },
            Span::DUMMY,
        )
    }

    #[test]
    fn test_fewer_unit_leaves_wins() {
        let index = ReferenceIndex::builtin();
        let derived = unit_value(60.0, &["km", "h"]);
        let division = Node::new(
            NodeKind::Binary {
                op: BinOp::Div,
                lhs: unit_value(60.0, &["km"]),
                rhs: Node::new(NodeKind::Variable("h".into()), Span::DUMMY),
            },
            Span::DUMMY,
        );
        // With `h` defined, the division has fewer unit leaves and is
        // preferred; the derived unit wins otherwise.
        let selected = select(
            &[derived.clone(), division.clone()],
            &index,
            &scope(&["h"]),
        )
        .unwrap();
        assert_eq!(selected, division);
        let selected = select(&[derived.clone()], &index, &scope(&[])).unwrap();
        assert_eq!(selected, derived);
    }

    #[test]
    fn test_index_ratio_breaks_unit_count_ties() {
        let index = ReferenceIndex::builtin();
        let known = unit_value(5.0, &["km"]);
        let unknown = unit_value(5.0, &["flurbs"]);
        let selected = select(&[unknown.clone(), known.clone()], &index, &scope(&[])).unwrap();
        assert_eq!(selected, known);
    }

    #[test]
    fn test_scoped_variable_preferred() {
        let index = ReferenceIndex::builtin();
        let var = Node::new(NodeKind::Variable("foo".into()), Span::DUMMY);
        let constant = Node::new(NodeKind::Constant("foo".into()), Span::DUMMY);
        let selected = select(&[constant, var.clone()], &index, &scope(&["foo"])).unwrap();
        assert_eq!(selected, var);
    }

    #[test]
    fn test_fewer_nodes_breaks_remaining_ties() {
        let index = ReferenceIndex::builtin();
        let small = num(4.0);
        let big = Node::new(
            NodeKind::Binary {
                op: BinOp::Add,
                lhs: num(2.0),
                rhs: num(2.0),
            },
            Span::DUMMY,
        );
        let selected = select(&[big, small.clone()], &index, &scope(&[])).unwrap();
        assert_eq!(selected, small);
    }

    #[test]
    fn test_first_wins_on_full_tie() {
        let index = ReferenceIndex::builtin();
        let a = num(1.0);
        let b = num(2.0);
        let selected = select(&[a.clone(), b], &index, &scope(&[])).unwrap();
        assert_eq!(selected, a);
    }

    #[test]
    fn test_empty_candidates() {
        let index = ReferenceIndex::builtin();
        assert!(select(&[], &index, &scope(&[])).is_none());
    }
}
