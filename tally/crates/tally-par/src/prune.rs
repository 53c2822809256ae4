//! Scope pruning.
//!
//! A candidate that reads an identifier as a variable is only
//! admissible when that name is already defined on an earlier line.
//! Reading the same identifier as a unit is always admissible (unknown
//! units become user-defined dimensions), so pruning never touches
//! unit interpretations.

use rustc_hash::FxHashSet;
use tally_util::Span;

use crate::tree::{Node, NodeKind, NodeRef};

/// Result of pruning one candidate set.
#[derive(Clone, Debug)]
pub struct PruneOutcome {
    /// Candidates whose variable references are all in scope
    pub kept: Vec<NodeRef>,
    /// First out-of-scope name seen across dropped candidates, for the
    /// parser error when nothing survives
    pub first_undefined: Option<(String, Span)>,
}

/// Drop candidates that reference undefined variables.
pub fn prune(candidates: Vec<NodeRef>, defined: &FxHashSet<String>) -> PruneOutcome {
    let mut kept = Vec::new();
    let mut first_undefined: Option<(String, Span)> = None;

    for candidate in candidates {
        match find_undefined(&candidate, defined) {
            None => kept.push(candidate),
            Some((name, span)) => {
                if first_undefined.is_none() {
                    first_undefined = Some((name, span));
                }
            }
        }
    }

    PruneOutcome {
        kept,
        first_undefined,
    }
}

/// First variable reference not in `defined`, in source order.
fn find_undefined(node: &Node, defined: &FxHashSet<String>) -> Option<(String, Span)> {
    let mut found: Option<(String, Span)> = None;
    node.visit(&mut |n| {
        if found.is_some() {
            return;
        }
        if let NodeKind::Variable(name) = &n.kind {
            if !defined.contains(name) {
                found = Some((name.clone(), n.span));
            }
        }
    });
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::BinOp;
    use tally_util::Span;

    fn var(name: &str) -> NodeRef {
        Node::new(NodeKind::Variable(name.into()), Span::new(0, 3, 1, 1))
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

    fn add(lhs: NodeRef, rhs: NodeRef) -> NodeRef {
        Node::new(
            NodeKind::Binary {
                op: BinOp::Add,
                lhs,
                rhs,
            },
            Span::DUMMY,
        )
    }

    fn scope(names: &[&str]) -> FxHashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defined_variable_survives() {
        let outcome = prune(vec![add(var("x"), num(1.0))], &scope(&["x"]));
        assert_eq!(outcome.kept.len(), 1);
        assert!(outcome.first_undefined.is_none());
    }

    #[test]
    fn test_undefined_variable_pruned() {
        let outcome = prune(vec![add(var("x"), num(1.0))], &scope(&[]));
        assert!(outcome.kept.is_empty());
        let (name, span) = outcome.first_undefined.unwrap();
        assert_eq!(name, "x");
        assert_eq!(span.start, 0);
    }

    #[test]
    fn test_mixed_candidates() {
        let bad = add(var("y"), num(1.0));
        let good = num(2.0);
        let outcome = prune(vec![bad, good.clone()], &scope(&[]));
        assert_eq!(outcome.kept, vec![good]);
        assert_eq!(outcome.first_undefined.unwrap().0, "y");
    }

    #[test]
    fn test_assignment_name_is_not_a_reference() {
        let assign = Node::new(
            NodeKind::Assignment {
                name: "x".into(),
                value: num(1.0),
            },
            Span::DUMMY,
        );
        let outcome = prune(vec![assign], &scope(&[]));
        assert_eq!(outcome.kept.len(), 1);
    }

    #[test]
    fn test_monotonicity() {
        // Adding a name to the scope never shrinks the surviving set.
        let candidates = vec![add(var("x"), num(1.0)), num(2.0), var("y")];
        let small = prune(candidates.clone(), &scope(&["x"]));
        let large = prune(candidates, &scope(&["x", "y"]));
        assert!(large.kept.len() >= small.kept.len());
        for kept in &small.kept {
            assert!(large.kept.contains(kept));
        }
    }
}
