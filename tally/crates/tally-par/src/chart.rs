//! The Earley recognizer.
//!
//! Standard predict/scan/complete over the grammar's production
//! table. The grammar has no nullable nonterminals, so completion
//! never has to revisit the set it is working in for zero-length
//! derivations.

use rustc_hash::FxHashSet;
use tally_lex::SpannedToken;

use crate::grammar::{Grammar, Nt, Sym};

/// One Earley item: production, dot position, origin set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Item {
    pub prod: usize,
    pub dot: usize,
    pub origin: usize,
}

/// The filled chart: one item set per token boundary.
pub(crate) struct Chart {
    pub sets: Vec<Vec<Item>>,
}

impl Chart {
    /// True if any `Line` production is completed over the whole input.
    pub(crate) fn accepts(&self, grammar: &Grammar) -> bool {
        let last = match self.sets.last() {
            Some(set) => set,
            None => return false,
        };
        last.iter().any(|item| {
            let prod = &grammar.productions[item.prod];
            prod.lhs == Nt::Line && item.origin == 0 && item.dot == prod.rhs.len()
        })
    }
}

/// Run the recognizer over one line of tokens.
pub(crate) fn recognize(grammar: &Grammar, tokens: &[SpannedToken]) -> Chart {
    let n = tokens.len();
    let mut sets: Vec<Vec<Item>> = vec![Vec::new(); n + 1];
    let mut seen: Vec<FxHashSet<Item>> = vec![FxHashSet::default(); n + 1];

    for &prod in grammar.for_lhs(Nt::Line) {
        push_item(
            &mut sets[0],
            &mut seen[0],
            Item {
                prod,
                dot: 0,
                origin: 0,
            },
        );
    }

    for i in 0..=n {
        let mut cursor = 0;
        while cursor < sets[i].len() {
            let item = sets[i][cursor];
            cursor += 1;
            let prod = &grammar.productions[item.prod];

            if item.dot < prod.rhs.len() {
                match prod.rhs[item.dot] {
                    Sym::N(nt) => {
                        // Predict.
                        for &p in grammar.for_lhs(nt) {
                            push_item(
                                &mut sets[i],
                                &mut seen[i],
                                Item {
                                    prod: p,
                                    dot: 0,
                                    origin: i,
                                },
                            );
                        }
                    }
                    Sym::T(term) => {
                        // Scan.
                        if i < n && term.matches(&tokens[i].token) {
                            let advanced = Item {
                                prod: item.prod,
                                dot: item.dot + 1,
                                origin: item.origin,
                            };
                            let (left, right) = sets.split_at_mut(i + 1);
                            let _ = left;
                            push_item(&mut right[0], &mut seen[i + 1], advanced);
                        }
                    }
                }
            } else {
                // Complete: advance every item in the origin set that
                // was waiting on this nonterminal.
                let lhs = prod.lhs;
                let origin = item.origin;
                let mut advanced = Vec::new();
                for waiting in &sets[origin] {
                    let wprod = &grammar.productions[waiting.prod];
                    if waiting.dot < wprod.rhs.len() && wprod.rhs[waiting.dot] == Sym::N(lhs) {
                        advanced.push(Item {
                            prod: waiting.prod,
                            dot: waiting.dot + 1,
                            origin: waiting.origin,
                        });
                    }
                }
                for a in advanced {
                    push_item(&mut sets[i], &mut seen[i], a);
                }
            }
        }
    }

    Chart { sets }
}

fn push_item(set: &mut Vec<Item>, seen: &mut FxHashSet<Item>, item: Item) {
    if seen.insert(item) {
        set.push(item);
    }
}
