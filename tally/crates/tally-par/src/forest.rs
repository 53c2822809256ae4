//! Derivation-forest extraction.
//!
//! After recognition, every completed chart item describes a
//! nonterminal spanning a token range. The walker re-enumerates the
//! ways each production can split its span and builds one parse tree
//! per derivation. Splits are enumerated longest-left-first, which
//! makes the stable tie-break favor greedy reads (`10 in in cm` keeps
//! `10 in` together).
//!
//! Index-dependent groupings are validated here: a multi-word unit run
//! must name a known unit or currency, a degree-fused word a known
//! unit, a timezone run a known zone. Derivations that fail
//! validation are dropped, not errored.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::{FxHashMap, FxHashSet};
use tally_data::ReferenceIndex;
use tally_lex::{SpannedToken, Token};
use tally_util::Span;

use crate::chart::Chart;
use crate::grammar::{Action, Grammar, Nt, Sym};
use crate::tree::{
    BinOp, CompositePart, FormatTarget, Node, NodeKind, NodeRef, Target, UnitExpr, UnitFactor,
    UnitSpelling,
};

/// Upper bound on derivations kept per nonterminal span. Lines short
/// enough to type stay far below this; it exists to bound adversarial
/// word runs.
const MAX_DERIVATIONS: usize = 256;

/// Semantic value of one derivation of one grammar symbol.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Sem {
    Node(NodeRef),
    Unit(UnitExpr),
    Factor(UnitFactor),
    Factors(Vec<UnitFactor>),
    Pair(CompositePart),
    Words(Vec<String>, Span),
    Target(Target),
    ArgsList(Vec<NodeRef>),
    Tok(Token, Span),
}

pub(crate) struct Forest<'a> {
    grammar: &'static Grammar,
    tokens: &'a [SpannedToken],
    index: &'a ReferenceIndex,
    /// (lhs, start, end) -> completed production ids, table order
    completed: FxHashMap<(Nt, usize, usize), Vec<usize>>,
    memo: RefCell<FxHashMap<(Nt, usize, usize), Rc<Vec<Sem>>>>,
    in_progress: RefCell<FxHashSet<(Nt, usize, usize)>>,
}

impl<'a> Forest<'a> {
    pub(crate) fn new(
        grammar: &'static Grammar,
        chart: &Chart,
        tokens: &'a [SpannedToken],
        index: &'a ReferenceIndex,
    ) -> Self {
        let mut completed: FxHashMap<(Nt, usize, usize), Vec<usize>> = FxHashMap::default();
        for (end, set) in chart.sets.iter().enumerate() {
            for item in set {
                let prod = &grammar.productions[item.prod];
                if item.dot == prod.rhs.len() {
                    completed
                        .entry((prod.lhs, item.origin, end))
                        .or_default()
                        .push(item.prod);
                }
            }
        }
        for prods in completed.values_mut() {
            prods.sort_unstable();
            prods.dedup();
        }
        Self {
            grammar,
            tokens,
            index,
            completed,
            memo: RefCell::new(FxHashMap::default()),
            in_progress: RefCell::new(FxHashSet::default()),
        }
    }

    /// All distinct parse trees covering the whole line.
    pub(crate) fn trees(&self) -> Vec<NodeRef> {
        let sems = self.walk(Nt::Line, 0, self.tokens.len());
        let mut out: Vec<NodeRef> = Vec::new();
        for sem in sems.iter() {
            if let Sem::Node(node) = sem {
                if !out.contains(node) {
                    out.push(Rc::clone(node));
                }
            }
        }
        out
    }

    /// Every semantic value derivable for `nt` over `[start, end)`.
    fn walk(&self, nt: Nt, start: usize, end: usize) -> Rc<Vec<Sem>> {
        let key = (nt, start, end);
        if let Some(hit) = self.memo.borrow().get(&key) {
            return Rc::clone(hit);
        }
        // Left-recursive re-entry over the same span can only feed
        // productions whose remaining symbols would have to be empty;
        // those splits fail anyway, so contribute nothing.
        if !self.in_progress.borrow_mut().insert(key) {
            return Rc::new(Vec::new());
        }

        let mut out: Vec<Sem> = Vec::new();
        if let Some(prods) = self.completed.get(&key) {
            for &p in prods {
                let rhs = &self.grammar.productions[p].rhs;
                for children in self.splits(rhs, start, end) {
                    if out.len() >= MAX_DERIVATIONS {
                        break;
                    }
                    let span = self.span(start, end);
                    if let Some(sem) = self.build(self.grammar.productions[p].action, children, span)
                    {
                        if !out.contains(&sem) {
                            out.push(sem);
                        }
                    }
                }
            }
        }

        self.in_progress.borrow_mut().remove(&key);
        let out = Rc::new(out);
        self.memo.borrow_mut().insert(key, Rc::clone(&out));
        out
    }

    /// Enumerate the ways `syms` can cover `[start, end)`, longest
    /// left span first.
    fn splits(&self, syms: &[Sym], start: usize, end: usize) -> Vec<Vec<Sem>> {
        let mut out = Vec::new();
        if syms.is_empty() {
            if start == end {
                out.push(Vec::new());
            }
            return out;
        }
        let rest = &syms[1..];
        match syms[0] {
            Sym::T(term) => {
                if start < end && term.matches(&self.tokens[start].token) {
                    let leaf = Sem::Tok(
                        self.tokens[start].token.clone(),
                        self.tokens[start].span,
                    );
                    for mut tail in self.splits(rest, start + 1, end) {
                        tail.insert(0, leaf.clone());
                        out.push(tail);
                        if out.len() >= MAX_DERIVATIONS {
                            return out;
                        }
                    }
                }
            }
            Sym::N(nt) => {
                for mid in (start + 1..=end).rev() {
                    if !self.completed.contains_key(&(nt, start, mid)) {
                        continue;
                    }
                    let heads = self.walk(nt, start, mid);
                    if heads.is_empty() {
                        continue;
                    }
                    for tail in self.splits(rest, mid, end) {
                        for head in heads.iter() {
                            let mut children = Vec::with_capacity(syms.len());
                            children.push(head.clone());
                            children.extend(tail.iter().cloned());
                            out.push(children);
                            if out.len() >= MAX_DERIVATIONS {
                                return out;
                            }
                        }
                    }
                }
            }
        }
        out
    }

    fn span(&self, start: usize, end: usize) -> Span {
        if start >= end {
            return Span::DUMMY;
        }
        self.tokens[start].span.merge(self.tokens[end - 1].span)
    }

    /// Assemble the semantic value for one derivation. `None` rejects
    /// the derivation (index validation failed).
    fn build(&self, action: Action, children: Vec<Sem>, span: Span) -> Option<Sem> {
        let mut it = children.into_iter();
        match action {
            Action::PassThrough => it.next(),
            Action::Assignment => {
                let name = ident_text(it.next()?)?;
                let _eq = it.next();
                let value = node(it.next()?)?;
                Some(Sem::Node(Node::new(NodeKind::Assignment { name, value }, span)))
            }
            Action::Conversion(op) => {
                let expr = node(it.next()?)?;
                let _kw = it.next();
                let target = target(it.next()?)?;
                Some(Sem::Node(Node::new(
                    NodeKind::Conversion { expr, op, target },
                    span,
                )))
            }
            Action::Conditional => {
                let _if = it.next();
                let cond = node(it.next()?)?;
                let _then = it.next();
                let then = node(it.next()?)?;
                let _else = it.next();
                let otherwise = node(it.next()?)?;
                Some(Sem::Node(Node::new(
                    NodeKind::Conditional {
                        cond,
                        then,
                        otherwise,
                    },
                    span,
                )))
            }
            Action::Binary(op) => {
                let lhs = node(it.next()?)?;
                let _op = it.next();
                let rhs = node(it.next()?)?;
                Some(Sem::Node(Node::new(NodeKind::Binary { op, lhs, rhs }, span)))
            }
            Action::Unary(op) => {
                let _op = it.next();
                let expr = node(it.next()?)?;
                Some(Sem::Node(Node::new(NodeKind::Unary { op, expr }, span)))
            }
            Action::Postfix(op) => {
                let expr = node(it.next()?)?;
                Some(Sem::Node(Node::new(NodeKind::Postfix { op, expr }, span)))
            }
            Action::PowerCaret => {
                let lhs = node(it.next()?)?;
                let _caret = it.next();
                let rhs = node(it.next()?)?;
                Some(Sem::Node(Node::new(
                    NodeKind::Binary {
                        op: BinOp::Pow,
                        lhs,
                        rhs,
                    },
                    span,
                )))
            }
            Action::PowerSuperscript => {
                let lhs = node(it.next()?)?;
                let (tok, tok_span) = token(it.next()?)?;
                let Token::Superscript(exp) = tok else {
                    return None;
                };
                let rhs = Node::new(
                    NodeKind::Value {
                        number: exp as f64,
                        unit: None,
                    },
                    tok_span,
                );
                Some(Sem::Node(Node::new(
                    NodeKind::Binary {
                        op: BinOp::Pow,
                        lhs,
                        rhs,
                    },
                    span,
                )))
            }
            Action::Paren => {
                let _l = it.next();
                it.next()
            }
            Action::ValueNumber => {
                let (tok, _) = token(it.next()?)?;
                Some(Sem::Node(Node::new(
                    NodeKind::Value {
                        number: number_of(&tok)?,
                        unit: None,
                    },
                    span,
                )))
            }
            Action::ValueWithUnit => {
                let (tok, _) = token(it.next()?)?;
                let unit = unit(it.next()?)?;
                Some(Sem::Node(Node::new(
                    NodeKind::Value {
                        number: number_of(&tok)?,
                        unit: Some(unit),
                    },
                    span,
                )))
            }
            Action::CurrencySymValue => {
                let (sym, _) = token(it.next()?)?;
                let Token::CurrencySymbol(prefix) = sym else {
                    return None;
                };
                let (num, _) = token(it.next()?)?;
                Some(Sem::Node(Node::new(
                    NodeKind::CurrencyValue {
                        prefix,
                        number: number_of(&num)?,
                    },
                    span,
                )))
            }
            Action::CurrencyWordValue => {
                let prefix = ident_text(it.next()?)?;
                if !self.index.is_currency_prefix(&prefix) {
                    return None;
                }
                let (num, _) = token(it.next()?)?;
                Some(Sem::Node(Node::new(
                    NodeKind::CurrencyValue {
                        prefix,
                        number: number_of(&num)?,
                    },
                    span,
                )))
            }
            Action::CompositeBase => {
                let a = pair(it.next()?)?;
                let b = pair(it.next()?)?;
                Some(Sem::Node(Node::new(
                    NodeKind::Composite { parts: vec![a, b] },
                    span,
                )))
            }
            Action::CompositeExtend => {
                let base = node(it.next()?)?;
                let NodeKind::Composite { parts } = &base.kind else {
                    return None;
                };
                let extra = pair(it.next()?)?;
                let mut parts = parts.clone();
                parts.push(extra);
                Some(Sem::Node(Node::new(NodeKind::Composite { parts }, span)))
            }
            Action::CompositePair => {
                let (num, num_span) = token(it.next()?)?;
                let factor = factor(it.next()?)?;
                Some(Sem::Pair(CompositePart {
                    number: number_of(&num)?,
                    factor,
                    span: num_span.merge(span),
                }))
            }
            Action::FnCallArgs => {
                let name = ident_text(it.next()?)?;
                let _l = it.next();
                let args = args(it.next()?)?;
                Some(Sem::Node(Node::new(
                    NodeKind::FunctionCall { name, args },
                    span,
                )))
            }
            Action::FnCallEmpty => {
                let name = ident_text(it.next()?)?;
                Some(Sem::Node(Node::new(
                    NodeKind::FunctionCall {
                        name,
                        args: Vec::new(),
                    },
                    span,
                )))
            }
            Action::ArgsBase => {
                let first = node(it.next()?)?;
                Some(Sem::ArgsList(vec![first]))
            }
            Action::ArgsExtend => {
                let mut list = args(it.next()?)?;
                let _comma = it.next();
                list.push(node(it.next()?)?);
                Some(Sem::ArgsList(list))
            }
            Action::Boolean(b) => Some(Sem::Node(Node::new(NodeKind::Boolean(b), span))),
            Action::KwNow => Some(Sem::Node(Node::new(NodeKind::Now, span))),
            Action::KwToday => Some(Sem::Node(Node::new(NodeKind::Today, span))),
            Action::KwYesterday => Some(Sem::Node(Node::new(NodeKind::Yesterday, span))),
            Action::KwTomorrow => Some(Sem::Node(Node::new(NodeKind::Tomorrow, span))),
            Action::Ago => {
                let value = node(it.next()?)?;
                Some(Sem::Node(Node::new(NodeKind::Ago { value }, span)))
            }
            Action::FromNow => {
                let value = node(it.next()?)?;
                Some(Sem::Node(Node::new(NodeKind::FromNow { value }, span)))
            }
            Action::Unix => {
                let value = node(it.next()?)?;
                Some(Sem::Node(Node::new(NodeKind::Unix { value }, span)))
            }
            Action::VariableRef => {
                let name = ident_text(it.next()?)?;
                Some(Sem::Node(Node::new(NodeKind::Variable(name), span)))
            }
            Action::ConstantRef => {
                let name = ident_text(it.next()?)?;
                if !self.index.constants().contains(&name) {
                    return None;
                }
                Some(Sem::Node(Node::new(NodeKind::Constant(name), span)))
            }
            Action::DateLit => {
                let (tok, _) = token(it.next()?)?;
                let Token::Date { year, month, day } = tok else {
                    return None;
                };
                Some(Sem::Node(Node::new(NodeKind::Date { year, month, day }, span)))
            }
            Action::DateTimeLit | Action::DateTimeZoned => {
                let (d, _) = token(it.next()?)?;
                let (t, _) = token(it.next()?)?;
                let Token::Date { year, month, day } = d else {
                    return None;
                };
                let Token::Time {
                    hour,
                    minute,
                    second,
                } = t
                else {
                    return None;
                };
                let zone = match it.next() {
                    Some(sem) => Some(words(sem)?.0.join(" ")),
                    None => None,
                };
                Some(Sem::Node(Node::new(
                    NodeKind::DateTime {
                        year,
                        month,
                        day,
                        hour,
                        minute,
                        second,
                        zone,
                    },
                    span,
                )))
            }
            Action::DateZoned => {
                let (d, _) = token(it.next()?)?;
                let Token::Date { year, month, day } = d else {
                    return None;
                };
                let zone = Some(words(it.next()?)?.0.join(" "));
                Some(Sem::Node(Node::new(
                    NodeKind::DateTime {
                        year,
                        month,
                        day,
                        hour: 0,
                        minute: 0,
                        second: 0,
                        zone,
                    },
                    span,
                )))
            }
            Action::TimeLit => {
                let (tok, _) = token(it.next()?)?;
                let Token::Time {
                    hour,
                    minute,
                    second,
                } = tok
                else {
                    return None;
                };
                Some(Sem::Node(Node::new(
                    NodeKind::Time {
                        hour,
                        minute,
                        second,
                    },
                    span,
                )))
            }
            Action::TargetUnit => {
                let unit = unit(it.next()?)?;
                Some(Sem::Target(Target::Unit(unit)))
            }
            Action::TargetComposite => {
                let factors = factors(it.next()?)?;
                Some(Sem::Target(Target::Composite(factors)))
            }
            Action::TargetTimezone => {
                let (ws, _) = words(it.next()?)?;
                Some(Sem::Target(Target::Timezone(ws.join(" "))))
            }
            Action::TargetFormat(fmt) => Some(Sem::Target(Target::Format(fmt))),
            Action::TargetBase => {
                let _kw = it.next();
                let (num, _) = token(it.next()?)?;
                let n = integer_of(&num)?;
                Some(Sem::Target(Target::Format(FormatTarget::Base(n))))
            }
            Action::TargetDecimals => {
                let (num, _) = token(it.next()?)?;
                let n = integer_of(&num)?;
                Some(Sem::Target(Target::Format(FormatTarget::Decimals(n))))
            }
            Action::TargetSigFigs => {
                let (num, _) = token(it.next()?)?;
                let n = integer_of(&num)?;
                Some(Sem::Target(Target::Format(FormatTarget::SigFigs(n))))
            }
            Action::UnitProductSingle => {
                let f = factor(it.next()?)?;
                Some(Sem::Unit(UnitExpr {
                    factors: vec![f],
                    span,
                }))
            }
            Action::UnitProductAdjacent => {
                let mut u = unit(it.next()?)?;
                u.factors.push(factor(it.next()?)?);
                u.span = span;
                Some(Sem::Unit(u))
            }
            Action::UnitProductMul => {
                let mut u = unit(it.next()?)?;
                let _star = it.next();
                u.factors.push(factor(it.next()?)?);
                u.span = span;
                Some(Sem::Unit(u))
            }
            Action::UnitProductDiv => {
                let mut u = unit(it.next()?)?;
                let _slash = it.next();
                let mut f = factor(it.next()?)?;
                f.exponent = -f.exponent;
                u.factors.push(f);
                u.span = span;
                Some(Sem::Unit(u))
            }
            Action::UnitFactorPlain => it.next(),
            Action::UnitFactorNamedPow(exponent) => {
                // Keyword-first (`square X`) or keyword-last (`X squared`).
                let mut f = it.find_map(|sem| factor(sem))?;
                f.exponent = exponent;
                f.span = span;
                Some(Sem::Factor(f))
            }
            Action::UnitFactorSuperscript => {
                let mut f = factor(it.next()?)?;
                let (tok, _) = token(it.next()?)?;
                let Token::Superscript(exp) = tok else {
                    return None;
                };
                f.exponent = exp;
                f.span = span;
                Some(Sem::Factor(f))
            }
            Action::UnitFactorCaret => {
                let mut f = factor(it.next()?)?;
                let _caret = it.next();
                let (num, _) = token(it.next()?)?;
                let exp = integer_of(&num)?;
                if exp > 12 {
                    return None;
                }
                f.exponent = exp as i32;
                f.span = span;
                Some(Sem::Factor(f))
            }
            Action::UnitTermWords => {
                let (ws, word_span) = words(it.next()?)?;
                Some(Sem::Factor(UnitFactor {
                    spelling: UnitSpelling::Words(ws),
                    exponent: 1,
                    span: word_span,
                }))
            }
            Action::UnitTermDegree => Some(Sem::Factor(UnitFactor {
                spelling: UnitSpelling::Degree(None),
                exponent: 1,
                span,
            })),
            Action::UnitTermDegreeWord => {
                let _deg = it.next();
                let (tok, _) = token(it.next()?)?;
                let word = tok.word()?.to_string();
                if !self.index.is_unit_word(&format!("°{word}")) {
                    return None;
                }
                Some(Sem::Factor(UnitFactor {
                    spelling: UnitSpelling::Degree(Some(word)),
                    exponent: 1,
                    span,
                }))
            }
            Action::UnitTermPrime => Some(Sem::Factor(UnitFactor {
                spelling: UnitSpelling::Prime,
                exponent: 1,
                span,
            })),
            Action::UnitTermDoublePrime => Some(Sem::Factor(UnitFactor {
                spelling: UnitSpelling::DoublePrime,
                exponent: 1,
                span,
            })),
            Action::UnitWords1 => {
                let (tok, tok_span) = token(it.next()?)?;
                let word = tok.word()?.to_string();
                Some(Sem::Words(vec![word], tok_span))
            }
            Action::UnitWordsN => {
                let mut ws = Vec::new();
                let mut word_span: Option<Span> = None;
                for sem in it {
                    let (tok, tok_span) = token(sem)?;
                    ws.push(tok.word()?.to_string());
                    word_span = Some(match word_span {
                        Some(s) => s.merge(tok_span),
                        None => tok_span,
                    });
                }
                let refs: Vec<&str> = ws.iter().map(String::as_str).collect();
                if self.index.unit_by_words(&refs).is_none()
                    && self.index.currency_by_words(&refs).is_none()
                {
                    return None;
                }
                Some(Sem::Words(ws, word_span?))
            }
            Action::TzWords => {
                let mut ws = Vec::new();
                let mut word_span: Option<Span> = None;
                for sem in it {
                    let (tok, tok_span) = token(sem)?;
                    ws.push(tok.word()?.to_string());
                    word_span = Some(match word_span {
                        Some(s) => s.merge(tok_span),
                        None => tok_span,
                    });
                }
                let joined = ws.join(" ");
                if self.index.timezones().resolve(&joined, None).is_none() {
                    return None;
                }
                Some(Sem::Words(ws, word_span?))
            }
            Action::TargetUnitsBase => {
                let a = factor(it.next()?)?;
                let b = factor(it.next()?)?;
                Some(Sem::Factors(vec![a, b]))
            }
            Action::TargetUnitsExtend => {
                let mut fs = factors(it.next()?)?;
                fs.push(factor(it.next()?)?);
                Some(Sem::Factors(fs))
            }
        }
    }
}

// ---- destructuring helpers ----

fn node(sem: Sem) -> Option<NodeRef> {
    match sem {
        Sem::Node(n) => Some(n),
        _ => None,
    }
}

fn unit(sem: Sem) -> Option<UnitExpr> {
    match sem {
        Sem::Unit(u) => Some(u),
        _ => None,
    }
}

fn factor(sem: Sem) -> Option<UnitFactor> {
    match sem {
        Sem::Factor(f) => Some(f),
        _ => None,
    }
}

fn factors(sem: Sem) -> Option<Vec<UnitFactor>> {
    match sem {
        Sem::Factors(fs) => Some(fs),
        _ => None,
    }
}

fn pair(sem: Sem) -> Option<CompositePart> {
    match sem {
        Sem::Pair(p) => Some(p),
        _ => None,
    }
}

fn words(sem: Sem) -> Option<(Vec<String>, Span)> {
    match sem {
        Sem::Words(ws, span) => Some((ws, span)),
        _ => None,
    }
}

fn target(sem: Sem) -> Option<Target> {
    match sem {
        Sem::Target(t) => Some(t),
        _ => None,
    }
}

fn args(sem: Sem) -> Option<Vec<NodeRef>> {
    match sem {
        Sem::ArgsList(list) => Some(list),
        _ => None,
    }
}

fn token(sem: Sem) -> Option<(Token, Span)> {
    match sem {
        Sem::Tok(tok, span) => Some((tok, span)),
        _ => None,
    }
}

fn ident_text(sem: Sem) -> Option<String> {
    match sem {
        Sem::Tok(Token::Ident(name), _) => Some(name),
        _ => None,
    }
}

fn number_of(tok: &Token) -> Option<f64> {
    match tok {
        Token::Number(x) => Some(*x),
        Token::BasedNumber { value, .. } => Some(*value as f64),
        _ => None,
    }
}

/// Non-negative integer value of a number token.
fn integer_of(tok: &Token) -> Option<u32> {
    let x = number_of(tok)?;
    if x < 0.0 || x.fract() != 0.0 || x > u32::MAX as f64 {
        return None;
    }
    Some(x as u32)
}
