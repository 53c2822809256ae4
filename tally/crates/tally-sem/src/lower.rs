//! Parse tree → evaluation AST.
//!
//! The normalizer owns name resolution: unit spellings to canonical
//! unit ids (with user-defined dimensions as the fallback), currency
//! prefixes to codes or synthetic ambiguous dimensions, timezone
//! aliases to IANA ids, constants to their values, and keyword
//! temporals to explicit forms. It is total - anything unresolvable
//! becomes a user-defined unit and fails later, at evaluation, with a
//! proper span.

use tally_data::{ReferenceIndex, UnitId};
use tally_par::tree::{
    CompositePart, FormatTarget, Node, NodeKind, NodeRef, Target, UnitExpr, UnitFactor,
    UnitSpelling,
};
use tally_par::{BinOp as PBinOp, PostOp, UnOp as PUnOp};
use tally_util::Span;

use crate::ast::{
    BinOp, ConvTarget, Expr, ExprKind, FormatSpec, TemporalField, UnOp, UnitPow, UnitRef,
};

/// The lowering context: the reference index plus the user territory
/// used for timezone alias preference. Passed explicitly - nothing
/// here is global.
pub struct Normalizer<'a> {
    index: &'a ReferenceIndex,
    territory: Option<&'a str>,
}

impl<'a> Normalizer<'a> {
    pub fn new(index: &'a ReferenceIndex, territory: Option<&'a str>) -> Self {
        Self { index, territory }
    }

    /// Lower one selected parse tree.
    pub fn lower(&self, node: &Node) -> Expr {
        let span = node.span;
        match &node.kind {
            NodeKind::Assignment { name, value } => Expr::new(
                ExprKind::Assignment {
                    name: name.clone(),
                    value: Box::new(self.lower(value)),
                },
                span,
            ),
            NodeKind::Conditional {
                cond,
                then,
                otherwise,
            } => Expr::new(
                ExprKind::Conditional {
                    cond: Box::new(self.lower(cond)),
                    then: Box::new(self.lower(then)),
                    otherwise: Box::new(self.lower(otherwise)),
                },
                span,
            ),
            NodeKind::Conversion { expr, target, .. } => Expr::new(
                ExprKind::Convert {
                    expr: Box::new(self.lower(expr)),
                    target: self.lower_target(target),
                },
                span,
            ),
            NodeKind::Binary { op, lhs, rhs } => Expr::new(
                ExprKind::Binary {
                    op: lower_binop(*op),
                    lhs: Box::new(self.lower(lhs)),
                    rhs: Box::new(self.lower(rhs)),
                },
                span,
            ),
            NodeKind::Unary { op, expr } => Expr::new(
                ExprKind::Unary {
                    op: match op {
                        PUnOp::Neg => UnOp::Neg,
                        PUnOp::Not => UnOp::Not,
                        PUnOp::BitNot => UnOp::BitNot,
                    },
                    expr: Box::new(self.lower(expr)),
                },
                span,
            ),
            NodeKind::Postfix { op, expr } => {
                let inner = Box::new(self.lower(expr));
                let kind = match op {
                    PostOp::Factorial => ExprKind::Factorial(inner),
                    PostOp::Percent => ExprKind::Percent(inner),
                    PostOp::Permille => ExprKind::Permille(inner),
                };
                Expr::new(kind, span)
            }
            NodeKind::Value { number, unit } => Expr::new(
                ExprKind::Quantity {
                    value: *number,
                    units: match unit {
                        Some(unit) => self.resolve_unit_expr(unit),
                        None => Vec::new(),
                    },
                },
                span,
            ),
            NodeKind::CurrencyValue { prefix, number } => Expr::new(
                ExprKind::Quantity {
                    value: *number,
                    units: vec![UnitPow::new(self.resolve_currency_prefix(prefix), 1)],
                },
                span,
            ),
            NodeKind::Composite { parts } => Expr::new(
                ExprKind::Composite {
                    parts: self.lower_composite(parts),
                },
                span,
            ),
            NodeKind::FunctionCall { name, args } => Expr::new(
                ExprKind::Call {
                    name: name.to_lowercase(),
                    args: args.iter().map(|a| self.lower(a)).collect(),
                },
                span,
            ),
            NodeKind::Boolean(b) => Expr::new(ExprKind::Bool(*b), span),
            NodeKind::Variable(name) => Expr::new(ExprKind::Var(name.clone()), span),
            NodeKind::Constant(name) => {
                let value = self.index.constants().lookup(name).unwrap_or(f64::NAN);
                Expr::new(
                    ExprKind::Quantity {
                        value,
                        units: Vec::new(),
                    },
                    span,
                )
            }
            NodeKind::Date { year, month, day } => Expr::new(
                ExprKind::Date {
                    year: *year,
                    month: *month,
                    day: *day,
                },
                span,
            ),
            NodeKind::Time {
                hour,
                minute,
                second,
            } => Expr::new(
                ExprKind::Time {
                    hour: *hour,
                    minute: *minute,
                    second: *second,
                },
                span,
            ),
            NodeKind::DateTime {
                year,
                month,
                day,
                hour,
                minute,
                second,
                zone,
            } => Expr::new(
                ExprKind::DateTime {
                    year: *year,
                    month: *month,
                    day: *day,
                    hour: *hour,
                    minute: *minute,
                    second: *second,
                    zone: zone.as_deref().map(|z| self.resolve_zone(z)),
                },
                span,
            ),
            NodeKind::Now | NodeKind::Today => Expr::new(ExprKind::Now, span),
            NodeKind::Yesterday => Expr::new(
                ExprKind::Ago(Box::new(self.one_day(span))),
                span,
            ),
            NodeKind::Tomorrow => Expr::new(
                ExprKind::FromNow(Box::new(self.one_day(span))),
                span,
            ),
            NodeKind::Ago { value } => {
                Expr::new(ExprKind::Ago(Box::new(self.lower(value))), span)
            }
            NodeKind::FromNow { value } => {
                Expr::new(ExprKind::FromNow(Box::new(self.lower(value))), span)
            }
            NodeKind::Unix { value } => {
                Expr::new(ExprKind::UnixEpoch(Box::new(self.lower(value))), span)
            }
        }
    }

    /// `1 day`, for `yesterday`/`tomorrow`.
    fn one_day(&self, span: Span) -> Expr {
        let unit = self
            .index
            .unit_by_id("day")
            .map(UnitRef::Known)
            .unwrap_or_else(|| UnitRef::UserDefined("day".to_string()));
        Expr::new(
            ExprKind::Quantity {
                value: 1.0,
                units: vec![UnitPow::new(unit, 1)],
            },
            span,
        )
    }

    // ---- unit resolution ----

    /// Resolve a unit product into combined, ordered terms.
    pub fn resolve_unit_expr(&self, unit: &UnitExpr) -> Vec<UnitPow> {
        let mut terms: Vec<UnitPow> = Vec::new();
        for factor in &unit.factors {
            let unit_ref = self.resolve_factor(factor, false);
            merge_term(&mut terms, UnitPow::new(unit_ref, factor.exponent));
        }
        terms.retain(|t| t.exponent != 0);
        // Numerator terms first; source order otherwise.
        terms.sort_by_key(|t| t.exponent < 0);
        terms
    }

    /// Resolve composite-value parts, tracking the degree context that
    /// commits `′`/`″` to arc units instead of feet and inches.
    fn lower_composite(&self, parts: &[CompositePart]) -> Vec<(f64, UnitPow)> {
        let mut degree_seen = false;
        let mut out = Vec::with_capacity(parts.len());
        for part in parts {
            let unit_ref = self.resolve_factor(&part.factor, degree_seen);
            degree_seen |= matches!(part.factor.spelling, UnitSpelling::Degree(None));
            out.push((part.number, UnitPow::new(unit_ref, part.factor.exponent)));
        }
        out
    }

    /// Resolve one factor's spelling.
    fn resolve_factor(&self, factor: &UnitFactor, degree_context: bool) -> UnitRef {
        match &factor.spelling {
            UnitSpelling::Words(words) => self.resolve_words(words),
            UnitSpelling::Degree(None) => self.known("degree"),
            UnitSpelling::Degree(Some(word)) => {
                let fused = format!("°{word}");
                match self.index.unit_by_exact(&fused) {
                    Some(id) => UnitRef::Known(id),
                    None => self
                        .index
                        .units_by_ci(&fused)
                        .first()
                        .map(|&id| UnitRef::Known(id))
                        .unwrap_or(UnitRef::UserDefined(fused)),
                }
            }
            UnitSpelling::Prime => {
                if degree_context {
                    self.known("arcminute")
                } else {
                    self.known("foot")
                }
            }
            UnitSpelling::DoublePrime => {
                if degree_context {
                    self.known("arcsecond")
                } else {
                    self.known("inch")
                }
            }
        }
    }

    fn known(&self, id: &str) -> UnitRef {
        self.index
            .unit_by_id(id)
            .map(UnitRef::Known)
            .unwrap_or_else(|| UnitRef::UserDefined(id.to_string()))
    }

    /// Resolve a word run: exact match, currency code/name,
    /// case-insensitive similarity, user-defined - in that order.
    pub fn resolve_words(&self, words: &[String]) -> UnitRef {
        if words.len() > 1 {
            let refs: Vec<&str> = words.iter().map(String::as_str).collect();
            if let Some(id) = self.index.unit_by_words(&refs) {
                return UnitRef::Known(id);
            }
            if let Some(code) = self.index.currency_by_words(&refs) {
                return UnitRef::Currency(code.to_string());
            }
            return UnitRef::UserDefined(words.join(" "));
        }
        let word = &words[0];

        if let Some(id) = self.index.unit_by_exact(word) {
            return UnitRef::Known(id);
        }
        if self.index.is_ambiguous_symbol(word) {
            return UnitRef::AmbiguousCurrency(word.clone());
        }
        if let Some(currency) = self.index.currency_by_code(word) {
            return UnitRef::Currency(currency.code.clone());
        }
        if let Some(code) = self.index.currency_by_name(word) {
            return UnitRef::Currency(code.to_string());
        }
        if let Some(code) = self.index.currency_by_spaced_symbol(word) {
            return UnitRef::Currency(code.to_string());
        }
        if let Some(id) = self.best_ci_match(word) {
            return UnitRef::Known(id);
        }
        UnitRef::UserDefined(word.clone())
    }

    /// Case-insensitive similarity: among all case-insensitive
    /// matches, the one whose display form shares the most leading
    /// characters with the input; ties break by registration order.
    fn best_ci_match(&self, word: &str) -> Option<UnitId> {
        let candidates = self.index.units_by_ci(word);
        let mut best: Option<(usize, UnitId)> = None;
        for &id in candidates {
            let unit = self.index.unit(id);
            let score = unit
                .spellings()
                .map(|s| shared_prefix_len(word, s))
                .max()
                .unwrap_or(0);
            match best {
                Some((incumbent, _)) if score <= incumbent => {}
                _ => best = Some((score, id)),
            }
        }
        best.map(|(_, id)| id)
    }

    fn resolve_currency_prefix(&self, prefix: &str) -> UnitRef {
        if self.index.is_ambiguous_symbol(prefix) {
            return UnitRef::AmbiguousCurrency(prefix.to_string());
        }
        if let Some(code) = self.index.currency_by_adjacent_symbol(prefix) {
            return UnitRef::Currency(code.to_string());
        }
        if let Some(code) = self.index.currency_by_spaced_symbol(prefix) {
            return UnitRef::Currency(code.to_string());
        }
        if let Some(currency) = self.index.currency_by_code(prefix) {
            return UnitRef::Currency(currency.code.clone());
        }
        if let Some(code) = self.index.currency_by_name(prefix) {
            return UnitRef::Currency(code.to_string());
        }
        UnitRef::AmbiguousCurrency(prefix.to_string())
    }

    fn resolve_zone(&self, name: &str) -> String {
        self.index
            .timezones()
            .resolve(name, self.territory)
            .unwrap_or(name)
            .to_string()
    }

    // ---- targets ----

    fn lower_target(&self, target: &Target) -> ConvTarget {
        match target {
            Target::Unit(unit) => {
                let terms = self.resolve_unit_expr(unit);
                if let Some(field) = self.time_field_target(unit, &terms) {
                    return ConvTarget::TimeField {
                        unit: terms.into_iter().next().expect("single term"),
                        field,
                    };
                }
                ConvTarget::Unit(terms)
            }
            Target::Composite(factors) => {
                let mut degree_seen = false;
                let mut parts = Vec::with_capacity(factors.len());
                for factor in factors {
                    let unit_ref = self.resolve_factor(factor, degree_seen);
                    degree_seen |= matches!(factor.spelling, UnitSpelling::Degree(None));
                    parts.push(UnitPow::new(unit_ref, factor.exponent));
                }
                ConvTarget::Composite(parts)
            }
            Target::Timezone(name) => ConvTarget::Timezone(self.resolve_zone(name)),
            Target::Format(fmt) => ConvTarget::Format(lower_format(*fmt)),
        }
    }

    /// A target that is a single known time unit spelled in the
    /// singular reads as a temporal property on temporal values.
    fn time_field_target(&self, unit: &UnitExpr, terms: &[UnitPow]) -> Option<TemporalField> {
        if terms.len() != 1 || terms[0].exponent != 1 {
            return None;
        }
        let UnitRef::Known(id) = &terms[0].unit else {
            return None;
        };
        if self.index.unit(*id).dimension != "time" {
            return None;
        }
        let [factor] = unit.factors.as_slice() else {
            return None;
        };
        let UnitSpelling::Words(words) = &factor.spelling else {
            return None;
        };
        let [word] = words.as_slice() else {
            return None;
        };
        TemporalField::from_word(word)
    }
}

/// Fold a term into the list, summing exponents of equal units.
fn merge_term(terms: &mut Vec<UnitPow>, term: UnitPow) {
    for existing in terms.iter_mut() {
        if existing.unit == term.unit {
            existing.exponent += term.exponent;
            return;
        }
    }
    terms.push(term);
}

fn shared_prefix_len(a: &str, b: &str) -> usize {
    a.chars().zip(b.chars()).take_while(|(x, y)| x == y).count()
}

fn lower_binop(op: PBinOp) -> BinOp {
    match op {
        PBinOp::Add => BinOp::Add,
        PBinOp::Sub => BinOp::Sub,
        PBinOp::Mul => BinOp::Mul,
        PBinOp::Div => BinOp::Div,
        PBinOp::Mod => BinOp::Mod,
        PBinOp::Pow => BinOp::Pow,
        PBinOp::LogicalOr => BinOp::LogicalOr,
        PBinOp::LogicalAnd => BinOp::LogicalAnd,
        PBinOp::BitOr => BinOp::BitOr,
        PBinOp::BitXor => BinOp::BitXor,
        PBinOp::BitAnd => BinOp::BitAnd,
        PBinOp::Shl => BinOp::Shl,
        PBinOp::Shr => BinOp::Shr,
        PBinOp::Lt => BinOp::Lt,
        PBinOp::Le => BinOp::Le,
        PBinOp::Gt => BinOp::Gt,
        PBinOp::Ge => BinOp::Ge,
        PBinOp::Eq => BinOp::Eq,
        PBinOp::Ne => BinOp::Ne,
    }
}

fn lower_format(fmt: FormatTarget) -> FormatSpec {
    match fmt {
        FormatTarget::Binary => FormatSpec::Binary,
        FormatTarget::Octal => FormatSpec::Octal,
        FormatTarget::Decimal => FormatSpec::Decimal,
        FormatTarget::Hexadecimal => FormatSpec::Hexadecimal,
        FormatTarget::Scientific => FormatSpec::Scientific,
        FormatTarget::Fraction => FormatSpec::Fraction,
        FormatTarget::Ordinal => FormatSpec::Ordinal,
        FormatTarget::Plain => FormatSpec::Plain,
        FormatTarget::Base(n) => FormatSpec::Base(n),
        FormatTarget::Decimals(n) => FormatSpec::Decimals(n),
        FormatTarget::SigFigs(n) => FormatSpec::SigFigs(n),
    }
}

/// Convenience: lower a selected candidate into the evaluation AST.
pub fn lower(node: &NodeRef, index: &ReferenceIndex, territory: Option<&str>) -> Expr {
    Normalizer::new(index, territory).lower(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;
    use tally_lex::Lexer;
    use tally_par::{parse_line, prune, select};

    fn lower_line(source: &str, index: &ReferenceIndex) -> Expr {
        let (tokens, diags) = Lexer::new(source, 1, 0).tokenize();
        assert!(!diags.has_errors());
        let defined = FxHashSet::default();
        let outcome = prune(parse_line(&tokens, index), &defined);
        let picked = select(&outcome.kept, index, &defined)
            .unwrap_or_else(|| panic!("no candidate for {source:?}"));
        lower(&picked, index, None)
    }

    fn unit_name(index: &ReferenceIndex, term: &UnitPow) -> String {
        match &term.unit {
            UnitRef::Known(id) => index.unit(*id).id.clone(),
            UnitRef::Currency(code) => code.clone(),
            UnitRef::AmbiguousCurrency(sym) => sym.clone(),
            UnitRef::UserDefined(name) => name.clone(),
        }
    }

    #[test]
    fn test_simple_unit_resolution() {
        let index = ReferenceIndex::builtin();
        let expr = lower_line("5 km", &index);
        let ExprKind::Quantity { value, units } = &expr.kind else {
            panic!("expected quantity");
        };
        assert_eq!(*value, 5.0);
        assert_eq!(units.len(), 1);
        assert_eq!(unit_name(&index, &units[0]), "kilometer");
    }

    #[test]
    fn test_case_insensitive_similarity() {
        let index = ReferenceIndex::builtin();
        let expr = lower_line("5 KM", &index);
        let ExprKind::Quantity { units, .. } = &expr.kind else {
            panic!("expected quantity");
        };
        assert_eq!(unit_name(&index, &units[0]), "kilometer");
    }

    #[test]
    fn test_unknown_unit_is_user_defined() {
        let index = ReferenceIndex::builtin();
        let expr = lower_line("5 flurbs", &index);
        let ExprKind::Quantity { units, .. } = &expr.kind else {
            panic!("expected quantity");
        };
        assert_eq!(units[0].unit, UnitRef::UserDefined("flurbs".into()));
    }

    #[test]
    fn test_derived_unit_denominator() {
        let index = ReferenceIndex::builtin();
        let expr = lower_line("60 km/h", &index);
        let ExprKind::Quantity { units, .. } = &expr.kind else {
            panic!("expected quantity");
        };
        assert_eq!(units.len(), 2);
        assert_eq!(unit_name(&index, &units[0]), "kilometer");
        assert_eq!(units[0].exponent, 1);
        assert_eq!(unit_name(&index, &units[1]), "hour");
        assert_eq!(units[1].exponent, -1);
    }

    #[test]
    fn test_superscript_exponent() {
        let index = ReferenceIndex::builtin();
        let expr = lower_line("10 m²", &index);
        let ExprKind::Quantity { units, .. } = &expr.kind else {
            panic!("expected quantity");
        };
        assert_eq!(units[0].exponent, 2);
    }

    #[test]
    fn test_named_power() {
        let index = ReferenceIndex::builtin();
        let expr = lower_line("10 square meters", &index);
        let ExprKind::Quantity { units, .. } = &expr.kind else {
            panic!("expected quantity, got {:?}", expr.kind);
        };
        assert_eq!(unit_name(&index, &units[0]), "meter");
        assert_eq!(units[0].exponent, 2);
        let expr = lower_line("2 m cubed", &index);
        let ExprKind::Quantity { units, .. } = &expr.kind else {
            panic!("expected quantity");
        };
        assert_eq!(units[0].exponent, 3);
    }

    #[test]
    fn test_composite_degree_context() {
        let index = ReferenceIndex::builtin();
        let expr = lower_line("5° 30′", &index);
        let ExprKind::Composite { parts } = &expr.kind else {
            panic!("expected composite, got {:?}", expr.kind);
        };
        assert_eq!(unit_name(&index, &parts[0].1), "degree");
        assert_eq!(unit_name(&index, &parts[1].1), "arcminute");
    }

    #[test]
    fn test_composite_without_degree_is_feet_inches() {
        let index = ReferenceIndex::builtin();
        let expr = lower_line("5′ 7″", &index);
        let ExprKind::Composite { parts } = &expr.kind else {
            panic!("expected composite, got {:?}", expr.kind);
        };
        assert_eq!(unit_name(&index, &parts[0].1), "foot");
        assert_eq!(unit_name(&index, &parts[1].1), "inch");
    }

    #[test]
    fn test_currency_prefix_expansion() {
        let index = ReferenceIndex::builtin();
        let expr = lower_line("USD 100", &index);
        let ExprKind::Quantity { value, units } = &expr.kind else {
            panic!("expected quantity");
        };
        assert_eq!(*value, 100.0);
        assert_eq!(units[0].unit, UnitRef::Currency("USD".into()));

        let expr = lower_line("US$100", &index);
        let ExprKind::Quantity { units, .. } = &expr.kind else {
            panic!("expected quantity");
        };
        assert_eq!(units[0].unit, UnitRef::Currency("USD".into()));
    }

    #[test]
    fn test_ambiguous_symbol_stays_ambiguous() {
        let index = ReferenceIndex::builtin();
        let expr = lower_line("$100", &index);
        let ExprKind::Quantity { units, .. } = &expr.kind else {
            panic!("expected quantity");
        };
        assert_eq!(units[0].unit, UnitRef::AmbiguousCurrency("$".into()));
    }

    #[test]
    fn test_constant_resolution() {
        let index = ReferenceIndex::builtin();
        let expr = lower_line("pi", &index);
        let ExprKind::Quantity { value, units } = &expr.kind else {
            panic!("expected quantity, got {:?}", expr.kind);
        };
        assert_eq!(*value, std::f64::consts::PI);
        assert!(units.is_empty());
    }

    #[test]
    fn test_time_field_target() {
        let index = ReferenceIndex::builtin();
        let expr = lower_line("now to year", &index);
        let ExprKind::Convert { target, .. } = &expr.kind else {
            panic!("expected convert, got {:?}", expr.kind);
        };
        assert!(matches!(
            target,
            ConvTarget::TimeField {
                field: TemporalField::Year,
                ..
            }
        ));
    }

    #[test]
    fn test_plural_time_unit_is_not_a_field() {
        let index = ReferenceIndex::builtin();
        let expr = lower_line("1 h to minutes", &index);
        let ExprKind::Convert { target, .. } = &expr.kind else {
            panic!("expected convert");
        };
        assert!(matches!(target, ConvTarget::Unit(_)));
    }

    #[test]
    fn test_timezone_alias_resolution() {
        let index = ReferenceIndex::builtin();
        let expr = lower_line("now to UTC", &index);
        let ExprKind::Convert { target, .. } = &expr.kind else {
            panic!("expected convert");
        };
        assert_eq!(target, &ConvTarget::Timezone("Etc/UTC".into()));
    }

    #[test]
    fn test_zoned_literal_resolution() {
        let index = ReferenceIndex::builtin();
        let expr = lower_line("2038-01-19 03:14:07 UTC", &index);
        let ExprKind::DateTime { zone, .. } = &expr.kind else {
            panic!("expected datetime");
        };
        assert_eq!(zone.as_deref(), Some("Etc/UTC"));
    }

    #[test]
    fn test_yesterday_lowering() {
        let index = ReferenceIndex::builtin();
        let expr = lower_line("yesterday", &index);
        let ExprKind::Ago(inner) = &expr.kind else {
            panic!("expected ago, got {:?}", expr.kind);
        };
        let ExprKind::Quantity { value, units } = &inner.kind else {
            panic!("expected quantity");
        };
        assert_eq!(*value, 1.0);
        assert_eq!(unit_name(&index, &units[0]), "day");
    }

    #[test]
    fn test_exponent_merge() {
        let index = ReferenceIndex::builtin();
        // m * m collapses to m².
        let expr = lower_line("3 m m", &index);
        let ExprKind::Quantity { units, .. } = &expr.kind else {
            panic!("expected quantity");
        };
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].exponent, 2);
    }
}
