//! The expression walker.

use tally_data::{RatesSnapshot, ReferenceIndex, Region};
use tally_sem::{Expr, ExprKind};
use tally_util::{AngleUnit, Span};

use crate::arith;
use crate::convert;
use crate::functions;
use crate::temporal::{zone_of, Instant, PlainDate, PlainDateTime, PlainTime, ZonedDateTime};
use crate::value::{ErrorKind, Value};
use crate::units::UnitCx;

/// Everything one evaluation needs, passed by reference. `now` is
/// fixed by the caller per document run, so a document is a pure
/// function of its inputs.
pub struct EvalCx<'a> {
    pub index: &'a ReferenceIndex,
    pub region: Region,
    pub rates: Option<&'a RatesSnapshot>,
    pub angle_unit: AngleUnit,
    pub now: Instant,
}

impl<'a> EvalCx<'a> {
    pub fn units(&self) -> UnitCx<'a> {
        UnitCx {
            index: self.index,
            region: self.region,
            rates: self.rates,
        }
    }
}

/// Variable lookup, provided by the document orchestrator.
pub trait VarScope {
    fn lookup(&self, name: &str) -> Option<Value>;
}

impl VarScope for rustc_hash::FxHashMap<String, Value> {
    fn lookup(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

/// Evaluate one normalized expression bottom-up. Never panics; every
/// failure is an [`Value::Error`] that propagates through operators.
pub fn evaluate(expr: &Expr, cx: &EvalCx<'_>, scope: &dyn VarScope) -> Value {
    let span = expr.span;
    match &expr.kind {
        ExprKind::Quantity { value, units } => Value::from_terms(*value, units.clone()),
        ExprKind::Composite { parts } => composite(parts, cx, span),
        ExprKind::Assignment { value, .. } => evaluate(value, cx, scope),
        ExprKind::Conditional {
            cond,
            then,
            otherwise,
        } => match evaluate(cond, cx, scope) {
            Value::Bool(true) => evaluate(then, cx, scope),
            Value::Bool(false) => evaluate(otherwise, cx, scope),
            Value::Error(e) => Value::Error(e),
            _ => Value::error(ErrorKind::DomainError, "condition must be a boolean", span),
        },
        ExprKind::Convert { expr, target } => {
            let inner = evaluate(expr, cx, scope);
            convert::convert(inner, target, cx, span)
        }
        ExprKind::Binary { op, lhs, rhs } => {
            let lhs = evaluate(lhs, cx, scope);
            let rhs = evaluate(rhs, cx, scope);
            arith::binary(*op, lhs, rhs, cx, span)
        }
        ExprKind::Unary { op, expr } => {
            let value = evaluate(expr, cx, scope);
            arith::unary(*op, value, span)
        }
        ExprKind::Factorial(inner) => factorial(evaluate(inner, cx, scope), span),
        ExprKind::Percent(inner) => scale(evaluate(inner, cx, scope), 0.01, span),
        ExprKind::Permille(inner) => scale(evaluate(inner, cx, scope), 0.001, span),
        ExprKind::Call { name, args } => {
            let args: Vec<Value> = args.iter().map(|a| evaluate(a, cx, scope)).collect();
            functions::call(name, args, cx, span)
        }
        ExprKind::Bool(b) => Value::Bool(*b),
        ExprKind::Var(name) => match scope.lookup(name) {
            Some(value) => value,
            None => Value::error(
                ErrorKind::UnknownVariable,
                format!("unknown variable `{name}`"),
                span,
            ),
        },
        ExprKind::Date { year, month, day } => {
            match PlainDate::new(*year, *month as u32, *day as u32) {
                Some(date) => Value::Date(date),
                None => Value::error(
                    ErrorKind::DomainError,
                    format!("invalid date {year:04}-{month:02}-{day:02}"),
                    span,
                ),
            }
        }
        ExprKind::Time {
            hour,
            minute,
            second,
        } => match PlainTime::new(*hour as u32, *minute as u32, *second as u32, 0) {
            Some(time) => Value::Time(time),
            None => Value::error(ErrorKind::DomainError, "invalid time", span),
        },
        ExprKind::DateTime {
            year,
            month,
            day,
            hour,
            minute,
            second,
            zone,
        } => {
            let (Some(date), Some(time)) = (
                PlainDate::new(*year, *month as u32, *day as u32),
                PlainTime::new(*hour as u32, *minute as u32, *second as u32, 0),
            ) else {
                return Value::error(ErrorKind::DomainError, "invalid date-time", span);
            };
            let datetime = PlainDateTime::new(date, time);
            match zone {
                None => Value::DateTime(datetime),
                Some(zone) => {
                    if zone_of(zone).is_none() {
                        return Value::error(
                            ErrorKind::TimezoneUnknown,
                            format!("unknown timezone `{zone}`"),
                            span,
                        );
                    }
                    Value::Zoned(ZonedDateTime::new(datetime, zone))
                }
            }
        }
        ExprKind::Now => Value::Instant(cx.now),
        ExprKind::Ago(inner) => relative(evaluate(inner, cx, scope), true, cx, span),
        ExprKind::FromNow(inner) => relative(evaluate(inner, cx, scope), false, cx, span),
        ExprKind::UnixEpoch(inner) => unix_epoch(evaluate(inner, cx, scope), cx, span),
    }
}

/// Composite literal: every component must share one dimension.
fn composite(parts: &[(f64, tally_sem::UnitPow)], cx: &EvalCx<'_>, span: Span) -> Value {
    let units = cx.units();
    let first = units.signature(std::slice::from_ref(&parts[0].1));
    for (_, unit) in &parts[1..] {
        if units.signature(std::slice::from_ref(unit)) != first {
            return Value::error(
                ErrorKind::DimensionMismatch,
                "composite components must share a dimension",
                span,
            );
        }
    }
    Value::Composite {
        parts: parts.to_vec(),
    }
}

fn factorial(value: Value, span: Span) -> Value {
    if value.is_error() {
        return value;
    }
    let Value::Number { value: x, unit: None } = value.unformatted() else {
        return Value::error(
            ErrorKind::DomainError,
            "factorial expects a plain non-negative integer",
            span,
        );
    };
    if *x < 0.0 || x.fract() != 0.0 || *x > 170.0 {
        return Value::error(
            ErrorKind::DomainError,
            "factorial expects an integer in 0..=170",
            span,
        );
    }
    let mut result = 1.0;
    for k in 2..=(*x as u64) {
        result *= k as f64;
    }
    Value::number(result)
}

fn scale(value: Value, factor: f64, span: Span) -> Value {
    if value.is_error() {
        return value;
    }
    match value.unformatted() {
        Value::Number { value, unit } => Value::Number {
            value: value * factor,
            unit: unit.clone(),
        },
        Value::Derived { value, terms } => Value::Derived {
            value: value * factor,
            terms: terms.clone(),
        },
        _ => Value::error(ErrorKind::DomainError, "expected a quantity", span),
    }
}

/// `x ago` / `x from now`: shift the current instant by a span.
fn relative(value: Value, backwards: bool, cx: &EvalCx<'_>, span: Span) -> Value {
    if value.is_error() {
        return value;
    }
    let units = cx.units();
    let Some(delta) = arith::as_duration(value.unformatted(), &units) else {
        return Value::error(
            ErrorKind::DomainError,
            "expected a time span (e.g. `2 days`)",
            span,
        );
    };
    let delta = if backwards { delta.negated() } else { delta };
    arith::temporal_plus(Value::Instant(cx.now), delta, cx, span)
}

/// `x unix`: an instant from an epoch count. Bare numbers are
/// seconds; a time unit rescales.
fn unix_epoch(value: Value, cx: &EvalCx<'_>, span: Span) -> Value {
    if value.is_error() {
        return value;
    }
    let value = value.unformatted();
    let seconds = match value {
        Value::Number { value, unit: None } => *value,
        _ => {
            let units = cx.units();
            match arith::as_duration(value, &units) {
                Some(d) => d.total_ms() / 1000.0,
                None => {
                    return Value::error(
                        ErrorKind::DomainError,
                        "expected an epoch count",
                        span,
                    );
                }
            }
        }
    };
    Value::Instant(Instant::from_epoch_seconds(seconds))
}
