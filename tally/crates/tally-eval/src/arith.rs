//! Operator semantics.
//!
//! Dimensional algebra for the arithmetic operators, temporal
//! arithmetic where an operand is a date/time/duration, integer
//! semantics for the bit operators, and structural comparison. Every
//! function propagates `Error` operands unchanged.

use tally_sem::{BinOp, UnOp, UnitPow, UnitRef};
use tally_util::Span;

use crate::eval::EvalCx;
use crate::temporal::{
    instant_in_zone, local_to_instant, zone_of, Duration, Instant, PlainDateTime, PlainTime,
    ZonedDateTime,
};
use crate::units::UnitCx;
use crate::value::{ErrorKind, Value};

pub(crate) fn binary(op: BinOp, lhs: Value, rhs: Value, cx: &EvalCx<'_>, span: Span) -> Value {
    if lhs.is_error() {
        return lhs;
    }
    if rhs.is_error() {
        return rhs;
    }
    let lhs = lhs.unformatted().clone();
    let rhs = rhs.unformatted().clone();
    match op {
        BinOp::Add => add_sub(true, lhs, rhs, cx, span),
        BinOp::Sub => add_sub(false, lhs, rhs, cx, span),
        BinOp::Mul => multiply(lhs, rhs, cx, span),
        BinOp::Div => divide(lhs, rhs, cx, span),
        BinOp::Mod => modulo(lhs, rhs, cx, span),
        BinOp::Pow => power(lhs, rhs, span),
        BinOp::Shl | BinOp::Shr | BinOp::BitAnd | BinOp::BitOr | BinOp::BitXor => {
            integer_op(op, lhs, rhs, span)
        }
        BinOp::LogicalAnd | BinOp::LogicalOr => logical(op, lhs, rhs, span),
        BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge | BinOp::Eq | BinOp::Ne => {
            compare(op, lhs, rhs, cx, span)
        }
    }
}

pub(crate) fn unary(op: UnOp, value: Value, span: Span) -> Value {
    if value.is_error() {
        return value;
    }
    let value = value.unformatted().clone();
    match op {
        UnOp::Neg => match value {
            Value::Number { value, unit } => Value::Number {
                value: -value,
                unit,
            },
            Value::Derived { value, terms } => Value::Derived {
                value: -value,
                terms,
            },
            Value::Composite { parts } => Value::Composite {
                parts: parts.into_iter().map(|(x, u)| (-x, u)).collect(),
            },
            Value::Duration(d) => Value::Duration(d.negated()),
            other => type_error("cannot negate", &other, span),
        },
        UnOp::Not => match value {
            Value::Bool(b) => Value::Bool(!b),
            other => type_error("`!` expects a boolean", &other, span),
        },
        UnOp::BitNot => match as_integer(&value) {
            Some(n) => Value::number(!n as f64),
            None => type_error("`~` expects an integer", &value, span),
        },
    }
}

// ---- additive ----

fn add_sub(is_add: bool, lhs: Value, rhs: Value, cx: &EvalCx<'_>, span: Span) -> Value {
    let units = cx.units();

    // Temporal operands route to the temporal engine.
    if is_temporal(&lhs) || is_temporal(&rhs) || matches!(lhs, Value::Duration(_)) {
        return temporal_add_sub(is_add, lhs, rhs, cx, span);
    }
    if matches!(rhs, Value::Duration(_)) {
        // quantity ± duration: lift the quantity if it is a time span.
        return temporal_add_sub(is_add, lhs, rhs, cx, span);
    }

    match (&lhs, &rhs) {
        (Value::Composite { parts }, _) if rhs.is_quantity() => {
            composite_add(parts, &rhs, is_add, &units, span)
        }
        (_, Value::Composite { parts }) if lhs.is_quantity() => {
            // a + composite: fold the composite into the quantity side.
            let Some(total) = composite_as(parts, lhs.terms(), &units, span) else {
                return units
                    .mismatch_error(&composite_units(parts), lhs.terms(), span)
                    .into();
            };
            let x = lhs.magnitude().unwrap_or(0.0);
            let y = if is_add { x + total } else { x - total };
            Value::from_terms(y, lhs.terms().to_vec())
        }
        (Value::Composite { parts: a }, Value::Composite { parts: b }) => {
            composite_add_composite(a, b, is_add, &units, span)
        }
        _ if lhs.is_quantity() && rhs.is_quantity() => {
            let (x, y) = (lhs.magnitude().unwrap(), rhs.magnitude().unwrap());
            if let Some(err) = affine_add_violation(is_add, lhs.terms(), rhs.terms(), &units, span)
            {
                return err;
            }
            match units.convert(y, rhs.terms(), lhs.terms(), span) {
                Ok(converted) => {
                    let result = if is_add { x + converted } else { x - converted };
                    Value::from_terms(result, lhs.terms().to_vec())
                }
                Err(e) => Value::Error(e),
            }
        }
        _ => type_error(
            if is_add { "cannot add" } else { "cannot subtract" },
            &rhs,
            span,
        ),
    }
}

/// Adding two absolute temperatures is meaningless; subtracting them
/// is a difference and fine. A delta (kelvin or any linear unit)
/// combines with anything.
fn affine_add_violation(
    is_add: bool,
    lhs: &[UnitPow],
    rhs: &[UnitPow],
    cx: &UnitCx<'_>,
    span: Span,
) -> Option<Value> {
    if !is_add {
        return None;
    }
    let affine = |terms: &[UnitPow]| {
        matches!(terms, [t] if t.exponent == 1)
            && matches!(&terms[0].unit, UnitRef::Known(id) if cx.index.unit(*id).is_affine())
    };
    if affine(lhs) && affine(rhs) {
        return Some(Value::error(
            ErrorKind::DimensionMismatch,
            "cannot add two absolute temperatures; one side must be a difference (use kelvin)",
            span,
        ));
    }
    None
}

fn composite_units(parts: &[(f64, UnitPow)]) -> Vec<UnitPow> {
    parts.iter().map(|(_, u)| u.clone()).collect()
}

/// Total of a composite expressed in `target` terms.
fn composite_as(
    parts: &[(f64, UnitPow)],
    target: &[UnitPow],
    cx: &UnitCx<'_>,
    span: Span,
) -> Option<f64> {
    let mut total = 0.0;
    for (x, unit) in parts {
        total += cx
            .convert(*x, std::slice::from_ref(unit), target, span)
            .ok()?;
    }
    Some(total)
}

fn composite_add(
    parts: &[(f64, UnitPow)],
    rhs: &Value,
    is_add: bool,
    cx: &UnitCx<'_>,
    span: Span,
) -> Value {
    let first = std::slice::from_ref(&parts[0].1);
    let Some(total) = composite_as(parts, first, cx, span) else {
        return cx.mismatch_error(&composite_units(parts), first, span).into();
    };
    let y = match cx.convert(
        rhs.magnitude().unwrap_or(0.0),
        rhs.terms(),
        first,
        span,
    ) {
        Ok(y) => y,
        Err(e) => return Value::Error(e),
    };
    let sum = if is_add { total + y } else { total - y };
    redistribute(sum, parts, cx, span)
}

fn composite_add_composite(
    a: &[(f64, UnitPow)],
    b: &[(f64, UnitPow)],
    is_add: bool,
    cx: &UnitCx<'_>,
    span: Span,
) -> Value {
    let first = std::slice::from_ref(&a[0].1);
    let (Some(x), Some(y)) = (composite_as(a, first, cx, span), composite_as(b, first, cx, span))
    else {
        return cx
            .mismatch_error(&composite_units(a), &composite_units(b), span)
            .into();
    };
    redistribute(if is_add { x + y } else { x - y }, a, cx, span)
}

/// Distribute a total (in the units of `shape[0]`) back into the
/// composite's unit sequence: integer parts for all but the last.
pub(crate) fn redistribute(
    total: f64,
    shape: &[(f64, UnitPow)],
    cx: &UnitCx<'_>,
    span: Span,
) -> Value {
    let first = std::slice::from_ref(&shape[0].1);
    let sign = if total < 0.0 { -1.0 } else { 1.0 };
    let mut remaining = total.abs();
    let mut parts = Vec::with_capacity(shape.len());
    for (i, (_, unit)) in shape.iter().enumerate() {
        let unit_slice = std::slice::from_ref(unit);
        let in_unit = match cx.convert(remaining, first, unit_slice, span) {
            Ok(v) => v,
            Err(e) => return Value::Error(e),
        };
        if i + 1 == shape.len() {
            parts.push((sign * in_unit, unit.clone()));
        } else {
            let whole = in_unit.trunc();
            parts.push((sign * whole, unit.clone()));
            let back = match cx.convert(whole, unit_slice, first, span) {
                Ok(v) => v,
                Err(e) => return Value::Error(e),
            };
            remaining -= back;
        }
    }
    Value::Composite { parts }
}

// ---- multiplicative ----

fn multiply(lhs: Value, rhs: Value, _cx: &EvalCx<'_>, span: Span) -> Value {
    match (&lhs, &rhs) {
        (Value::Duration(d), _) if rhs.is_quantity() && rhs.terms().is_empty() => {
            return Value::Duration(d.scaled(rhs.magnitude().unwrap()));
        }
        (_, Value::Duration(d)) if lhs.is_quantity() && lhs.terms().is_empty() => {
            return Value::Duration(d.scaled(lhs.magnitude().unwrap()));
        }
        _ => {}
    }
    if !(lhs.is_quantity() && rhs.is_quantity()) {
        return type_error("cannot multiply", &rhs, span);
    }
    let value = lhs.magnitude().unwrap() * rhs.magnitude().unwrap();
    let mut terms = lhs.terms().to_vec();
    for term in rhs.terms() {
        merge_term(&mut terms, term.clone(), 1);
    }
    Value::from_terms(value, terms)
}

fn divide(lhs: Value, rhs: Value, _cx: &EvalCx<'_>, span: Span) -> Value {
    if let (Value::Duration(d), true) = (&lhs, rhs.is_quantity() && rhs.terms().is_empty()) {
        let k = rhs.magnitude().unwrap();
        if k == 0.0 {
            return Value::error(ErrorKind::DivisionByZero, "division by zero", span);
        }
        return Value::Duration(d.scaled(1.0 / k));
    }
    if !(lhs.is_quantity() && rhs.is_quantity()) {
        return type_error("cannot divide", &rhs, span);
    }
    let denominator = rhs.magnitude().unwrap();
    if denominator == 0.0 {
        return Value::error(ErrorKind::DivisionByZero, "division by zero", span);
    }
    let value = lhs.magnitude().unwrap() / denominator;
    let mut terms = lhs.terms().to_vec();
    for term in rhs.terms() {
        merge_term(&mut terms, term.clone(), -1);
    }
    Value::from_terms(value, terms)
}

/// Fold `term` (scaled by `sign` on the exponent) into the list.
/// Only identical units merge; `m * cm` keeps two terms and converts
/// later, through the signature, if a target asks for it.
fn merge_term(terms: &mut Vec<UnitPow>, term: UnitPow, sign: i32) {
    for existing in terms.iter_mut() {
        if existing.unit == term.unit {
            existing.exponent += sign * term.exponent;
            return;
        }
    }
    terms.push(UnitPow::new(term.unit, sign * term.exponent));
}

fn modulo(lhs: Value, rhs: Value, cx: &EvalCx<'_>, span: Span) -> Value {
    if !(lhs.is_quantity() && rhs.is_quantity()) {
        return type_error("`mod` expects quantities", &rhs, span);
    }
    let units = cx.units();
    let y = match units.convert(rhs.magnitude().unwrap(), rhs.terms(), lhs.terms(), span) {
        Ok(y) => y,
        Err(e) => return Value::Error(e),
    };
    if y == 0.0 {
        return Value::error(ErrorKind::DivisionByZero, "modulo by zero", span);
    }
    Value::from_terms(lhs.magnitude().unwrap() % y, lhs.terms().to_vec())
}

fn power(lhs: Value, rhs: Value, span: Span) -> Value {
    if !(lhs.is_quantity() && rhs.is_quantity()) {
        return type_error("`^` expects quantities", &rhs, span);
    }
    if !rhs.terms().is_empty() {
        return Value::error(
            ErrorKind::DomainError,
            "exponent must be dimensionless",
            span,
        );
    }
    let exp = rhs.magnitude().unwrap();
    let base = lhs.magnitude().unwrap();
    if lhs.terms().is_empty() {
        let value = base.powf(exp);
        if value.is_nan() {
            return Value::error(ErrorKind::DomainError, "result is not a number", span);
        }
        return Value::number(value);
    }
    // Unit exponents multiply; that only makes sense for integers.
    if exp.fract() != 0.0 {
        return Value::error(
            ErrorKind::DomainError,
            "cannot raise a quantity to a fractional power",
            span,
        );
    }
    let n = exp as i32;
    let terms = lhs
        .terms()
        .iter()
        .map(|t| UnitPow::new(t.unit.clone(), t.exponent * n))
        .collect();
    Value::from_terms(base.powi(n), terms)
}

fn integer_op(op: BinOp, lhs: Value, rhs: Value, span: Span) -> Value {
    let (Some(a), Some(b)) = (as_integer(&lhs), as_integer(&rhs)) else {
        return Value::error(
            ErrorKind::DomainError,
            "bitwise operators expect plain integers",
            span,
        );
    };
    let result = match op {
        BinOp::Shl => a.checked_shl(b as u32).unwrap_or(0),
        BinOp::Shr => a.checked_shr(b as u32).unwrap_or(0),
        BinOp::BitAnd => a & b,
        BinOp::BitOr => a | b,
        BinOp::BitXor => a ^ b,
        _ => unreachable!("not an integer operator"),
    };
    Value::number(result as f64)
}

fn logical(op: BinOp, lhs: Value, rhs: Value, span: Span) -> Value {
    let (Value::Bool(a), Value::Bool(b)) = (&lhs, &rhs) else {
        return Value::error(
            ErrorKind::DomainError,
            "logical operators expect booleans",
            span,
        );
    };
    Value::Bool(match op {
        BinOp::LogicalAnd => *a && *b,
        BinOp::LogicalOr => *a || *b,
        _ => unreachable!("not a logical operator"),
    })
}

// ---- comparison ----

fn compare(op: BinOp, lhs: Value, rhs: Value, cx: &EvalCx<'_>, span: Span) -> Value {
    use std::cmp::Ordering;

    let ordering: Option<Ordering> = match (&lhs, &rhs) {
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Duration(a), Value::Duration(b)) => {
            if a.comparison_key() == b.comparison_key() {
                Some(Ordering::Equal)
            } else {
                a.total_ms().partial_cmp(&b.total_ms())
            }
        }
        (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
        (Value::Time(a), Value::Time(b)) => Some(a.cmp(b)),
        (Value::DateTime(a), Value::DateTime(b)) => Some(a.cmp(b)),
        _ if is_instant_like(&lhs) && is_instant_like(&rhs) => {
            match (to_instant(&lhs), to_instant(&rhs)) {
                (Some(a), Some(b)) => Some(a.cmp(&b)),
                _ => None,
            }
        }
        _ if lhs.is_quantity() && rhs.is_quantity() => {
            let units = cx.units();
            match units.convert(rhs.magnitude().unwrap(), rhs.terms(), lhs.terms(), span) {
                Ok(converted) => lhs.magnitude().unwrap().partial_cmp(&converted),
                Err(_) => None,
            }
        }
        _ => None,
    };

    match ordering {
        Some(ordering) => Value::Bool(match op {
            BinOp::Lt => ordering == Ordering::Less,
            BinOp::Le => ordering != Ordering::Greater,
            BinOp::Gt => ordering == Ordering::Greater,
            BinOp::Ge => ordering != Ordering::Less,
            BinOp::Eq => ordering == Ordering::Equal,
            BinOp::Ne => ordering != Ordering::Equal,
            _ => unreachable!("not a comparison"),
        }),
        None => match op {
            // Structurally incomparable values are unequal, not an
            // error.
            BinOp::Eq => Value::Bool(false),
            BinOp::Ne => Value::Bool(true),
            _ => Value::error(
                ErrorKind::DimensionMismatch,
                "cannot order values of different kinds",
                span,
            ),
        },
    }
}

// ---- temporal routing ----

pub(crate) fn is_temporal(value: &Value) -> bool {
    matches!(
        value,
        Value::Date(_) | Value::Time(_) | Value::DateTime(_) | Value::Instant(_) | Value::Zoned(_)
    )
}

fn is_instant_like(value: &Value) -> bool {
    matches!(value, Value::Instant(_) | Value::Zoned(_))
}

fn to_instant(value: &Value) -> Option<Instant> {
    match value {
        Value::Instant(i) => Some(*i),
        Value::Zoned(z) => z.to_instant(),
        _ => None,
    }
}

/// A value usable as a duration: an explicit duration or a time-span
/// quantity.
pub(crate) fn as_duration(value: &Value, cx: &UnitCx<'_>) -> Option<Duration> {
    match value {
        Value::Duration(d) => Some(*d),
        Value::Number {
            value,
            unit: Some(unit),
        } if unit.exponent == 1 => {
            let id = cx.unit_id(&unit.unit)?;
            Duration::from_unit(id, *value)
        }
        Value::Composite { parts } => {
            let mut total = Duration::ZERO;
            for (x, unit) in parts {
                let id = cx.unit_id(&unit.unit)?;
                total = total.plus(&Duration::from_unit(id, *x)?);
            }
            Some(total)
        }
        _ => None,
    }
}

fn temporal_add_sub(is_add: bool, lhs: Value, rhs: Value, cx: &EvalCx<'_>, span: Span) -> Value {
    let units = cx.units();

    // temporal - temporal => duration
    if !is_add && is_temporal(&lhs) && is_temporal(&rhs) {
        return temporal_difference(lhs, rhs, span);
    }
    // duration ± duration-like
    if let Value::Duration(d) = &lhs {
        if let Some(delta) = as_duration(&rhs, &units) {
            let delta = if is_add { delta } else { delta.negated() };
            return Value::Duration(d.plus(&delta));
        }
        if is_temporal(&rhs) && is_add {
            return temporal_plus(rhs, *d, cx, span);
        }
        return type_error("cannot combine a duration with", &rhs, span);
    }
    // quantity ± duration => duration
    if let Value::Duration(d) = &rhs {
        if let Some(base) = as_duration(&lhs, &units) {
            let delta = if is_add { *d } else { d.negated() };
            return Value::Duration(base.plus(&delta));
        }
        return type_error("cannot combine a duration with", &lhs, span);
    }
    // temporal ± span
    if is_temporal(&lhs) {
        let Some(delta) = as_duration(&rhs, &units) else {
            if is_temporal(&rhs) {
                return Value::error(
                    ErrorKind::DimensionMismatch,
                    "cannot add two dates",
                    span,
                );
            }
            return type_error("cannot combine a date with", &rhs, span);
        };
        let delta = if is_add { delta } else { delta.negated() };
        return temporal_plus(lhs, delta, cx, span);
    }
    // span + temporal (addition commutes)
    if is_temporal(&rhs) {
        if !is_add {
            return Value::error(
                ErrorKind::DimensionMismatch,
                "cannot subtract a date from a quantity",
                span,
            );
        }
        let Some(delta) = as_duration(&lhs, &units) else {
            return type_error("cannot combine a date with", &lhs, span);
        };
        return temporal_plus(rhs, delta, cx, span);
    }
    type_error("cannot combine", &rhs, span)
}

/// Apply a signed duration to any temporal value.
pub(crate) fn temporal_plus(value: Value, delta: Duration, cx: &EvalCx<'_>, span: Span) -> Value {
    match value {
        Value::Date(date) => {
            let start = PlainDateTime::new(date, PlainTime::MIDNIGHT);
            let end = start.plus(&delta);
            if end.time == PlainTime::MIDNIGHT {
                Value::Date(end.date)
            } else {
                Value::DateTime(end)
            }
        }
        Value::Time(time) => {
            let total = time.millis_of_day() as f64 + delta.total_ms();
            let (time, carry) = PlainTime::from_millis_of_day(total.round() as i64);
            if carry == 0 {
                Value::Time(time)
            } else {
                // Day overflow lifts onto today's date (UTC).
                let today = crate::temporal::instant_in_zone(
                    cx.now,
                    zone_of("Etc/UTC").expect("UTC exists"),
                )
                .date;
                Value::DateTime(PlainDateTime::new(today.add_days(carry), time))
            }
        }
        Value::DateTime(dt) => Value::DateTime(dt.plus(&delta)),
        Value::Instant(instant) => Value::Instant(instant_plus(instant, &delta)),
        Value::Zoned(zoned) => match zoned_plus(&zoned, &delta) {
            Some(z) => Value::Zoned(z),
            None => Value::error(
                ErrorKind::TimezoneUnknown,
                format!("unknown timezone `{}`", zoned.zone),
                span,
            ),
        },
        other => type_error("not a temporal value", &other, span),
    }
}

/// Instant plus duration: exact components directly, calendar
/// components through the UTC calendar (month-clamp applies).
fn instant_plus(instant: Instant, delta: &Duration) -> Instant {
    if delta.is_fixed() {
        return instant.plus_ms(delta.fixed_ms().round() as i64);
    }
    let utc = zone_of("Etc/UTC").expect("UTC exists");
    let wall = instant_in_zone(instant, utc);
    local_to_instant(&wall.plus(delta), utc)
}

/// Zoned plus duration: calendar components move the wall clock and
/// re-resolve under DST rules; clock components are exact instants.
fn zoned_plus(zoned: &ZonedDateTime, delta: &Duration) -> Option<ZonedDateTime> {
    let tz = zone_of(&zoned.zone)?;
    let calendar = Duration {
        years: delta.years,
        months: delta.months,
        weeks: delta.weeks,
        days: delta.days,
        ..Duration::ZERO
    };
    let clock_ms = delta.hours * 3_600_000.0
        + delta.minutes * 60_000.0
        + delta.seconds * 1000.0
        + delta.millis;
    let wall = zoned.datetime.plus(&calendar);
    let instant = local_to_instant(&wall, tz).plus_ms(clock_ms.round() as i64);
    Some(ZonedDateTime::new(instant_in_zone(instant, tz), &zoned.zone))
}

/// Difference of two temporal values as a duration.
fn temporal_difference(lhs: Value, rhs: Value, span: Span) -> Value {
    match (&lhs, &rhs) {
        (Value::Date(a), Value::Date(b)) => Value::Duration(a.since(b)),
        (Value::Time(a), Value::Time(b)) => {
            Value::Duration(ms_duration((a.millis_of_day() - b.millis_of_day()) as f64))
        }
        (Value::DateTime(a), Value::DateTime(b)) => Value::Duration(a.since(b)),
        (Value::Date(a), Value::DateTime(b)) => {
            Value::Duration(PlainDateTime::new(*a, PlainTime::MIDNIGHT).since(b))
        }
        (Value::DateTime(a), Value::Date(b)) => {
            Value::Duration(a.since(&PlainDateTime::new(*b, PlainTime::MIDNIGHT)))
        }
        _ => match (to_instant(&lhs), to_instant(&rhs)) {
            (Some(a), Some(b)) => Value::Duration(ms_duration((a.epoch_ms - b.epoch_ms) as f64)),
            _ => Value::error(
                ErrorKind::DimensionMismatch,
                "cannot subtract these temporal values",
                span,
            ),
        },
    }
}

/// An instant difference, decomposed into clock components.
fn ms_duration(ms: f64) -> Duration {
    let sign = if ms < 0.0 { -1.0 } else { 1.0 };
    let mut rest = ms.abs();
    let hours = (rest / 3_600_000.0).trunc();
    rest -= hours * 3_600_000.0;
    let minutes = (rest / 60_000.0).trunc();
    rest -= minutes * 60_000.0;
    let seconds = (rest / 1000.0).trunc();
    rest -= seconds * 1000.0;
    Duration {
        hours: sign * hours,
        minutes: sign * minutes,
        seconds: sign * seconds,
        millis: sign * rest,
        ..Duration::ZERO
    }
}

// ---- shared helpers ----

pub(crate) fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number { value, unit: None } if value.fract() == 0.0 => Some(*value as i64),
        _ => None,
    }
}

fn type_error(prefix: &str, value: &Value, span: Span) -> Value {
    Value::error(
        ErrorKind::DomainError,
        format!("{prefix} {}", describe(value)),
        span,
    )
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Number { .. } | Value::Derived { .. } => "a quantity",
        Value::Composite { .. } => "a composite quantity",
        Value::Bool(_) => "a boolean",
        Value::Date(_) => "a date",
        Value::Time(_) => "a time",
        Value::DateTime(_) => "a date-time",
        Value::Instant(_) => "an instant",
        Value::Zoned(_) => "a zoned date-time",
        Value::Duration(_) => "a duration",
        Value::Formatted { .. } => "a formatted value",
        Value::Error(_) => "an error",
    }
}
