//! Builtin functions.

use tally_sem::UnitPow;
use tally_util::{AngleUnit, Span};

use crate::eval::EvalCx;
use crate::temporal::Duration;
use crate::value::{ErrorKind, Value};

pub(crate) fn call(name: &str, args: Vec<Value>, cx: &EvalCx<'_>, span: Span) -> Value {
    if let Some(err) = args.iter().find(|a| a.is_error()) {
        return err.clone();
    }
    let args: Vec<Value> = args.iter().map(|a| a.unformatted().clone()).collect();
    match name {
        "sqrt" => one_arg(args, span, |v, span| sqrt(v, span)),
        "abs" => elementwise(args, span, f64::abs),
        "round" => elementwise(args, span, f64::round),
        "floor" => elementwise(args, span, f64::floor),
        "ceil" => elementwise(args, span, f64::ceil),
        "trunc" => elementwise(args, span, f64::trunc),
        "min" => fold_converted(args, cx, span, f64::min),
        "max" => fold_converted(args, cx, span, f64::max),
        "sum" => fold_converted(args, cx, span, |a, b| a + b),
        "sin" => trig(args, cx, span, f64::sin),
        "cos" => trig(args, cx, span, f64::cos),
        "tan" => trig(args, cx, span, f64::tan),
        "asin" => inverse_trig(args, cx, span, f64::asin, true),
        "acos" => inverse_trig(args, cx, span, f64::acos, true),
        "atan" => inverse_trig(args, cx, span, f64::atan, false),
        "log" => log(args, span, |x| x.log10()),
        "ln" => log(args, span, f64::ln),
        _ => Value::error(
            ErrorKind::UnknownFunction,
            format!("unknown function `{name}`"),
            span,
        ),
    }
}

fn one_arg(mut args: Vec<Value>, span: Span, f: impl Fn(Value, Span) -> Value) -> Value {
    if args.len() != 1 {
        return arity_error(span);
    }
    f(args.remove(0), span)
}

fn arity_error(span: Span) -> Value {
    Value::error(ErrorKind::DomainError, "wrong number of arguments", span)
}

fn sqrt(value: Value, span: Span) -> Value {
    match &value {
        Value::Number { value: x, unit: None } => {
            if *x < 0.0 {
                Value::error(ErrorKind::DomainError, "sqrt of a negative number", span)
            } else {
                Value::number(x.sqrt())
            }
        }
        Value::Derived { value: x, terms } if terms.iter().all(|t| t.exponent % 2 == 0) => {
            // Even exponents halve: sqrt(4 m²) = 2 m.
            if *x < 0.0 {
                return Value::error(ErrorKind::DomainError, "sqrt of a negative number", span);
            }
            let halved = terms
                .iter()
                .map(|t| UnitPow::new(t.unit.clone(), t.exponent / 2))
                .collect();
            Value::from_terms(x.sqrt(), halved)
        }
        _ => Value::error(
            ErrorKind::DomainError,
            "sqrt expects a plain number or even unit exponents",
            span,
        ),
    }
}

/// Unit-preserving functions work elementwise on composite values and
/// durations.
fn elementwise(mut args: Vec<Value>, span: Span, f: fn(f64) -> f64) -> Value {
    if args.len() != 1 {
        return arity_error(span);
    }
    match args.remove(0) {
        Value::Number { value, unit } => Value::Number {
            value: f(value),
            unit,
        },
        Value::Derived { value, terms } => Value::Derived {
            value: f(value),
            terms,
        },
        Value::Composite { parts } => Value::Composite {
            parts: parts.into_iter().map(|(x, u)| (f(x), u)).collect(),
        },
        Value::Duration(d) => Value::Duration(Duration {
            years: f(d.years),
            months: f(d.months),
            weeks: f(d.weeks),
            days: f(d.days),
            hours: f(d.hours),
            minutes: f(d.minutes),
            seconds: f(d.seconds),
            millis: f(d.millis),
        }),
        other => Value::error(
            ErrorKind::DomainError,
            format!("cannot apply this function to {other:?}"),
            span,
        ),
    }
}

/// `min`/`max`/`sum`: every argument converts into the first
/// argument's unit.
fn fold_converted(args: Vec<Value>, cx: &EvalCx<'_>, span: Span, f: fn(f64, f64) -> f64) -> Value {
    let units = cx.units();
    let Some(first) = args.first() else {
        return arity_error(span);
    };
    if !first.is_quantity() {
        return Value::error(ErrorKind::DomainError, "expected quantities", span);
    }
    let target = first.terms().to_vec();
    let mut acc: Option<f64> = None;
    for arg in &args {
        if !arg.is_quantity() {
            return Value::error(ErrorKind::DomainError, "expected quantities", span);
        }
        let converted = match units.convert(arg.magnitude().unwrap(), arg.terms(), &target, span) {
            Ok(v) => v,
            Err(e) => return Value::Error(e),
        };
        acc = Some(match acc {
            None => converted,
            Some(previous) => f(previous, converted),
        });
    }
    Value::from_terms(acc.unwrap_or(0.0), target)
}

/// Angle input in radians: explicit angle units convert; bare numbers
/// follow the angle-unit setting.
fn angle_in_radians(value: &Value, cx: &EvalCx<'_>, span: Span) -> Result<f64, Value> {
    if !value.is_quantity() {
        return Err(Value::error(
            ErrorKind::DomainError,
            "expected an angle",
            span,
        ));
    }
    let x = value.magnitude().unwrap();
    if value.terms().is_empty() {
        return Ok(match cx.angle_unit {
            AngleUnit::Rad => x,
            AngleUnit::Deg => x.to_radians(),
        });
    }
    let units = cx.units();
    let radian = units
        .index
        .unit_by_id("radian")
        .map(|id| UnitPow::new(tally_sem::UnitRef::Known(id), 1));
    match radian {
        Some(rad) => units
            .convert(x, value.terms(), std::slice::from_ref(&rad), span)
            .map_err(Value::Error),
        None => Err(Value::error(
            ErrorKind::DomainError,
            "angle units unavailable",
            span,
        )),
    }
}

fn trig(args: Vec<Value>, cx: &EvalCx<'_>, span: Span, f: fn(f64) -> f64) -> Value {
    let [arg] = args.as_slice() else {
        return arity_error(span);
    };
    match angle_in_radians(arg, cx, span) {
        Ok(x) => Value::number(f(x)),
        Err(e) => e,
    }
}

fn inverse_trig(
    args: Vec<Value>,
    cx: &EvalCx<'_>,
    span: Span,
    f: fn(f64) -> f64,
    bounded: bool,
) -> Value {
    let [arg] = args.as_slice() else {
        return arity_error(span);
    };
    let Value::Number { value: x, unit: None } = arg else {
        return Value::error(ErrorKind::DomainError, "expected a plain number", span);
    };
    if bounded && !(-1.0..=1.0).contains(x) {
        return Value::error(ErrorKind::DomainError, "argument out of range [-1, 1]", span);
    }
    let radians = f(*x);
    Value::number(match cx.angle_unit {
        AngleUnit::Rad => radians,
        AngleUnit::Deg => radians.to_degrees(),
    })
}

fn log(args: Vec<Value>, span: Span, f: fn(f64) -> f64) -> Value {
    let [Value::Number { value: x, unit: None }] = args.as_slice() else {
        return Value::error(ErrorKind::DomainError, "expected a plain number", span);
    };
    if *x <= 0.0 {
        return Value::error(
            ErrorKind::DomainError,
            "logarithm of a non-positive number",
            span,
        );
    }
    Value::number(f(*x))
}
