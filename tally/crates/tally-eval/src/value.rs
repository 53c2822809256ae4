//! Runtime values.
//!
//! Errors are values: a failing sub-expression produces
//! [`Value::Error`] and every operator propagates the first error
//! operand unchanged, so one bad leaf fails one line, never the
//! document.

use tally_sem::{FormatSpec, UnitPow};
use tally_util::Span;

use crate::temporal::{Duration, Instant, PlainDate, PlainDateTime, PlainTime, ZonedDateTime};

/// Typed evaluation failure kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    DimensionMismatch,
    UnknownUnit,
    UnknownVariable,
    UnknownFunction,
    DivisionByZero,
    DomainError,
    TimezoneUnknown,
    InvalidConversion,
    CurrencyNoRate,
    Formatting,
}

/// A runtime error with its source span.
#[derive(Clone, Debug, PartialEq)]
pub struct RuntimeError {
    pub kind: ErrorKind,
    pub message: String,
    pub span: Span,
}

impl RuntimeError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            message: message.into(),
            span,
        }
    }
}

/// A runtime value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Dimensionally pure: no unit, or exactly one unit with
    /// exponent 1
    Number { value: f64, unit: Option<UnitPow> },
    /// Anything with several unit terms or an exponent other than 1
    Derived { value: f64, terms: Vec<UnitPow> },
    /// Same-dimension components (`5 ft 7 in`)
    Composite { parts: Vec<(f64, UnitPow)> },
    Bool(bool),
    Date(PlainDate),
    Time(PlainTime),
    DateTime(PlainDateTime),
    Instant(Instant),
    Zoned(ZonedDateTime),
    Duration(Duration),
    /// A value with a presentation format attached by a conversion
    Formatted {
        inner: Box<Value>,
        format: FormatSpec,
    },
    Error(RuntimeError),
}

impl From<RuntimeError> for Value {
    fn from(err: RuntimeError) -> Self {
        Value::Error(err)
    }
}

impl Value {
    /// A plain dimensionless number.
    pub fn number(value: f64) -> Self {
        Value::Number { value, unit: None }
    }

    /// Build a quantity from combined unit terms, normalizing the
    /// `Number`/`Derived` split: a single exponent-1 term is a
    /// `Number`, anything else `Derived`.
    pub fn from_terms(value: f64, mut terms: Vec<UnitPow>) -> Self {
        terms.retain(|t| t.exponent != 0);
        match terms.len() {
            0 => Value::Number { value, unit: None },
            1 if terms[0].exponent == 1 => Value::Number {
                value,
                unit: Some(terms.remove(0)),
            },
            _ => Value::Derived { value, terms },
        }
    }

    pub fn error(kind: ErrorKind, message: impl Into<String>, span: Span) -> Self {
        Value::Error(RuntimeError::new(kind, message, span))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    /// The unit terms of a quantity (empty for a bare number).
    pub fn terms(&self) -> &[UnitPow] {
        match self {
            Value::Number {
                unit: Some(unit), ..
            } => std::slice::from_ref(unit),
            Value::Derived { terms, .. } => terms,
            _ => &[],
        }
    }

    /// The numeric magnitude of a quantity, if this is one.
    pub fn magnitude(&self) -> Option<f64> {
        match self {
            Value::Number { value, .. } | Value::Derived { value, .. } => Some(*value),
            _ => None,
        }
    }

    /// True for the quantity shapes (`Number`/`Derived`).
    pub fn is_quantity(&self) -> bool {
        matches!(self, Value::Number { .. } | Value::Derived { .. })
    }

    /// Strip any attached presentation format.
    pub fn unformatted(&self) -> &Value {
        match self {
            Value::Formatted { inner, .. } => inner.unformatted(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_sem::UnitRef;

    fn term(name: &str, exponent: i32) -> UnitPow {
        UnitPow::new(UnitRef::UserDefined(name.into()), exponent)
    }

    #[test]
    fn test_from_terms_dimensionless() {
        assert_eq!(Value::from_terms(4.0, vec![]), Value::number(4.0));
    }

    #[test]
    fn test_from_terms_single() {
        let v = Value::from_terms(4.0, vec![term("m", 1)]);
        assert!(matches!(v, Value::Number { unit: Some(_), .. }));
    }

    #[test]
    fn test_from_terms_exponent_forces_derived() {
        let v = Value::from_terms(4.0, vec![term("m", 2)]);
        assert!(matches!(v, Value::Derived { .. }));
    }

    #[test]
    fn test_from_terms_drops_zero_exponents() {
        let v = Value::from_terms(4.0, vec![term("m", 0), term("s", 1)]);
        let Value::Number {
            unit: Some(unit), ..
        } = &v
        else {
            panic!("expected single-unit number, got {v:?}");
        };
        assert_eq!(unit.unit, UnitRef::UserDefined("s".into()));
    }

    #[test]
    fn test_unformatted_unwraps_nested() {
        let inner = Value::number(1.0);
        let wrapped = Value::Formatted {
            inner: Box::new(Value::Formatted {
                inner: Box::new(inner.clone()),
                format: FormatSpec::Binary,
            }),
            format: FormatSpec::Hexadecimal,
        };
        assert_eq!(wrapped.unformatted(), &inner);
    }

    #[test]
    fn test_error_propagation_shape() {
        let e = Value::error(ErrorKind::DivisionByZero, "division by zero", Span::DUMMY);
        assert!(e.is_error());
    }
}
