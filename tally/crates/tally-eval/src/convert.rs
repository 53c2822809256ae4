//! Conversion targets.
//!
//! `x to T` for every target form: units (including derived and
//! named-dimension targets), composite distribution, temporal
//! properties, timezones, and presentation formats. Chained
//! conversions unwrap any earlier attached format and apply
//! left-to-right.

use tally_sem::{ConvTarget, FormatSpec, TemporalField, UnitPow};
use tally_util::Span;

use crate::arith::redistribute;
use crate::eval::EvalCx;
use crate::temporal::{instant_in_zone, zone_of, Duration, PlainDateTime};
use crate::units::UnitCx;
use crate::value::{ErrorKind, Value};

pub(crate) fn convert(value: Value, target: &ConvTarget, cx: &EvalCx<'_>, span: Span) -> Value {
    if value.is_error() {
        return value;
    }
    let value = value.unformatted().clone();
    match target {
        ConvTarget::Unit(terms) => to_unit(value, terms, cx, span),
        ConvTarget::TimeField { unit, field } => to_time_field(value, unit, *field, cx, span),
        ConvTarget::Composite(parts) => to_composite(value, parts, cx, span),
        ConvTarget::Timezone(zone) => to_timezone(value, zone, span),
        ConvTarget::Format(spec) => to_format(value, *spec, span),
    }
}

fn to_unit(value: Value, terms: &[UnitPow], cx: &EvalCx<'_>, span: Span) -> Value {
    let units = cx.units();
    match &value {
        Value::Number { .. } | Value::Derived { .. } => {
            match units.convert(value.magnitude().unwrap(), value.terms(), terms, span) {
                Ok(result) => Value::from_terms(result, terms.to_vec()),
                Err(e) => Value::Error(e),
            }
        }
        Value::Composite { parts } => {
            let mut total = 0.0;
            for (x, unit) in parts {
                match units.convert(*x, std::slice::from_ref(unit), terms, span) {
                    Ok(v) => total += v,
                    Err(e) => return Value::Error(e),
                }
            }
            Value::from_terms(total, terms.to_vec())
        }
        Value::Duration(d) => duration_to_unit(d, terms, &units, span),
        _ => Value::error(
            ErrorKind::InvalidConversion,
            "cannot convert this value to a unit",
            span,
        ),
    }
}

/// Duration → a single time unit (`to hours`).
fn duration_to_unit(d: &Duration, terms: &[UnitPow], cx: &UnitCx<'_>, span: Span) -> Value {
    let [term] = terms else {
        return Value::error(
            ErrorKind::InvalidConversion,
            "a duration converts to a single time unit",
            span,
        );
    };
    let Some(id) = cx.unit_id(&term.unit).map(str::to_string) else {
        return Value::error(
            ErrorKind::InvalidConversion,
            "a duration converts to a time unit",
            span,
        );
    };
    let Some(per_unit) = Duration::from_unit(&id, 1.0) else {
        return Value::error(
            ErrorKind::InvalidConversion,
            format!("`{id}` is not a time unit"),
            span,
        );
    };
    Value::from_terms(d.total_ms() / per_unit.total_ms(), terms.to_vec())
}

fn to_time_field(
    value: Value,
    unit: &UnitPow,
    field: TemporalField,
    cx: &EvalCx<'_>,
    span: Span,
) -> Value {
    let datetime: Option<PlainDateTime> = match &value {
        Value::Date(d) => Some(PlainDateTime::new(*d, crate::temporal::PlainTime::MIDNIGHT)),
        Value::DateTime(dt) => Some(*dt),
        Value::Zoned(z) => Some(z.datetime),
        Value::Instant(i) => {
            Some(instant_in_zone(*i, zone_of("Etc/UTC").expect("UTC exists")))
        }
        Value::Time(t) => {
            return match field {
                TemporalField::Hour => Value::number(t.hour as f64),
                TemporalField::Minute => Value::number(t.minute as f64),
                TemporalField::Second => Value::number(t.second as f64),
                _ => Value::error(
                    ErrorKind::InvalidConversion,
                    "a plain time has no date fields",
                    span,
                ),
            };
        }
        Value::Duration(_) => {
            return Value::error(
                ErrorKind::InvalidConversion,
                "a property target needs a point in time, not a duration",
                span,
            );
        }
        // Dimensional values read the singular word as a plain unit.
        _ => None,
    };

    match datetime {
        Some(dt) => {
            let n = match field {
                TemporalField::Year => dt.date.year as f64,
                TemporalField::Month => dt.date.month as f64,
                TemporalField::Day => dt.date.day as f64,
                TemporalField::Hour => dt.time.hour as f64,
                TemporalField::Minute => dt.time.minute as f64,
                TemporalField::Second => dt.time.second as f64,
            };
            Value::number(n)
        }
        None => to_unit(value, std::slice::from_ref(unit), cx, span),
    }
}

fn to_composite(value: Value, parts: &[UnitPow], cx: &EvalCx<'_>, span: Span) -> Value {
    let units = cx.units();

    // Largest component first, so the greedy integer split works no
    // matter how the target was spelled.
    let mut ordered: Vec<UnitPow> = parts.to_vec();
    ordered.sort_by(|a, b| {
        let fa = unit_scale(&units, a);
        let fb = unit_scale(&units, b);
        fb.partial_cmp(&fa).unwrap_or(std::cmp::Ordering::Equal)
    });
    let shape: Vec<(f64, UnitPow)> = ordered.into_iter().map(|u| (0.0, u)).collect();
    let first = std::slice::from_ref(&shape[0].1);

    let total = match &value {
        Value::Number { .. } | Value::Derived { .. } => {
            match units.convert(value.magnitude().unwrap(), value.terms(), first, span) {
                Ok(v) => v,
                Err(e) => return Value::Error(e),
            }
        }
        Value::Composite { parts: source_parts } => {
            let mut total = 0.0;
            for (x, unit) in source_parts {
                match units.convert(*x, std::slice::from_ref(unit), first, span) {
                    Ok(v) => total += v,
                    Err(e) => return Value::Error(e),
                }
            }
            total
        }
        Value::Duration(d) => {
            let Some(id) = units.unit_id(&shape[0].1.unit).map(str::to_string) else {
                return Value::error(
                    ErrorKind::InvalidConversion,
                    "a duration distributes into time units",
                    span,
                );
            };
            match Duration::from_unit(&id, 1.0) {
                Some(per_unit) => d.total_ms() / per_unit.total_ms(),
                None => {
                    return Value::error(
                        ErrorKind::InvalidConversion,
                        format!("`{id}` is not a time unit"),
                        span,
                    );
                }
            }
        }
        _ => {
            return Value::error(
                ErrorKind::InvalidConversion,
                "cannot distribute this value into components",
                span,
            );
        }
    };

    redistribute(total, &shape, &units, span)
}

/// Rough magnitude of a unit for ordering composite targets.
fn unit_scale(cx: &UnitCx<'_>, unit: &UnitPow) -> f64 {
    use tally_sem::UnitRef;
    match &unit.unit {
        UnitRef::Known(id) => cx
            .index
            .unit(*id)
            .conversion
            .scale(cx.region)
            .delta_to_base(1.0),
        _ => 1.0,
    }
}

fn to_timezone(value: Value, zone: &str, span: Span) -> Value {
    let Some(tz) = zone_of(zone) else {
        return Value::error(
            ErrorKind::TimezoneUnknown,
            format!("unknown timezone `{zone}`"),
            span,
        );
    };
    match value {
        Value::Instant(instant) => Value::Zoned(crate::temporal::ZonedDateTime::new(
            instant_in_zone(instant, tz),
            zone,
        )),
        Value::Zoned(zoned) => match zoned.to_instant() {
            Some(instant) => Value::Zoned(crate::temporal::ZonedDateTime::new(
                instant_in_zone(instant, tz),
                zone,
            )),
            None => Value::error(
                ErrorKind::TimezoneUnknown,
                format!("unknown timezone `{}`", zoned.zone),
                span,
            ),
        },
        // A plain reading acquires the zone without moving the clock.
        Value::DateTime(dt) => Value::Zoned(crate::temporal::ZonedDateTime::new(dt, zone)),
        _ => Value::error(
            ErrorKind::InvalidConversion,
            "only instants and date-times convert between timezones",
            span,
        ),
    }
}

fn to_format(value: Value, spec: FormatSpec, span: Span) -> Value {
    match spec {
        FormatSpec::Base(n) if !(2..=36).contains(&n) => {
            return Value::error(
                ErrorKind::Formatting,
                format!("base {n} out of range (2..=36)"),
                span,
            );
        }
        FormatSpec::Decimals(n) if n > 20 => {
            return Value::error(ErrorKind::Formatting, "too many decimals", span);
        }
        FormatSpec::SigFigs(0) => {
            return Value::error(
                ErrorKind::Formatting,
                "significant figures must be at least 1",
                span,
            );
        }
        FormatSpec::Plain => {
            // `to value`: strip unit and formatting.
            return match &value {
                Value::Number { value, .. } | Value::Derived { value, .. } => {
                    Value::number(*value)
                }
                other => other.clone(),
            };
        }
        _ => {}
    }
    Value::Formatted {
        inner: Box::new(value),
        format: spec,
    }
}
