//! tally-eval - Typed evaluation with dimensional and temporal
//! algebra.
//!
//! Walks the normalized AST bottom-up producing [`Value`]s. Unit
//! dimensions and currencies stay consistent through arithmetic and
//! conversion; date/time work routes through the self-contained
//! [`temporal`] engine. Failures are `Error` *values* that propagate
//! through operators, so evaluation itself never returns `Err` and
//! never aborts the document.

pub mod temporal;
pub mod value;

mod arith;
mod convert;
mod eval;
mod functions;
mod units;

pub use eval::{evaluate, EvalCx, VarScope};
pub use units::UnitCx;
pub use value::{ErrorKind, RuntimeError, Value};

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashMap;
    use tally_data::{RatesInput, RatesSnapshot, ReferenceIndex, Region};
    use tally_lex::Lexer;
    use tally_par::{parse_line, prune, select};
    use tally_sem::lower;
    use tally_util::AngleUnit;
    use temporal::Instant;

    struct Harness {
        index: ReferenceIndex,
        rates: Option<RatesSnapshot>,
        scope: FxHashMap<String, Value>,
        now: Instant,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                index: ReferenceIndex::builtin(),
                rates: None,
                scope: FxHashMap::default(),
                // 2024-06-15 12:00:00 UTC
                now: Instant::from_epoch_ms(1_718_452_800_000),
            }
        }

        fn eval(&self, source: &str) -> Value {
            let (tokens, diags) = Lexer::new(source, 1, 0).tokenize();
            assert!(!diags.has_errors(), "lexer failed on {source:?}");
            let defined = self.scope.keys().cloned().collect();
            let outcome = prune(parse_line(&tokens, &self.index), &defined);
            let picked = select(&outcome.kept, &self.index, &defined)
                .unwrap_or_else(|| panic!("no candidate for {source:?}"));
            let expr = lower(&picked, &self.index, None);
            let cx = EvalCx {
                index: &self.index,
                region: Region::Us,
                rates: self.rates.as_ref(),
                angle_unit: AngleUnit::Rad,
                now: self.now,
            };
            evaluate(&expr, &cx, &self.scope)
        }

        fn eval_number(&self, source: &str) -> f64 {
            match self.eval(source).unformatted() {
                Value::Number { value, .. } => *value,
                other => panic!("expected number for {source:?}, got {other:?}"),
            }
        }
    }

    fn unit_symbol(index: &ReferenceIndex, value: &Value) -> String {
        match value {
            Value::Number {
                unit: Some(unit), ..
            } => match &unit.unit {
                tally_sem::UnitRef::Known(id) => index.unit(*id).display.symbol.clone(),
                other => format!("{other:?}"),
            },
            _ => panic!("expected unit number"),
        }
    }

    #[test]
    fn test_plain_arithmetic() {
        let h = Harness::new();
        assert_eq!(h.eval_number("2 + 2"), 4.0);
        assert_eq!(h.eval_number("2 + 3 * 4"), 14.0);
        assert_eq!(h.eval_number("(2 + 3) * 4"), 20.0);
        assert_eq!(h.eval_number("2 ^ 10"), 1024.0);
        assert_eq!(h.eval_number("10 mod 3"), 1.0);
        assert_eq!(h.eval_number("5!"), 120.0);
        assert_eq!(h.eval_number("20%"), 0.2);
    }

    #[test]
    fn test_unit_addition_converts_rhs() {
        let h = Harness::new();
        let v = h.eval("5 km + 200 m");
        assert_eq!(v.magnitude(), Some(5.2));
        assert_eq!(unit_symbol(&h.index, &v), "km");
    }

    #[test]
    fn test_conversion_after_addition() {
        let h = Harness::new();
        let v = h.eval("5 km + 200 m to m");
        assert_eq!(v.magnitude(), Some(5200.0));
        assert_eq!(unit_symbol(&h.index, &v), "m");
    }

    #[test]
    fn test_inch_disambiguation_end_to_end() {
        let h = Harness::new();
        let v = h.eval("10 in in cm");
        assert_eq!(unit_symbol(&h.index, &v), "cm");
        assert!((v.magnitude().unwrap() - 25.4).abs() < 1e-12);
    }

    #[test]
    fn test_temperature_conversion() {
        let h = Harness::new();
        let v = h.eval("100 °F to °C");
        assert!((v.magnitude().unwrap() - 37.77777777777778).abs() < 1e-9);
    }

    #[test]
    fn test_adding_absolute_temperatures_fails() {
        let h = Harness::new();
        let v = h.eval("20 °C + 30 °F");
        let Value::Error(e) = v else {
            panic!("expected error, got {v:?}");
        };
        assert_eq!(e.kind, ErrorKind::DimensionMismatch);
    }

    #[test]
    fn test_temperature_delta_addition() {
        let h = Harness::new();
        let v = h.eval("20 °C + 10 K");
        assert_eq!(v.magnitude(), Some(30.0));
        assert_eq!(unit_symbol(&h.index, &v), "°C");
    }

    #[test]
    fn test_composite_target_distribution() {
        let h = Harness::new();
        let v = h.eval("170 cm to ft in");
        let Value::Composite { parts } = &v else {
            panic!("expected composite, got {v:?}");
        };
        assert_eq!(parts[0].0, 5.0);
        assert!((parts[1].0 - 6.92913385826772).abs() < 1e-9);
    }

    #[test]
    fn test_division_by_zero() {
        let h = Harness::new();
        let Value::Error(e) = h.eval("1 / 0") else {
            panic!("expected error");
        };
        assert_eq!(e.kind, ErrorKind::DivisionByZero);
    }

    #[test]
    fn test_unknown_function() {
        let h = Harness::new();
        let Value::Error(e) = h.eval("frobnicate(1)") else {
            panic!("expected error");
        };
        assert_eq!(e.kind, ErrorKind::UnknownFunction);
    }

    #[test]
    fn test_error_propagates_through_operators() {
        let h = Harness::new();
        let Value::Error(e) = h.eval("1 + 2 / 0") else {
            panic!("expected error");
        };
        assert_eq!(e.kind, ErrorKind::DivisionByZero);
    }

    #[test]
    fn test_variable_lookup() {
        let mut h = Harness::new();
        let width = h.eval("10 m");
        h.scope.insert("width".to_string(), width);
        let v = h.eval("width * 3");
        assert_eq!(v.magnitude(), Some(30.0));
        assert_eq!(unit_symbol(&h.index, &v), "m");
    }

    #[test]
    fn test_zoned_subtraction_one_second() {
        let h = Harness::new();
        let v = h.eval("2038-01-19 03:14:07 UTC - 2038-01-19 03:14:06 UTC");
        let Value::Duration(d) = v else {
            panic!("expected duration, got {v:?}");
        };
        assert_eq!(d.seconds, 1.0);
        assert_eq!(d.hours, 0.0);
    }

    #[test]
    fn test_dst_day_difference() {
        let h = Harness::new();
        let v = h.eval("2024-03-11 12:00 EST - 2024-03-09 12:00 EST");
        let Value::Duration(d) = v else {
            panic!("expected duration, got {v:?}");
        };
        assert_eq!(d.hours, 47.0);
    }

    #[test]
    fn test_date_plus_month_clamps() {
        let h = Harness::new();
        let v = h.eval("2023-01-31 + 1 month");
        let Value::Date(date) = v else {
            panic!("expected date, got {v:?}");
        };
        assert_eq!((date.year, date.month, date.day), (2023, 2, 28));
    }

    #[test]
    fn test_leap_day_plus_year_clamps() {
        let h = Harness::new();
        let v = h.eval("2024-02-29 + 1 year");
        let Value::Date(date) = v else {
            panic!("expected date, got {v:?}");
        };
        assert_eq!((date.year, date.month, date.day), (2025, 2, 28));
    }

    #[test]
    fn test_time_overflow_lifts_to_datetime() {
        let h = Harness::new();
        let v = h.eval("22:00 + 3 hours");
        let Value::DateTime(dt) = v else {
            panic!("expected date-time, got {v:?}");
        };
        assert_eq!(dt.time.hour, 1);
        // Lifted onto the evaluation date (2024-06-15 UTC) plus the
        // carried day.
        assert_eq!((dt.date.year, dt.date.month, dt.date.day), (2024, 6, 16));
    }

    #[test]
    fn test_now_to_year_property() {
        let h = Harness::new();
        let v = h.eval("now to year");
        assert_eq!(v.magnitude(), Some(2024.0));
    }

    #[test]
    fn test_duration_to_hours() {
        let h = Harness::new();
        let v = h.eval("2024-03-11 12:00 UTC - 2024-03-09 12:00 UTC to hours");
        assert_eq!(v.magnitude(), Some(48.0));
    }

    #[test]
    fn test_currency_with_rates() {
        let mut h = Harness::new();
        let input: RatesInput = serde_json::from_str(r#"{ "EUR": { "USD": 1.25 } }"#).unwrap();
        h.rates = Some(RatesSnapshot::from_input(input));
        let v = h.eval("10 EUR to USD");
        assert_eq!(v.magnitude(), Some(12.5));
    }

    #[test]
    fn test_ambiguous_currency_mismatch() {
        let h = Harness::new();
        let Value::Error(e) = h.eval("$100 + 100 USD") else {
            panic!("expected error");
        };
        assert!(
            e.kind == ErrorKind::InvalidConversion || e.kind == ErrorKind::DimensionMismatch
        );
    }

    #[test]
    fn test_trigonometry_with_angle_units() {
        let h = Harness::new();
        assert!((h.eval_number("sin(90 °)") - 1.0).abs() < 1e-12);
        assert!((h.eval_number("cos(0)") - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_unit_round_trip() {
        let h = Harness::new();
        // (x u to v) to u == x u within a ulp.
        let v = h.eval("123.456 km to mi to km");
        assert!((v.magnitude().unwrap() - 123.456).abs() < 1e-9);
    }

    #[test]
    fn test_comparison() {
        let h = Harness::new();
        assert_eq!(h.eval("1 km == 1000 m"), Value::Bool(true));
        assert_eq!(h.eval("1 km < 2000 m"), Value::Bool(true));
        assert_eq!(h.eval("1 km == 1 kg"), Value::Bool(false));
    }

    #[test]
    fn test_conditional() {
        let h = Harness::new();
        assert_eq!(h.eval_number("if 1 < 2 then 3 else 4"), 3.0);
        assert_eq!(h.eval_number("if false then 3 else 4"), 4.0);
    }

    #[test]
    fn test_bitwise_and_shifts() {
        let h = Harness::new();
        assert_eq!(h.eval_number("0xFF & 0x0F"), 15.0);
        assert_eq!(h.eval_number("1 << 10"), 1024.0);
        assert_eq!(h.eval_number("6 xor 3"), 5.0);
    }

    #[test]
    fn test_derived_unit_value() {
        let h = Harness::new();
        let v = h.eval("60 km/h to m/s");
        assert!((v.magnitude().unwrap() - 16.666666666666668).abs() < 1e-9);
    }

    #[test]
    fn test_four_term_unit_survives_evaluation() {
        let h = Harness::new();
        let v = h.eval("1000 pound force person hong kong dollar per nautical mile");
        let Value::Derived { terms, .. } = &v else {
            panic!("expected derived value, got {v:?}");
        };
        assert_eq!(terms.len(), 4);
        assert_eq!(terms.last().unwrap().exponent, -1);
    }

    #[test]
    fn test_unix_epoch() {
        let h = Harness::new();
        let v = h.eval("1700000000 unix");
        let Value::Instant(i) = v else {
            panic!("expected instant, got {v:?}");
        };
        assert_eq!(i.epoch_ms, 1_700_000_000_000);
    }

    #[test]
    fn test_yesterday_is_one_day_back() {
        let h = Harness::new();
        let v = h.eval("yesterday");
        let Value::Instant(i) = v else {
            panic!("expected instant, got {v:?}");
        };
        assert_eq!(i.epoch_ms, h.now.epoch_ms - 86_400_000);
    }
}
