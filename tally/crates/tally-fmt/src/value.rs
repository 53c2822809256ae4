//! Value → string dispatch.

use tally_data::ReferenceIndex;
use tally_eval::temporal::instant_in_zone;
use tally_eval::temporal::zone_of;
use tally_eval::Value;
use tally_sem::{FormatSpec, UnitPow, UnitRef};
use tally_util::{Settings, UnitDisplay};

use crate::base::format_base;
use crate::datetime::{format_date, format_datetime, format_duration, format_time};
use crate::fraction::format_fraction;
use crate::number::{format_number, Precision};
use crate::ordinal::format_ordinal;

/// Renders runtime values under a settings bundle.
pub struct Formatter<'a> {
    index: &'a ReferenceIndex,
    settings: &'a Settings,
}

impl<'a> Formatter<'a> {
    pub fn new(index: &'a ReferenceIndex, settings: &'a Settings) -> Self {
        Self { index, settings }
    }

    /// Render one value. Total: errors render as `Error: …`.
    pub fn format(&self, value: &Value) -> String {
        match value {
            Value::Number { value, unit: None } => {
                format_number(*value, self.settings, Precision::Auto)
            }
            Value::Number {
                value,
                unit: Some(unit),
            } => self.quantity(*value, std::slice::from_ref(unit)),
            Value::Derived { value, terms } => self.quantity(*value, terms),
            Value::Composite { parts } => parts
                .iter()
                .map(|(x, unit)| self.quantity(*x, std::slice::from_ref(unit)))
                .collect::<Vec<_>>()
                .join(" "),
            Value::Bool(b) => b.to_string(),
            Value::Date(date) => format_date(date, self.settings),
            Value::Time(time) => format_time(time, self.settings),
            Value::DateTime(dt) => format_datetime(dt, self.settings),
            Value::Instant(instant) => {
                let utc = zone_of("Etc/UTC").expect("UTC exists");
                format!(
                    "{} UTC",
                    format_datetime(&instant_in_zone(*instant, utc), self.settings)
                )
            }
            Value::Zoned(zoned) => {
                let zone = self
                    .index
                    .timezones()
                    .display_name(&zoned.zone)
                    .unwrap_or(&zoned.zone);
                format!("{} {zone}", format_datetime(&zoned.datetime, self.settings))
            }
            Value::Duration(d) => format_duration(d, self.settings),
            Value::Formatted { inner, format } => self.formatted(inner.unformatted(), *format),
            Value::Error(e) => format!("Error: {}", e.message),
        }
    }

    /// A magnitude with unit terms.
    fn quantity(&self, value: f64, terms: &[UnitPow]) -> String {
        // Currency amounts clamp to the currency's minor units and
        // ambiguous symbols stay adjacent.
        if let [term] = terms {
            if term.exponent == 1 {
                match &term.unit {
                    UnitRef::Currency(code) => {
                        let minor = self
                            .index
                            .currency_by_code(code)
                            .map(|c| c.minor_units as u32)
                            .unwrap_or(2);
                        let number =
                            format_number(value, self.settings, Precision::Fixed(minor));
                        return format!("{number} {code}");
                    }
                    UnitRef::AmbiguousCurrency(symbol) => {
                        let number = format_number(value, self.settings, Precision::Auto);
                        return format!("{symbol}{number}");
                    }
                    _ => {}
                }
            }
        }
        let number = format_number(value, self.settings, Precision::Auto);
        let units = self.terms_text(terms, value);
        if units.is_empty() {
            number
        } else {
            format!("{number} {units}")
        }
    }

    /// Derived units: numerator terms space-joined, one denominator
    /// after `/`, several after `/(…)`, exponents above 1 in
    /// superscript.
    fn terms_text(&self, terms: &[UnitPow], value: f64) -> String {
        let plural = value != 1.0;
        let numerators: Vec<&UnitPow> = terms.iter().filter(|t| t.exponent > 0).collect();
        let denominators: Vec<&UnitPow> = terms.iter().filter(|t| t.exponent < 0).collect();

        if numerators.is_empty() {
            // Nothing above the line: signed superscripts throughout.
            return terms
                .iter()
                .map(|t| self.term_text(t, t.exponent, plural))
                .collect::<Vec<_>>()
                .join(" ");
        }

        let mut out = numerators
            .iter()
            .map(|t| self.term_text(t, t.exponent, plural))
            .collect::<Vec<_>>()
            .join(" ");
        match denominators.len() {
            0 => {}
            1 => {
                out.push('/');
                out.push_str(&self.term_text(denominators[0], -denominators[0].exponent, false));
            }
            _ => {
                out.push_str("/(");
                let joined = denominators
                    .iter()
                    .map(|t| self.term_text(t, -t.exponent, false))
                    .collect::<Vec<_>>()
                    .join(" ");
                out.push_str(&joined);
                out.push(')');
            }
        }
        out
    }

    /// One unit term with a (positive unless signed) exponent.
    fn term_text(&self, term: &UnitPow, exponent: i32, plural: bool) -> String {
        let name = self.unit_text(&term.unit, plural);
        if exponent == 1 {
            name
        } else {
            format!("{name}{}", superscript(exponent))
        }
    }

    fn unit_text(&self, unit: &UnitRef, plural: bool) -> String {
        match unit {
            UnitRef::Known(id) => {
                let display = &self.index.unit(*id).display;
                match self.settings.unit_display {
                    UnitDisplay::Symbol => display.symbol.clone(),
                    UnitDisplay::Name => {
                        if plural {
                            display.plural.clone()
                        } else {
                            display.singular.clone()
                        }
                    }
                }
            }
            UnitRef::Currency(code) => code.clone(),
            UnitRef::AmbiguousCurrency(symbol) => symbol.clone(),
            UnitRef::UserDefined(name) => name.clone(),
        }
    }

    /// Apply an attached presentation format.
    fn formatted(&self, inner: &Value, format: FormatSpec) -> String {
        let Some(magnitude) = inner.magnitude() else {
            // Presentation formats only shape quantities.
            return self.format(inner);
        };
        let number = match format {
            FormatSpec::Binary => format_base(magnitude, 2),
            FormatSpec::Octal => format_base(magnitude, 8),
            FormatSpec::Hexadecimal => format_base(magnitude, 16),
            FormatSpec::Base(n) => format_base(magnitude, n),
            FormatSpec::Decimal | FormatSpec::Plain => {
                format_number(magnitude, self.settings, Precision::Auto)
            }
            FormatSpec::Scientific => {
                let digits = if self.settings.precision >= 0 {
                    self.settings.precision as u32
                } else {
                    6
                };
                format_number(magnitude, self.settings, Precision::Scientific(digits))
            }
            FormatSpec::Fraction => format_fraction(magnitude),
            FormatSpec::Ordinal => format_ordinal(magnitude.round() as i64),
            FormatSpec::Decimals(n) => format_number(magnitude, self.settings, Precision::Fixed(n)),
            FormatSpec::SigFigs(n) => format_number(magnitude, self.settings, Precision::SigFigs(n)),
        };
        let units = self.terms_text(inner.terms(), magnitude);
        if units.is_empty() {
            number
        } else {
            format!("{number} {units}")
        }
    }
}

/// Unicode superscript of a signed exponent.
fn superscript(exponent: i32) -> String {
    const DIGITS: [char; 10] = ['⁰', '¹', '²', '³', '⁴', '⁵', '⁶', '⁷', '⁸', '⁹'];
    let mut out = String::new();
    if exponent < 0 {
        out.push('⁻');
    }
    for c in exponent.abs().to_string().chars() {
        out.push(DIGITS[c.to_digit(10).unwrap() as usize]);
    }
    out
}
