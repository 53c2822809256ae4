//! Dimensional bookkeeping over resolved unit references.
//!
//! A quantity's dimension is the combined signature of its unit terms
//! over primitive dimensions (`area` expands to `length²`, `newton` to
//! `mass·length·time⁻²`). Two quantities interconvert exactly when
//! their signatures agree; currencies convert through the installed
//! rate snapshot instead of the unit table.

use tally_data::{RatesSnapshot, ReferenceIndex, Region, Scale};
use tally_sem::{UnitPow, UnitRef};
use tally_util::Span;

use crate::value::{ErrorKind, RuntimeError};

/// Everything unit conversions need, passed by reference.
#[derive(Clone, Copy)]
pub struct UnitCx<'a> {
    pub index: &'a ReferenceIndex,
    pub region: Region,
    pub rates: Option<&'a RatesSnapshot>,
}

impl<'a> UnitCx<'a> {
    /// The dimension id of one unit reference.
    pub fn dimension_of(&self, unit: &UnitRef) -> String {
        match unit {
            UnitRef::Known(id) => self.index.unit(*id).dimension.clone(),
            UnitRef::Currency(_) => "currency".to_string(),
            UnitRef::AmbiguousCurrency(symbol) => format!("currency:{symbol}"),
            UnitRef::UserDefined(name) => format!("user:{name}"),
        }
    }

    /// Human-readable name of a unit reference, for error messages.
    pub fn name_of(&self, unit: &UnitRef) -> String {
        match unit {
            UnitRef::Known(id) => self.index.unit(*id).display.symbol.clone(),
            UnitRef::Currency(code) => code.clone(),
            UnitRef::AmbiguousCurrency(symbol) => symbol.clone(),
            UnitRef::UserDefined(name) => name.clone(),
        }
    }

    /// Canonical unit id, for temporal-unit dispatch.
    pub fn unit_id(&self, unit: &UnitRef) -> Option<&str> {
        match unit {
            UnitRef::Known(id) => Some(self.index.unit(*id).id.as_str()),
            _ => None,
        }
    }

    /// True when the term list is a pure time quantity (one term,
    /// exponent 1, time dimension).
    pub fn is_time_quantity(&self, terms: &[UnitPow]) -> bool {
        matches!(terms, [term] if term.exponent == 1 && self.dimension_of(&term.unit) == "time")
    }

    /// Signature over primitive dimensions: expanded, combined,
    /// sorted, zero-free.
    pub fn signature(&self, terms: &[UnitPow]) -> Vec<(String, i32)> {
        let mut sig: Vec<(String, i32)> = Vec::new();
        let mut add = |dim: String, exp: i32| {
            for entry in sig.iter_mut() {
                if entry.0 == dim {
                    entry.1 += exp;
                    return;
                }
            }
            sig.push((dim, exp));
        };
        for term in terms {
            let dim = self.dimension_of(&term.unit);
            match self.index.dimension_composition(&dim) {
                Some(composition) => {
                    for (primitive, exp) in composition {
                        add(primitive.clone(), exp * term.exponent);
                    }
                }
                None => add(dim, term.exponent),
            }
        }
        sig.retain(|(_, exp)| *exp != 0);
        sig.sort();
        sig
    }

    /// Linear factor from one unit to its primitive base (affine
    /// offsets ignored, i.e. delta semantics).
    fn linear_factor(&self, unit: &UnitRef) -> f64 {
        match unit {
            UnitRef::Known(id) => self
                .index
                .unit(*id)
                .conversion
                .scale(self.region)
                .delta_to_base(1.0),
            _ => 1.0,
        }
    }

    /// The scale of a single known unit.
    fn scale_of(&self, unit: &UnitRef) -> Option<Scale> {
        match unit {
            UnitRef::Known(id) => Some(self.index.unit(*id).conversion.scale(self.region)),
            _ => None,
        }
    }

    /// Magnitude of one term list expressed in primitive base units,
    /// with currency terms reported separately.
    fn base_factor(&self, terms: &[UnitPow]) -> (f64, Vec<(String, i32)>) {
        let mut factor = 1.0;
        let mut currencies: Vec<(String, i32)> = Vec::new();
        for term in terms {
            match &term.unit {
                UnitRef::Currency(code) => currencies.push((code.clone(), term.exponent)),
                unit => factor *= self.linear_factor(unit).powi(term.exponent),
            }
        }
        currencies.sort();
        (factor, currencies)
    }

    /// Convert a magnitude between two term lists of equal dimension.
    ///
    /// Pure single-unit pairs use the full (possibly affine) scale;
    /// anything derived goes through linear delta factors. Currency
    /// terms are matched pairwise and priced through the snapshot.
    pub fn convert(
        &self,
        value: f64,
        from: &[UnitPow],
        to: &[UnitPow],
        span: Span,
    ) -> Result<f64, RuntimeError> {
        if self.signature(from) != self.signature(to) {
            return Err(self.mismatch_error(from, to, span));
        }

        // Absolute temperature path: one affine-capable unit on
        // either side.
        if let ([f], [t]) = (from, to) {
            if f.exponent == 1 && t.exponent == 1 {
                if let (Some(fs), Some(ts)) = (self.scale_of(&f.unit), self.scale_of(&t.unit)) {
                    if fs.is_affine() || ts.is_affine() {
                        return Ok(ts.from_base(fs.to_base(value)));
                    }
                }
            }
        }

        let (from_factor, from_currencies) = self.base_factor(from);
        let (to_factor, to_currencies) = self.base_factor(to);
        let mut result = value * from_factor / to_factor;

        if from_currencies.len() != to_currencies.len() {
            return Err(self.mismatch_error(from, to, span));
        }
        for ((from_code, from_exp), (to_code, to_exp)) in
            from_currencies.iter().zip(to_currencies.iter())
        {
            if from_exp != to_exp {
                return Err(self.mismatch_error(from, to, span));
            }
            if from_code == to_code {
                continue;
            }
            let rate = self
                .rates
                .and_then(|r| r.rate(from_code, to_code))
                .ok_or_else(|| {
                    RuntimeError::new(
                        ErrorKind::CurrencyNoRate,
                        format!("no exchange rate from {from_code} to {to_code}"),
                        span,
                    )
                })?;
            result *= rate.powi(*from_exp);
        }
        Ok(result)
    }

    /// Error for a failed conversion, naming unknown units when they
    /// are the reason.
    pub fn mismatch_error(&self, from: &[UnitPow], to: &[UnitPow], span: Span) -> RuntimeError {
        for term in to.iter().chain(from.iter()) {
            if let UnitRef::UserDefined(name) = &term.unit {
                return RuntimeError::new(
                    ErrorKind::UnknownUnit,
                    format!("unknown unit `{name}`"),
                    span,
                );
            }
            if let UnitRef::AmbiguousCurrency(symbol) = &term.unit {
                return RuntimeError::new(
                    ErrorKind::InvalidConversion,
                    format!("`{symbol}` is ambiguous; use a currency code such as USD"),
                    span,
                );
            }
        }
        RuntimeError::new(
            ErrorKind::DimensionMismatch,
            format!(
                "cannot convert {} to {}",
                describe_terms(self, from),
                describe_terms(self, to)
            ),
            span,
        )
    }
}

fn describe_terms(cx: &UnitCx<'_>, terms: &[UnitPow]) -> String {
    if terms.is_empty() {
        return "a plain number".to_string();
    }
    terms
        .iter()
        .map(|t| {
            if t.exponent == 1 {
                cx.name_of(&t.unit)
            } else {
                format!("{}^{}", cx.name_of(&t.unit), t.exponent)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
