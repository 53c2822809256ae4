//! Exchange-rate snapshots.
//!
//! Rates are a runtime input: an external fetcher hands the calculator
//! a snapshot before or between document evaluations, and the
//! evaluator reads whichever snapshot was installed most recently.

use rustc_hash::FxHashMap;
use serde::Deserialize;

/// Accepted wire shapes for exchange-rate payloads.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum RatesInput {
    /// `{ "baseCurrency": "EUR", "timestamp": …, "rates": { "EUR_USD": 1.09 } }`
    Flat {
        #[serde(alias = "baseCurrency")]
        base_currency: String,
        #[serde(default)]
        timestamp: Option<i64>,
        rates: std::collections::HashMap<String, f64>,
    },
    /// `{ "EUR": { "USD": 1.09, "GBP": 0.85 } }`
    Nested(std::collections::HashMap<String, std::collections::HashMap<String, f64>>),
}

/// A normalized snapshot of exchange rates.
#[derive(Clone, Debug, Default)]
pub struct RatesSnapshot {
    /// Base currency the snapshot triangulates through
    pub base: String,
    /// Unix timestamp of the snapshot, if the payload carried one
    pub timestamp: Option<i64>,
    pairs: FxHashMap<(String, String), f64>,
}

impl RatesSnapshot {
    /// Normalize a payload into a snapshot.
    ///
    /// Flat keys must look like `FROM_TO`; malformed keys are skipped.
    /// For nested payloads the first (and usually only) top-level key
    /// becomes the base currency.
    pub fn from_input(input: RatesInput) -> Self {
        let mut pairs = FxHashMap::default();
        match input {
            RatesInput::Flat {
                base_currency,
                timestamp,
                rates,
            } => {
                for (key, rate) in rates {
                    if let Some((from, to)) = key.split_once('_') {
                        pairs.insert((from.to_uppercase(), to.to_uppercase()), rate);
                    }
                }
                Self {
                    base: base_currency.to_uppercase(),
                    timestamp,
                    pairs,
                }
            }
            RatesInput::Nested(map) => {
                let mut base = String::new();
                for (from, inner) in map {
                    let from = from.to_uppercase();
                    if base.is_empty() {
                        base = from.clone();
                    }
                    for (to, rate) in inner {
                        pairs.insert((from.clone(), to.to_uppercase()), rate);
                    }
                }
                Self {
                    base,
                    timestamp: None,
                    pairs,
                }
            }
        }
    }

    /// Look up the multiplier turning an amount of `from` into `to`.
    ///
    /// Tries the direct pair, then the inverse, then triangulation
    /// through the base currency. Returns `None` when no path exists.
    pub fn rate(&self, from: &str, to: &str) -> Option<f64> {
        if from == to {
            return Some(1.0);
        }
        if let Some(rate) = self.direct(from, to) {
            return Some(rate);
        }
        let to_base = self.direct(&self.base, from)?;
        let from_base = self.direct(&self.base, to)?;
        Some(from_base / to_base)
    }

    fn direct(&self, from: &str, to: &str) -> Option<f64> {
        if from == to {
            return Some(1.0);
        }
        if let Some(&rate) = self.pairs.get(&(from.to_string(), to.to_string())) {
            return Some(rate);
        }
        self.pairs
            .get(&(to.to_string(), from.to_string()))
            .map(|&r| 1.0 / r)
    }

    /// True if the snapshot holds no pairs at all.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat() -> RatesSnapshot {
        let input: RatesInput = serde_json::from_str(
            r#"{
                "baseCurrency": "EUR",
                "timestamp": 1700000000,
                "rates": { "EUR_USD": 1.10, "EUR_GBP": 0.85, "EUR_HKD": 8.6 }
            }"#,
        )
        .unwrap();
        RatesSnapshot::from_input(input)
    }

    #[test]
    fn test_flat_parse() {
        let snap = flat();
        assert_eq!(snap.base, "EUR");
        assert_eq!(snap.timestamp, Some(1700000000));
        assert_eq!(snap.rate("EUR", "USD"), Some(1.10));
    }

    #[test]
    fn test_inverse() {
        let snap = flat();
        let rate = snap.rate("USD", "EUR").unwrap();
        assert!((rate - 1.0 / 1.10).abs() < 1e-12);
    }

    #[test]
    fn test_triangulation() {
        let snap = flat();
        // USD -> GBP via EUR: 0.85 / 1.10
        let rate = snap.rate("USD", "GBP").unwrap();
        assert!((rate - 0.85 / 1.10).abs() < 1e-12);
    }

    #[test]
    fn test_same_currency() {
        let snap = flat();
        assert_eq!(snap.rate("USD", "USD"), Some(1.0));
    }

    #[test]
    fn test_missing_pair() {
        let snap = flat();
        assert_eq!(snap.rate("USD", "JPY"), None);
    }

    #[test]
    fn test_nested_parse() {
        let input: RatesInput =
            serde_json::from_str(r#"{ "USD": { "JPY": 151.0, "EUR": 0.91 } }"#).unwrap();
        let snap = RatesSnapshot::from_input(input);
        assert_eq!(snap.base, "USD");
        assert_eq!(snap.rate("USD", "JPY"), Some(151.0));
        // JPY -> EUR via USD
        let rate = snap.rate("JPY", "EUR").unwrap();
        assert!((rate - 0.91 / 151.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty() {
        assert!(RatesSnapshot::default().is_empty());
        assert!(!flat().is_empty());
    }
}
