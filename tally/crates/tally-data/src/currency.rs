//! Currency models.

use serde::Deserialize;

/// Symbols attached to a currency, split by placement.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct CurrencySymbols {
    /// Symbols written flush against the amount: `US$100`
    #[serde(default)]
    pub adjacent: Vec<String>,
    /// Symbols written with a space: `kr 100`
    #[serde(default)]
    pub spaced: Vec<String>,
}

/// A currency in the reference index.
///
/// A currency behaves like a unit whose dimension is the shared
/// `currency` dimension; conversion factors come from the installed
/// exchange-rate snapshot instead of the unit table.
#[derive(Clone, Debug, Deserialize)]
pub struct Currency {
    /// ISO 4217 code, upper case
    pub code: String,
    /// Number of minor-unit digits (`2` for USD, `0` for JPY)
    pub minor_units: u8,
    /// Matchable names: `dollar`, `us dollar`, `dollars`
    #[serde(default)]
    pub names: Vec<String>,
    /// Symbols by placement
    #[serde(default)]
    pub symbols: CurrencySymbols,
}

impl Currency {
    /// Dimension id shared by all unambiguous currencies.
    pub const DIMENSION: &'static str = "currency";

    /// Synthetic dimension id for an ambiguous symbol such as `$`.
    ///
    /// Quantities tagged with it cannot convert to anything; restating
    /// the amount with a real code is required.
    pub fn ambiguous_dimension(symbol: &str) -> String {
        format!("currency:{symbol}")
    }
}

/// The currency side of a reference table file: unambiguous currencies
/// plus the symbols too ambiguous to commit to a code.
#[derive(Clone, Debug, Deserialize)]
pub struct CurrencyFile {
    pub currencies: Vec<Currency>,
    #[serde(default)]
    pub ambiguous_symbols: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ambiguous_dimension() {
        assert_eq!(Currency::ambiguous_dimension("$"), "currency:$");
        assert_eq!(Currency::ambiguous_dimension("¥"), "currency:¥");
    }

    #[test]
    fn test_currency_file_parse() {
        let json = r#"{
            "currencies": [
                {
                    "code": "USD",
                    "minor_units": 2,
                    "names": ["dollar", "dollars", "us dollar"],
                    "symbols": { "adjacent": ["US$"], "spaced": [] }
                }
            ],
            "ambiguous_symbols": ["$"]
        }"#;
        let file: CurrencyFile = serde_json::from_str(json).unwrap();
        assert_eq!(file.currencies.len(), 1);
        assert_eq!(file.currencies[0].code, "USD");
        assert_eq!(file.currencies[0].minor_units, 2);
        assert_eq!(file.ambiguous_symbols, vec!["$"]);
    }
}
