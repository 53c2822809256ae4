//! The reference index facade.
//!
//! One immutable bundle of every lookup table the pipeline needs:
//! units by exact and case-insensitive spelling, multi-word unit and
//! currency names, currencies by code/name/symbol, timezone aliases,
//! and constants. Built once from JSON (embedded or external) and
//! shared by reference.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use crate::constants::ConstantTable;
use crate::currency::{Currency, CurrencyFile};
use crate::error::{DataError, DataResult};
use crate::timezone::{TimezoneEntry, TimezoneTable};
use crate::unit::{Conversion, Scale, Unit, UnitFile, SI_PREFIXES};

/// Index of a unit inside a [`ReferenceIndex`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(pub u32);

impl UnitId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

const UNITS_JSON: &str = include_str!("builtin/units.json");
const CURRENCIES_JSON: &str = include_str!("builtin/currencies.json");
const TIMEZONES_JSON: &str = include_str!("builtin/timezones.json");

/// The read-only reference index.
#[derive(Clone, Debug)]
pub struct ReferenceIndex {
    units: Vec<Unit>,
    /// case-sensitive spelling -> unit, first registration wins
    unit_exact: FxHashMap<String, UnitId>,
    /// lowercase spelling -> units, registration order preserved
    unit_ci: IndexMap<String, Vec<UnitId>>,
    /// lowercase multi-word spelling -> unit
    unit_multiword: FxHashMap<String, UnitId>,
    /// dimension id -> base unit
    dimension_base: IndexMap<String, UnitId>,
    /// dimension id -> composition over primitive dimensions
    dimension_composed: FxHashMap<String, Vec<(String, i32)>>,
    /// ISO code -> currency, registration order preserved
    currencies: IndexMap<String, Currency>,
    /// lowercase currency name -> code
    currency_names: FxHashMap<String, String>,
    /// lowercase multi-word currency name -> code
    currency_multiword: FxHashMap<String, String>,
    /// adjacent symbol -> code
    currency_adjacent: FxHashMap<String, String>,
    /// spaced symbol -> code
    currency_spaced: FxHashMap<String, String>,
    ambiguous_symbols: Vec<String>,
    timezones: TimezoneTable,
    constants: ConstantTable,
    max_unit_words: usize,
}

impl ReferenceIndex {
    /// Build the index from the embedded builtin dataset.
    ///
    /// The builtin tables are compiled in and known-valid, so this
    /// cannot fail at runtime.
    pub fn builtin() -> Self {
        Self::from_json(UNITS_JSON, CURRENCIES_JSON, TIMEZONES_JSON)
            .expect("builtin reference data is valid")
    }

    /// Build the index from three JSON tables (the `units.json`,
    /// `currencies.json`, `timezones.json` schemas).
    pub fn from_json(units: &str, currencies: &str, timezones: &str) -> DataResult<Self> {
        let unit_file: UnitFile = serde_json::from_str(units).map_err(|source| {
            DataError::Parse {
                table: "units.json",
                source,
            }
        })?;
        let currency_file: CurrencyFile =
            serde_json::from_str(currencies).map_err(|source| DataError::Parse {
                table: "currencies.json",
                source,
            })?;
        let tz_entries: Vec<TimezoneEntry> =
            serde_json::from_str(timezones).map_err(|source| DataError::Parse {
                table: "timezones.json",
                source,
            })?;
        Self::build(unit_file, currency_file, tz_entries)
    }

    fn build(
        unit_file: UnitFile,
        currency_file: CurrencyFile,
        tz_entries: Vec<TimezoneEntry>,
    ) -> DataResult<Self> {
        let mut index = Self {
            units: Vec::new(),
            unit_exact: FxHashMap::default(),
            unit_ci: IndexMap::new(),
            unit_multiword: FxHashMap::default(),
            dimension_base: IndexMap::new(),
            dimension_composed: FxHashMap::default(),
            currencies: IndexMap::new(),
            currency_names: FxHashMap::default(),
            currency_multiword: FxHashMap::default(),
            currency_adjacent: FxHashMap::default(),
            currency_spaced: FxHashMap::default(),
            ambiguous_symbols: currency_file.ambiguous_symbols,
            timezones: TimezoneTable::new(tz_entries)?,
            constants: ConstantTable::builtin(),
            max_unit_words: 1,
        };

        let mut declared_dimensions: FxHashMap<String, String> = FxHashMap::default();
        for dim in &unit_file.dimensions {
            declared_dimensions.insert(dim.id.clone(), dim.base.clone());
            if !dim.composed.is_empty() {
                index
                    .dimension_composed
                    .insert(dim.id.clone(), dim.composed.clone());
            }
        }

        for def in unit_file.units {
            for expanded in expand_prefixes(&def.unit, &def.prefixes) {
                index.register_unit(expanded, &declared_dimensions)?;
            }
            index.register_unit(def.unit, &declared_dimensions)?;
        }

        // Every declared dimension needs its base unit registered with
        // an identity scale.
        for (dim, base) in &declared_dimensions {
            let Some(pos) = index.units.iter().position(|u| &u.id == base) else {
                return Err(DataError::BadBaseUnit(dim.clone()));
            };
            let identity = matches!(
                index.units[pos].conversion,
                Conversion::Uniform(Scale::Linear { factor }) if factor == 1.0
            );
            if !identity {
                return Err(DataError::BadBaseUnit(dim.clone()));
            }
            index.dimension_base.insert(dim.clone(), UnitId(pos as u32));
        }

        for currency in currency_file.currencies {
            index.register_currency(currency)?;
        }

        Ok(index)
    }

    fn register_unit(
        &mut self,
        unit: Unit,
        declared: &FxHashMap<String, String>,
    ) -> DataResult<()> {
        if self.units.iter().any(|u| u.id == unit.id) {
            return Err(DataError::DuplicateUnit(unit.id));
        }
        if !declared.contains_key(&unit.dimension) {
            return Err(DataError::UnknownDimension {
                unit: unit.id,
                dimension: unit.dimension,
            });
        }
        let id = UnitId(self.units.len() as u32);
        let mut seen: Vec<&str> = Vec::new();
        for spelling in unit.spellings() {
            if seen.contains(&spelling) {
                continue;
            }
            seen.push(spelling);
            if spelling.contains(' ') {
                let words = spelling.split_whitespace().count();
                self.max_unit_words = self.max_unit_words.max(words);
                self.unit_multiword
                    .entry(spelling.to_lowercase())
                    .or_insert(id);
            } else {
                self.unit_exact.entry(spelling.to_string()).or_insert(id);
                self.unit_ci
                    .entry(spelling.to_lowercase())
                    .or_default()
                    .push(id);
            }
        }
        self.units.push(unit);
        Ok(())
    }

    fn register_currency(&mut self, currency: Currency) -> DataResult<()> {
        let code = currency.code.clone();
        if self.currencies.contains_key(&code) {
            return Err(DataError::DuplicateCurrency(code));
        }
        for name in &currency.names {
            if name.contains(' ') {
                let words = name.split_whitespace().count();
                self.max_unit_words = self.max_unit_words.max(words);
                self.currency_multiword
                    .entry(name.to_lowercase())
                    .or_insert_with(|| code.clone());
            } else {
                self.currency_names
                    .entry(name.to_lowercase())
                    .or_insert_with(|| code.clone());
            }
        }
        for symbol in &currency.symbols.adjacent {
            self.currency_adjacent
                .entry(symbol.clone())
                .or_insert_with(|| code.clone());
        }
        for symbol in &currency.symbols.spaced {
            self.currency_spaced
                .entry(symbol.clone())
                .or_insert_with(|| code.clone());
        }
        self.currencies.insert(code, currency);
        Ok(())
    }

    // ---- unit lookups ----

    /// The unit behind an id.
    pub fn unit(&self, id: UnitId) -> &Unit {
        &self.units[id.index()]
    }

    /// Look a unit up by its canonical id string (`"arcminute"`).
    pub fn unit_by_id(&self, id: &str) -> Option<UnitId> {
        self.units
            .iter()
            .position(|u| u.id == id)
            .map(|pos| UnitId(pos as u32))
    }

    /// Exact, case-sensitive spelling lookup.
    pub fn unit_by_exact(&self, spelling: &str) -> Option<UnitId> {
        self.unit_exact.get(spelling).copied()
    }

    /// Case-insensitive candidates for a spelling, registration order.
    pub fn units_by_ci(&self, spelling: &str) -> &[UnitId] {
        self.unit_ci
            .get(&spelling.to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Look up a multi-word unit name (words joined by single spaces).
    pub fn unit_by_words(&self, words: &[&str]) -> Option<UnitId> {
        if words.len() < 2 {
            return None;
        }
        self.unit_multiword
            .get(&words.join(" ").to_lowercase())
            .copied()
    }

    /// True if the spelling matches any unit, under any case.
    pub fn is_unit_word(&self, spelling: &str) -> bool {
        self.unit_exact.contains_key(spelling)
            || self.unit_ci.contains_key(&spelling.to_lowercase())
    }

    /// Longest multi-word unit or currency name in the index, in words.
    pub fn max_unit_words(&self) -> usize {
        self.max_unit_words
    }

    /// The base unit of a dimension.
    pub fn base_unit_of(&self, dimension: &str) -> Option<UnitId> {
        self.dimension_base.get(dimension).copied()
    }

    /// Composition of a derived dimension (`area` -> `[(length, 2)]`).
    pub fn dimension_composition(&self, dimension: &str) -> Option<&[(String, i32)]> {
        self.dimension_composed.get(dimension).map(Vec::as_slice)
    }

    /// All units, registration order.
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    // ---- currency lookups ----

    /// Currency by ISO code, case-insensitive.
    pub fn currency_by_code(&self, code: &str) -> Option<&Currency> {
        self.currencies.get(&code.to_uppercase())
    }

    /// Currency code by single-word name, case-insensitive.
    pub fn currency_by_name(&self, name: &str) -> Option<&str> {
        self.currency_names
            .get(&name.to_lowercase())
            .map(String::as_str)
    }

    /// Currency code by multi-word name.
    pub fn currency_by_words(&self, words: &[&str]) -> Option<&str> {
        if words.len() < 2 {
            return None;
        }
        self.currency_multiword
            .get(&words.join(" ").to_lowercase())
            .map(String::as_str)
    }

    /// Currency code by adjacent symbol (`US$`).
    pub fn currency_by_adjacent_symbol(&self, symbol: &str) -> Option<&str> {
        self.currency_adjacent.get(symbol).map(String::as_str)
    }

    /// Currency code by spaced symbol.
    pub fn currency_by_spaced_symbol(&self, symbol: &str) -> Option<&str> {
        self.currency_spaced.get(symbol).map(String::as_str)
    }

    /// True if the symbol is too ambiguous to commit to a code.
    pub fn is_ambiguous_symbol(&self, symbol: &str) -> bool {
        self.ambiguous_symbols.iter().any(|s| s == symbol)
    }

    /// True if the spelling could begin a currency amount (`$`, `US$`,
    /// code, or name).
    pub fn is_currency_prefix(&self, spelling: &str) -> bool {
        self.is_ambiguous_symbol(spelling)
            || self.currency_adjacent.contains_key(spelling)
            || self.currency_spaced.contains_key(spelling)
            || self.currencies.contains_key(&spelling.to_uppercase())
    }

    // ---- other tables ----

    /// The timezone alias table.
    pub fn timezones(&self) -> &TimezoneTable {
        &self.timezones
    }

    /// The constant table.
    pub fn constants(&self) -> &ConstantTable {
        &self.constants
    }
}

/// Expand a unit definition with the requested SI prefixes.
fn expand_prefixes(unit: &Unit, prefixes: &[String]) -> Vec<Unit> {
    let mut out = Vec::new();
    let Conversion::Uniform(Scale::Linear { factor }) = unit.conversion else {
        return out;
    };
    for prefix in prefixes {
        let Some(&(name, symbol, scale)) =
            SI_PREFIXES.iter().find(|(n, _, _)| n == prefix)
        else {
            continue;
        };
        let expanded = Unit {
            id: format!("{name}{}", unit.id),
            dimension: unit.dimension.clone(),
            display: crate::unit::DisplayName {
                symbol: format!("{symbol}{}", unit.display.symbol),
                singular: format!("{name}{}", unit.display.singular),
                plural: format!("{name}{}", unit.display.plural),
            },
            aliases: unit
                .aliases
                .iter()
                .filter(|a| !a.contains(' '))
                .map(|a| format!("{name}{a}"))
                .collect(),
            conversion: Conversion::Uniform(Scale::Linear {
                factor: factor * scale,
            }),
        };
        out.push(expanded);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> ReferenceIndex {
        ReferenceIndex::builtin()
    }

    #[test]
    fn test_builtin_loads() {
        let idx = index();
        assert!(idx.units().len() > 50);
    }

    #[test]
    fn test_exact_lookup() {
        let idx = index();
        let m = idx.unit_by_exact("m").unwrap();
        assert_eq!(idx.unit(m).id, "meter");
        // `M` is not the meter symbol.
        assert_ne!(idx.unit_by_exact("M"), Some(m));
    }

    #[test]
    fn test_prefix_expansion() {
        let idx = index();
        let km = idx.unit_by_exact("km").unwrap();
        let unit = idx.unit(km);
        assert_eq!(unit.id, "kilometer");
        assert_eq!(unit.dimension, "length");
        let scale = unit.conversion.scale(crate::Region::Us);
        assert_eq!(scale.to_base(1.0), 1000.0);
    }

    #[test]
    fn test_ci_lookup() {
        let idx = index();
        let hits = idx.units_by_ci("KM");
        assert_eq!(hits.len(), 1);
        assert_eq!(idx.unit(hits[0]).id, "kilometer");
    }

    #[test]
    fn test_multiword_unit() {
        let idx = index();
        let id = idx.unit_by_words(&["nautical", "mile"]).unwrap();
        assert_eq!(idx.unit(id).id, "nautical_mile");
        let id = idx.unit_by_words(&["pound", "force"]).unwrap();
        assert_eq!(idx.unit(id).id, "pound_force");
        assert!(idx.unit_by_words(&["nautical"]).is_none());
    }

    #[test]
    fn test_dimension_base() {
        let idx = index();
        let base = idx.base_unit_of("length").unwrap();
        assert_eq!(idx.unit(base).id, "meter");
        assert!(idx.base_unit_of("vibes").is_none());
    }

    #[test]
    fn test_dimension_composition() {
        let idx = index();
        let comp = idx.dimension_composition("area").unwrap();
        assert_eq!(comp, &[("length".to_string(), 2)]);
        assert!(idx.dimension_composition("length").is_none());
    }

    #[test]
    fn test_currency_lookups() {
        let idx = index();
        assert_eq!(idx.currency_by_code("usd").unwrap().code, "USD");
        assert_eq!(idx.currency_by_name("dollar"), Some("USD"));
        assert_eq!(
            idx.currency_by_words(&["hong", "kong", "dollar"]),
            Some("HKD")
        );
        assert_eq!(idx.currency_by_adjacent_symbol("US$"), Some("USD"));
        assert_eq!(idx.currency_by_adjacent_symbol("€"), Some("EUR"));
    }

    #[test]
    fn test_ambiguous_symbols() {
        let idx = index();
        assert!(idx.is_ambiguous_symbol("$"));
        assert!(idx.is_ambiguous_symbol("¥"));
        assert!(!idx.is_ambiguous_symbol("€"));
    }

    #[test]
    fn test_is_currency_prefix() {
        let idx = index();
        assert!(idx.is_currency_prefix("$"));
        assert!(idx.is_currency_prefix("USD"));
        assert!(idx.is_currency_prefix("usd"));
        assert!(!idx.is_currency_prefix("meters"));
    }

    #[test]
    fn test_affine_units_present() {
        let idx = index();
        let c = idx.unit_by_exact("°C").unwrap();
        assert!(idx.unit(c).is_affine());
        let f = idx.unit_by_exact("°F").unwrap();
        assert!(idx.unit(f).is_affine());
    }

    #[test]
    fn test_variant_units_present() {
        let idx = index();
        let gal = idx.unit_by_exact("gal").unwrap();
        let unit = idx.unit(gal);
        let us = unit.conversion.scale(crate::Region::Us).to_base(1.0);
        let uk = unit.conversion.scale(crate::Region::Uk).to_base(1.0);
        assert!(us < uk);
    }

    #[test]
    fn test_timezone_table_wired() {
        let idx = index();
        assert_eq!(idx.timezones().resolve("UTC", None), Some("Etc/UTC"));
    }

    #[test]
    fn test_constants_wired() {
        let idx = index();
        assert!(idx.constants().contains("pi"));
    }

    #[test]
    fn test_max_unit_words() {
        let idx = index();
        assert!(idx.max_unit_words() >= 3);
    }
}
