//! Unit and dimension models.

use serde::Deserialize;

/// Regional variant selector for units whose size differs by country
/// (gallons, fluid ounces) and for timezone alias preferences.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Region {
    /// United States customary
    #[default]
    Us,
    /// United Kingdom imperial
    Uk,
}

impl Region {
    /// Parse a user locale region string (`"US"`, `"GB"`, ...).
    ///
    /// Anything that is not a British locale selects [`Region::Us`].
    pub fn from_locale(locale: &str) -> Self {
        match locale.to_ascii_uppercase().as_str() {
            "UK" | "GB" | "GB-ENG" | "GB-SCT" | "GB-WLS" | "GB-NIR" => Region::Uk,
            _ => Region::Us,
        }
    }
}

/// Human-facing names of a unit.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct DisplayName {
    /// Short symbol: `m`, `°C`
    pub symbol: String,
    /// Singular word form: `meter`
    pub singular: String,
    /// Plural word form: `meters`
    pub plural: String,
}

/// A scale mapping a quantity to its dimension's base unit.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Scale {
    /// `base = x * factor`
    Linear { factor: f64 },
    /// `base = (x + offset) * factor` - temperatures
    Affine { factor: f64, offset: f64 },
}

impl Scale {
    /// Convert a quantity in this unit to the dimension's base unit.
    pub fn to_base(&self, x: f64) -> f64 {
        match *self {
            Scale::Linear { factor } => x * factor,
            Scale::Affine { factor, offset } => (x + offset) * factor,
        }
    }

    /// Convert a quantity in the dimension's base unit to this unit.
    pub fn from_base(&self, base: f64) -> f64 {
        match *self {
            Scale::Linear { factor } => base / factor,
            Scale::Affine { factor, offset } => base / factor - offset,
        }
    }

    /// Convert a *difference* (delta) to the base unit. Affine offsets
    /// do not apply to deltas.
    pub fn delta_to_base(&self, x: f64) -> f64 {
        match *self {
            Scale::Linear { factor } | Scale::Affine { factor, .. } => x * factor,
        }
    }

    /// Convert a base-unit difference to this unit.
    pub fn delta_from_base(&self, base: f64) -> f64 {
        match *self {
            Scale::Linear { factor } | Scale::Affine { factor, .. } => base / factor,
        }
    }

    /// True for affine (temperature-style) scales.
    pub fn is_affine(&self) -> bool {
        matches!(self, Scale::Affine { .. })
    }
}

/// How a unit converts to its dimension's base.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Conversion {
    /// One scale for every region
    Uniform(Scale),
    /// Distinct US and UK scales (gallons and friends)
    Variant { us: Scale, uk: Scale },
}

impl Conversion {
    /// The scale effective under the given region.
    pub fn scale(&self, region: Region) -> Scale {
        match *self {
            Conversion::Uniform(scale) => scale,
            Conversion::Variant { us, uk } => match region {
                Region::Us => us,
                Region::Uk => uk,
            },
        }
    }

    /// True if any regional variant is affine.
    pub fn is_affine(&self) -> bool {
        match *self {
            Conversion::Uniform(s) => s.is_affine(),
            Conversion::Variant { us, uk } => us.is_affine() || uk.is_affine(),
        }
    }
}

/// A unit of measure in the reference index.
#[derive(Clone, Debug, Deserialize)]
pub struct Unit {
    /// Unique id, e.g. `kilometer`
    pub id: String,
    /// Dimension id, e.g. `length`
    pub dimension: String,
    /// Display names
    pub display: DisplayName,
    /// Extra matchable spellings (`metre`, `nautical mile`)
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Conversion to the dimension's base unit
    pub conversion: Conversion,
}

impl Unit {
    /// Every spelling this unit can be referred to by.
    pub fn spellings(&self) -> impl Iterator<Item = &str> {
        [
            self.display.symbol.as_str(),
            self.display.singular.as_str(),
            self.display.plural.as_str(),
        ]
        .into_iter()
        .chain(self.aliases.iter().map(String::as_str))
    }

    /// True if this unit converts affinely anywhere.
    pub fn is_affine(&self) -> bool {
        self.conversion.is_affine()
    }
}

/// A dimension declaration in a unit table file.
#[derive(Clone, Debug, Deserialize)]
pub struct DimensionDef {
    /// Dimension id, e.g. `area`
    pub id: String,
    /// Id of the dimension's base unit
    pub base: String,
    /// Composition in terms of other dimensions, e.g. `[["length", 2]]`
    /// for area. Empty for primitive dimensions.
    #[serde(default)]
    pub composed: Vec<(String, i32)>,
}

/// A unit declaration in a unit table file: the unit itself plus the
/// metric prefixes to expand it with at load time.
#[derive(Clone, Debug, Deserialize)]
pub struct UnitDef {
    #[serde(flatten)]
    pub unit: Unit,
    /// Prefix names from the SI table (`"kilo"`, `"milli"`, ...)
    #[serde(default)]
    pub prefixes: Vec<String>,
}

/// The schema of `units.json`.
#[derive(Clone, Debug, Deserialize)]
pub struct UnitFile {
    pub dimensions: Vec<DimensionDef>,
    pub units: Vec<UnitDef>,
}

/// SI prefix: name, symbol, factor.
pub const SI_PREFIXES: &[(&str, &str, f64)] = &[
    ("nano", "n", 1e-9),
    ("micro", "µ", 1e-6),
    ("milli", "m", 1e-3),
    ("centi", "c", 1e-2),
    ("deci", "d", 1e-1),
    ("hecto", "h", 1e2),
    ("kilo", "k", 1e3),
    ("mega", "M", 1e6),
    ("giga", "G", 1e9),
    ("tera", "T", 1e12),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn celsius() -> Scale {
        Scale::Affine {
            factor: 1.0,
            offset: 273.15,
        }
    }

    fn fahrenheit() -> Scale {
        Scale::Affine {
            factor: 5.0 / 9.0,
            offset: 459.67,
        }
    }

    #[test]
    fn test_linear_round_trip() {
        let km = Scale::Linear { factor: 1000.0 };
        assert_eq!(km.to_base(5.0), 5000.0);
        assert_eq!(km.from_base(5000.0), 5.0);
    }

    #[test]
    fn test_celsius_to_kelvin() {
        assert!((celsius().to_base(0.0) - 273.15).abs() < 1e-9);
        assert!((celsius().from_base(373.15) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_fahrenheit_to_celsius_via_base() {
        // 100 °F -> K -> °C ≈ 37.7778 °C
        let k = fahrenheit().to_base(100.0);
        let c = celsius().from_base(k);
        assert!((c - 37.77777777777).abs() < 1e-6);
    }

    #[test]
    fn test_affine_delta_ignores_offset() {
        // A 10 °C temperature difference is a 10 K difference.
        assert!((celsius().delta_to_base(10.0) - 10.0).abs() < 1e-12);
        // A 9 °F difference is a 5 K difference.
        assert!((fahrenheit().delta_to_base(9.0) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_variant_scale_by_region() {
        let gallon = Conversion::Variant {
            us: Scale::Linear {
                factor: 0.003785411784,
            },
            uk: Scale::Linear { factor: 0.00454609 },
        };
        let us = gallon.scale(Region::Us).to_base(1.0);
        let uk = gallon.scale(Region::Uk).to_base(1.0);
        assert!(us < uk);
    }

    #[test]
    fn test_region_from_locale() {
        assert_eq!(Region::from_locale("US"), Region::Us);
        assert_eq!(Region::from_locale("gb"), Region::Uk);
        assert_eq!(Region::from_locale("UK"), Region::Uk);
        assert_eq!(Region::from_locale("DE"), Region::Us);
    }

    #[test]
    fn test_unit_spellings() {
        let unit = Unit {
            id: "meter".into(),
            dimension: "length".into(),
            display: DisplayName {
                symbol: "m".into(),
                singular: "meter".into(),
                plural: "meters".into(),
            },
            aliases: vec!["metre".into(), "metres".into()],
            conversion: Conversion::Uniform(Scale::Linear { factor: 1.0 }),
        };
        let spellings: Vec<_> = unit.spellings().collect();
        assert_eq!(spellings, vec!["m", "meter", "meters", "metre", "metres"]);
    }
}
