//! Presentation settings.
//!
//! Settings shape how values render (separators, precision, unit
//! display, date/time templates) and how trigonometric functions
//! interpret bare numbers (angle unit). They are plain data handed to
//! the calculator for each run; nothing here is persisted.

use serde::Deserialize;
use thiserror::Error;

/// Decimal separator between integer and fractional digits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecimalSeparator {
    /// `1.5`
    #[default]
    Period,
    /// `1,5`
    Comma,
}

impl DecimalSeparator {
    /// The separator character.
    pub fn as_char(self) -> char {
        match self {
            DecimalSeparator::Period => '.',
            DecimalSeparator::Comma => ',',
        }
    }
}

/// Separator placed between digit groups.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupSeparator {
    /// `5 200`
    #[default]
    Space,
    /// `5.200`
    Period,
    /// `5,200`
    Comma,
    /// `5′200`
    Prime,
    /// `5200`
    None,
}

impl GroupSeparator {
    /// The separator string, empty for [`GroupSeparator::None`].
    pub fn as_str(self) -> &'static str {
        match self {
            GroupSeparator::Space => " ",
            GroupSeparator::Period => ".",
            GroupSeparator::Comma => ",",
            GroupSeparator::Prime => "\u{2032}",
            GroupSeparator::None => "",
        }
    }
}

/// Digit grouping scheme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupSize {
    /// No grouping
    Off,
    /// Groups of three: `1 234 567`
    #[default]
    Three,
    /// South-Asian 2-3 grouping: `12 34 567`
    SouthAsian,
    /// Groups of four: `123 4567`
    Four,
}

/// How units render after a number.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitDisplay {
    /// `5 km`
    #[default]
    Symbol,
    /// `5 kilometers`
    Name,
}

/// 12- or 24-hour clock for time rendering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub enum TimeFormat {
    /// `3:14 pm`
    #[serde(rename = "h12")]
    H12,
    /// `15:14`
    #[default]
    #[serde(rename = "h23")]
    H23,
}

/// Ordering of the date and time parts of a date-time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateOrder {
    /// `2024-02-29 15:14`
    #[default]
    DateFirst,
    /// `15:14 2024-02-29`
    TimeFirst,
}

/// Angle unit consumed by trigonometric functions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleUnit {
    /// Radians
    #[default]
    Rad,
    /// Degrees
    Deg,
}

/// Automatic precision sentinel for [`Settings::precision`].
pub const AUTO_PRECISION: i32 = -1;

/// Presentation settings for one calculator run.
///
/// All fields have defaults so a `settings.json`/TOML fragment may
/// name only what it overrides.
///
/// # Examples
///
/// ```
/// use tally_util::Settings;
///
/// let settings = Settings::default();
/// assert_eq!(settings.precision, -1);
/// settings.validate().unwrap();
/// ```
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Decimal separator
    pub decimal_separator: DecimalSeparator,
    /// Digit-group separator
    pub group_separator: GroupSeparator,
    /// Digit-group sizes
    pub group_size: GroupSize,
    /// Fraction digits; `-1` selects automatic precision
    pub precision: i32,
    /// Unit display style
    pub unit_display: UnitDisplay,
    /// Clock format
    pub time_format: TimeFormat,
    /// Date template over the tokens `YYYY MM DD MMM DDD`
    pub date_format: String,
    /// Date/time part ordering
    pub date_order: DateOrder,
    /// Angle unit for trigonometry
    pub angle_unit: AngleUnit,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            decimal_separator: DecimalSeparator::default(),
            group_separator: GroupSeparator::default(),
            group_size: GroupSize::default(),
            precision: AUTO_PRECISION,
            unit_display: UnitDisplay::default(),
            time_format: TimeFormat::default(),
            date_format: "YYYY-MM-DD".to_string(),
            date_order: DateOrder::default(),
            angle_unit: AngleUnit::default(),
        }
    }
}

/// Settings validation failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    /// Precision outside the supported range
    #[error("precision {0} out of range (expected -1..={max})", max = MAX_PRECISION)]
    PrecisionOutOfRange(i32),

    /// Decimal and group separator would be indistinguishable
    #[error("decimal separator and group separator are both `{0}`")]
    SeparatorClash(char),
}

/// Largest explicit precision the formatter supports.
pub const MAX_PRECISION: i32 = 20;

impl Settings {
    /// Check invariants the formatter relies on.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.precision < AUTO_PRECISION || self.precision > MAX_PRECISION {
            return Err(SettingsError::PrecisionOutOfRange(self.precision));
        }
        let dec = self.decimal_separator.as_char();
        if self.group_size != GroupSize::Off && self.group_separator.as_str() == dec.to_string() {
            return Err(SettingsError::SeparatorClash(dec));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.decimal_separator, DecimalSeparator::Period);
        assert_eq!(s.group_separator, GroupSeparator::Space);
        assert_eq!(s.group_size, GroupSize::Three);
        assert_eq!(s.precision, AUTO_PRECISION);
        assert_eq!(s.unit_display, UnitDisplay::Symbol);
        assert_eq!(s.time_format, TimeFormat::H23);
        assert_eq!(s.date_format, "YYYY-MM-DD");
        assert_eq!(s.angle_unit, AngleUnit::Rad);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_precision_range() {
        let mut s = Settings::default();
        s.precision = 21;
        assert_eq!(s.validate(), Err(SettingsError::PrecisionOutOfRange(21)));
        s.precision = -2;
        assert!(s.validate().is_err());
        s.precision = 0;
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_separator_clash() {
        let mut s = Settings::default();
        s.decimal_separator = DecimalSeparator::Comma;
        s.group_separator = GroupSeparator::Comma;
        assert_eq!(s.validate(), Err(SettingsError::SeparatorClash(',')));
        // No grouping, no clash.
        s.group_size = GroupSize::Off;
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_deserialize_partial() {
        let s: Settings =
            serde_json::from_str(r#"{"precision": 2, "group_separator": "comma"}"#).unwrap();
        assert_eq!(s.precision, 2);
        assert_eq!(s.group_separator, GroupSeparator::Comma);
        assert_eq!(s.group_size, GroupSize::Three);
    }

    #[test]
    fn test_deserialize_time_format() {
        let s: Settings = serde_json::from_str(r#"{"time_format": "h12"}"#).unwrap();
        assert_eq!(s.time_format, TimeFormat::H12);
    }

    #[test]
    fn test_separator_chars() {
        assert_eq!(DecimalSeparator::Comma.as_char(), ',');
        assert_eq!(GroupSeparator::Prime.as_str(), "\u{2032}");
        assert_eq!(GroupSeparator::None.as_str(), "");
    }
}
