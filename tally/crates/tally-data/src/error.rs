//! Error types for reference-data loading.

use thiserror::Error;

/// Reference-data loading or validation failure.
#[derive(Debug, Error)]
pub enum DataError {
    /// A table failed to parse as JSON
    #[error("failed to parse {table}: {source}")]
    Parse {
        table: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Two units share an id
    #[error("duplicate unit id `{0}`")]
    DuplicateUnit(String),

    /// A unit names a dimension that was never declared
    #[error("unit `{unit}` references unknown dimension `{dimension}`")]
    UnknownDimension { unit: String, dimension: String },

    /// A dimension has zero or more than one base unit
    #[error("dimension `{0}` must have exactly one base unit")]
    BadBaseUnit(String),

    /// Two currencies share a code
    #[error("duplicate currency code `{0}`")]
    DuplicateCurrency(String),

    /// A timezone alias points at a name chrono-tz does not know
    #[error("alias `{alias}` resolves to invalid IANA id `{iana}`")]
    InvalidTimezone { alias: String, iana: String },
}

/// Result alias for reference-data operations.
pub type DataResult<T> = std::result::Result<T, DataError>;
