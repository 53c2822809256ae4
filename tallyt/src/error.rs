//! CLI error type and exit codes.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the tallyt CLI.
#[derive(Debug, Error)]
pub enum TallytError {
    /// A file argument could not be read
    #[error("cannot read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file was malformed
    #[error("invalid config {path}: {message}")]
    InvalidConfig { path: PathBuf, message: String },

    /// An exchange-rate payload failed to parse
    #[error("invalid rates file {path}: {source}")]
    InvalidRates {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A settings file failed to parse
    #[error("invalid settings file {path}: {source}")]
    InvalidSettings {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The document had diagnostics under `check`
    #[error("{count} problem(s) found")]
    CheckFailed { count: usize },
}

impl TallytError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            TallytError::ReadFailed { .. } => 66,
            TallytError::InvalidConfig { .. }
            | TallytError::InvalidRates { .. }
            | TallytError::InvalidSettings { .. } => 78,
            TallytError::CheckFailed { .. } => 1,
        }
    }
}

/// Result alias for CLI operations.
pub type Result<T> = std::result::Result<T, TallytError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(TallytError::CheckFailed { count: 2 }.exit_code(), 1);
        let err = TallytError::ReadFailed {
            path: "x.tally".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "nope"),
        };
        assert_eq!(err.exit_code(), 66);
    }

    #[test]
    fn test_display() {
        let err = TallytError::CheckFailed { count: 2 };
        assert_eq!(err.to_string(), "2 problem(s) found");
    }
}
