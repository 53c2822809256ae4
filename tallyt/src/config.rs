//! Optional TOML configuration, layered under the command line.
//!
//! ```toml
//! locale = "US"
//! rates = "rates.json"
//!
//! [settings]
//! precision = 2
//! group_separator = "comma"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tally_util::Settings;

use crate::error::{Result, TallytError};

/// The tallyt configuration file.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// User locale region (`"US"`, `"GB"`, …)
    pub locale: Option<String>,
    /// Path to an exchange-rates JSON file, resolved relative to the
    /// config file
    pub rates: Option<PathBuf>,
    /// Presentation settings overrides
    pub settings: Settings,
}

impl Config {
    /// Load a config file; a missing path yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path).map_err(|source| TallytError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Config =
            toml::from_str(&text).map_err(|e| TallytError::InvalidConfig {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        if let (Some(rates), Some(dir)) = (&config.rates, path.parent()) {
            if rates.is_relative() {
                config.rates = Some(dir.join(rates));
            }
        }
        config.settings.validate().map_err(|e| TallytError::InvalidConfig {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(config)
    }
}
