//! Timezone alias resolution.
//!
//! The table maps human names (abbreviations, cities, countries) to
//! canonical IANA ids, optionally constrained by the user's territory:
//! `EST` is `America/New_York` under a US locale, `IST` is
//! `Asia/Kolkata` in India but `Europe/Dublin` in Ireland. IANA ids
//! pass through unchanged. The table is bidirectional - an IANA id
//! also resolves back to a display name.

use std::str::FromStr;

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::error::{DataError, DataResult};

/// One human name for a zone, optionally tied to a territory.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct TimezoneName {
    /// The name as users type it
    pub name: String,
    /// ISO country code the name is preferred in, if any
    #[serde(default)]
    pub territory: Option<String>,
}

/// One zone with all its names.
#[derive(Clone, Debug, Deserialize)]
pub struct TimezoneEntry {
    /// Canonical IANA id, e.g. `America/New_York`
    pub iana: String,
    /// Human names resolving to this zone
    pub names: Vec<TimezoneName>,
}

/// Bidirectional alias table.
#[derive(Clone, Debug, Default)]
pub struct TimezoneTable {
    entries: Vec<TimezoneEntry>,
    /// lowercase name -> indices into `entries`, insertion order
    by_name: FxHashMap<String, Vec<usize>>,
}

impl TimezoneTable {
    /// Build a table from parsed entries, validating every IANA id
    /// against the installed tz database.
    pub fn new(entries: Vec<TimezoneEntry>) -> DataResult<Self> {
        let mut by_name: FxHashMap<String, Vec<usize>> = FxHashMap::default();
        for (idx, entry) in entries.iter().enumerate() {
            if chrono_tz::Tz::from_str(&entry.iana).is_err() {
                return Err(DataError::InvalidTimezone {
                    alias: entry
                        .names
                        .first()
                        .map(|n| n.name.clone())
                        .unwrap_or_default(),
                    iana: entry.iana.clone(),
                });
            }
            for name in &entry.names {
                by_name
                    .entry(name.name.to_lowercase())
                    .or_default()
                    .push(idx);
            }
        }
        Ok(Self { entries, by_name })
    }

    /// Resolve a human name or IANA id to a canonical IANA id.
    ///
    /// Exact IANA ids always win. Otherwise the lookup is
    /// case-insensitive; when several zones claim the name, an entry
    /// whose territory matches `territory` is preferred, then the
    /// first registered entry.
    pub fn resolve<'a>(&'a self, name: &'a str, territory: Option<&str>) -> Option<&'a str> {
        if chrono_tz::Tz::from_str(name).is_ok() {
            return Some(name);
        }
        let candidates = self.by_name.get(&name.to_lowercase())?;
        if let Some(territory) = territory {
            for &idx in candidates {
                let entry = &self.entries[idx];
                let matches = entry.names.iter().any(|n| {
                    n.name.eq_ignore_ascii_case(name)
                        && n.territory.as_deref().is_some_and(|t| t.eq_ignore_ascii_case(territory))
                });
                if matches {
                    return Some(&entry.iana);
                }
            }
        }
        candidates.first().map(|&idx| self.entries[idx].iana.as_str())
    }

    /// Resolve an IANA id back to a display name, if the table has one.
    pub fn display_name(&self, iana: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.iana == iana)
            .and_then(|e| e.names.first())
            .map(|n| n.name.as_str())
    }
}
