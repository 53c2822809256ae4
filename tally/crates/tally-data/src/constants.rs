//! Mathematical constants.

/// A named mathematical constant.
#[derive(Clone, Debug)]
pub struct Constant {
    /// Primary word name, lower case: `pi`
    pub primary_name: &'static str,
    /// Other spellings. Single non-ASCII-letter spellings are treated
    /// as symbols and matched case-sensitively; words match
    /// case-insensitively.
    pub aliases: &'static [&'static str],
    /// The value
    pub value: f64,
}

/// Lookup over the built-in constant set.
///
/// Words (`pi`, `Pi`, `PHI`) match case-insensitively; symbols (`π`,
/// `φ`) match exactly.
#[derive(Clone, Debug, Default)]
pub struct ConstantTable {
    entries: Vec<Constant>,
}

const BUILTIN: &[Constant] = &[
    Constant {
        primary_name: "pi",
        aliases: &["π"],
        value: std::f64::consts::PI,
    },
    Constant {
        primary_name: "tau",
        aliases: &["τ"],
        value: std::f64::consts::TAU,
    },
    Constant {
        primary_name: "e",
        aliases: &[],
        value: std::f64::consts::E,
    },
    Constant {
        primary_name: "phi",
        aliases: &["φ", "golden"],
        value: 1.618033988749895,
    },
];

fn is_symbol(spelling: &str) -> bool {
    spelling.chars().count() == 1 && !spelling.chars().all(|c| c.is_ascii_alphabetic())
}

impl ConstantTable {
    /// The built-in constant set.
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN.to_vec(),
        }
    }

    /// Resolve a spelling to a constant value.
    ///
    /// `e` is a word and matches `E`; `π` is a symbol and does not
    /// match `Π`.
    pub fn lookup(&self, spelling: &str) -> Option<f64> {
        for entry in &self.entries {
            if entry.primary_name.eq_ignore_ascii_case(spelling) {
                return Some(entry.value);
            }
            for alias in entry.aliases {
                let matched = if is_symbol(alias) {
                    *alias == spelling
                } else {
                    alias.eq_ignore_ascii_case(spelling)
                };
                if matched {
                    return Some(entry.value);
                }
            }
        }
        None
    }

    /// True if the spelling names a constant.
    pub fn contains(&self, spelling: &str) -> bool {
        self.lookup(spelling).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_lookup_case_insensitive() {
        let table = ConstantTable::builtin();
        assert_eq!(table.lookup("pi"), Some(std::f64::consts::PI));
        assert_eq!(table.lookup("PI"), Some(std::f64::consts::PI));
        assert_eq!(table.lookup("Tau"), Some(std::f64::consts::TAU));
        assert_eq!(table.lookup("E"), Some(std::f64::consts::E));
    }

    #[test]
    fn test_symbol_lookup_case_sensitive() {
        let table = ConstantTable::builtin();
        assert_eq!(table.lookup("π"), Some(std::f64::consts::PI));
        assert_eq!(table.lookup("Π"), None);
        assert_eq!(table.lookup("φ"), Some(1.618033988749895));
    }

    #[test]
    fn test_unknown() {
        let table = ConstantTable::builtin();
        assert_eq!(table.lookup("answer"), None);
        assert!(!table.contains("answer"));
    }
}
